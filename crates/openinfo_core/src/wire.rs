//! Formato de linha transmitido ao display.
//!
//! Um registro por linha: JSON compacto em UTF-8 terminado por `\n`.
//! O firmware lê com `readStringUntil('\n')` e faz parse com ArduinoJson,
//! então o terminador e o aninhamento de chaves são parte do contrato.

use crate::types::SampleRecord;

/// Terminador de linha do protocolo.
pub const LINE_TERMINATOR: u8 = b'\n';

/// Erros do formato de linha.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("Erro de serialização: {0}")]
    Serialize(String),

    #[error("Erro de deserialização: {0}")]
    Deserialize(String),

    #[error("Linha vazia")]
    EmptyLine,
}

/// Codifica um [`SampleRecord`] como linha pronta para a porta serial.
///
/// Retorna os bytes `{"sys":{...},...}\n`.
pub fn encode_line(record: &SampleRecord) -> Result<Vec<u8>, WireError> {
    let json = serde_json::to_string(record).map_err(|e| WireError::Serialize(e.to_string()))?;

    let mut line = json.into_bytes();
    line.push(LINE_TERMINATOR);
    Ok(line)
}

/// Decodifica uma linha recebida em [`SampleRecord`].
///
/// Aceita a linha com ou sem o `\n` final. Usado em testes e por qualquer
/// ferramenta que consuma o stream do lado do host.
pub fn decode_line(line: &str) -> Result<SampleRecord, WireError> {
    let trimmed = line.trim_end_matches(['\r', '\n']);
    if trimmed.is_empty() {
        return Err(WireError::EmptyLine);
    }

    serde_json::from_str(trimmed).map_err(|e| WireError::Deserialize(e.to_string()))
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
