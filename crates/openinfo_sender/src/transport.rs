//! Transporte serial de linhas (direção única: host → display).
//!
//! A porta é adquirida uma única vez na inicialização e fechada no drop,
//! em qualquer caminho de saída. Sem retry: falha de abertura é fatal.

use std::io::Write;
use std::time::Duration;
use tracing::info;

/// Erros de transporte.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Não foi possível abrir a porta serial {port}: {source}")]
    Open {
        port: String,
        #[source]
        source: serialport::Error,
    },

    #[error("Erro ao escrever na porta serial: {0}")]
    Write(#[from] std::io::Error),
}

/// Destino de linhas já codificadas. Seam para testes: o loop de
/// streaming só conhece este trait.
pub trait LineSink {
    fn send_line(&mut self, line: &[u8]) -> Result<(), TransportError>;
}

/// Porta serial real do display.
pub struct SerialSink {
    port: Box<dyn serialport::SerialPort>,
}

impl SerialSink {
    /// Abre a porta serial. O timeout de leitura é exigido pela API mas
    /// irrelevante aqui: nada é lido de volta do display.
    pub fn open(port: &str, baud: u32, read_timeout: Duration) -> Result<Self, TransportError> {
        let handle = serialport::new(port, baud)
            .timeout(read_timeout)
            .open()
            .map_err(|source| TransportError::Open {
                port: port.to_string(),
                source,
            })?;

        info!("Porta serial {port} aberta a {baud} baud");
        Ok(Self { port: handle })
    }
}

impl LineSink for SerialSink {
    fn send_line(&mut self, line: &[u8]) -> Result<(), TransportError> {
        self.port.write_all(line)?;
        self.port.flush()?;
        Ok(())
    }
}

/// Sink em memória que grava as linhas enviadas, para testes do loop.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct MemorySink {
    pub lines: Vec<Vec<u8>>,
}

#[cfg(test)]
impl LineSink for MemorySink {
    fn send_line(&mut self, line: &[u8]) -> Result<(), TransportError> {
        self.lines.push(line.to_vec());
        Ok(())
    }
}
