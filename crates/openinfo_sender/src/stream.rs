//! Loop de streaming: amostra → codifica → transmite, até cancelamento.

use crate::transport::{LineSink, TransportError};
use openinfo_core::types::SampleRecord;
use openinfo_core::wire::{WireError, encode_line};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Erros que atravessam a fronteira do loop. Casos numéricos degenerados
/// (dt <= 0, regressão de contador) são absorvidos antes, no RateTracker.
#[derive(Debug, thiserror::Error)]
pub enum SenderError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Wire(#[from] WireError),
}

/// Executa o loop de transmissão até `running` virar false (Ctrl+C) ou
/// até a primeira falha de codificação/escrita — sem retry fino: uma
/// ferramenta de diagnóstico falha alto.
///
/// O ritmo vem de `next_record`, cuja amostragem de CPU bloqueia pela
/// janela configurada.
pub fn stream_loop<F, S>(
    mut next_record: F,
    sink: &mut S,
    running: &AtomicBool,
) -> Result<(), SenderError>
where
    F: FnMut() -> SampleRecord,
    S: LineSink,
{
    while running.load(Ordering::SeqCst) {
        let record = next_record();
        let line = encode_line(&record)?;
        sink.send_line(&line)?;

        debug!(
            "→ {} bytes | CPU {:.1}% {:.1}°C | RAM {:.1}% | Disco {:.1}/{:.1} | Rede ↓{:.1} ↑{:.1} MB/s",
            line.len(),
            record.cpu.load,
            record.cpu.temp,
            record.ram.load,
            record.disk.read,
            record.disk.write,
            record.net.dl,
            record.net.ul,
        );
    }

    Ok(())
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MemorySink;
    use openinfo_core::types::{CpuSection, RamSection};
    use openinfo_core::wire::decode_line;
    use std::sync::atomic::AtomicUsize;

    fn test_record(load: f64) -> SampleRecord {
        SampleRecord {
            cpu: CpuSection { load, temp: 45.0 },
            ram: RamSection {
                load: 50.0,
                used: 8.0,
                total: 16.0,
            },
            ..Default::default()
        }
    }

    #[test]
    fn cancellation_stops_after_inflight_iteration() {
        let running = AtomicBool::new(true);
        let emitted = AtomicUsize::new(0);
        let mut sink = MemorySink::default();

        let result = stream_loop(
            || {
                let n = emitted.fetch_add(1, Ordering::SeqCst) + 1;
                if n == 3 {
                    // Simula o Ctrl+C chegando durante a terceira amostra
                    running.store(false, Ordering::SeqCst);
                }
                test_record(n as f64)
            },
            &mut sink,
            &running,
        );

        assert!(result.is_ok());
        // A iteração em andamento completa; nenhuma nova começa
        assert_eq!(sink.lines.len(), 3);
    }

    #[test]
    fn every_line_is_terminated_and_parseable() {
        let running = AtomicBool::new(true);
        let count = AtomicUsize::new(0);
        let mut sink = MemorySink::default();

        stream_loop(
            || {
                if count.fetch_add(1, Ordering::SeqCst) == 1 {
                    running.store(false, Ordering::SeqCst);
                }
                test_record(33.3)
            },
            &mut sink,
            &running,
        )
        .unwrap();

        for line in &sink.lines {
            assert_eq!(*line.last().unwrap(), b'\n');
            let text = std::str::from_utf8(line).unwrap();
            let record = decode_line(text).unwrap();
            assert_eq!(record.cpu.load, 33.3);
            let value: serde_json::Value = serde_json::from_str(text.trim_end()).unwrap();
            assert!(value["sys"].is_object());
            assert!(value["net"]["ul"].is_number());
        }
    }

    #[test]
    fn never_enters_loop_when_already_cancelled() {
        let running = AtomicBool::new(false);
        let mut sink = MemorySink::default();
        let result = stream_loop(|| unreachable!("não deveria amostrar"), &mut sink, &running);
        assert!(result.is_ok());
        assert!(sink.lines.is_empty());
    }

    #[test]
    fn write_failure_aborts_the_loop() {
        struct BrokenSink;
        impl LineSink for BrokenSink {
            fn send_line(&mut self, _line: &[u8]) -> Result<(), TransportError> {
                Err(TransportError::Write(std::io::Error::other(
                    "porta desconectada",
                )))
            }
        }

        let running = AtomicBool::new(true);
        let result = stream_loop(|| test_record(1.0), &mut BrokenSink, &running);
        assert!(matches!(result, Err(SenderError::Transport(_))));
    }
}
