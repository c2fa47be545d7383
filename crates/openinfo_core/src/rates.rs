//! Cálculo de taxas instantâneas a partir de contadores cumulativos.
//!
//! Disco e rede expõem apenas totais de bytes desde o boot; a taxa é a
//! diferença entre duas leituras dividida pelo tempo decorrido. Dois casos
//! degenerados são absorvidos aqui, nunca propagados como erro:
//!
//! - `dt <= 0` (anomalia de relógio): substitui por um piso configurado —
//!   a taxa daquela iteração fica aproximada, mas nunca há divisão por
//!   zero nem `NaN`/`inf`;
//! - contador que regrediu (reset após sleep do dispositivo): delta
//!   tratado como 0, nunca negativo.

use std::time::{Duration, Instant};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Contadores cumulativos de disco (bytes desde o boot).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiskCounters {
    pub read_bytes: u64,
    pub written_bytes: u64,
}

/// Contadores cumulativos de rede (bytes desde o boot).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NetCounters {
    pub recv_bytes: u64,
    pub sent_bytes: u64,
}

/// Taxas calculadas para uma iteração (MB/s, sem arredondamento).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Throughput {
    pub disk_read_mb: f64,
    pub disk_write_mb: f64,
    pub net_dl_mb: f64,
    pub net_ul_mb: f64,
}

/// Estado "amostra anterior" do loop: contadores e instante da última
/// leitura. Pertence exclusivamente ao loop de amostragem; é lido e
/// escrito uma vez por iteração.
#[derive(Debug)]
pub struct RateTracker {
    last_disk: DiskCounters,
    last_net: NetCounters,
    last_instant: Instant,
    /// Piso de dt quando o relógio não avançou (tipicamente a janela W)
    dt_floor: Duration,
}

impl RateTracker {
    /// Semeia o estado com a leitura de baseline feita antes da primeira
    /// iteração real.
    pub fn new(disk: DiskCounters, net: NetCounters, now: Instant, dt_floor: Duration) -> Self {
        Self {
            last_disk: disk,
            last_net: net,
            last_instant: now,
            dt_floor,
        }
    }

    /// Consome a leitura atual, devolve as taxas da iteração e atualiza o
    /// baseline para a próxima.
    pub fn advance(&mut self, disk: DiskCounters, net: NetCounters, now: Instant) -> Throughput {
        let dt = effective_dt(now.saturating_duration_since(self.last_instant), self.dt_floor);

        let throughput = Throughput {
            disk_read_mb: rate_mb(self.last_disk.read_bytes, disk.read_bytes, dt),
            disk_write_mb: rate_mb(self.last_disk.written_bytes, disk.written_bytes, dt),
            net_dl_mb: rate_mb(self.last_net.recv_bytes, net.recv_bytes, dt),
            net_ul_mb: rate_mb(self.last_net.sent_bytes, net.sent_bytes, dt),
        };

        self.last_disk = disk;
        self.last_net = net;
        self.last_instant = now;

        throughput
    }
}

/// dt efetivo: o decorrido, ou o piso se o relógio não avançou.
fn effective_dt(elapsed: Duration, floor: Duration) -> f64 {
    let dt = elapsed.as_secs_f64();
    if dt <= 0.0 { floor.as_secs_f64() } else { dt }
}

/// Taxa em MB/s entre duas leituras de um contador cumulativo.
/// Regressão do contador vira delta 0 (saturating_sub).
fn rate_mb(prev: u64, curr: u64, dt_secs: f64) -> f64 {
    curr.saturating_sub(prev) as f64 / dt_secs / BYTES_PER_MB
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const FLOOR: Duration = Duration::from_millis(100);

    fn tracker_at(t0: Instant) -> RateTracker {
        RateTracker::new(
            DiskCounters {
                read_bytes: 1_000_000,
                written_bytes: 500_000,
            },
            NetCounters {
                recv_bytes: 2_000_000,
                sent_bytes: 100_000,
            },
            t0,
            FLOOR,
        )
    }

    #[test]
    fn exact_unit_conversion() {
        // 1 MiB em 1.0s → exatamente 1.0 MB/s
        assert_eq!(rate_mb(0, 1_048_576, 1.0), 1.0);
        // 512 KiB em 0.5s → também 1.0 MB/s
        assert_eq!(rate_mb(0, 524_288, 0.5), 1.0);
    }

    #[test]
    fn disk_read_rate_over_one_second() {
        let t0 = Instant::now();
        let mut tracker = tracker_at(t0);

        let rates = tracker.advance(
            DiskCounters {
                read_bytes: 2_048_576, // +1_048_576
                written_bytes: 500_000,
            },
            NetCounters {
                recv_bytes: 2_000_000,
                sent_bytes: 100_000,
            },
            t0 + Duration::from_secs(1),
        );

        assert!((rates.disk_read_mb - 1.0).abs() < 1e-9);
        assert_eq!(rates.disk_write_mb, 0.0);
        assert_eq!(rates.net_dl_mb, 0.0);
        assert_eq!(rates.net_ul_mb, 0.0);
    }

    #[test]
    fn counter_regression_clamps_to_zero() {
        let t0 = Instant::now();
        let mut tracker = tracker_at(t0);

        // Contadores de rede regrediram (reset do dispositivo)
        let rates = tracker.advance(
            DiskCounters {
                read_bytes: 1_000_000,
                written_bytes: 500_000,
            },
            NetCounters {
                recv_bytes: 10,
                sent_bytes: 0,
            },
            t0 + Duration::from_secs(1),
        );

        assert_eq!(rates.net_dl_mb, 0.0);
        assert_eq!(rates.net_ul_mb, 0.0);

        // Próxima iteração parte do novo baseline (pós-reset)
        let rates = tracker.advance(
            DiskCounters {
                read_bytes: 1_000_000,
                written_bytes: 500_000,
            },
            NetCounters {
                recv_bytes: 10 + 1_048_576,
                sent_bytes: 0,
            },
            t0 + Duration::from_secs(2),
        );
        assert!((rates.net_dl_mb - 1.0).abs() < 1e-9);
    }

    #[test]
    fn zero_dt_uses_floor_and_stays_finite() {
        let t0 = Instant::now();
        let mut tracker = tracker_at(t0);

        // Mesmo instante: dt = 0 → piso de 0.1s
        let rates = tracker.advance(
            DiskCounters {
                read_bytes: 1_000_000 + 104_858, // ~0.1 MiB
                written_bytes: 500_000,
            },
            NetCounters {
                recv_bytes: 2_000_000,
                sent_bytes: 100_000,
            },
            t0,
        );

        assert!(rates.disk_read_mb.is_finite());
        assert!((rates.disk_read_mb - 1.0).abs() < 0.01);
        assert!(rates.net_dl_mb.is_finite());
    }

    #[test]
    fn baseline_advances_every_iteration() {
        let t0 = Instant::now();
        let mut tracker = tracker_at(t0);

        let first = tracker.advance(
            DiskCounters {
                read_bytes: 2_048_576,
                written_bytes: 500_000,
            },
            NetCounters {
                recv_bytes: 2_000_000,
                sent_bytes: 100_000,
            },
            t0 + Duration::from_secs(1),
        );
        assert!(first.disk_read_mb > 0.9);

        // Sem novos bytes na segunda iteração → taxa volta a zero
        let second = tracker.advance(
            DiskCounters {
                read_bytes: 2_048_576,
                written_bytes: 500_000,
            },
            NetCounters {
                recv_bytes: 2_000_000,
                sent_bytes: 100_000,
            },
            t0 + Duration::from_secs(2),
        );
        assert_eq!(second.disk_read_mb, 0.0);
    }

    #[test]
    fn effective_dt_floor_only_on_non_positive() {
        assert_eq!(effective_dt(Duration::ZERO, FLOOR), 0.1);
        assert_eq!(effective_dt(Duration::from_millis(250), FLOOR), 0.25);
    }
}
