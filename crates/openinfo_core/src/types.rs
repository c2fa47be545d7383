//! Definição do registro de amostra enviado ao display.
//!
//! A estrutura de chaves JSON é contrato com o firmware do T-Display S3
//! (`parseAndDisplay` lê exatamente este aninhamento); nomes de campo não
//! são renegociáveis.

use serde::{Deserialize, Serialize};

// ──────────────────────────────────────────────
// Sys (relógio de parede)
// ──────────────────────────────────────────────

/// Data e hora locais no formato esperado pelo firmware.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SysSection {
    /// "YYYY/MM/DD (Dow)", ex: "2026/08/30 (Sat)"
    pub date: String,
    /// "HH:MM:SS"
    pub time: String,
}

// ──────────────────────────────────────────────
// CPU
// ──────────────────────────────────────────────

/// Carga e temperatura de CPU.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CpuSection {
    /// Uso médio na janela de amostragem (0–100%)
    pub load: f64,
    /// Temperatura (°C); constante de fallback sem sensor acessível
    pub temp: f64,
}

// ──────────────────────────────────────────────
// RAM
// ──────────────────────────────────────────────

/// Uso de memória RAM.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RamSection {
    /// Percentual de uso (0–100%)
    pub load: f64,
    /// Memória usada (GB)
    pub used: f64,
    /// Memória total (GB)
    pub total: f64,
}

// ──────────────────────────────────────────────
// Disco
// ──────────────────────────────────────────────

/// Throughput de disco na última iteração.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DiskSection {
    /// Leitura (MB/s)
    pub read: f64,
    /// Escrita (MB/s)
    pub write: f64,
}

// ──────────────────────────────────────────────
// Rede
// ──────────────────────────────────────────────

/// Throughput de rede na última iteração.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NetSection {
    /// Download (MB/s)
    pub dl: f64,
    /// Upload (MB/s)
    pub ul: f64,
}

// ──────────────────────────────────────────────
// Registro completo
// ──────────────────────────────────────────────

/// Registro de amostra completo, montado a cada iteração e transmitido
/// imediatamente como uma linha JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SampleRecord {
    pub sys: SysSection,
    pub cpu: CpuSection,
    pub ram: RamSection,
    pub disk: DiskSection,
    pub net: NetSection,
}

/// Arredonda para 1 casa decimal, como o firmware espera em todos os
/// campos numéricos.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_record_is_zeroed() {
        let r = SampleRecord::default();
        assert_eq!(r.cpu.load, 0.0);
        assert_eq!(r.ram.total, 0.0);
        assert!(r.sys.date.is_empty());
    }

    #[test]
    fn round1_truncates_repeating_decimals() {
        assert_eq!(round1(33.333_333), 33.3);
        assert_eq!(round1(0.05), 0.1);
        assert_eq!(round1(99.99), 100.0);
        assert_eq!(round1(0.0), 0.0);
    }

    #[test]
    fn serializes_with_firmware_key_names() {
        let record = SampleRecord {
            sys: SysSection {
                date: "2026/08/30 (Sun)".into(),
                time: "12:34:56".into(),
            },
            cpu: CpuSection {
                load: 42.5,
                temp: 45.0,
            },
            ram: RamSection {
                load: 50.0,
                used: 8.0,
                total: 16.0,
            },
            disk: DiskSection {
                read: 1.0,
                write: 0.3,
            },
            net: NetSection { dl: 2.4, ul: 0.1 },
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["sys"]["date"], "2026/08/30 (Sun)");
        assert_eq!(json["cpu"]["load"], 42.5);
        assert_eq!(json["ram"]["used"], 8.0);
        assert_eq!(json["disk"]["write"], 0.3);
        assert_eq!(json["net"]["dl"], 2.4);
    }
}
