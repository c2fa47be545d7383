//! # OpenInfo Core
//!
//! Crate compartilhada que define o registro de amostra enviado ao display,
//! o formato de linha JSON, o cálculo de taxas a partir de contadores
//! cumulativos e a configuração TOML do sistema OpenInfo.
//!
//! ## Módulos
//! - [`types`] – Structs do registro de amostra (sys, cpu, ram, disk, net)
//! - [`wire`] – Encode/decode de uma linha JSON terminada em `\n`
//! - [`rates`] – Deltas de contadores cumulativos convertidos em MB/s
//! - [`config`] – Configuração unificada via TOML

pub mod config;
pub mod rates;
pub mod types;
pub mod wire;

// Re-exports convenientes
pub use config::{AppConfig, SenderConfig};
pub use rates::{RateTracker, Throughput};
pub use types::SampleRecord;
pub use wire::{decode_line, encode_line};
