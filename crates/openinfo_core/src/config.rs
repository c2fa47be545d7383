//! Configuração unificada via TOML.
//!
//! Um único `config.toml` ao lado do executável; campos ausentes caem nos
//! defaults do script original.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Configuração do Sender (lado host).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SenderConfig {
    /// Porta serial do display (ex: "/dev/tty.usbmodem1101", "COM5")
    pub port: String,
    /// Baud rate da conexão
    pub baud: u32,
    /// Janela de amostragem de CPU em segundos; também é o período do loop
    pub sample_window_secs: f64,
    /// Timeout de leitura da porta (irrelevante: direção é só escrita)
    pub read_timeout_secs: f64,
    /// Temperatura emitida quando nenhum sensor é legível (°C)
    pub cpu_temp_placeholder: f64,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            port: "/dev/tty.usbmodem1101".into(),
            baud: 115_200,
            sample_window_secs: 0.1,
            read_timeout_secs: 1.0,
            cpu_temp_placeholder: 45.0,
        }
    }
}

/// Configuração raiz do aplicativo.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub sender: SenderConfig,
}

impl AppConfig {
    /// Carrega configuração de um arquivo TOML.
    pub fn load(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match toml::from_str::<AppConfig>(&content) {
                    Ok(config) => {
                        info!("Configuração carregada de {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        warn!("Erro ao parsear {}: {}", path.display(), e);
                    }
                },
                Err(e) => {
                    warn!("Erro ao ler {}: {}", path.display(), e);
                }
            }
        }

        info!("Usando configuração padrão");
        AppConfig::default()
    }

    /// Salva configuração em arquivo TOML.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content = toml::to_string_pretty(self).map_err(|e| e.to_string())?;
        std::fs::write(path, content).map_err(|e| e.to_string())?;
        info!("Configuração salva em {}", path.display());
        Ok(())
    }

    /// Retorna o caminho padrão do config.toml.
    pub fn default_path() -> PathBuf {
        let exe_dir = std::env::current_exe()
            .map(|p| p.parent().unwrap_or(Path::new(".")).to_path_buf())
            .unwrap_or_else(|_| PathBuf::from("."));
        exe_dir.join("config.toml")
    }

    /// Valida a configuração e retorna lista de erros.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.sender.port.trim().is_empty() {
            errors.push("Porta serial não pode ser vazia".into());
        }
        if self.sender.baud == 0 {
            errors.push("Baud rate não pode ser 0".into());
        }
        if self.sender.sample_window_secs < 0.02 || self.sender.sample_window_secs > 5.0 {
            errors.push(format!(
                "Janela de amostragem inválida: {} (0.02–5.0)",
                self.sender.sample_window_secs
            ));
        }
        if self.sender.read_timeout_secs <= 0.0 {
            errors.push("Timeout de leitura deve ser positivo".into());
        }

        errors
    }
}
