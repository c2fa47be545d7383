//! # OpenInfo Sender
//!
//! Coleta métricas do host (CPU, RAM, disco, rede, relógio) e transmite
//! como linhas JSON via serial para o display externo (T-Display S3),
//! ~10 amostras por segundo.
//!
//! ## Uso
//! ```bash
//! openinfo_sender            # config.toml ao lado do binário
//! RUST_LOG=debug openinfo_sender
//! ```

mod monitor;
mod stream;
mod transport;

use monitor::SystemMonitor;
use openinfo_core::config::AppConfig;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use stream::stream_loop;
use transport::SerialSink;
use tracing::{error, info, warn};

fn main() -> ExitCode {
    // ── Logging ──
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // ── Carregar config ──
    let config_path = AppConfig::default_path();
    let config = AppConfig::load(&config_path);

    // Salva config padrão se não existir
    if !config_path.exists() {
        if let Err(e) = config.save(&config_path) {
            warn!("Não foi possível salvar config padrão: {e}");
        }
    }

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            error!("Config inválida: {e}");
        }
        return ExitCode::FAILURE;
    }

    let sender_cfg = &config.sender;

    // ── Ctrl+C → shutdown limpo ──
    let running = Arc::new(AtomicBool::new(true));
    {
        let running = Arc::clone(&running);
        ctrlc::set_handler(move || running.store(false, Ordering::SeqCst))
            .expect("Falha ao instalar handler de Ctrl+C");
    }

    // ── Porta serial (única tentativa, falha é fatal) ──
    let read_timeout = Duration::from_secs_f64(sender_cfg.read_timeout_secs);
    let mut sink = match SerialSink::open(&sender_cfg.port, sender_cfg.baud, read_timeout) {
        Ok(sink) => sink,
        Err(e) => {
            error!("{e}");
            error!("Verifique:");
            error!("  1. O display está conectado?");
            error!("  2. O nome da porta está correto? (ls /dev/tty.*)");
            error!("  3. Outro programa está usando a porta?");
            return ExitCode::FAILURE;
        }
    };

    // ── Monitor de hardware ──
    let mut hw = SystemMonitor::new(sender_cfg);
    info!("Monitor de hardware inicializado");

    // ── Banner ──
    println!();
    println!("══════════════════════════════════════════════");
    println!("   ⚡ OPENINFO SENDER – ATIVO (Rust)");
    println!("══════════════════════════════════════════════");
    println!("  Porta:     {} @ {} baud", sender_cfg.port, sender_cfg.baud);
    println!(
        "  Janela:    {:.2}s (~{:.0} amostras/s)",
        sender_cfg.sample_window_secs,
        1.0 / sender_cfg.sample_window_secs
    );
    println!("  Formato:   1 objeto JSON por linha (UTF-8, '\\n')");
    println!("══════════════════════════════════════════════");
    println!("  Ctrl+C para encerrar");
    println!();

    // ── Loop principal ──
    match stream_loop(|| hw.sample(), &mut sink, &running) {
        Ok(()) => {
            // Fecha a porta antes da confirmação ao operador
            drop(sink);
            println!("Transmissão encerrada.");
            info!("Encerrado pelo operador");
            ExitCode::SUCCESS
        }
        Err(e) => {
            drop(sink);
            error!("Loop de transmissão abortado: {e}");
            ExitCode::FAILURE
        }
    }
}
