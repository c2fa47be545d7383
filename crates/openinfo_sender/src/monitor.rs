//! Coleta de métricas do host via sysinfo.
//!
//! O [`SystemMonitor`] é o dono de todo o estado entre iterações: handles
//! do sysinfo, fonte de temperatura escolhida na inicialização e o
//! [`RateTracker`] com os contadores da amostra anterior.

use chrono::{DateTime, Local};
use openinfo_core::config::SenderConfig;
use openinfo_core::rates::{DiskCounters, NetCounters, RateTracker, Throughput};
use openinfo_core::types::{
    CpuSection, DiskSection, NetSection, RamSection, SampleRecord, SysSection, round1,
};
use std::time::{Duration, Instant};
use sysinfo::{
    Components, CpuRefreshKind, Disks, MemoryRefreshKind, Networks, RefreshKind, System,
};
use tracing::{info, warn};

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

// ──────────────────────────────────────────────
// Fonte de temperatura
// ──────────────────────────────────────────────

/// Fonte de temperatura de CPU, decidida uma única vez na inicialização.
///
/// Em plataformas/permissões sem sensor legível (macOS sem root, por
/// exemplo) o firmware recebe uma constante em vez de falhar.
pub enum TempSource {
    /// Sensores reais via `Components`; fallback se sumirem em runtime
    Sensors { components: Components, fallback: f64 },
    /// Constante do config
    Fixed(f64),
}

impl TempSource {
    /// Detecta a capacidade do host: se algum componente reporta uma
    /// temperatura plausível de CPU, usa sensores; senão, a constante.
    pub fn detect(placeholder: f64) -> Self {
        let components = Components::new_with_refreshed_list();
        match cpu_temp_from(&components) {
            Some(t) => {
                info!("✓ Sensor de temperatura de CPU detectado ({t:.0}°C)");
                TempSource::Sensors {
                    components,
                    fallback: placeholder,
                }
            }
            None => {
                warn!("✗ Nenhum sensor de CPU legível; emitindo {placeholder:.0}°C fixo");
                TempSource::Fixed(placeholder)
            }
        }
    }

    /// Leitura atual em °C.
    pub fn read(&mut self) -> f64 {
        match self {
            TempSource::Fixed(v) => *v,
            TempSource::Sensors {
                components,
                fallback,
            } => {
                components.refresh(true);
                cpu_temp_from(components).unwrap_or(*fallback)
            }
        }
    }
}

/// Maior temperatura plausível entre os componentes rotulados como CPU.
fn cpu_temp_from(components: &Components) -> Option<f64> {
    let mut max: Option<f64> = None;
    for comp in components.iter() {
        let label = comp.label().to_lowercase();
        if label.contains("cpu")
            || label.contains("tctl")
            || label.contains("tdie")
            || label.contains("package")
            || label.contains("core")
        {
            if let Some(t) = comp.temperature() {
                if t > 0.0 && t < 150.0 && max.is_none_or(|m| f64::from(t) > m) {
                    max = Some(f64::from(t));
                }
            }
        }
    }
    max
}

// ──────────────────────────────────────────────
// Monitor principal
// ──────────────────────────────────────────────

/// Monitor do host: uma chamada de [`SystemMonitor::sample`] por iteração.
pub struct SystemMonitor {
    sys: System,
    disks: Disks,
    networks: Networks,
    temp: TempSource,
    rates: RateTracker,
    window: Duration,
}

impl SystemMonitor {
    /// Cria o monitor e semeia o estado da primeira iteração: uma leitura
    /// descartada de CPU (a primeira sempre vem zerada) e o baseline de
    /// contadores de disco/rede.
    pub fn new(cfg: &SenderConfig) -> Self {
        let mut sys = System::new_with_specifics(
            RefreshKind::nothing()
                .with_cpu(CpuRefreshKind::everything())
                .with_memory(MemoryRefreshKind::everything()),
        );
        sys.refresh_cpu_all(); // leitura de aquecimento, descartada

        let disks = Disks::new_with_refreshed_list();
        let networks = Networks::new_with_refreshed_list();
        let window = Duration::from_secs_f64(cfg.sample_window_secs);
        let rates = RateTracker::new(
            disk_counters(&disks),
            net_counters(&networks),
            Instant::now(),
            window,
        );

        Self {
            sys,
            disks,
            networks,
            temp: TempSource::detect(cfg.cpu_temp_placeholder),
            rates,
            window,
        }
    }

    /// Amostra bloqueante: dorme a janela W e então lê tudo.
    ///
    /// O sleep é também o relógio do loop — cada chamada demora ~W e o
    /// uso de CPU retornado é a média nessa janela. Escolha deliberada de
    /// simplicidade em vez de precisão de período; o display redesenha
    /// por linha recebida e tolera o jitter resultante.
    pub fn sample(&mut self) -> SampleRecord {
        std::thread::sleep(self.window);

        self.sys.refresh_cpu_all();
        let cpu_load = f64::from(self.sys.global_cpu_usage());

        let now = Instant::now();
        self.disks.refresh(true);
        self.networks.refresh(true);
        let rates = self
            .rates
            .advance(disk_counters(&self.disks), net_counters(&self.networks), now);

        self.sys.refresh_memory();
        let ram = ram_section(self.sys.used_memory(), self.sys.total_memory());

        let temp = self.temp.read();

        build_record(Local::now(), cpu_load, temp, ram, rates)
    }
}

// ──────────────────────────────────────────────
// Leitura de contadores cumulativos
// ──────────────────────────────────────────────

fn disk_counters(disks: &Disks) -> DiskCounters {
    let mut counters = DiskCounters::default();
    for disk in disks.iter() {
        let usage = disk.usage();
        counters.read_bytes += usage.total_read_bytes;
        counters.written_bytes += usage.total_written_bytes;
    }
    counters
}

fn net_counters(networks: &Networks) -> NetCounters {
    let mut counters = NetCounters::default();
    for (_name, data) in networks.iter() {
        counters.recv_bytes += data.total_received();
        counters.sent_bytes += data.total_transmitted();
    }
    counters
}

// ──────────────────────────────────────────────
// Montagem do registro
// ──────────────────────────────────────────────

fn sys_section(now: DateTime<Local>) -> SysSection {
    SysSection {
        date: now.format("%Y/%m/%d (%a)").to_string(),
        time: now.format("%H:%M:%S").to_string(),
    }
}

fn ram_section(used_bytes: u64, total_bytes: u64) -> RamSection {
    let used = used_bytes as f64;
    let total = total_bytes as f64;
    let percent = if total > 0.0 { used / total * 100.0 } else { 0.0 };

    RamSection {
        load: round1(percent),
        used: round1(used / BYTES_PER_GB),
        total: round1(total / BYTES_PER_GB),
    }
}

fn build_record(
    now: DateTime<Local>,
    cpu_load: f64,
    cpu_temp: f64,
    ram: RamSection,
    rates: Throughput,
) -> SampleRecord {
    SampleRecord {
        sys: sys_section(now),
        cpu: CpuSection {
            load: round1(cpu_load),
            temp: round1(cpu_temp),
        },
        ram,
        disk: DiskSection {
            read: round1(rates.disk_read_mb),
            write: round1(rates.disk_write_mb),
        },
        net: NetSection {
            dl: round1(rates.net_dl_mb),
            ul: round1(rates.net_ul_mb),
        },
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
