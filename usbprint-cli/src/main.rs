//! USB Printer Command Line Tool
//!
//! Lists serial ports, picks firmware images for machine profiles, and runs
//! the hot-plug device manager against the ports attached to this host.

mod settings;
mod watch;

use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use settings::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use usbprint_detect::{PortScanner, ScannerConfig};
use usbprint_firmware::{select_firmware, FirmwareStorage, HostPlatform, ResourceResolver};
use usbprint_manager::DeviceMode;
use watch::WatchOptions;

#[derive(Debug, Parser)]
#[command(name = "usbprint", version, about = "USB printer device manager")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List serial ports
    Ports {
        /// Include non-USB ports
        #[arg(long)]
        all: bool,
    },
    /// Show the firmware image for a machine
    Firmware {
        /// Machine definition id (e.g. ultimaker_original)
        machine_id: String,
        #[arg(long)]
        heated_bed: bool,
        #[arg(long)]
        lcd: bool,
        /// Select for another host platform
        #[arg(long, value_enum)]
        platform: Option<PlatformArg>,
        /// Look the image up in the firmware directory
        #[arg(long)]
        resolve: bool,
    },
    /// Watch for printers being plugged in and out
    Watch {
        /// Flash this image (path or file:// URI) once a printer is found
        #[arg(long, value_name = "FILE")]
        flash: Option<String>,
        /// Also reset the EEPROM when flashing
        #[arg(long, requires = "flash")]
        eeprom: bool,
        /// One printer per port instead of a single autodetecting printer
        #[arg(long)]
        per_port: bool,
        /// Override the scan interval
        #[arg(long, value_name = "MS")]
        interval_ms: Option<u64>,
    },
    /// Print the settings, optionally writing them to disk
    Config {
        #[arg(long)]
        save: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PlatformArg {
    Linux,
    Other,
}

impl From<PlatformArg> for HostPlatform {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::Linux => HostPlatform::Linux,
            PlatformArg::Other => HostPlatform::Other,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "usbprint=info,usbprint_detect=info,usbprint_firmware=info,usbprint_manager=info,usbprint_sim=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let mut settings = Settings::load();

    match cli.command {
        Command::Ports { all } => list_ports(&settings, all),
        Command::Firmware {
            machine_id,
            heated_bed,
            lcd,
            platform,
            resolve,
        } => {
            let platform = platform.map(Into::into).unwrap_or_else(HostPlatform::current);
            let Some(name) = select_firmware(&machine_id, heated_bed, lcd, platform) else {
                bail!("No firmware known for machine '{}'", machine_id);
            };

            if resolve {
                let storage = FirmwareStorage::new(&settings.firmware_dir);
                let path = storage.resolve(&name)?;
                println!("{}", path.display());
            } else {
                println!("{}", name);
            }
            Ok(())
        }
        Command::Watch {
            flash,
            eeprom,
            per_port,
            interval_ms,
        } => {
            if per_port {
                settings.manager.device_mode = DeviceMode::PerPort;
            }
            if let Some(ms) = interval_ms {
                settings.manager.scan_interval_ms = ms;
            }

            tracing::info!("Starting usbprint watch");
            watch::run(
                &settings,
                WatchOptions {
                    flash,
                    update_eeprom: eeprom,
                    tick: Duration::from_millis(100),
                },
            )
        }
        Command::Config { save } => {
            let json = serde_json::to_string_pretty(&settings)
                .context("Failed to serialize settings")?;
            println!("{}", json);

            if save {
                let path = settings.save().map_err(anyhow::Error::msg)?;
                println!("Saved to {}", path.display());
            }
            Ok(())
        }
    }
}

fn list_ports(settings: &Settings, all: bool) -> anyhow::Result<()> {
    let scanner = PortScanner::with_config(ScannerConfig {
        device_root: settings.device_root.clone(),
        ..Default::default()
    });
    let ports = scanner.scan(!all).context("Failed to scan serial ports")?;

    if ports.is_empty() {
        println!("No serial ports found");
    }
    for port in ports {
        println!("{}", port);
    }
    Ok(())
}
