//! Hot-plug watch loop
//!
//! Wires the port scanner, the watcher task and the printer manager together
//! and plays the part of the GUI thread: the main thread pumps the manager on
//! a fixed tick while the watcher polls on the tokio runtime.
//!
//! Printers created here are simulated, so `watch` never writes to a port.

use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};
use usbprint_detect::{PortScanner, PortSource, ScannerConfig};
use usbprint_firmware::FirmwareStorage;
use usbprint_manager::{
    registry_channel, DeviceKey, ManagerEvent, ManagerServices, OutputDeviceDirectory,
    PortWatcher, PrinterManager,
};
use usbprint_sim::{SimulatedPrinterConfig, SimulatedPrinterFactory};

use crate::settings::Settings;

/// Options for one watch session
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Firmware image to flash once a printer shows up
    pub flash: Option<String>,
    /// Also reset the EEPROM when flashing
    pub update_eeprom: bool,
    /// How often the main thread pumps the manager
    pub tick: Duration,
}

/// Output device directory that reports to the terminal
struct ConsoleDirectory;

impl OutputDeviceDirectory for ConsoleDirectory {
    fn add_output_device(&mut self, key: &DeviceKey, name: &str) {
        info!("Output device {} published", key);
        println!("+ {}", name);
    }

    fn remove_output_device(&mut self, key: &DeviceKey) {
        info!("Output device {} retracted", key);
        println!("- {}", key);
    }
}

/// Run until Ctrl+C
pub fn run(settings: &Settings, options: WatchOptions) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;

    let config = settings.manager.clone();
    let scanner: Arc<dyn PortSource> = Arc::new(PortScanner::with_config(ScannerConfig {
        device_root: settings.device_root.clone(),
        ..Default::default()
    }));

    let factory = SimulatedPrinterFactory::new(SimulatedPrinterConfig {
        auto_connect: true,
        ..Default::default()
    });
    let services = ManagerServices {
        factory: Box::new(factory),
        directory: Box::new(ConsoleDirectory),
        resolver: Box::new(FirmwareStorage::new(&settings.firmware_dir)),
        ports: Arc::clone(&scanner),
    };

    let (request_tx, request_rx) = registry_channel(&config);
    let (event_tx, event_rx) = mpsc::channel();
    let mut manager = PrinterManager::new(config.clone(), services, request_rx, event_tx);
    let watcher = PortWatcher::spawn(runtime.handle(), scanner, config.clone(), request_tx);

    let (stop_tx, stop_rx) = mpsc::channel();
    runtime.spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = stop_tx.send(());
        }
    });

    println!(
        "Watching for printers ({}, every {:?}). Press Ctrl+C to stop.",
        config.device_mode.name(),
        config.scan_interval()
    );

    let mut flash = options.flash;
    loop {
        manager.process_pending();
        for event in event_rx.try_iter() {
            if let Some(line) = describe(&event) {
                println!("{}", line);
            }
        }

        if !manager.registry().is_empty() {
            if let Some(file) = flash.take() {
                match manager.update_all_firmware(&file, options.update_eeprom) {
                    Ok(report) if report.all_started() => {
                        info!("Flashing {} to {} printer(s)", file, report.started.len())
                    }
                    Ok(report) => warn!(
                        "Flashing {} failed on {} of {} printer(s)",
                        file,
                        report.failed.len(),
                        report.started.len() + report.failed.len()
                    ),
                    Err(e) => warn!("Firmware update not started: {}", e),
                }
            }
        }

        if stop_rx.try_recv().is_ok() {
            break;
        }
        if watcher.is_finished() {
            warn!("Port watcher exited unexpectedly");
            break;
        }
        std::thread::sleep(options.tick);
    }

    info!("Stopping");
    runtime.block_on(watcher.shutdown());
    manager.remove_all();
    for event in event_rx.try_iter() {
        if let Some(line) = describe(&event) {
            println!("{}", line);
        }
    }

    Ok(())
}

/// Terminal line for a manager event, None for events the directory already reports
fn describe(event: &ManagerEvent) -> Option<String> {
    match event {
        ManagerEvent::DeviceAdded { .. } | ManagerEvent::DeviceRemoved { .. } => None,
        ManagerEvent::ConnectionStateChanged { key, state } => {
            Some(format!("  {}: {:?}", key, state))
        }
        ManagerEvent::ProgressChanged { key, progress } => {
            Some(format!("  {}: {:.0}%", key, progress))
        }
        ManagerEvent::FirmwareUpdateChanged { key, finished } => Some(if *finished {
            format!("  {}: firmware update finished", key)
        } else {
            format!("  {}: firmware update pending", key)
        }),
        ManagerEvent::FirmwareViewOpened { port: Some(port) } => {
            Some(format!("Updating firmware on {}", port))
        }
        ManagerEvent::FirmwareViewOpened { port: None } => {
            Some("Updating firmware on all printers".to_string())
        }
        ManagerEvent::FirmwareViewClosed => Some("Firmware update closed".to_string()),
        ManagerEvent::Notification { message } => Some(format!("! {}", message)),
    }
}
