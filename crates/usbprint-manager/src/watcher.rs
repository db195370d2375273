//! Port watcher task
//!
//! Polls a port source on a fixed interval and forwards the reconciler's
//! registry requests to the manager. The watcher never touches the registry.
//!
//! # Example
//!
//! ```rust,ignore
//! let (request_tx, request_rx) = registry_channel(&config);
//! let (shutdown_tx, shutdown_rx) = oneshot::channel();
//!
//! tokio::spawn(run_port_watcher(source, config, request_tx, shutdown_rx));
//! ```

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use usbprint_detect::{PortSource, SerialPort};

use crate::config::ManagerConfig;
use crate::reconciler::{Reconciler, RegistryRequest};

/// Create the channel that carries registry requests to the manager
pub fn registry_channel(
    config: &ManagerConfig,
) -> (
    mpsc::Sender<RegistryRequest>,
    mpsc::Receiver<RegistryRequest>,
) {
    mpsc::channel(config.request_queue.max(1))
}

/// Run the polling loop until shutdown
///
/// Scan failures are logged and treated as "no ports" for that cycle. The
/// loop ends when `shutdown_rx` fires or its sender is dropped (checked
/// while waiting for queue space and between scans), or when the manager
/// drops the request receiver. A scan already in progress is not interrupted.
pub async fn run_port_watcher(
    source: Arc<dyn PortSource>,
    config: ManagerConfig,
    request_tx: mpsc::Sender<RegistryRequest>,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    let interval = config.scan_interval();
    let mut reconciler = Reconciler::new(config.device_mode);

    info!(
        "Port watcher starting (interval {:?}, mode {})",
        interval,
        config.device_mode.name()
    );

    loop {
        let ports = scan(Arc::clone(&source), config.usb_only).await;

        for request in reconciler.observe(&ports) {
            debug!("Registry request: {:?}", request);
            // A full queue must not hold off shutdown
            tokio::select! {
                _ = &mut shutdown_rx => {
                    info!("Port watcher shutting down with requests pending");
                    return;
                }
                sent = request_tx.send(request) => {
                    if sent.is_err() {
                        info!("Registry request channel closed");
                        return;
                    }
                }
            }
        }

        tokio::select! {
            _ = &mut shutdown_rx => {
                break;
            }
            _ = tokio::time::sleep(interval) => {}
        }
    }

    info!("Port watcher shutting down");
}

/// Run one blocking scan off the async workers
async fn scan(source: Arc<dyn PortSource>, usb_only: bool) -> BTreeSet<SerialPort> {
    match tokio::task::spawn_blocking(move || source.scan(usb_only)).await {
        Ok(Ok(ports)) => ports,
        Ok(Err(e)) => {
            warn!("Port scan failed: {}", e);
            BTreeSet::new()
        }
        Err(e) => {
            warn!("Port scan task failed: {}", e);
            BTreeSet::new()
        }
    }
}

/// Handle to a spawned port watcher
pub struct PortWatcher {
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl PortWatcher {
    /// Spawn the polling loop on a runtime
    pub fn spawn(
        handle: &Handle,
        source: Arc<dyn PortSource>,
        config: ManagerConfig,
        request_tx: mpsc::Sender<RegistryRequest>,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = handle.spawn(run_port_watcher(source, config, request_tx, shutdown_rx));

        Self {
            shutdown_tx: Some(shutdown_tx),
            task,
        }
    }

    /// Ask the loop to stop at its next wait
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }

    /// Check if the loop has exited
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop the loop and wait for it to exit
    pub async fn shutdown(mut self) {
        self.stop();
        if let Err(e) = (&mut self.task).await {
            warn!("Port watcher task failed: {}", e);
        }
    }
}
