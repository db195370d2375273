//! Scripted port source
//!
//! Replays queued scan results in order. Once the script runs out the last
//! successful result is repeated, which models a host whose ports stop
//! changing.

use std::collections::{BTreeSet, VecDeque};
use std::sync::{Arc, Mutex};

use usbprint_detect::{DetectError, PortSource, SerialPort};

#[derive(Debug, Default)]
struct Script {
    pending: VecDeque<Result<BTreeSet<SerialPort>, String>>,
    last: BTreeSet<SerialPort>,
    scans: usize,
}

/// Port source driven by a script of scan results
#[derive(Debug, Clone, Default)]
pub struct ScriptedPorts {
    script: Arc<Mutex<Script>>,
}

impl ScriptedPorts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful scan returning `ports`
    pub fn push<I, P>(&self, ports: I) -> &Self
    where
        I: IntoIterator<Item = P>,
        P: Into<SerialPort>,
    {
        let ports = ports.into_iter().map(Into::into).collect();
        self.lock().pending.push_back(Ok(ports));
        self
    }

    /// Queue a failed scan
    pub fn push_failure(&self, reason: &str) -> &Self {
        self.lock().pending.push_back(Err(reason.to_string()));
        self
    }

    /// Number of scans performed so far
    pub fn scans(&self) -> usize {
        self.lock().scans
    }

    /// Number of queued results not yet replayed
    pub fn remaining(&self) -> usize {
        self.lock().pending.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl PortSource for ScriptedPorts {
    // usb_only is ignored; the script already is the filtered answer
    fn scan(&self, _usb_only: bool) -> Result<BTreeSet<SerialPort>, DetectError> {
        let mut script = self.lock();
        script.scans += 1;

        match script.pending.pop_front() {
            Some(Ok(ports)) => {
                script.last = ports.clone();
                Ok(ports)
            }
            Some(Err(reason)) => Err(DetectError::EnumerationFailed(reason)),
            None => Ok(script.last.clone()),
        }
    }
}
