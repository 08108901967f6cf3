//! Cooperative query cancellation
//!
//! The main loop publishes a canceller in [`ActiveQueryHandle`] for exactly
//! as long as a backend call is in flight. A dedicated listener thread
//! ([`CancellationController`]) waits for interrupt notifications and, under
//! the same lock, cancels whatever is published. The OS signal handler only
//! forwards a notification; it never touches shared state.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::{debug, info, warn};
use parking_lot::Mutex;

use crate::error::{Result, ShellError};
use crate::executor::{BackendError, QueryCanceller};

/// What a cancel request did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelOutcome {
    /// No query was executing
    Idle,
    /// The in-flight query was asked to stop
    Cancelled,
    /// The backend refused or failed to cancel
    Failed(BackendError),
}

/// The single piece of state shared between the main loop and the
/// cancellation listener.
#[derive(Clone, Default)]
pub struct ActiveQueryHandle {
    slot: Arc<Mutex<Option<Arc<dyn QueryCanceller>>>>,
}

impl ActiveQueryHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `canceller` until the returned guard is dropped
    pub fn activate(&self, canceller: Arc<dyn QueryCanceller>) -> ActiveQueryGuard {
        *self.slot.lock() = Some(canceller);
        ActiveQueryGuard {
            handle: self.clone(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Cancel the in-flight query, if any. The lock is held for the whole
    /// inspect-and-cancel sequence so the main loop cannot clear the handle
    /// half way through.
    pub fn cancel_in_flight(&self) -> CancelOutcome {
        let slot = self.slot.lock();
        match slot.as_ref() {
            None => CancelOutcome::Idle,
            Some(canceller) => match canceller.cancel() {
                Ok(()) => CancelOutcome::Cancelled,
                Err(e) => CancelOutcome::Failed(e),
            },
        }
    }

    fn clear(&self) {
        self.slot.lock().take();
    }
}

/// Clears the [`ActiveQueryHandle`] on every exit path of a backend call.
pub struct ActiveQueryGuard {
    handle: ActiveQueryHandle,
}

impl Drop for ActiveQueryGuard {
    fn drop(&mut self) {
        self.handle.clear();
    }
}

/// Cloneable sender of interrupt notifications.
#[derive(Clone)]
pub struct InterruptNotifier {
    sender: Sender<()>,
}

impl InterruptNotifier {
    pub fn notify(&self) {
        // The listener only goes away at shutdown; nothing to do then.
        let _ = self.sender.send(());
    }
}

/// Listener thread converting interrupts into cancel requests.
pub struct CancellationController {
    sender: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
    handler_installed: bool,
}

impl CancellationController {
    /// Start the listener for the life of the session
    pub fn spawn(active: ActiveQueryHandle) -> Result<Self> {
        let (sender, receiver) = mpsc::channel();
        let thread = thread::Builder::new()
            .name("sqlsh-cancel".to_string())
            .spawn(move || Self::listen(active, receiver))
            .map_err(|e| ShellError::Configuration(format!("Failed to start cancel listener: {}", e)))?;

        Ok(Self {
            sender: Some(sender),
            thread: Some(thread),
            handler_installed: false,
        })
    }

    fn listen(active: ActiveQueryHandle, receiver: Receiver<()>) {
        for () in receiver.iter() {
            match active.cancel_in_flight() {
                CancelOutcome::Idle => debug!("[SQLSH_CANCEL] Interrupt with no active query"),
                CancelOutcome::Cancelled => info!("[SQLSH_CANCEL] Cancel requested for active query"),
                CancelOutcome::Failed(e) => {
                    warn!("[SQLSH_CANCEL] Cancel failed: {}", e);
                    eprintln!("Cancel failed: {}", e);
                }
            }
        }
        debug!("[SQLSH_CANCEL] Listener stopped");
    }

    /// Sender for interrupt notifications
    pub fn notifier(&self) -> Option<InterruptNotifier> {
        self.sender.as_ref().map(|sender| InterruptNotifier {
            sender: sender.clone(),
        })
    }

    /// Route Ctrl-C (SIGINT) to the listener. The handler runs on its own
    /// thread and only sends a notification.
    pub fn install_interrupt_handler(&mut self) -> Result<()> {
        let notifier = self
            .notifier()
            .ok_or_else(|| ShellError::Configuration("Cancel listener is stopped".into()))?;
        ctrlc::set_handler(move || notifier.notify()).map_err(|e| {
            ShellError::Configuration(format!("Failed to install interrupt handler: {}", e))
        })?;
        self.handler_installed = true;
        Ok(())
    }

    /// Stop the listener and wait for it. When the OS handler is installed
    /// it keeps a sender alive, so the thread is left to exit with the
    /// process instead.
    pub fn shutdown(mut self) {
        self.sender.take();
        if !self.handler_installed {
            if let Some(thread) = self.thread.take() {
                let _ = thread.join();
            }
        }
    }
}

impl Drop for CancellationController {
    fn drop(&mut self) {
        self.sender.take();
    }
}
