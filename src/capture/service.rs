use super::cursor::{CursorControl, SystemCursor};
use super::hook::{
    CaptureEvent, CaptureHookBackend, CaptureSink, DefaultCaptureHookBackend, UiWaker,
};
use crate::error::CaptureError;
use std::sync::mpsc::{self, Receiver, TryRecvError};

/// Result of polling a capture session's event queue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CaptureRecv {
    Event(CaptureEvent),
    Empty,
    Disconnected,
}

/// UI-thread end of a running capture.
pub struct CaptureEvents {
    receiver: Receiver<CaptureEvent>,
}

impl CaptureEvents {
    pub fn poll(&self) -> CaptureRecv {
        match self.receiver.try_recv() {
            Ok(event) => CaptureRecv::Event(event),
            Err(TryRecvError::Empty) => CaptureRecv::Empty,
            Err(TryRecvError::Disconnected) => CaptureRecv::Disconnected,
        }
    }
}

/// Owns the global hooks and the hidden-cursor state of a capture. Every
/// `start` must be balanced by `stop`, which also runs on drop.
pub struct CaptureService {
    backend: Box<dyn CaptureHookBackend>,
    cursor: Box<dyn CursorControl>,
    cursor_hidden: bool,
}

impl Default for CaptureService {
    fn default() -> Self {
        Self::new(
            Box::new(DefaultCaptureHookBackend::default()),
            Box::new(SystemCursor::default()),
        )
    }
}

impl CaptureService {
    pub fn new(backend: Box<dyn CaptureHookBackend>, cursor: Box<dyn CursorControl>) -> Self {
        Self {
            backend,
            cursor,
            cursor_hidden: false,
        }
    }

    /// Install both hooks. Events are delivered in order through the returned
    /// queue and `waker` runs after each one.
    pub fn start(&mut self, waker: Option<UiWaker>) -> Result<CaptureEvents, CaptureError> {
        if self.backend.is_installed() {
            return Err(CaptureError::SessionActive);
        }
        let (sender, receiver) = mpsc::channel();
        self.backend.install(CaptureSink::new(sender, waker))?;
        tracing::info!("position capture started");
        Ok(CaptureEvents { receiver })
    }

    /// Hide the system cursor. A failed hide may have swapped some cursors
    /// already, so `stop` restores after any attempt.
    pub fn hide_cursor(&mut self) {
        if self.cursor_hidden {
            return;
        }
        self.cursor_hidden = true;
        if let Err(err) = self.cursor.hide() {
            tracing::warn!(error = %err, "failed to hide cursor");
        }
    }

    /// Remove the hooks and restore the cursor. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if self.backend.is_installed() {
            self.backend.uninstall();
            tracing::info!("position capture stopped");
        }
        if self.cursor_hidden {
            self.cursor_hidden = false;
            if let Err(err) = self.cursor.show() {
                tracing::warn!(error = %err, "failed to restore cursor");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.backend.is_installed()
    }

    pub fn cursor_hidden(&self) -> bool {
        self.cursor_hidden
    }
}

impl Drop for CaptureService {
    fn drop(&mut self) {
        self.stop();
    }
}
