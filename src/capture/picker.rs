//! Picking a bubble anchor by pointing at the screen.

use super::hook::{CaptureEvent, UiWaker};
use super::overlay::{default_overlay, AnchorOverlay};
use super::service::{CaptureEvents, CaptureRecv, CaptureService};
use crate::error::CaptureError;
use crate::geometry::Anchor;
use std::sync::{Arc, Mutex};

/// Anchor value shared between the picker and whatever displays it.
#[derive(Debug, Clone, Default)]
pub struct LiveAnchor {
    inner: Arc<Mutex<Anchor>>,
}

impl LiveAnchor {
    pub fn new(anchor: Anchor) -> Self {
        Self {
            inner: Arc::new(Mutex::new(anchor)),
        }
    }

    pub fn get(&self) -> Anchor {
        match self.inner.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    pub fn set(&self, anchor: Anchor) {
        match self.inner.lock() {
            Ok(mut guard) => *guard = anchor,
            Err(poisoned) => *poisoned.into_inner() = anchor,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PickOutcome {
    Confirmed(Anchor),
    /// The anchor was rolled back to this value.
    Cancelled(Anchor),
    /// The hook side went away; treated like a cancel.
    Aborted(Anchor),
}

/// One running pick. Dropping it without `commit` puts the anchor back to the
/// value it had when the pick began.
struct CaptureSession {
    target: LiveAnchor,
    rollback: Anchor,
    events: CaptureEvents,
    committed: bool,
}

impl CaptureSession {
    fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        if !self.committed {
            self.target.set(self.rollback);
            tracing::debug!(x = self.rollback.x, y = self.rollback.y, "anchor rolled back");
        }
    }
}

pub struct PositionPicker {
    service: CaptureService,
    overlay: Box<dyn AnchorOverlay>,
    session: Option<CaptureSession>,
}

impl Default for PositionPicker {
    fn default() -> Self {
        Self::new(CaptureService::default(), default_overlay())
    }
}

impl PositionPicker {
    pub fn new(service: CaptureService, overlay: Box<dyn AnchorOverlay>) -> Self {
        Self {
            service,
            overlay,
            session: None,
        }
    }

    /// Start picking into `target`. The crosshair appears at the current
    /// value and follows the pointer until a click confirms or Escape
    /// cancels.
    pub fn begin_pick(
        &mut self,
        target: &LiveAnchor,
        waker: Option<UiWaker>,
    ) -> Result<(), CaptureError> {
        if self.session.is_some() {
            return Err(CaptureError::SessionActive);
        }
        let rollback = target.get();
        if let Err(err) = self.overlay.show(rollback) {
            self.overlay.hide();
            return Err(err);
        }
        self.service.hide_cursor();
        match self.service.start(waker) {
            Ok(events) => {
                self.session = Some(CaptureSession {
                    target: target.clone(),
                    rollback,
                    events,
                    committed: false,
                });
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "could not start position capture");
                self.end_capture();
                Err(err)
            }
        }
    }

    /// Apply queued capture events. Call from the UI thread each frame.
    pub fn pump(&mut self) -> Option<PickOutcome> {
        loop {
            let recv = self.session.as_ref()?.events.poll();
            match recv {
                CaptureRecv::Event(CaptureEvent::PointerMoved(point)) => {
                    if let Some(session) = &self.session {
                        session.target.set(point);
                    }
                    self.overlay.set_position(point);
                }
                CaptureRecv::Event(CaptureEvent::PointerConfirmed(point)) => {
                    self.end_capture();
                    if let Some(session) = self.session.take() {
                        session.target.set(point);
                        session.commit();
                    }
                    tracing::info!(x = point.x, y = point.y, "anchor confirmed");
                    return Some(PickOutcome::Confirmed(point));
                }
                CaptureRecv::Event(CaptureEvent::Cancelled) => {
                    return self.cancel_pick();
                }
                CaptureRecv::Empty => return None,
                CaptureRecv::Disconnected => {
                    tracing::warn!("capture event source disconnected");
                    return self.cancel_pick().map(|outcome| match outcome {
                        PickOutcome::Cancelled(anchor) => PickOutcome::Aborted(anchor),
                        other => other,
                    });
                }
            }
        }
    }

    /// Stop picking and roll the anchor back. `None` when no pick is running.
    pub fn cancel_pick(&mut self) -> Option<PickOutcome> {
        let session = self.session.take()?;
        self.end_capture();
        let rollback = session.rollback;
        drop(session);
        tracing::info!("anchor pick cancelled");
        Some(PickOutcome::Cancelled(rollback))
    }

    /// Release everything the picker holds. Safe to call at any time.
    pub fn unload(&mut self) {
        if self.session.is_some() {
            self.cancel_pick();
        } else {
            self.end_capture();
        }
    }

    pub fn is_picking(&self) -> bool {
        self.session.is_some()
    }

    fn end_capture(&mut self) {
        self.service.stop();
        if self.overlay.is_visible() {
            self.overlay.hide();
        }
    }
}

impl Drop for PositionPicker {
    fn drop(&mut self) {
        self.unload();
    }
}
