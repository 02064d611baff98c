//! Global input capture for picking a bubble anchor on screen.

pub mod cursor;
pub mod hook;
pub mod overlay;
pub mod picker;
pub mod service;

pub use cursor::{CursorControl, MockCursor, MockCursorHandle};
pub use hook::{CaptureEvent, CaptureHookBackend, MockCaptureHandle, MockCaptureHookBackend, UiWaker};
pub use overlay::{AnchorOverlay, MockAnchorOverlay, MockOverlayHandle, NoopAnchorOverlay};
pub use picker::{LiveAnchor, PickOutcome, PositionPicker};
pub use service::{CaptureEvents, CaptureRecv, CaptureService};
