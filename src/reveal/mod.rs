//! Directional reveal of the bubble window: placement, the open/close
//! animations and the close-trigger guard.

pub mod animation;
pub mod engine;
pub mod layout;
pub mod state;
pub mod triggers;

pub use animation::{BubbleFrame, REVEAL_DURATION};
pub use engine::{BubbleViewport, CloseTrigger, IdleQueue, IdleTask, RevealEngine};
pub use layout::BubbleLayout;
pub use state::RevealState;
pub use triggers::TriggerDetector;
