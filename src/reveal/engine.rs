use super::animation::{closing_end, opening_end, opening_start, BubbleFrame, Tween, REVEAL_DURATION};
use super::state::{can_transition, RevealState};
use crate::error::RevealError;
use crate::folder::{FolderItem, ItemOpener};
use crate::geometry::{placement, Anchor, Direction, Placement, Size};
use std::collections::VecDeque;
use std::time::Instant;

/// Why a close was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseTrigger {
    Deactivated,
    PointerLeft,
    CloseRequested,
    ItemOpened,
}

/// Window operations the engine needs from whatever hosts the bubble.
pub trait BubbleViewport {
    fn apply_frame(&mut self, frame: &BubbleFrame);
    /// While intercepting, a user close request is cancelled and turned into
    /// [`CloseTrigger::CloseRequested`] instead of closing the window.
    fn set_close_interception(&mut self, intercept: bool);
    fn destroy(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleTask {
    ActivatePrimaryWindow,
}

/// Work deferred until the host has finished the current frame.
#[derive(Debug, Default)]
pub struct IdleQueue {
    tasks: VecDeque<IdleTask>,
}

impl IdleQueue {
    pub fn post(&mut self, task: IdleTask) {
        self.tasks.push_back(task);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = IdleTask> + '_ {
        self.tasks.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

pub struct RevealEngine {
    anchor: Anchor,
    direction: Direction,
    items: Vec<FolderItem>,
    state: RevealState,
    placement: Option<Placement>,
    frame: BubbleFrame,
    tween: Option<Tween>,
    close_pending: bool,
    closing_runs: usize,
}

impl RevealEngine {
    pub fn new(anchor: Anchor, direction: Direction, items: Vec<FolderItem>) -> Self {
        Self {
            anchor,
            direction,
            items,
            state: RevealState::Opening,
            placement: None,
            frame: BubbleFrame::default(),
            tween: None,
            close_pending: false,
            closing_runs: 0,
        }
    }

    /// Start the opening animation once the content has been measured.
    /// Calling it again after the first measurement has no effect.
    pub fn begin(&mut self, final_size: Size, now: Instant, viewport: &mut dyn BubbleViewport) {
        if self.placement.is_some() {
            return;
        }
        let placement = placement(self.anchor, self.direction, final_size);
        let start = opening_start(&placement);
        self.frame = start;
        viewport.set_close_interception(true);
        viewport.apply_frame(&start);
        self.tween = Some(Tween::new(start, opening_end(&placement), now, REVEAL_DURATION));
        self.placement = Some(placement);
        tracing::debug!(
            direction = %self.direction,
            width = final_size.width,
            height = final_size.height,
            "bubble opening"
        );
    }

    /// Request a close. Returns `true` if this call started the closing
    /// animation. Requests while opening are held until the bubble settles;
    /// requests once a close has started are ignored.
    pub fn request_close(
        &mut self,
        trigger: CloseTrigger,
        now: Instant,
        viewport: &mut dyn BubbleViewport,
    ) -> bool {
        match self.state {
            RevealState::Opening => {
                tracing::debug!(?trigger, "close requested while opening; deferred");
                self.close_pending = true;
                false
            }
            RevealState::Settled => {
                tracing::debug!(?trigger, "closing bubble");
                self.start_closing(now, viewport);
                true
            }
            RevealState::Closing | RevealState::Closed => {
                tracing::trace!(?trigger, "close already in progress");
                false
            }
        }
    }

    /// Advance the running animation to `now`.
    pub fn tick(
        &mut self,
        now: Instant,
        viewport: &mut dyn BubbleViewport,
        idle: &mut IdleQueue,
    ) -> RevealState {
        let Some(tween) = self.tween else {
            return self.state;
        };
        self.frame = tween.sample(now);
        viewport.apply_frame(&self.frame);
        if !tween.is_finished(now) {
            return self.state;
        }
        self.tween = None;
        match self.state {
            RevealState::Opening => {
                self.transition(RevealState::Settled);
                if std::mem::take(&mut self.close_pending) {
                    self.start_closing(now, viewport);
                }
            }
            RevealState::Closing => self.finish_closing(viewport, idle),
            RevealState::Settled | RevealState::Closed => {}
        }
        self.state
    }

    /// Open the item at `index` and close the bubble whether or not the open
    /// succeeded.
    pub fn open_item(
        &mut self,
        index: usize,
        opener: &dyn ItemOpener,
        now: Instant,
        viewport: &mut dyn BubbleViewport,
    ) -> Result<(), RevealError> {
        let result = match self.items.get(index) {
            Some(item) => opener.open(&item.path),
            None => Ok(()),
        };
        if let Err(err) = &result {
            tracing::warn!(error = %err, "failed to open bubble item");
        }
        self.request_close(CloseTrigger::ItemOpened, now, viewport);
        result
    }

    fn start_closing(&mut self, now: Instant, viewport: &mut dyn BubbleViewport) {
        let Some(placement) = self.placement else {
            return;
        };
        self.transition(RevealState::Closing);
        self.closing_runs += 1;
        let end = closing_end(&self.frame, &placement);
        self.tween = Some(Tween::new(self.frame, end, now, REVEAL_DURATION));
        viewport.apply_frame(&self.frame);
    }

    fn finish_closing(&mut self, viewport: &mut dyn BubbleViewport, idle: &mut IdleQueue) {
        self.transition(RevealState::Closed);
        viewport.set_close_interception(false);
        viewport.destroy();
        idle.post(IdleTask::ActivatePrimaryWindow);
        tracing::debug!("bubble closed");
    }

    fn transition(&mut self, to: RevealState) {
        if can_transition(self.state, to) {
            self.state = to;
        } else {
            tracing::warn!(from = ?self.state, ?to, "ignored invalid reveal transition");
        }
    }

    pub fn state(&self) -> RevealState {
        self.state
    }

    pub fn frame(&self) -> &BubbleFrame {
        &self.frame
    }

    pub fn placement(&self) -> Option<&Placement> {
        self.placement.as_ref()
    }

    pub fn items(&self) -> &[FolderItem] {
        &self.items
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// `true` while an animation still needs frames.
    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    pub fn closing_runs(&self) -> usize {
        self.closing_runs
    }
}
