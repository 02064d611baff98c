use air_folder::reveal::{BubbleFrame, BubbleViewport};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub enum ViewportCall {
    Frame(BubbleFrame),
    Intercept(bool),
    Destroy,
}

/// Records every call the reveal engine makes on its viewport.
#[derive(Clone, Default)]
pub struct RecordingViewport {
    pub calls: Arc<Mutex<Vec<ViewportCall>>>,
}

#[allow(dead_code)]
impl RecordingViewport {
    pub fn calls(&self) -> Vec<ViewportCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn destroy_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, ViewportCall::Destroy))
            .count()
    }

    pub fn last_frame(&self) -> Option<BubbleFrame> {
        self.calls().iter().rev().find_map(|c| match c {
            ViewportCall::Frame(f) => Some(*f),
            _ => None,
        })
    }

    pub fn intercepting(&self) -> bool {
        self.calls()
            .iter()
            .rev()
            .find_map(|c| match c {
                ViewportCall::Intercept(v) => Some(*v),
                _ => None,
            })
            .unwrap_or(false)
    }
}

impl BubbleViewport for RecordingViewport {
    fn apply_frame(&mut self, frame: &BubbleFrame) {
        self.calls.lock().unwrap().push(ViewportCall::Frame(*frame));
    }

    fn set_close_interception(&mut self, intercept: bool) {
        self.calls.lock().unwrap().push(ViewportCall::Intercept(intercept));
    }

    fn destroy(&mut self) {
        self.calls.lock().unwrap().push(ViewportCall::Destroy);
    }
}
