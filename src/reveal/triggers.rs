use super::engine::CloseTrigger;

/// Turns per-frame focus and hover observations into close triggers on their
/// falling edges.
#[derive(Debug, Default)]
pub struct TriggerDetector {
    was_focused: bool,
    pointer_inside: bool,
}

impl TriggerDetector {
    /// `focused` is `None` when the platform has not reported focus yet.
    pub fn observe(&mut self, focused: Option<bool>, pointer_inside: bool) -> Option<CloseTrigger> {
        let mut trigger = None;

        if let Some(focused) = focused {
            if self.was_focused && !focused {
                trigger = Some(CloseTrigger::Deactivated);
            }
            self.was_focused = focused;
        }

        if self.pointer_inside && !pointer_inside && trigger.is_none() {
            trigger = Some(CloseTrigger::PointerLeft);
        }
        self.pointer_inside = pointer_inside;

        trigger
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_leave_fires_once_after_entering() {
        let mut d = TriggerDetector::default();
        assert_eq!(d.observe(None, false), None);
        assert_eq!(d.observe(None, true), None);
        assert_eq!(d.observe(None, false), Some(CloseTrigger::PointerLeft));
        assert_eq!(d.observe(None, false), None);
    }

    #[test]
    fn focus_loss_fires_only_after_focus() {
        let mut d = TriggerDetector::default();
        assert_eq!(d.observe(Some(false), false), None);
        assert_eq!(d.observe(Some(true), false), None);
        assert_eq!(d.observe(None, false), None);
        assert_eq!(d.observe(Some(false), false), Some(CloseTrigger::Deactivated));
    }

    #[test]
    fn simultaneous_edges_report_deactivation() {
        let mut d = TriggerDetector::default();
        d.observe(Some(true), true);
        assert_eq!(d.observe(Some(false), false), Some(CloseTrigger::Deactivated));
    }
}
