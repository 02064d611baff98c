#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    Opening,
    Settled,
    Closing,
    Closed,
}

pub fn can_transition(from: RevealState, to: RevealState) -> bool {
    matches!(
        (from, to),
        (RevealState::Opening, RevealState::Settled)
            | (RevealState::Settled, RevealState::Closing)
            | (RevealState::Closing, RevealState::Closed)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_forward_transitions_are_allowed() {
        assert!(can_transition(RevealState::Opening, RevealState::Settled));
        assert!(can_transition(RevealState::Settled, RevealState::Closing));
        assert!(can_transition(RevealState::Closing, RevealState::Closed));

        assert!(!can_transition(RevealState::Opening, RevealState::Closing));
        assert!(!can_transition(RevealState::Closing, RevealState::Closing));
        assert!(!can_transition(RevealState::Closed, RevealState::Opening));
        assert!(!can_transition(RevealState::Settled, RevealState::Opening));
    }
}
