use serde::{Deserialize, Serialize};

/// Tri-state consent value for a single service.
///
/// A service the user has never decided on reads as [`Undecided`], which is
/// distinct from an explicit refusal: the notice keeps prompting while any
/// service is undecided, and undecided entries are never persisted.
///
/// [`Undecided`]: ConsentState::Undecided
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsentState {
    /// The user explicitly agreed to this service.
    Agreed,
    /// The user explicitly declined this service.
    Declined,
    /// No decision has been made yet.
    #[default]
    Undecided,
}

impl ConsentState {
    /// Whether this is a definite decision (agreed or declined).
    ///
    /// Only definite decisions are persisted and notified; `Undecided` is the
    /// natural "unset" value and never leaves the in-memory map.
    pub fn is_decided(self) -> bool {
        !matches!(self, ConsentState::Undecided)
    }

    /// The persisted boolean form, or `None` for `Undecided`.
    pub fn as_bool(self) -> Option<bool> {
        match self {
            ConsentState::Agreed => Some(true),
            ConsentState::Declined => Some(false),
            ConsentState::Undecided => None,
        }
    }

    /// Derives the displayed value of the "all" toggle from individual
    /// service states.
    ///
    /// Priority order:
    /// 1. any `Undecided` → `Undecided` (the toggle renders indeterminate,
    ///    not unchecked);
    /// 2. else all `Agreed` → `Agreed`;
    /// 3. else → `Declined`.
    ///
    /// Pure function of its input; callers recompute it on every render
    /// instead of caching it.
    pub fn aggregate<I>(states: I) -> ConsentState
    where
        I: IntoIterator<Item = ConsentState>,
    {
        let mut all_agreed = true;
        for state in states {
            match state {
                ConsentState::Undecided => return ConsentState::Undecided,
                ConsentState::Declined => all_agreed = false,
                ConsentState::Agreed => {}
            }
        }

        if all_agreed {
            ConsentState::Agreed
        } else {
            ConsentState::Declined
        }
    }
}

impl From<bool> for ConsentState {
    fn from(agreed: bool) -> Self {
        if agreed {
            ConsentState::Agreed
        } else {
            ConsentState::Declined
        }
    }
}

impl From<Option<bool>> for ConsentState {
    fn from(value: Option<bool>) -> Self {
        value.map_or(ConsentState::Undecided, ConsentState::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ConsentState::{Agreed, Declined, Undecided};

    #[test]
    fn aggregate_all_agreed() {
        assert_eq!(ConsentState::aggregate([Agreed, Agreed, Agreed]), Agreed);
    }

    #[test]
    fn aggregate_mixed_decisions_is_declined() {
        assert_eq!(ConsentState::aggregate([Agreed, Declined]), Declined);
        assert_eq!(ConsentState::aggregate([Declined, Declined]), Declined);
    }

    #[test]
    fn aggregate_any_undecided_wins() {
        assert_eq!(ConsentState::aggregate([Agreed, Undecided]), Undecided);
        assert_eq!(ConsentState::aggregate([Undecided, Declined]), Undecided);
    }

    #[test]
    fn aggregate_is_idempotent() {
        let states = [Agreed, Declined, Agreed];
        let first = ConsentState::aggregate(states);
        let second = ConsentState::aggregate(states);
        assert_eq!(first, second);
    }

    #[test]
    fn bool_conversions_round_trip() {
        for state in [Agreed, Declined, Undecided] {
            assert_eq!(ConsentState::from(state.as_bool()), state);
        }
    }
}
