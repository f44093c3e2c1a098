use std::collections::HashMap;

use crate::consent::state::ConsentState;

/// Payload delivered to observers on every definite state change.
///
/// Observers always see post-update state: `services` is a snapshot of the
/// full consent map taken after the change was applied.
#[derive(Debug, Clone)]
pub struct ConsentChange {
    /// Full consent map after the change.
    pub services: HashMap<String, ConsentState>,
    /// The service key that was set; `"all"` for a fan-out change.
    pub service: String,
    /// The new state of that service.
    pub state: ConsentState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_is_independent() {
        let mut services = HashMap::new();
        services.insert("a".to_string(), ConsentState::Agreed);

        let change = ConsentChange {
            services,
            service: "a".to_string(),
            state: ConsentState::Agreed,
        };

        let mut copy = change.clone();
        copy.services.insert("b".to_string(), ConsentState::Declined);

        assert_eq!(change.services.len(), 1);
        assert_eq!(copy.services.len(), 2);
    }
}
