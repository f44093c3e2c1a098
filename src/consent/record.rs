//! The persisted consent record.
//!
//! This is the JSON payload written to the consent slot: a flat object
//! mapping service keys to booleans. Undecided services are never part of
//! it, so an empty record still means "the user went through the notice".

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::consent::state::ConsentState;

/// Serialized form of the consent map, holding only definite decisions.
///
/// Keys are ordered (`BTreeMap`) so the persisted JSON is byte-stable for a
/// given set of decisions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConsentRecord {
    entries: BTreeMap<String, bool>,
}

impl ConsentRecord {
    /// Builds a record from an in-memory consent map, dropping every
    /// `Undecided` entry.
    pub fn from_states<'a, I>(states: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a ConsentState)>,
    {
        let entries = states
            .into_iter()
            .filter_map(|(service, state)| state.as_bool().map(|b| (service.clone(), b)))
            .collect();
        Self { entries }
    }

    /// Merges every persisted entry into `states`, overwriting any prior
    /// in-memory value for that key.
    pub fn merge_into(&self, states: &mut HashMap<String, ConsentState>) {
        for (service, agreed) in &self.entries {
            states.insert(service.clone(), ConsentState::from(*agreed));
        }
    }

    pub fn get(&self, service: &str) -> Option<bool> {
        self.entries.get(service).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undecided_entries_are_not_persisted() {
        let mut states = HashMap::new();
        states.insert("a".to_string(), ConsentState::Agreed);
        states.insert("b".to_string(), ConsentState::Undecided);
        states.insert("c".to_string(), ConsentState::Declined);

        let record = ConsentRecord::from_states(&states);
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("a"), Some(true));
        assert_eq!(record.get("b"), None);
        assert_eq!(record.get("c"), Some(false));
    }

    #[test]
    fn json_round_trip() {
        let mut states = HashMap::new();
        states.insert("analytics".to_string(), ConsentState::Agreed);
        states.insert("maps".to_string(), ConsentState::Declined);

        let record = ConsentRecord::from_states(&states);
        let json = record.to_json().unwrap();
        assert_eq!(json, r#"{"analytics":true,"maps":false}"#);

        let parsed = ConsentRecord::from_json(&json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn merge_overwrites_prior_values() {
        let record = ConsentRecord::from_json(r#"{"a":false}"#).unwrap();

        let mut states = HashMap::new();
        states.insert("a".to_string(), ConsentState::Agreed);
        states.insert("b".to_string(), ConsentState::Undecided);

        record.merge_into(&mut states);
        assert_eq!(states["a"], ConsentState::Declined);
        assert_eq!(states["b"], ConsentState::Undecided);
    }

    #[test]
    fn rejects_non_boolean_values() {
        assert!(ConsentRecord::from_json(r#"{"a":"yes"}"#).is_err());
        assert!(ConsentRecord::from_json("not json").is_err());
    }
}
