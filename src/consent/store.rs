//! The consent store: single source of truth for per-service consent.
//!
//! A [`ConsentStore`] owns the mapping from service key to [`ConsentState`],
//! persists definite decisions to an injected [`ConsentSlot`], and notifies
//! registered observers after every definite change.
//!
//! ### Sharing model
//! One store is constructed per page/host and shared by every widget
//! instance through a [`StoreHandle`] (`Arc<ConsentStore>`). All methods take
//! `&self`; the map is guarded by an `RwLock`, so an update made through one
//! instance is immediately visible to every other holder of the handle.
//!
//! ### Ordering guarantee
//! For a definite `set_state`, persistence and observer notification each
//! happen exactly once, in that order, after the in-memory map has been
//! updated. Observers therefore always see post-update state. Setting a
//! service to `Undecided` only mutates the map — nothing is written and no
//! observer runs.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use log::warn;

use crate::consent::event::ConsentChange;
use crate::consent::record::ConsentRecord;
use crate::consent::state::ConsentState;
use crate::errors::ConsentError;
use crate::slot::SlotHandle;

/// Pseudo-service key addressing every configured service at once.
///
/// Never stored in the map itself: a `set_state(ALL_SERVICES, ..)` fans out
/// to each configured service key instead.
pub const ALL_SERVICES: &str = "all";

/// A handle to a shared consent store.
pub type StoreHandle = Arc<ConsentStore>;

/// A registered change observer.
pub type ObserverHandle = Arc<dyn Fn(&ConsentChange) + Send + Sync>;

/// Single source of truth for per-service consent, with aggregate semantics
/// for the pseudo-service `"all"` and durable persistence.
pub struct ConsentStore {
    /// Service keys known from configuration, excluding the `all` pseudo-key.
    services: Vec<String>,

    /// The in-memory consent map. Absent keys read as `Undecided`.
    states: RwLock<HashMap<String, ConsentState>>,

    /// Durable slot the record is persisted to.
    slot: SlotHandle,

    /// Observers invoked after every definite state change.
    observers: RwLock<Vec<ObserverHandle>>,
}

impl ConsentStore {
    /// Creates a store for the given configured service keys, persisting to
    /// `slot`.
    ///
    /// The `all` pseudo-key is filtered out if present; it addresses the
    /// other services and is never a service of its own.
    pub fn new(services: Vec<String>, slot: SlotHandle) -> Self {
        let services = services
            .into_iter()
            .filter(|s| s != ALL_SERVICES)
            .collect();

        Self {
            services,
            states: RwLock::new(HashMap::new()),
            slot,
            observers: RwLock::new(Vec::new()),
        }
    }

    /// Convenience constructor returning the store behind a [`StoreHandle`].
    pub fn shared(services: Vec<String>, slot: SlotHandle) -> StoreHandle {
        Arc::new(Self::new(services, slot))
    }

    /// The configured service keys.
    pub fn services(&self) -> &[String] {
        &self.services
    }

    /// Returns the state for `service`, or `Undecided` if absent.
    ///
    /// No side effects; never fails.
    pub fn state(&self, service: &str) -> ConsentState {
        self.states
            .read()
            .unwrap()
            .get(service)
            .copied()
            .unwrap_or_default()
    }

    /// A snapshot of the full consent map.
    pub fn states_snapshot(&self) -> HashMap<String, ConsentState> {
        self.states.read().unwrap().clone()
    }

    /// Sets the state for `service`, or for every configured service when
    /// `service` is [`ALL_SERVICES`].
    ///
    /// Unknown keys simply create new map entries; configuration is trusted
    /// input and is not re-validated here.
    ///
    /// When `state` is a definite decision the updated record is written to
    /// the slot and every observer is invoked, in that order. An `Undecided`
    /// write mutates the map only.
    pub fn set_state(&self, service: &str, state: ConsentState) -> Result<(), ConsentError> {
        {
            let mut states = self.states.write().unwrap();
            if service == ALL_SERVICES {
                for key in &self.services {
                    states.insert(key.clone(), state);
                }
            } else {
                states.insert(service.to_string(), state);
            }
        }

        if state.is_decided() {
            self.persist()?;
            self.notify(service, state);
        }

        Ok(())
    }

    /// Agrees to every service. Equivalent to `set_state("all", Agreed)`.
    pub fn agree(&self) -> Result<(), ConsentError> {
        self.set_state(ALL_SERVICES, ConsentState::Agreed)
    }

    /// Declines every service. Equivalent to `set_state("all", Declined)`.
    pub fn disagree(&self) -> Result<(), ConsentError> {
        self.set_state(ALL_SERVICES, ConsentState::Declined)
    }

    /// Loads the persisted record from the slot into the in-memory map.
    ///
    /// - `Ok(None)`: slot absent or empty — no consent yet, map untouched.
    /// - `Ok(Some(record))`: every persisted entry was merged into the map,
    ///   overwriting prior in-memory values.
    /// - `Err(MalformedRecord)`: the slot holds a value that is not valid
    ///   JSON. This is a true parse error, not a "no consent yet" signal;
    ///   callers must not conflate the two.
    pub fn load_states(&self) -> Result<Option<ConsentRecord>, ConsentError> {
        let raw = self.slot.read().map_err(ConsentError::Slot)?;
        let raw = match raw {
            Some(value) if !value.is_empty() => value,
            _ => return Ok(None),
        };

        let record = ConsentRecord::from_json(&raw).map_err(ConsentError::MalformedRecord)?;
        record.merge_into(&mut self.states.write().unwrap());

        Ok(Some(record))
    }

    /// Derives the "all" toggle value from the configured services' states.
    ///
    /// Recomputed on every call; see [`ConsentState::aggregate`].
    pub fn aggregate_state(&self) -> ConsentState {
        let states = self.states.read().unwrap();
        ConsentState::aggregate(
            self.services
                .iter()
                .map(|key| states.get(key).copied().unwrap_or_default()),
        )
    }

    /// Whether the slot currently holds a persisted record, regardless of its
    /// content. An all-declined record still counts as consent having been
    /// given.
    pub fn has_consent(&self) -> bool {
        match self.slot.read() {
            Ok(value) => value.is_some(),
            Err(err) => {
                warn!("consent slot read failed: {err}");
                false
            }
        }
    }

    /// Whether `service` was explicitly agreed to.
    pub fn is_allowed(&self, service: &str) -> bool {
        self.state(service) == ConsentState::Agreed
    }

    /// Removes the persisted record, forgetting the stored decisions.
    ///
    /// The in-memory map is left as-is; a reload would start a fresh session.
    pub fn clear_consent(&self) -> Result<(), ConsentError> {
        self.slot.clear().map_err(ConsentError::Slot)
    }

    /// Registers an observer invoked after every definite state change.
    pub fn on_change<F>(&self, observer: F)
    where
        F: Fn(&ConsentChange) + Send + Sync + 'static,
    {
        self.observers.write().unwrap().push(Arc::new(observer));
    }

    /// Serializes the definite entries of the map and writes them to the slot.
    fn persist(&self) -> Result<(), ConsentError> {
        let record = ConsentRecord::from_states(self.states.read().unwrap().iter());
        let json = record.to_json().map_err(ConsentError::RecordSerialize)?;
        self.slot.write(&json).map_err(ConsentError::Slot)
    }

    /// Invokes every observer with a post-update snapshot.
    fn notify(&self, service: &str, state: ConsentState) {
        let observers: Vec<ObserverHandle> = self.observers.read().unwrap().clone();
        if observers.is_empty() {
            return;
        }

        let change = ConsentChange {
            services: self.states_snapshot(),
            service: service.to_string(),
            state,
        };
        for observer in observers {
            observer(&change);
        }
    }
}

impl std::fmt::Debug for ConsentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsentStore")
            .field("services", &self.services)
            .field("states", &self.states)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::slot::{ConsentSlot, InMemorySlot};

    fn store_with_slot(services: &[&str]) -> (ConsentStore, Arc<InMemorySlot>) {
        let slot = Arc::new(InMemorySlot::new());
        let store = ConsentStore::new(
            services.iter().map(|s| s.to_string()).collect(),
            slot.clone(),
        );
        (store, slot)
    }

    #[test]
    fn absent_service_reads_undecided() {
        let (store, _slot) = store_with_slot(&["a"]);
        assert_eq!(store.state("a"), ConsentState::Undecided);
        assert_eq!(store.state("never-configured"), ConsentState::Undecided);
    }

    #[test]
    fn all_fans_out_to_every_service() {
        let (store, _slot) = store_with_slot(&["a", "b", "c"]);

        store.set_state(ALL_SERVICES, ConsentState::Agreed).unwrap();

        assert_eq!(store.state("a"), ConsentState::Agreed);
        assert_eq!(store.state("b"), ConsentState::Agreed);
        assert_eq!(store.state("c"), ConsentState::Agreed);
        assert_eq!(store.aggregate_state(), ConsentState::Agreed);

        // The pseudo-key itself never becomes a map entry.
        assert!(!store.states_snapshot().contains_key(ALL_SERVICES));
    }

    #[test]
    fn mixed_states_aggregate() {
        let (store, _slot) = store_with_slot(&["a", "b"]);

        store.set_state("a", ConsentState::Agreed).unwrap();
        assert_eq!(store.aggregate_state(), ConsentState::Undecided);

        store.set_state("b", ConsentState::Declined).unwrap();
        assert_eq!(store.aggregate_state(), ConsentState::Declined);

        store.set_state("b", ConsentState::Agreed).unwrap();
        assert_eq!(store.aggregate_state(), ConsentState::Agreed);
    }

    #[test]
    fn round_trip_through_fresh_store() {
        let (store, slot) = store_with_slot(&["a", "b"]);
        store.set_state("a", ConsentState::Declined).unwrap();

        // Simulated reload: a new store over the same slot.
        let fresh = ConsentStore::new(vec!["a".to_string(), "b".to_string()], slot);
        let record = fresh.load_states().unwrap().expect("record present");

        assert_eq!(record.get("a"), Some(false));
        assert_eq!(fresh.state("a"), ConsentState::Declined);
        assert_eq!(fresh.state("b"), ConsentState::Undecided);
    }

    #[test]
    fn undecided_never_persists_or_notifies() {
        let (store, slot) = store_with_slot(&["a", "b"]);

        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        store.on_change(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        store.set_state(ALL_SERVICES, ConsentState::Undecided).unwrap();

        assert!(slot.read().unwrap().is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!store.has_consent());
    }

    #[test]
    fn observer_sees_post_update_state_exactly_once() {
        let (store, _slot) = store_with_slot(&["a", "b"]);

        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        store.on_change(move |change| {
            seen.fetch_add(1, Ordering::SeqCst);
            assert_eq!(change.service, ALL_SERVICES);
            assert_eq!(change.state, ConsentState::Agreed);
            assert_eq!(change.services["a"], ConsentState::Agreed);
            assert_eq!(change.services["b"], ConsentState::Agreed);
        });

        store.agree().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn has_consent_reflects_slot_presence_not_content() {
        let (store, _slot) = store_with_slot(&["a"]);
        assert!(!store.has_consent());

        store.set_state("a", ConsentState::Declined).unwrap();
        assert!(store.has_consent());
    }

    #[test]
    fn malformed_record_is_a_hard_failure() {
        let (store, slot) = store_with_slot(&["a"]);
        slot.write("{not json").unwrap();

        assert!(matches!(
            store.load_states(),
            Err(ConsentError::MalformedRecord(_))
        ));
        // The in-memory map is untouched.
        assert_eq!(store.state("a"), ConsentState::Undecided);
    }

    #[test]
    fn empty_slot_value_reads_as_no_consent() {
        let (store, slot) = store_with_slot(&["a"]);
        slot.write("").unwrap();

        assert!(store.load_states().unwrap().is_none());
    }

    #[test]
    fn unknown_service_key_creates_an_entry() {
        let (store, _slot) = store_with_slot(&["a"]);
        store.set_state("surprise", ConsentState::Agreed).unwrap();
        assert!(store.is_allowed("surprise"));
    }

    #[test]
    fn clear_consent_removes_the_record() {
        let (store, _slot) = store_with_slot(&["a"]);
        store.agree().unwrap();
        assert!(store.has_consent());

        store.clear_consent().unwrap();
        assert!(!store.has_consent());
    }

    #[test]
    fn shared_handle_sees_updates_from_other_holders() {
        let slot = Arc::new(InMemorySlot::new());
        let store = ConsentStore::shared(vec!["a".to_string()], slot);

        let other = store.clone();
        other.set_state("a", ConsentState::Agreed).unwrap();

        assert_eq!(store.state("a"), ConsentState::Agreed);
    }
}
