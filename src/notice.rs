//! Host-facing facade wiring configuration, slot and store together.
//!
//! A [`CookieNotice`] is what a page embeds: it validates the configuration,
//! checks that the injected slot is usable, restores any persisted consent
//! and hands out the shared [`StoreHandle`] renderers and event binders talk
//! to. Initialization failures are reported through [`log`] and a typed
//! error; a failed notice must simply not be rendered — there is no way to
//! honor persisted consent without a working slot.

use std::sync::Arc;

use log::error;

use crate::config::NoticeConfig;
use crate::consent::{ConsentState, ConsentStore, StoreHandle, ALL_SERVICES};
use crate::errors::ConsentError;
use crate::slot::SlotHandle;

/// A configured consent notice bound to a shared store.
pub struct CookieNotice {
    config: NoticeConfig,
    store: StoreHandle,
}

impl CookieNotice {
    /// Creates a notice with its own store over `slot`.
    ///
    /// Fails cleanly when the slot is unavailable (cookies disabled), the
    /// configuration is invalid, or a persisted record exists but cannot be
    /// parsed. On a fresh session (no record) every configured service is
    /// seeded `Undecided`; seeding neither persists nor notifies.
    pub fn new(config: NoticeConfig, slot: SlotHandle) -> Result<Self, ConsentError> {
        if !slot.available() {
            error!("consent slot unavailable, not initializing");
            return Err(ConsentError::SlotUnavailable);
        }

        if let Err(err) = config.validate() {
            error!("invalid notice configuration: {err}");
            return Err(err);
        }

        let store = Arc::new(ConsentStore::new(config.service_keys(), slot));

        match store.load_states() {
            Ok(Some(_)) => {}
            Ok(None) => {
                // Fresh session: seed the map so every service reads as an
                // explicit Undecided.
                store.set_state(ALL_SERVICES, ConsentState::Undecided)?;
            }
            Err(err) => {
                error!("failed to load persisted consent: {err}");
                return Err(err);
            }
        }

        Ok(Self { config, store })
    }

    /// Creates an additional notice instance over an existing store.
    ///
    /// Used when several widgets live on one page: they all observe and
    /// mutate the same consent state. The store is not re-seeded and nothing
    /// is re-loaded.
    pub fn with_shared_store(
        config: NoticeConfig,
        store: StoreHandle,
    ) -> Result<Self, ConsentError> {
        config.validate()?;
        Ok(Self { config, store })
    }

    /// The shared consent store.
    pub fn store(&self) -> StoreHandle {
        self.store.clone()
    }

    pub fn config(&self) -> &NoticeConfig {
        &self.config
    }

    /// Whether the initial banner should (still) be shown: true until the
    /// user has made some decision, i.e. until a record is persisted.
    pub fn needs_notice(&self) -> bool {
        !self.store.has_consent()
    }

    /// Agrees to every service (the banner's "agree" button).
    pub fn agree(&self) -> Result<(), ConsentError> {
        self.store.agree()
    }

    /// Declines every service (the banner's "disagree" button).
    pub fn disagree(&self) -> Result<(), ConsentError> {
        self.store.disagree()
    }

    /// Whether `service` was explicitly agreed to.
    pub fn is_allowed(&self, service: &str) -> bool {
        self.store.is_allowed(service)
    }

    /// Current value of the "all" switch, recomputed from the per-service
    /// states on every call.
    pub fn all_toggle_state(&self) -> ConsentState {
        self.store.aggregate_state()
    }

    /// Whether the host should reload the page after a state change.
    pub fn should_reload(&self) -> bool {
        self.config.reload
    }
}
