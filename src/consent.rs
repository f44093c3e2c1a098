//! Consent state: [`ConsentState`], [`ConsentStore`] and the persisted record.

mod event;
mod record;
mod state;
mod store;

pub use event::ConsentChange;
pub use record::ConsentRecord;
pub use state::ConsentState;
pub use store::ConsentStore;
pub use store::ObserverHandle;
pub use store::StoreHandle;
pub use store::ALL_SERVICES;
