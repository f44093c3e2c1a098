//! Consent state core for a cookie-consent notice widget.
//!
//! This crate implements the part of a consent banner that actually carries
//! state: a tri-state per-service consent map with aggregate ("all")
//! semantics, durable persistence in a cookie-equivalent key-value slot, a
//! typed configuration model, and change notification for host code.
//! Rendering the notice and the preferences modal is left to the host; the
//! crate only exposes the state queries a renderer needs.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use cookie_notice::{ConsentState, CookieNotice, NoticeConfig, SlotHandle};
//! use cookie_notice::slot::InMemorySlot;
//!
//! let config = NoticeConfig::from_json(r#"{
//!     "notice": { "description": "We use cookies.", "agree": "OK", "disagree": "No" },
//!     "groups": { "stats": { "label": "Statistics" } },
//!     "services": {
//!         "all": { "label": "All services", "agree": "Allow", "disagree": "Deny" },
//!         "analytics": { "label": "Analytics", "group": "stats" }
//!     }
//! }"#).unwrap();
//!
//! let slot: SlotHandle = Arc::new(InMemorySlot::new());
//! let notice = CookieNotice::new(config, slot).unwrap();
//!
//! assert!(notice.needs_notice());
//! notice.agree().unwrap();
//! assert!(!notice.needs_notice());
//! assert_eq!(notice.store().state("analytics"), ConsentState::Agreed);
//! ```

pub mod config;
pub mod consent;
pub mod errors;
pub mod notice;
pub mod slot;

pub use config::NoticeConfig;
pub use consent::{ConsentChange, ConsentRecord, ConsentState, ConsentStore, StoreHandle, ALL_SERVICES};
pub use errors::ConsentError;
pub use notice::CookieNotice;
pub use slot::{ConsentSlot, SlotHandle};
