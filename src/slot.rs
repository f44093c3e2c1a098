//! Durable slot infrastructure.
//!
//! A **consent slot** is the cookie-equivalent key-value slot the persisted
//! consent record lives in. The store never talks to a browser directly; it
//! is handed a [`SlotHandle`] at construction time and reads/writes the raw
//! record string through it.
//!
//! This module exports three backends:
//! - [`InMemorySlot`]: ephemeral slot for tests and private sessions; can
//!   also simulate an unavailable slot (cookies disabled).
//! - [`JsonFileSlot`]: file-backed slot, one file per slot.
//! - [`CookieTextSlot`]: operates on a `document.cookie`-style text line and
//!   renders `Set-Cookie`-style attribute strings for hosts that bridge to a
//!   real cookie store.
//!
//! ## Design notes
//! - Slots are injected once, at store construction; the store holds the
//!   only reference it needs for its lifetime.
//! - Implementations must be `Send + Sync` and internally synchronized;
//!   all trait methods take `&self`.
//! - `read` distinguishes "no value" (`Ok(None)`) from an I/O failure
//!   (`Err`). Absence means no consent has been recorded yet; a failure is
//!   reported, never retried.

pub mod cookie_text;
pub mod in_memory;
pub mod json_file;

use std::sync::Arc;

use anyhow::Result;

pub use cookie_text::{CookieAttributes, CookieLine, CookieTextSlot};
pub use in_memory::InMemorySlot;
pub use json_file::JsonFileSlot;

/// Object-safe durable key-value slot holding the consent record.
pub trait ConsentSlot: Send + Sync {
    /// Returns the current slot value, or `None` if the slot is absent.
    fn read(&self) -> Result<Option<String>>;

    /// Writes `value` to the slot, overwriting any existing value.
    fn write(&self, value: &str) -> Result<()>;

    /// Removes the slot value. Idempotent.
    fn clear(&self) -> Result<()>;

    /// Whether the persistence mechanism backing the slot is usable at all.
    ///
    /// Mirrors `navigator.cookieEnabled`: when this is `false`,
    /// initialization must fail cleanly and the widget must not render.
    fn available(&self) -> bool {
        true
    }
}

/// A handle to a type-erased consent slot.
pub type SlotHandle = Arc<dyn ConsentSlot>;
