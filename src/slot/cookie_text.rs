//! `document.cookie`-style consent slot.
//!
//! Browser hosts do not hand us a key-value API; they hand us one text line
//! of `name=value` pairs joined by `"; "`, plus a write channel that accepts
//! `Set-Cookie`-style attribute strings. [`CookieLine`] models the line,
//! [`CookieTextSlot`] reads and writes one named pair in it, and
//! [`CookieTextSlot::set_cookie_header`] renders the attribute string
//! (expiry, path) a host forwards to its real cookie store.
//!
//! The record value is compact JSON and never contains `;` or `=` as long as
//! service keys honor the configuration rules, so no escaping is applied.

use std::sync::{Arc, RwLock};

use anyhow::{Context, Result};
use time::format_description::well_known::Rfc2822;
use time::{Duration, OffsetDateTime};

use crate::config::CookieSettings;
use crate::slot::ConsentSlot;

/// Attributes rendered into the `Set-Cookie`-style header.
#[derive(Debug, Clone)]
pub struct CookieAttributes {
    /// Cookie lifetime in days. Defaults to 390 (13 months, the consent
    /// retention ceiling).
    pub duration_days: i64,
    /// Path scope. Defaults to the root path.
    pub path: String,
}

impl Default for CookieAttributes {
    fn default() -> Self {
        Self {
            duration_days: 13 * 30,
            path: "/".to_string(),
        }
    }
}

/// A shared cookie text line: `name=value` pairs joined by `"; "`.
///
/// This is the `document.cookie` equivalent. Hosts that bridge to a real
/// browser keep it in sync with the page; tests and headless hosts just use
/// it as-is. Cloning shares the underlying line.
#[derive(Clone, Default)]
pub struct CookieLine {
    inner: Arc<RwLock<String>>,
}

impl CookieLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing line, e.g. the page's current `document.cookie`.
    pub fn from_line(line: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(line.into())),
        }
    }

    /// Returns the value of the pair named `name`, if present.
    pub fn get(&self, name: &str) -> Option<String> {
        let line = self.inner.read().unwrap();
        for pair in line.split(';') {
            if let Some((key, value)) = pair.trim().split_once('=') {
                if key == name {
                    return Some(value.to_string());
                }
            }
        }
        None
    }

    /// Sets (or replaces) the pair named `name`.
    pub fn set(&self, name: &str, value: &str) {
        let mut line = self.inner.write().unwrap();
        let mut pairs: Vec<String> = line
            .split(';')
            .filter_map(|pair| {
                let pair = pair.trim();
                if pair.is_empty() || pair.split_once('=').map(|(k, _)| k) == Some(name) {
                    None
                } else {
                    Some(pair.to_string())
                }
            })
            .collect();
        pairs.push(format!("{name}={value}"));
        *line = pairs.join("; ");
    }

    /// Removes the pair named `name`. No-op if absent.
    pub fn remove(&self, name: &str) {
        let mut line = self.inner.write().unwrap();
        let pairs: Vec<String> = line
            .split(';')
            .filter_map(|pair| {
                let pair = pair.trim();
                if pair.is_empty() || pair.split_once('=').map(|(k, _)| k) == Some(name) {
                    None
                } else {
                    Some(pair.to_string())
                }
            })
            .collect();
        *line = pairs.join("; ");
    }

    /// The full line, as a host would read `document.cookie`.
    pub fn as_string(&self) -> String {
        self.inner.read().unwrap().clone()
    }
}

/// A consent slot stored as one named pair in a [`CookieLine`].
pub struct CookieTextSlot {
    name: String,
    line: CookieLine,
    attributes: CookieAttributes,
}

impl CookieTextSlot {
    pub fn new(name: impl Into<String>, line: CookieLine, attributes: CookieAttributes) -> Self {
        Self {
            name: name.into(),
            line,
            attributes,
        }
    }

    /// Builds a slot from the cookie section of the notice configuration.
    pub fn from_settings(settings: &CookieSettings, line: CookieLine) -> Self {
        Self::new(
            settings.name.clone(),
            line,
            CookieAttributes {
                duration_days: settings.duration_days,
                path: settings.path.clone(),
            },
        )
    }

    /// Renders the full `Set-Cookie`-style string for `value`, with the
    /// expiry computed from the configured duration as an RFC 2822 GMT date.
    ///
    /// Hosts that bridge to a real cookie store forward this string; the
    /// expiry is advisory and browser-enforced, never re-checked here.
    pub fn set_cookie_header(&self, value: &str) -> Result<String> {
        let expires = OffsetDateTime::now_utc() + Duration::days(self.attributes.duration_days);
        let expires = expires
            .format(&Rfc2822)
            .context("formatting cookie expiry")?;

        Ok(format!(
            "{}={}; expires={}; path={}",
            self.name, value, expires, self.attributes.path
        ))
    }
}

impl ConsentSlot for CookieTextSlot {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.line.get(&self.name).filter(|v| !v.is_empty()))
    }

    fn write(&self, value: &str) -> Result<()> {
        self.line.set(&self.name, value);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.line.remove(&self.name);
        Ok(())
    }
}
