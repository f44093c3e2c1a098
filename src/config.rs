//! Typed notice configuration.
//!
//! The host declares its services, groups and label texts in one JSON
//! payload (historically the container's `data-config` attribute). This
//! module deserializes that payload into an explicit structure and validates
//! it once, up front, instead of probing for optional fields at render time.
//!
//! All label/text fields are optional: a renderer simply omits a button or
//! paragraph whose text is missing. Structural fields (service keys, group
//! references, cookie parameters) are validated by [`NoticeConfig::validate`].

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::consent::ALL_SERVICES;
use crate::errors::ConsentError;

const DEFAULT_COOKIE_NAME: &str = "cookienotice";
// 13 months, the maximum retention period for stored consent.
const DEFAULT_COOKIE_DURATION_DAYS: i64 = 13 * 30;
const DEFAULT_COOKIE_PATH: &str = "/";

/// Texts for the initial notice banner.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoticeText {
    /// Full description shown in the banner.
    pub description: Option<String>,
    /// Short description for narrow viewports.
    pub summary: Option<String>,
    /// "Agree" button text.
    pub agree: Option<String>,
    /// "Disagree" button text.
    pub disagree: Option<String>,
    /// "Customize" button text; opens the preferences modal.
    pub customize: Option<String>,
}

/// Texts and heading level for the preferences modal.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModalConfig {
    pub label: Option<String>,
    pub description: Option<String>,
    /// Close button text.
    pub close: Option<String>,
    /// Tag used for the modal label, e.g. `"h2"`. Service labels use the
    /// next heading level down; see [`NoticeConfig::service_label_tag`].
    #[serde(default = "default_label_tag")]
    pub label_tag: String,
}

fn default_label_tag() -> String {
    "p".to_string()
}

/// A display-only category clustering services in the modal.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroupConfig {
    pub label: Option<String>,
    pub description: Option<String>,
}

/// A single consent-tracked service.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub label: String,
    pub description: Option<String>,
    /// Link target for the service label, if any.
    pub url: Option<String>,
    /// Key of the group this service is listed under.
    pub group: String,
}

/// Shared texts for the `all` pseudo-service and the per-service switches.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AllServiceConfig {
    pub label: Option<String>,
    /// Switch label when a service is agreed to.
    pub agree: Option<String>,
    /// Switch label when a service is declined.
    pub disagree: Option<String>,
    /// Switch label while a service is undecided.
    pub customize: Option<String>,
}

/// The `services` block: the `all` pseudo-entry plus the real services.
///
/// `#[serde(flatten)]` keeps the original wire shape, where `all` sits next
/// to the service keys in the same object.
#[derive(Debug, Clone, Deserialize)]
pub struct ServicesConfig {
    #[serde(default)]
    pub all: AllServiceConfig,
    #[serde(flatten)]
    pub entries: BTreeMap<String, ServiceConfig>,
}

/// Parameters of the persisted consent cookie.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieSettings {
    #[serde(default = "default_cookie_name")]
    pub name: String,
    /// Lifetime of the persisted record, in days.
    #[serde(default = "default_cookie_duration")]
    pub duration_days: i64,
    #[serde(default = "default_cookie_path")]
    pub path: String,
}

fn default_cookie_name() -> String {
    DEFAULT_COOKIE_NAME.to_string()
}

fn default_cookie_duration() -> i64 {
    DEFAULT_COOKIE_DURATION_DAYS
}

fn default_cookie_path() -> String {
    DEFAULT_COOKIE_PATH.to_string()
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            name: default_cookie_name(),
            duration_days: default_cookie_duration(),
            path: default_cookie_path(),
        }
    }
}

/// Complete notice configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct NoticeConfig {
    pub notice: NoticeText,
    /// Preferences modal; when absent no per-service customization is
    /// offered and only the banner's agree/disagree apply.
    pub modal: Option<ModalConfig>,
    #[serde(default)]
    pub groups: BTreeMap<String, GroupConfig>,
    pub services: ServicesConfig,
    #[serde(default)]
    pub cookie: CookieSettings,
    /// Whether the host reloads the page after a state change.
    #[serde(default)]
    pub reload: bool,
}

impl NoticeConfig {
    /// Parses and validates a JSON configuration payload.
    ///
    /// An empty payload is [`ConsentError::MissingConfig`], matching a
    /// missing `data-config` attribute; anything unparseable or structurally
    /// wrong is [`ConsentError::InvalidConfig`].
    pub fn from_json(raw: &str) -> Result<Self, ConsentError> {
        if raw.trim().is_empty() {
            return Err(ConsentError::MissingConfig);
        }

        let config: NoticeConfig = serde_json::from_str(raw)
            .map_err(|e| ConsentError::InvalidConfig(e.to_string()))?;
        config.validate()?;

        Ok(config)
    }

    /// Validates structural constraints. Called by [`from_json`](Self::from_json);
    /// hosts that build the config in code call it directly.
    pub fn validate(&self) -> Result<(), ConsentError> {
        for (key, service) in &self.services.entries {
            if key.is_empty() {
                return Err(ConsentError::InvalidConfig(
                    "empty service key".to_string(),
                ));
            }
            if key == ALL_SERVICES {
                return Err(ConsentError::InvalidConfig(format!(
                    "service key {key:?} is reserved"
                )));
            }
            // Keys end up in the cookie wire format.
            if key.contains(';') || key.contains('=') {
                return Err(ConsentError::InvalidConfig(format!(
                    "service key {key:?} contains a cookie delimiter"
                )));
            }
            if !self.groups.contains_key(&service.group) {
                return Err(ConsentError::InvalidConfig(format!(
                    "service {key:?} references unknown group {:?}",
                    service.group
                )));
            }
        }

        if self.cookie.name.is_empty() {
            return Err(ConsentError::InvalidConfig(
                "empty cookie name".to_string(),
            ));
        }
        if self.cookie.name.contains(';') || self.cookie.name.contains('=') {
            return Err(ConsentError::InvalidConfig(format!(
                "cookie name {:?} contains a cookie delimiter",
                self.cookie.name
            )));
        }
        if self.cookie.duration_days <= 0 {
            return Err(ConsentError::InvalidConfig(
                "cookie duration must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// The configured service keys, excluding the `all` pseudo-entry.
    pub fn service_keys(&self) -> Vec<String> {
        self.services.entries.keys().cloned().collect()
    }

    /// Services clustered by group key, in declaration order, for the modal
    /// renderer.
    pub fn services_by_group(&self) -> BTreeMap<&str, Vec<&str>> {
        let mut grouped: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for (key, service) in &self.services.entries {
            grouped
                .entry(service.group.as_str())
                .or_default()
                .push(key.as_str());
        }
        grouped
    }

    /// Tag for service/group labels: one heading level below the modal
    /// label's tag (`"h2"` → `"h3"`), or the modal tag itself when it is not
    /// a heading.
    pub fn service_label_tag(&self) -> String {
        let tag = self
            .modal
            .as_ref()
            .map(|m| m.label_tag.as_str())
            .unwrap_or("p");

        match tag.strip_prefix('h').and_then(|level| level.parse::<u8>().ok()) {
            Some(level) => format!("h{}", level + 1),
            None => tag.to_string(),
        }
    }
}
