//! Minimal host wiring: config JSON in, consent decisions out.
//!
//! A real host renders the banner and modal from the config and calls into
//! the store from its event handlers; here those interactions are scripted.

use std::sync::Arc;

use cookie_notice::slot::{CookieLine, CookieTextSlot};
use cookie_notice::{ConsentState, CookieNotice, NoticeConfig, SlotHandle};

const CONFIG: &str = r#"{
    "notice": {
        "description": "We use cookies to measure traffic and embed videos.",
        "agree": "I agree",
        "disagree": "I disagree",
        "customize": "Customize"
    },
    "modal": {
        "label": "Cookie preferences",
        "close": "Close",
        "labelTag": "h2"
    },
    "groups": {
        "stats": { "label": "Statistics" },
        "embeds": { "label": "Embedded content" }
    },
    "services": {
        "all": { "label": "All services", "agree": "Allow", "disagree": "Deny", "customize": "Choose" },
        "analytics": { "label": "Analytics", "group": "stats" },
        "youtube": { "label": "YouTube", "url": "https://youtube.com", "group": "embeds" }
    }
}"#;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = NoticeConfig::from_json(CONFIG)?;
    let line = CookieLine::new();
    let slot: SlotHandle = Arc::new(CookieTextSlot::from_settings(&config.cookie, line.clone()));

    let notice = CookieNotice::new(config, slot)?;
    notice.store().on_change(|change| {
        println!("changed: {} -> {:?}", change.service, change.state);
    });

    println!("show banner: {}", notice.needs_notice());
    println!("groups: {:?}", notice.config().services_by_group());

    // User toggles one service in the modal, then hits "agree" on the rest.
    notice
        .store()
        .set_state("youtube", ConsentState::Declined)?;
    notice
        .store()
        .set_state("analytics", ConsentState::Agreed)?;

    println!("all switch: {:?}", notice.all_toggle_state());
    println!("analytics allowed: {}", notice.is_allowed("analytics"));
    println!("cookie line: {}", line.as_string());
    println!("show banner: {}", notice.needs_notice());

    Ok(())
}
