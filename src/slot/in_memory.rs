use std::sync::Mutex;

use anyhow::{bail, Result};

use crate::slot::ConsentSlot;

/// In-memory consent slot (no persistence across processes).
///
/// Used in tests and for private/ephemeral sessions. The
/// [`unavailable`](Self::unavailable) constructor simulates a host with
/// cookies disabled: `available()` reports `false` and every operation
/// fails.
#[derive(Default)]
pub struct InMemorySlot {
    value: Mutex<Option<String>>,
    disabled: bool,
}

impl InMemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot whose persistence mechanism is switched off.
    pub fn unavailable() -> Self {
        Self {
            value: Mutex::new(None),
            disabled: true,
        }
    }
}

impl ConsentSlot for InMemorySlot {
    fn read(&self) -> Result<Option<String>> {
        if self.disabled {
            bail!("in-memory slot is disabled");
        }
        Ok(self.value.lock().unwrap().clone())
    }

    fn write(&self, value: &str) -> Result<()> {
        if self.disabled {
            bail!("in-memory slot is disabled");
        }
        *self.value.lock().unwrap() = Some(value.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.disabled {
            bail!("in-memory slot is disabled");
        }
        *self.value.lock().unwrap() = None;
        Ok(())
    }

    fn available(&self) -> bool {
        !self.disabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_contract() {
        let slot = InMemorySlot::new();
        assert!(slot.available());
        assert!(slot.read().unwrap().is_none());

        slot.write(r#"{"a":true}"#).unwrap();
        assert_eq!(slot.read().unwrap().as_deref(), Some(r#"{"a":true}"#));

        // overwrite
        slot.write(r#"{"a":false}"#).unwrap();
        assert_eq!(slot.read().unwrap().as_deref(), Some(r#"{"a":false}"#));

        // clear is idempotent
        slot.clear().unwrap();
        slot.clear().unwrap();
        assert!(slot.read().unwrap().is_none());
    }

    #[test]
    fn unavailable_slot_rejects_everything() {
        let slot = InMemorySlot::unavailable();
        assert!(!slot.available());
        assert!(slot.read().is_err());
        assert!(slot.write("x").is_err());
        assert!(slot.clear().is_err());
    }
}
