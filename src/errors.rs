#[derive(Debug, thiserror::Error)]
pub enum ConsentError {
    #[error("Consent slot unavailable")]
    SlotUnavailable,

    #[error("Configuration payload missing or empty")]
    MissingConfig,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Persisted consent record is not valid JSON: {0}")]
    MalformedRecord(#[source] serde_json::Error),

    #[error("Failed to serialize consent record: {0}")]
    RecordSerialize(#[source] serde_json::Error),

    #[error("Slot error: {0}")]
    Slot(#[source] anyhow::Error),
}
