/// Errors from stamp-card state transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CardError {
    #[error("slot count {count} outside allowed range {min}..={max}", min = crate::card::MIN_SLOTS, max = crate::card::MAX_SLOTS)]
    InvalidSlotCount { count: u8 },

    #[error("presented code does not match")]
    InvalidCode,

    #[error("card is already full")]
    CardFull,

    #[error("card is not full yet, nothing to redeem")]
    NotRedeemable,
}

/// Errors from the persistence layer.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("failed to parse stored card: {0}")]
    Parse(String),

    #[error("unknown stored format: {0}")]
    UnknownFormat(String),

    #[error("stored version {file_version} is newer than supported version {supported_version}")]
    FutureVersion {
        file_version: u32,
        supported_version: u32,
    },

    #[error("migration failed from version {from} to {to}: {reason}")]
    MigrationFailed { from: u32, to: u32, reason: String },
}

/// Combined error for read-modify-write card operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CardOpError {
    #[error(transparent)]
    Card(#[from] CardError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("no card stored under key {key}")]
    NotFound { key: String },
}
