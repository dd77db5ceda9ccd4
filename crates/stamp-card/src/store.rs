//! Device-local card persistence.
//!
//! Cards are stored as versioned JSON envelopes on a string key-value
//! surface. The browser backs this with durable local storage; tests and
//! native use get [`MemoryStore`].

use serde::{Deserialize, Serialize};

use crate::card::{CardKey, HoldConfirmation, OwnerConfirmation, StampCardState};
use crate::error::{CardOpError, StoreError};

/// Current envelope version.
pub const FORMAT_VERSION: u32 = 1;

const FORMAT_NAME: &str = "charm-forge-card";

/// Minimal persistence surface the engine needs, assumed durable per-device.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
}

/// In-memory store for tests and native embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    map: std::collections::HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.map.insert(key.to_string(), value);
    }
}

/// The envelope written to the store.
#[derive(Debug, Clone, Serialize)]
struct CardFile<'a> {
    format: &'a str,
    version: u32,
    card: &'a StampCardState,
}

#[derive(Debug, Clone, Deserialize)]
struct CardFileRaw {
    format: String,
    version: u32,
    card: StampCardState,
}

/// Serialize a card to its envelope string.
pub fn encode_card(card: &StampCardState) -> String {
    let file = CardFile {
        format: FORMAT_NAME,
        version: FORMAT_VERSION,
        card,
    };
    serde_json::to_string(&file).expect("card serialization should never fail")
}

/// Deserialize a card from its envelope string.
///
/// Validates the format identifier and version, migrating older envelopes
/// forward.
pub fn decode_card(json: &str) -> Result<StampCardState, StoreError> {
    let raw: CardFileRaw =
        serde_json::from_str(json).map_err(|e| StoreError::Parse(e.to_string()))?;

    if raw.format != FORMAT_NAME {
        return Err(StoreError::UnknownFormat(raw.format));
    }
    if raw.version > FORMAT_VERSION {
        return Err(StoreError::FutureVersion {
            file_version: raw.version,
            supported_version: FORMAT_VERSION,
        });
    }

    if raw.version < FORMAT_VERSION {
        migrate(raw.card, raw.version, FORMAT_VERSION)
    } else {
        Ok(raw.card)
    }
}

/// Migrate a card from an older envelope version.
fn migrate(card: StampCardState, from: u32, to: u32) -> Result<StampCardState, StoreError> {
    // Version 1 is the first released envelope; nothing to migrate yet.
    let _ = (from, to);
    Ok(card)
}

/// Card operations over a key-value store. All mutations are atomic
/// read-modify-write: load, transition, persist.
pub struct CardStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> CardStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Load the card for a key, if one was ever stored.
    pub fn load(&self, key: &CardKey) -> Result<Option<StampCardState>, StoreError> {
        match self.store.get(&key.storage_key()) {
            Some(json) => decode_card(&json).map(Some),
            None => Ok(None),
        }
    }

    /// Persist a card under its key.
    pub fn save(&mut self, key: &CardKey, card: &StampCardState) {
        self.store.set(&key.storage_key(), encode_card(card));
    }

    /// Load the stored card or create and persist a fresh one.
    pub fn load_or_create(
        &mut self,
        key: &CardKey,
        slot_count: u8,
    ) -> Result<StampCardState, CardOpError> {
        if let Some(card) = self.load(key)? {
            return Ok(card);
        }
        let card = StampCardState::new(slot_count)?;
        self.save(key, &card);
        Ok(card)
    }

    /// Validate a scanned code and persist the incremented card.
    pub fn stamp(&mut self, key: &CardKey, presented: &str) -> Result<u8, CardOpError> {
        self.modify(key, |card| card.validate_and_stamp(presented))
    }

    /// Staff recovery stamp; persists on success.
    pub fn admin_stamp(&mut self, key: &CardKey, confirm: HoldConfirmation) -> Result<u8, CardOpError> {
        self.modify(key, |card| card.admin_stamp(confirm))
    }

    /// Redeem a full card; persists the reset.
    pub fn redeem(&mut self, key: &CardKey, confirm: OwnerConfirmation) -> Result<(), CardOpError> {
        self.modify(key, |card| card.redeem(confirm))
    }

    /// Rotate the secret code and persist it.
    pub fn rotate_secret(&mut self, key: &CardKey) -> Result<String, CardOpError> {
        self.modify(key, |card| {
            card.rotate_secret();
            Ok(card.secret_code.clone())
        })
    }

    fn modify<T>(
        &mut self,
        key: &CardKey,
        op: impl FnOnce(&mut StampCardState) -> Result<T, crate::error::CardError>,
    ) -> Result<T, CardOpError> {
        let mut card = self.load(key)?.ok_or_else(|| CardOpError::NotFound {
            key: key.storage_key(),
        })?;
        let result = op(&mut card)?;
        self.save(key, &card);
        Ok(result)
    }
}
