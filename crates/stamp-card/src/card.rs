use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CardError;

/// Smallest allowed slot count.
pub const MIN_SLOTS: u8 = 5;
/// Largest allowed slot count.
pub const MAX_SLOTS: u8 = 15;

/// Identifies one stamp card: the owning configuration and the card block
/// within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardKey {
    pub configuration_id: Uuid,
    pub block_id: Uuid,
}

impl CardKey {
    pub fn new(configuration_id: Uuid, block_id: Uuid) -> Self {
        Self {
            configuration_id,
            block_id,
        }
    }

    /// Key under which this card lives in the device-local store.
    pub fn storage_key(&self) -> String {
        format!("charm:{}:{}", self.configuration_id, self.block_id)
    }
}

/// Observable phase of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CardPhase {
    /// Accepting stamps.
    Collecting,
    /// All slots stamped; waiting for redemption.
    Full,
}

/// Persisted state of one stamp card.
///
/// `current_stamps` only ever grows, except for the explicit reset in
/// [`StampCardState::redeem`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StampCardState {
    pub slot_count: u8,
    pub current_stamps: u8,
    pub secret_code: String,
    pub created: DateTime<Utc>,
    pub last_stamped: Option<DateTime<Utc>>,
}

impl StampCardState {
    /// Create a fresh card. The secret code is generated here, once; it only
    /// changes again on explicit rotation.
    pub fn new(slot_count: u8) -> Result<Self, CardError> {
        if !(MIN_SLOTS..=MAX_SLOTS).contains(&slot_count) {
            return Err(CardError::InvalidSlotCount { count: slot_count });
        }
        Ok(Self {
            slot_count,
            current_stamps: 0,
            secret_code: generate_secret_code(),
            created: Utc::now(),
            last_stamped: None,
        })
    }

    pub fn is_full(&self) -> bool {
        self.current_stamps >= self.slot_count
    }

    pub fn phase(&self) -> CardPhase {
        if self.is_full() {
            CardPhase::Full
        } else {
            CardPhase::Collecting
        }
    }

    /// Compare the presented code and add one stamp on an exact match.
    /// Returns the new stamp count. The state is untouched on any error.
    pub fn validate_and_stamp(&mut self, presented: &str) -> Result<u8, CardError> {
        if self.is_full() {
            return Err(CardError::CardFull);
        }
        if presented != self.secret_code {
            return Err(CardError::InvalidCode);
        }
        self.apply_stamp();
        Ok(self.current_stamps)
    }

    /// Staff recovery path: adds one stamp without a code comparison. The
    /// [`HoldConfirmation`] token is only constructible through the UI's
    /// sustained-press gate, keeping the bypass a deliberate act.
    pub fn admin_stamp(&mut self, _confirm: HoldConfirmation) -> Result<u8, CardError> {
        if self.is_full() {
            return Err(CardError::CardFull);
        }
        self.apply_stamp();
        Ok(self.current_stamps)
    }

    /// Redeem a full card: reset to zero stamps and start collecting again.
    /// Requires the owner's explicit confirmation.
    pub fn redeem(&mut self, _confirm: OwnerConfirmation) -> Result<(), CardError> {
        if !self.is_full() {
            return Err(CardError::NotRedeemable);
        }
        self.current_stamps = 0;
        Ok(())
    }

    /// Regenerate the secret code. Used when a card block is duplicated or
    /// its code is rotated; previously issued codes stop working.
    pub fn rotate_secret(&mut self) {
        self.secret_code = generate_secret_code();
    }

    fn apply_stamp(&mut self) {
        self.current_stamps += 1;
        self.last_stamped = Some(Utc::now());
    }
}

/// Proof that the card owner confirmed redemption. Human-in-the-loop gate;
/// nothing in the engine constructs this automatically.
#[derive(Debug, Clone, Copy)]
pub struct OwnerConfirmation(());

impl OwnerConfirmation {
    /// Construct after the owner answered the confirmation prompt.
    pub fn confirmed() -> Self {
        Self(())
    }
}

/// Proof that the staff hold-to-confirm gesture and prompt both completed.
#[derive(Debug, Clone, Copy)]
pub struct HoldConfirmation(());

impl HoldConfirmation {
    /// Construct after the sustained press and the confirmation prompt.
    pub fn after_hold() -> Self {
        Self(())
    }
}

fn generate_secret_code() -> String {
    // First 8 hex chars of a v4 UUID: short enough for a QR payload,
    // random enough for a per-card shared secret.
    Uuid::new_v4().simple().to_string()[..8].to_string()
}
