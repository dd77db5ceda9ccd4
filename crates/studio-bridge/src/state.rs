use uuid::Uuid;

use scene_engine::{CaptureError, Studio};
use solid_kernel::Kernel;
use stamp_card::{CardKey, CardOpError, CardStore, KeyValueStore};
use vector_import::ImportError;

/// The studio state wrapper for the bridge.
///
/// Holds the compositor, the device-local card store, and the identity of
/// the configuration being edited.
pub struct StudioState<K: Kernel, S: KeyValueStore> {
    /// The live compositor.
    pub studio: Studio<K>,
    /// Stamp cards, keyed per (configuration, block).
    pub cards: CardStore<S>,
    /// The configuration all card blocks in this session belong to.
    pub configuration_id: Uuid,
}

impl<K: Kernel, S: KeyValueStore> StudioState<K, S> {
    pub fn new(kernel: K, store: S) -> Self {
        Self::with_configuration(kernel, store, Uuid::new_v4())
    }

    /// Reopen an existing configuration (its cards live under its id).
    pub fn with_configuration(kernel: K, store: S, configuration_id: Uuid) -> Self {
        Self {
            studio: Studio::new(kernel),
            cards: CardStore::new(store),
            configuration_id,
        }
    }

    /// The storage key for a card block in this configuration.
    pub fn card_key(&self, block_id: Uuid) -> CardKey {
        CardKey::new(self.configuration_id, block_id)
    }
}

/// Errors from the bridge layer.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BridgeError {
    #[error("import error: {0}")]
    Import(#[from] ImportError),

    #[error("card error: {0}")]
    Card(#[from] CardOpError),

    #[error("capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("{action} requires explicit confirmation")]
    ConfirmationRequired { action: &'static str },
}
