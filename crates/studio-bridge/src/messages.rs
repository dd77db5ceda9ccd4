use serde::{Deserialize, Serialize};
use uuid::Uuid;

use charm_types::LogoPlacement;
use scene_engine::{ComposedScene, ConfigPatch};

/// Messages from the UI (JavaScript main thread) to the studio (WASM
/// worker). Serialized as JSON for postMessage transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UiToStudio {
    // -- Configurator --
    /// Parse uploaded vector markup and replace the logo batch.
    ImportArtwork { svg: String },
    /// Apply one scoped configuration update.
    ApplyPatch { patch: ConfigPatch },
    /// Run one render step: rebuild dirty geometry and re-align the logo.
    Frame,
    /// Rasterize the current frame to a PNG still.
    CaptureSnapshot,

    // -- Stamp cards --
    /// Create (or reopen) the stamp card for a card block.
    CreateStampCard { block_id: Uuid, slot_count: u8 },
    /// Validate a scanned code against the card's secret and stamp it.
    ScanStamp { block_id: Uuid, code: String },
    /// Redeem a full card. `owner_confirmed` reflects the confirmation
    /// prompt; redemption is refused without it.
    RedeemCard { block_id: Uuid, owner_confirmed: bool },
    /// Staff recovery stamp. `hold_confirmed` reflects the sustained-press
    /// plus prompt gate.
    AdminStamp { block_id: Uuid, hold_confirmed: bool },
    /// Regenerate the card's secret code (block duplication / rotation).
    RotateCardSecret { block_id: Uuid },
}

/// Messages from the studio back to the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StudioToUi {
    /// The composed scene after a frame.
    SceneUpdated {
        scene: ComposedScene,
        warnings: Vec<String>,
    },

    /// A new batch was imported and auto-fitted.
    ArtworkImported {
        shape_count: usize,
        placement: LogoPlacement,
    },

    /// Snapshot bytes, base64-encoded for postMessage transfer.
    SnapshotReady { png_base64: String },

    /// Snapshot was requested before a frame completed; send `Frame` and
    /// retry. Bounded by the caller.
    SnapshotPending,

    /// A stamp card changed state.
    CardUpdated {
        block_id: Uuid,
        current_stamps: u8,
        slot_count: u8,
        full: bool,
    },

    /// A card was created; the secret feeds the printed QR code.
    CardCreated {
        block_id: Uuid,
        slot_count: u8,
        secret_code: String,
    },

    /// A card's secret was rotated.
    CardSecret {
        block_id: Uuid,
        secret_code: String,
    },

    /// An error occurred in the studio.
    Error { message: String },
}
