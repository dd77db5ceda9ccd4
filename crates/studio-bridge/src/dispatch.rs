use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use uuid::Uuid;

use scene_engine::CaptureError;
use solid_kernel::Kernel;
use stamp_card::{HoldConfirmation, KeyValueStore, OwnerConfirmation};

use crate::messages::{StudioToUi, UiToStudio};
use crate::state::{BridgeError, StudioState};

/// Dispatch a UI message to the studio and return a response.
///
/// This is the main entry point for processing messages from the JavaScript
/// main thread. Every error becomes a `StudioToUi::Error`; nothing panics
/// across the boundary.
pub fn dispatch<K: Kernel, S: KeyValueStore>(
    state: &mut StudioState<K, S>,
    msg: UiToStudio,
) -> StudioToUi {
    match handle_message(state, msg) {
        Ok(response) => response,
        Err(e) => StudioToUi::Error {
            message: e.to_string(),
        },
    }
}

fn handle_message<K: Kernel, S: KeyValueStore>(
    state: &mut StudioState<K, S>,
    msg: UiToStudio,
) -> Result<StudioToUi, BridgeError> {
    match msg {
        // -- Configurator --
        UiToStudio::ImportArtwork { svg } => {
            let shape_count = state.studio.import_artwork(&svg)?;
            Ok(StudioToUi::ArtworkImported {
                shape_count,
                placement: state.studio.config().placement,
            })
        }

        UiToStudio::ApplyPatch { patch } => {
            state.studio.apply(patch);
            Ok(scene_response(state))
        }

        UiToStudio::Frame => {
            state.studio.frame();
            Ok(scene_response(state))
        }

        UiToStudio::CaptureSnapshot => match state.studio.capture_snapshot() {
            Ok(png) => Ok(StudioToUi::SnapshotReady {
                png_base64: BASE64.encode(png),
            }),
            Err(CaptureError::NotReady) => Ok(StudioToUi::SnapshotPending),
            Err(e) => Err(e.into()),
        },

        // -- Stamp cards --
        UiToStudio::CreateStampCard {
            block_id,
            slot_count,
        } => {
            let key = state.card_key(block_id);
            let card = state.cards.load_or_create(&key, slot_count)?;
            Ok(StudioToUi::CardCreated {
                block_id,
                slot_count: card.slot_count,
                secret_code: card.secret_code,
            })
        }

        UiToStudio::ScanStamp { block_id, code } => {
            let key = state.card_key(block_id);
            state.cards.stamp(&key, &code)?;
            card_response(state, block_id)
        }

        UiToStudio::RedeemCard {
            block_id,
            owner_confirmed,
        } => {
            if !owner_confirmed {
                return Err(BridgeError::ConfirmationRequired {
                    action: "redeeming a card",
                });
            }
            let key = state.card_key(block_id);
            state
                .cards
                .redeem(&key, OwnerConfirmation::confirmed())?;
            card_response(state, block_id)
        }

        UiToStudio::AdminStamp {
            block_id,
            hold_confirmed,
        } => {
            if !hold_confirmed {
                return Err(BridgeError::ConfirmationRequired {
                    action: "a staff stamp",
                });
            }
            let key = state.card_key(block_id);
            state
                .cards
                .admin_stamp(&key, HoldConfirmation::after_hold())?;
            card_response(state, block_id)
        }

        UiToStudio::RotateCardSecret { block_id } => {
            let key = state.card_key(block_id);
            let secret_code = state.cards.rotate_secret(&key)?;
            Ok(StudioToUi::CardSecret {
                block_id,
                secret_code,
            })
        }
    }
}

/// Build a SceneUpdated response from the current studio state, draining
/// accumulated warnings.
fn scene_response<K: Kernel, S: KeyValueStore>(state: &mut StudioState<K, S>) -> StudioToUi {
    StudioToUi::SceneUpdated {
        scene: state.studio.scene().clone(),
        warnings: std::mem::take(&mut state.studio.warnings),
    }
}

/// Build a CardUpdated response by re-reading the persisted card.
fn card_response<K: Kernel, S: KeyValueStore>(
    state: &StudioState<K, S>,
    block_id: Uuid,
) -> Result<StudioToUi, BridgeError> {
    let key = state.card_key(block_id);
    let card = state
        .cards
        .load(&key)
        .map_err(stamp_card::CardOpError::from)?
        .ok_or(stamp_card::CardOpError::NotFound {
            key: key.storage_key(),
        })?;
    Ok(StudioToUi::CardUpdated {
        block_id,
        current_stamps: card.current_stamps,
        slot_count: card.slot_count,
        full: card.is_full(),
    })
}
