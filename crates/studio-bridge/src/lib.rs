pub mod dispatch;
pub mod messages;
pub mod state;

#[cfg(target_arch = "wasm32")]
pub mod wasm_api;

pub use dispatch::dispatch;
pub use messages::{StudioToUi, UiToStudio};
pub use state::{BridgeError, StudioState};
