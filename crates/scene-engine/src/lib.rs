pub mod config;
pub mod scene;
pub mod snapshot;
pub mod studio;

pub use config::{CharmConfig, ConfigPatch, DirtyFlags};
pub use scene::{ComposedScene, PlacedLogo};
pub use snapshot::CaptureError;
pub use studio::{Studio, CONTACT_CLEARANCE_MM, DEFAULT_TARGET_FOOTPRINT_MM};
