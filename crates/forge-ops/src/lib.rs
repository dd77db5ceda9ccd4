pub mod logo;
pub mod plate;
pub mod profile;
pub mod types;

pub use logo::{batch_center, extrude_logo, fit_logo, LogoOpResult, LogoSolid};
pub use plate::synthesize_plate;
pub use profile::plate_profile;
pub use types::*;
