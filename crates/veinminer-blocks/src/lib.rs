//! Material catalog, ore table and experience ranges.
#![forbid(unsafe_code)]

pub mod config;
pub mod material;
pub mod types;

pub use material::{DEFAULT_MAX_VEIN_SIZE, Material, MaterialCatalog, OreInfo};
pub use types::{MaterialId, XpRange};
