//! Probe sampling and PNG artifacts

mod generator;
mod probe;
mod projection;
mod render;

pub use generator::{autoencode, generate, write_ground_truth};
pub use probe::ProbeSet;
pub use projection::{xym, zym, Projections};
pub use render::{make_grid, normalize, save_image};
