//! Design PCR primers for amplicons. For each amplicon, candidate forward and
//! reverse primers of several lengths are taken from the ends of the sequence,
//! characterized by GC clamp, GC content, and melting temperature, and ranked
//! within their group. The rank 1 candidates are the optimal primers.

pub mod config;
pub mod design;
pub mod error;
pub mod primer;
pub mod score;
pub mod seq;
pub mod table;

pub const COLOR_NOTE: &str = "blue";
pub const COLOR_SUCCESS: &str = "green";
pub const COLOR_WARNING: &str = "yellow";
pub const COLOR_FAIL: &str = "red";

pub use config::DesignParams;
pub use design::{design_amplicon, design_batch, AmpliconDesign, BatchPolicy, Overhangs};
pub use error::{DesignError, TableError};
pub use primer::{Amplicon, PrimerCandidate, PrimerDirection};
