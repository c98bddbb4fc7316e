//! `conciliacion-recon` — coupon reconciliation engine.
//!
//! Pure engine crate: receives pre-parsed rows from the internal ledger (DEBO)
//! and a settlement platform, returns classified results. No CLI or IO
//! dependencies.

pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod normalize;
pub mod summary;

pub use config::{ColumnProfile, ReconConfig};
pub use engine::{reconcile, reconcile_with, run};
pub use error::ReconError;
pub use model::{CellValue, MatchResult, MatchStatus, RawRow, ReconInput, ReconResult, ReconSummary, Role};
pub use summary::compute_summary;
