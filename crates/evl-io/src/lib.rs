//! # evl-io: Input Loading for the EV Load Atlas
//!
//! Reads the three static inputs and normalizes them into the
//! [`evl_core`] model:
//!
//! | Input | Loader | Output |
//! |-------|--------|--------|
//! | `{year}_gov_fleet_EV_load_profiles.csv` | [`demand::load_demand_csv`] | `Vec<DemandRecord>` |
//! | `counties-by-state.json` | [`membership::load_membership`] | `CountyMembership` |
//! | `counties-albers-10m.json` (TopoJSON) | [`topology::load_topology`] | `Topology` |
//!
//! [`loader::load_all`] reads everything up front and fails as a whole.
//!
//! ## Error Handling
//!
//! Structural problems (missing file, missing column, malformed JSON) are
//! fatal [`LoadError`]s. Cell-level problems (non-numeric hour or demand)
//! keep the row with a missing value and are collected in
//! [`ImportDiagnostics`]:
//!
//! ```rust,no_run
//! use evl_core::Year;
//! use evl_io::{demand::load_demand_csv, DemandSchema};
//!
//! fn main() -> anyhow::Result<()> {
//!     let parsed = load_demand_csv(
//!         "data/2023_gov_fleet_EV_load_profiles.csv".as_ref(),
//!         Year(2023),
//!         &DemandSchema::default(),
//!     )?;
//!     if parsed.diagnostics.has_issues() {
//!         eprintln!("{} values coerced to missing", parsed.diagnostics.stats.missing_values);
//!     }
//!     Ok(())
//! }
//! ```

pub mod demand;
pub mod diagnostics;
pub mod error;
pub mod loader;
pub mod membership;
pub mod schema;
pub mod topology;

pub use diagnostics::{ImportDiagnostics, ImportIssue, ImportStats, Severity};
pub use error::{LoadError, LoadResult};
pub use loader::{load_all, DataSources, LoadedInputs};
pub use schema::DemandSchema;
