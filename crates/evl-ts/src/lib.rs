//! # evl-ts: Hourly Demand Aggregation
//!
//! Turns the normalized dataset into the numbers the map paints for one
//! `(year, hour, scope)`:
//!
//! - **State scope** sums every county's demand per state. The domain starts
//!   at zero so intensities stay comparable from hour to hour.
//! - **County scope** returns the raw per-county values of the open state.
//!   The domain is the observed range, widened by one unit on each side when
//!   it collapses to a point.
//!
//! Missing readings are left out of sums and extrema; a geography without a
//! value reads as [`Reading::NoData`], never as zero.

pub mod aggregate;
pub mod domain;

pub use aggregate::{compute_aggregate, AggregateKey, AggregateView, Reading, Scope};
pub use domain::Domain;
