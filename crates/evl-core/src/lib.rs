//! # evl-core: EV Charging Demand Domain Model
//!
//! Shared types for the EV load atlas: demand records, geography keys,
//! the state registry, the county membership table and topology ids.
//!
//! ## Joining the inputs
//!
//! Three static inputs feed the atlas and each names places differently:
//!
//! | Input | State identified by | County identified by |
//! |-------|---------------------|----------------------|
//! | Demand CSV | optional `", ST"` suffix | free-text label |
//! | Membership table | state name | display name (`" County"` stripped) |
//! | Topology | 2-digit FIPS id | 5-digit FIPS id + name |
//!
//! [`StateRegistry`] maps state names, codes and FIPS ids onto one
//! [`StateCode`]; [`GeographyKey`] is the normalized county join key.
//!
//! ```
//! use evl_core::{DemandRecord, GeographyKey, HourOfDay, Kilowatts, StateCode, Year};
//!
//! let rec = DemandRecord::new(
//!     Year(2023),
//!     HourOfDay::new(5),
//!     "Travis County, TX",
//!     StateCode::parse("TX"),
//!     Kilowatts(120.0),
//! );
//! assert_eq!(rec.geography_key, GeographyKey::from_label("travis"));
//! ```

pub mod dataset;
pub mod error;
pub mod geography;
pub mod membership;
pub mod record;
pub mod states;
pub mod topology;
pub mod units;

pub use dataset::Dataset;
pub use error::{EvlError, EvlResult};
pub use geography::{normalize_geography_label, split_state_suffix, GeographyKey};
pub use membership::{strip_county_suffix, CountyMembership, MembershipEntry};
pub use record::{backfill_state, DemandRecord};
pub use states::{StateCode, StateInfo, StateRegistry};
pub use topology::{CountyFeature, Layer, StateFeature, Topology};
pub use units::{HourOfDay, Kilowatts, Year};
