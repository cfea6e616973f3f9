//! Crate containing a point-in-time model of how hard a road vehicle's engine
//! and drivetrain are worked at a given speed and drive state
//! # Features:
//! - logging: enable this feature to emit `log` records from batch runs and
//!   the self-check harness (on by default)
//!
//! # Example
//! ```
//! use loadsim_core::prelude::*;
//!
//! let metrics = derive_load(VehicleType::Duke200, 70.0, DriveState::Cruising).unwrap();
//! assert_eq!(metrics.gear_label, "6th");
//! assert!((0.0..=100.0).contains(&metrics.total_workload_pct));
//! ```

#[macro_use]
pub mod macros;

pub mod engine_state;
pub mod imports;
pub mod load;
pub mod params;
pub mod prelude;
pub mod sanity;
pub mod sweep;
pub mod traits;
pub mod utils;
pub mod vehicle;
