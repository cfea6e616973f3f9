//! Convenience re-exports for downstream crates

pub use crate::engine_state::{resolve_engine_state, EngineState};
pub use crate::load::{derive_load, DominantLoad, LoadMetrics, LoadState};
pub use crate::params::{PhysicalProperties, SPEED_ENVELOPE_MAX_KMH};
pub use crate::sanity::{run_sanity_check, SanityCheck, SanityReport, SanityRow};
pub use crate::sweep::{compare_vehicles, write_csv, LoadSweep, SweepRow, VehicleComparison};
pub use crate::traits::{ApproxEq, SerdeAPI};
pub use crate::vehicle::{
    catalog, gear_table_for, parameters_for, profile_for, CoolingModel, DriveState, FrictionModel,
    GearBracket, GearTable, VehicleCatalog, VehicleParameters, VehicleProfile, VehicleType,
};
