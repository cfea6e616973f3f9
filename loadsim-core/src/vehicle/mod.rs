//! Module containing the vehicle parameter model, gear tables, and the
//! built-in vehicle catalog

pub(crate) use crate::imports::*;

pub mod catalog;
pub mod gearing;
pub mod vehicle_params;
pub mod vehicle_profile;

pub use catalog::{catalog, gear_table_for, parameters_for, profile_for, VehicleCatalog};
pub use gearing::{GearBracket, GearTable};
pub use vehicle_params::{CoolingModel, FrictionModel, VehicleParameters};
pub use vehicle_profile::VehicleProfile;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ApproxEq,
)]
/// Closed set of vehicles available in the built-in catalog
pub enum VehicleType {
    /// 100cc air-cooled commuter motorcycle
    #[serde(rename = "commuter100")]
    Commuter100,
    /// 200cc liquid-cooled motorcycle
    #[serde(rename = "duke200")]
    Duke200,
    /// Small passenger car with air conditioning running
    #[serde(rename = "altoK10")]
    AltoK10,
}

impl VehicleType {
    /// Canonical ordering used for comparisons and reports
    pub const ALL: [VehicleType; 3] = [Self::Commuter100, Self::Duke200, Self::AltoK10];

    /// Stable identifier, as accepted by [`FromStr`]
    pub fn id(&self) -> &'static str {
        match self {
            Self::Commuter100 => "commuter100",
            Self::Duke200 => "duke200",
            Self::AltoK10 => "altoK10",
        }
    }

    /// Human-readable display label from the catalog
    pub fn label(&self) -> &'static str {
        parameters_for(*self).label.as_str()
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for VehicleType {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> anyhow::Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|vt| vt.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                anyhow!(
                    "unknown vehicle type {s:?}, must be one of {:?}",
                    Self::ALL.map(|vt| vt.id())
                )
            })
    }
}

impl TryFrom<String> for VehicleType {
    type Error = anyhow::Error;
    fn try_from(value: String) -> anyhow::Result<VehicleType> {
        value.parse()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ApproxEq)]
/// Driving mode for a single point-in-time evaluation
pub enum DriveState {
    /// Steady speed, no net longitudinal acceleration demand
    #[default]
    #[serde(rename = "cruising")]
    Cruising,
    /// Vehicle-specific acceleration demand applied on top of road load
    #[serde(rename = "accelerating", alias = "acceleration")]
    Accelerating,
}

impl DriveState {
    pub const ALL: [DriveState; 2] = [Self::Cruising, Self::Accelerating];

    pub fn id(&self) -> &'static str {
        match self {
            Self::Cruising => "cruising",
            Self::Accelerating => "accelerating",
        }
    }

    /// Workload blend weight schedule for this state
    pub fn blend_schedule(&self) -> &'static BlendWeightSchedule {
        match self {
            Self::Cruising => &CRUISING_BLEND,
            Self::Accelerating => &ACCELERATING_BLEND,
        }
    }
}

impl fmt::Display for DriveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for DriveState {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "cruising" | "cruise" => Ok(Self::Cruising),
            "accelerating" | "acceleration" | "accel" => Ok(Self::Accelerating),
            _ => bail!(
                "unknown drive state {s:?}, must be one of {:?}",
                Self::ALL.map(|ds| ds.id())
            ),
        }
    }
}

impl TryFrom<String> for DriveState {
    type Error = anyhow::Error;
    fn try_from(value: String) -> anyhow::Result<DriveState> {
        value.parse()
    }
}
