//! Speed-to-engine-state resolution

use crate::imports::*;
use crate::vehicle::{profile_for, VehicleType};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ApproxEq)]
/// Inferred engine operating point
pub struct EngineState {
    /// Engine rotational speed, never below idle
    pub rpm: f64,
    /// Selected gear, or `"idle"` when stationary
    pub gear_label: String,
}

impl EngineState {
    pub fn is_idle(&self) -> bool {
        self.gear_label == IDLE_GEAR_LABEL
    }
}

/// Infers engine speed and gear for a catalog vehicle at `speed_kmh`.
/// See [`VehicleProfile::engine_state`](crate::vehicle::VehicleProfile::engine_state).
pub fn resolve_engine_state(
    vehicle_type: VehicleType,
    speed_kmh: f64,
) -> anyhow::Result<EngineState> {
    profile_for(vehicle_type).engine_state(speed_kmh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::parameters_for;

    #[test]
    fn test_idle_at_standstill() {
        for vt in VehicleType::ALL {
            let state = resolve_engine_state(vt, 0.0).unwrap();
            assert_eq!(state.rpm, parameters_for(vt).idle_rpm);
            assert!(state.is_idle());
        }
    }

    #[test]
    fn test_negative_speed_is_standstill() {
        assert_eq!(
            resolve_engine_state(VehicleType::Duke200, -15.0).unwrap(),
            resolve_engine_state(VehicleType::Duke200, 0.0).unwrap()
        );
    }

    #[test]
    fn test_commuter_shift_points() {
        let cases = [
            (10.0, 3200.0, "1st"),
            (17.49, 17.49 * 171.5, "2nd"),
            (20.0, 3430.0, "2nd"),
            (30.0, 30.0 * 124.5, "3rd"),
            (70.0, 70.0 * 96.33, "4th"),
            (120.0, 120.0 * 96.33, "4th"),
        ];
        for (speed, rpm, gear) in cases {
            let state = resolve_engine_state(VehicleType::Commuter100, speed).unwrap();
            assert!(almost_eq(state.rpm, rpm, None), "{speed}: {}", state.rpm);
            assert_eq!(state.gear_label, gear);
        }
    }

    #[test]
    fn test_top_gear_is_open_ended() {
        let state = resolve_engine_state(VehicleType::AltoK10, 200.0).unwrap();
        assert_eq!(state.gear_label, "5th");
        assert!(almost_eq(state.rpm, 6000.0, None));
        let state = resolve_engine_state(VehicleType::Duke200, 70.0).unwrap();
        assert_eq!(state.gear_label, "6th");
        assert!(almost_eq(state.rpm, 5462.8, None));
    }

    #[test]
    fn test_rpm_never_below_idle() {
        for vt in VehicleType::ALL {
            let idle = parameters_for(vt).idle_rpm;
            for speed in (0..=130).map(|s| s as f64 * 0.5) {
                assert!(resolve_engine_state(vt, speed).unwrap().rpm >= idle);
            }
        }
    }

    #[test]
    fn test_non_finite_speed_rejected() {
        for speed in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = resolve_engine_state(VehicleType::AltoK10, speed).unwrap_err();
            assert!(err.to_string().contains("speed must be finite"));
        }
    }
}
