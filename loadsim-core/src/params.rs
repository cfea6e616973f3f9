//! Module containing loadsim parameters and calibration constants.

use crate::imports::*;

/// Unit conversions that should NEVER change
pub const KMH_PER_MPS: f64 = 3.6;
pub const W_PER_KW: f64 = 1e3;

/// Upper edge of the validated operating envelope.  Speeds above this are
/// evaluated as if they were exactly at it.
pub const SPEED_ENVELOPE_MAX_KMH: f64 = 120.0;

/// Lower bound on effective brake thermal efficiency
pub const BTE_FLOOR: f64 = 0.10;

/// Weight of power utilization in the mechanical load blend; rotational speed
/// utilization gets the remainder
pub const MECH_PWR_WEIGHT: f64 = 0.7;
pub const MECH_RPM_WEIGHT: f64 = 0.3;

/// Gear label reported for a stationary vehicle
pub const IDLE_GEAR_LABEL: &str = "idle";

/// Endpoints (at zero speed, at envelope ceiling) of the workload blend weights
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, ApproxEq)]
pub struct BlendWeightSchedule {
    pub thermal_start: f64,
    pub thermal_end: f64,
    pub aero_start: f64,
    pub aero_end: f64,
}

pub const CRUISING_BLEND: BlendWeightSchedule = BlendWeightSchedule {
    thermal_start: 0.72,
    thermal_end: 0.45,
    aero_start: 0.08,
    aero_end: 0.35,
};

pub const ACCELERATING_BLEND: BlendWeightSchedule = BlendWeightSchedule {
    thermal_start: 0.55,
    thermal_end: 0.40,
    aero_start: 0.10,
    aero_end: 0.25,
};

impl BlendWeightSchedule {
    /// Returns `(thermal, mechanical, aerodynamic)` weights at normalized speed
    /// `s` in \[0, 1\].  The three always sum to 1.
    pub fn weights_at(&self, s: f64) -> (f64, f64, f64) {
        let s = clamp01(s);
        let w_thermal = lerp(self.thermal_start, self.thermal_end, s);
        let w_aero = lerp(self.aero_start, self.aero_end, s);
        (w_thermal, 1.0 - w_thermal - w_aero, w_aero)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, ApproxEq)]
/// Ambient physical properties used by the force model
pub struct PhysicalProperties {
    /// Sea level air density
    pub air_density_kg_per_m3: f64,
    pub a_grav_mps2: f64,
}

impl Default for PhysicalProperties {
    fn default() -> Self {
        Self {
            air_density_kg_per_m3: 1.225,
            a_grav_mps2: 9.81,
        }
    }
}

impl SerdeAPI for PhysicalProperties {
    fn init(&mut self) -> anyhow::Result<()> {
        ensure_positive!(self, air_density_kg_per_m3, a_grav_mps2);
        Ok(())
    }
}

#[cfg(test)]
mod params_test {
    use super::*;

    #[test]
    fn test_blend_weights_sum_to_one() {
        for schedule in [CRUISING_BLEND, ACCELERATING_BLEND] {
            for s in [0.0, 0.25, 0.5, 0.75, 1.0] {
                let (w_t, w_m, w_a) = schedule.weights_at(s);
                assert!(almost_eq(w_t + w_m + w_a, 1.0, None));
                assert!(w_m > 0.0);
            }
        }
    }

    #[test]
    fn test_blend_weight_endpoints() {
        let (w_t, w_m, w_a) = CRUISING_BLEND.weights_at(0.0);
        assert!(almost_eq(w_t, 0.72, None));
        assert!(almost_eq(w_a, 0.08, None));
        assert!(almost_eq(w_m, 0.20, None));
        let (w_t, w_m, w_a) = ACCELERATING_BLEND.weights_at(1.0);
        assert!(almost_eq(w_t, 0.40, None));
        assert!(almost_eq(w_a, 0.25, None));
        assert!(almost_eq(w_m, 0.35, None));
        // out-of-range normalized speed is clamped
        assert_eq!(
            CRUISING_BLEND.weights_at(2.0),
            CRUISING_BLEND.weights_at(1.0)
        );
    }

    #[test]
    fn test_physical_properties_default() {
        let props = PhysicalProperties::default();
        assert_eq!(props.a_grav_mps2, 9.81);
        assert_eq!(props.air_density_kg_per_m3, 1.225);
        let yaml = "air_density_kg_per_m3: 0.0\na_grav_mps2: 9.81\n";
        assert!(PhysicalProperties::from_yaml(yaml).is_err());
    }
}
