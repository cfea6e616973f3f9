//! Load derivation: road load forces, engine power, efficiency and heat, and
//! the normalized workload indicators built from them

use crate::engine_state::EngineState;
use crate::imports::*;
use crate::vehicle::{profile_for, DriveState, VehicleProfile, VehicleType};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ApproxEq)]
/// Rounded load indicators for one vehicle at one speed and drive state
pub struct LoadMetrics {
    /// Engine speed, rounded to 0.1 rpm
    pub rpm: f64,
    pub gear_label: String,
    /// Waste heat relative to cooling capacity \[%\]
    pub thermal_stress_pct: f64,
    /// Blend of power and engine speed utilization \[%\]
    pub mechanical_load_pct: f64,
    /// Drag force relative to drag at the envelope ceiling \[%\]
    pub aerodynamic_load_pct: f64,
    /// Weighted composite of the other three \[%\]
    pub total_workload_pct: f64,
}

impl SerdeAPI for LoadMetrics {
    fn init(&mut self) -> anyhow::Result<()> {
        for (name, pct) in [
            ("thermal_stress_pct", self.thermal_stress_pct),
            ("mechanical_load_pct", self.mechanical_load_pct),
            ("aerodynamic_load_pct", self.aerodynamic_load_pct),
            ("total_workload_pct", self.total_workload_pct),
        ] {
            ensure!(
                (0.0..=100.0).contains(&pct),
                "{}\n`{name}` must be within [0, 100]",
                format_dbg!(pct)
            );
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ApproxEq)]
/// Component of the workload that contributes the most
pub enum DominantLoad {
    Thermal,
    Mechanical,
    Aerodynamic,
}

impl fmt::Display for DominantLoad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Thermal => "Thermal",
            Self::Mechanical => "Mechanical",
            Self::Aerodynamic => "Aerodynamic",
        };
        write!(f, "Mostly {name}")
    }
}

impl LoadMetrics {
    /// Largest of the three component indicators.  Ties go to thermal, then
    /// mechanical.
    pub fn dominant_load(&self) -> DominantLoad {
        let mut dominant = (DominantLoad::Thermal, self.thermal_stress_pct);
        for candidate in [
            (DominantLoad::Mechanical, self.mechanical_load_pct),
            (DominantLoad::Aerodynamic, self.aerodynamic_load_pct),
        ] {
            if candidate.1 > dominant.1 {
                dominant = candidate;
            }
        }
        dominant.0
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ApproxEq)]
/// Unrounded intermediate values of one load evaluation
pub struct LoadState {
    /// road speed after clamping to the operating envelope
    pub speed_kmh: f64,
    pub speed_mps: f64,
    pub mass_kg: f64,
    pub force_rr_newtons: f64,
    pub force_aero_newtons: f64,
    /// zero unless accelerating
    pub force_inertia_newtons: f64,
    pub force_total_newtons: f64,
    /// propulsive power demand at the wheels
    pub pwr_wheel_watts: f64,
    pub rpm: f64,
    pub gear_label: String,
    pub pwr_friction_watts: f64,
    /// engine power before the minimum power floor is applied
    pub pwr_engine_raw_watts: f64,
    pub pwr_engine_watts: f64,
    /// engine power over peak power, in \[0, 1\]
    pub pwr_utilization: f64,
    /// effective brake thermal efficiency
    pub bte: f64,
    pub pwr_waste_heat_watts: f64,
    pub pwr_cooling_watts: f64,
    /// squared engine speed over speed at peak power, in \[0, 1\]
    pub rpm_utilization: f64,
    pub thermal_frac: f64,
    pub mechanical_frac: f64,
    pub aero_frac: f64,
    pub weight_thermal: f64,
    pub weight_mechanical: f64,
    pub weight_aero: f64,
    pub workload_frac: f64,
}

impl LoadState {
    /// Scales fractions to percent and rounds everything to one decimal place
    pub fn metrics(&self) -> LoadMetrics {
        LoadMetrics {
            rpm: round1(self.rpm),
            gear_label: self.gear_label.clone(),
            thermal_stress_pct: round1(100.0 * self.thermal_frac),
            mechanical_load_pct: round1(100.0 * self.mechanical_frac),
            aerodynamic_load_pct: round1(100.0 * self.aero_frac),
            total_workload_pct: round1(100.0 * self.workload_frac),
        }
    }
}

impl VehicleProfile {
    /// Runs the load pipeline with default [`PhysicalProperties`].
    /// Speed is clamped to \[0, [`SPEED_ENVELOPE_MAX_KMH`]\].
    ///
    /// # Errors
    /// If `speed_kmh` is NaN or infinite.
    pub fn solve_load(&self, speed_kmh: f64, drive_state: DriveState) -> anyhow::Result<LoadState> {
        self.solve_load_with_props(&PhysicalProperties::default(), speed_kmh, drive_state)
    }

    pub fn solve_load_with_props(
        &self,
        props: &PhysicalProperties,
        speed_kmh: f64,
        drive_state: DriveState,
    ) -> anyhow::Result<LoadState> {
        ensure!(
            speed_kmh.is_finite(),
            "{}\nspeed must be finite",
            format_dbg!(speed_kmh)
        );
        let params = &self.params;
        let speed_kmh = clamp(speed_kmh, 0.0, SPEED_ENVELOPE_MAX_KMH);
        let speed_mps = kmh_to_mps(speed_kmh);
        let mass_kg = params.mass_kg();

        let force_rr_newtons = params.force_rr_newtons(props);
        let force_aero_newtons = params.force_aero_newtons(props, speed_mps);
        let force_inertia_newtons = match drive_state {
            DriveState::Cruising => 0.0,
            DriveState::Accelerating => mass_kg * params.accel_mps2,
        };
        let force_total_newtons = force_rr_newtons + force_aero_newtons + force_inertia_newtons;
        let pwr_wheel_watts = force_total_newtons * speed_mps;

        let EngineState { rpm, gear_label } = self.engine_state(speed_kmh)?;
        let pwr_friction_watts = params.friction.pwr_watts(rpm);
        let pwr_engine_raw_watts = pwr_wheel_watts / params.drivetrain_eff
            + params.pwr_parasitic_watts()
            + pwr_friction_watts;
        let pwr_engine_watts = pwr_engine_raw_watts.max(params.pwr_engine_floor_watts);

        let pwr_utilization = clamp01(pwr_engine_watts / params.pwr_max_watts());
        let bte = clamp(
            params.bte_max * (1.0 - params.bte_low_load_penalty * (1.0 - pwr_utilization)),
            BTE_FLOOR,
            params.bte_max,
        );
        let pwr_waste_heat_watts = pwr_engine_watts * (1.0 / bte - 1.0);
        let pwr_cooling_watts = params.cooling.capacity_watts(speed_mps);
        let thermal_frac = clamp01(pwr_waste_heat_watts / pwr_cooling_watts);

        let rpm_utilization = clamp01((rpm / params.rpm_at_max_pwr).powi(2));
        let mechanical_frac =
            clamp01(MECH_PWR_WEIGHT * pwr_utilization + MECH_RPM_WEIGHT * rpm_utilization);

        let force_aero_ceiling_newtons =
            params.force_aero_newtons(props, kmh_to_mps(SPEED_ENVELOPE_MAX_KMH));
        let aero_frac = clamp01(force_aero_newtons / force_aero_ceiling_newtons);

        let (weight_thermal, weight_mechanical, weight_aero) = drive_state
            .blend_schedule()
            .weights_at(speed_kmh / SPEED_ENVELOPE_MAX_KMH);
        let workload_frac = clamp01(
            weight_thermal * thermal_frac
                + weight_mechanical * mechanical_frac
                + weight_aero * aero_frac,
        );

        Ok(LoadState {
            speed_kmh,
            speed_mps,
            mass_kg,
            force_rr_newtons,
            force_aero_newtons,
            force_inertia_newtons,
            force_total_newtons,
            pwr_wheel_watts,
            rpm,
            gear_label,
            pwr_friction_watts,
            pwr_engine_raw_watts,
            pwr_engine_watts,
            pwr_utilization,
            bte,
            pwr_waste_heat_watts,
            pwr_cooling_watts,
            rpm_utilization,
            thermal_frac,
            mechanical_frac,
            aero_frac,
            weight_thermal,
            weight_mechanical,
            weight_aero,
            workload_frac,
        })
    }

    /// Rounded load indicators for this profile
    pub fn derive_load(
        &self,
        speed_kmh: f64,
        drive_state: DriveState,
    ) -> anyhow::Result<LoadMetrics> {
        Ok(self.solve_load(speed_kmh, drive_state)?.metrics())
    }
}

/// Rounded load indicators for a catalog vehicle at `speed_kmh` in `drive_state`.
///
/// Speeds outside \[0, 120\] km/h are clamped.
///
/// # Errors
/// If `speed_kmh` is NaN or infinite; nothing is computed in that case.
pub fn derive_load(
    vehicle_type: VehicleType,
    speed_kmh: f64,
    drive_state: DriveState,
) -> anyhow::Result<LoadMetrics> {
    profile_for(vehicle_type).derive_load(speed_kmh, drive_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::parameters_for;

    fn metrics(vt: VehicleType, speed: f64, ds: DriveState) -> LoadMetrics {
        derive_load(vt, speed, ds).unwrap()
    }

    #[test]
    fn test_commuter_reference_point() {
        let m = metrics(VehicleType::Commuter100, 20.0, DriveState::Cruising);
        assert_eq!(
            m,
            LoadMetrics {
                rpm: 3430.0,
                gear_label: "2nd".into(),
                thermal_stress_pct: 71.2,
                mechanical_load_pct: 16.2,
                aerodynamic_load_pct: 2.8,
                total_workload_pct: 51.6,
            }
        );
    }

    #[test]
    fn test_duke_reference_point() {
        let m = metrics(VehicleType::Duke200, 70.0, DriveState::Cruising);
        assert_eq!(m.rpm, 5462.8);
        assert_eq!(m.gear_label, "6th");
        assert_eq!(m.thermal_stress_pct, 57.4);
        assert_eq!(m.mechanical_load_pct, 23.4);
        assert_eq!(m.aerodynamic_load_pct, 34.0);
        assert_eq!(m.total_workload_pct, 45.1);
    }

    #[test]
    fn test_alto_reference_points() {
        let m = metrics(VehicleType::AltoK10, 70.0, DriveState::Accelerating);
        assert_eq!(m.gear_label, "5th");
        assert_eq!(m.rpm, 2100.0);
        assert_eq!(m.thermal_stress_pct, 100.0);
        assert_eq!(m.mechanical_load_pct, 44.3);
        assert_eq!(m.total_workload_pct, 68.1);
        let m = metrics(VehicleType::AltoK10, 120.0, DriveState::Cruising);
        assert_eq!(m.thermal_stress_pct, 66.3);
        assert_eq!(m.mechanical_load_pct, 45.6);
        assert_eq!(m.aerodynamic_load_pct, 100.0);
        assert_eq!(m.total_workload_pct, 74.0);
    }

    #[test]
    fn test_standstill() {
        for vt in VehicleType::ALL {
            for ds in DriveState::ALL {
                let state = profile_for(vt).solve_load(0.0, ds).unwrap();
                assert_eq!(state.pwr_wheel_watts, 0.0);
                assert_eq!(state.rpm, parameters_for(vt).idle_rpm);
                assert_eq!(state.gear_label, IDLE_GEAR_LABEL);
                assert_eq!(state.aero_frac, 0.0);
            }
        }
    }

    #[test]
    fn test_engine_power_floor() {
        // at standstill the commuter only draws parasitic + friction power,
        // 120 + 240 + 0.035 * 1200 + 1e-5 * 1200^2 = 416.4 W, below its 900 W floor
        let state = profile_for(VehicleType::Commuter100)
            .solve_load(0.0, DriveState::Cruising)
            .unwrap();
        assert!(almost_eq(state.pwr_engine_raw_watts, 416.4, Some(1e-9)));
        assert_eq!(state.pwr_engine_watts, 900.0);
    }

    #[test]
    fn test_efficiency_bounds() {
        for vt in VehicleType::ALL {
            let bte_max = parameters_for(vt).bte_max;
            for ds in DriveState::ALL {
                for speed in [0.0, 35.0, 80.0, 120.0] {
                    let state = profile_for(vt).solve_load(speed, ds).unwrap();
                    assert!(state.bte >= BTE_FLOOR && state.bte <= bte_max);
                    assert!(state.pwr_waste_heat_watts > 0.0);
                }
            }
        }
    }

    #[test]
    fn test_efficiency_floor_wins_over_low_peak() {
        // peak efficiency below the floor: the floor applies
        let mut profile = profile_for(VehicleType::AltoK10).clone();
        profile.params.bte_max = 0.08;
        let yaml = profile.to_yaml().unwrap();
        let profile = VehicleProfile::from_yaml(yaml).unwrap();
        let state = profile.solve_load(70.0, DriveState::Cruising).unwrap();
        assert_eq!(state.bte, BTE_FLOOR);
        assert!(almost_eq(
            state.pwr_waste_heat_watts,
            9.0 * state.pwr_engine_watts,
            None
        ));
    }

    #[test]
    fn test_inertia_only_when_accelerating() {
        let profile = profile_for(VehicleType::Duke200);
        let cruise = profile.solve_load(50.0, DriveState::Cruising).unwrap();
        let accel = profile.solve_load(50.0, DriveState::Accelerating).unwrap();
        assert_eq!(cruise.force_inertia_newtons, 0.0);
        assert!(almost_eq(accel.force_inertia_newtons, 234.0 * 1.6, None));
        assert_eq!(cruise.force_aero_newtons, accel.force_aero_newtons);
        assert!(accel.pwr_engine_watts > cruise.pwr_engine_watts);
    }

    #[test]
    fn test_weights_sum_to_one() {
        for ds in DriveState::ALL {
            let state = profile_for(VehicleType::AltoK10)
                .solve_load(45.0, ds)
                .unwrap();
            assert!(almost_eq(
                state.weight_thermal + state.weight_mechanical + state.weight_aero,
                1.0,
                None
            ));
        }
    }

    #[test]
    fn test_speed_clamping() {
        for vt in VehicleType::ALL {
            for ds in DriveState::ALL {
                assert_eq!(metrics(vt, 150.0, ds), metrics(vt, 120.0, ds));
                assert_eq!(metrics(vt, -10.0, ds), metrics(vt, 0.0, ds));
            }
        }
        let state = profile_for(VehicleType::Duke200)
            .solve_load(1e9, DriveState::Cruising)
            .unwrap();
        assert_eq!(state.speed_kmh, SPEED_ENVELOPE_MAX_KMH);
    }

    #[test]
    fn test_non_finite_speed_rejected() {
        for speed in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(derive_load(VehicleType::Commuter100, speed, DriveState::Cruising).is_err());
        }
    }

    #[test]
    fn test_custom_props() {
        let profile = profile_for(VehicleType::AltoK10);
        let thin_air = PhysicalProperties {
            air_density_kg_per_m3: 0.9,
            ..Default::default()
        };
        let base = profile.solve_load(90.0, DriveState::Cruising).unwrap();
        let thin = profile
            .solve_load_with_props(&thin_air, 90.0, DriveState::Cruising)
            .unwrap();
        assert!(thin.force_aero_newtons < base.force_aero_newtons);
        // normalized against the same air, so the fraction is unchanged
        assert!(almost_eq(thin.aero_frac, base.aero_frac, None));
    }

    #[test]
    fn test_dominant_load() {
        let mut m = metrics(VehicleType::Commuter100, 70.0, DriveState::Cruising);
        assert_eq!(m.dominant_load(), DominantLoad::Thermal);
        assert_eq!(m.dominant_load().to_string(), "Mostly Thermal");
        m.thermal_stress_pct = 10.0;
        m.mechanical_load_pct = 10.0;
        m.aerodynamic_load_pct = 5.0;
        assert_eq!(m.dominant_load(), DominantLoad::Thermal);
        m.aerodynamic_load_pct = 50.0;
        assert_eq!(m.dominant_load(), DominantLoad::Aerodynamic);
    }

    #[test]
    fn test_metrics_serde() {
        let m = metrics(VehicleType::Duke200, 35.0, DriveState::Accelerating);
        let json = m.to_json().unwrap();
        assert_eq!(LoadMetrics::from_json(&json).unwrap(), m);
        let mut bad = m.clone();
        bad.total_workload_pct = 101.0;
        assert!(LoadMetrics::from_yaml(bad.to_yaml().unwrap()).is_err());
    }
}
