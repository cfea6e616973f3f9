use super::*;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate, ApproxEq)]
/// Engine friction power as a quadratic in engine speed:
/// `k0 + k1 * rpm + k2 * rpm^2`
pub struct FrictionModel {
    /// constant term \[W\]
    #[validate(range(min = 0.0))]
    pub k0_watts: f64,
    /// linear term \[W/rpm\]
    #[validate(range(min = 0.0))]
    pub k1_watts_per_rpm: f64,
    /// quadratic term \[W/rpm^2\]
    #[validate(range(min = 0.0))]
    pub k2_watts_per_rpm2: f64,
}

impl FrictionModel {
    /// Friction power at `rpm`
    pub fn pwr_watts(&self, rpm: f64) -> f64 {
        self.k0_watts + self.k1_watts_per_rpm * rpm + self.k2_watts_per_rpm2 * rpm.powi(2)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate, ApproxEq)]
/// Heat rejection capacity: `base + slope * speed^exponent`, speed in m/s
pub struct CoolingModel {
    /// heat rejection when stationary \[W\]
    #[validate(range(min = 0.0))]
    pub base_watts: f64,
    /// gain from ram air \[W/(m/s)^exponent\]
    #[validate(range(min = 0.0))]
    pub slope_watts: f64,
    #[validate(range(min = 0.0))]
    pub speed_exp: f64,
}

impl CoolingModel {
    /// Cooling capacity at vehicle speed `speed_mps`
    pub fn capacity_watts(&self, speed_mps: f64) -> f64 {
        self.base_watts + self.slope_watts * speed_mps.powf(self.speed_exp)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate, ApproxEq)]
/// Physical and engine constants for one vehicle
pub struct VehicleParameters {
    /// Display label
    pub label: String,
    /// Kerb mass
    #[validate(range(min = 0.0))]
    pub mass_kerb_kg: f64,
    /// Nominal occupant mass, added to kerb mass in all force calculations
    #[validate(range(min = 0.0))]
    pub occupant_kg: f64,
    #[validate(range(min = 0.0))]
    pub idle_rpm: f64,
    /// Engine speed at which peak power is produced
    #[validate(range(min = 0.0))]
    pub rpm_at_max_pwr: f64,
    /// Peak engine power
    #[validate(range(min = 0.0))]
    pub pwr_max_kw: f64,
    /// Drag coefficient times frontal area
    #[validate(range(min = 0.0))]
    pub drag_area_m2: f64,
    /// Rolling resistance coefficient
    #[validate(range(min = 0.0, max = 1.0))]
    pub wheel_rr_coef: f64,
    /// Fraction of engine output delivered to the wheels
    #[validate(range(min = 0.0, max = 1.0))]
    pub drivetrain_eff: f64,
    /// Peak brake thermal efficiency
    #[validate(range(min = 0.0, max = 1.0))]
    pub bte_max: f64,
    /// Fractional efficiency loss at zero power utilization
    #[validate(range(min = 0.0, max = 1.0))]
    pub bte_low_load_penalty: f64,
    /// Accessory and parasitic draw
    #[validate(range(min = 0.0))]
    pub pwr_parasitic_kw: f64,
    /// Minimum engine power, even with zero propulsive demand
    #[validate(range(min = 0.0))]
    pub pwr_engine_floor_watts: f64,
    /// Acceleration demand applied only when accelerating
    #[validate(range(min = 0.0))]
    pub accel_mps2: f64,
    #[validate]
    pub friction: FrictionModel,
    #[validate]
    pub cooling: CoolingModel,
}

impl SerdeAPI for VehicleParameters {
    fn init(&mut self) -> anyhow::Result<()> {
        self.validate()
            .with_context(|| format!("invalid parameters for {:?}", self.label))?;
        ensure_positive!(
            self,
            mass_kerb_kg,
            idle_rpm,
            rpm_at_max_pwr,
            pwr_max_kw,
            drivetrain_eff,
            bte_max,
            accel_mps2,
        );
        ensure!(
            self.cooling.base_watts > 0.0,
            "{}\ncooling capacity must be > 0 at standstill",
            format_dbg!(self.cooling.base_watts)
        );
        ensure!(
            self.idle_rpm < self.rpm_at_max_pwr,
            "{}\nidle speed must be below the speed at peak power",
            format_dbg!(self.idle_rpm < self.rpm_at_max_pwr)
        );
        Ok(())
    }
}

impl VehicleParameters {
    /// Mass used in all force equations: kerb plus occupant
    pub fn mass_kg(&self) -> f64 {
        self.mass_kerb_kg + self.occupant_kg
    }

    pub fn pwr_max_watts(&self) -> f64 {
        self.pwr_max_kw * W_PER_KW
    }

    pub fn pwr_parasitic_watts(&self) -> f64 {
        self.pwr_parasitic_kw * W_PER_KW
    }

    /// Rolling resistance force, independent of speed
    pub fn force_rr_newtons(&self, props: &PhysicalProperties) -> f64 {
        self.mass_kg() * props.a_grav_mps2 * self.wheel_rr_coef
    }

    /// Aerodynamic drag force at `speed_mps`
    pub fn force_aero_newtons(&self, props: &PhysicalProperties, speed_mps: f64) -> f64 {
        0.5 * props.air_density_kg_per_m3 * self.drag_area_m2 * speed_mps.powi(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_params() -> VehicleParameters {
        parameters_for(VehicleType::Commuter100).clone()
    }

    #[test]
    fn test_friction_and_cooling_models() {
        let params = mock_params();
        assert!(almost_eq(params.friction.pwr_watts(0.0), 240.0, None));
        // 240 + 0.035 * 1000 + 1e-5 * 1e6
        assert!(almost_eq(params.friction.pwr_watts(1000.0), 285.0, None));
        assert!(almost_eq(params.cooling.capacity_watts(0.0), 2800.0, None));
        assert!(almost_eq(params.cooling.capacity_watts(1.0), 3700.0, None));
    }

    #[test]
    fn test_forces() {
        let params = mock_params();
        let props = PhysicalProperties::default();
        assert!(almost_eq(params.mass_kg(), 187.0, None));
        assert!(almost_eq(
            params.force_rr_newtons(&props),
            187.0 * 9.81 * 0.015,
            None
        ));
        assert_eq!(params.force_aero_newtons(&props, 0.0), 0.0);
        assert!(almost_eq(
            params.force_aero_newtons(&props, 10.0),
            0.5 * 1.225 * 0.65 * 100.0,
            None
        ));
    }

    #[test]
    fn test_validation_rejects_bad_inputs() {
        let mut params = mock_params();
        params.drivetrain_eff = 1.5;
        let err = params.init().unwrap_err();
        assert!(err.to_string().contains("invalid parameters"));

        let mut params = mock_params();
        params.pwr_max_kw = 0.0;
        assert!(params.init().is_err());

        let mut params = mock_params();
        params.friction.k1_watts_per_rpm = -0.1;
        assert!(params.init().is_err());

        let mut params = mock_params();
        params.idle_rpm = params.rpm_at_max_pwr + 1.0;
        assert!(params.init().is_err());
    }

    #[test]
    fn test_yaml_round_trip_validates() {
        let params = mock_params();
        let yaml = params.to_yaml().unwrap();
        assert_eq!(VehicleParameters::from_yaml(&yaml).unwrap(), params);
        let bad = yaml.replace("bte_max: 0.2", "bte_max: -0.2");
        assert!(VehicleParameters::from_yaml(bad).is_err());
    }
}
