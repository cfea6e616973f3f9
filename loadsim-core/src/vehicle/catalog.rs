//! Built-in vehicle catalog.  Constructed once on first access and never
//! mutated afterwards.

use super::*;
use lazy_static::lazy_static;

lazy_static! {
    static ref CATALOG: VehicleCatalog = VehicleCatalog::builtin();
}

/// Read-only mapping from [`VehicleType`] to [`VehicleProfile`].  Lookup is
/// total by construction: one field per variant.
#[derive(Debug, Serialize)]
pub struct VehicleCatalog {
    commuter100: VehicleProfile,
    duke200: VehicleProfile,
    alto_k10: VehicleProfile,
}

impl VehicleCatalog {
    fn builtin() -> Self {
        Self {
            commuter100: commuter100(),
            duke200: duke200(),
            alto_k10: alto_k10(),
        }
    }

    pub fn get(&self, vehicle_type: VehicleType) -> &VehicleProfile {
        match vehicle_type {
            VehicleType::Commuter100 => &self.commuter100,
            VehicleType::Duke200 => &self.duke200,
            VehicleType::AltoK10 => &self.alto_k10,
        }
    }

    /// Iterates in [`VehicleType::ALL`] order
    pub fn iter(&self) -> impl Iterator<Item = (VehicleType, &VehicleProfile)> + '_ {
        VehicleType::ALL.into_iter().map(move |vt| (vt, self.get(vt)))
    }
}

pub fn catalog() -> &'static VehicleCatalog {
    &CATALOG
}

pub fn profile_for(vehicle_type: VehicleType) -> &'static VehicleProfile {
    CATALOG.get(vehicle_type)
}

pub fn parameters_for(vehicle_type: VehicleType) -> &'static VehicleParameters {
    &CATALOG.get(vehicle_type).params
}

pub fn gear_table_for(vehicle_type: VehicleType) -> &'static GearTable {
    &CATALOG.get(vehicle_type).gearing
}

// Built without `VehicleProfile::new`; `test_builtin_profiles_are_valid` runs
// the same checks.

fn commuter100() -> VehicleProfile {
    VehicleProfile {
        params: VehicleParameters {
            label: "100cc Air-Cooled Commuter".into(),
            mass_kerb_kg: 112.0,
            occupant_kg: 75.0,
            idle_rpm: 1200.0,
            rpm_at_max_pwr: 8000.0,
            pwr_max_kw: 5.9,
            drag_area_m2: 0.65,
            wheel_rr_coef: 0.015,
            drivetrain_eff: 0.96,
            bte_max: 0.2,
            bte_low_load_penalty: 0.2,
            pwr_parasitic_kw: 0.12,
            pwr_engine_floor_watts: 900.0,
            accel_mps2: 1.2,
            friction: FrictionModel {
                k0_watts: 240.0,
                k1_watts_per_rpm: 0.035,
                k2_watts_per_rpm2: 0.00001,
            },
            cooling: CoolingModel {
                base_watts: 2800.0,
                slope_watts: 900.0,
                speed_exp: 0.8,
            },
        },
        gearing: GearTable {
            brackets: vec![
                GearBracket::new(17.49, 320.0, "1st"),
                GearBracket::new(24.1, 171.5, "2nd"),
                GearBracket::new(31.14, 124.5, "3rd"),
                GearBracket::top(96.33, "4th"),
            ],
        },
    }
}

fn duke200() -> VehicleProfile {
    VehicleProfile {
        params: VehicleParameters {
            label: "200cc KTM Duke (Liquid-Cooled)".into(),
            mass_kerb_kg: 159.0,
            occupant_kg: 75.0,
            idle_rpm: 1500.0,
            rpm_at_max_pwr: 10000.0,
            pwr_max_kw: 18.4,
            drag_area_m2: 0.55,
            wheel_rr_coef: 0.015,
            drivetrain_eff: 0.96,
            bte_max: 0.24,
            bte_low_load_penalty: 0.1,
            pwr_parasitic_kw: 0.2,
            pwr_engine_floor_watts: 1100.0,
            accel_mps2: 1.6,
            friction: FrictionModel {
                k0_watts: 180.0,
                k1_watts_per_rpm: 0.015,
                k2_watts_per_rpm2: 0.000002,
            },
            cooling: CoolingModel {
                base_watts: 8500.0,
                slope_watts: 1600.0,
                speed_exp: 0.75,
            },
        },
        gearing: GearTable {
            brackets: vec![
                GearBracket::new(22.73, 241.2, "1st"),
                GearBracket::new(30.2, 176.0, "2nd"),
                GearBracket::new(37.95, 132.4, "3rd"),
                GearBracket::new(44.94, 105.4, "4th"),
                GearBracket::new(51.25, 89.01, "5th"),
                GearBracket::top(78.04, "6th"),
            ],
        },
    }
}

fn alto_k10() -> VehicleProfile {
    VehicleProfile {
        params: VehicleParameters {
            label: "Maruti Alto K10 (AC ON)".into(),
            mass_kerb_kg: 790.0,
            occupant_kg: 75.0,
            idle_rpm: 800.0,
            rpm_at_max_pwr: 5500.0,
            pwr_max_kw: 49.0,
            drag_area_m2: 0.61,
            wheel_rr_coef: 0.012,
            drivetrain_eff: 0.85,
            bte_max: 0.27,
            bte_low_load_penalty: 0.2,
            pwr_parasitic_kw: 1.8,
            pwr_engine_floor_watts: 1700.0,
            accel_mps2: 1.0,
            friction: FrictionModel {
                k0_watts: 650.0,
                k1_watts_per_rpm: 0.05,
                k2_watts_per_rpm2: 0.000004,
            },
            cooling: CoolingModel {
                base_watts: 15000.0,
                slope_watts: 4000.0,
                speed_exp: 0.9,
            },
        },
        gearing: GearTable {
            brackets: vec![
                GearBracket::new(15.4, 233.0, "1st"),
                GearBracket::new(22.5, 117.0, "2nd"),
                GearBracket::new(40.9, 80.0, "3rd"),
                GearBracket::new(60.0, 44.0, "4th"),
                GearBracket::top(30.0, "5th"),
            ],
        },
    }
}
