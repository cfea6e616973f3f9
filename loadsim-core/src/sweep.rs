//! Batch evaluation: one profile over a speed grid, or every catalog vehicle
//! at one operating point

use crate::imports::*;
use crate::load::LoadMetrics;
use crate::vehicle::{catalog, DriveState, VehicleProfile, VehicleType};
use ndarray::Array1;
use rayon::prelude::*;

/// Upper bound on the number of points [`LoadSweep::over_envelope`] will generate
pub const SWEEP_MAX_POINTS: usize = 100_000;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// Evaluates one profile and drive state over a grid of speeds
pub struct LoadSweep {
    pub profile: VehicleProfile,
    pub drive_state: DriveState,
    pub speeds_kmh: Array1<f64>,
}

impl SerdeAPI for LoadSweep {
    fn init(&mut self) -> anyhow::Result<()> {
        self.profile.init()?;
        ensure!(
            self.speeds_kmh.iter().all(|s| s.is_finite()),
            "{}\nsweep speeds must be finite",
            format_dbg!(self.speeds_kmh)
        );
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ApproxEq)]
/// One row of sweep output; flat so it can be written as CSV
pub struct SweepRow {
    pub speed_kmh: f64,
    pub drive_state: DriveState,
    pub rpm: f64,
    pub gear_label: String,
    pub thermal_stress_pct: f64,
    pub mechanical_load_pct: f64,
    pub aerodynamic_load_pct: f64,
    pub total_workload_pct: f64,
}

impl SweepRow {
    fn new(speed_kmh: f64, drive_state: DriveState, metrics: LoadMetrics) -> Self {
        Self {
            speed_kmh,
            drive_state,
            rpm: metrics.rpm,
            gear_label: metrics.gear_label,
            thermal_stress_pct: metrics.thermal_stress_pct,
            mechanical_load_pct: metrics.mechanical_load_pct,
            aerodynamic_load_pct: metrics.aerodynamic_load_pct,
            total_workload_pct: metrics.total_workload_pct,
        }
    }
}

impl LoadSweep {
    pub fn new(
        profile: VehicleProfile,
        drive_state: DriveState,
        speeds_kmh: Array1<f64>,
    ) -> anyhow::Result<Self> {
        let mut sweep = Self {
            profile,
            drive_state,
            speeds_kmh,
        };
        sweep.init()?;
        Ok(sweep)
    }

    /// Sweep from 0 to the envelope ceiling (inclusive) in steps of `step_kmh`
    pub fn over_envelope(
        profile: VehicleProfile,
        drive_state: DriveState,
        step_kmh: f64,
    ) -> anyhow::Result<Self> {
        ensure!(
            step_kmh.is_finite() && step_kmh > 0.0,
            "{}\nsweep step must be > 0",
            format_dbg!(step_kmh)
        );
        let n_steps = (SPEED_ENVELOPE_MAX_KMH / step_kmh).floor();
        ensure!(
            n_steps < SWEEP_MAX_POINTS as f64,
            "{}\nsweep step too small, grid would exceed {SWEEP_MAX_POINTS} points",
            format_dbg!(step_kmh)
        );
        let n = n_steps as usize;
        let mut speeds: Vec<f64> = (0..=n).map(|i| i as f64 * step_kmh).collect();
        if speeds
            .last()
            .map_or(true, |&s| !almost_eq(s, SPEED_ENVELOPE_MAX_KMH, None))
        {
            speeds.push(SPEED_ENVELOPE_MAX_KMH);
        }
        Self::new(profile, drive_state, Array1::from(speeds))
    }

    /// Evaluates every speed in the grid.
    /// # Arguments:
    /// * parallelize: whether to evaluate speeds on the rayon pool, defaults to `true`
    pub fn run(&self, parallelize: Option<bool>) -> anyhow::Result<Vec<SweepRow>> {
        let parallelize = parallelize.unwrap_or(true);
        log_if_enabled!(
            debug,
            "sweeping {:?} {} over {} speeds (parallelize: {parallelize})",
            self.profile.params.label,
            self.drive_state,
            self.speeds_kmh.len()
        );
        let speeds = self.speeds_kmh.to_vec();
        let eval = |(i, speed_kmh): (usize, &f64)| {
            self.profile
                .derive_load(*speed_kmh, self.drive_state)
                .map(|m| SweepRow::new(*speed_kmh, self.drive_state, m))
                .with_context(|| format!("sweep idx: {i}"))
        };
        if parallelize {
            speeds.par_iter().enumerate().map(eval).collect()
        } else {
            speeds.iter().enumerate().map(eval).collect()
        }
    }
}

/// Writes sweep rows as CSV with a header line
pub fn write_csv<W: std::io::Write>(rows: &[SweepRow], wtr: W) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(wtr);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ApproxEq)]
pub struct VehicleComparison {
    pub vehicle_type: VehicleType,
    pub label: String,
    pub metrics: LoadMetrics,
}

/// Evaluates every catalog vehicle at the same speed and drive state, in
/// [`VehicleType::ALL`] order
pub fn compare_vehicles(
    speed_kmh: f64,
    drive_state: DriveState,
) -> anyhow::Result<Vec<VehicleComparison>> {
    catalog()
        .iter()
        .map(|(vehicle_type, profile)| {
            Ok(VehicleComparison {
                vehicle_type,
                label: profile.params.label.clone(),
                metrics: profile
                    .derive_load(speed_kmh, drive_state)
                    .with_context(|| format!("comparing {vehicle_type}"))?,
            })
        })
        .collect()
}
