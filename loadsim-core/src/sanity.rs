//! Self-check harness: evaluates every catalog vehicle over a fixed grid of
//! drive states and speeds and checks directional invariants on the results

use crate::imports::*;
use crate::load::{derive_load, LoadMetrics};
use crate::vehicle::{DriveState, VehicleType};
use itertools::iproduct;

/// Speeds evaluated by [`run_sanity_check`]
pub const SANITY_SPEEDS_KMH: [f64; 4] = [0.0, 20.0, 70.0, 120.0];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ApproxEq)]
pub struct SanityRow {
    pub vehicle_type: VehicleType,
    pub drive_state: DriveState,
    pub speed_kmh: f64,
    pub metrics: LoadMetrics,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// Outcome of one named check
pub struct SanityCheck {
    pub label: String,
    pub passed: bool,
    /// values the check was evaluated on
    pub details: String,
}

impl SanityCheck {
    fn new<L: Into<String>, D: Into<String>>(label: L, passed: bool, details: D) -> Self {
        let check = Self {
            label: label.into(),
            passed,
            details: details.into(),
        };
        if !check.passed {
            log_if_enabled!(warn, "{check}");
        }
        check
    }
}

impl fmt::Display for SanityCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.passed { "PASS" } else { "FAIL" };
        write!(f, "{status} | {} | {}", self.label, self.details)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SanityReport {
    pub rows: Vec<SanityRow>,
    pub checks: Vec<SanityCheck>,
}

impl SanityReport {
    /// Evaluates the full grid without running any checks
    pub fn evaluate_grid() -> anyhow::Result<Self> {
        let rows = iproduct!(VehicleType::ALL, DriveState::ALL, SANITY_SPEEDS_KMH)
            .map(|(vehicle_type, drive_state, speed_kmh)| {
                Ok(SanityRow {
                    vehicle_type,
                    drive_state,
                    speed_kmh,
                    metrics: derive_load(vehicle_type, speed_kmh, drive_state)?,
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Self {
            rows,
            checks: Vec::new(),
        })
    }

    pub fn get(
        &self,
        vehicle_type: VehicleType,
        drive_state: DriveState,
        speed_kmh: f64,
    ) -> anyhow::Result<&SanityRow> {
        self.rows
            .iter()
            .find(|r| {
                r.vehicle_type == vehicle_type
                    && r.drive_state == drive_state
                    && r.speed_kmh == speed_kmh
            })
            .with_context(|| format!("missing row for {vehicle_type}/{drive_state}/{speed_kmh}"))
    }

    fn total(&self, vt: VehicleType, ds: DriveState, speed_kmh: f64) -> anyhow::Result<f64> {
        Ok(self.get(vt, ds, speed_kmh)?.metrics.total_workload_pct)
    }

    fn run_checks(&mut self) -> anyhow::Result<()> {
        use DriveState::*;
        use VehicleType::*;
        let mut checks = Vec::new();

        let c70 = self.total(Commuter100, Cruising, 70.0)?;
        let d70 = self.total(Duke200, Cruising, 70.0)?;
        let a70 = self.total(AltoK10, Cruising, 70.0)?;
        let a20 = self.total(AltoK10, Cruising, 20.0)?;
        let a120 = self.total(AltoK10, Cruising, 120.0)?;

        checks.push(SanityCheck::new(
            "70 cruising commuter highest",
            c70 > d70 && c70 > a70,
            format!("commuter={c70}, duke={d70}, alto={a70}"),
        ));
        checks.push(SanityCheck::new(
            "70 cruising duke <= commuter-15",
            d70 <= c70 - 15.0,
            format!("delta={}", round1(c70 - d70)),
        ));
        checks.push(SanityCheck::new(
            "70 cruising alto near own minimum vs 20/120",
            a70 <= a20.min(a120) + 8.0,
            format!("alto20={a20}, alto70={a70}, alto120={a120}"),
        ));

        for vt in VehicleType::ALL {
            let aero120 = self.get(vt, Cruising, 120.0)?.metrics.aerodynamic_load_pct;
            checks.push(SanityCheck::new(
                format!("120 cruising aero~100 {vt}"),
                (aero120 - 100.0).abs() <= 1.0,
                format!("aero120={aero120}"),
            ));
        }

        for (vt, speed_kmh) in iproduct!(VehicleType::ALL, [20.0, 70.0, 120.0]) {
            let cruise = self.total(vt, Cruising, speed_kmh)?;
            let accel = self.total(vt, Accelerating, speed_kmh)?;
            checks.push(SanityCheck::new(
                format!("accel>=cruise {vt}@{speed_kmh}"),
                accel >= cruise,
                format!("cruise={cruise}, accel={accel}"),
            ));
        }

        self.checks = checks;
        Ok(())
    }

    pub fn passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &SanityCheck> {
        self.checks.iter().filter(|c| !c.passed)
    }

    /// Errors with every failed check listed if any check failed
    pub fn ensure_passed(&self) -> anyhow::Result<()> {
        let failures: Vec<String> = self.failures().map(|c| c.to_string()).collect();
        ensure!(
            failures.is_empty(),
            "{} of {} sanity checks failed:\n{}",
            failures.len(),
            self.checks.len(),
            failures.join("\n")
        );
        Ok(())
    }

    /// Fixed-width table of every evaluated row
    pub fn render_table(&self) -> String {
        let mut out = format!(
            "{:<12} {:<13} {:>6} {:<5} {:>8} {:>8} {:>6} {:>6} {:>6}\n",
            "vehicle", "state", "v_kmh", "gear", "rpm", "thermal", "mech", "aero", "total"
        );
        for r in &self.rows {
            let m = &r.metrics;
            out.push_str(&format!(
                "{:<12} {:<13} {:>6} {:<5} {:>8.1} {:>8.1} {:>6.1} {:>6.1} {:>6.1}\n",
                r.vehicle_type.id(),
                r.drive_state.id(),
                r.speed_kmh,
                m.gear_label,
                m.rpm,
                m.thermal_stress_pct,
                m.mechanical_load_pct,
                m.aerodynamic_load_pct,
                m.total_workload_pct,
            ));
        }
        out
    }
}

impl fmt::Display for SanityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_table())?;
        for check in &self.checks {
            writeln!(f, "{check}")?;
        }
        Ok(())
    }
}

/// Evaluates vehicles × drive states × [`SANITY_SPEEDS_KMH`] and runs the
/// named checks.  Failed checks are recorded in the report, not returned as
/// errors; see [`SanityReport::ensure_passed`].
pub fn run_sanity_check() -> anyhow::Result<SanityReport> {
    let mut report = SanityReport::evaluate_grid()?;
    report.run_checks()?;
    log_if_enabled!(
        info,
        "sanity check: {} rows, {} of {} checks passed",
        report.rows.len(),
        report.checks.len() - report.failures().count(),
        report.checks.len()
    );
    Ok(report)
}
