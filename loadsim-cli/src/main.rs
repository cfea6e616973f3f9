use anyhow::{bail, Context};
use clap::{ArgGroup, Parser};
use serde::Serialize;

use std::fs::File;
use std::io::BufWriter;

extern crate loadsim_core;
use loadsim_core::prelude::*;

/// Point-in-time engine and drivetrain workload estimates.
/// After running `cargo build --release`, run with
/// ```bash
/// ./target/release/loadsim-cli --vehicle duke200 --speed 70 --state accelerating
/// ```
/// To write a 0-120 km/h sweep of a vehicle file to csv, run with
/// ```bash
/// ./target/release/loadsim-cli --profile-file my_vehicle.yaml --sweep-step 5 --csv sweep.csv
/// ```
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(group(
    ArgGroup::new("source")
    .required(true)
    .args(&["vehicle", "profile-file", "compare", "sanity-check"])
))]
struct LoadSimApi {
    #[clap(long, value_parser)]
    /// Catalog vehicle: `commuter100`, `duke200`, or `altoK10`
    vehicle: Option<String>,
    #[clap(long, value_parser)]
    /// Path to vehicle profile file (yaml or json)
    profile_file: Option<String>,
    #[clap(long, action)]
    /// Evaluate every catalog vehicle at the same speed and state
    compare: bool,
    #[clap(long, action)]
    /// Run the self-check grid; exits non-zero if any check fails
    sanity_check: bool,
    #[clap(long, value_parser, default_value_t = 70.0, allow_hyphen_values = true)]
    /// Road speed (km/h), clamped to [0, 120]
    speed: f64,
    #[clap(long, value_parser, default_value = "cruising")]
    /// Drive state: `cruising` or `accelerating`
    state: String,
    #[clap(long, value_parser, default_value = "table")]
    /// How to return results: `table`, `json`, or `yaml`
    res_fmt: String,
    #[clap(long, value_parser, requires = "csv")]
    /// Speed step (km/h) of a 0-120 km/h sweep
    sweep_step: Option<f64>,
    #[clap(long, value_parser, requires = "sweep-step")]
    /// Path of the csv file the sweep is written to
    csv: Option<String>,
    #[clap(long, short, action)]
    /// Emit debug logging to stderr
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ResFmt {
    Table,
    Json,
    Yaml,
}

impl ResFmt {
    fn parse(s: &str) -> anyhow::Result<Self> {
        Ok(match s.to_lowercase().as_str() {
            "table" => Self::Table,
            "json" => Self::Json,
            "yaml" | "yml" => Self::Yaml,
            _ => bail!(
                "Unsupported result format {s:?}, must be one of [\"table\", \"json\", \"yaml\"]"
            ),
        })
    }

    /// Serialized form for `json` and `yaml`; `None` for `table`
    fn serialize<T: Serialize>(&self, value: &T) -> anyhow::Result<Option<String>> {
        Ok(match self {
            Self::Table => None,
            Self::Json => Some(serde_json::to_string_pretty(value)?),
            Self::Yaml => Some(serde_yaml::to_string(value)?),
        })
    }
}

pub fn main() -> anyhow::Result<()> {
    let loadsim_api = LoadSimApi::parse();

    let level = if loadsim_api.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let res_fmt = ResFmt::parse(&loadsim_api.res_fmt)?;
    let drive_state: DriveState = loadsim_api.state.parse()?;
    let speed_kmh = loadsim_api.speed;

    if loadsim_api.sanity_check {
        let report = run_sanity_check()?;
        match res_fmt.serialize(&report)? {
            Some(s) => println!("{s}"),
            None => print!("{report}"),
        }
        return report.ensure_passed();
    }

    if loadsim_api.compare {
        let rows = compare_vehicles(speed_kmh, drive_state)?;
        match res_fmt.serialize(&rows)? {
            Some(s) => println!("{s}"),
            None => print!("{}", comparison_table(&rows)),
        }
        return Ok(());
    }

    let profile: VehicleProfile = if let Some(vehicle) = &loadsim_api.vehicle {
        let vehicle_type: VehicleType = vehicle.parse()?;
        profile_for(vehicle_type).clone()
    } else if let Some(profile_file) = &loadsim_api.profile_file {
        VehicleProfile::from_file(profile_file)?
    } else {
        bail!("one of `--vehicle` or `--profile-file` is required")
    };
    log::debug!("loaded profile {:?}", profile.params.label);

    if let (Some(step_kmh), Some(csv_path)) = (loadsim_api.sweep_step, &loadsim_api.csv) {
        let sweep = LoadSweep::over_envelope(profile, drive_state, step_kmh)?;
        let rows = sweep.run(None)?;
        let file =
            File::create(csv_path).with_context(|| format!("Could not create {csv_path:?}"))?;
        write_csv(&rows, BufWriter::new(file))?;
        println!("wrote {} rows to {csv_path}", rows.len());
        return Ok(());
    }

    let metrics = profile.derive_load(speed_kmh, drive_state)?;
    match res_fmt.serialize(&metrics)? {
        Some(s) => println!("{s}"),
        None => print!(
            "{}",
            metrics_table(&profile.params.label, speed_kmh, drive_state, &metrics)
        ),
    }
    Ok(())
}

fn metrics_table(label: &str, speed_kmh: f64, drive_state: DriveState, m: &LoadMetrics) -> String {
    format!(
        "vehicle:  {label}\n\
         speed:    {speed:.1} km/h ({drive_state})\n\
         engine:   {rpm:.1} rpm, gear {gear}\n\
         thermal:  {th:>5.1} %\n\
         mech:     {me:>5.1} %\n\
         aero:     {ae:>5.1} %\n\
         total:    {tot:>5.1} % ({dominant})\n",
        speed = speed_kmh.clamp(0.0, SPEED_ENVELOPE_MAX_KMH),
        rpm = m.rpm,
        gear = m.gear_label,
        th = m.thermal_stress_pct,
        me = m.mechanical_load_pct,
        ae = m.aerodynamic_load_pct,
        tot = m.total_workload_pct,
        dominant = m.dominant_load(),
    )
}

fn comparison_table(rows: &[VehicleComparison]) -> String {
    let mut out = format!(
        "{:<32} {:>8} {:<5} {:>8} {:>6} {:>6} {:>6}\n",
        "vehicle", "rpm", "gear", "thermal", "mech", "aero", "total"
    );
    for row in rows {
        let m = &row.metrics;
        out.push_str(&format!(
            "{:<32} {:>8.1} {:<5} {:>8.1} {:>6.1} {:>6.1} {:>6.1}\n",
            row.label,
            m.rpm,
            m.gear_label,
            m.thermal_stress_pct,
            m.mechanical_load_pct,
            m.aerodynamic_load_pct,
            m.total_workload_pct
        ));
    }
    out
}
