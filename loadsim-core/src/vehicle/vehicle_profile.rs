use super::*;
use crate::engine_state::EngineState;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ApproxEq)]
/// Everything needed to evaluate one vehicle: its constants and its shift schedule
pub struct VehicleProfile {
    pub params: VehicleParameters,
    pub gearing: GearTable,
}

impl SerdeAPI for VehicleProfile {
    fn init(&mut self) -> anyhow::Result<()> {
        self.params.init()?;
        self.gearing
            .init()
            .with_context(|| format!("invalid gear table for {:?}", self.params.label))?;
        Ok(())
    }
}

impl VehicleProfile {
    pub fn new(params: VehicleParameters, gearing: GearTable) -> anyhow::Result<Self> {
        let mut profile = Self { params, gearing };
        profile.init()?;
        Ok(profile)
    }

    /// Infers engine speed and gear at road speed `speed_kmh`.
    ///
    /// Negative speeds are treated as zero.  Engine speed is never below idle,
    /// and a stationary vehicle reports idle speed in the `"idle"` gear.
    ///
    /// # Errors
    /// If `speed_kmh` is NaN or infinite.
    pub fn engine_state(&self, speed_kmh: f64) -> anyhow::Result<EngineState> {
        ensure!(
            speed_kmh.is_finite(),
            "{}\nspeed must be finite",
            format_dbg!(speed_kmh)
        );
        let speed_kmh = speed_kmh.max(0.0);
        let idle_rpm = self.params.idle_rpm;
        if speed_kmh == 0.0 {
            return Ok(EngineState {
                rpm: idle_rpm,
                gear_label: IDLE_GEAR_LABEL.to_string(),
            });
        }
        let bracket = self.gearing.bracket_for(speed_kmh)?;
        Ok(EngineState {
            rpm: (bracket.rpm_per_kmh * speed_kmh).max(idle_rpm),
            gear_label: bracket.label.clone(),
        })
    }
}
