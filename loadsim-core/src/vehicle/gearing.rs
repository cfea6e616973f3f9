use super::*;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ApproxEq)]
/// One speed bracket of an idealized shift schedule
pub struct GearBracket {
    /// Exclusive upper road speed bound of this bracket.  `None` marks the
    /// open-ended top gear.
    #[serde(default)]
    pub speed_max_kmh: Option<f64>,
    /// Engine speed per unit road speed while in this bracket
    pub rpm_per_kmh: f64,
    pub label: String,
}

impl GearBracket {
    pub fn new<S: Into<String>>(speed_max_kmh: f64, rpm_per_kmh: f64, label: S) -> Self {
        Self {
            speed_max_kmh: Some(speed_max_kmh),
            rpm_per_kmh,
            label: label.into(),
        }
    }

    /// Final, open-ended bracket
    pub fn top<S: Into<String>>(rpm_per_kmh: f64, label: S) -> Self {
        Self {
            speed_max_kmh: None,
            rpm_per_kmh,
            label: label.into(),
        }
    }

    fn contains(&self, speed_kmh: f64) -> bool {
        self.speed_max_kmh.map_or(true, |bound| speed_kmh < bound)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ApproxEq)]
/// Ordered shift schedule mapping road speed to engine speed.  Shifts are
/// abrupt and deterministic: no hysteresis, no rev limiter.
pub struct GearTable {
    pub brackets: Vec<GearBracket>,
}

impl SerdeAPI for GearTable {
    fn init(&mut self) -> anyhow::Result<()> {
        ensure!(
            !self.brackets.is_empty(),
            format_dbg!(self.brackets.is_empty())
        );
        let (top, lower) = self
            .brackets
            .split_last()
            .with_context(|| format_dbg!())?;
        ensure!(
            top.speed_max_kmh.is_none(),
            "{}\nlast gear bracket `{}` must be open-ended",
            format_dbg!(top.speed_max_kmh),
            top.label
        );
        let bounds = lower
            .iter()
            .map(|b| {
                b.speed_max_kmh.with_context(|| {
                    format!("only the last gear bracket may be open-ended, not `{}`", b.label)
                })
            })
            .collect::<anyhow::Result<Vec<f64>>>()?;
        ensure!(
            bounds.iter().all(|b| b.is_finite() && *b > 0.0),
            "{}\ngear bracket bounds must be finite and positive",
            format_dbg!(bounds)
        );
        ensure!(
            utils::is_strictly_increasing(&bounds),
            "{}\ngear bracket bounds must be strictly increasing",
            format_dbg!(bounds)
        );
        for bracket in &self.brackets {
            ensure!(
                bracket.rpm_per_kmh.is_finite() && bracket.rpm_per_kmh > 0.0,
                "{}\n`rpm_per_kmh` of `{}` must be > 0",
                format_dbg!(bracket.rpm_per_kmh),
                bracket.label
            );
        }
        Ok(())
    }
}

impl GearTable {
    pub fn new(brackets: Vec<GearBracket>) -> anyhow::Result<Self> {
        let mut table = Self { brackets };
        table.init()?;
        Ok(table)
    }

    /// Returns the first bracket whose upper bound exceeds `speed_kmh`, or the
    /// top bracket if none does
    pub fn bracket_for(&self, speed_kmh: f64) -> anyhow::Result<&GearBracket> {
        self.brackets
            .iter()
            .find(|b| b.contains(speed_kmh))
            .or_else(|| self.brackets.last())
            .with_context(|| format!("{}\ngear table is empty", format_dbg!(speed_kmh)))
    }

    pub fn labels(&self) -> Vec<&str> {
        self.brackets.iter().map(|b| b.label.as_str()).collect()
    }
}
