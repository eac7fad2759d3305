//! Threshold bands used to turn a reading into a status tier.
//!
//! Each call site owns its scale, including the comparison operator: some
//! screens treat a bound as inclusive (`>=`) and others as exclusive (`>`),
//! and those boundaries are kept exactly as configured below rather than
//! unified.

use serde::Serialize;

/// Status tier a band maps to. Ordered from calm to alarming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Normal,
    Moderate,
    Warning,
    Critical,
}

impl Level {
    pub fn css_class(self) -> &'static str {
        match self {
            Level::Normal => "normal",
            Level::Moderate => "moderate",
            Level::Warning => "warning",
            Level::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    /// The bound belongs to the band (`value >= bound`).
    AtLeast,
    /// The bound belongs to the band below (`value > bound`).
    Above,
}

impl Comparison {
    pub fn meets(self, value: f64, bound: f64) -> bool {
        match self {
            Comparison::AtLeast => value >= bound,
            Comparison::Above => value > bound,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Band {
    pub lower_bound: f64,
    pub label: &'static str,
    pub level: Level,
}

impl Band {
    pub const fn new(lower_bound: f64, label: &'static str, level: Level) -> Self {
        Self {
            lower_bound,
            label,
            level,
        }
    }
}

/// Contiguous bands sorted by ascending lower bound. The first band is the
/// floor and matches anything the others reject.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdScale {
    pub comparison: Comparison,
    pub bands: &'static [Band],
    floor: &'static Band,
}

impl ThresholdScale {
    /// Panics on an empty band list; for `const` scales that is a build error.
    pub const fn new(comparison: Comparison, bands: &'static [Band]) -> Self {
        let floor = match bands {
            [first, ..] => first,
            [] => panic!("a threshold scale needs at least one band"),
        };
        Self {
            comparison,
            bands,
            floor,
        }
    }

    /// Highest band whose bound the value meets, checking from the top down.
    pub fn classify(&self, value: f64) -> &'static Band {
        self.bands
            .iter()
            .rev()
            .find(|band| self.comparison.meets(value, band.lower_bound))
            .unwrap_or(self.floor)
    }

    pub fn level(&self, value: f64) -> Level {
        self.classify(value).level
    }
}

/// Capacity percentage on the main page's people card.
pub const MAIN_CAPACITY: ThresholdScale = ThresholdScale::new(
    Comparison::AtLeast,
    &[
        Band::new(f64::NEG_INFINITY, "Dentro do limite", Level::Normal),
        Band::new(60.0, "Alerta moderado", Level::Warning),
        Band::new(80.0, "Capacidade crítica", Level::Critical),
    ],
);

/// Number of active alerts on the main page's alert card.
pub const MAIN_ALERT_COUNT: ThresholdScale = ThresholdScale::new(
    Comparison::AtLeast,
    &[
        Band::new(f64::NEG_INFINITY, "Sistema estável", Level::Normal),
        Band::new(1.0, "Monitorar", Level::Warning),
        Band::new(3.0, "Atenção necessária", Level::Critical),
    ],
);

/// Occupation percentage of an area row and of the pool progress bar.
pub const AREA_OCCUPANCY: ThresholdScale = ThresholdScale::new(
    Comparison::AtLeast,
    &[
        Band::new(f64::NEG_INFINITY, "Normal", Level::Normal),
        Band::new(50.0, "Moderado", Level::Moderate),
        Band::new(75.0, "Atenção", Level::Warning),
        Band::new(90.0, "Crítico", Level::Critical),
    ],
);

/// Pool occupation badge.
pub const POOL_OCCUPANCY_STATUS: ThresholdScale = ThresholdScale::new(
    Comparison::AtLeast,
    &[
        Band::new(f64::NEG_INFINITY, "Disponível", Level::Normal),
        Band::new(50.0, "Moderada", Level::Moderate),
        Band::new(75.0, "Cheia", Level::Warning),
        Band::new(90.0, "Lotada", Level::Critical),
    ],
);

/// Bar color in the occupation-by-area chart. Exclusive bounds.
pub const AREA_BAR_COLOR: ThresholdScale = ThresholdScale::new(
    Comparison::Above,
    &[
        Band::new(f64::NEG_INFINITY, "green", Level::Normal),
        Band::new(50.0, "yellow", Level::Warning),
        Band::new(70.0, "red", Level::Critical),
    ],
);

/// Age of the last sensor reading, in minutes.
pub const READING_AGE: ThresholdScale = ThresholdScale::new(
    Comparison::AtLeast,
    &[
        Band::new(f64::NEG_INFINITY, "Atualizado", Level::Normal),
        Band::new(5.0, "Atrasado", Level::Warning),
        Band::new(30.0, "Desatualizado", Level::Critical),
    ],
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeStatus {
    Optimal,
    Attention,
    Critical,
}

impl RangeStatus {
    pub fn label(self) -> &'static str {
        match self {
            RangeStatus::Optimal => "Ideal",
            RangeStatus::Attention => "Atenção",
            RangeStatus::Critical => "Crítico",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            RangeStatus::Optimal => "status-optimal",
            RangeStatus::Attention => "status-warning",
            RangeStatus::Critical => "status-critical",
        }
    }
}

/// Target interval for a water quality metric. Readings slightly outside
/// (10% tolerance, or 50% over the ceiling for lower-is-better metrics)
/// ask for attention before turning critical.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdealRange {
    pub min: f64,
    pub max: f64,
    pub lower_is_better: bool,
}

impl IdealRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            lower_is_better: false,
        }
    }

    pub const fn ceiling(max: f64) -> Self {
        Self {
            min: 0.0,
            max,
            lower_is_better: true,
        }
    }

    pub fn with_bounds(self, min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            min: min.unwrap_or(self.min),
            max: max.unwrap_or(self.max),
            ..self
        }
    }

    pub fn is_ideal(&self, value: f64) -> bool {
        self.classify(value) == RangeStatus::Optimal
    }

    pub fn classify(&self, value: f64) -> RangeStatus {
        if self.lower_is_better {
            if value <= self.max {
                RangeStatus::Optimal
            } else if value <= self.max * 1.5 {
                RangeStatus::Attention
            } else {
                RangeStatus::Critical
            }
        } else if value >= self.min && value <= self.max {
            RangeStatus::Optimal
        } else if value >= self.min * 0.9 && value <= self.max * 1.1 {
            RangeStatus::Attention
        } else {
            RangeStatus::Critical
        }
    }
}

pub const PH_RANGE: IdealRange = IdealRange::new(7.2, 7.8);
pub const CHLORINE_RANGE: IdealRange = IdealRange::new(1.0, 3.0);
pub const ALKALINITY_RANGE: IdealRange = IdealRange::new(80.0, 120.0);
pub const TURBIDITY_RANGE: IdealRange = IdealRange::ceiling(5.0);

/// Water temperature in °C: 26–29 ideal, 24–31 acceptable.
pub fn classify_temperature(celsius: f64) -> (RangeStatus, &'static str) {
    if (26.0..=29.0).contains(&celsius) {
        (RangeStatus::Optimal, "Ideal")
    } else if (24.0..=31.0).contains(&celsius) {
        (RangeStatus::Attention, "Aceitável")
    } else {
        (RangeStatus::Critical, "Fora do ideal")
    }
}
