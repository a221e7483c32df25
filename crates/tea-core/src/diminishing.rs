//! Diminishing-returns strategies for repeated terms.
//!
//! Configured by tag (`power:-0.3`, `inverse_sqrt`, `log`, `linear`) rather
//! than by an expression string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_DIMINISHING_EXPONENT;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DiminishingReturns {
    /// `count^exponent`; strictly decreasing for count > 1 when exponent < 0.
    PowerLaw { exponent: f64 },
    /// `1 / sqrt(count)`
    InverseSqrt,
    /// `(1 + ln count) / count`
    Logarithmic,
    /// Always 1.0; repeated terms count fully.
    Linear,
}

impl Default for DiminishingReturns {
    fn default() -> Self {
        DiminishingReturns::PowerLaw {
            exponent: DEFAULT_DIMINISHING_EXPONENT,
        }
    }
}

impl DiminishingReturns {
    /// Multiplier applied to a term seen `count` times. Counts below 1 are
    /// treated as 1.
    pub fn multiplier(&self, count: usize) -> f64 {
        let n = count.max(1) as f64;
        match *self {
            DiminishingReturns::PowerLaw { exponent } => n.powf(exponent),
            DiminishingReturns::InverseSqrt => 1.0 / n.sqrt(),
            DiminishingReturns::Logarithmic => (1.0 + n.ln()) / n,
            DiminishingReturns::Linear => 1.0,
        }
    }

    /// Total weight of a term seen `count` times: `count * multiplier(count)`.
    pub fn effective_weight(&self, count: usize) -> f64 {
        count.max(1) as f64 * self.multiplier(count)
    }
}

impl fmt::Display for DiminishingReturns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiminishingReturns::PowerLaw { exponent } => write!(f, "power:{exponent}"),
            DiminishingReturns::InverseSqrt => f.write_str("inverse_sqrt"),
            DiminishingReturns::Logarithmic => f.write_str("log"),
            DiminishingReturns::Linear => f.write_str("linear"),
        }
    }
}

impl FromStr for DiminishingReturns {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let spec: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let spec = spec.to_lowercase();

        let exponent = spec
            .strip_prefix("power:")
            .or_else(|| spec.strip_prefix("count^"))
            .or_else(|| spec.strip_prefix("pow:"));
        if let Some(raw) = exponent {
            let raw = raw.trim_start_matches('(').trim_end_matches(')');
            return match raw.parse::<f64>() {
                Ok(exponent) if exponent.is_finite() && exponent <= 0.0 => {
                    Ok(DiminishingReturns::PowerLaw { exponent })
                }
                Ok(exponent) => Err(format!(
                    "power-law exponent must be finite and <= 0, got {exponent}"
                )),
                Err(_) => Err(format!("invalid power-law exponent '{raw}'")),
            };
        }

        match spec.as_str() {
            "inverse_sqrt" | "1/sqrt(count)" => Ok(DiminishingReturns::InverseSqrt),
            "log" | "logarithmic" => Ok(DiminishingReturns::Logarithmic),
            "linear" | "none" => Ok(DiminishingReturns::Linear),
            _ => Err(format!("unknown diminishing-returns formula '{s}'")),
        }
    }
}

impl TryFrom<String> for DiminishingReturns {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DiminishingReturns> for String {
    fn from(value: DiminishingReturns) -> Self {
        value.to_string()
    }
}
