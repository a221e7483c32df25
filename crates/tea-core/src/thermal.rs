//! Thermal (warming/cooling) property.
//!
//! Each attribute class yields an optional scalar in [-1, 1]. The aggregate
//! is a weighted mean over the components that are present and non-zero:
//! an exact 0.0 counts as absent, not neutral, and drops out of the weight
//! renormalization as well.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::attribute::{Attribute, PerAttribute};
use crate::constants::{CAFFEINE_THERMAL_SLOPE, THEANINE_THERMAL_SLOPE, THERMAL_COMPONENT_WEIGHTS};
use crate::descriptor::normalize_all;
use crate::element::{Element, ElementDistribution};
use crate::numeric::{band_lookup, clamp_level, weighted_mean};
use crate::record::{Geography, TeaRecord};
use crate::tables::LookupTables;

/// Adjustment band selected by the aggregate thermal value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThermalBand {
    StronglyCooling,
    Cooling,
    Neutral,
    Warming,
    StronglyWarming,
}

impl ThermalBand {
    pub fn of(thermal: f64) -> Self {
        if thermal > 0.6 {
            ThermalBand::StronglyWarming
        } else if thermal > 0.2 {
            ThermalBand::Warming
        } else if thermal >= -0.2 {
            ThermalBand::Neutral
        } else if thermal >= -0.6 {
            ThermalBand::Cooling
        } else {
            ThermalBand::StronglyCooling
        }
    }
}

/// Human-readable classification of a thermal value.
pub fn classify(thermal: f64) -> &'static str {
    match thermal {
        t if t > 0.6 => "Strongly warming",
        t if t > 0.3 => "Warming",
        t if t > 0.1 => "Slightly warming",
        t if t >= -0.1 => "Neutral",
        t if t >= -0.3 => "Slightly cooling",
        t if t >= -0.6 => "Cooling",
        _ => "Strongly cooling",
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThermalAnalysis {
    pub total_thermal: f64,
    pub thermal_property: String,
    pub band: ThermalBand,
    pub components: PerAttribute<Option<f64>>,
}

impl ThermalAnalysis {
    pub fn from_components(components: PerAttribute<Option<f64>>) -> Self {
        let total = aggregate(&components);
        Self {
            total_thermal: total,
            thermal_property: classify(total).to_string(),
            band: ThermalBand::of(total),
            components,
        }
    }
}

/// Weighted mean of the present, non-zero components. 0.0 when none remain.
pub fn aggregate(components: &PerAttribute<Option<f64>>) -> f64 {
    let present = Attribute::ALL
        .into_iter()
        .zip(THERMAL_COMPONENT_WEIGHTS)
        .filter_map(|(attribute, weight)| {
            components[attribute]
                .filter(|v| *v != 0.0 && v.is_finite())
                .map(|v| (v, weight))
        });
    weighted_mean(present).map_or(0.0, |t| t.clamp(-1.0, 1.0))
}

/// Shift mass between elements according to the thermal band, then
/// renormalize. `strength` scales every shift.
pub fn adjust(distribution: &ElementDistribution, thermal: f64, strength: f64) -> ElementDistribution {
    let m = thermal.abs() * strength;
    let shifts: &[(Element, f64)] = match ThermalBand::of(thermal) {
        ThermalBand::StronglyWarming => &[
            (Element::Fire, 0.15 * m),
            (Element::Water, -0.10 * m),
            (Element::Metal, -0.05 * m),
        ],
        ThermalBand::Warming => &[
            (Element::Fire, 0.08 * m),
            (Element::Earth, 0.02 * m),
            (Element::Water, -0.05 * m),
        ],
        ThermalBand::Neutral => &[(Element::Earth, 0.02 * strength)],
        ThermalBand::Cooling => &[
            (Element::Water, 0.08 * m),
            (Element::Metal, 0.02 * m),
            (Element::Fire, -0.05 * m),
        ],
        ThermalBand::StronglyCooling => &[
            (Element::Water, 0.15 * m),
            (Element::Fire, -0.10 * m),
            (Element::Earth, -0.05 * m),
        ],
    };

    let mut out = *distribution;
    for &(element, delta) in shifts {
        out[element] += delta;
    }
    out.clamp_non_negative();
    out.normalized_or(*distribution)
}

/// Computes component thermal values from a tea record.
#[derive(Clone)]
pub struct ThermalEngine {
    tables: Arc<LookupTables>,
}

impl ThermalEngine {
    pub fn new(tables: Arc<LookupTables>) -> Self {
        Self { tables }
    }

    /// Mean thermal value of the flavor terms that have one.
    pub fn flavor_thermal<S: AsRef<str>>(&self, terms: &[S]) -> Option<f64> {
        mean(
            normalize_all(terms)
                .iter()
                .filter_map(|t| self.tables.flavor_thermal(t)),
        )
    }

    pub fn processing_thermal<S: AsRef<str>>(&self, tags: &[S]) -> Option<f64> {
        mean(
            normalize_all(tags)
                .iter()
                .filter_map(|t| self.tables.processing_thermal(t)),
        )
    }

    /// `caffeine * 0.1 - theanine * 0.07`, clamped to [-1, 1].
    pub fn compound_thermal(&self, caffeine: f64, theanine: f64) -> f64 {
        let value = clamp_level(caffeine) * CAFFEINE_THERMAL_SLOPE
            - clamp_level(theanine) * THEANINE_THERMAL_SLOPE;
        value.clamp(-1.0, 1.0)
    }

    /// Mean of the altitude, temperature and humidity band values present.
    pub fn geography_thermal(&self, geo: &Geography) -> Option<f64> {
        let bands = &self.tables.geography_thermal;
        let values = [
            (geo.altitude(), &bands.altitude),
            (geo.temperature(), &bands.temperature),
            (geo.humidity(), &bands.humidity),
        ];
        mean(
            values
                .into_iter()
                .filter_map(|(value, table)| band_lookup(table, value?).copied()),
        )
    }

    pub fn components(&self, tea: &TeaRecord) -> PerAttribute<Option<f64>> {
        PerAttribute {
            flavor: tea
                .flavor_profile
                .as_deref()
                .and_then(|p| self.flavor_thermal(p)),
            compounds: tea
                .compound_levels()
                .map(|(c, t)| self.compound_thermal(c, t)),
            processing: tea
                .processing_methods
                .as_deref()
                .and_then(|p| self.processing_thermal(p)),
            geography: tea.usable_geography().and_then(|g| self.geography_thermal(g)),
        }
    }

    pub fn analyze(&self, tea: &TeaRecord) -> ThermalAnalysis {
        ThermalAnalysis::from_components(self.components(tea))
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| (sum / n as f64).clamp(-1.0, 1.0))
}
