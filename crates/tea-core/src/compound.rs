//! Caffeine and L-theanine levels to elements.
//!
//! The compound contribution is pre-scaled: its total mass equals the
//! configured compound weight, not 1.0.

use serde::{Deserialize, Serialize};

use crate::attribute::Attribute;
use crate::config::ConfigSource;
use crate::element::{Element, ElementDistribution};
use crate::mapper::AttributeMapper;
use crate::numeric::clamp_level;
use crate::record::TeaRecord;

/// Largest unit-scale contribution of a single compound.
const COMPOUND_CAP: f64 = 0.5;

const CAFFEINE_SPLIT: [(Element, f64); 3] = [
    (Element::Fire, 0.65),
    (Element::Wood, 0.25),
    (Element::Metal, 0.10),
];

const THEANINE_SPLIT: [(Element, f64); 3] = [
    (Element::Water, 0.60),
    (Element::Wood, 0.25),
    (Element::Earth, 0.15),
];

/// Theanine-to-caffeine ratio band.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioBand {
    /// ratio > 2
    TheanineLed,
    /// 1.5 ≤ ratio ≤ 2
    Calm,
    /// 1 ≤ ratio < 1.5
    Even,
    /// ratio < 1
    CaffeineLed,
}

impl RatioBand {
    pub fn of(ratio: f64) -> Self {
        if ratio > 2.0 {
            RatioBand::TheanineLed
        } else if ratio >= 1.5 {
            RatioBand::Calm
        } else if ratio >= 1.0 {
            RatioBand::Even
        } else {
            RatioBand::CaffeineLed
        }
    }

    fn deltas(self) -> &'static [(Element, f64)] {
        match self {
            RatioBand::TheanineLed => &[
                (Element::Wood, 0.03),
                (Element::Water, 0.02),
                (Element::Fire, -0.03),
            ],
            RatioBand::Calm => &[
                (Element::Wood, 0.02),
                (Element::Water, 0.01),
                (Element::Fire, -0.01),
            ],
            RatioBand::Even => &[(Element::Earth, 0.02), (Element::Metal, 0.01)],
            RatioBand::CaffeineLed => &[
                (Element::Fire, 0.03),
                (Element::Metal, 0.01),
                (Element::Water, -0.02),
                (Element::Wood, -0.01),
            ],
        }
    }
}

/// Compound distribution for clamped levels, rescaled to `weight`.
pub fn compound_distribution(caffeine: f64, theanine: f64, weight: f64) -> ElementDistribution {
    let caffeine = clamp_level(caffeine);
    let theanine = clamp_level(theanine);

    let mut d = ElementDistribution::zero();
    let caffeine_mass = caffeine / 10.0 * COMPOUND_CAP;
    let theanine_mass = theanine / 10.0 * COMPOUND_CAP;
    for (element, share) in CAFFEINE_SPLIT {
        d[element] += caffeine_mass * share;
    }
    for (element, share) in THEANINE_SPLIT {
        d[element] += theanine_mass * share;
    }

    for &(element, delta) in RatioBand::of(theanine / caffeine).deltas() {
        d[element] += delta;
    }

    d.clamp_non_negative();
    d.rescale_to(weight.max(0.0));
    d
}

/// Qualitative reading of a compound pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompoundAnalysis {
    pub caffeine: f64,
    pub l_theanine: f64,
    pub ratio: f64,
    pub band: RatioBand,
    pub primary_nature: String,
    pub secondary_nature: String,
    pub effect: String,
    pub ideal_ratio: f64,
    /// `ratio - ideal_ratio`
    pub deviation: f64,
}

pub fn analyze_compounds(caffeine: f64, theanine: f64, ideal_ratio: f64) -> CompoundAnalysis {
    let caffeine = clamp_level(caffeine);
    let theanine = clamp_level(theanine);
    let ratio = theanine / caffeine;
    let band = RatioBand::of(ratio);

    let (primary, effect) = match band {
        RatioBand::TheanineLed => ("Calming", "Relaxed, meditative alertness with little edge"),
        RatioBand::Calm => ("Calm focus", "Steady concentration without jitters"),
        RatioBand::Even => ("Balanced", "Gentle lift balanced by mild relaxation"),
        RatioBand::CaffeineLed => ("Stimulating", "Quick, pronounced energy"),
    };
    let secondary = if caffeine >= 7.0 && theanine >= 7.0 {
        "Intense"
    } else if caffeine >= 7.0 {
        "Energizing"
    } else if theanine >= 7.0 {
        "Soothing"
    } else if caffeine <= 3.0 && theanine <= 3.0 {
        "Light"
    } else {
        "Moderate"
    };

    CompoundAnalysis {
        caffeine,
        l_theanine: theanine,
        ratio,
        band,
        primary_nature: primary.to_string(),
        secondary_nature: secondary.to_string(),
        effect: effect.to_string(),
        ideal_ratio,
        deviation: ratio - ideal_ratio,
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct CompoundMapper;

impl CompoundMapper {
    pub fn new() -> Self {
        Self
    }
}

impl AttributeMapper for CompoundMapper {
    fn attribute(&self) -> Attribute {
        Attribute::Compounds
    }

    fn map(&self, tea: &TeaRecord, config: &dyn ConfigSource) -> Option<ElementDistribution> {
        let (caffeine, theanine) = tea.compound_levels()?;
        Some(compound_distribution(caffeine, theanine, config.compound_weight()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_total_equals_weight() {
        for (c, t) in [(1.0, 1.0), (10.0, 1.0), (1.0, 10.0), (5.5, 7.2)] {
            let d = compound_distribution(c, t, 0.3);
            assert_relative_eq!(d.total(), 0.3, epsilon = 1e-12);
            assert!(d.iter().all(|(_, v)| v >= 0.0));
        }
    }

    #[test]
    fn test_out_of_range_levels_clamp() {
        assert_eq!(
            compound_distribution(15.0, -3.0, 0.3),
            compound_distribution(10.0, 1.0, 0.3)
        );
    }

    #[test]
    fn test_caffeine_heavy_is_fire_led() {
        let d = compound_distribution(10.0, 1.0, 0.3);
        assert_eq!(d.dominant_pair().0, Some(Element::Fire));
        // unit scale before rescale: water 0.03 - 0.02 out of 0.56
        assert_relative_eq!(d.water, 0.01 / 0.56 * 0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_theanine_heavy_is_water_led() {
        let d = compound_distribution(1.0, 10.0, 0.3);
        assert_eq!(d.dominant_pair().0, Some(Element::Water));
        assert!(d.fire < d.wood);
    }

    #[test]
    fn test_ratio_band_boundaries() {
        assert_eq!(RatioBand::of(2.01), RatioBand::TheanineLed);
        assert_eq!(RatioBand::of(2.0), RatioBand::Calm);
        assert_eq!(RatioBand::of(1.5), RatioBand::Calm);
        assert_eq!(RatioBand::of(1.0), RatioBand::Even);
        assert_eq!(RatioBand::of(0.99), RatioBand::CaffeineLed);
    }

    #[test]
    fn test_missing_partner_defaults_to_midpoint() {
        let mapper = CompoundMapper::new();
        let tea = TeaRecord {
            caffeine_level: Some(8.0),
            ..Default::default()
        };
        let d = mapper.map(&tea, &crate::config::DefaultConfig).unwrap();
        assert_eq!(d, compound_distribution(8.0, 5.0, 0.3));
    }

    #[test]
    fn test_analysis_labels() {
        let a = analyze_compounds(3.0, 8.0, 2.0);
        assert_eq!(a.band, RatioBand::TheanineLed);
        assert_eq!(a.primary_nature, "Calming");
        assert_eq!(a.secondary_nature, "Soothing");
        assert_relative_eq!(a.deviation, 8.0 / 3.0 - 2.0, epsilon = 1e-12);

        let b = analyze_compounds(9.0, 2.0, 2.0);
        assert_eq!(b.primary_nature, "Stimulating");
        assert_eq!(b.secondary_nature, "Energizing");
    }
}
