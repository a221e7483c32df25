use serde::{Deserialize, Serialize};

use crate::constants::LEVEL_MIDPOINT;
use crate::numeric::{clamp_level, finite};

/// Growing conditions. Every factor is optional.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Geography {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solar_radiation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
}

impl Geography {
    pub fn altitude(&self) -> Option<f64> {
        finite(self.altitude)
    }

    pub fn humidity(&self) -> Option<f64> {
        finite(self.humidity)
    }

    pub fn temperature(&self) -> Option<f64> {
        finite(self.temperature)
    }

    pub fn solar_radiation(&self) -> Option<f64> {
        finite(self.solar_radiation)
    }

    /// Absolute latitude.
    pub fn abs_latitude(&self) -> Option<f64> {
        finite(self.latitude).map(f64::abs)
    }

    /// True when at least one factor is present and finite.
    pub fn has_data(&self) -> bool {
        self.altitude().is_some()
            || self.humidity().is_some()
            || self.temperature().is_some()
            || self.solar_radiation().is_some()
            || self.abs_latitude().is_some()
    }
}

/// One tea as it arrives from a caller. Absence of a field is meaningful:
/// an absent class is excluded from weighting, a present-but-empty list
/// is not.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeaRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tea_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flavor_profile: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caffeine_level: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub l_theanine_level: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_methods: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geography: Option<Geography>,
}

impl TeaRecord {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_flavors<S: Into<String>>(mut self, flavors: impl IntoIterator<Item = S>) -> Self {
        self.flavor_profile = Some(flavors.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_compounds(mut self, caffeine: f64, theanine: f64) -> Self {
        self.caffeine_level = Some(caffeine);
        self.l_theanine_level = Some(theanine);
        self
    }

    pub fn with_processing<S: Into<String>>(mut self, methods: impl IntoIterator<Item = S>) -> Self {
        self.processing_methods = Some(methods.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_geography(mut self, geography: Geography) -> Self {
        self.geography = Some(geography);
        self
    }

    /// Clamped `(caffeine, theanine)` levels, or None when neither level is
    /// usable. A missing partner defaults to the scale midpoint.
    pub fn compound_levels(&self) -> Option<(f64, f64)> {
        let caffeine = finite(self.caffeine_level);
        let theanine = finite(self.l_theanine_level);
        if caffeine.is_none() && theanine.is_none() {
            return None;
        }
        Some((
            clamp_level(caffeine.unwrap_or(LEVEL_MIDPOINT)),
            clamp_level(theanine.unwrap_or(LEVEL_MIDPOINT)),
        ))
    }

    /// Geography with at least one usable factor.
    pub fn usable_geography(&self) -> Option<&Geography> {
        self.geography.as_ref().filter(|g| g.has_data())
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed tea")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_vs_empty() {
        let r: TeaRecord = serde_json::from_str(r#"{"flavorProfile": []}"#).unwrap();
        assert_eq!(r.flavor_profile, Some(vec![]));
        assert_eq!(r.processing_methods, None);
    }

    #[test]
    fn test_compound_levels_clamp_and_default() {
        let r = TeaRecord::default().with_compounds(15.0, 0.0);
        assert_eq!(r.compound_levels(), Some((10.0, 1.0)));

        let r = TeaRecord {
            caffeine_level: Some(7.0),
            ..Default::default()
        };
        assert_eq!(r.compound_levels(), Some((7.0, 5.0)));

        let r = TeaRecord {
            caffeine_level: Some(f64::NAN),
            ..Default::default()
        };
        assert_eq!(r.compound_levels(), None);
    }

    #[test]
    fn test_empty_geography_is_unusable() {
        let r = TeaRecord::default().with_geography(Geography::default());
        assert!(r.usable_geography().is_none());

        let r = TeaRecord::default().with_geography(Geography {
            latitude: Some(-35.0),
            ..Default::default()
        });
        assert_eq!(r.usable_geography().and_then(|g| g.abs_latitude()), Some(35.0));
    }

    #[test]
    fn test_camel_case_wire_names() {
        let r = TeaRecord::named("Sencha")
            .with_compounds(6.0, 8.0)
            .with_geography(Geography {
                solar_radiation: Some(4.2),
                ..Default::default()
            });
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["lTheanineLevel"], 8.0);
        assert_eq!(v["geography"]["solarRadiation"], 4.2);
        assert!(v.get("flavorProfile").is_none());
    }
}
