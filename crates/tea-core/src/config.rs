//! Engine configuration.
//!
//! [`EngineConfig`] is the typed, serializable settings tree with key-path
//! access (`elementWeights.flavor`, `thermal.enabled`, ...). The engine never
//! reads it directly: everything goes through [`ConfigSource`], whose
//! accessors all default, so any implementor can override only what it needs.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::attribute::{Attribute, PerAttribute};
use crate::constants::{
    DEFAULT_COMPOUND_WEIGHT, DEFAULT_CONTROLLING_STRENGTH, DEFAULT_DOMINANCE_RATIO,
    DEFAULT_DOMINANCE_SHARE, DEFAULT_ELEMENT_WEIGHTS, DEFAULT_GENERATING_STRENGTH,
    DEFAULT_IDEAL_RATIO,
};
use crate::diminishing::DiminishingReturns;
use crate::numeric::{WeightMode, renormalize_favoring};
use crate::tables::ProcessingCategory;

#[derive(Debug)]
pub enum ConfigError {
    UnknownKey(String),
    TypeMismatch { path: String, expected: &'static str },
    InvalidFormula(String),
    InvalidWeight(String),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownKey(path) => write!(f, "unknown config key '{path}'"),
            ConfigError::TypeMismatch { path, expected } => {
                write!(f, "config key '{path}' expects a {expected}")
            }
            ConfigError::InvalidFormula(msg) => write!(f, "invalid diminishing-returns formula: {msg}"),
            ConfigError::InvalidWeight(msg) => write!(f, "invalid weight: {msg}"),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Invalid(e.to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementWeights {
    pub flavor: f64,
    pub compounds: f64,
    pub processing: f64,
    pub geography: f64,
}

impl Default for ElementWeights {
    fn default() -> Self {
        let [flavor, compounds, processing, geography] = DEFAULT_ELEMENT_WEIGHTS;
        Self {
            flavor,
            compounds,
            processing,
            geography,
        }
    }
}

impl ElementWeights {
    pub fn as_per_attribute(&self) -> PerAttribute<f64> {
        PerAttribute {
            flavor: self.flavor,
            compounds: self.compounds,
            processing: self.processing,
            geography: self.geography,
        }
    }

    /// Rescale to sum 1.0, or collapse into exclusive mode when one weight
    /// is ≥ 1.0.
    pub fn renormalize(&mut self) -> WeightMode {
        self.renormalize_favoring(&[])
    }

    /// Renormalize after writes to `written`: only a written weight can
    /// claim exclusive mode, and the last written one ≥ 1.0 wins.
    pub fn renormalize_favoring(&mut self, written: &[Attribute]) -> WeightMode {
        let favored: Vec<usize> = written
            .iter()
            .filter_map(|a| Attribute::ALL.iter().position(|b| b == a))
            .collect();
        let mut w = [self.flavor, self.compounds, self.processing, self.geography];
        let mode = renormalize_favoring(&mut w, &favored);
        [self.flavor, self.compounds, self.processing, self.geography] = w;
        mode
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InteractionSettings {
    pub enabled: bool,
    pub generating_strength: f64,
    pub controlling_strength: f64,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            generating_strength: DEFAULT_GENERATING_STRENGTH,
            controlling_strength: DEFAULT_CONTROLLING_STRENGTH,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiminishingSettings {
    pub formula: DiminishingReturns,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompoundSettings {
    pub ideal_l_theanine_caffeine_ratio: f64,
    pub weight: f64,
}

impl Default for CompoundSettings {
    fn default() -> Self {
        Self {
            ideal_l_theanine_caffeine_ratio: DEFAULT_IDEAL_RATIO,
            weight: DEFAULT_COMPOUND_WEIGHT,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThermalSettings {
    pub enabled: bool,
    pub adjustment_strength: f64,
}

impl Default for ThermalSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            adjustment_strength: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FlavorSettings {
    pub dominance_share: f64,
    pub dominance_ratio: f64,
}

impl Default for FlavorSettings {
    fn default() -> Self {
        Self {
            dominance_share: DEFAULT_DOMINANCE_SHARE,
            dominance_ratio: DEFAULT_DOMINANCE_RATIO,
        }
    }
}

/// Built-in multiplier for a processing category.
pub fn default_category_weight(category: ProcessingCategory) -> f64 {
    match category {
        ProcessingCategory::Cultivation => 1.0,
        ProcessingCategory::Withering => 0.9,
        ProcessingCategory::Heating => 1.0,
        ProcessingCategory::Rolling => 0.7,
        ProcessingCategory::Oxidation => 1.2,
        ProcessingCategory::Roasting => 1.2,
        ProcessingCategory::Fermentation => 1.2,
        ProcessingCategory::Drying => 0.8,
        ProcessingCategory::Scenting => 0.9,
        ProcessingCategory::Compression => 0.8,
        ProcessingCategory::Unknown => 0.5,
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProcessingSettings {
    pub category_weights: BTreeMap<String, f64>,
}

impl Default for ProcessingSettings {
    fn default() -> Self {
        Self {
            category_weights: ProcessingCategory::ALL
                .into_iter()
                .map(|c| (c.as_str().to_string(), default_category_weight(c)))
                .collect(),
        }
    }
}

/// Full settings tree, serialized with camelCase keys.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub element_weights: ElementWeights,
    pub element_interactions: InteractionSettings,
    pub diminishing_returns: DiminishingSettings,
    pub compounds: CompoundSettings,
    pub thermal: ThermalSettings,
    pub flavor: FlavorSettings,
    pub processing: ProcessingSettings,
}

fn pointer(path: &str) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!("/{}", path.replace('.', "/"))
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl EngineConfig {
    /// Value at a dotted key path; the empty path yields the whole tree.
    pub fn get(&self, path: &str) -> Option<Value> {
        let tree = serde_json::to_value(self).ok()?;
        tree.pointer(&pointer(path)).cloned()
    }

    pub fn set(&mut self, path: &str, value: Value) -> Result<(), ConfigError> {
        self.update([(path, value)])
    }

    /// Apply several key-path writes atomically, then renormalize
    /// `elementWeights`. On error nothing changes.
    pub fn update<I, K>(&mut self, entries: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let mut tree = serde_json::to_value(&*self)?;
        let mut written = Vec::new();

        for (path, value) in entries {
            let path = path.as_ref();
            if let Some(name) = path.strip_prefix("elementWeights.")
                && let Some(attr) = Attribute::ALL.into_iter().find(|a| a.as_str() == name)
            {
                written.push(attr);
            }
            let slot = tree
                .pointer_mut(&pointer(path))
                .filter(|_| !path.is_empty())
                .ok_or_else(|| ConfigError::UnknownKey(path.to_string()))?;
            if slot.is_object() {
                return Err(ConfigError::UnknownKey(path.to_string()));
            }
            if kind(slot) != kind(&value) {
                return Err(ConfigError::TypeMismatch {
                    path: path.to_string(),
                    expected: kind(slot),
                });
            }
            if path == "diminishingReturns.formula" {
                let raw = value.as_str().unwrap_or_default();
                raw.parse::<DiminishingReturns>()
                    .map_err(ConfigError::InvalidFormula)?;
            }
            *slot = value;
        }

        let mut next: EngineConfig = serde_json::from_value(tree)?;
        next.validate()?;
        next.element_weights.renormalize_favoring(&written);
        *self = next;
        Ok(())
    }

    /// Reject weights and strengths the engine cannot use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.element_weights;
        let named = [
            ("elementWeights.flavor", w.flavor),
            ("elementWeights.compounds", w.compounds),
            ("elementWeights.processing", w.processing),
            ("elementWeights.geography", w.geography),
            ("compounds.weight", self.compounds.weight),
            (
                "compounds.idealLTheanineCaffeineRatio",
                self.compounds.ideal_l_theanine_caffeine_ratio,
            ),
            (
                "elementInteractions.generatingStrength",
                self.element_interactions.generating_strength,
            ),
            (
                "elementInteractions.controllingStrength",
                self.element_interactions.controlling_strength,
            ),
            ("thermal.adjustmentStrength", self.thermal.adjustment_strength),
        ];
        for (path, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight(format!(
                    "{path} must be a finite non-negative number, got {value}"
                )));
            }
        }
        for (category, value) in &self.processing.category_weights {
            if !value.is_finite() || *value < 0.0 {
                return Err(ConfigError::InvalidWeight(format!(
                    "processing.categoryWeights.{category} must be a finite non-negative number"
                )));
            }
        }
        if w.as_per_attribute().iter().all(|(_, v)| *v <= 0.0) {
            return Err(ConfigError::InvalidWeight(
                "at least one element weight must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Typed configuration accessors read by the engine.
pub trait ConfigSource: Send + Sync {
    fn element_weights(&self) -> PerAttribute<f64> {
        ElementWeights::default().as_per_attribute()
    }

    fn interactions_enabled(&self) -> bool {
        true
    }

    fn generating_strength(&self) -> f64 {
        DEFAULT_GENERATING_STRENGTH
    }

    fn controlling_strength(&self) -> f64 {
        DEFAULT_CONTROLLING_STRENGTH
    }

    fn diminishing_returns(&self) -> DiminishingReturns {
        DiminishingReturns::default()
    }

    fn ideal_ratio(&self) -> f64 {
        DEFAULT_IDEAL_RATIO
    }

    fn compound_weight(&self) -> f64 {
        DEFAULT_COMPOUND_WEIGHT
    }

    fn thermal_enabled(&self) -> bool {
        true
    }

    fn thermal_strength(&self) -> f64 {
        1.0
    }

    fn dominance_share(&self) -> f64 {
        DEFAULT_DOMINANCE_SHARE
    }

    fn dominance_ratio(&self) -> f64 {
        DEFAULT_DOMINANCE_RATIO
    }

    fn category_weight(&self, category: ProcessingCategory) -> f64 {
        default_category_weight(category)
    }
}

/// Built-in defaults for every setting.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultConfig;

impl ConfigSource for DefaultConfig {}

impl ConfigSource for EngineConfig {
    fn element_weights(&self) -> PerAttribute<f64> {
        self.element_weights.as_per_attribute()
    }

    fn interactions_enabled(&self) -> bool {
        self.element_interactions.enabled
    }

    fn generating_strength(&self) -> f64 {
        self.element_interactions.generating_strength
    }

    fn controlling_strength(&self) -> f64 {
        self.element_interactions.controlling_strength
    }

    fn diminishing_returns(&self) -> DiminishingReturns {
        self.diminishing_returns.formula
    }

    fn ideal_ratio(&self) -> f64 {
        self.compounds.ideal_l_theanine_caffeine_ratio
    }

    fn compound_weight(&self) -> f64 {
        self.compounds.weight
    }

    fn thermal_enabled(&self) -> bool {
        self.thermal.enabled
    }

    fn thermal_strength(&self) -> f64 {
        self.thermal.adjustment_strength
    }

    fn dominance_share(&self) -> f64 {
        self.flavor.dominance_share
    }

    fn dominance_ratio(&self) -> f64 {
        self.flavor.dominance_ratio
    }

    fn category_weight(&self, category: ProcessingCategory) -> f64 {
        self.processing
            .category_weights
            .get(category.as_str())
            .copied()
            .unwrap_or_else(|| default_category_weight(category))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let c = EngineConfig::default();
        assert_eq!(c.get("elementWeights.flavor"), Some(json!(0.35)));
        assert_eq!(c.get("elementInteractions.enabled"), Some(json!(true)));
        assert_eq!(c.get("diminishingReturns.formula"), Some(json!("power:-0.3")));
        assert_eq!(c.get("compounds.idealLTheanineCaffeineRatio"), Some(json!(2.0)));
        assert_eq!(c.get("processing.categoryWeights.roasting"), Some(json!(1.2)));
        assert!(c.get("nope.nothing").is_none());
    }

    #[test]
    fn test_default_trait_matches_engine_config() {
        let d = DefaultConfig;
        let c = EngineConfig::default();
        assert_eq!(d.element_weights(), c.element_weights());
        assert_eq!(d.diminishing_returns(), c.diminishing_returns());
        assert_eq!(d.compound_weight(), c.compound_weight());
        for cat in ProcessingCategory::ALL {
            assert_eq!(d.category_weight(cat), c.category_weight(cat));
        }
    }

    #[test]
    fn test_set_renormalizes_weights() {
        let mut c = EngineConfig::default();
        c.set("elementWeights.flavor", json!(0.85)).unwrap();
        let w = c.element_weights();
        let total: f64 = w.iter().map(|(_, v)| *v).sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert!((w.flavor - 0.85 / 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_exclusive_weight() {
        let mut c = EngineConfig::default();
        c.set("elementWeights.compounds", json!(1.0)).unwrap();
        let w = c.element_weights();
        assert_eq!(w.compounds, 1.0);
        assert_eq!(w.flavor, 0.0);
        assert_eq!(w.processing, 0.0);
        assert_eq!(w.geography, 0.0);
    }

    #[test]
    fn test_new_exclusive_weight_replaces_old() {
        let mut c = EngineConfig::default();
        c.set("elementWeights.flavor", json!(1.0)).unwrap();
        c.set("elementWeights.compounds", json!(1.0)).unwrap();
        let w = c.element_weights();
        assert_eq!(w.compounds, 1.0);
        assert_eq!(w.flavor, 0.0);
    }

    #[test]
    fn test_lowering_weight_leaves_exclusive_mode() {
        let mut c = EngineConfig::default();
        c.set("elementWeights.compounds", json!(1.0)).unwrap();
        c.set("elementWeights.flavor", json!(0.5)).unwrap();
        let w = c.element_weights();
        assert!((w.flavor - 1.0 / 3.0).abs() < 1e-12);
        assert!((w.compounds - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(w.processing, 0.0);
    }

    #[test]
    fn test_unrelated_write_keeps_exclusive_weight() {
        let mut c = EngineConfig::default();
        c.set("elementWeights.compounds", json!(1.0)).unwrap();
        c.set("thermal.enabled", json!(false)).unwrap();
        assert_eq!(c.element_weights().compounds, 1.0);
        assert_eq!(c.element_weights().flavor, 0.0);
    }

    #[test]
    fn test_bulk_update_is_atomic() {
        let mut c = EngineConfig::default();
        let before = c.clone();
        let err = c
            .update([
                ("thermal.enabled", json!(false)),
                ("elementWeights.flavor", json!(-1.0)),
            ])
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidWeight(_)));
        assert_eq!(c, before);

        c.update([
            ("thermal.enabled", json!(false)),
            ("elementInteractions.generatingStrength", json!(0.1)),
        ])
        .unwrap();
        assert!(!c.thermal_enabled());
        assert_eq!(c.generating_strength(), 0.1);
    }

    #[test]
    fn test_unknown_key_and_type_mismatch() {
        let mut c = EngineConfig::default();
        assert!(matches!(
            c.set("elementWeights.color", json!(0.1)),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            c.set("elementWeights", json!(0.1)),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            c.set("thermal.enabled", json!("yes")),
            Err(ConfigError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_formula_validation() {
        let mut c = EngineConfig::default();
        c.set("diminishingReturns.formula", json!("inverse_sqrt")).unwrap();
        assert_eq!(c.diminishing_returns(), DiminishingReturns::InverseSqrt);
        assert!(matches!(
            c.set("diminishingReturns.formula", json!("count * 2")),
            Err(ConfigError::InvalidFormula(_))
        ));
    }

    #[test]
    fn test_all_zero_weights_rejected() {
        let mut c = EngineConfig::default();
        let err = c
            .update([
                ("elementWeights.flavor", json!(0.0)),
                ("elementWeights.compounds", json!(0.0)),
                ("elementWeights.processing", json!(0.0)),
                ("elementWeights.geography", json!(0.0)),
            ])
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidWeight(_)));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let c: EngineConfig =
            serde_json::from_value(json!({"thermal": {"enabled": false}})).unwrap();
        assert!(!c.thermal.enabled);
        assert_eq!(c.thermal.adjustment_strength, 1.0);
        assert_eq!(c.element_weights, ElementWeights::default());
    }
}
