//! Lookup tables consumed by the mappers and the thermal engine.
//!
//! Tables are plain data: constructed once (built-in defaults or loaded from
//! a file by the store crate), shared read-only behind an `Arc`, and
//! swappable without touching any engine logic.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::builtin;
use crate::constants::FUZZY_MIN_KEY_LEN;
use crate::descriptor::{mentions, normalize};
use crate::element::{Element, ElementDistribution};
use crate::numeric::Band;

/// The five classical flavors, each tied to one element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TcmFlavor {
    Sour,
    Bitter,
    Sweet,
    Pungent,
    Salty,
}

impl TcmFlavor {
    pub const ALL: [TcmFlavor; 5] = [
        TcmFlavor::Sour,
        TcmFlavor::Bitter,
        TcmFlavor::Sweet,
        TcmFlavor::Pungent,
        TcmFlavor::Salty,
    ];

    pub fn element(self) -> Element {
        match self {
            TcmFlavor::Sour => Element::Wood,
            TcmFlavor::Bitter => Element::Fire,
            TcmFlavor::Sweet => Element::Earth,
            TcmFlavor::Pungent => Element::Metal,
            TcmFlavor::Salty => Element::Water,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TcmFlavor::Sour => "sour",
            TcmFlavor::Bitter => "bitter",
            TcmFlavor::Sweet => "sweet",
            TcmFlavor::Pungent => "pungent",
            TcmFlavor::Salty => "salty",
        }
    }
}

impl fmt::Display for TcmFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Base distribution for each classical flavor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TcmBase {
    pub sour: ElementDistribution,
    pub bitter: ElementDistribution,
    pub sweet: ElementDistribution,
    pub pungent: ElementDistribution,
    pub salty: ElementDistribution,
}

impl TcmBase {
    pub fn get(&self, flavor: TcmFlavor) -> ElementDistribution {
        match flavor {
            TcmFlavor::Sour => self.sour,
            TcmFlavor::Bitter => self.bitter,
            TcmFlavor::Sweet => self.sweet,
            TcmFlavor::Pungent => self.pungent,
            TcmFlavor::Salty => self.salty,
        }
    }
}

/// A flavor descriptor's classical flavor and element distribution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlavorEntry {
    pub flavor: TcmFlavor,
    pub elements: ElementDistribution,
}

/// Hand-tuned mapping for a descriptor seen alongside any of `context`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContextRule {
    pub descriptor: String,
    pub context: Vec<String>,
    pub flavor: TcmFlavor,
    pub elements: ElementDistribution,
}

/// A named signature: every clause must be met by at least one descriptor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignaturePattern {
    pub name: String,
    pub clauses: Vec<Vec<String>>,
    pub elements: ElementDistribution,
}

impl SignaturePattern {
    pub fn matches(&self, terms: &[String]) -> bool {
        !self.clauses.is_empty()
            && self.clauses.iter().all(|clause| {
                clause
                    .iter()
                    .any(|needle| terms.iter().any(|t| mentions(t, needle)))
            })
    }
}

/// Substring heuristic pointing at a canonical flavor-table entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeuristicRule {
    pub needles: Vec<String>,
    pub canonical: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingCategory {
    Cultivation,
    Withering,
    Heating,
    Rolling,
    Oxidation,
    Roasting,
    Fermentation,
    Drying,
    Scenting,
    Compression,
    Unknown,
}

impl ProcessingCategory {
    pub const ALL: [ProcessingCategory; 11] = [
        ProcessingCategory::Cultivation,
        ProcessingCategory::Withering,
        ProcessingCategory::Heating,
        ProcessingCategory::Rolling,
        ProcessingCategory::Oxidation,
        ProcessingCategory::Roasting,
        ProcessingCategory::Fermentation,
        ProcessingCategory::Drying,
        ProcessingCategory::Scenting,
        ProcessingCategory::Compression,
        ProcessingCategory::Unknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProcessingCategory::Cultivation => "cultivation",
            ProcessingCategory::Withering => "withering",
            ProcessingCategory::Heating => "heating",
            ProcessingCategory::Rolling => "rolling",
            ProcessingCategory::Oxidation => "oxidation",
            ProcessingCategory::Roasting => "roasting",
            ProcessingCategory::Fermentation => "fermentation",
            ProcessingCategory::Drying => "drying",
            ProcessingCategory::Scenting => "scenting",
            ProcessingCategory::Compression => "compression",
            ProcessingCategory::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ProcessingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProcessingEntry {
    pub category: ProcessingCategory,
    pub elements: ElementDistribution,
}

/// Adjustment applied by a processing combination.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Boost {
    Multiply { element: Element, factor: f64 },
    Add { element: Element, amount: f64 },
}

impl Boost {
    pub fn apply(&self, distribution: &mut ElementDistribution) {
        match *self {
            Boost::Multiply { element, factor } => distribution[element] *= factor,
            Boost::Add { element, amount } => distribution[element] += amount,
        }
    }
}

/// Named processing combination; cumulative with every other match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProcessingCombination {
    pub name: String,
    pub clauses: Vec<Vec<String>>,
    pub boosts: Vec<Boost>,
}

impl ProcessingCombination {
    pub fn matches(&self, tags: &[String]) -> bool {
        !self.clauses.is_empty()
            && self.clauses.iter().all(|clause| {
                clause
                    .iter()
                    .any(|needle| tags.iter().any(|t| mentions(t, needle)))
            })
    }
}

/// Five-band step tables, one per geographic factor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeographyBands {
    pub altitude: Vec<Band<ElementDistribution>>,
    pub humidity: Vec<Band<ElementDistribution>>,
    pub temperature: Vec<Band<ElementDistribution>>,
    pub solar_radiation: Vec<Band<ElementDistribution>>,
    /// Keyed by absolute latitude.
    pub seasonal: Vec<Band<ElementDistribution>>,
}

/// Banded thermal contributions of the geographic factors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeographyThermalBands {
    pub altitude: Vec<Band<f64>>,
    pub temperature: Vec<Band<f64>>,
    pub humidity: Vec<Band<f64>>,
}

/// Every table the engine consults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LookupTables {
    pub tcm_base: TcmBase,
    pub tcm_aliases: BTreeMap<String, TcmFlavor>,
    pub flavors: BTreeMap<String, FlavorEntry>,
    pub context_rules: Vec<ContextRule>,
    pub signatures: Vec<SignaturePattern>,
    pub heuristics: Vec<HeuristicRule>,
    pub tea_types: BTreeMap<String, ElementDistribution>,
    pub processing: BTreeMap<String, ProcessingEntry>,
    pub processing_combinations: Vec<ProcessingCombination>,
    pub geography: GeographyBands,
    pub flavor_thermal: BTreeMap<String, f64>,
    pub processing_thermal: BTreeMap<String, f64>,
    pub geography_thermal: GeographyThermalBands,
}

impl Default for LookupTables {
    fn default() -> Self {
        builtin::tables()
    }
}

/// Longest key contained in `term` (whole words), else the shortest key
/// that contains `term`. Keys shorter than the fuzzy minimum are skipped.
/// Ties resolve to the first key in sorted order.
pub fn containment_match<'a, V>(
    map: &'a BTreeMap<String, V>,
    term: &str,
) -> Option<(&'a str, &'a V)> {
    let mut best: Option<(&'a str, &'a V)> = None;
    for (key, value) in map {
        if key.len() < FUZZY_MIN_KEY_LEN {
            continue;
        }
        if mentions(term, key) && best.is_none_or(|(b, _)| key.len() > b.len()) {
            best = Some((key.as_str(), value));
        }
    }
    if best.is_some() {
        return best;
    }

    if term.len() < FUZZY_MIN_KEY_LEN {
        return None;
    }
    for (key, value) in map {
        if key.contains(term) && best.is_none_or(|(b, _)| key.len() < b.len()) {
            best = Some((key.as_str(), value));
        }
    }
    best
}

impl LookupTables {
    /// Built-in tables.
    pub fn builtin() -> Self {
        builtin::tables()
    }

    /// Re-key every string-keyed table through `descriptor::normalize` so
    /// tables loaded from hand-written files match normalized input.
    pub fn normalized(mut self) -> Self {
        fn rekey<V>(map: BTreeMap<String, V>) -> BTreeMap<String, V> {
            map.into_iter().map(|(k, v)| (normalize(&k), v)).collect()
        }
        fn renorm(terms: &mut [String]) {
            for t in terms.iter_mut() {
                *t = normalize(t);
            }
        }

        self.tcm_aliases = rekey(self.tcm_aliases);
        self.flavors = rekey(self.flavors);
        self.tea_types = rekey(self.tea_types);
        self.processing = rekey(self.processing);
        self.flavor_thermal = rekey(self.flavor_thermal);
        self.processing_thermal = rekey(self.processing_thermal);

        for rule in &mut self.context_rules {
            rule.descriptor = normalize(&rule.descriptor);
            renorm(&mut rule.context);
        }
        for pattern in &mut self.signatures {
            for clause in &mut pattern.clauses {
                renorm(clause);
            }
        }
        for rule in &mut self.heuristics {
            rule.canonical = normalize(&rule.canonical);
        }
        for combo in &mut self.processing_combinations {
            for clause in &mut combo.clauses {
                renorm(clause);
            }
        }
        self
    }

    /// Literal classical flavor name or alias.
    pub fn tcm_literal(&self, term: &str) -> Option<TcmFlavor> {
        TcmFlavor::ALL
            .into_iter()
            .find(|f| f.as_str() == term)
            .or_else(|| self.tcm_aliases.get(term).copied())
    }

    /// First context rule for `term` whose trigger set meets `context`.
    pub fn context_rule(&self, term: &str, context: &[String]) -> Option<&ContextRule> {
        self.context_rules.iter().find(|rule| {
            rule.descriptor == term
                && rule
                    .context
                    .iter()
                    .any(|c| context.iter().any(|s| s != term && mentions(s, c)))
        })
    }

    /// First signature (in priority order) matched by the whole profile.
    pub fn signature(&self, terms: &[String]) -> Option<&SignaturePattern> {
        self.signatures.iter().find(|p| p.matches(terms))
    }

    /// Canonical flavor-table key suggested by a substring heuristic.
    pub fn heuristic(&self, term: &str) -> Option<(&str, &FlavorEntry)> {
        self.heuristics
            .iter()
            .find(|rule| rule.needles.iter().any(|n| term.contains(n.as_str())))
            .and_then(|rule| {
                self.flavors
                    .get_key_value(&rule.canonical)
                    .map(|(k, e)| (k.as_str(), e))
            })
    }

    /// Tea type named anywhere in `term` (longest name wins).
    pub fn tea_type(&self, term: &str) -> Option<(&str, ElementDistribution)> {
        self.tea_types
            .iter()
            .filter(|(name, _)| term.contains(name.as_str()))
            .max_by_key(|(name, _)| name.len())
            .map(|(name, d)| (name.as_str(), *d))
    }

    /// Thermal value of a flavor term: exact, then containment.
    pub fn flavor_thermal(&self, term: &str) -> Option<f64> {
        self.flavor_thermal
            .get(term)
            .copied()
            .or_else(|| containment_match(&self.flavor_thermal, term).map(|(_, v)| *v))
    }

    /// Thermal value of a processing tag: exact, then containment.
    pub fn processing_thermal(&self, tag: &str) -> Option<f64> {
        self.processing_thermal
            .get(tag)
            .copied()
            .or_else(|| containment_match(&self.processing_thermal, tag).map(|(_, v)| *v))
    }
}
