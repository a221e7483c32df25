use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{EPSILON, UNIFORM_SHARE};

/// One of the five fixed categories. Declaration order is the generating
/// order and is used for tie-breaking everywhere.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Wood,
    Fire,
    Earth,
    Metal,
    Water,
}

impl Element {
    pub const ALL: [Element; 5] = [
        Element::Wood,
        Element::Fire,
        Element::Earth,
        Element::Metal,
        Element::Water,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 5]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Element::Wood => "wood",
            Element::Fire => "fire",
            Element::Earth => "earth",
            Element::Metal => "metal",
            Element::Water => "water",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Element {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "wood" => Ok(Element::Wood),
            "fire" => Ok(Element::Fire),
            "earth" => Ok(Element::Earth),
            "metal" => Ok(Element::Metal),
            "water" => Ok(Element::Water),
            other => Err(format!("unknown element '{other}'")),
        }
    }
}

/// Five non-negative values, one per element.
///
/// Intermediate distributions (per-attribute contributions) may sum to
/// anything; only the outputs of the final combination steps are held to
/// the sum-to-one invariant. Values are plain `f64`, so every mapper hands
/// out an owned copy and nothing downstream can alias a lookup table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementDistribution {
    pub wood: f64,
    pub fire: f64,
    pub earth: f64,
    pub metal: f64,
    pub water: f64,
}

impl ElementDistribution {
    pub const fn new(wood: f64, fire: f64, earth: f64, metal: f64, water: f64) -> Self {
        Self {
            wood,
            fire,
            earth,
            metal,
            water,
        }
    }

    /// All five values zero. Marks insufficient data.
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0, 0.0)
    }

    /// Flat 0.2 in every category.
    pub const fn uniform() -> Self {
        Self::new(
            UNIFORM_SHARE,
            UNIFORM_SHARE,
            UNIFORM_SHARE,
            UNIFORM_SHARE,
            UNIFORM_SHARE,
        )
    }

    /// All mass in a single element.
    pub fn pure(element: Element) -> Self {
        let mut d = Self::zero();
        d[element] = 1.0;
        d
    }

    pub fn from_array(values: [f64; 5]) -> Self {
        Self::new(values[0], values[1], values[2], values[3], values[4])
    }

    pub fn to_array(self) -> [f64; 5] {
        [self.wood, self.fire, self.earth, self.metal, self.water]
    }

    /// Iterate `(element, value)` pairs in element order.
    pub fn iter(&self) -> impl Iterator<Item = (Element, f64)> + '_ {
        Element::ALL.iter().map(move |&e| (e, self[e]))
    }

    pub fn total(&self) -> f64 {
        self.wood + self.fire + self.earth + self.metal + self.water
    }

    pub fn is_zero(&self) -> bool {
        self.iter().all(|(_, v)| v.abs() < EPSILON)
    }

    pub fn add(&mut self, element: Element, amount: f64) {
        self[element] += amount;
    }

    /// Accumulate `other * weight` into self.
    pub fn add_scaled(&mut self, other: &ElementDistribution, weight: f64) {
        for e in Element::ALL {
            self[e] += other[e] * weight;
        }
    }

    pub fn scaled(&self, factor: f64) -> Self {
        let mut out = *self;
        for e in Element::ALL {
            out[e] *= factor;
        }
        out
    }

    /// Replace negative and non-finite values with zero.
    pub fn clamp_non_negative(&mut self) {
        for e in Element::ALL {
            let v = self[e];
            if !v.is_finite() || v < 0.0 {
                self[e] = 0.0;
            }
        }
    }

    /// Clamp every value into [0, 1] without renormalizing.
    pub fn clamp_unit(&mut self) {
        self.clamp_non_negative();
        for e in Element::ALL {
            self[e] = self[e].min(1.0);
        }
    }

    /// Rescale in place so the values sum to `target`.
    /// Returns false (and leaves self untouched) when the current total is ~0.
    pub fn rescale_to(&mut self, target: f64) -> bool {
        let total = self.total();
        if total <= EPSILON || !total.is_finite() {
            return false;
        }
        let factor = target / total;
        for e in Element::ALL {
            self[e] *= factor;
        }
        true
    }

    /// Normalized copy summing to 1.0, or `fallback` when the total is ~0.
    pub fn normalized_or(&self, fallback: ElementDistribution) -> Self {
        let mut out = *self;
        out.clamp_non_negative();
        if out.rescale_to(1.0) { out } else { fallback }
    }

    /// Normalized copy summing to 1.0; a zero vector stays zero.
    pub fn normalized(&self) -> Self {
        self.normalized_or(Self::zero())
    }

    /// Elements ordered by value, largest first. Ties keep element order.
    pub fn ranked(&self) -> Vec<(Element, f64)> {
        let mut pairs: Vec<(Element, f64)> = self.iter().collect();
        pairs.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        pairs
    }

    /// Top two elements. Each is None unless its value is positive.
    pub fn dominant_pair(&self) -> (Option<Element>, Option<Element>) {
        let ranked = self.ranked();
        let positive = |(e, v): (Element, f64)| (v > 0.0).then_some(e);
        match positive(ranked[0]) {
            Some(dominant) => (Some(dominant), positive(ranked[1])),
            None => (None, None),
        }
    }

    /// Largest absolute per-element difference.
    pub fn max_abs_diff(&self, other: &ElementDistribution) -> f64 {
        Element::ALL
            .iter()
            .map(|&e| (self[e] - other[e]).abs())
            .fold(0.0, f64::max)
    }
}

impl Index<Element> for ElementDistribution {
    type Output = f64;

    fn index(&self, element: Element) -> &f64 {
        match element {
            Element::Wood => &self.wood,
            Element::Fire => &self.fire,
            Element::Earth => &self.earth,
            Element::Metal => &self.metal,
            Element::Water => &self.water,
        }
    }
}

impl IndexMut<Element> for ElementDistribution {
    fn index_mut(&mut self, element: Element) -> &mut f64 {
        match element {
            Element::Wood => &mut self.wood,
            Element::Fire => &mut self.fire,
            Element::Earth => &mut self.earth,
            Element::Metal => &mut self.metal,
            Element::Water => &mut self.water,
        }
    }
}

impl fmt::Display for ElementDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "wood={:.3} fire={:.3} earth={:.3} metal={:.3} water={:.3}",
            self.wood, self.fire, self.earth, self.metal, self.water
        )
    }
}
