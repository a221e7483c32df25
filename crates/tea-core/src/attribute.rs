use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

/// The four attribute classes a tea record carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Flavor,
    Compounds,
    Processing,
    Geography,
}

impl Attribute {
    pub const ALL: [Attribute; 4] = [
        Attribute::Flavor,
        Attribute::Compounds,
        Attribute::Processing,
        Attribute::Geography,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Attribute::Flavor => "flavor",
            Attribute::Compounds => "compounds",
            Attribute::Processing => "processing",
            Attribute::Geography => "geography",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value per attribute class. Used for weights, component scores and
/// thermal components so the four classes are always reported together.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PerAttribute<T> {
    pub flavor: T,
    pub compounds: T,
    pub processing: T,
    pub geography: T,
}

impl<T> PerAttribute<T> {
    pub fn from_fn(mut f: impl FnMut(Attribute) -> T) -> Self {
        Self {
            flavor: f(Attribute::Flavor),
            compounds: f(Attribute::Compounds),
            processing: f(Attribute::Processing),
            geography: f(Attribute::Geography),
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(Attribute, &T) -> U) -> PerAttribute<U> {
        PerAttribute::from_fn(|a| f(a, &self[a]))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Attribute, &T)> {
        Attribute::ALL.into_iter().map(move |a| (a, &self[a]))
    }
}

impl<T> Index<Attribute> for PerAttribute<T> {
    type Output = T;

    fn index(&self, attribute: Attribute) -> &T {
        match attribute {
            Attribute::Flavor => &self.flavor,
            Attribute::Compounds => &self.compounds,
            Attribute::Processing => &self.processing,
            Attribute::Geography => &self.geography,
        }
    }
}

impl<T> IndexMut<Attribute> for PerAttribute<T> {
    fn index_mut(&mut self, attribute: Attribute) -> &mut T {
        match attribute {
            Attribute::Flavor => &mut self.flavor,
            Attribute::Compounds => &mut self.compounds,
            Attribute::Processing => &mut self.processing,
            Attribute::Geography => &mut self.geography,
        }
    }
}
