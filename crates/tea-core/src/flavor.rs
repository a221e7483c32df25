//! Flavor descriptors to elements.
//!
//! A single descriptor goes through an ordered resolver chain (context
//! override, classical flavor literal, table, fuzzy table, tea type,
//! substring heuristic) with the uniform distribution as the last resort.
//! A whole profile first tries the signature patterns, then falls back to
//! per-term accumulation with diminishing returns.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::attribute::Attribute;
use crate::config::ConfigSource;
use crate::descriptor::{normalize, normalize_all};
use crate::element::ElementDistribution;
use crate::mapper::AttributeMapper;
use crate::record::TeaRecord;
use crate::tables::{LookupTables, SignaturePattern, TcmFlavor, containment_match};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    Context,
    TcmLiteral,
    Table,
    Fuzzy,
    TeaType,
    Heuristic,
    Uniform,
}

impl ResolutionSource {
    pub fn as_str(self) -> &'static str {
        match self {
            ResolutionSource::Context => "context",
            ResolutionSource::TcmLiteral => "tcm_literal",
            ResolutionSource::Table => "table",
            ResolutionSource::Fuzzy => "fuzzy",
            ResolutionSource::TeaType => "tea_type",
            ResolutionSource::Heuristic => "heuristic",
            ResolutionSource::Uniform => "uniform",
        }
    }
}

/// How one descriptor was resolved.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlavorResolution {
    pub term: String,
    pub source: ResolutionSource,
    /// Table key or rule that produced the hit.
    pub matched: Option<String>,
    pub flavor: Option<TcmFlavor>,
    pub elements: ElementDistribution,
}

/// Result of mapping a whole flavor profile.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileMapping {
    pub elements: ElementDistribution,
    pub signature: Option<String>,
    pub dominant_flavor: Option<TcmFlavor>,
    /// False when a dominant flavor kept the raw accumulation.
    pub normalized: bool,
    pub terms: Vec<FlavorResolution>,
}

type Hit = (ResolutionSource, String, Option<TcmFlavor>, ElementDistribution);
type Resolver = fn(&LookupTables, &str, &[String]) -> Option<Hit>;

const RESOLVERS: [Resolver; 6] = [
    |t, term, context| {
        t.context_rule(term, context).map(|rule| {
            let matched = format!("{}+{}", rule.descriptor, rule.context.join("|"));
            (ResolutionSource::Context, matched, Some(rule.flavor), rule.elements)
        })
    },
    |t, term, _| {
        t.tcm_literal(term).map(|f| {
            (ResolutionSource::TcmLiteral, f.to_string(), Some(f), t.tcm_base.get(f))
        })
    },
    |t, term, _| {
        t.flavors
            .get(term)
            .map(|e| (ResolutionSource::Table, term.to_string(), Some(e.flavor), e.elements))
    },
    |t, term, _| {
        containment_match(&t.flavors, term)
            .map(|(k, e)| (ResolutionSource::Fuzzy, k.to_string(), Some(e.flavor), e.elements))
    },
    |t, term, _| {
        t.tea_type(term)
            .map(|(k, d)| (ResolutionSource::TeaType, k.to_string(), None, d))
    },
    |t, term, _| {
        t.heuristic(term)
            .map(|(k, e)| (ResolutionSource::Heuristic, k.to_string(), Some(e.flavor), e.elements))
    },
];

#[derive(Clone)]
pub struct FlavorMapper {
    tables: Arc<LookupTables>,
}

impl FlavorMapper {
    pub fn new(tables: Arc<LookupTables>) -> Self {
        Self { tables }
    }

    /// Resolve one descriptor. `context` holds the normalized siblings.
    pub fn resolve_term(&self, term: &str, context: &[String]) -> FlavorResolution {
        let term = normalize(term);
        let hit = if term.is_empty() {
            None
        } else {
            RESOLVERS
                .iter()
                .find_map(|resolve| resolve(&self.tables, &term, context))
        };

        match hit {
            Some((source, matched, flavor, elements)) => {
                debug!(term = %term, ?source, matched = %matched, "flavor resolved");
                FlavorResolution {
                    term,
                    source,
                    matched: Some(matched),
                    flavor,
                    elements,
                }
            }
            None => {
                debug!(term = %term, "flavor unresolved, using uniform");
                FlavorResolution {
                    term,
                    source: ResolutionSource::Uniform,
                    matched: None,
                    flavor: None,
                    elements: ElementDistribution::uniform(),
                }
            }
        }
    }

    /// First signature pattern matched by the profile, in priority order.
    pub fn detect_signature<S: AsRef<str>>(&self, terms: &[S]) -> Option<&SignaturePattern> {
        self.tables.signature(&normalize_all(terms))
    }

    pub fn map_profile<S: AsRef<str>>(
        &self,
        terms: &[S],
        config: &dyn ConfigSource,
    ) -> ProfileMapping {
        let normalized = normalize_all(terms);
        if normalized.is_empty() {
            return ProfileMapping {
                elements: ElementDistribution::uniform(),
                signature: None,
                dominant_flavor: None,
                normalized: true,
                terms: Vec::new(),
            };
        }

        let resolutions: Vec<FlavorResolution> = unique_counts(&normalized)
            .iter()
            .map(|(term, _)| self.resolve_term(term, &normalized))
            .collect();

        if let Some(pattern) = self.detect_signature(&normalized) {
            debug!(signature = %pattern.name, "flavor signature matched");
            return ProfileMapping {
                elements: pattern.elements,
                signature: Some(pattern.name.clone()),
                dominant_flavor: None,
                normalized: true,
                terms: resolutions,
            };
        }

        let diminishing = config.diminishing_returns();
        let mut acc = ElementDistribution::zero();
        let mut total_weight = 0.0;
        let mut mass: BTreeMap<TcmFlavor, f64> = BTreeMap::new();
        let mut counts: BTreeMap<TcmFlavor, usize> = BTreeMap::new();

        for ((_, count), resolution) in unique_counts(&normalized).iter().zip(&resolutions) {
            let weight = diminishing.effective_weight(*count);
            acc.add_scaled(&resolution.elements, weight);
            total_weight += weight;
            if let Some(flavor) = resolution.flavor {
                *mass.entry(flavor).or_default() += weight;
                *counts.entry(flavor).or_default() += count;
            }
        }

        let dominant = dominant_flavor(
            &mass,
            &counts,
            total_weight,
            config.dominance_share(),
            config.dominance_ratio(),
        );

        match dominant {
            Some(flavor) => {
                debug!(%flavor, "dominant flavor, keeping raw accumulation");
                ProfileMapping {
                    elements: acc,
                    signature: None,
                    dominant_flavor: Some(flavor),
                    normalized: false,
                    terms: resolutions,
                }
            }
            None => ProfileMapping {
                elements: acc.normalized_or(ElementDistribution::uniform()),
                signature: None,
                dominant_flavor: None,
                normalized: true,
                terms: resolutions,
            },
        }
    }
}

/// Unique terms with their repeat counts, in first-seen order.
fn unique_counts(terms: &[String]) -> Vec<(String, usize)> {
    let mut out: Vec<(String, usize)> = Vec::new();
    for term in terms {
        match out.iter_mut().find(|(t, _)| t == term) {
            Some((_, count)) => *count += 1,
            None => out.push((term.clone(), 1)),
        }
    }
    out
}

/// Dominant classical flavor: its share of the weighted mass exceeds
/// `share`, or its count is at least `ratio` times the runner-up's.
fn dominant_flavor(
    mass: &BTreeMap<TcmFlavor, f64>,
    counts: &BTreeMap<TcmFlavor, usize>,
    total_weight: f64,
    share: f64,
    ratio: f64,
) -> Option<TcmFlavor> {
    let by_mass = mass
        .iter()
        .fold(None::<(TcmFlavor, f64)>, |best, (f, m)| match best {
            Some((_, b)) if b >= *m => best,
            _ => Some((*f, *m)),
        });
    if let Some((flavor, top)) = by_mass
        && total_weight > 0.0
        && top / total_weight > share
    {
        return Some(flavor);
    }

    let mut ranked: Vec<(TcmFlavor, usize)> = counts.iter().map(|(f, c)| (*f, *c)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    let (leader, top) = *ranked.first()?;
    let runner_up = ranked.get(1).map_or(0, |(_, c)| *c);
    if top >= 1 && top as f64 >= ratio * runner_up as f64 {
        Some(leader)
    } else {
        None
    }
}

impl AttributeMapper for FlavorMapper {
    fn attribute(&self) -> Attribute {
        Attribute::Flavor
    }

    /// The flavor profile when present; otherwise the tea-type table entry
    /// for `teaType`. An unknown tea type leaves flavor absent.
    fn map(&self, tea: &TeaRecord, config: &dyn ConfigSource) -> Option<ElementDistribution> {
        if let Some(profile) = &tea.flavor_profile {
            return Some(self.map_profile(profile, config).elements);
        }
        let tea_type = normalize(tea.tea_type.as_deref()?);
        let (matched, elements) = self.tables.tea_type(&tea_type)?;
        debug!(tea_type = %tea_type, matched, "flavor from tea type");
        Some(elements)
    }
}
