//! Processing-method tags to elements.
//!
//! Tags resolve exact, then by containment, then to the uniform
//! distribution. Tags are grouped by processing category; a category seen
//! several times is diminished like a repeated flavor descriptor and scaled
//! by its configured category weight. Named combinations then boost
//! specific elements, cumulatively.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::attribute::Attribute;
use crate::config::ConfigSource;
use crate::descriptor::normalize_all;
use crate::element::ElementDistribution;
use crate::mapper::AttributeMapper;
use crate::record::TeaRecord;
use crate::tables::{LookupTables, ProcessingCategory, containment_match};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TagSource {
    Exact,
    Fuzzy,
    Uniform,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingResolution {
    pub tag: String,
    pub source: TagSource,
    pub matched: Option<String>,
    pub category: ProcessingCategory,
    pub elements: ElementDistribution,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingMapping {
    pub elements: ElementDistribution,
    pub combinations: Vec<String>,
    pub tags: Vec<ProcessingResolution>,
}

#[derive(Clone)]
pub struct ProcessingMapper {
    tables: Arc<LookupTables>,
}

impl ProcessingMapper {
    pub fn new(tables: Arc<LookupTables>) -> Self {
        Self { tables }
    }

    /// Resolve one already-normalized tag.
    pub fn resolve_tag(&self, tag: &str) -> ProcessingResolution {
        if let Some(entry) = self.tables.processing.get(tag) {
            return ProcessingResolution {
                tag: tag.to_string(),
                source: TagSource::Exact,
                matched: Some(tag.to_string()),
                category: entry.category,
                elements: entry.elements,
            };
        }
        if let Some((key, entry)) = containment_match(&self.tables.processing, tag) {
            return ProcessingResolution {
                tag: tag.to_string(),
                source: TagSource::Fuzzy,
                matched: Some(key.to_string()),
                category: entry.category,
                elements: entry.elements,
            };
        }
        debug!(tag, "processing tag unresolved, using uniform");
        ProcessingResolution {
            tag: tag.to_string(),
            source: TagSource::Uniform,
            matched: None,
            category: ProcessingCategory::Unknown,
            elements: ElementDistribution::uniform(),
        }
    }

    pub fn map_methods<S: AsRef<str>>(
        &self,
        methods: &[S],
        config: &dyn ConfigSource,
    ) -> ProcessingMapping {
        let tags = normalize_all(methods);
        if tags.is_empty() {
            return ProcessingMapping {
                elements: ElementDistribution::uniform(),
                combinations: Vec::new(),
                tags: Vec::new(),
            };
        }

        let resolutions: Vec<ProcessingResolution> =
            tags.iter().map(|t| self.resolve_tag(t)).collect();

        // category -> (summed tag distributions, tag count), first-seen order
        let mut groups: Vec<(ProcessingCategory, ElementDistribution, usize)> = Vec::new();
        for r in &resolutions {
            match groups.iter_mut().find(|(c, _, _)| *c == r.category) {
                Some((_, sum, count)) => {
                    sum.add_scaled(&r.elements, 1.0);
                    *count += 1;
                }
                None => groups.push((r.category, r.elements, 1)),
            }
        }

        let diminishing = config.diminishing_returns();
        let mut acc = ElementDistribution::zero();
        for (category, sum, count) in &groups {
            let mean = sum.scaled(1.0 / *count as f64);
            let weight = diminishing.effective_weight(*count) * config.category_weight(*category);
            acc.add_scaled(&mean, weight);
        }
        let mut elements = acc.normalized_or(ElementDistribution::uniform());

        let mut combinations = Vec::new();
        for combo in &self.tables.processing_combinations {
            if combo.matches(&tags) {
                debug!(combination = %combo.name, "processing combination applied");
                for boost in &combo.boosts {
                    boost.apply(&mut elements);
                }
                combinations.push(combo.name.clone());
            }
        }

        ProcessingMapping {
            elements: elements.normalized_or(ElementDistribution::uniform()),
            combinations,
            tags: resolutions,
        }
    }
}

impl AttributeMapper for ProcessingMapper {
    fn attribute(&self) -> Attribute {
        Attribute::Processing
    }

    fn map(&self, tea: &TeaRecord, config: &dyn ConfigSource) -> Option<ElementDistribution> {
        tea.processing_methods
            .as_ref()
            .map(|methods| self.map_methods(methods, config).elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DefaultConfig;
    use crate::element::Element;
    use approx::assert_relative_eq;

    fn mapper() -> ProcessingMapper {
        ProcessingMapper::new(Arc::new(LookupTables::builtin()))
    }

    #[test]
    fn test_resolve_exact_fuzzy_unknown() {
        let m = mapper();
        assert_eq!(m.resolve_tag("steamed").source, TagSource::Exact);
        let fuzzy = m.resolve_tag("lightly steamed");
        assert_eq!(fuzzy.source, TagSource::Fuzzy);
        assert_eq!(fuzzy.matched.as_deref(), Some("steamed"));
        let unknown = m.resolve_tag("vibes");
        assert_eq!(unknown.category, ProcessingCategory::Unknown);
        assert_eq!(unknown.elements, ElementDistribution::uniform());
    }

    #[test]
    fn test_empty_list_is_uniform() {
        let empty: Vec<String> = Vec::new();
        let out = mapper().map_methods(&empty, &DefaultConfig);
        assert_eq!(out.elements, ElementDistribution::uniform());
    }

    #[test]
    fn test_output_sums_to_one() {
        let out = mapper().map_methods(&["Pan-Fired", "rolled", "sun dried"], &DefaultConfig);
        assert_relative_eq!(out.elements.total(), 1.0, epsilon = 1e-12);
        assert!(out.combinations.is_empty());
    }

    #[test]
    fn test_combination_boosts_wood() {
        let m = mapper();
        let plain = m.map_methods(&["shade grown", "pan fired"], &DefaultConfig);
        let gyokuro = m.map_methods(&["shade grown", "steamed"], &DefaultConfig);
        assert_eq!(gyokuro.combinations, vec!["gyokuro_style".to_string()]);
        assert_eq!(gyokuro.elements.dominant_pair().0, Some(Element::Wood));
        assert!(gyokuro.elements.wood > plain.elements.wood);
    }

    #[test]
    fn test_combinations_are_cumulative() {
        let out = mapper().map_methods(
            &["pile fermented", "aged", "compressed"],
            &DefaultConfig,
        );
        assert!(out.combinations.contains(&"ripe_puerh".to_string()));
        assert!(out.combinations.contains(&"aged_compressed".to_string()));
    }

    #[test]
    fn test_repeated_category_diminishes() {
        let m = mapper();
        let one = m.map_methods(&["roasted", "steamed"], &DefaultConfig);
        let two = m.map_methods(&["roasted", "charcoal roasted", "steamed"], &DefaultConfig);
        // a second roasting tag adds fire, but less than doubling the category would
        assert!(two.elements.fire > one.elements.fire);
        let linear_share = 2.0 * 1.2 / (2.0 * 1.2 + 1.0);
        let roast_fire = two.elements.fire;
        assert!(roast_fire < linear_share);
    }
}
