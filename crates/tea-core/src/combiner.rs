//! Combines the four attribute distributions into one analysis.
//!
//! Fixed order per call:
//! 1. run the four mappers; `None` marks an absent class
//! 2. resolve weights over present classes (exclusive mode or renormalize)
//! 3. no class present: insufficient-data result
//! 4. weighted sum, renormalized to 1.0
//! 5. thermal analysis and adjustment
//! 6. generating/controlling interaction pass
//! 7. dominant and supporting element
//!
//! A combiner holds no mutable state. Identical input and configuration
//! give bit-identical output, and a single combiner may be shared across
//! threads.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::attribute::{Attribute, PerAttribute};
use crate::config::{ConfigSource, EngineConfig};
use crate::element::{Element, ElementDistribution};
use crate::interaction::InteractionGraph;
use crate::mapper::MapperSet;
use crate::numeric::{WeightMode, renormalize_weights};
use crate::record::TeaRecord;
use crate::tables::LookupTables;
use crate::thermal::{ThermalAnalysis, ThermalEngine, adjust};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Complete,
    InsufficientData,
}

/// Everything the combiner produces for one tea.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementAnalysis {
    pub elements: ElementDistribution,
    pub dominant_element: Option<Element>,
    pub supporting_element: Option<Element>,
    /// Raw mapper output; the zero distribution for absent classes.
    pub component_scores: PerAttribute<ElementDistribution>,
    pub applied_weights: PerAttribute<f64>,
    /// Weighted blend before the thermal and interaction passes.
    pub blended_elements: ElementDistribution,
    pub thermal_analysis: ThermalAnalysis,
    pub status: AnalysisStatus,
    pub status_message: String,
}

impl ElementAnalysis {
    pub fn insufficient(thermal_analysis: ThermalAnalysis) -> Self {
        Self {
            elements: ElementDistribution::zero(),
            dominant_element: None,
            supporting_element: None,
            component_scores: PerAttribute::default(),
            applied_weights: PerAttribute::default(),
            blended_elements: ElementDistribution::zero(),
            thermal_analysis,
            status: AnalysisStatus::InsufficientData,
            status_message: "Insufficient data: the record has no flavor, compound, \
                             processing or geography information"
                .to_string(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == AnalysisStatus::Complete
    }
}

/// Resolve configured weights against the classes that produced data.
///
/// Absent classes get 0. If a present class is configured ≥ 1.0 it takes
/// everything; otherwise present weights are rescaled to sum 1.0. Present
/// classes whose configured weights are all zero share equally.
pub fn resolve_weights(
    configured: &PerAttribute<f64>,
    present: &PerAttribute<bool>,
) -> (PerAttribute<f64>, WeightMode) {
    let mut raw = Attribute::ALL.map(|a| if present[a] { configured[a] } else { 0.0 });
    let mut mode = renormalize_weights(&mut raw);

    if mode == WeightMode::Empty {
        let n = Attribute::ALL.iter().filter(|&&a| present[a]).count();
        if n > 0 {
            raw = Attribute::ALL.map(|a| if present[a] { 1.0 / n as f64 } else { 0.0 });
            mode = WeightMode::Proportional;
        }
    }

    let [flavor, compounds, processing, geography] = raw;
    let weights = PerAttribute {
        flavor,
        compounds,
        processing,
        geography,
    };
    (weights, mode)
}

pub struct Combiner<C: ConfigSource = EngineConfig> {
    config: C,
    tables: Arc<LookupTables>,
    mappers: MapperSet,
    thermal: ThermalEngine,
    graph: InteractionGraph,
}

impl Default for Combiner<EngineConfig> {
    fn default() -> Self {
        Self::new(EngineConfig::default(), Arc::new(LookupTables::builtin()))
    }
}

impl<C: ConfigSource> Combiner<C> {
    pub fn new(config: C, tables: Arc<LookupTables>) -> Self {
        Self {
            config,
            mappers: MapperSet::new(Arc::clone(&tables)),
            thermal: ThermalEngine::new(Arc::clone(&tables)),
            tables,
            graph: InteractionGraph::new(),
        }
    }

    /// Swap in a custom mapper set.
    pub fn with_mappers(mut self, mappers: MapperSet) -> Self {
        self.mappers = mappers;
        self
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    pub fn tables(&self) -> &Arc<LookupTables> {
        &self.tables
    }

    pub fn mappers(&self) -> &MapperSet {
        &self.mappers
    }

    pub fn thermal(&self) -> &ThermalEngine {
        &self.thermal
    }

    pub fn combine(&self, tea: &TeaRecord) -> ElementAnalysis {
        let config: &dyn ConfigSource = &self.config;

        // Step 1
        let scores = self.mappers.map_all(tea, config);
        let present = scores.map(|_, s| s.is_some());

        // Step 2
        let (weights, mode) = resolve_weights(&config.element_weights(), &present);
        let thermal_analysis = self.thermal.analyze(tea);

        // Step 3
        if !present.iter().any(|(_, p)| *p) {
            debug!(tea = tea.display_name(), "no usable attribute data");
            return ElementAnalysis::insufficient(thermal_analysis);
        }

        // Step 4
        let mut blended = ElementDistribution::zero();
        for (attribute, score) in scores.iter() {
            if let Some(d) = score {
                blended.add_scaled(d, weights[attribute]);
            }
        }
        let blended = blended.normalized_or(ElementDistribution::uniform());

        // Step 5
        let mut elements = if config.thermal_enabled() {
            adjust(
                &blended,
                thermal_analysis.total_thermal,
                config.thermal_strength(),
            )
        } else {
            blended
        };

        // Step 6
        if config.interactions_enabled() {
            let interacted = self.graph.apply(
                &elements,
                config.generating_strength(),
                config.controlling_strength(),
            );
            if !interacted.is_zero() {
                elements = interacted;
            }
        }

        // Step 7
        let (dominant, supporting) = elements.dominant_pair();

        let used: Vec<&str> = Attribute::ALL
            .iter()
            .filter(|&&a| weights[a] > 0.0)
            .map(|a| a.as_str())
            .collect();
        let status_message = match mode {
            WeightMode::Exclusive(_) => format!("Complete (exclusive weighting on {})", used.join(", ")),
            _ => format!("Complete using {}", used.join(", ")),
        };

        debug!(
            tea = tea.display_name(),
            dominant = ?dominant,
            thermal = thermal_analysis.total_thermal,
            "analysis complete"
        );

        ElementAnalysis {
            elements,
            dominant_element: dominant,
            supporting_element: supporting,
            component_scores: scores.map(|_, s| s.unwrap_or_else(ElementDistribution::zero)),
            applied_weights: weights,
            blended_elements: blended,
            thermal_analysis,
            status: AnalysisStatus::Complete,
            status_message,
        }
    }
}
