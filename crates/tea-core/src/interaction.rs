//! Generating and controlling cycles over the five elements.
//!
//! Generating: wood → fire → earth → metal → water → wood.
//! Controlling: each element suppresses the one two steps ahead
//! (wood → earth → water → fire → metal → wood).

use crate::element::{Element, ElementDistribution};

/// Fixed 5-node graph with two edge sets. Immutable and `Copy`; the
/// adjacency is derived from element order, not stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InteractionGraph;

impl InteractionGraph {
    pub fn new() -> Self {
        Self
    }

    /// The element that `source` feeds.
    pub fn generates(&self, source: Element) -> Element {
        Element::from_index(source.index() + 1)
    }

    /// The element that `source` suppresses.
    pub fn controls(&self, source: Element) -> Element {
        Element::from_index(source.index() + 2)
    }

    /// All generating edges in element order.
    pub fn generating_edges(&self) -> [(Element, Element); 5] {
        Element::ALL.map(|e| (e, self.generates(e)))
    }

    /// All controlling edges in element order.
    pub fn controlling_edges(&self) -> [(Element, Element); 5] {
        Element::ALL.map(|e| (e, self.controls(e)))
    }

    /// Apply one interaction pass and renormalize to 1.0.
    ///
    /// Every element adds `value * generating` to the element it feeds and
    /// loses `controller_value * controlling`. All reads come from the input
    /// snapshot, so the result does not depend on iteration order. A zero
    /// input stays zero.
    pub fn apply(
        &self,
        distribution: &ElementDistribution,
        generating: f64,
        controlling: f64,
    ) -> ElementDistribution {
        let snapshot = *distribution;
        let mut out = snapshot;

        for (source, target) in self.generating_edges() {
            out[target] += snapshot[source] * generating;
        }
        for (controller, target) in self.controlling_edges() {
            out[target] -= snapshot[controller] * controlling;
        }

        out.clamp_non_negative();
        out.normalized()
    }
}
