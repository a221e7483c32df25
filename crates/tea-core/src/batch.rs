//! Batch analysis: fan many records out across the rayon pool.
//!
//! Each `combine` call is independent and side-effect free, so records are
//! analyzed in parallel and collected back in input order.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::Serialize;

use crate::combiner::{Combiner, ElementAnalysis};
use crate::config::ConfigSource;
use crate::element::Element;
use crate::record::TeaRecord;

/// Analyze every record. `out[i]` is the analysis of `records[i]`.
pub fn analyze_batch<C: ConfigSource>(
    combiner: &Combiner<C>,
    records: &[TeaRecord],
) -> Vec<ElementAnalysis> {
    records.par_iter().map(|tea| combiner.combine(tea)).collect()
}

/// Aggregate counts over a batch.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub total: usize,
    pub complete: usize,
    pub insufficient: usize,
    pub by_dominant: BTreeMap<Element, usize>,
    pub mean_thermal: Option<f64>,
}

pub fn summarize(analyses: &[ElementAnalysis]) -> BatchSummary {
    let mut summary = BatchSummary {
        total: analyses.len(),
        ..Default::default()
    };
    let mut thermal_sum = 0.0;

    for a in analyses {
        if a.is_complete() {
            summary.complete += 1;
            thermal_sum += a.thermal_analysis.total_thermal;
        } else {
            summary.insufficient += 1;
        }
        if let Some(e) = a.dominant_element {
            *summary.by_dominant.entry(e).or_default() += 1;
        }
    }
    if summary.complete > 0 {
        summary.mean_thermal = Some(thermal_sum / summary.complete as f64);
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<TeaRecord> {
        vec![
            TeaRecord::named("a").with_flavors(["grassy", "umami"]),
            TeaRecord::named("b"),
            TeaRecord::named("c").with_compounds(9.0, 2.0),
            TeaRecord::named("d").with_processing(["charcoal roasted", "rolled"]),
        ]
    }

    #[test]
    fn test_batch_matches_sequential_in_order() {
        let combiner = Combiner::default();
        let recs = records();
        let batch = analyze_batch(&combiner, &recs);
        assert_eq!(batch.len(), recs.len());
        for (tea, analysis) in recs.iter().zip(&batch) {
            assert_eq!(&combiner.combine(tea), analysis);
        }
    }

    #[test]
    fn test_empty_batch() {
        assert!(analyze_batch(&Combiner::default(), &[]).is_empty());
    }

    #[test]
    fn test_summary_counts() {
        let combiner = Combiner::default();
        let batch = analyze_batch(&combiner, &records());
        let s = summarize(&batch);
        assert_eq!(s.total, 4);
        assert_eq!(s.complete, 3);
        assert_eq!(s.insufficient, 1);
        assert_eq!(s.by_dominant.values().sum::<usize>(), 3);
        assert!(s.mean_thermal.is_some());
    }
}
