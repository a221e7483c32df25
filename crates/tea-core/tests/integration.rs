//! End-to-end scoring scenarios across the public API:
//! record → mappers → combiner → analysis → wire format.

use std::sync::Arc;

use approx::assert_relative_eq;
use proptest::prelude::*;
use serde_json::json;
use tea_core::{
    AnalysisStatus, Attribute, AttributeMapper, Combiner, CompoundMapper, ConfigSource, Element,
    ElementDistribution, EngineConfig, FlavorMapper, Geography, LookupTables, TeaRecord,
    ThermalBand, analyze_batch, export_json, import_records,
};
use tea_core::compound::compound_distribution;
use tea_core::config::DefaultConfig;

fn tables() -> Arc<LookupTables> {
    Arc::new(LookupTables::builtin())
}

fn combiner_with(config: EngineConfig) -> Combiner {
    Combiner::new(config, tables())
}

fn sencha() -> TeaRecord {
    TeaRecord::named("Sencha")
        .with_flavors(["grassy", "sweet", "vegetal", "umami"])
        .with_compounds(6.0, 8.0)
        .with_processing(["steamed", "rolled", "shade grown"])
        .with_geography(Geography {
            altitude: Some(400.0),
            humidity: Some(80.0),
            temperature: Some(16.0),
            solar_radiation: Some(4.5),
            latitude: Some(34.9),
        })
}

fn assert_non_negative(d: &ElementDistribution) {
    for (e, v) in d.iter() {
        assert!(v >= 0.0, "{e} went negative: {v}");
    }
}

/// Sum and non-negativity on a fully populated record.
#[test]
fn full_record_is_well_formed() {
    let a = Combiner::default().combine(&sencha());
    assert_eq!(a.status, AnalysisStatus::Complete);
    assert_relative_eq!(a.elements.total(), 1.0, epsilon = 1e-9);
    assert_non_negative(&a.elements);
    assert_non_negative(&a.blended_elements);
    for (_, score) in a.component_scores.iter() {
        assert_non_negative(score);
    }
    assert_relative_eq!(
        a.applied_weights.iter().map(|(_, w)| *w).sum::<f64>(),
        1.0,
        epsilon = 1e-12
    );
}

/// Absent geography: zero component, remaining weights renormalize
/// regardless of what geography was configured at.
#[test]
fn absent_geography_is_excluded_from_weighting() {
    let mut tea = sencha();
    tea.geography = None;

    for geo_weight in [0.15, 0.6] {
        let mut config = EngineConfig::default();
        config
            .set("elementWeights.geography", json!(geo_weight))
            .unwrap();
        let a = combiner_with(config.clone()).combine(&tea);

        assert_eq!(a.component_scores.geography, ElementDistribution::zero());
        assert_eq!(a.applied_weights.geography, 0.0);
        let w = &a.applied_weights;
        assert_relative_eq!(w.flavor + w.compounds + w.processing, 1.0, epsilon = 1e-12);

        let cfg = config.element_weights.as_per_attribute();
        let others = cfg[Attribute::Flavor] + cfg[Attribute::Compounds] + cfg[Attribute::Processing];
        assert_relative_eq!(w.flavor, cfg[Attribute::Flavor] / others, epsilon = 1e-12);
    }
}

/// A single weight of 1.0 makes that class the whole blend.
#[test]
fn exclusive_compound_weight() {
    let mut config = EngineConfig::default();
    config.set("elementWeights.compounds", json!(1.0)).unwrap();
    assert_eq!(config.element_weights.compounds, 1.0);
    assert_eq!(config.element_weights.flavor, 0.0);

    let expected = compound_distribution(6.0, 8.0, config.compounds.weight).normalized();
    let a = combiner_with(config.clone()).combine(&sencha());
    assert!(a.blended_elements.max_abs_diff(&expected) < 1e-12);
    assert_eq!(a.applied_weights.flavor, 0.0);
    assert_eq!(a.applied_weights.geography, 0.0);

    // with both adjustment passes off the final distribution is the blend
    config.thermal.enabled = false;
    config.element_interactions.enabled = false;
    let plain = combiner_with(config).combine(&sencha());
    assert!(plain.elements.max_abs_diff(&expected) < 1e-12);
}

#[test]
fn combine_is_deterministic() {
    let combiner = Combiner::default();
    let tea = sencha();
    let first = combiner.combine(&tea);
    for _ in 0..5 {
        let again = combiner.combine(&tea);
        assert_eq!(first, again);
        assert_eq!(first.elements.to_array().map(f64::to_bits), again.elements.to_array().map(f64::to_bits));
    }
}

#[test]
fn repeated_descriptor_has_diminishing_returns() {
    let mapper = FlavorMapper::new(tables());
    let once = mapper.map_profile(&["grassy"], &DefaultConfig).elements;
    let thrice = mapper
        .map_profile(&["grassy", "grassy", "grassy"], &DefaultConfig)
        .elements;
    let linear = once.scaled(3.0);
    assert!(thrice.max_abs_diff(&linear) > 1e-6);

    let diminishing = tea_core::DiminishingReturns::default();
    let multipliers: Vec<f64> = (1..6).map(|n| diminishing.multiplier(n)).collect();
    for pair in multipliers.windows(2) {
        assert!(pair[1] < pair[0]);
    }
}

#[test]
fn japanese_green_signature_takes_priority() {
    let mapping = FlavorMapper::new(tables()).map_profile(&["umami", "marine", "vegetal"], &DefaultConfig);
    assert_eq!(mapping.signature.as_deref(), Some("japanese_green"));
    assert_relative_eq!(mapping.elements.wood, 0.70, epsilon = 1e-9);
    assert_relative_eq!(mapping.elements.water, 0.20, epsilon = 1e-9);
}

#[test]
fn pure_salty_profile_is_water() {
    let tea = TeaRecord::named("Sea").with_flavors(["salty", "briny", "seaweed"]);
    let a = Combiner::default().combine(&tea);
    assert!(a.component_scores.flavor.water > 0.90);
    assert!(a.elements.water > 0.90);
    assert_eq!(a.dominant_element, Some(Element::Water));
    assert!(a.thermal_analysis.total_thermal < 0.0);
}

#[test]
fn empty_record_is_insufficient() {
    let a = Combiner::default().combine(&TeaRecord::default());
    assert_eq!(a.status, AnalysisStatus::InsufficientData);
    assert_eq!(a.dominant_element, None);
    assert_eq!(a.elements, ElementDistribution::zero());
    assert_eq!(a.elements.total(), 0.0);
}

#[test]
fn geography_without_usable_factor_is_absent() {
    let tea = TeaRecord::named("ghost").with_geography(Geography {
        altitude: Some(f64::NAN),
        ..Default::default()
    });
    let a = Combiner::default().combine(&tea);
    assert_eq!(a.status, AnalysisStatus::InsufficientData);
}

#[test]
fn strongly_warming_compounds_reduce_water() {
    let tea = TeaRecord::named("Strong").with_compounds(10.0, 1.0);
    let a = Combiner::default().combine(&tea);
    assert!(a.thermal_analysis.total_thermal > 0.5);
    assert_eq!(a.thermal_analysis.thermal_property, "Strongly warming");
    assert_eq!(a.thermal_analysis.band, ThermalBand::StronglyWarming);
    assert!(a.elements.water < a.blended_elements.water);
    assert!(a.elements.fire > a.blended_elements.fire);
}

#[test]
fn custom_tables_are_injected() {
    let mut custom = LookupTables::builtin();
    custom.signatures.clear();
    let combiner = Combiner::new(EngineConfig::default(), Arc::new(custom));
    let tea = TeaRecord::named("x").with_flavors(["umami", "marine", "vegetal"]);
    let a = combiner.combine(&tea);
    let builtin = Combiner::default().combine(&tea);
    assert!(a.component_scores.flavor.max_abs_diff(&builtin.component_scores.flavor) > 1e-6);
}

#[test]
fn compound_mapper_alone_matches_weight() {
    let d = compound_distribution(5.0, 5.0, 0.3);
    assert_relative_eq!(d.total(), 0.3, epsilon = 1e-12);

    let mut config = EngineConfig::default();
    config.set("compounds.weight", json!(0.45)).unwrap();
    let tea = TeaRecord::named("Assam").with_compounds(9.0, 2.0);
    let mapped = CompoundMapper::new().map(&tea, &config).unwrap();
    assert_relative_eq!(mapped.total(), config.compound_weight(), epsilon = 1e-12);
    assert!(CompoundMapper::new().map(&TeaRecord::named("none"), &config).is_none());
}

#[test]
fn batch_then_wire_roundtrip() {
    let records = vec![
        sencha(),
        TeaRecord::named("Sea").with_flavors(["salty", "briny", "seaweed"]),
        TeaRecord::default(),
    ];
    let analyses = analyze_batch(&Combiner::default(), &records);
    assert_eq!(analyses[2].status, AnalysisStatus::InsufficientData);

    let json = export_json(&records, &analyses).unwrap();
    let back = import_records(&json).unwrap();
    assert_eq!(back, records);
}

fn level() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![Just(None), (-5.0f64..20.0).prop_map(Some)]
}

fn descriptor() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "grassy", "umami", "marine", "salty", "smoky", "floral", "malty", "roasted",
        "citrus", "earthy", "sweet", "bitter", "xyzzy", "oolong-like", "mineral", "",
    ])
    .prop_map(str::to_string)
}

fn tag() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "steamed", "rolled", "charcoal roasted", "withered", "pan fired", "aged",
        "fermented", "shade grown", "unknown step",
    ])
    .prop_map(str::to_string)
}

fn record() -> impl Strategy<Value = TeaRecord> {
    (
        prop::option::of(prop::collection::vec(descriptor(), 0..6)),
        level(),
        level(),
        prop::option::of(prop::collection::vec(tag(), 0..4)),
        prop::option::of((level(), level(), level())),
    )
        .prop_map(|(flavors, caffeine, theanine, processing, geo)| TeaRecord {
            name: None,
            tea_type: None,
            flavor_profile: flavors,
            caffeine_level: caffeine,
            l_theanine_level: theanine,
            processing_methods: processing,
            geography: geo.map(|(a, h, t)| Geography {
                altitude: a.map(|v| v * 200.0),
                humidity: h.map(|v| v * 6.0),
                temperature: t.map(|v| v * 2.0),
                ..Default::default()
            }),
        })
}

proptest! {
    #[test]
    fn prop_sum_invariant(tea in record()) {
        let a = Combiner::default().combine(&tea);
        match a.status {
            AnalysisStatus::Complete => prop_assert!((a.elements.total() - 1.0).abs() < 1e-9),
            AnalysisStatus::InsufficientData => prop_assert_eq!(a.elements.total(), 0.0),
        }
    }

    #[test]
    fn prop_never_negative(tea in record()) {
        let a = Combiner::default().combine(&tea);
        for d in [a.elements, a.blended_elements] {
            prop_assert!(d.iter().all(|(_, v)| v >= 0.0));
        }
        for (_, d) in a.component_scores.iter() {
            prop_assert!(d.iter().all(|(_, v)| v >= 0.0));
        }
        prop_assert!(a.thermal_analysis.total_thermal.abs() <= 1.0);
    }

    #[test]
    fn prop_deterministic(tea in record()) {
        let combiner = Combiner::default();
        prop_assert_eq!(combiner.combine(&tea), combiner.combine(&tea));
    }
}
