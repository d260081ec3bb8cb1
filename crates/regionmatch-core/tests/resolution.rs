mod common;

use common::{approx, karnataka, CountingSimilarity};
use regionmatch_core::{
    Decision, GazetteerError, Level, LevelThresholds, RawLocationInput, ReferenceRow,
    ResolutionResult, ResolverConfig, Standardiser,
};
use std::sync::Arc;

fn engine() -> (Standardiser<Arc<CountingSimilarity>>, Arc<CountingSimilarity>) {
    let counter = Arc::new(CountingSimilarity::default());
    let engine =
        Standardiser::with_similarity(ResolverConfig::default(), karnataka(), Arc::clone(&counter))
            .unwrap();
    (engine, counter)
}

fn assert_invariants(r: &ResolutionResult) {
    for pair in r.levels.windows(2) {
        assert!(
            pair[1].confidence <= pair[0].confidence,
            "confidence rose from {:?} to {:?}",
            pair[0].level,
            pair[1].level
        );
        if pair[1].is_resolved() {
            assert!(pair[0].is_resolved(), "{:?} resolved without its parent", pair[1].level);
        }
    }
    let accepted: Vec<f64> = r
        .levels
        .iter()
        .filter_map(|l| l.resolved.as_ref().map(|c| c.score))
        .collect();
    let expected = accepted.iter().copied().fold(f64::INFINITY, f64::min);
    if accepted.is_empty() {
        assert_eq!(r.confidence, 0.0);
    } else {
        assert_eq!(r.confidence, expected);
    }
}

#[test]
fn misspelled_tuple_resolves_all_three_levels() {
    let (engine, _) = engine();
    let raw = RawLocationInput::new("bengaluru urbn", "bengaluru est", "whitefeild");
    let r = engine.resolve(&raw, Some("state_29")).unwrap();

    assert!(r.is_fully_resolved());
    assert_eq!(r.resolved(Level::District).unwrap().name, "Bengaluru Urban");
    assert_eq!(r.resolved(Level::Subdistrict).unwrap().name, "Bengaluru East");
    assert_eq!(r.resolved(Level::Village).unwrap().id, "village_1");

    let d = r.resolved(Level::District).unwrap().score;
    let s = r.resolved(Level::Subdistrict).unwrap().score;
    let v = r.resolved(Level::Village).unwrap().score;
    assert!(approx(d, 1.0 - 1.0 / 15.0));
    assert!(approx(s, 1.0 - 1.0 / 14.0));
    assert!(approx(v, 0.8));
    assert_eq!(r.confidence, d.min(s).min(v));
    assert_invariants(&r);
}

#[test]
fn state_level_is_matched_when_no_parent_is_given() {
    let (engine, _) = engine();
    let raw = RawLocationInput::new("Bengaluru (U)", "Anekal Tq", "Sarjapur").with_state("KARNATAKA");
    let r = engine.resolve(&raw, None).unwrap();
    assert_eq!(r.levels.len(), 4);
    assert_eq!(r.resolved(Level::State).unwrap().id, "state_29");
    assert_eq!(r.resolved(Level::District).unwrap().id, "district_572");
    // "Tq" expands to the designator "taluk", which is dropped.
    let sub = r.level(Level::Subdistrict).unwrap();
    assert_eq!(sub.resolved.as_ref().unwrap().id, "subdistrict_5538");
    assert_eq!(sub.audit.candidates_scored, 0);
    assert_eq!(r.resolved(Level::Village).unwrap().id, "village_7");
    assert!(approx(r.confidence, 1.0 - 1.0 / 9.0));
    assert!(r.level(Level::Zone).is_none());
    assert_invariants(&r);
}

#[test]
fn all_empty_input_is_fully_unresolved_without_scoring() {
    let (engine, counter) = engine();
    let r = engine
        .resolve(&RawLocationInput::new("", "", ""), None)
        .unwrap();
    assert!(r.is_unresolved());
    assert_eq!(r.levels.len(), 4);
    assert_eq!(r.confidence, 0.0);
    assert_eq!(r.levels[0].audit.decision, Decision::EmptyInput);
    assert!(r.levels[1..]
        .iter()
        .all(|l| l.audit.decision == Decision::ParentUnresolved));
    assert_eq!(counter.calls(), 0);

    let r = engine
        .resolve(&RawLocationInput::new("  ", "", "\t"), Some("state_29"))
        .unwrap();
    assert!(r.is_unresolved());
    assert_eq!(counter.calls(), 0);
}

#[test]
fn unmatched_district_blocks_deeper_levels() {
    let (engine, _) = engine();
    // Sub-district and village would match under Bengaluru Urban.
    let raw = RawLocationInput::new("qqqqqqqqq", "bengaluru east", "whitefield");
    let r = engine.resolve(&raw, Some("state_29")).unwrap();

    let district = r.level(Level::District).unwrap();
    assert_eq!(district.audit.decision, Decision::BelowThreshold);
    assert!(district.audit.best.as_ref().unwrap().score < 0.5);
    assert!(r.is_unresolved());
    for level in [Level::Subdistrict, Level::Village] {
        assert_eq!(
            r.level(level).unwrap().audit.decision,
            Decision::ParentUnresolved
        );
    }
    assert_eq!(r.confidence, 0.0);
}

#[test]
fn village_is_searched_only_under_the_matched_subdistrict() {
    let (engine, _) = engine();
    // "Whitefield" exists under Bengaluru East and under Maddur.
    let r = engine
        .resolve(&RawLocationInput::new("mandya", "madur", "whitefield"), Some("state_29"))
        .unwrap();
    assert_eq!(r.resolved(Level::Village).unwrap().id, "village_9");

    let r = engine
        .resolve(&RawLocationInput::new("mandya", "malavalli", "whitefield"), Some("state_29"))
        .unwrap();
    assert!(r.resolved(Level::Subdistrict).is_some());
    assert!(r.resolved(Level::Village).is_none());
}

#[test]
fn ties_go_to_the_lexicographically_smaller_name() {
    let rows = |order: &[(&str, &str)]| -> Vec<ReferenceRow> {
        order
            .iter()
            .map(|(id, name)| ReferenceRow::new(*id, *name, None))
            .collect()
    };
    let forward = [("district_1", "Kolar Eastb"), ("district_2", "Kolar Easta")];
    let reverse = [("district_2", "Kolar Easta"), ("district_1", "Kolar Eastb")];

    for order in [&forward[..], &reverse[..]] {
        let engine = Standardiser::new(ResolverConfig::default(), rows(order)).unwrap();
        let raw = RawLocationInput::new("kolar east", "", "");
        let r = engine.resolve(&raw, None).unwrap();
        let best = r.resolved(Level::District).unwrap();
        assert_eq!(best.id, "district_2");
        assert_eq!(best.normalized, "kolar easta");
        assert!(approx(best.score, 1.0 - 1.0 / 11.0));
        // Both candidates were scored and tied.
        assert_eq!(r.levels[0].audit.candidates_scored, 2);
    }
}

#[test]
fn resolution_is_deterministic() {
    let (engine, _) = engine();
    let raw = RawLocationInput::new("bengaluru urbn", "bengaluru est", "whitefeild");
    let a = engine.resolve_uncached(&raw, Some("state_29")).unwrap();
    let b = engine.resolve_uncached(&raw, Some("state_29")).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.confidence.to_bits(), b.confidence.to_bits());
    for (x, y) in a.levels.iter().zip(&b.levels) {
        assert_eq!(x.confidence.to_bits(), y.confidence.to_bits());
    }
}

#[test]
fn invariants_hold_across_a_mixed_batch() {
    let (engine, _) = engine();
    let inputs = vec![
        RawLocationInput::new("Bengaluru Urban", "Bengaluru East", "Whitefield"),
        RawLocationInput::new("bengaluru", "east", "white field"),
        RawLocationInput::new("Bengaluru Rural", "Hosakote", "Sulibele"),
        RawLocationInput::new("Mysore", "Nanjangud", ""),
        RawLocationInput::new("Mandya Dist.", "Maddur Tq.", "Besagarahali"),
        RawLocationInput::new("", "Anekal", "Attibele"),
        RawLocationInput::new("Kolar", "Mulbagal", "Nangali"),
        RawLocationInput::default(),
    ];
    let results = engine.resolve_batch(&inputs, Some("state_29")).unwrap();
    assert_eq!(results.len(), inputs.len());
    for r in &results {
        assert_invariants(r);
    }
    assert!(results[0].is_fully_resolved());
    assert_eq!(results[0].confidence, 1.0);
    assert_eq!(results[4].deepest().unwrap().id, "village_10");
    assert!(results[4].is_fully_resolved());
    assert_eq!(results[4].resolved(Level::District).unwrap().score, 1.0);
    assert!(results[5].is_unresolved());
    assert!(results[7].is_unresolved());
}

#[test]
fn stricter_village_threshold_leaves_village_unresolved() {
    let mut config = ResolverConfig::default();
    config.thresholds = LevelThresholds {
        village: 0.85,
        ..LevelThresholds::default()
    };
    let engine = Standardiser::new(config, karnataka()).unwrap();
    let raw = RawLocationInput::new("bengaluru urbn", "bengaluru est", "whitefeild");
    let r = engine.resolve(&raw, Some("state_29")).unwrap();

    assert!(r.resolved(Level::Subdistrict).is_some());
    let village = r.level(Level::Village).unwrap();
    assert_eq!(village.audit.decision, Decision::BelowThreshold);
    assert!(approx(village.audit.best.as_ref().unwrap().score, 0.8));
    assert!(approx(r.confidence, 1.0 - 1.0 / 14.0));
    let codes = r.codes();
    assert_eq!(codes.last().map(|(_, c)| c.as_str()), Some("village_0"));
}

#[test]
fn unknown_parent_is_an_invalid_hierarchy_state() {
    let (engine, _) = engine();
    let raw = RawLocationInput::new("mandya", "", "");
    assert!(matches!(
        engine.resolve(&raw, Some("state_99")),
        Err(GazetteerError::InvalidHierarchyState(_))
    ));
    assert!(matches!(
        engine.resolve_batch([&raw], Some("state_99")),
        Err(GazetteerError::InvalidHierarchyState(_))
    ));
}

#[test]
fn rewrites_apply_to_input_and_gazetteer_alike() {
    let mut config = ResolverConfig::default();
    config.rewrites.insert("Gulbarga".into(), "Kalaburagi".into());
    let rows = vec![
        ReferenceRow::new("state_29", "Karnataka", None),
        ReferenceRow::new("district_560", "Kalaburagi", Some("state_29")),
    ];
    let engine = Standardiser::new(config, rows).unwrap();
    let r = engine
        .resolve(&RawLocationInput::new("GULBARGA", "", ""), Some("state_29"))
        .unwrap();
    let d = r.resolved(Level::District).unwrap();
    assert_eq!(d.id, "district_560");
    assert_eq!(d.score, 1.0);
}

#[test]
fn level_designators_do_not_block_exact_matches() {
    let (engine, counter) = engine();
    let r = engine
        .resolve(&RawLocationInput::new("Mandya Dist.", "Maddur Tq.", ""), Some("state_29"))
        .unwrap();
    assert_eq!(r.resolved(Level::District).unwrap().id, "district_583");
    assert_eq!(r.resolved(Level::Subdistrict).unwrap().id, "subdistrict_5600");
    assert_eq!(r.confidence, 1.0);

    let r = engine
        .resolve(
            &RawLocationInput::new("Bengaluru Rural District", "Hoskote Tq.", "Sulibele"),
            Some("state_29"),
        )
        .unwrap();
    assert!(r.is_fully_resolved());
    assert_eq!(r.resolved(Level::Subdistrict).unwrap().id, "subdistrict_5550");
    assert_eq!(r.deepest().unwrap().id, "village_8");
    assert!(r.levels.iter().all(|l| l.audit.candidates_scored == 0));
    assert_eq!(counter.calls(), 0);
}

fn bengaluru_urban() -> Vec<ReferenceRow> {
    [
        ("district_572", "Bengaluru Urban", None),
        ("subdistrict_5536", "Bengaluru East", Some("district_572")),
        ("subdistrict_5537", "Bengaluru North", Some("district_572")),
        ("ulb_802", "Bengaluru Mahanagara Palike", Some("district_572")),
        ("ulb_803", "Bengaluru East CMC", Some("district_572")),
        ("zone_1-2", "Mahadevapura", Some("ulb_802")),
        ("zone_1-3", "Yelahanka", Some("ulb_802")),
        ("ward_1-2-84", "Hagadur", Some("zone_1-2")),
        ("ward_1-2-85", "Doddanekkundi", Some("zone_1-2")),
        ("ward_1-3-1", "Kempegowda", Some("zone_1-3")),
        ("ward_900", "Kadugodi", Some("ulb_803")),
        ("village_1", "Whitefield", Some("subdistrict_5536")),
    ]
    .into_iter()
    .map(|(id, name, parent)| ReferenceRow::new(id, name, parent))
    .collect()
}

#[test]
fn wards_are_searched_within_the_matched_zone() {
    let engine = Standardiser::new(ResolverConfig::default(), bengaluru_urban()).unwrap();
    assert_eq!(engine.snapshot().stats().zones, 2);

    let raw = RawLocationInput::new("Bengaluru Urban", "Bengaluru Mahanagara Palike", "Hagdur")
        .with_zone("Mahadevpura");
    let r = engine.resolve(&raw, None).unwrap();
    let levels: Vec<_> = r.levels.iter().map(|l| l.level).collect();
    assert_eq!(levels, [Level::District, Level::Subdistrict, Level::Zone, Level::Village]);
    assert_eq!(r.resolved(Level::Zone).unwrap().id, "zone_1-2");
    let ward = r.level(Level::Village).unwrap();
    assert_eq!(ward.resolved.as_ref().unwrap().id, "ward_1-2-84");
    assert_eq!(ward.audit.candidates_scored, 2);
    assert!(approx(r.confidence, 1.0 - 1.0 / 7.0));
    assert_invariants(&r);

    let r = engine
        .resolve(&RawLocationInput::default().with_zone("yelahanka"), Some("ulb_802"))
        .unwrap();
    assert_eq!(r.levels[0].level, Level::Zone);
    assert_eq!(r.resolved(Level::Zone).unwrap().id, "zone_1-3");
    assert_eq!(r.level(Level::Village).unwrap().audit.decision, Decision::EmptyInput);
}

#[test]
fn zone_tier_is_skipped_where_the_hierarchy_has_none() {
    let engine = Standardiser::new(ResolverConfig::default(), bengaluru_urban()).unwrap();

    let r = engine
        .resolve(&RawLocationInput::new("bengaluru urban", "bengaluru east", "whitefeild"), None)
        .unwrap();
    assert!(r.is_fully_resolved());
    assert!(r.level(Level::Zone).is_none());
    assert_eq!(r.deepest().unwrap().id, "village_1");

    // Wards hanging directly off a ULB.
    let r = engine
        .resolve(&RawLocationInput::new("bengaluru urban", "bengaluru east cmc", "kadugodi"), None)
        .unwrap();
    assert!(r.is_fully_resolved());
    assert_eq!(r.deepest().unwrap().id, "ward_900");

    // A ULB with zones needs the zone before its wards can be searched.
    let r = engine
        .resolve(&RawLocationInput::new("bengaluru urban", "bengaluru mahanagara palike", "hagadur"), None)
        .unwrap();
    assert_eq!(r.level(Level::Zone).unwrap().audit.decision, Decision::EmptyInput);
    assert_eq!(r.level(Level::Village).unwrap().audit.decision, Decision::ParentUnresolved);

    // Descent stopped above the zone and no zone text was given.
    let r = engine
        .resolve(&RawLocationInput::new("qqqqqqqqq", "", ""), None)
        .unwrap();
    assert_eq!(r.levels.len(), 3);
    assert!(r.level(Level::Zone).is_none());
    assert_invariants(&r);
}

#[test]
fn subdistrict_kind_restricts_the_candidates() {
    let mut config = ResolverConfig::default();
    config.thresholds.subdistrict = 0.75;
    let engine = Standardiser::new(config, bengaluru_urban()).unwrap();
    let raw = RawLocationInput::new("Bengaluru Urban", "bengaluru east cmc", "");

    let any = engine.resolve(&raw, None).unwrap();
    assert_eq!(any.resolved(Level::Subdistrict).unwrap().id, "ulb_803");

    let revenue = engine
        .resolve(&raw.clone().with_subdistrict_kind("Subdistrict"), None)
        .unwrap();
    let sub = revenue.level(Level::Subdistrict).unwrap();
    assert_eq!(sub.resolved.as_ref().unwrap().id, "subdistrict_5536");
    assert_eq!(sub.audit.candidates_scored, 2);
    assert!(approx(sub.audit.best.as_ref().unwrap().score, 1.0 - 4.0 / 18.0));

    let both = engine
        .resolve(&raw.clone().with_subdistrict_kind("subdistrict, ulb"), None)
        .unwrap();
    assert_eq!(both.resolved(Level::Subdistrict).unwrap().id, "ulb_803");

    let none = engine
        .resolve(&raw.with_subdistrict_kind("cantonment"), None)
        .unwrap();
    assert_eq!(
        none.level(Level::Subdistrict).unwrap().audit.decision,
        Decision::NoCandidates
    );
}

#[test]
fn child_type_is_read_from_json_input() {
    let raw: RawLocationInput = serde_json::from_str(
        r#"{"district": "Bengaluru Urban", "ulb": "Bengaluru East CMC", "childType": "ulb"}"#,
    )
    .unwrap();
    assert_eq!(raw.kinds(Level::Subdistrict), ["ulb"]);
    assert!(raw.kinds(Level::District).is_empty());
}
