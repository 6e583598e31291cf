use super::*;
use crate::config::{MatchStrategy, MatcherConfig};
use crate::model::{Category, MatchResult, Product, Specs};
use crate::normalizer::normalize_device;
use std::collections::HashSet;

fn guard(id: &str, devices: &str, height: f64, width: f64, radius: f64) -> Product {
    Product {
        id: id.to_string(),
        category: Some(Category::ScreenGuard),
        compatible_devices: Some(devices.to_string()),
        specs: Some(Specs {
            height: Some(height),
            width: Some(width),
            radius_top_left: Some(radius),
            ..Default::default()
        }),
    }
}

fn item(id: &str, category: Category, devices: &str) -> Product {
    Product {
        id: id.to_string(),
        category: Some(category),
        compatible_devices: Some(devices.to_string()),
        specs: None,
    }
}

fn latest() -> MatcherImpl {
    MatcherImpl::default()
}

fn with_similar() -> MatcherImpl {
    MatcherImpl::new(MatcherConfig {
        include_similar: true,
        ..Default::default()
    })
}

fn as_set(devices: &[String]) -> HashSet<String> {
    devices.iter().map(|d| normalize_device(d)).collect()
}

fn tier_sets(result: &MatchResult) -> Vec<(&'static str, HashSet<String>)> {
    result
        .tiers()
        .into_iter()
        .map(|(name, devices)| (name, as_set(devices)))
        .collect()
}

fn sample_catalog() -> Vec<Product> {
    vec![
        guard("a", "Vivo V19, Vivo V19 Pro", 160.5, 74.2, 8.5),
        guard("b", "Oppo F19", 160.5, 74.2, 8.5),
        guard("c", "Realme 7, vivo v19", 158.0, 72.0, 6.0),
        guard("d", "Redmi Note 9", 160.55, 73.9, 8.5),
        item("e", Category::Battery, "Model X, Model X Plus"),
        item("f", Category::Battery, "Model X, Model Y"),
        item("g", Category::PhoneCase, "Vivo V19, Vivo S1"),
        item("h", Category::Battery, "Model Z"),
    ]
}

#[test]
fn screen_guard_example_scenario() {
    let catalog = vec![
        guard("a", "Vivo V19, Vivo V19 Pro", 160.5, 74.2, 8.5),
        guard("b", "Oppo F19", 160.5, 74.2, 8.5),
    ];

    let result = latest().compute_matches(&catalog, "Vivo V19", Category::ScreenGuard);

    assert_eq!(result.original, Some(vec!["Vivo V19".to_string(), "Vivo V19 Pro".to_string()]));
    assert_eq!(result.full_temper, Some(vec!["Oppo F19".to_string()]));
    assert_eq!(result.similar, None);
    assert_eq!(result.perfect, None);
}

#[test]
fn battery_example_scenario() {
    let catalog = vec![item("c", Category::Battery, "Model X, Model X Plus")];

    let result = latest().compute_matches(&catalog, "model x", Category::Battery);

    assert_eq!(result.perfect, Some(vec!["Model X".to_string(), "Model X Plus".to_string()]));
    assert_eq!(result.original, None);
    assert_eq!(result.full_temper, None);
}

#[test]
fn empty_catalog_yields_empty_tiers() {
    let guards = latest().compute_matches(&[], "Vivo V19", Category::ScreenGuard);
    assert_eq!(guards.original, Some(vec![]));
    assert_eq!(guards.full_temper, Some(vec![]));
    assert!(guards.is_empty());

    let batteries = with_similar().compute_matches(&[], "Model X", Category::Battery);
    assert_eq!(batteries.perfect, Some(vec![]));

    let similar = with_similar().compute_matches(&[], "Vivo V19", Category::ScreenGuard);
    assert_eq!(similar.similar, Some(vec![]));
}

#[test]
fn blank_target_matches_nothing() {
    let catalog = sample_catalog();
    let contains = MatcherImpl::new(MatcherConfig {
        strategy: MatchStrategy::Contains,
        ..Default::default()
    });

    assert!(latest().compute_matches(&catalog, "   ", Category::Battery).is_empty());
    assert!(contains.compute_matches(&catalog, "", Category::ScreenGuard).is_empty());
}

#[test]
fn perfect_tier_unions_every_listing_product() {
    let catalog = sample_catalog();

    let result = latest().compute_matches(&catalog, "Model X", Category::Battery);

    assert_eq!(
        result.perfect,
        Some(vec!["Model X".to_string(), "Model X Plus".to_string(), "Model Y".to_string()])
    );
}

#[test]
fn perfect_tier_covers_union_for_every_listed_device() {
    let catalog = sample_catalog();
    let matcher = latest();

    for product in catalog.iter().filter(|p| p.category != Some(Category::ScreenGuard)) {
        let category = product.category.unwrap();
        for device in product.devices() {
            let result = matcher.compute_matches(&catalog, device, category);
            let got = as_set(result.perfect.as_deref().unwrap());

            let key = normalize_device(device);
            let expected: HashSet<String> = catalog
                .iter()
                .filter(|p| p.category == Some(category))
                .filter(|p| p.devices().iter().any(|d| normalize_device(d) == key))
                .flat_map(|p| p.devices())
                .map(normalize_device)
                .collect();

            assert_eq!(got, expected, "device {device} in {category}");
        }
    }
}

#[test]
fn category_scope_is_respected() {
    let catalog = sample_catalog();

    let cases = latest().compute_matches(&catalog, "Vivo V19", Category::PhoneCase);
    assert_eq!(cases.perfect, Some(vec!["Vivo V19".to_string(), "Vivo S1".to_string()]));

    let panels = latest().compute_matches(&catalog, "Vivo V19", Category::CenterPanel);
    assert_eq!(panels.perfect, Some(vec![]));
}

#[test]
fn tiers_never_hold_normalized_duplicates() {
    let catalog = vec![
        guard("a", "Vivo V19, VIVO V19 Pro", 160.5, 74.2, 8.5),
        guard("b", "vivo  v19, Vivo V19 Pro", 150.0, 70.0, 5.0),
        guard("c", "Oppo F19, oppo f19", 160.5, 74.2, 8.5),
        guard("d", " OPPO F19 ", 160.52, 74.21, 8.5),
        item("e", Category::Battery, "Model X, model x, MODEL X Plus"),
        item("f", Category::Battery, "Model X Plus, ModelX"),
    ];

    for (device, category) in [("Vivo V19", Category::ScreenGuard), ("model x", Category::Battery)] {
        let result = with_similar().compute_matches(&catalog, device, category);
        for (name, devices) in result.tiers() {
            let keys = as_set(devices);
            assert_eq!(keys.len(), devices.len(), "duplicates in {name}: {devices:?}");
        }
    }

    let result = latest().compute_matches(&catalog, "Vivo V19", Category::ScreenGuard);
    assert_eq!(result.original, Some(vec!["Vivo V19".to_string(), "VIVO V19 Pro".to_string()]));
    assert_eq!(result.full_temper, Some(vec!["Oppo F19".to_string()]));
}

#[test]
fn target_spelling_variants_are_equivalent() {
    let catalog = sample_catalog();
    let matcher = latest();

    let baseline = matcher.compute_matches(&catalog, "Vivo V19", Category::ScreenGuard);
    assert!(!baseline.is_empty());
    for variant in ["vivo v19", " Vivo  V19 ", "VIVOV19"] {
        assert_eq!(matcher.compute_matches(&catalog, variant, Category::ScreenGuard), baseline);
    }
}

#[test]
fn results_keep_first_occurrence_spelling() {
    let catalog = vec![
        item("1", Category::CcBoard, "Galaxy A50, galaxy a30"),
        item("2", Category::CcBoard, "GALAXY A50,  Galaxy  A30s "),
    ];

    let result = latest().compute_matches(&catalog, "galaxy a50", Category::CcBoard);

    assert_eq!(
        result.perfect,
        Some(vec!["Galaxy A50".to_string(), "galaxy a30".to_string(), "Galaxy  A30s".to_string()])
    );
}

#[test]
fn catalog_order_does_not_change_tier_sets() {
    let catalog = sample_catalog();
    let matcher = with_similar();

    let mut reversed = catalog.clone();
    reversed.reverse();
    let mut rotated = catalog.clone();
    rotated.rotate_left(3);

    // "Vivo V19" is listed on two drawings with different outlines, so its
    // reference drawing depends on catalog order; these targets are not.
    for (device, category) in [
        ("Oppo F19", Category::ScreenGuard),
        ("Redmi Note 9", Category::ScreenGuard),
        ("Model X", Category::Battery),
        ("Vivo S1", Category::PhoneCase),
    ] {
        let expected = tier_sets(&matcher.compute_matches(&catalog, device, category));
        for permuted in [&reversed, &rotated] {
            let got = tier_sets(&matcher.compute_matches(permuted, device, category));
            assert_eq!(got, expected, "{device} in {category}");
        }
    }
}

#[test]
fn reference_drawing_follows_catalog_order() {
    let first_big = vec![
        guard("big", "Vivo V19", 160.5, 74.2, 8.5),
        guard("small", "Vivo V19", 150.0, 70.0, 5.0),
        guard("big-twin", "Oppo F19", 160.5, 74.2, 8.5),
        guard("small-twin", "Nokia 5", 150.0, 70.0, 5.0),
    ];
    let mut first_small = first_big.clone();
    first_small.swap(0, 1);

    let big = latest().compute_matches(&first_big, "Vivo V19", Category::ScreenGuard);
    let small = latest().compute_matches(&first_small, "Vivo V19", Category::ScreenGuard);

    assert_eq!(big.full_temper, Some(vec!["Oppo F19".to_string()]));
    assert_eq!(small.full_temper, Some(vec!["Nokia 5".to_string()]));
    assert_eq!(as_set(big.original.as_deref().unwrap()), as_set(small.original.as_deref().unwrap()));
}

#[test]
fn full_temper_tolerance_is_strict() {
    let catalog = vec![
        guard("ref", "Vivo V19", 160.5, 74.2, 8.5),
        guard("exact-0.1", "Taller By Point One", 160.6, 74.2, 8.5),
        guard("under-0.1", "Taller By Point 099", 160.599, 74.2, 8.5),
        guard("wide", "Wider By Point One", 160.5, 74.3, 8.5),
        guard("round", "Rounder", 160.5, 74.2, 8.6),
    ];

    let result = latest().compute_matches(&catalog, "Vivo V19", Category::ScreenGuard);

    assert_eq!(result.full_temper, Some(vec!["Taller By Point 099".to_string()]));
}

#[test]
fn full_temper_keeps_differences_a_hair_under_the_tolerance() {
    let catalog = vec![
        guard("ref", "Vivo V19", 160.5, 74.2, 8.5),
        guard("near", "Just Under", 160.59996, 74.2, 8.5),
    ];

    let result = latest().compute_matches(&catalog, "Vivo V19", Category::ScreenGuard);

    assert_eq!(result.full_temper, Some(vec!["Just Under".to_string()]));
}

#[test]
fn full_temper_excludes_reference_but_keeps_same_outline_siblings() {
    let catalog = vec![
        guard("ref", "Vivo V19, Vivo V19 Pro", 160.5, 74.2, 8.5),
        guard("sibling", "Vivo V19, Vivo Y50", 160.5, 74.2, 8.5),
    ];

    let result = latest().compute_matches(&catalog, "Vivo V19", Category::ScreenGuard);

    assert_eq!(
        result.original,
        Some(vec!["Vivo V19".to_string(), "Vivo V19 Pro".to_string(), "Vivo Y50".to_string()])
    );
    assert_eq!(result.full_temper, Some(vec!["Vivo V19".to_string(), "Vivo Y50".to_string()]));
}

#[test]
fn zero_dimension_reference_skips_full_temper() {
    let catalog = vec![
        guard("flat", "Vivo V19", 0.0, 74.2, 8.5),
        guard("twin", "Oppo F19", 0.0, 74.2, 8.5),
        guard("later", "Vivo V19", 160.5, 74.2, 8.5),
        guard("other", "Realme 7", 160.5, 74.2, 8.5),
    ];

    let result = latest().compute_matches(&catalog, "Vivo V19", Category::ScreenGuard);

    assert_eq!(result.original, Some(vec!["Vivo V19".to_string()]));
    assert_eq!(result.full_temper, Some(vec![]));
}

#[test]
fn zero_dimension_candidates_never_join_full_temper() {
    let catalog = vec![
        guard("ref", "Vivo V19", 0.05, 0.05, 0.0),
        guard("zero-height", "No Height", 0.0, 0.05, 0.0),
        guard("zero-width", "No Width", 0.05, 0.0, 0.0),
        Product {
            specs: None,
            ..guard("no-specs", "No Specs", 0.0, 0.0, 0.0)
        },
        guard("tiny", "Tiny Twin", 0.06, 0.04, 0.0),
    ];

    let result = latest().compute_matches(&catalog, "Vivo V19", Category::ScreenGuard);

    assert_eq!(result.full_temper, Some(vec!["Tiny Twin".to_string()]));
}

#[test]
fn radius_falls_back_to_generic_radius() {
    let reference = Product {
        specs: Some(Specs {
            height: Some(160.5),
            width: Some(74.2),
            radius: Some(8.5),
            ..Default::default()
        }),
        ..guard("ref", "Vivo V19", 0.0, 0.0, 0.0)
    };
    let no_radius = Product {
        specs: Some(Specs {
            height: Some(160.5),
            width: Some(74.2),
            ..Default::default()
        }),
        ..guard("square", "Square Corners", 0.0, 0.0, 0.0)
    };
    let catalog = vec![reference, guard("twin", "Oppo F19", 160.5, 74.2, 8.5), no_radius];

    let result = latest().compute_matches(&catalog, "Vivo V19", Category::ScreenGuard);

    assert_eq!(result.full_temper, Some(vec!["Oppo F19".to_string()]));
}

#[test]
fn malformed_dimensions_degrade_to_zero() {
    let json = r#"[
        { "_id": "ref", "category": "Screen Guard", "compatibleDevices": "Vivo V19",
          "specs": { "height": "160.5", "width": "74.2", "radiusTopLeft": "8.5" } },
        { "_id": "junk", "category": "Screen Guard", "compatibleDevices": "Junk Phone",
          "specs": { "height": "unknown", "width": "74.2", "radiusTopLeft": "8.5" } },
        { "_id": "twin", "category": "Screen Guard", "compatibleDevices": "Oppo F19",
          "specs": { "height": 160.5, "width": 74.2, "radiusTopLeft": 8.5 } }
    ]"#;
    let catalog: Vec<Product> = serde_json::from_str(json).unwrap();

    let result = latest().compute_matches(&catalog, "Vivo V19", Category::ScreenGuard);

    assert_eq!(result.full_temper, Some(vec!["Oppo F19".to_string()]));
}

#[test]
fn products_without_devices_contribute_nothing() {
    let catalog = vec![
        Product {
            compatible_devices: None,
            ..guard("empty", "", 160.5, 74.2, 8.5)
        },
        guard("ref", "Vivo V19", 160.5, 74.2, 8.5),
        guard("blank", " , ", 160.5, 74.2, 8.5),
    ];

    let result = latest().compute_matches(&catalog, "Vivo V19", Category::ScreenGuard);

    assert_eq!(result.original, Some(vec!["Vivo V19".to_string()]));
    assert_eq!(result.full_temper, Some(vec![]));
}

#[test]
fn similar_tier_only_when_enabled() {
    let catalog = vec![
        guard("ref", "Vivo V19", 160.5, 74.2, 8.5),
        guard("narrow", "Redmi Note 9", 160.9, 73.9, 7.0),
        guard("too-narrow", "Nokia 5", 160.5, 73.5, 8.5),
        guard("wider", "Moto G8", 160.5, 74.5, 8.5),
        guard("short", "Samsung M21", 159.4, 74.0, 8.5),
    ];

    let latest = latest().compute_matches(&catalog, "Vivo V19", Category::ScreenGuard);
    assert_eq!(latest.similar, None);

    let earlier = with_similar().compute_matches(&catalog, "Vivo V19", Category::ScreenGuard);
    assert_eq!(earlier.similar, Some(vec!["Redmi Note 9".to_string()]));
    assert_eq!(earlier.full_temper, Some(vec![]));
}

#[test]
fn contains_strategy_matches_substrings() {
    let catalog = sample_catalog();
    let contains = MatcherImpl::new(MatcherConfig {
        strategy: MatchStrategy::Contains,
        ..Default::default()
    });

    let exact = latest().compute_matches(&catalog, "Model", Category::Battery);
    assert_eq!(exact.perfect, Some(vec![]));

    let loose = contains.compute_matches(&catalog, "model x", Category::Battery);
    assert_eq!(
        loose.perfect,
        Some(vec!["Model X".to_string(), "Model X Plus".to_string(), "Model Y".to_string()])
    );
}

#[test]
fn chained_reselection_explores_neighbours() {
    let catalog = vec![
        item("1", Category::Battery, "Model X, Model X Plus"),
        item("2", Category::Battery, "Model X Plus, Model X Max"),
        item("3", Category::Battery, "Model X Max, Model Q"),
    ];
    let matcher = latest();

    let first = matcher.compute_matches(&catalog, "Model X", Category::Battery);
    assert_eq!(first.perfect, Some(vec!["Model X".to_string(), "Model X Plus".to_string()]));

    let picked = &first.perfect.as_ref().unwrap()[1];
    let second = matcher.compute_matches(&catalog, picked, Category::Battery);
    assert_eq!(
        second.perfect,
        Some(vec!["Model X".to_string(), "Model X Plus".to_string(), "Model X Max".to_string()])
    );
}

#[test]
fn browse_filters_by_category_and_query() {
    let catalog = sample_catalog();

    assert_eq!(filter_products(&catalog, None, "").len(), catalog.len());

    let batteries: Vec<&str> = filter_products(&catalog, Some(Category::Battery), "")
        .iter()
        .map(|p| p.id.as_str())
        .collect();
    assert_eq!(batteries, vec!["e", "f", "h"]);

    let vivo: Vec<&str> = filter_products(&catalog, None, "  VIVO v19 ")
        .iter()
        .map(|p| p.id.as_str())
        .collect();
    assert_eq!(vivo, vec!["a", "c", "g"]);

    assert!(filter_products(&catalog, Some(Category::CenterPanel), "vivo").is_empty());
}
