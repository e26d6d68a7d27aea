use invdash_upstream::normalize_product;
use serde_json::json;

use super::*;

/// A product whose only sales signal is `sold` lifetime units.
fn sold(id: &str, sold: f64) -> Product {
    normalize_product(&json!({ "id": id, "stock": 20, "soldQuantity": sold }))
}

fn classes(classified: &[AbcClassifiedProduct]) -> Vec<AbcClass> {
    classified.iter().map(|c| c.classification).collect()
}

fn ids(classified: &[AbcClassifiedProduct]) -> Vec<&str> {
    classified.iter().map(|c| c.product.id.as_str()).collect()
}

#[test]
fn score_weights_longer_windows_more() {
    let product = normalize_product(&json!({
        "avgSellsQuantityPast30Days": 2,
        "avgSellsQuantityPast15Days": 1,
        "avgSellsQuantityPast7Days": 1,
        "soldQuantity": 10,
    }));
    // 2*30 + 1*15 + 1*7 + 10
    assert!((sales_score(&product) - 92.0).abs() < 1e-9);
}

#[test]
fn missing_aggregates_score_zero() {
    let product = normalize_product(&json!({ "id": "x" }));
    assert!(sales_score(&product).abs() < f64::EPSILON);
}

#[test]
fn equal_thirds_classify_a_a_c() {
    let classified = classify(&[sold("1", 100.0), sold("2", 100.0), sold("3", 100.0)]);

    assert_eq!(classes(&classified), [AbcClass::A, AbcClass::A, AbcClass::C]);
    assert!((classified[0].accumulated_percentage - 100.0 / 3.0).abs() < 1e-9);
    assert!((classified[1].accumulated_percentage - 200.0 / 3.0).abs() < 1e-9);
    assert!((classified[2].accumulated_percentage - 100.0).abs() < 1e-9);
}

#[test]
fn ties_keep_input_order() {
    let classified = classify(&[sold("x", 100.0), sold("y", 100.0), sold("z", 100.0)]);
    assert_eq!(ids(&classified), ["x", "y", "z"]);
}

#[test]
fn ranks_descending_by_score() {
    let classified = classify(&[sold("low", 1.0), sold("high", 50.0), sold("mid", 10.0)]);
    assert_eq!(ids(&classified), ["high", "mid", "low"]);
}

#[test]
fn no_sales_makes_everything_a() {
    let classified = classify(&[sold("1", 0.0), sold("2", 0.0), sold("3", 0.0)]);
    assert!(classified.iter().all(|c| c.classification == AbcClass::A));
    assert!(classified.iter().all(|c| c.accumulated_percentage.abs() < f64::EPSILON));
}

#[test]
fn dominant_product_above_80_percent_starts_in_b() {
    let classified = classify(&[sold("big", 90.0), sold("s1", 5.0), sold("s2", 5.0)]);
    assert_eq!(classes(&classified), [AbcClass::B, AbcClass::B, AbcClass::C]);
}

#[test]
fn dominant_product_alone_fills_a_tier() {
    let classified = classify(&[sold("big", 80.0), sold("m", 15.0), sold("s", 5.0)]);
    assert_eq!(classes(&classified), [AbcClass::A, AbcClass::B, AbcClass::C]);
}

#[test]
fn boundaries_are_inclusive() {
    assert_eq!(AbcClass::from_cumulative_pct(80.0), AbcClass::A);
    assert_eq!(AbcClass::from_cumulative_pct(80.000_1), AbcClass::B);
    assert_eq!(AbcClass::from_cumulative_pct(95.0), AbcClass::B);
    assert_eq!(AbcClass::from_cumulative_pct(95.000_1), AbcClass::C);
}

#[test]
fn accumulated_percentage_is_non_decreasing() {
    let products: Vec<Product> = [7.0, 0.0, 42.0, 3.0, 3.0, 19.0, 0.5, 88.0]
        .iter()
        .enumerate()
        .map(|(i, s)| sold(&i.to_string(), *s))
        .collect();
    let classified = classify(&products);

    for pair in classified.windows(2) {
        assert!(pair[0].sales_score >= pair[1].sales_score);
        assert!(pair[0].accumulated_percentage <= pair[1].accumulated_percentage);
        assert!(pair[0].classification <= pair[1].classification);
    }
    for item in &classified {
        assert_eq!(
            item.classification,
            AbcClass::from_cumulative_pct(item.accumulated_percentage)
        );
    }
}

#[test]
fn empty_input() {
    assert!(classify(&[]).is_empty());
    assert_eq!(summarize(&[]), AbcSummary::default());
}

#[test]
fn summary_counts_and_shares() {
    let classified = classify(&[sold("big", 80.0), sold("m", 15.0), sold("s", 5.0)]);
    let summary = summarize(&classified);

    assert_eq!(summary.a.products, 1);
    assert_eq!(summary.b.products, 1);
    assert_eq!(summary.c.products, 1);
    assert!((summary.total_score - 100.0).abs() < 1e-9);
    assert!((summary.tier(AbcClass::A).score_share - 80.0).abs() < 1e-9);
    assert!((summary.tier(AbcClass::C).score_share - 5.0).abs() < 1e-9);
}

#[test]
fn classified_product_serializes_flat() {
    let classified = classify(&[sold("1", 3.0)]);
    let json = serde_json::to_value(&classified[0]).unwrap();
    assert_eq!(json["id"], "1");
    assert_eq!(json["classification"], "C");
    assert_eq!(json["salesScore"], 3.0);
    assert_eq!(json["accumulatedPercentage"], 100.0);
}
