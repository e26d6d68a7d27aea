use serde_json::json;

use super::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// -----------------------------------------------------------------------
// Type codes
// -----------------------------------------------------------------------

#[test]
fn known_codes_map_to_canonical_types() {
    let cases = [
        ("E", MovementType::Entry),
        ("entrada", MovementType::Entry),
        ("IN", MovementType::Entry),
        ("S", MovementType::Exit),
        ("Saída", MovementType::Exit),
        ("SAIDA", MovementType::Exit),
        ("out", MovementType::Exit),
        ("A", MovementType::Adjustment),
        ("Ajuste", MovementType::Adjustment),
        ("BALANÇO", MovementType::Adjustment),
        ("D", MovementType::Return),
        ("Devolução", MovementType::Return),
        ("return", MovementType::Return),
    ];
    for (code, expected) in cases {
        assert_eq!(movement_type_from_code(code), Some(expected), "code {code}");
    }
}

#[test]
fn unknown_code_is_none() {
    assert_eq!(movement_type_from_code("transfer"), None);
    assert_eq!(movement_type_from_code(""), None);
}

#[test]
fn sign_fallback() {
    assert_eq!(infer_type_from_sign(4.0), MovementType::Entry);
    assert_eq!(infer_type_from_sign(-4.0), MovementType::Exit);
    assert_eq!(infer_type_from_sign(0.0), MovementType::Exit);
}

// -----------------------------------------------------------------------
// Whole-record reconciliation
// -----------------------------------------------------------------------

#[test]
fn exit_with_misspelled_available_quantity_derives_previous() {
    let movement = reconcile_movement(
        &json!({ "type": "S", "quantity": 5, "avaiableQuantity": 20 }),
        "p1",
    );
    assert_eq!(movement.movement_type, MovementType::Exit);
    assert_eq!(movement.type_source, TypeSource::Code);
    assert!(approx(movement.quantity, 5.0));
    assert!(approx(movement.new_stock, 20.0));
    assert!(approx(movement.previous_stock, 25.0));
    assert_eq!(movement.trail, StockTrail::PreviousDerived);
}

#[test]
fn missing_type_with_negative_quantity_is_inferred_exit() {
    let movement = reconcile_movement(&json!({ "quantity": -3 }), "p1");
    assert_eq!(movement.movement_type, MovementType::Exit);
    assert_eq!(movement.type_source, TypeSource::InferredFromSign);
    assert!(approx(movement.quantity, 3.0));
    assert!(movement.is_degraded());
}

#[test]
fn unrecognized_type_falls_back_to_sign() {
    let movement = reconcile_movement(&json!({ "type": "TRANSF", "quantity": 8 }), "p1");
    assert_eq!(movement.movement_type, MovementType::Entry);
    assert_eq!(movement.type_source, TypeSource::InferredFromSign);
}

#[test]
fn quantity_is_always_a_magnitude() {
    for raw in [
        json!({ "type": "E", "quantity": -7 }),
        json!({ "type": "S", "quantity": 7 }),
        json!({ "quantity": "-7" }),
        json!({ "amount": -7 }),
        json!({ "qty": 7 }),
    ] {
        let movement = reconcile_movement(&raw, "p1");
        assert!(approx(movement.quantity, 7.0), "{raw}");
        assert!(movement.quantity >= 0.0);
    }
}

#[test]
fn entry_like_types_derive_previous_below_after() {
    for code in ["E", "D", "A"] {
        let movement = reconcile_movement(
            &json!({ "type": code, "quantity": 4, "availableQuantity": 10 }),
            "p1",
        );
        assert!(approx(movement.previous_stock, 6.0), "code {code}");
        assert!(approx(movement.new_stock, 10.0));
    }
}

#[test]
fn derived_previous_is_clamped() {
    let movement = reconcile_movement(&json!({ "type": "E", "quantity": 15, "balance": 10 }), "p1");
    assert!(approx(movement.previous_stock, 0.0));
    assert!(approx(movement.new_stock, 10.0));
}

#[test]
fn observed_negative_levels_are_clamped() {
    let movement = reconcile_movement(
        &json!({ "type": "S", "quantity": 2, "previousStock": -1, "newStock": -3 }),
        "p1",
    );
    assert_eq!(movement.trail, StockTrail::Observed);
    assert!(approx(movement.previous_stock, 0.0));
    assert!(approx(movement.new_stock, 0.0));
}

#[test]
fn both_levels_observed_are_kept() {
    let movement = reconcile_movement(
        &json!({ "type": "A", "quantity": 3, "previousStock": 12, "newStock": 9 }),
        "p1",
    );
    assert_eq!(movement.trail, StockTrail::Observed);
    assert!(approx(movement.previous_stock, 12.0));
    assert!(approx(movement.new_stock, 9.0));
}

#[test]
fn only_previous_derives_new() {
    let exit = reconcile_movement(&json!({ "type": "S", "quantity": 3, "stockBefore": 10 }), "p1");
    assert_eq!(exit.trail, StockTrail::NewDerived);
    assert!(approx(exit.new_stock, 7.0));

    let entry = reconcile_movement(&json!({ "type": "E", "quantity": 3, "oldStock": 10 }), "p1");
    assert!(approx(entry.new_stock, 13.0));

    let overdrawn = reconcile_movement(&json!({ "type": "S", "quantity": 30, "oldStock": 10 }), "p1");
    assert!(approx(overdrawn.new_stock, 0.0));
}

#[test]
fn neither_level_present_zeroes_the_trail() {
    let movement = reconcile_movement(&json!({ "type": "E", "quantity": 3 }), "p1");
    assert_eq!(movement.trail, StockTrail::Missing);
    assert!(approx(movement.previous_stock, 0.0));
    assert!(approx(movement.new_stock, 0.0));
    assert!(movement.is_degraded());
}

#[test]
fn after_candidates_follow_priority_order() {
    let movement = reconcile_movement(
        &json!({
            "type": "E",
            "quantity": 1,
            "balance": 50,
            "avaiableQuantity": 40,
            "availableQuantity": 30,
            "newStock": 20,
        }),
        "p1",
    );
    assert!(approx(movement.new_stock, 50.0));

    for key in ["avaiableQuantity", "availableQuantity", "newStock", "currentStock", "stockAfter"] {
        let mut raw = json!({ "type": "E", "quantity": 1 });
        raw[key] = json!(11);
        let movement = reconcile_movement(&raw, "p1");
        assert!(approx(movement.new_stock, 11.0), "after key {key} not read");
        assert!(approx(movement.previous_stock, 10.0));
    }
}

#[test]
fn before_candidates_are_read() {
    for key in ["previousStock", "previousQuantity", "stockBefore", "oldStock"] {
        let mut raw = json!({ "type": "S", "quantity": 1 });
        raw[key] = json!(9);
        let movement = reconcile_movement(&raw, "p1");
        assert!(approx(movement.previous_stock, 9.0), "before key {key} not read");
    }
}

#[test]
fn actor_reason_and_timestamp() {
    let movement = reconcile_movement(
        &json!({
            "id": 991,
            "movementType": "ENTRADA",
            "quantity": 2,
            "description": "Compra NF 123",
            "document": "NF-123",
            "user": { "id": 7, "name": "Ana" },
            "date": "2024-05-02T09:15:00Z",
        }),
        "p9",
    );
    assert_eq!(movement.id, "991");
    assert_eq!(movement.product_id, "p9");
    assert_eq!(movement.movement_type, MovementType::Entry);
    assert_eq!(movement.reason, "Compra NF 123");
    assert_eq!(movement.reference.as_deref(), Some("NF-123"));
    assert_eq!(movement.user_id, "7");
    assert_eq!(movement.user_name, "Ana");
    assert!(movement.created_at.is_some());
}

#[test]
fn defaults_for_missing_metadata() {
    let movement = reconcile_movement(&json!({ "type": "E", "quantity": 1 }), "p1");
    assert_eq!(movement.reason, DEFAULT_REASON);
    assert_eq!(movement.user_id, DEFAULT_USER_ID);
    assert_eq!(movement.user_name, DEFAULT_USER_NAME);
    assert!(movement.reference.is_none());
    assert!(movement.created_at.is_none());
    assert_eq!(movement.id, "p1-0");
}

#[test]
fn batch_synthesizes_positional_ids() {
    let movements = reconcile_movements(
        &[
            json!({ "type": "E", "quantity": 1 }),
            json!({ "id": "m-2", "type": "S", "quantity": 1 }),
            json!({ "type": "S", "quantity": 1 }),
        ],
        "p3",
    );
    let ids: Vec<&str> = movements.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, ["p3-0", "m-2", "p3-2"]);
}

#[test]
fn reconcile_trail_sign_matches_type() {
    for (movement_type, after) in [
        (MovementType::Exit, 5.0),
        (MovementType::Entry, 5.0),
        (MovementType::Return, 5.0),
        (MovementType::Adjustment, 5.0),
    ] {
        let (previous, new, _) = reconcile_trail(None, Some(after), 2.0, movement_type);
        if movement_type.is_outbound() {
            assert!(new - previous <= 0.0);
        } else {
            assert!(new - previous >= 0.0);
        }
    }
}
