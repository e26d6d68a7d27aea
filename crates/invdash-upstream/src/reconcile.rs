//! Reconciliation of raw stock-movement records into [`StockMovement`].
//!
//! Upstream movement records rarely carry both sides of the stock trail.
//! Whichever side is present is combined with the movement quantity and
//! direction to derive the other:
//!
//! ```text
//! only after   exit            before = after + quantity
//!              anything else   before = after - quantity
//! only before  exit            after  = before - quantity
//!              anything else   after  = before + quantity
//! neither                      before = after = 0
//! ```
//!
//! Both levels are clamped to zero afterwards.

use invdash_core::{MovementType, StockMovement, StockTrail, TypeSource};
use serde_json::Value;

use crate::fields::{fold_key, FieldPolicy};

pub const DEFAULT_REASON: &str = "Movimentação de estoque";
pub const DEFAULT_USER_ID: &str = "system";
pub const DEFAULT_USER_NAME: &str = "Sistema";

pub const ID: FieldPolicy = FieldPolicy {
    field: "id",
    candidates: &[&["id"], &["movementId"], &["_id"]],
};

pub const TYPE: FieldPolicy = FieldPolicy {
    field: "type",
    candidates: &[&["type"], &["movementType"], &["operation"]],
};

pub const QUANTITY: FieldPolicy = FieldPolicy {
    field: "quantity",
    candidates: &[&["quantity"], &["amount"], &["qty"]],
};

/// Resulting stock level. Both spellings of "available quantity" are real:
/// upstream emits `avaiableQuantity` on some endpoints.
pub const AFTER: FieldPolicy = FieldPolicy {
    field: "newStock",
    candidates: &[
        &["balance"],
        &["avaiableQuantity"],
        &["availableQuantity"],
        &["newStock"],
        &["currentStock"],
        &["stockAfter"],
    ],
};

pub const BEFORE: FieldPolicy = FieldPolicy {
    field: "previousStock",
    candidates: &[
        &["previousStock"],
        &["previousQuantity"],
        &["stockBefore"],
        &["oldStock"],
    ],
};

pub const REASON: FieldPolicy = FieldPolicy {
    field: "reason",
    candidates: &[&["reason"], &["description"], &["observation"]],
};

pub const REFERENCE: FieldPolicy = FieldPolicy {
    field: "reference",
    candidates: &[&["reference"], &["document"], &["orderId"]],
};

pub const USER_ID: FieldPolicy = FieldPolicy {
    field: "userId",
    candidates: &[&["userId"], &["user", "id"]],
};

pub const USER_NAME: FieldPolicy = FieldPolicy {
    field: "userName",
    candidates: &[&["userName"], &["user", "name"]],
};

pub const CREATED_AT: FieldPolicy = FieldPolicy {
    field: "createdAt",
    candidates: &[&["createdAt"], &["date"], &["created_at"]],
};

/// Reconciles one raw movement belonging to `product_id`.
#[must_use]
pub fn reconcile_movement(raw: &Value, product_id: &str) -> StockMovement {
    reconcile_at(raw, product_id, 0)
}

/// Reconciles a batch in upstream order. Records without an id get
/// `"{product_id}-{position}"`.
#[must_use]
pub fn reconcile_movements(records: &[Value], product_id: &str) -> Vec<StockMovement> {
    records
        .iter()
        .enumerate()
        .map(|(position, raw)| reconcile_at(raw, product_id, position))
        .collect()
}

fn reconcile_at(raw: &Value, product_id: &str, position: usize) -> StockMovement {
    let signed_quantity = QUANTITY.number(raw).unwrap_or(0.0);
    let quantity = signed_quantity.abs();

    let code = TYPE.text(raw);
    let (movement_type, type_source) = match code.as_deref().and_then(movement_type_from_code) {
        Some(movement_type) => (movement_type, TypeSource::Code),
        None => {
            let inferred = infer_type_from_sign(signed_quantity);
            tracing::debug!(
                product_id,
                raw_type = ?TYPE.lookup(raw),
                signed_quantity,
                inferred = %inferred,
                "movement type inferred from quantity sign"
            );
            (inferred, TypeSource::InferredFromSign)
        }
    };

    let (previous_stock, new_stock, trail) =
        reconcile_trail(BEFORE.number(raw), AFTER.number(raw), quantity, movement_type);
    if trail == StockTrail::Missing {
        tracing::debug!(product_id, "movement carries no stock levels; trail zeroed");
    }

    StockMovement {
        id: ID
            .text(raw)
            .unwrap_or_else(|| format!("{product_id}-{position}")),
        product_id: product_id.to_owned(),
        movement_type,
        quantity,
        previous_stock,
        new_stock,
        reason: REASON.text(raw).unwrap_or_else(|| DEFAULT_REASON.to_owned()),
        reference: REFERENCE.text(raw),
        user_id: USER_ID.text(raw).unwrap_or_else(|| DEFAULT_USER_ID.to_owned()),
        user_name: USER_NAME
            .text(raw)
            .unwrap_or_else(|| DEFAULT_USER_NAME.to_owned()),
        created_at: CREATED_AT.timestamp(raw),
        type_source,
        trail,
    }
}

/// Maps a known movement code or word to its canonical type.
///
/// Matching ignores case and Portuguese accents, so `"S"`, `"saída"`, and
/// `"OUT"` all map to [`MovementType::Exit`].
#[must_use]
pub fn movement_type_from_code(code: &str) -> Option<MovementType> {
    match fold_key(code).as_str() {
        "e" | "entrada" | "in" | "entry" => Some(MovementType::Entry),
        "s" | "saida" | "out" | "exit" => Some(MovementType::Exit),
        "a" | "ajuste" | "adjustment" | "balanco" => Some(MovementType::Adjustment),
        "d" | "devolucao" | "return" => Some(MovementType::Return),
        _ => None,
    }
}

/// Fallback used when no recognizable type code is present: a positive raw
/// quantity is an entry, anything else an exit.
#[must_use]
pub fn infer_type_from_sign(signed_quantity: f64) -> MovementType {
    if signed_quantity > 0.0 {
        MovementType::Entry
    } else {
        MovementType::Exit
    }
}

/// Returns `(previous_stock, new_stock, trail)` with both levels clamped to
/// zero.
#[must_use]
pub fn reconcile_trail(
    before: Option<f64>,
    after: Option<f64>,
    quantity: f64,
    movement_type: MovementType,
) -> (f64, f64, StockTrail) {
    let outbound = movement_type.is_outbound();
    let (previous, new, trail) = match (before, after) {
        (Some(before), Some(after)) => (before, after, StockTrail::Observed),
        (None, Some(after)) => {
            let before = if outbound { after + quantity } else { after - quantity };
            (before, after, StockTrail::PreviousDerived)
        }
        (Some(before), None) => {
            let after = if outbound { before - quantity } else { before + quantity };
            (before, after, StockTrail::NewDerived)
        }
        (None, None) => (0.0, 0.0, StockTrail::Missing),
    };
    (previous.max(0.0), new.max(0.0), trail)
}

#[cfg(test)]
#[path = "reconcile_test.rs"]
mod tests;
