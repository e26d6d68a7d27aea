use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    Entry,
    Exit,
    Adjustment,
    Return,
}

impl MovementType {
    /// `true` when the movement removes stock.
    #[must_use]
    pub fn is_outbound(self) -> bool {
        matches!(self, Self::Exit)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Entry => "entry",
            Self::Exit => "exit",
            Self::Adjustment => "adjustment",
            Self::Return => "return",
        }
    }
}

impl std::fmt::Display for MovementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the movement type was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeSource {
    /// A known code or word was present on the record.
    Code,
    /// No usable code; guessed from the sign of the raw quantity.
    InferredFromSign,
}

/// Which side of the before/after stock trail was observed upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockTrail {
    /// Both levels came from the record.
    Observed,
    /// `previous_stock` was derived from `new_stock` and the quantity.
    PreviousDerived,
    /// `new_stock` was derived from `previous_stock` and the quantity.
    NewDerived,
    /// Neither level was present; both are zero.
    Missing,
}

/// A stock movement in the canonical schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    pub id: String,
    pub product_id: String,
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    /// Non-negative magnitude; direction lives in `movement_type`.
    pub quantity: f64,
    pub previous_stock: f64,
    pub new_stock: f64,
    pub reason: String,
    pub reference: Option<String>,
    pub user_id: String,
    pub user_name: String,
    pub created_at: Option<DateTime<Utc>>,
    pub type_source: TypeSource,
    pub trail: StockTrail,
}

impl StockMovement {
    /// `true` when any part of the record was guessed rather than observed.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.type_source == TypeSource::InferredFromSign || self.trail == StockTrail::Missing
    }

    /// Signed change in stock level (`new_stock - previous_stock`).
    #[must_use]
    pub fn delta(&self) -> f64 {
        self.new_stock - self.previous_stock
    }
}
