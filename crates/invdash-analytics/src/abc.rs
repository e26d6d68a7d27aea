//! ABC classification by cumulative share of a synthesized sales score.
//!
//! Products are ranked by score, highest first, and tiered by the running
//! share of the total score they account for:
//!
//! ```text
//! cumulative share <= 80%   A
//! cumulative share <= 95%   B
//! otherwise                 C
//! ```
//!
//! Thresholds apply to score share, not product count, so one dominant
//! product can make up the whole A tier. When no product has any sales the
//! share stays at 0% and everything is A.

use invdash_core::Product;
use serde::{Deserialize, Serialize};

/// Rolling-window weights: longer windows count for more.
pub const WINDOW_WEIGHTS: [(Window, f64); 3] = [
    (Window::Days30, 30.0),
    (Window::Days15, 15.0),
    (Window::Days7, 7.0),
];

pub const A_THRESHOLD_PCT: f64 = 80.0;
pub const B_THRESHOLD_PCT: f64 = 95.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    Days7,
    Days15,
    Days30,
}

impl Window {
    fn average(self, product: &Product) -> Option<f64> {
        match self {
            Self::Days7 => product.avg_sells_quantity_past_7_days,
            Self::Days15 => product.avg_sells_quantity_past_15_days,
            Self::Days30 => product.avg_sells_quantity_past_30_days,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AbcClass {
    A,
    B,
    C,
}

impl AbcClass {
    /// Tier for a cumulative share expressed in percent.
    #[must_use]
    pub fn from_cumulative_pct(pct: f64) -> Self {
        if pct <= A_THRESHOLD_PCT {
            Self::A
        } else if pct <= B_THRESHOLD_PCT {
            Self::B
        } else {
            Self::C
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
        }
    }
}

impl std::fmt::Display for AbcClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbcClassifiedProduct {
    #[serde(flatten)]
    pub product: Product,
    pub classification: AbcClass,
    pub sales_score: f64,
    /// Cumulative share of the total score up to and including this product,
    /// in percent.
    pub accumulated_percentage: f64,
}

/// Weighted demand score: each rolling average times its window length, plus
/// lifetime units sold. Missing aggregates contribute nothing.
#[must_use]
pub fn sales_score(product: &Product) -> f64 {
    let windows: f64 = WINDOW_WEIGHTS
        .iter()
        .map(|(window, weight)| window.average(product).unwrap_or(0.0) * weight)
        .sum();
    windows + product.sold_quantity.unwrap_or(0.0)
}

/// Ranks products by [`sales_score`] (stable, descending) and assigns tiers.
#[must_use]
pub fn classify(products: &[Product]) -> Vec<AbcClassifiedProduct> {
    let mut scored: Vec<(f64, &Product)> = products.iter().map(|p| (sales_score(p), p)).collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));

    let total: f64 = scored.iter().map(|(score, _)| score).sum();
    let mut cumulative = 0.0;

    let classified: Vec<AbcClassifiedProduct> = scored
        .into_iter()
        .map(|(score, product)| {
            cumulative += score;
            let accumulated_percentage = if total > 0.0 {
                cumulative * 100.0 / total
            } else {
                0.0
            };
            AbcClassifiedProduct {
                product: product.clone(),
                classification: AbcClass::from_cumulative_pct(accumulated_percentage),
                sales_score: score,
                accumulated_percentage,
            }
        })
        .collect();

    tracing::debug!(products = classified.len(), total_score = total, "abc classification done");
    classified
}

/// Count and score share of one tier.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierSummary {
    pub products: usize,
    pub score: f64,
    /// Share of the total score, in percent.
    pub score_share: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbcSummary {
    pub a: TierSummary,
    pub b: TierSummary,
    pub c: TierSummary,
    pub total_score: f64,
}

impl AbcSummary {
    #[must_use]
    pub fn tier(&self, class: AbcClass) -> &TierSummary {
        match class {
            AbcClass::A => &self.a,
            AbcClass::B => &self.b,
            AbcClass::C => &self.c,
        }
    }
}

/// Per-tier totals over an already classified list.
#[must_use]
pub fn summarize(classified: &[AbcClassifiedProduct]) -> AbcSummary {
    let mut summary = AbcSummary::default();
    for item in classified {
        let tier = match item.classification {
            AbcClass::A => &mut summary.a,
            AbcClass::B => &mut summary.b,
            AbcClass::C => &mut summary.c,
        };
        tier.products += 1;
        tier.score += item.sales_score;
        summary.total_score += item.sales_score;
    }
    if summary.total_score > 0.0 {
        let total = summary.total_score;
        for tier in [&mut summary.a, &mut summary.b, &mut summary.c] {
            tier.score_share = tier.score * 100.0 / total;
        }
    }
    summary
}

#[cfg(test)]
#[path = "abc_test.rs"]
mod tests;
