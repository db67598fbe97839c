//! Earnings Composition Chart
//!
//! One bar per earnings category, valued by its share of total compensation.

use super::SELECTED_COLOR;
use crate::api::{EarningsBreakdown, EarningsType};
use crate::format::{format_currency, format_percent};

/// Base colors, in [`EarningsType::ALL`] order
pub const EARNINGS_PALETTE: [&str; 7] = [
    "#4299e1", "#ed8936", "#9f7aea", "#48bb78", "#a0aec0", "#f56565", "#38b2ac",
];

#[derive(Debug, Clone, PartialEq)]
pub struct EarningsBar {
    pub earnings_type: EarningsType,
    pub label: &'static str,
    pub percent: f64,
    pub total: f64,
    pub value_label: String,
    pub color: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EarningsChart {
    pub bars: Vec<EarningsBar>,
}

impl EarningsChart {
    pub fn build(breakdown: &EarningsBreakdown, selected: Option<EarningsType>) -> Self {
        let bars = EarningsType::ALL
            .into_iter()
            .zip(EARNINGS_PALETTE)
            .map(|(earnings_type, base)| {
                let percent = breakdown.percentages.get(earnings_type);
                EarningsBar {
                    earnings_type,
                    label: earnings_type.label(),
                    percent,
                    total: breakdown.totals.get(earnings_type),
                    value_label: format_percent(percent),
                    color: if selected == Some(earnings_type) {
                        SELECTED_COLOR
                    } else {
                        base
                    },
                }
            })
            .collect();

        Self { bars }
    }

    /// Earnings type of the bar at `index`
    pub fn type_at(&self, index: usize) -> Option<EarningsType> {
        self.bars.get(index).map(|b| b.earnings_type)
    }

    pub fn tooltip(&self, index: usize) -> Option<String> {
        self.bars
            .get(index)
            .map(|b| format!("Total: {}", format_currency(b.total)))
    }
}
