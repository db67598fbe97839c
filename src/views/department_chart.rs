//! Department Chart
//!
//! Horizontal bars for the departments with the highest total earnings.
//! Display labels may be truncated, so each bar also keeps the full name a
//! click resolves to.

use super::SELECTED_COLOR;
use crate::api::DepartmentSummary;
use crate::format::{format_count, format_currency, format_currency_full, Precision};

pub const BAR_COLOR: &str = "#2b6cb0";

/// Share of the series maximum above which a value label fits inside its bar
const INSIDE_LABEL_THRESHOLD: f64 = 0.3;

/// Where a bar's value label is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelPlacement {
    Inside,
    Outside,
}

impl LabelPlacement {
    pub fn text_color(self) -> &'static str {
        match self {
            LabelPlacement::Inside => "#ffffff",
            LabelPlacement::Outside => "#1a202c",
        }
    }
}

/// Inside when `value` exceeds 30% of `max`, otherwise outside
pub fn label_placement(value: f64, max: f64) -> LabelPlacement {
    if value > max * INSIDE_LABEL_THRESHOLD {
        LabelPlacement::Inside
    } else {
        LabelPlacement::Outside
    }
}

/// Cut `name` to `max_chars` characters and append `...` when it is longer
pub fn truncate_label(name: &str, max_chars: usize) -> String {
    if name.chars().count() > max_chars {
        let head: String = name.chars().take(max_chars).collect();
        format!("{}...", head)
    } else {
        name.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepartmentChartOptions {
    /// How many departments to chart
    pub top_n: usize,
    /// Display labels longer than this are truncated
    pub label_max_chars: usize,
}

impl Default for DepartmentChartOptions {
    fn default() -> Self {
        Self {
            top_n: 10,
            label_max_chars: 25,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DepartmentBar {
    /// Possibly truncated display label
    pub label: String,
    /// Untruncated department name
    pub full_name: String,
    pub value: f64,
    pub value_label: String,
    pub color: &'static str,
    pub placement: LabelPlacement,
    pub employee_count: u64,
    pub avg_earnings: f64,
    pub avg_overtime: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DepartmentChart {
    pub bars: Vec<DepartmentBar>,
}

impl DepartmentChart {
    /// Chart the top departments by total earnings, highlighting `selected`
    pub fn build(
        departments: &[DepartmentSummary],
        selected: Option<&str>,
        options: &DepartmentChartOptions,
    ) -> Self {
        let mut ranked: Vec<&DepartmentSummary> = departments.iter().collect();
        ranked.sort_by(|a, b| b.total_earnings.total_cmp(&a.total_earnings));
        ranked.truncate(options.top_n);

        let max = ranked
            .iter()
            .map(|d| d.total_earnings)
            .fold(0.0_f64, f64::max);

        let bars = ranked
            .into_iter()
            .map(|d| DepartmentBar {
                label: truncate_label(&d.name, options.label_max_chars),
                full_name: d.name.clone(),
                value: d.total_earnings,
                value_label: format_currency(d.total_earnings),
                color: if selected == Some(d.name.as_str()) {
                    SELECTED_COLOR
                } else {
                    BAR_COLOR
                },
                placement: label_placement(d.total_earnings, max),
                employee_count: d.employee_count,
                avg_earnings: d.avg_earnings,
                avg_overtime: d.avg_overtime,
            })
            .collect();

        Self { bars }
    }

    /// Full department name of the bar at `index`
    pub fn full_name_at(&self, index: usize) -> Option<&str> {
        self.bars.get(index).map(|b| b.full_name.as_str())
    }

    /// Tooltip title and lines for the bar at `index`
    pub fn tooltip(&self, index: usize) -> Option<(String, Vec<String>)> {
        let bar = self.bars.get(index)?;
        Some((
            bar.full_name.clone(),
            vec![
                format!("Employees: {}", format_count(bar.employee_count)),
                format!(
                    "Avg Salary: {}",
                    format_currency_full(bar.avg_earnings, Precision::Cents)
                ),
                format!(
                    "Avg Overtime: {}",
                    format_currency_full(bar.avg_overtime, Precision::Cents)
                ),
            ],
        ))
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}
