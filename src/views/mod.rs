//! Views
//!
//! Adapter-neutral models for everything the dashboard shows, and the
//! [`ViewAdapter`] trait a rendering surface implements to display them.
//!
//! - [`EmployeeTable`]: column definitions, rows, quick filter
//! - [`StatCards`]: summary figures with year-over-year variance
//! - [`DepartmentChart`]: top departments, click-to-filter
//! - [`EarningsChart`]: earnings composition, click-to-filter

mod department_chart;
mod earnings_chart;
mod stats;
mod table;

pub use department_chart::{
    label_placement, truncate_label, DepartmentBar, DepartmentChart, DepartmentChartOptions,
    LabelPlacement,
};
pub use earnings_chart::{EarningsBar, EarningsChart, EARNINGS_PALETTE};
pub use stats::{StatCard, StatCards};
pub use table::{Column, EmployeeTable, Field, COLUMNS};

use crate::api::{EarningsType, ExportFile};

/// Color of the selected bar in either chart
pub const SELECTED_COLOR: &str = "#1a365d";

/// A rendering surface for the dashboard.
///
/// Methods are called from whichever task finished loading the data, so they
/// must not block. Render calls replace the previous content wholesale.
pub trait ViewAdapter: Send + Sync {
    fn render_table(&self, table: &EmployeeTable);

    fn render_stats(&self, stats: &StatCards);

    fn render_department_chart(&self, chart: &DepartmentChart);

    fn render_earnings_chart(&self, chart: &EarningsChart);

    fn set_year_options(&self, years: &[i32], selected: i32);

    /// Replace the department dropdown's options (alphabetical)
    fn set_department_options(&self, names: &[String]);

    /// Show `department` in the department dropdown.
    ///
    /// Adapters whose dropdown emits change events must report the resulting
    /// change with [`crate::filter::UpdateSource::Programmatic`].
    fn sync_department_control(&self, department: Option<&str>);

    /// Show `earnings_type` in the earnings-type dropdown; same contract as
    /// [`ViewAdapter::sync_department_control`]
    fn sync_earnings_type_control(&self, earnings_type: Option<EarningsType>);

    /// Narrow the loaded table rows to those matching `text`
    fn apply_quick_filter(&self, text: &str);

    /// Hand a finished export to the user
    fn deliver_export(&self, file: &ExportFile);

    /// Blocking, user-visible error message
    fn alert(&self, message: &str);
}
