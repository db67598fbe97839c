//! View Synchronizer
//!
//! Loads every view for a filter snapshot. The four loads run concurrently
//! and each one renders as soon as its own fetch resolves; a failed load is
//! logged and leaves that view's previous rendering in place.
//!
//! Each reload takes a new generation number. A load that resolves after a
//! newer reload has started is discarded rather than rendered.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::api::{ApiResult, EarningsType, FilterQuery, PayrollApi};
use crate::filter::FilterState;
use crate::views::{
    DepartmentChart, DepartmentChartOptions, EarningsChart, EmployeeTable, StatCards, ViewAdapter,
};

/// How one view fared during a reload
#[derive(Debug, Clone, PartialEq)]
pub enum ViewOutcome {
    Rendered,
    /// The fetch failed; the previous rendering is still shown
    Failed(String),
    /// A newer reload started before this fetch resolved
    Superseded,
}

impl ViewOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, ViewOutcome::Rendered)
    }
}

/// Per-view outcomes of one reload
#[derive(Debug, Clone, PartialEq)]
pub struct ReloadReport {
    pub generation: u64,
    pub table: ViewOutcome,
    pub stats: ViewOutcome,
    pub department_chart: ViewOutcome,
    pub earnings_chart: ViewOutcome,
}

impl ReloadReport {
    pub fn all_rendered(&self) -> bool {
        self.outcomes().iter().all(|(_, o)| o.is_rendered())
    }

    pub fn outcomes(&self) -> [(&'static str, &ViewOutcome); 4] {
        [
            ("table", &self.table),
            ("stats", &self.stats),
            ("department chart", &self.department_chart),
            ("earnings chart", &self.earnings_chart),
        ]
    }

    /// Views whose fetch failed, with the error message
    pub fn failures(&self) -> Vec<(&'static str, &str)> {
        self.outcomes()
            .into_iter()
            .filter_map(|(name, outcome)| match outcome {
                ViewOutcome::Failed(message) => Some((name, message.as_str())),
                _ => None,
            })
            .collect()
    }
}

pub struct ViewSynchronizer {
    api: Arc<dyn PayrollApi>,
    view: Arc<dyn ViewAdapter>,
    chart_options: DepartmentChartOptions,
    page_size: usize,
    generation: AtomicU64,
    /// Department dropdown loads started so far
    options_generation: AtomicU64,
    /// Last rendered charts, used to resolve bar clicks
    department_chart: RwLock<DepartmentChart>,
    earnings_chart: RwLock<EarningsChart>,
}

impl ViewSynchronizer {
    pub fn new(
        api: Arc<dyn PayrollApi>,
        view: Arc<dyn ViewAdapter>,
        chart_options: DepartmentChartOptions,
        page_size: usize,
    ) -> Self {
        Self {
            api,
            view,
            chart_options,
            page_size,
            generation: AtomicU64::new(0),
            options_generation: AtomicU64::new(0),
            department_chart: RwLock::new(DepartmentChart::default()),
            earnings_chart: RwLock::new(EarningsChart::default()),
        }
    }

    /// Number of reloads started so far
    pub fn reload_count(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Re-fetch and re-render the table, stat cards, and both charts
    pub async fn reload(&self, filter: &FilterState) -> ReloadReport {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let query = filter.query();

        tracing::info!(
            generation,
            year = query.year,
            department = ?query.department,
            earnings_type = ?query.earnings_type,
            "Reloading dashboard"
        );

        let (table, stats, department_chart, earnings_chart) = tokio::join!(
            self.load_table(generation, &query),
            self.load_stats(generation, &query),
            self.load_department_chart(generation, &query),
            self.load_earnings_chart(generation, &query),
        );

        let report = ReloadReport {
            generation,
            table,
            stats,
            department_chart,
            earnings_chart,
        };

        if report.all_rendered() {
            tracing::info!(generation, "Dashboard reloaded");
        } else {
            tracing::info!(generation, failures = report.failures().len(), "Dashboard partially reloaded");
        }

        report
    }

    /// Settle a fetch result: failures are logged, stale results are dropped
    fn accept<T>(&self, view: &'static str, generation: u64, result: ApiResult<T>) -> Result<T, ViewOutcome> {
        match result {
            Ok(_) if self.reload_count() != generation => {
                tracing::warn!(view, generation, "Discarding superseded result");
                Err(ViewOutcome::Superseded)
            }
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(view, generation, error = %e, "Error loading view");
                Err(ViewOutcome::Failed(e.to_string()))
            }
        }
    }

    async fn load_table(&self, generation: u64, query: &FilterQuery) -> ViewOutcome {
        let result = self.api.employees(query).await;
        let rows = match self.accept("table", generation, result) {
            Ok(rows) => rows,
            Err(outcome) => return outcome,
        };

        tracing::debug!(generation, rows = rows.len(), "Rendering table");
        self.view.render_table(&EmployeeTable::new(rows, self.page_size));
        ViewOutcome::Rendered
    }

    async fn load_stats(&self, generation: u64, query: &FilterQuery) -> ViewOutcome {
        let result = self.api.stats(query).await;
        let stats = match self.accept("stats", generation, result) {
            Ok(stats) => stats,
            Err(outcome) => return outcome,
        };

        self.view.render_stats(&StatCards::from_summary(&stats));
        ViewOutcome::Rendered
    }

    async fn load_department_chart(&self, generation: u64, query: &FilterQuery) -> ViewOutcome {
        let result = self.api.departments(query.year).await;
        let departments = match self.accept("department chart", generation, result) {
            Ok(departments) => departments,
            Err(outcome) => return outcome,
        };

        let chart = DepartmentChart::build(
            &departments,
            query.department.as_deref(),
            &self.chart_options,
        );
        *self.department_chart.write().await = chart.clone();
        self.view.render_department_chart(&chart);
        ViewOutcome::Rendered
    }

    async fn load_earnings_chart(&self, generation: u64, query: &FilterQuery) -> ViewOutcome {
        let result = self.api.earnings_breakdown(query).await;
        let breakdown = match self.accept("earnings chart", generation, result) {
            Ok(breakdown) => breakdown,
            Err(outcome) => return outcome,
        };

        let chart = EarningsChart::build(&breakdown, query.earnings_type);
        *self.earnings_chart.write().await = chart.clone();
        self.view.render_earnings_chart(&chart);
        ViewOutcome::Rendered
    }

    /// Refresh the department dropdown for `year`, sorted by name
    ///
    /// Returns false when the fetch fails or a later call has started, in
    /// which case the dropdown is left to that call.
    pub async fn load_department_options(&self, year: i32) -> bool {
        let generation = self.options_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.api.departments(year).await;

        if self.options_generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(year, generation, "Discarding stale department options");
            return false;
        }

        match result {
            Ok(departments) => {
                let mut names: Vec<String> = departments.into_iter().map(|d| d.name).collect();
                names.sort_by_key(|name| name.to_lowercase());
                self.view.set_department_options(&names);
                true
            }
            Err(e) => {
                tracing::error!(year, error = %e, "Error loading departments");
                false
            }
        }
    }

    /// Fill the year dropdown, keeping `selected`
    pub async fn load_year_options(&self, selected: i32) -> bool {
        match self.api.years().await {
            Ok(years) => {
                self.view.set_year_options(&years.years, selected);
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Error loading years");
                false
            }
        }
    }

    /// Full department name behind the rendered bar at `index`
    pub async fn department_at(&self, index: usize) -> Option<String> {
        self.department_chart
            .read()
            .await
            .full_name_at(index)
            .map(str::to_string)
    }

    /// Earnings type behind the rendered bar at `index`
    pub async fn earnings_type_at(&self, index: usize) -> Option<EarningsType> {
        self.earnings_chart.read().await.type_at(index)
    }

    pub async fn department_chart(&self) -> DepartmentChart {
        self.department_chart.read().await.clone()
    }

    pub async fn earnings_chart(&self) -> EarningsChart {
        self.earnings_chart.read().await.clone()
    }
}
