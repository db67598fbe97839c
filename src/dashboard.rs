//! Dashboard
//!
//! Event handlers for every control on the dashboard. Handlers update the
//! [`FilterState`], then either reload all views, do nothing, or schedule the
//! debounced quick filter.
//!
//! Chart clicks toggle the matching filter, push the new value into the
//! dropdown, and reload exactly once. The dropdown's echo of that push
//! arrives as an [`UpdateSource::Programmatic`] change and does not reload
//! again.

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::api::{ApiResult, EarningsType, PayrollApi};
use crate::config::DashboardConfig;
use crate::debounce::Debouncer;
use crate::filter::{FilterChange, FilterEffect, FilterState, UpdateSource};
use crate::sync::{ReloadReport, ViewSynchronizer};
use crate::views::ViewAdapter;

pub const EXPORT_ERROR_MESSAGE: &str = "Error exporting data";

pub struct Dashboard {
    state: Arc<RwLock<FilterState>>,
    sync: ViewSynchronizer,
    api: Arc<dyn PayrollApi>,
    view: Arc<dyn ViewAdapter>,
    search: Debouncer,
}

impl Dashboard {
    pub fn new(
        api: Arc<dyn PayrollApi>,
        view: Arc<dyn ViewAdapter>,
        config: &DashboardConfig,
    ) -> Self {
        let sync = ViewSynchronizer::new(
            api.clone(),
            view.clone(),
            config.chart_options(),
            config.page_size,
        );

        Self {
            state: Arc::new(RwLock::new(FilterState::new(config.default_year))),
            sync,
            api,
            view,
            search: Debouncer::new(config.search_debounce()),
        }
    }

    /// Snapshot of the current filter
    pub async fn filter(&self) -> FilterState {
        self.state.read().await.clone()
    }

    pub fn reload_count(&self) -> u64 {
        self.sync.reload_count()
    }

    /// Populate both dropdowns, then load every view
    pub async fn init(&self) -> ReloadReport {
        let year = self.state.read().await.year;
        tokio::join!(
            self.sync.load_year_options(year),
            self.sync.load_department_options(year),
        );
        self.reload().await
    }

    /// Reload every view for the current filter
    pub async fn reload(&self) -> ReloadReport {
        let filter = self.filter().await;
        self.sync.reload(&filter).await
    }

    /// Apply a filter change and carry out its effect. Returns the reload
    /// report when the change triggered one.
    pub async fn apply(&self, change: FilterChange, source: UpdateSource) -> Option<ReloadReport> {
        let new_year = match change {
            FilterChange::Year(year) => Some(year),
            _ => None,
        };

        let effect = self.state.write().await.apply(change, source);
        match effect {
            FilterEffect::None => {
                tracing::debug!(?source, "Filter updated without reload");
                None
            }
            FilterEffect::Reload => match new_year {
                Some(year) => {
                    let (_, report) =
                        tokio::join!(self.sync.load_department_options(year), self.reload());
                    Some(report)
                }
                None => Some(self.reload().await),
            },
            FilterEffect::QuickFilter(text) => {
                self.schedule_quick_filter(text);
                None
            }
        }
    }

    pub async fn on_year_change(&self, year: i32) -> Option<ReloadReport> {
        self.apply(FilterChange::Year(year), UpdateSource::User).await
    }

    pub async fn on_department_select(
        &self,
        department: Option<String>,
        source: UpdateSource,
    ) -> Option<ReloadReport> {
        self.apply(FilterChange::Department(department), source)
            .await
    }

    pub async fn on_earnings_type_select(
        &self,
        earnings_type: Option<EarningsType>,
        source: UpdateSource,
    ) -> Option<ReloadReport> {
        self.apply(FilterChange::EarningsType(earnings_type), source)
            .await
    }

    /// Keystroke in the search box
    pub async fn on_search_input(&self, text: &str) {
        self.apply(FilterChange::Search(text.to_string()), UpdateSource::User)
            .await;
    }

    fn schedule_quick_filter(&self, text: String) {
        let state = self.state.clone();
        let view = self.view.clone();
        self.search.call(async move {
            state.write().await.set_search_text(&text);
            tracing::debug!(search = %text, "Applying quick filter");
            view.apply_quick_filter(&text);
        });
    }

    /// Click on the department bar at `index`
    pub async fn on_department_bar_click(&self, index: usize) -> Option<ReloadReport> {
        let Some(name) = self.sync.department_at(index).await else {
            tracing::debug!(index, "Department click outside rendered bars");
            return None;
        };

        let selected = self.state.write().await.toggle_department(&name);
        tracing::info!(clicked = %name, department = ?selected, "Department chart click");

        self.view.sync_department_control(selected.as_deref());
        Some(self.reload().await)
    }

    /// Click on the earnings bar at `index`
    pub async fn on_earnings_bar_click(&self, index: usize) -> Option<ReloadReport> {
        let Some(earnings_type) = self.sync.earnings_type_at(index).await else {
            tracing::debug!(index, "Earnings click outside rendered bars");
            return None;
        };

        let selected = self.state.write().await.toggle_earnings_type(earnings_type);
        tracing::info!(clicked = %earnings_type, earnings_type = ?selected, "Earnings chart click");

        self.view.sync_earnings_type_control(selected);
        Some(self.reload().await)
    }

    /// Download the CSV for the current year, department, and earnings type.
    /// Failures are reported to the user with an alert.
    pub async fn export(&self) -> ApiResult<()> {
        let query = self.filter().await.query();
        match self.api.export(&query).await {
            Ok(file) => {
                tracing::info!(filename = %file.filename, "Export downloaded");
                self.view.deliver_export(&file);
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Error exporting data");
                self.view.alert(EXPORT_ERROR_MESSAGE);
                Err(e)
            }
        }
    }

    pub async fn export_url(&self) -> String {
        let query = self.filter().await.query();
        self.api.export_url(&query)
    }
}
