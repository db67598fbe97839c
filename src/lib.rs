//! # payroll-dash
//!
//! Cross-filtering dashboard over a city payroll API. A year, department, and
//! earnings-type filter scope four views (employee table, summary stats,
//! department chart, earnings composition chart) that reload together
//! whenever the filter changes.
//!
//! ## Features
//!
//! - **Cross-filtering**: clicking a chart bar toggles the matching filter
//! - **Concurrent loads**: the four views fetch in parallel and render independently
//! - **Debounced search**: quick-filters the loaded rows without refetching
//! - **CSV export**: downloads the rows for the current filter
//!
//! ## Modules
//!
//! - [`api`]: REST client for the payroll backend
//! - [`filter`]: Filter state and change effects
//! - [`sync`]: Concurrent view reloads
//! - [`dashboard`]: Event handlers tying it together
//! - [`views`]: View models and the [`ViewAdapter`] trait
//! - [`terminal`]: Terminal rendering surface
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use payroll_dash::{Config, Dashboard, PayrollClient, TerminalView};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let api = Arc::new(PayrollClient::new(config.api.client_config())?);
//!     let view = Arc::new(TerminalView::new(std::env::current_dir()?));
//!
//!     let dashboard = Dashboard::new(api, view, &config.dashboard);
//!     dashboard.init().await;
//!
//!     // Same effect as clicking the first department bar
//!     dashboard.on_department_bar_click(0).await;
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod dashboard;
pub mod debounce;
pub mod filter;
pub mod format;
pub mod sync;
pub mod terminal;
pub mod views;

#[cfg(test)]
mod testing;

// Re-export top-level types for convenience
pub use api::{
    ApiError, ApiResult, ClientConfig, DepartmentSummary, EarningsBreakdown, EarningsType,
    EmployeeRow, ExportFile, FilterQuery, PayrollApi, PayrollClient, StatsSummary,
};

pub use config::{Config, ConfigError};

pub use dashboard::Dashboard;

pub use filter::{FilterChange, FilterEffect, FilterState, UpdateSource};

pub use sync::{ReloadReport, ViewOutcome, ViewSynchronizer};

pub use terminal::{Command, TerminalView};

pub use views::{DepartmentChart, EarningsChart, EmployeeTable, StatCards, ViewAdapter};
