//! Payroll API
//!
//! Client side of the payroll backend's REST API.
//!
//! # Endpoints
//!
//! - `GET /api/departments?year=Y` - Department aggregates
//! - `GET /api/employees?year=Y&limit=N&department=D&earnings_type=T` - Employee rows
//! - `GET /api/stats?year=Y&department=D` - Summary statistics
//! - `GET /api/earnings-breakdown?year=Y&department=D` - Earnings composition
//! - `GET /api/years` - Years with data
//! - `GET /api/health` - Backend health
//! - `GET /api/export?year=Y&department=D&earnings_type=T` - CSV download
//!
//! The dashboard only talks to [`PayrollApi`], so tests can swap the HTTP
//! client for an in-memory fake.

mod client;
mod error;
mod query;
mod types;

pub use client::{ClientConfig, PayrollClient};
pub use error::{ApiError, ApiResult};
pub use query::FilterQuery;
pub use types::{
    DepartmentSummary, EarningsAmounts, EarningsBreakdown, EarningsType, EmployeeRow, ExportFile,
    HealthResponse, StatsSummary, YearsResponse,
};

use async_trait::async_trait;

/// Read-only access to the payroll backend
#[async_trait]
pub trait PayrollApi: Send + Sync {
    /// Department aggregates for a year, ordered as the backend returns them
    async fn departments(&self, year: i32) -> ApiResult<Vec<DepartmentSummary>>;

    /// Employee rows matching the filter
    async fn employees(&self, query: &FilterQuery) -> ApiResult<Vec<EmployeeRow>>;

    /// Summary statistics for the year and department
    async fn stats(&self, query: &FilterQuery) -> ApiResult<StatsSummary>;

    /// Earnings composition for the year and department
    async fn earnings_breakdown(&self, query: &FilterQuery) -> ApiResult<EarningsBreakdown>;

    /// Years with data
    async fn years(&self) -> ApiResult<YearsResponse>;

    /// Backend health
    async fn health(&self) -> ApiResult<HealthResponse>;

    /// Download the CSV export for the filter
    async fn export(&self, query: &FilterQuery) -> ApiResult<ExportFile>;

    /// URL the export is served from
    fn export_url(&self, query: &FilterQuery) -> String;
}
