//! Payroll REST API Client
//!
//! HTTP client for the payroll backend's read-only endpoints.

use async_trait::async_trait;
use reqwest::{header, Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::error::{ApiError, ApiResult};
use super::query::{FilterQuery, QueryString};
use super::types::*;
use super::PayrollApi;

/// Configuration for the payroll client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend (e.g., "http://localhost:8001")
    pub base_url: String,
    /// Row limit sent with every employee request
    pub employee_limit: u32,
    /// Optional per-request timeout; unset means wait indefinitely
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8001".to_string(),
            employee_limit: 5000,
            request_timeout: None,
        }
    }
}

/// reqwest-backed implementation of [`PayrollApi`]
pub struct PayrollClient {
    client: Client,
    config: ClientConfig,
}

impl PayrollClient {
    /// Create a new client with the given configuration
    pub fn new(mut config: ClientConfig) -> ApiResult<Self> {
        config.base_url = config.base_url.trim_end_matches('/').to_string();

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ApiError::Request)?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str, query: Option<QueryString>) -> String {
        match query {
            Some(qs) => format!("{}/api/{}?{}", self.config.base_url, path, qs.encode()),
            None => format!("{}/api/{}", self.config.base_url, path),
        }
    }

    pub fn departments_url(&self, year: i32) -> String {
        self.url("departments", Some(QueryString::year(year)))
    }

    pub fn employees_url(&self, query: &FilterQuery) -> String {
        let qs = QueryString::year(query.year)
            .push("limit", self.config.employee_limit)
            .push_opt("department", query.department.as_deref())
            .push_opt("earnings_type", query.earnings_type.map(|t| t.as_str()));
        self.url("employees", Some(qs))
    }

    pub fn stats_url(&self, query: &FilterQuery) -> String {
        let qs = QueryString::year(query.year).push_opt("department", query.department.as_deref());
        self.url("stats", Some(qs))
    }

    pub fn earnings_breakdown_url(&self, query: &FilterQuery) -> String {
        let qs = QueryString::year(query.year).push_opt("department", query.department.as_deref());
        self.url("earnings-breakdown", Some(qs))
    }

    /// GET a URL and decode its JSON body
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        tracing::debug!(url = %url, "GET");

        let response = self.send(url).await?;
        let bytes = response.bytes().await?;

        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// GET a URL, turning non-success statuses into [`ApiError::Status`]
    async fn send(&self, url: &str) -> ApiResult<Response> {
        let response = self.client.get(url).send().await?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.detail)
            .unwrap_or(text);

        Err(ApiError::Status { status, message })
    }
}

/// Extract `filename=` from a Content-Disposition value
fn attachment_filename(disposition: &str) -> Option<String> {
    disposition
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}

#[async_trait]
impl PayrollApi for PayrollClient {
    async fn departments(&self, year: i32) -> ApiResult<Vec<DepartmentSummary>> {
        let response: DepartmentsResponse = self.get_json(&self.departments_url(year)).await?;
        tracing::debug!(
            requested = year,
            year = ?response.year,
            count = response.departments.len(),
            "Departments"
        );
        Ok(response.departments)
    }

    async fn employees(&self, query: &FilterQuery) -> ApiResult<Vec<EmployeeRow>> {
        let response: EmployeeListResponse = self.get_json(&self.employees_url(query)).await?;
        if let Some(total) = response.total {
            tracing::debug!(total, returned = response.data.len(), "Employee rows");
        }
        Ok(response.data)
    }

    async fn stats(&self, query: &FilterQuery) -> ApiResult<StatsSummary> {
        self.get_json(&self.stats_url(query)).await
    }

    async fn earnings_breakdown(&self, query: &FilterQuery) -> ApiResult<EarningsBreakdown> {
        self.get_json(&self.earnings_breakdown_url(query)).await
    }

    async fn years(&self) -> ApiResult<YearsResponse> {
        self.get_json(&self.url("years", None)).await
    }

    async fn health(&self) -> ApiResult<HealthResponse> {
        self.get_json(&self.url("health", None)).await
    }

    async fn export(&self, query: &FilterQuery) -> ApiResult<ExportFile> {
        let url = self.export_url(query);
        tracing::debug!(url = %url, "GET export");

        let response = self.send(&url).await?;
        let filename = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(attachment_filename)
            .unwrap_or_else(|| format!("payroll_{}.csv", query.year));
        let body = response.text().await?;

        Ok(ExportFile { filename, body })
    }

    fn export_url(&self, query: &FilterQuery) -> String {
        self.url("export", Some(query.export_query()))
    }
}
