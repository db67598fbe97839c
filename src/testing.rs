//! In-memory API and view doubles for dashboard tests

use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::api::{
    ApiError, ApiResult, DepartmentSummary, EarningsAmounts, EarningsBreakdown, EarningsType,
    EmployeeRow, ExportFile, FilterQuery, HealthResponse, PayrollApi, StatsSummary, YearsResponse,
};
use crate::views::{DepartmentChart, EarningsChart, EmployeeTable, StatCards, ViewAdapter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Departments,
    Employees,
    Stats,
    EarningsBreakdown,
    Years,
    Health,
    Export,
}

/// Serves fixed data and records every request
#[derive(Default)]
pub struct FakeApi {
    pub departments: Vec<DepartmentSummary>,
    pub employees: Vec<EmployeeRow>,
    pub stats: StatsSummary,
    pub breakdown: EarningsBreakdown,
    pub years: Vec<i32>,
    failing: Mutex<HashSet<Endpoint>>,
    delays: Mutex<HashMap<Endpoint, VecDeque<Duration>>>,
    calls: Mutex<Vec<(Endpoint, Option<FilterQuery>)>>,
}

impl FakeApi {
    pub fn failing(self, endpoint: Endpoint) -> Self {
        self.set_failing(endpoint, true);
        self
    }

    pub fn set_failing(&self, endpoint: Endpoint, failing: bool) {
        let mut set = self.failing.lock().unwrap();
        if failing {
            set.insert(endpoint);
        } else {
            set.remove(&endpoint);
        }
    }

    /// Delay the next request to `endpoint`
    pub fn delay_next(&self, endpoint: Endpoint, delay: Duration) {
        self.delays
            .lock()
            .unwrap()
            .entry(endpoint)
            .or_default()
            .push_back(delay);
    }

    pub fn calls(&self) -> Vec<(Endpoint, Option<FilterQuery>)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, endpoint: Endpoint) -> usize {
        self.calls().iter().filter(|(e, _)| *e == endpoint).count()
    }

    pub fn last_query(&self, endpoint: Endpoint) -> Option<FilterQuery> {
        self.calls()
            .into_iter()
            .rev()
            .find(|(e, _)| *e == endpoint)
            .and_then(|(_, q)| q)
    }

    async fn enter(&self, endpoint: Endpoint, query: Option<FilterQuery>) -> ApiResult<()> {
        self.calls.lock().unwrap().push((endpoint, query));

        let delay = self
            .delays
            .lock()
            .unwrap()
            .get_mut(&endpoint)
            .and_then(|d| d.pop_front());
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.lock().unwrap().contains(&endpoint) {
            return Err(ApiError::Status {
                status: 500,
                message: "Database error".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PayrollApi for FakeApi {
    async fn departments(&self, year: i32) -> ApiResult<Vec<DepartmentSummary>> {
        self.enter(Endpoint::Departments, Some(FilterQuery::for_year(year)))
            .await?;
        Ok(self.departments.clone())
    }

    async fn employees(&self, query: &FilterQuery) -> ApiResult<Vec<EmployeeRow>> {
        self.enter(Endpoint::Employees, Some(query.clone())).await?;
        Ok(self.employees.clone())
    }

    async fn stats(&self, query: &FilterQuery) -> ApiResult<StatsSummary> {
        self.enter(Endpoint::Stats, Some(query.clone())).await?;
        Ok(self.stats.clone())
    }

    async fn earnings_breakdown(&self, query: &FilterQuery) -> ApiResult<EarningsBreakdown> {
        self.enter(Endpoint::EarningsBreakdown, Some(query.clone()))
            .await?;
        Ok(self.breakdown.clone())
    }

    async fn years(&self) -> ApiResult<YearsResponse> {
        self.enter(Endpoint::Years, None).await?;
        Ok(YearsResponse {
            years: self.years.clone(),
            default: self.years.first().copied().unwrap_or(2024),
        })
    }

    async fn health(&self) -> ApiResult<HealthResponse> {
        self.enter(Endpoint::Health, None).await?;
        Ok(HealthResponse {
            status: "healthy".to_string(),
            database: Some("connected".to_string()),
            total_records: self.employees.len() as u64,
            years_available: self.years.clone(),
        })
    }

    async fn export(&self, query: &FilterQuery) -> ApiResult<ExportFile> {
        self.enter(Endpoint::Export, Some(query.clone())).await?;
        let mut body = String::from("Name,Department,Total Gross\n");
        for row in &self.employees {
            body.push_str(&format!(
                "{},{},{}\n",
                row.name,
                row.department.as_deref().unwrap_or_default(),
                row.total_gross
            ));
        }
        Ok(ExportFile {
            filename: format!("boston_payroll_{}.csv", query.year),
            body,
        })
    }

    fn export_url(&self, query: &FilterQuery) -> String {
        format!("http://payroll.test/api/export?{}", query.export_query().encode())
    }
}

fn department(name: &str, total: f64, employees: u64) -> DepartmentSummary {
    DepartmentSummary {
        name: name.to_string(),
        total_earnings: total,
        employee_count: employees,
        avg_earnings: total / employees as f64,
        avg_overtime: 12_500.0,
        total_overtime: None,
        total_detail: None,
    }
}

fn employee(name: &str, department: &str, title: &str, total: f64) -> EmployeeRow {
    EmployeeRow {
        name: name.to_string(),
        department: Some(department.to_string()),
        title: Some(title.to_string()),
        total_gross: total,
        regular: total * 0.8,
        overtime: total * 0.2,
        detail: 0.0,
        other: 0.0,
        retro: None,
        injured: None,
        quinn_education: None,
    }
}

/// Twelve departments, a handful of employees, and one year of stats
pub fn sample_api() -> FakeApi {
    let departments = vec![
        department("Boston Police Department", 470_000_000.0, 3100),
        department("Boston Fire Department", 260_000_000.0, 1600),
        department("BPS Special Education", 150_000_000.0, 2200),
        department("Public Works Department", 70_000_000.0, 800),
        department("Boston Public Library", 40_000_000.0, 550),
        department("Boston Centers for Youth & Families", 38_000_000.0, 900),
        department("Inspectional Services", 30_000_000.0, 320),
        department("Parks & Recreation", 28_000_000.0, 410),
        department("Transportation", 26_000_000.0, 390),
        department("assessing department", 12_000_000.0, 140),
        department("Elections Department", 6_000_000.0, 60),
        department("Law Department", 9_000_000.0, 85),
    ];

    let employees = vec![
        employee("Smith,John A", "Boston Police Department", "Police Officer", 182_000.0),
        employee("Smith,Maria", "Boston Public Library", "Librarian", 74_000.0),
        employee("Nguyen,Thanh", "Boston Fire Department", "Fire Fighter", 141_000.0),
        employee("O'Brien,Kate", "Parks & Recreation", "Maint Mech", 66_500.0),
    ];

    let stats = StatsSummary {
        year: Some(2024),
        total_employees: 22451,
        total_payroll: 2_234_567_890.0,
        avg_salary: 99_530.12,
        median_salary: 88_000.0,
        total_overtime: 312_000_000.0,
        total_detail: 45_000_000.0,
        top_department: Some("Boston Police Department".to_string()),
        top_department_total: 470_000_000.0,
        prior_year_employees: Some(22100),
        prior_year_payroll: Some(2_100_000_000.0),
        prior_year_avg_salary: None,
        prior_year_overtime: None,
    };

    let breakdown = EarningsBreakdown {
        year: Some(2024),
        percentages: EarningsAmounts {
            regular: 72.4,
            overtime: 14.1,
            detail: 4.2,
            retro: 1.8,
            other: 6.3,
            injured: 0.9,
            quinn_education: 0.3,
        },
        totals: EarningsAmounts {
            regular: 1_620_000_000.0,
            overtime: 315_000_000.0,
            detail: 94_000_000.0,
            retro: 40_000_000.0,
            other: 141_000_000.0,
            injured: 20_000_000.0,
            quinn_education: 6_700_000.0,
        },
    };

    FakeApi {
        departments,
        employees,
        stats,
        breakdown,
        years: vec![2024, 2023, 2022],
        ..FakeApi::default()
    }
}

/// One call made on a [`RecordingView`]
#[derive(Debug, Clone, PartialEq)]
pub enum ViewCall {
    Table(usize),
    Stats,
    DepartmentChart(usize),
    EarningsChart(usize),
    YearOptions(Vec<i32>, i32),
    DepartmentOptions(Vec<String>),
    DepartmentControl(Option<String>),
    EarningsTypeControl(Option<EarningsType>),
    QuickFilter(String),
    Export(String),
    Alert(String),
}

/// Change event a dropdown emits after the dashboard set its value
#[derive(Debug, Clone, PartialEq)]
pub enum ControlEcho {
    Department(Option<String>),
    EarningsType(Option<EarningsType>),
}

/// Records every adapter call. With [`RecordingView::with_echo`], control
/// syncs are echoed back the way a browser dropdown fires `change`.
#[derive(Default)]
pub struct RecordingView {
    calls: Mutex<Vec<ViewCall>>,
    echo: Option<mpsc::UnboundedSender<ControlEcho>>,
}

impl RecordingView {
    pub fn with_echo() -> (Self, mpsc::UnboundedReceiver<ControlEcho>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let view = Self {
            calls: Mutex::default(),
            echo: Some(tx),
        };
        (view, rx)
    }

    fn record(&self, call: ViewCall) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<ViewCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count<F: Fn(&ViewCall) -> bool>(&self, predicate: F) -> usize {
        self.calls().iter().filter(|c| predicate(c)).count()
    }

    /// Options from the last `set_department_options`
    pub fn department_options(&self) -> Option<Vec<String>> {
        self.calls().into_iter().rev().find_map(|c| match c {
            ViewCall::DepartmentOptions(names) => Some(names),
            _ => None,
        })
    }

    pub fn quick_filters(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ViewCall::QuickFilter(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ViewCall::Alert(message) => Some(message),
                _ => None,
            })
            .collect()
    }
}

impl ViewAdapter for RecordingView {
    fn render_table(&self, table: &EmployeeTable) {
        self.record(ViewCall::Table(table.rows.len()));
    }

    fn render_stats(&self, _stats: &StatCards) {
        self.record(ViewCall::Stats);
    }

    fn render_department_chart(&self, chart: &DepartmentChart) {
        self.record(ViewCall::DepartmentChart(chart.bars.len()));
    }

    fn render_earnings_chart(&self, chart: &EarningsChart) {
        self.record(ViewCall::EarningsChart(chart.bars.len()));
    }

    fn set_year_options(&self, years: &[i32], selected: i32) {
        self.record(ViewCall::YearOptions(years.to_vec(), selected));
    }

    fn set_department_options(&self, names: &[String]) {
        self.record(ViewCall::DepartmentOptions(names.to_vec()));
    }

    fn sync_department_control(&self, department: Option<&str>) {
        let department = department.map(str::to_string);
        self.record(ViewCall::DepartmentControl(department.clone()));
        if let Some(echo) = &self.echo {
            let _ = echo.send(ControlEcho::Department(department));
        }
    }

    fn sync_earnings_type_control(&self, earnings_type: Option<EarningsType>) {
        self.record(ViewCall::EarningsTypeControl(earnings_type));
        if let Some(echo) = &self.echo {
            let _ = echo.send(ControlEcho::EarningsType(earnings_type));
        }
    }

    fn apply_quick_filter(&self, text: &str) {
        self.record(ViewCall::QuickFilter(text.to_string()));
    }

    fn deliver_export(&self, file: &ExportFile) {
        self.record(ViewCall::Export(file.filename.clone()));
    }

    fn alert(&self, message: &str) {
        self.record(ViewCall::Alert(message.to_string()));
    }
}
