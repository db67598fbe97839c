//! Response Types
//!
//! Snapshots returned by the payroll backend. Every type here is replaced
//! wholesale on each load and never patched in place.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

// ============ Lenient Amounts ============

/// Monetary values arrive either as JSON numbers or as decimal strings
#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
}

impl RawAmount {
    fn into_f64<E: serde::de::Error>(self) -> Result<f64, E> {
        match self {
            RawAmount::Number(n) => Ok(n),
            RawAmount::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|e| E::custom(format!("invalid amount {:?}: {}", s, e))),
        }
    }
}

/// Required amount; `null` reads as zero
fn amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawAmount>::deserialize(deserializer)? {
        Some(raw) => raw.into_f64(),
        None => Ok(0.0),
    }
}

/// Optional amount; `null` reads as absent
fn optional_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<RawAmount>::deserialize(deserializer)?
        .map(RawAmount::into_f64)
        .transpose()
}

// ============ Earnings Types ============

/// The seven earnings categories, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EarningsType {
    Regular,
    Overtime,
    Detail,
    Retro,
    Other,
    Injured,
    QuinnEducation,
}

impl EarningsType {
    /// Fixed chart order
    pub const ALL: [EarningsType; 7] = [
        EarningsType::Regular,
        EarningsType::Overtime,
        EarningsType::Detail,
        EarningsType::Retro,
        EarningsType::Other,
        EarningsType::Injured,
        EarningsType::QuinnEducation,
    ];

    /// Query-parameter and JSON key form
    pub fn as_str(self) -> &'static str {
        match self {
            EarningsType::Regular => "regular",
            EarningsType::Overtime => "overtime",
            EarningsType::Detail => "detail",
            EarningsType::Retro => "retro",
            EarningsType::Other => "other",
            EarningsType::Injured => "injured",
            EarningsType::QuinnEducation => "quinn_education",
        }
    }

    /// Short chart label
    pub fn label(self) -> &'static str {
        match self {
            EarningsType::Regular => "Regular",
            EarningsType::Overtime => "Overtime",
            EarningsType::Detail => "Detail",
            EarningsType::Retro => "Retro",
            EarningsType::Other => "Other",
            EarningsType::Injured => "Injured",
            EarningsType::QuinnEducation => "Quinn Ed",
        }
    }
}

impl fmt::Display for EarningsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EarningsType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        EarningsType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized || t.label().to_lowercase() == s.trim().to_lowercase())
            .ok_or_else(|| {
                format!(
                    "Unknown earnings type: {}. Use one of: regular, overtime, detail, retro, other, injured, quinn_education",
                    s
                )
            })
    }
}

/// One amount per earnings category. Missing keys read as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EarningsAmounts {
    #[serde(default, deserialize_with = "amount")]
    pub regular: f64,
    #[serde(default, deserialize_with = "amount")]
    pub overtime: f64,
    #[serde(default, deserialize_with = "amount")]
    pub detail: f64,
    #[serde(default, deserialize_with = "amount")]
    pub retro: f64,
    #[serde(default, deserialize_with = "amount")]
    pub other: f64,
    #[serde(default, deserialize_with = "amount")]
    pub injured: f64,
    #[serde(default, deserialize_with = "amount")]
    pub quinn_education: f64,
}

impl EarningsAmounts {
    pub fn get(&self, earnings_type: EarningsType) -> f64 {
        match earnings_type {
            EarningsType::Regular => self.regular,
            EarningsType::Overtime => self.overtime,
            EarningsType::Detail => self.detail,
            EarningsType::Retro => self.retro,
            EarningsType::Other => self.other,
            EarningsType::Injured => self.injured,
            EarningsType::QuinnEducation => self.quinn_education,
        }
    }
}

// ============ Snapshots ============

/// One employee's earnings for the selected year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRow {
    pub name: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "amount")]
    pub total_gross: f64,
    #[serde(default, deserialize_with = "amount")]
    pub regular: f64,
    #[serde(default, deserialize_with = "amount")]
    pub overtime: f64,
    #[serde(default, deserialize_with = "amount")]
    pub detail: f64,
    #[serde(default, deserialize_with = "amount")]
    pub other: f64,
    #[serde(default, deserialize_with = "optional_amount")]
    pub retro: Option<f64>,
    #[serde(default, deserialize_with = "optional_amount")]
    pub injured: Option<f64>,
    #[serde(default, deserialize_with = "optional_amount")]
    pub quinn_education: Option<f64>,
}

/// Aggregate earnings for one department
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentSummary {
    pub name: String,
    #[serde(default, deserialize_with = "amount")]
    pub total_earnings: f64,
    #[serde(default)]
    pub employee_count: u64,
    #[serde(default, deserialize_with = "amount")]
    pub avg_earnings: f64,
    #[serde(default, deserialize_with = "amount")]
    pub avg_overtime: f64,
    #[serde(default, deserialize_with = "optional_amount")]
    pub total_overtime: Option<f64>,
    #[serde(default, deserialize_with = "optional_amount")]
    pub total_detail: Option<f64>,
}

/// Summary statistics with optional prior-year comparison values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub total_employees: u64,
    #[serde(default, deserialize_with = "amount")]
    pub total_payroll: f64,
    #[serde(default, deserialize_with = "amount")]
    pub avg_salary: f64,
    #[serde(default, deserialize_with = "amount")]
    pub median_salary: f64,
    #[serde(default, deserialize_with = "amount")]
    pub total_overtime: f64,
    #[serde(default, deserialize_with = "amount")]
    pub total_detail: f64,
    #[serde(default)]
    pub top_department: Option<String>,
    #[serde(default, deserialize_with = "amount")]
    pub top_department_total: f64,
    #[serde(default)]
    pub prior_year_employees: Option<u64>,
    #[serde(default, deserialize_with = "optional_amount")]
    pub prior_year_payroll: Option<f64>,
    #[serde(default, deserialize_with = "optional_amount")]
    pub prior_year_avg_salary: Option<f64>,
    #[serde(default, deserialize_with = "optional_amount")]
    pub prior_year_overtime: Option<f64>,
}

/// Earnings composition for one (year, department) scope
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EarningsBreakdown {
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub percentages: EarningsAmounts,
    #[serde(default, alias = "breakdown")]
    pub totals: EarningsAmounts,
}

// ============ Envelopes ============

#[derive(Debug, Deserialize)]
pub struct DepartmentsResponse {
    pub departments: Vec<DepartmentSummary>,
    #[serde(default)]
    pub year: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct EmployeeListResponse {
    pub data: Vec<EmployeeRow>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// Years with data, newest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearsResponse {
    pub years: Vec<i32>,
    pub default: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub total_records: u64,
    #[serde(default)]
    pub years_available: Vec<i32>,
}

/// Error body emitted by the backend on non-success statuses
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// A downloaded CSV export
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub filename: String,
    pub body: String,
}

impl ExportFile {
    /// Number of data rows, excluding the header
    pub fn row_count(&self) -> Result<usize, csv::Error> {
        let mut reader = csv::Reader::from_reader(self.body.as_bytes());
        let mut count = 0;
        for record in reader.records() {
            record?;
            count += 1;
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_employee_row_accepts_decimal_strings() {
        let json = r#"{
            "id": 17, "year": 2024, "name": "DOE,JANE",
            "department": "Boston Police Department", "title": "Police Officer",
            "regular": "98000.00", "retro": "0.00", "other": "1200.50",
            "overtime": 45000.25, "injured": null, "detail": "12000",
            "quinn_education": "0", "total_gross": "156200.75", "zip_code": "02124"
        }"#;

        let row: EmployeeRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.name, "DOE,JANE");
        assert_eq!(row.regular, 98000.0);
        assert_eq!(row.overtime, 45000.25);
        assert_eq!(row.total_gross, 156200.75);
        assert_eq!(row.retro, Some(0.0));
        assert_eq!(row.injured, None);
    }

    #[test]
    fn test_employee_row_without_optional_columns() {
        let json = r#"{"name": "SMITH,JOHN", "department": null, "title": null,
            "total_gross": 50000, "regular": 50000, "overtime": 0, "detail": 0, "other": 0}"#;

        let row: EmployeeRow = serde_json::from_str(json).unwrap();
        assert!(row.department.is_none());
        assert!(row.quinn_education.is_none());
    }

    #[test]
    fn test_invalid_amount_is_rejected() {
        let json = r#"{"name": "X", "total_gross": "lots"}"#;
        assert!(serde_json::from_str::<EmployeeRow>(json).is_err());
    }

    #[test]
    fn test_breakdown_accepts_either_totals_key() {
        let with_breakdown = r#"{"year": 2024,
            "breakdown": {"regular": "100", "overtime": "50"},
            "percentages": {"regular": 66.7, "overtime": 33.3}}"#;
        let b: EarningsBreakdown = serde_json::from_str(with_breakdown).unwrap();
        assert_eq!(b.totals.regular, 100.0);
        assert_eq!(b.totals.get(EarningsType::Overtime), 50.0);
        assert_eq!(b.totals.detail, 0.0);

        let with_totals = r#"{"totals": {"injured": 7}, "percentages": {}}"#;
        let b: EarningsBreakdown = serde_json::from_str(with_totals).unwrap();
        assert_eq!(b.totals.injured, 7.0);
        assert_eq!(b.percentages.get(EarningsType::Regular), 0.0);
    }

    #[test]
    fn test_stats_prior_year_nulls() {
        let json = r#"{"year": 2020, "total_employees": 21000, "total_payroll": "1900000000.00",
            "avg_salary": "90476.19", "median_salary": "80000", "total_overtime": "200000000",
            "total_detail": "50000000", "top_department": "Boston Police Department",
            "top_department_total": "400000000", "prior_year_employees": null,
            "prior_year_payroll": null, "prior_year_avg_salary": null, "prior_year_overtime": null}"#;

        let stats: StatsSummary = serde_json::from_str(json).unwrap();
        assert_eq!(stats.total_employees, 21000);
        assert_eq!(stats.total_payroll, 1_900_000_000.0);
        assert!(stats.prior_year_payroll.is_none());
        assert!(stats.prior_year_employees.is_none());
    }

    #[test]
    fn test_earnings_type_parsing() {
        assert_eq!("overtime".parse::<EarningsType>().unwrap(), EarningsType::Overtime);
        assert_eq!("Quinn Ed".parse::<EarningsType>().unwrap(), EarningsType::QuinnEducation);
        assert_eq!(
            "quinn-education".parse::<EarningsType>().unwrap(),
            EarningsType::QuinnEducation
        );
        assert!("bonus".parse::<EarningsType>().is_err());
    }

    #[test]
    fn test_earnings_type_order() {
        let keys: Vec<&str> = EarningsType::ALL.iter().map(|t| t.as_str()).collect();
        assert_eq!(
            keys,
            vec!["regular", "overtime", "detail", "retro", "other", "injured", "quinn_education"]
        );
    }

    #[test]
    fn test_export_row_count() {
        let file = ExportFile {
            filename: "payroll_2024.csv".to_string(),
            body: "name,department,total_gross\n\"DOE,JANE\",Police,156200.75\nROE,Fire,99000\n"
                .to_string(),
        };
        assert_eq!(file.row_count().unwrap(), 2);

        let empty = ExportFile {
            filename: "payroll_2024.csv".to_string(),
            body: String::new(),
        };
        assert_eq!(empty.row_count().unwrap(), 0);
    }
}
