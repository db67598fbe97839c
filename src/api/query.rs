//! Query Parameters
//!
//! Builds the query strings shared by every endpoint. `year` is always
//! present; an absent department or earnings type means "all".

use super::types::EarningsType;

/// Server-side filter scope for one load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterQuery {
    pub year: i32,
    pub department: Option<String>,
    pub earnings_type: Option<EarningsType>,
}

impl FilterQuery {
    pub fn for_year(year: i32) -> Self {
        Self {
            year,
            department: None,
            earnings_type: None,
        }
    }

    pub fn department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn earnings_type(mut self, earnings_type: EarningsType) -> Self {
        self.earnings_type = Some(earnings_type);
        self
    }

    /// Parameters of the CSV export: the full filter scope, no row limit
    pub(crate) fn export_query(&self) -> QueryString {
        QueryString::year(self.year)
            .push_opt("department", self.department.as_deref())
            .push_opt("earnings_type", self.earnings_type.map(|t| t.as_str()))
    }
}

/// Ordered, percent-encoded query string
#[derive(Debug, Default)]
pub(crate) struct QueryString {
    pairs: Vec<(&'static str, String)>,
}

impl QueryString {
    pub(crate) fn year(year: i32) -> Self {
        Self {
            pairs: vec![("year", year.to_string())],
        }
    }

    pub(crate) fn push(mut self, key: &'static str, value: impl ToString) -> Self {
        self.pairs.push((key, value.to_string()));
        self
    }

    /// Push only when a non-empty value is present
    pub(crate) fn push_opt<V: AsRef<str>>(self, key: &'static str, value: Option<V>) -> Self {
        match value {
            Some(v) if !v.as_ref().is_empty() => {
                let v = v.as_ref().to_string();
                self.push(key, v)
            }
            _ => self,
        }
    }

    pub(crate) fn encode(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}
