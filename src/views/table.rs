//! Employee Table
//!
//! Column definitions and client-side quick filtering for the employee grid.

use crate::api::EmployeeRow;
use crate::format::{format_currency_full, Precision};

/// A table column's data source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Department,
    Title,
    TotalGross,
    Regular,
    Overtime,
    Detail,
    Retro,
    Other,
    Injured,
    QuinnEducation,
}

impl Field {
    fn amount(self, row: &EmployeeRow) -> Option<f64> {
        match self {
            Field::TotalGross => Some(row.total_gross),
            Field::Regular => Some(row.regular),
            Field::Overtime => Some(row.overtime),
            Field::Detail => Some(row.detail),
            Field::Other => Some(row.other),
            Field::Retro => row.retro,
            Field::Injured => row.injured,
            Field::QuinnEducation => row.quinn_education,
            Field::Name | Field::Department | Field::Title => None,
        }
    }

    /// Display text of this field for `row`
    pub fn display(self, row: &EmployeeRow) -> String {
        match self {
            Field::Name => row.name.clone(),
            Field::Department => row.department.clone().unwrap_or_default(),
            Field::Title => row.title.clone().unwrap_or_default(),
            _ => self
                .amount(row)
                .map(|v| format_currency_full(v, Precision::Cents))
                .unwrap_or_default(),
        }
    }
}

/// Grid column definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub field: Field,
    pub header: &'static str,
    pub width: u16,
    pub numeric: bool,
    pub pinned: bool,
}

const fn text(field: Field, header: &'static str, width: u16) -> Column {
    Column {
        field,
        header,
        width,
        numeric: false,
        pinned: false,
    }
}

const fn money(field: Field, header: &'static str, width: u16) -> Column {
    Column {
        field,
        header,
        width,
        numeric: true,
        pinned: false,
    }
}

pub const COLUMNS: [Column; 11] = [
    Column {
        field: Field::Name,
        header: "Name",
        width: 200,
        numeric: false,
        pinned: true,
    },
    text(Field::Department, "Department", 180),
    text(Field::Title, "Title", 180),
    money(Field::TotalGross, "Total", 130),
    money(Field::Regular, "Regular", 120),
    money(Field::Overtime, "Overtime", 120),
    money(Field::Detail, "Detail", 110),
    money(Field::Retro, "Retro", 110),
    money(Field::Other, "Other", 110),
    money(Field::Injured, "Injured", 110),
    money(Field::QuinnEducation, "Quinn Ed", 110),
];

/// Rows from one employee load
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeTable {
    pub rows: Vec<EmployeeRow>,
    pub page_size: usize,
}

impl EmployeeTable {
    pub fn new(rows: Vec<EmployeeRow>, page_size: usize) -> Self {
        Self {
            rows,
            page_size: page_size.max(1),
        }
    }

    pub fn columns(&self) -> &'static [Column] {
        &COLUMNS
    }

    /// Rows matching the quick filter.
    ///
    /// The text is split on whitespace; a row matches when every word appears,
    /// case-insensitively, in at least one of its displayed cells. Empty text
    /// matches everything.
    pub fn filtered(&self, quick_filter: &str) -> Vec<&EmployeeRow> {
        let words: Vec<String> = quick_filter
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();

        if words.is_empty() {
            return self.rows.iter().collect();
        }

        self.rows
            .iter()
            .filter(|row| {
                let haystack = COLUMNS
                    .iter()
                    .map(|c| c.field.display(row))
                    .collect::<Vec<_>>()
                    .join("\n")
                    .to_lowercase();
                words.iter().all(|w| haystack.contains(w.as_str()))
            })
            .collect()
    }

    /// Number of pages needed for `count` rows
    pub fn page_count(&self, count: usize) -> usize {
        count.div_ceil(self.page_size).max(1)
    }

    /// Zero-based page of `rows`
    pub fn page<'a>(&self, rows: &'a [&'a EmployeeRow], page: usize) -> &'a [&'a EmployeeRow] {
        let start = (page * self.page_size).min(rows.len());
        let end = (start + self.page_size).min(rows.len());
        &rows[start..end]
    }
}
