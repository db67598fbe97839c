//! Filter State
//!
//! The dashboard's cross-filter: year, department, earnings type, and search
//! text. Every mutation carries an [`UpdateSource`] so the caller can tell a
//! user's dropdown change apart from the dashboard pushing a chart selection
//! back into that dropdown.

use crate::api::{EarningsType, FilterQuery};

/// Where a filter change came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateSource {
    /// The user changed a control directly
    User,
    /// The dashboard synchronized a control to match a chart selection
    Programmatic,
}

/// A single mutation of the filter
#[derive(Debug, Clone, PartialEq)]
pub enum FilterChange {
    Year(i32),
    Department(Option<String>),
    EarningsType(Option<EarningsType>),
    Search(String),
}

/// What the caller must do after applying a change
#[derive(Debug, Clone, PartialEq)]
pub enum FilterEffect {
    /// Nothing to do
    None,
    /// Re-fetch and re-render every view
    Reload,
    /// Debounce, then quick-filter the loaded rows with this text
    QuickFilter(String),
}

/// Current filter selections
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub year: i32,
    pub department: Option<String>,
    pub earnings_type: Option<EarningsType>,
    pub search_text: String,
}

impl FilterState {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            department: None,
            earnings_type: None,
            search_text: String::new(),
        }
    }

    /// Apply a change and report its effect.
    ///
    /// Year changes always reload. Department and earnings-type changes reload
    /// only when the user made them. Search text is not stored here; it is
    /// recorded by [`FilterState::set_search_text`] once the debounce fires.
    pub fn apply(&mut self, change: FilterChange, source: UpdateSource) -> FilterEffect {
        match change {
            FilterChange::Year(year) => {
                self.year = year;
                FilterEffect::Reload
            }
            FilterChange::Department(department) => {
                self.department = department.filter(|d| !d.is_empty());
                Self::reload_if_user(source)
            }
            FilterChange::EarningsType(earnings_type) => {
                self.earnings_type = earnings_type;
                Self::reload_if_user(source)
            }
            FilterChange::Search(text) => FilterEffect::QuickFilter(text),
        }
    }

    fn reload_if_user(source: UpdateSource) -> FilterEffect {
        match source {
            UpdateSource::User => FilterEffect::Reload,
            UpdateSource::Programmatic => FilterEffect::None,
        }
    }

    /// Toggle the department: selecting the current one clears it, anything
    /// else replaces it. Returns the new selection.
    pub fn toggle_department(&mut self, name: &str) -> Option<String> {
        self.department = match self.department.as_deref() {
            Some(current) if current == name => None,
            _ => Some(name.to_string()),
        };
        self.department.clone()
    }

    /// Toggle the earnings type with the same semantics as
    /// [`FilterState::toggle_department`]
    pub fn toggle_earnings_type(&mut self, earnings_type: EarningsType) -> Option<EarningsType> {
        self.earnings_type = match self.earnings_type {
            Some(current) if current == earnings_type => None,
            _ => Some(earnings_type),
        };
        self.earnings_type
    }

    pub fn set_search_text(&mut self, text: &str) {
        self.search_text = text.to_string();
    }

    /// Server-side scope of this filter
    pub fn query(&self) -> FilterQuery {
        FilterQuery {
            year: self.year,
            department: self.department.clone(),
            earnings_type: self.earnings_type,
        }
    }
}
