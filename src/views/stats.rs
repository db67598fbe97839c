//! Summary stat cards

use crate::api::StatsSummary;
use crate::format::{
    format_count, format_currency, format_currency_full, variance, Precision, Variance,
};

#[derive(Debug, Clone, PartialEq)]
pub struct StatCard {
    pub label: &'static str,
    pub value: String,
    /// Change against the prior year, when the backend had one
    pub variance: Option<Variance>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatCards {
    pub cards: Vec<StatCard>,
    pub median_salary: String,
    /// Top department name and its formatted total
    pub top_department: Option<(String, String)>,
}

impl StatCards {
    pub fn from_summary(stats: &StatsSummary) -> Self {
        let cards = vec![
            StatCard {
                label: "Employees",
                value: format_count(stats.total_employees),
                variance: variance(
                    stats.total_employees as f64,
                    stats.prior_year_employees.map(|n| n as f64),
                ),
            },
            StatCard {
                label: "Total Payroll",
                value: format_currency(stats.total_payroll),
                variance: variance(stats.total_payroll, stats.prior_year_payroll),
            },
            StatCard {
                label: "Average Salary",
                value: format_currency_full(stats.avg_salary, Precision::Cents),
                variance: variance(stats.avg_salary, stats.prior_year_avg_salary),
            },
            StatCard {
                label: "Total Overtime",
                value: format_currency(stats.total_overtime),
                variance: variance(stats.total_overtime, stats.prior_year_overtime),
            },
        ];

        let top_department = stats
            .top_department
            .as_ref()
            .filter(|name| !name.is_empty())
            .map(|name| (name.clone(), format_currency(stats.top_department_total)));

        Self {
            cards,
            median_salary: format_currency_full(stats.median_salary, Precision::Cents),
            top_department,
        }
    }

    pub fn card(&self, label: &str) -> Option<&StatCard> {
        self.cards.iter().find(|c| c.label == label)
    }
}
