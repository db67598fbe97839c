//! Terminal View
//!
//! A [`ViewAdapter`] that prints the dashboard to stdout, plus the command
//! parser for the interactive session. Rendering is split into pure
//! `render_*_text` functions so the layouts can be tested without a terminal.

use std::path::PathBuf;
use std::sync::Mutex;

use crate::api::{EarningsType, ExportFile};
use crate::views::{
    truncate_label, Column, DepartmentChart, EarningsChart, EmployeeTable, StatCards, ViewAdapter,
    SELECTED_COLOR,
};

/// Columns wide enough to show in a terminal
const TABLE_COLUMNS: usize = 7;

const BAR_WIDTH: usize = 30;

/// Column width in characters, from the grid's pixel width
fn char_width(column: &Column) -> usize {
    usize::from(column.width / 8)
}

fn fit(text: &str, width: usize) -> String {
    if text.chars().count() >= width {
        truncate_label(text, width.saturating_sub(4))
    } else {
        text.to_string()
    }
}

fn bar(value: f64, max: f64) -> String {
    let len = if max > 0.0 {
        ((value / max) * BAR_WIDTH as f64).round() as usize
    } else {
        0
    };
    "#".repeat(len.min(BAR_WIDTH))
}

/// One page of the table, filtered by `quick_filter`
pub fn render_table_text(table: &EmployeeTable, quick_filter: &str, page: usize) -> String {
    let columns = &table.columns()[..TABLE_COLUMNS];
    let rows = table.filtered(quick_filter);
    let pages = table.page_count(rows.len());
    let page = page.min(pages - 1);

    let mut out = String::new();
    let mut total_width = 0;
    for column in columns {
        let width = char_width(column);
        total_width += width + 1;
        if column.numeric {
            out.push_str(&format!("{:>width$} ", column.header, width = width));
        } else {
            out.push_str(&format!("{:<width$} ", column.header, width = width));
        }
    }
    out.push('\n');
    out.push_str(&"-".repeat(total_width));
    out.push('\n');

    for row in table.page(&rows, page) {
        for column in columns {
            let width = char_width(column);
            let cell = fit(&column.field.display(row), width);
            if column.numeric {
                out.push_str(&format!("{:>width$} ", cell, width = width));
            } else {
                out.push_str(&format!("{:<width$} ", cell, width = width));
            }
        }
        out.push('\n');
    }

    if rows.is_empty() {
        out.push_str("No matching employees\n");
    }

    out.push_str(&format!(
        "Page {} of {} ({} of {} employees",
        page + 1,
        pages,
        rows.len(),
        table.rows.len()
    ));
    if !quick_filter.trim().is_empty() {
        out.push_str(&format!(" matching \"{}\"", quick_filter.trim()));
    }
    out.push_str(")\n");
    out
}

pub fn render_stats_text(stats: &StatCards) -> String {
    let mut out = String::new();
    for card in &stats.cards {
        let variance = card
            .variance
            .as_ref()
            .map(|v| format!("{} vs prior year", v))
            .unwrap_or_default();
        out.push_str(&format!("{:<16} {:>16}  {}\n", card.label, card.value, variance));
    }
    out.push_str(&format!("{:<16} {:>16}\n", "Median Salary", stats.median_salary));
    if let Some((name, total)) = &stats.top_department {
        out.push_str(&format!("{:<16} {} ({})\n", "Top Department", name, total));
    }
    out
}

pub fn render_department_chart_text(chart: &DepartmentChart) -> String {
    if chart.is_empty() {
        return "No department data\n".to_string();
    }

    let max = chart.bars.iter().map(|b| b.value).fold(0.0_f64, f64::max);
    let mut out = String::from("Top Departments by Total Earnings\n");
    for (i, b) in chart.bars.iter().enumerate() {
        let marker = if b.color == SELECTED_COLOR { '*' } else { ' ' };
        out.push_str(&format!(
            "{:>2}.{}{:<28} {:<width$} {}\n",
            i + 1,
            marker,
            b.label,
            bar(b.value, max),
            b.value_label,
            width = BAR_WIDTH
        ));
    }
    out
}

pub fn render_earnings_chart_text(chart: &EarningsChart) -> String {
    let max = chart.bars.iter().map(|b| b.percent).fold(0.0_f64, f64::max);
    let mut out = String::from("Earnings Composition\n");
    for (i, b) in chart.bars.iter().enumerate() {
        let marker = if b.color == SELECTED_COLOR { '*' } else { ' ' };
        out.push_str(&format!(
            "{:>2}.{}{:<10} {:<width$} {}\n",
            i + 1,
            marker,
            b.label,
            bar(b.percent, max),
            b.value_label,
            width = BAR_WIDTH
        ));
    }
    out
}

#[derive(Default)]
struct TerminalState {
    table: Option<EmployeeTable>,
    quick_filter: String,
    page: usize,
    departments: Vec<String>,
}

/// Prints each view to stdout as it renders
pub struct TerminalView {
    export_dir: PathBuf,
    state: Mutex<TerminalState>,
}

impl TerminalView {
    pub fn new(export_dir: PathBuf) -> Self {
        Self {
            export_dir,
            state: Mutex::default(),
        }
    }

    /// Start with a quick filter already applied
    pub fn with_quick_filter(self, text: &str) -> Self {
        self.lock().quick_filter = text.to_string();
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, TerminalState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn print_table(state: &TerminalState) {
        if let Some(table) = &state.table {
            println!();
            print!("{}", render_table_text(table, &state.quick_filter, state.page));
        }
    }

    /// Show page `page` (zero-based) of the current table
    pub fn show_page(&self, page: usize) {
        let mut state = self.lock();
        state.page = page;
        Self::print_table(&state);
    }

    pub fn reprint_table(&self) {
        Self::print_table(&self.lock());
    }

    /// Department option matching `name` case-insensitively
    pub fn resolve_department(&self, name: &str) -> Option<String> {
        self.lock()
            .departments
            .iter()
            .find(|d| d.eq_ignore_ascii_case(name.trim()))
            .cloned()
    }
}

impl ViewAdapter for TerminalView {
    fn render_table(&self, table: &EmployeeTable) {
        let mut state = self.lock();
        state.table = Some(table.clone());
        state.page = 0;
        Self::print_table(&state);
    }

    fn render_stats(&self, stats: &StatCards) {
        println!();
        println!("Updated {}", chrono::Local::now().format("%H:%M:%S"));
        print!("{}", render_stats_text(stats));
    }

    fn render_department_chart(&self, chart: &DepartmentChart) {
        println!();
        print!("{}", render_department_chart_text(chart));
    }

    fn render_earnings_chart(&self, chart: &EarningsChart) {
        println!();
        print!("{}", render_earnings_chart_text(chart));
    }

    fn set_year_options(&self, years: &[i32], selected: i32) {
        let years: Vec<String> = years
            .iter()
            .map(|y| {
                if *y == selected {
                    format!("[{}]", y)
                } else {
                    y.to_string()
                }
            })
            .collect();
        println!("Years: {}", years.join(" "));
    }

    fn set_department_options(&self, names: &[String]) {
        self.lock().departments = names.to_vec();
        tracing::debug!(count = names.len(), "Department options updated");
    }

    fn sync_department_control(&self, department: Option<&str>) {
        println!("Department: {}", department.unwrap_or("All Departments"));
    }

    fn sync_earnings_type_control(&self, earnings_type: Option<EarningsType>) {
        println!(
            "Earnings type: {}",
            earnings_type.map(|t| t.label()).unwrap_or("All Types")
        );
    }

    fn apply_quick_filter(&self, text: &str) {
        let mut state = self.lock();
        state.quick_filter = text.to_string();
        state.page = 0;
        Self::print_table(&state);
    }

    fn deliver_export(&self, file: &ExportFile) {
        let path = self.export_dir.join(&file.filename);
        match std::fs::write(&path, &file.body) {
            Ok(()) => match file.row_count() {
                Ok(rows) => println!("Exported {} rows to {}", rows, path.display()),
                Err(_) => println!("Exported to {}", path.display()),
            },
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Failed to save export");
                self.alert("Error exporting data");
            }
        }
    }

    fn alert(&self, message: &str) {
        eprintln!("Error: {}", message);
    }
}

/// A line typed into the interactive session
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Year(i32),
    Department(Option<String>),
    EarningsType(Option<EarningsType>),
    /// One-based bar number
    ClickDepartment(usize),
    ClickEarnings(usize),
    Search(String),
    Page(usize),
    Show,
    Reload,
    Export,
    Url,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  year <YEAR>               Select a year
  department <NAME|all>     Select a department
  earnings <TYPE|all>       Select an earnings type
  click-dept <N>            Click bar N of the department chart
  click-earnings <N>        Click bar N of the earnings chart
  search <TEXT>             Filter the loaded table (empty clears)
  page <N>                  Show table page N
  show                      Show the table again
  reload                    Reload every view
  export                    Download the CSV export
  url                       Print the export URL
  help                      Show this help
  quit                      Exit";

fn is_all(value: &str) -> bool {
    value.is_empty() || value.eq_ignore_ascii_case("all")
}

fn parse_bar(arg: &str) -> Result<usize, String> {
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("Invalid bar number: {}", arg)),
    }
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (name, arg) = match line.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (line, ""),
        };

        match name.to_lowercase().as_str() {
            "year" => arg
                .parse()
                .map(Command::Year)
                .map_err(|_| format!("Invalid year: {}", arg)),
            "department" | "dept" => Ok(Command::Department(
                (!is_all(arg)).then(|| arg.to_string()),
            )),
            "earnings" => {
                if is_all(arg) {
                    Ok(Command::EarningsType(None))
                } else {
                    arg.parse().map(|t| Command::EarningsType(Some(t)))
                }
            }
            "click-dept" => parse_bar(arg).map(Command::ClickDepartment),
            "click-earnings" => parse_bar(arg).map(Command::ClickEarnings),
            "search" => Ok(Command::Search(arg.to_string())),
            "page" => parse_bar(arg).map(Command::Page),
            "show" => Ok(Command::Show),
            "reload" => Ok(Command::Reload),
            "export" => Ok(Command::Export),
            "url" => Ok(Command::Url),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            "" => Err("Empty command".to_string()),
            other => Err(format!("Unknown command: {} (try 'help')", other)),
        }
    }
}
