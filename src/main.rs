//! payroll-dash CLI
//!
//! Command-line interface for the payroll dashboard:
//! - Show the dashboard for a filter
//! - List departments and summary stats
//! - Export CSV
//! - Explore interactively with cross-filtering

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use payroll_dash::api::{ApiError, EarningsType, FilterQuery, PayrollApi, PayrollClient};
use payroll_dash::config::{generate_default_config, Config, LoggingConfig};
use payroll_dash::terminal::{render_stats_text, Command, HELP};
use payroll_dash::views::{EmployeeTable, StatCards};
use payroll_dash::{Dashboard, ReloadReport, TerminalView, UpdateSource};

#[derive(Parser)]
#[command(name = "payroll-dash")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Cross-filtering dashboard for city payroll data")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Payroll API URL (overrides config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format (table, json, csv)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Args, Clone)]
pub struct FilterArgs {
    /// Payroll year (default: from config)
    #[arg(short, long)]
    pub year: Option<i32>,
    /// Department name
    #[arg(short, long)]
    pub department: Option<String>,
    /// Earnings type (regular, overtime, detail, retro, other, injured, quinn_education)
    #[arg(short, long)]
    pub earnings_type: Option<EarningsType>,
}

impl FilterArgs {
    fn query(&self, default_year: i32) -> FilterQuery {
        FilterQuery {
            year: self.year.unwrap_or(default_year),
            department: self.department.clone().filter(|d| !d.is_empty()),
            earnings_type: self.earnings_type,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load every view for a filter
    Show {
        #[command(flatten)]
        filter: FilterArgs,
        /// Quick filter applied to the loaded rows
        #[arg(short, long)]
        search: Option<String>,
    },

    /// List departments by total earnings
    Departments {
        /// Payroll year (default: from config)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Show summary statistics
    Stats {
        /// Payroll year (default: from config)
        #[arg(short, long)]
        year: Option<i32>,
        /// Department name
        #[arg(short, long)]
        department: Option<String>,
    },

    /// Download the CSV export
    Export {
        #[command(flatten)]
        filter: FilterArgs,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check the payroll API
    Status,

    /// Explore the dashboard interactively
    Interactive {
        /// Starting year (default: from config)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_logging(config: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("payroll_dash={}", config.level))
    });

    // Logs go to stderr so they never mix with table or CSV output
    let registry = tracing_subscriber::registry().with(filter);
    if config.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    init_logging(&config.logging);

    let api = Arc::new(PayrollClient::new(config.api.client_config())?);
    let default_year = config.dashboard.default_year;

    match cli.command {
        Commands::Show { filter, search } => {
            let query = filter.query(default_year);

            match cli.format.as_str() {
                "json" | "csv" => {
                    let rows = api.employees(&query).await?;
                    let table = EmployeeTable::new(rows, config.dashboard.page_size);
                    let rows = table.filtered(search.as_deref().unwrap_or_default());

                    if cli.format == "json" {
                        println!("{}", serde_json::to_string_pretty(&rows)?);
                    } else {
                        let mut writer = csv::Writer::from_writer(std::io::stdout());
                        for row in rows {
                            writer.serialize(row)?;
                        }
                        writer.flush()?;
                    }
                }
                _ => {
                    let view = Arc::new(
                        TerminalView::new(std::env::current_dir()?)
                            .with_quick_filter(search.as_deref().unwrap_or_default()),
                    );
                    let mut dashboard_config = config.dashboard.clone();
                    dashboard_config.default_year = query.year;

                    let dashboard = Dashboard::new(api, view, &dashboard_config);
                    dashboard
                        .on_department_select(query.department, UpdateSource::Programmatic)
                        .await;
                    dashboard
                        .on_earnings_type_select(query.earnings_type, UpdateSource::Programmatic)
                        .await;

                    let report = dashboard.reload().await;
                    if !report.all_rendered() {
                        print_failures(&report);
                        std::process::exit(1);
                    }
                }
            }
        }

        Commands::Departments { year } => {
            let year = year.unwrap_or(default_year);
            let mut departments = api.departments(year).await.map_err(exit_on_unavailable)?;
            departments.sort_by(|a, b| b.total_earnings.total_cmp(&a.total_earnings));

            match cli.format.as_str() {
                "json" => {
                    println!("{}", serde_json::to_string_pretty(&departments)?);
                }
                "csv" => {
                    let mut writer = csv::Writer::from_writer(std::io::stdout());
                    for department in &departments {
                        writer.serialize(department)?;
                    }
                    writer.flush()?;
                }
                _ => {
                    if departments.is_empty() {
                        println!("No departments for {}", year);
                        return Ok(());
                    }

                    println!(
                        "{:<40} {:>10} {:>16} {:>14}",
                        "Department", "Employees", "Total", "Average"
                    );
                    println!("{}", "-".repeat(83));

                    for d in &departments {
                        println!(
                            "{:<40} {:>10} {:>16} {:>14}",
                            d.name,
                            payroll_dash::format::format_count(d.employee_count),
                            payroll_dash::format::format_currency(d.total_earnings),
                            payroll_dash::format::format_currency_full(
                                d.avg_earnings,
                                payroll_dash::format::Precision::Whole
                            ),
                        );
                    }
                }
            }
        }

        Commands::Stats { year, department } => {
            let filter = FilterArgs {
                year,
                department,
                earnings_type: None,
            };
            let query = filter.query(default_year);
            let stats = api.stats(&query).await.map_err(exit_on_unavailable)?;

            match cli.format.as_str() {
                "json" => {
                    println!("{}", serde_json::to_string_pretty(&stats)?);
                }
                "csv" => {
                    let mut writer = csv::Writer::from_writer(std::io::stdout());
                    writer.serialize(&stats)?;
                    writer.flush()?;
                }
                _ => {
                    println!(
                        "Payroll {} - {}",
                        query.year,
                        query.department.as_deref().unwrap_or("All Departments")
                    );
                    println!();
                    print!("{}", render_stats_text(&StatCards::from_summary(&stats)));
                }
            }
        }

        Commands::Export { filter, output } => {
            let query = filter.query(default_year);
            let file = api.export(&query).await.map_err(exit_on_unavailable)?;
            let rows = file.row_count().context("Export is not valid CSV")?;

            match output {
                Some(path) => {
                    std::fs::write(&path, &file.body)?;
                    println!("Exported {} rows to {:?}", rows, path);
                }
                None => {
                    print!("{}", file.body);
                    eprintln!("Exported {} rows ({})", rows, file.filename);
                }
            }
        }

        Commands::Status => {
            println!("payroll-dash v{}", env!("CARGO_PKG_VERSION"));
            println!();

            match api.health().await {
                Ok(health) => {
                    println!("API: {}", config.api.base_url);
                    println!("Status: {}", health.status);
                    if let Some(database) = &health.database {
                        println!("Database: {}", database);
                    }
                    println!(
                        "Records: {}",
                        payroll_dash::format::format_count(health.total_records)
                    );
                    let years: Vec<String> =
                        health.years_available.iter().map(|y| y.to_string()).collect();
                    println!("Years: {}", years.join(", "));
                }
                Err(e) => {
                    eprintln!("Cannot reach payroll API at {}", config.api.base_url);
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Interactive { year } => {
            let mut dashboard_config = config.dashboard.clone();
            dashboard_config.default_year = year.unwrap_or(default_year);

            let view = Arc::new(TerminalView::new(std::env::current_dir()?));
            let dashboard = Dashboard::new(api, view.clone(), &dashboard_config);
            run_interactive(&dashboard, &view).await?;
        }

        Commands::Config { output } => {
            let config = generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

async fn run_interactive(dashboard: &Dashboard, view: &TerminalView) -> anyhow::Result<()> {
    print_failures(&dashboard.init().await);
    println!();
    println!("Type 'help' for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };

        match command {
            Command::Year(year) => {
                print_reload(dashboard.on_year_change(year).await);
            }
            Command::Department(name) => {
                let department = match name {
                    Some(name) => match view.resolve_department(&name) {
                        Some(department) => Some(department),
                        None => {
                            eprintln!("Unknown department: {}", name);
                            continue;
                        }
                    },
                    None => None,
                };
                print_reload(
                    dashboard
                        .on_department_select(department, UpdateSource::User)
                        .await,
                );
            }
            Command::EarningsType(earnings_type) => {
                print_reload(
                    dashboard
                        .on_earnings_type_select(earnings_type, UpdateSource::User)
                        .await,
                );
            }
            Command::ClickDepartment(n) => match dashboard.on_department_bar_click(n - 1).await {
                Some(report) => print_failures(&report),
                None => eprintln!("No department bar {}", n),
            },
            Command::ClickEarnings(n) => match dashboard.on_earnings_bar_click(n - 1).await {
                Some(report) => print_failures(&report),
                None => eprintln!("No earnings bar {}", n),
            },
            Command::Search(text) => dashboard.on_search_input(&text).await,
            Command::Page(n) => view.show_page(n - 1),
            Command::Show => view.reprint_table(),
            Command::Reload => print_failures(&dashboard.reload().await),
            Command::Export => {
                // Failures were already shown by the view
                let _ = dashboard.export().await;
            }
            Command::Url => println!("{}", dashboard.export_url().await),
            Command::Help => println!("{}", HELP),
            Command::Quit => break,
        }
    }

    Ok(())
}

fn print_reload(report: Option<ReloadReport>) {
    if let Some(report) = report {
        print_failures(&report);
    }
}

fn print_failures(report: &ReloadReport) {
    for (view, message) in report.failures() {
        eprintln!("Failed to load {}: {}", view, message);
    }
}

/// Friendlier message when the backend is not running
fn exit_on_unavailable(error: ApiError) -> ApiError {
    if matches!(error, ApiError::Unavailable) {
        eprintln!("Cannot connect to the payroll API");
        eprintln!();
        eprintln!("Make sure the backend is running, or pass --api-url");
        std::process::exit(1);
    }
    error
}
