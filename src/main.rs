// Command-line host for the dashboard engine.
//
// The binary owns everything the library leaves out: reading the CSV,
// holding the rotation tick, and printing the result.
// - `--once` renders a single tick (optionally exporting JSON/CSV) and exits.
// - Otherwise an interactive menu loads the file and steps the rotation.
use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use site_dashboard::config::{self, DashboardConfig};
use site_dashboard::util::format_int;
use site_dashboard::{compute_dashboard, loader, output, SiteRecord};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "site_dashboard",
    about = "Rotating agency dashboard for waste-remediation sites",
    version
)]
struct Cli {
    /// Site table (CSV)
    #[arg(long, short = 'd', default_value = "sites.csv")]
    data: PathBuf,

    /// Config file (default: dashboard.config.json if present)
    #[arg(long, env = "SITE_DASHBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Starting rotation tick
    #[arg(long, default_value_t = 0)]
    tick: u64,

    /// "Today" for deadline math, YYYY-MM-DD (default: local date)
    #[arg(long)]
    reference_date: Option<NaiveDate>,

    /// Rows shown per ranked table
    #[arg(long)]
    top: Option<usize>,

    /// Render one tick and exit instead of opening the menu
    #[arg(long)]
    once: bool,

    /// Write the full snapshot as JSON (with --once)
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write ranked lists as CSV files into this directory (with --once)
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

// Loaded table plus the rotation counter. Lives on the stack of `main`.
struct Session {
    data: Option<Vec<SiteRecord>>,
    tick: u64,
}

fn read_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

fn load_table(path: &Path) -> Result<Vec<SiteRecord>> {
    let (data, report) = loader::load_path(path)
        .with_context(|| format!("failed to load site table: {}", path.display()))?;
    println!(
        "Processing dataset... ({} rows read, {} loaded)",
        format_int(report.total_rows),
        format_int(report.loaded_rows)
    );
    if report.parse_errors > 0 {
        println!(
            "Note: {} rows skipped (missing agency/site or unreadable).",
            format_int(report.parse_errors)
        );
    }
    if report.missing_days_required > 0 {
        println!(
            "Info: {} rows have no usable DaysRequired.",
            format_int(report.missing_days_required)
        );
    }
    println!();
    Ok(data)
}

fn run_once(cli: &Cli, config: &DashboardConfig, reference_date: NaiveDate) -> Result<()> {
    let data = load_table(&cli.data)?;
    let snap = compute_dashboard(&data, cli.tick, config, reference_date);
    output::print_snapshot(&snap, config.top);

    if let Some(path) = &cli.json {
        output::write_json(path, &snap)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Snapshot saved to {}", path.display());
    }
    if let Some(dir) = &cli.export_dir {
        let written = output::export_snapshot(dir, &snap)
            .with_context(|| format!("failed to export to {}", dir.display()))?;
        for p in written {
            println!("Exported {}", p.display());
        }
    }
    Ok(())
}

fn run_menu(cli: &Cli, config: &DashboardConfig, reference_date: NaiveDate) {
    let mut session = Session {
        data: None,
        tick: cli.tick,
    };
    loop {
        println!("Site Dashboard:");
        println!("[1] Load the file");
        println!("[2] Show current agency");
        println!("[3] Rotate to next agency");
        println!("[4] Exit\n");
        let Some(choice) = read_line("Enter choice: ") else {
            break;
        };
        match choice.as_str() {
            "1" => match load_table(&cli.data) {
                Ok(data) => session.data = Some(data),
                Err(e) => eprintln!("Error: {:#}\n", e),
            },
            "2" | "3" => {
                let Some(data) = &session.data else {
                    println!("Error: No data loaded. Please load the file first (option 1).\n");
                    continue;
                };
                if choice == "3" {
                    session.tick = session.tick.wrapping_add(1);
                }
                let snap = compute_dashboard(data, session.tick, config, reference_date);
                output::print_snapshot(&snap, config.top);
            }
            "4" => break,
            _ => println!("Invalid choice. Please enter 1-4.\n"),
        }
    }
    println!("Exiting the program.");
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let cwd = std::env::current_dir().context("cannot read working directory")?;
    let mut config =
        config::load_and_resolve(&cwd, cli.config.as_deref()).context("failed to load config")?;
    if let Some(top) = cli.top {
        if top == 0 {
            bail!("--top must be at least 1");
        }
        config.top = top;
    }
    let reference_date = cli
        .reference_date
        .unwrap_or_else(|| Local::now().date_naive());

    if cli.once {
        run_once(&cli, &config, reference_date)
    } else {
        run_menu(&cli, &config, reference_date);
        Ok(())
    }
}
