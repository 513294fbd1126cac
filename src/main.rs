//! drudge-links main entry point
//!
//! This is the command-line interface for crawling the archive and aggregating the
//! links it yields.

use clap::{Parser, Subcommand};
use drudge_links::analysis::{count_domains_by_month_files, count_domains_file};
use drudge_links::config::{load_config_with_hash, Config};
use drudge_links::crawler::{run_crawl, CrawlRequest};
use drudge_links::timeline::{days_in_range, parse_day, today, ArchiveSource};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// drudge-links: outbound link history for the Drudge Report Archives
///
/// Pulls the outbound links from archived front pages for a date range into a CSV,
/// records the first time each link appeared, and counts links by domain and month.
#[derive(Parser, Debug)]
#[command(name = "drudge-links")]
#[command(version)]
#[command(about = "Outbound link history for the Drudge Report Archives", long_about = None)]
struct Cli {
    /// Optional TOML configuration file
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pull the outbound links for a date range into a CSV
    Crawl {
        /// Filename of the output CSV
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// First day to pull links for, following the form "2017-01-13" (default: today)
        #[arg(long)]
        start: Option<String>,

        /// Last day to pull links for, following the form "2017-01-13" (default: today)
        #[arg(long)]
        end: Option<String>,

        /// Number of snapshots per day to parse; 0 for all
        #[arg(long = "per_day", default_value_t = 0)]
        per_day: usize,

        /// Validate the range and print the pages that would be fetched
        #[arg(long)]
        dry_run: bool,
    },

    /// Count domains per month from the links CSV
    Monthly,

    /// Count domains from the first-appearances CSV
    Domains,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    cfg
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => Config::default(),
    };

    match cli.command {
        Command::Crawl {
            output,
            start,
            end,
            per_day,
            dry_run,
        } => {
            let request = CrawlRequest {
                start: day_or_today(start.as_deref())?,
                end: day_or_today(end.as_deref())?,
                per_day,
                output,
            };

            if dry_run {
                handle_dry_run(&config, &request)?;
            } else {
                handle_crawl(config, &request).await?;
            }
        }
        Command::Monthly => handle_monthly(&config)?,
        Command::Domains => handle_domains(&config)?,
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("drudge_links=info,warn"),
            1 => EnvFilter::new("drudge_links=debug,info"),
            2 => EnvFilter::new("drudge_links=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn day_or_today(input: Option<&str>) -> Result<chrono::NaiveDate, drudge_links::DrudgeError> {
    match input {
        Some(day) => parse_day(day),
        None => Ok(today()),
    }
}

/// Handles `crawl --dry-run`: validates the range and lists the day pages
fn handle_dry_run(config: &Config, request: &CrawlRequest) -> Result<(), Box<dyn std::error::Error>> {
    let source = ArchiveSource::new(&config.source);

    println!("=== drudge-links Dry Run ===\n");
    println!("Archive:");
    println!("  Timeline: {}", source.timeline_url());
    println!("  Coverage: {} to {}", source.first_date(), today());
    println!("  Workers: {}", config.crawler.workers);

    println!("\nOutput:");
    println!("  Links: {}", request.output.display());
    println!("  First appearances: {}", config.output.first_appearances_path);

    let days = days_in_range(request.start, request.end);
    println!("\nDay pages ({}):", days.len());
    for day in days {
        println!("  - {}", source.day_url(day)?);
    }

    if request.per_day > 0 {
        println!("\n✓ Would sample {} snapshot(s) per day", request.per_day);
    } else {
        println!("\n✓ Would fetch every snapshot of each day");
    }

    Ok(())
}

/// Handles the crawl itself
async fn handle_crawl(config: Config, request: &CrawlRequest) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Starting crawl from {} to {} ({} per day)",
        request.start,
        request.end,
        request.per_day
    );

    match run_crawl(config, request).await {
        Ok(report) => {
            println!(
                "✓ {} link row(s) written to {} ({} distinct link(s))",
                report.rows_written,
                request.output.display(),
                report.distinct_urls
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

/// Handles the monthly domain breakdown
fn handle_monthly(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let output = &config.output;
    let summary = count_domains_by_month_files(
        Path::new(&output.all_links_path),
        Path::new(&output.domain_counts_by_month_path),
        Path::new(&output.num_domains_by_month_path),
    )?;

    println!(
        "✓ {} row(s) counted ({} skipped); {} bucket(s) written to {} and {}",
        summary.rows_read,
        summary.rows_skipped,
        summary.rows_written,
        output.domain_counts_by_month_path,
        output.num_domains_by_month_path
    );

    Ok(())
}

/// Handles the flat domain count
fn handle_domains(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let output = &config.output;
    let summary = count_domains_file(
        Path::new(&output.first_appearances_path),
        Path::new(&output.domain_counts_path),
    )?;

    println!(
        "✓ {} link(s) counted; {} domain(s) written to {}",
        summary.rows_read, summary.rows_written, output.domain_counts_path
    );

    Ok(())
}
