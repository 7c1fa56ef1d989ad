use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand};

use mart_scraper::config::Settings;
use mart_scraper::{eda, etl, scrape};

#[derive(Parser)]
#[command(
    name = "mart_scraper",
    about = "IndiaMART B2B marketplace scraper and analysis pipeline"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape listings into the raw data file
    Scrape {
        /// Max pages per category
        #[arg(short = 'n', long)]
        pages: Option<usize>,
        /// Category to scrape (repeatable; defaults from config)
        #[arg(short, long = "category")]
        categories: Vec<String>,
    },
    /// Clean the raw data into the tabular dataset + quality report
    Etl,
    /// Statistics, charts and reports over the cleaned dataset
    Eda,
    /// Full pipeline: scrape, then etl, then eda
    Run {
        /// Max pages per category
        #[arg(short = 'n', long)]
        pages: Option<usize>,
        /// Category to scrape (repeatable; defaults from config)
        #[arg(short, long = "category")]
        categories: Vec<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Scrape { pages, categories } => {
            let settings = load_settings(pages, categories)?;
            run_scrape(&settings)
        }
        Commands::Etl => run_etl(&Settings::load()?),
        Commands::Eda => run_eda(&Settings::load()?),
        Commands::Run { pages, categories } => {
            let settings = load_settings(pages, categories)?;
            run_scrape(&settings)?;
            run_etl(&settings)?;
            run_eda(&settings)
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

/// Settings from environment/defaults, with CLI flags taking precedence.
fn load_settings(pages: Option<usize>, categories: Vec<String>) -> Result<Settings> {
    let mut settings = Settings::load()?;
    if let Some(n) = pages {
        settings.max_pages_per_category = n;
    }
    if !categories.is_empty() {
        settings.categories = categories;
    }
    Ok(settings)
}

fn run_scrape(settings: &Settings) -> Result<()> {
    let stats = scrape::run(settings)?;
    println!(
        "Scraped {} records ({} pages ok, {} skipped) -> {}",
        stats.records,
        stats.pages_fetched,
        stats.pages_skipped,
        settings.raw_path().display()
    );
    Ok(())
}

fn run_etl(settings: &Settings) -> Result<()> {
    let (records, quality) = etl::run(settings)?;
    println!(
        "Cleaned {} records ({} valid, {} duplicates dropped, {} invalid prices) -> {}",
        records.len(),
        quality.valid_records,
        quality.duplicate_count,
        quality.invalid_price_count,
        settings.processed_path().display()
    );
    Ok(())
}

fn run_eda(settings: &Settings) -> Result<()> {
    let insights = eda::run(settings)?;
    println!(
        "Analyzed {} records ({} valid). Report: {}",
        insights.overview.total_records,
        insights.overview.valid_records,
        settings.report_path().display()
    );
    Ok(())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
