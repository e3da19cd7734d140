use std::{
    fs::{File, create_dir_all},
    io::BufWriter,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use agribib::config::AnalysisConfig;
use agribib::csv::CsvLoader;
use agribib::report::{Report, analyze};
use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};
use simple_logger::SimpleLogger;
use time::macros::format_description;

#[derive(Parser, Debug)]
#[command(name = "agribib")]
#[command(
    about = "Classifies a Scopus CSV export by agriculture focus and writes bibliometric reports and charts."
)]
#[command(version)]
struct Cli {
    #[arg(short, long, help = "Scopus CSV export to analyze", required = true)]
    input: PathBuf,

    #[arg(
        short,
        long,
        default_value = "output",
        help = "Directory for charts and summary.json"
    )]
    output_dir: PathBuf,

    #[arg(
        short,
        long,
        help = "JSON config file; missing keys keep their defaults"
    )]
    config: Option<PathBuf>,

    #[arg(
        short = 'y',
        long,
        help = "Ignore publications before this year (overrides the config file)"
    )]
    start_year: Option<i32>,

    #[arg(
        long,
        help = "Drop rows dated after this year (overrides the config file)"
    )]
    max_year: Option<i32>,

    #[arg(
        short,
        long,
        help = "Field delimiter of the input (overrides the config file)"
    )]
    delimiter: Option<char>,

    #[arg(long, help = "Match bare ISO alpha-2 codes in affiliations")]
    alpha2: bool,

    #[arg(long, help = "Write summary.json only, without charts")]
    no_charts: bool,

    #[arg(
        short,
        long,
        default_value = "INFO",
        help = "Logging level (DEBUG, INFO, WARN, ERROR)"
    )]
    log_level: String,
}

fn format_elapsed(elapsed: Duration) -> String {
    let total_secs = elapsed.as_secs();
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;

    if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s {}ms", seconds, elapsed.subsec_millis())
    }
}

fn load_config(cli: &Cli) -> Result<AnalysisConfig> {
    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::from_path(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    if let Some(start_year) = cli.start_year {
        config.start_year = start_year;
    }
    if let Some(max_year) = cli.max_year {
        config.max_year = Some(max_year);
    }
    if let Some(delimiter) = cli.delimiter {
        config.delimiter = delimiter;
    }
    if cli.alpha2 {
        config.countries.match_alpha2_codes = true;
    }
    Ok(config)
}

fn write_summary(report: &Report, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create summary file: {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), report)
        .with_context(|| format!("Failed to write summary file: {}", path.display()))?;
    info!("Summary saved to {}", path.display());
    Ok(())
}

#[cfg(feature = "charts")]
fn render_charts(report: &Report, output_dir: &Path) -> Result<usize> {
    let written =
        agribib::chart::render_all(report, output_dir).context("Failed to render charts")?;
    Ok(written.len())
}

#[cfg(not(feature = "charts"))]
fn render_charts(_report: &Report, _output_dir: &Path) -> Result<usize> {
    log::warn!("Built without the `charts` feature; skipping charts");
    Ok(0)
}

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();

    let log_level = match cli.log_level.to_uppercase().as_str() {
        "DEBUG" => LevelFilter::Debug,
        "INFO" => LevelFilter::Info,
        "WARN" | "WARNING" => LevelFilter::Warn,
        "ERROR" => LevelFilter::Error,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to INFO.", cli.log_level);
            LevelFilter::Info
        }
    };
    SimpleLogger::new()
        .with_level(log_level)
        .with_timestamp_format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        ))
        .init()?;

    info!("Starting agribib v{}", env!("CARGO_PKG_VERSION"));
    let config = load_config(&cli)?;

    create_dir_all(&cli.output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            cli.output_dir.display()
        )
    })?;

    let loader = CsvLoader::new().with_config(config.csv_config()?);
    let table = loader
        .load_path(&cli.input)
        .with_context(|| format!("Failed to load input table: {}", cli.input.display()))?;

    let report = analyze(table, &config).context("Analysis failed")?;
    write_summary(&report, &cli.output_dir.join("summary.json"))?;

    if cli.no_charts {
        info!("Skipping charts");
    } else {
        let charts = render_charts(&report, &cli.output_dir)?;
        info!("Wrote {} charts to {}", charts, cli.output_dir.display());
    }

    info!(
        "Total execution time: {}",
        format_elapsed(start_time.elapsed())
    );
    Ok(())
}
