use crate::analyzers::DailyReporter;
use crate::cli::args::{Cli, Commands};
use crate::error::{Result, WeathererError};
use crate::models::WeatherObservation;
use crate::settings::Settings;
use crate::store::WeatherStore;
use crate::utils::constants::{OBSERVATION_DATETIME_FORMAT, REPORT_DATE_FORMAT};
use crate::utils::progress::ProgressReporter;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use tracing::{debug, Level};

pub fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    debug!("Using database {}", settings.database.display());

    let store = WeatherStore::from_settings(&settings)?;
    store.ensure_schema()?;

    match cli.command {
        Commands::Init => {
            println!("Database ready: {}", store.database().display());
        }

        Commands::Import { files } => {
            let progress = ProgressReporter::new(
                files.len() as u64,
                "Importing observations...",
                files.len() < 2,
            );

            let summaries = store.import_all(&files, Some(&progress))?;
            let total: usize = summaries.iter().map(|s| s.rows).sum();
            progress.finish_with_message(&format!("Imported {} files", summaries.len()));

            for summary in &summaries {
                println!(
                    "{}: {} observations for area '{}'",
                    summary.path.display(),
                    summary.rows,
                    summary.area
                );
            }
            println!("Imported {} observations in total", total);
        }

        Commands::Show { date, json } => {
            let date = NaiveDate::parse_from_str(date.trim(), REPORT_DATE_FORMAT)?;
            let series = DailyReporter::new(&store).temperatures(date)?;

            if json {
                println!("{}", to_json(&series)?);
            } else {
                println!("{}", series.summary());
            }
        }

        Commands::Range { start, end, json } => {
            let offset = store.reader().offset();
            let start = parse_local_timestamp(&start, offset)?;
            let end = parse_local_timestamp(&end, offset)?;

            let observations = store.select_range(start, end)?;
            if json {
                println!("{}", to_json(&observations)?);
            } else {
                print_observations(&observations, offset);
            }
        }
    }

    Ok(())
}

/// Parse `YYYY/MM/DD HH:MM:SS` as wall-clock time at `offset`
fn parse_local_timestamp(value: &str, offset: FixedOffset) -> Result<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(value.trim(), OBSERVATION_DATETIME_FORMAT)?;
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| WeathererError::InvalidConfig(format!("Invalid local time '{}'", value)))
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn print_observations(observations: &[WeatherObservation], offset: FixedOffset) {
    if observations.is_empty() {
        println!("No observations in range");
        return;
    }

    println!(
        "{:>6}  {:<10}  {:<19}  {:>4}  {:>7}  {:>7}  {:>6}  {}",
        "id", "area", "date", "hour", "temp", "precip", "wind", "dir"
    );
    for obs in observations {
        println!(
            "{:>6}  {:<10}  {:<19}  {:>4}  {:>7.1}  {:>7}  {:>6}  {}",
            obs.id,
            obs.area,
            obs.date.with_timezone(&offset).format("%Y-%m-%d %H:%M:%S"),
            obs.hour,
            obs.temperature,
            format_optional(obs.precipitation),
            format_optional(obs.wind_speed),
            obs.wind_direction.as_deref().unwrap_or("-")
        );
    }
    println!("\n{} observations", observations.len());
}

fn format_optional(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.1}", v))
        .unwrap_or_else(|| "-".to_string())
}
