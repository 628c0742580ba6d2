use crate::analyzers::{
    filter_by_day_type, filter_by_weather, hourly_rental_profile, peak_hours, weather_correlation,
    DayTypeFilter, WeatherFilter,
};
use crate::cli::args::{Cli, Commands, OutputFormat};
use crate::config::AnalyticsConfig;
use crate::dashboard::{
    render_matrix, render_profile, render_summary, DashboardView, Dataset, Panel, Selection,
};
use crate::error::Result;
use crate::models::DailyField;
use crate::utils::constants::{CLEANING_REPORT_FILE, DAILY_PARQUET_FILE, HOURLY_PARQUET_FILE};
use crate::utils::filename::generate_default_export_dir;
use crate::utils::progress::ProgressReporter;
use crate::writers::ParquetWriter;
use serde::Serialize;
use serde_json::json;
use tracing::info;

pub async fn run(cli: Cli) -> Result<()> {
    let config = AnalyticsConfig::load(cli.config.as_deref())?
        .with_daily_source(cli.daily)
        .with_hourly_source(cli.hourly);
    info!(
        daily = %config.daily_source.display(),
        hourly = %config.hourly_source.display(),
        "Configuration loaded"
    );

    let progress = ProgressReporter::new_spinner("Loading rental data...", cli.quiet);
    let dataset = Dataset::load(&config, Some(&progress)).await?;

    match cli.command {
        Commands::Dashboard {
            day_type,
            weather,
            format,
        } => {
            let selection = Selection::parse(&day_type, &weather)?;
            let view = DashboardView::compute(&dataset, &selection, &config.correlation_fields)?;

            match format {
                OutputFormat::Text => println!("{}", view.render_text()),
                OutputFormat::Json => print_json(&view)?,
            }
        }

        Commands::Summary { format } => match format {
            OutputFormat::Text => {
                println!("{}", render_summary(dataset.summary()));
                println!("{}\n", dataset.daily_report().summary());
                println!("{}", dataset.hourly_report().summary());
            }
            OutputFormat::Json => print_json(&json!({
                "summary": dataset.summary(),
                "cleaning": [dataset.daily_report(), dataset.hourly_report()],
            }))?,
        },

        Commands::Profile { day_type, format } => {
            let day_type: DayTypeFilter = day_type.parse()?;
            let rows = filter_by_day_type(dataset.hourly(), day_type);
            let profile = hourly_rental_profile(&rows);
            let peaks = peak_hours(&profile);

            match format {
                OutputFormat::Text => {
                    println!("Day type: {} ({} hourly rows)\n", day_type, rows.len());
                    println!("{}", render_profile(&profile, &peaks));
                }
                OutputFormat::Json => print_json(&json!({
                    "day_type": day_type,
                    "hourly_row_count": rows.len(),
                    "hourly_profile": profile,
                    "peak_hours": peaks,
                }))?,
            }
        }

        Commands::Correlation {
            weather,
            fields,
            format,
        } => {
            let weather: WeatherFilter = weather.parse()?;
            let fields = if fields.is_empty() {
                config.correlation_fields.clone()
            } else {
                fields
                    .iter()
                    .map(|f| f.parse::<DailyField>())
                    .collect::<Result<Vec<_>>>()?
            };

            let rows = filter_by_weather(dataset.daily(), weather);
            let panel = Panel::from_result(weather_correlation(&rows, &fields))?;

            match format {
                OutputFormat::Text => {
                    println!("Weather: {} ({} days)\n", weather, rows.len());
                    match &panel {
                        Panel::Ready { data } => println!("{}", render_matrix(data)),
                        Panel::Unavailable { reason } => println!("Unavailable: {}", reason),
                    }
                }
                OutputFormat::Json => print_json(&json!({
                    "weather": weather,
                    "correlation": panel,
                }))?,
            }
        }

        Commands::Export {
            output_dir,
            compression,
        } => {
            let output_dir = output_dir.unwrap_or_else(generate_default_export_dir);
            let writer = ParquetWriter::new().with_compression(&compression)?;
            std::fs::create_dir_all(&output_dir)?;

            let daily_path = output_dir.join(DAILY_PARQUET_FILE);
            let hourly_path = output_dir.join(HOURLY_PARQUET_FILE);
            writer.write_daily(dataset.daily(), &daily_path)?;
            writer.write_hourly(dataset.hourly(), &hourly_path)?;

            let report_path = output_dir.join(CLEANING_REPORT_FILE);
            let reports = [dataset.daily_report(), dataset.hourly_report()];
            std::fs::write(&report_path, serde_json::to_string_pretty(&reports)?)?;

            for path in [&daily_path, &hourly_path] {
                println!("{}", path.display());
                println!("{}\n", writer.get_file_info(path)?.summary());
            }
            println!("Cleaning report: {}", report_path.display());
            info!(output_dir = %output_dir.display(), "Export complete");
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
