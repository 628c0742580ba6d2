use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bikeshare-analytics")]
#[command(about = "Bike-sharing rental analytics for dashboards")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Configuration file (TOML, YAML or JSON)")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Daily source CSV [default: day.csv]")]
    pub daily: Option<PathBuf>,

    #[arg(long, global = true, help = "Hourly source CSV [default: hour.csv]")]
    pub hourly: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Suppress the progress spinner")]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render every dashboard view for one selection
    Dashboard {
        #[arg(short, long, default_value = "all", help = "all, working or off")]
        day_type: String,

        #[arg(
            short,
            long,
            default_value = "all",
            help = "all, clear, misty or light-precipitation"
        )]
        weather: String,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show summary statistics and cleaning reports
    Summary {
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show the average hourly rental profile with peak hours
    Profile {
        #[arg(short, long, default_value = "all", help = "all, working or off")]
        day_type: String,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show the weather correlation matrix
    Correlation {
        #[arg(
            short,
            long,
            default_value = "all",
            help = "all, clear, misty or light-precipitation"
        )]
        weather: String,

        #[arg(
            long,
            value_delimiter = ',',
            help = "Fields to correlate with rental_count [default: from config]"
        )]
        fields: Vec<String>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Export the cleaned tables to Parquet
    Export {
        #[arg(
            short,
            long,
            help = "Output directory [default: output/bikeshare-{YYMMDD}]"
        )]
        output_dir: Option<PathBuf>,

        #[arg(long, default_value = "snappy", help = "snappy, gzip, lz4, zstd or none")]
        compression: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_dashboard() {
        let cli = Cli::try_parse_from([
            "bikeshare-analytics",
            "--daily",
            "data/day.csv",
            "dashboard",
            "--day-type",
            "working",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.daily, Some(PathBuf::from("data/day.csv")));
        match cli.command {
            Commands::Dashboard {
                day_type,
                weather,
                format,
            } => {
                assert_eq!(day_type, "working");
                assert_eq!(weather, "all");
                assert_eq!(format, OutputFormat::Json);
            }
            _ => panic!("expected dashboard command"),
        }
    }

    #[test]
    fn test_parse_correlation_fields() {
        let cli = Cli::try_parse_from([
            "bikeshare-analytics",
            "correlation",
            "--fields",
            "temp,hum",
            "-q",
        ])
        .unwrap();

        assert!(cli.quiet);
        match cli.command {
            Commands::Correlation { fields, .. } => assert_eq!(fields, vec!["temp", "hum"]),
            _ => panic!("expected correlation command"),
        }
    }
}
