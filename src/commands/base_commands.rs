use chrono::Local;
use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "period-forecast", author, version, about)]
pub struct CliArgs {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Forecast the chance of a period on each day of a month
    Forecast {
        /// Start date of the last period (YYYY-MM-DD)
        #[arg(short, long)]
        last_period: Option<String>,
        /// Average cycle length in days
        #[arg(short, long)]
        cycle_length: Option<String>,
        /// Average period length in days
        #[arg(short, long)]
        period_length: Option<String>,
        /// Number of simulations [default: 10000]
        #[arg(short = 'n', long)]
        simulations: Option<String>,
        /// YAML cycle profile providing defaults for the values above
        #[arg(long)]
        profile: Option<String>,
        /// Month to forecast (YYYY-MM) [default: next month]
        #[arg(short, long)]
        month: Option<String>,
        /// Number of consecutive months to forecast
        #[arg(long, default_value_t = 1)]
        months: usize,
        /// Seed for reproducible forecasts
        #[arg(short, long)]
        seed: Option<u64>,
        /// Use the average lengths for every simulation
        #[arg(long)]
        no_jitter: bool,
        /// Number of worker threads
        #[arg(short, long)]
        threads: Option<usize>,
        /// Output report file (.json for JSON, YAML otherwise)
        #[arg(short, long)]
        output: Option<String>,
        /// Output PNG heat map
        #[arg(long)]
        plot: Option<String>,
        /// Show a progress bar while simulating
        #[arg(long)]
        progress: bool,
    },
    /// Show the first and last day of a month relative to a date
    Window {
        /// Anchor date (YYYY-MM-DD)
        #[arg(short, long, default_value_t = default_anchor_date())]
        anchor: String,
        /// Months to move from the anchor's month
        #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i64,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub const DEFAULT_SIMULATIONS: &str = "10000";

fn default_anchor_date() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_defaults_anchor_to_today() {
        let args = CliArgs::parse_from(["period-forecast", "window"]);

        if let Commands::Window { anchor, offset } = args.command {
            assert_eq!(anchor, default_anchor_date());
            assert_eq!(offset, 0);
        } else {
            panic!("expected window command");
        }
    }

    #[test]
    fn window_accepts_negative_offsets() {
        let args = CliArgs::parse_from(["period-forecast", "window", "-o", "-13"]);

        if let Commands::Window { offset, .. } = args.command {
            assert_eq!(offset, -13);
        } else {
            panic!("expected window command");
        }
    }

    #[test]
    fn forecast_leaves_missing_inputs_unset() {
        let args = CliArgs::parse_from(["period-forecast", "-vv", "forecast", "-c", "28"]);

        assert_eq!(args.verbose, 2);
        if let Commands::Forecast {
            last_period,
            cycle_length,
            simulations,
            months,
            no_jitter,
            ..
        } = args.command
        {
            assert_eq!(last_period, None);
            assert_eq!(cycle_length.as_deref(), Some("28"));
            assert_eq!(simulations, None);
            assert_eq!(months, 1);
            assert!(!no_jitter);
        } else {
            panic!("expected forecast command");
        }
    }
}
