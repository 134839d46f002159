//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use pricebook_core::currency::Rounding;

/// Currency conversion and price rounding.
#[derive(Parser, Debug)]
#[command(name = "pricer", version, about, long_about = None)]
pub struct Args {
    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List currencies and rate edges with the detected default currency
    Rates,

    /// Convert an amount between two currencies
    Convert {
        /// Amount to convert; non-numeric input counts as zero
        amount: String,

        /// Source currency code (defaults to the base currency)
        #[arg(long)]
        from: Option<String>,

        /// Target currency code
        #[arg(long)]
        to: String,

        /// Fail instead of printing zero when no rate exists
        #[arg(long)]
        strict: bool,
    },

    /// Round an amount with a precision and rounding policy
    Format {
        /// Amount to round; non-numeric input counts as zero
        amount: String,

        /// Decimal places
        #[arg(short, long, default_value_t = 0)]
        precision: u32,

        /// Rounding policy
        #[arg(short, long, value_enum, default_value_t = RoundingArg::RoundHalf)]
        rounding: RoundingArg,
    },

    /// Apply a markup schedule to a price
    Markup {
        /// Price to mark up; non-numeric input counts as zero
        value: String,

        /// Fee schedule as inline JSON or a path to a JSON file
        #[arg(short, long)]
        fee: String,
    },

    /// Create or replace a rate edge and its reverse (file source only)
    SetRate {
        /// Source currency code
        #[arg(long)]
        from: String,

        /// Target currency code
        #[arg(long)]
        to: String,

        /// Rate, 1 `from` = `rate` `to`
        #[arg(long)]
        rate: String,

        /// Commission in percent
        #[arg(long, default_value = "0")]
        commission: String,
    },

    /// Delete a rate edge and its reverse (file source only)
    DeleteRate {
        /// Source currency code
        #[arg(long)]
        from: String,

        /// Target currency code
        #[arg(long)]
        to: String,
    },

    /// Make a currency the platform default (file source only)
    SetDefault {
        /// Currency id
        id: i32,
    },

    /// Write an empty snapshot holding only the neutral unit
    Init {
        /// Snapshot path (defaults to `rates.path`)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

/// Rounding policy names accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RoundingArg {
    /// Half away from zero
    RoundHalf,
    /// Toward negative infinity
    RoundDown,
    /// Toward positive infinity
    RoundUp,
}

impl From<RoundingArg> for Rounding {
    fn from(arg: RoundingArg) -> Self {
        match arg {
            RoundingArg::RoundHalf => Self::RoundHalf,
            RoundingArg::RoundDown => Self::RoundDown,
            RoundingArg::RoundUp => Self::RoundUp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_format() {
        let args =
            Args::try_parse_from(["pricer", "format", "12.345", "-p", "2", "-r", "round-down"])
                .unwrap();
        match args.command {
            Commands::Format {
                amount,
                precision,
                rounding,
            } => {
                assert_eq!(amount, "12.345");
                assert_eq!(precision, 2);
                assert_eq!(Rounding::from(rounding), Rounding::RoundDown);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_convert_with_global_json() {
        let args =
            Args::try_parse_from(["pricer", "convert", "10", "--to", "EUR", "--json"]).unwrap();
        assert!(args.json);
        assert!(matches!(
            args.command,
            Commands::Convert { from: None, strict: false, .. }
        ));
    }

    #[test]
    fn test_help_needs_no_config() {
        // Parsing touches neither the environment nor config files.
        let err = Args::try_parse_from(["pricer", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
