use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod commands;

use commands::{forecast, serve};

#[derive(Parser)]
#[command(name = "stockcast")]
#[command(about = "Stock price forecasting dashboard with CLI tools and web server")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve,
    /// Fetch one ticker, run the forecast and print the summary
    Forecast {
        /// Security symbol, e.g. AAPL or RELIANCE.NS
        ticker: String,
        /// Forecast horizon in years (1-4)
        #[arg(short, long, default_value_t = 1)]
        years: u8,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Serve => {
                serve().await?;
            }
            Commands::Forecast { ticker, years } => {
                forecast(&ticker, years).await?;
            }
        }
        Ok(())
    }
}
