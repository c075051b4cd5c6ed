pub mod logging;
pub mod report;

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing::info;

use crate::services::{
    build_month_grid, load_month, CalendarClient, Config, ItemIndex, MockClient, RetryPolicy,
};
use crate::types::Month;
use report::DayReport;

/// Terminal month calendar for appointments, events and goals
#[derive(Parser)]
#[command(name = "daygrid")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.daygrid/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch interactive calendar (default)
    Tui,

    /// Print a month grid
    Month {
        /// Month to show as YYYY-MM (default: current month)
        #[arg(long, value_name = "YYYY-MM")]
        month: Option<Month>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the appointments and events of a day
    Day {
        /// Day as YYYY-MM-DD
        date: NaiveDate,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let config = Config::load(self.config.as_deref())?;
        let client: Arc<dyn CalendarClient> = Arc::new(MockClient::from_config(&config.client));
        let retry = RetryPolicy::from_config(&config.retry);
        let today = Local::now().date_naive();

        match self.command.unwrap_or(Commands::Tui) {
            Commands::Tui => {
                logging::init_file(&config.log_file()?, &config.log.filter)?;
                info!("starting calendar");
                crate::tui::run(&config, client)
            }
            Commands::Month { month, json } => {
                logging::init_stderr(&config.log.filter)?;
                let month = month.unwrap_or_else(|| Month::containing(today));
                let index = ItemIndex::from_items(load_month(client.as_ref(), month, retry)?);
                let grid = build_month_grid(month, today, index.items());
                if json {
                    println!("{}", serde_json::to_string_pretty(&grid)?);
                } else {
                    print!("{}", report::month_text(&grid));
                }
                Ok(())
            }
            Commands::Day { date, json } => {
                logging::init_stderr(&config.log.filter)?;
                let month = Month::containing(date);
                let index = ItemIndex::from_items(load_month(client.as_ref(), month, retry)?);
                let day = DayReport::new(&index, date);
                if json {
                    println!("{}", serde_json::to_string_pretty(&day)?);
                } else {
                    print!("{}", report::day_text(&day));
                }
                Ok(())
            }
        }
    }
}
