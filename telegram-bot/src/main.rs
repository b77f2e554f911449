//! moneywise binary: run the bot or print reports from the configured database.

use anyhow::Result;
use clap::Parser;
use moneywise_bot::{load_config, report_month, report_today, run_bot, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => {
            let config = load_config(token)?;
            run_bot(config).await
        }
        Commands::Today { user } => {
            let config = load_config(None)?;
            println!("{}", report_today(&config, user).await?);
            Ok(())
        }
        Commands::Month { user, year, month } => {
            let config = load_config(None)?;
            let period = year.zip(month);
            println!("{}", report_month(&config, user, period).await?);
            Ok(())
        }
    }
}
