use anyhow::Result;

#[macro_use]
mod utils;

mod account;
mod bank;
mod category;
mod cli;
mod config;
mod group;
mod name;
mod provider;
mod server;
mod transactions;

#[cfg(test)]
pub mod test;

use cli::Commands;
use config::Config;

fn main() -> Result<()> {
    let config = Config::try_parse()?;
    init_logger(config.log_level_filter())?;

    let Some(command) = config.command() else {
        anyhow::bail!("No command provided, see --help");
    };

    match command {
        Commands::Bank { command } => bank::run(&config, command),
        Commands::Account { command } => account::run(&config, command),
        Commands::Category { command } => category::run(&config, command),
        Commands::Group { command } => group::run(&config, command),
        Commands::Name { command } => name::run(&config, command),
        Commands::Transactions { command } => transactions::run(&config, command),
        Commands::Provider { command } => provider::run(&config, command),
        Commands::Server(args) => server::run(&config, args),
        Commands::Reset { confirm } => {
            utils::require_confirmation(*confirm)?;
            let mut db = banksync::Database::from(config.database()?);
            db.reset()?;
            log::info!("Database reset");
            Ok(())
        }
    }
}

fn init_logger(level: log::LevelFilter) -> Result<()> {
    use systemd_journal_logger::{connected_to_journal, JournalLog};

    if connected_to_journal() {
        JournalLog::new()?
            .with_extra_fields(vec![("VERSION", env!("CARGO_PKG_VERSION"))])
            .install()?;
    } else {
        env_logger::Builder::new()
            .filter_level(level)
            .format_timestamp(None)
            .try_init()?;
    }
    log::set_max_level(level);

    Ok(())
}
