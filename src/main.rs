mod cli;
mod error;
mod evidence;
mod fmt;
mod importer;
mod models;
mod reconciler;
mod refdata;
mod settings;
mod template;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir, system } => cli::init::run(data_dir, system),
        Commands::Import {
            file,
            accounts,
            existing,
            counterparties,
            target,
            system,
            plan,
        } => cli::import::run(
            &file,
            &accounts,
            existing.as_deref(),
            counterparties.as_deref(),
            &target,
            system.as_deref(),
            plan.as_deref(),
        ),
        Commands::Template { output, from, system } => {
            cli::template::run(output.as_deref(), from.as_deref(), system.as_deref())
        }
        Commands::Evidence => cli::evidence::run(),
        Commands::Demo => cli::demo::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
