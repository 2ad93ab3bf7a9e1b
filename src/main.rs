use clap::Parser;

use votepilot::adapter::inbound::cli::command::{Cli, Commands, ConfigCommand};
use votepilot::adapter::inbound::cli::output::{self, OutputConfig};
use votepilot::adapter::inbound::cli::{config, contests, run};
use votepilot::error::Result;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.verbose), cli.color);

    if let Err(e) = dispatch(&cli).await {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}

async fn dispatch(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Run(args) => run::execute(args).await,
        Commands::Contests(args) => contests::execute(args).await,
        Commands::Config(ConfigCommand::Validate(args)) => config::execute_validate(&args.config),
        Commands::Config(ConfigCommand::Show(args)) => config::execute_show(&args.config),
    }
}
