use clap::Parser;
use lpreport::cli::{Cli, Commands};
use lpreport::vault::LpassClient;

fn main() {
    let cli = Cli::parse();

    // Logging is configured before anything else; a broken config file
    // stops the run here.
    if let Err(e) = lpreport::logging::init(cli.log_level, cli.log_config.as_deref()) {
        lpreport::cli::output::error(&e.to_string());
        std::process::exit(1);
    }

    let client = LpassClient::new();
    let result = match cli.command {
        Commands::Report(ref args) => lpreport::cli::commands::report::execute(&client, &cli, args),
        Commands::Export { ref filename } => {
            lpreport::cli::commands::export::execute(&client, &cli, filename)
        }
        Commands::Completions { ref shell } => lpreport::cli::commands::completions::execute(shell),
    };

    if let Err(e) = result {
        lpreport::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
