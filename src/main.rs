use clap::Parser;
use cmdr::app::{handle_fatal_error, init_logging, AppConfig};
use cmdr::cli::{execute_command, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::new(cli.verbose, cli.store) {
        Ok(config) => config,
        Err(e) => handle_fatal_error(e, cli.verbose),
    };
    init_logging(&config);

    if let Err(e) = execute_command(cli.command, &config).await {
        handle_fatal_error(e, config.verbose);
    }
}
