//! TrustDoc CLI - Command-line interface for trust document processing.

use clap::Parser;
use tracing_subscriber::EnvFilter;
use trustdoc_cli::commands;
use trustdoc_cli::{error_json, Cli, Command, Config, Formatter};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        // Structured error on stdout, so callers parsing stdout see it
        println!("{}", error_json(&e));
        std::process::exit(1);
    }
}

/// Log to stderr; stdout is reserved for command output
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> trustdoc_cli::Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Process(args) => {
            let template = config.template(cli.template.as_deref())?;
            commands::execute_process(args, &config, template, &formatter).await?;
        }
        Command::Resolve(args) => {
            commands::execute_resolve(args, &formatter).await?;
        }
        Command::Citations(args) => {
            commands::execute_citations(args, &formatter).await?;
        }
        Command::Template(args) => {
            let template = config.template(cli.template.as_deref())?;
            commands::execute_template(args, &template, &formatter).await?;
        }
        Command::Config(args) => {
            commands::execute_config(args, &config, cli.config.as_deref(), &formatter).await?;
        }
    }

    Ok(())
}
