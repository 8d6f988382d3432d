use clap::Parser;
use regseal::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    // Logs go to stderr; stdout is reserved for envelopes and plaintext.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("regseal=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Encrypt { ref text } => {
            regseal::cli::commands::encrypt::execute(&cli, text.as_deref())
        }
        Commands::Decrypt { ref envelope } => {
            regseal::cli::commands::decrypt::execute(&cli, envelope.as_deref())
        }
        Commands::Inspect { ref envelope, json } => {
            regseal::cli::commands::inspect::execute(&cli, envelope.as_deref(), json)
        }
        Commands::SealKey {
            ref input,
            ref output,
            iterations,
        } => regseal::cli::commands::seal_key::execute(&cli, input, output, iterations),
        Commands::Completions { shell } => regseal::cli::commands::completions::execute(shell),
    };

    if let Err(e) = result {
        regseal::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
