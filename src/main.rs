use clap::Parser;
use pinote::cli::commands::{cmd_anchor, cmd_path, cmd_resolve, write_output};
use pinote::cli::config::{Cli, Commands, build_resolver_config, load_config};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Anchor {
            snapshot,
            target,
            comment,
        } => {
            let json = cmd_anchor(&snapshot, &target, comment.as_deref(), &config)?;
            write_output(&json, None)?;
        }
        Commands::Resolve {
            snapshot,
            annotations,
            format,
            output,
            position_tolerance,
        } => {
            let resolver = build_resolver_config(&config, position_tolerance);
            let rendered = cmd_resolve(&snapshot, &annotations, &format, &resolver)?;
            write_output(&rendered, output.as_deref())?;
        }
        Commands::Path { snapshot, target } => {
            let path = cmd_path(&snapshot, &target)?;
            write_output(&path, None)?;
        }
    }

    Ok(())
}
