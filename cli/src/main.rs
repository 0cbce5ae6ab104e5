//! Command-line entry point: converts `.proto` files to `.gunk` files.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use gunk_generator::{ConvertOptions, run};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "proto2gunk")]
#[command(about = "Convert proto files to Gunk")]
struct Cli {
    /// Overwrite existing .gunk files
    #[arg(long)]
    overwrite: bool,

    /// Proto files, or directories holding them
    #[arg(required = true)]
    paths: Vec<PathBuf>,
}

fn main() -> ExitCode {
    // Plain lines on stderr, so diagnostics read as `file:line:col: ...`.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .with_level(false)
        .init();

    let cli = Cli::parse();
    let options = ConvertOptions {
        overwrite: cli.overwrite,
    };

    match run(&cli.paths, &options) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_overwrite_and_paths() {
        let cli = Cli::try_parse_from(["proto2gunk", "--overwrite", "a.proto", "protos"])
            .expect("arguments should parse");
        assert!(cli.overwrite);
        assert_eq!(cli.paths, vec![PathBuf::from("a.proto"), PathBuf::from("protos")]);
    }

    #[test]
    fn requires_at_least_one_path() {
        assert!(Cli::try_parse_from(["proto2gunk"]).is_err());
    }
}
