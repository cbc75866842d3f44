//! likeablectl entry point
//!
//! Run with:
//! ```bash
//! cargo run -p likeable-cli -- rebuild --owner-type post
//! ```
//!
//! Configuration is loaded from environment variables (and `.env`).

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use likeable_common::{try_init_tracing, AppError, ErrorResponse, LikeableConfig, TracingConfig};
use likeable_core::ReactionType;
use tracing::{error, warn, Level};

#[derive(Parser)]
#[command(name = "likeablectl")]
#[command(about = "Maintenance CLI for likeable reaction counters")]
#[command(version)]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    /// Log at info level instead of warn (RUST_LOG still wins)
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Clone, Debug)]
struct OwnerArgs {
    /// Owner type tag, e.g. "post"
    #[arg(long)]
    owner_type: String,

    /// Owner record id
    #[arg(long)]
    owner_id: i64,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply pending schema migrations
    Migrate {
        /// Directory holding the SQL migrations
        #[arg(long, env = "LIKEABLE_MIGRATIONS_DIR", default_value = "migrations")]
        dir: PathBuf,
    },
    /// Recompute counters of one owner type from the reaction log
    Rebuild {
        /// Owner type tag
        #[arg(long)]
        owner_type: String,

        /// Reaction type
        #[arg(long = "type", default_value = ReactionType::LIKE)]
        reaction_type: ReactionType,
    },
    /// Show the counter of one owner
    Count {
        #[command(flatten)]
        owner: OwnerArgs,

        /// Reaction type
        #[arg(long = "type", default_value = ReactionType::LIKE)]
        reaction_type: ReactionType,
    },
    /// List the most recent reactions on one owner
    List {
        #[command(flatten)]
        owner: OwnerArgs,

        /// Reaction type
        #[arg(long = "type", default_value = ReactionType::LIKE)]
        reaction_type: ReactionType,

        /// Maximum rows (1-100)
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },
    /// Remove reactions and the counter of one owner
    Remove {
        #[command(flatten)]
        owner: OwnerArgs,

        /// Reaction type
        #[arg(long = "type", default_value = ReactionType::LIKE, conflicts_with = "deleted")]
        reaction_type: ReactionType,

        /// Run the owner-deleted cascade instead (honors keep-on-delete settings)
        #[arg(long, default_value_t = false)]
        deleted: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let json = cli.json;

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let app_error = e.downcast_ref::<AppError>();
            if app_error.is_some_and(AppError::is_client_error) {
                warn!(error = %e, "Command rejected");
            } else {
                error!(error = %e, "Command failed");
            }

            match app_error.filter(|_| json) {
                Some(app_error) => eprintln!("{}", error_json(app_error)),
                None => eprintln!("error: {e:#}"),
            }

            let code = app_error.map_or(1, AppError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn error_json(err: &AppError) -> String {
    serde_json::to_string(&ErrorResponse::from(err))
        .unwrap_or_else(|_| format!("{{\"code\":\"{}\"}}", err.error_code()))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = LikeableConfig::from_env().map_err(AppError::from)?;

    let mut tracing_config = TracingConfig::from_app_config(&config);
    if !cli.verbose {
        tracing_config = tracing_config.with_level(Level::WARN);
    }
    if let Err(e) = try_init_tracing(&tracing_config) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    commands::execute(&config, cli.command, cli.json).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_rebuild_defaults_to_like() {
        let cli = Cli::try_parse_from(["likeablectl", "rebuild", "--owner-type", "post"]).unwrap();
        match cli.command {
            Command::Rebuild {
                owner_type,
                reaction_type,
            } => {
                assert_eq!(owner_type, "post");
                assert!(reaction_type.is_like());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_empty_type() {
        let result = Cli::try_parse_from([
            "likeablectl",
            "count",
            "--owner-type",
            "post",
            "--owner-id",
            "1",
            "--type",
            " ",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_error_json_carries_code() {
        let out = error_json(&AppError::Config("DATABASE_URL missing".into()));
        assert!(out.contains("CONFIG_ERROR"));
        assert!(out.contains("DATABASE_URL missing"));
    }

    #[test]
    fn test_remove_deleted_conflicts_with_type() {
        let result = Cli::try_parse_from([
            "likeablectl",
            "--json",
            "remove",
            "--owner-type",
            "post",
            "--owner-id",
            "1",
            "--type",
            "dislike",
            "--deleted",
        ]);
        assert!(result.is_err());
    }
}
