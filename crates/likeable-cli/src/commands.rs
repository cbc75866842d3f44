//! Command handlers

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use likeable_common::{AppError, AppResult, LikeableConfig};
use likeable_core::{OwnerRef, Reaction};
use likeable_db::{create_pool, run_migrations, PgPool, PoolConfig};
use likeable_service::{AnonymousResolver, LikeableService, ServiceContext};
use serde_json::json;
use tracing::info;

use crate::{Command, OwnerArgs};

impl From<OwnerArgs> for OwnerRef {
    fn from(args: OwnerArgs) -> Self {
        OwnerRef::new(args.owner_type, args.owner_id)
    }
}

pub async fn execute(config: &LikeableConfig, command: Command, json: bool) -> anyhow::Result<()> {
    let pool = create_pool(&PoolConfig::from(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    if let Command::Migrate { dir } = &command {
        return migrate(&pool, dir, json).await;
    }

    let ctx = ServiceContext::postgres(pool, Arc::new(AnonymousResolver), config)
        .map_err(AppError::from)?;
    let service = LikeableService::new(&ctx);

    match command {
        // handled before the service context exists
        Command::Migrate { .. } => Ok(()),
        Command::Rebuild {
            owner_type,
            reaction_type,
        } => {
            let report = service
                .rebuild(&owner_type, &reaction_type)
                .await
                .map_err(AppError::from)?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string(&report).map_err(AppError::internal)?
                );
            } else {
                println!(
                    "rebuilt {} {} counters for {} from {} reactions",
                    report.counters, report.reaction_type, report.owner_type, report.reactions
                );
            }
            Ok(())
        }
        Command::Count {
            owner,
            reaction_type,
        } => {
            let owner = OwnerRef::from(owner);
            let count = service
                .like_count(&owner, &reaction_type)
                .await
                .map_err(AppError::from)?;
            if json {
                println!(
                    "{}",
                    json!({ "owner": owner, "reaction_type": reaction_type, "count": count })
                );
            } else {
                println!("{owner} {reaction_type}: {count}");
            }
            Ok(())
        }
        Command::List {
            owner,
            reaction_type,
            limit,
        } => {
            let owner = OwnerRef::from(owner);
            let reactions = service
                .reactions(&owner, &reaction_type, limit)
                .await
                .map_err(AppError::from)?;
            Ok(print_reactions(&reactions, json)?)
        }
        Command::Remove {
            owner,
            reaction_type,
            deleted,
        } => {
            let owner = OwnerRef::from(owner);
            let removed = if deleted {
                service.on_owner_deleted(&owner).await
            } else {
                service.remove_all(&owner, &reaction_type).await
            }
            .map_err(AppError::from)?;
            if json {
                println!("{}", json!({ "owner": owner, "removed": removed }));
            } else {
                println!("removed {removed} reactions from {owner}");
            }
            Ok(())
        }
    }
}

async fn migrate(pool: &PgPool, dir: &Path, json: bool) -> anyhow::Result<()> {
    run_migrations(pool, dir)
        .await
        .map_err(|e| AppError::Migration(e.to_string()))
        .with_context(|| format!("applying migrations from {}", dir.display()))?;

    info!(dir = %dir.display(), "Migrations complete");
    if json {
        println!("{}", json!({ "migrated": true, "dir": dir.display().to_string() }));
    } else {
        println!("migrations applied from {}", dir.display());
    }
    Ok(())
}

fn print_reactions(reactions: &[Reaction], json: bool) -> AppResult<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string(reactions).map_err(AppError::internal)?
        );
        return Ok(());
    }

    for reaction in reactions {
        println!(
            "{}\t{}\t{}\t{}",
            reaction.id,
            reaction.user_id,
            reaction.reaction_type,
            reaction.created_at.to_rfc3339()
        );
    }
    if reactions.is_empty() {
        println!("no reactions");
    }
    Ok(())
}
