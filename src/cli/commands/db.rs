use clap::Subcommand;
use serde_json::json;
use sqlx::{Executor, PgPool};

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::database::DatabaseManager;

const MAIN_SQL: &str = include_str!("../../../sql/main.sql");
const TENANT_SQL: &str = include_str!("../../../sql/tenant.sql");

#[derive(Subcommand)]
pub enum DbCommands {
    #[command(about = "Create the registry and template databases and apply their schemas")]
    Init,
}

/// Creates the database when missing, then applies the (idempotent) schema
async fn ensure(name: &str, schema: &str) -> anyhow::Result<bool> {
    let created = if DatabaseManager::database_exists(name).await? {
        false
    } else {
        DatabaseManager::create_database(name).await?;
        true
    };

    let pool: PgPool = if name == DatabaseManager::SYSTEM_DB_NAME {
        DatabaseManager::main_pool().await?
    } else {
        DatabaseManager::template_pool().await?
    };
    // Multi-statement scripts need the simple query protocol, which plain &str uses
    (&pool).execute(schema).await?;
    Ok(created)
}

pub async fn handle(cmd: DbCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        DbCommands::Init => {
            let main_created = ensure(DatabaseManager::SYSTEM_DB_NAME, MAIN_SQL).await?;
            let template_created = ensure(DatabaseManager::TEMPLATE_DB_NAME, TENANT_SQL).await?;
            DatabaseManager::close_all().await;

            output_success(
                output_format,
                "Databases initialized",
                Some(json!({
                    "main": { "name": DatabaseManager::SYSTEM_DB_NAME, "created": main_created },
                    "template": { "name": DatabaseManager::TEMPLATE_DB_NAME, "created": template_created },
                })),
            )
        }
    }
}
