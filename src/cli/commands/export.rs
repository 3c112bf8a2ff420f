use std::path::PathBuf;

use anyhow::Context;
use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::database::DatabaseManager;
use crate::render::{ExportFormat, Rendered};
use crate::services::{CompanyService, ReportService};

#[derive(Subcommand)]
pub enum ExportCommands {
    #[command(about = "Monthly ZIM timesheet of one employee on one project")]
    Zim {
        #[arg(long, help = "Company slug")]
        company: String,

        #[arg(long, help = "Project id")]
        project: Uuid,

        #[arg(long, help = "Employee id")]
        employee: Uuid,

        #[arg(long)]
        year: i32,

        #[arg(long)]
        month: u32,

        #[arg(long, default_value = "pdf", help = "pdf, xlsx or json")]
        format: ExportFormat,

        #[arg(long, help = "Leave out the personnel cost line")]
        no_costs: bool,

        #[arg(long, help = "Output file; a directory keeps the generated file name")]
        out: PathBuf,
    },

    #[command(about = "Annual FZul record of one employee")]
    Fzul {
        #[arg(long, help = "Company slug")]
        company: String,

        #[arg(long, help = "Employee id")]
        employee: Uuid,

        #[arg(long)]
        year: i32,

        #[arg(long, default_value = "pdf", help = "pdf, xlsx or json")]
        format: ExportFormat,

        #[arg(long, help = "Output file; a directory keeps the generated file name")]
        out: PathBuf,
    },
}

fn write(rendered: &Rendered, out: PathBuf, output_format: OutputFormat) -> anyhow::Result<()> {
    let path = if out.is_dir() { out.join(&rendered.file_name) } else { out };
    std::fs::write(&path, &rendered.bytes).with_context(|| format!("failed to write {}", path.display()))?;

    output_success(
        output_format,
        &format!("Wrote {} ({} bytes)", path.display(), rendered.bytes.len()),
        Some(json!({ "path": path, "bytes": rendered.bytes.len(), "content_type": rendered.content_type })),
    )
}

pub async fn handle(cmd: ExportCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ExportCommands::Zim { company, project, employee, year, month, format, no_costs, out } => {
            let company = CompanyService::new().await?.require(&company).await?;
            let pool = DatabaseManager::tenant_pool(&company.database).await?;
            let rendered = ReportService::new(pool, &company)
                .zim_export(project, employee, year, month, !no_costs, format)
                .await?;
            write(&rendered, out, output_format)
        }
        ExportCommands::Fzul { company, employee, year, format, out } => {
            let company = CompanyService::new().await?.require(&company).await?;
            let pool = DatabaseManager::tenant_pool(&company.database).await?;
            let rendered = ReportService::new(pool, &company).fzul_export(employee, year, format).await?;
            write(&rendered, out, output_format)
        }
    }
}
