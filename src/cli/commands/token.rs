use anyhow::Context;
use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::auth::{generate_jwt, Claims};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config;
use crate::database::models::Employee;
use crate::database::{DatabaseManager, Repository};
use crate::services::CompanyService;
use crate::types::Role;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Issue a bearer token for an employee")]
    Issue {
        #[arg(long, help = "Company slug")]
        company: String,

        #[arg(long, help = "Employee id")]
        employee: Uuid,

        #[arg(long, help = "Expected role; must match the stored role")]
        role: Option<Role>,
    },
}

pub async fn handle(cmd: TokenCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TokenCommands::Issue { company, employee, role } => {
            let company = CompanyService::new().await?.require(&company).await?;
            if !company.is_active {
                anyhow::bail!("Company '{}' is deactivated", company.slug);
            }

            let pool = DatabaseManager::tenant_pool(&company.database).await?;
            let employee: Employee = Repository::<Employee>::new(pool)
                .select_one(employee)
                .await?
                .with_context(|| format!("Employee {} not found in '{}'", employee, company.slug))?;

            // The server rejects tokens whose role differs from the stored one
            if let Some(role) = role {
                if role != employee.role {
                    anyhow::bail!(
                        "{} has role {}, not {}; update the employee first",
                        employee.full_name(),
                        employee.role,
                        role
                    );
                }
            }

            let claims = Claims::new(employee.id, company.slug.clone(), company.database.clone(), employee.role);
            let token = generate_jwt(&claims)?;

            match output_format {
                OutputFormat::Text => println!("{}", token),
                OutputFormat::Json => output_success(
                    output_format,
                    &format!("Token issued for {}", employee.full_name()),
                    Some(json!({
                        "token": token,
                        "company": company.slug,
                        "employee_id": employee.id,
                        "role": employee.role,
                        "expires_in_hours": config::config().security.jwt_expiry_hours,
                    })),
                )?,
            }
            Ok(())
        }
    }
}
