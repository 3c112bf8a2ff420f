use chrono::NaiveDate;
use clap::Subcommand;
use rust_decimal::Decimal;
use serde_json::json;

use crate::auth::{generate_jwt, Claims};
use crate::calendar::FederalState;
use crate::cli::utils::{output_data, output_empty_collection, output_success};
use crate::cli::OutputFormat;
use crate::database::models::Company;
use crate::database::repository::employees::NewEmployee;
use crate::services::company_service::{NewCompany, Registration};
use crate::services::CompanyService;
use crate::types::Role;

#[derive(Subcommand)]
pub enum CompanyCommands {
    #[command(about = "Register a company with its first company_admin")]
    Create {
        #[arg(help = "Company name")]
        name: String,

        #[arg(long, help = "URL slug (derived from the name when omitted)")]
        slug: Option<String>,

        #[arg(long, help = "Federal state of the company seat")]
        state: FederalState,

        #[arg(long, help = "Company is not an SME (lower FZul rate)")]
        no_sme: bool,

        #[arg(long, help = "Admin first name")]
        admin_first_name: String,

        #[arg(long, help = "Admin last name")]
        admin_last_name: String,

        #[arg(long, help = "Admin email")]
        admin_email: String,

        #[arg(long, help = "Admin employment start (YYYY-MM-DD, default today)")]
        admin_start: Option<NaiveDate>,

        #[arg(long, help = "Admin is a company owner without salary")]
        admin_owner: bool,
    },

    #[command(about = "List registered companies")]
    List,

    #[command(about = "Show one company")]
    Show {
        #[arg(help = "Company slug")]
        slug: String,
    },

    #[command(about = "Deactivate a company; its tokens stop working")]
    Deactivate {
        #[arg(help = "Company slug")]
        slug: String,
    },
}

fn print_company(company: &Company) {
    println!("Name:     {}", company.name);
    println!("Slug:     {}", company.slug);
    println!("Database: {}", company.database);
    println!("State:    {} ({})", company.federal_state.name(), company.federal_state.code());
    println!("SME:      {}", if company.is_sme { "yes" } else { "no" });
    println!("Active:   {}", if company.is_active { "yes" } else { "no" });
    println!("Created:  {}", company.created_at.format("%Y-%m-%d %H:%M"));
}

pub async fn handle(cmd: CompanyCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let service = CompanyService::new().await?;

    match cmd {
        CompanyCommands::Create {
            name,
            slug,
            state,
            no_sme,
            admin_first_name,
            admin_last_name,
            admin_email,
            admin_start,
            admin_owner,
        } => {
            let admin = NewEmployee {
                first_name: admin_first_name,
                last_name: admin_last_name,
                email: admin_email,
                personnel_number: None,
                role: Role::CompanyAdmin,
                weekly_hours: Decimal::from(40),
                workdays_per_week: 5,
                annual_salary: Decimal::ZERO,
                employer_contributions: Decimal::ZERO,
                is_owner: admin_owner,
                employment_start: admin_start.unwrap_or_else(|| chrono::Local::now().date_naive()),
                employment_end: None,
                federal_state: None,
            };

            let Registration { company, admin } = service
                .register(NewCompany { name, slug, federal_state: state, is_sme: !no_sme, admin })
                .await?;

            let claims = Claims::new(admin.id, company.slug.clone(), company.database.clone(), admin.role);
            let token = generate_jwt(&claims)?;

            output_success(
                output_format,
                &format!("Company '{}' registered in {}", company.slug, company.database),
                Some(json!({ "company": company, "admin": admin, "token": token })),
            )?;
            if output_format == OutputFormat::Text {
                println!("Admin:  {} ({})", admin.full_name(), admin.id);
                println!("Token:  {}", token);
            }
            Ok(())
        }
        CompanyCommands::List => {
            let companies = service.list().await?;
            if companies.is_empty() {
                return output_empty_collection(output_format, "companies", "No companies registered");
            }

            output_data(output_format, &companies, |companies| {
                println!("{:<20} {:<30} {:<24} {:<6} {}", "SLUG", "NAME", "DATABASE", "STATE", "ACTIVE");
                println!("{}", "-".repeat(90));
                for c in companies {
                    println!(
                        "{:<20} {:<30} {:<24} {:<6} {}",
                        c.slug,
                        c.name,
                        c.database,
                        c.federal_state.code(),
                        if c.is_active { "yes" } else { "no" }
                    );
                }
            })
        }
        CompanyCommands::Show { slug } => {
            let company = service.require(&slug).await?;
            output_data(output_format, &company, print_company)
        }
        CompanyCommands::Deactivate { slug } => {
            let company = service.deactivate(&slug).await?;
            output_success(
                output_format,
                &format!("Company '{}' deactivated", company.slug),
                Some(json!({ "company": company })),
            )
        }
    }
}
