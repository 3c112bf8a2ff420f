pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "fz")]
#[command(about = "foerderzeit admin CLI - calendars, companies, tokens and report exports")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "List public holidays of a year")]
    Holidays(commands::calendar::HolidaysArgs),

    #[command(about = "Count working days per month")]
    Workdays(commands::calendar::WorkdaysArgs),

    #[command(about = "Issue API tokens")]
    Token {
        #[command(subcommand)]
        cmd: commands::token::TokenCommands,
    },

    #[command(about = "Company registry management")]
    Company {
        #[command(subcommand)]
        cmd: commands::company::CompanyCommands,
    },

    #[command(about = "Database setup")]
    Db {
        #[command(subcommand)]
        cmd: commands::db::DbCommands,
    },

    #[command(about = "Export ZIM timesheets and FZul records to files")]
    Export {
        #[command(subcommand)]
        cmd: commands::export::ExportCommands,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Holidays(args) => commands::calendar::holidays(args, output_format),
        Commands::Workdays(args) => commands::calendar::workdays(args, output_format),
        Commands::Token { cmd } => commands::token::handle(cmd, output_format).await,
        Commands::Company { cmd } => commands::company::handle(cmd, output_format).await,
        Commands::Db { cmd } => commands::db::handle(cmd, output_format).await,
        Commands::Export { cmd } => commands::export::handle(cmd, output_format).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn json_flag_is_global() {
        let cli = Cli::try_parse_from(["fz", "holidays", "2024", "--json"]).unwrap();
        assert_eq!(OutputFormat::from_cli(&cli), OutputFormat::Json);
    }

    #[test]
    fn text_is_the_default_output() {
        let cli = Cli::try_parse_from(["fz", "workdays", "2024", "--month", "5", "--state", "BY"]).unwrap();
        assert_eq!(OutputFormat::from_cli(&cli), OutputFormat::Text);
    }

    #[test]
    fn export_requires_an_output_file() {
        let parsed = Cli::try_parse_from([
            "fz", "export", "fzul", "--company", "acme", "--employee",
            "00000000-0000-0000-0000-000000000001", "--year", "2024",
        ]);
        assert!(parsed.is_err());
    }
}
