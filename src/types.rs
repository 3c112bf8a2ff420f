//! Shared types used across the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Authorization role of an employee inside a company.
/// Ordered: employee < manager < company_admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "employee_role", rename_all = "snake_case")]
pub enum Role {
    Employee,
    Manager,
    CompanyAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::Manager => "manager",
            Role::CompanyAdmin => "company_admin",
        }
    }

    /// True when this role grants at least the rights of `required`
    pub fn at_least(&self, required: Role) -> bool {
        *self >= required
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "employee" => Ok(Role::Employee),
            "manager" => Ok(Role::Manager),
            "company_admin" | "admin" => Ok(Role::CompanyAdmin),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// Public funding scheme a project is booked against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "funding_program", rename_all = "snake_case")]
pub enum FundingProgram {
    /// Forschungszulage (R&D tax credit)
    Fzul,
    /// Zentrales Innovationsprogramm Mittelstand
    Zim,
    /// Internal or otherwise unfunded project
    None,
}

impl FundingProgram {
    pub fn label(&self) -> &'static str {
        match self {
            FundingProgram::Fzul => "Forschungszulage",
            FundingProgram::Zim => "ZIM",
            FundingProgram::None => "ohne Förderung",
        }
    }
}

/// Kind of a full-day absence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "absence_kind", rename_all = "snake_case")]
pub enum AbsenceKind {
    Vacation,
    Sickness,
    SpecialLeave,
    ShortTime,
}

impl AbsenceKind {
    pub const ALL: [AbsenceKind; 4] =
        [AbsenceKind::Vacation, AbsenceKind::Sickness, AbsenceKind::SpecialLeave, AbsenceKind::ShortTime];

    pub fn label(&self) -> &'static str {
        match self {
            AbsenceKind::Vacation => "Urlaub",
            AbsenceKind::Sickness => "Krankheit",
            AbsenceKind::SpecialLeave => "Sonderurlaub",
            AbsenceKind::ShortTime => "Kurzarbeit",
        }
    }

    /// Code printed in the absence column of the timesheet forms
    pub fn code(&self) -> &'static str {
        match self {
            AbsenceKind::Vacation => "U",
            AbsenceKind::Sickness => "K",
            AbsenceKind::SpecialLeave => "S",
            AbsenceKind::ShortTime => "KA",
        }
    }
}

/// Code printed for public holidays in the absence column
pub const HOLIDAY_CODE: &str = "F";
