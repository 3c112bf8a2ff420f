//! Encoders turning laid-out forms into downloadable files.

pub mod pdf;
pub mod xlsx;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::layout;
use crate::report::{FzulReport, ZimTimesheet};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF encoding failed: {0}")]
    Pdf(String),

    #[error("Excel encoding failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Pdf,
    Xlsx,
    Json,
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            ExportFormat::Json => "application/json",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("unknown export format '{}' (expected pdf, xlsx or json)", other)),
        }
    }
}

/// An encoded report ready to be sent or written to disk
#[derive(Debug, Clone)]
pub struct Rendered {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

pub fn zim(timesheet: &ZimTimesheet, format: ExportFormat) -> Result<Rendered, RenderError> {
    let bytes = match format {
        ExportFormat::Pdf => pdf::render(&layout::zim::document(timesheet))?,
        ExportFormat::Xlsx => xlsx::render(&[layout::zim::sheet(timesheet)])?,
        ExportFormat::Json => serde_json::to_vec_pretty(timesheet)?,
    };
    Ok(Rendered { file_name: timesheet.file_name(format), content_type: format.content_type(), bytes })
}

pub fn fzul(report: &FzulReport, format: ExportFormat) -> Result<Rendered, RenderError> {
    let bytes = match format {
        ExportFormat::Pdf => pdf::render(&layout::fzul::document(report))?,
        ExportFormat::Xlsx => xlsx::render(&layout::fzul::sheets(report))?,
        ExportFormat::Json => serde_json::to_vec_pretty(report)?,
    };
    Ok(Rendered { file_name: report.file_name(format), content_type: format.content_type(), bytes })
}

/// ASCII-only file name part: umlauts transliterated, everything else
/// outside `[A-Za-z0-9-]` replaced by `_`
pub fn file_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.trim().chars() {
        match c {
            'ä' => out.push_str("ae"),
            'ö' => out.push_str("oe"),
            'ü' => out.push_str("ue"),
            'Ä' => out.push_str("Ae"),
            'Ö' => out.push_str("Oe"),
            'Ü' => out.push_str("Ue"),
            'ß' => out.push_str("ss"),
            c if c.is_ascii_alphanumeric() || c == '-' => out.push(c),
            _ => out.push('_'),
        }
    }
    if out.is_empty() {
        out.push('_');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_formats() {
        assert_eq!("PDF".parse::<ExportFormat>(), Ok(ExportFormat::Pdf));
        assert_eq!("excel".parse::<ExportFormat>(), Ok(ExportFormat::Xlsx));
        assert_eq!(" json ".parse::<ExportFormat>(), Ok(ExportFormat::Json));
        assert!("csv".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::default(), ExportFormat::Pdf);
        assert_eq!(ExportFormat::Xlsx.extension(), "xlsx");
        assert_eq!(ExportFormat::Pdf.content_type(), "application/pdf");
    }

    #[test]
    fn file_components_are_ascii() {
        assert_eq!(file_component("Müller-Lüdenscheidt"), "Mueller-Luedenscheidt");
        assert_eq!(file_component("Straße 1/2"), "Strasse_1_2");
        assert_eq!(file_component(""), "_");
    }
}
