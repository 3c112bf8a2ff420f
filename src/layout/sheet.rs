//! Spreadsheet model for the Excel variant of the forms.
//!
//! Cells are addressed zero-based as `(row, col)`; form positions are kept as
//! anchor constants and can be printed in A1 notation with [`to_a1`].

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

use super::Align;

/// Zero-based (row, column)
pub type Anchor = (u32, u16);

pub const HEADER_FILL: u32 = 0xD9D9D9;
pub const WEEKEND_FILL: u32 = 0xEDEDED;
pub const HOLIDAY_FILL: u32 = 0xC9C9C9;
pub const MISSING_FILL: u32 = 0x969696;

pub const HOURS_FORMAT: &str = "0.00";
pub const MONEY_FORMAT: &str = "#,##0.00 \"€\"";
pub const PERCENT_FORMAT: &str = "0.00%";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CellStyle {
    pub bold: bool,
    pub border: bool,
    pub align: Option<Align>,
    /// RGB background
    pub fill: Option<u32>,
    pub number_format: Option<&'static str>,
}

impl CellStyle {
    pub fn label() -> Self {
        Self { bold: true, ..Self::default() }
    }

    pub fn header() -> Self {
        Self { bold: true, border: true, align: Some(Align::Center), fill: Some(HEADER_FILL), number_format: None }
    }

    pub fn grid() -> Self {
        Self { border: true, ..Self::default() }
    }

    pub fn hours() -> Self {
        Self { border: true, align: Some(Align::Right), number_format: Some(HOURS_FORMAT), ..Self::default() }
    }

    pub fn money() -> Self {
        Self { align: Some(Align::Right), number_format: Some(MONEY_FORMAT), ..Self::default() }
    }

    pub fn percent() -> Self {
        Self { align: Some(Align::Right), number_format: Some(PERCENT_FORMAT), ..Self::default() }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn filled(mut self, fill: Option<u32>) -> Self {
        if fill.is_some() {
            self.fill = fill;
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub row: u32,
    pub col: u16,
    /// None for styled empty cells
    pub value: Option<CellValue>,
    pub style: CellStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Merge {
    pub first: Anchor,
    pub last: Anchor,
    pub text: String,
    pub style: CellStyle,
}

#[derive(Debug, Clone, Serialize)]
pub struct Sheet {
    pub name: String,
    pub landscape: bool,
    pub cells: Vec<Cell>,
    pub merges: Vec<Merge>,
    pub col_widths: Vec<(u16, f64)>,
}

impl Sheet {
    pub fn new(name: &str, landscape: bool) -> Self {
        Self { name: sheet_name(name), landscape, cells: Vec::new(), merges: Vec::new(), col_widths: Vec::new() }
    }

    pub fn text(&mut self, (row, col): Anchor, text: impl Into<String>, style: CellStyle) {
        self.put(row, col, Some(CellValue::Text(text.into())), style);
    }

    pub fn number(&mut self, (row, col): Anchor, value: f64, style: CellStyle) {
        self.put(row, col, Some(CellValue::Number(value)), style);
    }

    pub fn decimal(&mut self, at: Anchor, value: Decimal, style: CellStyle) {
        self.number(at, value.to_f64().unwrap_or_default(), style);
    }

    /// Hours, left blank (but styled) when zero
    pub fn hours(&mut self, at: Anchor, value: Decimal, style: CellStyle) {
        if value.is_zero() {
            self.blank(at, style);
        } else {
            self.decimal(at, value, style);
        }
    }

    pub fn blank(&mut self, (row, col): Anchor, style: CellStyle) {
        self.put(row, col, None, style);
    }

    pub fn merge(&mut self, first: Anchor, last: Anchor, text: impl Into<String>, style: CellStyle) {
        self.merges.push(Merge { first, last, text: text.into(), style });
    }

    pub fn width(&mut self, col: u16, width: f64) {
        self.col_widths.retain(|(c, _)| *c != col);
        self.col_widths.push((col, width));
    }

    fn put(&mut self, row: u32, col: u16, value: Option<CellValue>, style: CellStyle) {
        let cell = Cell { row, col, value, style };
        match self.cells.iter_mut().find(|c| c.row == row && c.col == col) {
            Some(existing) => *existing = cell,
            None => self.cells.push(cell),
        }
    }

    pub fn get(&self, a1_ref: &str) -> Option<&Cell> {
        let (row, col) = a1(a1_ref)?;
        self.cells.iter().find(|c| c.row == row && c.col == col)
    }

    pub fn text_at(&self, a1_ref: &str) -> Option<&str> {
        match self.get(a1_ref)?.value.as_ref()? {
            CellValue::Text(t) => Some(t),
            CellValue::Number(_) => None,
        }
    }

    pub fn number_at(&self, a1_ref: &str) -> Option<f64> {
        match self.get(a1_ref)?.value.as_ref()? {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(_) => None,
        }
    }
}

/// Column letters for a zero-based index: 0 → A, 25 → Z, 26 → AA
pub fn col_name(col: u16) -> String {
    let mut n = u32::from(col) + 1;
    let mut name = Vec::new();
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        name.push(char::from(b'A' + rem));
        n = (n - 1) / 26;
    }
    name.iter().rev().collect()
}

pub fn to_a1((row, col): Anchor) -> String {
    format!("{}{}", col_name(col), row + 1)
}

/// Parse an A1 reference ("C5", "AA10") into a zero-based anchor
pub fn a1(reference: &str) -> Option<Anchor> {
    let split = reference.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = reference.split_at(split);
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let col = letters
        .chars()
        .try_fold(0u32, |acc, c| acc.checked_mul(26)?.checked_add(c.to_ascii_uppercase() as u32 - 'A' as u32 + 1))?;
    let row: u32 = digits.parse().ok()?;
    if row == 0 || col == 0 || col > u32::from(u16::MAX) {
        return None;
    }
    Some((row - 1, (col - 1) as u16))
}

/// Excel sheet names: at most 31 characters, none of `[]:*?/\`, and no
/// apostrophe at either end
pub fn sheet_name(name: &str) -> String {
    let is_edge = |c: char| c == '\'' || c.is_whitespace();
    let cleaned: String = name
        .chars()
        .map(|c| if matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\') { '_' } else { c })
        .collect();
    let truncated: String = cleaned.trim_matches(is_edge).chars().take(31).collect();
    let trimmed = truncated.trim_end_matches(is_edge).to_string();
    if trimmed.is_empty() {
        "Blatt".to_string()
    } else {
        trimmed
    }
}

/// Sheet name not yet used by `sheets`, suffixing " (2)", " (3)", ...
pub fn unique_sheet_name(sheets: &[Sheet], name: &str) -> String {
    let base = sheet_name(name);
    let taken = |candidate: &str| sheets.iter().any(|s| s.name.eq_ignore_ascii_case(candidate));
    if !taken(&base) {
        return base;
    }
    let mut n = 2;
    loop {
        let suffix = format!(" ({})", n);
        let head: String = base.chars().take(31 - suffix.chars().count()).collect();
        let candidate = head + &suffix;
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::dec;

    #[test]
    fn a1_references() {
        assert_eq!(a1("A1"), Some((0, 0)));
        assert_eq!(a1("C5"), Some((4, 2)));
        assert_eq!(a1("aa10"), Some((9, 26)));
        assert_eq!(a1("A0"), None);
        assert_eq!(a1("15"), None);
        assert_eq!(a1("B"), None);
        assert_eq!(to_a1((4, 2)), "C5");
        assert_eq!(to_a1((0, 27)), "AB1");
        assert_eq!(col_name(701), "ZZ");
        assert_eq!(col_name(702), "AAA");
    }

    #[test]
    fn cells_are_replaced_in_place() {
        let mut sheet = Sheet::new("Test", false);
        sheet.text((2, 2), "alt", CellStyle::default());
        sheet.text((2, 2), "neu", CellStyle::label());
        sheet.hours((3, 0), dec("7.5"), CellStyle::hours());
        sheet.hours((4, 0), Decimal::ZERO, CellStyle::hours());

        assert_eq!(sheet.cells.len(), 3);
        assert_eq!(sheet.text_at("C3"), Some("neu"));
        assert!(sheet.get("C3").unwrap().style.bold);
        assert_eq!(sheet.number_at("A4"), Some(7.5));
        assert!(sheet.get("A5").unwrap().value.is_none());
        assert_eq!(sheet.text_at("A4"), None);
    }

    #[test]
    fn sheet_names_are_valid_and_unique() {
        assert_eq!(sheet_name("KK5012301AB4/2024"), "KK5012301AB4_2024");
        assert_eq!(sheet_name("   "), "Blatt");
        assert_eq!(sheet_name(&"x".repeat(40)).len(), 31);

        let sheets = vec![Sheet::new("FZ-1", false), Sheet::new("FZ-1 (2)", false)];
        assert_eq!(unique_sheet_name(&sheets, "fz-1"), "fz-1 (3)");
        assert_eq!(unique_sheet_name(&sheets, "FZ-2"), "FZ-2");
    }

    #[test]
    fn sheet_names_drop_edge_apostrophes() {
        assert_eq!(sheet_name("'FZ1"), "FZ1");
        assert_eq!(sheet_name("FZ1'"), "FZ1");
        assert_eq!(sheet_name(" 'O'Brien' "), "O'Brien");
        assert_eq!(sheet_name("''"), "Blatt");

        // truncation must not leave an apostrophe at the end
        let name = format!("{}'tail", "y".repeat(30));
        let cleaned = sheet_name(&name);
        assert!(!cleaned.ends_with('\''));
        assert_eq!(cleaned, "y".repeat(30));
    }
}
