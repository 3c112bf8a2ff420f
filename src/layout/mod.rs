//! Fixed-coordinate layout of the report forms.
//!
//! Layouts produce a [`Document`] of positioned drawing operations in
//! millimetres (origin bottom-left, as in PDF) and a list of [`sheet::Sheet`]s
//! for the spreadsheet variant. Renderers only encode what is placed here.

pub mod fzul;
pub mod sheet;
pub mod zim;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Millimetres
pub type Mm = f32;

/// Millimetres per typographic point
pub const MM_PER_PT: f32 = 25.4 / 72.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: Mm,
    pub y: Mm,
}

impl Point {
    pub fn new(x: Mm, y: Mm) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle anchored at its bottom-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: Mm,
    pub y: Mm,
    pub width: Mm,
    pub height: Mm,
}

impl Rect {
    pub fn new(x: Mm, y: Mm, width: Mm, height: Mm) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> Mm {
        self.x + self.width
    }

    pub fn top(&self) -> Mm {
        self.y + self.height
    }

    /// Smallest rectangle covering both
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect::new(x, y, self.right().max(other.right()) - x, self.top().max(other.top()) - y)
    }
}

/// Table grid hanging down from its top-left corner. Row 0 is the header,
/// rows 1..=rows are body rows of equal height.
#[derive(Debug, Clone, Serialize)]
pub struct Grid {
    pub origin_top_left: Point,
    pub col_widths: Vec<Mm>,
    pub header_height: Mm,
    pub row_height: Mm,
    pub rows: usize,
}

impl Grid {
    pub fn width(&self) -> Mm {
        self.col_widths.iter().sum()
    }

    pub fn height(&self) -> Mm {
        self.header_height + self.row_height * self.rows as f32
    }

    pub fn bottom(&self) -> Mm {
        self.origin_top_left.y - self.height()
    }

    pub fn col_x(&self, col: usize) -> Mm {
        self.origin_top_left.x + self.col_widths.iter().take(col).sum::<Mm>()
    }

    fn row_top(&self, row: usize) -> Mm {
        match row {
            0 => self.origin_top_left.y,
            r => self.origin_top_left.y - self.header_height - self.row_height * (r - 1) as f32,
        }
    }

    pub fn cell(&self, row: usize, col: usize) -> Rect {
        let height = if row == 0 { self.header_height } else { self.row_height };
        let width = self.col_widths.get(col).copied().unwrap_or(0.0);
        Rect::new(self.col_x(col), self.row_top(row) - height, width, height)
    }

    /// Full-width rectangle of one row
    pub fn row_rect(&self, row: usize) -> Rect {
        let first = self.cell(row, 0);
        Rect::new(first.x, first.y, self.width(), first.height)
    }

    /// All ruling lines of the grid
    pub fn rules(&self, width: Mm) -> Vec<DrawOp> {
        let left = self.origin_top_left.x;
        let right = left + self.width();
        let top = self.origin_top_left.y;
        let bottom = self.bottom();

        let mut ops = Vec::with_capacity(self.rows + self.col_widths.len() + 3);
        for row in 0..=self.rows + 1 {
            let y = if row > self.rows { bottom } else { self.row_top(row) };
            ops.push(DrawOp::Line { from: Point::new(left, y), to: Point::new(right, y), width });
        }
        for col in 0..=self.col_widths.len() {
            let x = self.col_x(col);
            ops.push(DrawOp::Line { from: Point::new(x, top), to: Point::new(x, bottom), width });
        }
        ops
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSize {
    A4Portrait,
    A4Landscape,
}

impl PageSize {
    pub fn width(&self) -> Mm {
        match self {
            PageSize::A4Portrait => 210.0,
            PageSize::A4Landscape => 297.0,
        }
    }

    pub fn height(&self) -> Mm {
        match self {
            PageSize::A4Portrait => 297.0,
            PageSize::A4Landscape => 210.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    /// `at` is the baseline anchor: left end, centre or right end depending on `align`
    Text { at: Point, size: f32, bold: bool, align: Align, text: String },
    Line { from: Point, to: Point, width: Mm },
    /// `grey` runs from 0 (black) to 1 (white)
    Fill { rect: Rect, grey: f32 },
}

#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub size: PageSize,
    pub ops: Vec<DrawOp>,
}

/// Horizontal padding inside table cells
const CELL_PADDING: Mm = 1.0;

pub const HEADER_GREY: f32 = 0.85;
pub const WEEKEND_GREY: f32 = 0.92;
pub const HOLIDAY_GREY: f32 = 0.8;
/// Dates that do not exist (e.g. 30 February)
pub const MISSING_GREY: f32 = 0.6;

pub(crate) fn month_label(month: u32) -> &'static str {
    crate::calendar::month_name(month).unwrap_or("")
}

/// "Jan", "Feb", "Mär", ...
pub(crate) fn short_month(month: u32) -> String {
    month_label(month).chars().take(3).collect()
}

impl Page {
    pub fn new(size: PageSize) -> Self {
        Self { size, ops: Vec::new() }
    }

    pub fn text(&mut self, x: Mm, y: Mm, size: f32, text: impl Into<String>) {
        self.push_text(Point::new(x, y), size, false, Align::Left, text);
    }

    pub fn bold(&mut self, x: Mm, y: Mm, size: f32, text: impl Into<String>) {
        self.push_text(Point::new(x, y), size, true, Align::Left, text);
    }

    pub fn push_text(&mut self, at: Point, size: f32, bold: bool, align: Align, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        self.ops.push(DrawOp::Text { at, size, bold, align, text });
    }

    /// Text vertically centred in `rect`, shortened to fit its width
    pub fn cell_text(&mut self, rect: Rect, size: f32, bold: bool, align: Align, text: &str) {
        let fitted = fit_text(text, size, bold, rect.width - 2.0 * CELL_PADDING);
        let baseline = rect.y + (rect.height - cap_height(size)) / 2.0;
        let x = match align {
            Align::Left => rect.x + CELL_PADDING,
            Align::Center => rect.x + rect.width / 2.0,
            Align::Right => rect.right() - CELL_PADDING,
        };
        self.push_text(Point::new(x, baseline), size, bold, align, fitted);
    }

    pub fn line(&mut self, from: Point, to: Point, width: Mm) {
        self.ops.push(DrawOp::Line { from, to, width });
    }

    pub fn hline(&mut self, x1: Mm, x2: Mm, y: Mm, width: Mm) {
        self.line(Point::new(x1, y), Point::new(x2, y), width);
    }

    pub fn fill(&mut self, rect: Rect, grey: f32) {
        self.ops.push(DrawOp::Fill { rect, grey });
    }

    pub fn outline(&mut self, rect: Rect, width: Mm) {
        let (l, r, b, t) = (rect.x, rect.right(), rect.y, rect.top());
        self.line(Point::new(l, b), Point::new(r, b), width);
        self.line(Point::new(r, b), Point::new(r, t), width);
        self.line(Point::new(r, t), Point::new(l, t), width);
        self.line(Point::new(l, t), Point::new(l, b), width);
    }

    pub fn texts(&self) -> impl Iterator<Item = (&Point, &str)> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { at, text, .. } => Some((at, text.as_str())),
            _ => None,
        })
    }

    /// First text op with exactly this content
    pub fn find_text(&self, needle: &str) -> Option<Point> {
        self.texts().find(|(_, t)| *t == needle).map(|(p, _)| *p)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub title: String,
    pub pages: Vec<Page>,
}

impl Document {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), pages: Vec::new() }
    }

    /// Stamp "Seite n von m" bottom right on every page
    pub fn number_pages(&mut self, y: Mm, right_margin: Mm, size: f32) {
        let total = self.pages.len();
        for (i, page) in self.pages.iter_mut().enumerate() {
            let x = page.size.width() - right_margin;
            page.push_text(Point::new(x, y), size, false, Align::Right, format!("Seite {} von {}", i + 1, total));
        }
    }
}

// Helvetica advance widths (1/1000 em) for ASCII 32..=126
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0..?
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // P.._
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // `..o
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // p..~
];

const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, //
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, //
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, //
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, //
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, //
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, //
];

fn char_width(c: char, bold: bool) -> u16 {
    let table = if bold { &HELVETICA_BOLD } else { &HELVETICA };
    let base = match c {
        'ä' | 'á' | 'à' => 'a',
        'ö' | 'ó' => 'o',
        'ü' | 'ú' => 'u',
        'Ä' => 'A',
        'Ö' => 'O',
        'Ü' => 'U',
        'ß' => return 611,
        '€' => return 556,
        '–' => return 556,
        c => c,
    };
    match base as u32 {
        cp @ 32..=126 => table[(cp - 32) as usize],
        _ => 556,
    }
}

/// Advance width of `text` set in Helvetica at `size` points
pub fn text_width(text: &str, size: f32, bold: bool) -> Mm {
    let units: u32 = text.chars().map(|c| u32::from(char_width(c, bold))).sum();
    units as f32 / 1000.0 * size * MM_PER_PT
}

/// Height of capital letters at `size` points
pub fn cap_height(size: f32) -> Mm {
    0.718 * size * MM_PER_PT
}

/// Shorten `text` with a trailing "…" until it fits `max_width`
pub fn fit_text(text: &str, size: f32, bold: bool, max_width: Mm) -> String {
    if text_width(text, size, bold) <= max_width {
        return text.to_string();
    }
    let mut chars: Vec<char> = text.chars().collect();
    while !chars.is_empty() {
        chars.pop();
        let candidate: String = chars.iter().collect::<String>() + "…";
        if text_width(&candidate, size, bold) <= max_width {
            return candidate;
        }
    }
    String::new()
}

/// German number format: `.` groups thousands, `,` separates decimals
pub fn format_decimal(value: Decimal, dp: u32) -> String {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.*}", dp as usize, rounded.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (text, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    match frac_part {
        Some(frac) => format!("{}{},{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

pub fn format_hours(value: Decimal) -> String {
    format_decimal(value, 2)
}

/// Hours for grid cells; zero stays blank
pub fn format_cell_hours(value: Decimal) -> String {
    if value.is_zero() {
        String::new()
    } else {
        format_hours(value)
    }
}

pub fn format_money(value: Decimal) -> String {
    format!("{} €", format_decimal(value, 2))
}

/// A share (0..1) as percent with two decimals
pub fn format_percent(share: Decimal) -> String {
    format!("{} %", format_decimal(share * Decimal::from(100), 2))
}
