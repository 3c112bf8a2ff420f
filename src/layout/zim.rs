//! ZIM monthly timesheet (Stundennachweis), A4 landscape.
//!
//! The grid has fixed columns: day, weekday, six work-package slots, project
//! total, other work, absence code and day total. Projects with more than six
//! work packages continue on further pages with the same columns; the cost
//! line is printed on the last page only.

use chrono::Datelike;
use rust_decimal::Decimal;

use super::sheet::{Anchor, CellStyle, Sheet, HOLIDAY_FILL, MISSING_FILL, WEEKEND_FILL};
use super::{
    fit_text, format_cell_hours, format_hours, format_money, format_percent, month_label, Align, Document, Grid,
    Mm, Page, PageSize, Point, Rect, HEADER_GREY, HOLIDAY_GREY, MISSING_GREY, WEEKEND_GREY,
};
use crate::calendar;
use crate::funding::zim::PersonnelCosts;
use crate::report::ZimTimesheet;
use crate::timesheet::{DayKind, MonthSheet};
use crate::types::{AbsenceKind, HOLIDAY_CODE};

pub const PACKAGES_PER_PAGE: usize = 6;
pub const DAY_ROWS: usize = 31;

pub const COL_DAY: usize = 0;
pub const COL_WEEKDAY: usize = 1;
pub const COL_FIRST_PACKAGE: usize = 2;
pub const COL_PROJECT: usize = COL_FIRST_PACKAGE + PACKAGES_PER_PAGE;
pub const COL_OTHER: usize = COL_PROJECT + 1;
pub const COL_ABSENCE: usize = COL_OTHER + 1;
pub const COL_TOTAL: usize = COL_ABSENCE + 1;
/// Grid row of the column totals, below the 31 day rows
pub const ROW_TOTALS: usize = DAY_ROWS + 1;

const COL_WIDTHS: [Mm; COL_TOTAL + 1] = [9.0, 9.0, 18.0, 18.0, 18.0, 18.0, 18.0, 18.0, 20.0, 20.0, 14.0, 18.0];

const LEFT: Mm = 15.0;
const RIGHT: Mm = 282.0;
const TITLE_Y: Mm = 196.0;
const FIELD_Y: [Mm; 3] = [187.0, 182.0, 177.0];
const LABEL_X: [Mm; 2] = [LEFT, 160.0];
const VALUE_X: [Mm; 2] = [55.0, 195.0];
const GRID_TOP: Mm = 170.0;
const HEADER_HEIGHT: Mm = 9.0;
const ROW_HEIGHT: Mm = 3.9;
const LEGEND_X: Mm = 222.0;
const LEGEND_STEP: Mm = 3.6;
const COST_Y: Mm = 28.0;
const SIGNATURE_Y: Mm = 16.0;
const SIGNATURE_X: [Mm; 2] = [LEFT, 160.0];
const SIGNATURE_WIDTH: Mm = 80.0;
const FOOTER_Y: Mm = 6.0;

const TITLE_SIZE: f32 = 13.0;
const FIELD_SIZE: f32 = 9.0;
const GRID_SIZE: f32 = 7.0;
const SMALL_SIZE: f32 = 7.0;
const RULE: Mm = 0.2;
const FRAME: Mm = 0.5;

const SIGNATURE_LABELS: [&str; 2] = ["Datum, Unterschrift Mitarbeiter/in", "Datum, Unterschrift Projektleitung"];

/// Cell anchors of the spreadsheet variant
pub mod cells {
    use super::Anchor;

    pub const TITLE: Anchor = (0, 0); // A1
    pub const COMPANY: Anchor = (2, 2); // C3
    pub const FUNDING_CODE: Anchor = (3, 2); // C4
    pub const PROJECT: Anchor = (4, 2); // C5
    pub const EMPLOYEE: Anchor = (2, 9); // J3
    pub const PERSONNEL_NUMBER: Anchor = (3, 9); // J4
    pub const MONTH: Anchor = (4, 9); // J5
    pub const RIGHT_LABEL_COL: u16 = 7; // H
    pub const GRID_HEADER_ROW: u32 = 6; // row 7
    pub const FIRST_DAY_ROW: u32 = 7; // row 8
    pub const TOTAL_ROW: u32 = FIRST_DAY_ROW + 31; // row 39
    pub const COST_ROW: u32 = TOTAL_ROW + 2; // row 41
    pub const COST_VALUE_COL: u16 = 3; // D
    pub const LEGEND_ROW: u32 = COST_ROW + 6; // row 47
    pub const SIGNATURE_ROW: u32 = LEGEND_ROW + 4; // row 51
}

/// Data for one work-package column
#[derive(Debug, Clone)]
pub struct Slot {
    pub code: String,
    pub title: String,
    /// Indexed by day of month - 1
    pub hours: Vec<Decimal>,
    pub total: Decimal,
}

/// Work-package columns in print order; project hours without a work
/// package get a trailing column of their own
pub fn slots(sheet: &MonthSheet) -> Vec<Slot> {
    let mut slots: Vec<Slot> = sheet
        .columns
        .iter()
        .enumerate()
        .map(|(i, column)| Slot {
            code: column.code.clone(),
            title: column.title.clone(),
            hours: sheet.rows.iter().map(|r| r.package_hours[i]).collect(),
            total: sheet.package_totals[i],
        })
        .collect();

    if sheet.has_unassigned() {
        slots.push(Slot {
            code: "o. AP".to_string(),
            title: "ohne Arbeitspaket".to_string(),
            hours: sheet.rows.iter().map(|r| r.unassigned).collect(),
            total: sheet.unassigned_total,
        });
    }
    slots
}

pub fn grid() -> Grid {
    Grid {
        origin_top_left: Point::new(LEFT, GRID_TOP),
        col_widths: COL_WIDTHS.to_vec(),
        header_height: HEADER_HEIGHT,
        row_height: ROW_HEIGHT,
        rows: ROW_TOTALS,
    }
}

fn period(ts: &ZimTimesheet) -> String {
    format!("{} {}", month_label(ts.sheet.month), ts.sheet.year)
}

pub fn document(ts: &ZimTimesheet) -> Document {
    let slots = slots(&ts.sheet);
    let chunks: Vec<&[Slot]> =
        if slots.is_empty() { vec![&slots[..]] } else { slots.chunks(PACKAGES_PER_PAGE).collect() };
    let period = period(ts);
    let grid = grid();
    let last = chunks.len() - 1;

    let mut doc = Document::new(format!("Stundennachweis ZIM {} {}", ts.employee_name, period));
    for (index, chunk) in chunks.iter().enumerate() {
        let mut page = Page::new(PageSize::A4Landscape);
        header(&mut page, ts, &period, index > 0);
        table(&mut page, &grid, &ts.sheet, chunk);
        legend(&mut page, &ts.sheet, chunk);
        if index == last {
            if let Some(costs) = &ts.costs {
                cost_line(&mut page, costs);
            }
        }
        signatures(&mut page);
        doc.pages.push(page);
    }
    doc.number_pages(FOOTER_Y, PageSize::A4Landscape.width() - RIGHT, SMALL_SIZE);
    doc
}

fn header(page: &mut Page, ts: &ZimTimesheet, period: &str, continued: bool) {
    let title = if continued { "Stundennachweis (Fortsetzung)" } else { "Stundennachweis" };
    page.bold(LEFT, TITLE_Y, TITLE_SIZE, title);
    page.push_text(
        Point::new(RIGHT, TITLE_Y),
        8.0,
        false,
        Align::Right,
        "ZIM - Zentrales Innovationsprogramm Mittelstand",
    );

    let dash = || "-".to_string();
    let fields = [
        [
            ("Zuwendungsempfänger:", ts.company.clone()),
            ("Förderkennzeichen:", ts.funding_code.clone().unwrap_or_else(dash)),
            ("Vorhaben:", ts.project_name.clone()),
        ],
        [
            ("Mitarbeiter/in:", ts.employee_name.clone()),
            ("Personalnummer:", ts.personnel_number.clone().unwrap_or_else(dash)),
            ("Abrechnungsmonat:", period.to_string()),
        ],
    ];
    for (side, column) in fields.iter().enumerate() {
        let max_width = if side == 0 { LABEL_X[1] - VALUE_X[0] - 3.0 } else { RIGHT - VALUE_X[1] };
        for (line, (label, value)) in column.iter().enumerate() {
            page.text(LABEL_X[side], FIELD_Y[line], FIELD_SIZE, *label);
            page.bold(VALUE_X[side], FIELD_Y[line], FIELD_SIZE, fit_text(value, FIELD_SIZE, true, max_width));
        }
    }
}

fn header_cell(page: &mut Page, rect: Rect, line1: &str, line2: Option<&str>) {
    match line2 {
        None => page.cell_text(rect, GRID_SIZE, true, Align::Center, line1),
        Some(line2) => {
            let half = rect.height / 2.0;
            page.cell_text(Rect::new(rect.x, rect.y + half, rect.width, half), GRID_SIZE, true, Align::Center, line1);
            page.cell_text(Rect::new(rect.x, rect.y, rect.width, half), 6.0, false, Align::Center, line2);
        }
    }
}

fn table(page: &mut Page, grid: &Grid, sheet: &MonthSheet, slots: &[Slot]) {
    page.fill(grid.row_rect(0), HEADER_GREY);
    for day in 1..=DAY_ROWS {
        match sheet.row(day as u32).map(|r| &r.kind) {
            Some(DayKind::Weekend) => page.fill(grid.row_rect(day), WEEKEND_GREY),
            Some(DayKind::Holiday(_)) => page.fill(grid.row_rect(day), HOLIDAY_GREY),
            Some(DayKind::Workday) => {}
            None => page.fill(grid.row_rect(day), MISSING_GREY),
        }
    }
    page.fill(grid.row_rect(ROW_TOTALS), HEADER_GREY);
    page.ops.extend(grid.rules(RULE));
    page.outline(Rect::new(grid.origin_top_left.x, grid.bottom(), grid.width(), grid.height()), FRAME);

    header_cell(page, grid.cell(0, COL_DAY), "Tag", None);
    header_cell(page, grid.cell(0, COL_WEEKDAY), "WT", None);
    for (i, slot) in slots.iter().enumerate() {
        header_cell(page, grid.cell(0, COL_FIRST_PACKAGE + i), &slot.code, Some(&slot.title));
    }
    header_cell(page, grid.cell(0, COL_PROJECT), "Summe", Some("Vorhaben"));
    header_cell(page, grid.cell(0, COL_OTHER), "Sonstige", Some("Tätigkeiten"));
    header_cell(page, grid.cell(0, COL_ABSENCE), "Abw.", None);
    header_cell(page, grid.cell(0, COL_TOTAL), "Gesamt", None);

    for row in &sheet.rows {
        let r = row.date.day() as usize;
        page.cell_text(grid.cell(r, COL_DAY), GRID_SIZE, false, Align::Center, &format!("{:02}", r));
        page.cell_text(grid.cell(r, COL_WEEKDAY), GRID_SIZE, false, Align::Center, calendar::weekday_abbrev(row.date));
        for (i, slot) in slots.iter().enumerate() {
            hours_cell(page, grid.cell(r, COL_FIRST_PACKAGE + i), slot.hours[r - 1], false);
        }
        hours_cell(page, grid.cell(r, COL_PROJECT), row.project_total, false);
        hours_cell(page, grid.cell(r, COL_OTHER), row.other, false);
        if let Some(code) = row.absence_code() {
            page.cell_text(grid.cell(r, COL_ABSENCE), GRID_SIZE, true, Align::Center, code);
        }
        hours_cell(page, grid.cell(r, COL_TOTAL), row.total, false);
    }

    // the label spans day and weekday; blank out the rule between them
    let label = grid.cell(ROW_TOTALS, COL_DAY).union(&grid.cell(ROW_TOTALS, COL_WEEKDAY));
    page.fill(Rect::new(label.x + 0.2, label.y + 0.2, label.width - 0.4, label.height - 0.4), HEADER_GREY);
    page.cell_text(label, GRID_SIZE, true, Align::Left, "Summe");
    for (i, slot) in slots.iter().enumerate() {
        hours_cell(page, grid.cell(ROW_TOTALS, COL_FIRST_PACKAGE + i), slot.total, true);
    }
    hours_cell(page, grid.cell(ROW_TOTALS, COL_PROJECT), sheet.project_total, true);
    hours_cell(page, grid.cell(ROW_TOTALS, COL_OTHER), sheet.other_total, true);
    hours_cell(page, grid.cell(ROW_TOTALS, COL_TOTAL), sheet.total, true);
}

/// Day cells stay blank for zero; totals always show a value
fn hours_cell(page: &mut Page, rect: Rect, value: Decimal, total: bool) {
    let text = if total { format_hours(value) } else { format_cell_hours(value) };
    page.cell_text(rect, GRID_SIZE, total, Align::Right, &text);
}

fn legend(page: &mut Page, sheet: &MonthSheet, slots: &[Slot]) {
    let mut y = GRID_TOP - 3.0;

    if !slots.is_empty() {
        legend_line(page, &mut y, true, "Arbeitspakete");
        for slot in slots {
            legend_line(page, &mut y, false, &format!("{}  {}", slot.code, slot.title));
        }
        y -= LEGEND_STEP / 2.0;
    }

    legend_line(page, &mut y, true, "Abwesenheiten");
    for kind in AbsenceKind::ALL {
        legend_line(page, &mut y, false, &format!("{}  {}", kind.code(), kind.label()));
    }
    legend_line(page, &mut y, false, &format!("{}  Feiertag", HOLIDAY_CODE));

    let holidays: Vec<String> = sheet
        .rows
        .iter()
        .filter_map(|r| match &r.kind {
            DayKind::Holiday(name) => Some(format!("{}  {}", r.date.format("%d.%m."), name)),
            _ => None,
        })
        .collect();
    if !holidays.is_empty() {
        y -= LEGEND_STEP / 2.0;
        legend_line(page, &mut y, true, "Feiertage");
        for holiday in &holidays {
            legend_line(page, &mut y, false, holiday);
        }
    }

    y -= LEGEND_STEP / 2.0;
    legend_line(page, &mut y, false, &format!("Arbeitstage im Monat: {}", sheet.working_days));
}

fn legend_line(page: &mut Page, y: &mut Mm, bold: bool, text: &str) {
    let fitted = fit_text(text, SMALL_SIZE, bold, RIGHT - LEGEND_X);
    page.push_text(Point::new(LEGEND_X, *y), SMALL_SIZE, bold, Align::Left, fitted);
    *y -= LEGEND_STEP;
}

fn cost_line(page: &mut Page, costs: &PersonnelCosts) {
    let size = FIELD_SIZE - 1.0;
    let items = [
        (LEFT, format!("Stundensatz: {}", format_money(costs.hourly_rate))),
        (72.0, format!("Verrechenbare Stunden: {}", format_hours(costs.counted_hours))),
        (135.0, format!("Personalkosten: {}", format_money(costs.personnel_costs))),
        (
            192.0,
            format!("Gemeinkosten ({}): {}", format_percent(costs.overhead_rate), format_money(costs.overhead)),
        ),
    ];
    for (x, text) in items {
        page.text(x, COST_Y, size, text);
    }
    page.push_text(
        Point::new(RIGHT, COST_Y),
        size,
        true,
        Align::Right,
        format!("Gesamt: {}", format_money(costs.total)),
    );
}

fn signatures(page: &mut Page) {
    for (x, label) in SIGNATURE_X.iter().zip(SIGNATURE_LABELS) {
        page.hline(*x, x + SIGNATURE_WIDTH, SIGNATURE_Y, 0.3);
        page.text(*x, SIGNATURE_Y - 4.0, SMALL_SIZE, label);
    }
}

/// Spreadsheet variant: all work packages side by side on one worksheet
pub fn sheet(ts: &ZimTimesheet) -> Sheet {
    use cells::*;

    let month = &ts.sheet;
    let mut sheet = Sheet::new(&format!("ZIM {:04}-{:02}", month.year, month.month), true);
    let slots = slots(month);

    let col_project = (COL_FIRST_PACKAGE + slots.len()) as u16;
    let col_other = col_project + 1;
    let col_absence = col_project + 2;
    let col_total = col_project + 3;

    sheet.text(TITLE, "Stundennachweis ZIM", CellStyle::label());
    let dash = || "-".to_string();
    let fields = [
        (COMPANY, "Zuwendungsempfänger", ts.company.clone()),
        (FUNDING_CODE, "Förderkennzeichen", ts.funding_code.clone().unwrap_or_else(dash)),
        (PROJECT, "Vorhaben", ts.project_name.clone()),
        (EMPLOYEE, "Mitarbeiter/in", ts.employee_name.clone()),
        (PERSONNEL_NUMBER, "Personalnummer", ts.personnel_number.clone().unwrap_or_else(dash)),
        (MONTH, "Abrechnungsmonat", period(ts)),
    ];
    for ((row, col), label, value) in fields {
        let label_col = if col == COMPANY.1 { 0 } else { RIGHT_LABEL_COL };
        sheet.text((row, label_col), label, CellStyle::default());
        sheet.text((row, col), value, CellStyle::label());
    }

    let header = CellStyle::header();
    sheet.text((GRID_HEADER_ROW, COL_DAY as u16), "Tag", header);
    sheet.text((GRID_HEADER_ROW, COL_WEEKDAY as u16), "WT", header);
    for (i, slot) in slots.iter().enumerate() {
        sheet.text((GRID_HEADER_ROW, (COL_FIRST_PACKAGE + i) as u16), slot.code.as_str(), header);
    }
    sheet.text((GRID_HEADER_ROW, col_project), "Summe Vorhaben", header);
    sheet.text((GRID_HEADER_ROW, col_other), "Sonstige Tätigkeiten", header);
    sheet.text((GRID_HEADER_ROW, col_absence), "Abw.", header);
    sheet.text((GRID_HEADER_ROW, col_total), "Gesamt", header);

    for day in 1..=DAY_ROWS as u32 {
        let r = FIRST_DAY_ROW + day - 1;
        let Some(row) = month.row(day) else {
            for col in 0..=col_total {
                sheet.blank((r, col), CellStyle::grid().filled(Some(MISSING_FILL)));
            }
            continue;
        };
        let fill = match row.kind {
            DayKind::Workday => None,
            DayKind::Weekend => Some(WEEKEND_FILL),
            DayKind::Holiday(_) => Some(HOLIDAY_FILL),
        };
        let centred = CellStyle { align: Some(Align::Center), ..CellStyle::grid() }.filled(fill);
        let hours = CellStyle::hours().filled(fill);

        sheet.number((r, COL_DAY as u16), f64::from(day), centred);
        sheet.text((r, COL_WEEKDAY as u16), calendar::weekday_abbrev(row.date), centred);
        for (i, slot) in slots.iter().enumerate() {
            sheet.hours((r, (COL_FIRST_PACKAGE + i) as u16), slot.hours[day as usize - 1], hours);
        }
        sheet.hours((r, col_project), row.project_total, hours);
        sheet.hours((r, col_other), row.other, hours);
        match row.absence_code() {
            Some(code) => sheet.text((r, col_absence), code, centred),
            None => sheet.blank((r, col_absence), centred),
        }
        sheet.hours((r, col_total), row.total, hours);
    }

    let totals = CellStyle::hours().bold().filled(Some(super::sheet::HEADER_FILL));
    sheet.merge((TOTAL_ROW, 0), (TOTAL_ROW, 1), "Summe", CellStyle::header());
    for (i, slot) in slots.iter().enumerate() {
        sheet.decimal((TOTAL_ROW, (COL_FIRST_PACKAGE + i) as u16), slot.total, totals);
    }
    sheet.decimal((TOTAL_ROW, col_project), month.project_total, totals);
    sheet.decimal((TOTAL_ROW, col_other), month.other_total, totals);
    sheet.blank((TOTAL_ROW, col_absence), totals);
    sheet.decimal((TOTAL_ROW, col_total), month.total, totals);

    if let Some(costs) = &ts.costs {
        let rows = [
            ("Stundensatz", costs.hourly_rate, CellStyle::money()),
            ("Verrechenbare Stunden", costs.counted_hours, CellStyle { border: false, ..CellStyle::hours() }),
            ("Personalkosten", costs.personnel_costs, CellStyle::money()),
            ("Gemeinkosten", costs.overhead, CellStyle::money()),
            ("Gesamt", costs.total, CellStyle::money().bold()),
        ];
        for (i, (label, value, style)) in rows.into_iter().enumerate() {
            let r = COST_ROW + i as u32;
            sheet.text((r, 0), label, CellStyle { bold: style.bold, ..CellStyle::default() });
            sheet.decimal((r, COST_VALUE_COL), value, style);
        }
        sheet.decimal((COST_ROW + 3, COST_VALUE_COL + 1), costs.overhead_rate, CellStyle::percent());
    }

    let codes: Vec<String> = AbsenceKind::ALL
        .iter()
        .map(|k| format!("{} = {}", k.code(), k.label()))
        .chain(std::iter::once(format!("{} = Feiertag", HOLIDAY_CODE)))
        .collect();
    sheet.text((LEGEND_ROW, 0), "Legende", CellStyle::label());
    sheet.text((LEGEND_ROW + 1, 0), codes.join(", "), CellStyle::default());
    if !slots.is_empty() {
        let packages: Vec<String> = slots.iter().map(|s| format!("{} = {}", s.code, s.title)).collect();
        sheet.text((LEGEND_ROW + 2, 0), packages.join("; "), CellStyle::default());
    }

    sheet.text((SIGNATURE_ROW, 0), SIGNATURE_LABELS[0], CellStyle::default());
    sheet.text((SIGNATURE_ROW, RIGHT_LABEL_COL), SIGNATURE_LABELS[1], CellStyle::default());

    sheet.width(COL_DAY as u16, 5.0);
    sheet.width(COL_WEEKDAY as u16, 5.0);
    for i in 0..slots.len() {
        sheet.width((COL_FIRST_PACKAGE + i) as u16, 10.0);
    }
    sheet.width(col_project, 12.0);
    sheet.width(col_other, 12.0);
    sheet.width(col_absence, 7.0);
    sheet.width(col_total, 10.0);
    sheet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{Employee, Project, TimeEntry, WorkPackage};
    use crate::layout::sheet::to_a1;
    use crate::layout::DrawOp;
    use crate::report::ZimInput;
    use crate::testing::dec;
    use crate::testing::fixtures::{self, date};
    use crate::types::FundingProgram;

    fn timesheet(
        month: u32,
        packages: &[WorkPackage],
        project: &Project,
        employee: &Employee,
        entries: &[TimeEntry],
        with_costs: bool,
    ) -> ZimTimesheet {
        let mut company = fixtures::company();
        company.federal_state = calendar::FederalState::Hessen;
        ZimTimesheet::assemble(ZimInput {
            company: &company,
            project,
            work_packages: packages,
            employee,
            entries,
            absences: &[],
            year: 2024,
            month,
            with_costs,
            overhead_rate: Decimal::ONE,
            max_daily_hours: dec("10"),
        })
        .unwrap()
    }

    fn fills(page: &Page, grey: f32) -> usize {
        page.ops.iter().filter(|op| matches!(op, DrawOp::Fill { grey: g, .. } if *g == grey)).count()
    }

    #[test]
    fn single_page_positions() {
        let employee = fixtures::employee();
        let project = fixtures::project(FundingProgram::Zim);
        let ap1 = fixtures::work_package(&project, "AP1");
        let ap2 = fixtures::work_package(&project, "AP2");
        let entries = vec![
            fixtures::entry(&employee, Some(&project), Some(&ap1), date(2024, 3, 4), "3"),
            fixtures::entry(&employee, Some(&project), Some(&ap2), date(2024, 3, 4), "2.5"),
        ];
        let ts = timesheet(3, &[ap1, ap2], &project, &employee, &entries, true);
        let doc = document(&ts);

        assert_eq!(doc.pages.len(), 1);
        let page = &doc.pages[0];
        assert_eq!(page.size, PageSize::A4Landscape);
        assert_eq!(page.find_text("Stundennachweis"), Some(Point::new(15.0, 196.0)));
        assert_eq!(page.find_text("KK5012301AB4"), Some(Point::new(55.0, 182.0)));
        assert_eq!(page.find_text("März 2024"), Some(Point::new(195.0, 177.0)));
        assert_eq!(page.find_text("Seite 1 von 1"), Some(Point::new(282.0, 6.0)));

        // right-aligned in the first package column of day 4
        let cell = grid().cell(4, COL_FIRST_PACKAGE);
        assert_eq!(cell.right(), 51.0);
        assert_eq!(page.find_text("3,00").map(|p| p.x), Some(50.0));
        assert_eq!(page.find_text("5,50").map(|p| p.x), Some(grid().cell(4, COL_PROJECT).right() - 1.0));

        // March 2024 in Hessen: ten weekend days, Good Friday on the 29th
        assert_eq!(fills(page, WEEKEND_GREY), 10);
        assert_eq!(fills(page, HOLIDAY_GREY), 1);
        assert_eq!(fills(page, MISSING_GREY), 0);
        assert!(page.texts().any(|(_, t)| t == "29.03.  Karfreitag"));
        assert!(page.texts().any(|(_, t)| t.starts_with("Gesamt: ")));
    }

    #[test]
    fn short_months_grey_out_missing_days() {
        let employee = fixtures::employee();
        let project = fixtures::project(FundingProgram::Zim);
        let ts = timesheet(2, &[], &project, &employee, &[], false);
        let doc = document(&ts);
        let page = &doc.pages[0];
        assert_eq!(fills(page, MISSING_GREY), 2);
        assert!(page.find_text("29").is_some());
        assert!(page.find_text("30").is_none());
        assert!(!page.texts().any(|(_, t)| t.starts_with("Stundensatz")));
        assert!(page.find_text("Arbeitstage im Monat: 21").is_some());
    }

    #[test]
    fn more_than_six_packages_continue_on_next_page() {
        let employee = fixtures::employee();
        let project = fixtures::project(FundingProgram::Zim);
        let packages: Vec<WorkPackage> =
            (1..=7).map(|n| fixtures::work_package(&project, &format!("AP{}", n))).collect();
        let entries = vec![
            fixtures::entry(&employee, Some(&project), Some(&packages[6]), date(2024, 3, 5), "4"),
            fixtures::entry(&employee, Some(&project), None, date(2024, 3, 6), "1"),
        ];
        let ts = timesheet(3, &packages, &project, &employee, &entries, true);
        let doc = document(&ts);

        assert_eq!(doc.pages.len(), 2);
        let second = &doc.pages[1];
        assert!(second.find_text("Stundennachweis (Fortsetzung)").is_some());
        assert!(second.find_text("Seite 2 von 2").is_some());
        assert!(doc.pages[0].find_text("AP6").is_some());
        assert!(doc.pages[0].find_text("AP7").is_none());

        // AP7 and the unassigned column sit in the first two slots of page two
        let ap7 = second.find_text("AP7").unwrap();
        let slot0 = grid().cell(0, COL_FIRST_PACKAGE);
        assert_eq!(ap7.x, slot0.x + slot0.width / 2.0);
        assert!(second.find_text("o. AP").is_some());

        // cost line only once, on the last page
        assert!(!doc.pages[0].texts().any(|(_, t)| t.starts_with("Stundensatz")));
        assert!(second.texts().any(|(_, t)| t.starts_with("Stundensatz")));
    }

    #[test]
    fn spreadsheet_anchors() {
        let employee = fixtures::employee();
        let project = fixtures::project(FundingProgram::Zim);
        let ap1 = fixtures::work_package(&project, "AP1");
        let entries = vec![
            fixtures::entry(&employee, Some(&project), Some(&ap1), date(2024, 3, 4), "3"),
            fixtures::entry(&employee, None, None, date(2024, 3, 4), "4"),
        ];
        let ts = timesheet(3, &[ap1], &project, &employee, &entries, true);
        let sheet = sheet(&ts);

        assert_eq!(to_a1(cells::COMPANY), "C3");
        assert_eq!(to_a1(cells::MONTH), "J5");
        assert_eq!(sheet.name, "ZIM 2024-03");
        assert_eq!(sheet.text_at("C3"), Some("Muster Labs GmbH"));
        assert_eq!(sheet.text_at("J3"), Some("Mustermann, Erika"));
        assert_eq!(sheet.text_at("C7"), Some("AP1"));
        assert_eq!(sheet.text_at("D7"), Some("Summe Vorhaben"));
        // day 4 is row 11
        assert_eq!(sheet.number_at("A11"), Some(4.0));
        assert_eq!(sheet.number_at("C11"), Some(3.0));
        assert_eq!(sheet.number_at("E11"), Some(4.0));
        assert_eq!(sheet.number_at("G11"), Some(7.0));
        // Good Friday
        assert_eq!(sheet.text_at("F36"), Some("F"));
        assert_eq!(sheet.merges[0].text, "Summe");
        assert_eq!(sheet.number_at("G39"), Some(7.0));
        assert_eq!(sheet.text_at("A41"), Some("Stundensatz"));
        assert!((sheet.number_at("D41").unwrap() - 41.86).abs() < 1e-9);
    }
}
