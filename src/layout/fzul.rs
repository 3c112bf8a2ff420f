//! FZul annual hour record, A4 portrait.
//!
//! One page per project: a 31 × 12 day grid with month totals and a summary
//! box. Employees on more than one FZul project get an overview page with
//! the combined assessment.

use rust_decimal::Decimal;

use super::sheet::{unique_sheet_name, Anchor, CellStyle, Sheet, HEADER_FILL, HOLIDAY_FILL, MISSING_FILL, WEEKEND_FILL};
use super::{
    fit_text, format_cell_hours, format_hours, format_money, format_percent, short_month, Align, Document, Grid, Mm,
    Page, PageSize, Point, Rect, HEADER_GREY, HOLIDAY_GREY, MISSING_GREY, WEEKEND_GREY,
};
use crate::funding::fzul::{Method, ProjectLine};
use crate::report::{FzulProjectPage, FzulReport};
use crate::timesheet::DayKind;

pub const DAY_ROWS: usize = 31;
/// Grid row of the month totals
pub const ROW_TOTALS: usize = DAY_ROWS + 1;

const LEFT: Mm = 15.0;
const RIGHT: Mm = 199.0;
const TITLE_Y: Mm = 282.0;
const FIELD_Y: [Mm; 3] = [273.0, 268.0, 263.0];
const LABEL_X: [Mm; 2] = [LEFT, 112.0];
const VALUE_X: [Mm; 2] = [45.0, 145.0];
const GRID_TOP: Mm = 255.0;
const DAY_COL: Mm = 10.0;
const MONTH_COL: Mm = 14.5;
const HEADER_HEIGHT: Mm = 6.0;
const ROW_HEIGHT: Mm = 5.6;

const SUMMARY_BOX: Rect = Rect { x: LEFT, y: 28.0, width: RIGHT - LEFT, height: 34.0 };
const SUMMARY_TITLE_Y: Mm = 57.0;
const SUMMARY_ROW_Y: [Mm; 4] = [51.0, 45.5, 40.0, 34.5];
const SUMMARY_LABEL_X: [Mm; 2] = [LEFT + 3.0, 110.0];
const SUMMARY_VALUE_X: [Mm; 2] = [100.0, RIGHT - 3.0];

const SIGNATURE_Y: Mm = 16.0;
const SIGNATURE_X: [Mm; 2] = [LEFT, 124.0];
const SIGNATURE_WIDTH: Mm = 75.0;
const FOOTER_Y: Mm = 6.0;

const TITLE_SIZE: f32 = 13.0;
const FIELD_SIZE: f32 = 9.0;
const GRID_SIZE: f32 = 6.5;
const SMALL_SIZE: f32 = 7.0;
const RULE: Mm = 0.2;
const FRAME: Mm = 0.5;

const SIGNATURE_LABELS: [&str; 2] = ["Datum, Unterschrift Mitarbeiter/in", "Datum, Unterschrift Geschäftsführung"];

const OVERVIEW_COLS: [Mm; 6] = [58.0, 32.0, 22.0, 22.0, 22.0, 28.0];
const OVERVIEW_ROW: Mm = 6.0;

/// Cell anchors of the spreadsheet variant
pub mod cells {
    use super::Anchor;

    pub const TITLE: Anchor = (0, 0); // A1
    pub const COMPANY: Anchor = (2, 2); // C3
    pub const EMPLOYEE: Anchor = (3, 2); // C4
    pub const PROJECT: Anchor = (4, 2); // C5
    pub const FUNDING_CODE: Anchor = (2, 9); // J3
    pub const PERSONNEL_NUMBER: Anchor = (3, 9); // J4
    pub const YEAR: Anchor = (4, 9); // J5
    pub const RIGHT_LABEL_COL: u16 = 7; // H
    pub const GRID_HEADER_ROW: u32 = 6; // row 7
    pub const FIRST_DAY_ROW: u32 = 7; // row 8
    pub const TOTAL_ROW: u32 = FIRST_DAY_ROW + 31; // row 39
    pub const SUMMARY_ROW: u32 = TOTAL_ROW + 2; // row 41
    pub const SUMMARY_VALUE_COL: u16 = 4; // E
    pub const SIGNATURE_ROW: u32 = SUMMARY_ROW + 9; // row 50
    pub const OVERVIEW_HEADER_ROW: u32 = 6; // row 7 of the overview sheet
}

pub fn grid() -> Grid {
    let mut col_widths = vec![DAY_COL];
    col_widths.extend([MONTH_COL; 12]);
    Grid {
        origin_top_left: Point::new(LEFT, GRID_TOP),
        col_widths,
        header_height: HEADER_HEIGHT,
        row_height: ROW_HEIGHT,
        rows: ROW_TOTALS,
    }
}

fn line_for<'a>(report: &'a FzulReport, page: &FzulProjectPage) -> Option<&'a ProjectLine> {
    report.assessment.lines.iter().find(|l| l.project_id == page.project_id)
}

pub fn document(report: &FzulReport) -> Document {
    let mut doc = Document::new(format!("Forschungszulage {} {}", report.year, report.employee_name));
    let grid = grid();

    for project in &report.pages {
        let mut page = Page::new(PageSize::A4Portrait);
        header(&mut page, report, &project.name, project.funding_code.as_deref());
        table(&mut page, &grid, project);
        if let Some(line) = line_for(report, project) {
            summary_box(&mut page, report, line);
        }
        signatures(&mut page);
        doc.pages.push(page);
    }

    if report.pages.len() > 1 {
        let mut page = Page::new(PageSize::A4Portrait);
        overview(&mut page, report);
        signatures(&mut page);
        doc.pages.push(page);
    }

    doc.number_pages(FOOTER_Y, PageSize::A4Portrait.width() - RIGHT, SMALL_SIZE);
    doc
}

fn header(page: &mut Page, report: &FzulReport, project: &str, funding_code: Option<&str>) {
    page.bold(LEFT, TITLE_Y, TITLE_SIZE, format!("Stundenaufzeichnung Forschungszulage {}", report.year));

    let dash = || "-".to_string();
    let fields = [
        [
            ("Unternehmen:", report.company.clone()),
            ("Mitarbeiter/in:", report.employee_name.clone()),
            ("Vorhaben:", project.to_string()),
        ],
        [
            ("Vorhaben-ID:", funding_code.map(str::to_string).unwrap_or_else(dash)),
            ("Personalnummer:", report.personnel_number.clone().unwrap_or_else(dash)),
            ("Wochenarbeitszeit:", format!("{} h", format_hours(report.weekly_hours))),
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

fn table(page: &mut Page, grid: &Grid, project: &FzulProjectPage) {
    let sheet = &project.sheet;

    page.fill(grid.row_rect(0), HEADER_GREY);
    page.fill(grid.row_rect(ROW_TOTALS), HEADER_GREY);
    let mut strikes = Vec::new();
    for month in 1..=12u32 {
        let col = month as usize;
        for day in 1..=DAY_ROWS {
            let rect = grid.cell(day, col);
            match sheet.cell(month, day as u32).map(|c| &c.kind) {
                Some(DayKind::Workday) => {}
                Some(DayKind::Weekend) => page.fill(rect, WEEKEND_GREY),
                Some(DayKind::Holiday(_)) => page.fill(rect, HOLIDAY_GREY),
                None => {
                    page.fill(rect, MISSING_GREY);
                    strikes.push(rect);
                }
            }
        }
    }
    page.ops.extend(grid.rules(RULE));
    page.outline(Rect::new(grid.origin_top_left.x, grid.bottom(), grid.width(), grid.height()), FRAME);
    for rect in strikes {
        page.line(Point::new(rect.x, rect.top()), Point::new(rect.right(), rect.y), RULE);
    }

    page.cell_text(grid.cell(0, 0), GRID_SIZE, true, Align::Center, "Tag");
    for month in 1..=12u32 {
        page.cell_text(grid.cell(0, month as usize), GRID_SIZE, true, Align::Center, &short_month(month));
    }
    for day in 1..=DAY_ROWS {
        page.cell_text(grid.cell(day, 0), GRID_SIZE, false, Align::Center, &format!("{:02}", day));
    }

    for column in &sheet.months {
        let col = column.month as usize;
        for cell in &column.cells {
            let day = chrono::Datelike::day(&cell.date) as usize;
            page.cell_text(grid.cell(day, col), GRID_SIZE, false, Align::Right, &format_cell_hours(cell.hours));
        }
        page.cell_text(grid.cell(ROW_TOTALS, col), GRID_SIZE, true, Align::Right, &format_hours(column.total));
    }
    page.cell_text(grid.cell(ROW_TOTALS, 0), 6.0, true, Align::Center, "Summe");
}

fn summary_box(page: &mut Page, report: &FzulReport, line: &ProjectLine) {
    let assessment = &report.assessment;
    page.outline(SUMMARY_BOX, FRAME);
    page.bold(SUMMARY_LABEL_X[0], SUMMARY_TITLE_Y, FIELD_SIZE, "Zusammenfassung");

    let basis = match &assessment.method {
        Method::Salary { wage_base } => ("Bemessungsgrundlage", format_money(*wage_base)),
        Method::OwnerFlatRate { hourly_rate, .. } => ("Stundensatz Eigenleistung", format_money(*hourly_rate)),
    };
    let columns = [
        [
            ("Stunden im Vorhaben", format!("{} h", format_hours(line.hours))),
            ("Anerkannte Stunden", format!("{} h", format_hours(line.counted_hours))),
            ("Jahresarbeitszeit (Soll)", format!("{} h", format_hours(assessment.capacity.hours))),
            ("Anteil an der Arbeitszeit", format_percent(line.share)),
        ],
        [
            (basis.0, basis.1),
            ("Förderfähige Aufwendungen", format_money(line.eligible_costs)),
            ("Fördersatz", format_percent(assessment.credit_rate)),
            ("Forschungszulage", format_money(line.credit)),
        ],
    ];
    for (side, rows) in columns.iter().enumerate() {
        for (i, (label, value)) in rows.iter().enumerate() {
            let y = SUMMARY_ROW_Y[i];
            page.text(SUMMARY_LABEL_X[side], y, FIELD_SIZE - 1.0, *label);
            page.push_text(Point::new(SUMMARY_VALUE_X[side], y), FIELD_SIZE - 1.0, true, Align::Right, value.as_str());
        }
    }
}

fn overview(page: &mut Page, report: &FzulReport) {
    let assessment = &report.assessment;
    page.bold(LEFT, TITLE_Y, TITLE_SIZE, format!("Forschungszulage {} - Übersicht", report.year));
    page.text(LABEL_X[0], FIELD_Y[0], FIELD_SIZE, "Unternehmen:");
    page.bold(VALUE_X[0], FIELD_Y[0], FIELD_SIZE, report.company.as_str());
    page.text(LABEL_X[0], FIELD_Y[1], FIELD_SIZE, "Mitarbeiter/in:");
    page.bold(VALUE_X[0], FIELD_Y[1], FIELD_SIZE, report.employee_name.as_str());

    let grid = Grid {
        origin_top_left: Point::new(LEFT, GRID_TOP),
        col_widths: OVERVIEW_COLS.to_vec(),
        header_height: OVERVIEW_ROW,
        row_height: OVERVIEW_ROW,
        rows: assessment.lines.len() + 1,
    };
    let total_row = assessment.lines.len() + 1;
    page.fill(grid.row_rect(0), HEADER_GREY);
    page.fill(grid.row_rect(total_row), HEADER_GREY);
    page.ops.extend(grid.rules(RULE));

    let headers = ["Vorhaben", "Vorhaben-ID", "Stunden", "anerkannt", "Anteil", "Aufwendungen"];
    for (col, title) in headers.iter().enumerate() {
        page.cell_text(grid.cell(0, col), SMALL_SIZE, true, Align::Center, title);
    }
    for (i, line) in assessment.lines.iter().enumerate() {
        let row = i + 1;
        let values = [
            (line.name.clone(), Align::Left),
            (line.funding_code.clone().unwrap_or_default(), Align::Left),
            (format_hours(line.hours), Align::Right),
            (format_hours(line.counted_hours), Align::Right),
            (format_percent(line.share), Align::Right),
            (format_money(line.eligible_costs), Align::Right),
        ];
        for (col, (text, align)) in values.iter().enumerate() {
            page.cell_text(grid.cell(row, col), SMALL_SIZE, false, *align, text);
        }
    }
    page.cell_text(grid.cell(total_row, 0), SMALL_SIZE, true, Align::Left, "Summe");
    page.cell_text(grid.cell(total_row, 2), SMALL_SIZE, true, Align::Right, &format_hours(assessment.total_hours));
    page.cell_text(grid.cell(total_row, 4), SMALL_SIZE, true, Align::Right, &format_percent(assessment.total_share));
    page.cell_text(grid.cell(total_row, 5), SMALL_SIZE, true, Align::Right, &format_money(assessment.eligible_costs));

    let mut y = grid.bottom() - 10.0;
    let capacity = &assessment.capacity;
    let method = match &assessment.method {
        Method::Salary { wage_base } => format!(
            "Berechnung: Anteil an der Jahresarbeitszeit × Bemessungsgrundlage {}",
            format_money(*wage_base)
        ),
        Method::OwnerFlatRate { hourly_rate, max_hours } => format!(
            "Berechnung: Eigenleistung {} je Stunde, höchstens {} Stunden",
            format_money(*hourly_rate),
            max_hours
        ),
    };
    let lines = [
        format!(
            "Jahresarbeitszeit (Soll): {} h ({} von {} Arbeitstagen)",
            format_hours(capacity.hours),
            capacity.employed_working_days,
            capacity.year_working_days
        ),
        method,
        format!("Fördersatz: {}", format_percent(assessment.credit_rate)),
    ];
    for text in lines {
        page.text(LEFT, y, FIELD_SIZE, text);
        y -= 6.0;
    }
    page.bold(LEFT, y, FIELD_SIZE + 1.0, format!("Forschungszulage: {}", format_money(assessment.credit)));
}

fn signatures(page: &mut Page) {
    for (x, label) in SIGNATURE_X.iter().zip(SIGNATURE_LABELS) {
        page.hline(*x, x + SIGNATURE_WIDTH, SIGNATURE_Y, 0.3);
        page.text(*x, SIGNATURE_Y - 4.0, SMALL_SIZE, label);
    }
}

/// Spreadsheet variant: one worksheet per project, plus an overview sheet
/// when there is more than one project
pub fn sheets(report: &FzulReport) -> Vec<Sheet> {
    let mut sheets = Vec::with_capacity(report.pages.len() + 1);
    for project in &report.pages {
        let name = unique_sheet_name(&sheets, project.funding_code.as_deref().unwrap_or(&project.name));
        let mut sheet = Sheet::new(&name, false);
        project_sheet(&mut sheet, report, project);
        sheets.push(sheet);
    }
    if report.pages.len() > 1 {
        let name = unique_sheet_name(&sheets, "Übersicht");
        let mut sheet = Sheet::new(&name, false);
        overview_sheet(&mut sheet, report);
        sheets.push(sheet);
    }
    sheets
}

fn project_sheet(sheet: &mut Sheet, report: &FzulReport, project: &FzulProjectPage) {
    use cells::*;

    sheet.text(TITLE, format!("Stundenaufzeichnung Forschungszulage {}", report.year), CellStyle::label());
    let dash = || "-".to_string();
    let fields = [
        (COMPANY, "Unternehmen", report.company.clone()),
        (EMPLOYEE, "Mitarbeiter/in", report.employee_name.clone()),
        (PROJECT, "Vorhaben", project.name.clone()),
        (FUNDING_CODE, "Vorhaben-ID", project.funding_code.clone().unwrap_or_else(dash)),
        (PERSONNEL_NUMBER, "Personalnummer", report.personnel_number.clone().unwrap_or_else(dash)),
    ];
    for ((row, col), label, value) in fields {
        let label_col = if col == COMPANY.1 { 0 } else { RIGHT_LABEL_COL };
        sheet.text((row, label_col), label, CellStyle::default());
        sheet.text((row, col), value, CellStyle::label());
    }
    sheet.text((YEAR.0, RIGHT_LABEL_COL), "Jahr", CellStyle::default());
    sheet.number(YEAR, f64::from(report.year), CellStyle::label());

    let header = CellStyle::header();
    sheet.text((GRID_HEADER_ROW, 0), "Tag", header);
    for month in 1..=12u16 {
        sheet.text((GRID_HEADER_ROW, month), short_month(u32::from(month)), header);
    }

    let centred = CellStyle { align: Some(Align::Center), ..CellStyle::grid() };
    for day in 1..=DAY_ROWS as u32 {
        let r = FIRST_DAY_ROW + day - 1;
        sheet.number((r, 0), f64::from(day), centred);
        for month in 1..=12u32 {
            let at = (r, month as u16);
            match project.sheet.cell(month, day) {
                None => sheet.blank(at, CellStyle::grid().filled(Some(MISSING_FILL))),
                Some(cell) => {
                    let fill = match cell.kind {
                        DayKind::Workday => None,
                        DayKind::Weekend => Some(WEEKEND_FILL),
                        DayKind::Holiday(_) => Some(HOLIDAY_FILL),
                    };
                    sheet.hours(at, cell.hours, CellStyle::hours().filled(fill));
                }
            }
        }
    }

    let totals = CellStyle::hours().bold().filled(Some(HEADER_FILL));
    sheet.text((TOTAL_ROW, 0), "Summe", CellStyle::header());
    for month in 1..=12u32 {
        sheet.decimal((TOTAL_ROW, month as u16), project.sheet.month_total(month), totals);
    }

    if let Some(line) = line_for(report, project) {
        let assessment = &report.assessment;
        let hours = CellStyle { border: false, ..CellStyle::hours() };
        let basis = match &assessment.method {
            Method::Salary { wage_base } => ("Bemessungsgrundlage", *wage_base),
            Method::OwnerFlatRate { hourly_rate, .. } => ("Stundensatz Eigenleistung", *hourly_rate),
        };
        let rows: [(&str, Decimal, CellStyle); 8] = [
            ("Stunden im Vorhaben", line.hours, hours),
            ("Anerkannte Stunden", line.counted_hours, hours),
            ("Jahresarbeitszeit (Soll)", assessment.capacity.hours, hours),
            ("Anteil an der Arbeitszeit", line.share, CellStyle::percent()),
            (basis.0, basis.1, CellStyle::money()),
            ("Förderfähige Aufwendungen", line.eligible_costs, CellStyle::money()),
            ("Fördersatz", assessment.credit_rate, CellStyle::percent()),
            ("Forschungszulage", line.credit, CellStyle::money().bold()),
        ];
        for (i, (label, value, style)) in rows.into_iter().enumerate() {
            let r = SUMMARY_ROW + i as u32;
            sheet.text((r, 0), label, CellStyle { bold: style.bold, ..CellStyle::default() });
            sheet.decimal((r, SUMMARY_VALUE_COL), value, style);
        }
    }

    sheet.text((SIGNATURE_ROW, 0), SIGNATURE_LABELS[0], CellStyle::default());
    sheet.text((SIGNATURE_ROW, RIGHT_LABEL_COL), SIGNATURE_LABELS[1], CellStyle::default());

    sheet.width(0, 5.0);
    for month in 1..=12u16 {
        sheet.width(month, 7.5);
    }
}

fn overview_sheet(sheet: &mut Sheet, report: &FzulReport) {
    use cells::{OVERVIEW_HEADER_ROW, TITLE};

    let assessment = &report.assessment;
    sheet.text(TITLE, format!("Forschungszulage {} - Übersicht", report.year), CellStyle::label());
    sheet.text((2, 0), "Unternehmen", CellStyle::default());
    sheet.text((2, 2), report.company.as_str(), CellStyle::label());
    sheet.text((3, 0), "Mitarbeiter/in", CellStyle::default());
    sheet.text((3, 2), report.employee_name.as_str(), CellStyle::label());

    let headers = ["Vorhaben", "Vorhaben-ID", "Stunden", "anerkannt", "Anteil", "Aufwendungen"];
    for (col, title) in headers.iter().enumerate() {
        sheet.text((OVERVIEW_HEADER_ROW, col as u16), *title, CellStyle::header());
    }

    let grid_hours = CellStyle::hours();
    let grid_percent = CellStyle { border: true, ..CellStyle::percent() };
    let grid_money = CellStyle { border: true, ..CellStyle::money() };
    let mut r = OVERVIEW_HEADER_ROW + 1;
    for line in &assessment.lines {
        sheet.text((r, 0), line.name.as_str(), CellStyle::grid());
        sheet.text((r, 1), line.funding_code.clone().unwrap_or_default(), CellStyle::grid());
        sheet.decimal((r, 2), line.hours, grid_hours);
        sheet.decimal((r, 3), line.counted_hours, grid_hours);
        sheet.decimal((r, 4), line.share, grid_percent);
        sheet.decimal((r, 5), line.eligible_costs, grid_money);
        r += 1;
    }
    sheet.text((r, 0), "Summe", CellStyle::grid().bold());
    sheet.decimal((r, 2), assessment.total_hours, grid_hours.bold());
    sheet.decimal((r, 4), assessment.total_share, grid_percent.bold());
    sheet.decimal((r, 5), assessment.eligible_costs, grid_money.bold());

    r += 2;
    sheet.text((r, 0), "Jahresarbeitszeit (Soll)", CellStyle::default());
    sheet.decimal((r, 5), assessment.capacity.hours, CellStyle { border: false, ..CellStyle::hours() });
    sheet.text((r + 1, 0), "Fördersatz", CellStyle::default());
    sheet.decimal((r + 1, 5), assessment.credit_rate, CellStyle::percent());
    sheet.text((r + 2, 0), "Forschungszulage", CellStyle::label());
    sheet.decimal((r + 2, 5), assessment.credit, CellStyle::money().bold());

    sheet.width(0, 30.0);
    sheet.width(1, 16.0);
    for col in 2..=5 {
        sheet.width(col, 13.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::FederalState;
    use crate::database::models::{Project, TimeEntry};
    use crate::layout::sheet::to_a1;
    use crate::layout::DrawOp;
    use crate::report::FzulInput;
    use crate::testing::fixtures::{self, date};
    use crate::types::FundingProgram;

    fn report(projects: &[Project], entries: &[TimeEntry], employee: &crate::database::models::Employee) -> FzulReport {
        let mut company = fixtures::company();
        company.federal_state = FederalState::Hamburg;
        company.is_sme = false;
        FzulReport::assemble(FzulInput { company: &company, employee, projects, entries, year: 2024 }).unwrap()
    }

    fn count_fills(page: &Page, grey: f32) -> usize {
        page.ops.iter().filter(|op| matches!(op, DrawOp::Fill { grey: g, .. } if *g == grey)).count()
    }

    #[test]
    fn one_project_one_page() {
        let employee = fixtures::employee();
        let mut project = fixtures::project(FundingProgram::Fzul);
        project.funding_code = Some("FZ-2024-01".into());
        let entries = fixtures::fill_month(&employee, &project, None, 2024, 1, FederalState::Hamburg, "4");
        let report = report(std::slice::from_ref(&project), &entries, &employee);
        let doc = document(&report);

        assert_eq!(doc.pages.len(), 1);
        let page = &doc.pages[0];
        assert_eq!(page.size, PageSize::A4Portrait);
        assert_eq!(page.find_text("Stundenaufzeichnung Forschungszulage 2024"), Some(Point::new(15.0, 282.0)));
        assert_eq!(page.find_text("FZ-2024-01"), Some(Point::new(145.0, 273.0)));
        assert_eq!(page.find_text("Seite 1 von 1"), Some(Point::new(199.0, 6.0)));

        // Feb 30/31, Apr/Jun/Sep/Nov 31 do not exist
        assert_eq!(count_fills(page, MISSING_GREY), 6);
        // Jan 2 2024: right edge of the January column, second body row
        let cell = grid().cell(2, 1);
        assert_eq!(cell.x, 25.0);
        assert_eq!(page.find_text("4,00").map(|p| p.x), Some(cell.right() - 1.0));
        // 22 working days in January 2024 in Hamburg
        assert!(page.find_text("88,00").is_some());
        assert!(page.find_text("Zusammenfassung").is_some());
        assert!(page.texts().any(|(_, t)| t == "25,00 %"));
    }

    #[test]
    fn struck_through_missing_dates() {
        let employee = fixtures::employee();
        let project = fixtures::project(FundingProgram::Fzul);
        let entries = vec![fixtures::entry(&employee, Some(&project), None, date(2024, 3, 1), "2")];
        let report = report(std::slice::from_ref(&project), &entries, &employee);
        let page = &document(&report).pages[0];

        let feb30 = grid().cell(30, 2);
        let strike = DrawOp::Line {
            from: Point::new(feb30.x, feb30.top()),
            to: Point::new(feb30.right(), feb30.y),
            width: 0.2,
        };
        assert!(page.ops.contains(&strike));
    }

    #[test]
    fn several_projects_add_an_overview() {
        let employee = fixtures::employee();
        let mut a = fixtures::project(FundingProgram::Fzul);
        a.funding_code = Some("FZ-A".into());
        let mut b = fixtures::project(FundingProgram::Fzul);
        b.funding_code = Some("FZ-B".into());
        let entries = vec![
            fixtures::entry(&employee, Some(&a), None, date(2024, 5, 6), "6"),
            fixtures::entry(&employee, Some(&b), None, date(2024, 5, 7), "2"),
        ];
        let report = report(&[a, b], &entries, &employee);
        let doc = document(&report);

        assert_eq!(doc.pages.len(), 3);
        let overview = &doc.pages[2];
        assert!(overview.find_text("Forschungszulage 2024 - Übersicht").is_some());
        assert!(overview.find_text("Seite 3 von 3").is_some());
        assert!(overview.find_text("FZ-A").is_some());
        assert!(overview.texts().any(|(_, t)| t.starts_with("Forschungszulage: ")));

        let sheets = sheets(&report);
        let names: Vec<&str> = sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["FZ-A", "FZ-B", "Übersicht"]);
        assert_eq!(sheets[2].text_at("A8"), Some("Sensorfusion"));
        assert_eq!(sheets[2].number_at("C10"), Some(8.0));
    }

    #[test]
    fn project_page_credits_match_the_overview() {
        let employee = fixtures::employee();
        let projects: Vec<Project> = ["FZ-1", "FZ-2", "FZ-3"]
            .iter()
            .map(|code| {
                let mut p = fixtures::project(FundingProgram::Fzul);
                p.funding_code = Some(code.to_string());
                p
            })
            .collect();
        let entries = vec![
            fixtures::entry(&employee, Some(&projects[0]), None, date(2024, 5, 6), "3.33"),
            fixtures::entry(&employee, Some(&projects[1]), None, date(2024, 5, 7), "1.11"),
            fixtures::entry(&employee, Some(&projects[2]), None, date(2024, 5, 8), "0.77"),
        ];
        let report = report(&projects, &entries, &employee);
        let assessment = &report.assessment;

        let sum: Decimal = assessment.lines.iter().map(|l| l.credit).sum();
        assert_eq!(sum, assessment.credit);

        let doc = document(&report);
        assert_eq!(doc.pages.len(), 4);
        for line in &assessment.lines {
            let printed = format_money(line.credit);
            assert!(
                doc.pages[..3].iter().any(|page| page.texts().any(|(_, t)| t == printed)),
                "credit {} of {} not printed",
                printed,
                line.name
            );
        }
        let total = format!("Forschungszulage: {}", format_money(assessment.credit));
        assert!(doc.pages[3].find_text(&total).is_some());
    }

    #[test]
    fn spreadsheet_anchors() {
        let employee = fixtures::employee();
        let project = fixtures::project(FundingProgram::Fzul);
        let entries = vec![
            fixtures::entry(&employee, Some(&project), None, date(2024, 3, 4), "3.5"),
            fixtures::entry(&employee, Some(&project), None, date(2024, 12, 31), "1"),
        ];
        let report = report(std::slice::from_ref(&project), &entries, &employee);
        let sheets = sheets(&report);
        assert_eq!(sheets.len(), 1);
        let sheet = &sheets[0];

        assert_eq!(sheet.name, "KK5012301AB4");
        assert_eq!(to_a1(cells::YEAR), "J5");
        assert_eq!(sheet.number_at("J5"), Some(2024.0));
        assert_eq!(sheet.text_at("C4"), Some("Mustermann, Erika"));
        assert_eq!(sheet.text_at("D7"), Some("Mär"));
        // March 4th → column D, row 11
        assert_eq!(sheet.number_at("D11"), Some(3.5));
        assert_eq!(sheet.number_at("M38"), Some(1.0));
        assert_eq!(sheet.number_at("D39"), Some(3.5));
        // 30 February is greyed out without a value
        let feb30 = sheet.get("C37").unwrap();
        assert!(feb30.value.is_none());
        assert_eq!(feb30.style.fill, Some(MISSING_FILL));
        assert_eq!(sheet.text_at("A41"), Some("Stunden im Vorhaben"));
        assert_eq!(sheet.number_at("E41"), Some(4.5));
    }
}
