use chrono::NaiveDate;

use super::CalendarError;

pub const MIN_YEAR: i32 = 1583;
pub const MAX_YEAR: i32 = 9999;

/// Easter Sunday of the Gregorian calendar, computed with Gauss's algorithm
/// (including the two corrections for April 26 and April 25).
pub fn easter_sunday(year: i32) -> Result<NaiveDate, CalendarError> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(CalendarError::YearOutOfRange(year));
    }

    let a = year % 19;
    let b = year % 4;
    let c = year % 7;
    let k = year / 100;
    let p = (13 + 8 * k) / 25;
    let q = k / 4;
    let m = (15 - p + k - q) % 30;
    let n = (4 + k - q) % 7;
    let d = (19 * a + m) % 30;
    let e = (2 * b + 4 * c + 6 * d + n) % 7;

    // Days after March 22
    let mut offset = d + e;
    if d == 29 && e == 6 {
        offset -= 7;
    } else if d == 28 && e == 6 && (11 * m + 11) % 30 < 19 {
        offset -= 7;
    }

    let march_22 = NaiveDate::from_ymd_opt(year, 3, 22).ok_or(CalendarError::YearOutOfRange(year))?;
    Ok(march_22 + chrono::Duration::days(offset as i64))
}
