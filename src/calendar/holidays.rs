use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;

use super::easter::easter_sunday;
use super::state::FederalState;
use super::CalendarError;

use FederalState::*;

/// How a holiday date is derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HolidayKind {
    Fixed,
    EasterRelative,
    Computed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: String,
    pub kind: HolidayKind,
}

#[derive(Debug, Clone, Copy)]
enum DateRule {
    Fixed { month: u32, day: u32 },
    Easter(i64),
    /// Wednesday before November 23
    RepentanceDay,
}

#[derive(Debug, Clone, Copy)]
enum Scope {
    All,
    Only(&'static [FederalState]),
}

#[derive(Debug, Clone, Copy)]
struct Rule {
    name: &'static str,
    date: DateRule,
    scope: Scope,
    from: Option<i32>,
    until: Option<i32>,
}

const fn rule(name: &'static str, date: DateRule, scope: Scope) -> Rule {
    Rule { name, date, scope, from: None, until: None }
}

const fn fixed(month: u32, day: u32) -> DateRule {
    DateRule::Fixed { month, day }
}

const RULES: &[Rule] = &[
    rule("Neujahr", fixed(1, 1), Scope::All),
    rule("Heilige Drei Könige", fixed(1, 6), Scope::Only(&[BadenWuerttemberg, Bayern, SachsenAnhalt])),
    Rule { from: Some(2019), ..rule("Internationaler Frauentag", fixed(3, 8), Scope::Only(&[Berlin])) },
    Rule { from: Some(2023), ..rule("Internationaler Frauentag", fixed(3, 8), Scope::Only(&[MecklenburgVorpommern])) },
    rule("Karfreitag", DateRule::Easter(-2), Scope::All),
    rule("Ostersonntag", DateRule::Easter(0), Scope::Only(&[Brandenburg])),
    rule("Ostermontag", DateRule::Easter(1), Scope::All),
    rule("Tag der Arbeit", fixed(5, 1), Scope::All),
    Rule { from: Some(2020), until: Some(2020), ..rule("Tag der Befreiung", fixed(5, 8), Scope::Only(&[Berlin])) },
    Rule { from: Some(2025), until: Some(2025), ..rule("Tag der Befreiung", fixed(5, 8), Scope::Only(&[Berlin])) },
    rule("Christi Himmelfahrt", DateRule::Easter(39), Scope::All),
    rule("Pfingstsonntag", DateRule::Easter(49), Scope::Only(&[Brandenburg])),
    rule("Pfingstmontag", DateRule::Easter(50), Scope::All),
    rule(
        "Fronleichnam",
        DateRule::Easter(60),
        Scope::Only(&[BadenWuerttemberg, Bayern, Hessen, NordrheinWestfalen, RheinlandPfalz, Saarland]),
    ),
    rule("Mariä Himmelfahrt", fixed(8, 15), Scope::Only(&[Saarland])),
    Rule { from: Some(2019), ..rule("Weltkindertag", fixed(9, 20), Scope::Only(&[Thueringen])) },
    Rule { from: Some(1990), ..rule("Tag der Deutschen Einheit", fixed(10, 3), Scope::All) },
    rule(
        "Reformationstag",
        fixed(10, 31),
        Scope::Only(&[Brandenburg, MecklenburgVorpommern, Sachsen, SachsenAnhalt, Thueringen]),
    ),
    Rule {
        from: Some(2018),
        ..rule("Reformationstag", fixed(10, 31), Scope::Only(&[Bremen, Hamburg, Niedersachsen, SchleswigHolstein]))
    },
    Rule { from: Some(2017), until: Some(2017), ..rule("Reformationstag", fixed(10, 31), Scope::All) },
    rule(
        "Allerheiligen",
        fixed(11, 1),
        Scope::Only(&[BadenWuerttemberg, Bayern, NordrheinWestfalen, RheinlandPfalz, Saarland]),
    ),
    rule("Buß- und Bettag", DateRule::RepentanceDay, Scope::Only(&[Sachsen])),
    Rule { until: Some(1994), ..rule("Buß- und Bettag", DateRule::RepentanceDay, Scope::All) },
    rule("1. Weihnachtstag", fixed(12, 25), Scope::All),
    rule("2. Weihnachtstag", fixed(12, 26), Scope::All),
];

impl Rule {
    fn applies(&self, year: i32, state: FederalState) -> bool {
        if self.from.is_some_and(|from| year < from) || self.until.is_some_and(|until| year > until) {
            return false;
        }
        match self.scope {
            Scope::All => true,
            Scope::Only(states) => states.contains(&state),
        }
    }

    fn resolve(&self, year: i32, easter: NaiveDate) -> Result<(NaiveDate, HolidayKind), CalendarError> {
        match self.date {
            DateRule::Fixed { month, day } => NaiveDate::from_ymd_opt(year, month, day)
                .map(|d| (d, HolidayKind::Fixed))
                .ok_or(CalendarError::YearOutOfRange(year)),
            DateRule::Easter(offset) => Ok((easter + Duration::days(offset), HolidayKind::EasterRelative)),
            DateRule::RepentanceDay => {
                let mut date = NaiveDate::from_ymd_opt(year, 11, 22).ok_or(CalendarError::YearOutOfRange(year))?;
                while date.weekday() != Weekday::Wed {
                    date = date.pred_opt().ok_or(CalendarError::YearOutOfRange(year))?;
                }
                Ok((date, HolidayKind::Computed))
            }
        }
    }
}

/// Statutory holidays of `year` in `state`, sorted by date.
///
/// When two holidays fall on the same date (e.g. Ascension on May 1st in 2008)
/// they are merged into one entry with both names.
pub fn holidays(year: i32, state: FederalState) -> Result<Vec<Holiday>, CalendarError> {
    let easter = easter_sunday(year)?;
    let mut result: Vec<Holiday> = Vec::with_capacity(16);

    for rule in RULES.iter().filter(|r| r.applies(year, state)) {
        let (date, kind) = rule.resolve(year, easter)?;
        match result.iter_mut().find(|h| h.date == date) {
            Some(existing) if existing.name.split(" / ").any(|n| n == rule.name) => {}
            Some(existing) => {
                existing.name = format!("{} / {}", existing.name, rule.name);
            }
            None => result.push(Holiday { date, name: rule.name.to_string(), kind }),
        }
    }

    result.sort_by_key(|h| h.date);
    Ok(result)
}

/// Precomputed holidays of one year and state, for repeated lookups while laying out grids
#[derive(Debug, Clone, Serialize)]
pub struct HolidayCalendar {
    pub year: i32,
    pub state: FederalState,
    pub holidays: Vec<Holiday>,
}

impl HolidayCalendar {
    pub fn new(year: i32, state: FederalState) -> Result<Self, CalendarError> {
        Ok(Self { year, state, holidays: holidays(year, state)? })
    }

    pub fn get(&self, date: NaiveDate) -> Option<&Holiday> {
        if date.year() != self.year {
            return None;
        }
        self.holidays.iter().find(|h| h.date == date)
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.get(date).is_some()
    }

    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        !super::is_weekend(date) && !self.is_holiday(date)
    }

    /// Holidays that fall on Monday to Friday
    pub fn weekday_holidays(&self) -> impl Iterator<Item = &Holiday> {
        self.holidays.iter().filter(|h| !super::is_weekend(h.date))
    }
}

pub fn is_holiday(date: NaiveDate, state: FederalState) -> Result<bool, CalendarError> {
    Ok(holiday_name(date, state)?.is_some())
}

pub fn holiday_name(date: NaiveDate, state: FederalState) -> Result<Option<String>, CalendarError> {
    Ok(holidays(date.year(), state)?
        .into_iter()
        .find(|h| h.date == date)
        .map(|h| h.name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn names(year: i32, state: FederalState) -> Vec<String> {
        holidays(year, state).unwrap().into_iter().map(|h| h.name).collect()
    }

    #[test]
    fn nationwide_holidays_2024_in_berlin() {
        let list = holidays(2024, Berlin).unwrap();
        let dates: Vec<_> = list.iter().map(|h| h.date).collect();
        assert_eq!(
            dates,
            vec![
                date(2024, 1, 1),
                date(2024, 3, 8),
                date(2024, 3, 29),
                date(2024, 4, 1),
                date(2024, 5, 1),
                date(2024, 5, 9),
                date(2024, 5, 20),
                date(2024, 10, 3),
                date(2024, 12, 25),
                date(2024, 12, 26),
            ]
        );
    }

    #[test]
    fn bavaria_has_catholic_holidays() {
        let list = names(2024, Bayern);
        assert!(list.contains(&"Heilige Drei Könige".to_string()));
        assert!(list.contains(&"Fronleichnam".to_string()));
        assert!(list.contains(&"Allerheiligen".to_string()));
        assert!(!list.contains(&"Reformationstag".to_string()));
        assert_eq!(list.len(), 12);
    }

    #[test]
    fn corpus_christi_is_easter_plus_sixty() {
        let list = holidays(2025, NordrheinWestfalen).unwrap();
        let fronleichnam = list.iter().find(|h| h.name == "Fronleichnam").unwrap();
        assert_eq!(fronleichnam.date, date(2025, 6, 19));
        assert_eq!(fronleichnam.kind, HolidayKind::EasterRelative);
    }

    #[test]
    fn reformation_day_depends_on_year() {
        assert!(!names(2016, Niedersachsen).contains(&"Reformationstag".to_string()));
        assert!(names(2017, Niedersachsen).contains(&"Reformationstag".to_string()));
        assert!(names(2017, Bayern).contains(&"Reformationstag".to_string()));
        assert!(!names(2018, Bayern).contains(&"Reformationstag".to_string()));
        assert!(names(2018, Hamburg).contains(&"Reformationstag".to_string()));
    }

    #[test]
    fn reformation_day_2017_is_not_duplicated_in_saxony() {
        let list = holidays(2017, Sachsen).unwrap();
        assert_eq!(list.iter().filter(|h| h.date == date(2017, 10, 31)).count(), 1);
        let entry = list.iter().find(|h| h.date == date(2017, 10, 31)).unwrap();
        assert_eq!(entry.name, "Reformationstag");
    }

    #[test]
    fn repentance_day_in_saxony() {
        let list = holidays(2024, Sachsen).unwrap();
        let day = list.iter().find(|h| h.name == "Buß- und Bettag").unwrap();
        assert_eq!(day.date, date(2024, 11, 20));
        let list = holidays(2023, Sachsen).unwrap();
        let day = list.iter().find(|h| h.name == "Buß- und Bettag").unwrap();
        assert_eq!(day.date, date(2023, 11, 22));
    }

    #[test]
    fn brandenburg_keeps_easter_and_whit_sunday() {
        let list = names(2024, Brandenburg);
        assert!(list.contains(&"Ostersonntag".to_string()));
        assert!(list.contains(&"Pfingstsonntag".to_string()));
        assert!(list.contains(&"Reformationstag".to_string()));
    }

    #[test]
    fn one_off_liberation_day_in_berlin() {
        assert!(names(2020, Berlin).contains(&"Tag der Befreiung".to_string()));
        assert!(!names(2021, Berlin).contains(&"Tag der Befreiung".to_string()));
        assert!(names(2025, Berlin).contains(&"Tag der Befreiung".to_string()));
        assert!(!names(2025, Brandenburg).contains(&"Tag der Befreiung".to_string()));
    }

    #[test]
    fn womens_day_introduced_per_state() {
        assert!(!names(2018, Berlin).contains(&"Internationaler Frauentag".to_string()));
        assert!(names(2019, Berlin).contains(&"Internationaler Frauentag".to_string()));
        assert!(!names(2022, MecklenburgVorpommern).contains(&"Internationaler Frauentag".to_string()));
        assert!(names(2023, MecklenburgVorpommern).contains(&"Internationaler Frauentag".to_string()));
    }

    #[test]
    fn colliding_holidays_are_merged() {
        // Ascension fell on May 1st in 2008
        let list = holidays(2008, Hessen).unwrap();
        let may_first: Vec<_> = list.iter().filter(|h| h.date == date(2008, 5, 1)).collect();
        assert_eq!(may_first.len(), 1);
        assert_eq!(may_first[0].name, "Tag der Arbeit / Christi Himmelfahrt");
    }

    #[test]
    fn dates_are_unique_sorted_and_in_year() {
        for year in [1995, 2008, 2017, 2020, 2024, 2030] {
            for state in FederalState::ALL {
                let list = holidays(year, state).unwrap();
                assert!(list.windows(2).all(|w| w[0].date < w[1].date), "{} {}", year, state);
                assert!(list.iter().all(|h| h.date.year() == year));
            }
        }
    }

    #[test]
    fn calendar_lookups() {
        let cal = HolidayCalendar::new(2024, Saarland).unwrap();
        assert!(cal.is_holiday(date(2024, 8, 15)));
        assert!(!cal.is_working_day(date(2024, 8, 15)));
        assert!(!cal.is_working_day(date(2024, 8, 17)));
        assert!(cal.is_working_day(date(2024, 8, 16)));
        assert!(cal.get(date(2025, 1, 1)).is_none());
        assert_eq!(
            holiday_name(date(2024, 11, 1), Saarland).unwrap().as_deref(),
            Some("Allerheiligen")
        );
        assert!(!is_holiday(date(2024, 11, 1), Hamburg).unwrap());
    }
}
