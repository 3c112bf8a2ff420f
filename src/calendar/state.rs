use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::CalendarError;

/// German federal state (Bundesland). Holiday rules differ per state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "federal_state")]
pub enum FederalState {
    #[serde(rename = "BW")]
    #[sqlx(rename = "BW")]
    BadenWuerttemberg,
    #[serde(rename = "BY")]
    #[sqlx(rename = "BY")]
    Bayern,
    #[serde(rename = "BE")]
    #[sqlx(rename = "BE")]
    Berlin,
    #[serde(rename = "BB")]
    #[sqlx(rename = "BB")]
    Brandenburg,
    #[serde(rename = "HB")]
    #[sqlx(rename = "HB")]
    Bremen,
    #[serde(rename = "HH")]
    #[sqlx(rename = "HH")]
    Hamburg,
    #[serde(rename = "HE")]
    #[sqlx(rename = "HE")]
    Hessen,
    #[serde(rename = "MV")]
    #[sqlx(rename = "MV")]
    MecklenburgVorpommern,
    #[serde(rename = "NI")]
    #[sqlx(rename = "NI")]
    Niedersachsen,
    #[serde(rename = "NW")]
    #[sqlx(rename = "NW")]
    NordrheinWestfalen,
    #[serde(rename = "RP")]
    #[sqlx(rename = "RP")]
    RheinlandPfalz,
    #[serde(rename = "SL")]
    #[sqlx(rename = "SL")]
    Saarland,
    #[serde(rename = "SN")]
    #[sqlx(rename = "SN")]
    Sachsen,
    #[serde(rename = "ST")]
    #[sqlx(rename = "ST")]
    SachsenAnhalt,
    #[serde(rename = "SH")]
    #[sqlx(rename = "SH")]
    SchleswigHolstein,
    #[serde(rename = "TH")]
    #[sqlx(rename = "TH")]
    Thueringen,
}

impl FederalState {
    pub const ALL: [FederalState; 16] = [
        FederalState::BadenWuerttemberg,
        FederalState::Bayern,
        FederalState::Berlin,
        FederalState::Brandenburg,
        FederalState::Bremen,
        FederalState::Hamburg,
        FederalState::Hessen,
        FederalState::MecklenburgVorpommern,
        FederalState::Niedersachsen,
        FederalState::NordrheinWestfalen,
        FederalState::RheinlandPfalz,
        FederalState::Saarland,
        FederalState::Sachsen,
        FederalState::SachsenAnhalt,
        FederalState::SchleswigHolstein,
        FederalState::Thueringen,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            FederalState::BadenWuerttemberg => "BW",
            FederalState::Bayern => "BY",
            FederalState::Berlin => "BE",
            FederalState::Brandenburg => "BB",
            FederalState::Bremen => "HB",
            FederalState::Hamburg => "HH",
            FederalState::Hessen => "HE",
            FederalState::MecklenburgVorpommern => "MV",
            FederalState::Niedersachsen => "NI",
            FederalState::NordrheinWestfalen => "NW",
            FederalState::RheinlandPfalz => "RP",
            FederalState::Saarland => "SL",
            FederalState::Sachsen => "SN",
            FederalState::SachsenAnhalt => "ST",
            FederalState::SchleswigHolstein => "SH",
            FederalState::Thueringen => "TH",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FederalState::BadenWuerttemberg => "Baden-Württemberg",
            FederalState::Bayern => "Bayern",
            FederalState::Berlin => "Berlin",
            FederalState::Brandenburg => "Brandenburg",
            FederalState::Bremen => "Bremen",
            FederalState::Hamburg => "Hamburg",
            FederalState::Hessen => "Hessen",
            FederalState::MecklenburgVorpommern => "Mecklenburg-Vorpommern",
            FederalState::Niedersachsen => "Niedersachsen",
            FederalState::NordrheinWestfalen => "Nordrhein-Westfalen",
            FederalState::RheinlandPfalz => "Rheinland-Pfalz",
            FederalState::Saarland => "Saarland",
            FederalState::Sachsen => "Sachsen",
            FederalState::SachsenAnhalt => "Sachsen-Anhalt",
            FederalState::SchleswigHolstein => "Schleswig-Holstein",
            FederalState::Thueringen => "Thüringen",
        }
    }
}

impl fmt::Display for FederalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for FederalState {
    type Err = CalendarError;

    /// Accepts the two-letter code or the German name, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        FederalState::ALL
            .iter()
            .copied()
            .find(|state| {
                state.code().eq_ignore_ascii_case(needle)
                    || state.name().to_lowercase() == needle.to_lowercase()
            })
            .ok_or_else(|| CalendarError::UnknownState(needle.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_and_names() {
        assert_eq!("by".parse::<FederalState>().unwrap(), FederalState::Bayern);
        assert_eq!("NW".parse::<FederalState>().unwrap(), FederalState::NordrheinWestfalen);
        assert_eq!("thüringen".parse::<FederalState>().unwrap(), FederalState::Thueringen);
        assert_eq!(" Sachsen-Anhalt ".parse::<FederalState>().unwrap(), FederalState::SachsenAnhalt);
    }

    #[test]
    fn rejects_unknown_state() {
        let err = "XX".parse::<FederalState>().unwrap_err();
        assert!(matches!(err, CalendarError::UnknownState(s) if s == "XX"));
    }

    #[test]
    fn codes_are_unique() {
        let mut codes: Vec<_> = FederalState::ALL.iter().map(|s| s.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), 16);
    }

    #[test]
    fn serializes_as_code() {
        assert_eq!(serde_json::to_value(FederalState::Hessen).unwrap(), serde_json::json!("HE"));
        let back: FederalState = serde_json::from_value(serde_json::json!("SH")).unwrap();
        assert_eq!(back, FederalState::SchleswigHolstein);
    }
}
