use axum::extract::{Path, Query};
use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::calendar::{self, FederalState, Holiday};
use crate::config;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct StateQuery {
    pub state: Option<String>,
}

impl StateQuery {
    /// Requested state or the configured default
    pub fn resolve(&self) -> Result<FederalState, ApiError> {
        match self.state.as_deref() {
            Some(s) => Ok(s.parse()?),
            None => Ok(config::config().report.default_state),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HolidayList {
    pub year: i32,
    pub state: FederalState,
    pub state_name: &'static str,
    pub holidays: Vec<Holiday>,
}

/// GET /holidays/:year?state=XX
pub async fn holidays_get(Path(year): Path<i32>, Query(query): Query<StateQuery>) -> ApiResult<HolidayList> {
    let state = query.resolve()?;
    let holidays = calendar::holidays(year, state)?;
    Ok(ApiResponse::success(HolidayList {
        year,
        state,
        state_name: state.name(),
        holidays,
    }))
}

#[derive(Debug, Serialize)]
pub struct MonthWorkdays {
    pub year: i32,
    pub month: u32,
    pub month_name: &'static str,
    pub state: FederalState,
    pub days_in_month: u32,
    pub working_days: u32,
    pub holidays: Vec<Holiday>,
}

/// GET /holidays/:year/:month/workdays?state=XX
pub async fn workdays_get(
    Path((year, month)): Path<(i32, u32)>,
    Query(query): Query<StateQuery>,
) -> ApiResult<MonthWorkdays> {
    let state = query.resolve()?;
    let working_days = calendar::working_days(year, month, state)?;
    let holidays = calendar::holidays(year, state)?
        .into_iter()
        .filter(|h| h.date.month() == month)
        .collect();

    Ok(ApiResponse::success(MonthWorkdays {
        year,
        month,
        month_name: calendar::month_name(month)?,
        state,
        days_in_month: calendar::days_in_month(year, month)?,
        working_days,
        holidays,
    }))
}
