mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn root_lists_endpoints() -> Result<()> {
    let server = common::ensure_server().await?;
    let res = reqwest::get(server.url("/")).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "foerderzeit");
    assert!(body["data"]["endpoints"]["reports"].is_string());
    Ok(())
}

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::ensure_server().await?;
    let res = reqwest::get(server.url("/health")).await?;

    // OK with a database, SERVICE_UNAVAILABLE without one
    assert!(
        res.status() == StatusCode::OK || res.status() == StatusCode::SERVICE_UNAVAILABLE,
        "unexpected status: {}",
        res.status()
    );
    let body: Value = res.json().await?;
    assert!(body["success"].is_boolean());
    Ok(())
}

#[tokio::test]
async fn holidays_for_bavaria() -> Result<()> {
    let server = common::ensure_server().await?;
    let res = reqwest::get(server.url("/holidays/2024?state=BY")).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    let holidays = body["data"]["holidays"].as_array().cloned().unwrap_or_default();
    let dates: Vec<&str> = holidays.iter().filter_map(|h| h["date"].as_str()).collect();
    assert!(dates.contains(&"2024-01-06"), "Epiphany missing: {:?}", dates);
    assert!(dates.contains(&"2024-03-29"), "Good Friday missing: {:?}", dates);
    assert!(!dates.contains(&"2024-10-31"), "Reformation Day is not a holiday in BY");
    Ok(())
}

#[tokio::test]
async fn workdays_of_may_2024_in_nrw() -> Result<()> {
    let server = common::ensure_server().await?;
    let res = reqwest::get(server.url("/holidays/2024/5/workdays?state=NW")).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    // 23 weekdays minus May 1st, Ascension, Whit Monday and Corpus Christi
    assert_eq!(body["data"]["working_days"], 19);
    assert_eq!(body["data"]["days_in_month"], 31);
    Ok(())
}

#[tokio::test]
async fn unknown_state_is_a_validation_error() -> Result<()> {
    let server = common::ensure_server().await?;
    let res = reqwest::get(server.url("/holidays/2024?state=ZZ")).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = res.json().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["field_errors"]["state"].is_string());
    Ok(())
}
