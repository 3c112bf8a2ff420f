pub mod auth;
pub mod calendar;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod funding;
pub mod handlers;
pub mod layout;
pub mod middleware;
pub mod render;
pub mod report;
pub mod routes;
pub mod services;
pub mod timesheet;
pub mod types;

#[cfg(test)]
pub mod testing;
