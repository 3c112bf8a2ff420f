pub mod calendar;
pub mod company;
pub mod db;
pub mod export;
pub mod token;
