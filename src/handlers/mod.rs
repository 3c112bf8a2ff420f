// handlers/mod.rs - two handler tiers
//
// Public (no auth): service info, health, holiday calendars, company registration
// Protected (JWT + company + employee validated): everything under /api

pub mod protected;
pub mod public;
