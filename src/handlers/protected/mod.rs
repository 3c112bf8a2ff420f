// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Route prefix: /api/*
// Middleware: JWT validation -> company validation -> employee validation.
// Handlers receive TenantPool, ValidatedCompany and ValidatedEmployee as
// request extensions and do their own role checks.

pub mod absences;
pub mod employees;
pub mod members;
pub mod projects;
pub mod reports;
pub mod time_entries;
pub mod whoami;
pub mod work_packages;
