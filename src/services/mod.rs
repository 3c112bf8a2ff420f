pub mod company_service;
pub mod report_service;

pub use company_service::{CompanyError, CompanyService};
pub use report_service::ReportService;
