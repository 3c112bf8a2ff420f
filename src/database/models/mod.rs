pub mod company;
pub mod employee;
pub mod project;
pub mod time_entry;

pub use company::Company;
pub use employee::Employee;
pub use project::{Project, ProjectMember, WorkPackage};
pub use time_entry::{Absence, TimeEntry};
