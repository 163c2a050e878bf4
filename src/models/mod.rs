pub mod appointment;
pub mod field;
pub mod submission;
