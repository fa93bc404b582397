pub mod core;
pub mod mapping;
pub mod records;
pub mod report;
