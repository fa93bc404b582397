pub mod file;
pub mod mysql;
pub mod sink;
