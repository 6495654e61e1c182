pub mod browse;
pub mod catalog;
pub mod employee;
