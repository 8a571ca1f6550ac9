pub mod config;
pub mod dashboard;
pub mod display;
pub mod notice;
pub mod store;
pub mod table;
pub mod trends;
