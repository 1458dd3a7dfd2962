pub mod config;
pub mod entry;
pub mod line;
pub mod report;
pub mod script;
