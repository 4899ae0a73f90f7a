pub mod config;
pub mod pr;
