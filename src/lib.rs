pub mod config;
pub mod error;
pub mod fetch;
pub mod forecast;
pub mod infra;
pub mod observation;
pub mod output;
pub mod server;
pub mod services;
