pub mod cli;
pub mod config;
pub mod controller;
pub mod dashboard;
pub mod error;
pub mod gateway;
pub mod guard;
pub mod models;
pub mod public;
pub mod types;

pub use error::{AdminError, AdminResult};
