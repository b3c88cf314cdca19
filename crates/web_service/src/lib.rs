pub mod controllers;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod server;
pub mod services;

pub use server::{app_config, run, update_code_config, AppState};
