pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod gemini;
pub mod handlers;
pub mod middleware;
pub mod pagination;
pub mod services;
pub mod types;

#[cfg(test)]
pub mod testing;
