pub mod app;
pub mod auth;
pub mod blogs;
pub mod config;
pub mod error;
pub mod pagination;
pub mod state;
pub mod uploads;
