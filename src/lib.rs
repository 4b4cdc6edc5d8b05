pub mod app;
pub mod auth;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod error;
pub mod lookup;
pub mod meals;
pub mod state;
pub mod storage;
pub mod telemetry;
pub mod users;
