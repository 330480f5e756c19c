pub mod app;
pub mod config;
pub mod domain;
pub mod email;
pub mod notification;
pub mod store;
pub mod telemetry;
