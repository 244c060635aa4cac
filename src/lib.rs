pub mod auth;
pub mod config;
pub mod domain;
pub mod email_client;
pub mod oauth;
pub mod routes;
pub mod session_state;
pub mod startup;
pub mod telemetry;
pub mod utils;
