// Shared library for the employee platform services

pub mod auth;
pub mod bootstrap;
pub mod bulk;
pub mod config;
pub mod db;
pub mod errors;
pub mod health;
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod response;
pub mod telemetry;
pub mod validation;
