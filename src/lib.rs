pub mod auth;
pub mod clients;
pub mod config;
pub mod database;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod policy;
pub mod verification;
