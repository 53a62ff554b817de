pub mod admin;
pub mod auth;
pub mod config;
pub mod dishes;
pub mod error;
pub mod generator;
pub mod kitchen;
pub mod output;
pub mod recipe;
pub mod server;
pub mod storage;
pub mod synthesis;
