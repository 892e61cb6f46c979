pub mod env_keys;
pub mod config;
pub mod service;
