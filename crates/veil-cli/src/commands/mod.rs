pub mod auth;
pub mod config;
pub mod media;
pub mod service;
