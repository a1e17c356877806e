pub mod config;
pub mod http;
pub mod rendering;
pub mod services;
