use leptos::*;
use wasm_bindgen::prelude::*;

use crate::app::{App, LeptosLogger};
use crate::domain::logging::{LogComponent, get_logger};
use crate::infrastructure::{
    config::AppConfig,
    services::{BrowserTimeProvider, ConsoleLogger},
};

pub mod app;
pub mod application;
pub mod domain;
pub mod global_state;
pub mod infrastructure;
pub mod presentation;
pub mod time_utils;
pub mod view_state;

/// Installs logging, reads the page config and mounts the dashboard
#[wasm_bindgen(start)]
pub fn initialize() {
    console_error_panic_hook::set_once();

    let loaded = AppConfig::read_document();
    let config = loaded.clone().unwrap_or_default();

    domain::logging::init_time_provider(Box::new(BrowserTimeProvider::new()));
    domain::logging::init_logger(Box::new(LeptosLogger::new(ConsoleLogger::new(
        config.log_level,
    ))));

    if let Err(e) = loaded {
        get_logger().warn(
            LogComponent::Infrastructure("Config"),
            &format!("{}; using defaults", e),
        );
    }
    get_logger().info(
        LogComponent::Presentation("Initialize"),
        &format!("provider {}", config.base_url),
    );

    mount_to_body(move || view! { <App config=config.clone() /> });
}
