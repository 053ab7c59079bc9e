//! Entry Submission Frontend Entry Point

mod api;
mod app;
mod auth;
mod browser;
mod components;
mod config;
mod context;
mod controller;
mod error;
mod logging;
mod models;
mod session;

use app::{App, ConfigErrorView};
use config::AppConfig;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();

    match AppConfig::load() {
        Ok(config) => {
            logging::init(config.log_level);
            log::info!("items API at {}", config.api_base);
            mount_to_body(move || view! { <App config=config /> });
        }
        Err(e) => {
            logging::init(log::LevelFilter::Error);
            log::error!("{}", e);
            let message = e.to_string();
            mount_to_body(move || view! { <ConfigErrorView message=message /> });
        }
    }
}
