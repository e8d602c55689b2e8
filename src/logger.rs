// src/logger.rs

use crate::config::Config;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;

/// Инициализация логирования через tracing
pub fn init(cfg: &Config) {
    // Уровень берём из RUST_LOG, иначе INFO
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false) // не показывать target (модуль)
        .init();

    tracing::info!("Logger initialized. App = {}", cfg.app_name);
}
