// Wedding Color Stylist - AI-assisted outfit color pairing with image previews

#![warn(clippy::all)]
#![windows_subsystem = "windows"]

mod app;
mod color;
mod config;
mod gateway;
mod theme;
mod types;
mod widgets;
mod workflow;

use anyhow::Context;
use app::WeddingStylist;
use config::Config;
use gateway::GeminiClient;
use iced::{application, Font, Settings, Size};
use std::path::PathBuf;
use std::sync::Arc;
use theme::{WINDOW_HEIGHT, WINDOW_WIDTH};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "wedding_stylist=info,warn";

fn logs_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|p| p.join("wedding-stylist").join("logs"))
}

// Rolling file logs (plus stdout in debug builds); console only if the log dir is unusable
fn init_logging() -> Option<WorkerGuard> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let appender = logs_dir()
        .filter(|dir| std::fs::create_dir_all(dir).is_ok())
        .and_then(|dir| {
            RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .max_log_files(5)
                .filename_prefix("wedding-stylist")
                .filename_suffix("log")
                .build(dir)
                .ok()
        });

    let Some(appender) = appender else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
        tracing::warn!("File logging unavailable, using console only");
        return None;
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);
    let console_layer = cfg!(debug_assertions).then(|| fmt::layer().with_writer(std::io::stdout));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    if let Some(dir) = logs_dir() {
        tracing::info!("Logging to {:?}", dir);
    }
    Some(guard)
}

fn main() -> anyhow::Result<()> {
    let _log_guard = init_logging();

    let config = Config::from_env()
        .inspect_err(|e| tracing::error!(error = %e, "refusing to start"))
        .context("failed to load configuration")?;
    tracing::info!(
        api_base = %config.api_base,
        text_model = %config.text_model,
        image_model = %config.image_model,
        timeout_secs = config.timeout.as_secs(),
        "configuration loaded"
    );

    let gateway = Arc::new(GeminiClient::new(config).context("failed to build HTTP client")?);

    application(
        "Pakistani Wedding Color Stylist",
        WeddingStylist::update,
        WeddingStylist::view,
    )
    .theme(WeddingStylist::theme)
    .subscription(WeddingStylist::subscription)
    .settings(Settings {
        default_font: Font::DEFAULT,
        default_text_size: theme::FONT_MD.into(),
        antialiasing: true,
        ..Settings::default()
    })
    .window_size(Size::new(WINDOW_WIDTH, WINDOW_HEIGHT))
    .run_with(move || WeddingStylist::new(gateway))
    .context("GUI event loop failed")?;

    Ok(())
}
