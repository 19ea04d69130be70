// [crates/windi-common/src/telemetry.rs]
/*!
 * Structured tracing bootstrap shared by every WINDI binary.
 *
 * Development: compact, colorized, human-readable.
 * Production (`cfg(not(debug_assertions))`): flattened JSON lines, the
 * shape the Guard's `HealthProbe` and any downstream log shipper expect.
 *
 * Also installs a panic hook so a panicking background task (a Guard
 * sub-module, a bridge worker) is logged through `tracing::error!` before
 * the thread unwinds, instead of only reaching stderr.
 */

use std::panic;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Initializes the global tracing subscriber for `service_name`.
///
/// # Panics
/// Panics if a global subscriber has already been installed in this
/// process — call this exactly once, at the top of `main`.
pub fn init_tracing(service_name: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if cfg!(debug_assertions) { "debug" } else { "info" };
        format!("{service_name}={level},tower_http=warn,hyper=warn").into()
    });

    if cfg!(debug_assertions) {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_target(false))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().flatten_event(true))
            .init();
    }

    let service = service_name.to_string();
    panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown".to_string());

        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| info.payload().downcast_ref::<String>().map(String::as_str))
            .unwrap_or("<no panic message>");

        tracing::error!(
            target: "panic",
            service = %service,
            location = %location,
            "task panicked: {payload}"
        );
    }));

    tracing::info!("telemetry online for [{}]", service_name);
}
