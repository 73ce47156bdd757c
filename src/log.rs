use once_cell::sync::OnceCell;
use tracing_subscriber::prelude::*;

static ENABLED: OnceCell<()> = OnceCell::new();

/// Prints cache events to stderr when `FILE_CACHE_TRACE` names a level.
/// Only the first call looks at the environment.
pub fn enable_by_env() {
    ENABLED.get_or_init(install_from_env);
}

fn install_from_env() {
    let is_enabled = std::env::var("FILE_CACHE_TRACE")
        .map_or(false, |var| matches!(var.as_str(), "TRACE" | "DEBUG" | "INFO" | "WARN" | "ERROR"));
    if !is_enabled {
        return;
    }
    let formatter = Formatter::default();
    // another subscriber may already be installed
    let _ = tracing_subscriber::Registry::default()
        .with(formatter)
        .with(tracing_subscriber::EnvFilter::from_env("FILE_CACHE_TRACE"))
        .try_init();
}

#[derive(Default)]
struct Formatter {}

impl<S> tracing_subscriber::Layer<S> for Formatter
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _: tracing_subscriber::layer::Context<'_, S>) {
        let level = *event.metadata().level();
        event.record(&mut Data { level });
    }
}

struct Data {
    level: tracing::Level,
}

impl tracing::field::Visit for Data {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            eprintln!("[file-cache {}] {value:?}", self.level);
        } else {
            eprintln!("[file-cache {}] {} = {value:?}", self.level, field.name());
        }
    }
}
