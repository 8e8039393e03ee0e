use std::panic::PanicHookInfo;
use std::sync::Arc;

/// The output channel diagnostics are reported on.
pub trait Logger: Send + Sync {
    fn start(&self) {
        self.info(&format!(
            "Starting {} v{}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        ));
    }

    fn info(&self, message: &str);
    fn warning(&self, message: &str);
    fn error(&self, message: &str);

    fn panic(&self, info: &PanicHookInfo<'_>) {
        self.error(&format!("Panicked: {}", info));
    }
}

pub struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn info(&self, message: &str) {
        tracing::info!("{}", message);
    }

    fn warning(&self, message: &str) {
        tracing::warn!("{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!("{}", message);
    }
}

pub fn get_logger() -> Arc<dyn Logger> {
    Arc::new(ConsoleLogger)
}

pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // A subscriber may already be installed by an embedding process.
    _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
