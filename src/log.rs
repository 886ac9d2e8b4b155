use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn default_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Installs the stderr subscriber. `RUST_LOG` wins over the `-v` count.
/// Calling it twice is a no-op.
pub fn init(verbose: u8) {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_level(verbose).into());
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

// numeric metrics on their own target so they can be filtered or grepped
pub fn scalar(step: u64, name: &str, value: f64) {
    info!(target: "ann_probe::scalar", step, name, value);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(default_level(0), "info");
        assert_eq!(default_level(1), "debug");
        assert_eq!(default_level(2), "trace");
        assert_eq!(default_level(9), "trace");
    }

    #[test]
    fn init_twice_is_harmless() {
        init(0);
        init(2);
        scalar(1, "score", 0.5);
    }
}
