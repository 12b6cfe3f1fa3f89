use std::sync::Once;

use tracing_subscriber::EnvFilter;

static TRACING_INIT: Once = Once::new();

/// Installs the global fmt subscriber writing to stderr.
///
/// The filter defaults to `bankist=info` and can be overridden through `RUST_LOG`.
/// Calling it more than once is a no-op.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bankist=info"));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_tracing_can_be_called_twice() {
        super::init_tracing();
        super::init_tracing();
    }
}
