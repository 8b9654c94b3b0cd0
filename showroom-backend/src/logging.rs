//! Logging things
//!

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` isn't set.
pub fn default_filter(debug: bool) -> &'static str {
    match debug {
        true => "showroom=debug,showroom_backend=debug,showroom_shared=debug",
        false => "showroom=info,showroom_backend=info,showroom_shared=info",
    }
}

pub fn init(debug: bool) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(debug).into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[test]
fn test_default_filter_parses() {
    for debug in [true, false] {
        assert!(EnvFilter::try_new(default_filter(debug)).is_ok());
    }
}
