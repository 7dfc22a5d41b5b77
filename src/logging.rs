// Tracing set-up. The subscriber is installed before the configuration is
// read so warnings raised while loading it are shown; the `debug` setting
// from the configuration is applied afterwards through a reload handle.

use tracing::level_filters::LevelFilter;
use tracing::Subscriber;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

pub struct Logging {
    filter: reload::Handle<EnvFilter, Registry>,
}

impl Logging {
    /// Switches every target to debug level.
    pub fn enable_debug(&self) {
        if let Err(e) = self.filter.modify(|f| *f = EnvFilter::new("debug")) {
            tracing::warn!(error = %e, "could not enable debug logging");
        }
    }
}

/// Filter from `--verbose`, else `RUST_LOG`, else warnings only.
fn filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .from_env_lossy()
    }
}

pub fn subscriber(verbose: bool) -> (impl Subscriber + Send + Sync + 'static, Logging) {
    let (filter, handle) = reload::Layer::new(filter(verbose));
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr));
    (subscriber, Logging { filter: handle })
}

pub fn init(verbose: bool) -> Logging {
    let (subscriber, logging) = subscriber(verbose);
    // try_init: a subscriber may already be installed (e.g. in tests)
    let _ = subscriber.try_init();
    logging
}
