use std::{fs::OpenOptions, io, path::Path};

use chrono::Local;
use tracing_appender::non_blocking;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Keeps the non-blocking writers alive. Logging stops once this is dropped.
pub struct TracingGuards {
    _file: Option<WorkerGuard>,
    _stderr: WorkerGuard,
}

/// Installs the global subscriber.
///
/// Logs go to stderr so stdout stays free for order output. When `log_dir`
/// is given, the same events are appended to a dated file in that directory.
pub fn init_tracing(log_dir: Option<&Path>) -> eyre::Result<TracingGuards> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (stderr_writer, stderr_guard) = non_blocking(io::stderr());

    let (file_layer, file_guard) = match log_dir {
        Some(dir) => {
            let (writer, guard) = dated_file_appender(dir, "orderflow")?;
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(fmt::layer().with_writer(stderr_writer))
        .try_init()?;

    Ok(TracingGuards {
        _file: file_guard,
        _stderr: stderr_guard,
    })
}

/// Opens `<dir>/<prefix>.YYYY-MM-DD.log` for appending.
fn dated_file_appender(dir: &Path, prefix: &str) -> io::Result<(NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(dir)?;

    let date = Local::now().format("%Y-%m-%d").to_string();
    let path = dir.join(format!("{prefix}.{date}.log"));

    let file = OpenOptions::new().create(true).append(true).open(path)?;

    Ok(non_blocking(file))
}
