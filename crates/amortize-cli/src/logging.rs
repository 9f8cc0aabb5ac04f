use flexi_logger::{Logger, LoggerHandle};

/// Start stderr logging. `RUST_LOG` overrides `level` when set.
///
/// Returns `None` when the logger cannot start; the CLI keeps running without it.
pub fn init(level: &str) -> Option<LoggerHandle> {
    let started = Logger::try_with_env_or_str(level).and_then(|logger| {
        logger
            .log_to_stderr()
            .format(flexi_logger::default_format)
            .start()
    });

    match started {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("warning: logging disabled ({e})");
            None
        }
    }
}
