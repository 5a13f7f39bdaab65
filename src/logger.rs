use {
    std::{
        collections::BTreeSet,
        sync::RwLock,
    },
    lazy_static::lazy_static,
    log::{set_logger, set_max_level, LevelFilter, Log, Metadata, Record, SetLoggerError},
};

lazy_static! {
    pub static ref LOGGER: Logger = Logger::new();
}

/// Stdout logger with per-target muting.
///
/// A disabled target also mutes its `::` children, so disabling `serde`
/// silences `serde::de` as well.
pub struct Logger {
    disabled_targets: RwLock<BTreeSet<String>>,
}

impl Logger {
    fn new() -> Self {
        Self {
            disabled_targets: RwLock::new(BTreeSet::new()),
        }
    }

    pub fn init<I, S>(filter: LevelFilter, disabled_targets: I) -> Result<(), SetLoggerError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for target in disabled_targets {
            LOGGER.disable_target(target);
        }

        set_logger(&*LOGGER).map(|()| set_max_level(filter))
    }

    pub fn disable_target<S: Into<String>>(&self, target: S) {
        if let Ok(mut targets) = self.disabled_targets.write() {
            targets.insert(target.into());
        }
    }

    pub fn enable_target(&self, target: &str) {
        if let Ok(mut targets) = self.disabled_targets.write() {
            targets.remove(target);
        }
    }

    pub fn is_target_enabled(&self, target: &str) -> bool {
        match self.disabled_targets.read() {
            Ok(targets) => !targets.iter().any(|disabled| {
                target == disabled
                    || (target.starts_with(disabled.as_str())
                        && target[disabled.len()..].starts_with("::"))
            }),
            Err(_) => true,
        }
    }

    pub fn disabled_targets(&self) -> Vec<String> {
        self.disabled_targets
            .read()
            .map(|targets| targets.iter().cloned().collect())
            .unwrap_or_default()
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level() && self.is_target_enabled(metadata.target())
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            println!(
                "|{}| {} -- {}",
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}
