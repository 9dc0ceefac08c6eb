//! Default logging sink
//!
//! The bootstrap installs one process-wide `env_logger` sink at construction.
//! Installation is idempotent: if a sink is already present (a second setup
//! in the same process, or the application installed its own), the attempt is
//! recorded on the returned handle and nothing else happens.

/// Description of the logging sink the bootstrap installed (or found).
#[derive(Debug, Clone)]
pub struct LoggerHandle {
    installed: bool,
    level: log::LevelFilter,
}

impl LoggerHandle {
    /// Whether this bootstrap's install attempt won the process-wide slot.
    pub fn installed(&self) -> bool {
        self.installed
    }

    /// The default level filter the sink was configured with.
    pub fn level(&self) -> log::LevelFilter {
        self.level
    }
}

/// Install the default stdout sink, honoring `RUST_LOG` overrides.
pub fn install_default_logger() -> LoggerHandle {
    let level = log::LevelFilter::Info;
    let installed = env_logger::Builder::from_default_env()
        .filter_level(level)
        .try_init()
        .is_ok();
    if !installed {
        log::debug!("logging sink already installed, keeping the existing one");
    }
    LoggerHandle { installed, level }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_installation_is_not_fatal() {
        let first = install_default_logger();
        let second = install_default_logger();
        // At most one attempt can win the process-wide slot; the loser must
        // degrade gracefully instead of panicking.
        assert!(!(first.installed() && second.installed()));
        assert_eq!(first.level(), log::LevelFilter::Info);
        assert_eq!(second.level(), log::LevelFilter::Info);
    }
}
