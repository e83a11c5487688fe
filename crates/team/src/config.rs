//! Convenience configuration for `Team::with_limit`/`Team::with_dynamic_limit`.

/// Builder-style configuration for the bundled thread-backed pool
/// constructed by `Team::with_limit`/`Team::with_dynamic_limit`.
///
/// This has no bearing on the core `Team` type itself — `Team::new`
/// takes its collaborators directly, with no config struct at all, so
/// that the coordination core stays decoupled from any particular
/// worker backend.
#[derive(Debug, Clone)]
pub struct TeamConfig {
    /// Ceiling on live workers (`idle + busy`) the bundled factory will
    /// create before declining. Only consulted by the fixed-ceiling
    /// `Team::with_limit`; `Team::with_dynamic_limit` gets its ceiling
    /// from the caller-supplied callable instead and ignores this field.
    pub worker_limit: usize,
    /// Prefix used when naming spawned worker threads (`"{prefix}-{n}"`).
    pub thread_name_prefix: String,
    /// Bound on a worker's own pending-submission channel. `None` (the
    /// default) leaves it unbounded — workers are never specified to
    /// reject a `submit`.
    pub queue_depth: Option<usize>,
}

impl Default for TeamConfig {
    fn default() -> Self {
        let cpus = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        Self {
            worker_limit: cpus,
            thread_name_prefix: "team-worker".to_string(),
            queue_depth: None,
        }
    }
}

impl TeamConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn worker_limit(mut self, n: usize) -> Self {
        self.worker_limit = n;
        self
    }

    pub fn thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    pub fn queue_depth(mut self, depth: usize) -> Self {
        self.queue_depth = Some(depth);
        self
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.worker_limit == 0 {
            return Err("worker_limit must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_positive_limit() {
        let cfg = TeamConfig::default();
        assert!(cfg.worker_limit >= 1);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_limit_fails_validation() {
        let cfg = TeamConfig::new().worker_limit(0);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn builder_chains() {
        let cfg = TeamConfig::new()
            .worker_limit(3)
            .thread_name_prefix("x")
            .queue_depth(16);
        assert_eq!(cfg.worker_limit, 3);
        assert_eq!(cfg.thread_name_prefix, "x");
        assert_eq!(cfg.queue_depth, Some(16));
    }

    #[test]
    fn queue_depth_defaults_unbounded() {
        assert_eq!(TeamConfig::default().queue_depth, None);
    }
}
