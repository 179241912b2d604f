use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::TracerConfig;

/// Facts about the emitting process, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessIdentity {
    pub host: String,
    pub deploy: Option<String>,
    pub pid: u32,
}

impl ProcessIdentity {
    pub fn new(host: impl Into<String>, deploy: Option<String>, pid: u32) -> Self {
        Self {
            host: host.into(),
            deploy: deploy.filter(|d| !d.is_empty()),
            pid,
        }
    }

    /// Uses the configured host override, or the OS host name.
    pub fn resolve(cfg: &TracerConfig) -> Self {
        let host = cfg
            .host
            .clone()
            .unwrap_or_else(|| gethostname::gethostname().to_string_lossy().into_owned());
        Self::new(host, cfg.deploy.clone(), std::process::id())
    }
}

/// Metadata attached to every entry at construction time.
#[derive(Debug, Clone)]
pub struct Metadata {
    pub schema: String,
    pub time: DateTime<Utc>,
    pub process: Arc<ProcessIdentity>,
}

impl Metadata {
    pub fn capture(schema: &str, process: &Arc<ProcessIdentity>) -> Self {
        Self {
            schema: schema.to_owned(),
            time: Utc::now(),
            process: Arc::clone(process),
        }
    }

    pub fn host(&self) -> &str {
        &self.process.host
    }

    pub fn deploy(&self) -> Option<&str> {
        self.process.deploy.as_deref()
    }

    pub fn pid(&self) -> u32 {
        self.process.pid
    }
}
