use std::env;

use crate::error::{Result, TraceError};

pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

#[derive(Debug, Clone)]
pub struct TracerConfig {
    /// Overrides the OS host name.
    pub host: Option<String>,
    /// Tag of the deployed artifact.
    pub deploy: Option<String>,
    /// Bound of the async sink queue.
    pub queue_capacity: usize,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            host: None,
            deploy: None,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl TracerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = non_empty("TRACELINK_HOST");
        let deploy = non_empty("DEPLOY");

        let queue_capacity = match non_empty("TRACELINK_QUEUE_CAPACITY") {
            None => DEFAULT_QUEUE_CAPACITY,
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(TraceError::InvalidConfig {
                        var: "TRACELINK_QUEUE_CAPACITY",
                        reason: format!("must be a positive integer, got {raw:?}"),
                    });
                }
            },
        };

        Ok(Self {
            host,
            deploy,
            queue_capacity,
        })
    }
}
