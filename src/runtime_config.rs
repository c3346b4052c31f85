//! Environment variable based runtime configuration.
//!
//! ## Environment Variables
//!
//! ### `TREELINE_STACK_SIZE`
//!
//! Stack size for request coroutines, decimal (`16384`) or hex (`0x4000`).
//! Default: `0x4000` (16 KB). Larger stacks support deeper middleware
//! chains; smaller stacks reduce memory for many concurrent requests.
//!
//! ### `TREELINE_POOL_CAPACITY`
//!
//! Upper bound on idle contexts kept in the per-request context pool.
//! Default: `256`. Contexts above the bound are dropped instead of pooled.

use std::env;

/// Runtime configuration loaded from environment variables.
///
/// Load at startup with [`RuntimeConfig::from_env()`].
#[derive(Debug, Clone, Copy)]
pub struct RuntimeConfig {
    /// Stack size for request coroutines in bytes (default: 16 KB / 0x4000)
    pub stack_size: usize,
    /// Maximum number of idle contexts retained by the pool (default: 256)
    pub pool_capacity: usize,
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let stack_size = match env::var("TREELINE_STACK_SIZE") {
            Ok(val) => {
                if let Some(hex) = val.strip_prefix("0x") {
                    usize::from_str_radix(hex, 16).unwrap_or(0x4000)
                } else {
                    val.parse().unwrap_or(0x4000)
                }
            }
            Err(_) => 0x4000,
        };

        let pool_capacity = env::var("TREELINE_POOL_CAPACITY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256);

        RuntimeConfig {
            stack_size,
            pool_capacity,
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            stack_size: 0x4000,
            pool_capacity: 256,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::default();
        assert_eq!(config.stack_size, 0x4000);
        assert_eq!(config.pool_capacity, 256);
    }
}
