//! Parallel processing configuration and management
//!
//! This module provides abstractions for configuring the Rayon thread pool
//! that the reduction kernels run on. Wrap a resample reduction in
//! [`ParallelConfig::install`] to bound the threads it uses; without it the
//! kernels run on Rayon's global pool.

use crate::errors::{Result, ResampleError};
use rayon::ThreadPoolBuilder;
use tracing::debug;

/// Configuration for parallel processing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParallelConfig {
    pub num_threads: Option<usize>,
}

impl ParallelConfig {
    /// Create a new parallel configuration
    #[must_use]
    pub fn new(num_threads: Option<usize>) -> Self {
        Self { num_threads }
    }

    /// Create a configuration that uses the default thread pool
    #[must_use]
    pub fn new_default() -> Self {
        Self { num_threads: None }
    }

    /// Run `op` on a dedicated pool sized by this configuration.
    ///
    /// Reductions started inside `op` use that pool instead of the global one.
    pub fn install<R, F>(&self, op: F) -> Result<R>
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        let mut builder = ThreadPoolBuilder::new();
        if let Some(num_threads) = self.num_threads {
            builder = builder.num_threads(num_threads);
        }
        let pool = builder
            .build()
            .map_err(|e| ResampleError::ThreadPoolError(format!("Failed to build thread pool: {e}")))?;
        debug!(threads = pool.current_num_threads(), "running on dedicated thread pool");
        Ok(pool.install(op))
    }

    /// Create a configuration that uses all available CPU cores
    #[must_use]
    pub fn all_cores() -> Self {
        Self {
            num_threads: Some(num_cpus::get()),
        }
    }

    /// Create a configuration that uses a specific number of threads
    #[must_use]
    pub fn with_threads(num_threads: usize) -> Self {
        Self {
            num_threads: Some(num_threads),
        }
    }
}
