// src/pool/config.rs
//! Configuration for block pools

/// Configuration for block pool behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// Capacity of each block in the pool (bytes)
    pub block_size: usize,
    /// Number of blocks pre-allocated at construction and the most the pool ever retains
    pub capacity: usize,
    /// Securely zero released blocks before they re-enter the freelist
    pub zero_on_release: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            block_size: 8192, // 8KB blocks
            capacity: 4,
            zero_on_release: false,
        }
    }
}

impl PoolConfig {
    /// Configuration for embedded systems (low memory).
    pub fn small() -> Self {
        Self {
            block_size: 1024,
            capacity: 2,
            zero_on_release: false,
        }
    }

    /// Configuration for high-throughput servers.
    pub fn large() -> Self {
        Self {
            block_size: 65536, // 64KB blocks
            capacity: 64,
            zero_on_release: false,
        }
    }

    /// Configuration for network packet processing (MTU-sized).
    pub fn network() -> Self {
        Self {
            block_size: 1500, // Standard MTU
            capacity: 32,
            zero_on_release: false,
        }
    }

    /// Returns this configuration with secure zeroing on release enabled.
    ///
    /// # Examples
    ///
    /// ```
    /// use zerobuf::PoolConfig;
    ///
    /// let config = PoolConfig::network().zeroed();
    /// assert!(config.zero_on_release);
    /// assert_eq!(config.block_size, 1500);
    /// ```
    pub fn zeroed(mut self) -> Self {
        self.zero_on_release = true;
        self
    }
}
