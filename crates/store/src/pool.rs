//! Lock-free object pools for the batch ingestion hot path
//!
//! Every producer batch needs a scratch byte buffer, a metric slice, a
//! statement builder, and a parameter slice. Pooling them keeps the
//! per-batch allocation count at zero in the steady state. Uses a
//! lock-free queue for O(1) get/put; when a pool runs dry a fresh
//! instance is allocated on demand, so pools never block and never
//! bound concurrency.
//!
//! # Example
//!
//! ```ignore
//! let pool: BytesPool = Pool::new(8, 16 * 1024);
//!
//! let mut buf = pool.get();
//! encode_metrics(&mut buf, &metrics)?;
//! pool.put(buf);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use bytes::BytesMut;
use crossbeam::queue::ArrayQueue;

use crate::metric::Metric;

/// A type that can live in a [`Pool`]
///
/// `reset` must leave the value logically empty (zero length) while
/// keeping its underlying storage where possible.
pub trait Reusable: Send {
    /// Allocate a fresh instance with the given storage capacity
    fn with_capacity(capacity: usize) -> Self;

    /// Clear contents, keeping storage for reuse
    fn reset(&mut self);

    /// Current storage capacity, used to decide whether the instance is
    /// still worth pooling
    fn storage_capacity(&self) -> usize;
}

impl Reusable for BytesMut {
    fn with_capacity(capacity: usize) -> Self {
        BytesMut::with_capacity(capacity)
    }

    fn reset(&mut self) {
        self.clear();
    }

    fn storage_capacity(&self) -> usize {
        self.capacity()
    }
}

impl Reusable for String {
    fn with_capacity(capacity: usize) -> Self {
        String::with_capacity(capacity)
    }

    fn reset(&mut self) {
        self.clear();
    }

    fn storage_capacity(&self) -> usize {
        self.capacity()
    }
}

impl<T: Send> Reusable for Vec<T> {
    fn with_capacity(capacity: usize) -> Self {
        Vec::with_capacity(capacity)
    }

    fn reset(&mut self) {
        self.clear();
    }

    fn storage_capacity(&self) -> usize {
        self.capacity()
    }
}

/// Lock-free pool of reusable instances
///
/// Pre-allocates at construction time. When the pool is exhausted, new
/// instances are allocated on demand and can be returned later, so a
/// `get` always succeeds.
pub struct Pool<T: Reusable> {
    /// Lock-free queue of available instances
    queue: ArrayQueue<T>,

    /// Storage capacity for fresh allocations
    item_capacity: usize,

    /// Counters
    metrics: PoolMetrics,
}

/// Counters for pool monitoring
#[derive(Debug, Default)]
pub struct PoolMetrics {
    /// Successful pool hits (instance reused)
    pub hits: AtomicU64,

    /// Pool misses (new allocation required)
    pub misses: AtomicU64,

    /// Instances returned to the pool
    pub returns: AtomicU64,

    /// Instances dropped on return (pool full or storage shrank)
    pub drops: AtomicU64,
}

impl PoolMetrics {
    const fn new() -> Self {
        Self {
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            returns: AtomicU64::new(0),
            drops: AtomicU64::new(0),
        }
    }

    /// Get a point-in-time snapshot
    pub fn snapshot(&self) -> PoolSnapshot {
        PoolSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            returns: self.returns.load(Ordering::Relaxed),
            drops: self.drops.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of pool counters
#[derive(Debug, Clone, Copy, Default)]
pub struct PoolSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub returns: u64,
    pub drops: u64,
}

impl PoolSnapshot {
    /// Instances handed out so far
    pub fn gets(&self) -> u64 {
        self.hits + self.misses
    }

    /// Instances handed back so far, pooled or dropped
    pub fn puts(&self) -> u64 {
        self.returns + self.drops
    }
}

impl<T: Reusable> Pool<T> {
    /// Create a pool with `pool_size` pre-allocated instances of
    /// `item_capacity` storage each
    pub fn new(pool_size: usize, item_capacity: usize) -> Self {
        let queue = ArrayQueue::new(pool_size);

        for _ in 0..pool_size {
            // Filling an empty queue, cannot fail
            let _ = queue.push(T::with_capacity(item_capacity));
        }

        Self {
            queue,
            item_capacity,
            metrics: PoolMetrics::new(),
        }
    }

    /// Get an instance from the pool, allocating on miss
    ///
    /// The returned instance is always logically empty.
    #[inline]
    pub fn get(&self) -> T {
        match self.queue.pop() {
            Some(item) => {
                self.metrics.hits.fetch_add(1, Ordering::Relaxed);
                item
            }
            None => {
                self.metrics.misses.fetch_add(1, Ordering::Relaxed);
                T::with_capacity(self.item_capacity)
            }
        }
    }

    /// Return an instance to the pool
    ///
    /// Resets the instance first. Instances whose storage shrank below
    /// the configured capacity (e.g. a byte buffer whose filled region
    /// was split off into a request body) are dropped rather than
    /// pooled, as are returns to a full pool.
    #[inline]
    pub fn put(&self, mut item: T) {
        item.reset();

        if item.storage_capacity() >= self.item_capacity {
            match self.queue.push(item) {
                Ok(()) => {
                    self.metrics.returns.fetch_add(1, Ordering::Relaxed);
                }
                Err(_) => {
                    self.metrics.drops.fetch_add(1, Ordering::Relaxed);
                }
            }
        } else {
            self.metrics.drops.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Instances currently available
    #[inline]
    pub fn available(&self) -> usize {
        self.queue.len()
    }

    /// Maximum number of pooled instances
    #[inline]
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    /// Counters
    #[inline]
    pub fn metrics(&self) -> &PoolMetrics {
        &self.metrics
    }
}

/// Pool of scratch byte buffers for payload encoding
pub type BytesPool = Pool<BytesMut>;

/// Pool of metric slices filled by the normalizer
pub type MetricsPool = Pool<Vec<Metric>>;

/// Pool of statement builders for multi-row upserts
pub type StatementPool = Pool<String>;

/// Pool of parameter slices for statement binding
pub type ParamsPool = Pool<Vec<turso::Value>>;

const POOL_SIZE: usize = 8;
const BYTE_BUFFER_CAPACITY: usize = 16 * 1024;
const METRIC_SLICE_CAPACITY: usize = 64;
const STATEMENT_CAPACITY: usize = 512;
const PARAM_SLICE_CAPACITY: usize = 256;

/// The four pools shared by all ingestion calls
///
/// Built once at startup and referenced by every batch; safe for
/// concurrent get/put from any number of callers.
pub struct Pools {
    pub bytes: BytesPool,
    pub metrics: MetricsPool,
    pub statements: StatementPool,
    pub params: ParamsPool,
}

impl Pools {
    pub fn new() -> Self {
        Self {
            bytes: Pool::new(POOL_SIZE, BYTE_BUFFER_CAPACITY),
            metrics: Pool::new(POOL_SIZE, METRIC_SLICE_CAPACITY),
            statements: Pool::new(POOL_SIZE, STATEMENT_CAPACITY),
            params: Pool::new(POOL_SIZE, PARAM_SLICE_CAPACITY),
        }
    }
}

impl Default for Pools {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "pool_test.rs"]
mod pool_test;
