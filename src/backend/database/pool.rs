//! Connection pool construction and bookkeeping
//!
//! sqlx exposes the pool size and idle count but not wait or closure
//! counters, so this module keeps them. The pool's own idle reaper and
//! lifetime limit are switched off and the same limits are enforced in the
//! `before_acquire` hook, where each closure is counted.

use sqlx::pool::{PoolConnection, PoolConnectionMetadata, PoolOptions};
use sqlx::{Database, Pool};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::config::DatabaseBackendConfig;
use super::health::PoolStats;

/// Cumulative counters for one connection pool
#[derive(Debug, Default)]
pub struct PoolMetrics {
    wait_count: AtomicU64,
    wait_duration_nanos: AtomicU64,
    max_idle_closed: AtomicU64,
    max_lifetime_closed: AtomicU64,
}

impl PoolMetrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Build pool options for `config` with the counting hook installed
    pub fn pool_options<DB: Database>(
        self: &Arc<Self>,
        config: &DatabaseBackendConfig,
    ) -> PoolOptions<DB> {
        let metrics = Arc::clone(self);
        let idle_timeout = config.idle_timeout;
        let max_lifetime = config.max_lifetime;

        PoolOptions::<DB>::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .idle_timeout(None)
            .max_lifetime(None)
            .before_acquire(move |_conn, meta| {
                let keep = metrics.retain_connection(&meta, idle_timeout, max_lifetime);
                Box::pin(async move { Ok(keep) })
            })
    }

    /// Decide whether an idle connection may be handed out again.
    ///
    /// Lifetime is checked first, so a connection that is both too old and
    /// too idle counts as a lifetime closure.
    pub fn retain_connection(
        &self,
        meta: &PoolConnectionMetadata,
        idle_timeout: Option<Duration>,
        max_lifetime: Option<Duration>,
    ) -> bool {
        self.retain(meta.age, meta.idle_for, idle_timeout, max_lifetime)
    }

    fn retain(
        &self,
        age: Duration,
        idle_for: Duration,
        idle_timeout: Option<Duration>,
        max_lifetime: Option<Duration>,
    ) -> bool {
        if max_lifetime.is_some_and(|limit| age >= limit) {
            self.max_lifetime_closed.fetch_add(1, Ordering::Relaxed);
            return false;
        }
        if idle_timeout.is_some_and(|limit| idle_for >= limit) {
            self.max_idle_closed.fetch_add(1, Ordering::Relaxed);
            return false;
        }
        true
    }

    /// Acquire a connection, recording a wait when the pool was saturated.
    pub async fn acquire<DB: Database>(
        &self,
        pool: &Pool<DB>,
    ) -> Result<PoolConnection<DB>, sqlx::Error> {
        let saturated =
            pool.num_idle() == 0 && pool.size() >= pool.options().get_max_connections();
        let started = Instant::now();

        let conn = pool.acquire().await?;

        if saturated {
            self.record_wait(started.elapsed());
        }
        Ok(conn)
    }

    fn record_wait(&self, waited: Duration) {
        let nanos = u64::try_from(waited.as_nanos()).unwrap_or(u64::MAX);
        self.wait_count.fetch_add(1, Ordering::Relaxed);
        self.wait_duration_nanos.fetch_add(nanos, Ordering::Relaxed);
    }

    /// Pool figures combined with the cumulative counters, taken while the
    /// caller holds exactly one connection of `pool`.
    ///
    /// The held connection is reported as idle. sqlx returns a dropped
    /// connection to the pool from a spawned task, so a snapshot taken after
    /// the drop can still see it as in use.
    pub fn snapshot_holding_one<DB: Database>(&self, pool: &Pool<DB>) -> PoolStats {
        let open_connections = pool.size();
        let idle = u32::try_from(pool.num_idle())
            .unwrap_or(u32::MAX)
            .saturating_add(1)
            .min(open_connections);

        PoolStats {
            open_connections,
            in_use: open_connections - idle,
            idle,
            wait_count: self.wait_count.load(Ordering::Relaxed),
            wait_duration: Duration::from_nanos(self.wait_duration_nanos.load(Ordering::Relaxed)),
            max_idle_closed: self.max_idle_closed.load(Ordering::Relaxed),
            max_lifetime_closed: self.max_lifetime_closed.load(Ordering::Relaxed),
        }
    }
}
