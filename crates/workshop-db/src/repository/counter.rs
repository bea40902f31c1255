//! # Daily Order ID Allocation
//!
//! Persists the `ot_counter` record and hands out `YYMMDD-NN` identifiers.
//!
//! ## Allocation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  allocate_next_id()                                                     │
//! │       │                                                                 │
//! │       ├── Local::now() ──► "250615"                                     │
//! │       │                                                                 │
//! │       ├── lock (one allocation at a time per generator)                 │
//! │       │                                                                 │
//! │       ├── store.load()  ──► Some({250615, 3})                           │
//! │       ├── advance       ──► {250615, 4}                                 │
//! │       ├── store.save()                                                  │
//! │       │                                                                 │
//! │       └── "250615-04"                                                   │
//! │                                                                         │
//! │  load or save fails ──► warn! + "250615-" + random 01..99               │
//! │  (never returns an error)                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store is behind [`CounterStore`] so allocation can be tested against
//! stores that fail on purpose.

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use rand::Rng;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use workshop_core::order_id::{
    date_prefix, fallback_order_id, DailyCounter, COUNTER_KEY, MAX_TWO_DIGIT_SEQUENCE,
};

use crate::error::DbResult;
use crate::repository::kv::KvRepository;

// =============================================================================
// Counter Store
// =============================================================================

/// Where the daily counter lives.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Last persisted counter, `None` if there never was one.
    async fn load(&self) -> DbResult<Option<DailyCounter>>;

    async fn save(&self, counter: &DailyCounter) -> DbResult<()>;
}

/// [`CounterStore`] backed by the `ot_counter` kv record.
#[derive(Debug, Clone)]
pub struct CounterRepository {
    kv: KvRepository,
}

impl CounterRepository {
    pub fn new(kv: KvRepository) -> Self {
        CounterRepository { kv }
    }
}

#[async_trait]
impl CounterStore for CounterRepository {
    async fn load(&self) -> DbResult<Option<DailyCounter>> {
        self.kv.get_json(COUNTER_KEY).await
    }

    async fn save(&self, counter: &DailyCounter) -> DbResult<()> {
        self.kv.set_json(COUNTER_KEY, counter).await
    }
}

// =============================================================================
// Generator
// =============================================================================

/// Issues work order IDs from a [`CounterStore`].
///
/// Allocations through the same generator are serialized, so two concurrent
/// calls never read the same counter value. Keep one generator per process.
#[derive(Debug)]
pub struct OrderIdGenerator<S> {
    store: S,
    lock: Mutex<()>,
}

impl<S: CounterStore> OrderIdGenerator<S> {
    pub fn new(store: S) -> Self {
        OrderIdGenerator {
            store,
            lock: Mutex::new(()),
        }
    }

    /// Next ID for today's local calendar date.
    pub async fn allocate_next_id(&self) -> String {
        self.allocate_next_id_on(Local::now().date_naive()).await
    }

    /// Next ID for `date`.
    ///
    /// Always yields an ID. If the store cannot be read or written, the
    /// sequence part is random in `01..=99` and may repeat one already
    /// issued today.
    pub async fn allocate_next_id_on(&self, date: NaiveDate) -> String {
        let prefix = date_prefix(date);
        let _guard = self.lock.lock().await;

        match self.advance_counter(&prefix).await {
            Ok(id) => id,
            Err(err) => {
                let sequence = rand::thread_rng().gen_range(1..=MAX_TWO_DIGIT_SEQUENCE);
                let id = fallback_order_id(&prefix, sequence);
                warn!(error = %err, id = %id, "Order counter unavailable, using random sequence");
                id
            }
        }
    }

    async fn advance_counter(&self, prefix: &str) -> DbResult<String> {
        let stored = self.store.load().await?;
        let next = DailyCounter::advance(stored, prefix);
        self.store.save(&next).await?;

        if next.count > MAX_TWO_DIGIT_SEQUENCE {
            warn!(count = next.count, "More than 99 orders today, ID widens past two digits");
        }
        debug!(date = %next.date, count = next.count, "Allocated order id");

        Ok(next.order_id())
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
