//! # Database State
//!
//! Wraps the `Database` handle together with the single order ID generator
//! the process should use.

use workshop_db::{CounterRepository, Database, OrderIdGenerator};

/// Database handle plus the process-wide ID generator.
///
/// ## Why keep the generator here?
/// `OrderIdGenerator` serializes allocations with its own lock. Building a
/// fresh one per command would give every command its own lock.
#[derive(Debug)]
pub struct DbState {
    db: Database,
    order_ids: OrderIdGenerator<CounterRepository>,
}

impl DbState {
    /// Creates a new DbState wrapping the database connection.
    pub fn new(db: Database) -> Self {
        let order_ids = db.order_ids();
        DbState { db, order_ids }
    }

    /// Returns a reference to the inner Database.
    pub fn inner(&self) -> &Database {
        &self.db
    }

    /// Returns the shared order ID generator.
    pub fn order_ids(&self) -> &OrderIdGenerator<CounterRepository> {
        &self.order_ids
    }
}
