//! The log slot sits in the fixed chain position for request-level
//! logging. Persisting formatted metric logs to disk is an external
//! concern (see the crate-level scope note); this slot is a thin
//! passthrough `StatSlot` placeholder.
mod slot;

pub use slot::*;
