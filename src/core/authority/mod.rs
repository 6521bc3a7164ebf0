//! Caller authorization is named in the fixed slot-chain composition order
//! (`AuthoritySlot`, between `StatisticSlot` and `SystemSlot`) but the
//! caller-allow/deny rule set itself is an external collaborator of the
//! core engine, not part of it. This module carries the slot's place in
//! the chain without implementing a rule engine behind it.
mod slot;

pub use slot::*;
