//! System adaptive protection is named in the fixed slot-chain
//! composition order (`SystemSlot`, between `AuthoritySlot` and
//! `FlowSlot`) but, like authority and circuit breaking, the live
//! system-load sampler and its rule engine are external collaborators
//! of the core engine described here. This module carries the slot's
//! place in the chain without implementing a rule engine behind it.
mod slot;

pub use slot::*;
