//! Circuit breaking is named in the fixed slot-chain composition order
//! (`DegradeSlot`, the last rule-check slot) but, like authority and
//! system protection, the breaker engine driving it is an external
//! collaborator of the core engine described here. This module carries
//! the slot's place in the chain without implementing a rule engine
//! behind it.
mod slot;

pub use slot::*;
