//! Flow control bounds how many requests a resource admits per
//! statistic window. A `Rule` picks which node the check is performed
//! against (`checker`), how the allowed threshold is computed and what
//! happens to requests beyond it (`traffic_shaping`), and `rule_manager`
//! keeps the live rule set and the `Controller`s built from it.
mod checker;
mod rule;
mod rule_manager;
mod slot;
mod standalone_stat_slot;
pub mod traffic_shaping;

pub use checker::*;
pub use rule::*;
pub use rule_manager::*;
pub use slot::*;
pub use standalone_stat_slot::*;
pub use traffic_shaping::*;
