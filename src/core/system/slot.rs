use crate::base::{BaseSlot, ContextPtr, RuleCheckSlot, TokenResult};
use lazy_static::lazy_static;
use std::sync::Arc;

const RULE_CHECK_SLOT_ORDER: u32 = 1800;

/// Placeholder for system adaptive protection. Always passes: the live
/// load/CPU/RT sampler driving it lives outside this engine's core
/// scope, so this slot only holds the fixed chain position open for a
/// future implementation to fill in.
pub struct Slot {}

lazy_static! {
    pub static ref DEFAULT_SLOT: Arc<Slot> = Arc::new(Slot {});
}

pub fn default_slot() -> Arc<Slot> {
    DEFAULT_SLOT.clone()
}

impl BaseSlot for Slot {
    fn order(&self) -> u32 {
        RULE_CHECK_SLOT_ORDER
    }
}

impl RuleCheckSlot for Slot {
    fn check(&self, ctx: &ContextPtr) -> TokenResult {
        ctx.read().unwrap().result().clone()
    }
}
