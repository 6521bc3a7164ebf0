use super::{Calculator, Controller, Rule};
use std::sync::{Arc, Weak};

/// DirectCalculator always allows the rule's configured threshold,
/// with no ramp-up or adaptation.
#[derive(Debug)]
pub struct DirectCalculator {
    owner: Weak<Controller>,
    threshold: f64,
}

impl DirectCalculator {
    pub fn new(owner: Weak<Controller>) -> Self {
        DirectCalculator {
            owner,
            threshold: 0.0,
        }
    }

    pub fn new_with_rule(owner: Weak<Controller>, rule: &Arc<Rule>) -> Self {
        DirectCalculator {
            owner,
            threshold: rule.threshold,
        }
    }
}

impl Calculator for DirectCalculator {
    fn get_owner(&self) -> &Weak<Controller> {
        &self.owner
    }

    fn set_owner(&mut self, owner: Weak<Controller>) {
        self.owner = owner;
    }

    fn calculate_allowed_threshold(&self, _batch_count: u32, _flag: i32) -> f64 {
        self.threshold
    }
}
