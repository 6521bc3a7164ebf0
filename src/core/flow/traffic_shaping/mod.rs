//! A traffic shaping `Controller` is the composition of a `Calculator`
//! (how many tokens are currently allowed) and a `Checker` (what to do
//! with a request given that allowance): `Direct` x `Reject` rejects
//! outright above threshold, `WarmUp` x `Reject` ramps the threshold up
//! after cold start, `Direct` x `Throttling` and `WarmUp` x `Throttling`
//! instead queue requests that arrive too close together.
mod direct;
mod reject;
mod throttling;
mod warm_up;

pub use direct::*;
pub use reject::*;
pub use throttling::*;
pub use warm_up::*;

use super::Rule;
use crate::base::{MetricEvent, ReadStat, StatNode, TokenResult, WriteStat};
use std::fmt::Debug;
use std::sync::{Arc, Weak};

/// StandaloneStat bundles the statistic a `Controller` checks its
/// threshold against: either the resource's shared sliding window
/// (`reuse_global`) or a dedicated one built for a rule whose
/// `stat_interval_ms` does not line up with the global bucket layout.
#[derive(Debug)]
pub struct StandaloneStat {
    reuse_global: bool,
    read_stat: Arc<dyn ReadStat>,
    write_stat: Option<Arc<dyn WriteStat>>,
}

impl StandaloneStat {
    pub fn new(
        reuse_global: bool,
        read_stat: Arc<dyn ReadStat>,
        write_stat: Option<Arc<dyn WriteStat>>,
    ) -> Self {
        StandaloneStat {
            reuse_global,
            read_stat,
            write_stat,
        }
    }

    pub fn reuse_global(&self) -> bool {
        self.reuse_global
    }

    pub fn read_only_metric(&self) -> &Arc<dyn ReadStat> {
        &self.read_stat
    }

    pub fn write_only_metric(&self) -> Option<&Arc<dyn WriteStat>> {
        self.write_stat.as_ref()
    }

    pub fn current_qps(&self) -> f64 {
        self.read_stat.qps(MetricEvent::Pass) + self.read_stat.qps(MetricEvent::OccupiedPass)
    }
}

/// Calculator computes the number of tokens (threshold) currently
/// allowed through, given the rule's static configuration and whatever
/// dynamic state (elapsed warm-up time, memory pressure, ...) it keeps.
pub trait Calculator: Debug + Send + Sync {
    fn get_owner(&self) -> &Weak<Controller>;
    fn set_owner(&mut self, owner: Weak<Controller>);
    fn calculate_allowed_threshold(&self, batch_count: u32, flag: i32) -> f64;
}

/// Checker decides pass/block/wait for a request given the threshold a
/// `Calculator` just computed. `flag` carries bits set on the request's
/// `SentinelInput`, e.g. [`crate::base::PRIORITY_FLAG`].
pub trait Checker: Debug + Send + Sync {
    fn get_owner(&self) -> &Weak<Controller>;
    fn set_owner(&mut self, owner: Weak<Controller>);
    fn do_check(
        &self,
        stat_node: Option<Arc<dyn StatNode>>,
        batch_count: u32,
        threshold: f64,
        flag: i32,
    ) -> TokenResult;
}

/// Controller is the traffic shaping strategy built for one flow rule:
/// its statistic, its calculator and its checker.
#[derive(Debug)]
pub struct Controller {
    rule: Arc<Rule>,
    stat: Arc<StandaloneStat>,
    calculator: Box<dyn Calculator>,
    checker: Box<dyn Checker>,
}

impl Controller {
    /// Build a controller wired with the given calculator/checker pair;
    /// both have their `owner` backpointer set once the controller is
    /// behind an `Arc`.
    pub fn new_with_strategy(
        rule: Arc<Rule>,
        stat: Arc<StandaloneStat>,
        mut calculator: Box<dyn Calculator>,
        mut checker: Box<dyn Checker>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|weak: &Weak<Controller>| {
            calculator.set_owner(weak.clone());
            checker.set_owner(weak.clone());
            Controller {
                rule,
                stat,
                calculator,
                checker,
            }
        })
    }

    /// Convenience constructor for tests that only care about
    /// rule/stat identity, not the actual checking behavior.
    pub fn new(rule: Arc<Rule>, stat: Arc<StandaloneStat>) -> Arc<Self> {
        Self::new_with_strategy(
            rule,
            stat,
            Box::new(DirectCalculator::new(Weak::new())),
            Box::new(RejectChecker::new(Weak::new())),
        )
    }

    pub fn rule(&self) -> &Arc<Rule> {
        &self.rule
    }

    pub fn stat(&self) -> &Arc<StandaloneStat> {
        &self.stat
    }

    pub fn perform_checking(
        &self,
        node: Arc<dyn StatNode>,
        batch_count: u32,
        flag: i32,
    ) -> TokenResult {
        let threshold = self.calculator.calculate_allowed_threshold(batch_count, flag);
        self.checker.do_check(Some(node), batch_count, threshold, flag)
    }
}
