use super::{Checker, Controller};
use crate::base::{BlockType, MetricEvent, PRIORITY_FLAG, ReadStat, StatNode, TokenResult};
use crate::{config, utils};
use std::sync::{Arc, Weak};

/// RejectChecker blocks a request outright once the resource's current
/// QPS (including already-occupied future passes) plus this batch would
/// exceed the allowed threshold. A request carrying [`PRIORITY_FLAG`]
/// gets one more chance first: it may occupy a future statistic window
/// and wait out the gap instead of being blocked immediately.
#[derive(Debug)]
pub struct RejectChecker {
    owner: Weak<Controller>,
}

impl RejectChecker {
    pub fn new(owner: Weak<Controller>) -> Self {
        RejectChecker { owner }
    }
}

impl Checker for RejectChecker {
    fn get_owner(&self) -> &Weak<Controller> {
        &self.owner
    }

    fn set_owner(&mut self, owner: Weak<Controller>) {
        self.owner = owner;
    }

    fn do_check(
        &self,
        stat_node: Option<Arc<dyn StatNode>>,
        batch_count: u32,
        threshold: f64,
        flag: i32,
    ) -> TokenResult {
        let stat_node = match stat_node {
            Some(node) => node,
            None => return TokenResult::new_pass(),
        };
        let cur_count = stat_node.qps(MetricEvent::Pass) + stat_node.qps(MetricEvent::OccupiedPass);
        if cur_count + batch_count as f64 <= threshold {
            return TokenResult::new_pass();
        }

        if flag & PRIORITY_FLAG != 0 {
            let now = utils::curr_time_millis();
            if let Some(wait_ms) = stat_node.try_occupy_next(now, batch_count, threshold) {
                if wait_ms < config::DEFAULT_OCCUPY_TIMEOUT_MS {
                    stat_node.update_occupied_time(now as i64 + wait_ms as i64);
                    stat_node.add_waiting_request(now + wait_ms, batch_count);
                    stat_node.add_occupied_pass(batch_count);
                    return TokenResult::new_should_wait(utils::milli2nano(wait_ms).try_into().unwrap());
                }
            }
        }
        TokenResult::new_blocked(BlockType::Flow)
    }
}
