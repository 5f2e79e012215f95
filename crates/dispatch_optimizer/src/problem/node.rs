use crate::define_index_newtype;

use super::time_window::TimeWindow;

define_index_newtype!(NodeIdx, Node);

/// Node 0 is where every trip starts and ends.
pub const DEPOT: NodeIdx = NodeIdx::new(0);

pub const DEFAULT_PRIORITY: i64 = 2;

/// Priorities at or below this value are urgent.
pub const URGENT_PRIORITY: i64 = 1;

pub const URGENT_DROP_PENALTY: i64 = 1_000_000;
pub const DROP_PENALTY: i64 = 100_000;

/// Cost of leaving a delivery unserved.
pub fn drop_penalty(priority: i64) -> i64 {
    if priority <= URGENT_PRIORITY {
        URGENT_DROP_PENALTY
    } else {
        DROP_PENALTY
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    demand: i64,
    time_window: TimeWindow,
    priority: i64,
}

impl Node {
    pub fn new(demand: i64, time_window: TimeWindow, priority: i64) -> Self {
        Node {
            demand,
            time_window,
            priority,
        }
    }

    pub fn demand(&self) -> i64 {
        self.demand
    }

    pub fn time_window(&self) -> TimeWindow {
        self.time_window
    }

    pub fn priority(&self) -> i64 {
        self.priority
    }

    pub fn drop_penalty(&self) -> i64 {
        drop_penalty(self.priority)
    }
}
