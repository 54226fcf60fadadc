use std::collections::BTreeMap;

use serde::Serialize;

/// Counters tracked by a view controller.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Counter {
    RawViewportEvents,
    SettledViewportEvents,
    CoalescedViewportEvents,
    ModeTransitions,
    Renders,
    QueuedRenders,
    SkippedRecords,
}

impl Counter {
    pub const fn name(self) -> &'static str {
        match self {
            Counter::RawViewportEvents => "raw_viewport_events",
            Counter::SettledViewportEvents => "settled_viewport_events",
            Counter::CoalescedViewportEvents => "coalesced_viewport_events",
            Counter::ModeTransitions => "mode_transitions",
            Counter::Renders => "renders",
            Counter::QueuedRenders => "queued_renders",
            Counter::SkippedRecords => "skipped_records",
        }
    }
}

/// Counters and gauges for one controller instance.
///
/// Sorted maps keep snapshots stable for logs and assertions.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Metrics {
    counters: BTreeMap<Counter, u64>,
    gauges: BTreeMap<&'static str, i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub counters: Vec<(&'static str, u64)>,
    pub gauges: Vec<(&'static str, i64)>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counter(&self, counter: Counter) -> u64 {
        self.counters.get(&counter).copied().unwrap_or(0)
    }

    pub fn inc(&mut self, counter: Counter) {
        self.add(counter, 1);
    }

    pub fn add(&mut self, counter: Counter, by: u64) {
        *self.counters.entry(counter).or_insert(0) += by;
    }

    pub fn gauge(&self, name: &str) -> Option<i64> {
        self.gauges.get(name).copied()
    }

    pub fn set_gauge(&mut self, name: &'static str, value: i64) {
        self.gauges.insert(name, value);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            counters: self.counters.iter().map(|(k, v)| (k.name(), *v)).collect(),
            gauges: self.gauges.iter().map(|(k, v)| (*k, *v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Counter, Metrics};

    #[test]
    fn counters_add_across_calls() {
        let mut m = Metrics::new();
        m.inc(Counter::Renders);
        m.add(Counter::Renders, 2);
        assert_eq!(m.counter(Counter::Renders), 3);
        assert_eq!(m.counter(Counter::ModeTransitions), 0);
    }

    #[test]
    fn gauge_keeps_last_value() {
        let mut m = Metrics::new();
        assert_eq!(m.gauge("live_objects"), None);
        m.set_gauge("live_objects", 10);
        m.set_gauge("live_objects", 4);
        assert_eq!(m.gauge("live_objects"), Some(4));
    }

    #[test]
    fn snapshot_follows_counter_order() {
        let mut m = Metrics::new();
        m.inc(Counter::SkippedRecords);
        m.inc(Counter::RawViewportEvents);
        let snap = m.snapshot();
        assert_eq!(
            snap.counters,
            vec![("raw_viewport_events", 1), ("skipped_records", 1)]
        );
    }
}
