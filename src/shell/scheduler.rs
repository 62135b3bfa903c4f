use crate::shell::module::ModuleId;
use crate::shell::widget::WidgetKey;
use std::time::{Duration, Instant};

pub const DEFAULT_BASE_TICK: Duration = Duration::from_millis(250);
pub const MIN_BASE_TICK: Duration = Duration::from_millis(50);
pub const MAX_BASE_TICK: Duration = Duration::from_millis(1_000);

/// Pending refresh of one timed widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub key: WidgetKey,
    pub interval: Duration,
    pub next_fire: Instant,
}

impl ScheduleEntry {
    /// Move `next_fire` past `now`. A tick that arrives a full interval late
    /// resyncs to `now + interval` so missed periods are not replayed.
    fn advance(&mut self, now: Instant) {
        let next = self.next_fire + self.interval;
        self.next_fire = if next <= now { now + self.interval } else { next };
    }
}

/// Cooperative scheduler for timed widgets.
///
/// Holds at most one entry per widget. Entries are kept in subscription order
/// so that widgets due on the same tick refresh in a stable order.
#[derive(Debug)]
pub struct RefreshScheduler {
    entries: Vec<ScheduleEntry>,
    base_tick: Duration,
}

impl RefreshScheduler {
    pub fn new(base_tick: Duration) -> Self {
        Self {
            entries: Vec::new(),
            base_tick: base_tick.clamp(MIN_BASE_TICK, MAX_BASE_TICK),
        }
    }

    pub fn base_tick(&self) -> Duration {
        self.base_tick
    }

    /// Add or replace the entry for `key`. The first fire is one interval
    /// after `now`, since subscribing happens right after the initial render.
    pub fn subscribe(&mut self, key: WidgetKey, interval: Duration, now: Instant) {
        let entry = ScheduleEntry {
            key,
            interval,
            next_fire: now + interval,
        };
        match self.entries.iter_mut().find(|e| e.key == entry.key) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn subscribe_all(&mut self, requests: Vec<(WidgetKey, Duration)>, now: Instant) {
        for (key, interval) in requests {
            self.subscribe(key, interval, now);
        }
    }

    /// Drop every entry owned by `module`. Returns how many were removed.
    pub fn unsubscribe_module(&mut self, module: &ModuleId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| &e.key.module != module);
        before - self.entries.len()
    }

    pub fn clear(&mut self) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        dropped
    }

    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    pub fn entries_for(&self, module: &str) -> usize {
        self.entries
            .iter()
            .filter(|e| e.key.module.as_str() == module)
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Collect the widgets due at `now` and advance their entries.
    pub fn take_due(&mut self, now: Instant) -> Vec<WidgetKey> {
        let mut due = Vec::new();
        for entry in &mut self.entries {
            if entry.next_fire <= now {
                entry.advance(now);
                due.push(entry.key.clone());
            }
        }
        due
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|e| e.next_fire).min()
    }

    /// How long a host loop may sleep before the next tick is useful.
    pub fn time_until_next(&self, now: Instant) -> Duration {
        match self.next_deadline() {
            Some(deadline) => deadline.saturating_duration_since(now).min(self.base_tick),
            None => self.base_tick,
        }
    }
}

impl Default for RefreshScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_TICK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: Duration = Duration::from_secs(1);

    #[test]
    fn base_tick_is_clamped() {
        assert_eq!(RefreshScheduler::new(Duration::ZERO).base_tick(), MIN_BASE_TICK);
        assert_eq!(
            RefreshScheduler::new(Duration::from_secs(10)).base_tick(),
            MAX_BASE_TICK
        );
    }

    #[test]
    fn resubscribing_replaces_the_entry() {
        let start = Instant::now();
        let mut scheduler = RefreshScheduler::default();
        let key = WidgetKey::new("status", "cpu");
        scheduler.subscribe(key.clone(), SECOND, start);
        scheduler.subscribe(key.clone(), SECOND, start + SECOND / 2);
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.entries()[0].next_fire, start + SECOND / 2 + SECOND);
    }

    #[test]
    fn fires_once_per_interval() {
        let start = Instant::now();
        let mut scheduler = RefreshScheduler::default();
        let key = WidgetKey::new("status", "cpu");
        scheduler.subscribe(key.clone(), SECOND, start);

        assert!(scheduler.take_due(start + SECOND / 2).is_empty());
        assert_eq!(scheduler.take_due(start + SECOND), vec![key.clone()]);
        assert!(scheduler.take_due(start + SECOND).is_empty());
        assert_eq!(scheduler.entries()[0].next_fire, start + 2 * SECOND);
    }

    #[test]
    fn late_tick_fires_once_and_resyncs() {
        let start = Instant::now();
        let mut scheduler = RefreshScheduler::default();
        let key = WidgetKey::new("status", "cpu");
        scheduler.subscribe(key.clone(), SECOND, start);

        let late = start + Duration::from_millis(5_300);
        assert_eq!(scheduler.take_due(late), vec![key]);
        assert_eq!(scheduler.entries()[0].next_fire, late + SECOND);
        assert!(scheduler.take_due(late + SECOND / 2).is_empty());
    }

    #[test]
    fn slightly_late_tick_keeps_cadence() {
        let start = Instant::now();
        let mut scheduler = RefreshScheduler::default();
        scheduler.subscribe(WidgetKey::new("s", "w"), SECOND, start);
        scheduler.take_due(start + Duration::from_millis(1_200));
        assert_eq!(scheduler.entries()[0].next_fire, start + 2 * SECOND);
    }

    #[test]
    fn unsubscribe_module_only_touches_its_entries() {
        let now = Instant::now();
        let mut scheduler = RefreshScheduler::default();
        scheduler.subscribe(WidgetKey::new("a", "one"), SECOND, now);
        scheduler.subscribe(WidgetKey::new("a", "two"), SECOND, now);
        scheduler.subscribe(WidgetKey::new("b", "one"), SECOND, now);
        assert_eq!(scheduler.unsubscribe_module(&ModuleId::new("a")), 2);
        assert_eq!(scheduler.entries_for("a"), 0);
        assert_eq!(scheduler.entries_for("b"), 1);
    }

    #[test]
    fn time_until_next_never_exceeds_base_tick() {
        let now = Instant::now();
        let mut scheduler = RefreshScheduler::new(Duration::from_millis(200));
        assert_eq!(scheduler.time_until_next(now), Duration::from_millis(200));
        scheduler.subscribe(WidgetKey::new("a", "clock"), Duration::from_millis(100), now);
        assert_eq!(scheduler.time_until_next(now), Duration::from_millis(100));
        scheduler.subscribe(WidgetKey::new("b", "disk"), Duration::from_secs(5), now);
        assert_eq!(scheduler.time_until_next(now), Duration::from_millis(100));
    }
}
