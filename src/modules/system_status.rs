use crate::shell::{Module, RefreshContext, Region, RenderState, Result, Widget, WidgetContent};
use std::time::{Duration, Instant};
use sysinfo::{Disks, System, MINIMUM_CPU_UPDATE_INTERVAL};

pub const ID: &str = "system_status";

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

pub fn gib(bytes: u64) -> f64 {
    bytes as f64 / GIB
}

/// `used / total` in `0.0..=1.0`; zero when `total` is zero.
pub fn usage_fraction(used: u64, total: u64) -> f32 {
    if total == 0 {
        0.0
    } else {
        (used as f64 / total as f64).clamp(0.0, 1.0) as f32
    }
}

fn usage_state(used: u64, total: u64) -> RenderState {
    let fraction = usage_fraction(used, total);
    RenderState::lines([
        format!("{:.1} / {:.1} GiB", gib(used), gib(total)),
        format!("{:.0}%", fraction * 100.0),
    ])
    .with_gauge(fraction)
}

/// CPU load needs two samples at least `MINIMUM_CPU_UPDATE_INTERVAL` apart.
/// The first sample is taken on creation and the widget shows a placeholder
/// until a second one exists.
struct CpuUsage {
    system: Option<System>,
    sampled_at: Instant,
    primed: bool,
}

impl CpuUsage {
    fn new() -> Self {
        let mut usage = Self {
            system: None,
            sampled_at: Instant::now(),
            primed: false,
        };
        usage.prime();
        usage
    }

    fn prime(&mut self) {
        let mut system = System::new();
        system.refresh_cpu_usage();
        self.system = Some(system);
        self.sampled_at = Instant::now();
        self.primed = false;
    }
}

fn cpu_state(usage: Option<f32>, cores: usize) -> RenderState {
    let cores = format!("{cores} cores");
    match usage {
        Some(usage) => RenderState::lines([format!("{usage:.0}%"), cores]).with_gauge(usage / 100.0),
        None => RenderState::lines(["measuring\u{2026}".to_string(), cores]),
    }
}

impl WidgetContent for CpuUsage {
    fn render(&mut self, _ctx: &RefreshContext) -> anyhow::Result<RenderState> {
        if self.system.is_none() {
            self.prime();
        }
        let ready = self.sampled_at.elapsed() >= MINIMUM_CPU_UPDATE_INTERVAL;
        let Some(system) = self.system.as_mut() else {
            anyhow::bail!("cpu sampler unavailable");
        };
        if ready {
            system.refresh_cpu_usage();
            self.sampled_at = Instant::now();
            self.primed = true;
        }
        let usage = self.primed.then(|| system.global_cpu_usage());
        Ok(cpu_state(usage, system.cpus().len()))
    }

    fn release(&mut self) {
        self.system = None;
        self.primed = false;
    }
}

#[derive(Default)]
struct MemoryUsage {
    system: Option<System>,
}

impl WidgetContent for MemoryUsage {
    fn render(&mut self, _ctx: &RefreshContext) -> anyhow::Result<RenderState> {
        let system = self.system.get_or_insert_with(System::new);
        system.refresh_memory();
        Ok(usage_state(system.used_memory(), system.total_memory()))
    }

    fn release(&mut self) {
        self.system = None;
    }
}

struct DiskUsage;

impl WidgetContent for DiskUsage {
    fn render(&mut self, _ctx: &RefreshContext) -> anyhow::Result<RenderState> {
        let disks = Disks::new_with_refreshed_list();
        let mut total = 0u64;
        let mut avail = 0u64;
        for d in disks.list() {
            total += d.total_space();
            avail += d.available_space();
        }
        if total == 0 {
            anyhow::bail!("no disks reported");
        }
        Ok(usage_state(total.saturating_sub(avail), total))
    }
}

pub fn module() -> Result<Module> {
    Module::builder(ID, "System status", Region::Middle)
        .widget(Widget::new_timed(
            "cpu",
            "CPU",
            Duration::from_secs(1),
            CpuUsage::new(),
        )?)
        .widget(Widget::new_timed(
            "memory",
            "Memory",
            Duration::from_secs(2),
            MemoryUsage::default(),
        )?)
        .widget(Widget::new_timed(
            "disk",
            "Disk",
            Duration::from_secs(5),
            DiskUsage,
        )?)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_fraction_handles_zero_total() {
        assert_eq!(usage_fraction(10, 0), 0.0);
        assert_eq!(usage_fraction(1, 4), 0.25);
        assert_eq!(usage_fraction(8, 4), 1.0);
    }

    #[test]
    fn cpu_shows_placeholder_until_two_samples_exist() {
        let pending = cpu_state(None, 8);
        assert_eq!(pending.lines, vec!["measuring\u{2026}", "8 cores"]);
        assert_eq!(pending.gauge, None);
        let ready = cpu_state(Some(50.0), 8);
        assert_eq!(ready.lines, vec!["50%", "8 cores"]);
        assert_eq!(ready.gauge, Some(0.5));
    }

    #[test]
    fn released_cpu_sampler_is_primed_again() {
        let mut cpu = CpuUsage::new();
        cpu.release();
        assert!(cpu.system.is_none());
        let ctx = RefreshContext {
            now: Instant::now(),
            wall: chrono::Local::now(),
        };
        cpu.render(&ctx).unwrap();
        assert!(cpu.system.is_some());
    }

    #[test]
    fn usage_state_formats_gib() {
        let state = usage_state(2 * 1024 * 1024 * 1024, 8 * 1024 * 1024 * 1024);
        assert_eq!(state.lines, vec!["2.0 / 8.0 GiB", "25%"]);
        assert_eq!(state.gauge, Some(0.25));
    }

    #[test]
    fn refresh_intervals_follow_cost() {
        let module = module().unwrap();
        let intervals: Vec<u64> = module
            .widgets()
            .iter()
            .filter_map(|w| w.kind().interval())
            .map(|i| i.as_millis() as u64)
            .collect();
        assert_eq!(intervals, vec![1_000, 2_000, 5_000]);
    }
}
