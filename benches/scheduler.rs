use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dash_shell::shell::{
    content_fn, ManualClock, Module, NullRenderer, Region, RenderState, Shell, ShellConfig,
    Widget,
};
use std::sync::Arc;
use std::time::Duration;

fn build_shell(modules: usize, widgets: usize, clock: &ManualClock) -> Shell<NullRenderer> {
    let mut shell = Shell::init(NullRenderer, Arc::new(clock.clone()), ShellConfig::default());
    for m in 0..modules {
        let region = Region::ALL[m % Region::ALL.len()];
        let timed = (0..widgets).map(|w| {
            Widget::new_timed(
                format!("w{w}"),
                format!("Widget {w}"),
                Duration::from_millis(250 * (1 + (w as u64 % 4))),
                content_fn(move |ctx| Ok(RenderState::text(format!("{:?}", ctx.now)))),
            )
            .expect("positive interval")
        });
        let module = Module::builder(format!("m{m}"), format!("Module {m}"), region)
            .widgets(timed)
            .build()
            .expect("valid module");
        shell.register_module(module, true).expect("unique id");
    }
    shell
}

fn bench_tick(c: &mut Criterion) {
    let clock = ManualClock::new();
    let mut shell = build_shell(12, 8, &clock);
    c.bench_function("tick_96_timed_widgets", |b| {
        b.iter(|| {
            clock.advance_ms(250);
            black_box(shell.tick())
        })
    });
}

fn bench_toggle(c: &mut Criterion) {
    let clock = ManualClock::new();
    let mut shell = build_shell(12, 8, &clock);
    c.bench_function("toggle_off_on", |b| {
        b.iter(|| {
            shell.toggle_module("m5", false).expect("known module");
            shell.toggle_module("m5", true).expect("known module");
        })
    });
}

criterion_group!(benches, bench_tick, bench_toggle);
criterion_main!(benches);
