//! VETZ Benchmark Suite
//!
//! Hot paths called every simulation frame:
//!   level_from_points_canonical ...... curve scan, no caching
//!   add_experience_single ............ gated award, no sink
//!   add_experience_sink_chain_8 ...... award forwarded through 8 sinks
//!   kill_event_frame_50 .............. 50 kills through the event system
//!   world_crc_200 .................... lockstep checksum of 200 actors

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use vetz_core::{ExperienceOwner, ExperienceWorldExt, LevelCurve, ObjectId, VetzConfig};
use vetz_sim::events::GameEvent;
use vetz_sim::save;
use vetz_sim::systems;
use vetz_sim::{GameWorld, TemplateRegistry, ThingTemplate};

fn make_world() -> GameWorld {
    let mut templates = TemplateRegistry::new();
    templates.insert(
        ThingTemplate::new("Ranger", true)
            .with_experience_values(vec![20, 40, 60, 80])
            .with_health(180.0, 20.0),
    );
    GameWorld::new(&VetzConfig::default(), templates)
}

/// A world where actor 1 sinks into 2, 2 into 3, and so on `depth` times.
fn make_chain(depth: u32) -> (GameWorld, ObjectId) {
    let mut world = make_world();
    let ids: Vec<ObjectId> = (0..=depth)
        .map(|_| world.spawn("Ranger").expect("registered template"))
        .collect();
    for pair in ids.windows(2) {
        world
            .get_mut(pair[0])
            .expect("alive")
            .experience_tracker_mut()
            .set_sink(pair[1]);
    }
    (world, ids[0])
}

/// Benchmark: Level lookup at a mid-curve points total.
fn bench_level_from_points(c: &mut Criterion) {
    let curve = LevelCurve::CANONICAL;
    c.bench_function("level_from_points_canonical", |b| {
        b.iter(|| curve.level_from_points(black_box(50_000)));
    });
}

/// Benchmark: One award on an actor with no sink.
fn bench_add_experience(c: &mut Criterion) {
    let mut world = make_world();
    let id = world.spawn("Ranger").expect("registered template");

    c.bench_function("add_experience_single", |b| {
        b.iter(|| world.add_experience(black_box(id), black_box(25), false));
    });
}

/// Benchmark: One award forwarded through eight sinks.
fn bench_sink_chain(c: &mut Criterion) {
    let (mut world, head) = make_chain(8);

    c.bench_function("add_experience_sink_chain_8", |b| {
        b.iter(|| world.add_experience(black_box(head), black_box(25), true));
    });
}

/// Benchmark: A frame with 50 kills.
fn bench_kill_frame(c: &mut Criterion) {
    c.bench_function("kill_event_frame_50", |b| {
        b.iter_batched(
            || {
                let mut world = make_world();
                let events: Vec<GameEvent> = (0..50)
                    .map(|_| {
                        let killer = world.spawn("Ranger").expect("registered template");
                        let victim = world.spawn("Ranger").expect("registered template");
                        GameEvent::Kill {
                            killer: Some(killer),
                            victim,
                        }
                    })
                    .collect();
                (world, events)
            },
            |(mut world, events)| {
                systems::process_events(&mut world, &events).expect("victims alive");
                black_box(world);
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

/// Benchmark: World crc over 200 actors.
fn bench_world_crc(c: &mut Criterion) {
    let mut world = make_world();
    for i in 0..200 {
        let id = world.spawn("Ranger").expect("registered template");
        world.add_experience(id, i * 7, false);
    }

    c.bench_function("world_crc_200", |b| {
        b.iter(|| save::world_crc(black_box(&world)).expect("crc never fails"));
    });
}

criterion_group!(
    benches,
    bench_level_from_points,
    bench_add_experience,
    bench_sink_chain,
    bench_kill_frame,
    bench_world_crc,
);
criterion_main!(benches);
