use std::time::Duration;

use criterion::*;
use oasys::attribute::builtin::{Vec2, Velocity, TRANSLATION, VELOCITY};
use oasys::{system, tracer};
use rand::Rng;

fn update_translator(c: &mut Criterion) {
    let mut group = c.benchmark_group("update (position += velocity * dt)");
    group.measurement_time(Duration::from_secs(10));

    for log_objects in (4..=16).step_by(4) {
        let num_objects = 1 << log_objects;
        group.throughput(Throughput::Elements(num_objects));
        group.bench_with_input(
            BenchmarkId::new("translator", format!("{num_objects} objects")),
            &num_objects,
            |b, &num_objects| {
                let ctx = oasys::context_test!(system::TRANSLATOR => system::Translator);
                let mut rng = rand::thread_rng();
                for _ in 0..num_objects {
                    let id = ctx
                        .create_object_with(oasys::mask![TRANSLATION, VELOCITY])
                        .expect("registered");
                    ctx.attribute::<Velocity>(id, VELOCITY).expect("attached").0 = Vec2::new(
                        rng.gen_range(-64.0..=64.0),
                        rng.gen_range(-64.0..=64.0),
                    );
                }

                b.iter(|| ctx.update(1.0 / 60.0, &tracer::Noop).expect("frame succeeds"));
            },
        );
    }
}

criterion_group!(benches, update_translator);
criterion_main!(benches);
