//! Criterion benchmarks for archive save and load.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use weft_archive::OpenerRegistry;
use weft_bench::table_profile;
use weft_components::register_openers;
use weft_engine::Workspace;

fn bench_save(c: &mut Criterion) {
    c.bench_function("archive/save_table_16x64", |b| {
        let mut ws = table_profile(16, 64);
        b.iter(|| {
            let mut buf = Vec::new();
            ws.save_archive(&mut buf).expect("in-memory save");
            black_box(buf)
        });
    });
}

fn bench_load(c: &mut Criterion) {
    c.bench_function("archive/load_table_16x64", |b| {
        let mut ws = table_profile(16, 64);
        let mut buf = Vec::new();
        ws.save_archive(&mut buf).expect("in-memory save");
        let mut openers = OpenerRegistry::new();
        register_openers(&mut openers);

        b.iter(|| {
            let (loaded, warnings) =
                Workspace::load_archive(&mut buf.as_slice(), &openers).expect("well-formed bytes");
            assert!(warnings.is_empty());
            black_box(loaded)
        });
    });
}

criterion_group!(benches, bench_save, bench_load);
criterion_main!(benches);
