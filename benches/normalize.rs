use criterion::{black_box, criterion_group, criterion_main, Criterion};

use remede_core::{canonical_substance, clustering_key};

const NAMES: &[&str] = &[
    "CHLORHYDRATE DE MEMANTINE",
    "ABACAVIR (SULFATE) EQUIVALENT A ABACAVIR 300 mg",
    "CHLORURE DE SODIUM",
    "VALSARTAN DISODIQUE MONOHYDRATE",
    "CAPTOPRIL/HYDROCHLOROTHIAZIDE 25/12,5 mg",
    "ACIDE ACETYLSALICYLIQUE 500 mg, comprimé effervescent",
    "AMOXICILLINE TRIHYDRATE",
    "Périndopril arginine 5 mg",
];

fn bench_canonical(c: &mut Criterion) {
    c.bench_function("canonical_substance", |b| {
        b.iter(|| {
            for name in NAMES {
                black_box(canonical_substance(black_box(name)));
            }
        })
    });
}

fn bench_clustering_key(c: &mut Criterion) {
    c.bench_function("clustering_key", |b| {
        b.iter(|| {
            for name in NAMES {
                black_box(clustering_key(black_box(name)));
            }
        })
    });
}

criterion_group!(benches, bench_canonical, bench_clustering_key);
criterion_main!(benches);
