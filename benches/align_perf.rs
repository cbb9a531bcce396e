// benches/align_perf.rs
// Criterion benchmarks for the quality-weighted DP kernel.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rand::{rngs::StdRng, Rng, SeedableRng};

use pyroalign::{AlignMode, Aligner};

const BASES: &[u8; 4] = b"ACGT";

fn random_seq(rng: &mut StdRng, len: usize) -> Vec<u8> {
    (0..len).map(|_| BASES[rng.gen_range(0..4)]).collect()
}

/// A read sampled from the reference with substitutions sprinkled in, plus a
/// plausible Sanger quality string.
fn sampled_read(rng: &mut StdRng, reference: &[u8], len: usize) -> (Vec<u8>, Vec<u8>) {
    let start = rng.gen_range(0..reference.len() - len);
    let mut read = reference[start..start + len].to_vec();
    for base in read.iter_mut() {
        if rng.gen_bool(0.02) {
            *base = BASES[rng.gen_range(0..4)];
        }
    }
    let qual = (0..len).map(|_| rng.gen_range(b'!'..=b'I')).collect();
    (read, qual)
}

fn bench_align(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0x454);

    let mut group = c.benchmark_group("align");
    for &(window, read_len) in &[(200usize, 100usize), (600, 400), (1200, 800)] {
        let reference = random_seq(&mut rng, window);
        let (read, qual) = sampled_read(&mut rng, &reference, read_len);
        let mut al = Aligner::with_defaults();

        group.throughput(Throughput::Elements((window * read_len) as u64));
        group.bench_function(format!("semiglobal_{read_len}bp_in_{window}bp"), |b| {
            b.iter(|| {
                al.prepare(&reference, &read, &qual, 0, 0).unwrap();
                black_box(al.align(AlignMode::SemiGlobal).unwrap());
            })
        });
    }
    group.finish();
}

fn bench_trace(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0x454);
    let reference = random_seq(&mut rng, 600);
    let (read, qual) = sampled_read(&mut rng, &reference, 400);

    let mut al = Aligner::with_defaults();
    al.prepare(&reference, &read, &qual, 0, 0).unwrap();
    al.align(AlignMode::SemiGlobal).unwrap();

    c.bench_function("trace_400bp", |b| {
        b.iter(|| {
            al.trace().unwrap();
            black_box(al.offset());
        })
    });
}

criterion_group!(benches, bench_align, bench_trace);
criterion_main!(benches);
