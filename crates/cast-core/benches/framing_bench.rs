//! Criterion benchmarks for the stream framing codec.
//!
//! Measures encode and reassembly throughput at realistic JPEG frame sizes
//! to confirm framing overhead is negligible next to capture and encode.
//!
//! Run with:
//! ```bash
//! cargo bench --package cast-core --bench framing_bench
//! ```

use cast_core::{encode_frame, FrameAssembler};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Typical encoded-frame sizes: a small UI delta, a 1080p JPEG at moderate
/// quality, and a dense 4K JPEG.
const FRAME_SIZES: [usize; 3] = [16 * 1024, 200 * 1024, 1024 * 1024];

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_frame");
    for size in FRAME_SIZES {
        let payload = vec![0xD8u8; size];
        group.bench_with_input(BenchmarkId::from_parameter(size), &payload, |b, p| {
            b.iter(|| encode_frame(black_box(p)));
        });
    }
    group.finish();
}

fn bench_reassemble_whole_chunks(c: &mut Criterion) {
    let mut group = c.benchmark_group("reassemble_whole");
    for size in FRAME_SIZES {
        let wire = encode_frame(&vec![0xD8u8; size]);
        group.bench_with_input(BenchmarkId::from_parameter(size), &wire, |b, w| {
            b.iter(|| {
                let mut asm = FrameAssembler::new();
                asm.push(black_box(w));
                asm.next_frame().unwrap()
            });
        });
    }
    group.finish();
}

fn bench_reassemble_mtu_chunks(c: &mut Criterion) {
    // 1460-byte chunks approximate TCP segments on a standard-MTU link.
    const MTU_PAYLOAD: usize = 1460;

    let mut group = c.benchmark_group("reassemble_mtu");
    for size in FRAME_SIZES {
        let wire = encode_frame(&vec![0xD8u8; size]);
        group.bench_with_input(BenchmarkId::from_parameter(size), &wire, |b, w| {
            b.iter(|| {
                let mut asm = FrameAssembler::new();
                let mut decoded = None;
                for chunk in w.chunks(MTU_PAYLOAD) {
                    asm.push(chunk);
                    if let Some(frame) = asm.next_frame().unwrap() {
                        decoded = Some(frame);
                    }
                }
                decoded
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_encode,
    bench_reassemble_whole_chunks,
    bench_reassemble_mtu_chunks
);
criterion_main!(benches);
