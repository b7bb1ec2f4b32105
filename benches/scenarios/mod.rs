//! Whole-instrument benchmarks: a saturated voice pool, drum synthesis and
//! the 16-bit output path.

mod drums;
mod voices;

pub use drums::bench_drums;
pub use voices::bench_voices;
