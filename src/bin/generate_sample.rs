//! Write a pair of synthetic broker metric runs (`data-kafka231.csv`,
//! `data-kafka240.csv`) with the columns the default chart set reads.

use anyhow::{Context, Result};

/// One synthetic run: the candidate finishes faster and fetches more
/// records per request.
struct RunShape {
    path: &'static str,
    rows: usize,
    bytes_out_per_sec: f64,
    records_per_fetch: f64,
    heap_mb: f64,
    /// Rows before the consumer reports its first fetch average.
    warmup: usize,
}

const COLUMNS: [&str; 8] = [
    "time-ms",
    "broker:kafka.server:type=BrokerTopicMetrics:name=BytesOutPerSec",
    "kafka-consumer:records-consumed-total",
    "jvm:heap-bytes:mean",
    "jvm:non-heap-bytes:mean",
    "jvm:direct-bytes:mean",
    "kafka-consumer:fetch-total",
    "kafka-consumer:records-per-request-avg",
];

const ONE_MB: f64 = 1000.0 * 1000.0;
const SAMPLE_INTERVAL_MS: usize = 1000;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn write_run(shape: &RunShape, rng: &mut SimpleRng) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(shape.path).with_context(|| format!("creating {}", shape.path))?;
    writer.write_record(COLUMNS)?;

    let mut consumed = 0.0;
    let mut fetches = 0.0;
    for i in 0..shape.rows {
        let t = i as f64;
        let bytes_out =
            (shape.bytes_out_per_sec + rng.gauss(0.0, 0.1 * shape.bytes_out_per_sec)).max(0.0);
        let per_fetch =
            (shape.records_per_fetch + rng.gauss(0.0, 0.05 * shape.records_per_fetch)).max(1.0);
        // Roughly 1 KB records.
        let records = bytes_out / 1000.0;
        consumed += records;
        fetches += records / per_fetch;

        let heap = shape.heap_mb * ONE_MB * (1.0 + 0.2 * (t / 40.0).sin())
            + rng.gauss(0.0, 2.0 * ONE_MB);
        let non_heap = 60.0 * ONE_MB + t * 10_000.0 + rng.gauss(0.0, 0.2 * ONE_MB);
        let direct = 8.0 * ONE_MB + rng.gauss(0.0, 0.5 * ONE_MB);

        let per_fetch_cell = if i < shape.warmup {
            String::new()
        } else {
            format!("{per_fetch:.3}")
        };

        writer.write_record([
            (i * SAMPLE_INTERVAL_MS).to_string(),
            format!("{bytes_out:.1}"),
            format!("{consumed:.0}"),
            format!("{heap:.0}"),
            format!("{non_heap:.0}"),
            format!("{direct:.0}"),
            format!("{fetches:.0}"),
            per_fetch_cell,
        ])?;
    }

    // Summary footer, dropped by the loader's skip_footer.
    let consumed = format!("{consumed:.0}");
    let fetches = format!("{fetches:.0}");
    writer.write_record([
        "summary",
        "",
        consumed.as_str(),
        "",
        "",
        "",
        fetches.as_str(),
        "",
    ])?;
    writer.flush().with_context(|| format!("flushing {}", shape.path))?;

    println!("Wrote {} rows to {}", shape.rows, shape.path);
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let runs = [
        RunShape {
            path: "data-kafka231.csv",
            rows: 600,
            bytes_out_per_sec: 40.0 * ONE_MB,
            records_per_fetch: 250.0,
            heap_mb: 300.0,
            warmup: 12,
        },
        RunShape {
            path: "data-kafka240.csv",
            rows: 450,
            bytes_out_per_sec: 55.0 * ONE_MB,
            records_per_fetch: 480.0,
            heap_mb: 280.0,
            warmup: 8,
        },
    ];

    for shape in &runs {
        write_run(shape, &mut rng)?;
    }
    Ok(())
}
