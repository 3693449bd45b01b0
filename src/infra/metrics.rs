//! Lock-free session metrics and periodic reporting
//!
//! Uses atomics for per-frame operations so a capture thread and a reporting
//! thread never contend on a mutex. Reporting is the only operation that
//! resets anything (via atomic swap).
//!
//! NOTE: All atomics use Relaxed ordering intentionally. These are statistical
//! counters only and must not drive any evaluation decision.

use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

/// Exponential bucket boundaries for frame evaluation latency (microseconds)
/// Buckets: ≤10, ≤20, ≤40, ≤80, ≤160, ≤320, ≤640, ≤1280, ≤2560, ≤5120, >5120
const BUCKET_BOUNDS: [u64; 10] = [10, 20, 40, 80, 160, 320, 640, 1280, 2560, 5120];
const NUM_BUCKETS: usize = 11;

/// Compute bucket index for a latency value using binary search
#[inline]
fn bucket_index(latency_us: u64) -> usize {
    BUCKET_BOUNDS.partition_point(|&bound| bound < latency_us)
}

/// Upper bound reported for a bucket; the overflow bucket reports twice the last bound
fn bucket_upper_bound(index: usize) -> u64 {
    BUCKET_BOUNDS.get(index).copied().unwrap_or(BUCKET_BOUNDS[BUCKET_BOUNDS.len() - 1] * 2)
}

/// Smallest bucket bound covering `quantile` of the recorded frames (0 when empty)
fn latency_quantile(buckets: &[u64; NUM_BUCKETS], quantile: f64) -> u64 {
    let total: u64 = buckets.iter().sum();
    if total == 0 {
        return 0;
    }

    let target = (total as f64 * quantile).ceil() as u64;
    let mut seen = 0u64;
    buckets
        .iter()
        .position(|&count| {
            seen += count;
            seen >= target
        })
        .map_or(bucket_upper_bound(NUM_BUCKETS - 1), bucket_upper_bound)
}

/// Lock-free metrics collector for one or more sessions
pub struct Metrics {
    /// Total frames ever evaluated (monotonic)
    frames_total: AtomicU64,
    /// Frames since last report (reset on report)
    frames_since_report: AtomicU64,
    /// Sum of evaluation latencies in microseconds (reset on report)
    latency_sum_us: AtomicU64,
    /// Max evaluation latency in microseconds (reset on report)
    latency_max_us: AtomicU64,
    /// Evaluation latency histogram (reset on report)
    latency_buckets: [AtomicU64; NUM_BUCKETS],
    /// Events appended to a session log (monotonic)
    events_recorded: AtomicU64,
    /// Events dropped by the dedup window (monotonic)
    events_suppressed: AtomicU64,
    /// Perception collaborator calls that failed and were treated as empty (monotonic)
    perception_failures: AtomicU64,
    /// Recorded events per event tag; only touched on append, not per frame
    recorded_by_tag: parking_lot::Mutex<FxHashMap<&'static str, u64>>,
    /// Last report time (only accessed from the reporter)
    last_report_time: parking_lot::Mutex<Instant>,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            frames_total: AtomicU64::new(0),
            frames_since_report: AtomicU64::new(0),
            latency_sum_us: AtomicU64::new(0),
            latency_max_us: AtomicU64::new(0),
            latency_buckets: std::array::from_fn(|_| AtomicU64::new(0)),
            events_recorded: AtomicU64::new(0),
            events_suppressed: AtomicU64::new(0),
            perception_failures: AtomicU64::new(0),
            recorded_by_tag: parking_lot::Mutex::new(FxHashMap::default()),
            last_report_time: parking_lot::Mutex::new(Instant::now()),
        }
    }

    /// Record a frame was evaluated with given latency (lock-free)
    #[inline]
    pub fn record_frame_evaluated(&self, latency_us: u64) {
        self.frames_total.fetch_add(1, Ordering::Relaxed);
        self.frames_since_report.fetch_add(1, Ordering::Relaxed);
        self.latency_sum_us.fetch_add(latency_us, Ordering::Relaxed);

        let bucket = bucket_index(latency_us);
        self.latency_buckets[bucket].fetch_add(1, Ordering::Relaxed);

        self.latency_max_us.fetch_max(latency_us, Ordering::Relaxed);
    }

    /// Record an event appended to the log
    pub fn record_event_recorded(&self, tag: &'static str) {
        self.events_recorded.fetch_add(1, Ordering::Relaxed);
        *self.recorded_by_tag.lock().entry(tag).or_insert(0) += 1;
    }

    /// Record an event dropped by dedup (lock-free)
    #[inline]
    pub fn record_event_suppressed(&self) {
        self.events_suppressed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed perception call (lock-free)
    #[inline]
    pub fn record_perception_failure(&self) {
        self.perception_failures.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn frames_total(&self) -> u64 {
        self.frames_total.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn events_recorded(&self) -> u64 {
        self.events_recorded.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn events_suppressed(&self) -> u64 {
        self.events_suppressed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn perception_failures(&self) -> u64 {
        self.perception_failures.load(Ordering::Relaxed)
    }

    /// Calculate and return metrics summary, then reset periodic counters
    pub fn report(&self) -> MetricsSummary {
        let frames_count = self.frames_since_report.swap(0, Ordering::Relaxed);
        let latency_sum = self.latency_sum_us.swap(0, Ordering::Relaxed);
        let max_latency = self.latency_max_us.swap(0, Ordering::Relaxed);
        let lat_buckets: [u64; NUM_BUCKETS] =
            std::array::from_fn(|i| self.latency_buckets[i].swap(0, Ordering::Relaxed));

        let elapsed = {
            let mut last = self.last_report_time.lock();
            let elapsed = last.elapsed();
            *last = Instant::now();
            elapsed
        };

        let frames_per_sec = if elapsed.as_secs_f64() > 0.0 {
            frames_count as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        let avg_latency = if frames_count > 0 { latency_sum / frames_count } else { 0 };

        let mut recorded_by_tag: Vec<(&'static str, u64)> =
            self.recorded_by_tag.lock().iter().map(|(k, v)| (*k, *v)).collect();
        recorded_by_tag.sort_unstable();

        MetricsSummary {
            frames_total: self.frames_total.load(Ordering::Relaxed),
            frames_per_sec,
            avg_eval_latency_us: avg_latency,
            max_eval_latency_us: max_latency,
            lat_buckets,
            lat_p50_us: latency_quantile(&lat_buckets, 0.50),
            lat_p99_us: latency_quantile(&lat_buckets, 0.99),
            events_recorded: self.events_recorded.load(Ordering::Relaxed),
            events_suppressed: self.events_suppressed.load(Ordering::Relaxed),
            perception_failures: self.perception_failures.load(Ordering::Relaxed),
            recorded_by_tag,
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct MetricsSummary {
    pub frames_total: u64,
    pub frames_per_sec: f64,
    pub avg_eval_latency_us: u64,
    pub max_eval_latency_us: u64,
    /// Bounds: ≤10, ≤20, ≤40, ≤80, ≤160, ≤320, ≤640, ≤1280, ≤2560, ≤5120, >5120 µs
    pub lat_buckets: [u64; NUM_BUCKETS],
    pub lat_p50_us: u64,
    pub lat_p99_us: u64,
    pub events_recorded: u64,
    pub events_suppressed: u64,
    pub perception_failures: u64,
    /// Sorted by tag
    pub recorded_by_tag: Vec<(&'static str, u64)>,
}

impl MetricsSummary {
    pub fn log(&self) {
        info!(
            frames_total = %self.frames_total,
            frames_per_sec = format!("{:.1}", self.frames_per_sec),
            avg_latency_us = %self.avg_eval_latency_us,
            max_latency_us = %self.max_eval_latency_us,
            p50_us = %self.lat_p50_us,
            p99_us = %self.lat_p99_us,
            events_recorded = %self.events_recorded,
            events_suppressed = %self.events_suppressed,
            perception_failures = %self.perception_failures,
            by_tag = ?self.recorded_by_tag,
            "metrics"
        );
    }
}
