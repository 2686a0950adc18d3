//! Fixed-size worker pool for frame rendering.
//!
//! The pool size is the smallest of the requested worker count, the number
//! of CPUs, and how many frames fit in the memory budget at once. It never
//! drops below one worker.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use anyhow::Context;
use rayon::prelude::*;
use tracing::{info, warn};

/// Bytes per output pixel held while a frame is drawn: the RGBA canvas, its
/// RGB copy, the depth buffer share and the encoded JPEG.
const BYTES_PER_PIXEL: u64 = 13;

/// Working memory of one frame task.
pub fn estimate_frame_bytes(width_px: u32, height_px: u32, grid_len: usize) -> u64 {
    let pixels = width_px as u64 * height_px as u64;
    // thickness slice plus its colormapped raster
    let grid = grid_len as u64 * (4 + 4);
    pixels * BYTES_PER_PIXEL + grid
}

/// Effective worker count for a pool.
pub fn effective_workers(
    requested: usize,
    cpus: usize,
    memory_budget: u64,
    frame_bytes: u64,
) -> usize {
    let by_memory = if frame_bytes == 0 {
        usize::MAX
    } else {
        usize::try_from(memory_budget / frame_bytes).unwrap_or(usize::MAX)
    };
    requested.min(cpus).min(by_memory).max(1)
}

/// Memory available to this process: cgroup limit, else physical memory.
pub fn detect_memory_limit() -> Option<u64> {
    // cgroup v2
    if let Ok(limit) = std::fs::read_to_string("/sys/fs/cgroup/memory.max") {
        if let Ok(bytes) = limit.trim().parse::<u64>() {
            if bytes < u64::MAX / 2 {
                return Some(bytes);
            }
        }
    }

    // cgroup v1
    if let Ok(limit) = std::fs::read_to_string("/sys/fs/cgroup/memory/memory.limit_in_bytes") {
        if let Ok(bytes) = limit.trim().parse::<u64>() {
            if bytes < u64::MAX / 2 {
                return Some(bytes);
            }
        }
    }

    let meminfo = std::fs::read_to_string("/proc/meminfo").ok()?;
    meminfo
        .lines()
        .find(|line| line.starts_with("MemTotal:"))
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|kb| kb.parse::<u64>().ok())
        .map(|kb| kb * 1024)
}

/// A rayon thread pool sized for frame rendering.
pub struct WorkerPool {
    pool: rayon::ThreadPool,
    workers: usize,
}

impl WorkerPool {
    /// Build a pool of at most `requested` workers within `memory_budget`.
    pub fn new(requested: usize, memory_budget: u64, frame_bytes: u64) -> anyhow::Result<Self> {
        let cpus = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        let budget = match detect_memory_limit() {
            Some(limit) if limit < memory_budget => {
                warn!(
                    configured_mb = memory_budget / (1024 * 1024),
                    available_mb = limit / (1024 * 1024),
                    "Memory budget exceeds available memory, using available"
                );
                limit
            }
            _ => memory_budget,
        };

        let workers = effective_workers(requested, cpus, budget, frame_bytes);
        if workers < requested {
            info!(
                requested,
                workers,
                cpus,
                frame_mb = frame_bytes / (1024 * 1024),
                "Reduced worker count"
            );
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("frame-worker-{}", i))
            .build()
            .context("failed to build worker pool")?;

        Ok(Self { pool, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run every task on the pool and wait for all of them.
    ///
    /// Results come back in task order. A task that panics yields `Err` with
    /// the panic message and the others still run.
    pub fn run_all<T, R, F>(&self, tasks: &[T], run: F) -> Vec<Result<R, String>>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Send + Sync,
    {
        self.pool.install(|| {
            tasks
                .par_iter()
                .map(|t| catch_unwind(AssertUnwindSafe(|| run(t))).map_err(panic_message))
                .collect()
        })
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
