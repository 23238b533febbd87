pub mod enumerate;
mod error;
pub mod noise;
pub mod report;
mod worker;

pub use worker::{EccStats, FailMode, WorkerState};

use enumerate::binomial;
use error::*;
use libecc::{Ecc, EccScheme};
use log::info;
use noise::SquirrelRng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestCount {
  Count(u64),
  /// exhaustive: every C(n,r) fault set, or every n-r+1 burst
  Full,
}

#[derive(Debug, Clone)]
pub struct RunConfig {
  /// 0 or more than the hardware parallelism clamps to the hardware
  pub threads: usize,
  pub fail_mode: FailMode,
  pub fail_count: u32,
  pub test_count: TestCount,
  pub scheme: Ecc,
  /// time-seeded when absent
  pub seed: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct RunReport {
  pub data_width: usize,
  pub ecc_width: usize,
  pub fail_count: u32,
  pub test_count: u64,
  pub full_run: bool,
  pub stats: EccStats,
  pub flip_occurrence_counts: Vec<u64>,
  pub flip_avg_distances: Vec<i64>,
}

const POLL_INTERVAL: Duration = Duration::from_millis(150);

pub fn run(cfg: &RunConfig) -> Result<RunReport> {
  ensure!(cfg.fail_count <= 8, "fail count {} out of range", cfg.fail_count);

  let hw = thread::available_parallelism().map(|p| p.get()).unwrap_or(1);
  let threads = if cfg.threads == 0 || cfg.threads > hw {
    hw
  } else {
    cfg.threads
  };

  let probe = cfg.scheme.setup()?;
  let data_width = probe.data_width();
  let ecc_width = probe.ecc_width();
  let word_width = (data_width + ecc_width) as u64;
  ensure!(
    (cfg.fail_count as u64) <= word_width,
    "fail count {} exceeds the word width {}",
    cfg.fail_count,
    word_width
  );

  let (test_count, full_run) = match cfg.test_count {
    TestCount::Count(c) => (c, false),
    TestCount::Full => {
      let total = match cfg.fail_mode {
        FailMode::RandomBurst => word_width - cfg.fail_count as u64 + 1,
        _ => binomial(word_width, cfg.fail_count as u64),
      };
      (total, true)
    }
  };

  let seed = cfg.seed.unwrap_or_else(time_seed);
  let mut master = SquirrelRng::new(seed);

  info!(
    "datawidth {} eccwidth {}, {} threads, seed {}",
    data_width, ecc_width, threads, seed
  );
  if full_run {
    info!("full run: {} tests", report::spaced_u64(test_count));
  }

  let trace = !full_run && test_count <= 10;
  let work_per_thread = test_count / threads as u64;
  let rest_work = test_count % threads as u64;

  let mut workers: Vec<WorkerState> = (0..threads)
    .map(|tid| {
      let codec = cfg.scheme.setup()?;
      let offset = tid as u64 * work_per_thread;
      let max =
        (tid as u64 + 1) * work_per_thread + if tid == threads - 1 { rest_work } else { 0 };
      Ok(WorkerState::new(
        full_run,
        cfg.fail_mode,
        cfg.fail_count,
        SquirrelRng::new(master.next_u64()),
        codec,
        offset,
        max,
        trace,
      ))
    })
    .collect::<Result<_>>()?;

  // the only inter-thread reads during the run: one progress word per
  // worker, single writer each, relaxed is enough for reporting
  let progress: Vec<AtomicU64> = (0..threads).map(|_| AtomicU64::new(0)).collect();

  let worker_results: Vec<Result<()>> = thread::scope(|s| {
    let handles: Vec<_> = workers
      .iter_mut()
      .zip(progress.iter())
      .map(|(worker, slot)| {
        s.spawn(move || {
          let res = worker.run(slot);
          // publish the full share even on the error path so the poll
          // loop below terminates
          slot.store(worker.work_max - worker.work_offset, Ordering::Relaxed);
          res
        })
      })
      .collect();

    loop {
      let done: u64 = progress.iter().map(|p| p.load(Ordering::Relaxed)).sum();
      if !trace {
        eprint!("\rprogress: {:.5}", done as f64 / test_count.max(1) as f64);
      }
      if handles.iter().all(|h| h.is_finished()) {
        break;
      }
      thread::sleep(POLL_INTERVAL);
    }

    handles
      .into_iter()
      .map(|h| h.join().expect("worker thread panicked"))
      .collect()
  });
  if !trace {
    eprintln!("\rprogress: 1.00000");
  }
  for res in worker_results {
    res?;
  }

  let mut stats = EccStats::default();
  let mut flip_occurrence_counts = vec![0u64; word_width as usize];
  let mut flip_avg_distances = vec![0i64; word_width as usize];
  for worker in workers.iter() {
    stats.ok += worker.stats.ok;
    stats.corrected += worker.stats.corrected;
    stats.uncorrectable += worker.stats.uncorrectable;
    stats.false_corrections += worker.stats.false_corrections;
    for bit_pos in 0..word_width as usize {
      flip_occurrence_counts[bit_pos] += worker.flip_occurrence_counts[bit_pos];
      flip_avg_distances[bit_pos] += worker.flip_avg_distance_accum[bit_pos];
    }
  }
  if stats.false_corrections > 0 {
    let denom = cfg.fail_count as i64 * stats.false_corrections as i64;
    for v in flip_avg_distances.iter_mut() {
      *v /= denom;
    }
  }

  Ok(RunReport {
    data_width,
    ecc_width,
    fail_count: cfg.fail_count,
    test_count,
    full_run,
    stats,
    flip_occurrence_counts,
    flip_avg_distances,
  })
}

fn time_seed() -> u64 {
  std::time::SystemTime::now()
    .duration_since(std::time::UNIX_EPOCH)
    .map(|d| d.as_nanos() as u64)
    .unwrap_or(0)
}
