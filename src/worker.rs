use crate::enumerate::{unrank_burst, unrank_subset};
use crate::error::*;
use crate::noise::SquirrelRng;
use bitvec::prelude::*;
use libecc::types::*;
use libecc::{bitdump, Detection, EccCodec, EccScheme};
use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailMode {
  None,
  Random,
  RandomBurst,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EccStats {
  pub ok: u64,
  pub corrected: u64,
  pub uncorrectable: u64,
  pub false_corrections: u64,
}

// progress is published every 65536 iterations
const PROGRESS_MASK: u64 = 0xFFFF;

/// One worker's share of a run: configuration, its private codec and noise
/// stream, and the counters it accumulates. Owned by the driver, mutated
/// only by its thread, read back after join.
#[derive(Debug)]
pub struct WorkerState {
  pub full_run: bool,
  pub fail_mode: FailMode,
  pub fail_count: u32,
  pub rng: SquirrelRng,
  pub codec: EccCodec,
  pub work_offset: u64,
  pub work_max: u64,
  pub trace: bool,
  pub stats: EccStats,
  pub flip_occurrence_counts: Vec<u64>,
  pub flip_avg_distance_accum: Vec<i64>,
}

impl WorkerState {
  #[allow(clippy::too_many_arguments)]
  pub fn new(
    full_run: bool,
    fail_mode: FailMode,
    fail_count: u32,
    rng: SquirrelRng,
    codec: EccCodec,
    work_offset: u64,
    work_max: u64,
    trace: bool,
  ) -> Self {
    WorkerState {
      full_run,
      fail_mode,
      fail_count,
      rng,
      codec,
      work_offset,
      work_max,
      trace,
      stats: EccStats::default(),
      flip_occurrence_counts: Vec::new(),
      flip_avg_distance_accum: Vec::new(),
    }
  }

  fn failure_positions(&mut self, idx: u64, word_width: u32) -> Vec<u32> {
    let r = self.fail_count;
    match self.fail_mode {
      FailMode::None => Vec::new(),
      FailMode::Random => {
        if self.full_run {
          unrank_subset(word_width as u64, r as u64, idx)
        } else {
          let mut positions: Vec<u32> = Vec::with_capacity(r as usize);
          while positions.len() < r as usize {
            let pos = self.rng.below(word_width as u64) as u32;
            if !positions.contains(&pos) {
              positions.push(pos);
            }
          }
          positions
        }
      }
      FailMode::RandomBurst => {
        if self.full_run {
          unrank_burst(word_width as u64, r as u64, idx)
        } else {
          let start = self.rng.below((word_width - r + 1) as u64) as u32;
          (start..start + r).collect()
        }
      }
    }
  }

  pub fn run(&mut self, progress: &AtomicU64) -> Result<()> {
    let data_width = self.codec.data_width();
    let ecc_width = self.codec.ecc_width();
    let word_width = data_width + ecc_width;
    self.flip_occurrence_counts = vec![0; word_width];
    self.flip_avg_distance_accum = vec![0; word_width];

    // randomized initial word; every iteration leaves data as corrected
    // and mutated, feeding the next ecc reconstruction
    let mut data: BVRep = bitvec![u8, Msb0; 0; data_width];
    for i in 0..data_width {
      data.set(i, self.rng.next_bit());
    }

    for t in 0..self.work_max - self.work_offset {
      let idx = self.work_offset + t;
      if t & PROGRESS_MASK == 0 {
        progress.store(t, Ordering::Relaxed);
      }

      let mut ecc = self.codec.construct(&data)?;
      let data_orig = data.clone();
      let ecc_orig = ecc.clone();

      let positions = self.failure_positions(idx, word_width as u32);
      for &pos in positions.iter() {
        let pos = pos as usize;
        if pos < data_width {
          let cur = data[pos];
          data.set(pos, !cur);
        } else {
          let cur = ecc[pos - data_width];
          ecc.set(pos - data_width, !cur);
        }
      }
      let data_fault = data.clone();
      let ecc_fault = ecc.clone();
      if self.trace {
        if !positions.is_empty() {
          debug!("injecting {} error(s) at {:?}", positions.len(), positions);
        }
        debug!("clean: {} {}", bitdump(&data_orig), bitdump(&ecc_orig));
        debug!("fault: {} {}", bitdump(&data_fault), bitdump(&ecc_fault));
      }

      let detection = self.codec.check_and_correct(&mut data, &mut ecc)?;
      if self.trace {
        debug!("after: {} {}", bitdump(&data), bitdump(&ecc));
      }

      // every bit the codec flipped, with its signed distance to each
      // injected fault
      for bit_pos in 0..word_width {
        let flipped = if bit_pos < data_width {
          data[bit_pos] != data_fault[bit_pos]
        } else {
          ecc[bit_pos - data_width] != ecc_fault[bit_pos - data_width]
        };
        if !flipped {
          continue;
        }
        self.flip_occurrence_counts[bit_pos] += 1;
        for &fpos in positions.iter() {
          self.flip_avg_distance_accum[bit_pos] += bit_pos as i64 - fpos as i64;
        }
      }

      match detection {
        Detection::Ok => {
          self.stats.ok += 1;
          if self.trace {
            debug!("detection: ok");
            if self.fail_mode != FailMode::None && self.fail_count > 0 {
              debug!("completely silent corruption");
            }
          }
        }
        Detection::Corrected => {
          self.stats.corrected += 1;
          if data != data_orig || ecc != ecc_orig {
            self.stats.false_corrections += 1;
            if self.trace {
              debug!("detection: corrected, but not to the original word");
            }
          } else if self.trace {
            debug!("detection: corrected");
          }
        }
        Detection::Uncorrectable => {
          self.stats.uncorrectable += 1;
          if self.trace {
            debug!("detection: uncorrectable");
          }
        }
      }
    }

    progress.store(self.work_max - self.work_offset, Ordering::Relaxed);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use libecc::Ecc;

  #[test]
  fn none_mode_counts_everything_ok() {
    let codec = Ecc::Hamming.setup().unwrap();
    let mut worker = WorkerState::new(
      false,
      FailMode::None,
      0,
      SquirrelRng::new(42),
      codec,
      0,
      100,
      false,
    );
    let progress = AtomicU64::new(0);
    worker.run(&progress).unwrap();
    assert_eq!(worker.stats.ok, 100);
    assert_eq!(worker.stats.corrected, 0);
    assert_eq!(worker.stats.uncorrectable, 0);
    assert_eq!(worker.stats.false_corrections, 0);
    assert_eq!(progress.load(Ordering::Relaxed), 100);
    assert!(worker.flip_occurrence_counts.iter().all(|&c| c == 0));
  }

  #[test]
  fn single_bit_full_run_corrects_every_pattern() {
    let codec = Ecc::Hamming.setup().unwrap();
    let mut worker = WorkerState::new(
      true,
      FailMode::Random,
      1,
      SquirrelRng::new(42),
      codec,
      0,
      72,
      false,
    );
    let progress = AtomicU64::new(0);
    worker.run(&progress).unwrap();
    assert_eq!(worker.stats.corrected, 72);
    assert_eq!(worker.stats.false_corrections, 0);
    // each bit position was corrected back exactly once
    assert!(worker.flip_occurrence_counts.iter().all(|&c| c == 1));
    // a correction lands on the faulted bit, distance zero
    assert!(worker.flip_avg_distance_accum.iter().all(|&d| d == 0));
  }
}
