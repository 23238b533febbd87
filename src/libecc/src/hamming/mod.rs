use crate::error::*;
use crate::types::*;
use crate::{Detection, EccScheme};
use bitvec::prelude::*;

const DATA_WIDTH: usize = 64;
const ECC_WIDTH: usize = 8;

/// SEC-DED Hamming over 64 data bits: 7 positional parity bits plus one
/// overall parity bit covering the data and the positional parities.
#[derive(Debug, Clone, Default)]
pub struct Hamming {}

impl Hamming {
  pub fn new() -> Self {
    Hamming {}
  }

  // XOR of the logical positions of all set data bits, plus the running
  // parity over the data bits. Logical positions count from 1 and skip
  // powers of two (those are the parity positions themselves), so data
  // bit i occupies position p with i = p - 1 - skips.
  fn position_mask(data: &BSRep) -> (u32, bool) {
    let mut mask = 0u32;
    let mut parity = false;
    let mut skips = 0u32;
    let mut emitted = 0usize;
    let mut p = 0u32;
    while emitted < DATA_WIDTH {
      p += 1;
      if p.is_power_of_two() {
        skips += 1;
        continue;
      }
      if data[(p - 1 - skips) as usize] {
        mask ^= p;
        parity = !parity;
      }
      emitted += 1;
    }
    (mask, parity)
  }
}

impl EccScheme for Hamming {
  fn data_width(&self) -> usize {
    DATA_WIDTH
  }

  fn ecc_width(&self) -> usize {
    ECC_WIDTH
  }

  fn construct(&self, data: &BSRep) -> Result<BVRep> {
    ensure!(data.len() == DATA_WIDTH, "Invalid data width");
    let (mask, mut parity) = Self::position_mask(data);
    let mut ecc = bitvec![u8, Msb0; 0; ECC_WIDTH];
    for j in 0..ECC_WIDTH - 1 {
      if (mask >> j) & 1 == 1 {
        ecc.set(j, true);
        parity = !parity;
      }
    }
    ecc.set(ECC_WIDTH - 1, parity);
    Ok(ecc)
  }

  fn check_and_correct(&self, data: &mut BVRep, ecc: &mut BVRep) -> Result<Detection> {
    ensure!(data.len() == DATA_WIDTH, "Invalid data width");
    ensure!(ecc.len() == ECC_WIDTH, "Invalid ecc width");
    let (check_mask, mut parity) = Self::position_mask(data);
    let mut stored = 0u32;
    for j in 0..ECC_WIDTH - 1 {
      if ecc[j] {
        stored |= 1 << j;
        parity = !parity;
      }
    }
    let syndrome = stored ^ check_mask;
    let parity_match = parity == ecc[ECC_WIDTH - 1];

    if syndrome == 0 {
      if parity_match {
        return Ok(Detection::Ok);
      }
      // single-bit error in the overall parity bit itself
      let cur = ecc[ECC_WIDTH - 1];
      ecc.set(ECC_WIDTH - 1, !cur);
      return Ok(Detection::Corrected);
    }
    if parity_match {
      // even-weight error pattern
      return Ok(Detection::Uncorrectable);
    }
    if syndrome.is_power_of_two() {
      // the faulty logical position is a parity position
      let j = syndrome.trailing_zeros() as usize;
      let cur = ecc[j];
      ecc.set(j, !cur);
      return Ok(Detection::Corrected);
    }
    // number of parity positions below the syndrome position
    let skips = 32 - syndrome.leading_zeros();
    let idx = (syndrome - 1 - skips) as usize;
    if idx >= DATA_WIDTH {
      // syndrome points outside the word, reachable only past SEC-DED capability
      return Ok(Detection::Uncorrectable);
    }
    let cur = data[idx];
    data.set(idx, !cur);
    Ok(Detection::Corrected)
  }
}
