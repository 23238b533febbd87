use crate::error::*;
use crate::types::*;
use crate::util::bitdump;
use crate::{Detection, EccScheme};
use bitvec::prelude::*;
use log::debug;

mod matrix;

/// Minimum parity width for a SEC-DED code over `data_width` bits: the
/// smallest m+1 such that 2^m - m - 1 >= data_width.
pub fn min_parity_width(data_width: usize) -> usize {
  let mut m = 0u32;
  loop {
    if (1u64 << m) - m as u64 - 1 >= data_width as u64 {
      return m as usize + 1;
    }
    m += 1;
  }
}

/// Hsiao SEC-DED codec: a Hamming-distance-4 code whose parity-check matrix
/// has odd-weight, pairwise-distinct columns with the identity in the ecc
/// segment. H is held both row-major and column-major.
#[derive(Debug, Clone)]
pub struct Hsiao {
  data_width: usize,
  parity_width: usize,
  rows: Vec<BVRep>,
  cols: Vec<BVRep>,
}

impl Hsiao {
  pub fn new(data_width: usize, parity_bits: usize) -> Result<Self> {
    ensure!(data_width >= 1, "Invalid data width");
    let req = min_parity_width(data_width);
    ensure!(
      parity_bits >= req,
      "too few parity bits ({}), need at least {}",
      parity_bits,
      req
    );
    let k = parity_bits;
    let n = data_width + k;
    let h = matrix::parity_check(data_width, k);
    let mut rows = vec![bitvec![u8, Msb0; 0; n]; k];
    let mut cols = vec![bitvec![u8, Msb0; 0; k]; n];
    for ri in 0..k {
      for ci in 0..n {
        if h.d[ri][ci] != 0 {
          rows[ri].set(ci, true);
          cols[ci].set(ri, true);
        }
      }
    }
    for row in rows.iter() {
      debug!("H row: {}", bitdump(row.as_bitslice()));
    }
    Ok(Hsiao {
      data_width,
      parity_width: k,
      rows,
      cols,
    })
  }

  /// Rows of H, each of length data_width + parity_width.
  pub fn rows(&self) -> &[BVRep] {
    &self.rows
  }

  /// Columns of H, each of length parity_width.
  pub fn columns(&self) -> &[BVRep] {
    &self.cols
  }

  fn data_syndrome(&self, data: &BSRep) -> BVRep {
    data.iter().enumerate().fold(
      bitvec![u8, Msb0; 0; self.parity_width],
      |acc, (ci, b)| if *b { acc ^ &self.cols[ci] } else { acc },
    )
  }
}

impl EccScheme for Hsiao {
  fn data_width(&self) -> usize {
    self.data_width
  }

  fn ecc_width(&self) -> usize {
    self.parity_width
  }

  fn construct(&self, data: &BSRep) -> Result<BVRep> {
    ensure!(data.len() == self.data_width, "Invalid data width");
    // last k columns of H are the identity, so the data syndrome is the
    // systematic parity
    Ok(self.data_syndrome(data))
  }

  fn check_and_correct(&self, data: &mut BVRep, ecc: &mut BVRep) -> Result<Detection> {
    ensure!(data.len() == self.data_width, "Invalid data width");
    ensure!(ecc.len() == self.parity_width, "Invalid ecc width");
    let n = self.data_width + self.parity_width;
    let syndrome = self.data_syndrome(data);
    let mismatch: Vec<bool> = (0..self.parity_width)
      .map(|ri| ecc[ri] != syndrome[ri])
      .collect();
    let mmcnt = mismatch.iter().filter(|&&m| m).count();
    if mmcnt == 0 {
      return Ok(Detection::Ok);
    }
    if mmcnt % 2 == 0 {
      // every single-bit syndrome has odd weight, so an even mismatch
      // pattern cannot be one
      return Ok(Detection::Uncorrectable);
    }
    // a single-bit error at ci produces exactly the mismatch pattern
    // H[.][ci]; conjoining matched rows and eliminating unmatched ones
    // isolates that column
    let mut candidates = bitvec![u8, Msb0; 1; n];
    if mmcnt == 1 {
      // one mismatched parity row means the fault sits in the ecc segment
      candidates[..self.data_width].fill(false);
    }
    for ri in 0..self.parity_width {
      let row = &self.rows[ri];
      if mismatch[ri] {
        for ci in 0..n {
          if !row[ci] {
            candidates.set(ci, false);
          }
        }
      } else {
        for ci in 0..n {
          if row[ci] {
            candidates.set(ci, false);
          }
        }
      }
    }
    match candidates.first_one() {
      Some(ci) if ci < self.data_width => {
        let cur = data[ci];
        data.set(ci, !cur);
        Ok(Detection::Corrected)
      }
      Some(ci) => {
        let ei = ci - self.data_width;
        let cur = ecc[ei];
        ecc.set(ei, !cur);
        Ok(Detection::Corrected)
      }
      // odd mismatch pattern matching no column: beyond SEC-DED capability
      None => Ok(Detection::Uncorrectable),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn min_parity_width_values() {
    assert_eq!(min_parity_width(1), 3);
    assert_eq!(min_parity_width(4), 4);
    assert_eq!(min_parity_width(11), 5);
    assert_eq!(min_parity_width(26), 6);
    assert_eq!(min_parity_width(57), 7);
    assert_eq!(min_parity_width(64), 8);
    assert_eq!(min_parity_width(120), 8);
    assert_eq!(min_parity_width(128), 9);
  }

  #[test]
  fn too_few_parity_bits_rejected() {
    assert!(Hsiao::new(64, 7).is_err());
    assert!(Hsiao::new(64, 0).is_err());
    assert!(Hsiao::new(64, 8).is_ok());
  }

  #[test]
  fn round_trip_clean() {
    let hsiao = Hsiao::new(64, 8).unwrap();
    let mut data = bitvec![u8, Msb0; 0; 64];
    for i in (0..64).step_by(3) {
      data.set(i, true);
    }
    let mut ecc = hsiao.construct(&data).unwrap();
    let orig_data = data.clone();
    let orig_ecc = ecc.clone();
    let det = hsiao.check_and_correct(&mut data, &mut ecc).unwrap();
    assert_eq!(det, Detection::Ok);
    assert_eq!(data, orig_data);
    assert_eq!(ecc, orig_ecc);
  }

  #[test]
  fn single_bit_restores() {
    let hsiao = Hsiao::new(64, 8).unwrap();
    let mut orig_data = bitvec![u8, Msb0; 0; 64];
    for i in (0..64).step_by(5) {
      orig_data.set(i, true);
    }
    let orig_ecc = hsiao.construct(&orig_data).unwrap();
    for pos in 0..72 {
      let mut data = orig_data.clone();
      let mut ecc = orig_ecc.clone();
      if pos < 64 {
        let cur = data[pos];
        data.set(pos, !cur);
      } else {
        let cur = ecc[pos - 64];
        ecc.set(pos - 64, !cur);
      }
      let det = hsiao.check_and_correct(&mut data, &mut ecc).unwrap();
      assert_eq!(det, Detection::Corrected, "pos {}", pos);
      assert_eq!(data, orig_data, "pos {}", pos);
      assert_eq!(ecc, orig_ecc, "pos {}", pos);
    }
  }

  #[test]
  fn double_bit_uncorrectable() {
    let hsiao = Hsiao::new(64, 8).unwrap();
    let orig_data = bitvec![u8, Msb0; 1; 64];
    let orig_ecc = hsiao.construct(&orig_data).unwrap();
    for p in 0..72 {
      for q in p + 1..72 {
        let mut data = orig_data.clone();
        let mut ecc = orig_ecc.clone();
        for pos in [p, q] {
          if pos < 64 {
            let cur = data[pos];
            data.set(pos, !cur);
          } else {
            let cur = ecc[pos - 64];
            ecc.set(pos - 64, !cur);
          }
        }
        let det = hsiao.check_and_correct(&mut data, &mut ecc).unwrap();
        assert_eq!(det, Detection::Uncorrectable, "pos {} {}", p, q);
      }
    }
  }
}
