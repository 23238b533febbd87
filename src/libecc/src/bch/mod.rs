use crate::error::*;
use crate::types::*;
use crate::{Detection, EccScheme};
use bitvec::prelude::*;

mod codec;
pub use codec::{BchControl, DecodeOutcome};

/// Adapter between the bit-vector codec interface and the byte-level BCH
/// primitive. Owns the packing convention: bit i of a vector goes to byte
/// i/8 at bit 7-(i%8), for data and ecc alike.
#[derive(Debug, Clone)]
pub struct Bch {
  ctrl: BchControl,
  data_width: usize,
  data_width_bytes: usize,
}

impl Bch {
  pub fn new(data_width: usize, t: usize) -> Result<Self> {
    ensure!(data_width >= 1, "Invalid data width");
    // smallest m with 2^m >= data_width + 1
    let m = (usize::BITS - data_width.leading_zeros()) as usize;
    let ctrl = BchControl::init(m, t)?;
    let data_width_bytes = (data_width + 7) / 8;
    ensure!(
      data_width_bytes * 8 + ctrl.ecc_bits <= ctrl.n,
      "data width {} does not fit BCH(m={}, t={})",
      data_width,
      m,
      t
    );
    Ok(Bch {
      ctrl,
      data_width,
      data_width_bytes,
    })
  }

  fn pack(bits: &BSRep, bytes: usize) -> Vec<u8> {
    let mut packed = vec![0u8; bytes];
    for (i, b) in bits.iter().enumerate() {
      if *b {
        packed[i / 8] |= 1 << (7 - (i % 8));
      }
    }
    packed
  }

  fn unpack(packed: &[u8], bits: &mut BVRep) {
    for i in 0..bits.len() {
      bits.set(i, (packed[i / 8] >> (7 - (i % 8))) & 1 == 1);
    }
  }
}

impl EccScheme for Bch {
  fn data_width(&self) -> usize {
    self.data_width
  }

  fn ecc_width(&self) -> usize {
    self.ctrl.ecc_bits
  }

  fn construct(&self, data: &BSRep) -> Result<BVRep> {
    ensure!(data.len() == self.data_width, "Invalid data width");
    let packed_data = Self::pack(data, self.data_width_bytes);
    let mut packed_ecc = vec![0u8; self.ctrl.ecc_bytes];
    self.ctrl.encode(&packed_data, &mut packed_ecc);
    let mut ecc = bitvec![u8, Msb0; 0; self.ctrl.ecc_bits];
    Self::unpack(&packed_ecc, &mut ecc);
    Ok(ecc)
  }

  fn check_and_correct(&self, data: &mut BVRep, ecc: &mut BVRep) -> Result<Detection> {
    ensure!(data.len() == self.data_width, "Invalid data width");
    ensure!(ecc.len() == self.ctrl.ecc_bits, "Invalid ecc width");
    let mut packed_data = Self::pack(data, self.data_width_bytes);
    let packed_ecc = Self::pack(ecc, self.ctrl.ecc_bytes);
    match self.ctrl.decode(&packed_data, &packed_ecc) {
      DecodeOutcome::Clean => Ok(Detection::Ok),
      DecodeOutcome::Uncorrectable => Ok(Detection::Uncorrectable),
      DecodeOutcome::Errors(locations) => {
        self.ctrl.correct(&mut packed_data, &locations);
        // errors in the ecc segment vanish by re-encoding the corrected data
        let mut packed_ecc = vec![0u8; self.ctrl.ecc_bytes];
        self.ctrl.encode(&packed_data, &mut packed_ecc);
        Self::unpack(&packed_data, data);
        Self::unpack(&packed_ecc, ecc);
        Ok(Detection::Corrected)
      }
    }
  }
}
