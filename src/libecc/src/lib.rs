mod bch;
mod error;
mod hamming;
mod hsiao;
pub mod types;
mod util;

use error::*;
use types::*;

pub use bch::Bch;
pub use hamming::Hamming;
pub use hsiao::{min_parity_width, Hsiao};
pub use util::bitdump;

/// Outcome of a detect-and-correct pass over one codeword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
  Ok,
  Corrected,
  Uncorrectable,
}

/// Common interface of all codecs. Buffers are bit vectors of fixed width
/// known at setup; `check_and_correct` repairs in place unless the word is
/// uncorrectable, in which case buffer contents are unspecified.
pub trait EccScheme {
  fn data_width(&self) -> usize;
  fn ecc_width(&self) -> usize;
  fn construct(&self, data: &BSRep) -> Result<BVRep>;
  fn check_and_correct(&self, data: &mut BVRep, ecc: &mut BVRep) -> Result<Detection>;
}

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
#[derive(Debug, Clone)]
pub enum Ecc {
  Hamming,
  Hsiao(usize, usize),
  Bch(usize, usize),
}

impl Ecc {
  pub fn setup(&self) -> Result<EccCodec> {
    match self {
      Ecc::Hamming => Ok(EccCodec::Hamming(Hamming::new())),
      Ecc::Hsiao(data_width, parity_bits) => {
        Ok(EccCodec::Hsiao(Hsiao::new(*data_width, *parity_bits)?))
      }
      Ecc::Bch(data_width, t) => Ok(EccCodec::Bch(Bch::new(*data_width, *t)?)),
    }
  }
}

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
#[derive(Debug, Clone)]
pub enum EccCodec {
  Hamming(Hamming),
  Hsiao(Hsiao),
  Bch(Bch),
}

impl EccScheme for EccCodec {
  fn data_width(&self) -> usize {
    match self {
      EccCodec::Hamming(x) => x.data_width(),
      EccCodec::Hsiao(x) => x.data_width(),
      EccCodec::Bch(x) => x.data_width(),
    }
  }

  fn ecc_width(&self) -> usize {
    match self {
      EccCodec::Hamming(x) => x.ecc_width(),
      EccCodec::Hsiao(x) => x.ecc_width(),
      EccCodec::Bch(x) => x.ecc_width(),
    }
  }

  fn construct(&self, data: &BSRep) -> Result<BVRep> {
    match self {
      EccCodec::Hamming(x) => x.construct(data),
      EccCodec::Hsiao(x) => x.construct(data),
      EccCodec::Bch(x) => x.construct(data),
    }
  }

  fn check_and_correct(&self, data: &mut BVRep, ecc: &mut BVRep) -> Result<Detection> {
    match self {
      EccCodec::Hamming(x) => x.check_and_correct(data, ecc),
      EccCodec::Hsiao(x) => x.check_and_correct(data, ecc),
      EccCodec::Bch(x) => x.check_and_correct(data, ecc),
    }
  }
}
