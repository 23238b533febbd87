use bitvec::prelude::*;

pub fn bitdump<T, O>(bits: &BitSlice<T, O>) -> String
where
  T: BitStore,
  O: BitOrder,
{
  bits.iter().fold("".to_owned(), |s, b| {
    format!("{}{}", s, if *b { 1 } else { 0 })
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn bitdump_test() {
    assert_eq!("0101", bitdump(bitvec![u8, Msb0; 0,1,0,1].as_bitslice()));
    assert_eq!("", bitdump(BitVec::<u8, Msb0>::new().as_bitslice()));
  }
}
