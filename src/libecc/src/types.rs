use bitvec::prelude::*;

pub type BVRep = BitVec<u8, Msb0>;
pub type BSRep = BitSlice<u8, Msb0>;
