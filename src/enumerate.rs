//! Combinatorial unranking of bit-fault patterns. Each worker maps its
//! slice of [0, C(n,r)) to fault sets by integer arithmetic alone, so
//! exhaustive runs need no shared enumeration state.

pub fn binomial(n: u64, r: u64) -> u64 {
  if r == 0 {
    1
  } else {
    n * binomial(n - 1, r - 1) / r
  }
}

/// The idx-th r-subset of {0..n-1}, strictly ascending. Walks the word from
/// the leftmost bit: a subset either starts at the current bit (one of
/// C(n_rem-1, r_rem-1) patterns) or skips it.
pub fn unrank_subset(n: u64, r: u64, idx: u64) -> Vec<u32> {
  assert!(r <= n);
  assert!(idx < binomial(n, r), "subset index {} out of range", idx);
  if r == 0 {
    return Vec::new();
  }
  let mut positions = Vec::with_capacity(r as usize);
  let mut n_rem = n;
  let mut r_rem = r;
  let mut e = idx;
  while r_rem > 1 {
    let block = binomial(n_rem - 1, r_rem - 1);
    if e < block {
      positions.push((n - n_rem) as u32);
      r_rem -= 1;
    } else {
      e -= block;
    }
    n_rem -= 1;
  }
  positions.push((n - n_rem + e) as u32);
  positions
}

/// The idx-th length-r burst of {0..n-1}: positions idx..idx+r.
pub fn unrank_burst(n: u64, r: u64, idx: u64) -> Vec<u32> {
  assert!(r <= n);
  assert!(idx < n - r + 1, "burst index {} out of range", idx);
  (idx as u32..(idx + r) as u32).collect()
}
