use ecc_faultsim::enumerate::{binomial, unrank_burst, unrank_subset};
use std::collections::HashSet;

#[test]
fn unrank_is_a_bijection_onto_ascending_subsets() {
  for n in 1..=20u64 {
    for r in 0..=n {
      let total = binomial(n, r);
      let mut seen = HashSet::new();
      for idx in 0..total {
        let subset = unrank_subset(n, r, idx);
        assert_eq!(subset.len(), r as usize);
        assert!(subset.windows(2).all(|w| w[0] < w[1]), "{:?}", subset);
        assert!(subset.iter().all(|&p| (p as u64) < n));
        assert!(seen.insert(subset), "duplicate at idx {}", idx);
      }
      assert_eq!(seen.len() as u64, total, "n {} r {}", n, r);
    }
  }
}

#[test]
fn bursts_enumerate_left_to_right() {
  let n = 72u64;
  let r = 4u64;
  for idx in 0..n - r + 1 {
    let burst = unrank_burst(n, r, idx);
    assert_eq!(burst.len(), r as usize);
    assert_eq!(burst[0] as u64, idx);
    assert!(burst.windows(2).all(|w| w[1] == w[0] + 1));
  }
}
