use libecc::{min_parity_width, Hsiao};

#[test]
fn columns_are_odd_weight_nonzero_and_distinct() {
  for (d, k) in [
    (64usize, 8usize),
    (64, 9),
    (32, 7),
    (16, 6),
    (128, 9),
    (8, 5),
    (120, 8),
    (11, 5),
    (1, 3),
  ] {
    assert!(k >= min_parity_width(d), "bad test config {} {}", d, k);
    let hsiao = Hsiao::new(d, k).unwrap();
    let cols = hsiao.columns();
    assert_eq!(cols.len(), d + k);
    for (ci, col) in cols.iter().enumerate() {
      let weight = col.count_ones();
      assert!(weight >= 1, "({},{}) col {} is zero", d, k, ci);
      assert_eq!(weight % 2, 1, "({},{}) col {} has even weight", d, k, ci);
    }
    for a in 0..cols.len() {
      for b in a + 1..cols.len() {
        assert_ne!(cols[a], cols[b], "({},{}) cols {} {} coincide", d, k, a, b);
      }
    }
  }
}

#[test]
fn ecc_segment_columns_form_the_identity() {
  let hsiao = Hsiao::new(64, 8).unwrap();
  let cols = hsiao.columns();
  for ci in 0..8 {
    let col = &cols[64 + ci];
    assert_eq!(col.count_ones(), 1);
    assert!(col[ci]);
  }
}

#[test]
fn row_weights_stay_balanced() {
  // the Δ rotations spread column weight across rows; for (72,64) the row
  // weights come out within a few of each other rather than doubling up on
  // the low rows as a naive column ordering would
  let hsiao = Hsiao::new(64, 8).unwrap();
  let weights: Vec<usize> = hsiao.rows().iter().map(|r| r.count_ones()).collect();
  let min = *weights.iter().min().unwrap();
  let max = *weights.iter().max().unwrap();
  assert!(max - min <= 4, "row weights {:?}", weights);
}
