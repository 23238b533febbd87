use crate::RunReport;

/// Thousands-spaced decimal rendering, e.g. 11 969 016 345.
pub fn spaced_u64(n: u64) -> String {
  let digits = n.to_string();
  let len = digits.len();
  let mut out = String::with_capacity(len + len / 3);
  for (i, c) in digits.chars().enumerate() {
    if i > 0 && (len - i) % 3 == 0 {
      out.push(' ');
    }
    out.push(c);
  }
  out
}

/// Final stdout block: widths, counters, per-bit flip vectors.
pub fn print_report(report: &RunReport) {
  println!(
    "datawidth: {} ; eccwidth: {}",
    report.data_width, report.ecc_width
  );
  if report.full_run {
    println!("full run: {} tests", spaced_u64(report.test_count));
  }
  println!();
  println!("stats:");
  println!(
    "detection ok{}: {}",
    if report.fail_count == 0 { "" } else { " (sdcs)" },
    report.stats.ok
  );
  println!(
    "detection corrected (false corrections therein): {} ({})",
    report.stats.corrected, report.stats.false_corrections
  );
  println!("detection uncorrectable: {}", report.stats.uncorrectable);

  println!();
  println!("post fault flip occurrences:");
  let occurrences: Vec<String> = report
    .flip_occurrence_counts
    .iter()
    .map(|c| c.to_string())
    .collect();
  println!(" {}", occurrences.join(" "));

  println!();
  println!("flip occurrence avg flip distance:");
  let distances: Vec<String> = report
    .flip_avg_distances
    .iter()
    .map(|d| d.to_string())
    .collect();
  println!(" {}", distances.join(" "));
}
