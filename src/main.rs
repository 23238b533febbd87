use anyhow::{anyhow, bail, ensure, Context, Result};
use clap::Parser;
use ecc_faultsim::{report, FailMode, RunConfig, TestCount};
use libecc::Ecc;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct CliArgs {
  /// Worker thread count; 0 or more than the hardware parallelism clamps to the hardware
  threads: usize,
  /// N (none), R (random bit set), RB (random burst)
  fail_mode: String,
  /// Bits to flip per test, 0..=8
  fail_count: u32,
  /// Number of tests, or the literal F for an exhaustive run
  test_count: String,
  /// hamming, hsiao or bch
  ecc_method: String,
  /// d/k pair: data width / parity width (hsiao) or correction capability (bch); ignored by hamming
  ecc_conf: String,
  /// RNG seed; time-seeded when absent
  seed: Option<u64>,
  /// Any value raises the log filter to debug
  debug: Option<String>,
}

fn main() -> Result<()> {
  let args = CliArgs::parse();
  if args.debug.is_some() {
    env_logger::Builder::from_default_env()
      .filter_level(log::LevelFilter::Debug)
      .init();
  } else {
    env_logger::init();
  }

  let fail_mode = match args.fail_mode.as_str() {
    "N" => FailMode::None,
    "R" => FailMode::Random,
    "RB" => FailMode::RandomBurst,
    other => bail!("unknown fail mode {}", other),
  };
  ensure!(args.fail_count <= 8, "fail count {} out of range", args.fail_count);

  let test_count = if args.test_count == "F" {
    TestCount::Full
  } else {
    TestCount::Count(
      args
        .test_count
        .parse()
        .with_context(|| format!("failed to read test count {}", args.test_count))?,
    )
  };

  let (d, k) = parse_ecc_conf(&args.ecc_conf)?;
  let scheme = match args.ecc_method.as_str() {
    "hamming" => Ecc::Hamming,
    "hsiao" => Ecc::Hsiao(d, k),
    "bch" => Ecc::Bch(d, k),
    other => bail!("unknown ecc method {}", other),
  };

  let cfg = RunConfig {
    threads: args.threads,
    fail_mode,
    fail_count: args.fail_count,
    test_count,
    scheme,
    seed: args.seed,
  };
  let run_report = ecc_faultsim::run(&cfg)?;
  report::print_report(&run_report);

  println!();
  println!("done");
  Ok(())
}

fn parse_ecc_conf(conf: &str) -> Result<(usize, usize)> {
  let (d, k) = conf
    .split_once('/')
    .ok_or_else(|| anyhow!("failed to read ecc conf {}", conf))?;
  let d = d
    .parse()
    .with_context(|| format!("failed to read data width {}", d))?;
  let k = k
    .parse()
    .with_context(|| format!("failed to read ecc parameter {}", k))?;
  Ok((d, k))
}
