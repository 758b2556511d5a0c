//! Mine GEOS documentation examples into a JSON ground-truth file.

use std::path::PathBuf;

use clap::Parser;
use geos_agent::miner::dump_examples_to_json;

/// Mine GEOS documentation examples into JSON ground truth
#[derive(Parser, Debug)]
#[command(name = "mine-examples")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the GEOS repo root (containing src/docs/sphinx)
    repo_root: PathBuf,

    /// Output JSON path
    #[arg(long, default_value = "geos_example_ground_truth.json")]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    dump_examples_to_json(&args.repo_root, &args.out)?;
    println!("Wrote mined examples to {}", args.out.display());
    Ok(())
}
