// build.rs
use anyhow::{Context, Result};
use btlr_gen::{ConflictPolicy, GenOptions};
use std::path::PathBuf;

fn main() -> Result<()> {
    let manifest_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR")?);
    let out_dir = PathBuf::from(std::env::var("OUT_DIR")?);

    let input_file = manifest_dir.join("src/c.g");
    println!("cargo:rerun-if-changed={}", input_file.display());

    let options = GenOptions {
        prefer_shift: vec!["else".into()],
        conflicts: ConflictPolicy::Report,
    };
    btlr_gen::generate(&input_file, &out_dir, "c_tables", &options)
        .with_context(|| format!("generating tables from {}", input_file.display()))?;
    Ok(())
}
