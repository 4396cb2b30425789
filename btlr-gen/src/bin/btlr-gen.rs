//! Command-line interface for the table generator.
//!
//! Reads a `.g` grammar and writes `<name>.json` and `<name>.report` into the
//! output directory.

#[cfg(feature = "cli")]
mod real {
    use btlr_gen::{ConflictPolicy, GenOptions};
    use clap::Parser;
    use std::path::PathBuf;

    #[derive(Parser)]
    #[command(version, about = "Generate LALR(1) tables from a grammar")]
    struct Args {
        /// Path to the input grammar file
        #[arg(short = 'g', long)]
        grammar: PathBuf,

        /// Path to the output directory.
        #[arg(short = 'o', long)]
        output_dir: PathBuf,

        /// Prefix used to construct output file names
        #[arg(short = 'n', long)]
        name: String,

        /// Terminal whose shift/reduce conflicts resolve to shift (repeatable)
        #[arg(short = 's', long = "prefer-shift")]
        prefer_shift: Vec<String>,

        /// Fail on conflicts instead of keeping them
        #[arg(long)]
        strict: bool,

        /// Enable debug logging (off by default).
        #[arg(short = 'd', long)]
        debug: bool,
    }

    pub fn main() -> anyhow::Result<()> {
        let args = Args::parse();
        let level = if args.debug {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        };
        env_logger::builder().filter_level(level).parse_default_env().init();
        let options = GenOptions {
            prefer_shift: args.prefer_shift,
            conflicts: if args.strict {
                ConflictPolicy::Reject
            } else {
                ConflictPolicy::Report
            },
        };
        btlr_gen::generate(&args.grammar, &args.output_dir, &args.name, &options)
    }
}

#[cfg(feature = "cli")]
fn main() -> anyhow::Result<()> {
    real::main()
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("btlr-gen disabled (compiled without `cli` feature)");
}
