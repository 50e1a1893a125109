//! CLI entry point for diffusion-volume exclusion

use clap::Parser;
use dtitrim::io::cli::{Cli, DatasetProcessor};

fn main() -> dtitrim::Result<()> {
    let cli = Cli::parse();
    let mut processor = DatasetProcessor::new(cli);
    processor.process()
}
