mod cli;

use clap::Parser;
use photosift_lib::Result;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::run(cli)
}
