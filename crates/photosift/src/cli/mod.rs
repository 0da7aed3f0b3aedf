mod logging;
mod mode;

use clap::{ArgGroup, Parser};
use console::style;
use photosift_lib::{Config, PhotosiftError, Result};
use std::path::{Path, PathBuf};

use mode::Mode;

const ABOUT: &str = "Reconcile photo and video libraries against a source of truth";

const LONG_ABOUT: &str = "\
Reconcile photo and video libraries against a source of truth.

--dedupe removes files from TARGET that already exist in SOURCE. Files match on
name + size + modification time; --ignore-size and --ignore-mtime loosen that.
With --ignore-size a LARGER target file OVERWRITES its source counterpart. With
--ignore-mtime an OLDER target file is MOVED onto its source counterpart.
Otherwise the target copy is deleted. This is not a regular dedupe tool: it
aggressively prunes files when asked to and can lose data if misused.

--sort moves photos from TARGET into the SOURCE folder that already holds
photos taken on the same day (read from EXIF), under a 'moved' subfolder.

Both modes may be given; dedupe runs first.";

#[derive(Parser, Debug)]
#[command(name = "photosift")]
#[command(about = ABOUT, long_about = LONG_ABOUT)]
#[command(version)]
#[command(group(ArgGroup::new("mode").required(true).multiple(true).args(["dedupe", "sort"])))]
pub struct Cli {
    #[arg(long, help = "Dedupe mode: remove the dupes in the target directory")]
    pub dedupe: bool,

    #[arg(long, help = "Sort mode: sort files from target into the source directory")]
    pub sort: bool,

    #[arg(long, short = 's', help = "Source of truth directory")]
    pub source: PathBuf,

    #[arg(long, short = 't', help = "Duplicate and/or unsorted directory to analyze")]
    pub target: PathBuf,

    #[arg(long, short = 'n', default_value_t = 0, help = "Stop after this many matches (0 = unlimited)")]
    pub num: usize,

    #[arg(long, short = 'l', help = "Location of the run log")]
    pub logfile: Option<PathBuf>,

    #[arg(long, short = 'v', help = "Log size and mtime comparisons")]
    pub verbose: bool,

    #[arg(long, help = "[dedupe] Ignore modification time when matching")]
    pub ignore_mtime: bool,

    #[arg(long, help = "[dedupe] Ignore file size when matching")]
    pub ignore_size: bool,

    #[arg(long, conflicts_with = "execute", help = "Preview without asking")]
    pub dry_run: bool,

    #[arg(long, help = "Apply changes without asking")]
    pub execute: bool,

    #[arg(long, help = "Path to a photosift.toml config file")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn modes(&self) -> Vec<Mode> {
        let mut modes = Vec::new();
        if self.dedupe {
            modes.push(Mode::Dedupe);
        }
        if self.sort {
            modes.push(Mode::Sort);
        }
        modes
    }

    /// `Some` when the dry-run choice was made on the command line.
    pub fn preset_dry_run(&self) -> Option<bool> {
        if self.dry_run {
            Some(true)
        } else if self.execute {
            Some(false)
        } else {
            None
        }
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let mut config = Config::new(cli.config.clone())?;
    if let Some(path) = &cli.logfile {
        config.log_file = path.clone();
    }
    logging::init_logging(&config.log_file, cli.verbose)?;

    let source = canonical_root(&cli.source)?;
    let target = canonical_root(&cli.target)?;

    mode::print_settings(&cli, &config, &source, &target);

    for mode in cli.modes() {
        if let Err(e) = mode::run_mode(mode, &cli, &config, &source, &target) {
            eprintln!("{} {}", style("✗").red(), e);
            return Err(e);
        }
    }

    Ok(())
}

fn canonical_root(path: &Path) -> Result<PathBuf> {
    std::fs::canonicalize(path).map_err(|_| PhotosiftError::FileNotFound(path.to_path_buf()))
}
