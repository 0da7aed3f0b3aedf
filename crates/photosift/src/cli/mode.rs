use super::Cli;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use console::style;
use dialoguer::Confirm;
use photosift_lib::util::{create_spinner, format_duration, plural};
use photosift_lib::{
    Config, FsMetadata, LogSink, PhotosiftError, Reconciler, Result, RunOptions, RunSummary,
    TreeWalker, WalkOptions,
};
use std::path::Path;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Dedupe,
    Sort,
}

impl Mode {
    fn name(self) -> &'static str {
        match self {
            Mode::Dedupe => "Dedupe",
            Mode::Sort => "Sort",
        }
    }

    fn options(self, cli: &Cli) -> RunOptions {
        let options = match self {
            Mode::Dedupe => RunOptions::dedupe(cli.ignore_size, cli.ignore_mtime),
            Mode::Sort => RunOptions::sort(),
        };
        options.with_limit(cli.num)
    }

    fn progress_message(self, dry_run: bool) -> &'static str {
        match (self, dry_run) {
            (Mode::Dedupe, true) => "Finding duplicates in target directory (dry run)...",
            (Mode::Dedupe, false) => "Finding and removing duplicates in target directory...",
            (Mode::Sort, true) => "Finding movable files in target directory (dry run)...",
            (Mode::Sort, false) => "Moving files from target directory into source directory...",
        }
    }

    fn found_noun(self) -> &'static str {
        match self {
            Mode::Dedupe => "duplicate",
            Mode::Sort => "movable file",
        }
    }

    fn applied_verb(self) -> &'static str {
        match self {
            Mode::Dedupe => "Removed",
            Mode::Sort => "Moved",
        }
    }
}

pub fn print_settings(cli: &Cli, config: &Config, source: &Path, target: &Path) {
    let modes: Vec<&str> = cli.modes().into_iter().map(Mode::name).collect();
    let limit = if cli.num == 0 {
        "unlimited".to_string()
    } else {
        cli.num.to_string()
    };

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    for (key, value) in [
        ("Mode", modes.join(", ")),
        ("Ignore mtime", cli.ignore_mtime.to_string()),
        ("Ignore size", cli.ignore_size.to_string()),
        ("Source directory", source.display().to_string()),
        ("Target directory", target.display().to_string()),
        ("Logfile", config.log_file.display().to_string()),
        ("File limit", limit),
        ("Verbose", cli.verbose.to_string()),
    ] {
        table.add_row(vec![Cell::new(key), Cell::new(value)]);
    }
    println!("{}", table);
}

pub fn run_mode(mode: Mode, cli: &Cli, config: &Config, source: &Path, target: &Path) -> Result<()> {
    let dry_run = match cli.preset_dry_run() {
        Some(dry_run) => dry_run,
        None => Confirm::new()
            .with_prompt(format!("{}: dry run?", mode.name()))
            .default(true)
            .interact()?,
    };
    let options = mode.options(cli).with_dry_run(dry_run);

    log::info!(
        "{} mode started (dry run: {}, source: {}, target: {})",
        mode.name(),
        dry_run,
        source.display(),
        target.display()
    );

    let walker = TreeWalker::new(WalkOptions::from(config));
    let spinner = create_spinner(mode.progress_message(dry_run));
    let started = Instant::now();
    let summary = Reconciler::new(&walker, &FsMetadata, &LogSink)
        .with_progress(spinner.clone())
        .run(source, target, &options);
    spinner.finish_and_clear();

    let summary = summary?;
    print_summary(mode, &summary, dry_run, target);
    println!("  Took {}", format_duration(started.elapsed()));

    match summary.fatal {
        Some(e) => Err(PhotosiftError::Execution(e)),
        None => Ok(()),
    }
}

fn print_summary(mode: Mode, summary: &RunSummary, dry_run: bool, target: &Path) {
    let counters = &summary.counters;
    let status = if summary.is_success() {
        style("✓").green()
    } else {
        style("✗").red()
    };
    println!(
        "{} {} {} complete ({} source files indexed)",
        status,
        mode.name(),
        if dry_run { "preview" } else { "run" },
        summary.indexed_files
    );

    let found = format!(
        "Found {} out of {} in {}",
        plural(counters.matches, mode.found_noun()),
        plural(counters.candidates_seen, "file"),
        target.display()
    );
    println!("  {}", found);
    log::info!("{}", found);

    if !dry_run {
        let applied = format!(
            "{} {} out of {} in {}",
            mode.applied_verb(),
            plural(counters.actions_applied, "file"),
            plural(counters.candidates_seen, "file"),
            target.display()
        );
        println!("  {}", applied);
        log::info!("{}", applied);
    }

    if counters.skipped > 0 {
        println!("  Skipped {} already in place", plural(counters.skipped, "file"));
    }
    if counters.failed > 0 {
        println!(
            "  {} {} left in place, see log",
            style("!").yellow(),
            plural(counters.failed, "file")
        );
    }
}
