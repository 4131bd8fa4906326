use std::fmt;
use std::io::{self, Stdout, Write};
use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use crate::errors::BgRemoveError;
use crate::processor::RunSummary;
use crate::traits::Reporter;

const BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})";

/// Prints one human-readable line per event.
///
/// The progress bar draws on stderr and hides itself when that is not a
/// terminal; it is suspended while a line is written so the two never mix.
pub struct ConsoleReporter<W: Write = Stdout> {
    out: W,
    bar: ProgressBar,
}

impl ConsoleReporter<Stdout> {
    pub fn stdout() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template(BAR_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Self::new(io::stdout(), bar)
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub const fn new(out: W, bar: ProgressBar) -> Self {
        Self { out, bar }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, args: fmt::Arguments<'_>) {
        let out = &mut self.out;
        let written = self.bar.suspend(|| {
            writeln!(out, "{args}")?;
            out.flush()
        });
        if let Err(err) = written {
            warn!(error = %err, "failed to write progress line");
        }
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn run_started(&mut self, total: usize, target_dir: &Path) {
        self.bar.set_length(total as u64);
        self.line(format_args!(
            "Processing {total} images in {}...",
            target_dir.display()
        ));
    }

    fn file_started(&mut self, name: &str) {
        self.line(format_args!("Processing {name}..."));
    }

    fn file_finished(&mut self, name: &str) {
        self.line(format_args!("Finished {name}"));
        self.bar.inc(1);
    }

    fn file_failed(&mut self, name: &str, error: &BgRemoveError) {
        self.line(format_args!("Failed to process {name}: {error}"));
        self.bar.inc(1);
    }

    fn run_finished(&mut self, _summary: &RunSummary) {
        self.bar.finish_and_clear();
        self.line(format_args!("All done."));
    }
}
