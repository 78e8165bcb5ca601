//! Output formatting and progress reporting

use console::{style, Term};
use covgen::{PipelineObserver, RunReport, Stage};
use indicatif::{ProgressBar, ProgressStyle};
use std::cell::RefCell;
use std::path::Path;

/// Progress reporter for a coverage run
#[derive(Debug)]
pub struct ProgressReporter {
    term: Term,
    pub(crate) progress_bar: RefCell<Option<ProgressBar>>,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl ProgressReporter {
    /// Create a new progress reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            progress_bar: RefCell::new(None),
            use_color,
            quiet,
        }
    }

    /// Start a progress bar over the test binaries
    pub fn start_progress(&self, total: u64, message: &str) {
        if self.quiet {
            return;
        }

        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb.set_message(message.to_string());
        *self.progress_bar.borrow_mut() = Some(pb);
    }

    /// Increment progress
    pub fn increment(&self, delta: u64) {
        if let Some(ref pb) = *self.progress_bar.borrow() {
            pb.inc(delta);
        }
    }

    /// Update progress message
    pub fn set_message(&self, message: &str) {
        if let Some(ref pb) = *self.progress_bar.borrow() {
            pb.set_message(message.to_string());
        }
    }

    /// Finish and drop the progress bar
    pub fn finish(&self) {
        if let Some(pb) = self.progress_bar.borrow_mut().take() {
            pb.finish_with_message("Done");
        }
    }

    fn line(&self, glyph: console::StyledObject<&str>, plain: &str, message: &str) {
        let prefix = if self.use_color {
            glyph.bold().to_string()
        } else {
            plain.to_string()
        };
        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if !self.quiet {
            self.line(style("✓").green(), "OK", message);
        }
    }

    /// Print a failure message
    pub fn failure(&self, message: &str) {
        // Always print failures, even in quiet mode
        self.line(style("✗").red(), "FAIL", message);
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if !self.quiet {
            self.line(style("ℹ").blue(), "INFO", message);
        }
    }

    /// Print a section header
    pub fn header(&self, title: &str) {
        if self.quiet {
            return;
        }

        let styled = if self.use_color {
            style(title).bold().underlined().to_string()
        } else {
            format!("=== {title} ===")
        };

        let _ = self.term.write_line("");
        let _ = self.term.write_line(&styled);
    }

    /// Print the closing lines of a finished run
    pub fn summary(&self, report: &RunReport) {
        if self.quiet {
            return;
        }

        let _ = self.term.write_line("");
        let secs = report.elapsed.as_secs_f64();
        let headline = format!(
            "{} test application(s) covered in {secs:.2}s",
            report.binaries.len()
        );
        if self.use_color {
            let _ = self
                .term
                .write_line(&format!("{} {headline}", style("DONE").green().bold()));
        } else {
            let _ = self.term.write_line(&format!("DONE {headline}"));
        }
        let _ = self
            .term
            .write_line(&format!("  report:  {}", report.index.display()));
        let _ = self
            .term
            .write_line(&format!("  summary: {}", report.summary.display()));
    }
}

fn display_name(binary: &Path) -> String {
    binary
        .file_name()
        .map_or_else(|| binary.display().to_string(), |n| n.to_string_lossy().into_owned())
}

impl PipelineObserver for ProgressReporter {
    fn stage(&self, stage: Stage) {
        self.header(&stage.to_string());
    }

    fn test_started(&self, index: usize, total: usize, binary: &Path) {
        if index == 1 {
            self.start_progress(total as u64, "");
        } else {
            self.increment(1);
        }
        self.set_message(&display_name(binary));
    }

    fn tests_finished(&self) {
        self.increment(1);
        self.finish();
    }
}
