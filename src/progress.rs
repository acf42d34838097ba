// ABOUTME: Progress reporting for the four-step generation pipeline
// ABOUTME: Defines the reporter trait plus silent and logging implementations

use log::{info, warn};
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// The four user-visible steps of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStep {
    ExtractContent,
    CreatePrompts,
    GenerateImages,
    CreateSlides,
}

impl PipelineStep {
    pub fn label(&self) -> &'static str {
        match self {
            PipelineStep::ExtractContent => "Extracting content from PDF",
            PipelineStep::CreatePrompts => "Creating image prompts",
            PipelineStep::GenerateImages => "Generating images",
            PipelineStep::CreateSlides => "Creating HTML slides",
        }
    }
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a step ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Complete,
    /// Finished, but some sections were dropped
    Partial,
    Failed,
}

/// Receives pipeline events. All methods default to no-ops.
pub trait ProgressReporter: Send + Sync {
    fn on_step_start(&self, step: PipelineStep) {
        let _ = step;
    }

    fn on_step_finish(&self, step: PipelineStep, status: StepStatus) {
        let _ = (step, status);
    }

    /// Overall completion, 0..=100
    fn on_progress(&self, percent: u8) {
        let _ = percent;
    }
}

pub struct NoProgress;

impl ProgressReporter for NoProgress {}

/// Prints step status lines to stdout and logs percentages
#[derive(Default)]
pub struct LogProgress {
    last_percent: AtomicU8,
}

impl LogProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_percent(&self) -> u8 {
        self.last_percent.load(Ordering::SeqCst)
    }
}

impl ProgressReporter for LogProgress {
    fn on_step_start(&self, step: PipelineStep) {
        println!("{}...", step);
    }

    fn on_step_finish(&self, step: PipelineStep, status: StepStatus) {
        match status {
            StepStatus::Complete => println!("✅ {}: done", step),
            StepStatus::Partial => {
                warn!("{} finished with dropped sections", step);
                println!("⚠️  {}: some sections failed", step);
            }
            StepStatus::Failed => println!("❌ {}: failed", step),
        }
    }

    fn on_progress(&self, percent: u8) {
        self.last_percent.store(percent, Ordering::SeqCst);
        info!("Progress: {}%", percent);
    }
}

/// Percentage after `done` of `total` items within the band `start..=end`
pub fn band_progress(start: u8, end: u8, done: usize, total: usize) -> u8 {
    if total == 0 {
        return end;
    }
    let span = (end - start) as usize;
    let value = start as usize + span * done.min(total) / total;
    value.min(end as usize) as u8
}
