use std::fmt::Display;
use std::time::Duration;

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::Result;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StepKey {
    LoadTemplates,
    LoadConfig,
    Compose,
    WriteNetlist,
}

#[derive(PartialEq, Eq)]
pub enum StepStatus {
    Done,
    Pending,
    InProgress,
    Skipped,
    Failed,
}

pub struct StepContext {
    step_num: usize,
    steps: Vec<Step>,
    quiet: bool,
}

pub struct Step {
    desc: &'static str,
    key: StepKey,
    progress_bar: ProgressBar,
}

impl StepContext {
    pub fn new(quiet: bool) -> Self {
        if !quiet {
            println!("Steps:");
        }

        let mut steps = [
            ("Load templates", StepKey::LoadTemplates),
            ("Load configuration", StepKey::LoadConfig),
            ("Compose netlist", StepKey::Compose),
            ("Write netlist", StepKey::WriteNetlist),
        ]
        .into_iter()
        .map(|(desc, key)| Step {
            desc,
            key,
            progress_bar: ProgressBar::new_spinner(),
        })
        .collect::<Vec<_>>();

        let mp = MultiProgress::new();
        if quiet {
            mp.set_draw_target(ProgressDrawTarget::hidden());
        }
        let num_steps = steps.len();
        let width = format!("{num_steps}").len();
        for (i, step) in steps.iter_mut().enumerate() {
            mp.insert(i + 1, step.progress_bar.clone());
            let msg = format!("[{:width$}/{:width$}] {}", i + 1, num_steps, step.desc);
            step.set_status(StepStatus::Pending, Some(msg));
        }
        if let Some(first) = steps.first_mut() {
            first.set_status(StepStatus::InProgress, None);
        }
        StepContext {
            step_num: 0,
            steps,
            quiet,
        }
    }

    #[inline]
    pub fn current_step(&mut self) -> Option<&mut Step> {
        self.steps.get_mut(self.step_num)
    }

    /// Marks the current step and every later one as failed or skipped if `res` is an error.
    pub fn check<T>(&mut self, res: Result<T>) -> Result<T> {
        if res.is_err() {
            if let Some(current_step) = self.current_step() {
                current_step.set_status(StepStatus::Failed, None);
                self.step_num += 1;
                while let Some(current_step) = self.current_step() {
                    current_step.set_status(StepStatus::Skipped, None);
                    self.step_num += 1;
                }
            }
            if !self.quiet {
                println!("\n");
            }
        }

        res
    }

    pub fn finish(&mut self, key: StepKey) -> Result<()> {
        let Some(current_step) = self.current_step() else {
            anyhow::bail!("step {key:?} was completed after all steps were marked completed");
        };
        if current_step.key != key {
            anyhow::bail!(
                "step {key:?} was completed out of order (expected {:?})",
                current_step.key
            );
        }
        current_step.set_status(StepStatus::Done, None);
        self.step_num += 1;

        if let Some(current_step) = self.current_step() {
            current_step.set_status(StepStatus::InProgress, None);
        } else if !self.quiet {
            println!("\n\nCompleted all steps");
        }
        Ok(())
    }
}

fn format_template(spinner: bool, status: impl Display) -> String {
    if spinner {
        format!("{{spinner:.green}} {:16} {{msg}}", status)
    } else {
        format!("  {:16} {{msg}}", status)
    }
}

impl Step {
    fn set_status(&mut self, status: StepStatus, msg: Option<String>) {
        let status_template = match status {
            StepStatus::Done => format_template(false, "Done".green().bold()),
            StepStatus::Failed => format_template(false, "Failed".bright_white().on_red().bold()),
            StepStatus::InProgress => format_template(true, "In Progress".bright_white().bold()),
            StepStatus::Pending => format_template(true, "Pending".blue().bold()),
            StepStatus::Skipped => format_template(false, "Skipped".yellow().bold()),
        };
        if let Ok(style) = ProgressStyle::with_template(&status_template) {
            self.progress_bar.set_style(style);
        }

        if let Some(msg) = msg {
            self.progress_bar.set_message(msg);
        }

        if status == StepStatus::InProgress {
            self.progress_bar
                .enable_steady_tick(Duration::from_millis(200));
        } else if status != StepStatus::Pending {
            self.progress_bar.finish();
        }
    }
}
