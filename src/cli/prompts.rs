//! Interactive prompts using dialoguer

use anyhow::Result;
use dialoguer::Confirm;

/// Prompt user to confirm proceeding with an action
pub fn confirm_step(message: &str) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(message)
        .default(true)
        .interact()?;
    Ok(confirmed)
}

/// Prompt user to confirm exporting a batch in which some rows failed
pub fn confirm_partial_export(failed: usize, total: usize) -> Result<bool> {
    let message = format!(
        "{} of {} row(s) failed. Export the {} classified row(s) anyway?",
        failed,
        total,
        total - failed
    );
    confirm_step(&message)
}
