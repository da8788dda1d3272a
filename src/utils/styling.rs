//! Terminal styling utilities

use console::{style, Emoji};
use std::path::Path;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static MODEL: Emoji<'_, '_> = Emoji("🧠 ", "");
pub static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
pub static BOOK: Emoji<'_, '_> = Emoji("📖 ", "");
pub static PIN: Emoji<'_, '_> = Emoji("📍 ", "");

/// Print the application banner
pub fn print_banner(version: &str) {
    let banner = r#"
     █████╗ ███████╗██████╗ ███████╗███████╗
    ██╔══██╗██╔════╝██╔══██╗██╔════╝██╔════╝
    ███████║█████╗  ██║  ██║█████╗  ███████╗
    ██╔══██║██╔══╝  ██║  ██║██╔══╝  ╚════██║
    ██║  ██║███████╗██████╔╝███████╗███████║
    ╚═╝  ╚═╝╚══════╝╚═════╝ ╚══════╝╚══════╝
    "#;

    println!();
    println!("{}", style(banner).cyan().bold());
    println!(
        "    {} {}",
        style("🦟").magenta().bold(),
        style("Dengue outbreak risk by district").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Values shown on the configuration card
pub struct ConfigCard<'a> {
    pub input: &'a Path,
    pub output: &'a Path,
    pub model_version: &'a str,
    pub locale: &'a str,
    pub region: &'a str,
}

/// Print configuration card
pub fn print_config(card: &ConfigCard) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);

    println!("    ┌{}┐", line);
    println!(
        "    │ {}{}│",
        style("⚙️  Configuration").cyan().bold(),
        " ".repeat(box_width - 20)
    );
    println!("    ├{}┤", line);
    println!("    │  {} Input:   {:<38}│", FOLDER, truncate_path(card.input, 37));
    println!("    │  {} Output:  {:<38}│", SAVE, truncate_path(card.output, 37));
    println!("    ├{}┤", line);
    println!(
        "    │  {} Model:   {:<38}│",
        MODEL,
        truncate_string(card.model_version, 37)
    );
    println!(
        "    │  {} Locale:  {:<38}│",
        BOOK,
        truncate_string(card.locale, 37)
    );
    println!(
        "    │  {} Region:  {:<38}│",
        PIN,
        truncate_string(card.region, 37)
    );
    println!("    └{}┘", line);
    println!();
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("    {} {}", WARN, style(message).yellow());
}

/// Print the elapsed time of a step
pub fn print_step_time(elapsed: std::time::Duration) {
    println!("    {}", style(format!("⏱  {:.2?}", elapsed)).dim());
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!(
        "    {} {}",
        ROCKET,
        style("Aedes risk classification complete!").green().bold()
    );
    println!();
}

/// Print a styled count message
pub fn print_count(description: &str, count: usize, detail: Option<&str>) {
    if let Some(info) = detail {
        println!(
            "      Found {} {} {}",
            style(count).yellow().bold(),
            description,
            style(info).dim()
        );
    } else {
        println!("      Found {} {}", style(count).yellow().bold(), description);
    }
}

// Helper functions

fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    truncate_string(&path_str, max_len)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        s.to_string()
    } else {
        let tail: String = chars[chars.len() - (max_len - 3)..].iter().collect();
        format!("...{}", tail)
    }
}
