//! Run summary report

use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::{RiskReport, RiskTier};

use super::table::tier_color;

/// Counts and step timings of one classification run
#[derive(Debug, Default)]
pub struct RunSummary {
    pub total_rows: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub low: usize,
    pub moderate: usize,
    pub high: usize,
    pub unresolved_districts: Vec<String>,
    pub load_time: Duration,
    pub validate_time: Duration,
    pub classify_time: Duration,
    pub export_time: Duration,
}

impl RunSummary {
    pub fn from_report(report: &RiskReport) -> Self {
        let counts = report.tier_counts();
        let count = |tier: RiskTier| counts.get(&tier).copied().unwrap_or(0);

        Self {
            total_rows: report.total_rows,
            succeeded: report.succeeded(),
            failed: report.failed(),
            low: count(RiskTier::Low),
            moderate: count(RiskTier::Moderate),
            high: count(RiskTier::High),
            unresolved_districts: report
                .unresolved()
                .iter()
                .map(|r| r.district.clone())
                .collect(),
            ..Default::default()
        }
    }

    pub fn set_load_time(&mut self, elapsed: Duration) {
        self.load_time = elapsed;
    }

    pub fn set_validate_time(&mut self, elapsed: Duration) {
        self.validate_time = elapsed;
    }

    pub fn set_classify_time(&mut self, elapsed: Duration) {
        self.classify_time = elapsed;
    }

    pub fn set_export_time(&mut self, elapsed: Duration) {
        self.export_time = elapsed;
    }

    pub fn total_time(&self) -> Duration {
        self.load_time + self.validate_time + self.classify_time + self.export_time
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("RUN SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![Cell::new("📁 Input Rows"), Cell::new(self.total_rows)]);
        table.add_row(vec![
            Cell::new("✅ Classified"),
            Cell::new(self.succeeded)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);
        table.add_row(vec![
            Cell::new("❌ Failed Rows"),
            Cell::new(self.failed).fg(if self.failed == 0 {
                Color::White
            } else {
                Color::Red
            }),
        ]);

        for (tier, count) in [
            (RiskTier::High, self.high),
            (RiskTier::Moderate, self.moderate),
            (RiskTier::Low, self.low),
        ] {
            table.add_row(vec![
                Cell::new(format!("   {} Risk", tier)),
                Cell::new(count).fg(tier_color(tier)),
            ]);
        }

        table.add_row(vec![
            Cell::new("📍 Unresolved Districts"),
            Cell::new(self.unresolved_districts.len()).fg(if self.unresolved_districts.is_empty() {
                Color::White
            } else {
                Color::Yellow
            }),
        ]);
        table.add_row(vec![
            Cell::new("⏱  Total Time"),
            Cell::new(format!("{:.2?}", self.total_time())),
        ]);

        // Indent the table
        for line in table.to_string().lines() {
            println!("    {}", line);
        }

        if !self.unresolved_districts.is_empty() {
            println!();
            println!(
                "      {} {}:",
                style("Not on the map (fallback coordinate)").yellow(),
                style(format!("({})", self.unresolved_districts.len())).dim()
            );
            for district in &self.unresolved_districts {
                println!("        {} {}", style("•").dim(), district);
            }
        }
    }
}
