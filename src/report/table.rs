//! Terminal rendering of classification results

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::{FeatureSchema, Indicator, ReportRecord, RiskTier, RowError, SchemaError};

/// Indicators shown in the per-district detail panel
const DETAIL_INDICATORS: [Indicator; 6] = [
    Indicator::DengueCases,
    Indicator::Rainfall,
    Indicator::AvgTemperature,
    Indicator::WaterPuddles,
    Indicator::UnemploymentRate,
    Indicator::EducationYears,
];

pub fn tier_color(tier: RiskTier) -> Color {
    match tier {
        RiskTier::Low => Color::Green,
        RiskTier::Moderate => Color::Yellow,
        RiskTier::High => Color::Red,
    }
}

fn styled_tier(tier: RiskTier) -> console::StyledObject<String> {
    let text = tier.to_string();
    match tier {
        RiskTier::Low => style(text).green().bold(),
        RiskTier::Moderate => style(text).yellow().bold(),
        RiskTier::High => style(text).red().bold(),
    }
}

/// Build the results table: one row per classified district
pub fn results_table(records: &[ReportRecord]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("No").add_attribute(Attribute::Bold),
        Cell::new("District").add_attribute(Attribute::Bold),
        Cell::new("Risk Level").add_attribute(Attribute::Bold),
        Cell::new("Location").add_attribute(Attribute::Bold),
    ]);

    for record in records {
        let location = if record.location.resolved {
            Cell::new(format!(
                "{:.4}, {:.4}",
                record.location.coordinate.latitude, record.location.coordinate.longitude
            ))
        } else {
            Cell::new("unresolved").fg(Color::DarkGrey)
        };

        table.add_row(vec![
            Cell::new(record.sequence),
            Cell::new(&record.district),
            Cell::new(record.tier)
                .fg(tier_color(record.tier))
                .add_attribute(Attribute::Bold),
            location,
        ]);
    }

    table
}

pub fn print_results_table(records: &[ReportRecord]) {
    println!();
    println!(
        "    {} {}",
        style("📌").cyan(),
        style("DENGUE RISK PREDICTIONS").white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
    println!();

    for line in results_table(records).to_string().lines() {
        println!("    {}", line);
    }
}

fn format_indicator(record: &ReportRecord, indicator: Indicator) -> String {
    let value = record.indicators.get(indicator);
    match indicator.unit() {
        Some(unit) if unit.starts_with(char::is_alphabetic) => format!("{} {}", value, unit),
        Some(unit) => format!("{}{}", value, unit),
        None => value.to_string(),
    }
}

/// Per-district panel: source indicators followed by the numbered actions
pub fn print_district_details(records: &[ReportRecord]) {
    println!();
    println!(
        "    {} {}",
        style("📋").cyan(),
        style("RECOMMENDED ACTIONS BY DISTRICT").white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());

    for record in records {
        println!();
        println!(
            "    {} {} {} Risk Level: {}",
            style("▸").cyan(),
            style(&record.district).white().bold(),
            style("│").dim(),
            styled_tier(record.tier)
        );
        println!("      {}", style("Data Details:").bold());
        for indicator in DETAIL_INDICATORS {
            println!(
                "        {} {}: {}",
                style("•").dim(),
                indicator.label(),
                format_indicator(record, indicator)
            );
        }
        println!("      {}", style("Recommended Actions:").bold());
        for (i, action) in record.recommendations.iter().enumerate() {
            println!("        {}. {}", i + 1, action);
        }
    }
}

/// Diagnostic list for rows that produced no record
pub fn print_row_errors(errors: &[RowError], total_rows: usize) {
    if errors.is_empty() {
        return;
    }

    println!();
    println!(
        "    {} {} of {} row(s) could not be classified:",
        style("⚠").yellow().bold(),
        style(errors.len()).yellow().bold(),
        total_rows
    );
    for error in errors {
        println!("      {} {}", style("•").dim(), error);
    }
}

/// Explain a malformed input file: what is missing and what is required
pub fn print_schema_error(error: &SchemaError, schema: &FeatureSchema) {
    println!();
    println!(
        "    {} {}",
        style("✗").red().bold(),
        style("Column names in the input file do not match the required format.").red()
    );
    println!("      {}", error);

    let missing = error.missing_columns();
    if !missing.is_empty() {
        println!();
        println!("      {}", style("Missing:").bold());
        for column in missing {
            println!("        {} {}", style("•").red(), column);
        }
    }

    println!();
    println!("      {}", style("Required columns:").bold());
    println!("        {}", schema.required_columns().join(", "));
}
