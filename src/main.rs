//! Aedes: Dengue Risk Classification CLI
//!
//! Classifies each district of a tabular input into a dengue outbreak risk
//! tier, attaches the matching intervention recommendations and map
//! coordinates, and exports the results.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use console::style;

use aedes::cli::{self, Cli, Commands};
use aedes::pipeline::{
    load_dataset, BatchOutcome, FeatureSchema, PipelineContext, PipelineError, RiskReport,
};
use aedes::report::{
    export_geojson, export_report_json, package_reports, print_district_details,
    print_results_table, print_row_errors, print_schema_error, write_export_csv, ExportParams,
    RunSummary,
};
use aedes::utils::{
    create_spinner, finish_with_error, finish_with_success, finish_with_warning, print_banner,
    print_completion, print_config, print_count, print_info, print_step_header, print_step_time,
    print_success, print_warning, ConfigCard,
};

fn main() -> Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    // Handle subcommands
    if let Some(command) = &cli.command {
        return match command {
            Commands::Columns => run_columns(&cli),
            Commands::Validate { input } => run_validate(&cli, input),
        };
    }

    let input = cli.input().ok_or_else(|| {
        anyhow::anyhow!("Input file is required. Use -i/--input to specify a file.")
    })?;
    let output_path = cli
        .output_path()
        .ok_or_else(|| anyhow::anyhow!("Could not derive an output path from the input"))?;

    // Load every collaborator once; a mismatched artifact stops here
    let context = cli::build_context(&cli)?;

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(&ConfigCard {
        input,
        output: &output_path,
        model_version: context.classifier().model_version(),
        locale: context.recommendations().locale(),
        region: context.registry().region(),
    });

    // Step 1: Load dataset
    print_step_header(1, "Load Dataset");
    let step_start = Instant::now();
    let spinner = create_spinner("Reading input file...");
    let mut df = load_dataset(input, cli.infer_schema_length)?;
    finish_with_success(&spinner, "Dataset loaded");
    println!("      Rows: {}", df.height());
    println!("      Columns: {}", df.width());
    let load_elapsed = step_start.elapsed();
    print_step_time(load_elapsed);

    // Step 2: Resolve aliases and validate required columns
    print_step_header(2, "Validate Columns");
    let step_start = Instant::now();
    let spinner = create_spinner("Checking required columns...");
    let (table, applied) = match context.validate(&mut df) {
        Ok(validated) => validated,
        Err(PipelineError::Schema(e)) => {
            finish_with_error(&spinner, "Required columns are missing");
            print_schema_error(&e, context.schema());
            anyhow::bail!("Input file {} is malformed: {}", input.display(), e);
        }
        Err(e) => return Err(e.into()),
    };
    finish_with_success(&spinner, "All required columns present");
    for alias in &applied {
        print_info(&format!("Column '{}' read as '{}'", alias.from, alias.to));
    }
    let validate_elapsed = step_start.elapsed();
    print_step_time(validate_elapsed);

    // Step 3: Classify each district
    print_step_header(3, "Classify Risk");
    let step_start = Instant::now();
    let spinner = create_spinner("Classifying districts...");
    let mut report = context.assemble(&table);
    report.applied_aliases = applied;
    match report.outcome() {
        BatchOutcome::Complete => finish_with_success(&spinner, "Classification complete"),
        _ => finish_with_warning(&spinner, "Classification finished with row errors"),
    }
    print_count(
        "district(s) classified",
        report.succeeded(),
        Some(&format!("({})", context.sequence_policy())),
    );
    let classify_elapsed = step_start.elapsed();
    print_step_time(classify_elapsed);

    if !report.records.is_empty() {
        print_results_table(&report.records);
        if cli.details {
            print_district_details(&report.records);
        }
    }
    print_row_errors(&report.errors, report.total_rows);

    let mut summary = RunSummary::from_report(&report);
    summary.set_load_time(load_elapsed);
    summary.set_validate_time(validate_elapsed);
    summary.set_classify_time(classify_elapsed);

    // Decide whether there is anything to export
    let export = match report.outcome() {
        BatchOutcome::Empty => {
            print_warning("The input file has no data rows; nothing to export");
            false
        }
        BatchOutcome::NoRecords { total } => {
            summary.display();
            anyhow::bail!("None of the {} row(s) could be classified", total);
        }
        BatchOutcome::Partial { failed, total } => {
            if cli.no_confirm || cli::confirm_partial_export(failed, total)? {
                true
            } else {
                print_info("Export skipped");
                false
            }
        }
        BatchOutcome::Complete => true,
    };

    if export {
        // Step 4: Export results
        print_step_header(4, "Export Results");
        let step_start = Instant::now();
        export_results(&cli, &context, &report, input, &output_path)?;
        let export_elapsed = step_start.elapsed();
        summary.set_export_time(export_elapsed);
        print_step_time(export_elapsed);
    }

    summary.display();
    print_completion();

    Ok(())
}

/// Write the CSV export plus any requested JSON/GeoJSON files, optionally
/// bundled into one zip archive
fn export_results(
    cli: &Cli,
    context: &PipelineContext,
    report: &RiskReport,
    input: &Path,
    output_path: &Path,
) -> Result<()> {
    let spinner = create_spinner("Writing export files...");
    let mut written: Vec<PathBuf> = Vec::new();

    write_export_csv(&report.records, cli.include_coordinates, output_path)?;
    written.push(output_path.to_path_buf());

    if cli.report_json {
        if let Some(path) = cli.report_json_path() {
            let input_file = input.display().to_string();
            let params = ExportParams {
                input_file: &input_file,
                model_version: context.classifier().model_version(),
                locale: context.recommendations().locale(),
                region: context.registry().region(),
                sequence_policy: context.sequence_policy(),
            };
            export_report_json(report, &params, &path)?;
            written.push(path);
        }
    }

    if cli.geojson {
        if let Some(path) = cli.geojson_path() {
            export_geojson(&report.records, &path)?;
            written.push(path);
        }
    }

    if cli.bundle {
        if let Some(zip_path) = cli.bundle_path() {
            let files: Vec<&Path> = written.iter().map(|p| p.as_path()).collect();
            package_reports(&files, &zip_path)?;
            finish_with_success(
                &spinner,
                &format!("Bundled {} file(s) into {}", written.len(), zip_path.display()),
            );
            return Ok(());
        }
    }

    finish_with_success(&spinner, "Export complete");
    for path in &written {
        println!("      {} {}", style("→").cyan(), path.display());
    }
    Ok(())
}

/// `aedes columns`: required columns and accepted aliases
fn run_columns(cli: &Cli) -> Result<()> {
    let schema = cli::schema_from_cli(cli);
    let aliases = cli::aliases_from_cli(cli)?;

    println!();
    println!("    {}", style("Required Columns").white().bold());
    println!("    {}", style("─".repeat(50)).dim());
    for indicator in aedes::pipeline::Indicator::ALL {
        let unit = indicator
            .unit()
            .map(|u| format!(" ({})", u))
            .unwrap_or_default();
        println!(
            "      {} {:<22} {}{}",
            style("•").cyan(),
            indicator.column(),
            style(indicator.label()).dim(),
            style(unit).dim()
        );
    }
    println!(
        "      {} {:<22} {}",
        style("•").cyan(),
        schema.district_column(),
        style("District identifier").dim()
    );

    if !aliases.is_empty() {
        println!();
        println!("    {}", style("Accepted Aliases").white().bold());
        println!("    {}", style("─".repeat(50)).dim());
        for (alias, canonical) in aliases.iter() {
            println!("      {:<28} → {}", alias, canonical);
        }
    }
    println!();

    Ok(())
}

/// `aedes validate <input>`: alias resolution and column validation only
fn run_validate(cli: &Cli, input: &Path) -> Result<()> {
    let schema: FeatureSchema = cli::schema_from_cli(cli);
    let aliases = cli::aliases_from_cli(cli)?;

    let spinner = create_spinner("Reading input file...");
    let mut df = load_dataset(input, cli.infer_schema_length)?;
    finish_with_success(&spinner, "Dataset loaded");

    let applied = aliases.apply(&mut df, &schema)?;
    for alias in &applied {
        print_info(&format!("Column '{}' read as '{}'", alias.from, alias.to));
    }

    match aedes::pipeline::validate_schema(&df, &schema) {
        Ok(table) => {
            print_success(&format!(
                "{} is valid: {} data row(s)",
                input.display(),
                table.len()
            ));
            Ok(())
        }
        Err(e) => {
            print_schema_error(&e, &schema);
            anyhow::bail!("Input file {} is malformed: {}", input.display(), e);
        }
    }
}
