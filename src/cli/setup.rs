//! Startup: load every collaborator once and build the pipeline context

use anyhow::{Context, Result};

use crate::pipeline::{
    ColumnAliases, FeatureSchema, GeoRegistry, ModelArtifact, PipelineContext,
    RecommendationBook, RiskClassifier, SequencePolicy,
};

use super::Cli;

/// Feature schema for the configured district column
pub fn schema_from_cli(cli: &Cli) -> FeatureSchema {
    FeatureSchema::new(cli.district_column.as_str())
}

/// Alias table from `--aliases`, or the built-in one
pub fn aliases_from_cli(cli: &Cli) -> Result<ColumnAliases> {
    match &cli.aliases {
        Some(path) => ColumnAliases::load(path),
        None => ColumnAliases::builtin().context("Built-in alias table is invalid"),
    }
}

fn recommendations_from_cli(cli: &Cli) -> Result<RecommendationBook> {
    if let Some(path) = &cli.recommendations {
        return RecommendationBook::load(path);
    }
    RecommendationBook::builtin(&cli.locale)
        .with_context(|| format!("No built-in recommendations for locale '{}'", cli.locale))?
        .with_context(|| format!("Built-in recommendations for '{}' are invalid", cli.locale))
}

fn registry_from_cli(cli: &Cli) -> Result<GeoRegistry> {
    match &cli.coordinates {
        Some(path) => GeoRegistry::load(path),
        None => GeoRegistry::builtin().context("Built-in coordinate registry is invalid"),
    }
}

fn model_from_cli(cli: &Cli) -> Result<ModelArtifact> {
    match &cli.model {
        Some(path) => ModelArtifact::load(path),
        None => ModelArtifact::builtin().context("Built-in model artifact is invalid"),
    }
}

/// Build the shared context. Any configuration-data error, including an
/// artifact that does not match the feature schema, is fatal here.
pub fn build_context(cli: &Cli) -> Result<PipelineContext> {
    let schema = schema_from_cli(cli);
    let aliases = aliases_from_cli(cli)?;
    let model = model_from_cli(cli)?;
    let model_version = model.model_version().to_string();
    let recommendations = recommendations_from_cli(cli)?;
    let registry = registry_from_cli(cli)?;

    let policy = if cli.renumber {
        SequencePolicy::Renumbered
    } else {
        SequencePolicy::InputPosition
    };

    let context = PipelineContext::new(schema, aliases, Box::new(model), recommendations, registry)
        .with_context(|| {
            format!(
                "Model artifact '{}' is incompatible with the input schema",
                model_version
            )
        })?
        .with_sequence_policy(policy);

    log::debug!("{:?}", context);
    Ok(context)
}
