mod config;

use anyhow::Context;
use config::Config;
use finpersona_core::personas::MatchingStrategy;
use finpersona_core::simulation::{run_simulation, PersonaDistribution};
use finpersona_core::{PersonaEngine, ReferenceData};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

fn init_tracing() {
    let log_format = std::env::var("PF_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

fn load_reference(config: &Config) -> anyhow::Result<ReferenceData> {
    let mut reference = match &config.reference_path {
        Some(path) => {
            tracing::info!("Loading reference data from {}", path.display());
            ReferenceData::from_path(path)?
        }
        None => ReferenceData::default(),
    };
    if let Some(strategy) = config.matching_strategy {
        reference = reference.with_matching_strategy(strategy);
    }
    if let Some(metric) = config.similarity_metric {
        reference = reference.with_similarity_metric(metric);
    }
    Ok(reference)
}

fn print_table(engine: &PersonaEngine, distribution: &PersonaDistribution) {
    println!(
        "{} users, {} classified, {} by similarity fallback, {} failed",
        distribution.total,
        distribution.classified(),
        distribution.fallback_count,
        distribution.failures
    );
    println!("{:<12} {:<28} {:>8} {:>8}", "persona", "name", "count", "share");
    for (persona_id, count) in distribution.ranked() {
        let name = engine
            .reference()
            .personas
            .get(persona_id)
            .map(|p| p.name.as_str())
            .unwrap_or("-");
        println!(
            "{:<12} {:<28} {:>8} {:>7.2}%",
            persona_id,
            name,
            count,
            distribution.share(persona_id)
        );
    }
    println!(
        "spread {:.2} pts, std dev {:.2} pts",
        distribution.spread, distribution.std_dev
    );
}

fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing();

    let reference = load_reference(&config)?;
    let engine = PersonaEngine::new(reference).context("reference data failed validation")?;
    if engine.strategy() == MatchingStrategy::VectorSimilarity {
        tracing::info!("Rule table disabled, matching by vector similarity only");
    }

    let distribution = run_simulation(&engine, &config.simulation)?;
    if distribution.failures > 0 {
        tracing::warn!(
            "{} simulated users could not be classified",
            distribution.failures
        );
    }

    if config.json_output {
        println!("{}", serde_json::to_string_pretty(&distribution)?);
    } else {
        print_table(&engine, &distribution);
    }
    Ok(())
}
