use std::process::ExitCode;

use clap::Parser;
use tracing::info;

use kegg_pathway_obo::api::KeggApi;
use kegg_pathway_obo::assembler::{iter_terms, ontology};
use kegg_pathway_obo::config::ConfigLoader;
use kegg_pathway_obo::error::KeggError;
use kegg_pathway_obo::kegg::KeggHttpClient;
use kegg_pathway_obo::logging::env_filter;
use kegg_pathway_obo::sink::write_default;

#[derive(Parser)]
#[command(name = "kegg-pathway-obo")]
#[command(about = "Convert KEGG reference and organism-specific pathways into an ontology")]
#[command(version, author)]
struct Cli {}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(kegg) = report.downcast_ref::<KeggError>() {
            return ExitCode::from(map_exit_code(kegg));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &KeggError) -> u8 {
    match error {
        KeggError::ConfigRead(_) | KeggError::ConfigParse(_) => 2,
        KeggError::NotFound { .. } | KeggError::KeggHttp { .. } | KeggError::KeggStatus { .. } => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let _cli = Cli::parse();

    let config = ConfigLoader::resolve(None)?;
    config.store.ensure_cache_root()?;
    let client = KeggHttpClient::new(&config.base_url, config.timeout)?;
    let api = KeggApi::new(config.store.clone(), client).with_force(config.force);

    let mut terms = iter_terms(&api)?;
    let written = write_default(&config.output, &ontology(), &mut terms)?;

    let summary = terms.summary();
    info!(
        map_terms = summary.map_terms,
        genomes_joined = summary.genomes_joined,
        genomes_missing = summary.genomes_missing,
        genomes_failed = summary.genomes_failed,
        unresolved_links = summary.unresolved_links,
        skipped_lines = summary.skipped_lines,
        terms = written,
        "wrote {}",
        config.output
    );
    Ok(())
}
