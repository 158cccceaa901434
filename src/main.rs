use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use cfm_mutation::input::config::DEFAULT_MODEL_DIR;
use cfm_mutation::report::export::{write_audit_log, write_toon};
use cfm_mutation::report::recommend::Recommender;
use cfm_mutation::{init_tracing, AnalysisConfig, CfmModel};

fn config_from_args() -> AnalysisConfig {
    let matches = Command::new("cfm-mutation")
        .version(cfm_mutation::VERSION)
        .about("Mutation testing over the constraints of a context-feature model")
        .arg(
            Arg::new("model-dir")
                .long("model-dir")
                .value_name("DIR")
                .help("Directory holding contexts.txt, features.txt and mapping.txt")
                .default_value(DEFAULT_MODEL_DIR),
        )
        .arg(Arg::new("contexts").long("contexts").value_name("FILE").help("Context tree file"))
        .arg(Arg::new("features").long("features").value_name("FILE").help("Feature tree file"))
        .arg(Arg::new("mapping").long("mapping").value_name("FILE").help("Activation mapping file"))
        .arg(
            Arg::new("audit")
                .long("audit")
                .value_name("FILE")
                .help("Where to write the mutation operator log"),
        )
        .arg(
            Arg::new("no-audit")
                .long("no-audit")
                .help("Do not write the mutation operator log")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("export")
                .long("export")
                .value_name("FILE")
                .help("Export pairs, mutants and questions as TOON"),
        )
        .arg(
            Arg::new("interactive")
                .long("interactive")
                .short('i')
                .help("Ask the oracle questions and report a mutation score")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let path = |id: &str| matches.get_one::<String>(id).map(PathBuf::from);

    let mut config = match path("model-dir") {
        Some(dir) => AnalysisConfig::in_dir(dir),
        None => AnalysisConfig::default(),
    };
    if let Some(p) = path("contexts") {
        config.contexts_path = p;
    }
    if let Some(p) = path("features") {
        config.features_path = p;
    }
    if let Some(p) = path("mapping") {
        config.mapping_path = p;
    }
    if let Some(p) = path("audit") {
        config.audit_path = Some(p);
    }
    if matches.get_flag("no-audit") {
        config.audit_path = None;
    }
    config.export_path = path("export");
    config.interactive = matches.get_flag("interactive");
    config
}

fn main() -> Result<()> {
    init_tracing();
    let config = config_from_args();

    let mut model = CfmModel::load(&config).context("failed to load the model")?;
    model.analyze();

    if let Some(path) = &config.audit_path {
        write_audit_log(&model, path)?;
    }
    if let Some(path) = &config.export_path {
        write_toon(&model, path)?;
    }

    println!(
        "{} connected pairs, {} mutants, {} questions",
        model.connected_pairs.len(),
        model.mutants.len(),
        model.questions.len()
    );

    if config.interactive {
        let stdin = io::stdin();
        Recommender::new(stdin.lock(), io::stdout()).run(&model.questions)?;
    } else {
        for (i, q) in model.questions.iter().enumerate() {
            println!("{}. {} [expected: {}]", i + 1, q.text, q.expected_answers().join("/"));
        }
    }

    Ok(())
}
