//! Motion Guard entrypoint: generate → extract → train → evaluate / predict.
//! Each stage reads its input file and writes its output file; paths default to the config.

mod cli;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use motion_guard::{
    config::DetectorConfig,
    dataset::{ClassSummary, DatasetBuilder, FeatureTable},
    logging::{PredictionRecord, StructuredLogger},
    metrics::evaluate,
    session::{load_sessions, save_sessions, PredictInput},
    synth::SessionGenerator,
    train::Trainer,
    Model, Predictor,
};
use std::io::Write;
use tracing::{info, warn};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(DetectorConfig::default_path);
    let config = DetectorConfig::load(&config_path);

    StructuredLogger::init(cli.json_logs || config.log.json, &config.log.level);
    config.validate().context("invalid configuration")?;

    match cli.command {
        Commands::Generate {
            output,
            humans,
            bots,
            seed,
        } => {
            let output = output.unwrap_or_else(|| config.data.sessions_path.clone());
            let seed = seed.unwrap_or(config.synth.seed);
            let sessions = SessionGenerator::new(seed).corpus(
                humans.unwrap_or(config.synth.human_sessions),
                bots.unwrap_or(config.synth.bot_sessions),
            );
            save_sessions(&output, &sessions)
                .with_context(|| format!("writing {}", output.display()))?;
            info!(path = %output.display(), count = sessions.len(), seed, "sessions generated");
        }

        Commands::Extract { sessions, output } => {
            let input = sessions.unwrap_or_else(|| config.data.sessions_path.clone());
            let output = output.unwrap_or_else(|| config.data.features_path.clone());
            let sessions =
                load_sessions(&input).with_context(|| format!("reading {}", input.display()))?;
            let table = DatasetBuilder::new()
                .build(&sessions)
                .with_context(|| format!("extracting features from {}", input.display()))?;
            table
                .save(&output)
                .with_context(|| format!("writing {}", output.display()))?;
            println!("{}", ClassSummary::from_table(&table));
        }

        Commands::Train {
            features,
            model,
            test_fraction,
            seed,
        } => {
            let features = features.unwrap_or_else(|| config.data.features_path.clone());
            let model_path = model.unwrap_or_else(|| config.model.path.clone());
            let table = FeatureTable::load(&features)
                .with_context(|| format!("reading {}", features.display()))?;
            let (model, report) = Trainer::new(config.forest)
                .train(
                    &table,
                    test_fraction.unwrap_or(config.training.test_fraction),
                    seed.unwrap_or(config.training.seed),
                )
                .context("training failed")?;
            model
                .save(&model_path)
                .with_context(|| format!("publishing {}", model_path.display()))?;
            println!("train rows: {}, test rows: {}", report.train_size, report.test_size);
            println!("{}", report.metrics);
            println!("single-row inference: {:.1} µs", report.single_inference_micros);
        }

        Commands::Evaluate { features, model } => {
            let features = features.unwrap_or_else(|| config.data.features_path.clone());
            let model_path = model.unwrap_or_else(|| config.model.path.clone());
            let model = Model::load(&model_path)
                .with_context(|| format!("loading {}", model_path.display()))?;
            let table = FeatureTable::load(&features)
                .with_context(|| format!("reading {}", features.display()))?;
            let metrics = evaluate(&model, &table).context("evaluation failed")?;
            println!("{}", metrics);
        }

        Commands::Predict { inputs, model } => {
            let model_path = model.unwrap_or_else(|| config.model.path.clone());
            let predictor = Predictor::load(&model_path)
                .with_context(|| format!("loading {}", model_path.display()))?;
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            let mut failures = 0usize;
            for path in &inputs {
                let source = path.display().to_string();
                let result = PredictInput::load(path)
                    .and_then(|input| predictor.predict(&input).map(|p| (input, p)));
                let emitted = match &result {
                    Ok((input, p)) => {
                        let record = PredictionRecord::success(&source, input.session_id(), p);
                        StructuredLogger::emit_json(&record, &mut out)
                    }
                    Err(e) => {
                        warn!(path = %source, error = %e, "prediction failed");
                        let msg = e.to_string();
                        StructuredLogger::emit_json(&PredictionRecord::failure(&source, &msg), &mut out)
                    }
                };
                if let Err(e) = &emitted {
                    warn!(path = %source, error = %e, "writing prediction record failed");
                }
                if result.is_err() || emitted.is_err() {
                    failures += 1;
                }
            }
            out.flush()?;
            if failures == inputs.len() {
                anyhow::bail!("all {} predictions failed", failures);
            }
        }

        Commands::Summary { features } => {
            let features = features.unwrap_or_else(|| config.data.features_path.clone());
            let table = FeatureTable::load(&features)
                .with_context(|| format!("reading {}", features.display()))?;
            println!("{}", ClassSummary::from_table(&table));
        }
    }

    Ok(())
}
