//! Smoke command: a short run on synthetic data

use crate::cli::logging::log;
use crate::cli::{LogLevel, SmokeArgs};
use crate::config::{load_config, validate_config, TrainerConfig, TrainingMode};
use crate::data::{BatchSource, PrefetchSource, SequentialSource, SyntheticStore};
use crate::error::Result;
use crate::network::reference::{AffineGenerator, DenseAutoencoder, PatchDiscriminator};
use crate::summary::JsonlSummaryWriter;
use crate::train::{EarlyStopping, Networks, TrainResult, Trainer};
use std::path::PathBuf;

/// Small volumes and a short schedule
pub fn smoke_config() -> TrainerConfig {
    let mut config = TrainerConfig::default();
    config.model_dir = PathBuf::from("log/smoke");
    config.data.shape = [8, 8, 8];
    config.data.batch_size = 4;
    config.data.val_set_size = 8;
    config.data.queue_depth = 2;
    config.training.max_step = 20;
    config.training.log_step = 5;
    config.training.test_step = 10;
    config.model.latent_dim = 8;
    config
}

/// Resolve the configuration: file or defaults, then flag overrides
pub fn resolve_config(args: &SmokeArgs) -> Result<TrainerConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => smoke_config(),
    };
    if let Some(mode) = args.mode {
        config.model.mode = mode;
    }
    if let Some(steps) = args.steps {
        config.training.max_step = steps;
    }
    if let Some(dir) = &args.output {
        config.model_dir.clone_from(dir);
    }
    config.data.seed = args.seed;
    validate_config(&config)?;
    Ok(config)
}

fn reference_networks(config: &TrainerConfig) -> Networks {
    let shape = config.data.shape;
    let seed = config.data.seed;
    match config.model.mode {
        TrainingMode::Plain => Networks::Generative {
            generator: Box::new(AffineGenerator::new(shape, seed)),
            discriminator: None,
        },
        TrainingMode::Adversarial => Networks::Generative {
            generator: Box::new(AffineGenerator::new(shape, seed)),
            discriminator: Some(Box::new(PatchDiscriminator::new(seed))),
        },
        TrainingMode::Autoencoder => Networks::Autoencoder(Box::new(DenseAutoencoder::new(
            shape,
            config.model.latent_dim,
            seed,
        ))),
    }
}

pub fn run_smoke(args: &SmokeArgs, level: LogLevel) -> Result<TrainResult> {
    let config = resolve_config(args)?;
    let store = SyntheticStore::new(config.data.shape, args.train_samples, args.val_samples, config.data.seed);
    let source: Box<dyn BatchSource> = if args.sequential {
        Box::new(SequentialSource::new(store, config.data.batch_size))
    } else {
        Box::new(PrefetchSource::spawn(
            store,
            config.data.batch_size,
            config.data.queue_depth,
            config.data.seed,
        )?)
    };
    let summary = JsonlSummaryWriter::open(&config.model_dir)?;
    let networks = reference_networks(&config);

    let mut trainer = Trainer::new(config, networks, source)?.with_summary(summary);
    if level == LogLevel::Quiet {
        trainer = trainer.without_progress();
    }
    if args.resume && trainer.resume_latest()? {
        log(
            level,
            LogLevel::Normal,
            &format!("Resuming at step {}", trainer.context().step()),
        );
    }
    if let Some(patience) = args.patience {
        trainer.add_callback(EarlyStopping::new(patience, 0.0));
    }

    let result = trainer.train()?;
    log(
        level,
        LogLevel::Normal,
        &format!(
            "Finished at step {} (loss {:.6}), checkpoint {}",
            result.final_step,
            result.final_loss,
            result.checkpoint.display()
        ),
    );
    Ok(result)
}
