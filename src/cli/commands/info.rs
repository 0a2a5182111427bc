//! Info command implementation

use crate::cli::logging::log;
use crate::cli::{ConfigArgs, LogLevel};
use crate::config::{load_config, LrPolicy, TrainerConfig, TrainingMode};
use crate::error::Result;

/// Human-readable summary of a configuration
pub fn format_config(config: &TrainerConfig) -> String {
    let data = &config.data;
    let model = &config.model;
    let schedule = &config.schedule;
    let training = &config.training;
    let w = &config.loss;

    let mut lines = vec![
        format!("Model dir: {}", config.model_dir.display()),
        format!("Mode: {:?}", model.mode),
        format!(
            "Data: {}x{}x{} volumes, batch {}, {} validation samples, queue {}",
            data.shape[0], data.shape[1], data.shape[2], data.batch_size, data.val_set_size, data.queue_depth
        ),
        format!("Optimizer: {}", config.optimizer.name),
    ];
    lines.push(match schedule.policy {
        LrPolicy::Step => format!(
            "Schedule: halve {} every {} steps, floor {}",
            schedule.lr_max, schedule.lr_update_step, schedule.lr_lower_boundary
        ),
        LrPolicy::Decay => format!("Schedule: cosine {} -> {}", schedule.lr_max, schedule.lr_min),
    });
    lines.push(format!(
        "Steps: {}..{}, log every {}, sample every {}",
        training.start_step, training.max_step, training.log_step, training.test_step
    ));
    match model.mode {
        TrainingMode::Autoencoder => {
            lines.push(format!(
                "Loss: w1={} w2={} w4={}{}",
                w.w1,
                w.w2,
                w.w4,
                if model.sparse { format!(" w5={} (sparsity {})", w.w5, model.sparsity) } else { String::new() }
            ));
            lines.push(format!("Latent: {}", model.latent_dim));
        }
        TrainingMode::Plain | TrainingMode::Adversarial => {
            let mut loss = format!("Loss: w1={} w2={}", w.w1, w.w2);
            if model.mode == TrainingMode::Adversarial {
                loss.push_str(&format!(" w3={}", w.w3));
            }
            lines.push(loss);
        }
    }
    if model.physics {
        lines.push(format!(
            "Physics: dt={} gray-matter ratio {}",
            config.physics.time_step, config.physics.gray_matter_ratio
        ));
    }
    lines.join("\n")
}

pub fn run_info(args: &ConfigArgs, level: LogLevel) -> Result<()> {
    let config = load_config(&args.config)?;
    log(level, LogLevel::Normal, &format_config(&config));
    Ok(())
}
