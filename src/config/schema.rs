//! YAML schema definitions for declarative training configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which networks are trained and how they are optimized.
///
/// Selected once when the trainer is built; never changes during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainingMode {
    /// Generator only
    #[default]
    Plain,
    /// Generator and discriminator updated every step
    Adversarial,
    /// Autoencoder whose latent tail regresses the parameters
    Autoencoder,
}

/// Learning-rate update policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LrPolicy {
    /// Halve the rate every `lr_update_step` steps
    Step,
    /// Cosine decay from `lr_max` to `lr_min`, updated every step
    #[default]
    Decay,
}

/// Complete training specification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerConfig {
    /// Output directory for checkpoints, samples and summaries
    #[serde(default = "default_model_dir")]
    pub model_dir: PathBuf,

    /// Data configuration
    #[serde(default)]
    pub data: DataConfig,

    /// Model/mode configuration
    #[serde(default)]
    pub model: ModelConfig,

    /// Optimizer configuration
    #[serde(default)]
    pub optimizer: OptimSpec,

    /// Learning-rate schedule
    #[serde(default)]
    pub schedule: ScheduleSpec,

    /// Loss weights
    #[serde(default)]
    pub loss: LossWeights,

    /// Physics residual settings
    #[serde(default)]
    pub physics: PhysicsSpec,

    /// Loop cadence
    #[serde(default)]
    pub training: TrainingParams,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            model_dir: default_model_dir(),
            data: DataConfig::default(),
            model: ModelConfig::default(),
            optimizer: OptimSpec::default(),
            schedule: ScheduleSpec::default(),
            loss: LossWeights::default(),
            physics: PhysicsSpec::default(),
            training: TrainingParams::default(),
        }
    }
}

fn default_model_dir() -> PathBuf {
    PathBuf::from("log/tumor")
}

/// Data configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Optional dataset root handed to the sample store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    /// Spatial resolution (X, Y, Z)
    #[serde(default = "default_shape")]
    pub shape: [usize; 3],

    /// Samples per batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Number of samples in the validation split
    #[serde(default = "default_val_set_size")]
    pub val_set_size: usize,

    /// Bounded prefetch queue capacity
    #[serde(default = "default_queue_depth")]
    pub queue_depth: usize,

    /// Seed for batch shuffling and network initialisation
    #[serde(default)]
    pub seed: u64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            root: None,
            shape: default_shape(),
            batch_size: default_batch_size(),
            val_set_size: default_val_set_size(),
            queue_depth: default_queue_depth(),
            seed: 0,
        }
    }
}

fn default_shape() -> [usize; 3] {
    [64, 64, 64]
}

fn default_batch_size() -> usize {
    8
}

fn default_val_set_size() -> usize {
    64
}

fn default_queue_depth() -> usize {
    8
}

/// Model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Training mode
    #[serde(default)]
    pub mode: TrainingMode,

    /// Add the reaction-diffusion residual to the generator loss
    #[serde(default)]
    pub physics: bool,

    /// Autoencoder latent size (the last 3 units regress the parameters)
    #[serde(default = "default_latent_dim")]
    pub latent_dim: usize,

    /// Add the KL sparsity penalty on the non-parameter latent units
    #[serde(default)]
    pub sparse: bool,

    /// Target activation rate for the sparsity penalty
    #[serde(default = "default_sparsity")]
    pub sparsity: f32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            mode: TrainingMode::Plain,
            physics: false,
            latent_dim: default_latent_dim(),
            sparse: false,
            sparsity: default_sparsity(),
        }
    }
}

fn default_latent_dim() -> usize {
    16
}

fn default_sparsity() -> f32 {
    0.01
}

/// Optimizer specification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimSpec {
    /// Optimizer name: "adam" | "gd"
    #[serde(default = "default_optimizer")]
    pub name: String,

    /// Adam first-moment decay
    #[serde(default = "default_beta1")]
    pub beta1: f32,

    /// Adam second-moment decay
    #[serde(default = "default_beta2")]
    pub beta2: f32,
}

impl Default for OptimSpec {
    fn default() -> Self {
        Self {
            name: default_optimizer(),
            beta1: default_beta1(),
            beta2: default_beta2(),
        }
    }
}

fn default_optimizer() -> String {
    "adam".to_string()
}

fn default_beta1() -> f32 {
    0.5
}

fn default_beta2() -> f32 {
    0.999
}

/// Learning-rate schedule specification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSpec {
    /// Update policy
    #[serde(default)]
    pub policy: LrPolicy,

    /// Initial learning rate
    #[serde(default = "default_lr_max")]
    pub lr_max: f32,

    /// Final learning rate of the cosine decay
    #[serde(default = "default_lr_min")]
    pub lr_min: f32,

    /// Steps between halvings (step policy)
    #[serde(default = "default_lr_update_step")]
    pub lr_update_step: u64,

    /// Floor for the step policy
    #[serde(default = "default_lr_lower_boundary")]
    pub lr_lower_boundary: f32,
}

impl Default for ScheduleSpec {
    fn default() -> Self {
        Self {
            policy: LrPolicy::Decay,
            lr_max: default_lr_max(),
            lr_min: default_lr_min(),
            lr_update_step: default_lr_update_step(),
            lr_lower_boundary: default_lr_lower_boundary(),
        }
    }
}

fn default_lr_max() -> f32 {
    1e-4
}

fn default_lr_min() -> f32 {
    2.5e-6
}

fn default_lr_update_step() -> u64 {
    120_000
}

fn default_lr_lower_boundary() -> f32 {
    2e-5
}

/// Loss weights
///
/// `w1` reconstruction, `w2` gradient consistency, `w3` adversarial,
/// `w4` autoencoder parameter regression, `w5` autoencoder sparsity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LossWeights {
    #[serde(default = "default_unit_weight")]
    pub w1: f32,
    #[serde(default = "default_unit_weight")]
    pub w2: f32,
    #[serde(default = "default_w3")]
    pub w3: f32,
    #[serde(default = "default_unit_weight")]
    pub w4: f32,
    #[serde(default = "default_unit_weight")]
    pub w5: f32,
}

impl Default for LossWeights {
    fn default() -> Self {
        Self {
            w1: 1.0,
            w2: 1.0,
            w3: default_w3(),
            w4: 1.0,
            w5: 1.0,
        }
    }
}

impl LossWeights {
    /// All weights as a slice-friendly array, in order `w1..w5`.
    pub fn as_array(&self) -> [f32; 5] {
        [self.w1, self.w2, self.w3, self.w4, self.w5]
    }
}

fn default_unit_weight() -> f32 {
    1.0
}

fn default_w3() -> f32 {
    0.005
}

/// Physics residual settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsSpec {
    /// Finite-difference step in the (normalized) time parameter
    #[serde(default = "default_time_step")]
    pub time_step: f32,

    /// White-to-gray matter diffusivity ratio
    #[serde(default = "default_gray_matter_ratio")]
    pub gray_matter_ratio: f32,
}

impl Default for PhysicsSpec {
    fn default() -> Self {
        Self {
            time_step: default_time_step(),
            gray_matter_ratio: default_gray_matter_ratio(),
        }
    }
}

fn default_time_step() -> f32 {
    0.01
}

fn default_gray_matter_ratio() -> f32 {
    10.0
}

/// Loop cadence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingParams {
    /// Last step (exclusive)
    #[serde(default = "default_max_step")]
    pub max_step: u64,

    /// First step; non-zero when resuming
    #[serde(default)]
    pub start_step: u64,

    /// Steps between loss/validation reports
    #[serde(default = "default_log_step")]
    pub log_step: u64,

    /// Steps between sample generations
    #[serde(default = "default_test_step")]
    pub test_step: u64,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            max_step: default_max_step(),
            start_step: 0,
            log_step: default_log_step(),
            test_step: default_test_step(),
        }
    }
}

fn default_max_step() -> u64 {
    300_000
}

fn default_log_step() -> u64 {
    500
}

fn default_test_step() -> u64 {
    1000
}
