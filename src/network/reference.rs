//! Small reference networks
//!
//! Enough capacity to exercise every training mode end-to-end on a CPU.
//! Production architectures plug in through the same traits.

use super::param::Parameter;
use super::traits::{Autoencoder, Discriminator, Encoded, Generator};
use crate::data::PARAM_COUNT;
use crate::error::{Error, Result};
use ndarray::{Array1, Array2, Array4, Array5, Axis, Ix1, Ix2, Ix3, Ix4, Zip};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Tissue channels expected in the anatomy volume
pub const TISSUE_CHANNELS: usize = 3;

/// Number of octant features pooled from a volume
pub const OCTANTS: usize = 8;

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

fn octant_of(i: usize, n: usize) -> usize {
    if n <= 1 {
        0
    } else {
        (i * 2) / n
    }
}

/// Octant (0..8) containing voxel `(x, y, z)`
fn octant(shape: [usize; 3], x: usize, y: usize, z: usize) -> usize {
    octant_of(x, shape[0]) * 4 + octant_of(y, shape[1]) * 2 + octant_of(z, shape[2])
}

/// Voxels per octant; empty octants count as one to keep means finite
fn octant_counts(shape: [usize; 3]) -> [f32; OCTANTS] {
    let mut counts = [0.0f32; OCTANTS];
    for x in 0..shape[0] {
        for y in 0..shape[1] {
            for z in 0..shape[2] {
                counts[octant(shape, x, y, z)] += 1.0;
            }
        }
    }
    counts.map(|c| c.max(1.0))
}

/// Octant means of `f(u)` per sample, `[B, 8]`
fn pool(field: &Array4<f32>, f: impl Fn(f32) -> f32) -> Array2<f32> {
    let (batch, nx, ny, nz) = field.dim();
    let shape = [nx, ny, nz];
    let counts = octant_counts(shape);
    let mut out = Array2::zeros((batch, OCTANTS));
    for ((b, x, y, z), &u) in field.indexed_iter() {
        out[[b, octant(shape, x, y, z)]] += f(u);
    }
    for mut row in out.rows_mut() {
        for (m, c) in row.iter_mut().zip(counts.iter()) {
            *m /= c;
        }
    }
    out
}

fn volume_shape(field: &Array4<f32>) -> [usize; 3] {
    let (_, x, y, z) = field.dim();
    [x, y, z]
}

/// Sigmoid of a per-voxel affine map of parameters and tissue
///
/// `u = sigmoid(bias + sum_k weights_k * p_k + sum_c tissue_c * anatomy_c)`
#[derive(Debug, Clone)]
pub struct AffineGenerator {
    shape: [usize; 3],
    params: Vec<Parameter>,
}

impl AffineGenerator {
    const BIAS: usize = 0;
    const WEIGHTS: usize = 1;
    const TISSUE: usize = 2;

    pub fn new(shape: [usize; 3], seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let [nx, ny, nz] = shape;
        let params = vec![
            Parameter::zeros("bias", &[nx, ny, nz]),
            Parameter::uniform("weights", &[PARAM_COUNT, nx, ny, nz], 0.1, &mut rng),
            Parameter::uniform("tissue", &[TISSUE_CHANNELS], 0.1, &mut rng),
        ];
        Self { shape, params }
    }

    fn check_inputs(&self, params: &Array2<f32>, anatomy: &Array5<f32>) -> Result<usize> {
        let batch = params.nrows();
        if params.ncols() != PARAM_COUNT {
            return Err(Error::shape("generator parameters", &[batch, PARAM_COUNT], params.shape()));
        }
        let [nx, ny, nz] = self.shape;
        let expected = [batch, nx, ny, nz, TISSUE_CHANNELS];
        if anatomy.shape() != expected {
            return Err(Error::shape("generator anatomy", &expected, anatomy.shape()));
        }
        Ok(batch)
    }
}

impl Generator for AffineGenerator {
    fn forward(&self, params: &Array2<f32>, anatomy: &Array5<f32>) -> Result<Array4<f32>> {
        let batch = self.check_inputs(params, anatomy)?;
        let bias = self.params[Self::BIAS].view_as::<Ix3>()?;
        let weights = self.params[Self::WEIGHTS].view_as::<Ix4>()?;
        let tissue = self.params[Self::TISSUE].view_as::<Ix1>()?;
        let [nx, ny, nz] = self.shape;

        Ok(Array4::from_shape_fn((batch, nx, ny, nz), |(b, x, y, z)| {
            let mut v = bias[[x, y, z]];
            for k in 0..PARAM_COUNT {
                v += weights[[k, x, y, z]] * params[[b, k]];
            }
            for (c, t) in tissue.iter().enumerate() {
                v += t * anatomy[[b, x, y, z, c]];
            }
            sigmoid(v)
        }))
    }

    fn backward(
        &mut self,
        params: &Array2<f32>,
        anatomy: &Array5<f32>,
        grad_output: &Array4<f32>,
    ) -> Result<()> {
        let out = self.forward(params, anatomy)?;
        if grad_output.shape() != out.shape() {
            return Err(Error::shape("generator output gradient", out.shape(), grad_output.shape()));
        }
        let batch = out.len_of(Axis(0));
        let [nx, ny, nz] = self.shape;

        let g_pre = Zip::from(grad_output)
            .and(&out)
            .map_collect(|&g, &s| g * s * (1.0 - s));
        let g_bias = g_pre.sum_axis(Axis(0));
        let g_weights = Array4::from_shape_fn((PARAM_COUNT, nx, ny, nz), |(k, x, y, z)| {
            (0..batch).map(|b| g_pre[[b, x, y, z]] * params[[b, k]]).sum::<f32>()
        });
        let g_tissue = Array1::from_shape_fn(TISSUE_CHANNELS, |c| {
            Zip::from(&g_pre)
                .and(&anatomy.index_axis(Axis(4), c))
                .fold(0.0, |acc, &g, &a| acc + g * a)
        });

        self.params[Self::BIAS].accumulate(&g_bias.into_dyn())?;
        self.params[Self::WEIGHTS].accumulate(&g_weights.into_dyn())?;
        self.params[Self::TISSUE].accumulate(&g_tissue.into_dyn())
    }

    fn parameters(&self) -> &[Parameter] {
        &self.params
    }

    fn parameters_mut(&mut self) -> &mut [Parameter] {
        &mut self.params
    }
}

/// Scores each octant of a field from its first two moments
///
/// `score[b, p] = w0 * mean_p(u) + w1 * mean_p(u^2) + bias`
#[derive(Debug, Clone)]
pub struct PatchDiscriminator {
    params: Vec<Parameter>,
}

impl PatchDiscriminator {
    const MOMENTS: usize = 0;
    const BIAS: usize = 1;

    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self {
            params: vec![
                Parameter::uniform("moments", &[2], 0.5, &mut rng),
                Parameter::zeros("bias", &[1]),
            ],
        }
    }

    fn coefficients(&self) -> Result<(f32, f32, f32)> {
        let w = self.params[Self::MOMENTS].view_as::<Ix1>()?;
        let bias = self.params[Self::BIAS].view_as::<Ix1>()?;
        Ok((w[0], w[1], bias[0]))
    }
}

impl Discriminator for PatchDiscriminator {
    fn forward(&self, field: &Array4<f32>) -> Result<Array2<f32>> {
        let (w0, w1, bias) = self.coefficients()?;
        let m1 = pool(field, |u| u);
        let m2 = pool(field, |u| u * u);
        Ok(Zip::from(&m1)
            .and(&m2)
            .map_collect(|&a, &b| w0 * a + w1 * b + bias))
    }

    fn backward(
        &mut self,
        field: &Array4<f32>,
        grad_output: &Array2<f32>,
    ) -> Result<Array4<f32>> {
        let batch = field.len_of(Axis(0));
        let expected = [batch, OCTANTS];
        if grad_output.shape() != expected {
            return Err(Error::shape("discriminator output gradient", &expected, grad_output.shape()));
        }
        let (w0, w1, _) = self.coefficients()?;
        let m1 = pool(field, |u| u);
        let m2 = pool(field, |u| u * u);

        let g_moments = Array1::from(vec![(grad_output * &m1).sum(), (grad_output * &m2).sum()]);
        let g_bias = Array1::from(vec![grad_output.sum()]);
        self.params[Self::MOMENTS].accumulate(&g_moments.into_dyn())?;
        self.params[Self::BIAS].accumulate(&g_bias.into_dyn())?;

        let shape = volume_shape(field);
        let counts = octant_counts(shape);
        Ok(Array4::from_shape_fn(field.dim(), |(b, x, y, z)| {
            let p = octant(shape, x, y, z);
            grad_output[[b, p]] * (w0 + 2.0 * w1 * field[[b, x, y, z]]) / counts[p]
        }))
    }

    fn parameters(&self) -> &[Parameter] {
        &self.params
    }

    fn parameters_mut(&mut self) -> &mut [Parameter] {
        &mut self.params
    }
}

/// One-layer encoder over octant means, one-layer decoder to the volume
///
/// `z = sigmoid(E * pool(u) + e)`, `u' = sigmoid(dec_bias + sum_l z_l * dec_l)`
#[derive(Debug, Clone)]
pub struct DenseAutoencoder {
    shape: [usize; 3],
    latent_dim: usize,
    params: Vec<Parameter>,
}

impl DenseAutoencoder {
    const ENCODER: usize = 0;
    const ENCODER_BIAS: usize = 1;
    const DECODER: usize = 2;
    const DECODER_BIAS: usize = 3;

    pub fn new(shape: [usize; 3], latent_dim: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let [nx, ny, nz] = shape;
        let params = vec![
            Parameter::uniform("encoder", &[latent_dim, OCTANTS], 0.5, &mut rng),
            Parameter::zeros("encoder_bias", &[latent_dim]),
            Parameter::uniform("decoder", &[latent_dim, nx, ny, nz], 0.1, &mut rng),
            Parameter::zeros("decoder_bias", &[nx, ny, nz]),
        ];
        Self {
            shape,
            latent_dim,
            params,
        }
    }

    fn check_field(&self, field: &Array4<f32>) -> Result<()> {
        let [nx, ny, nz] = self.shape;
        let batch = field.len_of(Axis(0));
        if field.shape() != [batch, nx, ny, nz] {
            return Err(Error::shape("autoencoder input", &[batch, nx, ny, nz], field.shape()));
        }
        Ok(())
    }

    fn encode(&self, field: &Array4<f32>) -> Result<(Array2<f32>, Array2<f32>)> {
        let encoder = self.params[Self::ENCODER].view_as::<Ix2>()?;
        let bias = self.params[Self::ENCODER_BIAS].view_as::<Ix1>()?;
        let features = pool(field, |u| u);
        let latent = (features.dot(&encoder.t()) + &bias).mapv_into(sigmoid);
        Ok((features, latent))
    }

    fn decode(&self, latent: &Array2<f32>) -> Result<Array4<f32>> {
        let decoder = self.params[Self::DECODER].view_as::<Ix4>()?;
        let bias = self.params[Self::DECODER_BIAS].view_as::<Ix3>()?;
        let [nx, ny, nz] = self.shape;
        let flat = decoder
            .to_shape((self.latent_dim, nx * ny * nz))
            .map_err(|_| Error::shape("decoder", &[self.latent_dim, nx * ny * nz], decoder.shape()))?;
        let pre = latent.dot(&flat);
        let batch = latent.nrows();
        Ok(Array4::from_shape_fn((batch, nx, ny, nz), |(b, x, y, z)| {
            sigmoid(pre[[b, (x * ny + y) * nz + z]] + bias[[x, y, z]])
        }))
    }
}

impl Autoencoder for DenseAutoencoder {
    fn latent_dim(&self) -> usize {
        self.latent_dim
    }

    fn forward(&self, field: &Array4<f32>) -> Result<Encoded> {
        self.check_field(field)?;
        let (_, latent) = self.encode(field)?;
        let reconstruction = self.decode(&latent)?;
        Ok(Encoded {
            reconstruction,
            latent,
        })
    }

    fn backward(
        &mut self,
        field: &Array4<f32>,
        grad_reconstruction: &Array4<f32>,
        grad_latent: &Array2<f32>,
    ) -> Result<()> {
        self.check_field(field)?;
        let (features, latent) = self.encode(field)?;
        let recon = self.decode(&latent)?;
        if grad_reconstruction.shape() != recon.shape() {
            return Err(Error::shape(
                "reconstruction gradient",
                recon.shape(),
                grad_reconstruction.shape(),
            ));
        }
        if grad_latent.shape() != latent.shape() {
            return Err(Error::shape("latent gradient", latent.shape(), grad_latent.shape()));
        }

        let [nx, ny, nz] = self.shape;
        let voxels = nx * ny * nz;
        let batch = latent.nrows();
        let g_pre = Zip::from(grad_reconstruction)
            .and(&recon)
            .map_collect(|&g, &s| g * s * (1.0 - s));
        let g_pre_flat = g_pre
            .to_shape((batch, voxels))
            .map_err(|_| Error::shape("reconstruction gradient", &[batch, voxels], g_pre.shape()))?;

        let g_decoder = latent.t().dot(&g_pre_flat);
        let g_decoder_bias = g_pre.sum_axis(Axis(0));

        let decoder = self.params[Self::DECODER].view_as::<Ix4>()?;
        let flat = decoder
            .to_shape((self.latent_dim, voxels))
            .map_err(|_| Error::shape("decoder", &[self.latent_dim, voxels], decoder.shape()))?;
        let g_z = g_pre_flat.dot(&flat.t()) + grad_latent;
        let g_zpre = Zip::from(&g_z)
            .and(&latent)
            .map_collect(|&g, &z| g * z * (1.0 - z));
        let g_encoder = g_zpre.t().dot(&features);
        let g_encoder_bias = g_zpre.sum_axis(Axis(0));

        let g_decoder = g_decoder
            .into_shape_with_order((self.latent_dim, nx, ny, nz))
            .map_err(|_| Error::shape("decoder gradient", &[self.latent_dim, nx, ny, nz], &[]))?;

        self.params[Self::ENCODER].accumulate(&g_encoder.into_dyn())?;
        self.params[Self::ENCODER_BIAS].accumulate(&g_encoder_bias.into_dyn())?;
        self.params[Self::DECODER].accumulate(&g_decoder.into_dyn())?;
        self.params[Self::DECODER_BIAS].accumulate(&g_decoder_bias.into_dyn())
    }

    fn parameters(&self) -> &[Parameter] {
        &self.params
    }

    fn parameters_mut(&mut self) -> &mut [Parameter] {
        &mut self.params
    }
}
