use ndarray_rand::rand::Rng;
use ndarray_rand::rand_distr::{Distribution, Normal, Uniform};

use crate::activation::Activation;

/// Weight distribution for one layer, chosen from the consuming layer's
/// activation function and its fan-in/fan-out.
pub enum WeightInit {
    /// `N(0, sqrt(2 / fan_in))`.
    HeNormal(Normal<f64>),
    /// `U(-sqrt(6 / (fan_in + fan_out)), sqrt(6 / (fan_in + fan_out)))`.
    XavierUniform(Uniform<f64>),
}

impl WeightInit {
    /// Sigmoid layers get Xavier-uniform weights; every other activation gets
    /// He-normal.
    pub fn for_layer(activation: Activation, fan_in: usize, fan_out: usize) -> Self {
        match activation {
            Activation::Sigmoid => {
                let limit = (6.0 / (fan_in + fan_out) as f64).sqrt();
                Self::XavierUniform(Uniform::new(-limit, limit))
            }
            _ => {
                let std_dev = (2.0 / fan_in as f64).sqrt();
                Self::HeNormal(Normal::new(0.0, std_dev).unwrap())
            }
        }
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        match self {
            Self::HeNormal(normal) => normal.sample(rng),
            Self::XavierUniform(uniform) => uniform.sample(rng),
        }
    }
}

/// Initial bias, uniform in `[0, 0.05)`.
pub fn initial_bias<R: Rng>(rng: &mut R) -> f64 {
    Uniform::new(0.0, 0.05).sample(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray_rand::rand::rngs::StdRng;
    use ndarray_rand::rand::SeedableRng;

    #[test]
    fn bias_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let bias = initial_bias(&mut rng);
            assert!((0.0..0.05).contains(&bias));
        }
    }

    #[test]
    fn xavier_weights_stay_within_limit() {
        let mut rng = StdRng::seed_from_u64(7);
        let init = WeightInit::for_layer(Activation::Sigmoid, 4, 6);
        let limit = (6.0 / 10.0f64).sqrt();
        for _ in 0..1000 {
            let weight = init.sample(&mut rng);
            assert!(weight.abs() < limit);
        }
    }

    #[test]
    fn he_weights_follow_fan_in_scale() {
        let mut rng = StdRng::seed_from_u64(7);
        let init = WeightInit::for_layer(Activation::ReLU, 50, 10);
        let samples = (0..5000).map(|_| init.sample(&mut rng)).collect::<Vec<_>>();
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        let variance =
            samples.iter().map(|w| (w - mean).powi(2)).sum::<f64>() / samples.len() as f64;
        assert!(mean.abs() < 0.02);
        // Expected variance is 2 / fan_in = 0.04.
        assert!((variance - 0.04).abs() < 0.01);
    }
}
