//! Multi-octave value noise over a seeded lattice.

use rand::Rng;

use crate::error::{MapError, Result};

pub struct NoiseField {
    width: usize,
    height: usize,
    lattice: Vec<f64>,
}

impl NoiseField {
    /// Seeds a `width * height` lattice with uniform draws in `[0, 1)`.
    pub fn seeded<R: Rng + ?Sized>(width: usize, height: usize, rng: &mut R) -> Self {
        let lattice = (0..width * height).map(|_| rng.gen::<f64>()).collect();
        NoiseField { width, height, lattice }
    }

    /// Uses explicit lattice values, row-major.
    pub fn from_lattice(width: usize, height: usize, lattice: Vec<f64>) -> Result<Self> {
        if lattice.len() != width * height {
            return Err(MapError::validation(
                "lattice",
                format!("expected {} seeds, got {}", width * height, lattice.len()),
            ));
        }
        Ok(NoiseField { width, height, lattice })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Generates a `width * height` row-major noise field.
    ///
    /// Octave `n` samples the lattice every `lattice_width / 2^n` cells; each
    /// octave's weight is the previous one divided by `scaling_bias`. The sum is
    /// normalized by the total weight so the output stays within the lattice
    /// value range.
    pub fn generate(&self, width: usize, height: usize, num_octaves: u32, scaling_bias: f64) -> Result<Vec<f64>> {
        if num_octaves == 0 {
            return Err(MapError::validation("num_octaves", "must be greater than zero"));
        }
        if scaling_bias <= 0.0 || !scaling_bias.is_finite() {
            return Err(MapError::validation(
                "scaling_bias",
                format!("must be a positive number, got {scaling_bias}"),
            ));
        }
        if width > self.width || height > self.height {
            return Err(MapError::validation(
                "dimensions",
                format!(
                    "{}x{} output exceeds the {}x{} lattice",
                    width, height, self.width, self.height
                ),
            ));
        }

        let mut result = vec![0.0; width * height];
        for x in 0..width {
            for y in 0..height {
                let mut noise = 0.0;
                let mut scale_acc = 0.0;
                let mut scale = 1.0;

                for octave in 0..num_octaves {
                    // Deep octaves would shrink the pitch to zero on small lattices.
                    let pitch = self.width.checked_shr(octave).unwrap_or(0).max(1);

                    let px1 = (x / pitch) * pitch;
                    let py1 = (y / pitch) * pitch;
                    let px2 = (px1 + pitch) % width;
                    let py2 = (py1 + pitch) % height;

                    let blend_x = (x - px1) as f64 / pitch as f64;
                    let blend_y = (y - py1) as f64 / pitch as f64;

                    let seed = |px: usize, py: usize| self.lattice[py * width + px];
                    let a = (1.0 - blend_x) * seed(px1, py1) + blend_x * seed(px2, py1);
                    let b = (1.0 - blend_x) * seed(px1, py2) + blend_x * seed(px2, py2);

                    noise += (blend_y * (b - a) + a) * scale;
                    scale_acc += scale;
                    scale /= scaling_bias;
                }

                result[width * y + x] = noise / scale_acc;
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn ramp_lattice() -> NoiseField {
        let seeds = (0..16).map(|i| (i + 1) as f64 / 17.0).collect();
        NoiseField::from_lattice(4, 4, seeds).unwrap()
    }

    #[test]
    fn test_single_octave_hits_lattice_corner() {
        let field = ramp_lattice();
        let noise = field.generate(4, 4, 1, 1.0).unwrap();
        assert_eq!(noise[0], 1.0 / 17.0);
        assert_eq!(noise.len(), 16);
    }

    #[test]
    fn test_single_octave_is_bilinear() {
        // pitch 4 on a 4-wide lattice: every cell blends from corner (0, 0),
        // and the wrapped neighbours are (0, 0) as well.
        let seeds = vec![
            0.2, 0.9, 0.9, 0.9, //
            0.9, 0.9, 0.9, 0.9, //
            0.9, 0.9, 0.9, 0.9, //
            0.9, 0.9, 0.9, 0.9,
        ];
        let field = NoiseField::from_lattice(4, 4, seeds).unwrap();
        let noise = field.generate(4, 4, 1, 1.0).unwrap();
        assert!(noise.iter().all(|&v| (v - 0.2).abs() < 1e-12));
    }

    #[test]
    fn test_two_octaves_weighted_by_bias() {
        // Octave 0 (pitch 4) gives s0 everywhere; octave 1 (pitch 2) at (1, 0)
        // blends s0 and s2 halfway. Weights are 1 and 1/2.
        let mut seeds = vec![0.0; 16];
        seeds[0] = 0.4;
        seeds[2] = 0.8;
        let field = NoiseField::from_lattice(4, 4, seeds).unwrap();
        let noise = field.generate(4, 4, 2, 2.0).unwrap();
        let octave0 = 0.4;
        let octave1 = 0.5 * 0.4 + 0.5 * 0.8;
        let expected = (octave0 * 1.0 + octave1 * 0.5) / 1.5;
        assert!((noise[1] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_deterministic_for_same_lattice() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let field = NoiseField::seeded(16, 16, &mut rng);
        let a = field.generate(16, 16, 4, 2.0).unwrap();
        let b = field.generate(16, 16, 4, 2.0).unwrap();
        assert_eq!(a, b);
        assert!(a.iter().all(|&v| (0.0..1.0).contains(&v)));
    }

    #[test]
    fn test_many_octaves_on_small_lattice() {
        let field = ramp_lattice();
        let noise = field.generate(4, 4, 8, 2.0).unwrap();
        assert!(noise.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_rejects_bad_arguments() {
        let field = ramp_lattice();
        assert!(matches!(
            field.generate(4, 4, 0, 2.0),
            Err(MapError::Validation { field: "num_octaves", .. })
        ));
        assert!(matches!(
            field.generate(4, 4, 1, 0.0),
            Err(MapError::Validation { field: "scaling_bias", .. })
        ));
        assert!(field.generate(4, 4, 1, -1.0).is_err());
        assert!(field.generate(4, 4, 1, f64::NAN).is_err());
        assert!(matches!(
            field.generate(5, 4, 1, 2.0),
            Err(MapError::Validation { field: "dimensions", .. })
        ));
        assert!(NoiseField::from_lattice(2, 2, vec![0.5; 3]).is_err());
    }

    #[test]
    fn test_seeded_lattice_dimensions() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let field = NoiseField::seeded(6, 5, &mut rng);
        assert_eq!((field.width(), field.height()), (6, 5));
        let noise = field.generate(field.width(), field.height(), 2, 2.0).unwrap();
        assert_eq!(noise.len(), 30);
    }

    #[test]
    fn test_zero_sized_output_is_empty() {
        let field = ramp_lattice();
        assert!(field.generate(0, 4, 1, 2.0).unwrap().is_empty());
    }
}
