use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::{Context, Result};

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Slowly decaying background typical of amorphous scatter plus air.
fn background(two_theta: f64) -> f64 {
    400.0 * (-two_theta / 35.0).exp() + 80.0 + 600.0 * gaussian(two_theta, 22.0, 6.0, 1.0)
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let mut rng = SimpleRng::new(42);

    // 2theta: 10 → 80 deg, step 0.02
    let angles: Vec<f64> = (0..3501).map(|i| 10.0 + i as f64 * 0.02).collect();

    // (position, width, height) of the Bragg reflections
    let reflections = [
        (28.44, 0.08, 1800.0),
        (47.30, 0.10, 1100.0),
        (56.12, 0.11, 650.0),
        (69.13, 0.13, 260.0),
        (76.38, 0.14, 380.0),
    ];

    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_pattern.txt".to_string());
    let file = File::create(&output_path)
        .with_context(|| format!("creating {output_path}"))?;
    let mut out = BufWriter::new(file);

    // 12-line header, matching the loader's default skip count
    writeln!(out, "# synthetic powder diffraction pattern")?;
    writeln!(out, "# generator: generate_sample")?;
    writeln!(out, "# radiation: Cu K-alpha, 1.5406 A")?;
    writeln!(out, "# start: 10.00 deg")?;
    writeln!(out, "# stop: 80.00 deg")?;
    writeln!(out, "# step: 0.02 deg")?;
    writeln!(out, "# points: {}", angles.len())?;
    writeln!(out, "# reflections: {}", reflections.len())?;
    writeln!(out, "# noise: poisson-like, seed 42")?;
    writeln!(out, "#")?;
    writeln!(out, "# columns:")?;
    writeln!(out, "2theta intensity")?;

    for &tt in &angles {
        let signal: f64 = reflections
            .iter()
            .map(|&(mu, sigma, amp)| gaussian(tt, mu, sigma, amp))
            .sum();
        let mean = background(tt) + signal;
        let counts = (mean + rng.gauss(0.0, mean.sqrt())).max(0.0);
        writeln!(out, "{tt:.2} {counts:.1}")?;
    }
    out.flush()?;

    log::info!("Wrote {} points to {output_path}", angles.len());
    println!("Wrote {} points to {output_path}", angles.len());
    Ok(())
}
