//! Inheritance: midpoint crossover, per-gene mutation and color blending.

use super::{Color, Genome};
use rand::Rng;

/// Build a child genome: the first `len / 2` genes come from `parent1`, the
/// rest from `parent2`; then each gene is independently replaced by a fresh
/// uniform value with probability `mutation_rate`.
///
/// Random draws: one per gene, plus one more for every gene that mutates.
pub fn recombine<R: Rng>(
    parent1: &Genome,
    parent2: &Genome,
    mutation_rate: f32,
    rng: &mut R,
) -> Genome {
    let split = parent1.len() / 2;
    let mut genes: Vec<f32> = parent1.genes()[..split]
        .iter()
        .chain(parent2.genes().iter().skip(split))
        .copied()
        .collect();

    for gene in &mut genes {
        if rng.gen::<f32>() < mutation_rate {
            *gene = rng.gen::<f32>();
        }
    }

    Genome::new(genes)
}

/// Child color: channel-wise average of the parents, each channel jittered by
/// a uniform integer in `[-jitter, jitter]` and clamped. If either parent
/// color is not RGB, one parent's color is picked at random unchanged.
pub fn inherit_color<R: Rng>(parent1: &Color, parent2: &Color, jitter: i16, rng: &mut R) -> Color {
    match (parent1.rgb(), parent2.rgb()) {
        (Some(c1), Some(c2)) => {
            let mut blend = |a: u8, b: u8| {
                let mean = (a as i32 + b as i32) / 2;
                let offset = rng.gen_range(-jitter..=jitter) as i32;
                (mean + offset).clamp(0, 255) as u8
            };
            let r = blend(c1.0, c2.0);
            let g = blend(c1.1, c2.1);
            let b = blend(c1.2, c2.2);
            Color::Rgb(r, g, b)
        }
        _ => {
            if rng.gen_bool(0.5) {
                parent1.clone()
            } else {
                parent2.clone()
            }
        }
    }
}
