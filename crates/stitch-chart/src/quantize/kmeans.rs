//! Weighted Lloyd clustering in RGB space.
//!
//! Samples are distinct colors carrying pixel counts as weights, which gives
//! the same clusters as running over every pixel while touching far fewer
//! points. Centers are seeded with k-means++ from a fixed-seed RNG.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::color::Rgb;

/// Samples handed to one rayon task during the assignment step.
const CHUNK_SIZE: usize = 4096;

type Center = [f64; 3];

/// Deduplicated samples: each distinct color with the number of pixels
/// carrying it.
#[derive(Debug, Default)]
pub(crate) struct Samples {
    pub colors: Vec<Rgb>,
    pub weights: Vec<u64>,
}

impl Samples {
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Result of a clustering run.
#[derive(Debug)]
pub(crate) struct Clustering {
    /// Rounded center color per cluster
    pub colors: Vec<Rgb>,
    /// Cluster index per sample
    pub assignments: Vec<usize>,
    /// Lloyd iterations performed
    pub iterations: usize,
}

/// Integer running sums for one cluster.
///
/// Integer accumulation keeps the reduce order irrelevant, so the parallel
/// assignment step is bit-identical to a sequential one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ClusterSum {
    r: u64,
    g: u64,
    b: u64,
    weight: u64,
}

impl ClusterSum {
    #[inline]
    fn add(&mut self, color: Rgb, weight: u64) {
        self.r += color.r as u64 * weight;
        self.g += color.g as u64 * weight;
        self.b += color.b as u64 * weight;
        self.weight += weight;
    }

    #[inline]
    fn merge(&mut self, other: &ClusterSum) {
        self.r += other.r;
        self.g += other.g;
        self.b += other.b;
        self.weight += other.weight;
    }

    fn mean(&self) -> Option<Center> {
        if self.weight == 0 {
            return None;
        }
        let w = self.weight as f64;
        Some([self.r as f64 / w, self.g as f64 / w, self.b as f64 / w])
    }

    /// Mean rounded half-up to whole channel values.
    fn rounded(&self) -> Option<Rgb> {
        let w = self.weight;
        if w == 0 {
            return None;
        }
        let round = |sum: u64| ((2 * sum + w) / (2 * w)) as u8;
        Some(Rgb::new(round(self.r), round(self.g), round(self.b)))
    }
}

/// Cluster `samples` into at most `k` groups.
///
/// When there are no more distinct colors than `k`, every color is its own
/// cluster and no iteration happens.
pub(crate) fn run(samples: &Samples, k: usize, seed: u64, max_iterations: usize) -> Clustering {
    let n = samples.len();
    if n <= k {
        return Clustering {
            colors: samples.colors.clone(),
            assignments: (0..n).collect(),
            iterations: 0,
        };
    }

    let mut centers = init_centers(samples, k, seed);
    let mut assignments = vec![usize::MAX; n];
    let mut sums = Vec::new();
    let mut iterations = 0;
    let mut converged = false;

    while iterations < max_iterations {
        let (next, next_sums) = assign(samples, &centers);
        iterations += 1;
        converged = next == assignments;
        assignments = next;
        sums = next_sums;
        if converged {
            break;
        }
        for (center, sum) in centers.iter_mut().zip(&sums) {
            // Empty clusters keep their previous center
            if let Some(mean) = sum.mean() {
                *center = mean;
            }
        }
    }

    if !converged {
        // Capped: pair the final centers with a matching assignment
        let (last, last_sums) = assign(samples, &centers);
        assignments = last;
        sums = last_sums;
    }

    let colors = sums
        .iter()
        .zip(&centers)
        .map(|(sum, center)| sum.rounded().unwrap_or_else(|| round_center(center)))
        .collect();

    Clustering {
        colors,
        assignments,
        iterations,
    }
}

/// k-means++ seeding: the first center is drawn by weight, each further one
/// with probability proportional to weight times squared distance to the
/// nearest chosen center.
///
/// Seed centers are always sample colors, so scores are exact integers.
fn init_centers(samples: &Samples, k: usize, seed: u64) -> Vec<Center> {
    let mut rng = StdRng::seed_from_u64(seed);

    let total: u64 = samples.weights.iter().sum();
    let first = samples.colors[pick_weighted(&samples.weights, rng.gen_range(0..total))];
    let mut chosen = vec![first];

    let mut nearest: Vec<u32> = samples
        .colors
        .iter()
        .map(|&color| color.distance_squared(first))
        .collect();

    while chosen.len() < k {
        let scores: Vec<u64> = nearest
            .iter()
            .zip(&samples.weights)
            .map(|(&d, &w)| d as u64 * w)
            .collect();
        let total_score: u64 = scores.iter().sum();
        if total_score == 0 {
            // Every sample already sits on a center
            break;
        }

        let center = samples.colors[pick_weighted(&scores, rng.gen_range(0..total_score))];
        for (d, &color) in nearest.iter_mut().zip(&samples.colors) {
            *d = (*d).min(color.distance_squared(center));
        }
        chosen.push(center);
    }

    chosen.into_iter().map(to_center).collect()
}

/// Index of the first sample whose cumulative weight exceeds `target`.
fn pick_weighted(weights: &[u64], target: u64) -> usize {
    let mut cumulative = 0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w;
        if cumulative > target {
            return i;
        }
    }
    weights.len() - 1
}

/// Assign every sample to its nearest center and accumulate per-cluster sums.
///
/// Chunks are processed in parallel; each worker returns partial sums which
/// are all folded here before the caller moves any center.
fn assign(samples: &Samples, centers: &[Center]) -> (Vec<usize>, Vec<ClusterSum>) {
    let partials: Vec<(Vec<usize>, Vec<ClusterSum>)> = samples
        .colors
        .par_chunks(CHUNK_SIZE)
        .zip(samples.weights.par_chunks(CHUNK_SIZE))
        .map(|(colors, weights)| {
            let mut sums = vec![ClusterSum::default(); centers.len()];
            let labels: Vec<usize> = colors
                .iter()
                .zip(weights)
                .map(|(&color, &weight)| {
                    let idx = nearest_center(color, centers);
                    sums[idx].add(color, weight);
                    idx
                })
                .collect();
            (labels, sums)
        })
        .collect();

    let mut assignments = Vec::with_capacity(samples.len());
    let mut sums = vec![ClusterSum::default(); centers.len()];
    for (labels, partial) in partials {
        assignments.extend(labels);
        for (sum, part) in sums.iter_mut().zip(&partial) {
            sum.merge(part);
        }
    }
    (assignments, sums)
}

/// Nearest center by squared distance; ties go to the lowest index.
#[inline]
fn nearest_center(color: Rgb, centers: &[Center]) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (i, center) in centers.iter().enumerate() {
        let d = distance_squared(color, center);
        if d < best_distance {
            best = i;
            best_distance = d;
        }
    }
    best
}

#[inline]
fn distance_squared(color: Rgb, center: &Center) -> f64 {
    let dr = color.r as f64 - center[0];
    let dg = color.g as f64 - center[1];
    let db = color.b as f64 - center[2];
    dr * dr + dg * dg + db * db
}

#[inline]
fn to_center(color: Rgb) -> Center {
    [color.r as f64, color.g as f64, color.b as f64]
}

fn round_center(center: &Center) -> Rgb {
    let round = |v: f64| v.round().clamp(0.0, 255.0) as u8;
    Rgb::new(round(center[0]), round(center[1]), round(center[2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(entries: &[(Rgb, u64)]) -> Samples {
        Samples {
            colors: entries.iter().map(|&(c, _)| c).collect(),
            weights: entries.iter().map(|&(_, w)| w).collect(),
        }
    }

    #[test]
    fn test_few_colors_are_kept_verbatim() {
        let s = samples(&[(Rgb::new(1, 2, 3), 5), (Rgb::new(9, 9, 9), 1)]);
        let result = run(&s, 4, 42, 64);
        assert_eq!(result.colors, s.colors);
        assert_eq!(result.assignments, vec![0, 1]);
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn test_separates_two_groups() {
        let s = samples(&[
            (Rgb::new(0, 0, 0), 1),
            (Rgb::new(2, 2, 2), 1),
            (Rgb::new(250, 250, 250), 1),
            (Rgb::new(252, 252, 252), 1),
        ]);
        let result = run(&s, 2, 42, 64);

        assert_eq!(result.assignments[0], result.assignments[1]);
        assert_eq!(result.assignments[2], result.assignments[3]);
        assert_ne!(result.assignments[0], result.assignments[2]);

        let dark = result.colors[result.assignments[0]];
        let light = result.colors[result.assignments[2]];
        assert_eq!(dark, Rgb::new(1, 1, 1));
        assert_eq!(light, Rgb::new(251, 251, 251));
    }

    #[test]
    fn test_weights_pull_the_center() {
        let s = samples(&[
            (Rgb::new(0, 0, 0), 3),
            (Rgb::new(4, 0, 0), 1),
            (Rgb::new(255, 255, 255), 1),
        ]);
        let result = run(&s, 2, 1, 64);
        let dark = result.colors[result.assignments[0]];
        assert_eq!(dark, Rgb::new(1, 0, 0));
    }

    #[test]
    fn test_same_seed_same_result() {
        let entries: Vec<(Rgb, u64)> = (0..200u32)
            .map(|i| {
                let v = (i * 37 % 256) as u8;
                (Rgb::new(v, (i % 256) as u8, 255 - v), (i % 5 + 1) as u64)
            })
            .collect();
        let s = samples(&entries);

        let a = run(&s, 6, 99, 64);
        let b = run(&s, 6, 99, 64);
        assert_eq!(a.colors, b.colors);
        assert_eq!(a.assignments, b.assignments);
    }

    #[test]
    fn test_zero_iterations_still_assigns() {
        let s = samples(&[
            (Rgb::new(0, 0, 0), 1),
            (Rgb::new(10, 10, 10), 1),
            (Rgb::new(200, 200, 200), 1),
        ]);
        let result = run(&s, 2, 42, 0);
        assert_eq!(result.iterations, 0);
        assert!(result.assignments.iter().all(|&a| a < 2));
    }

    #[test]
    fn test_seeding_picks_distinct_sample_colors() {
        let s = samples(&[
            (Rgb::new(0, 0, 0), 10),
            (Rgb::new(1, 0, 0), 1),
            (Rgb::new(255, 255, 255), 1),
        ]);
        let centers = init_centers(&s, 3, 7);

        assert_eq!(centers.len(), 3);
        for center in &centers {
            let color = round_center(center);
            assert!(s.colors.contains(&color), "{color} is not a sample");
        }
        let mut rounded: Vec<Rgb> = centers.iter().map(round_center).collect();
        rounded.sort();
        rounded.dedup();
        assert_eq!(rounded.len(), 3);
    }

    #[test]
    fn test_seeding_stops_when_samples_are_covered() {
        let s = samples(&[(Rgb::new(5, 5, 5), 2), (Rgb::new(9, 9, 9), 3)]);
        assert_eq!(init_centers(&s, 4, 0).len(), 2);
    }

    #[test]
    fn test_rounding_is_half_up() {
        let mut sum = ClusterSum::default();
        sum.add(Rgb::new(0, 0, 0), 1);
        sum.add(Rgb::new(1, 3, 255), 1);
        assert_eq!(sum.rounded(), Some(Rgb::new(1, 2, 128)));
        assert_eq!(ClusterSum::default().rounded(), None);
    }

    #[test]
    fn test_parallel_chunks_match_single_chunk() {
        let entries: Vec<(Rgb, u64)> = (0..(CHUNK_SIZE as u32 * 2 + 17))
            .map(|i| {
                let v = i.to_le_bytes();
                (Rgb::new(v[0], v[1], v[0] ^ v[1]), 1)
            })
            .collect();
        let s = samples(&entries);
        let centers = vec![[0.0, 0.0, 0.0], [128.0, 128.0, 128.0], [255.0, 0.0, 255.0]];

        let (assignments, sums) = assign(&s, &centers);

        let mut expected = vec![ClusterSum::default(); centers.len()];
        for (&color, &weight) in s.colors.iter().zip(&s.weights) {
            let idx = nearest_center(color, &centers);
            expected[idx].add(color, weight);
        }
        assert_eq!(assignments.len(), s.len());
        assert_eq!(sums, expected);
    }
}
