use crate::foundation::error::{LeafError, LeafResult};
use crate::foundation::math::dist_sq3;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Termination criteria and restarts for [`kmeans`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KMeansOpts {
    /// Iteration cap per attempt.
    pub max_iter: u32,
    /// Stop once no centre moves further than this.
    pub epsilon: f32,
    /// Independent random initialisations; the most compact result wins.
    pub attempts: u32,
    pub seed: u64,
}

impl Default for KMeansOpts {
    fn default() -> Self {
        Self {
            max_iter: 200,
            epsilon: 0.1,
            attempts: 10,
            seed: 0x1eaf_c010,
        }
    }
}

/// Result of a clustering run.
#[derive(Clone, Debug, PartialEq)]
pub struct Clustering {
    pub centers: Vec<[f32; 3]>,
    /// Cluster index per input sample.
    pub labels: Vec<usize>,
    /// Sum of squared distances from each sample to its centre.
    pub compactness: f64,
}

impl Clustering {
    /// Samples per cluster.
    pub fn counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.centers.len()];
        for &l in &self.labels {
            counts[l] += 1;
        }
        counts
    }

    /// Index of the most populated cluster; ties go to the lower index.
    pub fn largest(&self) -> Option<usize> {
        let counts = self.counts();
        let max = *counts.iter().max()?;
        counts.iter().position(|&c| c == max)
    }

    pub fn largest_center(&self) -> Option<[f32; 3]> {
        self.largest().map(|i| self.centers[i])
    }
}

/// Lloyd's k-means over colour samples with random initial centres.
///
/// `k` is clamped to the number of samples. Deterministic for a given `opts.seed`.
pub fn kmeans(samples: &[[f32; 3]], k: usize, opts: &KMeansOpts) -> LeafResult<Clustering> {
    if samples.is_empty() {
        return Err(LeafError::validation("k-means needs at least one sample"));
    }
    if k == 0 {
        return Err(LeafError::validation("k-means needs k > 0"));
    }
    let k = k.min(samples.len());
    let eps_sq = opts.epsilon * opts.epsilon;
    let mut rng = StdRng::seed_from_u64(opts.seed);

    let mut best: Option<Clustering> = None;
    for _ in 0..opts.attempts.max(1) {
        let mut centers: Vec<[f32; 3]> = rand::seq::index::sample(&mut rng, samples.len(), k)
            .into_iter()
            .map(|i| samples[i])
            .collect();
        let mut labels = vec![0usize; samples.len()];

        for _ in 0..opts.max_iter.max(1) {
            assign(samples, &centers, &mut labels);
            let next = recenter(samples, &labels, &centers);
            let shift = centers
                .iter()
                .zip(&next)
                .map(|(a, b)| dist_sq3(*a, *b))
                .fold(0.0f32, f32::max);
            centers = next;
            if shift <= eps_sq {
                break;
            }
        }
        assign(samples, &centers, &mut labels);

        let compactness = samples
            .iter()
            .zip(&labels)
            .map(|(s, &l)| f64::from(dist_sq3(*s, centers[l])))
            .sum();
        if best.as_ref().is_none_or(|b| compactness < b.compactness) {
            best = Some(Clustering {
                centers,
                labels,
                compactness,
            });
        }
    }

    best.ok_or_else(|| LeafError::validation("k-means produced no clustering"))
}

/// Index of the centre closest to `s`.
pub(crate) fn nearest(s: [f32; 3], centers: &[[f32; 3]]) -> usize {
    let mut best = 0;
    let mut best_d = f32::INFINITY;
    for (i, c) in centers.iter().enumerate() {
        let d = dist_sq3(s, *c);
        if d < best_d {
            best_d = d;
            best = i;
        }
    }
    best
}

/// Distance from `s` to the closest centre.
pub(crate) fn nearest_dist(s: [f32; 3], centers: &[[f32; 3]]) -> f32 {
    centers
        .iter()
        .map(|c| dist_sq3(s, *c))
        .fold(f32::INFINITY, f32::min)
}

fn assign(samples: &[[f32; 3]], centers: &[[f32; 3]], labels: &mut [usize]) {
    for (s, l) in samples.iter().zip(labels.iter_mut()) {
        *l = nearest(*s, centers);
    }
}

// Empty clusters keep their previous centre.
fn recenter(samples: &[[f32; 3]], labels: &[usize], prev: &[[f32; 3]]) -> Vec<[f32; 3]> {
    let mut sums = vec![[0.0f64; 3]; prev.len()];
    let mut counts = vec![0u64; prev.len()];
    for (s, &l) in samples.iter().zip(labels) {
        for c in 0..3 {
            sums[l][c] += f64::from(s[c]);
        }
        counts[l] += 1;
    }
    prev.iter()
        .zip(sums.iter().zip(&counts))
        .map(|(p, (sum, &n))| {
            if n == 0 {
                *p
            } else {
                let n = n as f64;
                [
                    (sum[0] / n) as f32,
                    (sum[1] / n) as f32,
                    (sum[2] / n) as f32,
                ]
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/vision/kmeans.rs"]
mod tests;
