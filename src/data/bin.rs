use crate::scale;

/// Half-open interval `[x0, x1)`; the last bin of a scheme also holds `x1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub x0: f64,
    pub x1: f64,
}

impl Bin {
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn center(&self) -> f64 {
        (self.x0 + self.x1) / 2.0
    }
}

/// A fixed partition of a numeric domain into contiguous bins.
///
/// Built once per histogram; only the counts over it change afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct BinScheme {
    domain: (f64, f64),
    /// Interior boundaries, strictly inside the domain, ascending.
    thresholds: Vec<f64>,
}

/// Sturges' rule: `ceil(log2(n)) + 1` bins, at least one.
pub fn sturges(n: usize) -> usize {
    if n <= 1 {
        return 1;
    }
    (n as f64).log2().ceil() as usize + 1
}

impl BinScheme {
    /// About `count` bins with round boundaries over `domain`.
    pub fn with_count(domain: (f64, f64), count: usize) -> Self {
        let (x0, x1) = domain;
        let thresholds = scale::ticks(x0, x1, count)
            .into_iter()
            .filter(|&t| t > x0 && t < x1)
            .collect();
        Self { domain, thresholds }
    }

    /// Bin count chosen by Sturges' rule for `sample_size` values.
    pub fn sturges(domain: (f64, f64), sample_size: usize) -> Self {
        Self::with_count(domain, sturges(sample_size))
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn len(&self) -> usize {
        self.thresholds.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn bins(&self) -> Vec<Bin> {
        let (x0, x1) = self.domain;
        let mut edges = Vec::with_capacity(self.thresholds.len() + 2);
        edges.push(x0);
        edges.extend_from_slice(&self.thresholds);
        edges.push(x1);
        edges
            .windows(2)
            .map(|w| Bin { x0: w[0], x1: w[1] })
            .collect()
    }

    /// Index of the bin holding `value`; `None` outside the domain.
    pub fn bin_of(&self, value: f64) -> Option<usize> {
        let (x0, x1) = self.domain;
        if !(x0..=x1).contains(&value) {
            return None;
        }
        Some(self.thresholds.partition_point(|&t| t <= value))
    }

    /// Number of values falling in each bin.
    pub fn counts(&self, values: impl IntoIterator<Item = f64>) -> Vec<usize> {
        let mut counts = vec![0; self.len()];
        for value in values {
            if let Some(i) = self.bin_of(value) {
                counts[i] += 1;
            }
        }
        counts
    }
}
