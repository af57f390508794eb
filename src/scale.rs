//! Linear and band scales mapping data values to view coordinates.
//!
//! View coordinates are top-down (origin at the top-left of a view), like the
//! screen. Tick steps are 1, 2 or 5 times a power of ten.

// ---------------------------------------------------------------------------
// Tick arithmetic
// ---------------------------------------------------------------------------

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

/// `(i1, i2, inc)`: ticks are `i * inc` for `i` in `i1..=i2` when `inc > 0`,
/// or `i / -inc` when `inc < 0` (sub-unit steps kept exact).
fn tick_spec(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let (i1, i2, inc) = if power < 0.0 {
        let n = 10f64.powf(-power) / factor;
        let mut i1 = (start * n).round();
        let mut i2 = (stop * n).round();
        if i1 / n < start {
            i1 += 1.0;
        }
        if i2 / n > stop {
            i2 -= 1.0;
        }
        (i1, i2, -n)
    } else {
        let n = 10f64.powf(power) * factor;
        let mut i1 = (start / n).round();
        let mut i2 = (stop / n).round();
        if i1 * n < start {
            i1 += 1.0;
        }
        if i2 * n > stop {
            i2 -= 1.0;
        }
        (i1, i2, n)
    };

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

/// Signed tick increment, see [`tick_spec`].
pub fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    tick_spec(start, stop, count as f64).2
}

/// Roughly `count` round values within `[start, stop]`, ascending.
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    let (lo, hi) = if start < stop { (start, stop) } else { (stop, start) };
    let (i1, i2, inc) = tick_spec(lo, hi, count as f64);
    if !(i2 >= i1) || !inc.is_finite() {
        return Vec::new();
    }
    let n = (i2 - i1) as usize + 1;
    (0..n)
        .map(|i| {
            let k = i1 + i as f64;
            if inc < 0.0 {
                k / -inc
            } else {
                k * inc
            }
        })
        .collect()
}

/// Extend `[start, stop]` outwards to round tick values.
pub fn nice(mut start: f64, mut stop: f64, count: usize) -> (f64, f64) {
    if !(start < stop) || !start.is_finite() || !stop.is_finite() {
        return (start, stop);
    }
    let mut previous = None;
    for _ in 0..10 {
        let step = tick_increment(start, stop, count);
        if previous == Some(step) || step == 0.0 || !step.is_finite() {
            break;
        }
        if step > 0.0 {
            start = (start / step).floor() * step;
            stop = (stop / step).ceil() * step;
        } else {
            start = (start * step).ceil() / step;
            stop = (stop * step).floor() / step;
        }
        previous = Some(step);
    }
    (start, stop)
}

// ---------------------------------------------------------------------------
// LinearScale
// ---------------------------------------------------------------------------

/// Continuous mapping `domain → range`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Round the domain outwards to nice tick values (about ten ticks).
    pub fn nice(self) -> Self {
        let (d0, d1) = nice(self.domain.0, self.domain.1, 10);
        Self {
            domain: (d0, d1),
            ..self
        }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// A degenerate domain maps everything to the middle of the range.
    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    pub fn invert(&self, position: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if r1 == r0 {
            return d0;
        }
        d0 + (position - r0) / (r1 - r0) * (d1 - d0)
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks(self.domain.0, self.domain.1, count)
    }
}

// ---------------------------------------------------------------------------
// BandScale
// ---------------------------------------------------------------------------

/// Discrete mapping of ordered keys onto equal bands of a range.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    keys: Vec<String>,
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    /// `padding` is used both between bands and at the outer edges.
    pub fn new(keys: Vec<String>, range: (f64, f64), padding: f64) -> Self {
        let n = keys.len() as f64;
        let (r0, r1) = range;
        let step = (r1 - r0) / (n - padding + 2.0 * padding).max(1.0);
        let start = r0 + (r1 - r0 - step * (n - padding)) / 2.0;
        Self {
            keys,
            start,
            step,
            bandwidth: step * (1.0 - padding),
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Leading edge of the band for `key`.
    pub fn position(&self, key: &str) -> Option<f64> {
        let i = self.keys.iter().position(|k| k == key)?;
        Some(self.start + self.step * i as f64)
    }

    pub fn center(&self, key: &str) -> Option<f64> {
        self.position(key).map(|p| p + self.bandwidth / 2.0)
    }
}
