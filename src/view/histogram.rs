use std::sync::Arc;

use super::transition::Transition;
use super::LinkedView;
use crate::data::bin::{Bin, BinScheme};
use crate::data::model::{CarDataset, NumericField, Selection};
use crate::scale::LinearScale;

/// Distribution of one numeric field: fixed bins, full-data counts as a
/// backdrop, animated counts for the current selection on top.
#[derive(Debug, Clone)]
pub struct Histogram {
    field: NumericField,
    x: LinearScale,
    y: LinearScale,
    scheme: BinScheme,
    bins: Vec<Bin>,
    background: Vec<usize>,
    bars: Vec<Transition>,
    duration: f64,
}

impl Histogram {
    pub fn new(
        dataset: &Arc<CarDataset>,
        field: NumericField,
        size: [f64; 2],
        duration: f64,
        now: f64,
    ) -> Self {
        // A constant (or absent) field still gets a unit-wide axis.
        let extent = match dataset.extent(field) {
            Some((lo, hi)) if lo < hi => (lo, hi),
            Some((v, _)) => (v - 0.5, v + 0.5),
            None => (-0.5, 0.5),
        };
        let x = LinearScale::new(extent, (0.0, size[0])).nice();
        let scheme = BinScheme::sturges(x.domain(), dataset.len());
        let bins = scheme.bins();
        let background = scheme.counts(dataset.cars.iter().map(|c| field.value(c)));
        let max_count = background.iter().copied().max().unwrap_or(0);
        let y = LinearScale::new((0.0, max_count.max(1) as f64), (size[1], 0.0)).nice();
        let bars = vec![Transition::settled(0.0); bins.len()];

        let mut histogram = Self {
            field,
            x,
            y,
            scheme,
            bins,
            background,
            bars,
            duration,
        };
        histogram.update(&Selection::full(dataset), now);
        histogram
    }

    pub fn field(&self) -> NumericField {
        self.field
    }

    pub fn x_scale(&self) -> &LinearScale {
        &self.x
    }

    pub fn y_scale(&self) -> &LinearScale {
        &self.y
    }

    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    /// Per-bin counts over the full dataset.
    pub fn background(&self) -> &[usize] {
        &self.background
    }

    /// Per-bin target counts for the current selection.
    pub fn bin_counts(&self) -> Vec<usize> {
        self.bars
            .iter()
            .map(|b| b.target().round() as usize)
            .collect()
    }

    pub fn displayed_at(&self, now: f64) -> Vec<f64> {
        self.bars.iter().map(|b| b.value_at(now)).collect()
    }
}

impl LinkedView for Histogram {
    fn update(&mut self, selection: &Selection, now: f64) {
        let counts = self
            .scheme
            .counts(selection.cars().map(|c| self.field.value(c)));
        for (bar, count) in self.bars.iter_mut().zip(counts) {
            let target = count as f64;
            if bar.target() != target {
                bar.retarget(target, now, self.duration);
            }
        }
    }

    fn is_animating(&self, now: f64) -> bool {
        self.bars.iter().any(|b| b.is_running(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::five_cars;
    use crate::data::model::Car;

    fn histogram(ds: &Arc<CarDataset>, field: NumericField) -> Histogram {
        Histogram::new(ds, field, [297.0, 77.0], 0.25, 0.0)
    }

    #[test]
    fn starts_with_the_full_distribution() {
        let ds = five_cars();
        let h = histogram(&ds, NumericField::WeightInLbs);
        assert_eq!(h.x_scale().domain(), (2000.0, 4000.0));
        assert_eq!(h.bin_counts(), h.background());
        assert_eq!(h.bin_counts().iter().sum::<usize>(), 5);
        assert_eq!(h.bins().first().unwrap().x0, 2000.0);
        assert_eq!(h.bins().last().unwrap().x1, 4000.0);
    }

    #[test]
    fn bins_stay_fixed_while_counts_change() {
        let ds = five_cars();
        let mut h = histogram(&ds, NumericField::WeightInLbs);
        let bins = h.bins().to_vec();
        let background = h.background().to_vec();
        let y = *h.y_scale();

        h.update(&Selection::filter(&ds, |c| c.origin == "Japan"), 1.0);
        assert_eq!(h.bins(), bins.as_slice());
        assert_eq!(h.background(), background.as_slice());
        assert_eq!(*h.y_scale(), y);
        assert_eq!(h.bin_counts().iter().sum::<usize>(), 2);
        assert_eq!(h.bin_counts()[0], 2);
    }

    #[test]
    fn last_update_alone_determines_the_counts() {
        let ds = five_cars();
        let mut h = histogram(&ds, NumericField::MilesPerGallon);
        h.update(&Selection::filter(&ds, |c| c.origin == "USA"), 1.0);
        h.update(&Selection::filter(&ds, |c| c.origin == "Europe"), 1.1);
        let direct = {
            let mut fresh = histogram(&ds, NumericField::MilesPerGallon);
            fresh.update(&Selection::filter(&ds, |c| c.origin == "Europe"), 1.0);
            fresh.bin_counts()
        };
        assert_eq!(h.bin_counts(), direct);
        let settled = h.displayed_at(10.0);
        assert_eq!(settled.iter().sum::<f64>(), 1.0);
    }

    #[test]
    fn empty_selection_renders_zero_bars() {
        let ds = five_cars();
        let mut h = histogram(&ds, NumericField::Horsepower);
        h.update(&Selection::filter(&ds, |_| false), 1.0);
        assert!(h.bin_counts().iter().all(|&c| c == 0));
        assert!(h.displayed_at(2.0).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn constant_field_spans_a_unit_domain() {
        // every car in five_cars() has 4 cylinders
        let ds = five_cars();
        let h = histogram(&ds, NumericField::Cylinders);
        assert_eq!(h.x_scale().domain(), (3.5, 4.5));
        assert_eq!(h.background().iter().sum::<usize>(), 5);
        assert_eq!(h.background().iter().filter(|&&n| n > 0).count(), 1);
        let x = h.x_scale();
        assert!(h.bins().iter().all(|b| x.apply(b.x1) - x.apply(b.x0) > 1.0));
    }

    #[test]
    fn empty_dataset_draws_bars_from_the_baseline() {
        let ds = Arc::new(CarDataset::from_cars(Vec::<Car>::new()));
        let h = histogram(&ds, NumericField::Acceleration);
        assert!(h.bin_counts().iter().all(|&c| c == 0));
        assert_eq!(h.y_scale().apply(0.0), 77.0);
        assert!(h.x_scale().apply(0.5) > h.x_scale().apply(-0.5));
    }
}
