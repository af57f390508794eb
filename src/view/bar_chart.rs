use std::collections::BTreeMap;
use std::sync::Arc;

use super::transition::Transition;
use super::LinkedView;
use crate::data::model::{count_origins, CarDataset, Selection};
use crate::scale::{BandScale, LinearScale};

/// Horizontal bars, one per origin, sized by the number of selected cars.
#[derive(Debug, Clone)]
pub struct BarChart {
    x: LinearScale,
    y: BandScale,
    /// Keyed by origin; every origin of the band domain always has a bar.
    bars: BTreeMap<String, Transition>,
    duration: f64,
}

impl BarChart {
    /// Scales come from the full dataset: `x` spans `[0, largest origin count]`
    /// (rounded up), `y` bands the sorted origins. The bars then grow from
    /// zero to the full counts.
    pub fn new(dataset: &Arc<CarDataset>, size: [f64; 2], duration: f64, now: f64) -> Self {
        let max_count = dataset.origin_counts().values().copied().max().unwrap_or(0);
        let x = LinearScale::new((0.0, max_count.max(1) as f64), (0.0, size[0])).nice();
        let keys: Vec<String> = dataset.origins.iter().cloned().collect();
        let y = BandScale::new(keys, (0.0, size[1]), 0.2);
        let bars = dataset
            .origins
            .iter()
            .map(|o| (o.clone(), Transition::settled(0.0)))
            .collect();

        let mut chart = Self {
            x,
            y,
            bars,
            duration,
        };
        chart.update(&Selection::full(dataset), now);
        chart
    }

    pub fn x_scale(&self) -> &LinearScale {
        &self.x
    }

    pub fn y_scale(&self) -> &BandScale {
        &self.y
    }

    /// Target count per origin (what the bars are heading to).
    pub fn counts(&self) -> BTreeMap<&str, usize> {
        self.bars
            .iter()
            .map(|(origin, bar)| (origin.as_str(), bar.target().round() as usize))
            .collect()
    }

    /// Displayed count per origin at `now`, in band order.
    pub fn displayed_at(&self, now: f64) -> Vec<(&str, f64)> {
        self.bars
            .iter()
            .map(|(origin, bar)| (origin.as_str(), bar.value_at(now)))
            .collect()
    }
}

impl LinkedView for BarChart {
    fn update(&mut self, selection: &Selection, now: f64) {
        let counts = count_origins(selection.cars());
        for (origin, bar) in self.bars.iter_mut() {
            let target = counts.get(origin.as_str()).copied().unwrap_or(0) as f64;
            if bar.target() != target {
                bar.retarget(target, now, self.duration);
            }
        }
    }

    fn is_animating(&self, now: f64) -> bool {
        self.bars.values().any(|b| b.is_running(now))
    }
}
