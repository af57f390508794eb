use std::sync::Arc;

use crate::config::DashboardConfig;
use crate::data::model::{CarDataset, Selection};
use crate::view::bar_chart::BarChart;
use crate::view::histogram::Histogram;
use crate::view::scatter::Scatterplot;
use crate::view::{LinkedView, SelectionObserver};

// ---------------------------------------------------------------------------
// Linked views: everything redrawn when the scatterplot's selection changes
// ---------------------------------------------------------------------------

/// The bar chart and histograms, updated together.
#[derive(Debug, Clone)]
pub struct LinkedViews {
    pub bar_chart: BarChart,
    pub histograms: Vec<Histogram>,
}

impl LinkedViews {
    fn views(&self) -> impl Iterator<Item = &dyn LinkedView> + '_ {
        std::iter::once(&self.bar_chart as &dyn LinkedView)
            .chain(self.histograms.iter().map(|h| h as &dyn LinkedView))
    }

    fn views_mut(&mut self) -> impl Iterator<Item = &mut dyn LinkedView> + '_ {
        std::iter::once(&mut self.bar_chart as &mut dyn LinkedView)
            .chain(self.histograms.iter_mut().map(|h| h as &mut dyn LinkedView))
    }
}

impl SelectionObserver for LinkedViews {
    fn selection_changed(&mut self, selection: &Selection, now: f64) {
        for view in self.views_mut() {
            view.update(selection, now);
        }
    }
}

// ---------------------------------------------------------------------------
// Coordinator
// ---------------------------------------------------------------------------

/// Whether a brush currently restricts the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterState {
    Unfiltered,
    Filtered,
}

/// Relays brush interaction on the scatterplot to the linked views.
///
/// Holds no selection of its own: the filter state and the selection are
/// read from the scatterplot, and every change it reports is fanned out to
/// the linked views before the call returns.
#[derive(Debug, Clone)]
pub struct Coordinator {
    scatter: Scatterplot,
    linked: LinkedViews,
}

impl Coordinator {
    /// Build every view over the full dataset.
    pub fn new(dataset: &Arc<CarDataset>, config: &DashboardConfig, now: f64) -> Self {
        let duration = config.transition.as_secs_f64();
        let bar_chart = BarChart::new(dataset, config.bar_chart_size, duration, now);
        let histograms = config
            .histogram_fields
            .iter()
            .map(|&field| Histogram::new(dataset, field, config.histogram_size, duration, now))
            .collect();
        let scatter = Scatterplot::new(
            dataset,
            config.scatter_x,
            config.scatter_y,
            config.scatter_size,
        );

        Self {
            scatter,
            linked: LinkedViews {
                bar_chart,
                histograms,
            },
        }
    }

    pub fn scatter(&self) -> &Scatterplot {
        &self.scatter
    }

    pub fn bar_chart(&self) -> &BarChart {
        &self.linked.bar_chart
    }

    pub fn histograms(&self) -> &[Histogram] {
        &self.linked.histograms
    }

    pub fn selection(&self) -> &Selection {
        self.scatter.selection()
    }

    pub fn state(&self) -> FilterState {
        match self.scatter.brush().rect() {
            Some(_) => FilterState::Filtered,
            None => FilterState::Unfiltered,
        }
    }

    pub fn is_animating(&self, now: f64) -> bool {
        self.linked.views().any(|v| v.is_animating(now))
    }

    // -- brush gestures, positions in scatterplot view coordinates --

    pub fn press(&mut self, pos: [f64; 2], now: f64) {
        self.scatter.press(pos, now, &mut self.linked);
    }

    pub fn drag_to(&mut self, pos: [f64; 2], now: f64) {
        self.scatter.drag_to(pos, now, &mut self.linked);
    }

    pub fn release(&mut self, pos: [f64; 2], now: f64) {
        self.scatter.release(pos, now, &mut self.linked);
    }

    pub fn clear_brush(&mut self, now: f64) {
        self.scatter.clear_brush(now, &mut self.linked);
    }
}
