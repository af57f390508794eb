/// Chart views and the contracts linking them.
///
/// ```text
///   Scatterplot ──brush──▶ Selection ──selection_changed──▶ SelectionObserver
///                                                              │
///                                     ┌────────────────────────┴──────┐
///                                     ▼                               ▼
///                              BarChart::update              Histogram::update (×N)
/// ```
///
/// Every view fixes its scales from the full dataset at construction; an
/// update only moves the marks.
pub mod bar_chart;
pub mod brush;
pub mod histogram;
pub mod scatter;
pub mod transition;

use crate::data::model::Selection;

/// A view redrawn over whatever selection the scatterplot currently holds.
pub trait LinkedView {
    /// Retarget the marks to `selection`. `now` is the UI clock in seconds.
    fn update(&mut self, selection: &Selection, now: f64);

    /// Whether any mark is still moving at `now`.
    fn is_animating(&self, now: f64) -> bool;
}

/// Receiver of the scatterplot's selection-changed notifications.
pub trait SelectionObserver {
    fn selection_changed(&mut self, selection: &Selection, now: f64);
}
