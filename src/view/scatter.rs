use std::sync::Arc;

use super::brush::{Brush, BrushEvent, BrushRect};
use super::SelectionObserver;
use crate::data::model::{CarDataset, NumericField, Selection};
use crate::scale::LinearScale;

/// Brushable scatterplot; the owner of the active selection.
///
/// Positions handed to the brush methods are in the plot's top-down view
/// coordinates, `[0, size] × [0, size]`.
#[derive(Debug, Clone)]
pub struct Scatterplot {
    dataset: Arc<CarDataset>,
    x_field: NumericField,
    y_field: NumericField,
    x: LinearScale,
    y: LinearScale,
    brush: Brush,
    selection: Selection,
}

impl Scatterplot {
    /// Both axes start at zero and end at the field maximum, rounded up.
    pub fn new(
        dataset: &Arc<CarDataset>,
        x_field: NumericField,
        y_field: NumericField,
        size: f64,
    ) -> Self {
        let max = |f: NumericField| dataset.extent(f).map_or(0.0, |(_, hi)| hi);
        let x = LinearScale::new((0.0, max(x_field)), (0.0, size)).nice();
        let y = LinearScale::new((0.0, max(y_field)), (size, 0.0)).nice();
        Self {
            dataset: Arc::clone(dataset),
            x_field,
            y_field,
            x,
            y,
            brush: Brush::new(BrushRect::from_corners([0.0, 0.0], [size, size])),
            selection: Selection::full(dataset),
        }
    }

    pub fn fields(&self) -> (NumericField, NumericField) {
        (self.x_field, self.y_field)
    }

    pub fn x_scale(&self) -> &LinearScale {
        &self.x
    }

    pub fn y_scale(&self) -> &LinearScale {
        &self.y
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    /// The selection currently shown by the brush (everything when unbrushed).
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// View position of every car, in dataset order.
    pub fn positions(&self) -> impl Iterator<Item = [f64; 2]> + '_ {
        self.dataset.cars.iter().map(|c| {
            [
                self.x.apply(self.x_field.value(c)),
                self.y.apply(self.y_field.value(c)),
            ]
        })
    }

    /// Cars whose view position lies inside `rect`; all cars for `None`.
    pub fn select(&self, rect: Option<BrushRect>) -> Selection {
        match rect {
            None => Selection::full(&self.dataset),
            Some(r) => Selection::filter(&self.dataset, |c| {
                r.contains(
                    self.x.apply(self.x_field.value(c)),
                    self.y.apply(self.y_field.value(c)),
                )
            }),
        }
    }

    /// Index of the car nearest to `pos`, if one lies within `radius`.
    pub fn nearest(&self, pos: [f64; 2], radius: f64) -> Option<usize> {
        self.positions()
            .enumerate()
            .map(|(i, p)| (i, (p[0] - pos[0]).hypot(p[1] - pos[1])))
            .filter(|&(_, d)| d <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    pub fn press(&mut self, pos: [f64; 2], now: f64, observer: &mut dyn SelectionObserver) {
        let event = self.brush.press(pos);
        self.apply(event, now, observer);
    }

    pub fn drag_to(&mut self, pos: [f64; 2], now: f64, observer: &mut dyn SelectionObserver) {
        let event = self.brush.drag_to(pos);
        self.apply(event, now, observer);
    }

    pub fn release(&mut self, pos: [f64; 2], now: f64, observer: &mut dyn SelectionObserver) {
        let event = self.brush.release(pos);
        self.apply(event, now, observer);
    }

    pub fn clear_brush(&mut self, now: f64, observer: &mut dyn SelectionObserver) {
        let event = self.brush.clear();
        self.apply(event, now, observer);
    }

    fn apply(&mut self, event: Option<BrushEvent>, now: f64, observer: &mut dyn SelectionObserver) {
        let Some(event) = event else {
            return;
        };
        self.selection = self.select(event.rect());
        log::debug!(
            "Brush {:?}: {} of {} cars selected",
            event,
            self.selection.len(),
            self.dataset.len()
        );
        observer.selection_changed(&self.selection, now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::five_cars;

    #[derive(Default)]
    struct Recorder {
        seen: Vec<Vec<usize>>,
    }

    impl SelectionObserver for Recorder {
        fn selection_changed(&mut self, selection: &Selection, _now: f64) {
            self.seen.push(selection.indices().to_vec());
        }
    }

    fn scatter() -> Scatterplot {
        Scatterplot::new(
            &five_cars(),
            NumericField::WeightInLbs,
            NumericField::MilesPerGallon,
            400.0,
        )
    }

    #[test]
    fn scales_start_at_zero_and_are_nice() {
        let s = scatter();
        assert_eq!(s.x_scale().domain(), (0.0, 4000.0));
        assert_eq!(s.y_scale().domain(), (0.0, 35.0));
        // light, efficient cars sit top-left
        let japan = s.positions().nth(2).unwrap();
        assert_eq!(japan, [200.0, 0.0]);
    }

    #[test]
    fn selection_is_inclusive_on_the_rectangle_edges() {
        let s = scatter();
        let exact = BrushRect::from_corners([200.0, 0.0], [215.0, 400.0]);
        assert_eq!(s.select(Some(exact)).indices(), &[2, 4]);
        let just_short = BrushRect::from_corners([200.1, 0.0], [215.0, 400.0]);
        assert_eq!(s.select(Some(just_short)).indices(), &[4]);
        assert!(s.select(None).is_full());
    }

    #[test]
    fn dragging_notifies_the_observer_each_time() {
        let mut s = scatter();
        let mut rec = Recorder::default();
        s.press([0.0, 0.0], 0.0, &mut rec);
        assert!(rec.seen.is_empty());
        s.drag_to([205.0, 400.0], 0.1, &mut rec);
        s.drag_to([250.0, 400.0], 0.2, &mut rec);
        s.release([250.0, 400.0], 0.3, &mut rec);
        assert_eq!(rec.seen, vec![vec![2], vec![2, 4]]);
        assert_eq!(s.selection().indices(), &[2, 4]);
    }

    #[test]
    fn clearing_restores_the_full_selection() {
        let mut s = scatter();
        let mut rec = Recorder::default();
        s.press([0.0, 0.0], 0.0, &mut rec);
        s.release([220.0, 400.0], 0.0, &mut rec);
        assert_eq!(s.selection().len(), 2);
        s.clear_brush(1.0, &mut rec);
        assert!(s.selection().is_full());
        assert_eq!(rec.seen.len(), 2);
        s.clear_brush(2.0, &mut rec);
        assert_eq!(rec.seen.len(), 2);
    }

    #[test]
    fn nearest_point_within_radius() {
        let s = scatter();
        assert_eq!(s.nearest([201.0, 1.0], 5.0), Some(2));
        assert_eq!(s.nearest([100.0, 100.0], 5.0), None);
    }
}
