use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use eframe::egui::{Align2, Pos2, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, GridMark, Plot, PlotBounds, PlotPoint, PlotPoints, Points, Polygon, Text,
};

use crate::color::translucent;
use crate::scale::LinearScale;
use crate::state::DashboardState;

// ---------------------------------------------------------------------------
// View coordinates ↔ plot coordinates
// ---------------------------------------------------------------------------
//
// Views work top-down (y grows downwards, like the screen); egui_plot has y
// growing upwards. Every plot below spans exactly its view's extent.

fn to_plot(height: f64, p: [f64; 2]) -> [f64; 2] {
    [p[0], height - p[1]]
}

fn from_plot(height: f64, p: PlotPoint) -> [f64; 2] {
    [p.x, height - p.y]
}

/// Tick label in the style of a plain numeric axis: no trailing zeros.
pub fn format_tick(value: f64) -> String {
    let s = format!("{value:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Grid marks at the data ticks of `scale`, placed with `place`.
fn tick_marks(ticks: &[f64], place: impl Fn(f64) -> f64) -> Vec<GridMark> {
    let positions: Vec<f64> = ticks.iter().map(|&t| place(t)).collect();
    let step = match positions.as_slice() {
        [a, b, ..] => (b - a).abs(),
        _ => 1.0,
    };
    positions
        .into_iter()
        .map(|value| GridMark {
            value,
            step_size: step,
        })
        .collect()
}

fn x_label(scale: LinearScale) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark: GridMark, _range: &RangeInclusive<f64>| format_tick(scale.invert(mark.value))
}

fn y_label(scale: LinearScale, height: f64) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark: GridMark, _range: &RangeInclusive<f64>| {
        format_tick(scale.invert(height - mark.value))
    }
}

// ---------------------------------------------------------------------------
// Bar chart (origin counts)
// ---------------------------------------------------------------------------

pub fn bar_chart(ui: &mut Ui, state: &DashboardState, now: f64, plot_height: f32) {
    let chart = state.coordinator.bar_chart();
    let x = *chart.x_scale();
    let band = chart.y_scale().clone();
    let [width, height] = state.config.bar_chart_size;

    let bars: Vec<Bar> = chart
        .displayed_at(now)
        .into_iter()
        .filter_map(|(origin, count)| {
            let center = band.center(origin)?;
            Some(
                Bar::new(height - center, x.apply(count))
                    .width(band.bandwidth())
                    .fill(state.color_map.color_for(origin))
                    .name(format!("{origin}: {count:.0}")),
            )
        })
        .collect();

    let x_marks = tick_marks(&x.ticks(10), |t| x.apply(t));
    let y_marks: Vec<GridMark> = band
        .keys()
        .iter()
        .filter_map(|k| band.center(k))
        .map(|c| GridMark {
            value: height - c,
            step_size: band.bandwidth(),
        })
        .collect();
    let labels = band.clone();

    Plot::new("bar_chart")
        .height(plot_height)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .allow_double_click_reset(false)
        .show_x(false)
        .show_y(false)
        .y_axis_label("Origin")
        .x_grid_spacer(move |_input| x_marks.clone())
        .x_axis_formatter(x_label(x))
        .y_grid_spacer(move |_input| y_marks.clone())
        .y_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            labels
                .keys()
                .iter()
                .find(|k| {
                    labels
                        .center(k)
                        .is_some_and(|c| (height - c - mark.value).abs() < 1e-6)
                })
                .cloned()
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.set_plot_bounds(PlotBounds::from_min_max([0.0, 0.0], [width, height]));
            plot_ui.bar_chart(BarChart::new(bars).horizontal());
        });
}

// ---------------------------------------------------------------------------
// Histogram (one numeric field)
// ---------------------------------------------------------------------------

pub fn histogram(ui: &mut Ui, state: &DashboardState, index: usize, now: f64, plot_height: f32) {
    let Some(hist) = state.coordinator.histograms().get(index) else {
        return;
    };
    let x = *hist.x_scale();
    let y = *hist.y_scale();
    let [width, height] = state.config.histogram_size;

    let bar = |x0: f64, x1: f64, count: f64| {
        let (left, right) = (x.apply(x0), x.apply(x1));
        Bar::new((left + right) / 2.0, height - y.apply(count)).width((right - left - 1.0).max(0.5))
    };
    let background: Vec<Bar> = hist
        .bins()
        .iter()
        .zip(hist.background())
        .map(|(b, &n)| bar(b.x0, b.x1, n as f64).fill(state.config.background_bar))
        .collect();
    let selected: Vec<Bar> = hist
        .bins()
        .iter()
        .zip(hist.displayed_at(now))
        .map(|(b, n)| bar(b.x0, b.x1, n).fill(state.config.selected_bar))
        .collect();

    let x_marks = tick_marks(&x.ticks(10), |t| x.apply(t));
    let y_marks = tick_marks(&y.ticks(3), |t| height - y.apply(t));

    Plot::new(("histogram", hist.field()))
        .height(plot_height)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .allow_double_click_reset(false)
        .show_x(false)
        .show_y(false)
        .x_axis_label(hist.field().label())
        .x_grid_spacer(move |_input| x_marks.clone())
        .x_axis_formatter(x_label(x))
        .y_grid_spacer(move |_input| y_marks.clone())
        .y_axis_formatter(y_label(y, height))
        .show(ui, |plot_ui| {
            plot_ui.set_plot_bounds(PlotBounds::from_min_max([0.0, 0.0], [width, height]));
            plot_ui.bar_chart(BarChart::new(background));
            plot_ui.bar_chart(BarChart::new(selected));
        });
}

// ---------------------------------------------------------------------------
// Scatterplot (brush source)
// ---------------------------------------------------------------------------

/// Draw the scatterplot and feed pointer gestures to the brush.
pub fn scatterplot(ui: &mut Ui, state: &mut DashboardState, now: f64, plot_height: f32) {
    let scatter = state.coordinator.scatter();
    let size = state.config.scatter_size;
    let x = *scatter.x_scale();
    let y = *scatter.y_scale();
    let (x_field, y_field) = scatter.fields();

    let mut by_origin: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for (car, p) in state.dataset.cars.iter().zip(scatter.positions()) {
        by_origin
            .entry(car.origin.as_str())
            .or_default()
            .push(to_plot(size, p));
    }

    let brush = scatter.brush().rect().map(|r| {
        vec![
            to_plot(size, [r.left, r.top]),
            to_plot(size, [r.right, r.top]),
            to_plot(size, [r.right, r.bottom]),
            to_plot(size, [r.left, r.bottom]),
        ]
    });
    let hover_label = state.hovered.and_then(|i| {
        let p = scatter.positions().nth(i)?;
        Some((to_plot(size, p), state.hovered_name()?.to_string()))
    });

    let x_marks = tick_marks(&x.ticks(10), |t| x.apply(t));
    let y_marks = tick_marks(&y.ticks(10), |t| size - y.apply(t));
    let stroke = state.config.brush_stroke;
    let radius = state.config.point_radius;

    let response = Plot::new("scatterplot")
        .height(plot_height)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .allow_double_click_reset(false)
        .show_x(false)
        .show_y(false)
        .x_axis_label(x_field.label())
        .y_axis_label(y_field.label())
        .x_grid_spacer(move |_input| x_marks.clone())
        .x_axis_formatter(x_label(x))
        .y_grid_spacer(move |_input| y_marks.clone())
        .y_axis_formatter(y_label(y, size))
        .show(ui, |plot_ui| {
            plot_ui.set_plot_bounds(PlotBounds::from_min_max([0.0, 0.0], [size, size]));
            for (origin, points) in by_origin {
                plot_ui.points(
                    Points::new(points)
                        .radius(radius)
                        .color(state.color_map.color_for(origin))
                        .name(origin),
                );
            }
            if let Some(corners) = brush {
                plot_ui.polygon(
                    Polygon::new(PlotPoints::new(corners))
                        .fill_color(translucent(stroke, 0.2))
                        .stroke(Stroke::new(1.0, stroke)),
                );
            }
            if let Some(([px, py], name)) = hover_label {
                plot_ui.text(
                    Text::new(PlotPoint::new(px + 4.0, py + 4.0), name).anchor(Align2::LEFT_BOTTOM),
                );
            }
        });

    let transform = response.transform;
    let view_pos = |pos: Pos2| from_plot(size, transform.value_from_position(pos));
    handle_brush(ui, &response.response, state, now, &view_pos);

    state.hovered = response
        .response
        .hover_pos()
        .filter(|_| !state.coordinator.scatter().brush().is_dragging())
        .and_then(|pos| state.coordinator.scatter().nearest(view_pos(pos), state.config.hover_radius));
}

fn handle_brush(
    ui: &Ui,
    response: &eframe::egui::Response,
    state: &mut DashboardState,
    now: f64,
    view_pos: &dyn Fn(Pos2) -> [f64; 2],
) {
    let coordinator = &mut state.coordinator;
    if response.drag_started() {
        // egui reports the drag once the pointer has travelled; start the
        // gesture where the button went down.
        if let Some(origin) = ui.input(|i| i.pointer.press_origin()) {
            coordinator.press(view_pos(origin), now);
        }
    }
    if let Some(pos) = response.interact_pointer_pos() {
        if response.dragged() {
            coordinator.drag_to(view_pos(pos), now);
        }
        if response.drag_stopped() {
            coordinator.release(view_pos(pos), now);
        } else if response.clicked() {
            coordinator.press(view_pos(pos), now);
            coordinator.release(view_pos(pos), now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_labels_drop_trailing_zeros() {
        assert_eq!(format_tick(50.0), "50");
        assert_eq!(format_tick(2.5), "2.5");
        assert_eq!(format_tick(0.30000000000000004), "0.3");
        assert_eq!(format_tick(-0.0001), "0");
        assert_eq!(format_tick(1500.0), "1500");
    }

    #[test]
    fn plot_coordinates_flip_y() {
        assert_eq!(to_plot(400.0, [10.0, 0.0]), [10.0, 400.0]);
        assert_eq!(from_plot(400.0, PlotPoint::new(10.0, 400.0)), [10.0, 0.0]);
    }

    #[test]
    fn tick_marks_carry_their_spacing() {
        let scale = LinearScale::new((0.0, 50.0), (0.0, 400.0));
        let marks = tick_marks(&scale.ticks(5), |t| scale.apply(t));
        assert_eq!(marks.len(), 6);
        assert_eq!(marks[1].value, 80.0);
        assert!(marks.iter().all(|m| m.step_size == 80.0));
    }
}
