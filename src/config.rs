use std::time::Duration;

use eframe::egui::Color32;

use crate::data::model::NumericField;

/// Data file read when none is given on the command line.
pub const DEFAULT_DATA_FILE: &str = "cars.csv";

/// Base width the chart sizes derive from.
const BASE_WIDTH: f64 = 900.0;

/// Layout, field choice and timing of the dashboard.
///
/// Sizes are in view units: the extent each view's scales map onto. The
/// on-screen plots stretch that extent to the space egui gives them.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub window_size: [f32; 2],
    pub bar_chart_size: [f64; 2],
    pub histogram_size: [f64; 2],
    pub scatter_size: f64,
    pub histogram_fields: Vec<NumericField>,
    pub scatter_x: NumericField,
    pub scatter_y: NumericField,
    /// How long a mark takes to reach a new value.
    pub transition: Duration,
    pub point_radius: f32,
    /// Hover labels appear within this distance (view units) of a point.
    pub hover_radius: f64,
    pub background_bar: Color32,
    pub selected_bar: Color32,
    pub brush_stroke: Color32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let scatter_square = BASE_WIDTH * 0.45;
        let histogram_fields = vec![
            NumericField::Cylinders,
            NumericField::Displacement,
            NumericField::Horsepower,
            NumericField::Acceleration,
        ];
        let n = histogram_fields.len() as f64;

        Self {
            window_size: [1280.0, 860.0],
            bar_chart_size: [scatter_square, 50.0],
            histogram_size: [BASE_WIDTH * 0.33, scatter_square / n - 6.0 * n],
            scatter_size: 400.0,
            histogram_fields,
            scatter_x: NumericField::WeightInLbs,
            scatter_y: NumericField::MilesPerGallon,
            transition: Duration::from_millis(200),
            point_radius: 3.0,
            hover_radius: 6.0,
            // lightgray / steelblue
            background_bar: Color32::from_rgb(0xd3, 0xd3, 0xd3),
            selected_bar: Color32::from_rgb(0x46, 0x82, 0xb4),
            brush_stroke: Color32::from_rgb(0x77, 0x77, 0x77),
        }
    }
}
