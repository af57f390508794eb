use std::collections::BTreeMap;
use std::sync::Arc;

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::coordinator::Coordinator;
use crate::data::model::CarDataset;

// ---------------------------------------------------------------------------
// Dashboard state
// ---------------------------------------------------------------------------

/// Everything the UI reads and drives, independent of rendering.
pub struct DashboardState {
    /// Name of the loaded file, for the top bar.
    pub source: String,

    /// Loaded dataset, shared read-only with every view.
    pub dataset: Arc<CarDataset>,

    /// Origin colours, fixed for the session.
    pub color_map: ColorMap,

    /// Views and the brush relay between them.
    pub coordinator: Coordinator,

    pub config: DashboardConfig,

    /// Car under the pointer in the scatterplot.
    pub hovered: Option<usize>,
}

impl DashboardState {
    /// Build the colour map and every view over the full dataset.
    pub fn new(source: String, dataset: Arc<CarDataset>, config: DashboardConfig, now: f64) -> Self {
        let color_map = ColorMap::new(&dataset.origins);
        let coordinator = Coordinator::new(&dataset, &config, now);
        Self {
            source,
            dataset,
            color_map,
            coordinator,
            config,
            hovered: None,
        }
    }

    /// `(origin, total, selected)` rows for the legend.
    pub fn origin_summary(&self) -> Vec<(String, usize, usize)> {
        let totals = self.dataset.origin_counts();
        let selected: BTreeMap<&str, usize> = self.coordinator.bar_chart().counts();
        totals
            .into_iter()
            .map(|(origin, total)| {
                let sel = selected.get(origin).copied().unwrap_or(0);
                (origin.to_string(), total, sel)
            })
            .collect()
    }

    pub fn hovered_name(&self) -> Option<&str> {
        let car = self.dataset.cars.get(self.hovered?)?;
        Some(car.name.as_deref().unwrap_or("(unnamed)"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::five_cars;

    fn state() -> DashboardState {
        DashboardState::new("cars.csv".into(), five_cars(), DashboardConfig::default(), 0.0)
    }

    #[test]
    fn summary_lists_every_origin_with_selected_counts() {
        let mut st = state();
        assert_eq!(
            st.origin_summary(),
            vec![
                ("Europe".to_string(), 1, 1),
                ("Japan".to_string(), 2, 2),
                ("USA".to_string(), 2, 2)
            ]
        );

        st.coordinator.press([0.0, 0.0], 1.0);
        st.coordinator.release([250.0, 50.0], 1.0);
        let japan_only: Vec<usize> = st.origin_summary().iter().map(|r| r.2).collect();
        assert_eq!(japan_only, vec![0, 2, 0]);
    }

    #[test]
    fn colours_cover_every_origin() {
        let st = state();
        assert_eq!(st.color_map.len(), st.dataset.origins.len());
    }

    #[test]
    fn hovered_name_falls_back_for_unnamed_cars() {
        let mut st = state();
        assert_eq!(st.hovered_name(), None);
        st.hovered = Some(0);
        assert_eq!(st.hovered_name(), Some("(unnamed)"));
    }
}
