use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

/// Column holding the categorical origin of each car.
pub const ORIGIN_COLUMN: &str = "Origin";

/// Optional column with the car model name (hover labels only).
pub const NAME_COLUMN: &str = "Name";

// ---------------------------------------------------------------------------
// NumericField – the numeric columns a view can be built over
// ---------------------------------------------------------------------------

/// One of the numeric columns of the cars table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NumericField {
    MilesPerGallon,
    Cylinders,
    Displacement,
    Horsepower,
    WeightInLbs,
    Acceleration,
}

impl NumericField {
    pub const ALL: [NumericField; 6] = [
        NumericField::MilesPerGallon,
        NumericField::Cylinders,
        NumericField::Displacement,
        NumericField::Horsepower,
        NumericField::WeightInLbs,
        NumericField::Acceleration,
    ];

    /// Column name as it appears in the header / schema.
    pub fn column(self) -> &'static str {
        match self {
            NumericField::MilesPerGallon => "Miles_per_Gallon",
            NumericField::Cylinders => "Cylinders",
            NumericField::Displacement => "Displacement",
            NumericField::Horsepower => "Horsepower",
            NumericField::WeightInLbs => "Weight_in_lbs",
            NumericField::Acceleration => "Acceleration",
        }
    }

    /// Short axis label.
    pub fn label(self) -> &'static str {
        match self {
            NumericField::MilesPerGallon => "MPG",
            NumericField::WeightInLbs => "Weight (lbs)",
            other => other.column(),
        }
    }

    pub fn value(self, car: &Car) -> f64 {
        match self {
            NumericField::MilesPerGallon => car.miles_per_gallon,
            NumericField::Cylinders => car.cylinders,
            NumericField::Displacement => car.displacement,
            NumericField::Horsepower => car.horsepower,
            NumericField::WeightInLbs => car.weight_in_lbs,
            NumericField::Acceleration => car.acceleration,
        }
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

// ---------------------------------------------------------------------------
// Car – one row of the table
// ---------------------------------------------------------------------------

/// A complete record: every numeric field and the origin are present.
#[derive(Debug, Clone, PartialEq)]
pub struct Car {
    pub name: Option<String>,
    pub origin: String,
    pub miles_per_gallon: f64,
    pub cylinders: f64,
    pub displacement: f64,
    pub horsepower: f64,
    pub weight_in_lbs: f64,
    pub acceleration: f64,
}

// ---------------------------------------------------------------------------
// CarDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset. Immutable once built; views share it via `Arc`.
#[derive(Debug, Clone, Default)]
pub struct CarDataset {
    pub cars: Vec<Car>,
    /// Sorted distinct origins.
    pub origins: BTreeSet<String>,
}

impl CarDataset {
    pub fn from_cars(cars: Vec<Car>) -> Self {
        let origins = cars.iter().map(|c| c.origin.clone()).collect();
        CarDataset { cars, origins }
    }

    pub fn len(&self) -> usize {
        self.cars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }

    /// `(min, max)` of a field, `None` for an empty dataset.
    pub fn extent(&self, field: NumericField) -> Option<(f64, f64)> {
        self.cars.iter().map(|c| field.value(c)).fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    /// Number of cars per origin.
    pub fn origin_counts(&self) -> BTreeMap<&str, usize> {
        count_origins(self.cars.iter())
    }
}

pub fn count_origins<'a>(cars: impl Iterator<Item = &'a Car>) -> BTreeMap<&'a str, usize> {
    let mut counts = BTreeMap::new();
    for car in cars {
        *counts.entry(car.origin.as_str()).or_insert(0) += 1;
    }
    counts
}

// ---------------------------------------------------------------------------
// Selection – a filtered view over the base dataset
// ---------------------------------------------------------------------------

/// Indices of the cars passing the active filter, over a shared dataset.
///
/// A selection never copies records; it is recomputed from the base dataset
/// whenever the filter changes.
#[derive(Debug, Clone)]
pub struct Selection {
    dataset: Arc<CarDataset>,
    indices: Vec<usize>,
}

impl Selection {
    /// Every record of the dataset.
    pub fn full(dataset: &Arc<CarDataset>) -> Self {
        Selection {
            dataset: Arc::clone(dataset),
            indices: (0..dataset.len()).collect(),
        }
    }

    /// Records of `dataset` satisfying `predicate`, in dataset order.
    pub fn filter(dataset: &Arc<CarDataset>, predicate: impl Fn(&Car) -> bool) -> Self {
        let indices = dataset
            .cars
            .iter()
            .enumerate()
            .filter(|(_, car)| predicate(car))
            .map(|(i, _)| i)
            .collect();
        Selection {
            dataset: Arc::clone(dataset),
            indices,
        }
    }

    pub fn dataset(&self) -> &Arc<CarDataset> {
        &self.dataset
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn cars(&self) -> impl Iterator<Item = &Car> + '_ {
        self.indices.iter().map(|&i| &self.dataset.cars[i])
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.binary_search(&index).is_ok()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.indices.len() == self.dataset.len()
    }
}

impl PartialEq for Selection {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.dataset, &other.dataset) && self.indices == other.indices
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn car(origin: &str, weight: f64, mpg: f64) -> Car {
        Car {
            name: None,
            origin: origin.to_string(),
            miles_per_gallon: mpg,
            cylinders: 4.0,
            displacement: 120.0,
            horsepower: 90.0,
            weight_in_lbs: weight,
            acceleration: 15.0,
        }
    }

    /// Five cars: two from the USA (heavy, thirsty), two from Japan
    /// (light, efficient) and one from Europe (in between).
    pub(crate) fn five_cars() -> Arc<CarDataset> {
        Arc::new(CarDataset::from_cars(vec![
            car("USA", 4000.0, 15.0),
            car("USA", 3800.0, 17.0),
            car("Japan", 2000.0, 35.0),
            car("Europe", 3000.0, 25.0),
            car("Japan", 2100.0, 33.0),
        ]))
    }

    #[test]
    fn origins_are_sorted_and_distinct() {
        let ds = five_cars();
        let origins: Vec<&str> = ds.origins.iter().map(String::as_str).collect();
        assert_eq!(origins, ["Europe", "Japan", "USA"]);
    }

    #[test]
    fn origin_counts_cover_every_record() {
        let ds = five_cars();
        let counts = ds.origin_counts();
        assert_eq!(counts["USA"], 2);
        assert_eq!(counts["Japan"], 2);
        assert_eq!(counts["Europe"], 1);
    }

    #[test]
    fn extent_of_field() {
        let ds = five_cars();
        assert_eq!(ds.extent(NumericField::WeightInLbs), Some((2000.0, 4000.0)));
        assert_eq!(CarDataset::default().extent(NumericField::Horsepower), None);
    }

    #[test]
    fn selection_is_a_view_over_the_dataset() {
        let ds = five_cars();
        let japan = Selection::filter(&ds, |c| c.origin == "Japan");
        assert_eq!(japan.indices(), &[2, 4]);
        assert!(japan.contains(4));
        assert!(!japan.contains(0));
        assert!(Arc::ptr_eq(japan.dataset(), &ds));
        assert!(Selection::full(&ds).is_full());
        assert!(!japan.is_full());
    }

    #[test]
    fn selections_over_different_datasets_differ() {
        let a = five_cars();
        let b = five_cars();
        assert_ne!(Selection::full(&a), Selection::full(&b));
        assert_eq!(Selection::full(&a), Selection::full(&a));
    }
}
