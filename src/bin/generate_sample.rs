use std::sync::Arc;

use anyhow::Context as _;
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

const CARS: usize = 406;

/// One row, with the column names the dashboard expects.
#[derive(Debug, Clone, Serialize)]
struct SampleCar {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Miles_per_Gallon")]
    miles_per_gallon: Option<f64>,
    #[serde(rename = "Cylinders")]
    cylinders: f64,
    #[serde(rename = "Displacement")]
    displacement: f64,
    #[serde(rename = "Horsepower")]
    horsepower: Option<f64>,
    #[serde(rename = "Weight_in_lbs")]
    weight_in_lbs: f64,
    #[serde(rename = "Acceleration")]
    acceleration: f64,
    #[serde(rename = "Year")]
    year: String,
    #[serde(rename = "Origin")]
    origin: String,
}

/// Per-origin shape of the fleet: (origin, share, makes, cylinder choices).
const PROFILES: [(&str, f64, &[&str], &[f64]); 3] = [
    ("USA", 0.62, &["chevrolet", "ford", "plymouth", "amc", "dodge"], &[4.0, 6.0, 8.0, 8.0]),
    ("Europe", 0.17, &["volkswagen", "peugeot", "volvo", "fiat", "audi"], &[4.0, 4.0, 4.0, 5.0, 6.0]),
    ("Japan", 0.21, &["toyota", "datsun", "honda", "mazda", "subaru"], &[3.0, 4.0, 4.0, 4.0, 6.0]),
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

fn round_to(value: f64, step: f64) -> f64 {
    (value / step).round() * step
}

fn generate_car(rng: &mut SimpleRng, index: usize) -> SampleCar {
    let roll = rng.next_f64();
    let mut acc = 0.0;
    let mut profile = &PROFILES[0];
    for p in &PROFILES {
        acc += p.1;
        if roll < acc {
            profile = p;
            break;
        }
    }
    let (origin, _, makes, cylinder_choices) = *profile;

    let cylinders = *rng.pick(cylinder_choices);
    let displacement = round_to((cylinders * 40.0 + rng.gauss(0.0, 18.0)).max(68.0), 1.0);
    let weight = round_to((1200.0 + displacement * 7.5 + rng.gauss(0.0, 250.0)).max(1600.0), 1.0);
    let horsepower = round_to((20.0 + displacement * 0.42 + rng.gauss(0.0, 10.0)).max(46.0), 1.0);
    let mpg = round_to((58.0 - weight * 0.0078 + rng.gauss(0.0, 2.5)).clamp(9.0, 46.6), 0.1);
    let acceleration = round_to((24.0 - horsepower * 0.06 + rng.gauss(0.0, 1.5)).clamp(8.0, 24.8), 0.1);
    let year = 1970 + (rng.next_u64() % 13) as u32;

    // A handful of rows lack a measurement, as in the real dataset.
    let horsepower = (index % 67 != 32).then_some(horsepower);
    let miles_per_gallon = (index % 51 != 10).then_some(mpg);

    SampleCar {
        name: format!("{} model {}", rng.pick(makes), index),
        miles_per_gallon,
        cylinders,
        displacement,
        horsepower,
        weight_in_lbs: weight,
        acceleration,
        year: format!("{year}-01-01"),
        origin: origin.to_string(),
    }
}

fn write_csv(path: &str, cars: &[SampleCar]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    for car in cars {
        writer.serialize(car)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &str, cars: &[SampleCar]) -> anyhow::Result<()> {
    let text = |f: fn(&SampleCar) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(cars.iter().map(f).collect::<Vec<_>>()))
    };
    let number = |f: fn(&SampleCar) -> Option<f64>| -> ArrayRef {
        Arc::new(Float64Array::from(cars.iter().map(f).collect::<Vec<_>>()))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("Name", DataType::Utf8, false),
        Field::new("Miles_per_Gallon", DataType::Float64, true),
        Field::new("Cylinders", DataType::Float64, false),
        Field::new("Displacement", DataType::Float64, false),
        Field::new("Horsepower", DataType::Float64, true),
        Field::new("Weight_in_lbs", DataType::Float64, false),
        Field::new("Acceleration", DataType::Float64, false),
        Field::new("Year", DataType::Utf8, false),
        Field::new("Origin", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            text(|c| c.name.as_str()),
            number(|c| c.miles_per_gallon),
            number(|c| Some(c.cylinders)),
            number(|c| Some(c.displacement)),
            number(|c| c.horsepower),
            number(|c| Some(c.weight_in_lbs)),
            number(|c| Some(c.acceleration)),
            text(|c| c.year.as_str()),
            text(|c| c.origin.as_str()),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let mut rng = SimpleRng::new(42);
    let cars: Vec<SampleCar> = (0..CARS).map(|i| generate_car(&mut rng, i)).collect();
    let incomplete = cars
        .iter()
        .filter(|c| c.horsepower.is_none() || c.miles_per_gallon.is_none())
        .count();

    write_csv("cars.csv", &cars)?;
    write_parquet("cars.parquet", &cars)?;

    println!(
        "Wrote {} cars ({incomplete} with missing values) to cars.csv and cars.parquet",
        cars.len()
    );
    Ok(())
}
