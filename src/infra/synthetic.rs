use crate::app::ports::{DataSource, RawTable};
use crate::constants::{DATE_FIELD, ENTER_ADIZ_FIELD, SHIPS_FIELD, TOTAL_AIRCRAFT_FIELD};
use crate::error::LoadError;
use async_trait::async_trait;
use chrono::{Duration, Local, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generated activity for demos and offline development: `days` rows ending
/// today, with `enter_adiz <= total_aircraft` on every row.
pub struct SyntheticSource {
    days: u32,
    seed: Option<u64>,
    end: Option<NaiveDate>,
}

impl SyntheticSource {
    pub fn new(days: u32, seed: Option<u64>) -> Self {
        Self {
            days,
            seed,
            end: None,
        }
    }

    /// Fix the last generated day instead of using the local date.
    pub fn ending(mut self, end: NaiveDate) -> Self {
        self.end = Some(end);
        self
    }

    fn generate(&self) -> Result<Vec<u8>, csv::Error> {
        let end = self.end.unwrap_or_else(|| Local::now().date_naive());
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record([DATE_FIELD, TOTAL_AIRCRAFT_FIELD, ENTER_ADIZ_FIELD, SHIPS_FIELD])?;
        for offset in (0..self.days).rev() {
            let date = end - Duration::days(i64::from(offset));
            let total_aircraft: u32 = rng.gen_range(0..=45);
            let enter_adiz: u32 = rng.gen_range(0..=total_aircraft);
            let ships: u32 = rng.gen_range(0..=15);
            wtr.write_record([
                date.format("%Y-%m-%d").to_string(),
                total_aircraft.to_string(),
                enter_adiz.to_string(),
                ships.to_string(),
            ])?;
        }
        wtr.into_inner().map_err(|e| csv::Error::from(e.into_error()))
    }
}

#[async_trait]
impl DataSource for SyntheticSource {
    fn mode(&self) -> &'static str {
        "synthetic"
    }

    fn describe(&self) -> String {
        format!("synthetic ({} days)", self.days)
    }

    async fn fetch(&self) -> Result<RawTable, LoadError> {
        let bytes = self
            .generate()
            .map_err(|e| LoadError::Synthetic(e.to_string()))?;
        Ok(RawTable {
            origin: self.describe(),
            bytes,
        })
    }
}
