use crate::demand::ForecastParams;
use crate::model::{seed_agents, Agent, Roster, Weekday};
use crate::vacation::VacationStore;
use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const BRAND: &str = "Montana";
pub const SNAPSHOT_VERSION: u32 = 1;

/// État complet d'un workspace, tel que persisté (objet JSON plat).
///
/// Tous les champs ont une valeur par défaut : `{}` se charge comme un
/// workspace neuf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    pub agents: Vec<Agent>,
    pub roster: Roster,
    pub daily_avg: BTreeMap<Weekday, f64>,
    pub hourly_pct_by_day: BTreeMap<Weekday, Vec<f64>>,
    pub aht_min: f64,
    pub occupancy: f64,
    pub service_buffer: u32,
    pub selected_date: Option<NaiveDate>,
    pub selected_day: Weekday,
    pub vacations: VacationStore,
    pub brand: String,
    pub version: u32,
    pub saved_at: Option<DateTime<Utc>>,
}

impl Default for Snapshot {
    fn default() -> Self {
        let params = ForecastParams::default();
        Self {
            agents: seed_agents(),
            roster: Roster::default(),
            daily_avg: params.daily_avg,
            hourly_pct_by_day: params.hourly_pct,
            aht_min: params.aht_min,
            occupancy: params.occupancy,
            service_buffer: params.service_buffer,
            selected_date: None,
            selected_day: Weekday::Mon,
            vacations: VacationStore::default(),
            brand: BRAND.to_string(),
            version: SNAPSHOT_VERSION,
            saved_at: None,
        }
    }
}

impl Snapshot {
    pub fn forecast_params(&self) -> ForecastParams {
        ForecastParams {
            aht_min: self.aht_min,
            occupancy: self.occupancy,
            service_buffer: self.service_buffer,
            daily_avg: self.daily_avg.clone(),
            hourly_pct: self.hourly_pct_by_day.clone(),
        }
    }

    pub fn from_value(value: serde_json::Value) -> anyhow::Result<Self> {
        serde_json::from_value(value).context("parsing schedule snapshot")
    }

    pub fn to_value(&self) -> anyhow::Result<serde_json::Value> {
        serde_json::to_value(self).context("serializing schedule snapshot")
    }
}
