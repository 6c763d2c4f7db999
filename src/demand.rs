use crate::model::Weekday;
use crate::time::{BUCKETS, BUCKET_MINUTES};
use std::collections::BTreeMap;
use tracing::debug;

/// Profil horaire par défaut (% du volume journalier, heure 0 à 23).
pub const DEFAULT_HOURLY_PCT: [f64; 24] = [
    0.9, 0.7, 0.6, 0.5, 0.5, 0.7, 1.5, 3.0, 4.8, 6.1, 6.9, 7.1, //
    6.7, 6.8, 7.1, 7.2, 7.1, 6.7, 6.1, 5.5, 4.7, 3.8, 2.8, 2.2,
];

/// Volume journalier moyen par défaut.
pub fn default_daily_avg(day: Weekday) -> f64 {
    match day {
        Weekday::Sat => 420.0,
        Weekday::Sun => 380.0,
        Weekday::Fri => 600.0,
        _ => 650.0,
    }
}

/// Paramètres de prévision, passés explicitement aux moteurs.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastParams {
    /// Durée moyenne de traitement d'un ticket (minutes).
    pub aht_min: f64,
    /// Taux d'occupation cible, typiquement dans (0,1].
    pub occupancy: f64,
    /// Agents ajoutés à chaque créneau.
    pub service_buffer: u32,
    pub daily_avg: BTreeMap<Weekday, f64>,
    pub hourly_pct: BTreeMap<Weekday, Vec<f64>>,
}

impl Default for ForecastParams {
    fn default() -> Self {
        Self {
            aht_min: 6.0,
            occupancy: 0.85,
            service_buffer: 0,
            daily_avg: Weekday::ALL
                .into_iter()
                .map(|d| (d, default_daily_avg(d)))
                .collect(),
            hourly_pct: Weekday::ALL
                .into_iter()
                .map(|d| (d, DEFAULT_HOURLY_PCT.to_vec()))
                .collect(),
        }
    }
}

/// Volume attendu et effectif requis, par créneau.
#[derive(Debug, Clone, PartialEq)]
pub struct DemandCurve {
    pub expected: [f64; BUCKETS],
    pub required: [u32; BUCKETS],
}

impl ForecastParams {
    pub fn daily_avg_for(&self, day: Weekday) -> f64 {
        self.daily_avg
            .get(&day)
            .copied()
            .unwrap_or_else(|| default_daily_avg(day))
    }

    pub fn hourly_for(&self, day: Weekday) -> &[f64] {
        self.hourly_pct
            .get(&day)
            .map(Vec::as_slice)
            .unwrap_or(&DEFAULT_HOURLY_PCT)
    }

    pub fn demand_for(&self, day: Weekday) -> DemandCurve {
        let expected = expected_volume(self.hourly_for(day), self.daily_avg_for(day));
        let required = required_agents(&expected, self);
        debug!(%day, peak = required.iter().max().copied().unwrap_or(0), "demand computed");
        DemandCurve { expected, required }
    }
}

/// Répartit chaque pourcentage horaire à parts égales sur ses deux demi-heures.
///
/// Le profil est ramené à 24 valeurs (complété par 0 ou tronqué) ; les valeurs
/// négatives valent 0.
pub fn half_hour_split(hourly: &[f64]) -> [f64; BUCKETS] {
    let mut half = [0.0; BUCKETS];
    for (h, &pct) in hourly.iter().take(BUCKETS / 2).enumerate() {
        let share = pct.max(0.0) / 2.0;
        half[2 * h] = share;
        half[2 * h + 1] = share;
    }
    half
}

/// Volume attendu par créneau, normalisé par la somme réelle du profil.
pub fn expected_volume(hourly: &[f64], daily_avg: f64) -> [f64; BUCKETS] {
    let half = half_hour_split(hourly);
    let sum: f64 = half.iter().sum();
    let sum = if sum > 0.0 { sum } else { 1.0 };
    half.map(|pct| daily_avg * (pct / sum))
}

/// `ceil(volume * aht / max(0.1, 30 * occupancy)) + buffer` pour chaque créneau.
pub fn required_agents(expected: &[f64; BUCKETS], params: &ForecastParams) -> [u32; BUCKETS] {
    let capacity = (f64::from(BUCKET_MINUTES) * params.occupancy).max(0.1);
    expected.map(|volume| {
        let agents = (volume * params.aht_min / capacity).ceil().max(0.0);
        (agents as u32).saturating_add(params.service_buffer)
    })
}
