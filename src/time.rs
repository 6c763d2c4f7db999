use crate::model::Weekday;
use chrono::{Datelike, Duration, NaiveDate};
use std::cmp::Ordering;
use thiserror::Error;

/// Nombre de créneaux d'une journée.
pub const BUCKETS: usize = 48;
/// Durée d'un créneau en minutes.
pub const BUCKET_MINUTES: u32 = 30;
pub const MINUTES_PER_DAY: u32 = 1440;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeError {
    #[error("invalid ISO date (expected YYYY-MM-DD): {0}")]
    InvalidDate(String),
}

/// Comparaison chronologique de deux dates.
pub fn compare_date(a: NaiveDate, b: NaiveDate) -> Ordering {
    a.cmp(&b)
}

/// Comparaison de deux dates ISO brutes : l'ordre lexicographique de
/// `YYYY-MM-DD` est l'ordre chronologique.
pub fn compare_iso(a: &str, b: &str) -> Ordering {
    a.cmp(b)
}

/// Ajoute `n` jours (négatif accepté). `None` uniquement en cas de débordement chrono.
pub fn add_days(date: NaiveDate, n: i64) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::days(n))
}

pub fn weekday_of(date: NaiveDate) -> Weekday {
    Weekday::from(date.weekday())
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, TimeError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| TimeError::InvalidDate(raw.to_string()))
}

/// Libellé `HH:MM` du début du créneau `k` (qui couvre `[k*30, k*30+30)`).
///
/// Contrat appelant : `k < 48`.
pub fn bucket_label(k: usize) -> String {
    assert!(k < BUCKETS, "bucket index out of range: {k}");
    format_hhmm(k as u32 * BUCKET_MINUTES)
}

/// Bornes `[début, fin)` du créneau `k` en minutes depuis minuit.
pub fn bucket_bounds(k: usize) -> (i64, i64) {
    let start = (k as i64) * i64::from(BUCKET_MINUTES);
    (start, start + i64::from(BUCKET_MINUTES))
}

pub fn format_hhmm(minute_of_day: u32) -> String {
    format!("{:02}:{:02}", minute_of_day / 60, minute_of_day % 60)
}

/// Parsing tolérant de `HH:MM` vers minute-du-jour.
///
/// Renvoie `None` si la valeur est vide ou non numérique. Les heures sont
/// ramenées dans [0,23] et les minutes dans [0,59].
pub fn parse_hhmm(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let mut parts = raw.split(':');
    let hours: i64 = parts.next()?.trim().parse().ok()?;
    let minutes: i64 = parts.next()?.trim().parse().ok()?;
    let hours = hours.clamp(0, 23) as u32;
    let minutes = minutes.clamp(0, 59) as u32;
    Some(hours * 60 + minutes)
}
