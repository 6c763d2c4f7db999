use crate::time::add_days;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VacationError {
    #[error("invalid vacation range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
    #[error("no vacation range #{index} for agent {agent}")]
    RangeNotFound { agent: String, index: usize },
}

/// Période de congés, bornes incluses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacationRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl VacationRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, VacationError> {
        if start > end {
            return Err(VacationError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Vrai si `next` (qui commence après `self.start`) chevauche ou touche `self`.
    fn touches(&self, next: &VacationRange) -> bool {
        match add_days(self.end, 1) {
            Some(day_after) => next.start <= day_after,
            None => true,
        }
    }
}

type RawVacations = BTreeMap<String, Vec<VacationRange>>;

/// Congés par agent : listes triées, sans chevauchement ni contiguïté.
///
/// Un agent sans congés n'a pas d'entrée (jamais de liste vide).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "RawVacations", into = "RawVacations")]
pub struct VacationStore {
    ranges: RawVacations,
}

impl VacationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_on_vacation(&self, agent: &str, date: NaiveDate) -> bool {
        self.ranges
            .get(agent)
            .is_some_and(|list| list.iter().any(|r| r.contains(date)))
    }

    /// Insère une période puis refusionne la liste de l'agent.
    pub fn add_range(
        &mut self,
        agent: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<(), VacationError> {
        let range = VacationRange::new(start, end)?;
        let list = self.ranges.entry(agent.to_string()).or_default();
        let mut merged = std::mem::take(list);
        merged.push(range);
        *list = merge(merged);
        debug!(agent, %start, %end, ranges = list.len(), "vacation range added");
        Ok(())
    }

    /// Supprime la période à la position `index` de la liste triée.
    pub fn remove_range(&mut self, agent: &str, index: usize) -> Result<VacationRange, VacationError> {
        let not_found = || VacationError::RangeNotFound {
            agent: agent.to_string(),
            index,
        };
        let list = self.ranges.get_mut(agent).ok_or_else(not_found)?;
        if index >= list.len() {
            return Err(not_found());
        }
        let removed = list.remove(index);
        if list.is_empty() {
            self.ranges.remove(agent);
        }
        Ok(removed)
    }

    pub fn clear_agent(&mut self, agent: &str) -> bool {
        self.ranges.remove(agent).is_some()
    }

    pub fn ranges(&self, agent: &str) -> &[VacationRange] {
        self.ranges.get(agent).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn agents(&self) -> impl Iterator<Item = &str> {
        self.ranges.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

fn merge(mut ranges: Vec<VacationRange>) -> Vec<VacationRange> {
    ranges.sort_by_key(|r| r.start);
    let mut out: Vec<VacationRange> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match out.last_mut() {
            Some(last) if last.touches(&range) => last.end = last.end.max(range.end),
            _ => out.push(range),
        }
    }
    out
}

// Données persistées : on repasse par la fusion, les périodes inversées sont écartées.
impl From<RawVacations> for VacationStore {
    fn from(raw: RawVacations) -> Self {
        let mut ranges = RawVacations::new();
        for (agent, list) in raw {
            let valid: Vec<VacationRange> = list
                .into_iter()
                .filter(|r| {
                    let ok = r.start <= r.end;
                    if !ok {
                        warn!(agent = %agent, start = %r.start, end = %r.end, "dropping inverted vacation range");
                    }
                    ok
                })
                .collect();
            if !valid.is_empty() {
                ranges.insert(agent, merge(valid));
            }
        }
        Self { ranges }
    }
}

impl From<VacationStore> for RawVacations {
    fn from(store: VacationStore) -> Self {
        store.ranges
    }
}
