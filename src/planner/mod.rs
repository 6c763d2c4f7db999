mod agents;
mod report;
mod types;

pub use types::{BucketRow, PlanError};

use crate::coverage::{coverage_for_date, Coverage};
use crate::demand::{DemandCurve, ForecastParams};
use crate::io::{self, ImportSummary};
use crate::model::{Agent, DayBlock, Roster, Weekday};
use crate::snapshot::{Snapshot, BRAND, SNAPSHOT_VERSION};
use crate::time::weekday_of;
use crate::vacation::{VacationRange, VacationStore};
use chrono::{DateTime, NaiveDate, Utc};
use std::io::{Read, Write};
use tracing::warn;

/// Planner : encapsule l'état d'un workspace (agents, roster, congés, prévision).
#[derive(Debug, Clone, Default)]
pub struct Planner {
    agents: Vec<Agent>,
    roster: Roster,
    vacations: VacationStore,
    params: ForecastParams,
    selected_date: Option<NaiveDate>,
    selected_day: Option<Weekday>,
}

impl Planner {
    /// Planner vide (aucun agent), paramètres de prévision par défaut.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }
    pub fn roster(&self) -> &Roster {
        &self.roster
    }
    pub fn vacations(&self) -> &VacationStore {
        &self.vacations
    }
    pub fn params(&self) -> &ForecastParams {
        &self.params
    }
    pub fn params_mut(&mut self) -> &mut ForecastParams {
        &mut self.params
    }
    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected_date
    }
    pub fn select_date(&mut self, date: NaiveDate) {
        self.selected_date = Some(date);
        self.selected_day = Some(weekday_of(date));
    }

    pub fn add_agent(&mut self, agent: Agent) -> Result<(), PlanError> {
        agents::add_agent(self, agent)
    }

    pub fn remove_agent(&mut self, name: &str) -> Result<Agent, PlanError> {
        agents::remove_agent(self, name)
    }

    pub fn set_block(&mut self, name: &str, day: Weekday, block: DayBlock) -> Result<(), PlanError> {
        agents::set_block(self, name, day, block)
    }

    /// Bloc effectif (bloc canonique si le jour n'est pas renseigné).
    pub fn block(&self, name: &str, day: Weekday) -> DayBlock {
        self.roster.resolve_block(name, day)
    }

    pub fn add_vacation(
        &mut self,
        name: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<(), PlanError> {
        agents::add_vacation(self, name, start, end)
    }

    pub fn remove_vacation(&mut self, name: &str, index: usize) -> Result<VacationRange, PlanError> {
        agents::remove_vacation(self, name, index)
    }

    pub fn coverage(&self, date: NaiveDate) -> Coverage {
        coverage_for_date(&self.roster, &self.agents, date, &self.vacations)
    }

    pub fn demand(&self, day: Weekday) -> DemandCurve {
        self.params.demand_for(day)
    }

    /// Couverture et besoin créneau par créneau pour `date`.
    pub fn report(&self, date: NaiveDate) -> Vec<BucketRow> {
        report::report(self, date)
    }

    pub fn shortfalls(&self, date: NaiveDate) -> Vec<BucketRow> {
        self.report(date).into_iter().filter(BucketRow::is_short).collect()
    }

    /// Import CSV ; en cas d'erreur l'état reste inchangé.
    pub fn import_csv<R: Read>(&mut self, reader: R) -> Result<ImportSummary, PlanError> {
        let outcome = io::import_roster_csv(reader, &self.agents, &self.roster)?;
        self.agents = outcome.agents;
        self.roster = outcome.roster;
        Ok(outcome.summary)
    }

    pub fn export_csv<W: Write>(&self, writer: W) -> Result<(), PlanError> {
        io::export_roster_csv(writer, &self.agents, &self.roster)?;
        Ok(())
    }

    pub fn to_snapshot(&self, saved_at: DateTime<Utc>) -> Snapshot {
        Snapshot {
            agents: self.agents.clone(),
            roster: self.roster.clone(),
            daily_avg: self.params.daily_avg.clone(),
            hourly_pct_by_day: self.params.hourly_pct.clone(),
            aht_min: self.params.aht_min,
            occupancy: self.params.occupancy,
            service_buffer: self.params.service_buffer,
            selected_date: self.selected_date,
            selected_day: self.selected_day.unwrap_or(Weekday::Mon),
            vacations: self.vacations.clone(),
            brand: BRAND.to_string(),
            version: SNAPSHOT_VERSION,
            saved_at: Some(saved_at),
        }
    }

    /// Reconstruit l'état ; les agents en double (même nom) ne gardent que leur
    /// première occurrence, le roster et les congés d'agents inconnus sont écartés.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let params = snapshot.forecast_params();
        let Snapshot {
            agents: loaded,
            mut roster,
            mut vacations,
            selected_date,
            selected_day,
            ..
        } = snapshot;

        let mut agents: Vec<Agent> = Vec::with_capacity(loaded.len());
        for agent in loaded {
            if agents.iter().any(|a| a.name == agent.name) {
                warn!(agent = %agent.name, "dropping duplicate agent");
                continue;
            }
            agents.push(agent);
        }

        let known = |name: &str| agents.iter().any(|a| a.name == name);
        let orphans: Vec<String> = roster
            .agents()
            .chain(vacations.agents())
            .filter(|name| !known(*name))
            .map(str::to_string)
            .collect();
        for name in &orphans {
            warn!(agent = %name, "dropping roster/vacations of unknown agent");
            roster.remove_agent(name);
            vacations.clear_agent(name);
        }

        Self {
            agents,
            roster,
            vacations,
            params,
            selected_date,
            selected_day: Some(selected_day),
        }
    }
}
