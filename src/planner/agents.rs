use super::{PlanError, Planner};
use crate::model::{find_agent, Agent, DayBlock, Weekday};
use crate::vacation::VacationRange;
use chrono::NaiveDate;
use tracing::info;

pub(super) fn add_agent(planner: &mut Planner, agent: Agent) -> Result<(), PlanError> {
    let name = agent.name.trim().to_string();
    if name.is_empty() {
        return Err(PlanError::EmptyAgentName);
    }
    if find_agent(&planner.agents, &name).is_some() {
        return Err(PlanError::DuplicateAgent(name));
    }
    let agent = Agent { name, ..agent };
    info!(agent = %agent.name, "agent added");
    planner.agents.push(agent);
    Ok(())
}

/// Supprime l'agent ainsi que son roster et ses congés.
pub(super) fn remove_agent(planner: &mut Planner, name: &str) -> Result<Agent, PlanError> {
    let Some(pos) = planner.agents.iter().position(|a| a.name == name) else {
        return Err(PlanError::UnknownAgent(name.to_string()));
    };
    let removed = planner.agents.remove(pos);
    planner.roster.remove_agent(name);
    planner.vacations.clear_agent(name);
    info!(agent = name, "agent removed (roster and vacations cleared)");
    Ok(removed)
}

pub(super) fn set_block(
    planner: &mut Planner,
    name: &str,
    day: Weekday,
    block: DayBlock,
) -> Result<(), PlanError> {
    ensure_known(planner, name)?;
    planner.roster.set_block(name, day, block);
    Ok(())
}

pub(super) fn add_vacation(
    planner: &mut Planner,
    name: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<(), PlanError> {
    ensure_known(planner, name)?;
    planner.vacations.add_range(name, start, end)?;
    Ok(())
}

pub(super) fn remove_vacation(
    planner: &mut Planner,
    name: &str,
    index: usize,
) -> Result<VacationRange, PlanError> {
    ensure_known(planner, name)?;
    Ok(planner.vacations.remove_range(name, index)?)
}

fn ensure_known(planner: &Planner, name: &str) -> Result<(), PlanError> {
    match find_agent(&planner.agents, name) {
        Some(_) => Ok(()),
        None => Err(PlanError::UnknownAgent(name.to_string())),
    }
}
