use crate::model::{Agent, DayBlock, Roster, Weekday};
use crate::time::{bucket_bounds, weekday_of, BUCKETS};
use crate::vacation::VacationStore;
use chrono::NaiveDate;
use tracing::debug;

/// Nombre d'agents présents par créneau de 30 minutes.
pub type Coverage = [u32; BUCKETS];

fn overlap(a_start: i64, a_end: i64, b_start: i64, b_end: i64) -> i64 {
    (a_end.min(b_end) - a_start.max(b_start)).max(0)
}

/// Minutes de présence nette (travail moins pause) d'un bloc dans le créneau `k`.
///
/// La pause n'est pas ramenée dans la fenêtre de travail : une pause qui
/// déborde peut rendre la valeur négative.
pub fn agent_presence(block: &DayBlock, k: usize) -> i64 {
    if !block.active {
        return 0;
    }
    let (bucket_start, bucket_end) = bucket_bounds(k);
    let work = overlap(
        i64::from(block.start_min),
        i64::from(block.end_min),
        bucket_start,
        bucket_end,
    );
    let brk = block
        .break_window()
        .map(|(start, end)| overlap(i64::from(start), i64::from(end), bucket_start, bucket_end))
        .unwrap_or(0);
    work - brk
}

/// Couverture d'une journée : un agent compte pour 1 dans chaque créneau où
/// sa présence nette est strictement positive.
pub fn compute_coverage(
    roster: &Roster,
    agents: &[Agent],
    weekday: Weekday,
    date: NaiveDate,
    vacations: &VacationStore,
) -> Coverage {
    let mut coverage = [0u32; BUCKETS];
    let mut counted = 0usize;

    for agent in agents {
        if vacations.is_on_vacation(&agent.name, date) {
            continue;
        }
        let block = roster.resolve_block(&agent.name, weekday);
        if !block.active {
            continue;
        }
        counted += 1;
        for (k, slot) in coverage.iter_mut().enumerate() {
            if agent_presence(&block, k) > 0 {
                *slot += 1;
            }
        }
    }

    debug!(%date, %weekday, agents = counted, "coverage computed");
    coverage
}

/// Variante qui déduit le jour de la semaine de la date.
pub fn coverage_for_date(
    roster: &Roster,
    agents: &[Agent],
    date: NaiveDate,
    vacations: &VacationStore,
) -> Coverage {
    compute_coverage(roster, agents, weekday_of(date), date, vacations)
}
