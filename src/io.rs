use crate::model::{find_agent, Agent, DayBlock, Roster, Weekday};
use crate::time::{format_hhmm, parse_hhmm};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Colonnes du format d'échange roster (ordre d'export).
pub const CSV_COLUMNS: [&str; 7] = [
    "agent",
    "day",
    "active",
    "start",
    "end",
    "break_start",
    "break_minutes",
];

const DEFAULT_START_MIN: u32 = 9 * 60;
const DEFAULT_END_MIN: u32 = 17 * 60;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("missing required CSV column(s): {}", .missing.join(", "))]
    Schema { missing: Vec<String> },
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub applied: usize,
    pub skipped: usize,
    pub created_agents: Vec<String>,
}

/// Résultat d'un import : nouvelles valeurs, les entrées ne sont pas modifiées.
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub agents: Vec<Agent>,
    pub roster: Roster,
    pub summary: ImportSummary,
}

/// Indices des colonnes requises, dans l'ordre de `CSV_COLUMNS`.
struct Columns([usize; 7]);

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self, ImportError> {
        let names: Vec<String> = headers
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_ascii_lowercase())
            .collect();
        let mut idx = [0usize; 7];
        let mut missing = Vec::new();
        for (slot, column) in idx.iter_mut().zip(CSV_COLUMNS) {
            match names.iter().position(|n| n == column) {
                Some(pos) => *slot = pos,
                None => missing.push(column.to_string()),
            }
        }
        if !missing.is_empty() {
            return Err(ImportError::Schema { missing });
        }
        Ok(Self(idx))
    }

    fn get<'r>(&self, rec: &'r StringRecord, column: usize) -> &'r str {
        rec.get(self.0[column]).unwrap_or("")
    }
}

/// Import du roster depuis CSV: header `agent,day,active,start,end,break_start,break_minutes`
/// (ordre libre).
///
/// Schéma incomplet : rejet complet avant toute ligne. Valeurs mal formées :
/// repli sur les valeurs par défaut du champ.
pub fn import_roster_csv<R: Read>(
    reader: R,
    agents: &[Agent],
    roster: &Roster,
) -> Result<ImportOutcome, ImportError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let columns = Columns::locate(rdr.headers()?)?;

    let mut agents = agents.to_vec();
    let mut roster = roster.clone();
    let mut summary = ImportSummary::default();

    for rec in rdr.records() {
        let rec = rec?;
        let name = columns.get(&rec, 0).trim();
        let Some(day) = Weekday::from_label(columns.get(&rec, 1)) else {
            summary.skipped += 1;
            continue;
        };
        if name.is_empty() {
            summary.skipped += 1;
            continue;
        }

        let block = parse_block(&columns, &rec);
        if find_agent(&agents, name).is_none() {
            agents.push(Agent::imported(name));
            summary.created_agents.push(name.to_string());
        }
        roster.set_block(name, day, block);
        summary.applied += 1;
    }

    if summary.skipped > 0 {
        debug!(skipped = summary.skipped, "csv rows ignored (unknown day or empty agent)");
    }
    info!(
        applied = summary.applied,
        created = summary.created_agents.len(),
        "roster imported"
    );
    Ok(ImportOutcome {
        agents,
        roster,
        summary,
    })
}

pub fn import_roster_csv_path<P: AsRef<Path>>(
    path: P,
    agents: &[Agent],
    roster: &Roster,
) -> Result<ImportOutcome, ImportError> {
    let file = std::fs::File::open(path.as_ref()).map_err(csv::Error::from)?;
    import_roster_csv(file, agents, roster)
}

fn parse_block(columns: &Columns, rec: &StringRecord) -> DayBlock {
    let active = parse_active(columns.get(rec, 2));
    let start = parse_hhmm(columns.get(rec, 3)).unwrap_or(DEFAULT_START_MIN);
    let end = parse_hhmm(columns.get(rec, 4)).unwrap_or(DEFAULT_END_MIN);
    let break_start = parse_hhmm(columns.get(rec, 5));
    let break_mins = parse_break_minutes(columns.get(rec, 6));
    DayBlock::new(active, start, end, break_start, break_mins)
}

fn parse_active(raw: &str) -> bool {
    raw == "1" || raw.trim().eq_ignore_ascii_case("true")
}

fn parse_break_minutes(raw: &str) -> u32 {
    raw.trim()
        .parse::<i64>()
        .map(|n| n.clamp(0, i64::from(u32::MAX)) as u32)
        .unwrap_or(0)
}

/// Export CSV du roster: une ligne par (agent, jour), jours dans l'ordre canonique.
pub fn export_roster_csv<W: Write>(
    writer: W,
    agents: &[Agent],
    roster: &Roster,
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_writer(writer);
    w.write_record(CSV_COLUMNS)?;
    for agent in agents {
        for day in Weekday::ALL {
            let block = roster.resolve_block(&agent.name, day);
            let break_start = block
                .break_window()
                .map(|(start, _)| format_hhmm(start))
                .unwrap_or_default();
            let break_mins = block.break_mins.to_string();
            w.write_record([
                agent.name.as_str(),
                day.label(),
                if block.active { "1" } else { "0" },
                format_hhmm(block.start_min).as_str(),
                format_hhmm(block.end_min).as_str(),
                break_start.as_str(),
                break_mins.as_str(),
            ])?;
        }
    }
    w.flush()?;
    Ok(())
}

pub fn export_roster_csv_path<P: AsRef<Path>>(
    path: P,
    agents: &[Agent],
    roster: &Roster,
) -> anyhow::Result<()> {
    let file = std::fs::File::create(path.as_ref())?;
    export_roster_csv(file, agents, roster)
}
