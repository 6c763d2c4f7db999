use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Jour de la semaine. L'ordre de déclaration est l'ordre canonique
/// (itération, export CSV, clés de map).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Sat,
    Sun,
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Sat,
        Weekday::Sun,
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Weekday::Sat => "Sat",
            Weekday::Sun => "Sun",
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
        }
    }

    /// Libellé exact (espaces autour ignorés).
    pub fn from_label(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL.into_iter().find(|d| d.label() == raw)
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Weekday::Mon,
            chrono::Weekday::Tue => Weekday::Tue,
            chrono::Weekday::Wed => Weekday::Wed,
            chrono::Weekday::Thu => Weekday::Thu,
            chrono::Weekday::Fri => Weekday::Fri,
            chrono::Weekday::Sat => Weekday::Sat,
            chrono::Weekday::Sun => Weekday::Sun,
        }
    }
}

/// Bloc de travail d'un agent pour un jour donné (minutes depuis minuit).
///
/// Aucune contrainte `start_min < end_min` : un bloc dégénéré ne couvre
/// simplement aucun créneau.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayBlock {
    pub active: bool,
    pub start_min: u32,
    pub end_min: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_start_min: Option<u32>,
    #[serde(default)]
    pub break_mins: u32,
}

impl DayBlock {
    /// Construit un bloc ; une durée de pause sans heure de début est ignorée.
    pub fn new(
        active: bool,
        start_min: u32,
        end_min: u32,
        break_start_min: Option<u32>,
        break_mins: u32,
    ) -> Self {
        let (break_start_min, break_mins) = match break_start_min {
            Some(start) if break_mins > 0 => (Some(start), break_mins),
            _ => (None, 0),
        };
        Self {
            active,
            start_min,
            end_min,
            break_start_min,
            break_mins,
        }
    }

    /// Bloc canonique : 09:00-17:00, pause de 60 minutes à 13:00.
    pub fn default_block() -> Self {
        Self::new(true, 9 * 60, 17 * 60, Some(13 * 60), 60)
    }

    /// Fenêtre de pause `[début, fin)` si la pause est définie.
    pub fn break_window(&self) -> Option<(u32, u32)> {
        match self.break_start_min {
            Some(start) if self.break_mins > 0 => Some((start, start + self.break_mins)),
            _ => None,
        }
    }
}

impl Default for DayBlock {
    fn default() -> Self {
        Self::default_block()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[default]
    Junior,
    Mid,
    Senior,
}

/// Préférence de pause d'un agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BreakPref {
    #[serde(rename = "none")]
    None,
    #[default]
    #[serde(rename = "60")]
    SixtyMinutes,
}

/// Agent support (le nom sert de clé unique)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub name: String,
    pub country: String,
    pub remote: bool,
    pub level: Level,
    pub friday_allowed: bool,
    pub break_pref: BreakPref,
}

impl Agent {
    pub fn new<N: Into<String>, C: Into<String>>(name: N, country: C, level: Level) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            remote: false,
            level,
            friday_allowed: true,
            break_pref: BreakPref::SixtyMinutes,
        }
    }

    /// Agent créé automatiquement lors d'un import CSV.
    pub fn imported<N: Into<String>>(name: N) -> Self {
        Self {
            name: name.into(),
            country: "SA".to_string(),
            remote: true,
            level: Level::Junior,
            friday_allowed: true,
            break_pref: BreakPref::SixtyMinutes,
        }
    }
}

/// Agents présents dans un workspace neuf.
pub fn seed_agents() -> Vec<Agent> {
    vec![
        Agent::new("Amal", "SA", Level::Senior),
        Agent::new("Omar", "SA", Level::Mid),
        Agent {
            remote: true,
            ..Agent::new("Lina", "EG", Level::Mid)
        },
        Agent {
            remote: true,
            friday_allowed: false,
            ..Agent::new("Yousef", "JO", Level::Junior)
        },
    ]
}

pub fn find_agent<'a>(agents: &'a [Agent], name: &str) -> Option<&'a Agent> {
    agents.iter().find(|a| a.name == name)
}

/// Roster : agent -> (jour -> bloc).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    blocks: BTreeMap<String, BTreeMap<Weekday, DayBlock>>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remplace (sans fusion) le bloc `(agent, day)`.
    pub fn set_block(&mut self, agent: &str, day: Weekday, block: DayBlock) {
        self.blocks
            .entry(agent.to_string())
            .or_default()
            .insert(day, block);
    }

    /// Bloc stocké, sans valeur par défaut.
    pub fn block(&self, agent: &str, day: Weekday) -> Option<&DayBlock> {
        self.blocks.get(agent).and_then(|days| days.get(&day))
    }

    /// Bloc effectif : le bloc stocké, sinon le bloc canonique (non stocké).
    pub fn resolve_block(&self, agent: &str, day: Weekday) -> DayBlock {
        self.block(agent, day)
            .copied()
            .unwrap_or_else(DayBlock::default_block)
    }

    pub fn remove_agent(&mut self, agent: &str) -> bool {
        self.blocks.remove(agent).is_some()
    }

    pub fn agents(&self) -> impl Iterator<Item = &str> {
        self.blocks.keys().map(String::as_str)
    }

    pub fn contains_agent(&self, agent: &str) -> bool {
        self.blocks.contains_key(agent)
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
