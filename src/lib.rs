#![forbid(unsafe_code)]
//! Couverture : planification de la couverture support par demi-heure (site Montana).
//!
//! - Roster hebdomadaire par agent (blocs de travail + pause).
//! - Congés par agent, fusion des périodes qui se chevauchent ou se touchent.
//! - Couverture sur 48 créneaux de 30 minutes, besoin en effectif (AHT / occupation).
//! - Import/export CSV du roster, snapshot JSON par workspace.
//! - Fuseau unique du site : tout est en minutes depuis minuit locale.

pub mod autosave;
pub mod coverage;
pub mod demand;
pub mod endpoint;
pub mod io;
pub mod model;
pub mod planner;
pub mod snapshot;
pub mod storage;
pub mod time;
pub mod vacation;

pub use autosave::{Autosave, SaveStatus};
pub use coverage::{compute_coverage, Coverage};
pub use demand::{DemandCurve, ForecastParams};
pub use endpoint::{EndpointConfig, Request, Response};
pub use io::{export_roster_csv, import_roster_csv, ImportError, ImportOutcome, ImportSummary};
pub use model::{Agent, BreakPref, DayBlock, Level, Roster, Weekday};
pub use planner::{BucketRow, PlanError, Planner};
pub use snapshot::Snapshot;
pub use storage::{JsonStorage, MemoryStorage, Storage};
pub use vacation::{VacationError, VacationRange, VacationStore};
