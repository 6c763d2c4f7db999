#![forbid(unsafe_code)]
use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use couverture::{
    endpoint::{self, EndpointConfig, Request},
    model::{Agent, BreakPref, DayBlock, Level, Weekday},
    planner::Planner,
    snapshot::Snapshot,
    storage::{JsonStorage, Storage},
    time::{bucket_label, parse_date, parse_hhmm, weekday_of},
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de planification de couverture support (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Répertoire des snapshots JSON
    #[arg(long, global = true, default_value = ".")]
    data_dir: String,

    /// Nom du workspace
    #[arg(long, global = true, default_value = "montana")]
    workspace: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Lister les agents
    Agents,

    /// Ajouter un agent
    AddAgent {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "SA")]
        country: String,
        /// junior | mid | senior
        #[arg(long, default_value = "junior", value_parser = parse_level)]
        level: Level,
        #[arg(long)]
        remote: bool,
        /// Interdit le vendredi
        #[arg(long)]
        no_friday: bool,
        /// Préférence de pause "none"
        #[arg(long)]
        no_break: bool,
    },

    /// Supprimer un agent (roster et congés compris)
    RemoveAgent {
        #[arg(long)]
        name: String,
    },

    /// Définir le bloc d'un agent pour un jour
    SetBlock {
        #[arg(long)]
        agent: String,
        /// Sat | Sun | Mon | Tue | Wed | Thu | Fri
        #[arg(long, value_parser = parse_day)]
        day: Weekday,
        /// HH:MM
        #[arg(long, default_value = "09:00")]
        start: String,
        /// HH:MM
        #[arg(long, default_value = "17:00")]
        end: String,
        /// HH:MM
        #[arg(long)]
        break_start: Option<String>,
        #[arg(long, default_value_t = 0)]
        break_minutes: u32,
        /// Jour non travaillé
        #[arg(long)]
        off: bool,
    },

    /// Importer un roster CSV
    ImportCsv {
        #[arg(long)]
        csv: String,
    },

    /// Exporter le roster en CSV
    ExportCsv {
        #[arg(long)]
        out: String,
    },

    /// Ajouter une période de congés (bornes incluses, YYYY-MM-DD)
    AddVacation {
        #[arg(long)]
        agent: String,
        #[arg(long, value_parser = parse_date)]
        start: NaiveDate,
        #[arg(long, value_parser = parse_date)]
        end: NaiveDate,
    },

    /// Supprimer une période de congés par sa position
    RemoveVacation {
        #[arg(long)]
        agent: String,
        #[arg(long)]
        index: usize,
    },

    /// Lister les congés
    Vacations {
        #[arg(long)]
        agent: Option<String>,
    },

    /// Modifier les paramètres de prévision
    Forecast {
        #[arg(long)]
        aht: Option<f64>,
        #[arg(long)]
        occupancy: Option<f64>,
        #[arg(long)]
        buffer: Option<u32>,
        /// Jour ciblé par `--daily-avg`
        #[arg(long, value_parser = parse_day)]
        day: Option<Weekday>,
        #[arg(long, requires = "day")]
        daily_avg: Option<f64>,
    },

    /// Couverture par créneau pour une date
    Coverage {
        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,
    },

    /// Couverture face au besoin ; code 2 si un créneau est en sous-effectif
    Report {
        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,
        /// Export CSV du rapport (optionnel)
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Exécuter une requête /schedule sur le répertoire de données
    ServeRequest {
        /// GET | PUT | OPTIONS
        #[arg(long)]
        method: String,
        /// Fichier contenant le corps JSON (PUT)
        #[arg(long)]
        body: Option<String>,
        /// Valeur de l'en-tête x-schedule-token
        #[arg(long)]
        token: Option<String>,
        #[arg(long, env = "COUVERTURE_WRITE_TOKEN")]
        write_token: Option<String>,
    },
}

fn parse_day(raw: &str) -> Result<Weekday, String> {
    Weekday::from_label(raw).ok_or_else(|| format!("unknown day: {raw} (expected Sat..Fri)"))
}

fn parse_level(raw: &str) -> Result<Level, String> {
    match raw.to_ascii_lowercase().as_str() {
        "junior" => Ok(Level::Junior),
        "mid" => Ok(Level::Mid),
        "senior" => Ok(Level::Senior),
        _ => Err(format!("unknown level: {raw}")),
    }
}

fn parse_time(raw: &str) -> Result<u32> {
    parse_hhmm(raw).with_context(|| format!("invalid time (expected HH:MM): {raw}"))
}

fn load(storage: &JsonStorage, workspace: &str) -> Result<Planner> {
    let snapshot = match storage.load(workspace)? {
        Some(blob) => Snapshot::from_value(blob)?,
        None => Snapshot::default(),
    };
    Ok(Planner::from_snapshot(snapshot))
}

fn save(storage: &JsonStorage, workspace: &str, planner: &Planner) -> Result<()> {
    let blob = planner.to_snapshot(Utc::now()).to_value()?;
    storage.save(workspace, &blob)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let storage = JsonStorage::open(&cli.data_dir)?;
    let workspace = cli.workspace.as_str();
    // serve-request sert le blob tel quel, sans le relire comme snapshot
    let mut planner = match &cli.cmd {
        Commands::ServeRequest { .. } => Planner::new(),
        _ => load(&storage, workspace)?,
    };

    let code = match cli.cmd {
        Commands::Agents => {
            for a in planner.agents() {
                println!(
                    "{} | {} | {:?} | remote={} friday={}",
                    a.name, a.country, a.level, a.remote, a.friday_allowed
                );
            }
            0
        }
        Commands::AddAgent {
            name,
            country,
            level,
            remote,
            no_friday,
            no_break,
        } => {
            let agent = Agent {
                remote,
                friday_allowed: !no_friday,
                break_pref: if no_break {
                    BreakPref::None
                } else {
                    BreakPref::SixtyMinutes
                },
                ..Agent::new(name, country, level)
            };
            planner.add_agent(agent)?;
            save(&storage, workspace, &planner)?;
            0
        }
        Commands::RemoveAgent { name } => {
            planner.remove_agent(&name)?;
            save(&storage, workspace, &planner)?;
            0
        }
        Commands::SetBlock {
            agent,
            day,
            start,
            end,
            break_start,
            break_minutes,
            off,
        } => {
            let break_start = break_start.as_deref().map(parse_time).transpose()?;
            let block = DayBlock::new(
                !off,
                parse_time(&start)?,
                parse_time(&end)?,
                break_start,
                break_minutes,
            );
            planner.set_block(&agent, day, block)?;
            save(&storage, workspace, &planner)?;
            0
        }
        Commands::ImportCsv { csv } => {
            let file = std::fs::File::open(&csv).with_context(|| format!("opening {csv}"))?;
            let summary = planner.import_csv(file)?;
            save(&storage, workspace, &planner)?;
            println!(
                "Imported {} row(s), skipped {}, created {} agent(s)",
                summary.applied,
                summary.skipped,
                summary.created_agents.len()
            );
            0
        }
        Commands::ExportCsv { out } => {
            let file = std::fs::File::create(&out).with_context(|| format!("creating {out}"))?;
            planner.export_csv(file)?;
            0
        }
        Commands::AddVacation { agent, start, end } => {
            planner.add_vacation(&agent, start, end)?;
            save(&storage, workspace, &planner)?;
            0
        }
        Commands::RemoveVacation { agent, index } => {
            planner.remove_vacation(&agent, index)?;
            save(&storage, workspace, &planner)?;
            0
        }
        Commands::Vacations { agent } => {
            let names: Vec<String> = match agent {
                Some(a) => vec![a],
                None => planner.vacations().agents().map(str::to_string).collect(),
            };
            for name in names {
                for (i, r) in planner.vacations().ranges(&name).iter().enumerate() {
                    println!("{name} | #{i} | {} → {}", r.start, r.end);
                }
            }
            0
        }
        Commands::Forecast {
            aht,
            occupancy,
            buffer,
            day,
            daily_avg,
        } => {
            let params = planner.params_mut();
            if let Some(v) = aht {
                if v <= 0.0 {
                    bail!("aht must be > 0");
                }
                params.aht_min = v;
            }
            if let Some(v) = occupancy {
                params.occupancy = v;
            }
            if let Some(v) = buffer {
                params.service_buffer = v;
            }
            if let (Some(d), Some(v)) = (day, daily_avg) {
                params.daily_avg.insert(d, v);
            }
            save(&storage, workspace, &planner)?;
            0
        }
        Commands::Coverage { date } => {
            let coverage = planner.coverage(date);
            println!("{date} ({})", weekday_of(date));
            for (k, n) in coverage.iter().enumerate() {
                println!("{} | {}", bucket_label(k), n);
            }
            0
        }
        Commands::Report { date, out_csv } => {
            let rows = planner.report(date);
            for r in &rows {
                println!(
                    "{} | cov {:>3} | req {:>3} | exp {:>7.2} | gap {:>+4}",
                    r.label, r.coverage, r.required, r.expected, r.gap
                );
            }
            if let Some(path) = out_csv {
                let mut w = csv::Writer::from_path(path)?;
                w.write_record(["bucket", "coverage", "expected", "required", "gap"])?;
                for r in &rows {
                    w.write_record([
                        r.label.clone(),
                        r.coverage.to_string(),
                        format!("{:.2}", r.expected),
                        r.required.to_string(),
                        r.gap.to_string(),
                    ])?;
                }
                w.flush()?;
            }
            let short = rows.iter().filter(|r| r.is_short()).count();
            if short == 0 {
                println!("OK: fully staffed");
                0
            } else {
                eprintln!("Understaffed in {short} bucket(s)");
                // Code 2 = WARNING/INCOMPLETE
                2
            }
        }
        Commands::ServeRequest {
            method,
            body,
            token,
            write_token,
        } => {
            let body = body
                .map(|p| std::fs::read_to_string(&p).with_context(|| format!("reading {p}")))
                .transpose()?;
            let req = Request {
                method,
                workspace: Some(workspace.to_string()),
                token,
                body,
            };
            let resp = endpoint::handle(&storage, &EndpointConfig { write_token }, &req);
            println!("{}", resp.status);
            if let Some(body) = resp.body {
                println!("{body}");
            }
            if (200..300).contains(&resp.status) {
                0
            } else {
                1
            }
        }
    };

    std::process::exit(code);
}
