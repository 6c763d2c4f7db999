#![forbid(unsafe_code)]
use chrono::{NaiveDate, TimeZone, Utc};
use couverture::{
    Agent, DayBlock, Level, PlanError, Planner, Snapshot, VacationError, Weekday,
};

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
}

fn planner_with(names: &[&str]) -> Planner {
    let mut p = Planner::new();
    for n in names {
        p.add_agent(Agent::new(*n, "SA", Level::Mid)).unwrap();
    }
    p
}

#[test]
fn duplicate_and_blank_agents_are_rejected() {
    let mut p = planner_with(&["Amal"]);
    assert!(matches!(
        p.add_agent(Agent::new("Amal", "EG", Level::Junior)),
        Err(PlanError::DuplicateAgent(name)) if name == "Amal"
    ));
    assert!(matches!(
        p.add_agent(Agent::new("  ", "EG", Level::Junior)),
        Err(PlanError::EmptyAgentName)
    ));
    assert_eq!(p.agents().len(), 1);
}

#[test]
fn removing_an_agent_cascades() {
    let mut p = planner_with(&["Amal", "Omar"]);
    p.set_block("Amal", Weekday::Mon, DayBlock::new(true, 480, 960, None, 0))
        .unwrap();
    p.add_vacation("Amal", monday(), monday()).unwrap();

    let removed = p.remove_agent("Amal").unwrap();
    assert_eq!(removed.name, "Amal");
    assert!(!p.roster().contains_agent("Amal"));
    assert!(p.vacations().ranges("Amal").is_empty());
    assert!(p.vacations().is_empty());
    assert!(matches!(
        p.remove_agent("Amal"),
        Err(PlanError::UnknownAgent(_))
    ));
}

#[test]
fn unknown_agents_cannot_get_blocks_or_vacations() {
    let mut p = planner_with(&["Amal"]);
    assert!(matches!(
        p.set_block("Ghost", Weekday::Mon, DayBlock::default_block()),
        Err(PlanError::UnknownAgent(_))
    ));
    assert!(matches!(
        p.add_vacation("Ghost", monday(), monday()),
        Err(PlanError::UnknownAgent(_))
    ));
    let err = p
        .add_vacation("Amal", monday(), monday().pred_opt().unwrap())
        .unwrap_err();
    assert!(matches!(
        err,
        PlanError::Vacation(VacationError::InvalidRange { .. })
    ));
}

#[test]
fn report_zips_coverage_and_requirement() {
    let p = planner_with(&["Amal", "Omar"]);
    let rows = p.report(monday());
    assert_eq!(rows.len(), 48);

    let peak = &rows[30];
    assert_eq!(peak.label, "15:00");
    assert_eq!(peak.coverage, 2);
    assert_eq!(peak.required, 6);
    assert_eq!(peak.gap, -4);
    assert!(peak.is_short());

    let night = &rows[4];
    assert_eq!(night.coverage, 0);
    assert_eq!(night.required, 1);

    let short = p.shortfalls(monday());
    assert!(short.iter().all(|r| r.gap < 0));
    assert!(short.iter().any(|r| r.index == 30));
}

#[test]
fn failed_import_leaves_state_untouched() {
    let mut p = planner_with(&["Amal"]);
    let err = p
        .import_csv("agent,day\nNadia,Mon\n".as_bytes())
        .unwrap_err();
    assert!(matches!(err, PlanError::Import(_)));
    assert_eq!(p.agents().len(), 1);
    assert!(p.roster().is_empty());

    let summary = p
        .import_csv(
            "agent,day,active,start,end,break_start,break_minutes\nNadia,Mon,1,08:00,12:00,,0\n"
                .as_bytes(),
        )
        .unwrap();
    assert_eq!(summary.created_agents, vec!["Nadia"]);
    assert_eq!(p.agents().len(), 2);
    assert_eq!(p.block("Nadia", Weekday::Mon).end_min, 720);
    assert_eq!(p.block("Nadia", Weekday::Tue), DayBlock::default_block());
}

#[test]
fn snapshot_round_trip_through_json() {
    let mut p = planner_with(&["Amal"]);
    p.set_block("Amal", Weekday::Sat, DayBlock::new(true, 600, 900, Some(720), 30))
        .unwrap();
    p.add_vacation("Amal", monday(), monday()).unwrap();
    p.params_mut().service_buffer = 2;
    p.select_date(monday());

    let at = Utc.with_ymd_and_hms(2024, 6, 10, 8, 0, 0).unwrap();
    let value = p.to_snapshot(at).to_value().unwrap();
    assert_eq!(value["brand"], "Montana");
    assert_eq!(value["serviceBuffer"], 2);
    assert_eq!(value["selectedDay"], "Mon");
    assert_eq!(value["selectedDate"], "2024-06-10");
    assert_eq!(value["roster"]["Amal"]["Sat"]["breakStartMin"], 720);
    assert_eq!(value["vacations"]["Amal"][0]["end"], "2024-06-10");

    let restored = Planner::from_snapshot(Snapshot::from_value(value).unwrap());
    assert_eq!(restored.agents(), p.agents());
    assert_eq!(restored.roster(), p.roster());
    assert_eq!(restored.vacations(), p.vacations());
    assert_eq!(restored.params(), p.params());
    assert_eq!(restored.selected_date(), Some(monday()));
}

#[test]
fn empty_blob_loads_a_fresh_workspace() {
    let snapshot = Snapshot::from_value(serde_json::json!({})).unwrap();
    assert_eq!(snapshot.brand, "Montana");
    assert!((snapshot.occupancy - 0.85).abs() < 1e-12);
    let p = Planner::from_snapshot(snapshot);
    assert!(!p.agents().is_empty());
    assert!(p.roster().is_empty());
}

#[test]
fn orphaned_entries_are_dropped_on_load() {
    let blob = serde_json::json!({
        "agents": [{
            "name": "Amal", "country": "SA", "remote": false,
            "level": "senior", "fridayAllowed": true, "breakPref": "none"
        }],
        "roster": {
            "Ghost": {"Mon": {"active": true, "startMin": 0, "endMin": 60}}
        },
        "vacations": {
            "Ghost": [{"start": "2024-06-01", "end": "2024-06-02"}]
        }
    });
    let p = Planner::from_snapshot(Snapshot::from_value(blob).unwrap());
    assert_eq!(p.agents().len(), 1);
    assert!(p.roster().is_empty());
    assert!(p.vacations().is_empty());
}

#[test]
fn duplicate_agents_keep_first_occurrence_on_load() {
    let blob = serde_json::json!({
        "agents": [
            {"name": "Amal", "country": "SA", "remote": false, "level": "senior", "fridayAllowed": true, "breakPref": "60"},
            {"name": "Omar", "country": "SA", "remote": false, "level": "mid", "fridayAllowed": true, "breakPref": "60"},
            {"name": "Amal", "country": "EG", "remote": false, "level": "junior", "fridayAllowed": true, "breakPref": "60"}
        ]
    });
    let p = Planner::from_snapshot(Snapshot::from_value(blob).unwrap());
    let names: Vec<&str> = p.agents().iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Amal", "Omar"]);
    assert_eq!(p.agents()[0].country, "SA");

    // Amal n'est compté qu'une fois (bloc par défaut, 10:00-10:30)
    assert_eq!(p.coverage(monday())[20], 2);
}

struct BrokenWriter;

impl std::io::Write for BrokenWriter {
    fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn export_failure_surfaces_as_plan_error() {
    let p = planner_with(&["Amal"]);
    let err = p.export_csv(BrokenWriter).unwrap_err();
    assert!(matches!(err, PlanError::Other(_)));

    let mut buf = Vec::new();
    p.export_csv(&mut buf).unwrap();
    assert!(String::from_utf8(buf).unwrap().starts_with("agent,day,active"));
}
