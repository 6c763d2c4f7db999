use super::{BucketRow, Planner};
use crate::coverage::coverage_for_date;
use crate::time::{bucket_label, weekday_of};
use chrono::NaiveDate;

pub(super) fn report(planner: &Planner, date: NaiveDate) -> Vec<BucketRow> {
    let coverage = coverage_for_date(&planner.roster, &planner.agents, date, &planner.vacations);
    let demand = planner.params.demand_for(weekday_of(date));

    coverage
        .iter()
        .zip(demand.expected.iter().zip(demand.required.iter()))
        .enumerate()
        .map(|(k, (&coverage, (&expected, &required)))| BucketRow {
            index: k,
            label: bucket_label(k),
            coverage,
            expected,
            required,
            gap: i64::from(coverage) - i64::from(required),
        })
        .collect()
}
