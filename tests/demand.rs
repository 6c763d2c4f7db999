#![forbid(unsafe_code)]
use couverture::demand::{
    expected_volume, half_hour_split, required_agents, ForecastParams, DEFAULT_HOURLY_PCT,
};
use couverture::Weekday;

fn params(buffer: u32) -> ForecastParams {
    ForecastParams {
        service_buffer: buffer,
        ..ForecastParams::default()
    }
}

#[test]
fn default_profile_peaks_at_three_pm() {
    let total: f64 = DEFAULT_HOURLY_PCT.iter().sum();
    assert!((total - 100.0).abs() < 1e-9);
    let peak = DEFAULT_HOURLY_PCT
        .iter()
        .cloned()
        .fold(f64::MIN, f64::max);
    assert_eq!(peak, 7.2);
    assert_eq!(DEFAULT_HOURLY_PCT[15], 7.2);
}

#[test]
fn hourly_share_is_split_across_both_half_hours() {
    let half = half_hour_split(&DEFAULT_HOURLY_PCT);
    assert!((half[30] - 3.6).abs() < 1e-12);
    assert!((half[31] - 3.6).abs() < 1e-12);
    assert!((half.iter().sum::<f64>() - 100.0).abs() < 1e-9);
}

#[test]
fn peak_bucket_requirement_matches_worked_example() {
    // 650 * 0.036 * 6 / (30 * 0.85) = 5.505... -> 6
    for buffer in [0, 2] {
        let p = params(buffer);
        let curve = p.demand_for(Weekday::Mon);
        assert!((curve.expected[30] - 23.4).abs() < 1e-6);
        assert_eq!(curve.required[30], 6 + buffer);
        assert_eq!(curve.required[31], 6 + buffer);
    }
}

#[test]
fn total_requirement_grows_with_buffer() {
    let mut last = 0u32;
    for buffer in 0..5 {
        let curve = params(buffer).demand_for(Weekday::Tue);
        let total: u32 = curve.required.iter().sum();
        assert!(total >= last);
        last = total;
    }
}

#[test]
fn profile_is_normalized_by_its_actual_sum() {
    // ne somme pas à 100 : seule la proportion compte
    let mut hourly = [0.0; 24];
    hourly[10] = 1.0;
    hourly[11] = 3.0;
    let expected = expected_volume(&hourly, 400.0);
    assert!((expected[20] - 50.0).abs() < 1e-9);
    assert!((expected[23] - 150.0).abs() < 1e-9);
    assert!((expected.iter().sum::<f64>() - 400.0).abs() < 1e-9);
}

#[test]
fn empty_profile_demands_only_the_buffer() {
    let expected = expected_volume(&[0.0; 24], 650.0);
    assert!(expected.iter().all(|v| *v == 0.0));
    let required = required_agents(&expected, &params(3));
    assert!(required.iter().all(|r| *r == 3));
}

#[test]
fn uniform_profile_spreads_volume_evenly() {
    let hourly = [100.0 / 24.0; 24];
    let expected = expected_volume(&hourly, 650.0);
    // 650 / 48 = 13.54 tickets, * 6 / 25.5 = 3.19 -> 4
    let required = required_agents(&expected, &params(0));
    assert!(required.iter().all(|r| *r == 4));
}

#[test]
fn zero_occupancy_uses_capacity_floor() {
    let mut hourly = [0.0; 24];
    hourly[0] = 100.0;
    let expected = expected_volume(&hourly, 1.0);
    let p = ForecastParams {
        occupancy: 0.0,
        aht_min: 1.0,
        ..ForecastParams::default()
    };
    // 0.5 ticket * 1 min / 0.1 = 5
    let required = required_agents(&expected, &p);
    assert_eq!(required[0], 5);
    assert_eq!(required[1], 5);
    assert_eq!(required[2], 0);
}

#[test]
fn short_and_negative_profiles_are_tolerated() {
    let half = half_hour_split(&[4.0, -2.0]);
    assert_eq!(half[0], 2.0);
    assert_eq!(half[1], 2.0);
    assert_eq!(half[2], 0.0);
    assert!(half[4..].iter().all(|v| *v == 0.0));
}

#[test]
fn weekday_overrides_are_used() {
    let mut p = ForecastParams::default();
    p.daily_avg.insert(Weekday::Sat, 0.0);
    let curve = p.demand_for(Weekday::Sat);
    assert!(curve.required.iter().all(|r| *r == 0));
    assert_eq!(p.daily_avg_for(Weekday::Sun), 380.0);
}
