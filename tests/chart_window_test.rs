//! Sliding-window behavior of the streaming chart set.

mod common;

use common::{at, samples, TestSampleBuilder};
use liveboard_lib::charts::{ChartSpec, Metric, RedrawTracker, StreamingChartSet};
use liveboard_lib::session::StatsSession;
use liveboard_lib::tui::CHART_PANES;
use pretty_assertions::assert_eq;

fn chart_set(window: usize, seed: Option<&[liveboard_lib::core::Sample]>) -> StreamingChartSet<RedrawTracker> {
    StreamingChartSet::initialize(
        ChartSpec::default_layout(),
        window,
        RedrawTracker::new(CHART_PANES),
        seed,
    )
    .unwrap()
}

#[test]
fn test_seed_then_stream_settles_at_window_plus_one() {
    let seed = samples(0, 5);
    let mut set = chart_set(60, Some(seed.as_slice()));
    assert_eq!(set.chart("tasks").unwrap().len(), 5);

    // 56 more: 61 total, nothing evicted yet
    for sample in samples(5, 56) {
        set.append(&sample);
    }
    let tasks = set.chart("tasks").unwrap();
    assert_eq!(tasks.len(), 61);
    assert_eq!(tasks.time_span().unwrap().0, at(0));

    // 62nd sample evicts the oldest point
    set.append(&TestSampleBuilder::new(61).build());
    let tasks = set.chart("tasks").unwrap();
    assert_eq!(tasks.len(), 61);
    assert_eq!(tasks.time_span(), Some((at(1), at(61))));
}

#[test]
fn test_length_bound_holds_for_long_streams() {
    let window = 10;
    let mut set = chart_set(window, None);

    for sample in samples(0, 500) {
        set.append(&sample);
        for chart in set.charts().iter() {
            assert!(chart.len() <= window + 1);
            let lengths: Vec<usize> = chart.series().iter().map(|s| s.len()).collect();
            assert!(lengths.iter().all(|len| *len == chart.len()));
        }
    }
}

#[test]
fn test_series_share_timestamps() {
    let mut set = chart_set(5, None);
    for sample in samples(0, 20) {
        set.append(&sample);
    }

    for chart in set.charts().iter() {
        let first: Vec<_> = chart.series()[0].timestamps().collect();
        for series in chart.series() {
            assert_eq!(series.timestamps().collect::<Vec<_>>(), first);
        }
    }
}

#[test]
fn test_oversized_seed_is_kept_whole_and_sorted() {
    let mut seed = samples(0, 100);
    seed.reverse();
    let mut set = chart_set(60, Some(seed.as_slice()));

    let tasks = set.chart("tasks").unwrap();
    assert_eq!(tasks.len(), 100);
    assert_eq!(tasks.time_span(), Some((at(0), at(99))));

    // First live sample trims exactly one point
    set.append(&TestSampleBuilder::new(100).build());
    assert_eq!(set.chart("tasks").unwrap().len(), 100);
}

#[test]
fn test_metrics_land_on_their_charts() {
    let mut set = chart_set(60, None);
    set.append(&TestSampleBuilder::new(0).tasks(7).cpu(42.0).build());

    let tasks = &set.chart("tasks").unwrap().series()[0];
    assert_eq!(tasks.metric(), Metric::TaskCount);
    assert_eq!(tasks.latest(), Some(7.0));

    let cpu = &set.chart("cpu").unwrap().series()[0];
    assert_eq!(cpu.metric(), Metric::Cpu);
    assert_eq!(cpu.latest(), Some(42.0));
}

#[test]
fn test_too_many_charts_for_the_dashboard() {
    let layout: Vec<ChartSpec> = (0..=CHART_PANES)
        .map(|i| ChartSpec::new(format!("c{}", i), "C", "").with_series("v", Metric::Cpu))
        .collect();

    let result = StreamingChartSet::initialize(layout, 60, RedrawTracker::new(CHART_PANES), None);
    assert!(result.is_err());
}

#[test]
fn test_session_skips_malformed_messages() {
    let mut session = StatsSession::new(chart_set(60, None));
    session.ingest(&TestSampleBuilder::new(0).to_json()).unwrap();
    assert!(session.ingest("{\"time\":\"not a time\"}").is_err());
    assert!(session.ingest("not json").is_err());
    session.ingest(&TestSampleBuilder::new(1).to_json()).unwrap();

    assert_eq!(session.received(), 4);
    assert_eq!(session.rejected(), 2);
    assert_eq!(session.charts().chart("cpu").unwrap().len(), 2);
    assert_eq!(session.last_sample().unwrap().timestamp, at(1));
}
