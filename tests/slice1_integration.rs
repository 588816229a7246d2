//! Integration tests for Slice 1 - Sensor pipeline
//!
//! Tests the full path: raw sample → buffer → metric → unlock → output

use glitchlock::core::{plot_height, MetricDeriver, SampleBuffer, SensorPipeline};
use glitchlock::types::{ReasonCode, SensorSample, SeverityBand, Unit};
use glitchlock::STANDARD_GRAVITY_MS2;
use pretty_assertions::assert_eq;

fn rest(t: i64) -> SensorSample {
    SensorSample::axes(0.0, 0.0, STANDARD_GRAVITY_MS2, t)
}

/// Twelve resting samples stay locked; a 2g shake unlocks; calm again stays unlocked
#[test]
fn test_shake_unlocks_and_stays_unlocked() {
    let mut pipeline = SensorPipeline::new(10, Unit::G, 2.0);

    for t in 0..12 {
        let out = pipeline.process(rest(t * 20));
        assert!(!out.is_unlocked, "resting sample {} must not unlock", t);
    }
    let out = pipeline.process(rest(240));
    let metric = out.metric.unwrap();
    assert_eq!(metric.converted_value, 1.0);
    assert_eq!(metric.window_max, 1.0);
    assert_eq!(out.band(), SeverityBand::Red);

    let out = pipeline.process(SensorSample::axes(0.0, 0.0, 19.62, 260));
    assert_eq!(out.metric.unwrap().converted_value, 2.0);
    assert!(out.is_unlocked);
    assert!(out.just_unlocked);
    assert_eq!(out.reason, ReasonCode::R001_UNLOCKED);

    let out = pipeline.process(rest(280));
    assert!(out.is_unlocked);
    assert!(!out.just_unlocked);
    assert_eq!(out.reason, ReasonCode::R001_ALREADY_UNLOCKED);
}

#[test]
fn test_single_sample_is_empty_state() {
    let mut pipeline = SensorPipeline::new(10, Unit::G, 2.0);
    let out = pipeline.process(SensorSample::axes(0.0, 0.0, 100.0, 0));
    assert!(out.metric.is_none());
    assert!(!out.is_unlocked);
    assert_eq!(out.reason, ReasonCode::R002_INSUFFICIENT_DATA);
    assert!(out.to_parseable_string().contains("value=-"));
}

#[test]
fn test_buffer_keeps_newest_in_order() {
    let mut buffer = SampleBuffer::new(4);
    for t in 0..9 {
        buffer.push(SensorSample::speed(t as f64, t));
    }
    let ts: Vec<i64> = buffer.snapshot().iter().map(|s| s.timestamp_ms).collect();
    assert_eq!(ts, vec![5, 6, 7, 8]);
    assert_eq!(buffer.len(), 4);
}

#[test]
fn test_snapshot_is_idempotent() {
    let mut buffer = SampleBuffer::new(3);
    buffer.push(rest(0));
    buffer.push(rest(1));
    assert_eq!(buffer.snapshot(), buffer.snapshot());
}

#[test]
fn test_band_boundaries_are_inclusive() {
    assert_eq!(SeverityBand::from_max(24.999), SeverityBand::Red);
    assert_eq!(SeverityBand::from_max(25.0), SeverityBand::Orange);
    assert_eq!(SeverityBand::from_max(40.0), SeverityBand::Yellow);
    assert_eq!(SeverityBand::from_max(50.0), SeverityBand::Green);
    assert_eq!(SeverityBand::from_max(99.99), SeverityBand::Green);
    assert_eq!(SeverityBand::from_max(100.0), SeverityBand::Pink);
}

#[test]
fn test_plot_geometry_full_scale() {
    let deriver = MetricDeriver::new(Unit::MetersPerSecondSquared);
    let window = vec![
        SensorSample::axes(0.0, 0.0, 25.0, 0),
        SensorSample::axes(0.0, 0.0, 50.0, 20),
    ];
    let plot = deriver.plot(&window, 10).unwrap();

    assert_eq!(plot.height, 200.0);
    assert_eq!(plot.min, 0.0);
    assert_eq!(plot.max, 50.0);
    assert_eq!(plot.band, SeverityBand::Green);

    assert_eq!(plot.points[0].x, 0.0);
    assert_eq!(plot.points[0].y, 100.0);
    let newest = plot.newest().unwrap();
    assert!((newest.x - 300.0 / 9.0).abs() < 1e-9);
    assert_eq!(newest.y, 0.0);
}

#[test]
fn test_plot_height_clamps() {
    assert_eq!(plot_height(0.0), 30.0);
    assert_eq!(plot_height(25.0), 115.0);
    assert_eq!(plot_height(500.0), 200.0);
}

#[test]
fn test_units_scale_uniformly() {
    let window = vec![rest(0), SensorSample::axes(0.0, 0.0, 19.62, 1)];
    let g = MetricDeriver::new(Unit::G).derive(&window).unwrap();
    let ms2 = MetricDeriver::new(Unit::MetersPerSecondSquared).derive(&window).unwrap();
    let fts2 = MetricDeriver::new(Unit::FeetPerSecondSquared).derive(&window).unwrap();

    assert_eq!(g.converted_value, 2.0);
    assert_eq!(ms2.converted_value, 19.62);
    assert!((fts2.converted_value - 64.34).abs() < 1e-9);
}

#[test]
fn test_scalar_speed_channel() {
    let mut pipeline = SensorPipeline::new(5, Unit::MetersPerSecondSquared, 30.0);
    pipeline.process(SensorSample::speed(3.0, 0));
    let out = pipeline.process(SensorSample::speed(31.0, 1));
    assert!(out.just_unlocked);
    assert_eq!(out.metric.unwrap().raw_magnitude, 31.0);
}
