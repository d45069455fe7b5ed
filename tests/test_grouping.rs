use geo_area_interpolation::{group_by_timestamp, ChemReading, Diagnostics, Monitor, RawReading};
use std::collections::HashMap;

/// Monitors named after their positions on a coarse lattice
fn create_monitors() -> Vec<Monitor> {
    (0..3)
        .flat_map(|i| {
            (0..3).map(move |j| {
                Monitor::new(format!("{}", i * 3 + j + 1), 10.0 * i as f64, 7.5 * j as f64)
            })
        })
        .collect()
}

/// Readings for every monitor over three timestamps, plus two orphans
fn create_readings() -> Vec<ChemReading> {
    let mut readings = Vec::new();
    for (t, timestamp) in ["4/1/16 0:00", "4/1/16 1:00", "4/1/16 2:00"].iter().enumerate() {
        for id in 1..=9usize {
            readings.push(ChemReading::new(
                "Appluimonia",
                id.to_string(),
                *timestamp,
                (id * 10 + t) as f64 + 0.5,
            ));
        }
    }
    readings.push(ChemReading::new("Appluimonia", "42", "4/1/16 0:00", 1.0));
    readings.push(ChemReading::new("Appluimonia", "x", "4/1/16 3:00", 1.0));
    readings
}

#[test]
fn test_positions_and_values_match_sources() {
    let monitors = create_monitors();
    let readings = create_readings();
    let mut diagnostics = Diagnostics::new();

    let slices = group_by_timestamp(&monitors, &readings, &mut diagnostics);

    let by_id: HashMap<&str, &Monitor> = monitors.iter().map(|m| (m.id.as_str(), m)).collect();
    for (timestamp, samples) in &slices {
        // Sources for this slice, in reading order, with a known monitor
        let sources: Vec<&ChemReading> = readings
            .iter()
            .filter(|r| &r.timestamp == timestamp && by_id.contains_key(r.monitor_id.as_str()))
            .collect();

        assert_eq!(samples.len(), sources.len());
        for (sample, source) in samples.iter().zip(sources) {
            let monitor = by_id[source.monitor_id.as_str()];
            assert_eq!(*sample, RawReading::new(monitor.x, monitor.y, source.value));
        }
    }
}

#[test]
fn test_every_slice_key_has_sources() {
    let monitors = create_monitors();
    let readings = create_readings();
    let mut diagnostics = Diagnostics::new();

    let slices = group_by_timestamp(&monitors, &readings, &mut diagnostics);

    assert_eq!(slices.len(), 3, "The orphan-only timestamp forms no slice");
    for (timestamp, samples) in &slices {
        assert_eq!(samples.len(), 9, "{} should hold one sample per monitor", timestamp);
        assert!(readings.iter().any(|r| &r.timestamp == timestamp));
    }
}

#[test]
fn test_orphans_are_counted_not_fatal() {
    let monitors = create_monitors();
    let readings = create_readings();
    let mut diagnostics = Diagnostics::new();

    let slices = group_by_timestamp(&monitors, &readings, &mut diagnostics);

    assert!(!slices.is_empty());
    assert_eq!(diagnostics.lookup_failures.len(), 2);
    assert!(diagnostics.warnings()[0].starts_with("2 reading(s) dropped"));
}

#[test]
fn test_no_readings_no_slices() {
    let mut diagnostics = Diagnostics::new();
    let slices = group_by_timestamp(&create_monitors(), &[], &mut diagnostics);

    assert!(slices.is_empty());
    assert!(diagnostics.is_clean());
}
