use ais_features::export::write_table;
use ais_features::motion::geodesic_distance;
use ais_features::{engineer_features, EnrichedRecord, FeatureConfig, FeatureError, RawTable};

fn table(rows: &[[&str; 5]]) -> RawTable {
    RawTable {
        columns: ["vesselId", "time", "latitude", "longitude", "heading"]
            .iter()
            .map(|c| c.to_string())
            .collect(),
        rows: rows
            .iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect(),
    }
}

fn config(horizon: usize) -> FeatureConfig {
    FeatureConfig {
        horizon,
        parallel: true,
    }
}

fn vessel<'a>(rows: &'a [EnrichedRecord], id: &str) -> Vec<&'a EnrichedRecord> {
    rows.iter().filter(|r| r.record.vessel_id == id).collect()
}

// Two vessels reporting every 20 minutes, interleaved and out of order.
fn interleaved() -> RawTable {
    table(&[
        ["B", "2024-01-12 07:20:00", "60.00", "5.10", "90"],
        ["A", "2024-01-12 07:40:00", "59.02", "10.00", "185"],
        ["A", "2024-01-12 07:00:00", "59.00", "10.00", "170"],
        ["B", "2024-01-12 07:00:00", "60.00", "5.00", "80"],
        ["A", "2024-01-12 07:20:00", "59.01", "10.00", "175"],
        ["B", "2024-01-12 07:40:00", "", "", "100"],
        ["A", "2024-01-12 08:00:00", "59.03", "10.00", "190"],
        ["B", "2024-01-12 08:00:00", "60.00", "5.30", ""],
    ])
}

#[test]
fn test_first_record_of_each_vessel_is_zero() {
    let out = engineer_features(&interleaved(), &config(3)).unwrap();
    for id in ["A", "B"] {
        let first = vessel(&out.rows, id)[0];
        assert_eq!(first.motion.distance_traveled, 0.0);
        assert_eq!(first.motion.time_diff, 0.0);
        assert_eq!(first.motion.speed, 0.0);
        assert_eq!(first.motion.heading_change, 0.0);
    }
}

#[test]
fn test_deltas_never_cross_vessels() {
    let out = engineer_features(&interleaved(), &config(3)).unwrap();

    // Canonical order: all of A, then all of B, each by time.
    let order: Vec<usize> = out.rows.iter().map(|r| r.record.row).collect();
    assert_eq!(order, vec![2, 4, 1, 6, 3, 0, 5, 7]);

    for id in ["A", "B"] {
        let rows = vessel(&out.rows, id);
        for pair in rows.windows(2) {
            assert_eq!(pair[1].motion.time_diff, 1200.0);
            if let (Some(a), Some(b)) = (pair[0].record.position(), pair[1].record.position()) {
                let expected = geodesic_distance(a, b);
                assert!((pair[1].motion.distance_traveled - expected).abs() < 1e-6);
                assert!((pair[1].motion.speed - expected / 1200.0).abs() < 1e-9);
            } else {
                assert_eq!(pair[1].motion.distance_traveled, 0.0);
            }
        }
    }

    // First B record follows the last A record but starts fresh.
    assert_eq!(out.rows[4].record.vessel_id, "B");
    assert_eq!(out.rows[4].motion.time_diff, 0.0);
}

#[test]
fn test_heading_change_is_raw() {
    let out = engineer_features(&interleaved(), &config(3)).unwrap();
    let a = vessel(&out.rows, "A");
    let changes: Vec<f64> = a.iter().map(|r| r.motion.heading_change).collect();
    assert_eq!(changes, vec![0.0, 5.0, 10.0, 5.0]);

    let b = vessel(&out.rows, "B");
    let changes: Vec<f64> = b.iter().map(|r| r.motion.heading_change).collect();
    assert_eq!(changes, vec![0.0, 10.0, 10.0, 0.0]);
}

#[test]
fn test_future_targets_boundary() {
    // V1 reports at 0, 20, 40, 60 and 80 minutes.
    let input = table(&[
        ["V1", "2024-01-12 00:00:00", "10.0", "20.0", ""],
        ["V1", "2024-01-12 00:20:00", "10.1", "20.1", ""],
        ["V1", "2024-01-12 00:40:00", "10.2", "20.2", ""],
        ["V1", "2024-01-12 01:00:00", "10.3", "20.3", ""],
        ["V1", "2024-01-12 01:20:00", "10.4", "20.4", ""],
    ]);
    let out = engineer_features(&input, &config(3)).unwrap();
    let lat: Vec<Option<f64>> = out.rows.iter().map(|r| r.target.latitude_future).collect();
    let lon: Vec<Option<f64>> = out.rows.iter().map(|r| r.target.longitude_future).collect();

    // t=0 looks at t=60, t=20 at t=80; everything after carries t=80 forward.
    assert_eq!(
        lat,
        vec![Some(10.3), Some(10.4), Some(10.4), Some(10.4), Some(10.4)]
    );
    assert_eq!(
        lon,
        vec![Some(20.3), Some(20.4), Some(20.4), Some(20.4), Some(20.4)]
    );
}

#[test]
fn test_short_partition_does_not_borrow_from_neighbour() {
    let input = table(&[
        ["A", "2024-01-12 00:00:00", "1.0", "1.0", ""],
        ["A", "2024-01-12 00:20:00", "1.1", "1.0", ""],
        ["A", "2024-01-12 00:40:00", "1.2", "1.0", ""],
        ["A", "2024-01-12 01:00:00", "1.3", "1.0", ""],
        ["B", "2024-01-12 00:00:00", "2.0", "2.0", ""],
        ["B", "2024-01-12 00:20:00", "2.1", "2.0", ""],
    ]);
    let out = engineer_features(&input, &config(3)).unwrap();

    let a = vessel(&out.rows, "A");
    assert_eq!(a[0].target.latitude_future, Some(1.3));
    assert_eq!(a[3].target.latitude_future, Some(1.3));

    for r in vessel(&out.rows, "B") {
        assert_eq!(r.target.latitude_future, None);
        assert_eq!(r.target.longitude_future, None);
    }
}

#[test]
fn test_calendar_features() {
    let input = table(&[["A", "2024-03-17T22:15:00Z", "", "", ""]]);
    let out = engineer_features(&input, &config(3)).unwrap();
    let c = out.rows[0].calendar;
    assert_eq!((c.hour, c.day_of_week, c.month), (22, 6, 3));
}

#[test]
fn test_duplicate_timestamps_are_reported_not_fatal() {
    let input = table(&[
        ["A", "2024-01-12 00:00:00", "1.0", "1.0", ""],
        ["A", "2024-01-12 00:20:00", "1.1", "1.0", ""],
        ["A", "2024-01-12 00:20:00", "1.2", "1.0", ""],
    ]);
    let out = engineer_features(&input, &config(3)).unwrap();

    assert_eq!(out.rows.len(), 3);
    assert_eq!(out.anomalies.len(), 1);
    assert_eq!(out.anomalies[0].row, 2);
    assert_eq!(out.rows[2].motion.time_diff, 0.0);
    assert_eq!(out.rows[2].motion.speed, 0.0);
    assert!(out.rows[2].motion.distance_traveled > 0.0);
}

#[test]
fn test_schema_and_parse_errors_abort() {
    let missing_vessel = table(&[
        ["A", "2024-01-12 00:00:00", "1.0", "1.0", ""],
        ["", "2024-01-12 00:20:00", "1.1", "1.0", ""],
    ]);
    let err = engineer_features(&missing_vessel, &config(3)).unwrap_err();
    assert!(matches!(err, FeatureError::Schema { row: 1, .. }));

    let bad_time = table(&[["A", "12th of January", "1.0", "1.0", ""]]);
    assert!(engineer_features(&bad_time, &config(3)).unwrap_err().is_parse());

    let bad_coordinate = table(&[["A", "2024-01-12 00:00:00", "one", "1.0", ""]]);
    assert!(engineer_features(&bad_coordinate, &config(3))
        .unwrap_err()
        .is_parse());

    let mut no_heading = table(&[]);
    no_heading.columns.pop();
    assert!(engineer_features(&no_heading, &config(3))
        .unwrap_err()
        .is_schema());
}

#[test]
fn test_idempotent() {
    let input = interleaved();
    let first = engineer_features(&input, &config(3)).unwrap();
    let second = engineer_features(&input, &config(3)).unwrap();
    assert_eq!(first, second);

    let mut first_bytes = Vec::new();
    write_table(&first, &mut first_bytes, b'|').unwrap();
    let mut second_bytes = Vec::new();
    write_table(&second, &mut second_bytes, b'|').unwrap();
    assert!(!first_bytes.is_empty());
    assert_eq!(first_bytes, second_bytes);
}
