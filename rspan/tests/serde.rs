#![cfg(feature = "serde")]

use rspan::{LoadConfig, LoadStrategy, Span, SpanBase, SpanError, ValidationMode};

#[test]
fn test_load_config_round_trip() {
    let config = LoadConfig::with_strategy(LoadStrategy::Mmap)
        .with_max_size(1 << 20)
        .with_name("room.dat");

    let json = serde_json::to_string(&config).unwrap();
    let parsed: LoadConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_violation_serializes_for_reports() {
    let bytes = [0u8; 4];
    let err = Span::new(&bytes)
        .check_bounds(2, 4, ValidationMode::Write)
        .unwrap_err();

    let value = serde_json::to_value(&err).unwrap();
    let violation = &value["OutOfBounds"];
    assert_eq!(violation["mode"], "Write");
    assert_eq!(violation["index"], 2);
    assert_eq!(violation["delta_in_bytes"], 4);
    assert_eq!(violation["size"], 4);
    assert!(violation["source_byte_offset"].is_null());

    let back: SpanError = serde_json::from_value(value).unwrap();
    assert_eq!(back, err);
}
