use querythree::{Picker, PickerConfig};

#[test]
fn test_config_from_json() {
    let config: PickerConfig = serde_json::from_str(r#"{ "num_threads": 6, "max_distance": 0.25 }"#)
        .expect("valid picker config");
    assert_eq!(config.num_threads, 6);
    assert_eq!(config.max_distance, 0.25);

    let picker = Picker::from_config(&config);
    assert_eq!(picker.num_threads(), 6);
    assert_eq!(picker.max_distance(), 0.25);
}

#[test]
fn test_missing_fields_use_defaults() {
    let config: PickerConfig = serde_json::from_str(r#"{ "max_distance": 1.5 }"#).expect("valid picker config");
    assert_eq!(config, PickerConfig { max_distance: 1.5, ..PickerConfig::default() });
}

#[test]
fn test_out_of_range_values_are_clamped_by_picker() {
    let config: PickerConfig =
        serde_json::from_str(r#"{ "num_threads": 0, "max_distance": -2.0 }"#).expect("valid picker config");
    let picker = Picker::from_config(&config);
    assert_eq!(picker.num_threads(), 1);
    assert_eq!(picker.max_distance(), 0.0);
}

#[test]
fn test_round_trip_through_json() {
    let config = PickerConfig { num_threads: 3, max_distance: 0.5 };
    let json = serde_json::to_string(&config).expect("serializable");
    let back: PickerConfig = serde_json::from_str(&json).expect("deserializable");
    assert_eq!(back, config);
}
