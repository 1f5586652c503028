use todo_store::TodoStoreError;

#[test]
fn test_error_types() {
    let err = TodoStoreError::ConfigError("Invalid log level: loud".to_string());
    assert_eq!(err.to_string(), "Configuration error: Invalid log level: loud");

    let err = TodoStoreError::InvalidReorder("duplicate task id 2".to_string());
    assert_eq!(err.to_string(), "Invalid reorder: duplicate task id 2");
}

#[test]
fn test_json_errors_convert() {
    let err: TodoStoreError = serde_json::from_str::<serde_json::Value>("{")
        .unwrap_err()
        .into();
    assert!(matches!(err, TodoStoreError::SerializationError(_)));
}
