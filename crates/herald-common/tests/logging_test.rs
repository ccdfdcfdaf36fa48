use herald_common::{init_logging, LoggingConfig};
use tempfile::TempDir;

#[test]
fn test_init_logging_writes_to_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("herald.log");
    let config = LoggingConfig {
        level: "debug".to_string(),
        json_format: true,
        pretty_format: false,
        file_path: Some(path.to_string_lossy().into_owned()),
        ..LoggingConfig::default()
    };

    init_logging(config.clone()).unwrap();
    tracing::info!(recipients = 3, "Broadcast delivered");

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("Logging initialized"));
    assert!(written.contains("Broadcast delivered"));

    assert!(init_logging(config).is_err());
}
