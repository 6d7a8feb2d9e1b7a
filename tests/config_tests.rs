use std::time::Duration;

use pathfinder_app::domains::path_planning::MAX_ROADMAP_SAMPLES;
use pathfinder_app::{Config, DomainError};
use tempfile::tempdir;

#[test]
fn test_defaults() {
    let config = Config::default();

    assert_eq!(config.map.path, "map.json");
    assert_eq!(config.roadmap.samples, 600);
    assert_eq!(config.roadmap.neighbors, 12);
    assert_eq!(config.roadmap.max_edge_length, 200.0);
    assert_eq!(config.scheduler.replan_interval_ms, 5000);
    assert_eq!(config.endpoints.position_feed, "/tmp/car_state_server.sock");
    assert_eq!(config.endpoints.path_server, "/tmp/path_planner.sock");
    assert!(!config.endpoints.reclaim_stale_sockets);
    assert!(config.logging.file.is_none());
    assert!(config.validate().is_ok());
}

#[test]
fn test_derived_settings() {
    let config = Config::default();
    let settings = config.scheduler_settings();

    assert_eq!(settings.replan_interval, Duration::from_secs(5));
    assert_eq!(settings.max_edge_length, 200.0);
    assert_eq!(config.poll_timeout(), Duration::from_millis(50));
}

#[test]
fn test_feed_client_address_substitutes_pid() {
    let config = Config::default();
    let address = config.endpoints.feed_client_address();

    assert_eq!(
        address,
        format!("/tmp/pathfinder_client_{}.sock", std::process::id())
    );
    assert!(!address.contains("{pid}"));
}

#[test]
fn test_validate_rejects_degenerate_values() {
    let mut config = Config::default();
    config.roadmap.samples = 0;
    assert!(matches!(
        config.validate(),
        Err(DomainError::InvalidConfiguration { .. })
    ));

    let mut config = Config::default();
    config.roadmap.max_edge_length = -1.0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.roadmap.max_edge_length = f64::NAN;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.scheduler.replan_interval_ms = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_bounds_sample_count() {
    let mut config = Config::default();
    config.roadmap.samples = MAX_ROADMAP_SAMPLES;
    assert!(config.validate().is_ok());

    let config: Config = toml::from_str("[roadmap]\nsamples = 9223372036854775807").unwrap();
    assert!(matches!(
        config.validate(),
        Err(DomainError::InvalidConfiguration { .. })
    ));
}

#[test]
fn test_validate_accepts_huge_neighbor_count() {
    let config: Config = toml::from_str("[roadmap]\nsamples = 3\nneighbors = 9223372036854775807").unwrap();
    assert!(config.validate().is_ok());
}

#[tokio::test]
async fn test_partial_file_keeps_other_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pathfinder.toml");
    tokio::fs::write(
        &path,
        r#"
[roadmap]
samples = 50
seed = 9

[endpoints]
path_server = "/tmp/other_planner.sock"
reclaim_stale_sockets = true

[logging]
file = "logs/pathfinder.log"
"#,
    )
    .await
    .unwrap();

    let config = Config::from_file(&path).await.unwrap();

    assert_eq!(config.roadmap.samples, 50);
    assert_eq!(config.roadmap.seed, 9);
    assert_eq!(config.roadmap.neighbors, 12);
    assert_eq!(config.endpoints.path_server, "/tmp/other_planner.sock");
    assert!(config.endpoints.reclaim_stale_sockets);
    assert_eq!(config.endpoints.position_feed, "/tmp/car_state_server.sock");
    assert_eq!(config.logging.file.as_deref(), Some("logs/pathfinder.log"));
    assert_eq!(config.scheduler.replan_interval_ms, 5000);
}

#[tokio::test]
async fn test_missing_file_falls_back_to_defaults() {
    let dir = tempdir().unwrap();
    let config = Config::load_or_default(dir.path().join("absent.toml"))
        .await
        .unwrap();

    assert_eq!(config, Config::default());
}

#[tokio::test]
async fn test_unparseable_file_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    tokio::fs::write(&path, "[roadmap\nsamples = ").await.unwrap();

    assert!(Config::load_or_default(&path).await.is_err());
}
