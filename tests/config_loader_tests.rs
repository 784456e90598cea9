//! Config loader tests over layered env files.

use std::fs;

use posgate::config::ConfigLoader;

#[test]
fn layered_env_files_override_in_order() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(".env"),
        "POSGATE_PROFILE=test\nPOSGATE_DB_MAX_CONNECTIONS=3\nPOSGATE_API_BIND_ADDR=127.0.0.1:9100\n",
    )
    .unwrap();
    fs::write(dir.path().join(".env.local"), "POSGATE_DB_MAX_CONNECTIONS=4\n").unwrap();
    fs::write(dir.path().join(".env.test"), "POSGATE_LOG_LEVEL=debug\n").unwrap();

    let config = ConfigLoader::with_base_dir(dir.path().to_path_buf())
        .load()
        .unwrap();

    assert_eq!(config.profile, "test");
    assert_eq!(config.db_max_connections, 4);
    assert_eq!(config.log_level, "debug");
    assert_eq!(config.api_bind_addr, "127.0.0.1:9100");
}

#[test]
fn missing_env_files_fall_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();

    let config = ConfigLoader::with_base_dir(dir.path().to_path_buf())
        .load()
        .unwrap();

    assert_eq!(config.profile, "local");
    assert_eq!(config.db_max_connections, 10);
    assert_eq!(config.seed_admin_password, "admin");
}

#[test]
fn invalid_bind_addr_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(".env"), "POSGATE_API_BIND_ADDR=not-an-addr\n").unwrap();

    let result = ConfigLoader::with_base_dir(dir.path().to_path_buf()).load();

    assert!(result.is_err());
}
