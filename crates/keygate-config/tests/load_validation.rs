//! Config load validation tests for keygate-config.
// crates/keygate-config/tests/load_validation.rs
// =============================================================================
// Module: Config Load Validation Tests
// Description: Validate config loading guards (path, size, encoding).
// Purpose: Ensure config input handling is strict and fail-closed.
// =============================================================================

use std::io::Write;
use std::path::Path;

use keygate_config::ConfigError;
use keygate_config::GatewayConfig;
use tempfile::NamedTempFile;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<GatewayConfig, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config load".to_string()),
    }
}

#[test]
fn load_rejects_path_too_long() -> TestResult {
    // One byte over the 4096-byte total path limit.
    let long_path = format!("/etc/keygate/{}", "k".repeat(4_084));
    let path = Path::new(&long_path);
    assert_invalid(GatewayConfig::load(Some(path)), "config path exceeds max length")?;
    Ok(())
}

#[test]
fn load_rejects_path_component_too_long() -> TestResult {
    // One byte over the 255-byte component limit, inside a valid directory.
    let long_component = format!("/tmp/{}.toml", "k".repeat(251));
    let path = Path::new(&long_component);
    assert_invalid(GatewayConfig::load(Some(path)), "config path component too long")?;
    Ok(())
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    // A syntactically valid file padded past the 1 MiB cap with comments;
    // the size check must fire before any parsing happens.
    file.write_all(b"[admission]\nadmin_secrets = []\n").map_err(|err| err.to_string())?;
    let padding = vec![b'#'; 2 * 1024 * 1024];
    file.write_all(&padding).map_err(|err| err.to_string())?;
    assert_invalid(GatewayConfig::load(Some(file.path())), "config file exceeds size limit")?;
    Ok(())
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    // Truncated two-byte UTF-8 sequence embedded in otherwise valid TOML.
    file.write_all(b"[admission]\nadmin_secrets = [\"sk-\xC3\x28\"]\n")
        .map_err(|err| err.to_string())?;
    assert_invalid(GatewayConfig::load(Some(file.path())), "config file must be utf-8")?;
    Ok(())
}

#[test]
fn load_rejects_missing_file() -> TestResult {
    let path = Path::new("does-not-exist-keygate.toml");
    match GatewayConfig::load(Some(path)) {
        Err(ConfigError::Io(_)) => Ok(()),
        Err(other) => Err(format!("expected io error, got {other}")),
        Ok(_) => Err("expected missing file to fail".to_string()),
    }
}

#[test]
fn load_accepts_valid_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    let content = r#"
[admission]
admin_secrets = ["sk-master"]
allowed_ips = ["203.0.113.7"]
use_x_forwarded_for = true
allowed_routes = ["/chat/completions"]
"#;
    file.write_all(content.as_bytes()).map_err(|err| err.to_string())?;
    let config = GatewayConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    if config.admission.admin_secrets != vec!["sk-master".to_string()] {
        return Err("admin secrets did not round-trip".to_string());
    }
    if !config.admission.use_x_forwarded_for {
        return Err("forwarding trust flag did not round-trip".to_string());
    }
    Ok(())
}

#[test]
fn parse_rejects_unknown_fields() -> TestResult {
    let content = r#"
[admission]
admin_secrets = []
alowed_ips = ["203.0.113.7"]
"#;
    match GatewayConfig::from_toml_str(content) {
        Err(ConfigError::Parse(_)) => Ok(()),
        Err(other) => Err(format!("expected parse error, got {other}")),
        Ok(_) => Err("expected unknown field to fail".to_string()),
    }
}

#[test]
fn empty_config_defaults_to_no_restrictions() -> TestResult {
    let config = GatewayConfig::from_toml_str("").map_err(|err| err.to_string())?;
    if !config.admission.admin_secrets.is_empty() {
        return Err("expected no admin secrets".to_string());
    }
    if config.admission.allowed_ips.is_some() || config.admission.allowed_routes.is_some() {
        return Err("expected absent allow-lists".to_string());
    }
    Ok(())
}
