mod settings;

pub use settings::{BillingSettings, CenterSettings, Config, DataSettings};

use crate::error::{Result, TuitionError};
use crate::records::{Payment, Student};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (XDG-style, falling back to ~/.tuition/)
pub fn config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "tuition") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    let home = dirs_home().ok_or_else(|| {
        TuitionError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".tuition"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_home() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Resolve a data file setting against the config directory
pub fn resolve_data_path(setting: &str, config_dir: &Path) -> PathBuf {
    let path = expand_path(setting);
    if path.is_absolute() {
        path
    } else {
        config_dir.join(path)
    }
}

/// Load the main config.toml
pub fn load_config(config_dir: &Path) -> Result<Config> {
    if !config_dir.exists() {
        return Err(TuitionError::ConfigNotFound(config_dir.to_path_buf()));
    }
    let path = config_dir.join("config.toml");
    if !path.exists() {
        return Err(TuitionError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    let config: Config =
        toml::from_str(&content).map_err(|e| TuitionError::ConfigParse { path: path.clone(), source: e })?;
    config.billing.validate()?;
    tracing::debug!(path = %path.display(), center = %config.center.name, "loaded config");
    Ok(config)
}

/// Load the student roster snapshot
pub fn load_students(config_dir: &Path, config: &Config) -> Result<Vec<Student>> {
    let path = resolve_data_path(&config.data.students, config_dir);
    load_json_list(&path)
}

/// Load the payment listing snapshot
pub fn load_payments(config_dir: &Path, config: &Config) -> Result<Vec<Payment>> {
    let path = resolve_data_path(&config.data.payments, config_dir);
    load_json_list(&path)
}

fn load_json_list<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Err(TuitionError::DataFileNotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    let raw: Vec<Value> = serde_json::from_str(&content).map_err(|e| TuitionError::DataParse {
        path: path.to_path_buf(),
        source: e,
    })?;

    // One malformed record must not hide the rest of the listing
    let total = raw.len();
    let records: Vec<T> = raw
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(path = %path.display(), index, error = %e, "skipping malformed record");
                None
            }
        })
        .collect();

    tracing::debug!(
        path = %path.display(),
        count = records.len(),
        skipped = total - records.len(),
        "loaded records"
    );
    Ok(records)
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[center]
name = "Education Center"
# phone = "+998-90-123-45-67"   # optional

[billing]
monthly_fee = 320000
currency = "UZS"
confirmed_only = false   # count only payments confirmed by an admin

# Per-group monthly fees. Students in a listed group are billed this amount
# instead of monthly_fee; the first matching group wins.
[billing.group_fees]
# "Math A" = 350000

[data]
# Exports of the backend's student and payment listings (JSON arrays)
students = "students.json"
payments = "payments.json"
"#;

/// Initial content for the data snapshots
pub const EMPTY_LIST: &str = "[]\n";

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &Path, billing: &str) {
        let content = format!("[center]\nname = \"Test Center\"\n\n[billing]\n{billing}");
        fs::write(dir.join("config.toml"), content).unwrap();
    }

    #[test]
    fn load_config_rejects_invalid_fee() {
        let temp_dir = TempDir::new().unwrap();
        write_config(temp_dir.path(), "monthly_fee = nan\n");

        let err = load_config(temp_dir.path()).unwrap_err();
        assert!(matches!(err, TuitionError::InvalidFee { ref key, .. } if key == "billing.monthly_fee"));
    }

    #[test]
    fn load_config_accepts_template() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("config.toml"), CONFIG_TEMPLATE).unwrap();

        let config = load_config(temp_dir.path()).unwrap();
        assert_eq!(config.billing.monthly_fee, 320000.0);
        assert!(config.billing.group_fees.is_empty());
    }

    #[test]
    fn malformed_records_are_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("payments.json");
        fs::write(
            &path,
            r#"[
                {"id": 1, "studentId": 7, "amount": 320000},
                {"id": 2, "amount": 150000},
                "not a record",
                {"id": 3, "studentId": 8, "amount": 100000}
            ]"#,
        )
        .unwrap();

        let payments: Vec<Payment> = load_json_list(&path).unwrap();
        let ids: Vec<i64> = payments.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn non_array_listing_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("students.json");
        fs::write(&path, r#"{"content": []}"#).unwrap();

        let err = load_json_list::<Student>(&path).unwrap_err();
        assert!(matches!(err, TuitionError::DataParse { .. }));
    }
}
