use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::domain::profile::{MAX_DURATION_KEY, ReferenceProfile, ReferenceValue};
use crate::repository::{ProfileError, ProfileReader, ProfileResult};

/// Reference profile stored as a JSON document on disk.
pub struct JsonProfileRepository {
    path: PathBuf,
}

impl JsonProfileRepository {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ProfileReader for JsonProfileRepository {
    fn load_profile(&self) -> ProfileResult<ReferenceProfile> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::warn!(
                    "Reference data {} not found, text similarity will score 0",
                    self.path.display()
                );
                return Ok(ReferenceProfile::default());
            }
            Err(e) => return Err(e.into()),
        };

        parse_profile(&raw)
    }
}

/// Parses a reference document of the form
/// `{"title": ["..."], "likes": 100, "max_duration": 20}`.
pub fn parse_profile(raw: &str) -> ProfileResult<ReferenceProfile> {
    let document: Value =
        serde_json::from_str(raw).map_err(|e| ProfileError::Parse(e.to_string()))?;
    let Value::Object(entries) = document else {
        return Err(ProfileError::Parse(
            "top level must be a JSON object".to_string(),
        ));
    };

    let mut fields = BTreeMap::new();
    let mut max_duration = None;

    for (key, value) in entries {
        if key == MAX_DURATION_KEY {
            match value.as_u64().and_then(|v| u32::try_from(v).ok()) {
                Some(seconds) => max_duration = Some(seconds),
                None => log::warn!("Ignoring non-integer {MAX_DURATION_KEY}: {value}"),
            }
            continue;
        }

        match reference_value(&value) {
            Some(reference) => {
                fields.insert(key, reference);
            }
            None => log::warn!("Ignoring reference field {key} with unsupported value {value}"),
        }
    }

    Ok(ReferenceProfile::new(fields, max_duration))
}

fn reference_value(value: &Value) -> Option<ReferenceValue> {
    match value {
        Value::Number(number) => number.as_f64().map(ReferenceValue::Count),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .map(ReferenceValue::Texts),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn parses_texts_counts_and_max_duration() {
        let profile = parse_profile(
            r#"{"title": ["cute cat", "猫咪"], "likes": 100, "max_duration": 15}"#,
        )
        .expect("valid profile");

        assert_eq!(
            profile.get("title"),
            Some(&ReferenceValue::Texts(vec![
                "cute cat".to_string(),
                "猫咪".to_string()
            ]))
        );
        assert_eq!(profile.get("likes"), Some(&ReferenceValue::Count(100.0)));
        assert_eq!(profile.get(MAX_DURATION_KEY), None);
        assert_eq!(profile.max_duration(), Some(15));
        assert_eq!(profile.len(), 2);
    }

    #[test]
    fn drops_unsupported_entries() {
        let profile = parse_profile(r#"{"title": ["a", 1], "flag": true, "comments": 5}"#)
            .expect("valid profile");

        assert_eq!(profile.len(), 1);
        assert_eq!(profile.get("comments"), Some(&ReferenceValue::Count(5.0)));
    }

    #[test]
    fn rejects_non_object_document() {
        assert!(matches!(
            parse_profile("[1, 2, 3]"),
            Err(ProfileError::Parse(_))
        ));
        assert!(matches!(parse_profile("{"), Err(ProfileError::Parse(_))));
    }

    #[test]
    fn missing_file_degrades_to_empty_profile() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = JsonProfileRepository::new(dir.path().join("absent.json"));

        let profile = repo.load_profile().expect("missing file is not an error");

        assert!(profile.is_empty());
        assert_eq!(profile.max_duration(), None);
    }

    #[test]
    fn loads_profile_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"description": ["小猫"], "comments": 12}}"#).expect("write");

        let profile = JsonProfileRepository::new(file.path())
            .load_profile()
            .expect("profile loads");

        assert_eq!(profile.len(), 2);
    }
}
