use std::collections::BTreeMap;

/// Reserved profile key that carries the maximum accepted duration.
pub const MAX_DURATION_KEY: &str = "max_duration";

/// A single learned reference value.
#[derive(Clone, Debug, PartialEq)]
pub enum ReferenceValue {
    /// Known examples of a free-text field. The closest one wins.
    Texts(Vec<String>),
    /// Reference count for an engagement metric.
    Count(f64),
}

/// Learned baseline describing what a matching item looks like.
///
/// Built once at startup and never mutated afterwards.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReferenceProfile {
    fields: BTreeMap<String, ReferenceValue>,
    max_duration: Option<u32>,
}

impl ReferenceProfile {
    pub fn new(fields: BTreeMap<String, ReferenceValue>, max_duration: Option<u32>) -> Self {
        Self {
            fields,
            max_duration,
        }
    }

    pub fn get(&self, field: &str) -> Option<&ReferenceValue> {
        self.fields.get(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &ReferenceValue)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Maximum duration in seconds learned together with the profile, if any.
    pub fn max_duration(&self) -> Option<u32> {
        self.max_duration
    }
}

impl FromIterator<(String, ReferenceValue)> for ReferenceProfile {
    fn from_iter<T: IntoIterator<Item = (String, ReferenceValue)>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect(), None)
    }
}
