use indexmap::IndexMap;
use std::fmt;

/// Ordered mapping of CSS property to value, as found in an inline `style`
/// attribute.
///
/// Keys are lower-cased and trimmed, values are trimmed. A repeated property
/// keeps its first position and takes the last value, the same way a browser
/// resolves duplicate inline declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleMap {
    declarations: IndexMap<String, String>,
}

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `"key: value; key2: value2"` string.
    ///
    /// Segments without a colon, or with an empty property or value, are
    /// dropped silently. Only the first colon splits, so values such as
    /// `url(http://...)` survive intact.
    pub fn parse(style: &str) -> Self {
        let mut map = Self::new();
        for entry in style.split(';') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            let Some((key, value)) = entry.split_once(':') else {
                continue;
            };
            let key = key.trim().to_ascii_lowercase();
            let value = value.trim();
            if key.is_empty() || value.is_empty() {
                continue;
            }
            map.insert(key, value);
        }
        map
    }

    /// Serialize back to `"key: value; key2: value2"`. An empty map yields an
    /// empty string; callers drop the attribute in that case.
    pub fn serialize(&self) -> String {
        self.declarations
            .iter()
            .map(|(key, value)| format!("{}: {}", key, value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.declarations.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.declarations.contains_key(key)
    }

    /// Insert or replace a declaration. Replacing keeps the original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.declarations.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.declarations.shift_remove(key)
    }

    /// Keep only the declarations for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &str) -> bool) {
        self.declarations.retain(|key, value| keep(key, value));
    }

    /// Overlay `other` on top of `self`; `other` wins on shared keys.
    pub fn extend(&mut self, other: &StyleMap) {
        for (key, value) in other.iter() {
            self.insert(key, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.declarations
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

impl fmt::Display for StyleMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StyleMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = StyleMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

/// Numeric part of a pixel length such as `"100px"`, as written (`"100"`).
pub fn pixel_number(value: &str) -> Option<&str> {
    let number = value.trim().strip_suffix("px")?.trim_end();
    if !number.is_empty() && number.parse::<f64>().is_ok_and(|n| n >= 0.0) {
        Some(number)
    } else {
        None
    }
}
