use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use crate::errors::{CoreError, CoreResult};

/// Closed-world mapping from original speaker names to their canonical translations.
///
/// Built once and only read afterwards. No two original names may share a
/// canonical name.
#[derive(Debug, Clone, Default)]
pub struct SpeakerRegistry {
    canonical: BTreeMap<String, String>,
}

impl SpeakerRegistry {
    pub fn from_pairs<I, K, V>(pairs: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut canonical = BTreeMap::new();
        let mut owners: HashMap<String, String> = HashMap::new();

        for (original, translated) in pairs {
            let original = original.into();
            let translated = translated.into();

            if original.is_empty() || translated.is_empty() {
                return Err(CoreError::Speaker(format!(
                    "empty speaker name in pair {original:?} -> {translated:?}"
                )));
            }

            if let Some(owner) = owners.get(&translated) {
                if *owner != original {
                    return Err(CoreError::Speaker(format!(
                        "{translated:?} is mapped from both {owner:?} and {original:?}"
                    )));
                }
            }

            if let Some(previous) = canonical.insert(original.clone(), translated.clone()) {
                owners.remove(&previous);
            }
            owners.insert(translated, original);
        }

        Ok(SpeakerRegistry { canonical })
    }

    /// Reads a JSON object of `"original": "canonical"` pairs.
    pub fn read_pairs(path: &Path) -> CoreResult<BTreeMap<String, String>> {
        let data = fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn load(path: &Path) -> CoreResult<Self> {
        Self::from_pairs(Self::read_pairs(path)?)
    }

    pub fn canonical(&self, original: &str) -> Option<&str> {
        self.canonical.get(original).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.canonical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.canonical.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_exact() {
        let reg = SpeakerRegistry::from_pairs([("主人公", "Protagonist"), ("先生", "Teacher")])
            .unwrap();
        assert_eq!(reg.canonical("主人公"), Some("Protagonist"));
        assert_eq!(reg.canonical("主人公 "), None);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn shared_canonical_name_is_rejected() {
        let err = SpeakerRegistry::from_pairs([("主人公", "Hero"), ("勇者", "Hero")]).unwrap_err();
        assert!(matches!(err, CoreError::Speaker(_)));
    }

    #[test]
    fn later_pair_overrides_same_original() {
        let reg = SpeakerRegistry::from_pairs([("主人公", "Hero"), ("主人公", "Protagonist")])
            .unwrap();
        assert_eq!(reg.canonical("主人公"), Some("Protagonist"));

        // "Hero" is free again
        let pairs = reg.iter().map(|(k, v)| (k.to_string(), v.to_string()));
        let reg = SpeakerRegistry::from_pairs(pairs.chain([("勇者".into(), "Hero".into())]));
        assert!(reg.is_ok());
    }
}
