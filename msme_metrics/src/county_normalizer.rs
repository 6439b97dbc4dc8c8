use crate::error::{PipelineError, Result};
use std::collections::{BTreeMap, HashMap};

/// Maps inconsistent county spellings onto a canonical, title-cased name.
///
/// Unmapped spellings are not rejected: they pass through in their own
/// folded and title-cased form.
pub struct CountyNormalizer {
    mappings: HashMap<String, String>,
}

impl CountyNormalizer {
    /// Build from a misspelling -> canonical table. Keys and values are folded
    /// the same way raw input is, so an entry like `"kisu mu"` still applies.
    pub fn new(county_mapping: &BTreeMap<String, String>) -> Result<Self> {
        let mut mappings = HashMap::new();

        for (variant, canonical) in county_mapping {
            let variant = fold(variant);
            let canonical = fold(canonical);
            if variant != canonical {
                mappings.insert(variant, canonical);
            }
        }

        if let Some(chained) = mappings.values().find(|v| mappings.contains_key(*v)) {
            return Err(PipelineError::Config(format!(
                "county mapping target '{chained}' is itself mapped to another county"
            )));
        }

        Ok(Self { mappings })
    }

    pub fn normalize(&self, raw: &str) -> String {
        let folded = fold(raw);
        let canonical = self.mappings.get(&folded).unwrap_or(&folded);
        title_case(canonical)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

/// Drop whitespace and periods, then lowercase
fn fold(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Uppercase a letter of folded text when it follows a non-letter.
///
/// Only uppercases that fold back to the same letter are applied (`ß` stays
/// `ß` rather than becoming `SS`), so `fold(title_case(s)) == s`.
fn title_case(folded: &str) -> String {
    let mut out = String::with_capacity(folded.len());
    let mut prev_is_alpha = false;
    for c in folded.chars() {
        if c.is_alphabetic() && !prev_is_alpha {
            out.push(reversible_uppercase(c));
        } else {
            out.push(c);
        }
        prev_is_alpha = c.is_alphabetic();
    }
    out
}

fn reversible_uppercase(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => {
            let mut lower = u.to_lowercase();
            match (lower.next(), lower.next()) {
                (Some(l), None) if l == c => u,
                _ => c,
            }
        }
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PipelineConfig;
    use proptest::prelude::*;

    fn default_normalizer() -> CountyNormalizer {
        CountyNormalizer::new(&PipelineConfig::default().county_mapping).unwrap()
    }

    #[test]
    fn test_known_misspellings() {
        let normalizer = default_normalizer();
        assert_eq!(normalizer.normalize("Nairobii"), "Nairobi");
        assert_eq!(normalizer.normalize("  NAIIROBI "), "Nairobi");
        assert_eq!(normalizer.normalize("narobi."), "Nairobi");
        assert_eq!(normalizer.normalize("Kisu mu"), "Kisumu");
        assert_eq!(normalizer.normalize("Mombas a"), "Mombasa");
        assert_eq!(normalizer.normalize("merru"), "Meru");
        assert_eq!(normalizer.normalize("Kiaambu"), "Kiambu");
    }

    #[test]
    fn test_unmapped_passes_through() {
        let normalizer = default_normalizer();
        assert_eq!(normalizer.normalize("mACHAKOS"), "Machakos");
        assert_eq!(normalizer.normalize("Taita Taveta"), "Taitataveta");
        assert_eq!(normalizer.normalize("murang'a"), "Murang'A");
        assert_eq!(normalizer.normalize(""), "");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let normalizer = default_normalizer();
        for raw in ["Nairobii", "kisu mu", " Nakuru. ", "Elgeyo-Marakwet", "murang'a", "MERRU"] {
            let once = normalizer.normalize(raw);
            assert_eq!(normalizer.normalize(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn test_multi_char_uppercase_is_left_folded() {
        let normalizer = default_normalizer();
        let once = normalizer.normalize("ßabc");
        assert_eq!(once, "ßabc");
        assert_eq!(normalizer.normalize(&once), once);
        assert_eq!(normalizer.normalize("straße"), "Straße");
        assert_eq!(normalizer.normalize("ǆakovo"), "Ǆakovo");
    }

    proptest! {
        #[test]
        fn prop_normalization_is_idempotent(raw in any::<String>()) {
            let normalizer = default_normalizer();
            let once = normalizer.normalize(&raw);
            prop_assert_eq!(normalizer.normalize(&once), once);
        }

        #[test]
        fn prop_title_case_folds_back(raw in any::<String>()) {
            let folded = fold(&raw);
            prop_assert_eq!(fold(&title_case(&folded)), folded);
        }
    }

    #[test]
    fn test_chained_mapping_rejected() {
        let mut table = BTreeMap::new();
        table.insert("nairobii".to_string(), "narobi".to_string());
        table.insert("narobi".to_string(), "nairobi".to_string());

        assert!(matches!(
            CountyNormalizer::new(&table),
            Err(PipelineError::Config(_))
        ));
    }

    #[test]
    fn test_identity_entries_are_dropped() {
        let normalizer = default_normalizer();
        // "nakuru." folds to "nakuru", same as its target
        assert_eq!(normalizer.len(), 5);
    }
}
