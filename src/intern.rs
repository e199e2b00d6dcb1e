use std::{
    collections::HashMap,
    fmt::{Debug, Display, Formatter, Result as FmtResult},
    sync::{Arc, RwLock},
};

use lazy_static::lazy_static;

lazy_static! {
    static ref INTERNED_NAMES: RwLock<HashMap<String, Name>> = RwLock::new(HashMap::new());
}

/// An interned functional-group kind such as `carboxylic acid`.
///
/// Kinds arrive from the detector in several spellings (`carboxylic_acid`,
/// `Carboxylic Acid`); they are folded to lower case with single spaces
/// before interning so that all spellings compare equal.
#[allow(clippy::derived_hash_with_manual_eq, clippy::derive_ord_xor_partial_ord)]
#[derive(Clone, Hash, Eq, Ord)]
pub struct Name(Arc<String>);

impl Name {
    pub fn new(name: &str) -> Self {
        let folded = fold(name);
        if let Some(symbol) = INTERNED_NAMES
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&folded)
        {
            return symbol.clone();
        }

        let mut symbols = INTERNED_NAMES
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        symbols
            .entry(folded.clone())
            .or_insert_with(|| Name(Arc::new(folded)))
            .clone()
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

fn fold(name: &str) -> String {
    name.split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter(|part| !part.is_empty())
        .map(|part| part.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

impl From<&str> for Name {
    fn from(s: &str) -> Self {
        Name::new(s)
    }
}

impl From<String> for Name {
    fn from(s: String) -> Self {
        Name::new(&s)
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.0, &other.0) {
            return true;
        }
        self.0 == other.0
    }
}

#[allow(clippy::non_canonical_partial_ord_impl)]
impl PartialOrd for Name {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        if Arc::ptr_eq(&self.0, &other.0) {
            return Some(std::cmp::Ordering::Equal);
        }
        self.0.partial_cmp(&other.0)
    }
}

impl Debug for Name {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spellings_fold_together() {
        let a = Name::new("carboxylic_acid");
        let b = Name::new("Carboxylic  Acid");
        let c = Name::from("carboxylic-acid".to_string());
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert!(Arc::ptr_eq(&a.0, &b.0));
        assert_eq!(a.name(), "carboxylic acid");
    }

    #[test]
    fn test_distinct_kinds_differ() {
        assert_ne!(Name::new("ester"), Name::new("ether"));
    }
}
