// ============================================================
// Layer 3 — Query and Corpus Identifiers
// ============================================================
// Every query and every corpus passage gets an identifier of the
// form `train-<n>`, where n is a 0-based counter:
//
//   QueryId(n)  — n is the row index in the source CSV
//   CorpusId(n) — n counts distinct contexts in order of first appearance
//
// Internally they are typed newtypes over usize so a query id can
// never be passed where a corpus id is expected, and so maps keyed
// by them sort numerically (train-2 before train-10).
// On the wire (JSON) they are plain strings.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

/// Prefix shared by query and corpus identifiers.
pub const ID_PREFIX: &str = "train-";

macro_rules! train_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub usize);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", ID_PREFIX, self.0)
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.strip_prefix(ID_PREFIX)
                    .and_then(|n| n.parse::<usize>().ok())
                    .map($name)
                    .ok_or_else(|| format!("expected '{}<n>', got '{}'", ID_PREFIX, s))
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(de::Error::custom)
            }
        }
    };
}

train_id!(
    /// Identifier of one query. Minted fresh for every CSV row.
    QueryId
);

train_id!(
    /// Identifier of one distinct context passage.
    CorpusId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_train_prefix() {
        assert_eq!(QueryId(0).to_string(), "train-0");
        assert_eq!(CorpusId(42).to_string(), "train-42");
    }

    #[test]
    fn test_parse_round_trip() {
        let id: QueryId = "train-17".parse().unwrap();
        assert_eq!(id, QueryId(17));
    }

    #[test]
    fn test_parse_rejects_foreign_ids() {
        assert!("eval-3".parse::<CorpusId>().is_err());
        assert!("train-".parse::<CorpusId>().is_err());
        assert!("train-x".parse::<CorpusId>().is_err());
    }

    #[test]
    fn test_ordering_is_numeric() {
        // String order would put "train-10" before "train-2"
        assert!(QueryId(2) < QueryId(10));
    }

    #[test]
    fn test_json_map_keys_are_strings() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(CorpusId(3), "ctx");
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"train-3":"ctx"}"#);

        let back: std::collections::BTreeMap<CorpusId, String> =
            serde_json::from_str(&json).unwrap();
        assert_eq!(back[&CorpusId(3)], "ctx");
    }
}
