//! Boolean columns as the API sends them.

use serde::{Deserialize, Deserializer};

/// MySQL `TINYINT(1)` columns reach the client as `0`/`1`; accept both
/// those and real booleans. `null` reads as `false`.
pub(crate) fn bool_from_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(b)) => b,
        Some(Flag::Int(n)) => n != 0,
        None => false,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Row {
        #[serde(deserialize_with = "bool_from_flag")]
        flag: bool,
    }

    fn flag(json: &str) -> bool {
        serde_json::from_str::<Row>(json).unwrap().flag
    }

    #[test]
    fn test_accepts_ints_bools_and_null() {
        assert!(flag(r#"{"flag": 1}"#));
        assert!(!flag(r#"{"flag": 0}"#));
        assert!(flag(r#"{"flag": true}"#));
        assert!(!flag(r#"{"flag": null}"#));
    }

    #[test]
    fn test_rejects_strings() {
        assert!(serde_json::from_str::<Row>(r#"{"flag": "oui"}"#).is_err());
    }
}
