use serde::{Deserialize, Serialize};

use crate::lenient;

/// A directed edge between two elements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawConnection")]
pub struct Connection {
    pub id: String,

    /// Id of the element the edge starts at
    pub source: String,

    /// Id of the element the edge points to
    pub target: String,

    pub label: Option<String>,
}

impl Connection {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Connection {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// True when the edge carries a non-blank label
    pub fn is_labeled(&self) -> bool {
        self.label
            .as_deref()
            .map(|label| !label.trim().is_empty())
            .unwrap_or(false)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConnection {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    source: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    source_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    from: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    target: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    target_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    to: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    label: Option<String>,
}

impl From<RawConnection> for Connection {
    fn from(raw: RawConnection) -> Self {
        Connection {
            id: raw.id.unwrap_or_default(),
            source: raw.source.or(raw.source_id).or(raw.from).unwrap_or_default(),
            target: raw.target.or(raw.target_id).or(raw.to).unwrap_or_default(),
            label: raw.label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_endpoint_aliases() {
        let connection: Connection =
            serde_json::from_value(json!({ "id": "e1", "from": "a", "targetId": "b", "label": "yes" })).unwrap();
        assert_eq!(connection.source, "a");
        assert_eq!(connection.target, "b");
        assert!(connection.is_labeled());
    }

    #[test]
    fn test_blank_label_is_unlabeled() {
        let connection = Connection::new("e1", "a", "b").with_label("  ");
        assert!(!connection.is_labeled());
    }
}
