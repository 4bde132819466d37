//! Edge labels for flow graph edges

use serde::{Deserialize, Serialize};
use std::fmt;

/// Label of a flow graph edge
///
/// Only Branch nodes emit `True`/`False` edges; everything else is an
/// unlabeled fallthrough. Serialized as the bare label text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeLabel {
    /// Sequential flow (`""`)
    #[serde(rename = "")]
    Fallthrough,
    /// Condition held
    #[serde(rename = "True")]
    True,
    /// Condition did not hold
    #[serde(rename = "False")]
    False,
}

impl EdgeLabel {
    /// Label text: `""`, `"True"` or `"False"`
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeLabel::Fallthrough => "",
            EdgeLabel::True => "True",
            EdgeLabel::False => "False",
        }
    }

    /// Check if this is one of the two branch labels
    pub fn is_branch(&self) -> bool {
        !matches!(self, EdgeLabel::Fallthrough)
    }

    /// Branch label for an outcome
    pub fn for_outcome(outcome: bool) -> Self {
        if outcome {
            EdgeLabel::True
        } else {
            EdgeLabel::False
        }
    }
}

impl fmt::Display for EdgeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_text() {
        assert_eq!(EdgeLabel::Fallthrough.as_str(), "");
        assert_eq!(EdgeLabel::True.to_string(), "True");
        assert_eq!(EdgeLabel::for_outcome(false), EdgeLabel::False);
        assert!(EdgeLabel::True.is_branch());
        assert!(!EdgeLabel::Fallthrough.is_branch());
    }

    #[test]
    fn test_label_json() {
        assert_eq!(serde_json::to_string(&EdgeLabel::Fallthrough).unwrap(), "\"\"");
        let label: EdgeLabel = serde_json::from_str("\"False\"").unwrap();
        assert_eq!(label, EdgeLabel::False);
    }
}
