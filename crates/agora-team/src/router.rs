/// Predicate attached to a graph edge, evaluated against the text of
/// the message the source node just produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeCondition {
    /// Case-sensitive substring match.
    Contains(String),
    /// Complement of `Contains` for the same needle.
    NotContains(String),
}

impl EdgeCondition {
    pub fn contains(needle: impl Into<String>) -> Self {
        Self::Contains(needle.into())
    }

    pub fn not_contains(needle: impl Into<String>) -> Self {
        Self::NotContains(needle.into())
    }

    pub fn matches(&self, text: &str) -> bool {
        match self {
            Self::Contains(needle) => text.contains(needle.as_str()),
            Self::NotContains(needle) => !text.contains(needle.as_str()),
        }
    }
}

/// One directed edge of an agent graph.
#[derive(Debug, Clone)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub condition: Option<EdgeCondition>,
}

/// Pick the next node after `from` produced `last_text`.
///
/// Conditional edges are tried in declaration order and the first match
/// wins; an unconditional edge is the fallback; `None` ends the flow.
pub(crate) fn route<'a>(edges: &'a [Edge], from: &str, last_text: &str) -> Option<&'a str> {
    for edge in edges.iter().filter(|e| e.from == from) {
        if let Some(condition) = &edge.condition {
            if condition.matches(last_text) {
                return Some(&edge.to);
            }
        }
    }

    edges
        .iter()
        .find(|e| e.from == from && e.condition.is_none())
        .map(|e| e.to.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(from: &str, to: &str, condition: Option<EdgeCondition>) -> Edge {
        Edge {
            from: from.to_string(),
            to: to.to_string(),
            condition,
        }
    }

    #[test]
    fn test_contains_is_case_sensitive() {
        let condition = EdgeCondition::contains("APPROVE");
        assert!(condition.matches("Looks good. APPROVE"));
        assert!(condition.matches("APPROVED"));
        assert!(!condition.matches("I approve of this"));
        assert!(!condition.matches(""));
    }

    #[test]
    fn test_contains_and_not_contains_are_complementary() {
        let yes = EdgeCondition::contains("APPROVE");
        let no = EdgeCondition::not_contains("APPROVE");

        for text in [
            "APPROVE",
            "please APPROVE this",
            "approve",
            "rejected",
            "",
            "appROVE",
        ] {
            assert_ne!(yes.matches(text), no.matches(text), "text: {:?}", text);
        }
    }

    #[test]
    fn test_first_matching_conditional_edge_wins() {
        let edges = vec![
            edge("B", "C", Some(EdgeCondition::contains("APPROVE"))),
            edge("B", "A", Some(EdgeCondition::not_contains("APPROVE"))),
        ];

        assert_eq!(route(&edges, "B", "APPROVE"), Some("C"));
        assert_eq!(route(&edges, "B", "needs another pass"), Some("A"));
    }

    #[test]
    fn test_unconditional_edge_is_fallback() {
        let edges = vec![
            edge("A", "B", None),
            edge("B", "C", Some(EdgeCondition::contains("APPROVE"))),
        ];

        assert_eq!(route(&edges, "A", "anything at all"), Some("B"));
        assert_eq!(route(&edges, "B", "not yet"), None);
    }

    #[test]
    fn test_conditional_match_beats_unconditional() {
        let edges = vec![
            edge("A", "B", None),
            edge("A", "C", Some(EdgeCondition::contains("skip"))),
        ];

        assert_eq!(route(&edges, "A", "skip ahead"), Some("C"));
        assert_eq!(route(&edges, "A", "carry on"), Some("B"));
    }

    #[test]
    fn test_no_outgoing_edges_ends_flow() {
        let edges = vec![edge("A", "B", None)];
        assert_eq!(route(&edges, "C", "whatever"), None);
    }
}
