//! Diagram blocks (fenced `mermaid` code) pulled out of finished replies.

/// A diagram source taken from a finished reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagram {
    /// Position among the diagrams of the same message, starting at 1.
    pub index: usize,
    pub source: String,
}

pub fn is_diagram_language(hint: &str) -> bool {
    hint.eq_ignore_ascii_case("mermaid")
}

/// Quote node labels that contain parentheses, which the diagram grammar
/// would otherwise read as a shape: `A[call(x)]` becomes `A["call(x)"]`.
/// Labels that are already quoted are left alone.
pub fn fix_parenthesized_labels(source: &str) -> String {
    let mut out = String::with_capacity(source.len() + 8);
    let mut rest = source;

    while let Some(open) = rest.find('[') {
        let after_open = &rest[open + 1..];
        let Some(close) = after_open.find(']') else {
            break;
        };
        let label = &after_open[..close];
        out.push_str(&rest[..open]);
        if needs_quoting(label) {
            out.push_str("[\"");
            out.push_str(label);
            out.push_str("\"]");
        } else {
            out.push('[');
            out.push_str(label);
            out.push(']');
        }
        rest = &after_open[close + 1..];
    }
    out.push_str(rest);
    out
}

fn needs_quoting(label: &str) -> bool {
    !label.starts_with('"')
        && label
            .find('(')
            .is_some_and(|open| label[open..].contains(')'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_labels_with_parentheses() {
        assert_eq!(
            fix_parenthesized_labels("graph TD\n  A[parse(input)] --> B[done]"),
            "graph TD\n  A[\"parse(input)\"] --> B[done]"
        );
    }

    #[test]
    fn keeps_text_around_the_group() {
        assert_eq!(
            fix_parenthesized_labels("X[run step (2) now]"),
            "X[\"run step (2) now\"]"
        );
    }

    #[test]
    fn leaves_quoted_and_plain_labels() {
        let source = "A[\"f(x)\"] --> B[plain] --> C(round)";
        assert_eq!(fix_parenthesized_labels(source), source);
    }

    #[test]
    fn unbalanced_brackets_pass_through() {
        assert_eq!(fix_parenthesized_labels("A[open(x)"), "A[open(x)");
        assert_eq!(fix_parenthesized_labels("A[only(]"), "A[only(]");
    }

    #[test]
    fn diagram_language_is_case_insensitive() {
        assert!(is_diagram_language("Mermaid"));
        assert!(!is_diagram_language("rust"));
    }
}
