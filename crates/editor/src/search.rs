use crate::index::TextNodeRef;

/// Text node contents containing `query`, ignoring case, in document order.
/// A blank query matches nothing.
pub fn search(texts: &[TextNodeRef], query: &str) -> Vec<String> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    texts
        .iter()
        .filter(|entry| entry.text.to_lowercase().contains(&needle))
        .map(|entry| entry.text.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use html::Id;

    fn texts(values: &[&str]) -> Vec<TextNodeRef> {
        values
            .iter()
            .enumerate()
            .map(|(i, text)| TextNodeRef {
                node: Id(i as u32 + 1),
                text: text.to_string(),
            })
            .collect()
    }

    #[test]
    fn case_insensitive_in_order() {
        let nodes = texts(&["Hello X", "world", "Extra"]);
        assert_eq!(search(&nodes, "x"), vec!["Hello X", "Extra"]);
    }

    #[test]
    fn blank_query_returns_nothing() {
        let nodes = texts(&["Hello"]);
        assert!(search(&nodes, "").is_empty());
        assert!(search(&nodes, "  \t").is_empty());
    }

    #[test]
    fn query_is_trimmed_and_unicode_folded() {
        let nodes = texts(&["Tiếng VIỆT", "khác"]);
        assert_eq!(search(&nodes, "  việt "), vec!["Tiếng VIỆT"]);
    }

    #[test]
    fn duplicates_are_kept() {
        let nodes = texts(&["same", "Same"]);
        assert_eq!(search(&nodes, "same").len(), 2);
    }
}
