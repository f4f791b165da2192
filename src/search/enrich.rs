use super::types::ResultSet;

/// Display names of the genre codes stored under `GenreId`.
pub const GENRE_LABELS: [&str; 5] = ["Folk", "Rock", "Jazz", "Soul", "Blues"];

/// Ordered code-to-label table: the label for code `n` is at position `n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelTable {
    labels: Vec<String>,
}

impl LabelTable {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    pub fn genres() -> Self {
        Self::new(GENRE_LABELS.iter().map(|l| l.to_string()).collect())
    }

    /// Label for a stored code, or `None` when the code is not a valid position.
    pub fn label(&self, code: &str) -> Option<&str> {
        code.trim()
            .parse::<usize>()
            .ok()
            .and_then(|i| self.labels.get(i))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Replaces the code stored under `field` with its label, in every document.
///
/// Codes without a label (out of range, negative, not a number) keep their raw
/// value and are reported with a warning. Documents without the field are left
/// alone.
pub fn enrich<'a>(
    results: &'a mut ResultSet,
    labels: &LabelTable,
    field: &str,
) -> &'a mut ResultSet {
    for doc in results.documents.iter_mut() {
        let Some(raw) = doc.fields.get_mut(field) else {
            continue;
        };

        match labels.label(raw) {
            Some(label) => *raw = label.to_string(),
            None => tracing::warn!(
                "No label for {}={} on {} ({} labels known), keeping raw code",
                field,
                raw,
                doc.id,
                labels.len()
            ),
        }
    }
    results
}
