/// Keyword allow-list for order titles
///
/// Matching is exact string equality after normalization (trim + lowercase),
/// not substring or fuzzy matching: operators list the precise titles they
/// want claimed, and "Epic Runs" must not match a list containing "epic run".
#[derive(Debug, Clone)]
pub struct KeywordFilter {
    keywords: Vec<String>,
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

impl KeywordFilter {
    /// Keywords are normalized once here so each cycle only normalizes titles
    pub fn new(keywords: impl IntoIterator<Item = String>) -> Self {
        Self {
            keywords: keywords.into_iter().map(|k| normalize(&k)).collect(),
        }
    }

    /// True iff any keyword equals the normalized title
    pub fn matches(&self, title: &str) -> bool {
        let title = normalize(title);
        self.keywords.iter().any(|k| *k == title)
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }
}
