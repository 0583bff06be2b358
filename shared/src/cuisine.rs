//! Cuisine labels shown to staff and the stored cuisines they cover

/// Label that selects the whole library
pub const ANY_MIX: &str = "Any / Mix";

const LABEL_TABLE: &[(&str, &[&str])] = &[
    ("Indian", &["Punjabi/North Indian", "South Indian", "Mughlai"]),
    ("Asian", &["Chinese"]),
    ("American", &["Continental"]),
    ("Mexican", &["Continental"]),
    ("French", &["Continental"]),
];

const BANNER_COLLECTION: &[(&str, &str)] = &[
    ("Indian", "photo-1585937421612-70a008356fbe"),
    ("Italian", "photo-1498579150354-977475b7ea0b"),
    ("Asian", "photo-1512621776951-a57141f2eefd"),
    ("French", "photo-1550989460-0adf9ea622e2"),
    ("Mediterranean", "photo-1544124499-58912cbddaad"),
    ("Mexican", "photo-1565299585323-38d6b0865b47"),
    ("American", "photo-1460306423918-99f1390ca001"),
    (ANY_MIX, "photo-1555244162-803834f70033"),
];

/// Which stored cuisines a query should match
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CuisineFilter {
    /// No restriction
    All,
    /// Stored cuisine must equal one of these values
    In(Vec<String>),
}

impl CuisineFilter {
    /// Expand a set of UI labels into a filter over stored cuisines
    ///
    /// Blank labels are ignored. Any label that selects everything makes
    /// the whole filter `All`, and so does a list with no usable labels.
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> Self {
        let mut stored: Vec<String> = Vec::new();
        for label in non_blank(labels) {
            match resolve_label(label) {
                CuisineFilter::All => return CuisineFilter::All,
                CuisineFilter::In(values) => {
                    for value in values {
                        if !stored.contains(&value) {
                            stored.push(value);
                        }
                    }
                }
            }
        }
        if stored.is_empty() {
            CuisineFilter::All
        } else {
            CuisineFilter::In(stored)
        }
    }

    pub fn matches(&self, cuisine: &str) -> bool {
        match self {
            Self::All => true,
            Self::In(values) => values.iter().any(|v| v == cuisine),
        }
    }
}

/// Resolve one UI label
///
/// "Any / Mix" and combined labels ("Indian + Asian") select everything.
/// Mapped labels expand through the label table; any other label matches
/// the stored cuisine exactly.
pub fn resolve_label(label: &str) -> CuisineFilter {
    let label = label.trim();
    if label.is_empty() || label == ANY_MIX || label.contains(" + ") {
        return CuisineFilter::All;
    }
    match LABEL_TABLE.iter().find(|(ui, _)| *ui == label) {
        Some((_, stored)) => CuisineFilter::In(stored.iter().map(|s| s.to_string()).collect()),
        None => CuisineFilter::In(vec![label.to_string()]),
    }
}

/// Label describing a set of selected cuisines, ignoring blank entries
pub fn cuisine_label<S: AsRef<str>>(selected: &[S]) -> String {
    let selected: Vec<&str> = non_blank(selected).collect();
    match selected.as_slice() {
        [] => ANY_MIX.to_string(),
        [first, ..] if *first == ANY_MIX => ANY_MIX.to_string(),
        [only] => only.to_string(),
        many => many.join(" + "),
    }
}

/// Stored cuisine a new dish gets when added under a UI label
///
/// Mapped labels use their first stored cuisine, other labels are stored
/// as-is. Labels that select everything have no stored cuisine.
pub fn stored_cuisine(label: &str) -> Option<String> {
    match resolve_label(label) {
        CuisineFilter::All => None,
        CuisineFilter::In(values) => values.into_iter().next(),
    }
}

fn non_blank<S: AsRef<str>>(labels: &[S]) -> impl Iterator<Item = &str> {
    labels
        .iter()
        .map(|label| label.as_ref().trim())
        .filter(|label| !label.is_empty())
}

/// Built-in banner image for a cuisine label, falling back to "Any / Mix"
pub fn default_banner(label: &str) -> String {
    let photo = BANNER_COLLECTION
        .iter()
        .find(|(ui, _)| *ui == label)
        .or_else(|| BANNER_COLLECTION.iter().find(|(ui, _)| *ui == ANY_MIX))
        .map(|(_, photo)| *photo)
        .unwrap_or("photo-1555244162-803834f70033");
    format!("https://images.unsplash.com/{photo}?auto=format&fit=crop&q=80&w=1200")
}
