//! Menu buckets and the keyword rules that classify free text into them

use serde::{Deserialize, Serialize};

/// One of the six fixed menu categories
///
/// Variant order is the category order used when assembling a menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Bucket {
    Appetizers,
    Mains,
    LiveStations,
    Sides,
    Desserts,
    Beverages,
}

impl Bucket {
    /// All buckets in category order
    pub const ALL: [Bucket; 6] = [
        Bucket::Appetizers,
        Bucket::Mains,
        Bucket::LiveStations,
        Bucket::Sides,
        Bucket::Desserts,
        Bucket::Beverages,
    ];

    /// Wire key, as used in composition objects
    pub fn key(&self) -> &'static str {
        match self {
            Self::Appetizers => "appetizers",
            Self::Mains => "mains",
            Self::LiveStations => "liveStations",
            Self::Sides => "sides",
            Self::Desserts => "desserts",
            Self::Beverages => "beverages",
        }
    }

    /// Section title printed on an assembled menu
    pub fn title(&self) -> &'static str {
        match self {
            Self::Appetizers => "Appetizers & Starters",
            Self::Mains => "Main Course Selection",
            Self::LiveStations => "Live Stations",
            Self::Sides => "Accompaniments",
            Self::Desserts => "The Grand Finale (Desserts)",
            Self::Beverages => "Beverage Craft",
        }
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Ordered keyword rules mapping free text to a [`Bucket`]
///
/// Input is lowercased, then the first rule whose pattern is a substring
/// wins. Text matching no rule falls into `default`.
#[derive(Debug, Clone)]
pub struct BucketRules {
    rules: &'static [(&'static str, Bucket)],
    default: Bucket,
}

const CATEGORY_RULES: &[(&str, Bucket)] = &[
    ("starter", Bucket::Appetizers),
    ("appet", Bucket::Appetizers),
    ("snack", Bucket::Appetizers),
    ("main", Bucket::Mains),
    ("entree", Bucket::Mains),
    ("live", Bucket::LiveStations),
    ("station", Bucket::LiveStations),
    ("counter", Bucket::LiveStations),
    ("side", Bucket::Sides),
    ("accomp", Bucket::Sides),
    ("bread", Bucket::Sides),
    ("rice", Bucket::Sides),
    ("dessert", Bucket::Desserts),
    ("sweet", Bucket::Desserts),
    ("bever", Bucket::Beverages),
    ("drink", Bucket::Beverages),
];

const SECTION_TITLE_RULES: &[(&str, Bucket)] = &[
    ("appet", Bucket::Appetizers),
    ("starter", Bucket::Appetizers),
    ("main", Bucket::Mains),
    ("live", Bucket::LiveStations),
    ("station", Bucket::LiveStations),
    ("counter", Bucket::LiveStations),
    ("side", Bucket::Sides),
    ("accomp", Bucket::Sides),
    ("dessert", Bucket::Desserts),
    ("finale", Bucket::Desserts),
    ("beverage", Bucket::Beverages),
    ("drink", Bucket::Beverages),
];

impl BucketRules {
    /// Rules for a dish's stored category text
    pub const fn category() -> Self {
        Self {
            rules: CATEGORY_RULES,
            default: Bucket::Mains,
        }
    }

    /// Rules for a menu section title
    pub const fn section_title() -> Self {
        Self {
            rules: SECTION_TITLE_RULES,
            default: Bucket::Mains,
        }
    }

    /// Bucket used when no rule matches
    pub fn default_bucket(&self) -> Bucket {
        self.default
    }

    /// Classify `text`. Total: every input yields a bucket.
    pub fn classify(&self, text: &str) -> Bucket {
        let lower = text.to_lowercase();
        self.rules
            .iter()
            .find(|(pattern, _)| lower.contains(pattern))
            .map(|(_, bucket)| *bucket)
            .unwrap_or(self.default)
    }
}
