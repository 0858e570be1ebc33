use serde::{Deserialize, Serialize};

/// Known tag vocabulary entry. The parser accepts any `#word` regardless of
/// whether it matches a known tag; the vocabulary only drives highlighting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub color: String,
}

impl Tag {
    pub fn new(name: &str, color: &str) -> Self {
        Self {
            id: name.to_string(),
            name: name.to_string(),
            color: color.to_string(),
        }
    }
}

/// Seed vocabulary shipped with a fresh vault.
pub fn initial_tags() -> Vec<Tag> {
    vec![
        Tag::new("home", "purple"),
        Tag::new("work", "orange"),
        Tag::new("shopping", "green"),
    ]
}
