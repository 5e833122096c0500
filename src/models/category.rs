use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Closed set of screen-time categories. `Overall` is valid for goals only;
/// sessions must name a concrete activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "category", rename_all = "snake_case")]
pub enum Category {
    SocialMedia,
    Work,
    Gaming,
    Movies,
    Study,
    Entertainment,
    Overall,
    Other,
}

impl Category {
    /// Resolve a display label into a category. Historical alias spellings
    /// ("Work-related", "Movies & Entertainment", "Study & Learning") still
    /// appear in old client payloads and must keep resolving; anything else
    /// is rejected rather than misfiled.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Social Media" => Some(Self::SocialMedia),
            "Work" | "Work-related" => Some(Self::Work),
            "Gaming" => Some(Self::Gaming),
            "Movies" | "Movies & Entertainment" => Some(Self::Movies),
            "Study" | "Study & Learning" => Some(Self::Study),
            "Entertainment" => Some(Self::Entertainment),
            "Overall" => Some(Self::Overall),
            "Other" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::SocialMedia => "Social Media",
            Self::Work => "Work",
            Self::Gaming => "Gaming",
            Self::Movies => "Movies",
            Self::Study => "Study",
            Self::Entertainment => "Entertainment",
            Self::Overall => "Overall",
            Self::Other => "Other",
        }
    }

    /// CSS class used by the display layer. Entertainment shares the movies
    /// styling and Overall the generic one, matching the historical table.
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::SocialMedia => "social-media",
            Self::Work => "work",
            Self::Gaming => "gaming",
            Self::Movies | Self::Entertainment => "movies",
            Self::Study => "study",
            Self::Overall | Self::Other => "other",
        }
    }

    /// Sessions log a concrete activity; the `Overall` bucket exists only for
    /// goals that cap total screen time.
    pub fn valid_for_sessions(&self) -> bool {
        !matches!(self, Self::Overall)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Category::parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown category: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_labels() {
        assert_eq!(Category::parse("Social Media"), Some(Category::SocialMedia));
        assert_eq!(Category::parse("Work"), Some(Category::Work));
        assert_eq!(Category::parse("Overall"), Some(Category::Overall));
    }

    #[test]
    fn parses_historical_aliases() {
        assert_eq!(Category::parse("Work-related"), Some(Category::Work));
        assert_eq!(
            Category::parse("Movies & Entertainment"),
            Some(Category::Movies)
        );
        assert_eq!(Category::parse("Study & Learning"), Some(Category::Study));
    }

    #[test]
    fn rejects_unknown_labels() {
        assert_eq!(Category::parse("Doomscrolling"), None);
        assert_eq!(Category::parse(""), None);
    }

    #[test]
    fn css_class_table() {
        assert_eq!(Category::SocialMedia.css_class(), "social-media");
        assert_eq!(Category::Work.css_class(), "work");
        assert_eq!(Category::Gaming.css_class(), "gaming");
        assert_eq!(Category::Movies.css_class(), "movies");
        // Entertainment shares the movies class, Overall the generic one
        assert_eq!(Category::Entertainment.css_class(), "movies");
        assert_eq!(Category::Study.css_class(), "study");
        assert_eq!(Category::Overall.css_class(), "other");
        assert_eq!(Category::Other.css_class(), "other");
    }

    #[test]
    fn overall_not_valid_for_sessions() {
        assert!(!Category::Overall.valid_for_sessions());
        assert!(Category::Gaming.valid_for_sessions());
    }
}
