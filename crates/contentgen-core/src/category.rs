//! Content categories and their fixed instruction prefixes.
//!
//! The category tag arrives as free text (`"article"`, `"marketing"`, ...). Anything not in the
//! table falls back to `General`, so parsing never fails.

use serde::{Deserialize, Serialize};

/// Instruction prefixes sent as the `system` message, one per category.
pub const GENERAL_PREFIX: &str = "请根据以下要求生成内容：\n";
pub const ARTICLE_PREFIX: &str = "请帮我写一篇文章，要求：\n";
pub const MARKETING_PREFIX: &str = "请帮我写一段营销文案，要求：\n";
pub const SOCIAL_PREFIX: &str = "请帮我写一段社交媒体内容，要求：\n";

/// Kind of content the user asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentCategory {
    #[default]
    General,
    Article,
    Marketing,
    Social,
}

impl ContentCategory {
    /// Every category, in selector order.
    pub const ALL: [ContentCategory; 4] = [
        ContentCategory::General,
        ContentCategory::Article,
        ContentCategory::Marketing,
        ContentCategory::Social,
    ];

    /// Lenient parse: unknown, empty or missing tags map to `General`.
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag.map(|t| t.trim().to_ascii_lowercase()).as_deref() {
            Some("article") => ContentCategory::Article,
            Some("marketing") => ContentCategory::Marketing,
            Some("social") => ContentCategory::Social,
            _ => ContentCategory::General,
        }
    }

    /// Wire tag, as used in the `type` field.
    pub fn tag(self) -> &'static str {
        match self {
            ContentCategory::General => "general",
            ContentCategory::Article => "article",
            ContentCategory::Marketing => "marketing",
            ContentCategory::Social => "social",
        }
    }

    /// System instruction for this category.
    pub fn instruction_prefix(self) -> &'static str {
        match self {
            ContentCategory::General => GENERAL_PREFIX,
            ContentCategory::Article => ARTICLE_PREFIX,
            ContentCategory::Marketing => MARKETING_PREFIX,
            ContentCategory::Social => SOCIAL_PREFIX,
        }
    }

    /// Selector label shown in the surface.
    pub fn label(self) -> &'static str {
        match self {
            ContentCategory::General => "通用内容",
            ContentCategory::Article => "文章生成",
            ContentCategory::Marketing => "营销文案",
            ContentCategory::Social => "社交媒体",
        }
    }
}

impl std::fmt::Display for ContentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tags_round_trip_through_from_tag() {
        for c in ContentCategory::ALL {
            assert_eq!(ContentCategory::from_tag(Some(c.tag())), c);
        }
    }

    #[test]
    fn unknown_or_missing_tag_falls_back_to_general() {
        assert_eq!(ContentCategory::from_tag(None), ContentCategory::General);
        assert_eq!(ContentCategory::from_tag(Some("")), ContentCategory::General);
        assert_eq!(ContentCategory::from_tag(Some("poetry")), ContentCategory::General);
        assert_eq!(
            ContentCategory::from_tag(Some("poetry")).instruction_prefix(),
            GENERAL_PREFIX
        );
    }

    #[test]
    fn tag_parse_ignores_case_and_whitespace() {
        assert_eq!(ContentCategory::from_tag(Some(" Article ")), ContentCategory::Article);
        assert_eq!(ContentCategory::from_tag(Some("SOCIAL")), ContentCategory::Social);
    }

    #[test]
    fn prefixes_are_distinct_per_category() {
        let mut prefixes: Vec<&str> = ContentCategory::ALL
            .iter()
            .map(|c| c.instruction_prefix())
            .collect();
        prefixes.sort();
        prefixes.dedup();
        assert_eq!(prefixes.len(), ContentCategory::ALL.len());
        assert_eq!(ContentCategory::Article.instruction_prefix(), ARTICLE_PREFIX);
    }
}
