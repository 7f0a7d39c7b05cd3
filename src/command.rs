// src/command.rs
//! Command table: maps inbound chat text to a news [`Category`].

use serde::{Deserialize, Serialize};

/// Closed set of topics the bot can fetch headlines for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    General,
    Politics,
    Technology,
    Sports,
    Science,
    Health,
}

/// Command tokens, lowercase. Several tokens may point at one category.
const COMMANDS: &[(&str, Category)] = &[
    ("/news", Category::General),
    ("/general", Category::General),
    ("/politics", Category::Politics),
    ("/tech", Category::Technology),
    ("/sport", Category::Sports),
    ("/science", Category::Science),
    ("/health", Category::Health),
];

impl Category {
    /// Menu order.
    pub const ALL: [Category; 6] = [
        Category::General,
        Category::Politics,
        Category::Technology,
        Category::Sports,
        Category::Science,
        Category::Health,
    ];

    /// Exact, case-insensitive lookup. Surrounding whitespace is ignored;
    /// anything else that is not a listed token yields `None`.
    pub fn from_command(text: &str) -> Option<Category> {
        let needle = text.trim().to_lowercase();
        COMMANDS
            .iter()
            .find(|(token, _)| *token == needle)
            .map(|(_, cat)| *cat)
    }

    /// Canonical identifier used in logs and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::General => "general",
            Category::Politics => "politics",
            Category::Technology => "technology",
            Category::Sports => "sports",
            Category::Science => "science",
            Category::Health => "health",
        }
    }

    /// Topic name understood by the news provider.
    /// The provider has no politics topic; domestic news is the closest match.
    pub fn provider_topic(self) -> &'static str {
        match self {
            Category::Politics => "nation",
            other => other.as_str(),
        }
    }

    /// Token the menu button sends back when tapped.
    pub fn command(self) -> &'static str {
        match self {
            Category::General => "/news",
            Category::Politics => "/politics",
            Category::Technology => "/tech",
            Category::Sports => "/sport",
            Category::Science => "/science",
            Category::Health => "/health",
        }
    }

    /// Human-facing label (Russian, matching the bot's reply language).
    pub fn label(self) -> &'static str {
        match self {
            Category::General => "Главное",
            Category::Politics => "Политика",
            Category::Technology => "Технологии",
            Category::Sports => "Спорт",
            Category::Science => "Наука",
            Category::Health => "Здоровье",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
