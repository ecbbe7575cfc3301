use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A tracked habit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Habit {
    // ---
    pub id: Uuid,
    pub name: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The mutable fields of a habit, already validated by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHabit {
    // ---
    pub name: String,
    pub category: String,
    pub description: Option<String>,
}

impl Habit {
    // ---
    pub fn new(fields: NewHabit) -> Self {
        // ---
        Self::with_id(Uuid::new_v4(), fields)
    }

    pub fn with_id(id: Uuid, fields: NewHabit) -> Self {
        // ---
        Self {
            id,
            name: fields.name,
            category: fields.category,
            description: fields.description,
        }
    }

    /// Order in which list results are returned: by name (byte-wise), then id.
    pub fn list_order(a: &Habit, b: &Habit) -> std::cmp::Ordering {
        // ---
        a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id))
    }

    /// Returns true when every word of `keyword` appears as a whole word in
    /// the name, category, or description (case-insensitive).
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        // ---
        let words: Vec<String> = [
            self.name.as_str(),
            self.category.as_str(),
            self.description.as_deref().unwrap_or_default(),
        ]
        .into_iter()
        .flat_map(split_words)
        .collect();

        let mut terms = split_words(keyword).peekable();
        if terms.peek().is_none() {
            return false;
        }
        terms.all(|term| words.contains(&term))
    }
}

fn split_words(text: &str) -> impl Iterator<Item = String> + '_ {
    // ---
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}

/// Selects which habits a list request returns.
///
/// Only one filter applies per request. When a request carries both a
/// `keyword` and a `category`, the keyword search wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HabitFilter {
    All,
    Category(String),
    Keyword(String),
}

impl HabitFilter {
    // ---
    pub fn from_query(category: Option<String>, keyword: Option<String>) -> Self {
        // ---
        let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        match (non_blank(keyword), non_blank(category)) {
            (Some(keyword), _) => HabitFilter::Keyword(keyword),
            (None, Some(category)) => HabitFilter::Category(category),
            (None, None) => HabitFilter::All,
        }
    }

    /// Applies the filter to a single in-memory record.
    pub fn matches(&self, habit: &Habit) -> bool {
        // ---
        match self {
            HabitFilter::All => true,
            HabitFilter::Category(category) => habit.category == *category,
            HabitFilter::Keyword(keyword) => habit.matches_keyword(keyword),
        }
    }
}
