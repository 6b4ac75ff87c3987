use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Display language of the invitation site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    It,
    Sq,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::It, Language::Sq];

    pub fn code(self) -> &'static str {
        match self {
            Language::It => "it",
            Language::Sq => "sq",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "it" => Ok(Language::It),
            "sq" => Ok(Language::Sq),
            other => Err(format!("unsupported language '{other}'")),
        }
    }
}

/// The two disjoint groups of dietary categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Group {
    Intolerances,
    Allergies,
}

impl Group {
    pub const ALL: [Group; 2] = [Group::Intolerances, Group::Allergies];

    pub fn key(self) -> &'static str {
        match self {
            Group::Intolerances => "intolerances",
            Group::Allergies => "allergies",
        }
    }
}

/// Fixed dietary categories. Declaration order is the catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Lactose,
    Gluten,
    Sulfites,
    Histamine,
    TreeNuts,
    Peanuts,
    Eggs,
    Fish,
    Shellfish,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Lactose,
        Category::Gluten,
        Category::Sulfites,
        Category::Histamine,
        Category::TreeNuts,
        Category::Peanuts,
        Category::Eggs,
        Category::Fish,
        Category::Shellfish,
    ];

    pub fn group(self) -> Group {
        match self {
            Category::Lactose | Category::Gluten | Category::Sulfites | Category::Histamine => {
                Group::Intolerances
            }
            Category::TreeNuts
            | Category::Peanuts
            | Category::Eggs
            | Category::Fish
            | Category::Shellfish => Group::Allergies,
        }
    }

    /// Stable wire key.
    pub fn key(self) -> &'static str {
        match self {
            Category::Lactose => "lactose",
            Category::Gluten => "gluten",
            Category::Sulfites => "sulfites",
            Category::Histamine => "histamine",
            Category::TreeNuts => "treeNuts",
            Category::Peanuts => "peanuts",
            Category::Eggs => "eggs",
            Category::Fish => "fish",
            Category::Shellfish => "shellfish",
        }
    }

    pub fn in_group(group: Group) -> impl Iterator<Item = Category> {
        Self::ALL.into_iter().filter(move |c| c.group() == group)
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.key() == s.trim())
            .ok_or_else(|| format!("unknown category '{s}'"))
    }
}

/// Snapshot of what a guest ticked and typed in the dietary section.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DietarySelection {
    pub selected: BTreeSet<Category>,
    pub custom_intolerances: Vec<String>,
    pub custom_allergies: Vec<String>,
}

impl DietarySelection {
    pub fn custom(&self, group: Group) -> &[String] {
        match group {
            Group::Intolerances => &self.custom_intolerances,
            Group::Allergies => &self.custom_allergies,
        }
    }

    pub fn custom_mut(&mut self, group: Group) -> &mut Vec<String> {
        match group {
            Group::Intolerances => &mut self.custom_intolerances,
            Group::Allergies => &mut self.custom_allergies,
        }
    }
}

/// A persisted RSVP submission. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub intolerances: String,
    pub allergies: String,
    pub notes: String,
    pub submitted_at: DateTime<Utc>,
    pub language: Language,
}

impl GuestResponse {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Data a guest submits.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewGuestResponse {
    pub first_name: String,
    pub last_name: String,
    pub notes: Option<String>,
    pub language: Language,
    pub selection: DietarySelection,
}
