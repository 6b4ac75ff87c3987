//! Dietary selection while the form is being filled, and its flattening
//! into the two persisted text fields.

use crate::contract::model::{Category, DietarySelection, Group, Language};
use crate::domain::catalog;

/// Separator used in the persisted `intolerances` / `allergies` text.
pub const TOKEN_SEPARATOR: &str = ", ";

/// Selection state with the per-group "other" inputs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionState {
    selection: DietarySelection,
    other_intolerance_open: bool,
    other_allergy_open: bool,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &DietarySelection {
        &self.selection
    }

    pub fn into_selection(self) -> DietarySelection {
        self.selection
    }

    pub fn is_selected(&self, category: Category) -> bool {
        self.selection.selected.contains(&category)
    }

    /// Flip one fixed category; returns the new flag.
    pub fn toggle(&mut self, category: Category) -> bool {
        if self.selection.selected.remove(&category) {
            false
        } else {
            self.selection.selected.insert(category);
            true
        }
    }

    pub fn is_other_open(&self, group: Group) -> bool {
        match group {
            Group::Intolerances => self.other_intolerance_open,
            Group::Allergies => self.other_allergy_open,
        }
    }

    fn other_open_mut(&mut self, group: Group) -> &mut bool {
        match group {
            Group::Intolerances => &mut self.other_intolerance_open,
            Group::Allergies => &mut self.other_allergy_open,
        }
    }

    /// Reveal or hide the custom-entry input of `group`.
    pub fn toggle_other(&mut self, group: Group) -> bool {
        let open = self.other_open_mut(group);
        *open = !*open;
        *open
    }

    pub fn can_confirm(&self, group: Group, text: &str) -> bool {
        self.is_other_open(group) && !text.trim().is_empty()
    }

    /// Append a custom entry and collapse the input. Refused (returns
    /// `false`) unless [`can_confirm`](Self::can_confirm) holds.
    pub fn confirm_custom(&mut self, group: Group, text: &str) -> bool {
        if !self.can_confirm(group, text) {
            return false;
        }
        self.selection
            .custom_mut(group)
            .push(text.trim().to_string());
        *self.other_open_mut(group) = false;
        true
    }

    pub fn remove_custom(&mut self, group: Group, index: usize) -> Option<String> {
        let list = self.selection.custom_mut(group);
        (index < list.len()).then(|| list.remove(index))
    }

    pub fn custom(&self, group: Group) -> &[String] {
        self.selection.custom(group)
    }
}

/// The two denormalized text fields stored with a response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FlattenedDiet {
    pub intolerances: String,
    pub allergies: String,
}

/// True when `token` carries no information: blank or the none-sentinel.
pub fn is_empty_token(token: &str, none_sentinel: &str) -> bool {
    let token = token.trim();
    token.is_empty() || token.to_lowercase() == none_sentinel.trim().to_lowercase()
}

/// Translated labels of ticked categories in catalog order, then custom
/// entries in insertion order.
pub fn flatten_group(
    selection: &DietarySelection,
    group: Group,
    lang: Language,
    none_sentinel: &str,
) -> String {
    let mut tokens: Vec<&str> = Category::in_group(group)
        .filter(|c| selection.selected.contains(c))
        .map(|c| catalog::label(c, lang))
        .collect();
    tokens.extend(selection.custom(group).iter().map(String::as_str));

    tokens
        .into_iter()
        .map(str::trim)
        .filter(|t| !is_empty_token(t, none_sentinel))
        .collect::<Vec<_>>()
        .join(TOKEN_SEPARATOR)
}

pub fn flatten(selection: &DietarySelection, lang: Language, none_sentinel: &str) -> FlattenedDiet {
    FlattenedDiet {
        intolerances: flatten_group(selection, Group::Intolerances, lang, none_sentinel),
        allergies: flatten_group(selection, Group::Allergies, lang, none_sentinel),
    }
}
