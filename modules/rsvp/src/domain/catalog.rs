//! Translated labels for the dietary catalog.

use crate::contract::model::{Category, Group, Language};

pub fn label(category: Category, lang: Language) -> &'static str {
    use Category::*;
    match (lang, category) {
        (Language::It, Lactose) => "Lattosio",
        (Language::It, Gluten) => "Glutine",
        (Language::It, Sulfites) => "Solfiti",
        (Language::It, Histamine) => "Istamina",
        (Language::It, TreeNuts) => "Frutta a guscio",
        (Language::It, Peanuts) => "Arachidi",
        (Language::It, Eggs) => "Uova",
        (Language::It, Fish) => "Pesce",
        (Language::It, Shellfish) => "Crostacei",
        (Language::Sq, Lactose) => "Laktozë",
        (Language::Sq, Gluten) => "Gluten",
        (Language::Sq, Sulfites) => "Sulfite",
        (Language::Sq, Histamine) => "Histaminë",
        (Language::Sq, TreeNuts) => "Fruta të thata (Arrore)",
        (Language::Sq, Peanuts) => "Kikirikë",
        (Language::Sq, Eggs) => "Vezë",
        (Language::Sq, Fish) => "Peshk",
        (Language::Sq, Shellfish) => "Krustace",
    }
}

pub fn group_title(group: Group, lang: Language) -> &'static str {
    match (lang, group) {
        (Language::It, Group::Intolerances) => "Intolleranze",
        (Language::It, Group::Allergies) => "Allergie",
        (Language::Sq, Group::Intolerances) => "Intolerancat",
        (Language::Sq, Group::Allergies) => "Alergjitë",
    }
}

/// Label of the "other" toggle.
pub fn other_label(lang: Language) -> &'static str {
    match lang {
        Language::It => "Altro (specificare)",
        Language::Sq => "Tjetër (specifikoni)",
    }
}

/// Placeholder of the custom-entry input.
pub fn specify_placeholder(lang: Language) -> &'static str {
    match lang {
        Language::It => "Specificare...",
        Language::Sq => "Specifikoni...",
    }
}
