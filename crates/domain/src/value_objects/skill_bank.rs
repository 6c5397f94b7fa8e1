//! The catalogue of nameable skills for a character.

use std::collections::HashSet;

use crate::common::name_key;

/// Fate Core default skill list.
pub const DEFAULT_SKILL_BANK: [&str; 18] = [
    "Athletics",
    "Burglary",
    "Contacts",
    "Crafts",
    "Deceive",
    "Drive",
    "Empathy",
    "Fight",
    "Investigate",
    "Lore",
    "Notice",
    "Physique",
    "Provoke",
    "Rapport",
    "Resources",
    "Shoot",
    "Stealth",
    "Will",
];

// Common names generators use for Fate Core skills.
const SKILL_SYNONYMS: [(&str, &str); 8] = [
    ("willpower", "Will"),
    ("cunning", "Deceive"),
    ("knowledge", "Lore"),
    ("awareness", "Notice"),
    ("charisma", "Rapport"),
    ("strength", "Physique"),
    ("agility", "Athletics"),
    ("marksmanship", "Shoot"),
];

pub fn default_skill_bank() -> Vec<String> {
    DEFAULT_SKILL_BANK.iter().map(|s| s.to_string()).collect()
}

/// Trim entries, drop empty ones and exact duplicates, keeping first-seen
/// order. `None` (input that was not a list at all) yields the default bank.
///
/// Dedup is case-sensitive: the bank is a naming catalogue, not the ladder.
pub fn sanitize_skill_bank(input: Option<Vec<String>>) -> Vec<String> {
    let Some(items) = input else {
        return default_skill_bank();
    };

    let mut seen = HashSet::new();
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

/// Map a generated skill name onto the bank's spelling.
///
/// Matches case-insensitively first, then through the synonym table (only if
/// the synonym's target is itself in the bank). Returns `None` for names the
/// bank does not know.
pub fn canonicalize_skill_name(name: &str, bank: &[String]) -> Option<String> {
    let key = name_key(name);
    if key.is_empty() {
        return None;
    }

    let lookup = |k: &str| bank.iter().find(|b| name_key(b) == k).cloned();

    if let Some(found) = lookup(&key) {
        return Some(found);
    }

    SKILL_SYNONYMS
        .iter()
        .find(|(alias, _)| *alias == key)
        .and_then(|(_, target)| lookup(&name_key(target)))
}
