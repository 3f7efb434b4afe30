use std::collections::HashSet;

use uuid::Uuid;

/// Returns `base` when it is free, otherwise the first free `base_N` (N from 0).
pub fn unique_auto_inc_id<'a>(base: &str, existing: impl IntoIterator<Item = &'a str>) -> String {
    let taken: HashSet<&str> = existing.into_iter().collect();
    if !taken.contains(base) {
        return base.to_string();
    }
    (0usize..)
        .map(|suffix| format!("{base}_{suffix}"))
        .find(|candidate| !taken.contains(candidate.as_str()))
        .unwrap_or_else(|| format!("{base}_{}", random_id()))
}

pub fn random_id() -> String {
    Uuid::new_v4().simple().to_string()
}

pub fn first_to_lower(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
