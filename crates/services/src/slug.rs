//! URL slug helpers.

use domains::{AppError, Result};

/// Lowercases, drops everything but `[a-z0-9]`, whitespace and `-`, turns
/// whitespace runs into `-`, collapses repeated `-` and trims them from the ends.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    for c in input.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            slug.push(c);
        } else if (c.is_whitespace() || c == '-') && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

/// Returns the provided slug when valid, otherwise derives one from `source`.
pub fn resolve(provided: &str, source: &str) -> Result<String> {
    let provided = provided.trim();
    if provided.is_empty() {
        let derived = slugify(source);
        if derived.is_empty() {
            return Err(AppError::validation("Slug cannot be derived from an empty name"));
        }
        return Ok(derived);
    }
    validate(provided)?;
    Ok(provided.to_string())
}

pub fn validate(slug: &str) -> Result<()> {
    let valid = !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if valid {
        Ok(())
    } else {
        Err(AppError::validation(
            "Slug may only contain lowercase letters, digits and hyphens",
        ))
    }
}
