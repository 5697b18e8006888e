//! Entity name validation and collision disambiguation.

use std::collections::HashSet;

use foldershare_core::error::AppError;
use foldershare_core::result::AppResult;

/// Characters that can never appear in an entity name.
const FORBIDDEN_CHARS: &[char] = &['/', '\\', ':', '\0'];

/// Validate an entity name against the structural rules.
///
/// Names must be non-empty after trimming, at most `max_length` characters,
/// not `.` or `..`, and free of path-separator characters.
pub fn validate_name(name: &str, max_length: usize) -> AppResult<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("Entity name cannot be empty"));
    }
    if trimmed != name {
        return Err(AppError::validation(
            "Entity name cannot start or end with whitespace",
        ));
    }
    if name.chars().count() > max_length {
        return Err(AppError::validation(format!(
            "Entity name exceeds the maximum length of {max_length} characters"
        )));
    }
    if name == "." || name == ".." {
        return Err(AppError::validation(format!(
            "'{name}' is a reserved name"
        )));
    }
    if let Some(c) = name.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
        return Err(AppError::validation(format!(
            "Entity name cannot contain '{}'",
            c.escape_default()
        )));
    }
    Ok(())
}

/// Split a file name into (stem, extension-with-dot).
///
/// Dotfiles like `.bashrc` have no extension; the extension of
/// `archive.tar.gz` is `.gz`.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}

/// Produce a name unique within `taken`, starting from `desired`.
///
/// On collision, a numeric disambiguator is inserted before the extension:
/// `report.txt` becomes `report (1).txt`, then `report (2).txt`, and so on.
/// The sibling set is finite, so a free counter always exists and the scan
/// terminates.
pub fn unique_name(desired: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(desired) {
        return desired.to_string();
    }
    let (stem, ext) = split_extension(desired);
    for n in 1u64.. {
        let candidate = format!("{stem} ({n}){ext}");
        if !taken.contains(&candidate) {
            return candidate;
        }
    }
    unreachable!("sibling set is finite");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_empty() {
        assert!(validate_name("", 255).is_err());
        assert!(validate_name("   ", 255).is_err());
    }

    #[test]
    fn test_validate_rejects_separators() {
        assert!(validate_name("a/b", 255).is_err());
        assert!(validate_name("a\\b", 255).is_err());
        assert!(validate_name("a:b", 255).is_err());
    }

    #[test]
    fn test_validate_rejects_reserved() {
        assert!(validate_name(".", 255).is_err());
        assert!(validate_name("..", 255).is_err());
        assert!(validate_name(".bashrc", 255).is_ok());
    }

    #[test]
    fn test_validate_length_limit() {
        assert!(validate_name(&"x".repeat(255), 255).is_ok());
        assert!(validate_name(&"x".repeat(256), 255).is_err());
    }

    #[test]
    fn test_unique_name_no_collision() {
        let taken = HashSet::new();
        assert_eq!(unique_name("report.txt", &taken), "report.txt");
    }

    #[test]
    fn test_unique_name_inserts_counter_before_extension() {
        let taken: HashSet<String> = ["report.txt", "report (1).txt"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(unique_name("report.txt", &taken), "report (2).txt");
    }

    #[test]
    fn test_unique_name_folder_without_extension() {
        let taken: HashSet<String> = ["photos"].iter().map(|s| s.to_string()).collect();
        assert_eq!(unique_name("photos", &taken), "photos (1)");
    }

    #[test]
    fn test_unique_name_dotfile() {
        let taken: HashSet<String> = [".env"].iter().map(|s| s.to_string()).collect();
        assert_eq!(unique_name(".env", &taken), ".env (1)");
    }
}
