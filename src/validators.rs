//! Validation for scene completeness and settings fields.
//!
//! Each validator returns `Some(message)` on failure and `None` when valid.

use crate::config::Config;

pub const CONFIRM_DELETE_MESSAGE: &str = "確定要刪除此紀錄嗎？無法復原。";
pub const CONFIRM_INCOMPLETE_MESSAGE: &str = "部分場景資訊似乎未填寫完整，確定要開始生成嗎？";

/// Warning for scenes that have neither title nor objective.
pub fn incomplete_scenes_warning(indices: &[usize]) -> Option<String> {
    if indices.is_empty() {
        return None;
    }
    let numbers: Vec<String> = indices.iter().map(|i| (i + 1).to_string()).collect();
    Some(format!("場景 {} 缺少標題與目標。", numbers.join("、")))
}

/// Validate a completion endpoint base URL.
pub fn validate_endpoint(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return Some("Endpoint cannot be empty".to_string());
    }
    if !(value.starts_with("https://") || value.starts_with("http://")) {
        return Some("Endpoint must start with http:// or https://".to_string());
    }
    if value.contains(char::is_whitespace) {
        return Some("Endpoint cannot contain spaces".to_string());
    }
    None
}

/// Validate a model identifier as it appears in the request path.
pub fn validate_model(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return Some("Model cannot be empty".to_string());
    }
    if value.contains(|c: char| c.is_whitespace() || c == '/') {
        return Some("Model cannot contain spaces or '/'".to_string());
    }
    None
}

/// Validate the name of the environment variable holding the credential.
pub fn validate_env_var_name(value: &str) -> Option<String> {
    let mut chars = value.chars();
    let Some(first) = chars.next() else {
        return Some("Variable name cannot be empty".to_string());
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return Some("Must start with a letter or '_'".to_string());
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Some("Only letters, digits and '_' allowed".to_string());
    }
    None
}

/// Pure check for where a storage file may be written.
fn check_storage_target(target_is_dir: bool, parent_is_file: bool) -> Option<String> {
    if target_is_dir {
        return Some("Path is a directory".to_string());
    }
    if parent_is_file {
        return Some("Parent is not a directory".to_string());
    }
    None
}

fn storage_error_message(error: &std::io::Error) -> String {
    match error.kind() {
        std::io::ErrorKind::PermissionDenied => "Cannot access path".to_string(),
        _ => "Invalid path".to_string(),
    }
}

/// Validate a storage file path. The file itself and its parent directory
/// may be missing; they are created on first save.
pub fn validate_storage_path(path: &str) -> Option<String> {
    if path.trim().is_empty() {
        return Some("Path cannot be empty".to_string());
    }

    let expanded = Config::expand_tilde(path.trim());

    let target_is_dir = match std::fs::metadata(&expanded) {
        Ok(metadata) => metadata.is_dir(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
        Err(e) => return Some(storage_error_message(&e)),
    };
    let parent_is_file = expanded
        .parent()
        .and_then(|p| std::fs::metadata(p).ok())
        .is_some_and(|m| m.is_file());

    check_storage_target(target_is_dir, parent_is_file)
}
