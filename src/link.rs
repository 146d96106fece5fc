//! Share-link parsing.

use std::sync::LazyLock;

use regex::Regex;

static ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:file/d/|folders/|id=|open\?id=)([a-zA-Z0-9_-]+)")
        .expect("valid id pattern")
});

/// Extract the file or folder id from a Drive share link.
///
/// Recognizes `.../file/d/{id}`, `.../folders/{id}`, `id={id}` and
/// `open?id={id}`. Returns `None` when no pattern matches.
pub fn extract_id(link: &str) -> Option<&str> {
    ID_PATTERN
        .captures(link)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_link() {
        assert_eq!(
            extract_id("https://drive.google.com/file/d/1AbC-x_9/view?usp=sharing"),
            Some("1AbC-x_9")
        );
    }

    #[test]
    fn test_folder_link() {
        assert_eq!(
            extract_id("https://drive.google.com/drive/folders/0BxYz123?usp=drive_link"),
            Some("0BxYz123")
        );
    }

    #[test]
    fn test_id_query_param() {
        assert_eq!(
            extract_id("https://drive.google.com/uc?export=download&id=QwErTy"),
            Some("QwErTy")
        );
    }

    #[test]
    fn test_open_link() {
        assert_eq!(
            extract_id("https://drive.google.com/open?id=zz_top-1"),
            Some("zz_top-1")
        );
    }

    #[test]
    fn test_unrelated_string() {
        assert_eq!(extract_id("https://example.com/some/page"), None);
        assert_eq!(extract_id(""), None);
    }

    #[test]
    fn test_id_stops_at_invalid_char() {
        assert_eq!(extract_id("https://drive.google.com/file/d/abc.def"), Some("abc"));
    }
}
