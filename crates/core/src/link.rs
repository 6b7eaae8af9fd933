//! Shared-file link normalisation.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::LinkError;

static FILE_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/d/([A-Za-z0-9_-]+)").expect("invalid file id regex"));

/// Extract the file identifier from the first `/d/<id>` segment of a link.
pub fn extract_file_id(link: &str) -> Option<&str> {
    FILE_ID_RE
        .captures(link)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Build the embeddable preview URL for a shared-file link.
pub fn embed_url(link: &str) -> Result<String, LinkError> {
    let id = extract_file_id(link).ok_or_else(|| LinkError::Invalid {
        link: link.to_string(),
    })?;
    Ok(format!("https://drive.google.com/file/d/{id}/preview"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_identifier_and_builds_preview() {
        let link = "https://drive.google.com/file/d/ABC123xyz_-/view";
        assert_eq!(extract_file_id(link), Some("ABC123xyz_-"));
        assert_eq!(
            embed_url(link).unwrap(),
            "https://drive.google.com/file/d/ABC123xyz_-/preview"
        );
    }

    #[test]
    fn stops_identifier_at_first_foreign_character() {
        let link = "https://drive.google.com/file/d/abc.def/view?usp=sharing";
        assert_eq!(extract_file_id(link), Some("abc"));
    }

    #[test]
    fn rejects_links_without_file_segment() {
        let link = "https://example.com/watch?v=123";
        assert_eq!(extract_file_id(link), None);
        assert_eq!(
            embed_url(link),
            Err(LinkError::Invalid {
                link: link.to_string()
            })
        );
        assert!(embed_url("https://drive.google.com/file/d/").is_err());
    }
}
