use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Matches the trailing "/view..." segment of a Drive share link
    static ref DRIVE_VIEW_SUFFIX: Regex = Regex::new(r"/view.*$").unwrap();

    /// Captures the file id from a Drive "/d/<id>" path
    static ref DRIVE_FILE_ID: Regex = Regex::new(r"/d/([^/]+)").unwrap();
}

const DRIVE_THUMBNAIL_BASE: &str = "https://drive.google.com/thumbnail?id=";

/// Rewrites Google Drive share links into directly embeddable thumbnail URLs.
///
/// Object-storage URLs and anything that is not a Drive link pass through untouched.
pub fn normalize_image_url(url: &str) -> String {
    let url = url.trim();
    if url.is_empty() || !url.contains("drive.google.com") {
        return url.to_string();
    }

    let without_view = DRIVE_VIEW_SUFFIX.replace(url, "");
    match DRIVE_FILE_ID.captures(&without_view) {
        Some(caps) => format!("{}{}", DRIVE_THUMBNAIL_BASE, &caps[1]),
        None => without_view.into_owned(),
    }
}

/// Same as [`normalize_image_url`] for optional fields; empty strings collapse to `None`.
pub fn normalize_optional(url: Option<&str>) -> Option<String> {
    url.map(normalize_image_url).filter(|u| !u.is_empty())
}
