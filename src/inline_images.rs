use percent_encoding::percent_decode_str;
use regex::{Captures, Regex};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, warn};

/// One image to attach inline under `content_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub content_id: String,
    pub path: PathBuf,
    pub mime_type: &'static str,
    pub data: Vec<u8>,
}

/// Markup with local image sources rewritten, plus the images to attach.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineImages {
    pub html: String,
    pub images: Vec<InlineImage>,
}

/// Rewrite every local image source in `html` to a `cid:` reference, so
/// images placed from disk can be attached inline by the mail composer.
///
/// Content ids are `img_1`, `img_2`, ... in document order. Remote URLs,
/// `data:`/`cid:` sources and paths that do not name a readable file are
/// left as they are.
pub fn embed_local_images(html: &str) -> InlineImages {
    static IMG_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = IMG_REGEX
        .get_or_init(|| Regex::new(r#"(?i)<img[^>]+src=["']([^"'>]+)["'][^>]*>"#).unwrap());

    let mut images = Vec::new();
    let html = re
        .replace_all(html, |caps: &Captures| {
            let tag = &caps[0];
            let src = &caps[1];
            let Some(path) = local_path(&html_escape::decode_html_entities(src)) else {
                return tag.to_string();
            };
            if !path.is_file() {
                debug!(src = %src, "image source is not a local file, keeping it");
                return tag.to_string();
            }
            match fs::read(&path) {
                Ok(data) => {
                    let content_id = format!("img_{}", images.len() + 1);
                    let rewritten = tag.replacen(src, &format!("cid:{}", content_id), 1);
                    debug!(path = %path.display(), content_id = %content_id, "embedding image");
                    images.push(InlineImage {
                        content_id,
                        mime_type: mime_type(&path),
                        path,
                        data,
                    });
                    rewritten
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "could not read image, keeping its source");
                    tag.to_string()
                }
            }
        })
        .into_owned();

    InlineImages { html, images }
}

/// Filesystem path named by `src`, when it is a `file://` URL or has no
/// URL scheme at all.
fn local_path(src: &str) -> Option<PathBuf> {
    static SCHEME_REGEX: OnceLock<Regex> = OnceLock::new();
    let scheme = SCHEME_REGEX.get_or_init(|| Regex::new(r"^([A-Za-z][A-Za-z0-9+.\-]*):").unwrap());

    let src = src.trim();
    let Some(caps) = scheme.captures(src) else {
        return Some(PathBuf::from(src));
    };
    let name = &caps[1];
    if name.eq_ignore_ascii_case("file") {
        let rest = &src[caps[0].len()..];
        let rest = rest.strip_prefix("//").unwrap_or(rest);
        let rest = rest.strip_prefix("localhost").unwrap_or(rest);
        let decoded = percent_decode_str(rest).decode_utf8().ok()?;
        Some(PathBuf::from(strip_drive_slash(&decoded)))
    } else if name.len() == 1 {
        // Windows drive letter, not a scheme
        Some(PathBuf::from(src))
    } else {
        None
    }
}

/// `/C:/images/a.png` -> `C:/images/a.png`
fn strip_drive_slash(path: &str) -> &str {
    let bytes = path.as_bytes();
    if bytes.len() >= 3 && bytes[0] == b'/' && bytes[1].is_ascii_alphabetic() && bytes[2] == b':' {
        &path[1..]
    } else {
        path
    }
}

/// MIME type by file extension.
pub fn mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_mime_types() {
        assert_eq!(mime_type(Path::new("a.JPG")), "image/jpeg");
        assert_eq!(mime_type(Path::new("a.jpeg")), "image/jpeg");
        assert_eq!(mime_type(Path::new("a.png")), "image/png");
        assert_eq!(mime_type(Path::new("a.gif")), "image/gif");
        assert_eq!(mime_type(Path::new("a.bmp")), "image/bmp");
        assert_eq!(mime_type(Path::new("a.webp")), "application/octet-stream");
        assert_eq!(mime_type(Path::new("noext")), "application/octet-stream");
    }

    #[test]
    fn test_local_path_detection() {
        assert_eq!(local_path("images/a.png"), Some(PathBuf::from("images/a.png")));
        assert_eq!(
            local_path("file:///tmp/my%20logo.png"),
            Some(PathBuf::from("/tmp/my logo.png"))
        );
        assert_eq!(
            local_path("file:///C:/pics/a.png"),
            Some(PathBuf::from("C:/pics/a.png"))
        );
        assert_eq!(local_path(r"C:\pics\a.png"), Some(PathBuf::from(r"C:\pics\a.png")));
        assert_eq!(local_path("https://cdn.example.com/a.png"), None);
        assert_eq!(local_path("cid:img_1"), None);
        assert_eq!(local_path("data:image/png;base64,AAAA"), None);
    }

    #[test]
    fn test_local_files_are_embedded_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let logo = dir.path().join("logo.png");
        let photo = dir.path().join("photo one.jpg");
        fs::write(&logo, b"png-bytes").unwrap();
        fs::write(&photo, b"jpg-bytes").unwrap();

        let photo_url = format!(
            "file://{}",
            photo.display().to_string().replace(' ', "%20")
        );
        let html = format!(
            r#"<img src="{}" alt="logo"><p>x</p><IMG alt="p" src='{}'><img src="https://example.com/remote.png">"#,
            logo.display(),
            photo_url
        );

        let result = embed_local_images(&html);
        assert_eq!(result.images.len(), 2);
        assert_eq!(result.images[0].content_id, "img_1");
        assert_eq!(result.images[0].mime_type, "image/png");
        assert_eq!(result.images[0].data, b"png-bytes");
        assert_eq!(result.images[1].content_id, "img_2");
        assert_eq!(result.images[1].path, photo);
        assert_eq!(result.images[1].mime_type, "image/jpeg");
        assert_eq!(
            result.html,
            r#"<img src="cid:img_1" alt="logo"><p>x</p><IMG alt="p" src='cid:img_2'><img src="https://example.com/remote.png">"#
        );
    }

    #[test]
    fn test_escaped_ampersand_in_path_is_decoded() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("R&D");
        fs::create_dir(&folder).unwrap();
        let logo = folder.join("logo.png");
        fs::write(&logo, b"png-bytes").unwrap();

        let html = format!(
            r#"<img src="file://{}" alt="logo">"#,
            logo.display().to_string().replace('&', "&amp;")
        );
        let result = embed_local_images(&html);
        assert_eq!(result.images.len(), 1);
        assert_eq!(result.images[0].path, logo);
        assert_eq!(result.html, r#"<img src="cid:img_1" alt="logo">"#);
    }

    #[test]
    fn test_missing_file_is_left_alone() {
        let html = r#"<img src="/definitely/not/here.png">"#;
        let result = embed_local_images(html);
        assert!(result.images.is_empty());
        assert_eq!(result.html, html);
    }

    #[test]
    fn test_markup_without_images_is_unchanged() {
        let html = "<table><tbody><tr><td>Hi</td></tr></tbody></table>";
        assert_eq!(embed_local_images(html).html, html);
    }
}
