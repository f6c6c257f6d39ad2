//! Extension-to-MIME mapping
//!
//! Storage and HTTP responses are not reliable about content types, so the
//! download paths correct the reported type from the file extension. The
//! table covers the common image/document/audio/video/archive/text formats;
//! anything else keeps the reported fallback.

/// MIME type for a file extension, or the fallback when the extension is
/// unknown. The extension may carry a leading dot and any casing.
pub fn mime_for(extension: &str, fallback: &str) -> String {
    let ext = extension.trim_start_matches('.').to_ascii_lowercase();
    match lookup(&ext) {
        Some(mime) => mime.to_string(),
        None => fallback.to_string(),
    }
}

fn lookup(ext: &str) -> Option<&'static str> {
    let mime = match ext {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "json" => "application/json",
        "xml" => "application/xml",
        "html" => "text/html",
        "css" => "text/css",
        "js" => "application/javascript",
        "zip" => "application/zip",
        "rar" => "application/x-rar-compressed",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "mp3" => "audio/mpeg",
        "mp4" => "video/mp4",
        "avi" => "video/x-msvideo",
        "mov" => "video/quicktime",
        "wmv" => "video/x-ms-wmv",
        "flv" => "video/x-flv",
        "mkv" => "video/x-matroska",
        _ => return None,
    };
    Some(mime)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extension_overrides_fallback() {
        assert_eq!(mime_for("png", "application/octet-stream"), "image/png");
        assert_eq!(mime_for("pdf", "text/plain"), "application/pdf");
    }

    #[test]
    fn test_unknown_extension_keeps_fallback() {
        assert_eq!(
            mime_for("xyz123", "application/octet-stream"),
            "application/octet-stream"
        );
        assert_eq!(mime_for("", "text/plain"), "text/plain");
    }

    #[test]
    fn test_leading_dot_and_case_ignored() {
        assert_eq!(mime_for(".PNG", "application/octet-stream"), "image/png");
        assert_eq!(mime_for("JpEg", "application/octet-stream"), "image/jpeg");
    }

    #[test]
    fn test_jpg_and_jpeg_agree() {
        assert_eq!(mime_for("jpg", ""), mime_for("jpeg", ""));
    }
}
