//! Content-type lookup by file extension

use std::path::Path;

/// Fallback for unknown extensions
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Content type for `path`, inferred from its extension (case-insensitive)
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => ext.to_ascii_lowercase(),
        None => return OCTET_STREAM,
    };

    match ext.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" => "application/javascript; charset=utf-8",
        "json" | "map" => "application/json",
        "txt" => "text/plain; charset=utf-8",
        // browsers refuse streaming compilation without this exact type
        "wasm" => "application/wasm",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "wav" => "audio/wav",
        "mp3" => "audio/mpeg",
        "ogg" => "audio/ogg",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        _ => OCTET_STREAM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        assert_eq!(content_type_for(Path::new("game.wasm")), "application/wasm");
        assert_eq!(content_type_for(Path::new("index.html")), "text/html; charset=utf-8");
        assert_eq!(
            content_type_for(Path::new("js/game.JS")),
            "application/javascript; charset=utf-8"
        );
        assert_eq!(content_type_for(Path::new("sfx/hit.ogg")), "audio/ogg");
    }

    #[test]
    fn test_unknown_or_missing_extension() {
        assert_eq!(content_type_for(Path::new("LICENSE")), OCTET_STREAM);
        assert_eq!(content_type_for(Path::new("data.bin")), OCTET_STREAM);
    }
}
