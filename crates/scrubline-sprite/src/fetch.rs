// crates/scrubline-sprite/src/fetch.rs
//
// Byte/text loading for manifest and sheet sources. A source is either
// a local filesystem path or an http(s) URL — the media server case.

use std::io::Read;

use anyhow::{Context, Result};

/// True when `source` must be fetched over HTTP rather than read from
/// disk.
pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

pub fn load_text(source: &str) -> Result<String> {
    if is_remote(source) {
        ureq::get(source)
            .call()
            .with_context(|| format!("GET {source}"))?
            .into_string()
            .with_context(|| format!("read body of {source}"))
    } else {
        std::fs::read_to_string(source).with_context(|| format!("read {source}"))
    }
}

pub fn load_bytes(source: &str) -> Result<Vec<u8>> {
    if is_remote(source) {
        let mut buf = Vec::new();
        ureq::get(source)
            .call()
            .with_context(|| format!("GET {source}"))?
            .into_reader()
            .read_to_end(&mut buf)
            .with_context(|| format!("read body of {source}"))?;
        Ok(buf)
    } else {
        std::fs::read(source).with_context(|| format!("read {source}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_detection() {
        assert!(is_remote("http://host/s.vtt"));
        assert!(is_remote("https://host/s.vtt"));
        assert!(!is_remote("media/s.vtt"));
        assert!(!is_remote("/abs/path/s.vtt"));
        assert!(!is_remote("httpdir/s.vtt"));
    }

    #[test]
    fn local_load_roundtrip() {
        let dir = std::env::temp_dir().join("scrubline_fetch_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("sample.vtt");
        std::fs::write(&path, "WEBVTT\n").unwrap();

        let text = load_text(path.to_str().unwrap()).unwrap();
        assert_eq!(text, "WEBVTT\n");
        let bytes = load_bytes(path.to_str().unwrap()).unwrap();
        assert_eq!(bytes, b"WEBVTT\n");
    }

    #[test]
    fn missing_file_is_a_contextual_error() {
        let err = load_text("definitely/not/here.vtt").unwrap_err();
        assert!(err.to_string().contains("definitely/not/here.vtt"));
    }
}
