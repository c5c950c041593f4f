use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;
use url::Url;

static DISALLOWED_FILENAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9.\-]").expect("filename pattern is valid"));

/// Remove every character outside `[A-Za-z0-9.-]`.
///
/// Characters are dropped, not replaced, so the result may be empty.
pub fn sanitize_filename(filename: &str) -> String {
    DISALLOWED_FILENAME_CHARS
        .replace_all(filename, "")
        .into_owned()
}

/// Destination file name for a URL: its final path segment, decoded, then sanitized.
pub fn file_name_from_url(url: &Url) -> String {
    let last_segment = url
        .path_segments()
        .and_then(|segments| segments.last())
        .unwrap_or_default();

    sanitize_filename(&percent_decode_str(last_segment).decode_utf8_lossy())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("report(final)!!.pdf"), "reportfinal.pdf");
        assert_eq!(sanitize_filename("normal-name.mp3"), "normal-name.mp3");
        assert_eq!(sanitize_filename("../../etc/passwd"), "....etcpasswd");
        assert_eq!(sanitize_filename("()!!"), "");
    }

    #[test]
    fn test_file_name_from_url() {
        let url = Url::parse("https://example.com/docs/report(final)!!.pdf").unwrap();
        assert_eq!(file_name_from_url(&url), "reportfinal.pdf");

        let url = Url::parse("https://example.com/a/data.csv?page=2#top").unwrap();
        assert_eq!(file_name_from_url(&url), "data.csv");
    }

    #[test]
    fn test_file_name_from_url_decodes_before_sanitizing() {
        let url = Url::parse("https://example.com/my file.pdf").unwrap();
        assert_eq!(file_name_from_url(&url), "myfile.pdf");

        let url = Url::parse("https://example.com/docs/résumé.pdf").unwrap();
        assert_eq!(file_name_from_url(&url), "rsum.pdf");

        let url = Url::parse("https://example.com/a/..%2F..%2Fetc%2Fpasswd").unwrap();
        assert_eq!(file_name_from_url(&url), "....etcpasswd");
    }

    #[test]
    fn test_file_name_from_url_without_segment() {
        let url = Url::parse("https://example.com/").unwrap();
        assert_eq!(file_name_from_url(&url), "");

        let url = Url::parse("bad://x").unwrap();
        assert_eq!(file_name_from_url(&url), "");
    }
}
