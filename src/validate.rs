use std::sync::OnceLock;

use regex::Regex;

fn youtube_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(https?://)?(www\.)?(youtube\.com|youtu\.be)/.+")
            .unwrap_or_else(|error| panic!("invalid YouTube URL regex: {error}"))
    })
}

/// Returns whether `url` looks like a YouTube URL: optional scheme and `www.`,
/// then `youtube.com` or `youtu.be` followed by `/` and at least one more
/// character. The remainder is not constrained; whether the video actually
/// exists is yt-dlp's problem.
pub fn is_youtube_url(url: &str) -> bool {
    youtube_url_regex().is_match(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_standard_watch_urls() {
        for url in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "http://youtube.com/watch?v=abc123",
            "https://youtu.be/dQw4w9WgXcQ",
            "www.youtube.com/watch?v=abc123",
            "youtube.com/shorts/xyz",
            "youtu.be/x",
        ] {
            assert!(is_youtube_url(url), "expected match: {url}");
        }
    }

    #[test]
    fn accepts_odd_but_matching_paths() {
        for url in [
            "https://youtube.com//",
            "youtube.com/watch?v=",
            "https://www.youtu.be/!!%%##",
        ] {
            assert!(is_youtube_url(url), "expected match: {url}");
        }
    }

    #[test]
    fn rejects_non_youtube_strings() {
        for url in [
            "",
            "not a url",
            "https://vimeo.com/12345",
            "https://youtube.org/watch?v=abc",
            "https://www.youtube.com",
            "youtu.be",
            "ftp://youtube.com/abc",
        ] {
            assert!(!is_youtube_url(url), "expected no match: {url}");
        }
    }
}
