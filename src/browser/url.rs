const KNOWN_SCHEMES: [&str; 7] = [
    "http://",
    "https://",
    "file://",
    "data:",
    "about:",
    "chrome://",
    "chrome-extension://",
];

/// Turn a user-typed target into something the browser can open
pub fn normalize_url(url: &str) -> String {
    let trimmed = url.trim();

    if KNOWN_SCHEMES.iter().any(|scheme| trimmed.starts_with(scheme)) {
        return trimmed.to_string();
    }

    if trimmed.starts_with("localhost") || trimmed.starts_with("127.0.0.1") {
        return format!("http://{}", trimmed);
    }

    format!("https://{}", trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_complete_urls() {
        assert_eq!(normalize_url("https://example.com/path"), "https://example.com/path");
        assert_eq!(normalize_url("about:blank"), "about:blank");
        assert_eq!(normalize_url("data:text/html,<p>Hi</p>"), "data:text/html,<p>Hi</p>");
    }

    #[test]
    fn test_adds_scheme() {
        assert_eq!(normalize_url("  app.example.com/login "), "https://app.example.com/login");
        assert_eq!(normalize_url("localhost:3000"), "http://localhost:3000");
        assert_eq!(normalize_url("127.0.0.1:8080/x"), "http://127.0.0.1:8080/x");
    }
}
