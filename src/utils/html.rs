// src/utils/html.rs

/// Cleans user-supplied text with ammonia before it is stored in a feed.
///
/// Safe markup (<b>, <p>, links) survives; <script> elements are removed with
/// their content, and event-handler attributes are stripped. Feeds are
/// rendered by the frontend as HTML, so this runs on every write.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripts_are_removed_and_formatting_kept() {
        let cleaned = clean_html("<b>Hi</b><script>alert(1)</script><img src=x onerror=alert(1)>");

        assert!(cleaned.contains("<b>Hi</b>"));
        assert!(!cleaned.contains("script"));
        assert!(!cleaned.contains("onerror"));
    }

    #[test]
    fn plain_text_is_untouched() {
        assert_eq!(clean_html("Exam on Monday"), "Exam on Monday");
    }
}
