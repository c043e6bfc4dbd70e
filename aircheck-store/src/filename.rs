//! Filename derivation: one stable stem per article.

use chrono::NaiveDate;

/// Longest slug we keep; headlines can run far past any sane filename.
const MAX_SLUG_LEN: usize = 80;

/// Build the output file stem from publication date and headline:
/// `YYYY-MM-DD_<slug>`. The slug keeps ASCII alphanumerics, maps whitespace
/// and separators to underscores, and drops everything else.
pub fn sanitize_filename(date: NaiveDate, headline: &str) -> String {
    let mut slug = String::with_capacity(headline.len());
    let mut last_was_sep = true; // suppress a leading underscore
    for ch in headline.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch);
            last_was_sep = false;
        } else if (ch.is_whitespace() || matches!(ch, '-' | '_' | '/' | ':')) && !last_was_sep {
            slug.push('_');
            last_was_sep = true;
        }
        if slug.len() >= MAX_SLUG_LEN {
            break;
        }
    }
    while slug.ends_with('_') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("untitled");
    }
    format!("{}_{}", date.format("%Y-%m-%d"), slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[test]
    fn basic_headline() {
        assert_eq!(
            sanitize_filename(date(), "Doyle: the budget fight"),
            "2024-05-01_Doyle_the_budget_fight"
        );
    }

    #[test]
    fn punctuation_is_dropped_and_runs_collapse() {
        assert_eq!(
            sanitize_filename(date(), "  'Exclusive!'  —  Gov.   Reilly speaks  "),
            "2024-05-01_Exclusive_Gov_Reilly_speaks"
        );
    }

    #[test]
    fn long_headlines_are_truncated() {
        let headline = "word ".repeat(50);
        let stem = sanitize_filename(date(), &headline);
        assert!(stem.len() <= "2024-05-01_".len() + super::MAX_SLUG_LEN);
        assert!(!stem.ends_with('_'));
    }

    #[test]
    fn empty_headline_gets_placeholder() {
        assert_eq!(sanitize_filename(date(), "!!!"), "2024-05-01_untitled");
    }
}
