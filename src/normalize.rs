use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

fn is_dash(c: char) -> bool {
    matches!(
        c,
        '\u{2010}'..='\u{2015}' | '\u{2212}' | '\u{FE58}' | '\u{FE63}' | '\u{FF0D}'
    )
}

/// Folds text for loose comparison: strips diacritics, unifies dashes to `-`,
/// collapses whitespace and lowercases.
pub fn fold_text(input: &str) -> String {
    let stripped: String = input
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| if is_dash(c) { '-' } else { c })
        .collect();
    stripped
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
        .to_lowercase()
}

pub fn same_folded(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => fold_text(a) == fold_text(b),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_diacritics() {
        assert_eq!(fold_text("Pokémon"), "pokemon");
        assert_eq!(fold_text("Flabébé"), "flabebe");
        assert_eq!(fold_text("Ève Ïle"), "eve ile");
    }

    #[test]
    fn unifies_dash_family() {
        assert_eq!(fold_text("Route 1 \u{2013} North"), "route 1 - north");
        assert_eq!(fold_text("Mt.\u{2014}Moon"), "mt.-moon");
        assert_eq!(fold_text("B\u{2212}2F"), "b-2f");
        assert_eq!(fold_text("B\u{FF0D}2F"), "b-2f");
    }

    #[test]
    fn collapses_whitespace_and_case() {
        assert_eq!(fold_text("  METEOR   Falls \t"), "meteor falls");
        assert_eq!(fold_text(""), "");
    }

    #[test]
    fn compatibility_forms_fold() {
        assert_eq!(fold_text("ＭＥＴＥＯＲ"), "meteor");
    }

    #[test]
    fn optional_comparison_is_null_aware() {
        assert!(same_folded(None, None));
        assert!(same_folded(Some("Lumiose – City"), Some("lumiose - city")));
        assert!(!same_folded(Some("Kanto"), None));
        assert!(!same_folded(Some("Kanto"), Some("Johto")));
    }
}
