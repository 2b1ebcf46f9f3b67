use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalMethod {
    Horde,
    SingleLures,
    Fishing,
    Egg,
    AlphaEgg,
    Fossil,
    Safari,
    Honey,
    Unknown,
}

impl CanonicalMethod {
    pub const ALL: [CanonicalMethod; 9] = [
        Self::Horde,
        Self::SingleLures,
        Self::Fishing,
        Self::Egg,
        Self::AlphaEgg,
        Self::Fossil,
        Self::Safari,
        Self::Honey,
        Self::Unknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Horde => "horde",
            Self::SingleLures => "single_lures",
            Self::Fishing => "fishing",
            Self::Egg => "egg",
            Self::AlphaEgg => "alpha_egg",
            Self::Fossil => "fossil",
            Self::Safari => "safari",
            Self::Honey => "honey",
            Self::Unknown => "unknown",
        }
    }

    pub fn is_known(self) -> bool {
        self != Self::Unknown
    }

    /// Egg methods are obtained without visiting a location.
    pub fn carries_location(self) -> bool {
        !matches!(self, Self::Egg | Self::AlphaEgg | Self::Unknown)
    }
}

impl fmt::Display for CanonicalMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CanonicalMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == key)
            .ok_or_else(|| format!("unknown canonical method {s}"))
    }
}

const SUPPORTED_LABELS: [(&str, CanonicalMethod); 12] = [
    ("Single/Lures", CanonicalMethod::SingleLures),
    ("5x Horde", CanonicalMethod::Horde),
    ("3x Horde", CanonicalMethod::Horde),
    ("Fishing", CanonicalMethod::Fishing),
    ("Old Rod", CanonicalMethod::Fishing),
    ("Good Rod", CanonicalMethod::Fishing),
    ("Super Rod", CanonicalMethod::Fishing),
    ("Safari Zone", CanonicalMethod::Safari),
    ("Fossil", CanonicalMethod::Fossil),
    ("Honey Tree", CanonicalMethod::Honey),
    ("Egg Hunt", CanonicalMethod::Egg),
    ("Alpha Egg", CanonicalMethod::AlphaEgg),
];

// Keys are already trimmed and lowercased.
const LABEL_ALIASES: [(&str, CanonicalMethod); 12] = [
    ("horde", CanonicalMethod::Horde),
    ("single", CanonicalMethod::SingleLures),
    ("lures", CanonicalMethod::SingleLures),
    ("lure", CanonicalMethod::SingleLures),
    ("grass", CanonicalMethod::SingleLures),
    ("cave", CanonicalMethod::SingleLures),
    ("safari", CanonicalMethod::Safari),
    ("fossil revival", CanonicalMethod::Fossil),
    ("honey", CanonicalMethod::Honey),
    ("egg", CanonicalMethod::Egg),
    ("breeding", CanonicalMethod::Egg),
    ("alpha egg hunt", CanonicalMethod::AlphaEgg),
];

/// Display labels covering the whole taxonomy, in presentation order.
pub fn supported_labels() -> Vec<String> {
    SUPPORTED_LABELS
        .iter()
        .map(|(label, _)| label.to_string())
        .collect()
}

/// Maps a free-form display label onto its canonical method.
///
/// Matching is exact after trimming and lowercasing; anything else is
/// [`CanonicalMethod::Unknown`].
pub fn canonicalize(label: &str) -> CanonicalMethod {
    let key = label.trim().to_lowercase();
    if key.is_empty() {
        return CanonicalMethod::Unknown;
    }
    SUPPORTED_LABELS
        .iter()
        .find(|(l, _)| l.to_lowercase() == key)
        .or_else(|| LABEL_ALIASES.iter().find(|(l, _)| *l == key))
        .map(|(_, method)| *method)
        .unwrap_or(CanonicalMethod::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_and_whitespace_do_not_change_result() {
        assert_eq!(canonicalize("5x Horde"), CanonicalMethod::Horde);
        assert_eq!(canonicalize("  5X HORDE  "), CanonicalMethod::Horde);
        for label in supported_labels() {
            let expected = canonicalize(&label);
            assert_eq!(canonicalize(&label.to_uppercase()), expected);
            assert_eq!(canonicalize(&format!("\t{label} ")), expected);
            assert_eq!(canonicalize(&label.trim().to_lowercase()), expected);
        }
    }

    #[test]
    fn several_labels_share_a_category() {
        assert_eq!(canonicalize("3x Horde"), CanonicalMethod::Horde);
        assert_eq!(canonicalize("Old Rod"), CanonicalMethod::Fishing);
        assert_eq!(canonicalize("Super Rod"), CanonicalMethod::Fishing);
        assert_eq!(canonicalize("lures"), CanonicalMethod::SingleLures);
    }

    #[test]
    fn unmatched_labels_are_unknown() {
        assert_eq!(canonicalize(""), CanonicalMethod::Unknown);
        assert_eq!(canonicalize("   "), CanonicalMethod::Unknown);
        assert_eq!(canonicalize("Rock Smash"), CanonicalMethod::Unknown);
        assert_eq!(canonicalize("5x Hordes"), CanonicalMethod::Unknown);
    }

    #[test]
    fn every_supported_label_is_classified() {
        for label in supported_labels() {
            assert!(canonicalize(&label).is_known(), "{label} should classify");
        }
    }

    #[test]
    fn canonical_names_round_trip_through_from_str() {
        for method in CanonicalMethod::ALL {
            assert_eq!(method.as_str().parse::<CanonicalMethod>(), Ok(method));
        }
        assert!("rock_smash".parse::<CanonicalMethod>().is_err());
    }

    #[test]
    fn egg_methods_carry_no_location() {
        assert!(!CanonicalMethod::Egg.carries_location());
        assert!(!CanonicalMethod::AlphaEgg.carries_location());
        assert!(!CanonicalMethod::Unknown.carries_location());
        assert!(CanonicalMethod::Horde.carries_location());
    }

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&CanonicalMethod::SingleLures).unwrap();
        assert_eq!(json, "\"single_lures\"");
    }
}
