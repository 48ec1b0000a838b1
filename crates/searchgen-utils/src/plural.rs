use std::collections::BTreeMap;

///
/// DEFAULT_IRREGULARS
/// singular -> plural, matched case-insensitively on the trailing word
///

const DEFAULT_IRREGULARS: &[(&str, &str)] = &[
    ("child", "children"),
    ("foot", "feet"),
    ("goose", "geese"),
    ("man", "men"),
    ("mouse", "mice"),
    ("ox", "oxen"),
    ("person", "people"),
    ("tooth", "teeth"),
    ("woman", "women"),
];

const DEFAULT_UNCOUNTABLES: &[&str] = &[
    "deer",
    "equipment",
    "fish",
    "information",
    "news",
    "series",
    "sheep",
    "species",
];

///
/// Pluralizer
///
/// Pluralizes PascalCase type names for default query names. The trailing
/// word is the one that changes (`BlogPost` -> `BlogPosts`).
///
/// Configured overrides are checked first in both modes, against the whole
/// name and then the trailing word. The built-in irregulars and the English
/// suffix rules only apply with `improve` on; otherwise the name gains an `s`.
///

#[derive(Clone, Debug)]
pub struct Pluralizer {
    improve: bool,
    defaults: BTreeMap<String, String>,
    overrides: BTreeMap<String, String>,
}

impl Pluralizer {
    #[must_use]
    pub fn new(improve: bool) -> Self {
        let mut defaults = BTreeMap::new();
        for (singular, plural) in DEFAULT_IRREGULARS {
            defaults.insert((*singular).to_string(), (*plural).to_string());
        }
        for word in DEFAULT_UNCOUNTABLES {
            defaults.insert((*word).to_string(), (*word).to_string());
        }

        Self {
            improve,
            defaults,
            overrides: BTreeMap::new(),
        }
    }

    /// Add or replace an override; later entries win. The singular is
    /// matched case-insensitively, the plural is kept as written.
    #[must_use]
    pub fn with_override(mut self, singular: &str, plural: &str) -> Self {
        self.overrides
            .insert(singular.to_ascii_lowercase(), plural.to_string());
        self
    }

    /// Extend the override table from configuration.
    #[must_use]
    pub fn with_overrides<'a, I>(self, entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        entries
            .into_iter()
            .fold(self, |acc, (singular, plural)| acc.with_override(singular, plural))
    }

    #[must_use]
    pub const fn improve(&self) -> bool {
        self.improve
    }

    #[must_use]
    pub fn plural(&self, name: &str) -> String {
        if name.trim().is_empty() {
            return String::new();
        }
        if let Some(plural) = self.overrides.get(&name.to_ascii_lowercase()) {
            return match_case(name, plural);
        }

        let (head, tail) = split_trailing_word(name);
        let lower = tail.to_ascii_lowercase();

        let plural_tail = if let Some(plural) = self.overrides.get(&lower) {
            match_case(tail, plural)
        } else if !self.improve {
            format!("{tail}s")
        } else if let Some(plural) = self.defaults.get(&lower) {
            match_case(tail, plural)
        } else {
            apply_rules(tail)
        };

        format!("{head}{plural_tail}")
    }
}

impl Default for Pluralizer {
    fn default() -> Self {
        Self::new(true)
    }
}

// split_trailing_word
// splits at the last uppercase letter that follows a lowercase letter or digit
fn split_trailing_word(name: &str) -> (&str, &str) {
    let bytes = name.as_bytes();
    let mut split = 0;

    for i in 1..bytes.len() {
        let prev = bytes[i - 1];
        if bytes[i].is_ascii_uppercase() && (prev.is_ascii_lowercase() || prev.is_ascii_digit()) {
            split = i;
        }
    }

    name.split_at(split)
}

fn apply_rules(word: &str) -> String {
    let lower = word.to_ascii_lowercase();

    if ["s", "x", "z", "ch", "sh"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
    {
        return format!("{word}es");
    }

    let mut rev = lower.chars().rev();
    if let (Some('y'), Some(prev)) = (rev.next(), rev.next()) {
        if !is_vowel(prev) {
            return format!("{}ies", &word[..word.len() - 1]);
        }
    }

    format!("{word}s")
}

const fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

// match_case
// carries the capitalisation of the original word onto the replacement
fn match_case(original: &str, replacement: &str) -> String {
    if original.len() > 1 && original.chars().all(|c| c.is_ascii_uppercase()) {
        return replacement.to_ascii_uppercase();
    }
    if original.starts_with(|c: char| c.is_ascii_uppercase()) {
        return crate::case::upper_first(replacement);
    }

    crate::case::lower_first(replacement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn regular_nouns_gain_s() {
        let p = Pluralizer::new(true);
        assert_eq!(p.plural("Post"), "Posts");
        assert_eq!(p.plural("Todo"), "Todos");
        assert_eq!(p.plural("Employee"), "Employees");
        assert_eq!(p.plural("Day"), "Days");
    }

    #[test]
    fn sibilant_endings_gain_es() {
        let p = Pluralizer::new(true);
        assert_eq!(p.plural("Address"), "Addresses");
        assert_eq!(p.plural("Box"), "Boxes");
        assert_eq!(p.plural("Quiz"), "Quizes");
        assert_eq!(p.plural("Match"), "Matches");
        assert_eq!(p.plural("Wish"), "Wishes");
    }

    #[test]
    fn consonant_y_becomes_ies() {
        let p = Pluralizer::new(true);
        assert_eq!(p.plural("Category"), "Categories");
        assert_eq!(p.plural("BlogEntry"), "BlogEntries");
    }

    #[test]
    fn irregulars_apply_to_trailing_word() {
        let p = Pluralizer::new(true);
        assert_eq!(p.plural("Person"), "People");
        assert_eq!(p.plural("TeamPerson"), "TeamPeople");
        assert_eq!(p.plural("Sheep"), "Sheep");
    }

    #[test]
    fn overrides_replace_defaults() {
        let p = Pluralizer::new(true).with_override("Person", "Persons");
        assert_eq!(p.plural("Person"), "Persons");

        let p = Pluralizer::new(true).with_override("cactus", "cacti");
        assert_eq!(p.plural("Cactus"), "Cacti");
    }

    #[test]
    fn legacy_mode_appends_s() {
        let p = Pluralizer::new(false);
        assert_eq!(p.plural("Category"), "Categorys");
        assert_eq!(p.plural("Person"), "Persons");
        assert_eq!(p.plural("Post"), "Posts");
    }

    #[test]
    fn overrides_apply_in_legacy_mode() {
        let p = Pluralizer::new(false).with_override("Person", "People");
        assert_eq!(p.plural("Person"), "People");
        assert_eq!(p.plural("TeamPerson"), "TeamPeople");
        assert_eq!(p.plural("Child"), "Childs");
    }

    #[test]
    fn compound_overrides_match_the_whole_name() {
        let p = Pluralizer::new(true).with_override("BlogPost", "BlogPostings");
        assert_eq!(p.plural("BlogPost"), "BlogPostings");
        assert_eq!(p.plural("Post"), "Posts");

        let p = Pluralizer::new(false).with_override("blogPost", "blogPostings");
        assert_eq!(p.plural("BlogPost"), "BlogPostings");
    }

    #[test]
    fn blank_names_stay_blank() {
        assert_eq!(Pluralizer::default().plural(" "), "");
    }

    proptest! {
        #[test]
        fn plural_keeps_the_leading_words(head in "[A-Z][a-z]{1,8}", tail in "[A-Z][a-z]{1,8}") {
            let p = Pluralizer::default();
            let plural = p.plural(&format!("{head}{tail}"));

            prop_assert!(plural.starts_with(&head));
            prop_assert_eq!(plural, format!("{head}{}", p.plural(&tail)));
        }

        #[test]
        fn legacy_mode_is_suffix_only(name in "[A-Z][A-Za-z0-9]{0,12}") {
            prop_assert_eq!(Pluralizer::new(false).plural(&name), format!("{name}s"));
        }
    }
}
