//! Closed-class word lists built into the resolver.
//!
//! Pronouns, determiners, copulas and the other function words the extractor
//! and the sieves test against. Open-class lists (first names, animate nouns,
//! demonyms) are loaded at runtime, see [`crate::resources`].

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::mention::{Animacy, Gender, Number, Person};

/// Lexical attributes of a pronoun.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PronounInfo {
    /// Grammatical person.
    pub person: Person,
    /// Grammatical number.
    pub number: Number,
    /// Gender.
    pub gender: Gender,
    /// Animacy.
    pub animacy: Animacy,
    /// himself, themselves, ...
    pub reflexive: bool,
    /// my, his, whose, ...
    pub possessive: bool,
    /// who, which, that, ...
    pub relative: bool,
}

const fn pron(
    person: Person,
    number: Number,
    gender: Gender,
    animacy: Animacy,
) -> PronounInfo {
    PronounInfo {
        person,
        number,
        gender,
        animacy,
        reflexive: false,
        possessive: false,
        relative: false,
    }
}

const fn refl(mut p: PronounInfo) -> PronounInfo {
    p.reflexive = true;
    p
}

const fn poss(mut p: PronounInfo) -> PronounInfo {
    p.possessive = true;
    p
}

const fn rel(mut p: PronounInfo) -> PronounInfo {
    p.relative = true;
    p
}

static PRONOUNS: Lazy<HashMap<&'static str, PronounInfo>> = Lazy::new(|| {
    use Animacy as A;
    use Gender as G;
    use Number as N;
    use Person as P;

    let i = pron(P::First, N::Singular, G::Unknown, A::Animate);
    let we = pron(P::First, N::Plural, G::Unknown, A::Animate);
    let you = pron(P::Second, N::Unknown, G::Unknown, A::Animate);
    let he = pron(P::Third, N::Singular, G::Male, A::Animate);
    let she = pron(P::Third, N::Singular, G::Female, A::Animate);
    let it = pron(P::Third, N::Singular, G::Neutral, A::Inanimate);
    let they = pron(P::Third, N::Plural, G::Unknown, A::Unknown);
    let who = pron(P::Third, N::Unknown, G::Unknown, A::Animate);
    let which = pron(P::Third, N::Unknown, G::Neutral, A::Inanimate);
    let that = pron(P::Third, N::Unknown, G::Unknown, A::Unknown);

    HashMap::from([
        ("i", i),
        ("me", i),
        ("my", poss(i)),
        ("mine", poss(i)),
        ("myself", refl(i)),
        ("we", we),
        ("us", we),
        ("our", poss(we)),
        ("ours", poss(we)),
        ("ourselves", refl(we)),
        ("you", you),
        ("your", poss(you)),
        ("yours", poss(you)),
        (
            "yourself",
            refl(pron(P::Second, N::Singular, G::Unknown, A::Animate)),
        ),
        (
            "yourselves",
            refl(pron(P::Second, N::Plural, G::Unknown, A::Animate)),
        ),
        ("he", he),
        ("him", he),
        ("his", poss(he)),
        ("himself", refl(he)),
        ("she", she),
        ("her", she),
        ("hers", poss(she)),
        ("herself", refl(she)),
        ("it", it),
        ("its", poss(it)),
        ("itself", refl(it)),
        ("they", they),
        ("them", they),
        ("their", poss(they)),
        ("theirs", poss(they)),
        ("themselves", refl(they)),
        ("who", rel(who)),
        ("whom", rel(who)),
        ("whose", rel(poss(who))),
        ("which", rel(which)),
        ("that", rel(that)),
    ])
});

/// Attributes of a pronoun, by lower-cased form.
#[must_use]
pub fn pronoun(word: &str) -> Option<&'static PronounInfo> {
    PRONOUNS.get(word.to_lowercase().as_str())
}

/// True for personal/possessive/reflexive pronouns (not relatives).
#[must_use]
pub fn is_personal_pronoun(word: &str) -> bool {
    pronoun(word).map_or(false, |p| !p.relative)
}

/// True for relative pronouns.
#[must_use]
pub fn is_relative_pronoun(word: &str) -> bool {
    pronoun(word).map_or(false, |p| p.relative)
}

macro_rules! word_set {
    ($name:ident, [$($w:expr),* $(,)?]) => {
        static $name: Lazy<HashSet<&'static str>> = Lazy::new(|| HashSet::from([$($w),*]));
    };
}

word_set!(DETERMINERS, [
    "a", "an", "the", "this", "that", "these", "those", "some", "any", "each", "every",
    "no", "another",
]);

word_set!(INDEFINITES, [
    "a", "an", "some", "any", "another", "several", "many", "few", "no", "one",
    "such", "other",
]);

word_set!(PLURAL_DETERMINERS, [
    "these", "those", "many", "several", "few", "both", "all", "various",
]);

word_set!(SINGULAR_DETERMINERS, ["a", "an", "this", "that", "each", "every", "another"]);

word_set!(COPULAS, [
    "is", "are", "was", "were", "'s", "be", "been", "being", "am", "'re", "'m",
]);

word_set!(RAISING_VERBS, [
    "seem", "seems", "seemed", "appear", "appears", "appeared", "happen", "happens",
    "happened", "turns", "turned",
]);

word_set!(WEATHER_WORDS, ["raining", "snowing", "rains", "snows", "rained", "snowed"]);

word_set!(LOCATION_MODIFIERS, [
    "east", "west", "north", "south", "eastern", "western", "northern", "southern",
    "northeast", "northwest", "southeast", "southwest", "upper", "lower", "central",
]);

word_set!(STOP_WORDS, [
    "a", "an", "the", "of", "at", "on", "upon", "in", "to", "from", "out", "as", "so",
    "such", "or", "and", "those", "this", "these", "that", "for", ",", "is", "was", "am",
    "are", "'s", "been", "were", "'",
]);

/// Leading article or demonstrative stripped before string comparison.
#[must_use]
pub fn is_determiner(word: &str) -> bool {
    DETERMINERS.contains(word.to_lowercase().as_str())
}

/// Marks an indefinite mention when it opens the span.
#[must_use]
pub fn is_indefinite(word: &str) -> bool {
    INDEFINITES.contains(word.to_lowercase().as_str())
}

/// Number signalled by a leading determiner, if any.
#[must_use]
pub fn determiner_number(word: &str) -> Number {
    let w = word.to_lowercase();
    if PLURAL_DETERMINERS.contains(w.as_str()) {
        Number::Plural
    } else if SINGULAR_DETERMINERS.contains(w.as_str()) {
        Number::Singular
    } else {
        Number::Unknown
    }
}

/// Forms of "to be".
#[must_use]
pub fn is_copula(word: &str) -> bool {
    COPULAS.contains(word.to_lowercase().as_str())
}

/// seem/appear/happen: take a pleonastic subject.
#[must_use]
pub fn is_raising_verb(word: &str) -> bool {
    RAISING_VERBS.contains(word.to_lowercase().as_str())
}

/// "it is raining" style predicates.
#[must_use]
pub fn is_weather_word(word: &str) -> bool {
    WEATHER_WORDS.contains(word.to_lowercase().as_str())
}

/// Compass/position modifiers that distinguish otherwise equal place names.
#[must_use]
pub fn is_location_modifier(word: &str) -> bool {
    LOCATION_MODIFIERS.contains(word.to_lowercase().as_str())
}

/// Function words ignored by word-inclusion checks.
#[must_use]
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word.to_lowercase().as_str())
}

static ACRONYM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[A-Z]\.?){2,}$").expect("valid acronym pattern")
});

/// All-caps token such as `IBM` or `U.S.`.
#[must_use]
pub fn is_acronym_token(word: &str) -> bool {
    ACRONYM.is_match(word)
}

/// Letters of an acronym token, dots removed.
#[must_use]
pub fn acronym_letters(word: &str) -> String {
    word.chars().filter(char::is_ascii_uppercase).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pronoun_attributes() {
        let he = pronoun("He").unwrap();
        assert_eq!(he.gender, Gender::Male);
        assert_eq!(he.person, Person::Third);
        assert!(!he.reflexive);

        let herself = pronoun("herself").unwrap();
        assert!(herself.reflexive);
        assert_eq!(herself.gender, Gender::Female);

        let your = pronoun("Your").unwrap();
        assert_eq!(your.person, Person::Second);
        assert!(your.possessive);

        assert!(pronoun("mom").is_none());
    }

    #[test]
    fn test_relative_vs_personal() {
        assert!(is_relative_pronoun("who"));
        assert!(is_relative_pronoun("Which"));
        assert!(!is_personal_pronoun("who"));
        assert!(is_personal_pronoun("they"));
        assert_eq!(pronoun("they").unwrap().number, Number::Plural);
    }

    #[test]
    fn test_function_words() {
        assert!(is_determiner("The"));
        assert!(is_copula("'s"));
        assert!(is_indefinite("an"));
        assert!(!is_indefinite("the"));
        assert_eq!(determiner_number("those"), Number::Plural);
        assert_eq!(determiner_number("a"), Number::Singular);
        assert_eq!(determiner_number("the"), Number::Unknown);
        assert!(is_location_modifier("Northern"));
    }

    #[test]
    fn test_acronyms() {
        assert!(is_acronym_token("IBM"));
        assert!(is_acronym_token("U.S."));
        assert!(!is_acronym_token("I"));
        assert!(!is_acronym_token("Ibm"));
        assert_eq!(acronym_letters("U.S."), "US");
    }
}
