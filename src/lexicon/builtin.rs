// Built-in seed phrases.
//
// `pyx seed` writes these to the phrase store so a fresh install has a
// working lexicon. Operators are expected to extend and override them with
// `pyx label` or a JSON import; the store is the source of truth afterwards.

use super::entry::LexiconEntry;

const UNSAFE: &[(&str, &str)] = &[
    // threats
    ("kill yourself", "threats"),
    ("kys", "threats"),
    ("i will kill you", "threats"),
    ("hope you die", "threats"),
    ("go die", "threats"),
    // insults
    ("idiot", "insults"),
    ("stupid", "insults"),
    ("loser", "insults"),
    ("moron", "insults"),
    ("dumb", "insults"),
    ("trash", "insults"),
    ("shut up", "insults"),
    ("nobody likes you", "insults"),
    ("ugly", "insults"),
    // profanity
    ("damn", "profanity"),
    ("crap", "profanity"),
    ("wtf", "profanity"),
    ("stfu", "profanity"),
    // violence
    ("die", "violence"),
    ("died", "violence"),
    ("dead", "violence"),
    ("kill", "violence"),
    ("killed", "violence"),
    ("death", "violence"),
];

const SAFE: &[&str] = &[
    "good game",
    "gg",
    "well played",
    "nice try",
    "kill time",
    "killing it",
    "dead tired",
    "dying of laughter",
    "thank you",
    "have fun",
];

/// The built-in phrase list, unsafe entries first.
pub fn phrases() -> Vec<LexiconEntry> {
    UNSAFE
        .iter()
        .map(|(text, category)| LexiconEntry::unsafe_phrase(*text, *category))
        .chain(SAFE.iter().map(|text| LexiconEntry::safe_phrase(*text)))
        .collect()
}
