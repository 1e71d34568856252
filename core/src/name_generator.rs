//! Fallback racer names for entrants that arrive without a usable one.
//!
//! All generation draws from the race RNG, so seeded races repair names
//! identically.

use crate::rng::RandomSource;

/// Deterministic name generator using curated word lists
pub struct NameGenerator;

impl NameGenerator {
    /// "Adjective Animal", e.g. "Turbo Badger"
    pub fn generate_racer_name(rng: &mut dyn RandomSource) -> String {
        let adjective = Self::pick(rng, Self::adjectives());
        let animal = Self::pick(rng, Self::animals());
        format!("{adjective} {animal}")
    }

    /// True when `name` is missing, blank, still holds template braces,
    /// or is a stringified null.
    pub fn needs_repair(name: Option<&str>) -> bool {
        let Some(name) = name else { return true };
        let trimmed = name.trim();
        trimmed.is_empty()
            || trimmed.contains('{')
            || trimmed.contains('}')
            || ["undefined", "null", "nan"]
                .iter()
                .any(|bad| trimmed.eq_ignore_ascii_case(bad))
    }

    fn pick(rng: &mut dyn RandomSource, words: &'static [&'static str]) -> &'static str {
        words.get(rng.index_below(words.len())).copied().unwrap_or("Mystery")
    }

    fn adjectives() -> &'static [&'static str] {
        &[
            "Turbo", "Wobbly", "Sneaky", "Mighty", "Dizzy", "Lucky", "Grumpy", "Sparkly",
            "Rusty", "Fuzzy", "Zippy", "Sleepy", "Brave", "Jolly", "Cosmic", "Feral",
            "Nimble", "Soggy", "Thunder", "Velvet", "Crispy", "Plucky", "Shadow", "Bouncy",
        ]
    }

    fn animals() -> &'static [&'static str] {
        &[
            "Badger", "Otter", "Ferret", "Llama", "Gecko", "Heron", "Wombat", "Moose",
            "Pangolin", "Yak", "Lynx", "Tortoise", "Hedgehog", "Okapi", "Marmot", "Newt",
            "Puffin", "Raccoon", "Armadillo", "Quokka", "Walrus", "Jackal", "Tapir", "Ibis",
        ]
    }
}
