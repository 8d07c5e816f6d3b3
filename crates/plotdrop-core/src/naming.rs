//! Object names for published documents.
//!
//! Names look like `amber-falcon-meadow-04217.html`: three words drawn uniformly
//! with replacement, a five-digit zero-padded suffix, and the document extension.

use chrono::Utc;

/// Extension appended to every object name.
pub const DOCUMENT_EXTENSION: &str = "html";

/// Words used for object names.
pub const WORDS: &[&str] = &[
    "amber", "birch", "cedar", "delta", "ember", "falcon", "glacier", "harbor",
    "indigo", "juniper", "kestrel", "lagoon", "meadow", "nimbus", "orchid", "pebble",
    "quartz", "raven", "summit", "tundra", "umber", "valley", "willow", "zephyr",
    "copper", "silver", "cobalt", "scarlet", "olive", "saffron", "teal", "violet",
    "brisk", "calm", "eager", "gentle", "hollow", "lucky", "mellow", "nimble",
    "quiet", "rapid", "steady", "tidy", "vivid", "wild", "young", "zesty",
];

/// Generate a fresh object name.
///
/// Uniqueness is probabilistic only: there are `WORDS.len()^3 * 100_000` possible
/// names, no existence check is made before upload, and a collision silently
/// overwrites the earlier object.
pub fn generate_object_name() -> String {
    let mut rng = fastrand::Rng::new();
    generate_object_name_with(&mut rng, WORDS)
}

/// Generate an object name from an explicit generator and word list.
///
/// An empty word list falls back to the current nanosecond timestamp for the
/// words segment.
pub fn generate_object_name_with(rng: &mut fastrand::Rng, words: &[&str]) -> String {
    let words_part = if words.is_empty() {
        Utc::now()
            .timestamp_nanos_opt()
            .unwrap_or_default()
            .to_string()
    } else {
        let mut pick = || words[rng.usize(..words.len())];
        format!("{}-{}-{}", pick(), pick(), pick())
    };

    let digits = rng.u32(..100_000);
    format!("{words_part}-{digits:05}.{DOCUMENT_EXTENSION}")
}
