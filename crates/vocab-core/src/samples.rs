//! Built-in sample vocabulary loaded into an empty store on first start.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::model::Word;

const SAMPLES: &[(&str, &str, &str)] = &[
    ("hola", "hello", "greetings"),
    ("adiós", "goodbye", "greetings"),
    ("buenos días", "good morning", "greetings"),
    ("gracias", "thank you", "polite"),
    ("por favor", "please", "polite"),
    ("perdón", "sorry", "polite"),
    ("agua", "water", "food"),
    ("pan", "bread", "food"),
    ("manzana", "apple", "food"),
    ("perro", "dog", "animals"),
    ("gato", "cat", "animals"),
    ("pájaro", "bird", "animals"),
    ("casa", "house", "places"),
    ("escuela", "school", "places"),
    ("libro", "book", "objects"),
];

/// The sample words, freshly stamped with new ids.
pub fn sample_words() -> Vec<Word> {
    let base: DateTime<Utc> = Utc::now();
    SAMPLES
        .iter()
        .enumerate()
        .map(|(i, &(foreign, translation, category))| Word {
            id: Uuid::new_v4().to_string(),
            foreign: foreign.to_string(),
            translation: translation.to_string(),
            category: category.to_string(),
            created_at: base + Duration::seconds(i as i64),
            updated_at: None,
        })
        .collect()
}
