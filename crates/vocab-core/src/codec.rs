//! Plain-text word list import and export.
//!
//! One entry per line, `"{foreign} - {translation}"`. Blank lines and lines
//! starting with `#` are ignored. Everything after the first separator is
//! the translation, so translations may themselves contain `" - "`. A foreign
//! word containing the separator does not survive a round trip.

use chrono::NaiveDate;

use crate::model::Word;

/// Separator between the foreign word and its translation.
pub const SEPARATOR: &str = " - ";

/// A word pair read from an import file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedWord {
    pub foreign: String,
    pub translation: String,
    /// 1-based line the pair was read from.
    pub line_number: usize,
}

/// Parse a word list. Lines that don't hold a valid pair are skipped.
pub fn parse(content: &str) -> Vec<ParsedWord> {
    content
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                return None;
            }

            let (foreign, translation) = trimmed.split_once(SEPARATOR)?;
            let foreign = foreign.trim();
            let translation = translation.trim();
            if foreign.is_empty() || translation.is_empty() {
                tracing::debug!("skipping line {}: empty side", index + 1);
                return None;
            }

            Some(ParsedWord {
                foreign: foreign.to_string(),
                translation: translation.to_string(),
                line_number: index + 1,
            })
        })
        .collect()
}

/// Serialize words into the import format, one per line.
pub fn serialize<'a, I>(words: I) -> String
where
    I: IntoIterator<Item = &'a Word>,
{
    words
        .into_iter()
        .map(|w| format!("{}{SEPARATOR}{}", w.foreign, w.translation))
        .collect::<Vec<_>>()
        .join("\n")
}

/// File name for an export made on `date`, e.g. `words_export_2026-01-20.txt`.
pub fn export_filename(date: NaiveDate) -> String {
    format!("words_export_{}.txt", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORD_LIST: &str = "\
# Spanish basics
perro - dog
gato - cat

   casa   -   house
no separator here
hasta luego - see you - later
 - missing foreign
";

    fn word(foreign: &str, translation: &str) -> Word {
        Word {
            id: foreign.into(),
            foreign: foreign.into(),
            translation: translation.into(),
            category: String::new(),
            created_at: chrono::Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn parse_skips_comments_blanks_and_invalid_lines() {
        let parsed = parse(WORD_LIST);
        let pairs: Vec<(&str, &str)> = parsed
            .iter()
            .map(|p| (p.foreign.as_str(), p.translation.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("perro", "dog"),
                ("gato", "cat"),
                ("casa", "house"),
                ("hasta luego", "see you - later"),
            ]
        );
    }

    #[test]
    fn parse_records_line_numbers() {
        let parsed = parse(WORD_LIST);
        assert_eq!(parsed[0].line_number, 2);
        assert_eq!(parsed[2].line_number, 5);
    }

    #[test]
    fn parse_handles_crlf() {
        let parsed = parse("uno - one\r\ndos - two\r\n");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].translation, "two");
    }

    #[test]
    fn parse_empty_and_comment_only() {
        assert!(parse("").is_empty());
        assert!(parse("# nothing\n\n   \n").is_empty());
    }

    #[test]
    fn plain_hyphen_is_not_a_separator() {
        assert!(parse("well-known-word").is_empty());
        let parsed = parse("e-mail - correo");
        assert_eq!(parsed[0].foreign, "e-mail");
    }

    #[test]
    fn serialize_then_parse_preserves_pairs() {
        let words = vec![
            word("perro", "dog"),
            word("buenos días", "good morning - formal"),
            word("gracias", "thanks"),
        ];
        let text = serialize(&words);
        assert_eq!(
            text,
            "perro - dog\nbuenos días - good morning - formal\ngracias - thanks"
        );

        let parsed = parse(&text);
        let expected: Vec<(String, String)> = words
            .iter()
            .map(|w| (w.foreign.clone(), w.translation.clone()))
            .collect();
        let actual: Vec<(String, String)> = parsed
            .into_iter()
            .map(|p| (p.foreign, p.translation))
            .collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn serialize_empty() {
        assert_eq!(serialize(&Vec::<Word>::new()), "");
    }

    #[test]
    fn export_filename_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 20).unwrap();
        assert_eq!(export_filename(date), "words_export_2026-01-20.txt");
    }
}
