// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Relevance filter for group messages.
//!
//! A pure predicate: a message qualifies if it mentions any academic keyword
//! or simply carries enough text. Length alone qualifies, so the filter only
//! cuts short noise such as emoji reactions and single-word acknowledgements.

/// Messages longer than this qualify regardless of keyword content.
const SUBSTANTIAL_LENGTH: usize = 20;

/// Fixed academic keyword set, matched case-insensitively as substrings.
const ACADEMIC_KEYWORDS: &[&str] = &[
    // Courses and subjects
    "calculo",
    "fisica",
    "quimica",
    "metalurgia",
    "fundicion",
    "tratamientos",
    "termicos",
    "corrosion",
    "materiales",
    "cristalografia",
    "aleaciones",
    // Academic process
    "examen",
    "tarea",
    "proyecto",
    "laboratorio",
    "practica",
    "syllabus",
    "nota",
    "calificacion",
    "profesor",
    "docente",
    "clase",
    "horario",
    // Paperwork
    "matricula",
    "certificado",
    "constancia",
    "tramite",
    "secretaria",
    "decanato",
    "rector",
    "titulo",
    "grado",
    "tesis",
    // Common questions
    "como",
    "donde",
    "cuando",
    "que",
    "quien",
    "ayuda",
    "duda",
    "pregunta",
    "consulta",
    "informacion",
];

/// Returns true if the message text is worth forwarding.
pub fn is_relevant(text: &str) -> bool {
    if text.chars().count() > SUBSTANTIAL_LENGTH {
        return true;
    }
    let lower = text.to_lowercase();
    ACADEMIC_KEYWORDS
        .iter()
        .any(|keyword| lower.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn keyword_match_is_case_insensitive() {
        assert!(is_relevant("EXAMEN mañana"));
        assert!(is_relevant("Duda rapida"));
        assert!(is_relevant("hay TESIS?"));
    }

    #[test]
    fn short_noise_is_rejected() {
        assert!(!is_relevant("ok"));
        assert!(!is_relevant("👏👏"));
        assert!(!is_relevant("jaja si"));
        assert!(!is_relevant(""));
    }

    #[test]
    fn length_alone_qualifies_without_keywords() {
        // 21 characters of pure filler, no keyword anywhere.
        let text = "zzz zzz zzz zzz zzz z";
        assert_eq!(text.chars().count(), 21);
        assert!(is_relevant(text));
    }

    #[test]
    fn at_most_twenty_chars_needs_a_keyword() {
        let with_keyword = "hay examen?";
        let without_keyword = "hola a todos!!";
        assert!(with_keyword.chars().count() <= 20);
        assert!(without_keyword.chars().count() <= 20);
        assert!(is_relevant(with_keyword));
        assert!(!is_relevant(without_keyword));
    }

    #[test]
    fn multibyte_text_counts_characters_not_bytes() {
        // 20 chars but >20 bytes: must still take the keyword path.
        let text = "ññññññññññññññññññññ";
        assert_eq!(text.chars().count(), 20);
        assert!(text.len() > 20);
        assert!(!is_relevant(text));
    }

    proptest! {
        /// Any text over 20 characters passes, regardless of content.
        #[test]
        fn any_long_text_is_relevant(text in "[a-z ]{21,200}") {
            prop_assert!(is_relevant(&text));
        }

        /// Short texts from a keyword-free alphabet never pass.
        #[test]
        fn short_keyword_free_text_is_irrelevant(text in "[xyz!?]{0,10}") {
            prop_assert!(!is_relevant(&text));
        }
    }
}
