//! Normalization of plural JSON:API type names to singular model names.

/// Converts a resource type name to the registry's model name.
pub trait Inflector {
    fn singular(&self, word: &str) -> String;
}

/// Irregular plurals, plural → singular.
const IRREGULAR: &[(&str, &str)] = &[
    ("people", "person"),
    ("men", "man"),
    ("women", "woman"),
    ("children", "child"),
    ("teeth", "tooth"),
    ("feet", "foot"),
    ("mice", "mouse"),
    ("geese", "goose"),
    ("oxen", "ox"),
    ("indices", "index"),
    ("matrices", "matrix"),
    ("vertices", "vertex"),
    ("analyses", "analysis"),
    ("statuses", "status"),
    ("aliases", "alias"),
    ("quizzes", "quiz"),
    ("gases", "gas"),
];

/// Plurals of nouns ending in `ie`, which the `ies` → `y` rule would mangle.
const IE_NOUNS: &[&str] = &[
    "movies",
    "cookies",
    "zombies",
    "calories",
    "rookies",
    "hoodies",
    "selfies",
    "brownies",
    "smoothies",
    "goalies",
    "sorties",
];

/// Words with identical singular and plural form.
const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "deer",
    "news",
    "data",
    "metadata",
];

/// English singularization rules covering common REST resource names.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishInflector;

impl Inflector for EnglishInflector {
    fn singular(&self, word: &str) -> String {
        let lower = word.to_ascii_lowercase();

        if UNCOUNTABLE.contains(&lower.as_str()) {
            return word.to_string();
        }
        if let Some((_, singular)) = IRREGULAR.iter().find(|(plural, _)| *plural == lower) {
            return (*singular).to_string();
        }

        if IE_NOUNS.contains(&lower.as_str()) {
            return word[..word.len() - 1].to_string();
        }
        if let Some(stem) = lower.strip_suffix("ies") {
            if stem.len() > 1 {
                return format!("{}y", &word[..stem.len()]);
            }
        }
        // buses, viruses; not houses or causes
        if let Some(stem) = lower.strip_suffix("uses") {
            if stem.ends_with(|c: char| !matches!(c, 'a' | 'o' | 'u')) {
                return word[..word.len() - 2].to_string();
            }
        }
        for suffix in ["ches", "shes", "sses", "xes", "zzes"] {
            if lower.ends_with(suffix) {
                return word[..word.len() - 2].to_string();
            }
        }
        if lower.ends_with('s')
            && !lower.ends_with("ss")
            && !lower.ends_with("us")
            && !lower.ends_with("is")
        {
            return word[..word.len() - 1].to_string();
        }

        word.to_string()
    }
}
