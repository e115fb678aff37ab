/// Fallback colour for languages without a mapping
pub const NEUTRAL_COLOR: &str = "#8884d8";

const LANGUAGE_COLORS: &[(&str, &str)] = &[
    ("JavaScript", "#f1e05a"),
    ("TypeScript", "#2b7489"),
    ("Python", "#3572A5"),
    ("Java", "#b07219"),
    ("C++", "#f34b7d"),
    ("C", "#555555"),
    ("C#", "#239120"),
    ("PHP", "#4F5D95"),
    ("Ruby", "#701516"),
    ("Go", "#00ADD8"),
    ("Rust", "#dea584"),
    ("Swift", "#ffac45"),
    ("Kotlin", "#F18E33"),
    ("Scala", "#c22d40"),
    ("HTML", "#e34c26"),
    ("CSS", "#1572B6"),
    ("Shell", "#89e051"),
    ("Dockerfile", "#384d54"),
];

/// Display colour for a language name (exact, case-sensitive match)
pub fn language_color(language: &str) -> &'static str {
    LANGUAGE_COLORS
        .iter()
        .find(|(name, _)| *name == language)
        .map(|(_, color)| *color)
        .unwrap_or(NEUTRAL_COLOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_unknown_colors() {
        assert_eq!(language_color("Rust"), "#dea584");
        assert_eq!(language_color("C"), "#555555");
        assert_eq!(language_color("Zig"), NEUTRAL_COLOR);
        assert_eq!(language_color("rust"), NEUTRAL_COLOR);
    }
}
