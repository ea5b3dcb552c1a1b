//! Format policy for conversational replies: flowing prose only.

use regex::Regex;
use std::sync::OnceLock;

const FORBIDDEN_HEADERS: &[&str] = &[
    "contexto rápido",
    "contexto rapido",
    "pontos principais",
    "decisões",
    "decisoes",
    "próximos passos",
    "proximos passos",
];

fn list_marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    // "1)", "1.", "- ", "* ", "• " at the very start of the reply; "3.5" is a number
    MARKER.get_or_init(|| {
        Regex::new(r"^(?:\d+\)|\d+\.(?:\D|$)|[-*•]\s)").expect("valid list marker regex")
    })
}

/// True when a conversational reply looks like minutes or a list.
pub fn violates_format_policy(text: &str) -> bool {
    let lowered = text.to_lowercase();
    FORBIDDEN_HEADERS.iter().any(|h| lowered.contains(h)) || list_marker().is_match(text.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prose_passes() {
        assert!(!violates_format_policy(
            "Eu testaria isso com um cliente piloto antes. Dá pra medir em uma semana."
        ));
        assert!(!violates_format_policy("Em 2025 a gente dobra a meta."));
    }

    #[test]
    fn test_numbered_markers_violate() {
        assert!(violates_format_policy("1) Validar o fluxo\n2) Ajustar"));
        assert!(violates_format_policy("  1. Validar o fluxo"));
        assert!(violates_format_policy("12) muitos itens"));
        assert!(violates_format_policy("1)Validar o fluxo\n2)Ajustar"));
        assert!(violates_format_policy("1.Validar o fluxo"));
        assert!(violates_format_policy("1."));
    }

    #[test]
    fn test_bullets_violate() {
        assert!(violates_format_policy("- primeiro ponto"));
        assert!(violates_format_policy("• primeiro ponto"));
        assert!(violates_format_policy("* primeiro ponto"));
    }

    #[test]
    fn test_forbidden_headers_violate_case_insensitively() {
        assert!(violates_format_policy("Bom ponto. PRÓXIMOS PASSOS: validar."));
        assert!(violates_format_policy("Contexto rápido: a gente atrasou."));
        assert!(violates_format_policy("As decisoes ficaram claras."));
    }

    #[test]
    fn test_number_without_marker_is_prose() {
        assert!(!violates_format_policy("10 clientes já pediram isso."));
        assert!(!violates_format_policy("3.5 milhões é o teto do projeto."));
    }
}
