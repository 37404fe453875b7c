//! # Token — Unidade Atômica de Análise
//!
//! O `Token` representa uma palavra (ou pontuação) dentro de uma sentença,
//! junto com o rótulo BIO atribuído pelo tagger e a posição que ocupa na
//! sequência. É o formato canônico em que **todos** os backends convergem:
//! qualquer que seja a saída bruta do modelo (spans prontos, rótulos por
//! token ou subpalavras), ela é normalizada para uma `Vec<Token>` antes da
//! reparação de rótulos e da fusão de spans.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Glifos de aspas reconhecidos pelo predicado [`Token::is_quotation`].
///
/// Cobre as aspas retas, angulares (espanhol/francês) e tipográficas,
/// de abertura e de fechamento.
pub const QUOTATION_MARKS: &[&str] = &["\"", "'", "«", "»", "“", "”", "‘", "’"];

/// Um token rotulado dentro de uma sentença.
///
/// Diferente do token do tokenizador (que carrega offsets de byte), este é o
/// token **pós-predição**: texto, rótulo BIO (`"B-ENG"`, `"I-ENG"`,
/// `"B-OTHER"`, `"I-OTHER"` ou `"O"`), posição sequencial na sentença e,
/// quando o backend fornece, a confiança da predição.
///
/// Tokens são objetos-valor imutáveis: cada chamada de análise produz a sua
/// própria sequência e a descarta junto com o resultado.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    /// Texto do token (ex: "app", "machine", "'").
    pub text: String,
    /// Rótulo BIO completo (ex: "B-ENG", "O").
    pub label: String,
    /// Posição do token dentro da sentença (0, 1, 2...).
    pub position: usize,
    /// Confiança atribuída pelo tagger ao rótulo, quando disponível.
    pub probability: Option<f64>,
}

impl Token {
    pub fn new(text: impl Into<String>, label: impl Into<String>, position: usize) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
            position,
            probability: None,
        }
    }

    pub fn with_probability(
        text: impl Into<String>,
        label: impl Into<String>,
        position: usize,
        probability: f64,
    ) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
            position,
            probability: Some(probability),
        }
    }

    /// Prefixo BIO do rótulo: `"B"`, `"I"` ou `"O"`.
    pub fn bio_label(&self) -> &str {
        self.label.split('-').next().unwrap_or(&self.label)
    }

    /// Sufixo de tipo do rótulo (ex: `"ENG"`, `"OTHER"`).
    ///
    /// Indefinido para rótulos `O` — retorna `None` quando não há sufixo.
    pub fn lang_label(&self) -> Option<&str> {
        self.label.splitn(2, '-').nth(1)
    }

    pub fn is_outside_label(&self) -> bool {
        self.bio_label() == "O"
    }

    pub fn is_begin_label(&self) -> bool {
        self.bio_label() == "B"
    }

    pub fn is_inside_label(&self) -> bool {
        self.bio_label() == "I"
    }

    /// Verifica se o token é um glifo de aspas (ver [`QUOTATION_MARKS`]).
    pub fn is_quotation(&self) -> bool {
        QUOTATION_MARKS.contains(&self.text.as_str())
    }

    /// O token como tupla `(texto, rótulo, probabilidade)`.
    pub fn to_tuple(&self) -> (String, String, Option<f64>) {
        (self.text.clone(), self.label.clone(), self.probability)
    }

    /// O token como mapa plano de campos (para serialização simples).
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("text".to_string(), serde_json::Value::from(self.text.clone()));
        map.insert("label".to_string(), serde_json::Value::from(self.label.clone()));
        map.insert("position".to_string(), serde_json::Value::from(self.position));
        map.insert("probability".to_string(), serde_json::Value::from(self.probability));
        map
    }
}

// A probabilidade não participa da igualdade: dois tokens com o mesmo texto,
// rótulo e posição são o mesmo token, venham de onde vierem.
impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text && self.label == other.label && self.position == other.position
    }
}

impl Eq for Token {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bio_and_lang_label() {
        let token = Token::new("app", "B-ENG", 2);
        assert_eq!(token.bio_label(), "B");
        assert_eq!(token.lang_label(), Some("ENG"));
        assert!(token.is_begin_label());
        assert!(!token.is_outside_label());
    }

    #[test]
    fn test_outside_has_no_lang() {
        let token = Token::new("fue", "O", 0);
        assert_eq!(token.bio_label(), "O");
        assert_eq!(token.lang_label(), None);
        assert!(token.is_outside_label());
    }

    #[test]
    fn test_is_quotation() {
        assert!(Token::new("'", "O", 0).is_quotation());
        assert!(Token::new("«", "O", 0).is_quotation());
        assert!(Token::new("”", "O", 0).is_quotation());
        assert!(!Token::new("anime", "B-OTHER", 0).is_quotation());
    }

    #[test]
    fn test_equality_ignores_probability() {
        let a = Token::new("look", "B-ENG", 2);
        let b = Token::with_probability("look", "B-ENG", 2, 0.93);
        assert_eq!(a, b);
    }
}
