//! # Normalização de Saídas de Backends
//!
//! Os taggers externos devolvem predições em formatos heterogêneos. Este
//! módulo os modela como uma variante fechada — um caminho de normalização
//! por família — todos convergindo na mesma representação: `Vec<Token>`
//! rotulado, pronto para reparação e fusão.
//!
//! | Família              | Formato bruto                             | Caminho            |
//! |----------------------|-------------------------------------------|--------------------|
//! | Baseado em spans     | uma tag crua por token                    | direto             |
//! | Rotulagem de tokens  | `(texto, rótulo, confiança)` por token    | direto             |
//! | Subpalavras          | `(peça, rótulo)` com sentinelas           | via alinhamento    |

use crate::align::{merge_wordpieces, LabelStrategy};
use crate::token::Token;

/// Saída bruta de um backend de marcação, numa das três famílias.
#[derive(Debug, Clone)]
pub enum BackendOutput {
    /// Backend que já funde spans internamente: só a sequência de tags
    /// cruas por token interessa — a fusão canônica é refeita aqui.
    SpanBased {
        /// Pares `(texto_do_token, tag_crua)`.
        tagged_tokens: Vec<(String, String)>,
    },
    /// Backend neural de rotulagem token a token, com confiança.
    TokenLabeling {
        /// Triplas `(texto, rótulo, confiança)`.
        predictions: Vec<(String, String, f64)>,
    },
    /// Backend neural sobre subpalavras, com sentinelas de borda.
    SubwordTokenizing {
        /// Pares `(peça, rótulo)` incluindo `[CLS]`/`[SEP]`.
        pieces: Vec<(String, String)>,
        /// Como decidir o rótulo de cada palavra reconstruída.
        strategy: LabelStrategy,
    },
}

impl BackendOutput {
    /// Normaliza a saída bruta para a sequência canônica de tokens.
    ///
    /// As posições são sequenciais a partir de 0 em todas as famílias; a
    /// confiança só existe onde o backend a fornece.
    pub fn into_tokens(self) -> Vec<Token> {
        match self {
            BackendOutput::SpanBased { tagged_tokens } => tagged_tokens
                .into_iter()
                .enumerate()
                .map(|(i, (text, label))| Token::new(text, label, i))
                .collect(),
            BackendOutput::TokenLabeling { predictions } => predictions
                .into_iter()
                .enumerate()
                .map(|(i, (text, label, confidence))| {
                    Token::with_probability(text, label, i, confidence)
                })
                .collect(),
            BackendOutput::SubwordTokenizing { pieces, strategy } => {
                merge_wordpieces(&pieces, strategy)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_based_normalization() {
        let output = BackendOutput::SpanBased {
            tagged_tokens: vec![
                ("el".into(), "O".into()),
                ("look".into(), "B-ENG".into()),
            ],
        };
        let tokens = output.into_tokens();
        assert_eq!(tokens[1], Token::new("look", "B-ENG", 1));
        assert_eq!(tokens[1].probability, None);
    }

    #[test]
    fn test_token_labeling_keeps_confidence() {
        let output = BackendOutput::TokenLabeling {
            predictions: vec![("look".into(), "B-ENG".into(), 0.93)],
        };
        let tokens = output.into_tokens();
        assert_eq!(tokens[0].probability, Some(0.93));
        assert_eq!(tokens[0].position, 0);
    }

    #[test]
    fn test_subword_normalization_reconstructs_words() {
        let output = BackendOutput::SubwordTokenizing {
            pieces: vec![
                ("[CLS]".into(), "O".into()),
                ("soft".into(), "B-ENG".into()),
                ("##ware".into(), "B-ENG".into()),
                ("[SEP]".into(), "O".into()),
            ],
            strategy: LabelStrategy::LeadingTag,
        };
        let tokens = output.into_tokens();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "software");
        assert_eq!(tokens[0].label, "B-ENG");
    }
}
