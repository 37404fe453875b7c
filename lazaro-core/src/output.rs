//! # Saída Canônica da Análise
//!
//! `LazaroOutput` consolida o resultado de uma análise: a sequência completa
//! de tokens rotulados e os empréstimos fundidos, com as vistas filtradas e
//! conversões que os chamadores consomem.
//!
//! A construção é o único ponto do sistema onde a cadeia
//! reparação → fusão acontece: qualquer sequência crua de tokens, venha de
//! onde vier ([`crate::backends::BackendOutput`] ou o CRF embutido), passa
//! por [`crate::bio::repair_labels`] e [`crate::borrowing::fuse_spans`] aqui.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::backends::BackendOutput;
use crate::bio::repair_labels;
use crate::borrowing::{fuse_spans, Borrowing};
use crate::token::Token;

/// Resultado consolidado de uma análise de texto.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LazaroOutput {
    /// Todos os tokens da sentença, com rótulos já reparados.
    pub tokens: Vec<Token>,
    /// Os empréstimos fundidos, em ordem crescente de posição.
    pub borrowings: Vec<Borrowing>,
}

impl LazaroOutput {
    /// Constrói a saída a partir de uma sequência crua de tokens rotulados.
    ///
    /// Rótulos malformados são reparados silenciosamente, nunca reportados.
    pub fn from_tokens(raw_tokens: Vec<Token>) -> Self {
        let labels: Vec<&str> = raw_tokens.iter().map(|t| t.label.as_str()).collect();
        let repaired = repair_labels(&labels);
        let tokens: Vec<Token> = raw_tokens
            .into_iter()
            .zip(repaired)
            .map(|(mut token, label)| {
                token.label = label;
                token
            })
            .collect();
        let borrowings = fuse_spans(&tokens);
        Self { tokens, borrowings }
    }

    /// Constrói a saída normalizando a predição crua de um backend.
    pub fn from_backend(output: BackendOutput) -> Self {
        Self::from_tokens(output.into_tokens())
    }

    /// Todos os empréstimos encontrados.
    pub fn borrowings(&self) -> &[Borrowing] {
        &self.borrowings
    }

    /// Apenas os anglicismos (língua "en").
    pub fn anglicisms(&self) -> Vec<&Borrowing> {
        self.borrowings.iter().filter(|b| b.is_anglicism()).collect()
    }

    /// Apenas os empréstimos de outras línguas.
    pub fn other_borrowings(&self) -> Vec<&Borrowing> {
        self.borrowings.iter().filter(|b| b.is_other()).collect()
    }

    /// Contador de frequência sobre pares `(texto, língua)`.
    pub fn count(&self) -> HashMap<(String, String), usize> {
        let mut counts = HashMap::new();
        for borrowing in &self.borrowings {
            *counts.entry(borrowing.to_tuple()).or_insert(0) += 1;
        }
        counts
    }

    /// Os empréstimos como tuplas `(texto, língua)`.
    pub fn to_tuples(&self) -> Vec<(String, String)> {
        self.borrowings.iter().map(|b| b.to_tuple()).collect()
    }

    /// Os empréstimos como mapas planos de campos.
    pub fn to_dicts(&self) -> Vec<HashMap<String, serde_json::Value>> {
        self.borrowings.iter().map(|b| b.to_dict()).collect()
    }

    /// Projeção `(texto, tag)` da rotulagem original, token a token.
    pub fn tag_per_token(&self) -> Vec<(String, String)> {
        self.tokens
            .iter()
            .map(|t| (t.text.clone(), t.label.clone()))
            .collect()
    }

    /// O texto analisado, reconstruído por justaposição dos tokens.
    pub fn text(&self) -> String {
        self.tokens
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::LabelStrategy;

    fn raw(pairs: &[(&str, &str)]) -> Vec<Token> {
        pairs
            .iter()
            .enumerate()
            .map(|(i, (text, label))| Token::new(*text, *label, i))
            .collect()
    }

    #[test]
    fn test_from_tokens_repairs_before_fusing() {
        // I-ENG órfão: promovido a B-ENG antes da fusão.
        let output = LazaroOutput::from_tokens(raw(&[
            ("el", "O"),
            ("ranking", "I-ENG"),
            ("mundial", "O"),
        ]));
        assert_eq!(output.tokens[1].label, "B-ENG");
        assert_eq!(output.to_tuples(), vec![("ranking".to_string(), "en".to_string())]);
    }

    #[test]
    fn test_filtered_views() {
        let output = LazaroOutput::from_tokens(raw(&[
            ("look", "B-ENG"),
            ("y", "O"),
            ("anime", "B-OTHER"),
        ]));
        assert_eq!(output.borrowings().len(), 2);
        assert_eq!(output.anglicisms().len(), 1);
        assert_eq!(output.other_borrowings().len(), 1);
        assert_eq!(output.anglicisms()[0].text(), "look");
        assert_eq!(output.other_borrowings()[0].text(), "anime");
    }

    #[test]
    fn test_count_aggregates_repeats() {
        let output = LazaroOutput::from_tokens(raw(&[
            ("look", "B-ENG"),
            ("tras", "O"),
            ("look", "B-ENG"),
        ]));
        let counts = output.count();
        assert_eq!(counts[&("look".to_string(), "en".to_string())], 2);
    }

    #[test]
    fn test_tag_per_token_projection() {
        let output = LazaroOutput::from_tokens(raw(&[("el", "O"), ("look", "B-ENG")]));
        assert_eq!(
            output.tag_per_token(),
            vec![
                ("el".to_string(), "O".to_string()),
                ("look".to_string(), "B-ENG".to_string())
            ]
        );
    }

    #[test]
    fn test_from_backend_subword_end_to_end() {
        let output = LazaroOutput::from_backend(BackendOutput::SubwordTokenizing {
            pieces: vec![
                ("[CLS]".into(), "O".into()),
                ("el".into(), "O".into()),
                ("stream".into(), "B-ENG".into()),
                ("##ing".into(), "B-ENG".into()),
                ("[SEP]".into(), "O".into()),
            ],
            strategy: LabelStrategy::LeadingTag,
        });
        assert_eq!(
            output.to_tuples(),
            vec![("streaming".to_string(), "en".to_string())]
        );
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let output = LazaroOutput::from_tokens(vec![]);
        assert!(output.tokens.is_empty());
        assert!(output.borrowings().is_empty());
        assert!(output.count().is_empty());
    }
}
