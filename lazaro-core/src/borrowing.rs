//! # Borrowing — Spans de Empréstimos e Fusão BIO
//!
//! Um `Borrowing` é um trecho contíguo de tokens julgado como vocabulário
//! emprestado de outra língua ("look", "machine learning", "anime"). Este
//! módulo implementa a máquina de estados que reconstrói esses spans a
//! partir da sequência de tokens rotulados token a token.
//!
//! A fusão pressupõe que a sequência já passou por
//! [`crate::bio::repair_labels`]: com a entrada bem formada, uma única
//! passada da esquerda para a direita com estado auxiliar O(1) basta, e os
//! spans saem sem sobreposição e em ordem crescente de posição inicial.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::bio::type_to_language;
use crate::token::Token;

/// Um empréstimo identificado no texto (span de um ou mais tokens).
///
/// O intervalo `start_pos..end_pos` é semiaberto e indexa `context_tokens`
/// (a sentença completa, compartilhada entre todos os spans da mesma
/// análise). Invariante: `tokens == context_tokens[start_pos..end_pos]`.
///
/// A língua é derivada do sufixo da tag **uma única vez**, na construção,
/// pelo mapeamento fixo de [`type_to_language`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Borrowing {
    /// Os tokens que formam o empréstimo (contíguos).
    pub tokens: Vec<Token>,
    /// Índice do primeiro token (inclusivo) em `context_tokens`.
    pub start_pos: usize,
    /// Índice de fim (exclusivo) em `context_tokens`.
    pub end_pos: usize,
    /// Código de língua normalizado: "en" para anglicismos, "other" demais.
    pub language: String,
    /// A sentença completa — referência de contexto compartilhada entre os
    /// spans da mesma análise, não propriedade do span.
    #[serde(skip_serializing, default)]
    pub context_tokens: Arc<[Token]>,
}

impl Borrowing {
    /// Constrói um empréstimo a partir de um span fechado pela fusão.
    ///
    /// `lang_label` é o sufixo de tipo da tag (ex: "ENG"); a conversão para
    /// código de língua acontece aqui e nunca é recomputada.
    pub fn from_span(
        tokens: Vec<Token>,
        lang_label: &str,
        start_pos: usize,
        end_pos: usize,
        context_tokens: Arc<[Token]>,
    ) -> Self {
        Self {
            tokens,
            start_pos,
            end_pos,
            language: type_to_language(lang_label).to_string(),
            context_tokens,
        }
    }

    /// Quantidade de tokens do empréstimo.
    pub fn length(&self) -> usize {
        self.tokens.len()
    }

    /// O empréstimo como texto corrido.
    pub fn text(&self) -> String {
        self.tokens
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// A sentença de contexto como texto corrido.
    pub fn context_text(&self) -> String {
        self.context_tokens
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// O empréstimo vem do inglês?
    pub fn is_anglicism(&self) -> bool {
        self.language == "en"
    }

    /// O empréstimo vem de outra língua que não o inglês?
    pub fn is_other(&self) -> bool {
        self.language == "other"
    }

    /// Verifica se o empréstimo aparece entre aspas no contexto.
    ///
    /// Consulta o token imediatamente anterior a `start_pos` e o token em
    /// `end_pos`; se o span encosta em qualquer borda da sentença, aspas são
    /// impossíveis e o resultado é `false` — nunca há pânico por índice.
    pub fn has_quotation(&self) -> bool {
        if self.start_pos == 0 || self.end_pos >= self.context_tokens.len() {
            return false;
        }
        let prev = &self.context_tokens[self.start_pos - 1];
        let next = &self.context_tokens[self.end_pos];
        prev.is_quotation() && next.is_quotation()
    }

    /// O empréstimo como tupla `(texto, língua)`.
    pub fn to_tuple(&self) -> (String, String) {
        (self.text(), self.language.clone())
    }

    /// O empréstimo como mapa plano de campos.
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("borrowing".to_string(), serde_json::Value::from(self.text()));
        map.insert("language".to_string(), serde_json::Value::from(self.language.clone()));
        map.insert("start_pos".to_string(), serde_json::Value::from(self.start_pos));
        map.insert("end_pos".to_string(), serde_json::Value::from(self.end_pos));
        map
    }
}

impl PartialEq for Borrowing {
    fn eq(&self, other: &Self) -> bool {
        self.tokens == other.tokens
            && self.start_pos == other.start_pos
            && self.end_pos == other.end_pos
            && self.language == other.language
    }
}

/// Funde uma sequência de tokens rotulados (BIO reparado) em empréstimos.
///
/// Algoritmo: acumulador (`pending_label`, `pending_tokens`, `pending_start`)
/// inicialmente vazio; varredura da esquerda para a direita:
/// - `O`: fecha o span pendente, se houver;
/// - `B-TIPO`: fecha o pendente (um `B` sempre abre span novo, mesmo sem `O`
///   no meio) e abre outro com este token;
/// - `I-TIPO`: estende o pendente com este token (só alcançável com
///   antecessor válido após a reparação; sem tokens pendentes, trata a
///   posição atual como início — defesa, não deve ocorrer).
///
/// Ao fim da varredura, um span ainda aberto é fechado no fim da sentença.
pub fn fuse_spans(output_tokens: &[Token]) -> Vec<Borrowing> {
    let context: Arc<[Token]> = output_tokens.into();
    let mut spans = Vec::new();
    let mut pending_label: Option<String> = None;
    let mut pending_tokens: Vec<Token> = Vec::new();
    let mut pending_start = 0usize;

    for (i, token) in output_tokens.iter().enumerate() {
        if token.is_outside_label() {
            if let Some(label) = pending_label.take() {
                spans.push(Borrowing::from_span(
                    std::mem::take(&mut pending_tokens),
                    &label,
                    pending_start,
                    i,
                    Arc::clone(&context),
                ));
            }
            pending_start = i;
        } else if token.is_begin_label() {
            if let Some(label) = pending_label.take() {
                spans.push(Borrowing::from_span(
                    std::mem::take(&mut pending_tokens),
                    &label,
                    pending_start,
                    i,
                    Arc::clone(&context),
                ));
            }
            pending_label = Some(token.lang_label().unwrap_or("OTHER").to_string());
            pending_tokens = vec![token.clone()];
            pending_start = i;
        } else if token.is_inside_label() {
            pending_label = Some(token.lang_label().unwrap_or("OTHER").to_string());
            if pending_tokens.is_empty() {
                pending_start = i;
            }
            pending_tokens.push(token.clone());
        }
    }

    if let Some(label) = pending_label {
        spans.push(Borrowing::from_span(
            pending_tokens,
            &label,
            pending_start,
            output_tokens.len(),
            context,
        ));
    }

    spans
}
