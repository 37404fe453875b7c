//! # Pipeline de Análise — Orquestrador com Eventos Observáveis
//!
//! O `Lazaro` coordena os módulos (tokenizador, features, CRF/Viterbi,
//! reparação, fusão) e, na variante streaming, emite eventos em cada passo
//! via um canal `mpsc`, permitindo que o servidor WebSocket transmita o
//! progresso em tempo real para o cliente.
//!
//! Cada chamada de análise é independente e só lê estado compartilhado
//! (modelo e recursos, imutáveis após a construção), então lotes de textos
//! são processados em paralelo com `rayon` sem coordenação.

use std::sync::mpsc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::crf::SequenceModel;
use crate::error::Result;
use crate::features::WindowedTokenFeatureExtractor;
use crate::model::{build_default_model, default_feature_extractor};
use crate::output::LazaroOutput;
use crate::token::Token;
use crate::tokenizer::{tokenize, SourceToken};

/// Eventos emitidos pelo pipeline durante o processamento.
///
/// Permitem que a interface visualize o raciocínio do modelo passo a passo.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PipelineEvent {
    /// **Passo 1**: tokenização concluída.
    TokenizationDone {
        tokens: Vec<SourceToken>,
        total: usize,
    },
    /// **Passo 2**: features extraídas para um token.
    /// Carrega as 10 features de maior peso, para visualização.
    FeaturesComputed {
        token_index: usize,
        token_text: String,
        top_features: Vec<(String, f64)>,
    },
    /// **Passo 3**: tags decididas pelo decodificador, com confiança.
    TagsAssigned { tokens: Vec<Token> },
    /// **Passo 4**: spans de empréstimo fundidos.
    SpansFused { output: LazaroOutput },
    /// **Conclusão**: resultado final e estatísticas.
    Done {
        output: LazaroOutput,
        total_tokens: usize,
        processing_ms: u64,
    },
    /// **Falha**: erro irrecuperável (ex: modelo não treinado).
    Error { message: String },
}

/// O pipeline de detecção de empréstimos.
///
/// # Modos de uso
/// - **Sync**: [`Lazaro::analyze`] para scripts e chamadas diretas.
/// - **Streaming**: [`Lazaro::analyze_streaming`] para UIs reativas.
/// - **Lote**: [`Lazaro::analyze_batch`] para coleções de textos.
pub struct Lazaro {
    model: Box<dyn SequenceModel>,
    extractor: WindowedTokenFeatureExtractor,
}

impl Lazaro {
    /// Cria o pipeline com o modelo padrão embutido.
    pub fn new() -> Self {
        Self {
            model: Box::new(build_default_model()),
            extractor: default_feature_extractor(),
        }
    }

    /// Cria o pipeline com um modelo e extrator customizados.
    pub fn with_model(
        model: Box<dyn SequenceModel>,
        extractor: WindowedTokenFeatureExtractor,
    ) -> Self {
        Self { model, extractor }
    }

    /// Analisa um texto e devolve a saída consolidada.
    pub fn analyze(&self, text: &str) -> Result<LazaroOutput> {
        let source_tokens = tokenize(text);
        let output = self.tag_tokens(&source_tokens)?;
        info!(
            tokens = output.tokens.len(),
            borrowings = output.borrowings().len(),
            "análise concluída"
        );
        Ok(output)
    }

    /// Analisa vários textos em paralelo.
    pub fn analyze_batch(&self, texts: &[&str]) -> Result<Vec<LazaroOutput>> {
        texts.par_iter().map(|text| self.analyze(text)).collect()
    }

    /// Executa o pipeline enviando eventos de progresso pelo canal `tx`.
    ///
    /// # Fluxo de eventos
    /// 1. `TokenizationDone`
    /// 2. `FeaturesComputed` (um por token)
    /// 3. `TagsAssigned`
    /// 4. `SpansFused`
    /// 5. `Done` (ou `Error`)
    pub fn analyze_streaming(&self, text: &str, tx: mpsc::Sender<PipelineEvent>) {
        let start = std::time::Instant::now();

        let source_tokens = tokenize(text);
        let total = source_tokens.len();
        let _ = tx.send(PipelineEvent::TokenizationDone {
            tokens: source_tokens.clone(),
            total,
        });

        if source_tokens.is_empty() {
            let _ = tx.send(PipelineEvent::Done {
                output: LazaroOutput::from_tokens(vec![]),
                total_tokens: 0,
                processing_ms: start.elapsed().as_millis() as u64,
            });
            return;
        }

        let words: Vec<String> = source_tokens.iter().map(|t| t.text.clone()).collect();
        let feature_vectors = self.extractor.extract(&words);

        for (i, fv) in feature_vectors.iter().enumerate() {
            let mut sorted: Vec<(String, f64)> =
                fv.features.iter().map(|(k, v)| (k.clone(), *v)).collect();
            sorted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
            sorted.truncate(10);
            let _ = tx.send(PipelineEvent::FeaturesComputed {
                token_index: i,
                token_text: words[i].clone(),
                top_features: sorted,
            });
        }

        let tagged = match self.model.tag(&feature_vectors) {
            Ok(tagged) => tagged,
            Err(err) => {
                let _ = tx.send(PipelineEvent::Error {
                    message: err.to_string(),
                });
                return;
            }
        };

        let raw_tokens: Vec<Token> = words
            .iter()
            .zip(&tagged)
            .enumerate()
            .map(|(i, (text, (tag, confidence)))| {
                Token::with_probability(text, tag.label(), i, *confidence)
            })
            .collect();
        let _ = tx.send(PipelineEvent::TagsAssigned {
            tokens: raw_tokens.clone(),
        });

        let output = LazaroOutput::from_tokens(raw_tokens);
        let _ = tx.send(PipelineEvent::SpansFused {
            output: output.clone(),
        });

        let _ = tx.send(PipelineEvent::Done {
            output,
            total_tokens: total,
            processing_ms: start.elapsed().as_millis() as u64,
        });
    }

    fn tag_tokens(&self, source_tokens: &[SourceToken]) -> Result<LazaroOutput> {
        if source_tokens.is_empty() {
            return Ok(LazaroOutput::from_tokens(vec![]));
        }
        let words: Vec<String> = source_tokens.iter().map(|t| t.text.clone()).collect();
        let feature_vectors = self.extractor.extract(&words);
        let tagged = self.model.tag(&feature_vectors)?;

        let raw_tokens: Vec<Token> = words
            .iter()
            .zip(&tagged)
            .enumerate()
            .map(|(i, (text, (tag, confidence)))| {
                Token::with_probability(text, tag.label(), i, *confidence)
            })
            .collect();
        Ok(LazaroOutput::from_tokens(raw_tokens))
    }
}

impl Default for Lazaro {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_finds_quoted_anglicism() {
        let pipeline = Lazaro::new();
        let output = pipeline
            .analyze("La empresa invirtió en 'marketing' digital.")
            .unwrap();
        assert!(!output.tokens.is_empty());
        let tuples = output.to_tuples();
        assert!(
            tuples.contains(&("marketing".to_string(), "en".to_string())),
            "empréstimo não encontrado: {tuples:?}"
        );
    }

    #[test]
    fn test_pipeline_empty_text() {
        let pipeline = Lazaro::new();
        let output = pipeline.analyze("").unwrap();
        assert!(output.tokens.is_empty());
        assert!(output.borrowings().is_empty());
    }

    #[test]
    fn test_pipeline_batch_matches_individual() {
        let pipeline = Lazaro::new();
        let texts = ["El running es tendencia.", "La casa grande."];
        let batch = pipeline.analyze_batch(&texts).unwrap();
        assert_eq!(batch.len(), 2);
        for (text, output) in texts.iter().zip(&batch) {
            let individual = pipeline.analyze(text).unwrap();
            assert_eq!(individual.to_tuples(), output.to_tuples());
        }
    }

    #[test]
    fn test_pipeline_events_streaming() {
        let pipeline = Lazaro::new();
        let (tx, rx) = mpsc::channel();
        pipeline.analyze_streaming("Inspírate con este look sencillo.", tx);

        let events: Vec<PipelineEvent> = rx.try_iter().collect();
        assert!(!events.is_empty());
        assert!(matches!(&events[0], PipelineEvent::TokenizationDone { .. }));
        assert!(matches!(events.last().unwrap(), PipelineEvent::Done { .. }));
        assert!(events
            .iter()
            .any(|e| matches!(e, PipelineEvent::TagsAssigned { .. })));
        assert!(events
            .iter()
            .any(|e| matches!(e, PipelineEvent::SpansFused { .. })));
    }

    #[test]
    fn test_streaming_empty_text_emits_done() {
        let pipeline = Lazaro::new();
        let (tx, rx) = mpsc::channel();
        pipeline.analyze_streaming("", tx);
        let events: Vec<PipelineEvent> = rx.try_iter().collect();
        assert_eq!(events.len(), 2);
        assert!(matches!(events.last().unwrap(), PipelineEvent::Done { .. }));
    }
}
