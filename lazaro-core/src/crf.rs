//! # CRF Linear-Chain para Marcação de Empréstimos
//!
//! Implementação didática de um CRF de cadeia linear para a tarefa de
//! marcação BIO de empréstimos lexicais. O modelo aprende a probabilidade
//! condicional `P(y|x)`, onde `y` é a sequência de tags e `x` a sequência
//! de tokens featurizados.
//!
//! ## Intuição
//!
//! O CRF combina dois tipos de evidência ao decidir cada tag:
//!
//! - **Emissão**: features do token no contexto. "streaming" termina em
//!   "ing", não está no léxico espanhol e tem alta log-prob inglesa — tudo
//!   empurra para `B-ENG`.
//! - **Transição**: compatibilidade entre tags vizinhas. Se "machine"
//!   recebeu `B-ENG`, "learning" logo depois quase certamente é `I-ENG` —
//!   isso mora na matriz de transição.
//!
//! ```text
//! score(y, x) = Σ_i [emission_score(y_i, x, i) + transition_score(y_{i-1}, y_i)]
//! ```
//!
//! ## Treinamento
//!
//! Perceptron estruturado ([`CrfModel::train`]): decodifica cada sentença
//! com os pesos atuais (Viterbi) e, quando a predição difere do ouro,
//! reforça as features do caminho correto e penaliza as do predito.
//! Simples, sem gradientes, e suficiente para corpora pequenos.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::bio::Tag;
use crate::error::{Error, Result};
use crate::features::FeatureVector;

/// Um modelo de sequência capaz de marcar tokens featurizados com tags BIO.
///
/// É a costura entre o pipeline e os motores de decisão: o CRF treinado e o
/// modelo heurístico embutido implementam a mesma interface.
pub trait SequenceModel: Send + Sync {
    /// Marca uma sequência featurizada, devolvendo uma tag e uma confiança
    /// em `[0, 1]` por posição.
    fn tag(&self, feature_vectors: &[FeatureVector]) -> Result<Vec<(Tag, f64)>>;
}

/// Modelo CRF com pesos de emissão e transição.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrfModel {
    /// Pesos de emissão: `"feature_name|tag_label"` → peso.
    pub emission_weights: HashMap<String, f64>,
    /// Pesos de transição, indexados por `[prev.index()][next.index()]`.
    pub transition_weights: Vec<Vec<f64>>,
    /// Se o modelo já recebeu pesos (via treino, carga ou configuração).
    trained: bool,
}

impl CrfModel {
    /// Cria um modelo com pesos zerados (ainda não treinado).
    pub fn new() -> Self {
        let n = Tag::COUNT;
        Self {
            emission_weights: HashMap::new(),
            transition_weights: vec![vec![0.0f64; n]; n],
            trained: false,
        }
    }

    pub fn is_trained(&self) -> bool {
        self.trained
    }

    /// Score de emissão de uma tag dado o vetor de features da posição.
    pub fn emission_score(&self, features: &FeatureVector, tag: &Tag) -> f64 {
        let tag_label = tag.label();
        features
            .features
            .iter()
            .map(|(feat_name, feat_val)| {
                let key = format!("{feat_name}|{tag_label}");
                feat_val * self.emission_weights.get(&key).unwrap_or(&0.0)
            })
            .sum()
    }

    /// Score de transição entre tags adjacentes.
    pub fn transition_score(&self, prev: &Tag, next: &Tag) -> f64 {
        self.transition_weights[prev.index()][next.index()]
    }

    /// Define um peso de emissão (usado pelo modelo heurístico embutido).
    pub fn set_emission(&mut self, feature: &str, tag: &Tag, weight: f64) {
        let key = format!("{feature}|{}", tag.label());
        self.emission_weights.insert(key, weight);
        self.trained = true;
    }

    /// Define um peso de transição.
    pub fn set_transition(&mut self, from: &Tag, to: &Tag, weight: f64) {
        self.transition_weights[from.index()][to.index()] = weight;
        self.trained = true;
    }

    fn update_emissions(&mut self, features: &FeatureVector, tag: &Tag, delta: f64) {
        let tag_label = tag.label();
        for (feat_name, feat_val) in &features.features {
            let key = format!("{feat_name}|{tag_label}");
            *self.emission_weights.entry(key).or_insert(0.0) += delta * feat_val;
        }
    }

    /// Treina o modelo por perceptron estruturado.
    ///
    /// Cada sentença de treino é um par `(features, tags ouro)` de mesmo
    /// comprimento. A cada época, sentenças com predição incorreta geram
    /// atualizações de +1 no caminho ouro e -1 no caminho predito, tanto
    /// nas emissões quanto nas transições.
    pub fn train(&mut self, sentences: &[(Vec<FeatureVector>, Vec<Tag>)], epochs: usize) {
        for epoch in 0..epochs {
            let mut mistakes = 0usize;
            for (feature_vectors, gold) in sentences {
                debug_assert_eq!(feature_vectors.len(), gold.len());
                // marca trained antes do decode para o Viterbi rodar
                self.trained = true;
                let decoded = crate::viterbi::viterbi_decode(self, feature_vectors);
                let predicted = decoded.best_sequence;
                if predicted == *gold {
                    continue;
                }
                mistakes += 1;
                for i in 0..gold.len() {
                    if predicted[i] != gold[i] {
                        self.update_emissions(&feature_vectors[i], &gold[i], 1.0);
                        self.update_emissions(&feature_vectors[i], &predicted[i], -1.0);
                    }
                    if i > 0 && (predicted[i] != gold[i] || predicted[i - 1] != gold[i - 1]) {
                        self.transition_weights[gold[i - 1].index()][gold[i].index()] += 1.0;
                        self.transition_weights[predicted[i - 1].index()][predicted[i].index()] -=
                            1.0;
                    }
                }
            }
            debug!(epoch, mistakes, "época de treino concluída");
            if mistakes == 0 {
                break;
            }
        }
        info!(
            features = self.emission_weights.len(),
            "treino do CRF concluído"
        );
        self.trained = true;
    }

    /// Persiste o modelo em JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer(std::io::BufWriter::new(file), self)?;
        info!(path = %path.display(), "modelo CRF salvo");
        Ok(())
    }

    /// Carrega um modelo salvo; arquivo ausente vira erro de recurso.
    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|_| {
            Error::resource_missing(
                "modelo CRF",
                path,
                "treine com train() e salve com save(), ou aponte um modelo existente",
            )
        })?;
        let model: CrfModel = serde_json::from_reader(std::io::BufReader::new(file))?;
        info!(path = %path.display(), "modelo CRF carregado");
        Ok(model)
    }
}

impl Default for CrfModel {
    fn default() -> Self {
        Self::new()
    }
}

impl SequenceModel for CrfModel {
    fn tag(&self, feature_vectors: &[FeatureVector]) -> Result<Vec<(Tag, f64)>> {
        if !self.trained {
            return Err(Error::ModelNotTrained);
        }
        let result = crate::viterbi::viterbi_decode(self, feature_vectors);
        Ok(result
            .best_sequence
            .into_iter()
            .zip(result.token_confidences)
            .collect())
    }
}

/// Pré-calcula os scores de emissão `emission[i][t]` da sequência inteira.
pub fn compute_emission_scores(
    model: &CrfModel,
    feature_vectors: &[FeatureVector],
) -> Vec<Vec<f64>> {
    let tags = Tag::all();
    feature_vectors
        .iter()
        .map(|fv| tags.iter().map(|tag| model.emission_score(fv, tag)).collect())
        .collect()
}
