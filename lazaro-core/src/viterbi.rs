//! # Decodificação de Viterbi
//!
//! Programação dinâmica para achar a sequência de tags de maior score sob o
//! CRF. Busca exaustiva custaria `O(5^N)` para N tokens; o Viterbi explora
//! que a melhor sequência terminando na tag `t` no token `i` só depende da
//! melhor sequência até `i-1` — `O(N × 5²)`.
//!
//! ```text
//! Inicialização: viterbi[0][t] = emission(t, x_0)          (+ penalidade se t for I-)
//! Recursão:      viterbi[i][t] = max_t' [viterbi[i-1][t'] + transition(t', t)
//!                                        + penalidade(t', t)] + emission(t, x_i)
//! Backtracking:  reconstrói o caminho ótimo de trás pra frente
//! ```
//!
//! Transições inválidas no esquema BIO (`O → I-ENG`, `B-ENG → I-OTHER`)
//! recebem uma penalidade grande e finita em vez de `-∞`: o esquema é
//! respeitado na prática sem risco de uma coluna inteira degenerar.

use crate::bio::Tag;
use crate::crf::{compute_emission_scores, CrfModel};
use crate::features::FeatureVector;

/// Penalidade aplicada a transições que violam o esquema BIO.
const INVALID_TRANSITION_PENALTY: f64 = -1.0e4;

/// Resultado da decodificação de uma sequência.
#[derive(Debug, Clone)]
pub struct ViterbiResult {
    /// Sequência de tags de maior score (uma por token).
    pub best_sequence: Vec<Tag>,
    /// Score (não normalizado) da melhor sequência.
    pub best_score: f64,
    /// Confiança `[0, 1]` da tag escolhida em cada posição: softmax da
    /// coluna de scores acumulados daquele token.
    pub token_confidences: Vec<f64>,
}

/// Executa o Viterbi sobre os features de uma sequência.
pub fn viterbi_decode(model: &CrfModel, feature_vectors: &[FeatureVector]) -> ViterbiResult {
    if feature_vectors.is_empty() {
        return ViterbiResult {
            best_sequence: vec![],
            best_score: 0.0,
            token_confidences: vec![],
        };
    }

    let n_tokens = feature_vectors.len();
    let tags = Tag::all();
    let n_tags = tags.len();

    let emission = compute_emission_scores(model, feature_vectors);

    // viterbi[t] = melhor score acumulado terminando na tag t no token atual
    let mut viterbi: Vec<f64> = vec![0.0; n_tags];
    // backptr[i][t] = tag anterior que maximiza o score de t no token i
    let mut backptr: Vec<Vec<usize>> = vec![vec![0usize; n_tags]; n_tokens];
    // colunas de score acumulado, para as confianças por token
    let mut columns: Vec<Vec<f64>> = Vec::with_capacity(n_tokens);

    // Inicialização: sem transição real; começar em I- é malformado.
    for t in 0..n_tags {
        let start_penalty = if matches!(tags[t], Tag::Inside(_)) {
            INVALID_TRANSITION_PENALTY
        } else {
            0.0
        };
        viterbi[t] = emission[0][t] + start_penalty;
    }
    columns.push(viterbi.clone());

    for i in 1..n_tokens {
        let mut new_viterbi = vec![f64::NEG_INFINITY; n_tags];
        for t in 0..n_tags {
            let mut best_prev_score = f64::NEG_INFINITY;
            let mut best_prev_tag = 0usize;
            for prev_t in 0..n_tags {
                let mut score = viterbi[prev_t] + model.transition_score(&tags[prev_t], &tags[t]);
                if !Tag::is_valid_transition(&tags[prev_t], &tags[t]) {
                    score += INVALID_TRANSITION_PENALTY;
                }
                if score > best_prev_score {
                    best_prev_score = score;
                    best_prev_tag = prev_t;
                }
            }
            new_viterbi[t] = best_prev_score + emission[i][t];
            backptr[i][t] = best_prev_tag;
        }
        viterbi = new_viterbi;
        columns.push(viterbi.clone());
    }

    // Backtracking
    let (mut best_last, best_total_score) = best_in_slice(&viterbi);
    let mut best_sequence: Vec<Tag> = vec![Tag::Outside; n_tokens];
    let mut chosen_indices: Vec<usize> = vec![0; n_tokens];
    best_sequence[n_tokens - 1] = tags[best_last];
    chosen_indices[n_tokens - 1] = best_last;

    for i in (0..n_tokens - 1).rev() {
        best_last = backptr[i + 1][best_last];
        best_sequence[i] = tags[best_last];
        chosen_indices[i] = best_last;
    }

    let token_confidences = chosen_indices
        .iter()
        .zip(&columns)
        .map(|(&t, column)| scores_to_probs(column)[t])
        .collect();

    ViterbiResult {
        best_sequence,
        best_score: best_total_score,
        token_confidences,
    }
}

/// Retorna `(índice, valor)` do máximo em um slice.
fn best_in_slice(scores: &[f64]) -> (usize, f64) {
    scores
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, &v)| (i, v))
        .unwrap_or((0, f64::NEG_INFINITY))
}

/// Converte uma coluna de scores em probabilidades via softmax.
pub fn scores_to_probs(scores: &[f64]) -> Vec<f64> {
    if scores.is_empty() {
        return vec![];
    }
    let max_score = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|&s| (s - max_score).exp()).collect();
    let sum: f64 = exps.iter().sum();
    if sum == 0.0 {
        return vec![1.0 / scores.len() as f64; scores.len()];
    }
    exps.iter().map(|e| e / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bio::BorrowingLang;

    fn fv(index: usize, features: &[&str]) -> FeatureVector {
        let mut v = FeatureVector::new(index);
        for f in features {
            v.insert(*f, 1.0);
        }
        v
    }

    #[test]
    fn test_viterbi_empty_sequence() {
        let model = CrfModel::new();
        let result = viterbi_decode(&model, &[]);
        assert!(result.best_sequence.is_empty());
        assert!(result.token_confidences.is_empty());
    }

    #[test]
    fn test_viterbi_follows_emission_evidence() {
        let mut model = CrfModel::new();
        let b_eng = Tag::Begin(BorrowingLang::Eng);
        model.set_emission("ending[0]=ing", &b_eng, 5.0);
        model.set_emission("ending[0]=ing", &Tag::Outside, -3.0);

        let result = viterbi_decode(&model, &[fv(0, &["bias", "ending[0]=ing"])]);
        assert_eq!(result.best_sequence, vec![b_eng]);
        assert!(result.token_confidences[0] > 0.5);
    }

    #[test]
    fn test_viterbi_transition_carries_multiword_span() {
        // "machine learning": a segunda palavra só vira I-ENG pela transição.
        let mut model = CrfModel::new();
        let b_eng = Tag::Begin(BorrowingLang::Eng);
        let i_eng = Tag::Inside(BorrowingLang::Eng);
        model.set_emission("tok[0]=machine", &b_eng, 5.0);
        model.set_emission("tok[0]=learning", &i_eng, 1.0);
        model.set_emission("tok[0]=learning", &Tag::Outside, 0.5);
        model.set_transition(&b_eng, &i_eng, 3.0);

        let result = viterbi_decode(
            &model,
            &[fv(0, &["tok[0]=machine"]), fv(1, &["tok[0]=learning"])],
        );
        assert_eq!(result.best_sequence, vec![b_eng, i_eng]);
    }

    #[test]
    fn test_viterbi_never_starts_with_inside() {
        let mut model = CrfModel::new();
        let i_eng = Tag::Inside(BorrowingLang::Eng);
        // Evidência forte (mas finita) por I-ENG no primeiro token.
        model.set_emission("bias", &i_eng, 50.0);

        let result = viterbi_decode(&model, &[fv(0, &["bias"])]);
        assert_ne!(result.best_sequence[0], i_eng);
    }

    #[test]
    fn test_viterbi_respects_bio_scheme() {
        let mut model = CrfModel::new();
        let i_other = Tag::Inside(BorrowingLang::Other);
        let b_eng = Tag::Begin(BorrowingLang::Eng);
        model.set_emission("tok[0]=look", &b_eng, 5.0);
        model.set_emission("tok[0]=chic", &i_other, 5.0);

        // B-ENG → I-OTHER é inválido: a penalidade deve forçar outra saída.
        let result = viterbi_decode(
            &model,
            &[fv(0, &["tok[0]=look"]), fv(1, &["tok[0]=chic"])],
        );
        assert!(Tag::is_valid_transition(
            &result.best_sequence[0],
            &result.best_sequence[1]
        ));
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let probs = scores_to_probs(&[1.0, 2.0, 3.0, 0.5, -1.0]);
        let sum: f64 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }
}
