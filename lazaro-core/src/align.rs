//! # Alinhamento de Subpalavras (Wordpieces)
//!
//! Backends neurais com tokenização por subpalavras (estilo BERT) devolvem
//! predições no nível de **wordpiece**: `machine learning` vira
//! `[CLS] mach ##ine learn ##ing [SEP]`, com um rótulo por peça. Este módulo
//! reconstrói os tokens de palavra inteira e decide o rótulo de cada palavra
//! a partir dos rótulos de suas peças.
//!
//! Duas estratégias de decisão, conforme o modo de entrada do backend:
//! - texto cru: o rótulo da **primeira** peça carrega a decisão da palavra;
//! - entrada pré-tokenizada: voto de **maioria** entre as peças da palavra
//!   (empate resolvido pela primeira ocorrência).

use crate::token::Token;

/// Marcador de início de sequência emitido pelo tokenizador de subpalavras.
pub const SEQUENCE_START: &str = "[CLS]";
/// Marcador de fim de sequência emitido pelo tokenizador de subpalavras.
pub const SEQUENCE_END: &str = "[SEP]";
/// Prefixo que marca uma peça de continuação (não inicia palavra nova).
pub const CONTINUATION_PREFIX: &str = "##";

/// Como derivar o rótulo de uma palavra a partir dos rótulos das suas peças.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStrategy {
    /// O rótulo da primeira peça decide (backend sobre texto cru).
    LeadingTag,
    /// Voto de maioria entre as peças; empate favorece a primeira ocorrência
    /// (backend sobre entrada pré-tokenizada).
    MajorityVote,
}

/// Reconstrói tokens de palavra inteira a partir de pares `(peça, rótulo)`.
///
/// - Sentinelas `[CLS]`/`[SEP]` são descartadas (fechando a palavra em
///   construção, se houver).
/// - Uma palavra é uma peça inicial seguida de zero ou mais peças `##...`;
///   o texto final é a concatenação com os prefixos removidos.
/// - `position` é renumerada sequencialmente a partir de 0.
///
/// A rotina é tolerante a descompasso de tamanhos: nunca indexa fora dos
/// pares recebidos e peças de continuação sem palavra aberta são ignoradas.
pub fn merge_wordpieces<S1, S2>(pieces: &[(S1, S2)], strategy: LabelStrategy) -> Vec<Token>
where
    S1: AsRef<str>,
    S2: AsRef<str>,
{
    let mut words: Vec<Token> = Vec::new();
    let mut pending_text = String::new();
    let mut pending_labels: Vec<String> = Vec::new();

    let close_pending =
        |words: &mut Vec<Token>, text: &mut String, labels: &mut Vec<String>| {
            if !text.trim().is_empty() {
                let label = decide_label(labels, strategy);
                let position = words.len();
                words.push(Token::new(std::mem::take(text), label, position));
            } else {
                text.clear();
            }
            labels.clear();
        };

    for (piece, label) in pieces {
        let piece = piece.as_ref();
        let label = label.as_ref();

        if piece == SEQUENCE_START || piece == SEQUENCE_END {
            close_pending(&mut words, &mut pending_text, &mut pending_labels);
            continue;
        }

        if let Some(continuation) = piece.strip_prefix(CONTINUATION_PREFIX) {
            // Continuação sem palavra aberta: entrada malformada, ignora.
            if !pending_text.is_empty() {
                pending_text.push_str(continuation);
                pending_labels.push(label.to_string());
            }
            continue;
        }

        close_pending(&mut words, &mut pending_text, &mut pending_labels);
        pending_text.push_str(piece);
        pending_labels.push(label.to_string());
    }

    close_pending(&mut words, &mut pending_text, &mut pending_labels);
    words
}

/// Decide o rótulo da palavra a partir dos rótulos acumulados das peças.
fn decide_label(labels: &[String], strategy: LabelStrategy) -> String {
    match strategy {
        LabelStrategy::LeadingTag => labels.first().cloned().unwrap_or_else(|| "O".to_string()),
        LabelStrategy::MajorityVote => {
            // Maioria com desempate pela primeira ocorrência: conta cada
            // rótulo e fica com o primeiro que atinge a contagem máxima.
            let mut best: Option<(&str, usize)> = None;
            for (i, label) in labels.iter().enumerate() {
                if labels[..i].contains(label) {
                    continue; // já contado
                }
                let count = labels.iter().filter(|l| *l == label).count();
                match best {
                    Some((_, best_count)) if count <= best_count => {}
                    _ => best = Some((label, count)),
                }
            }
            best.map(|(l, _)| l.to_string()).unwrap_or_else(|| "O".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter().map(|(a, b)| (a.to_string(), b.to_string())).collect()
    }

    #[test]
    fn test_merge_reconstructs_words() {
        let input = pairs(&[
            ("[CLS]", "O"),
            ("mach", "B-ENG"),
            ("##ine", "B-ENG"),
            ("learn", "I-ENG"),
            ("##ing", "I-ENG"),
            ("[SEP]", "O"),
        ]);
        let words = merge_wordpieces(&input, LabelStrategy::LeadingTag);
        assert_eq!(words.len(), 2);
        assert_eq!(words[0], Token::new("machine", "B-ENG", 0));
        assert_eq!(words[1], Token::new("learning", "I-ENG", 1));
    }

    #[test]
    fn test_merge_drops_sentinels_only() {
        let input = pairs(&[("[CLS]", "O"), ("hola", "O"), ("[SEP]", "O")]);
        let words = merge_wordpieces(&input, LabelStrategy::LeadingTag);
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].text, "hola");
    }

    #[test]
    fn test_merge_positions_are_sequential() {
        let input = pairs(&[
            ("[CLS]", "O"),
            ("el", "O"),
            ("soft", "B-ENG"),
            ("##ware", "B-ENG"),
            ("libre", "O"),
            ("[SEP]", "O"),
        ]);
        let words = merge_wordpieces(&input, LabelStrategy::LeadingTag);
        let positions: Vec<usize> = words.iter().map(|w| w.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
        assert_eq!(words[1].text, "software");
    }

    #[test]
    fn test_leading_tag_wins_for_raw_text_backend() {
        // Primeira peça B-ENG, continuações divergentes: vale a primeira.
        let input = pairs(&[("ran", "B-ENG"), ("##king", "O")]);
        let words = merge_wordpieces(&input, LabelStrategy::LeadingTag);
        assert_eq!(words[0].label, "B-ENG");
    }

    #[test]
    fn test_majority_vote_with_tie_breaks_on_first() {
        let input = pairs(&[("ran", "O"), ("##king", "B-ENG")]);
        let words = merge_wordpieces(&input, LabelStrategy::MajorityVote);
        // Empate 1x1: vence a primeira ocorrência ("O").
        assert_eq!(words[0].label, "O");
    }

    #[test]
    fn test_majority_vote_counts_all_pieces() {
        let input = pairs(&[("str", "O"), ("##ea", "B-ENG"), ("##ming", "B-ENG")]);
        let words = merge_wordpieces(&input, LabelStrategy::MajorityVote);
        assert_eq!(words[0].text, "streaming");
        assert_eq!(words[0].label, "B-ENG");
    }

    #[test]
    fn test_merge_tolerates_orphan_continuation() {
        // ##peça sem palavra aberta: descartada sem pânico.
        let input = pairs(&[("[CLS]", "O"), ("##ine", "B-ENG"), ("look", "B-ENG")]);
        let words = merge_wordpieces(&input, LabelStrategy::LeadingTag);
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].text, "look");
    }

    #[test]
    fn test_merge_empty_input() {
        let input: Vec<(String, String)> = vec![];
        assert!(merge_wordpieces(&input, LabelStrategy::LeadingTag).is_empty());
    }
}
