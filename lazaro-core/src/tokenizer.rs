//! # Tokenizador para Espanhol
//!
//! Divide o texto bruto em tokens preservando a posição original de cada um
//! (offsets de byte), o que permite destacar empréstimos na interface web
//! sem alterar a formatação do texto.
//!
//! ## Regras
//!
//! - Palavras separadas por espaços e pontuação; hífens internos preservados
//!   ("prêt-à-porter" é um token só).
//! - Glifos de aspas viram tokens próprios: `'look'` → `'`, `look`, `'`.
//!   A adjacência de aspas é um sinal forte para a detecção.
//! - URLs, e-mails, hashtags e menções ficam inteiros.
//! - Abreviações comuns do espanhol mantêm o ponto ("Sr.", "pág.").
//! - Pontuação de abertura do espanhol (`¿`, `¡`) é token próprio.

use serde::{Deserialize, Serialize};

/// Um token extraído do texto original, com offsets de byte.
///
/// É a unidade de entrada do pipeline; o [`crate::token::Token`] rotulado é
/// produzido depois, pelo backend. Os offsets permitem reconstruir spans no
/// texto cru.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceToken {
    /// O texto do token (ex: "look", "'", "prêt-à-porter").
    pub text: String,
    /// Índice de byte inicial no texto original (inclusive).
    pub start: usize,
    /// Índice de byte final no texto original (exclusivo).
    pub end: usize,
    /// Índice sequencial do token (0, 1, 2...).
    pub index: usize,
}

/// Abreviações comuns do espanhol que mantêm o ponto colado.
const ABBREVIATIONS: &[&str] = &[
    "Sr", "Sra", "Srta", "Dr", "Dra", "Ud", "Uds", "Vd", "Vds", "D", "Dña",
    "etc", "pág", "págs", "núm", "tel", "av", "avda", "c", "art", "cap",
    "vol", "ej", "EE", "UU",
];

/// Tokeniza um texto em espanhol.
pub fn tokenize(text: &str) -> Vec<SourceToken> {
    let mut tokens = Vec::new();

    for (chunk_start, chunk) in whitespace_chunks(text) {
        if is_web_token(chunk) {
            push_token(&mut tokens, chunk.to_string(), chunk_start, chunk_start + chunk.len());
            continue;
        }
        tokenize_chunk(&mut tokens, chunk, chunk_start);
    }

    for (i, token) in tokens.iter_mut().enumerate() {
        token.index = i;
    }
    tokens
}

/// Atalho: apenas os textos dos tokens, para alimentar a extração de features.
pub fn tokenize_words(text: &str) -> Vec<String> {
    tokenize(text).into_iter().map(|t| t.text).collect()
}

/// Itera sobre os trechos não-brancos do texto com seus offsets de byte.
fn whitespace_chunks(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.split_whitespace()
        .scan(0usize, move |cursor, chunk| {
            // offset do chunk a partir da posição corrente (sem retroceder)
            let start = text[*cursor..].find(chunk).map(|p| *cursor + p)?;
            *cursor = start + chunk.len();
            Some((start, chunk))
        })
}

/// URLs, e-mails, hashtags e menções ficam inteiros.
fn is_web_token(chunk: &str) -> bool {
    chunk.starts_with("http://")
        || chunk.starts_with("https://")
        || chunk.starts_with("www.")
        || ((chunk.starts_with('#') || chunk.starts_with('@')) && chunk.len() > 1)
        || (chunk.contains('@') && chunk.contains('.') && !chunk.starts_with('@'))
}

/// Separa um trecho sem espaços em tokens de palavra e pontuação.
fn tokenize_chunk(tokens: &mut Vec<SourceToken>, chunk: &str, chunk_start: usize) {
    let chars: Vec<(usize, char)> = chunk.char_indices().collect();
    let mut current = String::new();
    let mut current_start = 0usize;

    let flush = |tokens: &mut Vec<SourceToken>, current: &mut String, start: usize, end: usize| {
        if !current.is_empty() {
            push_token(tokens, std::mem::take(current), chunk_start + start, chunk_start + end);
        }
    };

    let mut i = 0;
    while i < chars.len() {
        let (pos, ch) = chars[i];
        let next = chars.get(i + 1).map(|&(_, c)| c);

        if ch.is_alphanumeric() {
            if current.is_empty() {
                current_start = pos;
            }
            current.push(ch);
        } else if ch == '-' && !current.is_empty() && next.map(|c| c.is_alphanumeric()).unwrap_or(false)
        {
            // hífen interno: "prêt-à-porter"
            current.push(ch);
        } else if ch == '.' && !current.is_empty() {
            let is_abbrev = ABBREVIATIONS.contains(&current.as_str());
            let numeric_decimal = current.chars().all(|c| c.is_ascii_digit())
                && next.map(|c| c.is_ascii_digit()).unwrap_or(false);
            if is_abbrev || numeric_decimal {
                current.push('.');
            } else {
                flush(tokens, &mut current, current_start, pos);
                push_token(tokens, ".".to_string(), chunk_start + pos, chunk_start + pos + 1);
            }
        } else {
            // pontuação (incluindo aspas, ¿, ¡): token próprio
            flush(tokens, &mut current, current_start, pos);
            push_token(
                tokens,
                ch.to_string(),
                chunk_start + pos,
                chunk_start + pos + ch.len_utf8(),
            );
        }
        i += 1;
    }
    flush(tokens, &mut current, current_start, chunk.len());
}

fn push_token(tokens: &mut Vec<SourceToken>, text: String, start: usize, end: usize) {
    tokens.push(SourceToken {
        text,
        start,
        end,
        index: 0,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[SourceToken]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_tokenize_splits_quotes() {
        let tokens = tokenize("La 'app' de 'machine learning' mejora.");
        assert_eq!(
            texts(&tokens),
            vec!["La", "'", "app", "'", "de", "'", "machine", "learning", "'", "mejora", "."]
        );
    }

    #[test]
    fn test_tokenize_end_to_end_sentence() {
        // A sentença de referência do pipeline completo: 19 tokens.
        let tokens =
            tokenize("La 'app' de 'machine learning' fue un éxito en el festival de 'anime'");
        assert_eq!(
            texts(&tokens),
            vec![
                "La", "'", "app", "'", "de", "'", "machine", "learning", "'", "fue", "un",
                "éxito", "en", "el", "festival", "de", "'", "anime", "'"
            ]
        );
        assert_eq!(tokens[17].text, "anime");
    }

    #[test]
    fn test_tokenize_preserves_offsets() {
        let text = "El «look» retro";
        let tokens = tokenize(text);
        for token in &tokens {
            assert_eq!(&text[token.start..token.end], token.text);
        }
        let indices: Vec<usize> = tokens.iter().map(|t| t.index).collect();
        assert_eq!(indices, (0..tokens.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_tokenize_keeps_internal_hyphens() {
        let tokens = tokenize("la colección de prêt-à-porter.");
        assert!(texts(&tokens).contains(&"prêt-à-porter"));
    }

    #[test]
    fn test_tokenize_keeps_web_tokens_whole() {
        let tokens = tokenize("Síguenos en @revista con #moda o en https://ejemplo.es hoy");
        let texts = texts(&tokens);
        assert!(texts.contains(&"@revista"));
        assert!(texts.contains(&"#moda"));
        assert!(texts.contains(&"https://ejemplo.es"));
    }

    #[test]
    fn test_tokenize_spanish_punctuation() {
        let tokens = tokenize("¿Te gusta el running?");
        assert_eq!(texts(&tokens), vec!["¿", "Te", "gusta", "el", "running", "?"]);
    }

    #[test]
    fn test_tokenize_abbreviations_keep_dot() {
        let tokens = tokenize("El Sr. García llegó.");
        let texts = texts(&tokens);
        assert!(texts.contains(&"Sr."));
        assert!(texts.contains(&"."));
    }

    #[test]
    fn test_tokenize_empty_and_whitespace() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \n\t ").is_empty());
    }
}
