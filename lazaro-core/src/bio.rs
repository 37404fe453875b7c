//! # Esquema de Tags BIO para Empréstimos Lexicais
//!
//! Define o esquema de anotação **BIO** (Beginning-Inside-Outside) usado para
//! rotular tokens na detecção de empréstimos, e as operações estruturais
//! sobre sequências de rótulos: reparação de sequências malformadas e
//! conversão para o esquema BILOU.
//!
//! ## Categorias
//!
//! | Tipo  | Significado                       | Exemplos                    |
//! |-------|-----------------------------------|-----------------------------|
//! | ENG   | Empréstimo do inglês (anglicismo) | look, app, machine learning |
//! | OTHER | Empréstimo de outra língua        | anime, prêt-à-porter        |
//! | O     | Fora de empréstimo                | (palavra patrimonial)       |
//!
//! ## Esquema BIO
//!
//! - `B-TIPO`: Begin — primeiro token de um empréstimo
//! - `I-TIPO`: Inside — tokens subsequentes do mesmo empréstimo
//! - `O`: Outside — não faz parte de empréstimo algum

use serde::{Deserialize, Serialize};

/// Língua de origem de um empréstimo, conforme o sufixo da tag.
///
/// O vocabulário de tipos é fechado: o que não for reconhecido como inglês
/// cai em `Other` — é o mesmo mapeamento com default aplicado por
/// [`type_to_language`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BorrowingLang {
    /// **Inglês**: a categoria central do sistema. Ex: "software", "look".
    Eng,
    /// **Outra língua**: galicismos, japonismos etc. Ex: "anime", "ballet".
    Other,
}

impl BorrowingLang {
    /// Nome do tipo como sufixo de tag (ex: "ENG").
    pub fn name(&self) -> &'static str {
        match self {
            BorrowingLang::Eng => "ENG",
            BorrowingLang::Other => "OTHER",
        }
    }

    /// Código de língua normalizado exposto ao chamador.
    pub fn iso_code(&self) -> &'static str {
        match self {
            BorrowingLang::Eng => "en",
            BorrowingLang::Other => "other",
        }
    }

    /// Tenta parsear a partir do sufixo de tag (ex: "ENG" → Some(Eng)).
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "ENG" => Some(BorrowingLang::Eng),
            "OTHER" => Some(BorrowingLang::Other),
            _ => None,
        }
    }
}

/// Mapeia o sufixo de tipo de uma tag para o código de língua normalizado.
///
/// Função pura com fallback constante: `"ENG"` (em qualquer caixa) vira
/// `"en"`; qualquer outro tipo, reconhecido ou não, vira `"other"`.
pub fn type_to_language(lang_label: &str) -> &'static str {
    if lang_label.eq_ignore_ascii_case("ENG") {
        "en"
    } else {
        "other"
    }
}

/// Tag BIO aplicada a um token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    /// **Begin**: marca o INÍCIO de um empréstimo. Ex: **machine** (B-ENG) learning.
    Begin(BorrowingLang),
    /// **Inside**: marca a CONTINUAÇÃO de um empréstimo. Ex: machine **learning** (I-ENG).
    Inside(BorrowingLang),
    /// **Outside**: o token não faz parte de empréstimo algum.
    Outside,
}

impl Tag {
    /// Representação textual da tag (ex: "B-ENG", "I-OTHER", "O").
    pub fn label(&self) -> String {
        match self {
            Tag::Begin(lang) => format!("B-{}", lang.name()),
            Tag::Inside(lang) => format!("I-{}", lang.name()),
            Tag::Outside => "O".to_string(),
        }
    }

    /// Índice numérico da tag para as matrizes do CRF/Viterbi.
    pub fn index(&self) -> usize {
        match self {
            Tag::Outside => 0,
            Tag::Begin(BorrowingLang::Eng) => 1,
            Tag::Inside(BorrowingLang::Eng) => 2,
            Tag::Begin(BorrowingLang::Other) => 3,
            Tag::Inside(BorrowingLang::Other) => 4,
        }
    }

    /// Número total de tags possíveis.
    pub const COUNT: usize = 5;

    /// Todas as tags em ordem de índice (para iteração).
    pub fn all() -> [Tag; 5] {
        [
            Tag::Outside,
            Tag::Begin(BorrowingLang::Eng),
            Tag::Inside(BorrowingLang::Eng),
            Tag::Begin(BorrowingLang::Other),
            Tag::Inside(BorrowingLang::Other),
        ]
    }

    /// Retorna a língua desta tag (se for B- ou I-).
    pub fn lang(&self) -> Option<BorrowingLang> {
        match self {
            Tag::Begin(l) | Tag::Inside(l) => Some(*l),
            Tag::Outside => None,
        }
    }

    /// Verifica se a transição `prev → next` é válida no esquema BIO.
    ///
    /// Regras:
    /// - `I-X` só pode seguir `B-X` ou `I-X` da mesma língua
    /// - `B-X` e `O` podem seguir qualquer tag
    pub fn is_valid_transition(prev: &Tag, next: &Tag) -> bool {
        match next {
            Tag::Inside(lang) => match prev {
                Tag::Begin(prev_lang) | Tag::Inside(prev_lang) => prev_lang == lang,
                _ => false,
            },
            _ => true,
        }
    }

    /// Parseia uma tag a partir de string (ex: "B-ENG" → Begin(Eng)).
    pub fn from_label(s: &str) -> Option<Self> {
        if s == "O" {
            return Some(Tag::Outside);
        }
        let (bio, lang) = s.split_once('-')?;
        let lang = BorrowingLang::from_name(lang)?;
        match bio {
            "B" => Some(Tag::Begin(lang)),
            "I" => Some(Tag::Inside(lang)),
            _ => None,
        }
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Repara uma sequência bruta de rótulos BIO possivelmente malformada.
///
/// Modelos imperfeitos podem emitir um `I-TIPO` órfão — sem um `B-TIPO` ou
/// `I-TIPO` da mesma língua imediatamente antes. A reparação promove esse
/// `I-TIPO` a `B-TIPO` (início de novo span); rótulos `O` e `B` nunca são
/// reescritos.
///
/// Propriedades:
/// - preserva o comprimento da entrada;
/// - é idempotente: `repair(repair(x)) == repair(x)`;
/// - na saída, todo `I-TIPO` é precedido por `B-TIPO` ou `I-TIPO` do mesmo tipo.
///
/// Deve rodar **antes** da fusão de spans ([`crate::borrowing::fuse_spans`]).
pub fn repair_labels<S: AsRef<str>>(labels: &[S]) -> Vec<String> {
    let mut repaired: Vec<String> = Vec::with_capacity(labels.len());

    for (i, label) in labels.iter().enumerate() {
        let label = label.as_ref();
        if let Some(lang) = label.strip_prefix("I-") {
            // O antecessor relevante é o rótulo JÁ reparado, não o bruto.
            let valid_predecessor = i > 0 && {
                let prev = &repaired[i - 1];
                prev.strip_prefix("B-") == Some(lang) || prev.strip_prefix("I-") == Some(lang)
            };
            if valid_predecessor {
                repaired.push(label.to_string());
            } else {
                repaired.push(format!("B-{lang}"));
            }
        } else {
            repaired.push(label.to_string());
        }
    }

    repaired
}

/// Converte uma sequência BIO em BILOU (Begin-Inside-Last-Outside-Unit).
///
/// Útil para interoperar com ferramentas que consomem spans no esquema BILOU:
/// um `B` sem `I` seguinte vira `U` (unitário); um `I` sem `I` seguinte vira
/// `L` (último do span).
pub fn to_bilou<S: AsRef<str>>(labels: &[S]) -> Vec<String> {
    let mut converted = Vec::with_capacity(labels.len());
    for (i, label) in labels.iter().enumerate() {
        let label = label.as_ref();
        let next_is_inside = labels
            .get(i + 1)
            .map(|next| next.as_ref().starts_with('I'))
            .unwrap_or(false);
        if let Some(rest) = label.strip_prefix('B') {
            if next_is_inside {
                converted.push(label.to_string());
            } else {
                converted.push(format!("U{rest}"));
            }
        } else if let Some(rest) = label.strip_prefix('I') {
            if next_is_inside {
                converted.push(label.to_string());
            } else {
                converted.push(format!("L{rest}"));
            }
        } else {
            converted.push(label.to_string());
        }
    }
    converted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_labels() {
        assert_eq!(Tag::Outside.label(), "O");
        assert_eq!(Tag::Begin(BorrowingLang::Eng).label(), "B-ENG");
        assert_eq!(Tag::Inside(BorrowingLang::Other).label(), "I-OTHER");
    }

    #[test]
    fn test_tag_from_label_roundtrip() {
        for tag in Tag::all() {
            assert_eq!(Tag::from_label(&tag.label()), Some(tag));
        }
        assert_eq!(Tag::from_label("B-XYZ"), None);
    }

    #[test]
    fn test_valid_transitions() {
        let b_eng = Tag::Begin(BorrowingLang::Eng);
        let i_eng = Tag::Inside(BorrowingLang::Eng);
        let i_other = Tag::Inside(BorrowingLang::Other);
        assert!(Tag::is_valid_transition(&b_eng, &i_eng));
        assert!(Tag::is_valid_transition(&i_eng, &i_eng));
        assert!(!Tag::is_valid_transition(&Tag::Outside, &i_eng));
        assert!(!Tag::is_valid_transition(&b_eng, &i_other));
        assert!(Tag::is_valid_transition(&Tag::Outside, &b_eng));
    }

    #[test]
    fn test_type_to_language() {
        assert_eq!(type_to_language("ENG"), "en");
        assert_eq!(type_to_language("eng"), "en");
        assert_eq!(type_to_language("OTHER"), "other");
        assert_eq!(type_to_language("FRA"), "other");
        assert_eq!(type_to_language(""), "other");
    }

    #[test]
    fn test_repair_promotes_orphan_inside() {
        let raw = ["O", "I-ENG", "I-ENG", "O"];
        let repaired = repair_labels(&raw);
        assert_eq!(repaired, vec!["O", "B-ENG", "I-ENG", "O"]);
    }

    #[test]
    fn test_repair_inside_after_other_type() {
        // I-ENG depois de B-OTHER é órfão: vira B-ENG.
        let raw = ["B-OTHER", "I-ENG"];
        assert_eq!(repair_labels(&raw), vec!["B-OTHER", "B-ENG"]);
    }

    #[test]
    fn test_repair_keeps_wellformed_sequence() {
        let raw = ["O", "B-ENG", "I-ENG", "O", "B-OTHER"];
        assert_eq!(repair_labels(&raw), raw);
    }

    #[test]
    fn test_repair_initial_inside() {
        let raw = ["I-OTHER", "I-OTHER"];
        assert_eq!(repair_labels(&raw), vec!["B-OTHER", "I-OTHER"]);
    }

    #[test]
    fn test_repair_is_idempotent() {
        let cases: Vec<Vec<&str>> = vec![
            vec![],
            vec!["I-ENG"],
            vec!["O", "I-ENG", "I-OTHER", "I-OTHER", "B-ENG", "I-ENG"],
            vec!["I-ENG", "I-ENG", "O", "I-ENG"],
        ];
        for case in cases {
            let once = repair_labels(&case);
            let twice = repair_labels(&once);
            assert_eq!(once, twice, "repair não idempotente em {case:?}");
        }
    }

    #[test]
    fn test_repair_output_is_wellformed() {
        let raw = ["I-ENG", "O", "I-OTHER", "I-ENG", "I-ENG"];
        let repaired = repair_labels(&raw);
        for i in 0..repaired.len() {
            if let Some(lang) = repaired[i].strip_prefix("I-") {
                assert!(i > 0, "I- na posição inicial");
                let prev = &repaired[i - 1];
                assert!(
                    prev.strip_prefix("B-") == Some(lang)
                        || prev.strip_prefix("I-") == Some(lang),
                    "I-{lang} sem antecessor válido: {repaired:?}"
                );
            }
        }
    }

    #[test]
    fn test_repair_empty_input() {
        let raw: [&str; 0] = [];
        assert!(repair_labels(&raw).is_empty());
    }

    #[test]
    fn test_to_bilou() {
        let bio = ["B-ENG", "O", "B-ENG", "I-ENG", "O", "B-OTHER", "I-OTHER", "I-OTHER"];
        let bilou = to_bilou(&bio);
        assert_eq!(
            bilou,
            vec!["U-ENG", "O", "B-ENG", "L-ENG", "O", "B-OTHER", "I-OTHER", "L-OTHER"]
        );
    }
}
