//! # Engenharia de Features para Detecção de Empréstimos
//!
//! Cada token é convertido em um mapa esparso de features que o tagger
//! estatístico consome. A extração é composta por unidades independentes
//! (uma por tipo de sinal) avaliadas dentro de uma **janela simétrica** ao
//! redor do token focal.
//!
//! ## Features Implementadas
//!
//! ### Ortográficas
//! - Texto do token, maiúsculas, titlecase, forma da palavra (shape)
//! - Trigramas de caracteres com sentinelas START/END
//! - Terminação (últimos 3 caracteres), dígitos, pontuação
//!
//! ### De contexto tipográfico
//! - Glifos de aspas na vizinhança (empréstimos aparecem muito entre aspas)
//! - URLs, e-mails, hashtags/menções (nunca são empréstimos)
//!
//! ### Lexicais (com recursos externos, ver [`crate::resources`])
//! - Pertencimento aos léxicos ES/EN
//! - Log-probabilidade sob modelos de trigramas de caracteres por língua
//! - Vetores de palavras
//!
//! As chaves são namespaced por extrator e offset (`"tok[-1]=de"`), então a
//! composição é insensível à ordem salvo colisão deliberada de chaves.

use std::collections::HashMap;

use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::resources::{CharNgramModel, Lexicon, WordVectors};
use crate::token::QUOTATION_MARKS;

/// Mapa esparso de features de uma posição: nome → peso.
///
/// A maioria das features é binária (1.0 presente / ausente), mas `f64`
/// permite features contínuas (log-probabilidades, componentes de embeddings).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureVector {
    /// O mapa de features ativas. Ex: `{"titlecase[0]": 1.0, "ending[0]=ing": 1.0}`.
    pub features: HashMap<String, f64>,
    /// Índice do token original na sentença.
    pub token_index: usize,
}

impl FeatureVector {
    pub fn new(token_index: usize) -> Self {
        Self {
            features: HashMap::new(),
            token_index,
        }
    }

    /// Adiciona uma feature com valor 1.0 (binária) ou customizado.
    pub fn insert(&mut self, key: impl Into<String>, value: f64) {
        self.features.insert(key.into(), value);
    }

    /// Produto escalar com um vetor de pesos (usado pelo CRF).
    pub fn dot(&self, weights: &HashMap<String, f64>) -> f64 {
        self.features
            .iter()
            .map(|(k, v)| v * weights.get(k).unwrap_or(&0.0))
            .sum()
    }
}

/// Uma unidade de extração de features.
///
/// Recebe o token observado, seu índice absoluto, o offset relativo ao token
/// focal (`0` para o próprio focal, negativo à esquerda, positivo à direita),
/// a sequência completa e o mapa de features **do token focal**, no qual pode
/// inserir zero ou mais entradas. Unidades que dependem de recursos (léxicos,
/// n-gramas, embeddings) os carregam na construção e só os leem depois.
pub trait FeatureExtractor: Send + Sync {
    fn extract(
        &self,
        token: &str,
        current_idx: usize,
        relative_idx: isize,
        tokens: &[String],
        features: &mut FeatureVector,
    );
}

/// Motor de extração janelada.
///
/// Para cada posição `i`, invoca cada unidade uma vez com offset 0 e uma vez
/// para cada vizinho existente dentro de `window_size` posições — sem
/// wraparound nem padding: offsets fora dos limites são simplesmente pulados.
pub struct WindowedTokenFeatureExtractor {
    extractors: Vec<Box<dyn FeatureExtractor>>,
    window_size: usize,
}

impl WindowedTokenFeatureExtractor {
    pub fn new(extractors: Vec<Box<dyn FeatureExtractor>>, window_size: usize) -> Self {
        Self {
            extractors,
            window_size,
        }
    }

    /// Produz um [`FeatureVector`] por posição da sequência.
    pub fn extract(&self, tokens: &[String]) -> Vec<FeatureVector> {
        let mut featurized = Vec::with_capacity(tokens.len());
        for i in 0..tokens.len() {
            let mut fv = FeatureVector::new(i);
            for extractor in &self.extractors {
                extractor.extract(&tokens[i], i, 0, tokens, &mut fv);
                for j in 1..=self.window_size {
                    if i >= j {
                        extractor.extract(&tokens[i - j], i - j, -(j as isize), tokens, &mut fv);
                    }
                    if i + j < tokens.len() {
                        extractor.extract(&tokens[i + j], i + j, j as isize, tokens, &mut fv);
                    }
                }
            }
            featurized.push(fv);
        }
        featurized
    }
}

/// Feature de viés: ativa uma única vez por posição.
pub struct BiasFeature;

impl FeatureExtractor for BiasFeature {
    fn extract(
        &self,
        _token: &str,
        _current_idx: usize,
        relative_idx: isize,
        _tokens: &[String],
        features: &mut FeatureVector,
    ) {
        if relative_idx == 0 {
            features.insert("bias", 1.0);
        }
    }
}

/// O texto do token em cada offset da janela.
pub struct TokenFeature;

impl FeatureExtractor for TokenFeature {
    fn extract(
        &self,
        token: &str,
        _current_idx: usize,
        relative_idx: isize,
        _tokens: &[String],
        features: &mut FeatureVector,
    ) {
        features.insert(format!("tok[{relative_idx}]={token}"), 1.0);
    }
}

/// Token inteiramente em maiúsculas (siglas: "NBA", "VIP").
pub struct UppercaseFeature;

impl FeatureExtractor for UppercaseFeature {
    fn extract(
        &self,
        token: &str,
        _current_idx: usize,
        relative_idx: isize,
        _tokens: &[String],
        features: &mut FeatureVector,
    ) {
        let has_alpha = token.chars().any(|c| c.is_alphabetic());
        if has_alpha && token.chars().all(|c| !c.is_alphabetic() || c.is_uppercase()) {
            features.insert(format!("uppercase[{relative_idx}]"), 1.0);
        }
    }
}

/// Token em titlecase (primeira maiúscula, demais minúsculas).
pub struct TitlecaseFeature;

impl FeatureExtractor for TitlecaseFeature {
    fn extract(
        &self,
        token: &str,
        _current_idx: usize,
        relative_idx: isize,
        _tokens: &[String],
        features: &mut FeatureVector,
    ) {
        let mut chars = token.chars();
        let first_upper = chars.next().map(|c| c.is_uppercase()).unwrap_or(false);
        if first_upper && chars.all(|c| !c.is_alphabetic() || c.is_lowercase()) {
            features.insert(format!("titlecase[{relative_idx}]"), 1.0);
        }
    }
}

/// Trigramas de caracteres do token focal, com sentinelas nas bordas.
///
/// É a feature ortográfica central para o domínio: sequências como "sh",
/// "ing" ou "ck" quase não ocorrem no espanhol patrimonial.
pub struct TrigramFeature;

impl FeatureExtractor for TrigramFeature {
    fn extract(
        &self,
        token: &str,
        _current_idx: usize,
        relative_idx: isize,
        _tokens: &[String],
        features: &mut FeatureVector,
    ) {
        if relative_idx != 0 {
            return;
        }
        let graphemes: Vec<&str> = token.graphemes(true).collect();
        if graphemes.len() < 2 {
            return;
        }
        let first = format!("START{}{}", graphemes[0], graphemes[1]);
        features.insert(format!("trigram[{relative_idx}]={first}"), 1.0);
        for window in graphemes.windows(3) {
            let tri = format!("{}{}{}", window[0], window[1], window[2]);
            features.insert(format!("trigram[{relative_idx}]={tri}"), 1.0);
        }
        let last = format!(
            "{}{}END",
            graphemes[graphemes.len() - 2],
            graphemes[graphemes.len() - 1]
        );
        features.insert(format!("trigram[{relative_idx}]={last}"), 1.0);
    }
}

/// Glifo de aspas em qualquer offset da janela.
pub struct QuotationFeature;

impl FeatureExtractor for QuotationFeature {
    fn extract(
        &self,
        token: &str,
        _current_idx: usize,
        relative_idx: isize,
        _tokens: &[String],
        features: &mut FeatureVector,
    ) {
        if QUOTATION_MARKS.contains(&token) {
            features.insert(format!("quot[{relative_idx}]"), 1.0);
        }
    }
}

/// Terminação do token focal (últimos 3 caracteres).
pub struct WordEndingFeature;

impl FeatureExtractor for WordEndingFeature {
    fn extract(
        &self,
        token: &str,
        _current_idx: usize,
        relative_idx: isize,
        _tokens: &[String],
        features: &mut FeatureVector,
    ) {
        if relative_idx != 0 {
            return;
        }
        let graphemes: Vec<&str> = token.graphemes(true).collect();
        let start = graphemes.len().saturating_sub(3);
        let ending: String = graphemes[start..].concat();
        features.insert(format!("ending[{relative_idx}]={}", ending.to_lowercase()), 1.0);
    }
}

/// Forma da palavra: maiúscula → `X`, minúscula → `x`, dígito → `0`.
///
/// Sequências do mesmo símbolo são truncadas em 4, então "streaming" e
/// "marketing" compartilham a forma `xxxx`.
pub struct WordShapeFeature;

impl FeatureExtractor for WordShapeFeature {
    fn extract(
        &self,
        token: &str,
        _current_idx: usize,
        relative_idx: isize,
        _tokens: &[String],
        features: &mut FeatureVector,
    ) {
        let mut shape = String::new();
        let mut last: Option<char> = None;
        let mut run = 0usize;
        for c in token.chars() {
            let symbol = if c.is_uppercase() {
                'X'
            } else if c.is_lowercase() {
                'x'
            } else if c.is_ascii_digit() {
                '0'
            } else {
                c
            };
            if last == Some(symbol) {
                run += 1;
                if run > 4 {
                    continue;
                }
            } else {
                last = Some(symbol);
                run = 1;
            }
            shape.push(symbol);
        }
        features.insert(format!("shape[{relative_idx}]={shape}"), 1.0);
    }
}

/// Token inteiramente composto de pontuação.
pub struct PunctuationFeature;

impl FeatureExtractor for PunctuationFeature {
    fn extract(
        &self,
        token: &str,
        _current_idx: usize,
        relative_idx: isize,
        _tokens: &[String],
        features: &mut FeatureVector,
    ) {
        if !token.is_empty() && token.chars().all(|c| c.is_ascii_punctuation() || "¿¡«»“”‘’…".contains(c)) {
            features.insert(format!("punc[{relative_idx}]"), 1.0);
        }
    }
}

/// Token contendo dígitos.
pub struct DigitFeature;

impl FeatureExtractor for DigitFeature {
    fn extract(
        &self,
        token: &str,
        _current_idx: usize,
        relative_idx: isize,
        _tokens: &[String],
        features: &mut FeatureVector,
    ) {
        if token.chars().any(|c| c.is_ascii_digit()) {
            features.insert(format!("digit[{relative_idx}]"), 1.0);
        }
    }
}

/// Token focal com cara de URL.
pub struct UrlFeature {
    re: Regex,
}

impl UrlFeature {
    pub fn new() -> Self {
        Self {
            re: Regex::new(r"^(https?://|www\.)\S+$").expect("regex de URL válida"),
        }
    }
}

impl Default for UrlFeature {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureExtractor for UrlFeature {
    fn extract(
        &self,
        token: &str,
        _current_idx: usize,
        relative_idx: isize,
        _tokens: &[String],
        features: &mut FeatureVector,
    ) {
        if relative_idx == 0 && self.re.is_match(token) {
            features.insert(format!("url[{relative_idx}]"), 1.0);
        }
    }
}

/// Token focal com cara de e-mail.
pub struct EmailFeature {
    re: Regex,
}

impl EmailFeature {
    pub fn new() -> Self {
        Self {
            re: Regex::new(r"^[\w.+-]+@[\w-]+\.[\w.-]+$").expect("regex de e-mail válida"),
        }
    }
}

impl Default for EmailFeature {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureExtractor for EmailFeature {
    fn extract(
        &self,
        token: &str,
        _current_idx: usize,
        relative_idx: isize,
        _tokens: &[String],
        features: &mut FeatureVector,
    ) {
        if relative_idx == 0 && self.re.is_match(token) {
            features.insert(format!("email[{relative_idx}]"), 1.0);
        }
    }
}

/// Hashtag ou menção do Twitter no token focal.
pub struct TwitterFeature;

impl FeatureExtractor for TwitterFeature {
    fn extract(
        &self,
        token: &str,
        _current_idx: usize,
        relative_idx: isize,
        _tokens: &[String],
        features: &mut FeatureVector,
    ) {
        if relative_idx == 0 && (token.starts_with('#') || token.starts_with('@')) && token.len() > 1
        {
            features.insert(format!("twitter[{relative_idx}]"), 1.0);
        }
    }
}

/// Pertencimento do token focal a um léxico.
pub struct LexiconFeature {
    lexicon: Lexicon,
}

impl LexiconFeature {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }
}

impl FeatureExtractor for LexiconFeature {
    fn extract(
        &self,
        token: &str,
        _current_idx: usize,
        relative_idx: isize,
        _tokens: &[String],
        features: &mut FeatureVector,
    ) {
        if relative_idx == 0 && self.lexicon.contains(token) {
            features.insert(format!("in_dict_{}[{relative_idx}]", self.lexicon.lang), 1.0);
        }
    }
}

/// Log-probabilidade do token sob um modelo de trigramas de caracteres.
///
/// Feature contínua, emitida em todos os offsets da janela — o contexto
/// imediato de um empréstimo também tende a ter ortografia nativa.
pub struct CharNgramLogProbFeature {
    model: CharNgramModel,
}

impl CharNgramLogProbFeature {
    pub fn new(model: CharNgramModel) -> Self {
        Self { model }
    }
}

impl FeatureExtractor for CharNgramLogProbFeature {
    fn extract(
        &self,
        token: &str,
        _current_idx: usize,
        relative_idx: isize,
        _tokens: &[String],
        features: &mut FeatureVector,
    ) {
        features.insert(
            format!("{}_logprob[{relative_idx}]", self.model.lang),
            self.model.word_log_prob(token),
        );
    }
}

/// Compara a plausibilidade ortográfica do token entre inglês e espanhol.
pub struct HigherEnglishProbFeature {
    model_en: CharNgramModel,
    model_es: CharNgramModel,
}

impl HigherEnglishProbFeature {
    pub fn new(model_en: CharNgramModel, model_es: CharNgramModel) -> Self {
        Self { model_en, model_es }
    }
}

impl FeatureExtractor for HigherEnglishProbFeature {
    fn extract(
        &self,
        token: &str,
        _current_idx: usize,
        relative_idx: isize,
        _tokens: &[String],
        features: &mut FeatureVector,
    ) {
        if relative_idx == 0
            && self.model_en.word_log_prob(token) > self.model_es.word_log_prob(token)
        {
            features.insert(format!("en_logprob_higher[{relative_idx}]"), 1.0);
        }
    }
}

/// Componentes do vetor de palavra do token focal, com fator de escala.
pub struct WordVectorFeature {
    vectors: WordVectors,
    scale: f64,
}

impl WordVectorFeature {
    pub fn new(vectors: WordVectors, scale: f64) -> Self {
        Self { vectors, scale }
    }
}

impl FeatureExtractor for WordVectorFeature {
    fn extract(
        &self,
        token: &str,
        _current_idx: usize,
        relative_idx: isize,
        _tokens: &[String],
        features: &mut FeatureVector,
    ) {
        if relative_idx != 0 {
            return;
        }
        for (i, value) in self.vectors.get(token).into_iter().enumerate() {
            features.insert(format!("v{i}"), value * self.scale);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn to_strings(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    /// Extrator que apenas conta quantas vezes foi invocado.
    struct CountingExtractor {
        calls: AtomicUsize,
    }

    impl FeatureExtractor for CountingExtractor {
        fn extract(
            &self,
            _token: &str,
            _current_idx: usize,
            relative_idx: isize,
            _tokens: &[String],
            features: &mut FeatureVector,
        ) {
            self.calls.fetch_add(1, Ordering::Relaxed);
            features.insert(format!("seen[{relative_idx}]"), 1.0);
        }
    }

    #[test]
    fn test_window_single_token_invokes_once() {
        // Sequência de 1 token com janela 2: só o offset 0 existe.
        let extractor = WindowedTokenFeatureExtractor::new(
            vec![Box::new(CountingExtractor { calls: AtomicUsize::new(0) })],
            2,
        );
        let fvs = extractor.extract(&to_strings(&["look"]));
        assert_eq!(fvs.len(), 1);
        assert_eq!(fvs[0].features.len(), 1);
        assert!(fvs[0].features.contains_key("seen[0]"));
    }

    #[test]
    fn test_window_offsets_respect_bounds() {
        let extractor = WindowedTokenFeatureExtractor::new(vec![Box::new(TokenFeature)], 2);
        let fvs = extractor.extract(&to_strings(&["el", "look", "sencillo"]));

        // Posição 0: sem vizinhos à esquerda.
        assert!(fvs[0].features.contains_key("tok[0]=el"));
        assert!(fvs[0].features.contains_key("tok[1]=look"));
        assert!(fvs[0].features.contains_key("tok[2]=sencillo"));
        assert!(!fvs[0].features.keys().any(|k| k.starts_with("tok[-")));

        // Posição 1: um vizinho de cada lado.
        assert!(fvs[1].features.contains_key("tok[-1]=el"));
        assert!(fvs[1].features.contains_key("tok[1]=sencillo"));
    }

    #[test]
    fn test_extraction_is_aligned_with_input() {
        let extractor = WindowedTokenFeatureExtractor::new(vec![Box::new(BiasFeature)], 2);
        let fvs = extractor.extract(&to_strings(&["a", "b", "c"]));
        for (i, fv) in fvs.iter().enumerate() {
            assert_eq!(fv.token_index, i);
            assert_eq!(fv.features.get("bias"), Some(&1.0));
        }
    }

    #[test]
    fn test_empty_sequence_yields_no_vectors() {
        let extractor = WindowedTokenFeatureExtractor::new(vec![Box::new(BiasFeature)], 2);
        assert!(extractor.extract(&[]).is_empty());
    }

    #[test]
    fn test_trigram_feature_with_sentinels() {
        let mut fv = FeatureVector::new(0);
        TrigramFeature.extract("look", 0, 0, &to_strings(&["look"]), &mut fv);
        assert!(fv.features.contains_key("trigram[0]=STARTlo"));
        assert!(fv.features.contains_key("trigram[0]=loo"));
        assert!(fv.features.contains_key("trigram[0]=ook"));
        assert!(fv.features.contains_key("trigram[0]=okEND"));
    }

    #[test]
    fn test_trigram_skips_neighbors_and_short_tokens() {
        let mut fv = FeatureVector::new(0);
        TrigramFeature.extract("look", 1, -1, &to_strings(&["look", "x"]), &mut fv);
        assert!(fv.features.is_empty());
        TrigramFeature.extract("a", 0, 0, &to_strings(&["a"]), &mut fv);
        assert!(fv.features.is_empty());
    }

    #[test]
    fn test_word_ending_feature() {
        let mut fv = FeatureVector::new(0);
        WordEndingFeature.extract("marketing", 0, 0, &to_strings(&["marketing"]), &mut fv);
        assert!(fv.features.contains_key("ending[0]=ing"));
    }

    #[test]
    fn test_shape_feature_collapses_runs() {
        let mut fv = FeatureVector::new(0);
        WordShapeFeature.extract("Streaming", 0, 0, &to_strings(&["Streaming"]), &mut fv);
        assert!(fv.features.contains_key("shape[0]=Xxxxx"));

        let mut fv = FeatureVector::new(0);
        WordShapeFeature.extract("MP3", 0, 0, &to_strings(&["MP3"]), &mut fv);
        assert!(fv.features.contains_key("shape[0]=XX0"));
    }

    #[test]
    fn test_quotation_feature_any_offset() {
        let mut fv = FeatureVector::new(1);
        QuotationFeature.extract("'", 0, -1, &to_strings(&["'", "look"]), &mut fv);
        assert!(fv.features.contains_key("quot[-1]"));
    }

    #[test]
    fn test_case_features() {
        let mut fv = FeatureVector::new(0);
        UppercaseFeature.extract("NBA", 0, 0, &to_strings(&["NBA"]), &mut fv);
        assert!(fv.features.contains_key("uppercase[0]"));

        let mut fv = FeatureVector::new(0);
        TitlecaseFeature.extract("Look", 0, 0, &to_strings(&["Look"]), &mut fv);
        assert!(fv.features.contains_key("titlecase[0]"));

        let mut fv = FeatureVector::new(0);
        TitlecaseFeature.extract("LOOK", 0, 0, &to_strings(&["LOOK"]), &mut fv);
        assert!(!fv.features.contains_key("titlecase[0]"));
    }

    #[test]
    fn test_web_features() {
        let tokens = to_strings(&["https://ejemplo.es", "ana@mail.com", "#trending", "hola"]);
        let url = UrlFeature::new();
        let email = EmailFeature::new();

        let mut fv = FeatureVector::new(0);
        url.extract(&tokens[0], 0, 0, &tokens, &mut fv);
        assert!(fv.features.contains_key("url[0]"));

        let mut fv = FeatureVector::new(1);
        email.extract(&tokens[1], 1, 0, &tokens, &mut fv);
        assert!(fv.features.contains_key("email[0]"));

        let mut fv = FeatureVector::new(2);
        TwitterFeature.extract(&tokens[2], 2, 0, &tokens, &mut fv);
        assert!(fv.features.contains_key("twitter[0]"));

        let mut fv = FeatureVector::new(3);
        url.extract(&tokens[3], 3, 0, &tokens, &mut fv);
        email.extract(&tokens[3], 3, 0, &tokens, &mut fv);
        TwitterFeature.extract(&tokens[3], 3, 0, &tokens, &mut fv);
        assert!(fv.features.is_empty());
    }

    #[test]
    fn test_lexicon_feature_uses_lang_in_key() {
        let lexicon = Lexicon::from_words("en", ["look", "software"]);
        let feature = LexiconFeature::new(lexicon);
        let tokens = to_strings(&["look"]);

        let mut fv = FeatureVector::new(0);
        feature.extract("look", 0, 0, &tokens, &mut fv);
        assert!(fv.features.contains_key("in_dict_en[0]"));
    }

    #[test]
    fn test_word_vector_feature_scaling() {
        let vectors = WordVectors::from_entries(vec![("look".to_string(), vec![2.0, -4.0])]);
        let feature = WordVectorFeature::new(vectors, 0.5);
        let tokens = to_strings(&["look"]);

        let mut fv = FeatureVector::new(0);
        feature.extract("look", 0, 0, &tokens, &mut fv);
        assert_eq!(fv.features.get("v0"), Some(&1.0));
        assert_eq!(fv.features.get("v1"), Some(&-2.0));
    }
}
