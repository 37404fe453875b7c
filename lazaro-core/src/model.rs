//! # Modelo Padrão de Detecção de Empréstimos
//!
//! Agrega tudo que o backend CRF embutido precisa para funcionar sem
//! artefatos externos:
//!
//! - **Léxicos semente** ES/EN embutidos no binário
//! - **Modelos de trigramas de caracteres** estimados desses léxicos
//! - **Pilha padrão de extratores** de features
//! - **Pesos CRF heurísticos** refinados por algumas épocas de perceptron
//!   sobre o corpus anotado embutido
//!
//! ## Como os pesos foram derivados
//!
//! Os pesos iniciais codificam intuições linguísticas sobre anglicismos no
//! espanhol (terminações "-ing", grafias com "k"/"w", pertencimento ao
//! léxico inglês, aspas na vizinhança). O treino por perceptron sobre o
//! corpus embutido ajusta esses chutes aos padrões realmente observados.

use tracing::info;

use crate::bio::{BorrowingLang, Tag};
use crate::corpus::get_corpus;
use crate::crf::CrfModel;
use crate::features::{
    BiasFeature, CharNgramLogProbFeature, DigitFeature, EmailFeature, FeatureExtractor,
    HigherEnglishProbFeature, LexiconFeature, PunctuationFeature, QuotationFeature,
    TitlecaseFeature, TokenFeature, TrigramFeature, TwitterFeature, UppercaseFeature,
    UrlFeature, WindowedTokenFeatureExtractor, WordEndingFeature, WordShapeFeature,
};
use crate::resources::{CharNgramModel, Lexicon};

/// Tamanho de janela padrão da extração de features.
pub const DEFAULT_WINDOW_SIZE: usize = 2;

/// Léxico espanhol semente: vocabulário patrimonial frequente.
pub fn seed_spanish_lexicon() -> Lexicon {
    Lexicon::from_words(
        "es",
        [
            "el", "la", "los", "las", "un", "una", "unos", "unas", "de", "del",
            "en", "con", "por", "para", "que", "como", "pero", "aunque", "entre",
            "casa", "cosa", "mesa", "tiempo", "año", "día", "vida", "mundo",
            "gente", "persona", "trabajo", "ciudad", "palabra", "lengua",
            "hablar", "decir", "hacer", "tener", "poder", "llevar", "llegar",
            "pasar", "quedar", "poner", "parecer", "seguir", "encontrar",
            "nuevo", "nueva", "grande", "pequeño", "bueno", "buena", "mismo",
            "también", "ahora", "siempre", "nunca", "mucho", "poco", "sencillo",
            "moda", "estilo", "serie", "japonesa", "española", "primavera",
            "aplicación", "mercadotecnia", "tendencia", "revista", "canción",
        ],
    )
}

/// Léxico inglês semente: anglicismos frequentes na imprensa espanhola.
pub fn seed_english_lexicon() -> Lexicon {
    Lexicon::from_words(
        "en",
        [
            "look", "app", "software", "hardware", "marketing", "streaming",
            "running", "casting", "catering", "coaching", "crowdfunding",
            "machine", "learning", "big", "data", "cloud", "online", "offline",
            "smartphone", "tablet", "email", "spam", "hashtag", "influencer",
            "follower", "like", "show", "reality", "prime", "time", "spoiler",
            "fake", "news", "community", "manager", "startup", "business",
            "fashion", "fitness", "gym", "crossfit", "feeling", "hobby",
            "ranking", "record", "sponsor", "training", "coach", "team",
            "smart", "working", "delivery", "pack", "ticket", "parking",
        ],
    )
}

/// A pilha padrão de extratores sobre os léxicos semente.
pub fn default_extractors() -> Vec<Box<dyn FeatureExtractor>> {
    let es = seed_spanish_lexicon();
    let en = seed_english_lexicon();
    let model_es = CharNgramModel::from_lexicon(&es);
    let model_en = CharNgramModel::from_lexicon(&en);

    vec![
        Box::new(BiasFeature),
        Box::new(TokenFeature),
        Box::new(UppercaseFeature),
        Box::new(TitlecaseFeature),
        Box::new(TrigramFeature),
        Box::new(QuotationFeature),
        Box::new(WordEndingFeature),
        Box::new(WordShapeFeature),
        Box::new(PunctuationFeature),
        Box::new(DigitFeature),
        Box::new(UrlFeature::new()),
        Box::new(EmailFeature::new()),
        Box::new(TwitterFeature),
        Box::new(LexiconFeature::new(es)),
        Box::new(LexiconFeature::new(en)),
        Box::new(CharNgramLogProbFeature::new(model_es)),
        Box::new(CharNgramLogProbFeature::new(model_en.clone())),
        Box::new(HigherEnglishProbFeature::new(
            model_en,
            CharNgramModel::from_lexicon(&seed_spanish_lexicon()),
        )),
    ]
}

/// O extrator janelado padrão (janela de [`DEFAULT_WINDOW_SIZE`]).
pub fn default_feature_extractor() -> WindowedTokenFeatureExtractor {
    WindowedTokenFeatureExtractor::new(default_extractors(), DEFAULT_WINDOW_SIZE)
}

/// Constrói o CRF padrão: pesos heurísticos + refino sobre o corpus embutido.
pub fn build_default_model() -> CrfModel {
    let mut model = build_heuristic_weights();
    refine_on_corpus(&mut model);
    info!("modelo padrão de empréstimos construído");
    model
}

/// Pesos CRF heurísticos, sem treino.
///
/// # Intuições codificadas
/// - Palavra no léxico inglês (`in_dict_en[0]`) → forte sinal de `B-ENG` (+4.0)
/// - Terminação "-ing" → quase sempre anglicismo (+3.0)
/// - Aspas imediatamente antes/depois → empréstimos vêm muito entre aspas
/// - Pontuação ou dígito → `O` com folga
fn build_heuristic_weights() -> CrfModel {
    let mut model = CrfModel::new();

    let b_eng = Tag::Begin(BorrowingLang::Eng);
    let i_eng = Tag::Inside(BorrowingLang::Eng);
    let b_other = Tag::Begin(BorrowingLang::Other);
    let i_other = Tag::Inside(BorrowingLang::Other);
    let outside = Tag::Outside;

    // --- Léxicos: o sinal mais forte ---
    model.set_emission("in_dict_en[0]", &b_eng, 4.0);
    model.set_emission("in_dict_en[0]", &i_eng, 2.0);
    model.set_emission("in_dict_en[0]", &outside, -2.0);
    model.set_emission("in_dict_en[-1]", &i_eng, 2.5);
    model.set_emission("in_dict_es[0]", &outside, 3.0);
    model.set_emission("in_dict_es[0]", &b_eng, -2.0);
    model.set_emission("in_dict_es[0]", &b_other, -2.0);

    // --- Ortografia inglesa ---
    model.set_emission("ending[0]=ing", &b_eng, 3.0);
    model.set_emission("ending[0]=ing", &i_eng, 1.5);
    for ending in ["ock", "ack", "eck"] {
        model.set_emission(&format!("ending[0]={ending}"), &b_eng, 1.5);
    }
    for trigram in ["sho", "wha", "wee", "ook"] {
        model.set_emission(&format!("trigram[0]={trigram}"), &b_eng, 1.0);
    }
    model.set_emission("en_logprob_higher[0]", &b_eng, 2.0);
    model.set_emission("en_logprob_higher[0]", &i_eng, 1.0);
    model.set_emission("en_logprob_higher[0]", &outside, -1.0);

    // --- Contexto tipográfico ---
    // Aspas imediatamente antes de um candidato a início, ou logo depois.
    model.set_emission("quot[-1]", &b_eng, 1.5);
    model.set_emission("quot[-1]", &b_other, 1.0);
    model.set_emission("quot[1]", &b_eng, 0.8);
    model.set_emission("quot[2]", &i_eng, 0.8);

    // --- Sinais de exclusão ---
    model.set_emission("punc[0]", &outside, 5.0);
    model.set_emission("digit[0]", &outside, 2.0);
    model.set_emission("url[0]", &outside, 5.0);
    model.set_emission("email[0]", &outside, 5.0);
    model.set_emission("twitter[0]", &outside, 5.0);
    model.set_emission("bias", &outside, 1.0);

    // --- Transições ---
    let tags = Tag::all();
    for prev in &tags {
        for next in &tags {
            if !Tag::is_valid_transition(prev, next) {
                model.set_transition(prev, next, -8.0);
            }
        }
    }
    for lang in [BorrowingLang::Eng, BorrowingLang::Other] {
        let b = Tag::Begin(lang);
        let i = Tag::Inside(lang);
        model.set_transition(&b, &i, 3.0); // "machine" → "learning"
        model.set_transition(&i, &i, 2.5);
        model.set_transition(&b, &outside, 2.0); // empréstimo de um token
        model.set_transition(&i, &outside, 2.0);
        model.set_transition(&outside, &b, 1.0);
    }
    model.set_transition(&outside, &outside, 2.5);

    model
}

/// Refina os pesos heurísticos com o corpus anotado embutido.
fn refine_on_corpus(model: &mut CrfModel) {
    let extractor = default_feature_extractor();
    let sentences: Vec<_> = get_corpus()
        .iter()
        .map(|sentence| {
            let tokens: Vec<String> =
                sentence.annotations.iter().map(|(w, _)| w.to_string()).collect();
            let gold: Vec<Tag> = sentence
                .annotations
                .iter()
                .map(|(_, label)| Tag::from_label(label).unwrap_or(Tag::Outside))
                .collect();
            (extractor.extract(&tokens), gold)
        })
        .collect();
    model.train(&sentences, 5);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crf::SequenceModel;

    #[test]
    fn test_default_model_is_trained() {
        let model = build_default_model();
        assert!(model.is_trained());
    }

    #[test]
    fn test_default_model_finds_obvious_anglicism() {
        let model = build_default_model();
        let extractor = default_feature_extractor();
        let tokens: Vec<String> = ["el", "'", "marketing", "'", "digital"]
            .iter()
            .map(|t| t.to_string())
            .collect();

        let tagged = model.tag(&extractor.extract(&tokens)).unwrap();
        assert_eq!(tagged[2].0, Tag::Begin(BorrowingLang::Eng));
        assert_eq!(tagged[0].0, Tag::Outside);
    }

    #[test]
    fn test_default_model_leaves_native_sentence_alone() {
        let model = build_default_model();
        let extractor = default_feature_extractor();
        let tokens: Vec<String> = ["la", "casa", "grande"]
            .iter()
            .map(|t| t.to_string())
            .collect();

        let tagged = model.tag(&extractor.extract(&tokens)).unwrap();
        assert!(tagged.iter().all(|(tag, _)| *tag == Tag::Outside));
    }

    #[test]
    fn test_seed_lexicons_are_disjoint_enough() {
        let es = seed_spanish_lexicon();
        let en = seed_english_lexicon();
        assert!(es.contains("casa"));
        assert!(en.contains("look"));
        assert!(!es.contains("streaming"));
    }
}
