//! # Recursos Lexicais
//!
//! Léxicos, modelo de n-gramas de caracteres e vetores de palavras usados
//! pelos extratores de features. Seguindo o desenho do sistema, nenhum
//! recurso vive em estado global: cada um é um objeto explícito, construído
//! uma única vez na inicialização do tagger e **somente lido** durante a
//! análise — seguro para leituras concorrentes sem sincronização.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::info;
use unicode_segmentation::UnicodeSegmentation;

use crate::error::{Error, Result};

/// Léxico: conjunto de palavras conhecidas de uma língua.
///
/// Usado pelas features de pertencimento a dicionário (uma palavra espanhola
/// dentro do léxico ES dificilmente é empréstimo; uma palavra no léxico EN é
/// forte candidata a anglicismo).
#[derive(Debug, Clone)]
pub struct Lexicon {
    /// Código da língua do léxico (ex: "es", "en") — entra no nome da feature.
    pub lang: String,
    words: HashSet<String>,
}

impl Lexicon {
    /// Carrega um léxico de um arquivo texto com uma palavra por linha.
    ///
    /// Artefato ausente é erro fatal de construção, reportado com o passo de
    /// correção — a análise nunca começa com um recurso pela metade.
    pub fn from_file(lang: impl Into<String>, path: &Path) -> Result<Self> {
        let lang = lang.into();
        let file = File::open(path).map_err(|_| {
            Error::resource_missing(
                format!("léxico {lang}"),
                path,
                "baixe a lista de palavras e aponte o caminho na configuração do tagger",
            )
        })?;
        let mut words = HashSet::new();
        for line in BufReader::new(file).lines() {
            let word = line?.trim().to_lowercase();
            if !word.is_empty() {
                words.insert(word);
            }
        }
        info!(lang = %lang, entries = words.len(), "léxico carregado");
        Ok(Self { lang, words })
    }

    /// Constrói um léxico em memória a partir de uma lista de palavras.
    pub fn from_words<I, S>(lang: impl Into<String>, iter: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            lang: lang.into(),
            words: iter.into_iter().map(|w| w.as_ref().to_lowercase()).collect(),
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Itera sobre as palavras do léxico (para alimentar o modelo de n-gramas).
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(|w| w.as_str())
    }
}

/// Modelo de trigramas de caracteres estimado a partir de um léxico.
///
/// Aproxima a "cara" ortográfica de uma língua: a log-probabilidade de uma
/// palavra é a soma das log-probabilidades de cada trigrama, com sentinelas
/// `START`/`END` nas bordas. Palavras inglesas ("streaming") pontuam mal no
/// modelo espanhol e bem no inglês — a diferença é a feature.
#[derive(Debug, Clone)]
pub struct CharNgramModel {
    /// Código da língua de origem do modelo.
    pub lang: String,
    /// Contagens de trigrama: (g0, g1) → g2 → contagem.
    trigram_counts: HashMap<(String, String), HashMap<String, u32>>,
    /// Contagens de bigrama (denominador): (g0, g1) → contagem.
    bigram_counts: HashMap<(String, String), u32>,
}

const BOUNDARY_START: &str = "START";
const BOUNDARY_END: &str = "END";
/// Log-probabilidade atribuída a bigramas nunca vistos.
const UNSEEN_LOG_PROB: f64 = -33.2; // ~log2(1e-10)

impl CharNgramModel {
    /// Estima o modelo a partir das palavras de um léxico.
    pub fn from_lexicon(lexicon: &Lexicon) -> Self {
        let mut model = Self {
            lang: lexicon.lang.clone(),
            trigram_counts: HashMap::new(),
            bigram_counts: HashMap::new(),
        };
        for word in lexicon.words() {
            model.observe(word);
        }
        info!(
            lang = %model.lang,
            bigrams = model.bigram_counts.len(),
            "modelo de trigramas estimado"
        );
        model
    }

    fn observe(&mut self, word: &str) {
        let graphemes: Vec<&str> = word.graphemes(true).collect();
        if graphemes.len() < 2 {
            return;
        }
        let mut padded: Vec<&str> = Vec::with_capacity(graphemes.len() + 2);
        padded.push(BOUNDARY_START);
        padded.extend(graphemes.iter().copied());
        padded.push(BOUNDARY_END);
        for window in padded.windows(3) {
            let key = (window[0].to_string(), window[1].to_string());
            *self
                .trigram_counts
                .entry(key.clone())
                .or_default()
                .entry(window[2].to_string())
                .or_insert(0) += 1;
            *self.bigram_counts.entry(key).or_insert(0) += 1;
        }
    }

    fn trigram_log_prob(&self, g0: &str, g1: &str, g2: &str) -> f64 {
        let key = (g0.to_string(), g1.to_string());
        let Some(&denom) = self.bigram_counts.get(&key) else {
            return UNSEEN_LOG_PROB;
        };
        let count = self
            .trigram_counts
            .get(&key)
            .and_then(|m| m.get(g2))
            .copied()
            .unwrap_or(0);
        if count == 0 {
            return UNSEEN_LOG_PROB;
        }
        (count as f64 / denom as f64).log2()
    }

    /// Log-probabilidade (base 2) da palavra sob o modelo da língua.
    pub fn word_log_prob(&self, word: &str) -> f64 {
        let word = word.to_lowercase();
        let graphemes: Vec<&str> = word.graphemes(true).collect();
        match graphemes.len() {
            0 => UNSEEN_LOG_PROB,
            1 => self.trigram_log_prob(BOUNDARY_START, graphemes[0], BOUNDARY_END),
            _ => {
                let mut padded: Vec<&str> = Vec::with_capacity(graphemes.len() + 2);
                padded.push(BOUNDARY_START);
                padded.extend(graphemes.iter().copied());
                padded.push(BOUNDARY_END);
                padded
                    .windows(3)
                    .map(|w| self.trigram_log_prob(w[0], w[1], w[2]))
                    .sum()
            }
        }
    }
}

/// Tabela de vetores de palavras carregada de um arquivo texto `.vec`.
///
/// Formato: uma palavra por linha seguida das componentes do vetor separadas
/// por espaço (formato word2vec/fastText texto). Palavras fora do vocabulário
/// recebem o vetor nulo, de modo que a feature nunca falha durante a análise.
#[derive(Debug, Clone)]
pub struct WordVectors {
    vectors: HashMap<String, Vec<f64>>,
    dim: usize,
}

impl WordVectors {
    /// Carrega os vetores de um arquivo `.vec`.
    ///
    /// Linhas malformadas são ignoradas; um cabeçalho `"<n> <dim>"` no topo
    /// (convenção fastText) é detectado e pulado.
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|_| {
            Error::resource_missing(
                "vetores de palavras",
                path,
                "baixe o arquivo .vec de embeddings e aponte o caminho na configuração do tagger",
            )
        })?;
        let mut vectors = HashMap::new();
        let mut dim = 0usize;
        for line in BufReader::new(file).lines() {
            let line = line?;
            let mut parts = line.split_whitespace();
            let Some(word) = parts.next() else { continue };
            let values: Vec<f64> = parts.filter_map(|v| v.parse().ok()).collect();
            if values.len() < 2 {
                continue; // cabeçalho ou linha malformada
            }
            if dim == 0 {
                dim = values.len();
            }
            if values.len() == dim {
                vectors.insert(word.to_lowercase(), values);
            }
        }
        info!(entries = vectors.len(), dim, "vetores de palavras carregados");
        Ok(Self { vectors, dim })
    }

    /// Constrói uma tabela em memória (para testes e modelos pequenos).
    pub fn from_entries(entries: Vec<(String, Vec<f64>)>) -> Self {
        let dim = entries.first().map(|(_, v)| v.len()).unwrap_or(0);
        Self {
            vectors: entries
                .into_iter()
                .map(|(w, v)| (w.to_lowercase(), v))
                .collect(),
            dim,
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Vetor da palavra; nulo quando fora do vocabulário.
    pub fn get(&self, word: &str) -> Vec<f64> {
        self.vectors
            .get(&word.to_lowercase())
            .cloned()
            .unwrap_or_else(|| vec![0.0; self.dim])
    }
}
