//! # lazaro-core — Detecção de Empréstimos Lexicais em Espanhol
//!
//! Este crate implementa um pipeline completo para detectar **empréstimos
//! lexicais** (com foco em anglicismos) em texto espanhol: trechos como
//! "look", "machine learning" ou "anime" que a imprensa usa sem adaptação.
//! Ele foi projetado para ser didático, modular e extensível.
//!
//! ## Arquitetura do Sistema
//!
//! O dado flui por um pipeline linear:
//!
//! 1.  **Entrada**: texto bruto (String) ou a predição crua de um backend
//!     externo ([`backends`]).
//! 2.  **Tokenização** ([`tokenizer`]): o texto é dividido em tokens com
//!     offsets originais preservados.
//! 3.  **Extração de Features** ([`features`]): cada token vira um mapa
//!     esparso de características (ex: "termina em -ing", "está no léxico
//!     inglês"), avaliadas numa janela simétrica.
//! 4.  **Decodificação** ([`crf`], [`viterbi`]): o CRF de cadeia linear
//!     atribui uma tag BIO a cada token.
//! 5.  **Normalização** ([`bio`], [`borrowing`], [`align`]): rótulos
//!     malformados são reparados, subpalavras são realinhadas e os runs
//!     `B`/`I` são fundidos em spans tipados.
//! 6.  **Saída** ([`output`]): [`LazaroOutput`] com os tokens rotulados e os
//!     [`Borrowing`]s encontrados.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use lazaro_core::Lazaro;
//!
//! let pipeline = Lazaro::new();
//! let output = pipeline
//!     .analyze("Inspírate con este 'look' sencillo.")
//!     .unwrap();
//!
//! for borrowing in output.borrowings() {
//!     println!("{} ({})", borrowing.text(), borrowing.language);
//! }
//! ```
//!
//! ## Módulos Principais
//!
//! - [`pipeline`]: orquestrador que conecta todos os estágios.
//! - [`bio`] / [`borrowing`]: o núcleo de normalização (reparação + fusão).
//! - [`backends`]: normalização das saídas de taggers externos.
//! - [`features`] / [`resources`]: engenharia de características e recursos.
//! - [`corpus`]: sentenças anotadas para treino e demonstração.

pub mod align;
pub mod backends;
pub mod bio;
pub mod borrowing;
pub mod corpus;
pub mod crf;
pub mod error;
pub mod features;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod resources;
pub mod token;
pub mod tokenizer;
pub mod viterbi;

pub use align::{merge_wordpieces, LabelStrategy};
pub use backends::BackendOutput;
pub use bio::{repair_labels, to_bilou, type_to_language, BorrowingLang, Tag};
pub use borrowing::{fuse_spans, Borrowing};
pub use error::{Error, Result};
pub use output::LazaroOutput;
pub use pipeline::{Lazaro, PipelineEvent};
pub use token::Token;
pub use tokenizer::{tokenize, SourceToken};
