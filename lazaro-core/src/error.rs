//! Tipos de erro do crate.
//!
//! A taxonomia é curta de propósito: rótulos malformados são **reparados**,
//! nunca reportados ([`crate::bio::repair_labels`]); entrada vazia produz
//! saída vazia. Sobram os erros de recurso (artefato ausente) e de
//! persistência do modelo, reportados uma única vez na construção do backend.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Um artefato obrigatório (modelo, léxico, embeddings) não foi
    /// encontrado. A mensagem nomeia o artefato e o passo de correção —
    /// nunca um stack trace.
    #[error("artefato '{artifact}' não encontrado em {}; {remediation}", path.display())]
    ResourceMissing {
        artifact: String,
        path: PathBuf,
        remediation: String,
    },

    /// O modelo estatístico foi consultado antes de ser treinado/carregado.
    #[error("modelo não treinado: chame train() ou carregue um modelo salvo antes de tag()")]
    ModelNotTrained,

    /// Falha ao ler/escrever um artefato em disco.
    #[error("erro de E/S: {0}")]
    Io(#[from] std::io::Error),

    /// Falha ao (de)serializar um modelo persistido.
    #[error("erro de serialização do modelo: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Atalho para erro de recurso ausente com mensagem de correção.
    pub fn resource_missing(
        artifact: impl Into<String>,
        path: impl Into<PathBuf>,
        remediation: impl Into<String>,
    ) -> Self {
        Error::ResourceMissing {
            artifact: artifact.into(),
            path: path.into(),
            remediation: remediation.into(),
        }
    }
}
