//! Erros do pipeline de marcação.

use thiserror::Error;

use crate::entity::NamedEntity;

#[derive(Debug, Error)]
pub enum MarkupError {
    /// Span vazio ou fora dos limites da sentença (violação de pré-condição).
    #[error("span inválido: start={start}, length={length} em sentença com {tokens} tokens")]
    InvalidSpan {
        start: usize,
        length: usize,
        tokens: usize,
    },

    /// Spans que se sobrepõem sem aninhamento, com a política `Reject`.
    #[error(
        "spans cruzados: {}({}..{}) e {}({}..{})",
        first.kind, first.start, first.end(), second.kind, second.start, second.end()
    )]
    CrossingSpans {
        first: NamedEntity,
        second: NamedEntity,
    },

    /// Falha do reconhecedor externo.
    #[error("falha no reconhecedor: {0}")]
    Recognizer(String),

    #[error("configuração inválida: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
