//! # Listagem Vertical de Entidades
//!
//! Para entrada vertical (um token por linha), cada entidade vira uma linha
//! com três colunas separadas por tabulação:
//!
//! ```text
//! 1, 2	PER	BarackObama
//! 4	PER	He
//! ```
//!
//! 1. Os números das linhas da entrada (1-based) cobertas pela entidade,
//!    separados por `", "`.
//! 2. O tipo da entidade.
//! 3. As formas dos tokens concatenadas, sem separador.
//!
//! Os números de linha são globais à entrada: um [`LineCounter`] é passado a
//! cada bloco e devolvido atualizado com `tokens + 1` (a linha vazia que
//! encerra o bloco).

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::entity::{validate_entities, NamedEntity};
use crate::error::MarkupError;
use crate::tokenizer::Token;

/// Número de linhas da entrada já consumidas pelos blocos anteriores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineCounter(usize);

impl LineCounter {
    pub fn new() -> Self {
        Self(0)
    }

    pub fn lines(&self) -> usize {
        self.0
    }

    /// Contador após um bloco com `tokens` tokens e a linha vazia final.
    pub fn after_block(self, tokens: usize) -> Self {
        Self(self.0 + tokens + 1)
    }
}

/// Renderizador de um bloco na listagem vertical.
pub struct VerticalRenderer {
    counter: LineCounter,
    /// Tokens já vistos neste bloco (sentenças anteriores)
    block_tokens: usize,
}

impl VerticalRenderer {
    pub fn new(counter: LineCounter) -> Self {
        Self {
            counter,
            block_tokens: 0,
        }
    }

    /// Escreve as entidades na ordem em que o reconhecedor as emitiu.
    pub fn sentence<W: Write + ?Sized>(
        &mut self,
        out: &mut W,
        tokens: &[Token],
        entities: Vec<NamedEntity>,
    ) -> Result<(), MarkupError> {
        validate_entities(&entities, tokens.len())?;
        let first_line = self.counter.lines() + self.block_tokens + 1;

        for entity in &entities {
            let ids: Vec<String> = (entity.start..entity.end())
                .map(|i| (first_line + i).to_string())
                .collect();
            let text: String = tokens[entity.start..entity.end()]
                .iter()
                .map(|t| t.text.as_str())
                .collect();
            writeln!(out, "{}\t{}\t{}", ids.join(", "), entity.kind, text)?;
        }

        self.block_tokens += tokens.len();
        Ok(())
    }

    /// Fecha o bloco e devolve o contador para o próximo.
    pub fn finish(self) -> LineCounter {
        self.counter.after_block(self.block_tokens)
    }
}
