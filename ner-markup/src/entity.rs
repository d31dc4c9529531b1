//! # Entidades Nomeadas e Ordem de Renderização
//!
//! O reconhecedor devolve, para cada sentença, um conjunto **não ordenado** de
//! spans `(start, length, type)` sobre os índices dos tokens. Os renderizadores
//! inline precisam desses spans em uma ordem específica:
//!
//! - `start` crescente;
//! - em caso de empate, `length` **decrescente**.
//!
//! Assim, quando duas entidades começam no mesmo token, a mais longa (externa)
//! é aberta primeiro e uma única pilha basta para representar o aninhamento.
//!
//! ## Exemplo
//!
//! ```text
//! Universidade de São Paulo
//! [ORG  0..4              ]
//!                 [LOC 2..4]
//! ```

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::MarkupError;

/// Um span de entidade sobre os tokens de uma sentença.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamedEntity {
    /// Índice do primeiro token (0-based)
    pub start: usize,
    /// Número de tokens cobertos (≥ 1)
    pub length: usize,
    /// Rótulo da entidade (ex: "PER", "LOC"), emitido sem escape
    #[serde(rename = "type")]
    pub kind: String,
}

impl NamedEntity {
    pub fn new(start: usize, length: usize, kind: impl Into<String>) -> Self {
        Self {
            start,
            length,
            kind: kind.into(),
        }
    }

    /// Índice do último token coberto (inclusivo).
    pub fn last(&self) -> usize {
        self.start + self.length - 1
    }

    /// Índice logo após o último token coberto (exclusivo).
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    /// Chave de renderização: `start` crescente, `length` decrescente.
    pub fn render_order(&self, other: &Self) -> Ordering {
        self.start
            .cmp(&other.start)
            .then_with(|| other.length.cmp(&self.length))
    }

    /// Dois spans se cruzam quando se sobrepõem sem que um contenha o outro.
    pub fn crosses(&self, other: &Self) -> bool {
        let overlaps = self.start < other.end() && other.start < self.end();
        let nested = (self.start <= other.start && other.end() <= self.end())
            || (other.start <= self.start && self.end() <= other.end());
        overlaps && !nested
    }
}

/// Ordena as entidades pela chave de renderização.
///
/// A ordenação é estável: duplicatas exatas mantêm a ordem de emissão do
/// reconhecedor. Muitos reconhecedores já devolvem as entidades ordenadas,
/// então a verificação prévia evita o trabalho na maioria dos casos.
pub fn sort_entities(entities: &mut [NamedEntity]) {
    let sorted = entities
        .windows(2)
        .all(|w| w[0].render_order(&w[1]) != Ordering::Greater);
    if !sorted {
        entities.sort_by(NamedEntity::render_order);
    }
}

/// Rejeita spans vazios ou que ultrapassam a sentença.
///
/// Deve ser chamado antes de qualquer marcação da sentença ser escrita:
/// nenhum renderizador trabalha com uma pilha inconsistente.
pub fn validate_entities(entities: &[NamedEntity], tokens: usize) -> Result<(), MarkupError> {
    match entities
        .iter()
        .find(|e| e.length == 0 || e.start.checked_add(e.length).map_or(true, |end| end > tokens))
    {
        Some(bad) => Err(MarkupError::InvalidSpan {
            start: bad.start,
            length: bad.length,
            tokens,
        }),
        None => Ok(()),
    }
}

/// Procura o primeiro par de spans que se cruzam em uma lista **ordenada**.
///
/// Como a lista está ordenada por `start`, basta comparar cada entidade com as
/// seguintes que começam antes do seu fim.
pub fn find_crossing(sorted: &[NamedEntity]) -> Option<(&NamedEntity, &NamedEntity)> {
    for (i, outer) in sorted.iter().enumerate() {
        for inner in sorted[i + 1..].iter().take_while(|e| e.start < outer.end()) {
            if outer.crosses(inner) {
                return Some((outer, inner));
            }
        }
    }
    None
}
