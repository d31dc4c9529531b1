//! # Marcação por Intervalos de Caracteres
//!
//! Em vez de envolver tokens, as tags `<ne>` envolvem o trecho do texto
//! original que vai do início do primeiro token ao fim do último token da
//! entidade. Não há `<sentence>` nem `<token>`: a saída é o próprio texto com
//! as entidades marcadas.
//!
//! ```text
//! The <ne type="PER">Karl</ne> Universitat
//! ```
//!
//! ## Algoritmo
//!
//! Um cursor `unprinted` marca o primeiro byte ainda não escrito e uma pilha
//! guarda o offset final de cada entidade aberta. Para cada entidade, na ordem
//! `(start ↑, length ↓)`:
//!
//! 1. Fecha cada entidade do topo cujo fim seja ≤ ao início da nova,
//!    escrevendo antes o texto até esse fim.
//! 2. Escreve o texto até o início da nova entidade e a abre.
//!
//! No fim da sentença a pilha é esvaziada (LIFO) e, no fim do bloco, o resto
//! do texto é escrito.
//!
//! Entidades já abertas nunca são reordenadas. Um span que começa dentro de
//! outro e termina depois dele faz o externo fechar "atrasado": a saída é
//! bem formada, mas é uma aproximação dos spans originais.

use std::io::{self, Write};

use crate::config::CrossingPolicy;
use crate::entity::{sort_entities, validate_entities, NamedEntity};
use crate::error::MarkupError;
use crate::escape::write_escaped;
use crate::render::check_crossing;
use crate::tokenizer::Token;

/// Renderizador de um bloco em marcação por intervalos de caracteres.
pub struct CharSpanRenderer<'a> {
    block: &'a str,
    unprinted: usize,
    crossing: CrossingPolicy,
}

impl<'a> CharSpanRenderer<'a> {
    pub fn new(block: &'a str, crossing: CrossingPolicy) -> Self {
        Self {
            block,
            unprinted: 0,
            crossing,
        }
    }

    pub fn sentence<W: Write + ?Sized>(
        &mut self,
        out: &mut W,
        tokens: &[Token],
        mut entities: Vec<NamedEntity>,
    ) -> Result<(), MarkupError> {
        validate_entities(&entities, tokens.len())?;
        sort_entities(&mut entities);
        check_crossing(&entities, self.crossing)?;

        let mut open_ends: Vec<usize> = Vec::new();

        for entity in &entities {
            let start = tokens[entity.start].start;
            let end = tokens[entity.last()].end();

            while let Some(&top) = open_ends.last() {
                if top > start {
                    break;
                }
                self.flush(out, top)?;
                out.write_all(b"</ne>")?;
                open_ends.pop();
            }

            self.flush(out, start)?;
            write!(out, "<ne type=\"{}\">", entity.kind)?;
            open_ends.push(end);
        }

        while let Some(end) = open_ends.pop() {
            self.flush(out, end)?;
            out.write_all(b"</ne>")?;
        }
        Ok(())
    }

    pub fn finish<W: Write + ?Sized>(mut self, out: &mut W) -> Result<(), MarkupError> {
        let end = self.block.len();
        self.flush(out, end)?;
        Ok(())
    }

    /// Escreve o texto de `unprinted` até `to`; não faz nada se o cursor já
    /// passou de `to`.
    fn flush<W: Write + ?Sized>(&mut self, out: &mut W, to: usize) -> io::Result<()> {
        if self.unprinted < to {
            write_escaped(out, &self.block[self.unprinted..to])?;
            self.unprinted = to;
        }
        Ok(())
    }
}
