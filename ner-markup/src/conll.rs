//! # Saída CoNLL (BIO)
//!
//! Um token por linha, seguido da tag BIO da entidade que o cobre, e uma linha
//! vazia após cada sentença:
//!
//! ```text
//! John	B-PER
//! lives	_
//! in	_
//! New	B-LOC
//! York	I-LOC
//! ```
//!
//! O esquema BIO não representa aninhamento: apenas as entidades mais externas
//! são escritas. Uma entidade que começa enquanto outra está aberta é ignorada.

use std::io::Write;

use crate::entity::{sort_entities, validate_entities, NamedEntity};
use crate::error::MarkupError;
use crate::tokenizer::Token;

pub struct ConllRenderer;

impl ConllRenderer {
    pub fn sentence<W: Write + ?Sized>(
        &mut self,
        out: &mut W,
        tokens: &[Token],
        mut entities: Vec<NamedEntity>,
    ) -> Result<(), MarkupError> {
        validate_entities(&entities, tokens.len())?;
        sort_entities(&mut entities);

        let mut pending = entities.iter().peekable();
        let mut current: Option<(&str, usize)> = None;

        for (i, token) in tokens.iter().enumerate() {
            let mut begin = false;
            // Consome as entidades que começam até aqui; só a primeira em i abre
            while let Some(entity) = pending.next_if(|e| e.start <= i) {
                if current.is_none() && entity.start == i {
                    current = Some((entity.kind.as_str(), entity.length));
                    begin = true;
                }
            }

            match current {
                Some((kind, remaining)) => {
                    let prefix = if begin { "B" } else { "I" };
                    writeln!(out, "{}\t{}-{}", token.text, prefix, kind)?;
                    current = (remaining > 1).then_some((kind, remaining - 1));
                }
                None => writeln!(out, "{}\t_", token.text)?,
            }
        }

        out.write_all(b"\n")?;
        Ok(())
    }
}
