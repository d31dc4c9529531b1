//! # Marcação Aninhada por Tokens
//!
//! Emite cada sentença com as tags de entidade envolvendo os tokens que elas
//! cobrem:
//!
//! ```text
//! <sentence><ne type="PER"><token>John</token></ne> <token>lives</token> ...</sentence>
//! ```
//!
//! ## Algoritmo
//!
//! As entidades são ordenadas por `(start ↑, length ↓)` e uma pilha guarda o
//! índice do último token de cada entidade aberta. Para cada token `i`:
//!
//! 1. Escreve (escapado) o texto entre o token anterior e este.
//! 2. Abre `<sentence>` se `i == 0`.
//! 3. Abre todas as entidades que começam em `i`, empilhando `start + length - 1`.
//! 4. Escreve `<token>…</token>`.
//! 5. Fecha enquanto o topo da pilha for `i`.
//! 6. Fecha `</sentence>` no último token.
//!
//! A pilha só representa corretamente spans aninhados ou disjuntos. Com spans
//! cruzados uma entidade pode ficar aberta ao fim da sentença; ela é
//! descartada sem `</ne>` e um aviso é registrado.

use std::io::Write;

use tracing::warn;

use crate::config::CrossingPolicy;
use crate::entity::{sort_entities, validate_entities, NamedEntity};
use crate::error::MarkupError;
use crate::escape::write_escaped;
use crate::render::check_crossing;
use crate::tokenizer::Token;

/// Renderizador de um bloco em marcação aninhada por tokens.
pub struct XmlRenderer<'a> {
    block: &'a str,
    /// Primeiro byte do bloco ainda não escrito
    unprinted: usize,
    crossing: CrossingPolicy,
}

impl<'a> XmlRenderer<'a> {
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
        let mut pending = entities.iter().peekable();

        for (i, token) in tokens.iter().enumerate() {
            if self.unprinted < token.start {
                write_escaped(out, &self.block[self.unprinted..token.start])?;
            }
            if i == 0 {
                out.write_all(b"<sentence>")?;
            }

            // Abre as entidades que começam neste token
            while let Some(entity) = pending.next_if(|e| e.start == i) {
                write!(out, "<ne type=\"{}\">", entity.kind)?;
                open_ends.push(entity.last());
            }

            out.write_all(b"<token>")?;
            write_escaped(out, &self.block[token.start..token.end()])?;
            out.write_all(b"</token>")?;

            // Fecha as entidades que terminam neste token
            while open_ends.last() == Some(&i) {
                out.write_all(b"</ne>")?;
                open_ends.pop();
            }

            if i + 1 == tokens.len() {
                out.write_all(b"</sentence>")?;
            }
            self.unprinted = token.end();
        }

        if !open_ends.is_empty() {
            warn!(
                "{} entidade(s) sem fechamento ao fim da sentença (spans cruzados)",
                open_ends.len()
            );
        }
        Ok(())
    }

    /// Escreve o resto do bloco (normalmente só espaços e quebras de linha).
    pub fn finish<W: Write + ?Sized>(self, out: &mut W) -> Result<(), MarkupError> {
        if self.unprinted < self.block.len() {
            write_escaped(out, &self.block[self.unprinted..])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escape::unescape;
    use crate::render::strip_tags;
    use crate::tokenizer::{Tokenizer, WordTokenizer};

    fn render(text: &str, entities: Vec<Vec<NamedEntity>>, crossing: CrossingPolicy) -> Result<String, MarkupError> {
        let mut tokenizer = WordTokenizer::new();
        tokenizer.set_text(text);
        let mut out = Vec::new();
        let mut renderer = XmlRenderer::new(text, crossing);
        let mut entities = entities.into_iter();
        while let Some(tokens) = tokenizer.next_sentence() {
            renderer.sentence(&mut out, &tokens, entities.next().unwrap_or_default())?;
        }
        renderer.finish(&mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_two_entities() {
        let output = render(
            "John lives in Prague",
            vec![vec![NamedEntity::new(3, 1, "LOC"), NamedEntity::new(0, 1, "PER")]],
            CrossingPolicy::Warn,
        )
        .unwrap();
        assert_eq!(
            output,
            "<sentence><ne type=\"PER\"><token>John</token></ne> <token>lives</token> \
             <token>in</token> <ne type=\"LOC\"><token>Prague</token></ne></sentence>"
        );
    }

    #[test]
    fn test_nested_shared_start_and_end() {
        let output = render(
            "Universidade de São Paulo",
            vec![vec![
                NamedEntity::new(2, 2, "LOC"),
                NamedEntity::new(0, 4, "ORG"),
                NamedEntity::new(3, 1, "PER"),
            ]],
            CrossingPolicy::Warn,
        )
        .unwrap();
        assert_eq!(
            output,
            "<sentence><ne type=\"ORG\"><token>Universidade</token> <token>de</token> \
             <ne type=\"LOC\"><token>São</token> <ne type=\"PER\"><token>Paulo</token></ne></ne></ne></sentence>"
        );
    }

    #[test]
    fn test_escaping_and_trailing_text() {
        let output = render("AT&T <vs> \"Bell\"\n\n", vec![vec![NamedEntity::new(0, 3, "ORG")]], CrossingPolicy::Warn)
            .unwrap();
        assert!(output.starts_with("<sentence><ne type=\"ORG\"><token>AT</token><token>&amp;</token><token>T</token></ne>"));
        assert!(output.ends_with("&quot;</token></sentence>\n\n"));
        assert!(!output.contains("<vs>"));
    }

    #[test]
    fn test_multiple_sentences_keep_gaps() {
        let text = "Lula falou.  Ele saiu.\n";
        let output = render(text, vec![vec![NamedEntity::new(0, 1, "PER")], vec![]], CrossingPolicy::Warn).unwrap();
        assert_eq!(output.matches("<sentence>").count(), 2);
        assert!(output.contains("</sentence>  <sentence>"));
        assert_eq!(unescape(&strip_tags(&output)), text);
    }

    #[test]
    fn test_crossing_warn_leaves_frame_open() {
        let text = "a b c d";
        let output = render(
            text,
            vec![vec![NamedEntity::new(0, 3, "A"), NamedEntity::new(1, 3, "B")]],
            CrossingPolicy::Warn,
        )
        .unwrap();
        // Só o span B fecha; A fica pendurado
        assert_eq!(output.matches("<ne ").count(), 2);
        assert_eq!(output.matches("</ne>").count(), 1);
        assert_eq!(unescape(&strip_tags(&output)), text);
    }

    #[test]
    fn test_out_of_range_span_is_rejected() {
        let result = render("a b", vec![vec![NamedEntity::new(1, 5, "X")]], CrossingPolicy::Warn);
        assert!(matches!(result, Err(MarkupError::InvalidSpan { start: 1, length: 5, tokens: 2 })));
    }

    #[test]
    fn test_crossing_reject() {
        let result = render(
            "a b c d",
            vec![vec![NamedEntity::new(0, 3, "A"), NamedEntity::new(1, 3, "B")]],
            CrossingPolicy::Reject,
        );
        assert!(matches!(result, Err(MarkupError::CrossingSpans { .. })));
    }

    #[test]
    fn test_well_formed_for_nested_sets() {
        let text = "um dois três quatro cinco seis";
        let output = render(
            text,
            vec![vec![
                NamedEntity::new(0, 6, "A"),
                NamedEntity::new(0, 2, "B"),
                NamedEntity::new(1, 1, "C"),
                NamedEntity::new(3, 3, "D"),
                NamedEntity::new(5, 1, "E"),
                NamedEntity::new(5, 1, "F"),
            ]],
            CrossingPolicy::Reject,
        )
        .unwrap();

        // Cada <ne> abre e fecha exatamente uma vez, em ordem LIFO
        let mut depth = 0i32;
        for piece in output.split('<').skip(1) {
            if piece.starts_with("ne ") {
                depth += 1;
            } else if piece.starts_with("/ne>") {
                depth -= 1;
                assert!(depth >= 0);
            }
        }
        assert_eq!(depth, 0);
        assert_eq!(unescape(&strip_tags(&output)), text);
    }
}
