//! # Renderização por Bloco
//!
//! [`BlockRenderer`] reúne os quatro formatos de saída atrás de uma única
//! interface usada pelo pipeline:
//!
//! 1. [`BlockRenderer::new`] no início de cada bloco (estado novo por bloco).
//! 2. [`BlockRenderer::sentence`] para cada sentença, na ordem do tokenizador.
//! 3. [`BlockRenderer::finish`] no fim do bloco, que devolve o
//!    [`LineCounter`] atualizado para o próximo bloco.
//!
//! Cada renderizador valida os spans da sentença antes de escrever qualquer
//! marcação dela.

use std::io::Write;

use tracing::warn;

use crate::char_span::CharSpanRenderer;
use crate::config::{CrossingPolicy, OutputFormat};
use crate::conll::ConllRenderer;
use crate::entity::{find_crossing, NamedEntity};
use crate::error::MarkupError;
use crate::tokenizer::Token;
use crate::vertical::{LineCounter, VerticalRenderer};
use crate::xml::XmlRenderer;

pub enum BlockRenderer<'a> {
    Xml(XmlRenderer<'a>, LineCounter),
    CharSpan(CharSpanRenderer<'a>, LineCounter),
    Vertical(VerticalRenderer),
    Conll(ConllRenderer, LineCounter),
}

impl<'a> BlockRenderer<'a> {
    pub fn new(format: OutputFormat, block: &'a str, counter: LineCounter, crossing: CrossingPolicy) -> Self {
        match format {
            OutputFormat::Xml => BlockRenderer::Xml(XmlRenderer::new(block, crossing), counter),
            OutputFormat::CharSpan => {
                BlockRenderer::CharSpan(CharSpanRenderer::new(block, crossing), counter)
            }
            OutputFormat::Vertical => BlockRenderer::Vertical(VerticalRenderer::new(counter)),
            OutputFormat::Conll => BlockRenderer::Conll(ConllRenderer, counter),
        }
    }

    /// Renderiza uma sentença. `entities` vem na ordem de emissão do reconhecedor.
    pub fn sentence<W: Write + ?Sized>(
        &mut self,
        out: &mut W,
        tokens: &[Token],
        entities: Vec<NamedEntity>,
    ) -> Result<(), MarkupError> {
        match self {
            BlockRenderer::Xml(r, _) => r.sentence(out, tokens, entities),
            BlockRenderer::CharSpan(r, _) => r.sentence(out, tokens, entities),
            BlockRenderer::Vertical(r) => r.sentence(out, tokens, entities),
            BlockRenderer::Conll(r, _) => r.sentence(out, tokens, entities),
        }
    }

    /// Fecha o bloco: escreve o texto restante (formatos inline) e devolve o
    /// contador de linhas para o próximo bloco.
    pub fn finish<W: Write + ?Sized>(self, out: &mut W) -> Result<LineCounter, MarkupError> {
        let counter = match self {
            BlockRenderer::Xml(r, counter) => {
                r.finish(out)?;
                counter
            }
            BlockRenderer::CharSpan(r, counter) => {
                r.finish(out)?;
                counter
            }
            BlockRenderer::Vertical(r) => r.finish(),
            BlockRenderer::Conll(_, counter) => counter,
        };
        out.flush()?;
        Ok(counter)
    }
}

/// Aplica a política de spans cruzados a uma lista **ordenada**.
pub(crate) fn check_crossing(sorted: &[NamedEntity], policy: CrossingPolicy) -> Result<(), MarkupError> {
    if let Some((first, second)) = find_crossing(sorted) {
        match policy {
            CrossingPolicy::Warn => warn!(
                "spans cruzados {}({}..{}) e {}({}..{}); saída aproximada",
                first.kind,
                first.start,
                first.end(),
                second.kind,
                second.start,
                second.end()
            ),
            CrossingPolicy::Reject => {
                return Err(MarkupError::CrossingSpans {
                    first: first.clone(),
                    second: second.clone(),
                })
            }
        }
    }
    Ok(())
}

/// Remove as tags de uma saída inline, deixando apenas o texto (ainda escapado).
///
/// Como todo `<` literal é escapado, qualquer `<` na saída abre uma tag.
pub fn strip_tags(markup: &str) -> String {
    let mut text = String::with_capacity(markup.len());
    let mut in_tag = false;
    for c in markup.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    text
}
