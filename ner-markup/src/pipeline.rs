//! # Pipeline de Marcação
//!
//! Coordena leitor de blocos, tokenizador, reconhecedor e renderizador:
//!
//! ```text
//! BlockReader → Tokenizer → (sentença) → Recognizer → BlockRenderer → io::Write
//! ```
//!
//! Um bloco é lido, tokenizado, reconhecido e renderizado por completo antes
//! do próximo ser lido. A saída é escrita sentença a sentença e descarregada
//! (`flush`) ao fim de cada bloco, então a memória usada é limitada pelo
//! tamanho do bloco e não pelo tamanho da entrada.
//!
//! O único estado que atravessa blocos é o [`LineCounter`] da listagem
//! vertical, passado explicitamente de um bloco para o seguinte.

use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::block::BlockReader;
use crate::config::MarkupConfig;
use crate::error::MarkupError;
use crate::recognizer::Recognizer;
use crate::render::BlockRenderer;
use crate::tokenizer::Tokenizer;
use crate::vertical::LineCounter;

/// Contagens acumuladas durante o processamento de uma entrada.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStats {
    pub blocks: usize,
    pub sentences: usize,
    pub tokens: usize,
    pub entities: usize,
}

/// O pipeline de marcação, parametrizado pelo reconhecedor.
pub struct MarkupPipeline<R> {
    recognizer: R,
    config: MarkupConfig,
}

impl<R: Recognizer> MarkupPipeline<R> {
    pub fn new(recognizer: R, config: MarkupConfig) -> Self {
        Self { recognizer, config }
    }

    pub fn config(&self) -> &MarkupConfig {
        &self.config
    }

    pub fn recognizer(&self) -> &R {
        &self.recognizer
    }

    /// Processa toda a entrada, bloco a bloco, escrevendo em `out`.
    ///
    /// Um erro em qualquer bloco interrompe o processamento e é devolvido;
    /// a saída dos blocos anteriores já foi escrita.
    pub fn process<I: BufRead, W: Write + ?Sized>(
        &self,
        input: I,
        out: &mut W,
    ) -> Result<PipelineStats, MarkupError> {
        self.process_with(&self.config, input, out)
    }

    /// Como [`MarkupPipeline::process`], mas com outra configuração (ex: os
    /// formatos pedidos em uma requisição HTTP), reaproveitando o reconhecedor.
    pub fn process_with<I: BufRead, W: Write + ?Sized>(
        &self,
        config: &MarkupConfig,
        input: I,
        out: &mut W,
    ) -> Result<PipelineStats, MarkupError> {
        let mut tokenizer = config.input.new_tokenizer();
        let mut counter = LineCounter::new();
        let mut stats = PipelineStats::default();

        for block in BlockReader::new(input) {
            let block = block?;
            counter = self.render_block(config, tokenizer.as_mut(), &block, counter, out, &mut stats)?;
        }

        debug!(
            "processados {} blocos, {} sentenças, {} tokens, {} entidades",
            stats.blocks, stats.sentences, stats.tokens, stats.entities
        );
        Ok(stats)
    }

    /// Processa um único bloco e devolve o contador de linhas para o próximo.
    pub fn process_block<W: Write + ?Sized>(
        &self,
        tokenizer: &mut dyn Tokenizer,
        block: &str,
        counter: LineCounter,
        out: &mut W,
        stats: &mut PipelineStats,
    ) -> Result<LineCounter, MarkupError> {
        self.render_block(&self.config, tokenizer, block, counter, out, stats)
    }

    fn render_block<W: Write + ?Sized>(
        &self,
        config: &MarkupConfig,
        tokenizer: &mut dyn Tokenizer,
        block: &str,
        counter: LineCounter,
        out: &mut W,
        stats: &mut PipelineStats,
    ) -> Result<LineCounter, MarkupError> {
        tokenizer.set_text(block);
        let mut renderer = BlockRenderer::new(config.output, block, counter, config.crossing);

        while let Some(tokens) = tokenizer.next_sentence() {
            let forms: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
            let entities = self.recognizer.recognize(&forms)?;

            stats.sentences += 1;
            stats.tokens += tokens.len();
            stats.entities += entities.len();

            renderer.sentence(out, &tokens, entities)?;
        }

        stats.blocks += 1;
        renderer.finish(out)
    }

    /// Atalho para processar um texto em memória e devolver a saída.
    pub fn render_str(&self, text: &str) -> Result<(String, PipelineStats), MarkupError> {
        self.render_str_with(&self.config, text)
    }

    pub fn render_str_with(
        &self,
        config: &MarkupConfig,
        text: &str,
    ) -> Result<(String, PipelineStats), MarkupError> {
        let mut out = Vec::new();
        let stats = self.process_with(config, text.as_bytes(), &mut out)?;
        let output = String::from_utf8(out)
            .map_err(|e| MarkupError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
        Ok((output, stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CrossingPolicy, InputFormat, OutputFormat};
    use crate::entity::NamedEntity;
    use crate::escape::unescape;
    use crate::recognizer::{FixedRecognizer, RuleRecognizer};
    use crate::render::strip_tags;

    fn config(input: InputFormat, output: OutputFormat) -> MarkupConfig {
        MarkupConfig {
            input,
            output,
            crossing: CrossingPolicy::Warn,
        }
    }

    /// Reconhecedor de teste: "Barack" abre um PER de dois tokens, "He" e "John" de um
    fn by_form(forms: &[&str]) -> Result<Vec<NamedEntity>, MarkupError> {
        Ok(forms
            .iter()
            .enumerate()
            .filter(|(_, f)| matches!(**f, "Barack" | "He" | "John"))
            .map(|(i, f)| NamedEntity::new(i, if *f == "Barack" { 2 } else { 1 }, "PER"))
            .collect())
    }

    #[test]
    fn test_vertical_listing_end_to_end() {
        let pipeline = MarkupPipeline::new(by_form, config(InputFormat::Vertical, OutputFormat::Vertical));
        let (output, stats) = pipeline.render_str("Barack\nObama\n\nHe\nspoke\n").unwrap();
        assert_eq!(output, "1, 2\tPER\tBarackObama\n4\tPER\tHe\n");
        assert_eq!(stats.blocks, 2);
        assert_eq!(stats.tokens, 4);
        assert_eq!(stats.entities, 2);
    }

    #[test]
    fn test_xml_end_to_end() {
        let mut recognizer = RuleRecognizer::new();
        recognizer.add_entry("PER", "John");
        recognizer.add_entry("LOC", "Prague");
        let pipeline = MarkupPipeline::new(recognizer, config(InputFormat::Untokenized, OutputFormat::Xml));

        let (output, _) = pipeline.render_str("John lives in Prague").unwrap();
        assert_eq!(
            output,
            "<sentence><ne type=\"PER\"><token>John</token></ne> <token>lives</token> \
             <token>in</token> <ne type=\"LOC\"><token>Prague</token></ne></sentence>"
        );
    }

    #[test]
    fn test_inline_formats_are_lossless() {
        let text = "O presidente Lula visitou a Universidade de São Paulo.\nA Embraer S.A. & \"Petrobras\" <ok>\n\n\nFim do texto.  \n";
        for output in [OutputFormat::Xml, OutputFormat::CharSpan] {
            let pipeline = MarkupPipeline::new(
                RuleRecognizer::with_default_gazetteers().unwrap(),
                config(InputFormat::Untokenized, output),
            );
            let (rendered, stats) = pipeline.render_str(text).unwrap();
            assert_eq!(unescape(&strip_tags(&rendered)), text, "formato {:?}", output);
            assert!(stats.entities >= 4);
        }
    }

    #[test]
    fn test_fixed_recognizer_char_span() {
        let fixed = FixedRecognizer::new(vec![
            vec![NamedEntity::new(0, 2, "PER")],
            vec![NamedEntity::new(2, 1, "LOC")],
        ]);
        let cfg = config(InputFormat::Untokenized, OutputFormat::CharSpan);
        let pipeline = MarkupPipeline::new(fixed, cfg);
        let (output, stats) = pipeline.render_str("Barack Obama falou. Ele visitou Praga.\n").unwrap();
        assert_eq!(
            output,
            "<ne type=\"PER\">Barack Obama</ne> falou. Ele visitou <ne type=\"LOC\">Praga</ne>.\n"
        );
        assert_eq!(stats.sentences, 2);
    }

    #[test]
    fn test_conll_end_to_end() {
        let pipeline = MarkupPipeline::new(by_form, config(InputFormat::Untokenized, OutputFormat::Conll));
        let (output, _) = pipeline.render_str("John dorme. Barack Obama fala.").unwrap();
        assert_eq!(
            output,
            "John\tB-PER\ndorme\t_\n.\t_\n\nBarack\tB-PER\nObama\tI-PER\nfala\t_\n.\t_\n\n"
        );
    }

    #[test]
    fn test_recognizer_error_propagates() {
        let failing = |_: &[&str]| -> Result<Vec<NamedEntity>, MarkupError> {
            Err(MarkupError::Recognizer("modelo indisponível".to_string()))
        };
        let pipeline = MarkupPipeline::new(failing, MarkupConfig::default());
        assert!(matches!(pipeline.render_str("texto"), Err(MarkupError::Recognizer(_))));
    }

    #[test]
    fn test_reject_policy_fails_block() {
        let crossing = |_: &[&str]| -> Result<Vec<NamedEntity>, MarkupError> {
            Ok(vec![NamedEntity::new(0, 2, "A"), NamedEntity::new(1, 2, "B")])
        };
        let cfg = MarkupConfig {
            crossing: CrossingPolicy::Reject,
            ..Default::default()
        };
        let pipeline = MarkupPipeline::new(crossing, cfg);
        assert!(matches!(
            pipeline.render_str("um dois três"),
            Err(MarkupError::CrossingSpans { .. })
        ));
    }

    #[test]
    fn test_process_block_threads_counter() {
        let pipeline = MarkupPipeline::new(by_form, config(InputFormat::Vertical, OutputFormat::Vertical));
        let mut tokenizer = crate::tokenizer::VerticalTokenizer::new();
        let mut stats = PipelineStats::default();
        let mut out = Vec::new();

        let counter = pipeline
            .process_block(&mut tokenizer, "x\ny\nz\n\n", LineCounter::new(), &mut out, &mut stats)
            .unwrap();
        assert_eq!(counter.lines(), 4);
        pipeline
            .process_block(&mut tokenizer, "He\n", counter, &mut out, &mut stats)
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "5\tPER\tHe\n");
        assert_eq!(stats.blocks, 2);
    }

    #[test]
    fn test_render_str_with_overrides_config() {
        let pipeline = MarkupPipeline::new(by_form, MarkupConfig::default());
        let vertical = config(InputFormat::Vertical, OutputFormat::Vertical);
        let (output, _) = pipeline.render_str_with(&vertical, "John\n").unwrap();
        assert_eq!(output, "1\tPER\tJohn\n");
        assert_eq!(pipeline.config().output, OutputFormat::Xml);
    }

    #[test]
    fn test_empty_input() {
        let pipeline = MarkupPipeline::new(by_form, MarkupConfig::default());
        let (output, stats) = pipeline.render_str("").unwrap();
        assert!(output.is_empty());
        assert_eq!(stats, PipelineStats::default());
    }
}
