//! # Configuração do Pipeline
//!
//! Escolhe o formato de entrada (texto corrido ou vertical), o formato de saída
//! e a política para spans cruzados. Todos os campos têm valores padrão, então
//! `{}` é uma configuração válida:
//!
//! ```rust
//! use ner_markup::config::{CrossingPolicy, MarkupConfig, OutputFormat};
//!
//! let config = MarkupConfig::from_json(r#"{ "output": "vertical", "crossing": "reject" }"#).unwrap();
//! assert_eq!(config.output, OutputFormat::Vertical);
//! assert_eq!(config.crossing, CrossingPolicy::Reject);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::MarkupError;
use crate::tokenizer::{Tokenizer, VerticalTokenizer, WordTokenizer};

/// Formato do texto de entrada.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputFormat {
    /// **Texto corrido**: o tokenizador divide em sentenças e palavras.
    #[default]
    Untokenized,
    /// **Vertical**: um token por linha, sentenças separadas por linha vazia.
    Vertical,
}

impl InputFormat {
    /// Cria o tokenizador adequado a este formato.
    pub fn new_tokenizer(self) -> Box<dyn Tokenizer> {
        match self {
            InputFormat::Untokenized => Box::new(WordTokenizer::new()),
            InputFormat::Vertical => Box::new(VerticalTokenizer::new()),
        }
    }
}

/// Formato da saída renderizada.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// `<sentence>`, `<token>` e `<ne>` aninhados por índice de token.
    #[default]
    Xml,
    /// Apenas `<ne>` sobre intervalos de caracteres do texto original.
    CharSpan,
    /// Uma linha por entidade: ids de linha, tipo e texto.
    Vertical,
    /// Um token por linha com tags BIO.
    Conll,
}

/// O que fazer quando dois spans se sobrepõem sem aninhamento.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossingPolicy {
    /// Registra um aviso e renderiza a aproximação de melhor esforço.
    #[default]
    Warn,
    /// Falha a sentença com [`MarkupError::CrossingSpans`].
    Reject,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupConfig {
    pub input: InputFormat,
    pub output: OutputFormat,
    pub crossing: CrossingPolicy,
}

impl MarkupConfig {
    pub fn from_json(json: &str) -> Result<Self, MarkupError> {
        serde_json::from_str(json).map_err(|e| MarkupError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = MarkupConfig::from_json("{}").unwrap();
        assert_eq!(config, MarkupConfig::default());
        assert_eq!(config.input, InputFormat::Untokenized);
        assert_eq!(config.output, OutputFormat::Xml);
        assert_eq!(config.crossing, CrossingPolicy::Warn);
    }

    #[test]
    fn test_snake_case_names() {
        let config = MarkupConfig::from_json(r#"{"input": "vertical", "output": "char_span"}"#).unwrap();
        assert_eq!(config.input, InputFormat::Vertical);
        assert_eq!(config.output, OutputFormat::CharSpan);
    }

    #[test]
    fn test_unknown_format_is_config_error() {
        let err = MarkupConfig::from_json(r#"{"output": "html"}"#).unwrap_err();
        assert!(matches!(err, MarkupError::Config(_)));
    }
}
