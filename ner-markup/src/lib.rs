//! # ner-markup — Renderização de Entidades Nomeadas como Texto Marcado
//!
//! Este crate transforma a saída de um reconhecedor de entidades nomeadas
//! (spans de tokens com um tipo) em texto marcado, preservando exatamente o
//! texto de entrada entre as tags.
//!
//! ## Arquitetura do Sistema
//!
//! O dado flui em blocos (parágrafos separados por linha vazia):
//!
//! 1.  **Leitura** ([`block`]): a entrada é dividida em blocos.
//! 2.  **Tokenização** ([`tokenizer`]): cada bloco vira sentenças de tokens com offsets.
//! 3.  **Reconhecimento** ([`recognizer`]): cada sentença recebe seus spans de entidades.
//! 4.  **Ordenação e validação** ([`entity`]): `(start ↑, length ↓)`, spans fora do
//!     intervalo são rejeitados.
//! 5.  **Renderização** ([`render`]), em um dos formatos:
//!     *   **XML aninhado por tokens** ([`xml`]): `<sentence>`, `<token>`, `<ne>`.
//!     *   **Intervalos de caracteres** ([`char_span`]): apenas `<ne>` sobre o texto original.
//!     *   **Listagem vertical** ([`vertical`]): números de linha, tipo e texto.
//!     *   **CoNLL** ([`conll`]): tags BIO por token.
//!
//! Todo texto literal passa por [`escape`].
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use ner_markup::{MarkupConfig, MarkupPipeline, RuleRecognizer};
//!
//! let mut recognizer = RuleRecognizer::new();
//! recognizer.add_entry("PER", "John");
//! recognizer.add_entry("LOC", "Prague");
//!
//! let pipeline = MarkupPipeline::new(recognizer, MarkupConfig::default());
//! let (xml, _stats) = pipeline.render_str("John lives in Prague").unwrap();
//!
//! assert_eq!(
//!     xml,
//!     "<sentence><ne type=\"PER\"><token>John</token></ne> <token>lives</token> \
//!      <token>in</token> <ne type=\"LOC\"><token>Prague</token></ne></sentence>"
//! );
//! ```

pub mod block;
pub mod char_span;
pub mod config;
pub mod conll;
pub mod entity;
pub mod error;
pub mod escape;
pub mod pipeline;
pub mod recognizer;
pub mod render;
pub mod tokenizer;
pub mod vertical;
pub mod xml;

pub use config::{CrossingPolicy, InputFormat, MarkupConfig, OutputFormat};
pub use entity::NamedEntity;
pub use error::MarkupError;
pub use pipeline::{MarkupPipeline, PipelineStats};
pub use recognizer::{FixedRecognizer, Recognizer, RuleRecognizer};
pub use tokenizer::{Token, Tokenizer};
pub use vertical::LineCounter;
