//! # Tokenizadores
//!
//! O tokenizador divide um bloco de texto em sentenças e tokens, preservando a
//! posição original de cada token (offset em bytes UTF-8 dentro do bloco). Os
//! renderizadores dependem desses offsets para recuperar o texto entre tokens
//! (espaços, quebras de linha) e reproduzir a entrada sem perdas.
//!
//! ## Implementações
//!
//! - [`WordTokenizer`]: texto corrido. Usa as fronteiras de palavra do Unicode
//!   (UAX #29), mantém abreviações comuns ("Dr.", "Sra.") e separa sentenças
//!   em `.`, `!`, `?` e `…`.
//! - [`VerticalTokenizer`]: entrada já tokenizada, um token por linha; uma
//!   linha vazia encerra a sentença.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use ner_markup::tokenizer::{Tokenizer, WordTokenizer};
//!
//! let mut tokenizer = WordTokenizer::new();
//! tokenizer.set_text("O Dr. Silva chegou. Ele falou.");
//!
//! let first = tokenizer.next_sentence().unwrap();
//! let forms: Vec<&str> = first.iter().map(|t| t.text.as_str()).collect();
//! assert_eq!(forms, ["O", "Dr.", "Silva", "chegou", "."]);
//! assert!(tokenizer.next_sentence().is_some());
//! assert!(tokenizer.next_sentence().is_none());
//! ```

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Um token extraído do bloco de texto.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    /// A forma do token (ex: "Praga", ",").
    pub text: String,
    /// Offset de byte inicial dentro do bloco (inclusivo).
    pub start: usize,
    /// Comprimento em bytes.
    pub length: usize,
    /// Índice do token na sentença (0, 1, 2...).
    pub index: usize,
}

impl Token {
    /// Offset de byte final dentro do bloco (exclusivo).
    pub fn end(&self) -> usize {
        self.start + self.length
    }
}

/// Divide um bloco de texto em sentenças tokenizadas.
///
/// O tokenizador é reiniciado a cada bloco com [`Tokenizer::set_text`] e então
/// percorrido com [`Tokenizer::next_sentence`] até devolver `None`. Dentro de
/// uma sentença os tokens vêm em ordem e não se sobrepõem.
pub trait Tokenizer {
    fn set_text(&mut self, text: &str);
    fn next_sentence(&mut self) -> Option<Vec<Token>>;
}

/// Abreviações que não devem ter o ponto tratado como fim de sentença
const ABBREVIATIONS: &[&str] = &[
    "Dr", "Dra", "Sr", "Sra", "Prof", "Profa", "Gov", "Dep", "Sen", "Min",
    "Gen", "Cap", "Sgt", "Cel", "Brig", "Adm", "Des", "Pres", "Eng", "Arq",
    "Mr", "Mrs", "Ms", "St", "Jr", "Inc", "Ltd", "Co", "vs",
    "km", "cm", "mm", "kg", "mg", "ml", "etc", "vol", "art", "pág", "cap",
    "tel", "av", "S.A",
];

/// Pontuação que encerra uma sentença
const TERMINALS: &[&str] = &[".", "!", "?", "…"];

/// Tokenizador de texto corrido com divisão em sentenças.
#[derive(Debug, Default)]
pub struct WordTokenizer {
    sentences: VecDeque<Vec<Token>>,
}

impl WordTokenizer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tokenizer for WordTokenizer {
    fn set_text(&mut self, text: &str) {
        self.sentences = split_sentences(text).into();
    }

    fn next_sentence(&mut self) -> Option<Vec<Token>> {
        self.sentences.pop_front()
    }
}

fn split_sentences(text: &str) -> Vec<Vec<Token>> {
    let mut sentences = Vec::new();
    let mut current: Vec<Token> = Vec::new();
    // Pontuação final vista; a sentença fecha no próximo token que não seja pontuação final
    let mut pending_end = false;

    for (offset, segment) in text.split_word_bound_indices() {
        if segment.chars().all(char::is_whitespace) {
            continue;
        }

        // "Dr" + "." adjacentes formam um único token
        if segment == "." {
            if let Some(last) = current.last_mut() {
                if last.end() == offset && ABBREVIATIONS.contains(&last.text.as_str()) {
                    last.text.push('.');
                    last.length += 1;
                    continue;
                }
            }
        }

        let terminal = TERMINALS.contains(&segment);
        if pending_end && !terminal {
            flush_sentence(&mut sentences, &mut current);
            pending_end = false;
        }

        current.push(Token {
            text: segment.to_string(),
            start: offset,
            length: segment.len(),
            index: current.len(),
        });
        pending_end |= terminal;
    }

    flush_sentence(&mut sentences, &mut current);
    sentences
}

/// Fecha a sentença acumulada (se não vazia)
fn flush_sentence(sentences: &mut Vec<Vec<Token>>, current: &mut Vec<Token>) {
    if !current.is_empty() {
        sentences.push(std::mem::take(current));
    }
}

/// Tokenizador vertical: cada linha não vazia é um token.
///
/// Linhas vazias separam sentenças. Um `\r` final é removido da forma.
#[derive(Debug, Default)]
pub struct VerticalTokenizer {
    sentences: VecDeque<Vec<Token>>,
}

impl VerticalTokenizer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tokenizer for VerticalTokenizer {
    fn set_text(&mut self, text: &str) {
        let mut sentences = Vec::new();
        let mut current = Vec::new();
        let mut offset = 0;

        for line in text.split_inclusive('\n') {
            let form = line.trim_end_matches(['\n', '\r']);
            if form.is_empty() {
                flush_sentence(&mut sentences, &mut current);
            } else {
                current.push(Token {
                    text: form.to_string(),
                    start: offset,
                    length: form.len(),
                    index: current.len(),
                });
            }
            offset += line.len();
        }
        flush_sentence(&mut sentences, &mut current);

        self.sentences = sentences.into();
    }

    fn next_sentence(&mut self) -> Option<Vec<Token>> {
        self.sentences.pop_front()
    }
}
