//! # Leitura em Blocos
//!
//! A entrada é processada em blocos (parágrafos): sequências de linhas
//! terminadas por uma linha vazia. A linha vazia pertence ao bloco que ela
//! encerra, então concatenar todos os blocos reproduz a entrada byte a byte.
//!
//! ```text
//! "Barack\nObama\n\nHe\nspoke\n"
//!   → "Barack\nObama\n\n"
//!   → "He\nspoke\n"
//! ```
//!
//! Linhas vazias consecutivas produzem blocos sem conteúdo (`"\n"`); eles são
//! mantidos porque a listagem vertical conta as linhas da entrada.

use std::io::{self, BufRead};

/// Iterador sobre os blocos de um leitor.
pub struct BlockReader<R> {
    reader: R,
    done: bool,
}

impl<R: BufRead> BlockReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            done: false,
        }
    }

    /// Lê o próximo bloco, ou `None` no fim da entrada.
    pub fn next_block(&mut self) -> io::Result<Option<String>> {
        let mut block = String::new();
        if self.done {
            return Ok(None);
        }

        loop {
            let before = block.len();
            if self.reader.read_line(&mut block)? == 0 {
                self.done = true;
                break;
            }
            if block[before..].trim_end_matches(['\n', '\r']).is_empty() {
                break;
            }
        }

        Ok(if block.is_empty() { None } else { Some(block) })
    }
}

impl<R: BufRead> Iterator for BlockReader<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_block().transpose()
    }
}
