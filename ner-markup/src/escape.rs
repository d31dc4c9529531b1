//! # Escape de Texto para Marcação
//!
//! Todo fragmento de texto literal emitido pelos renderizadores passa por aqui.
//! Apenas quatro caracteres são significativos para a marcação gerada:
//!
//! | Caractere | Entidade  |
//! |-----------|-----------|
//! | `&`       | `&amp;`   |
//! | `<`       | `&lt;`    |
//! | `>`       | `&gt;`    |
//! | `"`       | `&quot;`  |
//!
//! A marcação produzida pelos próprios renderizadores (nomes de tags, aspas de
//! atributos, o valor de `type`) **nunca** é escapada.

use std::borrow::Cow;
use std::io::{self, Write};

fn entity_for(c: char) -> Option<&'static str> {
    match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '"' => Some("&quot;"),
        _ => None,
    }
}

/// Escapa um fragmento de texto.
///
/// A substituição é feita em uma única passada, o que equivale a tratar `&`
/// antes dos demais: nenhuma entidade recém-inserida é escapada de novo.
/// Retorna `Cow::Borrowed` quando não há nada a escapar.
///
/// # Exemplo
/// ```rust
/// use ner_markup::escape::escape;
///
/// assert_eq!(escape("AT&T <b>"), "AT&amp;T &lt;b&gt;");
/// assert_eq!(escape("Praga"), "Praga");
/// ```
pub fn escape(text: &str) -> Cow<'_, str> {
    let Some(first) = text.find(['&', '<', '>', '"']) else {
        return Cow::Borrowed(text);
    };

    let mut out = String::with_capacity(text.len() + 8);
    out.push_str(&text[..first]);
    for c in text[first..].chars() {
        match entity_for(c) {
            Some(entity) => out.push_str(entity),
            None => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Escreve `text` escapado diretamente no destino, sem alocar.
pub fn write_escaped<W: Write + ?Sized>(out: &mut W, text: &str) -> io::Result<()> {
    let mut plain = 0;
    for (i, c) in text.char_indices() {
        if let Some(entity) = entity_for(c) {
            out.write_all(text[plain..i].as_bytes())?;
            out.write_all(entity.as_bytes())?;
            plain = i + c.len_utf8();
        }
    }
    out.write_all(text[plain..].as_bytes())
}

/// Desfaz as quatro substituições de [`escape`].
///
/// `&amp;` é tratado por último, na ordem inversa do escape, para que
/// `&amp;lt;` volte a ser `&lt;` e não `<`.
pub fn unescape(text: &str) -> String {
    text.replace("&quot;", "\"")
        .replace("&gt;", ">")
        .replace("&lt;", "<")
        .replace("&amp;", "&")
}
