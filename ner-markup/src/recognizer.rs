//! # Reconhecedores — Interface e Motor de Regras
//!
//! Um reconhecedor recebe as formas dos tokens de **uma** sentença e devolve os
//! spans de entidades encontrados. Os índices dos spans referem-se apenas aos
//! tokens recebidos (`0 ≤ start`, `start + length ≤ forms.len()`).
//!
//! O crate não contém modelo estatístico; ele oferece:
//!
//! - [`RuleRecognizer`]: gazetteers de n-gramas, padrões de título
//!   ("presidente Lula"), sufixos de organização ("Embraer S.A.") e expressões
//!   regulares por token (ex: CNPJ). Ao contrário de um etiquetador BIO, ele
//!   devolve **todos** os casamentos, inclusive aninhados e cruzados
//!   ("Universidade de São Paulo" ORG contendo "São Paulo" LOC).
//! - [`FixedRecognizer`]: devolve spans já conhecidos, uma lista por sentença,
//!   na ordem em que as sentenças chegam.
//! - Qualquer closure `Fn(&[&str]) -> Result<Vec<NamedEntity>, MarkupError>`,
//!   útil quando os spans já vêm de outro sistema.

use std::cell::Cell;
use std::collections::{BTreeMap, BTreeSet, HashSet};

use regex::Regex;

use crate::entity::NamedEntity;
use crate::error::MarkupError;

/// Interface do reconhecedor de entidades nomeadas.
pub trait Recognizer {
    /// Reconhece as entidades de uma sentença tokenizada.
    fn recognize(&self, forms: &[&str]) -> Result<Vec<NamedEntity>, MarkupError>;

    /// Tipos de entidade que este reconhecedor pode produzir.
    fn entity_types(&self) -> Vec<String> {
        Vec::new()
    }
}

impl<F> Recognizer for F
where
    F: Fn(&[&str]) -> Result<Vec<NamedEntity>, MarkupError>,
{
    fn recognize(&self, forms: &[&str]) -> Result<Vec<NamedEntity>, MarkupError> {
        self(forms)
    }
}

/// Reconhecedor que repete spans calculados previamente.
///
/// A `n`-ésima chamada a `recognize` devolve a `n`-ésima lista; depois da
/// última, as sentenças não têm entidades. Os spans não são conferidos contra
/// as formas: a validação acontece na renderização.
#[derive(Debug, Default)]
pub struct FixedRecognizer {
    sentences: Vec<Vec<NamedEntity>>,
    next: Cell<usize>,
}

impl FixedRecognizer {
    pub fn new(sentences: Vec<Vec<NamedEntity>>) -> Self {
        Self {
            sentences,
            next: Cell::new(0),
        }
    }

    /// Volta para a primeira sentença.
    pub fn rewind(&self) {
        self.next.set(0);
    }
}

impl Recognizer for FixedRecognizer {
    fn recognize(&self, _forms: &[&str]) -> Result<Vec<NamedEntity>, MarkupError> {
        let index = self.next.get();
        self.next.set(index + 1);
        Ok(self.sentences.get(index).cloned().unwrap_or_default())
    }

    fn entity_types(&self) -> Vec<String> {
        let types: BTreeSet<String> = self
            .sentences
            .iter()
            .flatten()
            .map(|e| e.kind.clone())
            .collect();
        types.into_iter().collect()
    }
}

/// Padrão regex aplicado à forma de um único token
struct TokenPattern {
    kind: String,
    regex: Regex,
}

/// Motor de regras com gazetteers, padrões contextuais e regex.
pub struct RuleRecognizer {
    /// tipo → n-gramas conhecidos (lowercase)
    gazetteers: BTreeMap<String, Vec<Vec<String>>>,
    /// Títulos que precedem nomes de pessoas
    person_titles: HashSet<String>,
    /// Palavras que, após um nome capitalizado, indicam organização
    org_indicators: HashSet<String>,
    patterns: Vec<TokenPattern>,
}

impl RuleRecognizer {
    /// Motor vazio, apenas com títulos e indicadores de organização.
    pub fn new() -> Self {
        Self {
            gazetteers: BTreeMap::new(),
            person_titles: [
                "presidente", "ex-presidente", "senador", "senadora", "deputado",
                "deputada", "ministro", "ministra", "governador", "governadora",
                "prefeito", "prefeita", "general", "dr.", "dra.", "prof.",
                "president", "senator", "minister", "governor", "mayor", "mr.", "mrs.",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            org_indicators: [
                "s.a.", "s/a", "ltda", "eireli", "inc", "inc.", "corp", "ltd", "ltd.",
                "holdings", "group", "fc",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            patterns: Vec::new(),
        }
    }

    /// Motor com gazetteers de demonstração (pessoas, locais, organizações e
    /// eventos) e o padrão de CNPJ.
    pub fn with_default_gazetteers() -> Result<Self, MarkupError> {
        let mut engine = Self::new();

        for name in [
            "Lula", "Getúlio Vargas", "Juscelino Kubitschek", "Machado de Assis",
            "Clarice Lispector", "Pelé", "Ayrton Senna", "Barack Obama", "John",
        ] {
            engine.add_entry("PER", name);
        }
        for name in [
            "Brasil", "Brasília", "São Paulo", "Rio de Janeiro", "Belém", "Salvador",
            "Amazônia", "Portugal", "Praga", "Prague", "London", "New York",
        ] {
            engine.add_entry("LOC", name);
        }
        for name in [
            "Petrobras", "Embraer", "Supremo Tribunal Federal", "Universidade de São Paulo",
            "IBGE", "FIFA", "ONU", "Banco Mundial",
        ] {
            engine.add_entry("ORG", name);
        }
        for name in ["Copa do Mundo", "Carnaval", "Lei Maria da Penha", "COVID-19"] {
            engine.add_entry("MISC", name);
        }

        engine.add_pattern("ORG", r"^\d{2}\.\d{3}\.\d{3}/\d{4}-\d{2}$")?;
        Ok(engine)
    }

    /// Adiciona uma entrada (uma ou mais palavras) ao gazetteer do tipo dado.
    pub fn add_entry(&mut self, kind: &str, name: &str) {
        let parts: Vec<String> = name.split_whitespace().map(|p| p.to_lowercase()).collect();
        if !parts.is_empty() {
            self.gazetteers.entry(kind.to_string()).or_default().push(parts);
        }
    }

    /// Adiciona um padrão regex aplicado a cada token isoladamente.
    pub fn add_pattern(&mut self, kind: &str, pattern: &str) -> Result<(), MarkupError> {
        let regex = Regex::new(pattern)
            .map_err(|e| MarkupError::Config(format!("padrão '{}' inválido: {}", pattern, e)))?;
        self.patterns.push(TokenPattern {
            kind: kind.to_string(),
            regex,
        });
        Ok(())
    }
}

impl Default for RuleRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

fn starts_upper(form: &str) -> bool {
    form.chars().next().map(char::is_uppercase).unwrap_or(false)
}

impl Recognizer for RuleRecognizer {
    fn recognize(&self, forms: &[&str]) -> Result<Vec<NamedEntity>, MarkupError> {
        let lower: Vec<String> = forms.iter().map(|f| f.to_lowercase()).collect();
        let mut found = Vec::new();

        // 1. Gazetteers (n-gramas): todos os casamentos, inclusive aninhados
        for (kind, entries) in &self.gazetteers {
            for parts in entries {
                if parts.len() > lower.len() {
                    continue;
                }
                for start in 0..=lower.len() - parts.len() {
                    if lower[start..start + parts.len()] == parts[..] {
                        found.push(NamedEntity::new(start, parts.len(), kind.as_str()));
                    }
                }
            }
        }

        // 2. Regra de título: "presidente X Y" → "X Y" é PER
        for i in 0..forms.len().saturating_sub(1) {
            if !self.person_titles.contains(&lower[i]) {
                continue;
            }
            let length = forms[i + 1..].iter().take_while(|f| starts_upper(f)).count();
            if length > 0 {
                found.push(NamedEntity::new(i + 1, length, "PER"));
            }
        }

        // 3. Indicadores de organização: "Embraer S.A." → ORG
        for i in 1..forms.len() {
            if self.org_indicators.contains(&lower[i]) && starts_upper(forms[i - 1]) {
                found.push(NamedEntity::new(i - 1, 2, "ORG"));
            }
        }

        // 4. Padrões regex por token
        for pattern in &self.patterns {
            for (i, form) in forms.iter().enumerate() {
                if pattern.regex.is_match(form) {
                    found.push(NamedEntity::new(i, 1, pattern.kind.as_str()));
                }
            }
        }

        // Remove duplicatas exatas mantendo a ordem de emissão
        let mut seen = HashSet::new();
        found.retain(|e| seen.insert(e.clone()));
        Ok(found)
    }

    fn entity_types(&self) -> Vec<String> {
        let mut types: BTreeSet<String> = self.gazetteers.keys().cloned().collect();
        types.insert("PER".to_string());
        types.insert("ORG".to_string());
        types.extend(self.patterns.iter().map(|p| p.kind.clone()));
        types.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gazetteer_multiword() {
        let mut engine = RuleRecognizer::new();
        engine.add_entry("LOC", "São Paulo");

        let entities = engine.recognize(&["o", "clube", "São", "Paulo", "venceu"]).unwrap();
        assert_eq!(entities, vec![NamedEntity::new(2, 2, "LOC")]);
    }

    #[test]
    fn test_nested_matches_are_kept() {
        let engine = RuleRecognizer::with_default_gazetteers().unwrap();
        let entities = engine
            .recognize(&["A", "Universidade", "de", "São", "Paulo", "abriu"])
            .unwrap();
        assert!(entities.contains(&NamedEntity::new(1, 4, "ORG")));
        assert!(entities.contains(&NamedEntity::new(3, 2, "LOC")));
    }

    #[test]
    fn test_title_pattern() {
        let engine = RuleRecognizer::new();
        let entities = engine
            .recognize(&["o", "presidente", "Barack", "Obama", "falou"])
            .unwrap();
        assert_eq!(entities, vec![NamedEntity::new(2, 2, "PER")]);
    }

    #[test]
    fn test_org_suffix_pattern() {
        let engine = RuleRecognizer::new();
        let entities = engine.recognize(&["a", "Embraer", "S.A.", "lucrou"]).unwrap();
        assert_eq!(entities, vec![NamedEntity::new(1, 2, "ORG")]);
    }

    #[test]
    fn test_regex_pattern_and_dedup() {
        let mut engine = RuleRecognizer::new();
        engine.add_entry("ORG", "12.345.678/0001-90");
        engine.add_pattern("ORG", r"^\d{2}\.\d{3}\.\d{3}/\d{4}-\d{2}$").unwrap();
        let entities = engine.recognize(&["CNPJ", "12.345.678/0001-90"]).unwrap();
        assert_eq!(entities, vec![NamedEntity::new(1, 1, "ORG")]);
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let mut engine = RuleRecognizer::new();
        assert!(matches!(engine.add_pattern("X", "(unclosed"), Err(MarkupError::Config(_))));
    }

    #[test]
    fn test_entity_types() {
        let engine = RuleRecognizer::with_default_gazetteers().unwrap();
        assert_eq!(engine.entity_types(), ["LOC", "MISC", "ORG", "PER"]);
    }

    #[test]
    fn test_fixed_recognizer_replays_per_sentence() {
        let fixed = FixedRecognizer::new(vec![
            vec![NamedEntity::new(0, 1, "PER")],
            vec![NamedEntity::new(1, 2, "LOC"), NamedEntity::new(0, 1, "ORG")],
        ]);
        assert_eq!(fixed.entity_types(), ["LOC", "ORG", "PER"]);

        assert_eq!(fixed.recognize(&["John"]).unwrap(), vec![NamedEntity::new(0, 1, "PER")]);
        assert_eq!(fixed.recognize(&["a", "b", "c"]).unwrap().len(), 2);
        assert!(fixed.recognize(&["x"]).unwrap().is_empty());

        fixed.rewind();
        assert_eq!(fixed.recognize(&["John"]).unwrap()[0].kind, "PER");
    }

    #[test]
    fn test_closure_recognizer() {
        let recognizer =
            |forms: &[&str]| Ok::<_, MarkupError>(vec![NamedEntity::new(0, forms.len(), "X")]);
        let entities = recognizer.recognize(&["a", "b"]).unwrap();
        assert_eq!(entities[0].length, 2);
        assert!(recognizer.entity_types().is_empty());
    }
}
