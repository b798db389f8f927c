use regex::Regex;
use std::sync::LazyLock;

/// `model Name { body }` with a brace-free body. `\w` is Unicode-aware, so
/// non-ASCII model names are accepted.
static MODEL_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bmodel\s+(\w+)\s*\{([^}]*)\}").unwrap());

const LINE_COMMENT: &str = "//";

/// A raw `model` block as found in the source text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelBlock<'a> {
    pub name: &'a str,
    pub body: &'a str,
}

impl<'a> ModelBlock<'a> {
    /// Trimmed declaration lines of the body, with blank lines and `//`
    /// comment lines removed.
    pub fn lines(self) -> impl Iterator<Item = &'a str> {
        self.body
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with(LINE_COMMENT))
    }
}

/// Scans schema text for model blocks. Anything between blocks (datasource,
/// generator, enum, half-typed models) is skipped.
#[derive(Debug, Clone, Copy)]
pub struct Lexer<'a> {
    input: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input }
    }

    /// Blocks in source order, non-overlapping.
    pub fn blocks(self) -> impl Iterator<Item = ModelBlock<'a>> {
        MODEL_BLOCK.captures_iter(self.input).filter_map(|caps| {
            let name = caps.get(1)?.as_str();
            let body = caps.get(2)?.as_str();
            Some(ModelBlock { name, body })
        })
    }
}
