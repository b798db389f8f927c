use crate::ast::{Entity, Field, Relation, Schema};
use crate::lexer::Lexer;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// How the declared type token is compared against entity names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeSuffix {
    /// The type token must equal the entity name character for character,
    /// so `Post[]` and `User?` never link.
    #[default]
    Exact,
    /// Trailing list (`[]`) and optional (`?`) markers are removed before
    /// comparing.
    StripModifiers,
}

impl TypeSuffix {
    pub fn normalize<'t>(&self, type_name: &'t str) -> &'t str {
        match self {
            Self::Exact => type_name,
            Self::StripModifiers => {
                let mut ty = type_name;
                loop {
                    if let Some(rest) = ty.strip_suffix("[]") {
                        ty = rest;
                    } else if let Some(rest) = ty.strip_suffix('?') {
                        ty = rest;
                    } else {
                        return ty;
                    }
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    pub type_suffix: TypeSuffix,
    /// Link to models declared later in the text. Off by default: a field
    /// only links to models already seen when its own model was scanned.
    pub forward_references: bool,
}

/// Recovers entities and relations from schema text. Never fails: text that
/// is not a model block is ignored.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    options: ParseOptions,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            lexer: Lexer::new(input),
            options: ParseOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    pub fn parse(&self) -> Schema {
        let mut entities: Vec<Entity> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        // Number of entities known when each entity's effective declaration
        // was scanned (itself included).
        let mut visible: Vec<usize> = Vec::new();

        for block in self.lexer.blocks() {
            let fields: Vec<Field> = block.lines().map(Field::from_line).collect();

            match index.get(block.name) {
                Some(&i) => {
                    debug!(entity = block.name, "model redeclared, keeping last body");
                    entities[i].fields = fields;
                    visible[i] = entities.len();
                }
                None => {
                    index.insert(block.name, entities.len());
                    entities.push(Entity {
                        name: block.name.to_string(),
                        fields,
                    });
                    visible.push(entities.len());
                }
            }
        }

        let relations = self.infer_relations(&entities, &index, &visible);

        debug!(
            entities = entities.len(),
            relations = relations.len(),
            "schema parsed"
        );

        Schema {
            entities,
            relations,
        }
    }

    fn infer_relations(
        &self,
        entities: &[Entity],
        index: &HashMap<&str, usize>,
        visible: &[usize],
    ) -> Vec<Relation> {
        let mut relations = Vec::new();

        for (i, entity) in entities.iter().enumerate() {
            for field in &entity.fields {
                let Some(type_name) = field.type_name.as_deref() else {
                    continue;
                };
                let target = self.options.type_suffix.normalize(type_name);

                let known = index
                    .get(target)
                    .is_some_and(|&j| self.options.forward_references || j < visible[i]);

                if known {
                    relations.push(Relation {
                        from: entity.name.clone(),
                        to: target.to_string(),
                        label: field.name.clone(),
                    });
                }
            }
        }

        relations
    }
}

/// Parse with the default (exact-match, no forward reference) options.
pub fn parse(input: &str) -> Schema {
    Parser::new(input).parse()
}

pub fn parse_with(input: &str, options: &ParseOptions) -> Schema {
    Parser::new(input).with_options(*options).parse()
}
