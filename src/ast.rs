use serde::Serialize;

/// Parsed data model: entities in discovery order plus the relations inferred
/// between them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Schema {
    pub entities: Vec<Entity>,
    pub relations: Vec<Relation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entity {
    pub name: String,
    pub fields: Vec<Field>,
}

/// One declaration line inside a model body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    /// Trimmed source line, kept verbatim for display.
    pub raw: String,
    pub name: String,
    pub type_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relation {
    pub from: String,
    pub to: String,
    /// Name of the field that establishes the relation.
    pub label: String,
}

impl Field {
    /// Split a declaration line on whitespace. Token 0 is the field name,
    /// token 1 (if any) the declared type.
    pub fn from_line(line: &str) -> Self {
        let mut tokens = line.split_whitespace();
        let name = tokens.next().unwrap_or_default().to_string();
        let type_name = tokens.next().map(str::to_string);
        Self {
            raw: line.to_string(),
            name,
            type_name,
        }
    }
}

impl Schema {
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
