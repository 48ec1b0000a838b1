use crate::prelude::*;

///
/// InputObjectType
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InputObjectType {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<Directive>,

    pub fields: Vec<InputValue>,
}

impl InputObjectType {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            directives: Vec::new(),
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, field: InputValue) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&InputValue> {
        self.fields.iter().find(|f| f.name == name)
    }
}
