use crate::prelude::*;

///
/// EnumType
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EnumType {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<Directive>,

    pub values: Vec<EnumValue>,
}

impl EnumType {
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            description: None,
            directives: Vec::new(),
            values: values.into_iter().map(EnumValue::new).collect(),
        }
    }
}

///
/// EnumValue
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EnumValue {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<Directive>,
}

impl EnumValue {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            directives: Vec::new(),
        }
    }
}
