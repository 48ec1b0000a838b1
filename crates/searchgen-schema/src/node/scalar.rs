use crate::prelude::*;

///
/// ScalarType
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScalarType {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<Directive>,
}

///
/// UnionType
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UnionType {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<Directive>,

    pub members: Vec<String>,
}
