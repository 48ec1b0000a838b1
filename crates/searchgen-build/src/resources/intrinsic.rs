//! CloudFormation intrinsic functions as JSON values.

use serde_json::{Value, json};

#[must_use]
pub fn reference(id: &str) -> Value {
    json!({ "Ref": id })
}

#[must_use]
pub fn get_att(id: &str, attribute: &str) -> Value {
    json!({ "Fn::GetAtt": [id, attribute] })
}

#[must_use]
pub fn join(delimiter: &str, parts: Vec<Value>) -> Value {
    json!({ "Fn::Join": [delimiter, parts] })
}

#[must_use]
pub fn select(index: u32, list: Value) -> Value {
    json!({ "Fn::Select": [index, list] })
}

#[must_use]
pub fn split(delimiter: &str, source: Value) -> Value {
    json!({ "Fn::Split": [delimiter, source] })
}

/// Join with an empty delimiter, merging adjacent literal strings.
#[must_use]
pub fn concat(parts: Vec<Value>) -> Value {
    let mut merged: Vec<Value> = Vec::with_capacity(parts.len());

    for part in parts {
        match (merged.last_mut(), &part) {
            (Some(Value::String(last)), Value::String(next)) => last.push_str(next),
            _ => merged.push(part),
        }
    }

    join("", merged)
}
