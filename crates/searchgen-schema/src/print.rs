//! SDL printer. Output is a pure function of the node tree, so two equal
//! schemas always print byte-identical text.

use crate::node::{
    Directive, EnumType, Field, InputObjectType, InputValue, ObjectType, Schema, TypeDef,
    UnionType, escape,
};
use std::fmt::{self, Write};

const INDENT: &str = "  ";

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let blocks = self
            .types
            .iter()
            .map(print_type)
            .chain(self.verbatim.iter().cloned())
            .collect::<Vec<_>>();

        writeln!(f, "{}", blocks.join("\n\n"))
    }
}

impl fmt::Display for TypeDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&print_type(self))
    }
}

fn print_type(def: &TypeDef) -> String {
    let mut out = String::new();

    match def {
        TypeDef::Object(node) => print_object(&mut out, "type", node),
        TypeDef::Interface(node) => {
            print_description(&mut out, node.description.as_deref(), "");
            out.push_str("interface ");
            out.push_str(&node.name);
            print_implements(&mut out, &node.implements);
            print_directives(&mut out, &node.directives);
            print_fields(&mut out, &node.fields);
        }
        TypeDef::Union(node) => print_union(&mut out, node),
        TypeDef::Enum(node) => print_enum(&mut out, node),
        TypeDef::InputObject(node) => print_input(&mut out, node),
        TypeDef::Scalar(node) => {
            print_description(&mut out, node.description.as_deref(), "");
            out.push_str("scalar ");
            out.push_str(&node.name);
            print_directives(&mut out, &node.directives);
        }
    }

    out
}

fn print_object(out: &mut String, keyword: &str, node: &ObjectType) {
    print_description(out, node.description.as_deref(), "");
    out.push_str(keyword);
    out.push(' ');
    out.push_str(&node.name);
    print_implements(out, &node.implements);
    print_directives(out, &node.directives);
    print_fields(out, &node.fields);
}

fn print_fields(out: &mut String, fields: &[Field]) {
    if fields.is_empty() {
        return;
    }

    out.push_str(" {\n");
    for field in fields {
        print_description(out, field.description.as_deref(), INDENT);
        out.push_str(INDENT);
        out.push_str(&field.name);
        if !field.arguments.is_empty() {
            let args = field
                .arguments
                .iter()
                .map(input_value)
                .collect::<Vec<_>>();
            let _ = write!(out, "({})", args.join(", "));
        }
        let _ = write!(out, ": {}", field.ty);
        print_directives(out, &field.directives);
        out.push('\n');
    }
    out.push('}');
}

fn print_union(out: &mut String, node: &UnionType) {
    print_description(out, node.description.as_deref(), "");
    out.push_str("union ");
    out.push_str(&node.name);
    print_directives(out, &node.directives);
    if !node.members.is_empty() {
        let _ = write!(out, " = {}", node.members.join(" | "));
    }
}

fn print_enum(out: &mut String, node: &EnumType) {
    print_description(out, node.description.as_deref(), "");
    out.push_str("enum ");
    out.push_str(&node.name);
    print_directives(out, &node.directives);

    if node.values.is_empty() {
        return;
    }

    out.push_str(" {\n");
    for value in &node.values {
        print_description(out, value.description.as_deref(), INDENT);
        out.push_str(INDENT);
        out.push_str(&value.name);
        print_directives(out, &value.directives);
        out.push('\n');
    }
    out.push('}');
}

fn print_input(out: &mut String, node: &InputObjectType) {
    print_description(out, node.description.as_deref(), "");
    out.push_str("input ");
    out.push_str(&node.name);
    print_directives(out, &node.directives);

    if node.fields.is_empty() {
        return;
    }

    out.push_str(" {\n");
    for field in &node.fields {
        print_description(out, field.description.as_deref(), INDENT);
        out.push_str(INDENT);
        out.push_str(&input_value(field));
        out.push('\n');
    }
    out.push('}');
}

fn input_value(value: &InputValue) -> String {
    let mut out = format!("{}: {}", value.name, value.ty);
    if let Some(default) = &value.default_value {
        let _ = write!(out, " = {default}");
    }
    print_directives(&mut out, &value.directives);

    out
}

fn print_implements(out: &mut String, implements: &[String]) {
    if !implements.is_empty() {
        let _ = write!(out, " implements {}", implements.join(" & "));
    }
}

fn print_directives(out: &mut String, directives: &[Directive]) {
    for directive in directives {
        let _ = write!(out, " {directive}");
    }
}

fn print_description(out: &mut String, description: Option<&str>, indent: &str) {
    let Some(description) = description else {
        return;
    };

    if description.contains('\n') {
        let _ = writeln!(out, "{indent}\"\"\"");
        for line in description.lines() {
            let _ = writeln!(out, "{indent}{}", line.replace("\"\"\"", "\\\"\"\""));
        }
        let _ = writeln!(out, "{indent}\"\"\"");
    } else {
        let _ = writeln!(out, "{indent}\"{}\"", escape(description));
    }
}
