//! Request and response mapping templates for search queries.
//!
//! Each query resolves through a two-stage pipeline. The outer resolver
//! stashes routing state and passes `{}` on; the data function builds the
//! search request and shapes hits into a connection.

use super::SearchableConfig;
use crate::{mapping::Expr, model::QUERY};
use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: i64 = 100;
pub const REQUEST_VERSION: &str = "2018-05-29";

const NONE: [Expr; 0] = [];

/// Function request template: search DSL for one query.
#[must_use]
pub fn request(config: &SearchableConfig, versioned: bool) -> String {
    let default_sort = config
        .key_fields
        .first()
        .map_or("id", String::as_str)
        .to_string();
    let strings = |items: Vec<&str>| Expr::list(items.into_iter().map(Expr::str));

    let mut body = vec![
        Expr::set(
            "indexPath",
            Expr::str(format!("/{}/_search", config.index_name())),
        ),
        Expr::set("nonKeywordFields", strings(config.non_keyword_fields())),
        Expr::set(
            "keyFields",
            strings(config.key_fields.iter().map(String::as_str).collect()),
        ),
        Expr::if_else(
            Expr::call("util.isNullOrEmpty", [Expr::reference("ctx.args.sort")]),
            Expr::compound([
                Expr::set("sortDirection", Expr::str("desc")),
                Expr::set("sortField", Expr::str(&default_sort)),
            ]),
            Expr::compound([
                Expr::set(
                    "sortDirection",
                    Expr::call(
                        "util.defaultIfNull",
                        [
                            Expr::reference("ctx.args.sort.direction"),
                            Expr::str("desc"),
                        ],
                    ),
                ),
                Expr::set(
                    "sortField",
                    Expr::call(
                        "util.defaultIfNull",
                        [Expr::reference("ctx.args.sort.field"), Expr::str(&default_sort)],
                    ),
                ),
            ]),
        ),
        Expr::set("sortDirection", Expr::call("sortDirection.toLowerCase", NONE)),
        Expr::set("sort", Expr::list(NONE)),
        sort_entry("sortField"),
        Expr::foreach(
            "keyField",
            Expr::reference("keyFields"),
            Expr::if_then(
                Expr::raw("$keyField != $sortField"),
                sort_entry("keyField"),
            ),
        ),
        Expr::set(
            "body",
            Expr::obj([
                (
                    "size",
                    Expr::call(
                        "util.defaultIfNull",
                        [
                            Expr::reference("ctx.args.limit"),
                            Expr::Int(DEFAULT_PAGE_SIZE),
                        ],
                    ),
                ),
                ("sort", Expr::reference("sort")),
            ]),
        ),
        Expr::if_then(
            !Expr::call("util.isNullOrEmpty", [Expr::reference("ctx.args.nextToken")]),
            Expr::put(
                "body",
                "search_after",
                Expr::call(
                    "util.parseJson",
                    [Expr::call(
                        "util.base64Decode",
                        [Expr::reference("ctx.args.nextToken")],
                    )],
                ),
            ),
        ),
        Expr::if_else(
            !Expr::call("util.isNullOrEmpty", [Expr::reference("ctx.args.filter")]),
            Expr::put(
                "body",
                "query",
                Expr::call(
                    "util.parseJson",
                    [Expr::call(
                        "util.transform.toElasticsearchQueryDSL",
                        [Expr::reference("ctx.args.filter")],
                    )],
                ),
            ),
            Expr::put(
                "body",
                "query",
                Expr::obj([("match_all", Expr::obj(Vec::<(String, Expr)>::new()))]),
            ),
        ),
    ];

    if versioned {
        body.push(Expr::put("body", "version", Expr::Bool(true)));
    }

    body.push(Expr::to_json(Expr::obj([
        ("version", Expr::str(REQUEST_VERSION)),
        ("operation", Expr::str("GET")),
        ("path", Expr::reference("indexPath")),
        (
            "params",
            Expr::obj([("body", Expr::reference("body"))]),
        ),
    ])));

    Expr::compound(body).render()
}

// sort_entry
// appends `{ "<field>[.keyword]": { "order": $sortDirection } }` to $sort
fn sort_entry(var: &str) -> Expr {
    let order = Expr::obj([("order", Expr::reference("sortDirection"))]);

    Expr::compound([
        Expr::set("sortEntry", Expr::obj(Vec::<(String, Expr)>::new())),
        Expr::if_else(
            Expr::call("nonKeywordFields.contains", [Expr::reference(var)]),
            Expr::qr(Expr::call(
                "sortEntry.put",
                [Expr::reference(var), order.clone()],
            )),
            Expr::qr(Expr::call(
                "sortEntry.put",
                [Expr::str(format!("${{{var}}}.keyword")), order],
            )),
        ),
        Expr::qr(Expr::call("sort.add", [Expr::reference("sortEntry")])),
    ])
}

/// Function response template: hits to `{ items, total, nextToken }`.
#[must_use]
pub fn response(versioned: bool) -> String {
    let collect = if versioned {
        Expr::compound([
            Expr::set(
                "row",
                Expr::call("entry.get", [Expr::str("_source")]),
            ),
            Expr::put(
                "row",
                "_version",
                Expr::call("entry.get", [Expr::str("_version")]),
            ),
            Expr::qr(Expr::call("items.add", [Expr::reference("row")])),
        ])
    } else {
        Expr::qr(Expr::call(
            "items.add",
            [Expr::call("entry.get", [Expr::str("_source")])],
        ))
    };

    Expr::compound([
        Expr::set("items", Expr::list(NONE)),
        Expr::foreach(
            "entry",
            Expr::reference("ctx.result.hits.hits"),
            Expr::compound([
                Expr::if_then(
                    !Expr::reference("foreach.hasNext"),
                    Expr::set(
                        "nextToken",
                        Expr::call(
                            "util.base64Encode",
                            [Expr::to_json(Expr::call("entry.get", [Expr::str("sort")]))],
                        ),
                    ),
                ),
                collect,
            ]),
        ),
        Expr::to_json(Expr::obj([
            ("items", Expr::reference("items")),
            ("total", Expr::reference("ctx.result.hits.total.value")),
            ("nextToken", Expr::reference("nextToken")),
        ])),
    ])
    .render()
}

/// Outer pipeline response: the last function's result, untouched.
///
/// Inlined into the stack, so it carries no trailing newline.
#[must_use]
pub fn pipeline_response() -> String {
    inline(&Expr::to_json(Expr::reference("ctx.prev.result")))
}

fn inline(expr: &Expr) -> String {
    expr.render().trim_end_matches('\n').to_string()
}

///
/// Fragment
/// piece of a template whose values are only known at deploy time
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub enum Fragment {
    Text(String),
    DomainRegion,
    DomainEndpoint,
}

///
/// StashTemplate
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct StashTemplate {
    pub fragments: Vec<Fragment>,
}

impl StashTemplate {
    /// Substitute concrete values, e.g. for local inspection.
    #[must_use]
    pub fn render(&self, region: &str, endpoint: &str) -> String {
        self.fragments
            .iter()
            .map(|fragment| match fragment {
                Fragment::Text(text) => text.as_str(),
                Fragment::DomainRegion => region,
                Fragment::DomainEndpoint => endpoint,
            })
            .collect()
    }
}

/// Outer pipeline request: stash routing state, hand `{}` to the functions.
#[must_use]
pub fn stash(config: &SearchableConfig) -> StashTemplate {
    let known = Expr::compound([
        Expr::put("ctx.stash", "typeName", Expr::str(QUERY)),
        Expr::put("ctx.stash", "fieldName", Expr::str(&config.query_field)),
    ])
    .render();

    StashTemplate {
        fragments: vec![
            Fragment::Text(format!("{known}$util.qr($ctx.stash.put(\"region\", \"")),
            Fragment::DomainRegion,
            Fragment::Text("\"))\n$util.qr($ctx.stash.put(\"endpoint\", \"https://".to_string()),
            Fragment::DomainEndpoint,
            Fragment::Text(format!(
                "\"))\n{}",
                inline(&Expr::to_json(Expr::obj(Vec::<(String, Expr)>::new())))
            )),
        ],
    }
}
