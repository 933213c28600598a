use chrono::{TimeDelta, TimeZone, Utc};
use es_filter::{AstError, FilterCompiler, Node, parse_ast};
use serde_json::json;

#[test]
fn test_parse_nested_document() {
    let doc = r#"{
        "type": "ExpressionFilterTerm",
        "expression": {
            "type": "BinaryExpression",
            "operator": "AND",
            "left": {
                "type": "BinaryExpression",
                "operator": "in",
                "left": {"type": "Field", "name": "method"},
                "right": {"type": "ArrayLiteral", "elements": [
                    {"type": "StringLiteral", "value": "GET"},
                    {"type": "StringLiteral", "value": "HEAD"}
                ]}
            },
            "right": {
                "type": "UnaryExpression",
                "operator": "NOT",
                "argument": {
                    "type": "BinaryExpression",
                    "operator": "==",
                    "left": {"type": "Field", "name": "user"},
                    "right": {"type": "NullLiteral"}
                }
            }
        }
    }"#;

    let node = parse_ast(doc).expect("document should decode");
    assert_eq!(
        node,
        Node::expression(Node::and(
            Node::binary(
                "in",
                Node::field("method"),
                Node::array(vec![Node::string("GET"), Node::string("HEAD")]),
            ),
            Node::not(Node::binary("==", Node::field("user"), Node::null())),
        ))
    );

    let result = FilterCompiler::default().compile(&node).unwrap();
    assert_eq!(
        result.filter.to_json(),
        json!({
            "bool": {
                "must": [
                    { "terms": { "method": ["GET", "HEAD"] } },
                    { "bool": { "must_not": [{ "missing": { "field": "user" } }] } }
                ]
            }
        })
    );
    assert_eq!(result.filtered_fields, vec!["method", "user"]);
}

#[test]
fn test_parse_json5_document() {
    let doc = r#"{
        // hand-written filters may carry comments
        type: 'FulltextFilterTerm',
        text: 'disk full',
    }"#;
    assert_eq!(parse_ast(doc).unwrap(), Node::fulltext("disk full"));
}

#[test]
fn test_parse_moment_and_duration_literals() {
    let moment = parse_ast(r#"{"type": "MomentLiteral", "value": "2014-09-17T14:13:47Z"}"#).unwrap();
    assert_eq!(
        moment,
        Node::moment(Utc.with_ymd_and_hms(2014, 9, 17, 14, 13, 47).unwrap())
    );

    let seconds = parse_ast(r#"{"type": "DurationLiteral", "value": 90}"#).unwrap();
    assert_eq!(seconds, Node::duration(TimeDelta::seconds(90)));

    let iso = parse_ast(r#"{"type": "DurationLiteral", "value": "PT1M30S"}"#).unwrap();
    assert_eq!(iso, Node::duration(TimeDelta::seconds(90)));

    let clock = parse_ast(r#"{"type": "DurationLiteral", "value": "00:01:30"}"#).unwrap();
    assert_eq!(clock, Node::duration(TimeDelta::seconds(90)));
}

#[test]
fn test_unknown_node_type_is_rejected() {
    let err = parse_ast(r#"{"type": "CallExpression", "callee": "now"}"#).unwrap_err();
    assert!(matches!(err, AstError::UnsupportedNode(_)));
    assert!(
        err.to_string().contains("CallExpression"),
        "error should name the node type: {err}"
    );
}

#[test]
fn test_bad_duration_is_rejected() {
    let err = parse_ast(r#"{"type": "DurationLiteral", "value": "soon"}"#).unwrap_err();
    assert!(matches!(err, AstError::UnsupportedNode(_)));
}

#[test]
fn test_garbage_is_a_syntax_error() {
    let err = parse_ast("status == 200").unwrap_err();
    assert!(matches!(err, AstError::Syntax(_)));
}

#[test]
fn test_unknown_operator_decodes_but_fails_to_compile() {
    let node = parse_ast(
        r#"{"type": "BinaryExpression", "operator": "~~",
            "left": {"type": "Field", "name": "a"},
            "right": {"type": "NumberLiteral", "value": 1}}"#,
    )
    .expect("operators are not validated while decoding");

    let err = FilterCompiler::default().compile(&node).unwrap_err();
    assert_eq!(err.to_string(), "Invalid operator: ~~.");
}

#[test]
fn test_serialized_nodes_decode_again() {
    let node = Node::or(
        Node::binary("<", Node::float(0.5).expect("finite float"), Node::field("ratio")),
        Node::filter(Node::fulltext("timeout")),
    );
    let text = serde_json::to_string(&node).unwrap();
    assert_eq!(parse_ast(&text).unwrap(), node);
}
