//! GML - Graph Modelling Language reader
//!
//! Reads the subset of GML that networkx and most graph tools emit:
//!
//! ```text
//! graph [
//!   directed 0
//!   node [ id 0 label "0" ]
//!   node [ id 1 label "1" ]
//!   edge [ source 0 target 1 ]
//! ]
//! ```
//!
//! Node identifiers are the `label` when present, otherwise the `id`. A float
//! label keeps its decimal point (`1.0`, not `1`), and character references
//! in strings (`&amp;`, `&#38;`, `&#x26;`) are decoded the way networkx does.
//! Unknown keys (attributes, `graphics` blocks) are skipped. Lists nest at
//! most [`MAX_DEPTH`] levels.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use contagion_core::{ContagionError, ContagionResult, NodeId};
use thiserror::Error;
use tracing::{debug, info};

use crate::Graph;

/// Deepest `[ ... ]` nesting accepted, counting the `graph` block itself
pub const MAX_DEPTH: usize = 64;

/// Syntax and structure errors, with the line they were found on
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GmlError {
    #[error("line {line}: unexpected character {ch:?}")]
    UnexpectedChar { line: usize, ch: char },

    #[error("line {line}: unterminated string")]
    UnterminatedString { line: usize },

    #[error("line {line}: expected a key, found {found}")]
    ExpectedKey { line: usize, found: String },

    #[error("line {line}: key {key} has no value")]
    MissingValue { line: usize, key: String },

    #[error("line {line}: unbalanced ']'")]
    UnbalancedBracket { line: usize },

    #[error("unclosed '[' opened on line {line}")]
    UnclosedList { line: usize },

    #[error("line {line}: lists nested deeper than {} levels", MAX_DEPTH)]
    TooDeep { line: usize },

    #[error("no top-level graph block")]
    NoGraph,

    #[error("{0} is missing an integer id")]
    MissingId(&'static str),

    #[error("duplicate node id {0}")]
    DuplicateId(i64),

    #[error("duplicate node label {0}")]
    DuplicateLabel(String),

    #[error("edge refers to unknown node id {0}")]
    UnknownEndpoint(i64),
}

impl From<GmlError> for ContagionError {
    fn from(err: GmlError) -> Self {
        ContagionError::MalformedGraph(err.to_string())
    }
}

/// A parsed GML value
#[derive(Debug, Clone, PartialEq)]
pub enum GmlValue {
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<(String, GmlValue)>),
}

impl GmlValue {
    fn as_int(&self) -> Option<i64> {
        match self {
            GmlValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    fn as_list(&self) -> Option<&[(String, GmlValue)]> {
        match self {
            GmlValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Text form used when a label becomes a node identifier
    fn label_text(&self) -> Option<String> {
        match self {
            GmlValue::Int(i) => Some(i.to_string()),
            GmlValue::Float(f) => Some(format!("{:?}", f)),
            GmlValue::Str(s) => Some(s.clone()),
            GmlValue::List(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Key(String),
    Int(i64),
    Float(f64),
    Str(String),
    Open,
    Close,
}

/// Load a graph from a GML file.
///
/// A missing file is [`ContagionError::GraphNotFound`]; anything else that
/// stops the graph from loading is [`ContagionError::MalformedGraph`].
pub fn read_gml(path: impl AsRef<Path>) -> ContagionResult<Graph> {
    let path = path.as_ref();
    info!("Loading graph from {}", path.display());

    let text = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ContagionError::GraphNotFound(path.to_path_buf()),
        _ => ContagionError::MalformedGraph(format!("{}: {}", path.display(), e)),
    })?;

    let graph = parse_gml(&text)?;
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        directed = graph.is_directed(),
        "Loaded graph"
    );
    Ok(graph)
}

/// Parse GML text into a graph
pub fn parse_gml(text: &str) -> Result<Graph, GmlError> {
    let tokens = tokenize(text)?;
    let document = parse_list(&mut tokens.into_iter(), None, 0)?;

    let body = document
        .iter()
        .find(|(k, _)| k == "graph")
        .and_then(|(_, v)| v.as_list())
        .ok_or(GmlError::NoGraph)?;

    build_graph(body)
}

fn build_graph(body: &[(String, GmlValue)]) -> Result<Graph, GmlError> {
    let directed = body
        .iter()
        .find(|(k, _)| k == "directed")
        .and_then(|(_, v)| v.as_int())
        .map(|d| d != 0)
        .unwrap_or(false);

    let mut graph = Graph::new(directed);
    let mut ids: HashMap<i64, NodeId> = HashMap::new();

    for (key, value) in body {
        if key != "node" {
            continue;
        }
        let attrs = value.as_list().ok_or(GmlError::MissingId("node"))?;
        let id = lookup(attrs, "id")
            .and_then(GmlValue::as_int)
            .ok_or(GmlError::MissingId("node"))?;
        let label = lookup(attrs, "label")
            .and_then(GmlValue::label_text)
            .unwrap_or_else(|| id.to_string());

        if ids.contains_key(&id) {
            return Err(GmlError::DuplicateId(id));
        }
        if graph.has_node(&label) {
            return Err(GmlError::DuplicateLabel(label));
        }
        let node = NodeId::new(label);
        graph.add_node(node.clone());
        ids.insert(id, node);
    }

    for (key, value) in body {
        if key != "edge" {
            continue;
        }
        let attrs = value.as_list().ok_or(GmlError::MissingId("edge"))?;
        let endpoint = |name: &str| -> Result<NodeId, GmlError> {
            let id = lookup(attrs, name)
                .and_then(GmlValue::as_int)
                .ok_or(GmlError::MissingId("edge"))?;
            ids.get(&id).cloned().ok_or(GmlError::UnknownEndpoint(id))
        };
        let source = endpoint("source")?;
        let target = endpoint("target")?;
        graph.add_edge(source, target);
    }

    debug!(nodes = graph.node_count(), edges = graph.edge_count(), "Parsed GML");
    Ok(graph)
}

fn lookup<'a>(attrs: &'a [(String, GmlValue)], key: &str) -> Option<&'a GmlValue> {
    attrs.iter().find(|(k, _)| k == key).map(|(_, v)| v)
}

fn tokenize(text: &str) -> Result<Vec<(Token, usize)>, GmlError> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    let mut line = 1;

    while let Some(&ch) = chars.peek() {
        match ch {
            '\n' => {
                line += 1;
                chars.next();
            }
            c if c.is_whitespace() => {
                chars.next();
            }
            '#' => {
                while let Some(&c) = chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            '[' => {
                chars.next();
                tokens.push((Token::Open, line));
            }
            ']' => {
                chars.next();
                tokens.push((Token::Close, line));
            }
            '"' => {
                let start = line;
                chars.next();
                let mut s = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some(c) => {
                            if c == '\n' {
                                line += 1;
                            }
                            s.push(c);
                        }
                        None => return Err(GmlError::UnterminatedString { line: start }),
                    }
                }
                tokens.push((Token::Str(unescape(&s)), start));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut key = String::new();
                while let Some(&c) = chars.peek() {
                    if !(c.is_ascii_alphanumeric() || c == '_') {
                        break;
                    }
                    key.push(c);
                    chars.next();
                }
                tokens.push((Token::Key(key), line));
            }
            c if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => {
                let mut num = String::new();
                while let Some(&c) = chars.peek() {
                    if !(c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E')) {
                        break;
                    }
                    num.push(c);
                    chars.next();
                }
                let token = if let Ok(i) = num.parse::<i64>() {
                    Token::Int(i)
                } else if let Ok(f) = num.parse::<f64>() {
                    Token::Float(f)
                } else {
                    return Err(GmlError::UnexpectedChar { line, ch: c });
                };
                tokens.push((token, line));
            }
            c => return Err(GmlError::UnexpectedChar { line, ch: c }),
        }
    }

    Ok(tokens)
}

/// Parse `key value` pairs until `]` (nested) or end of input (top level).
/// `opened` is the line of the enclosing `[`, if any; `depth` is how many
/// lists enclose this one.
fn parse_list<I>(
    tokens: &mut I,
    opened: Option<usize>,
    depth: usize,
) -> Result<Vec<(String, GmlValue)>, GmlError>
where
    I: Iterator<Item = (Token, usize)>,
{
    let mut items = Vec::new();

    loop {
        let (token, line) = match tokens.next() {
            Some(t) => t,
            None => match opened {
                Some(line) => return Err(GmlError::UnclosedList { line }),
                None => return Ok(items),
            },
        };

        let key = match token {
            Token::Key(key) => key,
            Token::Close => match opened {
                Some(_) => return Ok(items),
                None => return Err(GmlError::UnbalancedBracket { line }),
            },
            other => {
                return Err(GmlError::ExpectedKey {
                    line,
                    found: format!("{:?}", other),
                })
            }
        };

        let value = match tokens.next() {
            Some((Token::Int(i), _)) => GmlValue::Int(i),
            Some((Token::Float(f), _)) => GmlValue::Float(f),
            Some((Token::Str(s), _)) => GmlValue::Str(s),
            Some((Token::Open, open_line)) => {
                if depth >= MAX_DEPTH {
                    return Err(GmlError::TooDeep { line: open_line });
                }
                GmlValue::List(parse_list(tokens, Some(open_line), depth + 1)?)
            }
            _ => return Err(GmlError::MissingValue { line, key }),
        };
        items.push((key, value));
    }
}

/// Decode HTML character references; unrecognised ones stay literal
fn unescape(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = rest.find(';').and_then(|end| {
            let entity = &rest[1..end];
            let ch = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => entity.strip_prefix('#').and_then(|num| {
                    let hex = num.strip_prefix('x').or_else(|| num.strip_prefix('X'));
                    let code = match hex {
                        Some(hex) => u32::from_str_radix(hex, 16).ok(),
                        None => num.parse::<u32>().ok(),
                    };
                    code.and_then(char::from_u32)
                }),
            };
            ch.map(|c| (c, end))
        });

        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = r#"
graph [
  directed 0
  # five nodes in a line
  node [ id 0 label "0" ]
  node [ id 1 label "1" ]
  node [ id 2 label "2" ]
  node [ id 3 label "3" ]
  node [ id 4 label "4" ]
  edge [ source 0 target 1 ]
  edge [ source 1 target 2 ]
  edge [ source 2 target 3 ]
  edge [ source 3 target 4 ]
]
"#;

    #[test]
    fn test_parse_line_graph() {
        let graph = parse_gml(LINE).unwrap();

        assert!(!graph.is_directed());
        assert_eq!(graph.node_count(), 5);
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.undirected().degree(graph.index_of("2").unwrap()), 2);
    }

    #[test]
    fn test_label_falls_back_to_id() {
        let text = r#"graph [
            node [ id 10 ]
            node [ id 11 label "b" ]
            edge [ source 10 target 11 ]
        ]"#;
        let graph = parse_gml(text).unwrap();

        assert!(graph.has_node("10"));
        assert!(graph.has_node("b"));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_skips_unknown_attributes() {
        let text = r#"
graph [
  directed 1
  name "demo"
  node [ id 0 label "a" weight 1.5 graphics [ x 1.0 y -2.0 ] ]
  node [ id 1 label "b" ]
  edge [ source 1 target 0 value 3 ]
]
"#;
        let graph = parse_gml(text).unwrap();
        assert!(graph.is_directed());

        let adj = graph.directed();
        assert_eq!(adj.degree(graph.index_of("b").unwrap()), 1);
        assert_eq!(adj.degree(graph.index_of("a").unwrap()), 0);
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse_gml("node [ id 0 ]").unwrap_err(), GmlError::NoGraph);
        assert_eq!(
            parse_gml("graph [ node [ id 0 ] node [ id 0 ] ]").unwrap_err(),
            GmlError::DuplicateId(0)
        );
        assert_eq!(
            parse_gml("graph [ node [ id 0 ] edge [ source 0 target 7 ] ]").unwrap_err(),
            GmlError::UnknownEndpoint(7)
        );
        assert_eq!(
            parse_gml("graph [\n node [ id 0 ]").unwrap_err(),
            GmlError::UnclosedList { line: 1 }
        );
        assert_eq!(
            parse_gml("graph [ ] ]").unwrap_err(),
            GmlError::UnbalancedBracket { line: 1 }
        );
        assert!(matches!(
            parse_gml("graph [ label \"open ]").unwrap_err(),
            GmlError::UnterminatedString { line: 1 }
        ));
        assert!(matches!(
            parse_gml("graph [ node ]").unwrap_err(),
            GmlError::MissingValue { .. }
        ));
    }

    #[test]
    fn test_deeply_nested_lists_are_rejected() {
        let text = format!("graph [ {} ]", "a [ ".repeat(200_000));
        assert!(matches!(
            parse_gml(&text).unwrap_err(),
            GmlError::TooDeep { line: 1 }
        ));

        let nested = |depth: usize| {
            format!(
                "graph [ node [ id 0 ] {}{} ]",
                "a [ ".repeat(depth),
                "] ".repeat(depth)
            )
        };
        assert!(parse_gml(&nested(MAX_DEPTH - 1)).is_ok());
        assert!(parse_gml(&nested(MAX_DEPTH)).is_err());
    }

    #[test]
    fn test_labels_match_networkx() {
        let text = r#"graph [
            node [ id 0 label 1.0 ]
            node [ id 1 label 2.5 ]
            node [ id 2 label "R&amp;D &lt;lab&gt;" ]
            node [ id 3 label "caf&#233; &#x41;&#X42; &bogus; a & b" ]
        ]"#;
        let graph = parse_gml(text).unwrap();

        assert!(graph.has_node("1.0"));
        assert!(graph.has_node("2.5"));
        assert!(graph.has_node("R&D <lab>"));
        assert!(graph.has_node("café AB &bogus; a & b"));
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_gml("/definitely/not/here.gml").unwrap_err();
        assert!(matches!(err, ContagionError::GraphNotFound(_)));
    }

    #[test]
    fn test_read_malformed_file() {
        let path = std::env::temp_dir().join("contagion_graph_malformed.gml");
        fs::write(&path, "graph [ node [ id 0 ] edge [ source 0 target 3 ] ]").unwrap();

        let err = read_gml(&path).unwrap_err();
        let _ = fs::remove_file(&path);
        assert!(matches!(err, ContagionError::MalformedGraph(_)));
    }
}
