use crate::datatype::DataType;
use crate::ir::{Direction, Import, Param, Procedure};
use crate::types::{Diagnostic, SkipKind};
use roxmltree::{Document, Node};
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadErrorKind {
    Io,
    Malformed,
}

/// Fatal extraction failure. Anything wrong with the document as a whole
/// ends the call; no partial import list is ever returned.
#[derive(Debug, Clone)]
pub struct ReadError {
    pub kind: ReadErrorKind,
    pub message: String,
    pub path: String,
}

impl Display for ReadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

impl std::error::Error for ReadError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOutput {
    pub imports: Vec<Import>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Walks occam-doc XML and rebuilds the signature of every externally
/// visible PROC. Type and direction information only exists as free text in
/// `definition` elements, so the walk is backed by prefix and glyph
/// heuristics on that text.
#[derive(Debug, Default)]
pub struct OccdocReader;

impl OccdocReader {
    pub fn read_path(&self, path: &Path) -> Result<ReadOutput, ReadError> {
        let input = fs::read_to_string(path).map_err(|err| ReadError {
            kind: ReadErrorKind::Io,
            message: err.to_string(),
            path: path.display().to_string(),
        })?;
        self.read_str(&input, &path.display().to_string())
    }

    /// `path` is display context for errors only.
    pub fn read_str(&self, input: &str, path: &str) -> Result<ReadOutput, ReadError> {
        let doc = Document::parse(input).map_err(|err| ReadError {
            kind: ReadErrorKind::Malformed,
            message: err.to_string(),
            path: path.to_string(),
        })?;

        let mut diagnostics = Vec::new();
        let imports = doc
            .root_element()
            .children()
            .filter(|node| node.is_element())
            .filter(|node| node.attribute("type") == Some("module"))
            .map(|node| read_import(node, &mut diagnostics))
            .collect();

        Ok(ReadOutput {
            imports,
            diagnostics,
        })
    }
}

fn read_import(module: Node, diagnostics: &mut Vec<Diagnostic>) -> Import {
    let module_name = format!("{}.module", module.attribute("name").unwrap_or(""));

    let procedures = module
        .descendants()
        .filter(|node| node.has_tag_name("declaration"))
        .filter(|node| node.attribute("type") == Some("proc"))
        .map(|node| read_procedure(node, &module_name, diagnostics))
        .collect();

    Import {
        module_name,
        procedures,
    }
}

fn read_procedure(decl: Node, module_name: &str, diagnostics: &mut Vec<Diagnostic>) -> Procedure {
    let name = decl.attribute("name").unwrap_or("").to_string();

    // The last definition under the declaration holds the fullest rendering
    // of the signature; earlier ones may be partial. Direction glyphs sit
    // after the declared name inside that text.
    let signature = decl
        .descendants()
        .filter(|node| node.has_tag_name("definition"))
        .last()
        .map(text_content)
        .unwrap_or_default();
    let window = match signature.find(&name) {
        Some(at) => signature[at + name.len()..].to_string(),
        None => String::new(),
    };

    let mut params = Vec::new();
    for group in decl.descendants().filter(|node| node.has_tag_name("params")) {
        match read_param(group, &name, &window) {
            Ok(param) => params.push(param),
            Err(skip) => diagnostics.push(Diagnostic {
                kind: skip.kind,
                module: module_name.to_string(),
                procedure: name.clone(),
                param: skip.param,
                message: skip.message,
            }),
        }
    }

    Procedure { name, params }
}

struct Skip {
    kind: SkipKind,
    param: Option<String>,
    message: String,
}

fn read_param(group: Node, proc_name: &str, window: &str) -> Result<Param, Skip> {
    let item = group.descendants().find(|node| node.has_tag_name("item"));
    let definition = group
        .descendants()
        .find(|node| node.has_tag_name("definition"));

    let (item, definition) = match (item, definition) {
        (Some(item), Some(definition)) => (item, definition),
        (item, _) => {
            return Err(Skip {
                kind: SkipKind::MissingField,
                param: item
                    .and_then(|node| node.attribute("name"))
                    .map(str::to_string),
                message: "params entry is missing its item or definition".to_string(),
            })
        }
    };

    let name = item.attribute("name").unwrap_or("").to_string();
    let type_text = text_content(definition);

    if let Some(rest) = type_text.strip_prefix("VAL") {
        Ok(Param::Value {
            ty: DataType::from_decl(rest),
            name,
        })
    } else if type_text.starts_with("CHAN") {
        // Strip "CHAN " including the separator.
        let carried = type_text.get(5..).unwrap_or("");
        Ok(Param::ChannelEnd {
            ty: DataType::from_decl(carried),
            direction: infer_direction(window, &name),
            owner: proc_name.to_string(),
            name,
        })
    } else {
        Err(Skip {
            kind: SkipKind::UnrecognizedKind,
            param: Some(name),
            message: format!("unrecognized parameter kind: {}", type_text.trim()),
        })
    }
}

/// The character directly after the parameter name in the post-name window
/// decides the direction. Anything other than a bare `?` or `!` stays
/// Unknown rather than guessing.
fn infer_direction(window: &str, name: &str) -> Direction {
    if name.is_empty() {
        return Direction::Unknown;
    }
    let Some(at) = window.find(name) else {
        return Direction::Unknown;
    };
    match window[at + name.len()..].chars().next() {
        Some('?') => Direction::Read,
        Some('!') => Direction::Write,
        _ => Direction::Unknown,
    }
}

fn text_content(node: Node) -> String {
    node.descendants()
        .filter(|node| node.is_text())
        .filter_map(|node| node.text())
        .collect()
}
