//! Per-type schemas: the ordered, validated list of mapped fields.

use crate::error::SchemaError;
use crate::path::{KeyPath, normalize_key};
use crate::record::FieldKind;
use crate::scalar::ScalarKind;
use crate::tag::parse_tag;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Accessor for a type's cached schema.
pub type SchemaFn = fn() -> Result<&'static Schema, SchemaError>;

/// One field as declared on a struct, before its tag is parsed.
#[derive(Debug, Clone, Copy)]
pub struct FieldDecl {
    field: &'static str,
    tag: &'static str,
    kind: Option<FieldKind>,
}

impl FieldDecl {
    /// A mapped field.
    #[must_use]
    pub const fn new(field: &'static str, tag: &'static str, kind: FieldKind) -> Self {
        Self {
            field,
            tag,
            kind: Some(kind),
        }
    }

    /// A field tagged `-`; its type does not need to be codec-aware.
    #[must_use]
    pub const fn unmapped(field: &'static str, tag: &'static str) -> Self {
        Self {
            field,
            tag,
            kind: None,
        }
    }
}

/// A mapped field in a [`Schema`].
#[derive(Debug, Clone)]
pub struct SchemaNode {
    index: usize,
    field: &'static str,
    key: String,
    omit_empty: bool,
    kind: FieldKind,
}

impl SchemaNode {
    /// Declaration index, as passed to `Record::slot`.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Rust field name.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        self.field
    }

    /// External key as written in the tag.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether zero values are skipped on encode.
    #[must_use]
    pub const fn omit_empty(&self) -> bool {
        self.omit_empty
    }

    /// Field shape.
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        self.kind
    }
}

/// Mapped fields of one record type in declaration order.
#[derive(Debug, Clone)]
pub struct Schema {
    type_name: &'static str,
    nodes: Vec<SchemaNode>,
}

impl Schema {
    /// Parse every tag and reject duplicate keys.
    ///
    /// Fields tagged `-` are dropped. Any malformed tag fails the whole type,
    /// including tags on unmapped fields.
    pub fn build(type_name: &'static str, decls: Vec<FieldDecl>) -> Result<Self, SchemaError> {
        let mut nodes = Vec::with_capacity(decls.len());
        let mut seen: HashMap<String, &'static str> = HashMap::new();

        for (index, decl) in decls.into_iter().enumerate() {
            let tag = parse_tag(decl.tag).map_err(|source| SchemaError::MalformedTag {
                type_name,
                field: decl.field,
                source,
            })?;
            let Some(kind) = decl.kind else {
                continue;
            };
            if tag.is_unmapped() {
                continue;
            }

            let lookup = normalize_key(tag.key());
            if let Some(first) = seen.insert(lookup.clone(), decl.field) {
                return Err(SchemaError::DuplicateKey {
                    type_name,
                    key: lookup,
                    first,
                    second: decl.field,
                });
            }

            nodes.push(SchemaNode {
                index,
                field: decl.field,
                key: tag.key().to_owned(),
                omit_empty: tag.omit_empty(),
                kind,
            });
        }

        Ok(Self { type_name, nodes })
    }

    /// Rust type name.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Mapped fields in declaration order.
    #[must_use]
    pub fn nodes(&self) -> &[SchemaNode] {
        &self.nodes
    }

    /// Every scalar key reachable from this schema, with sequence positions
    /// shown as `<n>`. Recursion stops past `max_depth` nested levels.
    pub fn key_patterns(&'static self, max_depth: usize) -> Result<Vec<KeyPattern>, SchemaError> {
        let mut patterns = Vec::new();
        collect_patterns(self, &KeyPath::root(), 0, max_depth, &mut patterns)?;
        Ok(patterns)
    }
}

/// A key the codec reads and writes, as reported by [`Schema::key_patterns`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPattern {
    /// Composed key; `<n>` marks a sequence index.
    pub path: String,
    /// Rust field that holds the value.
    pub field: &'static str,
    /// Leaf type.
    pub kind: ScalarKind,
    /// Whether the key is dropped from output when zero.
    pub omit_empty: bool,
}

fn collect_patterns(
    schema: &'static Schema,
    prefix: &KeyPath,
    depth: usize,
    max_depth: usize,
    out: &mut Vec<KeyPattern>,
) -> Result<(), SchemaError> {
    for node in schema.nodes() {
        let path = prefix.child(node.key());
        match node.kind() {
            FieldKind::Scalar(kind) => out.push(KeyPattern {
                path: path.to_string(),
                field: node.field(),
                kind,
                omit_empty: node.omit_empty(),
            }),
            FieldKind::Record(nested) if depth < max_depth => {
                collect_patterns(nested()?, &path, depth + 1, max_depth, out)?;
            },
            FieldKind::Sequence(element) if depth < max_depth => {
                collect_patterns(element()?, &path.element("<n>"), depth + 1, max_depth, out)?;
            },
            FieldKind::Record(_) | FieldKind::Sequence(_) | FieldKind::Map => {},
        }
    }
    Ok(())
}

/// Lazily-built schema storage for one type.
///
/// The derive emits one `static` cell per struct, so tags are parsed once
/// per process and every later call returns the same schema or error.
#[derive(Debug)]
pub struct SchemaCell {
    cell: OnceLock<Result<Schema, SchemaError>>,
}

impl SchemaCell {
    /// Empty cell.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// Cached schema, building it from `decls` on first call.
    pub fn get_or_build<F>(
        &'static self,
        type_name: &'static str,
        decls: F,
    ) -> Result<&'static Schema, SchemaError>
    where
        F: FnOnce() -> Vec<FieldDecl>,
    {
        match self.cell.get_or_init(|| Schema::build(type_name, decls())) {
            Ok(schema) => Ok(schema),
            Err(error) => Err(error.clone()),
        }
    }
}

impl Default for SchemaCell {
    fn default() -> Self {
        Self::new()
    }
}

/// Build and validate every schema reachable from `root`.
///
/// Walks run this first so a malformed tag deep in the tree fails the
/// operation before the destination is touched.
pub fn check_tree(root: SchemaFn) -> Result<&'static Schema, SchemaError> {
    let root_schema = root()?;
    let mut visited: Vec<&'static Schema> = vec![root_schema];
    let mut pending: Vec<&'static Schema> = vec![root_schema];

    while let Some(schema) = pending.pop() {
        for node in schema.nodes() {
            let nested = match node.kind() {
                FieldKind::Record(nested) | FieldKind::Sequence(nested) => nested()?,
                FieldKind::Scalar(_) | FieldKind::Map => continue,
            };
            if visited.iter().any(|seen| std::ptr::eq(*seen, nested)) {
                continue;
            }
            visited.push(nested);
            pending.push(nested);
        }
    }

    Ok(root_schema)
}
