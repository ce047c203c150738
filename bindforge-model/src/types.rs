//! Native type descriptors and their structured form.
//!
//! Type spellings arrive from the external model as text
//! (`"vane::Node*"`, `"const gx::string&"`). They are parsed once into
//! [`TypeExpr`] so the mangler and the emitters work on structure instead
//! of re-scanning substrings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Builtin primitive types of the native ABI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// Signed integer.
    Int,
    /// Single-precision floating point.
    Float,
    /// Boolean.
    Bool,
    /// Narrow character.
    Char,
    /// Void (also the placeholder for malformed descriptors).
    Void,
}

impl Primitive {
    /// Parses a primitive from its native spelling.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "int" => Some(Self::Int),
            "float" => Some(Self::Float),
            "bool" => Some(Self::Bool),
            "char" => Some(Self::Char),
            "void" => Some(Self::Void),
            _ => None,
        }
    }

    /// Native spelling.
    #[must_use]
    pub const fn spelling(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Char => "char",
            Self::Void => "void",
        }
    }
}

/// Structured form of a native type spelling.
///
/// The grammar is deliberately shallow: qualification and template
/// arguments stay inside a [`TypeExpr::Named`] segment, since the binding
/// set only ever names whole instantiations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// A builtin primitive.
    Primitive(Primitive),
    /// A (possibly scope-qualified) named type. One element per scope
    /// segment; template arguments remain part of their segment's text.
    Named(Vec<String>),
    /// Pointer to the inner type.
    Pointer(Box<TypeExpr>),
    /// Reference to the inner type.
    Reference(Box<TypeExpr>),
    /// Const-qualified inner type.
    Const(Box<TypeExpr>),
    /// A spelling with a `const` in neither leading nor trailing position.
    /// Mangles to the void placeholder and surfaces as a diagnostic.
    Malformed(String),
}

impl TypeExpr {
    /// Parses a textual type spelling. Total: malformed input becomes
    /// [`TypeExpr::Malformed`] rather than an error, so one bad descriptor
    /// never aborts a generation run.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let s = text.trim();
        if s.is_empty() {
            return Self::Malformed(text.to_string());
        }
        if let Some(prefix) = s.strip_suffix('*') {
            return Self::Pointer(Box::new(Self::parse(prefix)));
        }
        if let Some(prefix) = s.strip_suffix('&') {
            return Self::Reference(Box::new(Self::parse(prefix)));
        }
        if let Some(prefix) = strip_trailing_const(s) {
            if prefix.trim().is_empty() {
                return Self::Malformed(text.to_string());
            }
            return Self::Const(Box::new(Self::parse(prefix)));
        }
        if let Some(rest) = s.strip_prefix("const ") {
            return Self::Const(Box::new(Self::parse(rest)));
        }
        if has_misplaced_const(s) {
            return Self::Malformed(text.to_string());
        }
        if let Some(p) = Primitive::parse(s) {
            return Self::Primitive(p);
        }
        Self::Named(split_scopes(s))
    }

    /// Returns true if this expression (at any nesting level) is malformed.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        match self {
            Self::Malformed(_) => true,
            Self::Pointer(inner) | Self::Reference(inner) | Self::Const(inner) => {
                inner.is_malformed()
            }
            Self::Primitive(_) | Self::Named(_) => false,
        }
    }

    /// The qualified path of a named type, joined with the scope separator.
    #[must_use]
    pub fn qualified_path(&self) -> Option<String> {
        match self {
            Self::Named(segments) => Some(segments.join("::")),
            _ => None,
        }
    }

    /// Spelling of this type in the emitted Rust unit.
    #[must_use]
    pub fn rust_spelling(&self) -> String {
        match self {
            Self::Primitive(Primitive::Int) => "i32".to_string(),
            Self::Primitive(Primitive::Float) => "f32".to_string(),
            Self::Primitive(Primitive::Bool) => "bool".to_string(),
            Self::Primitive(Primitive::Char) => "u8".to_string(),
            Self::Primitive(Primitive::Void) => "()".to_string(),
            Self::Named(segments) => segments.join("::"),
            Self::Pointer(inner) => match inner.as_ref() {
                Self::Const(pointee) => format!("*const {}", pointee.rust_spelling()),
                _ => format!("*mut {}", inner.rust_spelling()),
            },
            Self::Reference(inner) => match inner.as_ref() {
                Self::Const(referent) => format!("&{}", referent.rust_spelling()),
                _ => format!("&mut {}", inner.rust_spelling()),
            },
            Self::Const(inner) => inner.rust_spelling(),
            // Keeps the emitted unit compilable; the diagnostic carries the
            // original spelling.
            Self::Malformed(_) => "()".to_string(),
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(p) => f.write_str(p.spelling()),
            Self::Named(segments) => f.write_str(&segments.join("::")),
            Self::Pointer(inner) => write!(f, "{inner}*"),
            Self::Reference(inner) => write!(f, "{inner}&"),
            Self::Const(inner) => write!(f, "{inner} const"),
            Self::Malformed(text) => f.write_str(text),
        }
    }
}

/// Strips a trailing `const` qualifier, respecting word boundaries.
fn strip_trailing_const(s: &str) -> Option<&str> {
    let prefix = s.strip_suffix("const")?;
    if prefix.is_empty() || prefix.ends_with(char::is_whitespace) {
        Some(prefix)
    } else {
        None
    }
}

/// Detects a standalone `const` token outside template brackets after the
/// leading/trailing positions have been ruled out.
fn has_misplaced_const(s: &str) -> bool {
    let mut depth = 0usize;
    for token in split_depth0_words(s) {
        match token {
            "<" => depth += 1,
            ">" => depth = depth.saturating_sub(1),
            "const" if depth == 0 => return true,
            _ => {}
        }
    }
    false
}

/// Yields whitespace-separated words plus bracket markers.
fn split_depth0_words(s: &str) -> impl Iterator<Item = &str> {
    s.split_whitespace().flat_map(|word| {
        let mut parts = Vec::new();
        let mut start = 0;
        for (i, c) in word.char_indices() {
            if c == '<' || c == '>' {
                if start < i {
                    parts.push(&word[start..i]);
                }
                parts.push(&word[i..i + 1]);
                start = i + 1;
            }
        }
        if start < word.len() {
            parts.push(&word[start..]);
        }
        parts
    })
}

/// Splits a qualified name on `::` at template depth zero.
fn split_scopes(s: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let bytes = s.as_bytes();
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            b'>' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && i + 1 < bytes.len() && bytes[i + 1] == b':' => {
                segments.push(s[start..i].to_string());
                i += 2;
                start = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    segments.push(s[start..].to_string());
    segments
}

/// A textual type from the model, kept alongside its parsed structure so
/// diagnostics can cite the model text verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct TypeDescriptor {
    spelling: String,
    expr: TypeExpr,
}

impl TypeDescriptor {
    /// Creates a descriptor from a native type spelling.
    #[must_use]
    pub fn new(spelling: impl Into<String>) -> Self {
        let spelling = spelling.into();
        let expr = TypeExpr::parse(&spelling);
        Self { spelling, expr }
    }

    /// The `void` descriptor (default return type).
    #[must_use]
    pub fn void() -> Self {
        Self::new("void")
    }

    /// Original spelling from the model.
    #[must_use]
    pub fn spelling(&self) -> &str {
        &self.spelling
    }

    /// Parsed structure.
    #[must_use]
    pub fn expr(&self) -> &TypeExpr {
        &self.expr
    }

    /// Returns true if the return type is `void`.
    #[must_use]
    pub fn is_void(&self) -> bool {
        matches!(self.expr, TypeExpr::Primitive(Primitive::Void))
    }
}

impl From<String> for TypeDescriptor {
    fn from(spelling: String) -> Self {
        Self::new(spelling)
    }
}

impl From<&str> for TypeDescriptor {
    fn from(spelling: &str) -> Self {
        Self::new(spelling)
    }
}

impl From<TypeDescriptor> for String {
    fn from(descriptor: TypeDescriptor) -> Self {
        descriptor.spelling
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spelling)
    }
}
