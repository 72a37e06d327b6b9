//! Symbol types for context-free grammars.
//!
//! A grammar is built out of [`Symbol`]s (terminals and non-terminals,
//! identified by name) referenced throughout productions by the stable
//! [`SymbolId`] handle the owning [`crate::grammar::Grammar`] assigns when
//! the symbol is registered.

use std::fmt;

/// Stable handle to a [`Symbol`] owned by a [`crate::grammar::Grammar`].
///
/// Productions and symbol usages never hold a `Symbol` by value or by name;
/// they hold a `SymbolId`, which stays valid across grammar mutations
/// (removal aside) and is cheap to copy, hash and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub(crate) u32);

impl SymbolId {
    /// Raw arena index backing this handle, for diagnostics only.
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The classification of a [`Symbol`]: exactly one applies at any point in
/// time. Reclassifying a symbol (terminal -> non-terminal) is done through
/// [`crate::grammar::Grammar::add_non_terminal`], which migrates both sides
/// of the grammar's indices atomically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Terminal,
    NonTerminal,
}

/// A named grammar atom with a stable identity (by name).
///
/// Every `Symbol` belongs to exactly one `Grammar` and is addressed from
/// the outside via its [`SymbolId`], not by value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    id: SymbolId,
    name: String,
    result_type: Option<String>,
    kind: SymbolKind,
    /// Position among symbols of the same classification, assigned by the
    /// owning grammar; renumbered whenever a symbol migrates classification
    /// or is removed.
    index: usize,
}

impl Symbol {
    pub(crate) fn new(id: SymbolId, name: impl Into<String>, kind: SymbolKind) -> Self {
        Self {
            id,
            name: name.into(),
            result_type: None,
            kind,
            index: 0,
        }
    }

    pub fn id(&self) -> SymbolId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn result_type(&self) -> Option<&str> {
        self.result_type.as_deref()
    }

    pub fn set_result_type(&mut self, result_type: Option<String>) {
        self.result_type = result_type;
    }

    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    pub(crate) fn set_kind(&mut self, kind: SymbolKind) {
        self.kind = kind;
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, SymbolKind::Terminal)
    }

    pub fn is_non_terminal(&self) -> bool {
        matches!(self.kind, SymbolKind::NonTerminal)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result_type {
            Some(rt) => write!(f, "{}({})", self.name, rt),
            None => write!(f, "{}", self.name),
        }
    }
}

/// A reference to a [`Symbol`] as it appears inside a production.
///
/// Two usages compare equal iff they refer to the same symbol; `varname`
/// and `is_optional` are not part of identity, matching the dedup rule
/// productions use when comparing right-hand sides pointwise.
#[derive(Debug, Clone)]
pub struct SymbolUsage {
    symbol: SymbolId,
    varname: Option<String>,
    is_optional: bool,
}

impl SymbolUsage {
    pub fn new(symbol: SymbolId) -> Self {
        Self {
            symbol,
            varname: None,
            is_optional: false,
        }
    }

    pub fn with_varname(mut self, varname: impl Into<String>) -> Self {
        self.varname = Some(varname.into());
        self
    }

    pub fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }

    pub fn symbol(&self) -> SymbolId {
        self.symbol
    }

    pub fn varname(&self) -> Option<&str> {
        self.varname.as_deref()
    }

    pub fn is_optional(&self) -> bool {
        self.is_optional
    }
}

impl PartialEq for SymbolUsage {
    fn eq(&self, other: &Self) -> bool {
        self.symbol == other.symbol
    }
}

impl Eq for SymbolUsage {}

impl std::hash::Hash for SymbolUsage {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.symbol.hash(state);
    }
}

impl fmt::Display for SymbolUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_optional {
            write!(f, "?")?;
        }
        if let Some(v) = &self.varname {
            write!(f, "{}:", v)?;
        }
        write!(f, "{}", self.symbol)
    }
}
