//! The grammar container: named indices of terminals and non-terminals,
//! per-non-terminal production lists, and the memoized analysis caches.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::collections::HashSet;

use indexmap::IndexMap;
use log::debug;

use crate::error::{GrammarError, Result};
use crate::production::{Production, ProductionList, SymbolString};
use crate::symbol::{Symbol, SymbolId, SymbolKind};

const DEFAULT_EOF_NAME: &str = "EOF";

#[derive(Default)]
struct AnalysisCache {
    nullables: Option<HashSet<SymbolId>>,
    first_sets: Option<HashMap<SymbolId, HashSet<SymbolId>>>,
    follow_sets: Option<(SymbolId, HashMap<SymbolId, HashSet<SymbolId>>)>,
}

impl AnalysisCache {
    fn clear(&mut self) {
        self.nullables = None;
        self.first_sets = None;
        self.follow_sets = None;
    }
}

/// A context-free grammar: the mutable container the analysis and
/// transformation engines operate on.
///
/// `Grammar` is not required to be `Sync`: every operation runs to
/// completion synchronously and concurrent use of one `Grammar` from
/// multiple threads is unsupported, matching the single-threaded resource
/// model the core assumes throughout.
pub struct Grammar {
    symbols: Vec<Symbol>,
    by_name: IndexMap<String, SymbolId>,
    terminals: Vec<SymbolId>,
    non_terminals: Vec<SymbolId>,
    productions: HashMap<SymbolId, ProductionList>,
    eof_token: SymbolId,
    /// Set by every mutation; cleared by [`Grammar::ensure_fresh_cache`] once
    /// the cache has been invalidated for that mutation, so the three
    /// analyses above are recomputed at most once per mutation rather than
    /// once per call.
    modified: Cell<bool>,
    cache: RefCell<AnalysisCache>,
}

impl Grammar {
    /// Creates an empty grammar, pre-registering the default EOF terminal
    /// (name `"EOF"`).
    pub fn new() -> Self {
        let eof = Symbol::new(SymbolId(0), DEFAULT_EOF_NAME, SymbolKind::Terminal);
        let mut g = Self {
            symbols: vec![eof],
            by_name: IndexMap::new(),
            terminals: vec![SymbolId(0)],
            non_terminals: Vec::new(),
            productions: HashMap::new(),
            eof_token: SymbolId(0),
            modified: Cell::new(false),
            cache: RefCell::new(AnalysisCache::default()),
        };
        g.by_name.insert(DEFAULT_EOF_NAME.to_string(), SymbolId(0));
        g
    }

    pub(crate) fn mark_modified(&mut self) {
        self.modified.set(true);
    }

    /// Clears the cache and clears `modified` so subsequent analysis calls
    /// hit the cache until the next mutation sets `modified` again.
    fn ensure_fresh_cache(&self) {
        if self.modified.get() {
            self.cache.borrow_mut().clear();
            self.modified.set(false);
        }
    }

    fn next_id(&self) -> SymbolId {
        SymbolId(self.symbols.len() as u32)
    }

    fn reindex(&mut self) {
        for (i, id) in self.terminals.iter().enumerate() {
            self.symbol_mut(*id).set_index(i);
        }
        for (i, id) in self.non_terminals.iter().enumerate() {
            self.symbol_mut(*id).set_index(i);
        }
    }

    /// Registers `name` as a terminal, or returns the existing symbol if
    /// already registered as a terminal. Fails if `name` is already a
    /// non-terminal.
    pub fn add_terminal(&mut self, name: &str, result_type: Option<String>) -> Result<SymbolId> {
        if let Some(&id) = self.by_name.get(name) {
            if self.symbol(id).is_non_terminal() {
                return Err(GrammarError::ClassificationConflict(name.to_string()));
            }
            return Ok(id);
        }
        let id = self.next_id();
        let mut sym = Symbol::new(id, name, SymbolKind::Terminal);
        sym.set_result_type(result_type);
        self.symbols.push(sym);
        self.by_name.insert(name.to_string(), id);
        self.terminals.push(id);
        self.reindex();
        self.mark_modified();
        debug!("registered terminal `{}` ({})", name, id);
        Ok(id)
    }

    /// Registers `name` as a non-terminal. If `name` was already registered
    /// as a terminal, it is migrated atomically: removed from the terminal
    /// tables and added to the non-terminal tables.
    pub fn add_non_terminal(
        &mut self,
        name: &str,
        result_type: Option<String>,
    ) -> Result<SymbolId> {
        if let Some(&id) = self.by_name.get(name) {
            if self.symbol(id).is_non_terminal() {
                return Ok(id);
            }
            // Migrate terminal -> non-terminal.
            self.terminals.retain(|&t| t != id);
            self.non_terminals.push(id);
            let sym = self.symbol_mut(id);
            sym.set_kind(SymbolKind::NonTerminal);
            if result_type.is_some() {
                sym.set_result_type(result_type);
            }
            self.productions.entry(id).or_insert_with(ProductionList::new);
            self.reindex();
            self.mark_modified();
            debug!("migrated `{}` from terminal to non-terminal ({})", name, id);
            return Ok(id);
        }
        let id = self.next_id();
        let mut sym = Symbol::new(id, name, SymbolKind::NonTerminal);
        sym.set_result_type(result_type);
        self.symbols.push(sym);
        self.by_name.insert(name.to_string(), id);
        self.non_terminals.push(id);
        self.productions.insert(id, ProductionList::new());
        self.reindex();
        self.mark_modified();
        debug!("registered non-terminal `{}` ({})", name, id);
        Ok(id)
    }

    /// Overrides the designated EOF terminal (default name `"EOF"`).
    pub fn set_eof_token(&mut self, symbol: SymbolId) -> Result<()> {
        if self.symbol(symbol).is_non_terminal() {
            return Err(GrammarError::PreconditionViolation(
                "EOF token must be a terminal".to_string(),
            ));
        }
        self.eof_token = symbol;
        self.mark_modified();
        Ok(())
    }

    pub fn eof_token(&self) -> SymbolId {
        self.eof_token
    }

    /// Appends `production` to `nonterm`'s list, deduplicating on
    /// `(rhs, handler)`. Returns `true` if newly inserted.
    pub fn add_production(
        &mut self,
        nonterm: SymbolId,
        rhs: SymbolString,
        handler: Option<String>,
    ) -> Result<bool> {
        if !self.symbol(nonterm).is_non_terminal() {
            return Err(GrammarError::PreconditionViolation(format!(
                "production LHS `{}` is not a registered non-terminal",
                self.symbol(nonterm).name()
            )));
        }
        let production = Production::new(nonterm, rhs, handler);
        let inserted = self
            .productions
            .entry(nonterm)
            .or_insert_with(ProductionList::new)
            .insert(production);
        if inserted {
            self.mark_modified();
        }
        Ok(inserted)
    }

    pub fn symbol_by_name(&self, name: &str) -> Result<SymbolId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| GrammarError::UnknownSymbol(name.to_string()))
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0 as usize]
    }

    pub(crate) fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.0 as usize]
    }

    pub fn terminals(&self) -> &[SymbolId] {
        &self.terminals
    }

    pub fn non_terminals(&self) -> &[SymbolId] {
        &self.non_terminals
    }

    /// The default start symbol: the first non-terminal registered.
    pub fn start_symbol(&self) -> Option<SymbolId> {
        self.non_terminals.first().copied()
    }

    pub fn productions_of(&self, nonterm: SymbolId) -> &ProductionList {
        static EMPTY: std::sync::OnceLock<ProductionList> = std::sync::OnceLock::new();
        self.productions
            .get(&nonterm)
            .unwrap_or_else(|| EMPTY.get_or_init(ProductionList::new))
    }

    pub(crate) fn productions_of_mut(&mut self, nonterm: SymbolId) -> &mut ProductionList {
        self.productions.entry(nonterm).or_insert_with(ProductionList::new)
    }

    /// All `(non-terminal, production)` pairs, in non-terminal registration
    /// order and then production insertion order.
    pub fn all_productions(&self) -> impl Iterator<Item = (SymbolId, &Production)> {
        self.non_terminals.iter().flat_map(move |&nt| {
            self.productions_of(nt).iter().map(move |p| (nt, p))
        })
    }

    /// Removes every non-terminal for which `predicate` returns `true`,
    /// along with any production (anywhere in the grammar) referencing a
    /// removed symbol. This is the `removes(symbols, invert)` primitive
    /// from the design: callers invert the predicate themselves when they
    /// want to keep only a matching subset.
    pub fn remove_non_terminals<F: Fn(SymbolId) -> bool>(&mut self, predicate: F) {
        let doomed: HashSet<SymbolId> = self
            .non_terminals
            .iter()
            .copied()
            .filter(|&nt| predicate(nt))
            .collect();
        if doomed.is_empty() {
            return;
        }
        self.non_terminals.retain(|nt| !doomed.contains(nt));
        for nt in &doomed {
            self.productions.remove(nt);
            self.by_name.shift_remove(self.symbol(*nt).name());
        }
        for list in self.productions.values_mut() {
            list.remove_matching(|p| doomed.iter().any(|&d| p.rhs().contains(d)));
        }
        self.reindex();
        self.mark_modified();
        debug!("removed {} useless non-terminal(s)", doomed.len());
    }

    /// Deep-copies the grammar: symbols, usages, strings and production
    /// lists are all cloned, and every `SymbolId` is preserved verbatim
    /// since both grammars share the same arena layout. No `Symbol` is
    /// shared between the original and the copy.
    pub fn deep_copy(&self) -> Grammar {
        Grammar {
            symbols: self.symbols.clone(),
            by_name: self.by_name.clone(),
            terminals: self.terminals.clone(),
            non_terminals: self.non_terminals.clone(),
            productions: self.productions.clone(),
            eof_token: self.eof_token,
            modified: Cell::new(true),
            cache: RefCell::new(AnalysisCache::default()),
        }
    }

    // --- memoized analyses -------------------------------------------------

    pub fn nullables(&self) -> HashSet<SymbolId> {
        self.ensure_fresh_cache();
        if let Some(n) = &self.cache.borrow().nullables {
            return n.clone();
        }
        debug!(
            "computing nullables ({} non-terminals)",
            self.non_terminals.len()
        );
        let computed = crate::nullable::compute_nullables(self);
        self.cache.borrow_mut().nullables = Some(computed.clone());
        computed
    }

    pub fn first_sets(&self) -> HashMap<SymbolId, HashSet<SymbolId>> {
        self.ensure_fresh_cache();
        if let Some(f) = &self.cache.borrow().first_sets {
            return f.clone();
        }
        let nullables = self.nullables();
        debug!(
            "computing FIRST sets ({} symbols)",
            self.symbols.len()
        );
        let computed = crate::first_follow::compute_first_sets(self, &nullables);
        self.cache.borrow_mut().first_sets = Some(computed.clone());
        computed
    }

    /// FOLLOW sets for `start` (defaults to [`Grammar::start_symbol`]).
    pub fn follow_sets(&self, start: Option<SymbolId>) -> HashMap<SymbolId, HashSet<SymbolId>> {
        self.ensure_fresh_cache();
        let start = start.or_else(|| self.start_symbol()).unwrap_or(self.eof_token);
        if let Some((cached_start, f)) = &self.cache.borrow().follow_sets {
            if *cached_start == start {
                return f.clone();
            }
        }
        let nullables = self.nullables();
        let first_sets = self.first_sets();
        debug!("computing FOLLOW sets from start {}", start);
        let computed =
            crate::first_follow::compute_follow_sets(self, start, &nullables, &first_sets);
        self.cache.borrow_mut().follow_sets = Some((start, computed.clone()));
        computed
    }

    /// Stamps every production's predict set; see
    /// [`crate::first_follow::eval_predict_sets`].
    pub fn eval_predict_sets(&mut self, start: Option<SymbolId>) {
        crate::first_follow::eval_predict_sets(self, start);
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Grammar {{")?;
        for (nt, prod) in self.all_productions() {
            writeln!(f, "  {} -> {}", self.symbol(nt).name(), prod.rhs())?;
        }
        write!(f, "}}")
    }
}
