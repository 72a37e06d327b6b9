//! LL(1) generator shell.
//!
//! Consumes a grammar that has been cleansed of cycles and left recursion
//! and reports, per non-terminal, an ordered dispatch table of
//! `(predict_set, production)` pairs. It does not emit source text; an
//! external code emitter is expected to consume [`Plan`] and lower it to
//! whatever target language/runtime it targets.

use log::debug;

use crate::error::{GrammarError, Result};
use crate::grammar::Grammar;
use crate::production::Production;
use crate::symbol::SymbolId;

/// One alternative a non-terminal's generated routine dispatches to when
/// the lookahead token falls in `predict_set`.
#[derive(Debug, Clone)]
pub struct DispatchEntry {
    pub predict_set: Vec<SymbolId>,
    pub production: Production,
}

/// The dispatch table for a single non-terminal's generated routine.
#[derive(Debug, Clone)]
pub struct NonTerminalDispatch {
    pub non_terminal: SymbolId,
    pub entries: Vec<DispatchEntry>,
}

/// A complete generation plan: one dispatch table per non-terminal, in
/// registration order.
#[derive(Debug, Clone)]
pub struct Plan {
    pub start: SymbolId,
    pub tables: Vec<NonTerminalDispatch>,
}

/// Builds the dispatch plan for `grammar`, asserting the grammar is free
/// of cycles and left recursion first.
pub fn generate(grammar: &mut Grammar, start: Option<SymbolId>) -> Result<Plan> {
    if !crate::cycles::detect_cycles(grammar).is_empty() {
        return Err(GrammarError::PreconditionViolation(
            "LL generation requires a grammar with no cycles".to_string(),
        ));
    }
    if !crate::left_recursion::detect_left_recursion(grammar).is_empty() {
        return Err(GrammarError::PreconditionViolation(
            "LL generation requires a grammar with no left recursion".to_string(),
        ));
    }

    let start = start.or_else(|| grammar.start_symbol()).ok_or_else(|| {
        GrammarError::PreconditionViolation("grammar has no non-terminals".to_string())
    })?;
    grammar.eval_predict_sets(Some(start));

    let tables = grammar
        .non_terminals()
        .iter()
        .map(|&nt| {
            let entries = grammar
                .productions_of(nt)
                .iter()
                .map(|p| DispatchEntry {
                    predict_set: p.predict_set().to_vec(),
                    production: p.clone(),
                })
                .collect();
            NonTerminalDispatch {
                non_terminal: nt,
                entries,
            }
        })
        .collect();

    debug!(
        "built LL dispatch plan for {} non-terminal(s) from start {}",
        grammar.non_terminals().len(),
        start
    );
    Ok(Plan { start, tables })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::production::SymbolString;
    use crate::symbol::SymbolUsage;

    #[test]
    fn builds_a_dispatch_table_per_non_terminal() {
        // S -> a | b
        let mut g = Grammar::new();
        let s = g.add_non_terminal("S", None).unwrap();
        let a = g.add_terminal("a", None).unwrap();
        let b = g.add_terminal("b", None).unwrap();
        g.add_production(s, SymbolString::new(vec![SymbolUsage::new(a)]), None)
            .unwrap();
        g.add_production(s, SymbolString::new(vec![SymbolUsage::new(b)]), None)
            .unwrap();

        let plan = generate(&mut g, None).unwrap();
        assert_eq!(plan.tables.len(), 1);
        assert_eq!(plan.tables[0].entries.len(), 2);
        assert!(plan.tables[0]
            .entries
            .iter()
            .any(|e| e.predict_set == vec![a]));
        assert!(plan.tables[0]
            .entries
            .iter()
            .any(|e| e.predict_set == vec![b]));
    }

    #[test]
    fn rejects_a_grammar_with_left_recursion() {
        let mut g = Grammar::new();
        let e = g.add_non_terminal("E", None).unwrap();
        let plus = g.add_terminal("+", None).unwrap();
        g.add_production(
            e,
            SymbolString::new(vec![SymbolUsage::new(e), SymbolUsage::new(plus)]),
            None,
        )
        .unwrap();
        assert!(generate(&mut g, None).is_err());
    }

    #[test]
    fn rejects_a_grammar_with_cycles() {
        let mut g = Grammar::new();
        let a = g.add_non_terminal("A", None).unwrap();
        let b = g.add_non_terminal("B", None).unwrap();
        g.add_production(a, SymbolString::new(vec![SymbolUsage::new(b)]), None)
            .unwrap();
        g.add_production(b, SymbolString::new(vec![SymbolUsage::new(a)]), None)
            .unwrap();
        assert!(generate(&mut g, None).is_err());
    }
}
