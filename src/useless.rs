//! Removal of useless symbols: non-terminals that can never derive a
//! terminal string, and non-terminals unreachable from the start symbol.

use std::collections::{HashSet, VecDeque};

use log::debug;

use crate::grammar::Grammar;
use crate::symbol::SymbolId;

/// Runs both passes in sequence: dropping non-terminating non-terminals
/// first (which may make others unreachable), then dropping anything not
/// reachable from `start` (defaults to [`Grammar::start_symbol`]).
pub fn remove_useless_symbols(grammar: &mut Grammar, start: Option<SymbolId>) {
    remove_non_terminating(grammar);
    remove_unreachable(grammar, start);
}

fn remove_non_terminating(grammar: &mut Grammar) {
    let mut derives_terminal: HashSet<SymbolId> = HashSet::new();
    loop {
        let mut changed = false;
        for &nt in grammar.non_terminals() {
            if derives_terminal.contains(&nt) {
                continue;
            }
            let terminates = grammar.productions_of(nt).iter().any(|prod| {
                prod.rhs().usages().iter().all(|usage| {
                    let symbol = usage.symbol();
                    grammar.symbol(symbol).is_terminal() || derives_terminal.contains(&symbol)
                })
            });
            if terminates {
                derives_terminal.insert(nt);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    let before = grammar.non_terminals().len();
    grammar.remove_non_terminals(|nt| !derives_terminal.contains(&nt));
    debug!(
        "useless-symbol pass 1: kept {}/{} non-terminating non-terminals",
        derives_terminal.len(),
        before
    );
}

fn remove_unreachable(grammar: &mut Grammar, start: Option<SymbolId>) {
    let Some(start) = start.or_else(|| grammar.start_symbol()) else {
        return;
    };
    if !grammar.non_terminals().contains(&start) {
        return;
    }
    let mut reachable: HashSet<SymbolId> = HashSet::from([start]);
    let mut queue: VecDeque<SymbolId> = VecDeque::from([start]);
    while let Some(nt) = queue.pop_front() {
        for prod in grammar.productions_of(nt).iter() {
            for usage in prod.rhs().usages() {
                let symbol = usage.symbol();
                if grammar.symbol(symbol).is_non_terminal() && reachable.insert(symbol) {
                    queue.push_back(symbol);
                }
            }
        }
    }
    let before = grammar.non_terminals().len();
    grammar.remove_non_terminals(|nt| !reachable.contains(&nt));
    debug!(
        "useless-symbol pass 2: kept {}/{} reachable non-terminals",
        reachable.len(),
        before
    );
}
