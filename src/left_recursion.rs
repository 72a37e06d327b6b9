//! Left-recursion detection, direct and indirect.

use log::debug;

use crate::cycles::Cycle;
use crate::grammar::Grammar;
use crate::graph;
use crate::symbol::SymbolId;

/// Finds a covering set of left-recursive cycles.
///
/// For a production `N -> X1 X2 ... Xk`, scans left to right and emits an
/// edge `N -> Xi` for every non-terminal `Xi` encountered, but stops
/// scanning the production past the first usage that is not optional
/// (whether or not that usage is itself a non-terminal) — only symbols
/// that can be the *leftmost* surviving content of a derivation can
/// participate in left recursion.
pub fn detect_left_recursion(grammar: &Grammar) -> Vec<(SymbolId, Cycle)> {
    let nodes = grammar.non_terminals().to_vec();
    let cycles = graph::minimal_cycles(&nodes, |&n| {
        let mut edges = Vec::new();
        for prod in grammar.productions_of(n).iter() {
            for usage in prod.rhs().usages() {
                let symbol = usage.symbol();
                if grammar.symbol(symbol).is_non_terminal() {
                    edges.push((symbol, prod.clone()));
                }
                if !usage.is_optional() {
                    break;
                }
            }
        }
        edges.into_iter()
    });
    debug!("detected {} left-recursive cycle(s)", cycles.len());
    cycles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::production::SymbolString;
    use crate::symbol::SymbolUsage;

    #[test]
    fn s4_direct_left_recursion() {
        // E -> E + T | T
        let mut g = Grammar::new();
        let e = g.add_non_terminal("E", None).unwrap();
        let t = g.add_non_terminal("T", None).unwrap();
        let plus = g.add_terminal("+", None).unwrap();

        g.add_production(
            e,
            SymbolString::new(vec![SymbolUsage::new(e), SymbolUsage::new(plus), SymbolUsage::new(t)]),
            None,
        )
        .unwrap();
        g.add_production(e, SymbolString::new(vec![SymbolUsage::new(t)]), None)
            .unwrap();

        let cycles = detect_left_recursion(&g);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].0, e);
    }

    #[test]
    fn indirect_left_recursion_through_two_non_terminals() {
        // A -> B x ; B -> A y
        let mut g = Grammar::new();
        let a = g.add_non_terminal("A", None).unwrap();
        let b = g.add_non_terminal("B", None).unwrap();
        let x = g.add_terminal("x", None).unwrap();
        let y = g.add_terminal("y", None).unwrap();

        g.add_production(
            a,
            SymbolString::new(vec![SymbolUsage::new(b), SymbolUsage::new(x)]),
            None,
        )
        .unwrap();
        g.add_production(
            b,
            SymbolString::new(vec![SymbolUsage::new(a), SymbolUsage::new(y)]),
            None,
        )
        .unwrap();

        assert_eq!(detect_left_recursion(&g).len(), 1);
    }

    #[test]
    fn recursion_after_a_required_terminal_is_not_left_recursion() {
        // E -> x E   (right recursive, not left)
        let mut g = Grammar::new();
        let e = g.add_non_terminal("E", None).unwrap();
        let x = g.add_terminal("x", None).unwrap();
        g.add_production(
            e,
            SymbolString::new(vec![SymbolUsage::new(x), SymbolUsage::new(e)]),
            None,
        )
        .unwrap();
        assert!(detect_left_recursion(&g).is_empty());
    }

    #[test]
    fn left_recursion_behind_an_optional_prefix_is_still_detected() {
        // E -> ?x E   (x optional, so E can still be leftmost)
        let mut g = Grammar::new();
        let e = g.add_non_terminal("E", None).unwrap();
        let x = g.add_terminal("x", None).unwrap();
        g.add_production(
            e,
            SymbolString::new(vec![SymbolUsage::new(x).optional(), SymbolUsage::new(e)]),
            None,
        )
        .unwrap();
        assert_eq!(detect_left_recursion(&g).len(), 1);
    }
}
