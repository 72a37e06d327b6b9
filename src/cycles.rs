//! Cycle detection: derivations `A =>+ A` through unit or
//! nullable-padded productions.

use log::debug;

use crate::grammar::Grammar;
use crate::graph;
use crate::production::Production;
use crate::symbol::SymbolId;

/// A path back to a cycle's starting non-terminal: each step names the
/// production that justified the edge and the non-terminal it landed on.
pub type Cycle = Vec<(Production, SymbolId)>;

/// Finds a covering set of minimal cycles in the grammar.
///
/// For a non-terminal `N` with production `N -> alpha Xi beta`, an edge
/// `N -> Xi` is emitted iff `alpha` is all-optional, `beta` is
/// all-optional, and `Xi` is a non-terminal — i.e. `Xi` can be the entire
/// effective content of this production once the optional padding is
/// discounted.
pub fn detect_cycles(grammar: &Grammar) -> Vec<(SymbolId, Cycle)> {
    let nodes = grammar.non_terminals().to_vec();
    let cycles = graph::minimal_cycles(&nodes, |&n| {
        let mut edges = Vec::new();
        for prod in grammar.productions_of(n).iter() {
            let rhs = prod.rhs();
            for (i, usage) in rhs.usages().iter().enumerate() {
                let symbol = usage.symbol();
                if grammar.symbol(symbol).is_non_terminal()
                    && rhs.prefix_optional(i)
                    && rhs.suffix_optional(i + 1)
                {
                    edges.push((symbol, prod.clone()));
                }
            }
        }
        edges.into_iter().map(|(sym, prod)| (sym, prod))
    });
    let cycles: Vec<(SymbolId, Cycle)> = cycles
        .into_iter()
        .map(|(start, steps)| {
            let cycle: Cycle = steps.into_iter().map(|(prod, node)| (prod, node)).collect();
            (start, cycle)
        })
        .collect();
    debug!("detected {} cycle(s)", cycles.len());
    cycles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::production::SymbolString;
    use crate::symbol::SymbolUsage;

    #[test]
    fn s5_three_way_cycle() {
        // A -> B; B -> C; C -> A | x
        let mut g = Grammar::new();
        let a = g.add_non_terminal("A", None).unwrap();
        let b = g.add_non_terminal("B", None).unwrap();
        let c = g.add_non_terminal("C", None).unwrap();
        let x = g.add_terminal("x", None).unwrap();

        g.add_production(a, SymbolString::new(vec![SymbolUsage::new(b)]), None)
            .unwrap();
        g.add_production(b, SymbolString::new(vec![SymbolUsage::new(c)]), None)
            .unwrap();
        g.add_production(c, SymbolString::new(vec![SymbolUsage::new(a)]), None)
            .unwrap();
        g.add_production(c, SymbolString::new(vec![SymbolUsage::new(x)]), None)
            .unwrap();

        let cycles = detect_cycles(&g);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].1.len(), 3);
    }

    #[test]
    fn optional_padding_still_counts_as_a_cycle() {
        // A -> ?x B ?y ; B -> A   (x, y optional terminals sandwiching a unit usage)
        let mut g = Grammar::new();
        let a = g.add_non_terminal("A", None).unwrap();
        let b = g.add_non_terminal("B", None).unwrap();
        let x = g.add_terminal("x", None).unwrap();
        let y = g.add_terminal("y", None).unwrap();

        g.add_production(
            a,
            SymbolString::new(vec![
                SymbolUsage::new(x).optional(),
                SymbolUsage::new(b),
                SymbolUsage::new(y).optional(),
            ]),
            None,
        )
        .unwrap();
        g.add_production(b, SymbolString::new(vec![SymbolUsage::new(a)]), None)
            .unwrap();

        assert_eq!(detect_cycles(&g).len(), 1);
    }

    #[test]
    fn required_material_around_a_unit_usage_breaks_the_cycle() {
        // A -> x B ; B -> A   (x is required, not optional padding)
        let mut g = Grammar::new();
        let a = g.add_non_terminal("A", None).unwrap();
        let b = g.add_non_terminal("B", None).unwrap();
        let x = g.add_terminal("x", None).unwrap();

        g.add_production(
            a,
            SymbolString::new(vec![SymbolUsage::new(x), SymbolUsage::new(b)]),
            None,
        )
        .unwrap();
        g.add_production(b, SymbolString::new(vec![SymbolUsage::new(a)]), None)
            .unwrap();

        assert!(detect_cycles(&g).is_empty());
    }

    #[test]
    fn acyclic_grammar_has_no_cycles() {
        let mut g = Grammar::new();
        let s = g.add_non_terminal("S", None).unwrap();
        let a = g.add_terminal("a", None).unwrap();
        g.add_production(s, SymbolString::new(vec![SymbolUsage::new(a)]), None)
            .unwrap();
        assert!(detect_cycles(&g).is_empty());
    }
}
