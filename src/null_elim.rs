//! Removal of null (epsilon) productions.

use std::collections::HashSet;

use log::debug;

use crate::grammar::Grammar;
use crate::production::SymbolString;
use crate::symbol::SymbolUsage;

/// For every production `A -> X1 ... Xn`, enumerates every subset of the
/// positions that are either marked optional or whose symbol is nullable,
/// and inserts the production obtained by deleting that subset (with the
/// `?` marker stripped from any usage that survives), skipping only the
/// subset that would delete every remaining position of a non-empty
/// production. Once every production has been expanded this way, every
/// empty-RHS production still present is dropped.
///
/// This may shrink the language if `start =>* epsilon`: that loss is
/// accepted here, matching the documented epsilon caveat; callers that
/// need the empty string preserved must special-case it before invoking
/// this transformation.
pub fn remove_null_productions(grammar: &mut Grammar) {
    let nullables = grammar.nullables();
    let mut total_added = 0usize;

    for nt in grammar.non_terminals().to_vec() {
        let originals: Vec<_> = grammar.productions_of(nt).iter().cloned().collect();
        for prod in &originals {
            let usages = prod.rhs().usages();
            let eligible: Vec<usize> = usages
                .iter()
                .enumerate()
                .filter(|(_, u)| {
                    u.is_optional()
                        || (grammar.symbol(u.symbol()).is_non_terminal()
                            && nullables.contains(&u.symbol()))
                })
                .map(|(i, _)| i)
                .collect();
            let k = eligible.len();
            if k == 0 {
                continue;
            }
            for mask in 0u32..(1 << k) {
                let deleted: HashSet<usize> = (0..k)
                    .filter(|b| mask & (1 << b) != 0)
                    .map(|b| eligible[b])
                    .collect();
                if !usages.is_empty() && deleted.len() == usages.len() {
                    continue;
                }
                let new_usages: Vec<SymbolUsage> = usages
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| !deleted.contains(i))
                    .map(|(_, u)| {
                        let mut required = SymbolUsage::new(u.symbol());
                        if let Some(v) = u.varname() {
                            required = required.with_varname(v);
                        }
                        required
                    })
                    .collect();
                if new_usages.is_empty() {
                    continue;
                }
                let rhs = SymbolString::new(new_usages);
                if grammar
                    .add_production(nt, rhs, prod.handler().map(|s| s.to_string()))
                    .unwrap_or(false)
                {
                    total_added += 1;
                }
            }
        }
    }

    for nt in grammar.non_terminals().to_vec() {
        grammar.productions_of_mut(nt).remove_matching(|p| p.is_empty());
    }
    debug!("null-production removal inserted {total_added} sub-production(s)");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::SymbolId;

    #[test]
    fn s1_optional_usage_expands_to_both_variants() {
        // S -> ?A B ; A -> a ; B -> b
        let mut g = Grammar::new();
        let s = g.add_non_terminal("S", None).unwrap();
        let a = g.add_non_terminal("A", None).unwrap();
        let b = g.add_non_terminal("B", None).unwrap();
        let ta = g.add_terminal("a", None).unwrap();
        let tb = g.add_terminal("b", None).unwrap();
        g.add_production(
            s,
            SymbolString::new(vec![SymbolUsage::new(a).optional(), SymbolUsage::new(b)]),
            None,
        )
        .unwrap();
        g.add_production(a, SymbolString::new(vec![SymbolUsage::new(ta)]), None)
            .unwrap();
        g.add_production(b, SymbolString::new(vec![SymbolUsage::new(tb)]), None)
            .unwrap();

        remove_null_productions(&mut g);

        let rhss: Vec<Vec<SymbolId>> = g
            .productions_of(s)
            .iter()
            .map(|p| p.rhs().usages().iter().map(|u| u.symbol()).collect())
            .collect();
        assert!(rhss.contains(&vec![b]));
        assert!(rhss.contains(&vec![a, b]));
    }

    #[test]
    fn empty_right_hand_sides_are_dropped_afterward() {
        let mut g = Grammar::new();
        let s = g.add_non_terminal("S", None).unwrap();
        g.add_production(s, SymbolString::empty(), None).unwrap();
        remove_null_productions(&mut g);
        assert!(g.productions_of(s).iter().all(|p| !p.is_empty()));
    }

    #[test]
    fn all_nullable_production_is_not_expanded_into_an_empty_copy() {
        // S -> ?A ; A -> eps
        let mut g = Grammar::new();
        let s = g.add_non_terminal("S", None).unwrap();
        let a = g.add_non_terminal("A", None).unwrap();
        g.add_production(a, SymbolString::empty(), None).unwrap();
        g.add_production(
            s,
            SymbolString::new(vec![SymbolUsage::new(a).optional()]),
            None,
        )
        .unwrap();

        remove_null_productions(&mut g);
        assert!(g.productions_of(s).iter().all(|p| !p.is_empty()));
        let rhss: Vec<Vec<SymbolId>> = g
            .productions_of(s)
            .iter()
            .map(|p| p.rhs().usages().iter().map(|u| u.symbol()).collect())
            .collect();
        assert!(rhss.contains(&vec![a]));
    }
}
