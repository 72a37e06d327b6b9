//! Removal of unit-production cycles.

use std::collections::HashSet;

use log::debug;

use crate::error::{GrammarError, Result};
use crate::grammar::Grammar;
use crate::production::SymbolString;
use crate::symbol::SymbolId;

/// Collapses every cycle until none remain.
///
/// Precondition: the grammar has no null productions — an empty RHS would
/// make the "is this a pure unit edge" test ambiguous, so this primitive
/// reports a [`GrammarError::PreconditionViolation`] rather than silently
/// running [`crate::null_elim::remove_null_productions`] on the caller's
/// behalf.
///
/// For each minimal cycle `C` found: `prod_union` collects every
/// production, from any member of `C`, that is *not* a single usage of
/// another member of `C` (the productions that actually leave the cycle).
/// Every member of `C` then has its internal unit edges deleted and gains
/// a (deduplicated) copy of every production in `prod_union`. Each outer
/// iteration strictly reduces the unit-production graph's SCC count, so
/// the loop terminates.
pub fn remove_cycles(grammar: &mut Grammar) -> Result<()> {
    if grammar.all_productions().any(|(_, p)| p.is_empty()) {
        return Err(GrammarError::PreconditionViolation(
            "remove_cycles requires null productions to be removed first".to_string(),
        ));
    }

    let mut rounds = 0u32;
    loop {
        let cycles = crate::cycles::detect_cycles(grammar);
        if cycles.is_empty() {
            break;
        }
        for (start, cycle) in cycles {
            let members: HashSet<SymbolId> = std::iter::once(start)
                .chain(cycle.iter().map(|(_, landed)| *landed))
                .collect();

            let is_internal_edge = |rhs: &SymbolString| -> bool {
                rhs.len() == 1 && members.contains(&rhs.get(0).unwrap().symbol())
            };

            let mut prod_union: Vec<(SymbolString, Option<String>)> = Vec::new();
            for &n in &members {
                for prod in grammar.productions_of(n).iter() {
                    if is_internal_edge(prod.rhs()) {
                        continue;
                    }
                    let key = (prod.rhs().clone(), prod.handler().map(|s| s.to_string()));
                    if !prod_union
                        .iter()
                        .any(|(rhs, handler)| rhs == &key.0 && handler == &key.1)
                    {
                        prod_union.push(key);
                    }
                }
            }

            for &n in &members {
                grammar
                    .productions_of_mut(n)
                    .remove_matching(|p| is_internal_edge(p.rhs()));
                for (rhs, handler) in &prod_union {
                    grammar.add_production(n, rhs.clone(), handler.clone()).ok();
                }
            }
        }
        rounds += 1;
    }
    debug!("cycle removal converged after {rounds} round(s)");
    Ok(())
}
