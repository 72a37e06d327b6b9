//! FIRST, FOLLOW and PREDICT set computation.
//!
//! Implements the algorithms from Aho et al., "Compilers: Principles,
//! Techniques, and Tools", generalized to grammars with named symbols and
//! `?`-optional usages rather than single-character terminals.

use std::collections::{HashMap, HashSet};

use log::trace;

use crate::grammar::Grammar;
use crate::symbol::{SymbolId, SymbolUsage};

/// `FIRST` of a symbol string: the set of terminals that can begin a
/// string derived from `usages`, plus whether the whole sequence can
/// vanish (every usage is either marked optional or its symbol is
/// nullable). Used both to seed FOLLOW computation (`FIRST` of the
/// remainder of a production) and to compute PREDICT sets.
pub fn first_of_usages(
    grammar: &Grammar,
    first_sets: &HashMap<SymbolId, HashSet<SymbolId>>,
    nullables: &HashSet<SymbolId>,
    usages: &[SymbolUsage],
) -> (HashSet<SymbolId>, bool) {
    let mut result = HashSet::new();
    for usage in usages {
        let symbol = usage.symbol();
        result.extend(first_sets.get(&symbol).cloned().unwrap_or_default());
        let continues = usage.is_optional()
            || (grammar.symbol(symbol).is_non_terminal() && nullables.contains(&symbol));
        if !continues {
            return (result, false);
        }
    }
    (result, true)
}

/// Computes FIRST sets for every symbol in the grammar: `{t}` for each
/// terminal `t`, and a depth-first expansion for each non-terminal guarded
/// by a "populated" marker so each non-terminal is expanded at most once
/// per call — this resolves cycles through nullables without re-entry.
pub fn compute_first_sets(
    grammar: &Grammar,
    nullables: &HashSet<SymbolId>,
) -> HashMap<SymbolId, HashSet<SymbolId>> {
    let mut first_sets: HashMap<SymbolId, HashSet<SymbolId>> = HashMap::new();
    for &t in grammar.terminals() {
        first_sets.insert(t, HashSet::from([t]));
    }
    for &nt in grammar.non_terminals() {
        first_sets.insert(nt, HashSet::new());
    }

    let mut populated: HashSet<SymbolId> = HashSet::new();
    for &nt in grammar.non_terminals() {
        dfs_first(nt, grammar, nullables, &mut populated, &mut first_sets);
    }
    trace!(
        "FIRST sets computed for {} non-terminals",
        grammar.non_terminals().len()
    );
    first_sets
}

fn dfs_first(
    nt: SymbolId,
    grammar: &Grammar,
    nullables: &HashSet<SymbolId>,
    populated: &mut HashSet<SymbolId>,
    first_sets: &mut HashMap<SymbolId, HashSet<SymbolId>>,
) {
    if populated.contains(&nt) {
        return;
    }
    populated.insert(nt);
    for prod in grammar.productions_of(nt).iter() {
        for usage in prod.rhs().usages() {
            let symbol = usage.symbol();
            if grammar.symbol(symbol).is_terminal() {
                first_sets.get_mut(&nt).unwrap().insert(symbol);
                if !usage.is_optional() {
                    break;
                }
            } else {
                dfs_first(symbol, grammar, nullables, populated, first_sets);
                let child = first_sets.get(&symbol).cloned().unwrap_or_default();
                first_sets.get_mut(&nt).unwrap().extend(child);
                if !(usage.is_optional() || nullables.contains(&symbol)) {
                    break;
                }
            }
        }
    }
}

/// Computes FOLLOW sets for every non-terminal, seeded with `FOLLOW(start)
/// = {EOF}`. Each production is walked right to left, building
/// `nullable_from`/`first_from` arrays so a complete sweep over the
/// grammar is linear; sweeps repeat until no FOLLOW set grows.
pub fn compute_follow_sets(
    grammar: &Grammar,
    start: SymbolId,
    nullables: &HashSet<SymbolId>,
    first_sets: &HashMap<SymbolId, HashSet<SymbolId>>,
) -> HashMap<SymbolId, HashSet<SymbolId>> {
    let mut follow: HashMap<SymbolId, HashSet<SymbolId>> = HashMap::new();
    for &nt in grammar.non_terminals() {
        follow.insert(nt, HashSet::new());
    }
    follow.entry(start).or_default().insert(grammar.eof_token());

    let mut sweep = 0u32;
    loop {
        let mut added = 0usize;
        for &nt in grammar.non_terminals() {
            for prod in grammar.productions_of(nt).iter() {
                let usages = prod.rhs().usages();
                let n = usages.len();
                if n == 0 {
                    continue;
                }
                let mut nullable_from = vec![false; n];
                let mut first_from: Vec<HashSet<SymbolId>> = vec![HashSet::new(); n];
                for i in (0..n).rev() {
                    let usage = &usages[i];
                    let symbol = usage.symbol();
                    let nullable_here = usage.is_optional() || nullables.contains(&symbol);
                    first_from[i] = first_sets.get(&symbol).cloned().unwrap_or_default();

                    if i == n - 1 {
                        nullable_from[i] = nullable_here;
                    } else {
                        nullable_from[i] = nullable_here && nullable_from[i + 1];
                        if nullable_here {
                            let next = first_from[i + 1].clone();
                            first_from[i].extend(next);
                        }
                    }

                    if grammar.symbol(symbol).is_non_terminal() {
                        if i == n - 1 {
                            if nullable_from[i] {
                                let follow_nt = follow.get(&nt).cloned().unwrap_or_default();
                                let entry = follow.entry(symbol).or_default();
                                let before = entry.len();
                                entry.extend(follow_nt);
                                added += entry.len() - before;
                            }
                        } else {
                            let addition = first_from[i + 1].clone();
                            let entry = follow.entry(symbol).or_default();
                            let before = entry.len();
                            entry.extend(addition);
                            added += entry.len() - before;
                            if nullable_from[i + 1] {
                                let follow_nt = follow.get(&nt).cloned().unwrap_or_default();
                                let entry = follow.entry(symbol).or_default();
                                let before2 = entry.len();
                                entry.extend(follow_nt);
                                added += entry.len() - before2;
                            }
                        }
                    }
                }
            }
        }
        sweep += 1;
        trace!("FOLLOW sweep {sweep}: added={added}");
        if added == 0 {
            break;
        }
    }
    follow
}

/// Stamps every production's `predict_set`:
/// `PREDICT(A -> alpha) = FIRST(alpha) union (FOLLOW(A) if alpha is
/// all-nullable else {})`. An empty-RHS production is vacuously
/// all-nullable, so its predict set is exactly `FOLLOW(A)`.
pub fn eval_predict_sets(grammar: &mut Grammar, start: Option<SymbolId>) {
    let nullables = grammar.nullables();
    let first_sets = grammar.first_sets();
    let follow_sets = grammar.follow_sets(start);
    let nonterminals: Vec<SymbolId> = grammar.non_terminals().to_vec();

    for nt in nonterminals {
        let predict_sets: Vec<Vec<SymbolId>> = grammar
            .productions_of(nt)
            .iter()
            .map(|prod| {
                let (first_alpha, all_nullable) =
                    first_of_usages(grammar, &first_sets, &nullables, prod.rhs().usages());
                let mut pset = first_alpha;
                if all_nullable {
                    pset.extend(follow_sets.get(&nt).cloned().unwrap_or_default());
                }
                let mut v: Vec<SymbolId> = pset.into_iter().collect();
                v.sort_by_key(|s| s.raw());
                v
            })
            .collect();

        let list = grammar.productions_of_mut(nt);
        for (prod, pset) in list.iter_mut().zip(predict_sets.into_iter()) {
            prod.set_predict_set(pset);
        }
    }
}
