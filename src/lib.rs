//! Grammar analysis and transformation core for LL(1) tooling.
//!
//! Builds a [`Grammar`] from named terminals/non-terminals and
//! productions, analyzes it (nullable sets, FIRST/FOLLOW/PREDICT,
//! cycles, left recursion), rewrites it into a form an LL(1) generator
//! can consume (useless-symbol, null-production, cycle and
//! left-recursion elimination), and hands the cleansed grammar to a
//! dispatch-table generator. No parser runs here and no source text is
//! emitted — this crate is the analysis/transformation core an external
//! loader and code emitter sit on either side of.

pub mod cycle_elim;
pub mod cycles;
pub mod error;
pub mod first_follow;
pub mod grammar;
pub mod graph;
pub mod left_recursion;
pub mod left_recursion_elim;
pub mod ll_generator;
pub mod null_elim;
pub mod nullable;
pub mod production;
pub mod symbol;
pub mod useless;

pub use cycle_elim::remove_cycles;
pub use cycles::{detect_cycles, Cycle};
pub use error::{GrammarError, Result};
pub use grammar::Grammar;
pub use left_recursion::detect_left_recursion;
pub use left_recursion_elim::{remove_left_recursion, remove_left_recursion_for, NameGenerator};
pub use ll_generator::{generate, DispatchEntry, NonTerminalDispatch, Plan};
pub use null_elim::remove_null_productions;
pub use production::{Production, ProductionList, SymbolString};
pub use symbol::{Symbol, SymbolId, SymbolKind, SymbolUsage};
pub use useless::remove_useless_symbols;
