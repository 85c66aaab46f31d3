//! Named-type definition graph.
//!
//! One node per type declaration, one edge from each declaration to the
//! declaration its definition names directly (`type A B` gives `A -> B`).
//! A strongly connected component with more than one node, or a node with a
//! self-edge, is an invalid recursive type.

use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;

use crate::error::{EnumgenError, EnumgenResult};
use crate::symbols::{SymbolTable, TypeId};

/// Builds the definition graph of all declared types.
pub fn build_type_graph(symbols: &SymbolTable) -> DiGraphMap<TypeId, ()> {
    let mut g = DiGraphMap::new();

    for id in symbols.type_ids() {
        g.add_node(id);
    }
    for id in symbols.type_ids() {
        if let Some(target) = symbols.direct_target(id) {
            g.add_edge(id, target, ());
        }
    }

    g
}

/// Returns every invalid recursive chain, each sorted by declaration order.
pub fn find_cycles(g: &DiGraphMap<TypeId, ()>) -> Vec<Vec<TypeId>> {
    let mut cycles: Vec<Vec<TypeId>> = tarjan_scc(g)
        .into_iter()
        .filter(|scc| scc.len() > 1 || g.contains_edge(scc[0], scc[0]))
        .map(|mut scc| {
            scc.sort();
            scc
        })
        .collect();
    cycles.sort();
    cycles
}

/// Fails with a load error naming the first invalid recursive type.
pub fn check_cycles(symbols: &SymbolTable) -> EnumgenResult<()> {
    let graph = build_type_graph(symbols);
    let Some(cycle) = find_cycles(&graph).into_iter().next() else {
        return Ok(());
    };

    let first = symbols.decl(cycle[0]);
    let mut chain: Vec<&str> = cycle.iter().map(|id| symbols.decl(*id).name.as_str()).collect();
    chain.push(first.name.as_str());
    Err(EnumgenError::load_at(
        &first.path,
        format!("invalid recursive type: {}", chain.join(" -> ")),
        first.span.line,
        first.span.column,
    ))
}
