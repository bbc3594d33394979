use std::collections::BTreeSet;

use crate::foundation::error::{TimelineError, TimelineResult};
use crate::foundation::ids::AttrId;
use crate::resolve::graph::DependencyGraph;

/// Evaluation order as node indices: every node after all of its dependencies.
///
/// Kahn's algorithm with the ready set keyed by node index, so whenever several nodes are ready
/// the one earliest in base order goes first. Fails with a representative cycle when no order
/// exists.
pub fn topo_order(graph: &DependencyGraph) -> TimelineResult<Vec<usize>> {
    let n = graph.len();

    // dep -> dependents.
    let mut indeg = vec![0usize; n];
    let mut outs: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (i, d) in indeg.iter_mut().enumerate() {
        for &dep in graph.deps(i) {
            outs[dep].push(i);
            *d += 1;
        }
    }

    let mut ready: BTreeSet<usize> = (0..n).filter(|&i| indeg[i] == 0).collect();
    let mut order = Vec::with_capacity(n);
    while let Some(i) = ready.pop_first() {
        order.push(i);
        for &j in &outs[i] {
            let dj = &mut indeg[j];
            *dj = dj.saturating_sub(1);
            if *dj == 0 {
                ready.insert(j);
            }
        }
    }

    if order.len() != n {
        let cycle = find_cycle(graph);
        tracing::debug!(len = cycle.len(), "dependency cycle");
        return Err(TimelineError::CircularDependency { cycle });
    }
    Ok(order)
}

/// First cycle reached by a depth-first walk along `node -> dependency` edges, starting from the
/// lowest index and visiting dependencies in ascending order. The first node is repeated at the
/// end: `a -> b -> a`.
fn find_cycle(graph: &DependencyGraph) -> Vec<AttrId> {
    const UNVISITED: u8 = 0;
    const VISITING: u8 = 1;
    const DONE: u8 = 2;

    let n = graph.len();
    let mut state = vec![UNVISITED; n];
    // (node, position of the next dependency to try)
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for root in 0..n {
        if state[root] != UNVISITED {
            continue;
        }
        state[root] = VISITING;
        stack.push((root, 0));

        while let Some(top) = stack.last_mut() {
            let v = top.0;
            let deps = graph.deps(v);
            if top.1 == deps.len() {
                state[v] = DONE;
                stack.pop();
                continue;
            }
            let to = deps[top.1];
            top.1 += 1;
            match state[to] {
                UNVISITED => {
                    state[to] = VISITING;
                    stack.push((to, 0));
                }
                VISITING => {
                    let pos = stack.iter().position(|&(x, _)| x == to).unwrap_or(0);
                    let mut cycle: Vec<AttrId> = stack[pos..]
                        .iter()
                        .map(|&(x, _)| graph.node(x).clone())
                        .collect();
                    cycle.push(graph.node(to).clone());
                    return cycle;
                }
                _ => {}
            }
        }
    }
    Vec::new()
}

#[cfg(test)]
#[path = "../../tests/unit/resolve/order.rs"]
mod tests;
