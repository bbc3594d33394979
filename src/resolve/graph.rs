use std::collections::{BTreeMap, HashMap};

use crate::foundation::ids::{AttrId, AttrName, Owner};
use crate::resolve::references::{self, Reference};
use crate::scene::model::{Project, Resolvable};
use crate::scene::value::{AttrValue, Formula};

/// Attribute identity -> concrete value. Seeded with every static attribute (nulls included)
/// and filled in as formulas resolve.
pub type ResolvedValues = BTreeMap<AttrId, AttrValue>;

/// Why a node is in the graph.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Scanned attribute holding a concrete value (or null).
    Static,
    /// Scanned attribute holding a formula.
    Formula(Formula),
    /// Referenced by a formula but not a scanned attribute: the owner does not exist, or it does
    /// not carry that attribute. `referenced_by` is the first formula node that named it.
    Unscanned { referenced_by: usize },
}

/// Nodes are attribute identities; an edge `node -> dependency` exists for every reference in the
/// node's formula.
///
/// Node indices follow the base order: project attributes first, then each element in input
/// order with its attributes in fixed scan order, then unscanned targets in discovery order. The
/// topological sort breaks ties by this index.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: Vec<AttrId>,
    kinds: Vec<NodeKind>,
    deps: Vec<Vec<usize>>,
    index: HashMap<AttrId, usize>,
}

impl DependencyGraph {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, i: usize) -> &AttrId {
        &self.nodes[i]
    }

    pub fn nodes(&self) -> &[AttrId] {
        &self.nodes
    }

    pub fn kind(&self, i: usize) -> &NodeKind {
        &self.kinds[i]
    }

    /// Indices this node depends on, ascending.
    pub fn deps(&self, i: usize) -> &[usize] {
        &self.deps[i]
    }

    pub fn index_of(&self, id: &AttrId) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &AttrId) -> bool {
        self.index.contains_key(id)
    }

    /// Dependency identities of `id`, in base order. Empty for unknown ids.
    pub fn deps_of(&self, id: &AttrId) -> Vec<AttrId> {
        match self.index_of(id) {
            Some(i) => self.deps[i].iter().map(|&d| self.nodes[d].clone()).collect(),
            None => Vec::new(),
        }
    }

    fn intern(&mut self, id: AttrId, kind: NodeKind) -> usize {
        if let Some(&i) = self.index.get(&id) {
            return i;
        }
        let i = self.nodes.len();
        self.index.insert(id.clone(), i);
        self.nodes.push(id);
        self.kinds.push(kind);
        self.deps.push(Vec::new());
        i
    }
}

/// Scan every resolvable attribute of `project` into a dependency graph.
///
/// Static attributes are seeded into the returned store immediately. Owner existence is not
/// checked here; references to missing owners or attributes become [`NodeKind::Unscanned`]
/// nodes and fail when the evaluator reaches them.
pub fn build(project: &Project) -> (DependencyGraph, ResolvedValues) {
    let mut graph = DependencyGraph::default();
    let mut values = ResolvedValues::new();

    // Register every scanned node before any edge so unscanned targets sort after them.
    let mut pending: Vec<(usize, Owner, Formula)> = Vec::new();
    scan_owner(project, &AttrName::PROJECT, &mut graph, &mut values, &mut pending);
    for el in &project.elements {
        scan_owner(el, &AttrName::ELEMENT, &mut graph, &mut values, &mut pending);
    }

    for (i, owner, formula) in pending {
        let refs: Vec<Reference> = references::scan(formula.source(), &owner);
        let mut deps: Vec<usize> = references::targets(&refs)
            .into_iter()
            .map(|t| graph.intern(t, NodeKind::Unscanned { referenced_by: i }))
            .collect();
        deps.sort_unstable();
        deps.dedup();
        tracing::trace!(node = %graph.nodes[i], deps = deps.len(), "formula node");
        graph.deps[i] = deps;
    }

    (graph, values)
}

fn scan_owner(
    owner: &dyn Resolvable,
    attrs: &[AttrName],
    graph: &mut DependencyGraph,
    values: &mut ResolvedValues,
    pending: &mut Vec<(usize, Owner, Formula)>,
) {
    let o = owner.owner();
    for &a in attrs {
        let id = AttrId::new(o.clone(), a.as_str());
        match owner.attr(a).cloned().unwrap_or_default() {
            AttrValue::Formula(f) => {
                let i = graph.intern(id, NodeKind::Formula(f.clone()));
                pending.push((i, o.clone(), f));
            }
            v => {
                graph.intern(id.clone(), NodeKind::Static);
                values.entry(id).or_insert(v);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/resolve/graph.rs"]
mod tests;
