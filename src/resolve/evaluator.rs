use crate::expression::sandbox::{self, Context};
use crate::foundation::error::{TimelineError, TimelineResult};
use crate::foundation::ids::{AttrId, Owner};
use crate::resolve::graph::{DependencyGraph, NodeKind, ResolvedValues};
use crate::resolve::order::topo_order;
use crate::resolve::references;
use crate::scene::model::{Project, Resolvable};
use crate::scene::value::{AttrValue, Formula};

/// Evaluate every formula node of `graph` in dependency order.
///
/// Works on a deep copy of `project`; the copy is returned only when every node resolved. The
/// first failure aborts the pass.
pub fn run(
    project: &Project,
    graph: &DependencyGraph,
    mut values: ResolvedValues,
) -> TimelineResult<Project> {
    let order = topo_order(graph)?;
    let mut working = project.clone();

    for i in order {
        let id = graph.node(i);
        if values.contains_key(id) {
            continue;
        }
        let value = match graph.kind(i) {
            NodeKind::Formula(formula) => eval_formula(id, formula, &values)?,
            NodeKind::Unscanned { referenced_by } => {
                return Err(unscanned_error(&working, id, graph.node(*referenced_by)));
            }
            NodeKind::Static => {
                return Err(TimelineError::resolver(format!(
                    "static attribute '{id}' was never seeded"
                )));
            }
        };
        tracing::trace!(node = %id, "resolved");
        write_back(&mut working, id, value.clone())?;
        values.insert(id.clone(), value);
    }
    Ok(working)
}

fn eval_formula(id: &AttrId, formula: &Formula, values: &ResolvedValues) -> TimelineResult<AttrValue> {
    let refs = references::scan(formula.source(), &id.owner);
    let names = references::binding_names(&refs);

    let mut ctx = Context::new();
    for (dep, name) in &names {
        let bound = match values.get(dep) {
            None => {
                return Err(TimelineError::resolver(format!(
                    "dependency '{dep}' of '{id}' was not resolved before it"
                )));
            }
            Some(v) => v.to_value().ok_or_else(|| {
                TimelineError::attribute_reference(format!(
                    "'{id}' depends on '{dep}', which has no value"
                ))
            })?,
        };
        ctx.insert(name.clone(), bound);
    }

    let text = references::rewrite(formula.source(), &refs, &names);
    sandbox::evaluate(&text, &ctx)
        .map(AttrValue::from)
        .map_err(|e| {
            TimelineError::resolver(format!(
                "expression for '{id}' (`{}`) failed: {e}",
                formula.source()
            ))
        })
}

fn unscanned_error(project: &Project, id: &AttrId, referrer: &AttrId) -> TimelineError {
    match &id.owner {
        Owner::Element(name) if project.element(name).is_none() => {
            TimelineError::attribute_reference(format!(
                "element '{name}' referenced by '{referrer}' does not exist"
            ))
        }
        _ => TimelineError::attribute_reference(format!(
            "'{id}' referenced by '{referrer}' is not a resolvable attribute"
        )),
    }
}

fn write_back(project: &mut Project, id: &AttrId, value: AttrValue) -> TimelineResult<()> {
    let Some(attr) = id.known_attr() else {
        return Err(TimelineError::resolver(format!(
            "'{id}' is not a resolvable attribute"
        )));
    };
    let written = match &id.owner {
        Owner::Video => project.set_attr(attr, value),
        Owner::Element(name) => project
            .elements
            .iter_mut()
            .find(|e| e.name() == name)
            .is_some_and(|e| e.set_attr(attr, value)),
    };
    if !written {
        return Err(TimelineError::attribute_reference(format!(
            "owner of '{id}' was not found"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/resolve/evaluator.rs"]
mod tests;
