use crate::foundation::error::TimelineResult;
use crate::foundation::ids::AttrId;
use crate::resolve::graph::{self, NodeKind};
use crate::resolve::order::topo_order;
use crate::scene::model::Project;
use crate::scene::value::Formula;

#[derive(Debug, Clone, PartialEq)]
pub struct PlanStep {
    pub id: AttrId,
    /// `None` for static attributes and unscanned references.
    pub formula: Option<Formula>,
    pub deps: Vec<AttrId>,
}

/// The order a resolve pass would evaluate `project` in, without evaluating anything.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionPlan {
    order: Vec<AttrId>,
    steps: Vec<PlanStep>,
}

impl ResolutionPlan {
    /// Fails with the same cycle a resolve pass would report.
    pub fn build(project: &Project) -> TimelineResult<Self> {
        let (graph, _) = graph::build(project);
        let order = topo_order(&graph)?;

        let steps: Vec<PlanStep> = order
            .iter()
            .map(|&i| PlanStep {
                id: graph.node(i).clone(),
                formula: match graph.kind(i) {
                    NodeKind::Formula(f) => Some(f.clone()),
                    NodeKind::Static | NodeKind::Unscanned { .. } => None,
                },
                deps: graph.deps(i).iter().map(|&d| graph.node(d).clone()).collect(),
            })
            .collect();

        Ok(Self {
            order: steps.iter().map(|s| s.id.clone()).collect(),
            steps,
        })
    }

    pub fn order(&self) -> &[AttrId] {
        &self.order
    }

    pub fn steps(&self) -> &[PlanStep] {
        &self.steps
    }

    /// Formula steps only, in evaluation order.
    pub fn formulas(&self) -> impl Iterator<Item = &PlanStep> {
        self.steps.iter().filter(|s| s.formula.is_some())
    }

    pub fn position(&self, id: &AttrId) -> Option<usize> {
        self.order.iter().position(|x| x == id)
    }
}
