use crate::foundation::ids::AttrId;

/// Crate-wide result alias.
pub type TimelineResult<T> = Result<T, TimelineError>;

/// Errors surfaced by loading, hydrating and resolving a project.
///
/// Every resolve failure is fatal to the pass: no partially resolved project is ever returned.
#[derive(thiserror::Error, Debug)]
pub enum TimelineError {
    /// The attribute graph has no topological order.
    #[error("circular dependency detected: {}", format_cycle(.cycle))]
    CircularDependency {
        /// One representative cycle; the first identity is repeated at the end.
        cycle: Vec<AttrId>,
    },

    /// A formula names a missing owner, an unknown attribute, or an attribute without a value.
    #[error("attribute reference error: {0}")]
    AttributeReference(String),

    /// A formula failed to evaluate, or the pass hit an internal-consistency fault.
    #[error("resolver error: {0}")]
    Resolver(String),

    /// The project document violates a model invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// The project document could not be parsed or written.
    #[error("serialization error: {0}")]
    Serde(String),

    /// A media file could not be probed.
    #[error("media error: {0}")]
    Media(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TimelineError {
    pub fn attribute_reference(msg: impl Into<String>) -> Self {
        Self::AttributeReference(msg.into())
    }

    pub fn resolver(msg: impl Into<String>) -> Self {
        Self::Resolver(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    pub fn media(msg: impl Into<String>) -> Self {
        Self::Media(msg.into())
    }
}

fn format_cycle(cycle: &[AttrId]) -> String {
    let mut s = String::new();
    for (i, id) in cycle.iter().enumerate() {
        if i > 0 {
            s.push_str(" -> ");
        }
        s.push_str(&id.to_string());
    }
    s
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
