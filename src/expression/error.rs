use std::fmt;

/// Why the sandbox refused or failed an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// Not a well-formed arithmetic expression.
    Syntax,
    /// A construct outside the arithmetic subset: keywords, private names, attribute access.
    Unsafe,
    /// An identifier that is neither bound in the context nor a whitelisted function.
    UndefinedName,
    /// Evaluation fault: division by zero, type mismatch, bad arity.
    Runtime,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Syntax => "syntax",
            Self::Unsafe => "unsafe",
            Self::UndefinedName => "undefined name",
            Self::Runtime => "runtime",
        })
    }
}

/// An expression the sandbox will not (or could not) evaluate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidExpression {
    pub reason: InvalidReason,
    /// Byte offset into the expression text, when the fault has a position.
    pub offset: Option<usize>,
    pub message: String,
}

impl InvalidExpression {
    pub(crate) fn new(reason: InvalidReason, offset: usize, message: impl Into<String>) -> Self {
        Self {
            reason,
            offset: Some(offset),
            message: message.into(),
        }
    }

    pub(crate) fn syntax(offset: usize, message: impl Into<String>) -> Self {
        Self::new(InvalidReason::Syntax, offset, message)
    }

    pub(crate) fn unsafe_construct(offset: usize, message: impl Into<String>) -> Self {
        Self::new(InvalidReason::Unsafe, offset, message)
    }

    pub(crate) fn undefined(offset: usize, name: &str) -> Self {
        Self::new(
            InvalidReason::UndefinedName,
            offset,
            format!("name '{name}' is not defined"),
        )
    }

    pub(crate) fn runtime(message: impl Into<String>) -> Self {
        Self {
            reason: InvalidReason::Runtime,
            offset: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for InvalidExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.offset {
            Some(offset) => write!(
                f,
                "invalid expression ({}) at byte {offset}: {}",
                self.reason, self.message
            ),
            None => write!(f, "invalid expression ({}): {}", self.reason, self.message),
        }
    }
}

impl std::error::Error for InvalidExpression {}
