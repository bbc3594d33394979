//! `owner.attribute` references inside formula text.
//!
//! References are found on the sandbox's own token stream, so a reference is always a whole
//! `IDENT '.' IDENT` run with exact byte bounds. Rewriting replaces those bounds and nothing else;
//! `a.width` can never clip the front of `a.width2`.

use std::collections::BTreeMap;

use crate::expression::lexer::{Span, TokenKind, lex};
use crate::expression::sandbox::is_function;
use crate::foundation::ids::{AttrId, Owner};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Reference {
    /// Target identity with `self` already substituted.
    pub(crate) target: AttrId,
    pub(crate) span: Span,
}

/// Every reference in `source`, left to right, as seen from a formula owned by `owner`.
///
/// Text that does not lex yields no references; the sandbox reports it when the formula is
/// evaluated. Runs the sandbox would refuse anyway (private names, `self` on a project attribute,
/// `x.max(...)`) are not treated as references either, so they reach the sandbox untouched.
pub(crate) fn scan(source: &str, owner: &Owner) -> Vec<Reference> {
    let Ok(tokens) = lex(source) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    let mut i = 0usize;
    while i + 2 < tokens.len() {
        let (a, dot, b) = (&tokens[i], &tokens[i + 1], &tokens[i + 2]);
        let (TokenKind::Ident(head), TokenKind::Dot, TokenKind::Ident(tail)) =
            (&a.kind, &dot.kind, &b.kind)
        else {
            i += 1;
            continue;
        };
        let adjacent = a.span.end == dot.span.start && dot.span.end == b.span.start;
        let private = head.starts_with('_') || tail.starts_with('_');
        let call = is_function(tail)
            && tokens
                .get(i + 3)
                .is_some_and(|t| t.kind == TokenKind::LParen);
        if !adjacent || private || call {
            i += 1;
            continue;
        }
        let Some(target_owner) = Owner::from_token(head, owner) else {
            i += 1;
            continue;
        };
        out.push(Reference {
            target: AttrId::new(target_owner, tail.as_str()),
            span: Span {
                start: a.span.start,
                end: b.span.end,
            },
        });
        // Consumed; `a.b.c` yields `a.b` and leaves `.c` for the sandbox to reject.
        i += 3;
    }
    out
}

/// Distinct targets of `refs`, sorted.
pub(crate) fn targets(refs: &[Reference]) -> Vec<AttrId> {
    let mut v: Vec<AttrId> = refs.iter().map(|r| r.target.clone()).collect();
    v.sort();
    v.dedup();
    v
}

/// Identifier-safe binding name per target.
///
/// Names are `owner_attr`; when two targets flatten to the same text (`a_b.c` and `a.b_c`) the
/// later one, in target order, gets a numeric suffix.
pub(crate) fn binding_names(refs: &[Reference]) -> BTreeMap<AttrId, String> {
    let mut names: BTreeMap<AttrId, String> = BTreeMap::new();
    let mut taken: Vec<String> = Vec::new();
    for id in targets(refs) {
        let base = id.flat_name();
        let mut name = base.clone();
        let mut n = 2usize;
        while taken.contains(&name) {
            name = format!("{base}_{n}");
            n += 1;
        }
        taken.push(name.clone());
        names.insert(id, name);
    }
    names
}

/// Replace every reference in `source` with its binding name.
pub(crate) fn rewrite(source: &str, refs: &[Reference], names: &BTreeMap<AttrId, String>) -> String {
    let mut out = String::with_capacity(source.len());
    let mut last = 0usize;
    for r in refs {
        out.push_str(&source[last..r.span.start]);
        match names.get(&r.target) {
            Some(name) => out.push_str(name),
            None => out.push_str(&source[r.span.start..r.span.end]),
        }
        last = r.span.end;
    }
    out.push_str(&source[last..]);
    out
}

#[cfg(test)]
#[path = "../../tests/unit/resolve/references.rs"]
mod tests;
