use crate::expression::ast::{BinaryOp, Expr, UnaryOp};
use crate::expression::error::InvalidExpression;
use crate::expression::lexer::{Span, Token, TokenKind};

const MAX_DEPTH: usize = 64;
const MAX_OPERATORS: usize = 512;

/// Parse an already pre-checked token stream.
///
/// Grammar, loosest binding first:
///
/// ```text
/// sum     := product (('+' | '-') product)*
/// product := unary (('*' | '/') unary)*
/// unary   := ('-' | '+') unary | power
/// power   := call ('**' unary)?
/// call    := primary ('(' args ')')?
/// primary := NUMBER | IDENT | '(' sum ')'
/// ```
pub(crate) fn parse_tokens(tokens: Vec<Token>) -> Result<Expr, InvalidExpression> {
    let mut p = Parser {
        tokens,
        pos: 0,
        depth: 0,
        operators: 0,
    };
    let expr = p.parse_sum()?;
    p.expect(TokenKind::Eof)?;
    Ok(expr)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    /// Binary operators seen so far; `+ - * /` chains grow the tree without nesting.
    operators: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn bump(&mut self) -> Token {
        let t = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        t
    }

    fn span(&self) -> Span {
        self.peek().span
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), InvalidExpression> {
        if self.peek().kind == kind {
            self.bump();
            Ok(())
        } else {
            Err(InvalidExpression::syntax(
                self.span().start,
                format!("expected {}, found {}", describe(&kind), describe(&self.peek().kind)),
            ))
        }
    }

    fn consume(&mut self, kind: TokenKind) -> bool {
        if self.peek().kind == kind {
            self.bump();
            true
        } else {
            false
        }
    }

    fn enter(&mut self) -> Result<(), InvalidExpression> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(InvalidExpression::syntax(
                self.span().start,
                "expression nests too deeply",
            ));
        }
        Ok(())
    }

    fn operator(&mut self) -> Result<(), InvalidExpression> {
        self.operators += 1;
        if self.operators > MAX_OPERATORS {
            return Err(InvalidExpression::syntax(
                self.span().start,
                "expression has too many operators",
            ));
        }
        Ok(())
    }

    fn parse_sum(&mut self) -> Result<Expr, InvalidExpression> {
        let mut e = self.parse_product()?;
        loop {
            let op = if self.consume(TokenKind::Plus) {
                BinaryOp::Add
            } else if self.consume(TokenKind::Minus) {
                BinaryOp::Sub
            } else {
                break;
            };
            self.operator()?;
            let r = self.parse_product()?;
            e = Expr::Binary {
                op,
                left: Box::new(e),
                right: Box::new(r),
            };
        }
        Ok(e)
    }

    fn parse_product(&mut self) -> Result<Expr, InvalidExpression> {
        let mut e = self.parse_unary()?;
        loop {
            let op = if self.consume(TokenKind::Star) {
                BinaryOp::Mul
            } else if self.consume(TokenKind::Slash) {
                BinaryOp::Div
            } else {
                break;
            };
            self.operator()?;
            let r = self.parse_unary()?;
            e = Expr::Binary {
                op,
                left: Box::new(e),
                right: Box::new(r),
            };
        }
        Ok(e)
    }

    fn parse_unary(&mut self) -> Result<Expr, InvalidExpression> {
        let op = if self.consume(TokenKind::Minus) {
            UnaryOp::Neg
        } else if self.consume(TokenKind::Plus) {
            UnaryOp::Pos
        } else {
            return self.parse_power();
        };
        self.enter()?;
        let e = self.parse_unary()?;
        self.depth -= 1;
        Ok(Expr::Unary {
            op,
            expr: Box::new(e),
        })
    }

    fn parse_power(&mut self) -> Result<Expr, InvalidExpression> {
        let base = self.parse_call()?;
        if !self.consume(TokenKind::StarStar) {
            return Ok(base);
        }
        // Right-associative; the exponent may carry its own sign (`2 ** -1`).
        self.operator()?;
        self.enter()?;
        let exp = self.parse_unary()?;
        self.depth -= 1;
        Ok(Expr::Binary {
            op: BinaryOp::Pow,
            left: Box::new(base),
            right: Box::new(exp),
        })
    }

    fn parse_call(&mut self) -> Result<Expr, InvalidExpression> {
        let e = self.parse_primary()?;

        if self.peek().kind == TokenKind::Dot {
            return Err(InvalidExpression::unsafe_construct(
                self.span().start,
                "attribute access is not allowed",
            ));
        }

        if self.peek().kind != TokenKind::LParen {
            return Ok(e);
        }
        let (func, offset) = match e {
            Expr::Name { name, offset } => (name, offset),
            _ => {
                return Err(InvalidExpression::syntax(
                    self.span().start,
                    "call target must be an identifier",
                ));
            }
        };
        self.bump();
        let args = self.parse_args()?;

        if matches!(self.peek().kind, TokenKind::LParen | TokenKind::Dot) {
            return Err(InvalidExpression::unsafe_construct(
                self.span().start,
                "chained calls and attribute access are not allowed",
            ));
        }
        Ok(Expr::Call { func, offset, args })
    }

    fn parse_args(&mut self) -> Result<Vec<Expr>, InvalidExpression> {
        let mut args = Vec::new();
        if self.consume(TokenKind::RParen) {
            return Ok(args);
        }
        self.enter()?;
        loop {
            args.push(self.parse_sum()?);
            if self.consume(TokenKind::Comma) {
                continue;
            }
            self.expect(TokenKind::RParen)?;
            self.depth -= 1;
            return Ok(args);
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, InvalidExpression> {
        let t = self.bump();
        match t.kind {
            TokenKind::Number(v) => Ok(Expr::Num(v)),
            TokenKind::Ident(name) => Ok(Expr::Name {
                name,
                offset: t.span.start,
            }),
            TokenKind::LParen => {
                self.enter()?;
                let e = self.parse_sum()?;
                self.expect(TokenKind::RParen)?;
                self.depth -= 1;
                Ok(e)
            }
            other => Err(InvalidExpression::syntax(
                t.span.start,
                format!("unexpected {}", describe(&other)),
            )),
        }
    }
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Ident(s) => format!("name '{s}'"),
        TokenKind::Number(v) => format!("number {v}"),
        TokenKind::LParen => "'('".to_owned(),
        TokenKind::RParen => "')'".to_owned(),
        TokenKind::Comma => "','".to_owned(),
        TokenKind::Dot => "'.'".to_owned(),
        TokenKind::Plus => "'+'".to_owned(),
        TokenKind::Minus => "'-'".to_owned(),
        TokenKind::Star => "'*'".to_owned(),
        TokenKind::StarStar => "'**'".to_owned(),
        TokenKind::Slash => "'/'".to_owned(),
        TokenKind::Stray(c) => format!("character '{c}'"),
        TokenKind::Eof => "end of expression".to_owned(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/parser.rs"]
mod tests;
