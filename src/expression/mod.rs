pub(crate) mod ast;
pub mod error;
pub(crate) mod lexer;
pub(crate) mod parser;
pub mod sandbox;
