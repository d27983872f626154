//! Recursive-descent parser producing the expression AST.
//!
//! Precedence, tightest first:
//! 1. unary `-` / `+`
//! 2. `^` (right-associative)
//! 3. `*`, `/` (left-associative)
//! 4. `+`, `-` (left-associative)

use super::lexer::{tokenize, Token, TokenKind};
use crate::types::ParseError;

/// Maximum parenthesis / unary nesting accepted by the parser.
const MAX_NESTING: usize = 256;

/// Maximum token count accepted by the parser.
///
/// Every AST node comes from one token, so this also bounds the node count
/// and the tree height seen by the recursive folding, emitting and dropping
/// passes.
pub(crate) const MAX_TOKENS: usize = 2048;

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

/// Built-in single-argument functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Func {
    Sin,
    Cos,
    Tan,
    Exp,
    Log,
    Sqrt,
    Abs,
}

impl Func {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "sin" => Some(Func::Sin),
            "cos" => Some(Func::Cos),
            "tan" => Some(Func::Tan),
            "exp" => Some(Func::Exp),
            "log" | "ln" => Some(Func::Log),
            "sqrt" => Some(Func::Sqrt),
            "abs" => Some(Func::Abs),
            _ => None,
        }
    }
}

/// Abstract syntax tree over the single free variable `x`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    Number(f64),
    Var,
    Neg(Box<Node>),
    Binary(BinOp, Box<Node>, Box<Node>),
    Call(Func, Box<Node>),
}

/// Parse formula text into an AST.
pub(crate) fn parse(input: &str) -> Result<Node, ParseError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(ParseError::new("empty expression"));
    }
    if let Some(token) = tokens.get(MAX_TOKENS) {
        return Err(ParseError::at(
            token.pos,
            format!("expression too long (more than {} tokens)", MAX_TOKENS),
        ));
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
        end: input.len(),
    };
    let node = parser.parse_expression()?;

    match parser.peek() {
        None => Ok(node),
        Some(token) => Err(ParseError::at(
            token.pos,
            format!("unexpected {}", describe(&token.kind)),
        )),
    }
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Number(n) => format!("number {}", n),
        TokenKind::Ident(name) => format!("identifier '{}'", name),
        TokenKind::Plus => "'+'".to_string(),
        TokenKind::Minus => "'-'".to_string(),
        TokenKind::Star => "'*'".to_string(),
        TokenKind::Slash => "'/'".to_string(),
        TokenKind::Caret => "'^'".to_string(),
        TokenKind::LParen => "'('".to_string(),
        TokenKind::RParen => "')'".to_string(),
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    /// Byte length of the input, used as the position of "end of input" errors
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.peek().map(|t| &t.kind)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn enter(&mut self, pos: usize) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(ParseError::at(pos, "expression nested too deeply"));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn expect_rparen(&mut self, open_pos: usize) -> Result<(), ParseError> {
        match self.advance() {
            Some(Token {
                kind: TokenKind::RParen,
                ..
            }) => Ok(()),
            Some(token) => Err(ParseError::at(
                token.pos,
                format!("expected ')' but found {}", describe(&token.kind)),
            )),
            None => Err(ParseError::at(
                open_pos,
                "unclosed '(' at end of input",
            )),
        }
    }

    fn parse_expression(&mut self) -> Result<Node, ParseError> {
        let mut left = self.parse_term()?;

        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Plus) => BinOp::Add,
                Some(TokenKind::Minus) => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_term()?;
            left = Node::Binary(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Node, ParseError> {
        let mut left = self.parse_power()?;

        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Star) => BinOp::Mul,
                Some(TokenKind::Slash) => BinOp::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_power()?;
            left = Node::Binary(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_power(&mut self) -> Result<Node, ParseError> {
        let base = self.parse_unary()?;

        if let Some(TokenKind::Caret) = self.peek_kind() {
            let pos = self.advance().map(|t| t.pos).unwrap_or(self.end);
            self.enter(pos)?;
            let exponent = self.parse_power();
            self.leave();
            return Ok(Node::Binary(BinOp::Pow, Box::new(base), Box::new(exponent?)));
        }
        Ok(base)
    }

    fn parse_unary(&mut self) -> Result<Node, ParseError> {
        match self.peek_kind() {
            Some(TokenKind::Minus) | Some(TokenKind::Plus) => {
                let token = self.advance().ok_or_else(|| ParseError::at(self.end, "unexpected end of input"))?;
                self.enter(token.pos)?;
                let operand = self.parse_unary();
                self.leave();
                let operand = operand?;
                if token.kind == TokenKind::Minus {
                    Ok(Node::Neg(Box::new(operand)))
                } else {
                    Ok(operand)
                }
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> Result<Node, ParseError> {
        let token = self
            .advance()
            .ok_or_else(|| ParseError::at(self.end, "unexpected end of input"))?;

        match token.kind {
            TokenKind::Number(n) => Ok(Node::Number(n)),
            TokenKind::Ident(name) => self.parse_identifier(name, token.pos),
            TokenKind::LParen => {
                self.enter(token.pos)?;
                let inner = self.parse_expression();
                self.leave();
                let inner = inner?;
                self.expect_rparen(token.pos)?;
                Ok(inner)
            }
            other => Err(ParseError::at(
                token.pos,
                format!("unexpected {}", describe(&other)),
            )),
        }
    }

    fn parse_identifier(&mut self, name: String, pos: usize) -> Result<Node, ParseError> {
        if let Some(func) = Func::from_name(&name) {
            let open = match self.advance() {
                Some(Token {
                    kind: TokenKind::LParen,
                    pos,
                }) => pos,
                _ => {
                    return Err(ParseError::at(
                        pos,
                        format!("function '{}' requires a parenthesised argument", name),
                    ))
                }
            };
            self.enter(open)?;
            let arg = self.parse_expression();
            self.leave();
            let arg = arg?;
            self.expect_rparen(open)?;
            return Ok(Node::Call(func, Box::new(arg)));
        }

        match name.as_str() {
            "x" => Ok(Node::Var),
            "pi" => Ok(Node::Number(std::f64::consts::PI)),
            "e" => Ok(Node::Number(std::f64::consts::E)),
            _ => Err(ParseError::at(pos, format!("unknown identifier '{}'", name))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: f64) -> Box<Node> {
        Box::new(Node::Number(n))
    }

    fn var() -> Box<Node> {
        Box::new(Node::Var)
    }

    #[test]
    fn test_precedence_mul_over_add() {
        let ast = parse("1 + 2 * x").unwrap();
        assert_eq!(
            ast,
            Node::Binary(
                BinOp::Add,
                num(1.0),
                Box::new(Node::Binary(BinOp::Mul, num(2.0), var()))
            )
        );
    }

    #[test]
    fn test_power_is_right_associative() {
        let ast = parse("2^3^2").unwrap();
        assert_eq!(
            ast,
            Node::Binary(
                BinOp::Pow,
                num(2.0),
                Box::new(Node::Binary(BinOp::Pow, num(3.0), num(2.0)))
            )
        );
    }

    #[test]
    fn test_unary_minus_binds_tighter_than_power() {
        let ast = parse("-x^2").unwrap();
        assert_eq!(
            ast,
            Node::Binary(BinOp::Pow, Box::new(Node::Neg(var())), num(2.0))
        );
    }

    #[test]
    fn test_negative_exponent() {
        let ast = parse("x^-1").unwrap();
        assert_eq!(
            ast,
            Node::Binary(BinOp::Pow, var(), Box::new(Node::Neg(num(1.0))))
        );
    }

    #[test]
    fn test_subtraction_is_left_associative() {
        let ast = parse("x - 1 - 2").unwrap();
        assert_eq!(
            ast,
            Node::Binary(
                BinOp::Sub,
                Box::new(Node::Binary(BinOp::Sub, var(), num(1.0))),
                num(2.0)
            )
        );
    }

    #[test]
    fn test_function_call_and_constants() {
        let ast = parse("sin(pi*x)").unwrap();
        assert_eq!(
            ast,
            Node::Call(
                Func::Sin,
                Box::new(Node::Binary(
                    BinOp::Mul,
                    num(std::f64::consts::PI),
                    var()
                ))
            )
        );
        assert_eq!(parse("ln(x)").unwrap(), parse("log(x)").unwrap());
    }

    #[test]
    fn test_implicit_multiplication_rejected() {
        let err = parse("3x+*").unwrap_err();
        assert_eq!(err.position, Some(1));
    }

    #[test]
    fn test_unknown_identifier() {
        let err = parse("y + 1").unwrap_err();
        assert!(err.message.contains("unknown identifier 'y'"));
        assert_eq!(err.position, Some(0));
    }

    #[test]
    fn test_mismatched_parentheses() {
        assert!(parse("(x + 1").is_err());
        assert!(parse("x + 1)").is_err());
        assert!(parse("sin(x").is_err());
    }

    #[test]
    fn test_function_without_arguments() {
        let err = parse("sin + 1").unwrap_err();
        assert!(err.message.contains("sin"));
    }

    #[test]
    fn test_empty_and_dangling() {
        assert_eq!(parse("").unwrap_err().message, "empty expression");
        assert_eq!(parse("   ").unwrap_err().message, "empty expression");
        assert!(parse("x +").is_err());
        assert!(parse("*x").is_err());
    }

    #[test]
    fn test_token_limit() {
        let at_limit = format!("{}x", "x+".repeat((MAX_TOKENS - 1) / 2));
        assert!(parse(&at_limit).is_ok());

        let over = format!("{}x", "x+".repeat(MAX_TOKENS / 2));
        let err = parse(&over).unwrap_err();
        assert!(err.message.contains("expression too long"));
        assert_eq!(err.position, Some(MAX_TOKENS));
    }

    #[test]
    fn test_deep_nesting_rejected_without_overflow() {
        let text = format!("{}x{}", "(".repeat(1000), ")".repeat(1000));
        let err = parse(&text).unwrap_err();
        assert!(err.message.contains("nested too deeply"));
    }
}
