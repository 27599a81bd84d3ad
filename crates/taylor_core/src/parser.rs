use crate::error::{EngineError, Result};
use crate::expr::{BinaryOp, Expr, UnaryOp, VARIABLE};
use crate::functions::{self, Function};
use crate::lexer::{tokenize, Token, TokenKind};

/// Deeper nesting than this is reported as a syntax error rather than
/// risking the call stack on hostile input.
pub const MAX_DEPTH: usize = 256;

/// Upper bound on tree nodes built from one source string. Flat chains such
/// as `x+x+...+x` stay shallow in the parser but produce a tree as deep as it
/// is long, which every later pass walks recursively.
pub const MAX_NODES: usize = 512;

/// Tokenizes and parses `source` in one step.
pub fn parse_expression(source: &str) -> Result<Expr> {
    let tokens = tokenize(source)?;
    parse(&tokens)
}

/// Parses a token sequence produced by [`tokenize`].
///
/// Grammar, lowest precedence first:
///
/// ```text
/// expr  := term (('+'|'-') term)*
/// term  := unary (('*'|'/') unary)*
/// unary := '-' unary | power
/// power := atom ('^' unary)?
/// atom  := NUMBER | 'x' | IDENT '(' expr (',' expr)* ')' | '(' expr ')' | 'pi' | 'e'
/// ```
pub fn parse(tokens: &[Token]) -> Result<Expr> {
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
        nodes: 0,
    };
    let expr = parser.parse_expression()?;
    let next = parser.peek()?;
    if next.kind != TokenKind::End {
        return Err(EngineError::syntax(
            next.position,
            format!("unexpected {} after complete expression", next.describe()),
        ));
    }
    Ok(expr)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
    nodes: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Result<&'a Token> {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .ok_or_else(|| EngineError::syntax(0, "empty token stream"))
    }

    fn consume(&mut self) -> Result<&'a Token> {
        let token = self.peek()?;
        if token.kind != TokenKind::End {
            self.pos += 1;
        }
        Ok(token)
    }

    fn peek_operator(&self) -> Result<Option<char>> {
        Ok(match self.peek()?.kind {
            TokenKind::Operator(op) => Some(op),
            _ => None,
        })
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            let position = self.peek()?.position;
            return Err(EngineError::syntax(position, "expression nested too deeply"));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Counts one more node against [`MAX_NODES`].
    fn grow(&mut self) -> Result<()> {
        self.nodes += 1;
        if self.nodes > MAX_NODES {
            let position = self.peek()?.position;
            return Err(EngineError::syntax(
                position,
                format!("expression is too long (more than {MAX_NODES} terms and operators)"),
            ));
        }
        Ok(())
    }

    fn parse_expression(&mut self) -> Result<Expr> {
        self.enter()?;
        let mut left = self.parse_term()?;

        while let Some(op) = self.peek_operator()? {
            let op = match op {
                '+' => BinaryOp::Add,
                '-' => BinaryOp::Sub,
                _ => break,
            };
            self.grow()?;
            self.consume()?;
            let right = self.parse_term()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }

        self.leave();
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Expr> {
        let mut left = self.parse_unary()?;

        while let Some(op) = self.peek_operator()? {
            let op = match op {
                '*' => BinaryOp::Mul,
                '/' => BinaryOp::Div,
                _ => break,
            };
            self.grow()?;
            self.consume()?;
            let right = self.parse_unary()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        if self.peek_operator()? == Some('-') {
            self.grow()?;
            self.consume()?;
            self.enter()?;
            let operand = self.parse_unary()?;
            self.leave();
            return Ok(Expr::Unary(UnaryOp::Neg, Box::new(operand)));
        }
        self.parse_power()
    }

    fn parse_power(&mut self) -> Result<Expr> {
        let base = self.parse_atom()?;
        if self.peek_operator()? == Some('^') {
            self.grow()?;
            self.consume()?;
            self.enter()?;
            // Exponent goes through `unary`, which makes `^` right-associative.
            let exponent = self.parse_unary()?;
            self.leave();
            return Ok(Expr::Binary(
                BinaryOp::Pow,
                Box::new(base),
                Box::new(exponent),
            ));
        }
        Ok(base)
    }

    fn parse_atom(&mut self) -> Result<Expr> {
        self.grow()?;
        let token = self.consume()?;
        match token.kind {
            TokenKind::Number(value) => Ok(Expr::Number(value)),
            TokenKind::Ident => self.parse_identifier(token),
            TokenKind::LParen => {
                let expr = self.parse_expression()?;
                self.expect_closing()?;
                Ok(expr)
            }
            TokenKind::End => Err(EngineError::syntax(
                token.position,
                "unexpected end of input, expected an operand",
            )),
            TokenKind::Operator(_) | TokenKind::RParen | TokenKind::Comma => {
                Err(EngineError::syntax(
                    token.position,
                    format!("unexpected {}, expected an operand", token.describe()),
                ))
            }
        }
    }

    fn parse_identifier(&mut self, token: &'a Token) -> Result<Expr> {
        let name = token.text.as_str();
        let is_call = self.peek()?.kind == TokenKind::LParen;

        if name == VARIABLE {
            return Ok(Expr::Variable);
        }
        if !is_call {
            if let Some(value) = functions::constant(name) {
                return Ok(Expr::Number(value));
            }
            if Function::from_name(name).is_some() {
                return Err(EngineError::syntax(
                    token.position,
                    format!("function '{name}' must be followed by '('"),
                ));
            }
            return Err(EngineError::syntax(
                token.position,
                format!("unknown identifier '{name}'"),
            ));
        }

        let function = Function::from_name(name).ok_or_else(|| EngineError::UnknownFunction {
            name: name.to_string(),
        })?;

        self.consume()?; // '('
        let mut args = vec![self.parse_expression()?];
        while self.peek()?.kind == TokenKind::Comma {
            self.consume()?;
            args.push(self.parse_expression()?);
        }
        self.expect_closing()?;

        if !function.accepts_arity(args.len()) {
            return Err(EngineError::syntax(
                token.position,
                format!(
                    "function '{name}' expects {}, got {}",
                    function.arity_description(),
                    args.len()
                ),
            ));
        }
        Ok(Expr::Call(function, args))
    }

    fn expect_closing(&mut self) -> Result<()> {
        let token = self.peek()?;
        if token.kind == TokenKind::RParen {
            self.consume()?;
            Ok(())
        } else {
            Err(EngineError::syntax(
                token.position,
                format!("expected ')', found {}", token.describe()),
            ))
        }
    }
}
