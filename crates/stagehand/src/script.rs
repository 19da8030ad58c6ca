//! A small s-expression reader for driving an [`Engine`] from text.
//!
//! ```text
//! ; comments run to the end of the line
//! (clip 1 10000)
//! (draw-buffer 'back)
//! (fog (vector 0 0 1) 0.01 1 100)
//! (set-colour-mask #(#t #f #f #t))
//! ```
//!
//! Calls may nest up to [`MAX_DEPTH`] levels; `vector` builds a vector from
//! its evaluated arguments. Everything else is looked up in the operation
//! table.

use stagehand_core::{Result, StagehandError};

use crate::engine::Engine;
use crate::value::Value;

/// Deepest nesting of calls and literal vectors a program may use.
pub const MAX_DEPTH: usize = 256;

/// A parsed expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    Call { name: String, args: Vec<Expr> },
}

/// Parses a whole program. Nothing is evaluated.
pub fn parse(source: &str) -> Result<Vec<Expr>> {
    let mut reader = Reader {
        src: source,
        pos: 0,
        depth: 0,
    };
    let mut program = Vec::new();
    loop {
        reader.skip_blank();
        if reader.peek().is_none() {
            return Ok(program);
        }
        program.push(reader.expr()?);
    }
}

/// Evaluates one expression, innermost calls first.
///
/// Recursion is bounded by the nesting [`parse`] accepts.
pub fn evaluate(engine: &mut Engine, expr: &Expr) -> Result<Value> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Call { name, args } => {
            let args = args
                .iter()
                .map(|arg| evaluate(engine, arg))
                .collect::<Result<Vec<_>>>()?;
            if name == "vector" {
                Ok(Value::Vector(args))
            } else {
                engine.call(name, &args)
            }
        }
    }
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | '"' | ';')
}

struct Reader<'a> {
    src: &'a str,
    pos: usize,
    /// Open calls and literal vectors enclosing `pos`.
    depth: usize,
}

impl Reader<'_> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn error(&self, offset: usize, reason: impl Into<String>) -> StagehandError {
        StagehandError::Parse {
            offset,
            reason: reason.into(),
        }
    }

    fn enter(&mut self, open: usize) -> Result<()> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error(open, format!("nesting too deep (limit {MAX_DEPTH})")));
        }
        self.depth += 1;
        Ok(())
    }

    fn skip_blank(&mut self) {
        while let Some(c) = self.peek() {
            if c == ';' {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.bump();
                }
            } else if c.is_whitespace() {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn atom(&mut self) -> &str {
        let start = self.pos;
        while self.peek().is_some_and(|c| !is_delimiter(c)) {
            self.bump();
        }
        &self.src[start..self.pos]
    }

    fn expr(&mut self) -> Result<Expr> {
        self.skip_blank();
        let start = self.pos;
        match self.peek() {
            None => Err(self.error(start, "unexpected end of input")),
            Some('(') => {
                self.bump();
                self.enter(start)?;
                let call = self.call(start);
                self.depth -= 1;
                call
            }
            Some(')') => Err(self.error(start, "unexpected ')'")),
            _ => self.datum(false).map(Expr::Literal),
        }
    }

    fn call(&mut self, open: usize) -> Result<Expr> {
        self.skip_blank();
        let head = self.pos;
        let name = self.atom().to_string();
        if name.is_empty() {
            return Err(self.error(head, "expected an operation name"));
        }
        let mut args = Vec::new();
        loop {
            self.skip_blank();
            match self.peek() {
                None => return Err(self.error(open, "unclosed '('")),
                Some(')') => {
                    self.bump();
                    return Ok(Expr::Call { name, args });
                }
                _ => args.push(self.expr()?),
            }
        }
    }

    /// Reads a self-evaluating value. Inside a literal vector bare words are
    /// symbols; elsewhere they must be quoted.
    fn datum(&mut self, quoted: bool) -> Result<Value> {
        self.skip_blank();
        let start = self.pos;
        match self.peek() {
            None => Err(self.error(start, "unexpected end of input")),
            Some('"') => {
                self.bump();
                self.string(start)
            }
            Some('\'') => {
                self.bump();
                let word = self.atom().to_string();
                if word.is_empty() {
                    return Err(self.error(start, "expected a symbol after quote"));
                }
                Ok(Value::Symbol(word))
            }
            Some('#') if self.src[self.pos..].starts_with("#(") => {
                self.pos += 2;
                self.enter(start)?;
                let vector = self.vector(start);
                self.depth -= 1;
                vector
            }
            Some('(' | ')') => Err(self.error(start, "calls are not allowed inside a literal")),
            Some(_) => {
                let word = self.atom().to_string();
                self.word(start, &word, quoted)
            }
        }
    }

    fn vector(&mut self, open: usize) -> Result<Value> {
        let mut items = Vec::new();
        loop {
            self.skip_blank();
            match self.peek() {
                None => return Err(self.error(open, "unclosed '#('")),
                Some(')') => {
                    self.bump();
                    return Ok(Value::Vector(items));
                }
                _ => items.push(self.datum(true)?),
            }
        }
    }

    fn string(&mut self, open: usize) -> Result<Value> {
        let mut out = String::new();
        loop {
            let at = self.pos;
            match self.bump() {
                None => return Err(self.error(open, "unterminated string")),
                Some('"') => return Ok(Value::Str(out)),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some(c @ ('"' | '\\')) => out.push(c),
                    Some(c) => return Err(self.error(at, format!("unknown escape '\\{c}'"))),
                    None => return Err(self.error(open, "unterminated string")),
                },
                Some(c) => out.push(c),
            }
        }
    }

    fn word(&self, start: usize, word: &str, quoted: bool) -> Result<Value> {
        match word {
            "#t" | "#true" => return Ok(Value::Bool(true)),
            "#f" | "#false" => return Ok(Value::Bool(false)),
            _ => {}
        }
        if let Ok(i) = word.parse::<i64>() {
            return Ok(Value::Int(i));
        }
        let looks_numeric = word
            .trim_start_matches(['+', '-'])
            .starts_with(|c: char| c.is_ascii_digit() || c == '.');
        if looks_numeric {
            return match word.parse::<f64>() {
                Ok(f) if f.is_finite() => Ok(Value::Float(f)),
                _ => Err(self.error(start, format!("malformed number '{word}'"))),
            };
        }
        if word.starts_with('#') {
            return Err(self.error(start, format!("unknown syntax '{word}'")));
        }
        if quoted {
            Ok(Value::symbol(word))
        } else {
            Err(self.error(
                start,
                format!("unbound identifier '{word}'; quote symbols as '{word}"),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, args: Vec<Expr>) -> Expr {
        Expr::Call {
            name: name.into(),
            args,
        }
    }

    fn lit(v: impl Into<Value>) -> Expr {
        Expr::Literal(v.into())
    }

    #[test]
    fn test_numbers_and_symbols() {
        let program = parse("(clip 1 1e4) ; far plane\n(draw-buffer 'back-left)").unwrap();
        assert_eq!(
            program,
            vec![
                call("clip", vec![lit(1_i64), lit(10000.0)]),
                call("draw-buffer", vec![lit(Value::symbol("back-left"))]),
            ]
        );
    }

    #[test]
    fn test_nested_vector_call() {
        let program = parse("(fog (vector 0 0 1) 0.01 -1 100)").unwrap();
        assert_eq!(
            program,
            vec![call(
                "fog",
                vec![
                    call("vector", vec![lit(0_i64), lit(0_i64), lit(1_i64)]),
                    lit(0.01),
                    lit(-1_i64),
                    lit(100_i64),
                ]
            )]
        );
    }

    #[test]
    fn test_literal_vector() {
        let program = parse("(set-colour-mask #(#t #f #false #true))").unwrap();
        let quad = Value::Vector(vec![
            Value::Bool(true),
            Value::Bool(false),
            Value::Bool(false),
            Value::Bool(true),
        ]);
        assert_eq!(program, vec![call("set-colour-mask", vec![lit(quad)])]);
    }

    #[test]
    fn test_string_escapes() {
        let program = parse(r#"(load-texture "dir\\a \"b\".png")"#).unwrap();
        assert_eq!(
            program,
            vec![call("load-texture", vec![lit(r#"dir\a "b".png"#)])]
        );
    }

    #[test]
    fn test_errors_carry_offsets() {
        let err = parse("(clip 1 10000").unwrap_err();
        assert!(matches!(err, StagehandError::Parse { offset: 0, .. }));

        let err = parse("(draw-buffer back)").unwrap_err();
        assert!(matches!(err, StagehandError::Parse { offset: 13, .. }));

        assert!(parse("(blur inf)").is_err());
        assert!(parse("(blur 1.2.3)").is_err());
        assert!(parse(")").is_err());
        assert!(parse("(\"x\")").is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |n: usize| format!("{}1{}", "(vector ".repeat(n), ")".repeat(n));
        assert_eq!(parse(&nested(MAX_DEPTH)).unwrap().len(), 1);

        let err = parse(&nested(5000)).unwrap_err();
        match err {
            StagehandError::Parse { offset, reason } => {
                assert_eq!(offset, MAX_DEPTH * "(vector ".len());
                assert!(reason.contains("nesting too deep"), "{reason}");
            }
            other => panic!("expected a parse error, got {other:?}"),
        }

        let literal = format!("(f {}{})", "#(".repeat(5000), ")".repeat(5000));
        assert!(matches!(
            parse(&literal).unwrap_err(),
            StagehandError::Parse { .. }
        ));
    }

    #[test]
    fn test_empty_program() {
        assert!(parse("  ; nothing\n").unwrap().is_empty());
    }
}
