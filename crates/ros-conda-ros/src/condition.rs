//! Evaluation of package.xml `condition` attributes
//!
//! Conditions compare `$VARIABLE` references, bare words and quoted strings
//! with `==`, `!=`, `<`, `<=`, `>`, `>=`, combined with `and`, `or` and
//! parentheses. Comparisons are on strings; unset variables are empty.

use std::collections::BTreeMap;

use ros_conda_core::{Error, Result};

/// Variables visible to condition expressions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConditionContext {
    vars: BTreeMap<String, String>,
}

impl ConditionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variant of [`ConditionContext::set`]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    LParen,
    RParen,
    Cmp(CmpOp),
    And,
    Or,
    Var(String),
    Literal(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Value {
    Str(String),
    Bool(bool),
}

/// Evaluate `condition` against `context`; an empty condition is true
pub fn evaluate_condition(condition: &str, context: &ConditionContext) -> Result<bool> {
    if condition.trim().is_empty() {
        return Ok(true);
    }

    let tokens = tokenize(condition)?;
    let mut parser = Parser { tokens: &tokens, pos: 0, context, source: condition };
    let value = parser.parse_or()?;
    if parser.pos != tokens.len() {
        return Err(parser.error("unexpected trailing input"));
    }

    match value {
        Value::Bool(b) => Ok(b),
        Value::Str(_) => Err(parser.error("expression does not evaluate to a boolean")),
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')
}

fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        match c {
            c if c.is_whitespace() => {}
            '(' => tokens.push(Token::LParen),
            ')' => tokens.push(Token::RParen),
            '=' | '!' | '<' | '>' => {
                let followed_by_eq = chars.next_if(|(_, next)| *next == '=').is_some();
                let op = match (c, followed_by_eq) {
                    ('=', true) => CmpOp::Eq,
                    ('!', true) => CmpOp::Ne,
                    ('<', true) => CmpOp::Le,
                    ('<', false) => CmpOp::Lt,
                    ('>', true) => CmpOp::Ge,
                    ('>', false) => CmpOp::Gt,
                    _ => {
                        return Err(Error::parse(format!(
                            "invalid operator at offset {idx} in condition '{input}'"
                        )))
                    }
                };
                tokens.push(Token::Cmp(op));
            }
            '\'' | '"' => {
                let mut literal = String::new();
                let mut closed = false;
                for (_, next) in chars.by_ref() {
                    if next == c {
                        closed = true;
                        break;
                    }
                    literal.push(next);
                }
                if !closed {
                    return Err(Error::parse(format!("unterminated string in condition '{input}'")));
                }
                tokens.push(Token::Literal(literal));
            }
            '$' => {
                let mut name = String::new();
                while let Some((_, next)) = chars.next_if(|(_, next)| is_word_char(*next)) {
                    name.push(next);
                }
                if name.is_empty() {
                    return Err(Error::parse(format!(
                        "missing variable name at offset {idx} in condition '{input}'"
                    )));
                }
                tokens.push(Token::Var(name));
            }
            c if is_word_char(c) => {
                let mut word = String::from(c);
                while let Some((_, next)) = chars.next_if(|(_, next)| is_word_char(*next)) {
                    word.push(next);
                }
                tokens.push(match word.as_str() {
                    "and" => Token::And,
                    "or" => Token::Or,
                    _ => Token::Literal(word),
                });
            }
            other => {
                return Err(Error::parse(format!(
                    "unexpected character '{other}' in condition '{input}'"
                )))
            }
        }
    }

    Ok(tokens)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    context: &'a ConditionContext,
    source: &'a str,
}

impl Parser<'_> {
    fn error(&self, reason: &str) -> Error {
        Error::parse(format!("invalid condition '{}': {reason}", self.source))
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos);
        self.pos += 1;
        token
    }

    fn parse_or(&mut self) -> Result<Value> {
        let mut lhs = self.parse_and()?;
        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            let rhs = self.parse_and()?;
            lhs = Value::Bool(self.as_bool(lhs)? || self.as_bool(rhs)?);
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Value> {
        let mut lhs = self.parse_comparison()?;
        while self.peek() == Some(&Token::And) {
            self.pos += 1;
            let rhs = self.parse_comparison()?;
            lhs = Value::Bool(self.as_bool(lhs)? && self.as_bool(rhs)?);
        }
        Ok(lhs)
    }

    fn parse_comparison(&mut self) -> Result<Value> {
        let lhs = self.parse_operand()?;
        let Some(Token::Cmp(op)) = self.peek().cloned() else {
            return Ok(lhs);
        };
        self.pos += 1;
        let rhs = self.parse_operand()?;

        let (Value::Str(a), Value::Str(b)) = (lhs, rhs) else {
            return Err(self.error("only strings can be compared"));
        };
        Ok(Value::Bool(match op {
            CmpOp::Eq => a == b,
            CmpOp::Ne => a != b,
            CmpOp::Lt => a < b,
            CmpOp::Le => a <= b,
            CmpOp::Gt => a > b,
            CmpOp::Ge => a >= b,
        }))
    }

    fn parse_operand(&mut self) -> Result<Value> {
        match self.advance().cloned() {
            Some(Token::LParen) => {
                let inner = self.parse_or()?;
                if self.advance() != Some(&Token::RParen) {
                    return Err(self.error("missing closing parenthesis"));
                }
                Ok(inner)
            }
            Some(Token::Var(name)) => {
                Ok(Value::Str(self.context.get(&name).unwrap_or_default().to_string()))
            }
            Some(Token::Literal(text)) => Ok(Value::Str(text)),
            Some(_) => Err(self.error("expected a value")),
            None => Err(self.error("unexpected end of expression")),
        }
    }

    fn as_bool(&self, value: Value) -> Result<bool> {
        match value {
            Value::Bool(b) => Ok(b),
            Value::Str(_) => Err(self.error("expected a boolean expression")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ros2() -> ConditionContext {
        ConditionContext::new()
            .with("ROS_VERSION", "2")
            .with("ROS_DISTRO", "humble")
            .with("ROS_PYTHON_VERSION", "3")
    }

    #[test]
    fn test_simple_comparisons() {
        let ctx = ros2();
        assert!(evaluate_condition("$ROS_VERSION == 2", &ctx).unwrap());
        assert!(!evaluate_condition("$ROS_VERSION == 1", &ctx).unwrap());
        assert!(evaluate_condition("$ROS_VERSION != 1", &ctx).unwrap());
        assert!(evaluate_condition("$ROS_PYTHON_VERSION >= 3", &ctx).unwrap());
        assert!(evaluate_condition("$ROS_DISTRO == 'humble'", &ctx).unwrap());
    }

    #[test]
    fn test_boolean_operators() {
        let ctx = ros2();
        assert!(evaluate_condition("$ROS_VERSION == 1 or $ROS_DISTRO == humble", &ctx).unwrap());
        assert!(!evaluate_condition("$ROS_VERSION == 2 and $ROS_DISTRO == jazzy", &ctx).unwrap());
        assert!(evaluate_condition(
            "($ROS_DISTRO == foxy or $ROS_DISTRO == humble) and $ROS_VERSION == 2",
            &ctx
        )
        .unwrap());
    }

    #[test]
    fn test_unset_variable_is_empty() {
        let ctx = ConditionContext::new();
        assert!(evaluate_condition("$ROS_VERSION == ''", &ctx).unwrap());
        assert!(!evaluate_condition("$ROS_VERSION == 2", &ctx).unwrap());
    }

    #[test]
    fn test_empty_condition_is_true() {
        assert!(evaluate_condition("   ", &ConditionContext::new()).unwrap());
    }

    #[test]
    fn test_invalid_conditions() {
        let ctx = ros2();
        assert!(evaluate_condition("$ROS_VERSION", &ctx).is_err());
        assert!(evaluate_condition("$ROS_VERSION = 2", &ctx).is_err());
        assert!(evaluate_condition("($ROS_VERSION == 2", &ctx).is_err());
        assert!(evaluate_condition("$ROS_VERSION == 2 2", &ctx).is_err());
        assert!(evaluate_condition("$ == 2", &ctx).is_err());
        assert!(evaluate_condition("$ROS_DISTRO == 'humble", &ctx).is_err());
    }
}
