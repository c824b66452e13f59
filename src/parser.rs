use std::collections::BTreeMap;
use std::rc::Rc;

use anyhow::{Result, bail};

use crate::ast::{ComparisonOp, Statement};
use crate::lexer::Lexer;
use crate::runtime::{Class, Method, ObjectHolder};
use crate::token::Token;

/// Recursive-descent parser over the streaming lexer.
///
/// Class names resolve at parse time: a class must be defined before it is
/// instantiated or used as a base class.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    classes: BTreeMap<String, Rc<Class>>,
}

impl<'a> Parser<'a> {
    pub fn new(lexer: Lexer<'a>) -> Self {
        Self {
            lexer,
            classes: BTreeMap::new(),
        }
    }

    pub fn parse_program(mut self) -> Result<Statement> {
        let mut statements = Vec::new();
        while !matches!(self.lexer.current(), Token::Eof) {
            if self.consume_newlines() {
                continue;
            }
            statements.push(self.parse_statement()?);
        }
        Ok(Statement::Compound { statements })
    }

    fn parse_statement(&mut self) -> Result<Statement> {
        match self.lexer.current() {
            Token::Class => self.parse_class_definition(),
            Token::If => self.parse_if_else(),
            Token::Print => self.parse_print(),
            Token::Return => self.parse_return(),
            _ => self.parse_assignment_or_expression(),
        }
    }

    fn parse_class_definition(&mut self) -> Result<Statement> {
        self.advance(); // class
        let name = self.expect_identifier()?;
        let parent = if self.try_consume_char('(') {
            let base = self.expect_identifier()?;
            let Some(base_class) = self.classes.get(&base) else {
                bail!("Unknown base class '{base}' for class {name}");
            };
            let base_class = Rc::clone(base_class);
            self.expect_char(')')?;
            Some(base_class)
        } else {
            None
        };
        self.expect_char(':')?;
        self.expect(&Token::Newline)?;
        self.expect(&Token::Indent)?;
        let mut methods = Vec::new();
        while !matches!(self.lexer.current(), Token::Dedent | Token::Eof) {
            if self.consume_newlines() {
                continue;
            }
            methods.push(self.parse_method()?);
        }
        self.expect(&Token::Dedent)?;

        let class = Rc::new(Class::new(name.clone(), methods, parent));
        self.classes.insert(name, Rc::clone(&class));
        Ok(Statement::ClassDefinition { class })
    }

    fn parse_method(&mut self) -> Result<Method> {
        self.expect(&Token::Def)?;
        let name = self.expect_identifier()?;
        self.expect_char('(')?;
        let receiver = self.expect_identifier()?;
        if receiver != "self" {
            bail!("The first parameter of method {name} must be self, got '{receiver}'");
        }
        let mut formal_params = Vec::new();
        while self.try_consume_char(',') {
            formal_params.push(self.expect_identifier()?);
        }
        self.expect_char(')')?;
        let body = self.parse_suite()?;
        Ok(Method {
            name,
            formal_params,
            body: Rc::new(Statement::MethodBody {
                body: Box::new(body),
            }),
        })
    }

    /// `: NEWLINE INDENT statement+ DEDENT`
    fn parse_suite(&mut self) -> Result<Statement> {
        self.expect_char(':')?;
        self.expect(&Token::Newline)?;
        self.expect(&Token::Indent)?;
        let mut statements = Vec::new();
        while !matches!(self.lexer.current(), Token::Dedent | Token::Eof) {
            if self.consume_newlines() {
                continue;
            }
            statements.push(self.parse_statement()?);
        }
        self.expect(&Token::Dedent)?;
        Ok(Statement::Compound { statements })
    }

    fn parse_if_else(&mut self) -> Result<Statement> {
        self.advance(); // if
        let condition = self.parse_expression()?;
        let if_body = self.parse_suite()?;
        let else_body = if matches!(self.lexer.current(), Token::Else) {
            self.advance();
            Some(Box::new(self.parse_suite()?))
        } else {
            None
        };
        Ok(Statement::IfElse {
            condition: Box::new(condition),
            if_body: Box::new(if_body),
            else_body,
        })
    }

    fn parse_print(&mut self) -> Result<Statement> {
        self.advance(); // print
        let mut args = Vec::new();
        if !matches!(self.lexer.current(), Token::Newline) {
            args.push(self.parse_expression()?);
            while self.try_consume_char(',') {
                args.push(self.parse_expression()?);
            }
        }
        self.expect(&Token::Newline)?;
        Ok(Statement::Print { args })
    }

    fn parse_return(&mut self) -> Result<Statement> {
        self.advance(); // return
        let value = if matches!(self.lexer.current(), Token::Newline) {
            Statement::Const(ObjectHolder::none())
        } else {
            self.parse_expression()?
        };
        self.expect(&Token::Newline)?;
        Ok(Statement::Return {
            value: Box::new(value),
        })
    }

    fn parse_assignment_or_expression(&mut self) -> Result<Statement> {
        let target = self.parse_expression()?;
        if !matches!(self.lexer.current(), Token::Char('=')) {
            self.expect(&Token::Newline)?;
            return Ok(target);
        }
        self.advance(); // =
        let value = Box::new(self.parse_expression()?);
        self.expect(&Token::Newline)?;

        let Statement::VariableValue { mut dotted_ids } = target else {
            bail!("Invalid assignment target");
        };
        match dotted_ids.pop() {
            Some(name) if dotted_ids.is_empty() => Ok(Statement::Assignment { name, value }),
            Some(field_name) => Ok(Statement::FieldAssignment {
                object: Box::new(Statement::VariableValue { dotted_ids }),
                field_name,
                value,
            }),
            None => bail!("Invalid assignment target"),
        }
    }

    fn parse_expression(&mut self) -> Result<Statement> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Statement> {
        let mut expr = self.parse_and()?;
        while matches!(self.lexer.current(), Token::Or) {
            self.advance();
            let rhs = self.parse_and()?;
            expr = Statement::Or {
                lhs: Box::new(expr),
                rhs: Box::new(rhs),
            };
        }
        Ok(expr)
    }

    fn parse_and(&mut self) -> Result<Statement> {
        let mut expr = self.parse_not()?;
        while matches!(self.lexer.current(), Token::And) {
            self.advance();
            let rhs = self.parse_not()?;
            expr = Statement::And {
                lhs: Box::new(expr),
                rhs: Box::new(rhs),
            };
        }
        Ok(expr)
    }

    fn parse_not(&mut self) -> Result<Statement> {
        if matches!(self.lexer.current(), Token::Not) {
            self.advance();
            let argument = self.parse_not()?;
            return Ok(Statement::Not {
                argument: Box::new(argument),
            });
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Statement> {
        let lhs = self.parse_additive()?;
        let op = match self.lexer.current() {
            Token::Eq => ComparisonOp::Eq,
            Token::NotEq => ComparisonOp::NotEq,
            Token::LessOrEq => ComparisonOp::LessOrEq,
            Token::GreaterOrEq => ComparisonOp::GreaterOrEq,
            Token::Char('<') => ComparisonOp::Less,
            Token::Char('>') => ComparisonOp::Greater,
            _ => return Ok(lhs),
        };
        self.advance();
        let rhs = self.parse_additive()?;
        Ok(Statement::Comparison {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    fn parse_additive(&mut self) -> Result<Statement> {
        let mut expr = self.parse_term()?;
        loop {
            if self.try_consume_char('+') {
                let rhs = self.parse_term()?;
                expr = Statement::Add {
                    lhs: Box::new(expr),
                    rhs: Box::new(rhs),
                };
            } else if self.try_consume_char('-') {
                let rhs = self.parse_term()?;
                expr = Statement::Sub {
                    lhs: Box::new(expr),
                    rhs: Box::new(rhs),
                };
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn parse_term(&mut self) -> Result<Statement> {
        let mut expr = self.parse_unary()?;
        loop {
            if self.try_consume_char('*') {
                let rhs = self.parse_unary()?;
                expr = Statement::Mult {
                    lhs: Box::new(expr),
                    rhs: Box::new(rhs),
                };
            } else if self.try_consume_char('/') {
                let rhs = self.parse_unary()?;
                expr = Statement::Div {
                    lhs: Box::new(expr),
                    rhs: Box::new(rhs),
                };
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn parse_unary(&mut self) -> Result<Statement> {
        if self.try_consume_char('-') {
            // Unary minus is syntactic: -x reads as 0 - x.
            let operand = self.parse_unary()?;
            return Ok(Statement::Sub {
                lhs: Box::new(Statement::Const(ObjectHolder::number(0))),
                rhs: Box::new(operand),
            });
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Statement> {
        let mut expr = self.parse_primary()?;
        while self.try_consume_char('.') {
            let name = self.expect_identifier()?;
            if matches!(self.lexer.current(), Token::Char('(')) {
                let args = self.parse_call_args()?;
                expr = Statement::MethodCall {
                    object: Box::new(expr),
                    method: name,
                    args,
                };
            } else if let Statement::VariableValue { ref mut dotted_ids } = expr {
                dotted_ids.push(name);
            } else {
                bail!("Field '{name}' can only be read from a named variable");
            }
        }
        Ok(expr)
    }

    fn parse_call_args(&mut self) -> Result<Vec<Statement>> {
        self.expect_char('(')?;
        let mut args = Vec::new();
        if !matches!(self.lexer.current(), Token::Char(')')) {
            args.push(self.parse_expression()?);
            while self.try_consume_char(',') {
                args.push(self.parse_expression()?);
            }
        }
        self.expect_char(')')?;
        Ok(args)
    }

    fn parse_primary(&mut self) -> Result<Statement> {
        match self.lexer.current().clone() {
            Token::Number(value) => {
                self.advance();
                Ok(Statement::Const(ObjectHolder::number(value)))
            }
            Token::String(text) => {
                self.advance();
                Ok(Statement::Const(ObjectHolder::string(text)))
            }
            Token::True => {
                self.advance();
                Ok(Statement::Const(ObjectHolder::bool(true)))
            }
            Token::False => {
                self.advance();
                Ok(Statement::Const(ObjectHolder::bool(false)))
            }
            Token::None => {
                self.advance();
                Ok(Statement::Const(ObjectHolder::none()))
            }
            Token::Char('(') => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_char(')')?;
                Ok(expr)
            }
            Token::Id(name) => {
                self.advance();
                if matches!(self.lexer.current(), Token::Char('(')) {
                    if name == "str" {
                        self.expect_char('(')?;
                        let argument = self.parse_expression()?;
                        self.expect_char(')')?;
                        return Ok(Statement::Stringify {
                            argument: Box::new(argument),
                        });
                    }
                    let args = self.parse_call_args()?;
                    let Some(class) = self.classes.get(&name) else {
                        bail!("Unknown class '{name}'");
                    };
                    return Ok(Statement::NewInstance {
                        class: Rc::clone(class),
                        args,
                    });
                }
                Ok(Statement::VariableValue {
                    dotted_ids: vec![name],
                })
            }
            token => bail!("Expected an expression, got {token}"),
        }
    }

    fn advance(&mut self) {
        self.lexer.next_token();
    }

    fn expect(&mut self, expected: &Token) -> Result<()> {
        if self.lexer.current() == expected {
            self.advance();
            Ok(())
        } else {
            bail!("Expected {expected}, got {}", self.lexer.current());
        }
    }

    fn expect_char(&mut self, c: char) -> Result<()> {
        self.expect(&Token::Char(c))
    }

    fn try_consume_char(&mut self, c: char) -> bool {
        if matches!(self.lexer.current(), Token::Char(x) if *x == c) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_identifier(&mut self) -> Result<String> {
        if let Token::Id(name) = self.lexer.current() {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            bail!("Expected an identifier, got {}", self.lexer.current());
        }
    }

    fn consume_newlines(&mut self) -> bool {
        let mut consumed = false;
        while matches!(self.lexer.current(), Token::Newline) {
            consumed = true;
            self.advance();
        }
        consumed
    }
}

pub fn parse(lexer: Lexer<'_>) -> Result<Statement> {
    Parser::new(lexer).parse_program()
}
