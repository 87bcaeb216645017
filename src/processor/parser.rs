//! Parser that pulls tokens off the scanner and builds a `ShaderModel`.
//!
//! Only shader-scope structure is understood: declarations and function
//! definitions. Function bodies are captured as raw text.

use super::lexer::{Scanner, describe};
use crate::error::TranslateError;
use crate::model::{Declaration, FunctionDecl, ShaderModel, ShaderStage};

/// What the leading token of a top-level item says it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword<'a> {
    Attribute,
    Uniform,
    Varying,
    /// `precision mediump float;` – no Cg counterpart, skipped.
    Precision,
    End,
    /// Anything else starts a function definition with this return type.
    Function(&'a str),
}

impl<'a> Keyword<'a> {
    fn classify(token: &'a str) -> Self {
        match token {
            "attribute" => Keyword::Attribute,
            "uniform" => Keyword::Uniform,
            "varying" => Keyword::Varying,
            "precision" => Keyword::Precision,
            "" => Keyword::End,
            return_type => Keyword::Function(return_type),
        }
    }
}

pub fn parse(src: &str, stage: ShaderStage) -> Result<ShaderModel, TranslateError> {
    Parser::new(src, stage).parse()
}

struct Parser<'a> {
    scanner: Scanner<'a>,
    model: ShaderModel,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str, stage: ShaderStage) -> Self {
        Self {
            scanner: Scanner::new(src),
            model: ShaderModel::new(stage),
        }
    }

    fn parse(mut self) -> Result<ShaderModel, TranslateError> {
        loop {
            match Keyword::classify(self.scanner.next_token()) {
                Keyword::Attribute => {
                    let decl = self.parse_declaration()?;
                    self.model.attributes.push(decl);
                }
                Keyword::Uniform => {
                    let decl = self.parse_declaration()?;
                    self.model.uniforms.push(decl);
                }
                Keyword::Varying => {
                    let decl = self.parse_declaration()?;
                    self.model.varyings.push(decl);
                }
                Keyword::Precision => self.skip_statement()?,
                Keyword::End => break,
                Keyword::Function(return_type) => {
                    let func = self.parse_function(return_type)?;
                    self.model.functions.push(func);
                }
            }
        }
        Ok(self.model)
    }

    /// `<type> <name> ;` – the qualifier is already consumed.
    fn parse_declaration(&mut self) -> Result<Declaration, TranslateError> {
        let data_type = self.scanner.next_token();
        let name = self.scanner.next_token();
        self.expect_terminator()?;
        Ok(Declaration::new(data_type, name))
    }

    fn expect_terminator(&mut self) -> Result<(), TranslateError> {
        let offset = self.scanner.offset();
        match self.scanner.next_token() {
            ";" => Ok(()),
            found => Err(TranslateError::UnexpectedTerminator {
                found: describe(found),
                offset,
            }),
        }
    }

    fn skip_statement(&mut self) -> Result<(), TranslateError> {
        loop {
            let offset = self.scanner.offset();
            match self.scanner.next_token() {
                ";" => return Ok(()),
                "" => {
                    return Err(TranslateError::UnexpectedTerminator {
                        found: describe(""),
                        offset,
                    });
                }
                _ => {}
            }
        }
    }

    /// `<ret> <name> ( <params> ) { <body> }` – `<ret>` is already consumed.
    fn parse_function(&mut self, return_type: &str) -> Result<FunctionDecl, TranslateError> {
        let name = self.scanner.next_token();
        self.scanner.expect('(')?;
        let raw_parameters = self.scanner.take_parameters()?;
        self.scanner.expect('{')?;
        let raw_body = self.scanner.take_body()?;

        Ok(FunctionDecl {
            name: name.to_string(),
            return_type: return_type.to_string(),
            raw_parameters: raw_parameters.trim().to_string(),
            raw_body: raw_body.to_string(),
        })
    }
}
