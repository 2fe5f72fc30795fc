//! Text style resolution backed by a minimal stylesheet
//!
//! Feed renderers style their output through symbolic rule names ("title",
//! "aux") looked up against a stylesheet. A built-in default sheet is
//! bootstrapped lazily, exactly once per process, and is only consulted
//! when the caller does not supply a sheet of their own.

use std::sync::OnceLock;

use cssparser::{BasicParseErrorKind, ParseError, Parser, ParserInput, Token};

use crate::utils::Result;

/// Text color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a hex color string
    fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?;
                let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?;
                let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?;
                Some(Color::rgb(r, g, b))
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Color::rgb(r, g, b))
            }
            8 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                let a = u8::from_str_radix(&hex[6..8], 16).ok()?;
                Some(Color::rgba(r, g, b, a))
            }
            _ => None,
        }
    }

    /// Parse named colors
    fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "black" => Some(Color::rgb(0, 0, 0)),
            "white" => Some(Color::rgb(255, 255, 255)),
            "red" => Some(Color::rgb(255, 0, 0)),
            "green" => Some(Color::rgb(0, 128, 0)),
            "lightgreen" => Some(Color::rgb(144, 238, 144)),
            "blue" => Some(Color::rgb(0, 0, 255)),
            "yellow" => Some(Color::rgb(255, 255, 0)),
            "aqua" | "cyan" => Some(Color::rgb(0, 255, 255)),
            "magenta" => Some(Color::rgb(255, 0, 255)),
            "gray" | "grey" => Some(Color::rgb(128, 128, 128)),
            "orange" => Some(Color::rgb(255, 165, 0)),
            "purple" => Some(Color::rgb(128, 0, 128)),
            _ => None,
        }
    }
}

/// A resolved run style
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextStyle {
    /// Foreground color; None means the surface default
    pub color: Option<Color>,
    pub bold: bool,
    pub underline: bool,
}

impl TextStyle {
    fn from_rule(rule: &StyleRule) -> Self {
        let mut style = TextStyle::default();
        for declaration in &rule.declarations {
            match (declaration.property.as_str(), &declaration.value) {
                ("color", Value::Color(color)) => style.color = Some(*color),
                ("font-weight", Value::Keyword(word)) if word == "bold" => style.bold = true,
                ("text-decoration", Value::Keyword(word)) if word == "underline" => {
                    style.underline = true
                }
                _ => {}
            }
        }
        style
    }
}

/// Declaration value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Color value
    Color(Color),
    /// Keyword (e.g. "bold")
    Keyword(String),
}

/// Declaration (property: value)
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub property: String,
    pub value: Value,
}

/// Named rule (selector names + declarations)
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    pub names: Vec<String>,
    pub declarations: Vec<Declaration>,
}

/// Stylesheet of named rules
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stylesheet {
    pub rules: Vec<StyleRule>,
}

impl Stylesheet {
    /// First rule selected by the given symbolic name
    pub fn rule(&self, name: &str) -> Option<&StyleRule> {
        self.rules
            .iter()
            .find(|rule| rule.names.iter().any(|n| n == name))
    }
}

/// Resolve a symbolic rule name to a concrete text style
///
/// Falls back to the default (unstyled) style when no rule matches, so a
/// missing or unusable rule can never abort a render.
pub fn resolve_style(sheet: &Stylesheet, name: &str) -> TextStyle {
    sheet.rule(name).map(TextStyle::from_rule).unwrap_or_default()
}

/// Built-in rules for the feed renderer roles
const DEFAULT_RULES: &str = "title { color: lightgreen } aux { color: aqua }";

static DEFAULT_STYLESHEET: OnceLock<Stylesheet> = OnceLock::new();

/// The process-wide default stylesheet
///
/// Parsed lazily on first use, exactly once, and never reset. Callers that
/// bring their own stylesheet bypass this entirely.
pub fn default_stylesheet() -> &'static Stylesheet {
    DEFAULT_STYLESHEET
        .get_or_init(|| CssParser::new().parse(DEFAULT_RULES).unwrap_or_default())
}

/// Stylesheet parser using the cssparser crate
pub struct CssParser {}

impl CssParser {
    pub fn new() -> Self {
        Self {}
    }

    /// Parse stylesheet text into named rules
    ///
    /// Malformed rules and declarations are skipped rather than failing the
    /// whole sheet.
    pub fn parse(&self, content: &str) -> Result<Stylesheet> {
        let mut input = ParserInput::new(content);
        let mut parser = Parser::new(&mut input);
        let mut rules = Vec::new();

        while !parser.is_exhausted() {
            parser.skip_whitespace();
            if parser.is_exhausted() {
                break;
            }

            if let Ok(rule) = self.parse_rule(&mut parser) {
                rules.push(rule);
            } else {
                self.skip_to_next_rule(&mut parser);
            }
        }

        Ok(Stylesheet { rules })
    }

    /// Parse a single rule: comma-separated names, then a declaration block
    fn parse_rule<'i>(
        &self,
        parser: &mut Parser<'i, '_>,
    ) -> std::result::Result<StyleRule, ParseError<'i, ()>> {
        let mut names = Vec::new();

        loop {
            parser.skip_whitespace();
            let state = parser.state();
            match parser.next() {
                Ok(Token::CurlyBracketBlock) => {
                    let declarations = parser.parse_nested_block(|p| self.parse_declarations(p))?;
                    return Ok(StyleRule {
                        names,
                        declarations,
                    });
                }
                Ok(Token::Ident(name)) => names.push(name.to_string()),
                Ok(Token::Comma) => {}
                Ok(_) => {}
                Err(_) => {
                    parser.reset(&state);
                    return Err(parser.new_error(BasicParseErrorKind::EndOfInput));
                }
            }
        }
    }

    /// Parse declarations inside a rule block
    fn parse_declarations<'i>(
        &self,
        parser: &mut Parser<'i, '_>,
    ) -> std::result::Result<Vec<Declaration>, ParseError<'i, ()>> {
        let mut declarations = Vec::new();

        loop {
            parser.skip_whitespace();
            if parser.is_exhausted() {
                break;
            }

            let result: std::result::Result<Declaration, ParseError<'i, ()>> =
                parser.try_parse(|p| {
                    let property = p.expect_ident()?.to_string();
                    p.expect_colon()?;
                    p.skip_whitespace();
                    let value = self.parse_value(p)?;

                    let _ = p.try_parse::<_, _, ParseError<()>>(|p2| {
                        p2.expect_semicolon()?;
                        Ok(())
                    });

                    Ok(Declaration { property, value })
                });

            match result {
                Ok(declaration) => declarations.push(declaration),
                Err(_) => self.skip_to_semicolon(parser),
            }
        }

        Ok(declarations)
    }

    /// Parse a declaration value
    fn parse_value<'i>(
        &self,
        parser: &mut Parser<'i, '_>,
    ) -> std::result::Result<Value, ParseError<'i, ()>> {
        let token = parser.next()?.clone();
        match token {
            Token::Ident(name) => {
                let name = name.to_string();
                if let Some(color) = Color::from_name(&name) {
                    Ok(Value::Color(color))
                } else {
                    Ok(Value::Keyword(name))
                }
            }
            Token::IDHash(hash) | Token::Hash(hash) => {
                if let Some(color) = Color::from_hex(&hash) {
                    Ok(Value::Color(color))
                } else {
                    Ok(Value::Keyword(format!("#{}", hash)))
                }
            }
            Token::Function(name) => {
                let name = name.to_string();
                if name == "rgb" || name == "rgba" {
                    parser.parse_nested_block(|p| self.parse_rgb_function(p, name == "rgba"))
                } else {
                    parser.parse_nested_block(|p| {
                        while p.next().is_ok() {}
                        Ok(Value::Keyword(name))
                    })
                }
            }
            _ => Err(parser.new_error(BasicParseErrorKind::UnexpectedToken(token))),
        }
    }

    /// Parse rgb() or rgba() arguments
    fn parse_rgb_function<'i>(
        &self,
        parser: &mut Parser<'i, '_>,
        has_alpha: bool,
    ) -> std::result::Result<Value, ParseError<'i, ()>> {
        let r = self.parse_color_component(parser)?;
        self.skip_comma(parser);
        let g = self.parse_color_component(parser)?;
        self.skip_comma(parser);
        let b = self.parse_color_component(parser)?;

        let a = if has_alpha {
            self.skip_comma(parser);
            self.parse_alpha_component(parser)?
        } else {
            255
        };

        Ok(Value::Color(Color::rgba(r, g, b, a)))
    }

    fn parse_color_component<'i>(
        &self,
        parser: &mut Parser<'i, '_>,
    ) -> std::result::Result<u8, ParseError<'i, ()>> {
        parser.skip_whitespace();
        let token = parser.next()?.clone();
        match token {
            Token::Number { value, .. } => Ok(value.clamp(0.0, 255.0) as u8),
            _ => Err(parser.new_error(BasicParseErrorKind::UnexpectedToken(token))),
        }
    }

    fn parse_alpha_component<'i>(
        &self,
        parser: &mut Parser<'i, '_>,
    ) -> std::result::Result<u8, ParseError<'i, ()>> {
        parser.skip_whitespace();
        let token = parser.next()?.clone();
        match token {
            Token::Number { value, .. } if value <= 1.0 => {
                Ok((value.clamp(0.0, 1.0) * 255.0) as u8)
            }
            Token::Number { value, .. } => Ok(value.clamp(0.0, 255.0) as u8),
            _ => Err(parser.new_error(BasicParseErrorKind::UnexpectedToken(token))),
        }
    }

    fn skip_comma(&self, parser: &mut Parser) {
        let _ = parser.try_parse::<_, _, ParseError<()>>(|p| {
            p.expect_comma()?;
            Ok(())
        });
    }

    /// Consume tokens up to and including the next rule block
    fn skip_to_next_rule(&self, parser: &mut Parser) {
        while let Ok(token) = parser.next() {
            if matches!(token, Token::CurlyBracketBlock) {
                return;
            }
        }
    }

    /// Consume tokens up to and including the next semicolon
    fn skip_to_semicolon(&self, parser: &mut Parser) {
        while let Ok(token) = parser.next() {
            if matches!(token, Token::Semicolon) {
                return;
            }
        }
    }
}

impl Default for CssParser {
    fn default() -> Self {
        Self::new()
    }
}
