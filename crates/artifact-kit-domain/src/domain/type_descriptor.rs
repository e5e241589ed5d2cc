//! Reified type shapes.
//!
//! A [`TypeDescriptor`] is a tree of raw (erased) type names and their
//! ordered type arguments. It is what artifact names are derived from and
//! what codecs report in their errors. Descriptors are captured from
//! `std::any::type_name` or built explicitly from a type tree.

use std::fmt;
use std::marker::PhantomData;

use crate::domain::error::ConfigurationError;

const TUPLE: &str = "Tuple";
const UNIT: &str = "Unit";
const ARRAY: &str = "Array";
const SLICE: &str = "Slice";
const FN_POINTER: &str = "fn";
const FN_TRAITS: [&str; 3] = ["Fn", "FnMut", "FnOnce"];
const OPAQUE: &str = "Opaque";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    raw: String,
    args: Vec<TypeDescriptor>,
}

impl TypeDescriptor {
    /// Captures the full shape of `T`, generic arguments included.
    pub fn of<T: ?Sized>() -> Self {
        let name = std::any::type_name::<T>();
        Self::parse(name).unwrap_or_else(|_| Self::plain(fallback_name(name)))
    }

    /// A non-generic type.
    pub fn plain(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            args: Vec::new(),
        }
    }

    /// A generic type with its actual arguments.
    ///
    /// The raw form (no arguments) carries no type information and is
    /// rejected.
    pub fn parameterized(
        raw: impl Into<String>,
        args: Vec<TypeDescriptor>,
    ) -> Result<Self, ConfigurationError> {
        let raw = raw.into();
        if args.is_empty() {
            return Err(ConfigurationError::RawTypeDescriptor { raw });
        }
        Ok(Self { raw, args })
    }

    /// Parses a textual type such as `Collection<Pair<A, B>>` or a
    /// `std::any::type_name` string.
    pub fn parse(text: &str) -> Result<Self, ConfigurationError> {
        let mut parser = Parser::new(text);
        let descriptor = parser.parse_type()?;
        parser.skip_ws();
        if !parser.is_done() {
            return Err(parser.error("unexpected trailing input"));
        }
        Ok(descriptor)
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn args(&self) -> &[TypeDescriptor] {
        &self.args
    }

    pub fn is_generic(&self) -> bool {
        !self.args.is_empty()
    }

    /// Outermost raw name, every generic parameter list discarded.
    pub fn simple_name(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)?;
        if self.args.is_empty() {
            return Ok(());
        }
        f.write_str("<")?;
        for (index, arg) in self.args.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(">")
    }
}

/// Identifier-only name for type names the parser rejects, so a derived
/// artifact name never contains spaces or punctuation.
fn fallback_name(path: &str) -> &str {
    let outer = path.split('<').next().unwrap_or(path);
    let segment = outer
        .rsplit([':', '.'])
        .find(|segment| !segment.is_empty())
        .unwrap_or(outer);
    let end = segment
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(segment.len());
    if end == 0 { OPAQUE } else { &segment[..end] }
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn is_done(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        let rest = self.rest();
        if rest.starts_with(keyword)
            && rest[keyword.len()..]
                .chars()
                .next()
                .is_some_and(char::is_whitespace)
        {
            self.pos += keyword.len();
            self.skip_ws();
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn error(&self, reason: &str) -> ConfigurationError {
        ConfigurationError::InvalidTypeDescriptor {
            text: self.text.to_string(),
            reason: format!("{reason} at offset {}", self.pos),
        }
    }

    fn expect(&mut self, token: char) -> Result<(), ConfigurationError> {
        self.skip_ws();
        if self.peek() == Some(token) {
            self.bump();
            Ok(())
        } else {
            Err(self.error(&format!("expected '{token}'")))
        }
    }

    fn parse_type(&mut self) -> Result<TypeDescriptor, ConfigurationError> {
        self.skip_higher_ranked();
        if self.eat("&") {
            self.skip_lifetime();
            self.eat_keyword("mut");
            return self.parse_type();
        }
        if self.eat("*const ") || self.eat("*mut ") {
            return self.parse_type();
        }
        if self.eat_keyword("dyn") || self.eat_keyword("impl") {
            self.skip_higher_ranked();
            let descriptor = self.parse_path()?;
            self.skip_bounds();
            return Ok(descriptor);
        }
        match self.peek() {
            Some('(') => self.parse_tuple(),
            Some('[') => self.parse_array(),
            Some(_) => self.parse_path(),
            None => Err(self.error("expected a type")),
        }
    }

    fn parse_tuple(&mut self) -> Result<TypeDescriptor, ConfigurationError> {
        let args = self.parse_list('(', ')')?;
        if args.is_empty() {
            Ok(TypeDescriptor::plain(UNIT))
        } else {
            Ok(TypeDescriptor {
                raw: TUPLE.to_string(),
                args,
            })
        }
    }

    fn parse_array(&mut self) -> Result<TypeDescriptor, ConfigurationError> {
        self.expect('[')?;
        let element = self.parse_type()?;
        self.skip_ws();
        let raw = if self.eat(";") {
            while self.peek().is_some_and(|c| c != ']') {
                self.bump();
            }
            ARRAY
        } else {
            SLICE
        };
        self.expect(']')?;
        Ok(TypeDescriptor {
            raw: raw.to_string(),
            args: vec![element],
        })
    }

    fn parse_path(&mut self) -> Result<TypeDescriptor, ConfigurationError> {
        let mut raw = self.parse_ident()?;
        let mut args = Vec::new();
        loop {
            self.skip_ws();
            // `fn(A) -> R` and `Fn(A) -> R` keep inputs then output as arguments.
            let call_sugar = raw == FN_POINTER || FN_TRAITS.contains(&raw.as_str());
            if call_sugar && self.peek() == Some('(') {
                args = self.parse_list('(', ')')?;
                self.skip_ws();
                if self.eat("->") {
                    args.push(self.parse_type()?);
                }
                break;
            }
            if self.peek() == Some('<') {
                args = self.parse_list('<', '>')?;
                self.skip_ws();
            }
            if self.eat("::") || self.eat(".") {
                // Associated paths such as `Foo<T>::Bar` name `Bar`.
                raw = self.parse_ident()?;
                args.clear();
                continue;
            }
            break;
        }
        Ok(TypeDescriptor { raw, args })
    }

    fn parse_ident(&mut self) -> Result<String, ConfigurationError> {
        self.skip_ws();
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || matches!(c, '_' | '{' | '}' | '#'))
        {
            self.bump();
        }
        if self.pos == start {
            return Err(self.error("expected an identifier"));
        }
        Ok(self.text[start..self.pos].to_string())
    }

    fn parse_list(
        &mut self,
        open: char,
        close: char,
    ) -> Result<Vec<TypeDescriptor>, ConfigurationError> {
        self.expect(open)?;
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(close) {
                self.bump();
                return Ok(items);
            }
            if self.peek() == Some('\'') {
                self.skip_lifetime();
            } else {
                items.push(self.parse_type()?);
            }
            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(c) if c == close => {}
                Some(_) => return Err(self.error(&format!("expected ',' or '{close}'"))),
                None => return Err(self.error(&format!("unclosed '{open}'"))),
            }
        }
    }

    fn skip_lifetime(&mut self) {
        self.skip_ws();
        if self.peek() == Some('\'') {
            self.bump();
            while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
                self.bump();
            }
            self.skip_ws();
        }
    }

    /// `for<'a>` binders carry no nominal information.
    fn skip_higher_ranked(&mut self) {
        self.skip_ws();
        if self.eat("for<") {
            while self.peek().is_some_and(|c| c != '>') {
                self.bump();
            }
            self.bump();
            self.skip_ws();
        }
    }

    fn skip_bounds(&mut self) {
        loop {
            self.skip_ws();
            if !self.eat("+") {
                return;
            }
            self.skip_ws();
            if self.peek() == Some('\'') {
                self.skip_lifetime();
            } else if self.parse_path().is_err() {
                return;
            }
        }
    }
}

/// A typed token carrying the [`TypeDescriptor`] of `T`.
///
/// Used where the caller wants to name an artifact after an explicit type
/// tree rather than the one inferred from the call site.
pub struct TypeRef<T> {
    descriptor: TypeDescriptor,
    _marker: PhantomData<fn() -> T>,
}

impl<T> TypeRef<T> {
    pub fn new() -> Self {
        Self {
            descriptor: TypeDescriptor::of::<T>(),
            _marker: PhantomData,
        }
    }

    pub fn with_descriptor(descriptor: TypeDescriptor) -> Self {
        Self {
            descriptor,
            _marker: PhantomData,
        }
    }

    /// Builds a token over an explicit generic shape; fails on the raw form.
    pub fn parameterized(
        raw: impl Into<String>,
        args: Vec<TypeDescriptor>,
    ) -> Result<Self, ConfigurationError> {
        TypeDescriptor::parameterized(raw, args).map(Self::with_descriptor)
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    pub fn simple_name(&self) -> &str {
        self.descriptor.simple_name()
    }
}

impl<T> Default for TypeRef<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for TypeRef<T> {
    fn clone(&self) -> Self {
        Self::with_descriptor(self.descriptor.clone())
    }
}

impl<T> fmt::Debug for TypeRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeRef").field(&self.descriptor).finish()
    }
}
