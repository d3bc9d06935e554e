use crate::ast::*;
use crate::error::{ParseError, ParseResult};
use crate::tokenizer::{tokenize, Token};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Source dialect. Groovy statements and fields may end at a line break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Java,
    Groovy,
}

/// Recursive-descent parser for class declarations.
///
/// Declarations are parsed structurally; expressions and most statements are
/// kept as source text.
pub struct Parser<'src> {
    source: &'src str,
    tokens: Vec<(Token<'src>, Range<usize>)>,
    docs: Vec<(&'src str, Range<usize>)>,
    pos: usize,
    dialect: Dialect,
    classes: Vec<ClassDecl>,
    /// Doc comments ending before this offset belong to an earlier member
    doc_floor: usize,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, dialect: Dialect) -> ParseResult<Self> {
        let mut tokens = Vec::new();
        let mut docs = Vec::new();
        for (token, range) in tokenize(source)? {
            match token {
                Token::DocComment(text) => docs.push((text, range)),
                token => tokens.push((token, range)),
            }
        }

        Ok(Self {
            source,
            tokens,
            docs,
            pos: 0,
            dialect,
            classes: Vec::new(),
            doc_floor: 0,
        })
    }

    /// Parse a complete source file
    pub fn parse_compilation_unit(&mut self) -> ParseResult<CompilationUnit> {
        let mut unit = CompilationUnit::new();

        while !self.is_at_end() {
            if self.match_token(Token::Semicolon) {
                continue;
            }

            let start = self.peek_span().start;
            let doc = self.doc_before(start);
            let modifiers = self.parse_modifiers()?;

            match self.peek() {
                Some((Token::Package, _)) => {
                    self.advance();
                    unit.package = Some(self.parse_qualified_name()?);
                    self.end_declaration()?;
                    self.doc_floor = self.prev_end();
                    unit.header_end = self.doc_floor;
                }
                Some((Token::Import, _)) => {
                    unit.imports.push(self.parse_import(start)?);
                    self.doc_floor = self.prev_end();
                    unit.header_end = self.doc_floor;
                }
                _ if self.at_type_declaration() => {
                    let id = self.parse_type_declaration(modifiers, start, doc)?;
                    unit.top_level.push(id);
                }
                _ => {
                    return Err(ParseError::unexpected_token(
                        self.peek_span().start,
                        "type declaration",
                        Self::format_token(self.peek()),
                    ));
                }
            }
        }

        unit.classes = std::mem::take(&mut self.classes);
        Ok(unit)
    }

    fn parse_import(&mut self, start: usize) -> ParseResult<Import> {
        self.expect(Token::Import)?;
        let is_static = self.match_ident("static");

        let mut path = self.expect_ident()?;
        let mut on_demand = false;
        while self.match_token(Token::Dot) {
            if matches!(self.peek(), Some((Token::Operator("*"), _))) {
                self.advance();
                on_demand = true;
                break;
            }
            path.push('.');
            path.push_str(&self.expect_ident()?);
        }
        self.end_declaration()?;

        Ok(Import {
            path,
            is_static,
            on_demand,
            span: self.span_from(start),
        })
    }

    fn at_type_declaration(&self) -> bool {
        match self.peek() {
            Some((Token::Class, _)) | Some((Token::Interface, _)) | Some((Token::Enum, _)) => true,
            Some((Token::At, _)) => matches!(self.peek_ahead(1), Some((Token::Interface, _))),
            Some((Token::Record, _)) => matches!(self.peek_ahead(1), Some((Token::Ident(_), _))),
            _ => false,
        }
    }

    /// Parse a class-like declaration after its modifiers and push it into the arena
    fn parse_type_declaration(
        &mut self,
        modifiers: Modifiers,
        start: usize,
        doc: Option<String>,
    ) -> ParseResult<ClassId> {
        let kind = match self.advance().map(|(t, _)| t.clone()) {
            Some(Token::Class) => ClassKind::Class,
            Some(Token::Interface) => ClassKind::Interface,
            Some(Token::Enum) => ClassKind::Enum,
            Some(Token::Record) => ClassKind::Record,
            Some(Token::At) => {
                self.expect(Token::Interface)?;
                ClassKind::Annotation
            }
            _ => {
                return Err(ParseError::invalid_syntax(start, "Expected class declaration"));
            }
        };

        let name = self.expect_ident()?;

        let type_params = if self.check(Token::LAngle) {
            self.parse_type_params()?
        } else {
            Vec::new()
        };

        let record_components = if kind == ClassKind::Record {
            self.parse_params()?
        } else {
            Vec::new()
        };

        let mut extends = None;
        let mut implements = Vec::new();
        if self.match_token(Token::Extends) {
            let first = self.parse_type()?;
            if kind == ClassKind::Interface {
                implements.push(first);
                while self.match_token(Token::Comma) {
                    implements.push(self.parse_type()?);
                }
            } else {
                extends = Some(first);
            }
        }
        if self.match_token(Token::Implements) {
            implements.push(self.parse_type()?);
            while self.match_token(Token::Comma) {
                implements.push(self.parse_type()?);
            }
        }
        if self.match_ident("permits") {
            self.parse_type()?;
            while self.match_token(Token::Comma) {
                self.parse_type()?;
            }
        }

        let body_start = self.peek_span().start;
        self.expect(Token::LBrace)?;
        self.doc_floor = body_start;

        let mut members = Vec::new();
        if kind == ClassKind::Enum {
            members.extend(self.parse_enum_constants()?);
        }
        while !self.check(Token::RBrace) {
            if self.is_at_end() {
                return Err(ParseError::unexpected_eof(self.peek_span().start));
            }
            members.extend(self.parse_member(&name)?);
        }
        self.expect(Token::RBrace)?;
        let body_span = self.span_from(body_start);

        self.doc_floor = self.prev_end();
        let decl = ClassDecl {
            kind,
            name,
            modifiers,
            type_params,
            extends,
            implements,
            record_components,
            members,
            doc,
            body_span,
            span: self.span_from(start),
        };
        self.classes.push(decl);
        Ok(ClassId(self.classes.len() - 1))
    }

    fn parse_enum_constants(&mut self) -> ParseResult<Vec<Member>> {
        let mut constants = Vec::new();

        loop {
            if self.match_token(Token::Semicolon) || self.check(Token::RBrace) {
                break;
            }

            let start = self.peek_span().start;
            self.parse_modifiers()?;
            let name = self.expect_ident()?;

            let args = if self.check(Token::LParen) {
                let range = self.skip_balanced(Token::LParen, Token::RParen)?;
                Some(self.slice(range.start + 1, range.end - 1).trim().to_string())
            } else {
                None
            };
            if self.check(Token::LBrace) {
                self.skip_balanced(Token::LBrace, Token::RBrace)?;
            }

            constants.push(Member::EnumConstant(EnumConstant {
                name,
                args,
                span: self.span_from(start),
            }));

            if !self.match_token(Token::Comma) {
                if !self.check(Token::RBrace) {
                    self.end_declaration()?;
                }
                break;
            }
        }

        self.doc_floor = self.prev_end();
        Ok(constants)
    }

    /// Parse one class body member. Field declarations may yield several members.
    fn parse_member(&mut self, class_name: &str) -> ParseResult<Vec<Member>> {
        let start = self.peek_span().start;

        if self.match_token(Token::Semicolon) {
            return Ok(Vec::new());
        }

        let is_static_block = matches!(self.peek(), Some((Token::Ident("static"), _)))
            && matches!(self.peek_ahead(1), Some((Token::LBrace, _)));
        if is_static_block {
            self.advance();
        }
        if self.check(Token::LBrace) {
            self.skip_balanced(Token::LBrace, Token::RBrace)?;
            self.doc_floor = self.prev_end();
            return Ok(vec![Member::Initializer {
                is_static: is_static_block,
                span: self.span_from(start),
            }]);
        }

        let doc = self.doc_before(start);
        let modifiers = self.parse_modifiers()?;

        if self.at_type_declaration() {
            let id = self.parse_type_declaration(modifiers, start, doc)?;
            return Ok(vec![Member::Class {
                id,
                span: self.span_from(start),
            }]);
        }

        let type_params = if self.check(Token::LAngle) {
            self.parse_type_params()?
        } else {
            Vec::new()
        };

        let names_class = matches!(self.peek(), Some((Token::Ident(name), _)) if *name == class_name);
        let is_constructor = names_class && matches!(self.peek_ahead(1), Some((Token::LParen, _)));
        let is_compact_constructor = names_class && matches!(self.peek_ahead(1), Some((Token::LBrace, _)));

        let members = if is_compact_constructor {
            let name = self.expect_ident()?;
            let body = self.parse_block()?;
            vec![Member::Constructor(MethodDecl {
                modifiers,
                type_params,
                return_type: None,
                name,
                params: Vec::new(),
                throws: Vec::new(),
                body: Some(body),
                doc,
                span: self.span_from(start),
            })]
        } else if is_constructor {
            let name = self.expect_ident()?;
            let method = self.parse_method_rest(modifiers, type_params, None, name, start, doc)?;
            vec![Member::Constructor(method)]
        } else {
            let ty = self.parse_type()?;
            let name = self.expect_ident()?;
            if self.check(Token::LParen) {
                let method =
                    self.parse_method_rest(modifiers, type_params, Some(ty), name, start, doc)?;
                vec![Member::Method(method)]
            } else {
                self.parse_field_declarators(modifiers, ty, name, start, doc)?
            }
        };

        self.doc_floor = self.prev_end();
        Ok(members)
    }

    fn parse_method_rest(
        &mut self,
        modifiers: Modifiers,
        type_params: Vec<TypeParam>,
        return_type: Option<TypeRef>,
        name: String,
        start: usize,
        doc: Option<String>,
    ) -> ParseResult<MethodDecl> {
        let params = self.parse_params()?;

        // Legacy `int values()[]` form
        let mut return_type = return_type;
        while self.check(Token::LBracket) && matches!(self.peek_ahead(1), Some((Token::RBracket, _))) {
            self.advance();
            self.advance();
            if let Some(ty) = return_type.as_mut() {
                ty.array_dims += 1;
            }
        }

        let throws = self.parse_throws()?;

        let body = if self.check(Token::LBrace) {
            Some(self.parse_block()?)
        } else {
            if self.match_ident("default") {
                self.raw_until_terminator()?;
            }
            self.end_declaration()?;
            None
        };

        Ok(MethodDecl {
            modifiers,
            type_params,
            return_type,
            name,
            params,
            throws,
            body,
            doc,
            span: self.span_from(start),
        })
    }

    fn parse_field_declarators(
        &mut self,
        modifiers: Modifiers,
        ty: TypeRef,
        first_name: String,
        start: usize,
        doc: Option<String>,
    ) -> ParseResult<Vec<Member>> {
        let mut pending = Vec::new();
        let mut name = first_name;

        loop {
            let mut declared = ty.clone();
            declared.array_dims += self.parse_dims();

            let initializer = if self.match_token(Token::Equals) {
                Some(self.skip_initializer()?)
            } else {
                None
            };
            pending.push((name, declared, initializer));

            if !self.match_token(Token::Comma) {
                break;
            }
            name = self.expect_ident()?;
        }
        self.end_declaration()?;

        let mut members = Vec::with_capacity(pending.len());
        for (name, ty, initializer) in pending {
            members.push(Member::Field(FieldDecl {
                modifiers: modifiers.clone(),
                ty,
                name,
                initializer,
                doc: doc.clone(),
                span: self.span_from(start),
            }));
        }
        Ok(members)
    }

    /// Parse modifier keywords and annotations in any order
    pub fn parse_modifiers(&mut self) -> ParseResult<Modifiers> {
        let mut modifiers = Modifiers::default();

        loop {
            match self.peek() {
                Some((Token::At, _)) if !matches!(self.peek_ahead(1), Some((Token::Interface, _))) => {
                    modifiers.annotations.push(self.parse_annotation()?);
                }
                Some((Token::Ident(word), _)) if is_modifier_keyword(word) => {
                    let word = word.to_string();
                    self.advance();
                    modifiers.keywords.push(word);
                }
                _ => break,
            }
        }

        Ok(modifiers)
    }

    fn parse_annotation(&mut self) -> ParseResult<Annotation> {
        let start = self.peek_span().start;
        self.expect(Token::At)?;
        let name = self.parse_qualified_name()?;

        let args = if self.check(Token::LParen) {
            let range = self.skip_balanced(Token::LParen, Token::RParen)?;
            Some(self.slice(range.start + 1, range.end - 1).trim().to_string())
        } else {
            None
        };

        Ok(Annotation {
            name,
            args,
            span: self.span_from(start),
        })
    }

    fn parse_type_params(&mut self) -> ParseResult<Vec<TypeParam>> {
        self.expect(Token::LAngle)?;
        let mut params = Vec::new();

        loop {
            self.parse_modifiers()?;
            let name = self.expect_ident()?;
            let mut bounds = Vec::new();
            if self.match_token(Token::Extends) {
                bounds.push(self.parse_type()?);
                while self.match_token(Token::Amp) {
                    bounds.push(self.parse_type()?);
                }
            }
            params.push(TypeParam { name, bounds });

            if !self.match_token(Token::Comma) {
                break;
            }
        }

        self.expect(Token::RAngle)?;
        Ok(params)
    }

    /// Parse a type reference: `java.util.Map<K, List<? extends V>>[]`
    pub fn parse_type(&mut self) -> ParseResult<TypeRef> {
        // Type-use annotations are accepted and dropped
        while self.check(Token::At) {
            self.parse_annotation()?;
        }

        let mut name = self.expect_ident()?;
        let mut args = Vec::new();

        loop {
            if self.check(Token::LAngle) {
                args = self.parse_type_args()?;
            }
            let continues = self.check(Token::Dot)
                && matches!(self.peek_ahead(1), Some((Token::Ident(_), _)));
            if !continues {
                break;
            }
            self.advance();
            name.push('.');
            name.push_str(&self.expect_ident()?);
        }

        let array_dims = self.parse_dims();
        Ok(TypeRef {
            name,
            args,
            array_dims,
        })
    }

    fn parse_type_args(&mut self) -> ParseResult<Vec<TypeArg>> {
        self.expect(Token::LAngle)?;
        let mut args = Vec::new();
        if self.match_token(Token::RAngle) {
            return Ok(args);
        }

        loop {
            if self.match_token(Token::Question) {
                let bound = if self.match_token(Token::Extends) {
                    Some(WildcardBound::Extends(self.parse_type()?))
                } else if self.match_token(Token::Super) {
                    Some(WildcardBound::Super(self.parse_type()?))
                } else {
                    None
                };
                args.push(TypeArg::Wildcard(bound));
            } else {
                args.push(TypeArg::Type(self.parse_type()?));
            }

            if !self.match_token(Token::Comma) {
                break;
            }
        }

        self.expect(Token::RAngle)?;
        Ok(args)
    }

    fn parse_dims(&mut self) -> usize {
        let mut dims = 0;
        while self.check(Token::LBracket) && matches!(self.peek_ahead(1), Some((Token::RBracket, _))) {
            self.advance();
            self.advance();
            dims += 1;
        }
        dims
    }

    fn parse_params(&mut self) -> ParseResult<Vec<Param>> {
        self.expect(Token::LParen)?;
        let mut params = Vec::new();
        if self.match_token(Token::RParen) {
            return Ok(params);
        }

        loop {
            let start = self.peek_span().start;
            let modifiers = self.parse_modifiers()?;
            let mut ty = self.parse_type()?;
            let varargs = self.match_token(Token::Ellipsis);

            // Receiver parameter `Outer this` carries no name
            if self.match_token(Token::This) {
                if !self.match_token(Token::Comma) {
                    break;
                }
                continue;
            }

            let name = self.expect_ident()?;
            ty.array_dims += self.parse_dims();
            params.push(Param {
                modifiers,
                ty,
                name,
                varargs,
                span: self.span_from(start),
            });

            if !self.match_token(Token::Comma) {
                break;
            }
        }

        self.expect(Token::RParen)?;
        Ok(params)
    }

    fn parse_throws(&mut self) -> ParseResult<Vec<TypeRef>> {
        let mut throws = Vec::new();
        if self.match_token(Token::Throws) {
            throws.push(self.parse_type()?);
            while self.match_token(Token::Comma) {
                throws.push(self.parse_type()?);
            }
        }
        Ok(throws)
    }

    /// Parse a `{ ... }` statement block
    pub fn parse_block(&mut self) -> ParseResult<Block> {
        let start = self.peek_span().start;
        self.expect(Token::LBrace)?;

        let mut statements = Vec::new();
        while !self.check(Token::RBrace) {
            if self.is_at_end() {
                return Err(ParseError::unexpected_eof(self.peek_span().start));
            }
            if let Some(statement) = self.parse_statement()? {
                statements.push(statement);
            }
        }
        self.expect(Token::RBrace)?;

        Ok(Block {
            statements,
            span: self.span_from(start),
        })
    }

    fn parse_statement(&mut self) -> ParseResult<Option<Statement>> {
        let start = self.peek_span().start;

        if self.match_token(Token::Semicolon) {
            return Ok(None);
        }

        let statement = match (self.peek_token(0), self.peek_token(1)) {
            (Some(Token::Super), Some(Token::LParen)) => {
                self.advance();
                let args = self.parse_call_args()?;
                self.end_statement()?;
                Statement::SuperCall {
                    args,
                    span: self.span_from(start),
                }
            }
            (Some(Token::This), Some(Token::LParen)) => {
                self.advance();
                let args = self.parse_call_args()?;
                self.end_statement()?;
                Statement::ThisCall {
                    args,
                    span: self.span_from(start),
                }
            }
            (Some(Token::This), Some(Token::Dot)) if self.is_simple_assignment(2) => {
                self.advance();
                self.advance();
                let field = self.expect_ident()?;
                self.expect(Token::Equals)?;
                let value = self.raw_until_terminator()?;
                self.end_statement()?;
                Statement::Assign {
                    qualified: true,
                    field,
                    value,
                    span: self.span_from(start),
                }
            }
            (Some(Token::Ident(_)), Some(Token::Equals)) if self.is_simple_assignment(0) => {
                let field = self.expect_ident()?;
                self.expect(Token::Equals)?;
                let value = self.raw_until_terminator()?;
                self.end_statement()?;
                Statement::Assign {
                    qualified: false,
                    field,
                    value,
                    span: self.span_from(start),
                }
            }
            _ => {
                let text = self.raw_statement()?;
                Statement::Other {
                    text,
                    span: self.span_from(start),
                }
            }
        };

        Ok(Some(statement))
    }

    /// `ident = value` starting at `offset`, where `=` is not part of `==`
    fn is_simple_assignment(&self, offset: usize) -> bool {
        matches!(self.peek_token(offset), Some(Token::Ident(_)))
            && matches!(self.peek_token(offset + 1), Some(Token::Equals))
            && !matches!(self.peek_token(offset + 2), Some(Token::Equals))
    }

    /// Parse `(a, b(c, d), e)` into raw argument strings
    fn parse_call_args(&mut self) -> ParseResult<Vec<String>> {
        let open = self.peek_span().start;
        self.expect(Token::LParen)?;

        let mut args = Vec::new();
        let mut depth = 0usize;
        let mut arg_start = open + 1;

        loop {
            let Some((token, range)) = self.peek().cloned() else {
                return Err(ParseError::unexpected_eof(self.peek_span().start));
            };
            match token {
                Token::LParen | Token::LBracket | Token::LBrace => depth += 1,
                Token::RParen if depth == 0 => {
                    let arg = self.slice(arg_start, range.start).trim();
                    if !arg.is_empty() || !args.is_empty() {
                        args.push(arg.to_string());
                    }
                    self.advance();
                    break;
                }
                Token::RParen | Token::RBracket | Token::RBrace => depth = depth.saturating_sub(1),
                Token::Comma if depth == 0 => {
                    args.push(self.slice(arg_start, range.start).trim().to_string());
                    arg_start = range.end;
                }
                _ => {}
            }
            self.advance();
        }

        Ok(args)
    }

    /// Raw expression text up to the statement terminator, which is not consumed
    fn raw_until_terminator(&mut self) -> ParseResult<String> {
        let start = self.peek_span().start;
        let mut depth = 0usize;
        let mut consumed = false;

        loop {
            let Some((token, _)) = self.peek() else {
                return Err(ParseError::unexpected_eof(self.peek_span().start));
            };
            if depth == 0 {
                match token {
                    Token::Semicolon | Token::RBrace => break,
                    _ if consumed && self.dialect == Dialect::Groovy && self.line_break_before() => {
                        break
                    }
                    _ => {}
                }
            }
            match token {
                Token::LParen | Token::LBracket | Token::LBrace => depth += 1,
                Token::RParen | Token::RBracket | Token::RBrace => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.advance();
            consumed = true;
        }

        Ok(self.slice(start, self.prev_end()).trim().to_string())
    }

    /// Raw text of a statement we do not model, terminator excluded
    fn raw_statement(&mut self) -> ParseResult<String> {
        let start = self.peek_span().start;
        let mut depth = 0usize;
        let mut end = start;
        let mut consumed = false;

        loop {
            let Some((token, range)) = self.peek().cloned() else {
                return Err(ParseError::unexpected_eof(self.peek_span().start));
            };

            if depth == 0 {
                match token {
                    Token::Semicolon => {
                        self.advance();
                        break;
                    }
                    Token::RBrace => break,
                    _ if consumed && self.dialect == Dialect::Groovy && self.line_break_before() => {
                        break
                    }
                    _ => {}
                }
            }

            self.advance();
            consumed = true;
            end = range.end;

            match token {
                Token::LParen | Token::LBracket | Token::LBrace => depth += 1,
                Token::RParen | Token::RBracket => depth = depth.saturating_sub(1),
                Token::RBrace => {
                    depth = depth.saturating_sub(1);
                    let continues = matches!(
                        self.peek_token(0),
                        Some(Token::Ident("else" | "catch" | "finally" | "while"))
                    );
                    if depth == 0 && !continues {
                        break;
                    }
                }
                _ => {}
            }
        }

        Ok(self.slice(start, end).trim().to_string())
    }

    /// Raw field initializer up to `,` or `;` at nesting depth zero
    fn skip_initializer(&mut self) -> ParseResult<String> {
        let start = self.peek_span().start;
        let mut depth = 0usize;
        let mut angle = 0usize;
        let mut consumed = false;
        let mut prev: Option<Token<'src>> = None;

        loop {
            let Some((token, _)) = self.peek().cloned() else {
                return Err(ParseError::unexpected_eof(self.peek_span().start));
            };
            if depth == 0 && angle == 0 {
                match token {
                    Token::Comma | Token::Semicolon | Token::RBrace => break,
                    _ if consumed && self.dialect == Dialect::Groovy && self.line_break_before() => {
                        break
                    }
                    _ => {}
                }
            }
            match &token {
                Token::LParen | Token::LBracket | Token::LBrace => depth += 1,
                Token::RParen | Token::RBracket | Token::RBrace => depth = depth.saturating_sub(1),
                // Generic arguments: `new HashMap<String, Integer>()`
                Token::LAngle if is_type_position(prev.as_ref()) => angle += 1,
                Token::RAngle if angle > 0 => angle -= 1,
                _ => {}
            }
            prev = Some(token);
            self.advance();
            consumed = true;
        }

        Ok(self.slice(start, self.prev_end()).trim().to_string())
    }

    /// Skip a balanced `open ... close` group, returning its byte range
    fn skip_balanced(&mut self, open: Token<'src>, close: Token<'src>) -> ParseResult<Range<usize>> {
        let start = self.peek_span().start;
        self.expect(open.clone())?;
        let mut depth = 1usize;

        while depth > 0 {
            let Some((token, _)) = self.advance() else {
                return Err(ParseError::unexpected_eof(self.peek_span().start));
            };
            if std::mem::discriminant(token) == std::mem::discriminant(&open) {
                depth += 1;
            } else if std::mem::discriminant(token) == std::mem::discriminant(&close) {
                depth -= 1;
            }
        }

        Ok(start..self.prev_end())
    }

    fn parse_qualified_name(&mut self) -> ParseResult<String> {
        let mut name = self.expect_ident()?;
        while self.check(Token::Dot) && matches!(self.peek_ahead(1), Some((Token::Ident(_), _))) {
            self.advance();
            name.push('.');
            name.push_str(&self.expect_ident()?);
        }
        Ok(name)
    }

    fn end_declaration(&mut self) -> ParseResult<()> {
        match self.dialect {
            Dialect::Java => self.expect(Token::Semicolon),
            Dialect::Groovy => {
                self.match_token(Token::Semicolon);
                Ok(())
            }
        }
    }

    fn end_statement(&mut self) -> ParseResult<()> {
        self.end_declaration()
    }

    fn doc_before(&self, start: usize) -> Option<String> {
        self.docs
            .iter()
            .rev()
            .find(|(_, range)| range.end <= start && range.start >= self.doc_floor)
            .map(|(text, _)| text.to_string())
    }

    fn line_break_before(&self) -> bool {
        let next = self.peek_span().start;
        let prev = self.prev_end().min(next);
        self.source[prev..next].contains('\n')
    }

    // Helper methods

    fn peek(&self) -> Option<&(Token<'src>, Range<usize>)> {
        self.tokens.get(self.pos)
    }

    fn peek_ahead(&self, offset: usize) -> Option<&(Token<'src>, Range<usize>)> {
        self.tokens.get(self.pos + offset)
    }

    fn peek_token(&self, offset: usize) -> Option<&Token<'src>> {
        self.peek_ahead(offset).map(|(token, _)| token)
    }

    fn advance(&mut self) -> Option<&(Token<'src>, Range<usize>)> {
        let token = self.tokens.get(self.pos);
        self.pos += 1;
        token
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn check(&self, token: Token<'src>) -> bool {
        if let Some((t, _)) = self.peek() {
            std::mem::discriminant(t) == std::mem::discriminant(&token)
        } else {
            false
        }
    }

    fn match_token(&mut self, token: Token<'src>) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_ident(&mut self, word: &str) -> bool {
        if matches!(self.peek(), Some((Token::Ident(w), _)) if *w == word) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: Token<'src>) -> ParseResult<()> {
        if self.check(token.clone()) {
            self.advance();
            Ok(())
        } else if self.is_at_end() {
            Err(ParseError::unexpected_eof(self.peek_span().start))
        } else {
            Err(ParseError::unexpected_token(
                self.peek_span().start,
                format!("'{}'", token),
                Self::format_token(self.peek()),
            ))
        }
    }

    fn expect_ident(&mut self) -> ParseResult<String> {
        match self.peek() {
            Some((Token::Ident(s), _)) => {
                let val = s.to_string();
                self.advance();
                Ok(val)
            }
            // `record` is only a keyword in declaration position
            Some((Token::Record, _)) => {
                self.advance();
                Ok("record".to_string())
            }
            None => Err(ParseError::unexpected_eof(self.peek_span().start)),
            _ => Err(ParseError::unexpected_token(
                self.peek_span().start,
                "identifier",
                Self::format_token(self.peek()),
            )),
        }
    }

    fn slice(&self, start: usize, end: usize) -> &'src str {
        &self.source[start..end.max(start)]
    }

    /// End of the most recently consumed token
    fn prev_end(&self) -> usize {
        self.tokens
            .get(self.pos.saturating_sub(1))
            .map(|(_, span)| span.end)
            .unwrap_or(0)
    }

    /// Get the span of the next token (the one we're about to consume)
    fn peek_span(&self) -> Range<usize> {
        self.tokens
            .get(self.pos)
            .map(|(_, span)| span.clone())
            .unwrap_or_else(|| {
                let end = self.tokens.last().map(|(_, span)| span.end).unwrap_or(0);
                end..end
            })
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.prev_end().max(start))
    }

    fn format_token(token: Option<&(Token, Range<usize>)>) -> String {
        match token {
            None => "end of file".to_string(),
            Some((Token::Ident(s), _)) => format!("identifier '{}'", s),
            Some((Token::String(s), _)) => format!("string {}", s),
            Some((Token::Number(n), _)) => format!("number {}", n),
            Some((token, _)) => format!("'{}'", token),
        }
    }
}

/// Whether `<` after `prev` opens type arguments rather than comparing
fn is_type_position(prev: Option<&Token>) -> bool {
    match prev {
        Some(Token::Ident(name)) => name.chars().next().map(char::is_uppercase).unwrap_or(false),
        Some(Token::Dot) => true,
        _ => false,
    }
}

pub fn parse(source: &str) -> ParseResult<CompilationUnit> {
    parse_dialect(source, Dialect::Java)
}

pub fn parse_dialect(source: &str, dialect: Dialect) -> ParseResult<CompilationUnit> {
    let mut parser = Parser::new(source, dialect)?;
    parser.parse_compilation_unit()
}

/// Parse a single member (for example a generated constructor) declared in `class_name`
pub fn parse_member(source: &str, class_name: &str, dialect: Dialect) -> ParseResult<Member> {
    let mut parser = Parser::new(source, dialect)?;
    let mut members = parser.parse_member(class_name)?;

    if !parser.is_at_end() {
        return Err(ParseError::unexpected_token(
            parser.peek_span().start,
            "end of member",
            Parser::format_token(parser.peek()),
        ));
    }
    if members.len() != 1 {
        return Err(ParseError::invalid_syntax(0, "Expected exactly one member"));
    }
    Ok(members.remove(0))
}
