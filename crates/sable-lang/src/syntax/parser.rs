use std::rc::Rc;

use crate::syntax::ast::*;
use crate::error::{Error, ErrorCode};
use crate::syntax::token::{Token, TokenKind};

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn parse(mut self) -> Result<Program, Vec<Error>> {
        let mut errors = Vec::new();
        let mut stmts = Vec::new();

        while !self.is_at_end() {
            let pos_before = self.pos;

            match self.parse_stmt() {
                Ok(s) => stmts.push(s),
                Err(e) => { errors.push(e); self.recover(); }
            }

            // guarantee progress; if nothing was consumed, force-advance
            // to prevent an infinite loop on unrecognised tokens
            if self.pos == pos_before {
                self.advance();
            }
        }

        if errors.is_empty() {
            Ok(Program { stmts })
        } else {
            Err(errors)
        }
    }

    // ─── Function declaration ────────────────────────────────────────────────

    /// `func name(p: T = default, …) -> T { … }`
    fn parse_fn_decl(&mut self) -> Result<Stmt, Error> {
        let span = self.span();
        self.expect(TokenKind::Func)?;
        let name = self.expect_ident()?;
        self.expect(TokenKind::LParen)?;
        let params = self.parse_param_list()?;
        self.expect(TokenKind::RParen)?;
        let return_ty = if self.matches(TokenKind::Arrow) { Some(self.parse_type()?) } else { None };
        let body = self.parse_block()?;
        Ok(Stmt::FnDecl(Rc::new(FnDecl { name, params, return_ty, body: Rc::new(body), span })))
    }

    fn parse_param_list(&mut self) -> Result<Vec<Param>, Error> {
        let mut params = Vec::new();
        while !self.check(TokenKind::RParen) && !self.is_at_end() {
            let span = self.span();
            let name = self.expect_ident()?;
            self.expect(TokenKind::Colon)?;
            let ty = self.parse_type()?;
            let default = if self.matches(TokenKind::Eq) { Some(self.parse_expr()?) } else { None };
            params.push(Param { name, ty, default, span });
            if !self.matches(TokenKind::Comma) { break; }
        }
        Ok(params)
    }

    // ─── Statements ──────────────────────────────────────────────────────────

    fn parse_block(&mut self) -> Result<Vec<Stmt>, Error> {
        self.expect(TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            stmts.push(self.parse_stmt()?);
        }
        self.expect(TokenKind::RBrace)?;
        Ok(stmts)
    }

    fn parse_stmt(&mut self) -> Result<Stmt, Error> {
        match self.peek_kind() {
            TokenKind::Let    => self.parse_var_decl(),
            TokenKind::Func   => self.parse_fn_decl(),
            TokenKind::If     => self.parse_if(),
            TokenKind::While  => self.parse_while(),
            TokenKind::Match  => self.parse_match(),
            TokenKind::Return => self.parse_return(),
            TokenKind::LBrace => {
                let span = self.span();
                let body = self.parse_block()?;
                Ok(Stmt::Block(body, span))
            }

            // `ident op= …` / `ident[…] op= …` → assignment; anything else → expr stmt
            TokenKind::Ident(_) if self.is_assign() => self.parse_assign(),
            TokenKind::Ident(_) if self.is_index_assign() => self.parse_index_assign(),

            _ => {
                let expr = self.parse_expr()?;
                self.expect(TokenKind::Semicolon)?;
                Ok(Stmt::Expr(expr))
            }
        }
    }

    fn parse_var_decl(&mut self) -> Result<Stmt, Error> {
        let span = self.span();
        self.expect(TokenKind::Let)?;
        let name = self.expect_ident()?;
        let ty = if self.matches(TokenKind::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        let initializer = if self.matches(TokenKind::Eq) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::VarDecl(VarDecl { name, ty, initializer, span }))
    }

    fn parse_assign(&mut self) -> Result<Stmt, Error> {
        let span = self.span();
        let target = self.expect_ident()?;
        let op = self.parse_assign_op()?;
        let value = self.parse_expr()?;
        self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::Assign(Assign { target, op, value, span }))
    }

    fn parse_index_assign(&mut self) -> Result<Stmt, Error> {
        let span = self.span();
        let target = self.expect_ident()?;
        self.expect(TokenKind::LBracket)?;
        let index = self.parse_expr()?;
        self.expect(TokenKind::RBracket)?;
        let op = self.parse_assign_op()?;
        let value = self.parse_expr()?;
        self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::IndexAssign(IndexAssign { target, index, op, value, span }))
    }

    fn parse_assign_op(&mut self) -> Result<AssignOp, Error> {
        let op = match self.peek_kind() {
            TokenKind::Eq      => AssignOp::Set,
            TokenKind::PlusEq  => AssignOp::Add,
            TokenKind::MinusEq => AssignOp::Sub,
            TokenKind::StarEq  => AssignOp::Mul,
            TokenKind::SlashEq => AssignOp::Div,
            _ => return Err(self.unexpected("assignment operator")),
        };
        self.advance();
        Ok(op)
    }

    fn parse_if(&mut self) -> Result<Stmt, Error> {
        let span = self.span();
        self.expect(TokenKind::If)?;
        let condition = self.parse_expr()?;
        let then_block = self.parse_block()?;
        let else_block = if self.matches(TokenKind::Else) {
            if self.check(TokenKind::If) {
                Some(vec![self.parse_if()?])
            } else {
                Some(self.parse_block()?)
            }
        } else {
            None
        };
        Ok(Stmt::If(IfStmt { condition, then_block, else_block, span }))
    }

    fn parse_while(&mut self) -> Result<Stmt, Error> {
        let span = self.span();
        self.expect(TokenKind::While)?;
        let condition = self.parse_expr()?;
        let body = self.parse_block()?;
        Ok(Stmt::While(WhileStmt { condition, body, span }))
    }

    fn parse_match(&mut self) -> Result<Stmt, Error> {
        let span = self.span();
        self.expect(TokenKind::Match)?;
        let scrutinee = self.parse_expr()?;
        self.expect(TokenKind::LBrace)?;
        let mut cases = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            let case_span = self.span();
            self.expect(TokenKind::Case)?;
            let pattern = self.parse_pattern()?;
            self.expect(TokenKind::FatArrow)?;
            let body = Box::new(self.parse_stmt()?);
            cases.push(MatchCase { pattern, body, span: case_span });
        }
        self.expect(TokenKind::RBrace)?;
        Ok(Stmt::Match(MatchStmt { scrutinee, cases, span }))
    }

    fn parse_return(&mut self) -> Result<Stmt, Error> {
        let span = self.span();
        self.expect(TokenKind::Return)?;
        let value = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::Return(value, span))
    }

    // ─── Patterns ────────────────────────────────────────────────────────────

    fn parse_pattern(&mut self) -> Result<Pattern, Error> {
        let tok = self.advance();
        match tok.kind {
            TokenKind::Underscore   => Ok(Pattern::Wildcard),
            TokenKind::Ident(name)  => Ok(Pattern::Bind(name)),
            TokenKind::Int(v)       => Ok(Pattern::Literal(Literal::Int(v))),
            TokenKind::Float(v)     => Ok(Pattern::Literal(Literal::Float(v))),
            TokenKind::Bool(v)      => Ok(Pattern::Literal(Literal::Bool(v))),
            TokenKind::StringLit(s) => Ok(Pattern::Literal(Literal::Str(s))),

            // negative numeric literal
            TokenKind::Minus => {
                let num = self.advance();
                match num.kind {
                    TokenKind::Int(v)   => Ok(Pattern::Literal(Literal::Int(-v))),
                    TokenKind::Float(v) => Ok(Pattern::Literal(Literal::Float(-v))),
                    _ => Err(self.error_at(&num, "expected number after '-' in pattern")),
                }
            }

            // [p, p, …]
            TokenKind::LBracket => {
                let mut items = Vec::new();
                while !self.check(TokenKind::RBracket) && !self.is_at_end() {
                    items.push(self.parse_pattern()?);
                    if !self.matches(TokenKind::Comma) { break; }
                }
                self.expect(TokenKind::RBracket)?;
                Ok(Pattern::Array(items))
            }

            _ => Err(self.error_at(&tok, "expected pattern")),
        }
    }

    // ─── Expressions (precedence climbing) ───────────────────────────────────

    fn parse_expr(&mut self) -> Result<Expr, Error> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expr, Error> {
        let mut left = self.parse_and()?;
        while self.check(TokenKind::Or) {
            let span = left.span().clone();
            self.advance();
            let right = self.parse_and()?;
            left = Expr::BinOp { left: Box::new(left), op: BinOp::Or, right: Box::new(right), span };
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, Error> {
        let mut left = self.parse_equality()?;
        while self.check(TokenKind::And) {
            let span = left.span().clone();
            self.advance();
            let right = self.parse_equality()?;
            left = Expr::BinOp { left: Box::new(left), op: BinOp::And, right: Box::new(right), span };
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expr, Error> {
        let mut left = self.parse_comparison()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::EqEq   => BinOp::Eq,
                TokenKind::BangEq => BinOp::NotEq,
                _ => break,
            };
            let span = left.span().clone();
            self.advance();
            let right = self.parse_comparison()?;
            left = Expr::BinOp { left: Box::new(left), op, right: Box::new(right), span };
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Expr, Error> {
        let mut left = self.parse_addition()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Lt   => BinOp::Lt,
                TokenKind::LtEq => BinOp::LtEq,
                TokenKind::Gt   => BinOp::Gt,
                TokenKind::GtEq => BinOp::GtEq,
                _ => break,
            };
            let span = left.span().clone();
            self.advance();
            let right = self.parse_addition()?;
            left = Expr::BinOp { left: Box::new(left), op, right: Box::new(right), span };
        }
        Ok(left)
    }

    fn parse_addition(&mut self) -> Result<Expr, Error> {
        let mut left = self.parse_multiplication()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus  => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            let span = left.span().clone();
            self.advance();
            let right = self.parse_multiplication()?;
            left = Expr::BinOp { left: Box::new(left), op, right: Box::new(right), span };
        }
        Ok(left)
    }

    fn parse_multiplication(&mut self) -> Result<Expr, Error> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star    => BinOp::Mul,
                TokenKind::Slash   => BinOp::Div,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            let span = left.span().clone();
            self.advance();
            let right = self.parse_unary()?;
            left = Expr::BinOp { left: Box::new(left), op, right: Box::new(right), span };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, Error> {
        let span = self.span();
        if self.matches(TokenKind::Minus) {
            let operand = self.parse_unary()?;
            return Ok(Expr::UnOp { op: UnOp::Neg, operand: Box::new(operand), span });
        }
        if self.matches(TokenKind::Not) {
            let operand = self.parse_unary()?;
            return Ok(Expr::UnOp { op: UnOp::Not, operand: Box::new(operand), span });
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Expr, Error> {
        let mut expr = self.parse_primary()?;

        loop {
            match self.peek_kind() {
                // collection operation: expr.op(args)
                TokenKind::Dot => {
                    let span = expr.span().clone();
                    self.advance();
                    let name_tok = self.peek().clone();
                    let name = self.expect_ident()?;
                    let op = OpTag::from_name(&name).ok_or_else(|| {
                        Error::new(
                            ErrorCode::P003,
                            name_tok.line,
                            name_tok.column,
                            format!("unknown collection operation '{name}'"),
                        )
                    })?;
                    self.expect(TokenKind::LParen)?;
                    let (args, named_args) = self.parse_mixed_arg_list()?;
                    self.expect(TokenKind::RParen)?;
                    expr = Expr::CollectionOp { subject: Box::new(expr), op, args, named_args, span };
                }

                // index: expr[i]
                TokenKind::LBracket => {
                    let span = expr.span().clone();
                    self.advance();
                    let index = self.parse_expr()?;
                    self.expect(TokenKind::RBracket)?;
                    expr = Expr::Index { expr: Box::new(expr), index: Box::new(index), span };
                }

                _ => break,
            }
        }

        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, Error> {
        let tok = self.peek().clone();
        let span = Span::new(tok.line, tok.column);

        match tok.kind {
            TokenKind::Int(v)   => { self.advance(); Ok(Expr::Int(v, span)) }
            TokenKind::Float(v) => { self.advance(); Ok(Expr::Float(v, span)) }
            TokenKind::Bool(v)  => { self.advance(); Ok(Expr::Bool(v, span)) }
            TokenKind::StringLit(s) => { self.advance(); Ok(Expr::StringLit(s, span)) }

            // grouped expression
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }

            // array / list literal
            TokenKind::LBracket => {
                self.advance();
                let items = self.parse_list_items(TokenKind::RBracket)?;
                self.expect(TokenKind::RBracket)?;
                Ok(Expr::ArrayLit(items, span))
            }

            // cast: Int(x), Float(x), Bool(x), String(x)
            TokenKind::TInt | TokenKind::TFloat | TokenKind::TBool | TokenKind::TString
                if self.peek_next_is(TokenKind::LParen) =>
            {
                let ty = self.parse_type()?;
                self.expect(TokenKind::LParen)?;
                let expr = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(Expr::Cast { expr: Box::new(expr), ty, span })
            }

            // lambda: x => expr
            TokenKind::Ident(_) if self.peek_next_is(TokenKind::FatArrow) => self.parse_lambda(),

            // identifier: either a call or a plain ident
            TokenKind::Ident(_) => self.parse_call_or_ident(),

            _ => Err(self.unexpected("expression")),
        }
    }

    fn parse_call_or_ident(&mut self) -> Result<Expr, Error> {
        let tok = self.advance();
        let span = Span::new(tok.line, tok.column);
        let name = match tok.kind {
            TokenKind::Ident(s) => s,
            _ => return Err(self.error_at(&tok, "expected identifier")),
        };

        if self.check(TokenKind::LParen) {
            self.advance();
            let args = self.parse_list_items(TokenKind::RParen)?;
            self.expect(TokenKind::RParen)?;
            Ok(Expr::Call { callee: name, args, span })
        } else {
            Ok(Expr::Ident(name, span))
        }
    }

    fn parse_lambda(&mut self) -> Result<Expr, Error> {
        let span = self.span();
        let param = self.expect_ident()?;
        self.expect(TokenKind::FatArrow)?;
        let body = self.parse_expr()?;
        Ok(Expr::Lambda { param, body: Rc::new(body), span })
    }

    // ─── Argument lists ──────────────────────────────────────────────────────

    /// Comma-separated expressions up to (not including) `close`.
    fn parse_list_items(&mut self, close: TokenKind) -> Result<Vec<Expr>, Error> {
        let mut items = Vec::new();
        while !self.check(close.clone()) && !self.is_at_end() {
            items.push(self.parse_expr()?);
            if !self.matches(TokenKind::Comma) { break; }
        }
        Ok(items)
    }

    /// Parse positional + named args: `xs.map(x => x * 2, mutate: true)`.
    /// Named args must come after positional args; `name = value` is
    /// accepted as a synonym for `name: value`.
    fn parse_mixed_arg_list(&mut self) -> Result<(Vec<Expr>, Vec<(String, Expr)>), Error> {
        let mut args = Vec::new();
        let mut named = Vec::new();

        while !self.check(TokenKind::RParen) && !self.is_at_end() {
            // named arg: ident `:` expr
            if let TokenKind::Ident(_) = self.peek_kind() {
                if self.peek_next_is(TokenKind::Colon) || self.peek_next_is(TokenKind::Eq) {
                    let name = self.expect_ident()?;
                    self.advance(); // `:` or `=`
                    let val = self.parse_expr()?;
                    named.push((name, val));
                    if !self.matches(TokenKind::Comma) { break; }
                    continue;
                }
            }
            if !named.is_empty() {
                return Err(self.unexpected("named argument"));
            }
            args.push(self.parse_expr()?);
            if !self.matches(TokenKind::Comma) { break; }
        }
        Ok((args, named))
    }

    // ─── Types ───────────────────────────────────────────────────────────────

    fn parse_type(&mut self) -> Result<Type, Error> {
        let tok = self.advance();
        match tok.kind {
            TokenKind::TInt    => Ok(Type::Int),
            TokenKind::TFloat  => Ok(Type::Float),
            TokenKind::TBool   => Ok(Type::Bool),
            TokenKind::TString => Ok(Type::String),
            TokenKind::Func    => Ok(Type::Func),

            // array<T>
            TokenKind::TArray => {
                self.expect(TokenKind::Lt)?;
                let inner = self.parse_type()?;
                self.expect(TokenKind::Gt)?;
                Ok(Type::Array(Box::new(inner)))
            }

            // list<T>
            TokenKind::TList => {
                self.expect(TokenKind::Lt)?;
                let inner = self.parse_type()?;
                self.expect(TokenKind::Gt)?;
                Ok(Type::List(Box::new(inner)))
            }

            _ => Err(self.error_at(&tok, "expected type")),
        }
    }

    // ─── Token primitives ────────────────────────────────────────────────────

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn peek_kind(&self) -> TokenKind {
        self.tokens[self.pos].kind.clone()
    }

    fn peek_next_is(&self, kind: TokenKind) -> bool {
        if self.pos + 1 < self.tokens.len() {
            self.tokens[self.pos + 1].kind == kind
        } else {
            false
        }
    }

    /// `ident op=` where `op=` is `=`, `+=`, `-=`, `*=`, `/=`.
    fn is_assign(&self) -> bool {
        matches!(self.tokens[self.pos].kind, TokenKind::Ident(_))
            && self.tokens.get(self.pos + 1).is_some_and(|t| t.kind.is_assign_op())
    }

    /// `ident [ … ] op=`: scans to the matching `]` before deciding.
    fn is_index_assign(&self) -> bool {
        let mut i = self.pos;
        if !matches!(self.tokens[i].kind, TokenKind::Ident(_)) { return false; }
        i += 1;
        if self.tokens.get(i).map(|t| &t.kind) != Some(&TokenKind::LBracket) { return false; }

        let mut depth = 0usize;
        while let Some(tok) = self.tokens.get(i) {
            match tok.kind {
                TokenKind::LBracket => depth += 1,
                TokenKind::RBracket => {
                    depth -= 1;
                    if depth == 0 { break; }
                }
                TokenKind::Semicolon | TokenKind::Eof => return false,
                _ => {}
            }
            i += 1;
        }
        self.tokens.get(i + 1).is_some_and(|t| t.kind.is_assign_op())
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() { self.pos += 1; }
        tok
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) { self.advance(); true } else { false }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, Error> {
        if self.check(kind.clone()) {
            Ok(self.advance())
        } else {
            let tok = self.peek();
            Err(Error::new(
                ErrorCode::P002,
                tok.line,
                tok.column,
                format!("expected {:?}, found {:?}", kind, tok.kind),
            ))
        }
    }

    fn expect_ident(&mut self) -> Result<String, Error> {
        let tok = self.advance();
        match tok.kind {
            TokenKind::Ident(s) => Ok(s),
            _ => Err(self.error_at(&tok, "expected identifier")),
        }
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    fn span(&self) -> Span {
        let tok = self.peek();
        Span::new(tok.line, tok.column)
    }

    fn unexpected(&self, expected: &str) -> Error {
        let tok = self.peek();
        Error::new(
            ErrorCode::P001,
            tok.line,
            tok.column,
            format!("expected {}, found {:?}", expected, tok.kind),
        )
    }

    fn error_at(&self, tok: &Token, msg: &str) -> Error {
        Error::new(ErrorCode::P001, tok.line, tok.column, msg)
    }

    /// Skip tokens until we find something that looks like a new statement.
    /// Used after a parse error to attempt recovery.
    fn recover(&mut self) {
        loop {
            match self.peek_kind() {
                TokenKind::Semicolon => { self.advance(); break; }
                TokenKind::Eof
                | TokenKind::Let
                | TokenKind::Func
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Match
                | TokenKind::Return
                | TokenKind::RBrace => break,
                _ => { self.advance(); }
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
