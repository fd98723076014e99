use super::val::{Type, Val};
use super::var::Variable;
use super::Interp;
use crate::lang::{Error, ErrorCode, Keyword, Operator, Token};
use std::sync::atomic::Ordering;

type Result<T> = std::result::Result<T, Error>;

/// Result of interpreting one statement or block, threaded explicitly
/// through the statement interpreter. Enclosing loops consume `Break`
/// and `Continue`; `Return` propagates to the active call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Flow {
    Normal,
    Break,
    Continue,
    Return(Val),
}

/// ## Statement interpreter
///
/// Interprets one logical unit at a time directly off the token
/// stream. Loops re-evaluate their condition by rewinding the cursor;
/// untaken branches are skipped structurally, never evaluated.
impl Interp {
    pub(super) fn interp_statement(&mut self) -> Result<Flow> {
        if let Some(flag) = &self.interrupt {
            if flag.swap(false, Ordering::SeqCst) {
                return Err(self.err(ErrorCode::Interrupted));
            }
        }
        match self.lex.next_token()? {
            Token::OpenBlock => {
                self.lex.putback();
                self.interp_block()
            }
            Token::Keyword(Keyword::Int) | Token::Keyword(Keyword::Char) => {
                self.lex.putback();
                self.decl_local()?;
                Ok(Flow::Normal)
            }
            Token::Keyword(Keyword::If) => self.stmt_if(),
            Token::Keyword(Keyword::While) => self.stmt_while(),
            Token::Keyword(Keyword::Do) => self.stmt_do(),
            Token::Keyword(Keyword::For) => self.stmt_for(),
            Token::Keyword(Keyword::Switch) => self.stmt_switch(),
            Token::Keyword(Keyword::Return) => self.stmt_return(),
            Token::Keyword(Keyword::Break) => {
                self.expect_op(Operator::Semicolon, ErrorCode::SemiExpected)?;
                Ok(Flow::Break)
            }
            Token::Keyword(Keyword::Continue) => {
                self.expect_op(Operator::Semicolon, ErrorCode::SemiExpected)?;
                Ok(Flow::Continue)
            }
            Token::Op(Operator::Semicolon) => Ok(Flow::Normal),
            Token::Eof => Err(self.err(ErrorCode::UnbalancedBraces)),
            Token::Keyword(_) => Err(self.err(ErrorCode::Syntax)),
            _ => {
                self.lex.putback();
                self.eval_assign()?;
                self.expect_op(Operator::Semicolon, ErrorCode::SemiExpected)?;
                Ok(Flow::Normal)
            }
        }
    }

    /// A brace-delimited sequence. Locals declared inside are popped
    /// at the closing brace. A non-normal flow skips the remainder of
    /// the block so the cursor ends past the closing brace.
    pub(super) fn interp_block(&mut self) -> Result<Flow> {
        self.expect_block_open()?;
        let base = self.vars.locals_len();
        loop {
            match self.lex.next_token()? {
                Token::CloseBlock => {
                    self.vars.truncate_locals(base);
                    return Ok(Flow::Normal);
                }
                Token::Eof => return Err(self.err(ErrorCode::UnbalancedBraces)),
                _ => {
                    self.lex.putback();
                    match self.interp_statement()? {
                        Flow::Normal => {}
                        flow => {
                            self.skip_block_rest()?;
                            self.vars.truncate_locals(base);
                            return Ok(flow);
                        }
                    }
                }
            }
        }
    }

    /// Local declaration: comma-separated `name [= expr]` list pushed
    /// onto the local stack.
    fn decl_local(&mut self) -> Result<()> {
        let ty = match self.lex.next_token()? {
            Token::Keyword(Keyword::Int) => Type::Int,
            Token::Keyword(Keyword::Char) => Type::Char,
            _ => return Err(self.err(ErrorCode::TypeExpected)),
        };
        loop {
            let name = self.expect_ident()?;
            let mut val = Val { ty, num: 0 };
            let mut t = self.lex.next_token()?;
            if t == Token::Op(Operator::Assign) {
                val = self.eval_assign()?.coerce(ty);
                t = self.lex.next_token()?;
            }
            self.vars
                .push_local(Variable { name, ty, val })
                .map_err(|c| self.err(c))?;
            match t {
                Token::Op(Operator::Comma) => continue,
                Token::Op(Operator::Semicolon) => return Ok(()),
                _ => return Err(self.err(ErrorCode::SemiExpected)),
            }
        }
    }

    fn stmt_if(&mut self) -> Result<Flow> {
        self.expect_op(Operator::LParen, ErrorCode::ParenExpected)?;
        let cond = self.eval_comma()?;
        self.expect_op(Operator::RParen, ErrorCode::UnbalancedParens)?;
        if cond.truthy() {
            let flow = self.interp_statement()?;
            if self.lex.next_token()? == Token::Keyword(Keyword::Else) {
                self.skip_statement()?;
            } else {
                self.lex.putback();
            }
            Ok(flow)
        } else {
            self.skip_statement()?;
            if self.lex.next_token()? == Token::Keyword(Keyword::Else) {
                self.interp_statement()
            } else {
                self.lex.putback();
                Ok(Flow::Normal)
            }
        }
    }

    fn stmt_while(&mut self) -> Result<Flow> {
        let cond_pos = self.lex.pos();
        loop {
            self.lex.set_pos(cond_pos);
            self.expect_op(Operator::LParen, ErrorCode::ParenExpected)?;
            let cond = self.eval_comma()?;
            self.expect_op(Operator::RParen, ErrorCode::UnbalancedParens)?;
            if !cond.truthy() {
                self.skip_statement()?;
                return Ok(Flow::Normal);
            }
            match self.interp_statement()? {
                Flow::Normal | Flow::Continue => {}
                Flow::Break => return Ok(Flow::Normal),
                Flow::Return(v) => return Ok(Flow::Return(v)),
            }
        }
    }

    fn stmt_do(&mut self) -> Result<Flow> {
        let body_pos = self.lex.pos();
        loop {
            match self.interp_statement()? {
                Flow::Return(v) => return Ok(Flow::Return(v)),
                Flow::Break => {
                    // Consume the trailing condition without running it.
                    self.expect_kw(Keyword::While, ErrorCode::WhileExpected)?;
                    self.skip_paren_group()?;
                    self.expect_op(Operator::Semicolon, ErrorCode::SemiExpected)?;
                    return Ok(Flow::Normal);
                }
                Flow::Normal | Flow::Continue => {
                    self.expect_kw(Keyword::While, ErrorCode::WhileExpected)?;
                    self.expect_op(Operator::LParen, ErrorCode::ParenExpected)?;
                    let cond = self.eval_comma()?;
                    self.expect_op(Operator::RParen, ErrorCode::UnbalancedParens)?;
                    self.expect_op(Operator::Semicolon, ErrorCode::SemiExpected)?;
                    if !cond.truthy() {
                        return Ok(Flow::Normal);
                    }
                    self.lex.set_pos(body_pos);
                }
            }
        }
    }

    /// A local declared in the init clause is scoped to the loop and
    /// popped on exit, so a `for` used as a bare loop body does not
    /// grow the local stack on every outer iteration.
    fn stmt_for(&mut self) -> Result<Flow> {
        self.expect_op(Operator::LParen, ErrorCode::ParenExpected)?;
        let base = self.vars.locals_len();
        let flow = self.for_loop()?;
        self.vars.truncate_locals(base);
        Ok(flow)
    }

    fn for_loop(&mut self) -> Result<Flow> {
        match self.lex.next_token()? {
            Token::Keyword(Keyword::Int) | Token::Keyword(Keyword::Char) => {
                self.lex.putback();
                self.decl_local()?;
            }
            Token::Op(Operator::Semicolon) => {}
            _ => {
                self.lex.putback();
                self.eval_comma()?;
                self.expect_op(Operator::Semicolon, ErrorCode::SemiExpected)?;
            }
        }
        let cond_pos = self.lex.pos();
        loop {
            self.lex.set_pos(cond_pos);
            let cond = match self.lex.next_token()? {
                Token::Op(Operator::Semicolon) => Val::int(1),
                _ => {
                    self.lex.putback();
                    let v = self.eval_comma()?;
                    self.expect_op(Operator::Semicolon, ErrorCode::SemiExpected)?;
                    v
                }
            };
            let inc_pos = self.lex.pos();
            self.skip_to_rparen()?;
            if !cond.truthy() {
                self.skip_statement()?;
                return Ok(Flow::Normal);
            }
            match self.interp_statement()? {
                Flow::Break => return Ok(Flow::Normal),
                Flow::Return(v) => return Ok(Flow::Return(v)),
                Flow::Normal | Flow::Continue => {
                    self.lex.set_pos(inc_pos);
                    match self.lex.next_token()? {
                        Token::Op(Operator::RParen) => {}
                        _ => {
                            self.lex.putback();
                            self.eval_comma()?;
                            self.expect_op(Operator::RParen, ErrorCode::UnbalancedParens)?;
                        }
                    }
                }
            }
        }
    }

    /// `switch`: evaluate the selector once, scan forward for a
    /// matching `case` (or `default`) label at the switch's own
    /// nesting depth, then run that arm. Arms do not fall through;
    /// an arm ends at `break`, at the next label, or at the switch's
    /// closing brace.
    fn stmt_switch(&mut self) -> Result<Flow> {
        self.expect_op(Operator::LParen, ErrorCode::ParenExpected)?;
        let selector = self.eval_comma()?;
        self.expect_op(Operator::RParen, ErrorCode::UnbalancedParens)?;
        self.expect_block_open()?;
        let mut depth = 0i32;
        let mut default_pos = None;
        loop {
            match self.lex.next_token()? {
                Token::OpenBlock => depth += 1,
                Token::CloseBlock => {
                    if depth == 0 {
                        return match default_pos {
                            Some(pos) => {
                                self.lex.set_pos(pos);
                                self.run_switch_arm()
                            }
                            None => Ok(Flow::Normal),
                        };
                    }
                    depth -= 1;
                }
                Token::Keyword(Keyword::Case) if depth == 0 => {
                    // Labels are conditional expressions; an
                    // assignment in a label is a syntax error rather
                    // than a mutation during the scan.
                    let label = self.eval_ternary()?;
                    self.expect_op(Operator::Colon, ErrorCode::ColonExpected)?;
                    if label.num == selector.num {
                        return self.run_switch_arm();
                    }
                }
                Token::Keyword(Keyword::Default) if depth == 0 => {
                    self.expect_op(Operator::Colon, ErrorCode::ColonExpected)?;
                    if default_pos.is_none() {
                        default_pos = Some(self.lex.pos());
                    }
                }
                Token::Eof => return Err(self.err(ErrorCode::UnbalancedBraces)),
                _ => {}
            }
        }
    }

    /// Locals declared directly in an arm, outside any braces, are
    /// popped when the arm ends.
    fn run_switch_arm(&mut self) -> Result<Flow> {
        let base = self.vars.locals_len();
        let flow = self.switch_arm()?;
        self.vars.truncate_locals(base);
        Ok(flow)
    }

    fn switch_arm(&mut self) -> Result<Flow> {
        loop {
            match self.lex.next_token()? {
                Token::CloseBlock => return Ok(Flow::Normal),
                Token::Keyword(Keyword::Case) | Token::Keyword(Keyword::Default) => {
                    self.skip_block_rest()?;
                    return Ok(Flow::Normal);
                }
                Token::Eof => return Err(self.err(ErrorCode::UnbalancedBraces)),
                _ => {
                    self.lex.putback();
                    match self.interp_statement()? {
                        Flow::Normal => {}
                        Flow::Break => {
                            self.skip_block_rest()?;
                            return Ok(Flow::Normal);
                        }
                        Flow::Continue => {
                            self.skip_block_rest()?;
                            return Ok(Flow::Continue);
                        }
                        Flow::Return(v) => return Ok(Flow::Return(v)),
                    }
                }
            }
        }
    }

    fn stmt_return(&mut self) -> Result<Flow> {
        match self.lex.next_token()? {
            Token::Op(Operator::Semicolon) => Ok(Flow::Return(Val::VOID)),
            _ => {
                self.lex.putback();
                let val = self.eval_comma()?;
                self.expect_op(Operator::Semicolon, ErrorCode::SemiExpected)?;
                Ok(Flow::Return(val))
            }
        }
    }

    /// Advance past one statement without executing it, recursing into
    /// control-flow headers so `else` chains and nested bodies are
    /// skipped as units.
    pub(super) fn skip_statement(&mut self) -> Result<()> {
        match self.lex.next_token()? {
            Token::OpenBlock => self.skip_block_rest(),
            Token::Keyword(Keyword::If) => {
                self.skip_paren_group()?;
                self.skip_statement()?;
                if self.lex.next_token()? == Token::Keyword(Keyword::Else) {
                    self.skip_statement()
                } else {
                    self.lex.putback();
                    Ok(())
                }
            }
            Token::Keyword(Keyword::While) => {
                self.skip_paren_group()?;
                self.skip_statement()
            }
            Token::Keyword(Keyword::For) => {
                self.skip_paren_group()?;
                self.skip_statement()
            }
            Token::Keyword(Keyword::Do) => {
                self.skip_statement()?;
                self.expect_kw(Keyword::While, ErrorCode::WhileExpected)?;
                self.skip_paren_group()?;
                self.expect_op(Operator::Semicolon, ErrorCode::SemiExpected)
            }
            Token::Keyword(Keyword::Switch) => {
                self.skip_paren_group()?;
                self.expect_block_open()?;
                self.skip_block_rest()
            }
            Token::Eof => Err(self.err(ErrorCode::Syntax)),
            _ => {
                self.lex.putback();
                self.skip_simple_statement()
            }
        }
    }

    /// To the terminating semicolon of a non-compound statement.
    fn skip_simple_statement(&mut self) -> Result<()> {
        let mut depth = 0i32;
        loop {
            match self.lex.next_token()? {
                Token::Op(Operator::LParen) => depth += 1,
                Token::Op(Operator::RParen) => {
                    depth -= 1;
                    if depth < 0 {
                        return Err(self.err(ErrorCode::UnbalancedParens));
                    }
                }
                Token::Op(Operator::Semicolon) if depth == 0 => return Ok(()),
                Token::Eof => return Err(self.err(ErrorCode::SemiExpected)),
                _ => {}
            }
        }
    }

    /// From inside a block to just past its closing brace.
    pub(super) fn skip_block_rest(&mut self) -> Result<()> {
        let mut depth = 0i32;
        loop {
            match self.lex.next_token()? {
                Token::OpenBlock => depth += 1,
                Token::CloseBlock => {
                    if depth == 0 {
                        return Ok(());
                    }
                    depth -= 1;
                }
                Token::Eof => return Err(self.err(ErrorCode::UnbalancedBraces)),
                _ => {}
            }
        }
    }

    /// A complete `( ... )` group, nested parentheses included.
    pub(super) fn skip_paren_group(&mut self) -> Result<()> {
        self.expect_op(Operator::LParen, ErrorCode::ParenExpected)?;
        self.skip_to_rparen()
    }

    /// From inside parentheses to just past the matching `)`.
    pub(super) fn skip_to_rparen(&mut self) -> Result<()> {
        let mut depth = 0i32;
        loop {
            match self.lex.next_token()? {
                Token::Op(Operator::LParen) => depth += 1,
                Token::Op(Operator::RParen) => {
                    if depth == 0 {
                        return Ok(());
                    }
                    depth -= 1;
                }
                Token::Eof => return Err(self.err(ErrorCode::UnbalancedParens)),
                _ => {}
            }
        }
    }
}
