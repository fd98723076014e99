use super::{Interp, Type, Val};
use crate::lang::{Error, ErrorCode, Keyword, Operator, Token};

use super::native;
use super::var::Variable;

type Result<T> = std::result::Result<T, Error>;

/// ## Expression evaluator
///
/// Precedence-climbing recursive descent, evaluating as it parses.
/// Six levels, lowest first: assignment, logical/ternary, relational,
/// additive, multiplicative, unary, and the primary `atom`. Arithmetic
/// wraps and keeps the left operand's type tag; relational and logical
/// results are `int`. `&&` and `||` evaluate both operands, and
/// relationals do not chain; both are deliberate simplifications
/// carried over from the pendant firmware.
impl Interp {
    /// Comma operator: a left-to-right sequence whose value is the
    /// last expression. Only reachable inside parentheses, `for`
    /// clauses and `return`.
    pub(super) fn eval_comma(&mut self) -> Result<Val> {
        let mut val = self.eval_assign()?;
        loop {
            if self.lex.next_token()? == Token::Op(Operator::Comma) {
                val = self.eval_assign()?;
            } else {
                self.lex.putback();
                return Ok(val);
            }
        }
    }

    /// Assignment level. An identifier naming an existing variable
    /// followed by an assignment operator is an assignment; anything
    /// else rewinds to the saved cursor and evaluates normally.
    pub(super) fn eval_assign(&mut self) -> Result<Val> {
        let mark = self.lex.pos();
        if self.lex.next_token()? == Token::Ident {
            let span = self.lex.span();
            let slot = {
                let src = self.lex.src();
                self.vars.find(src, &src[span])
            };
            if let Some(slot) = slot {
                if let Token::Op(op) = self.lex.next_token()? {
                    if op.is_assign() {
                        let rhs = self.eval_assign()?;
                        let cur = self.vars.get(slot);
                        let num = match op {
                            Operator::PlusAssign => cur.num.wrapping_add(rhs.num),
                            Operator::MinusAssign => cur.num.wrapping_sub(rhs.num),
                            Operator::MulAssign => cur.num.wrapping_mul(rhs.num),
                            Operator::DivAssign => {
                                if rhs.num == 0 {
                                    return Err(self.err(ErrorCode::DivByZero));
                                }
                                cur.num.wrapping_div(rhs.num)
                            }
                            Operator::ModAssign => {
                                if rhs.num == 0 {
                                    return Err(self.err(ErrorCode::DivByZero));
                                }
                                cur.num.wrapping_rem(rhs.num)
                            }
                            _ => rhs.num,
                        };
                        return Ok(self.vars.assign(slot, rhs.with_num(num)));
                    }
                }
            }
        }
        self.lex.set_pos(mark);
        self.eval_ternary()
    }

    pub(super) fn eval_ternary(&mut self) -> Result<Val> {
        let cond = self.eval_logic()?;
        if self.lex.next_token()? == Token::Op(Operator::Question) {
            if cond.truthy() {
                let val = self.eval_assign()?;
                self.expect_op(Operator::Colon, ErrorCode::ColonExpected)?;
                self.skip_untaken_branch()?;
                Ok(val)
            } else {
                self.skip_to_ternary_colon()?;
                self.eval_assign()
            }
        } else {
            self.lex.putback();
            Ok(cond)
        }
    }

    /// Discard the true branch of a ternary whose condition was false:
    /// advance to the `:` separating the branches, honoring nested
    /// parentheses, braces and nested `?:`. Consumes the colon.
    ///
    /// A `?` inside parentheses or braces is invisible here, as its
    /// matching `:` is too; only ternaries at depth 0 are counted.
    fn skip_to_ternary_colon(&mut self) -> Result<()> {
        let mut depth = 0i32;
        let mut ternary = 0i32;
        loop {
            match self.lex.next_token()? {
                Token::Op(Operator::LParen) | Token::OpenBlock => depth += 1,
                Token::Op(Operator::RParen) | Token::CloseBlock => {
                    depth -= 1;
                    if depth < 0 {
                        return Err(self.err(ErrorCode::ColonExpected));
                    }
                }
                Token::Op(Operator::Question) if depth == 0 => ternary += 1,
                Token::Op(Operator::Colon) if depth == 0 => {
                    if ternary == 0 {
                        return Ok(());
                    }
                    ternary -= 1;
                }
                Token::Eof => return Err(self.err(ErrorCode::ColonExpected)),
                _ => {}
            }
        }
    }

    /// Discard the false branch of a ternary whose condition was true:
    /// advance to the end of the enclosing expression, leaving the
    /// terminator unconsumed.
    fn skip_untaken_branch(&mut self) -> Result<()> {
        let mut depth = 0i32;
        let mut ternary = 0i32;
        loop {
            let mark = self.lex.pos();
            match self.lex.next_token()? {
                Token::Op(Operator::LParen) | Token::OpenBlock => depth += 1,
                Token::Op(Operator::RParen) | Token::CloseBlock => {
                    if depth == 0 {
                        self.lex.set_pos(mark);
                        return Ok(());
                    }
                    depth -= 1;
                }
                Token::Op(Operator::Question) if depth == 0 => ternary += 1,
                Token::Op(Operator::Colon) if depth == 0 => {
                    if ternary == 0 {
                        self.lex.set_pos(mark);
                        return Ok(());
                    }
                    ternary -= 1;
                }
                Token::Op(Operator::Comma) | Token::Op(Operator::Semicolon) if depth == 0 => {
                    self.lex.set_pos(mark);
                    return Ok(());
                }
                Token::Eof => {
                    self.lex.set_pos(mark);
                    return Ok(());
                }
                _ => {}
            }
        }
    }

    fn eval_logic(&mut self) -> Result<Val> {
        let mut lhs = self.eval_rel()?;
        loop {
            match self.lex.next_token()? {
                Token::Op(Operator::And) => {
                    let rhs = self.eval_rel()?;
                    lhs = Val::from_bool(lhs.truthy() && rhs.truthy());
                }
                Token::Op(Operator::Or) => {
                    let rhs = self.eval_rel()?;
                    lhs = Val::from_bool(lhs.truthy() || rhs.truthy());
                }
                _ => {
                    self.lex.putback();
                    return Ok(lhs);
                }
            }
        }
    }

    fn eval_rel(&mut self) -> Result<Val> {
        let mut lhs = self.eval_add()?;
        loop {
            let op = match self.lex.next_token()? {
                Token::Op(op) if op.is_relational() => op,
                _ => {
                    self.lex.putback();
                    return Ok(lhs);
                }
            };
            let rhs = self.eval_add()?;
            lhs = Val::from_bool(match op {
                Operator::Equal => lhs.num == rhs.num,
                Operator::NotEqual => lhs.num != rhs.num,
                Operator::Less => lhs.num < rhs.num,
                Operator::LessEqual => lhs.num <= rhs.num,
                Operator::Greater => lhs.num > rhs.num,
                _ => lhs.num >= rhs.num,
            });
        }
    }

    fn eval_add(&mut self) -> Result<Val> {
        let mut lhs = self.eval_mul()?;
        loop {
            let num = match self.lex.next_token()? {
                Token::Op(Operator::Plus) => lhs.num.wrapping_add(self.eval_mul()?.num),
                Token::Op(Operator::Minus) => lhs.num.wrapping_sub(self.eval_mul()?.num),
                _ => {
                    self.lex.putback();
                    return Ok(lhs);
                }
            };
            lhs = lhs.with_num(num);
        }
    }

    fn eval_mul(&mut self) -> Result<Val> {
        let mut lhs = self.eval_unary()?;
        loop {
            let num = match self.lex.next_token()? {
                Token::Op(Operator::Multiply) => lhs.num.wrapping_mul(self.eval_unary()?.num),
                Token::Op(Operator::Divide) => {
                    let rhs = self.eval_unary()?;
                    if rhs.num == 0 {
                        return Err(self.err(ErrorCode::DivByZero));
                    }
                    lhs.num.wrapping_div(rhs.num)
                }
                Token::Op(Operator::Modulus) => {
                    let rhs = self.eval_unary()?;
                    if rhs.num == 0 {
                        return Err(self.err(ErrorCode::DivByZero));
                    }
                    lhs.num.wrapping_rem(rhs.num)
                }
                _ => {
                    self.lex.putback();
                    return Ok(lhs);
                }
            };
            lhs = lhs.with_num(num);
        }
    }

    fn eval_unary(&mut self) -> Result<Val> {
        match self.lex.next_token()? {
            Token::Op(Operator::Plus) => self.eval_unary(),
            Token::Op(Operator::Minus) => {
                let val = self.eval_unary()?;
                Ok(val.with_num(val.num.wrapping_neg()))
            }
            Token::Op(Operator::Not) => {
                let val = self.eval_unary()?;
                Ok(Val::from_bool(!val.truthy()))
            }
            Token::Op(Operator::Inc) => self.step_variable(1),
            Token::Op(Operator::Dec) => self.step_variable(-1),
            _ => {
                self.lex.putback();
                self.atom()
            }
        }
    }

    /// `++`/`--`: read-modify-write the named variable immediately and
    /// produce the updated value. There is no postfix form; the same
    /// pre semantics apply in either position.
    fn step_variable(&mut self, delta: i32) -> Result<Val> {
        if self.lex.next_token()? != Token::Ident {
            return Err(self.err(ErrorCode::NotAVariable));
        }
        let span = self.lex.span();
        let slot = {
            let src = self.lex.src();
            self.vars.find(src, &src[span])
        };
        match slot {
            Some(slot) => {
                let cur = self.vars.get(slot);
                Ok(self.vars.assign(slot, cur.with_num(cur.num.wrapping_add(delta))))
            }
            None => Err(self.err(ErrorCode::NotAVariable)),
        }
    }

    fn atom(&mut self) -> Result<Val> {
        match self.lex.next_token()? {
            Token::Number(n) => Ok(Val::int(n)),
            Token::CharLit(c) => Ok(Val::chr(c)),
            Token::Str => Ok(Val::str_at(self.lex.span().start)),
            Token::Op(Operator::LParen) => {
                let val = self.eval_comma()?;
                self.expect_op(Operator::RParen, ErrorCode::UnbalancedParens)?;
                Ok(val)
            }
            Token::Ident => self.named_atom(),
            Token::Eof => Err(self.err(ErrorCode::NoExpression)),
            Token::Op(Operator::Semicolon) | Token::Op(Operator::RParen) => {
                Err(self.err(ErrorCode::NoExpression))
            }
            _ => Err(self.err(ErrorCode::Syntax)),
        }
    }

    /// Identifier in expression position: native function, user
    /// function call, or variable reference, checked in that order.
    fn named_atom(&mut self) -> Result<Val> {
        if let Some(f) = native::lookup(self.lex.text()) {
            return f(self);
        }
        let span = self.lex.span();
        let func = {
            let src = self.lex.src();
            let name = &src[span.clone()];
            self.funcs
                .iter()
                .position(|f| &src[f.name.clone()] == name)
        };
        if let Some(index) = func {
            return self.call_user(index);
        }
        let slot = {
            let src = self.lex.src();
            self.vars.find(src, &src[span])
        };
        match slot {
            Some(slot) => {
                let val = self.vars.get(slot);
                match self.lex.next_token()? {
                    Token::Op(Operator::Inc) => {
                        Ok(self.vars.assign(slot, val.with_num(val.num.wrapping_add(1))))
                    }
                    Token::Op(Operator::Dec) => {
                        Ok(self.vars.assign(slot, val.with_num(val.num.wrapping_sub(1))))
                    }
                    _ => {
                        self.lex.putback();
                        Ok(val)
                    }
                }
            }
            None => {
                let var_err = self.err(ErrorCode::UndefinedVariable);
                let fn_err = self.err(ErrorCode::UndefinedFunction);
                if self.lex.next_token()? == Token::Op(Operator::LParen) {
                    Err(fn_err)
                } else {
                    Err(var_err)
                }
            }
        }
    }

    /// Call a user function: evaluate the comma-separated arguments at
    /// the call site, then transfer control to the entry point.
    fn call_user(&mut self, index: usize) -> Result<Val> {
        self.expect_op(Operator::LParen, ErrorCode::ParenExpected)?;
        let mut args: Vec<Val> = vec![];
        if self.lex.next_token()? == Token::Op(Operator::RParen) {
            return self.call_with_args(index, args);
        }
        self.lex.putback();
        loop {
            args.push(self.eval_assign()?);
            match self.lex.next_token()? {
                Token::Op(Operator::Comma) => continue,
                Token::Op(Operator::RParen) => break,
                _ => return Err(self.err(ErrorCode::UnbalancedParens)),
            }
        }
        self.call_with_args(index, args)
    }

    /// Function call protocol: save the caller's local-stack top on
    /// the call stack, jump to the entry point, bind parameters to the
    /// argument values, interpret the body, then restore the cursor
    /// and the caller's frame. The result is truncated to the declared
    /// return type.
    pub(super) fn call_with_args(&mut self, index: usize, args: Vec<Val>) -> Result<Val> {
        let entry = self.funcs[index].entry;
        let ret = self.funcs[index].ret;
        let base = self.vars.locals_len();
        self.vars.enter_frame(base).map_err(|c| self.err(c))?;
        let ret_pos = self.lex.pos();
        self.lex.set_pos(entry);
        self.bind_params(&args)?;
        match self.lex.next_token()? {
            Token::OpenBlock => self.lex.putback(),
            _ => return Err(self.err(ErrorCode::BraceExpected)),
        }
        let flow = self.interp_block()?;
        let val = match flow {
            super::stmt::Flow::Return(v) => v,
            _ => Val::VOID,
        };
        self.vars.exit_frame().map_err(|c| self.err(c))?;
        self.lex.set_pos(ret_pos);
        Ok(val.coerce(ret))
    }

    /// Re-label the argument values with the callee's declared
    /// parameter names and types. Argument and parameter counts must
    /// match exactly.
    fn bind_params(&mut self, args: &[Val]) -> Result<()> {
        self.expect_op(Operator::LParen, ErrorCode::ParenExpected)?;
        let mut bound = 0usize;
        loop {
            let ty = match self.lex.next_token()? {
                Token::Op(Operator::RParen) if bound == 0 => break,
                Token::Keyword(Keyword::Int) => Type::Int,
                Token::Keyword(Keyword::Char) => Type::Char,
                _ => return Err(self.err(ErrorCode::TypeExpected)),
            };
            let name = self.expect_ident()?;
            let val = match args.get(bound) {
                Some(v) => v.coerce(ty),
                None => return Err(self.err(ErrorCode::ParamCount)),
            };
            self.vars
                .push_local(Variable { name, ty, val })
                .map_err(|c| self.err(c))?;
            bound += 1;
            match self.lex.next_token()? {
                Token::Op(Operator::Comma) => continue,
                Token::Op(Operator::RParen) => break,
                _ => return Err(self.err(ErrorCode::UnbalancedParens)),
            }
        }
        if bound != args.len() {
            return Err(self.err(ErrorCode::ParamCount));
        }
        Ok(())
    }
}
