use super::{Interp, Type, Val};
use crate::lang::{Error, ErrorCode, Operator, Token};

type Result<T> = std::result::Result<T, Error>;

/// Machine axes a script can query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Host-side machine state exposed to scripts. The pendant feeds live
/// GRBL coordinates through this; tests and the terminal frontend use
/// [`NullHost`].
pub trait Host {
    fn axis_pos(&self, axis: Axis) -> i32;
    fn lathe_diameter_mode(&self) -> bool;
}

/// Host that reports the machine parked at origin.
pub struct NullHost;

impl Host for NullHost {
    fn axis_pos(&self, _axis: Axis) -> i32 {
        0
    }
    fn lathe_diameter_mode(&self) -> bool {
        false
    }
}

pub(super) type NativeFn = fn(&mut Interp) -> Result<Val>;

/// Native-function table, checked before user functions.
pub(super) fn lookup(name: &str) -> Option<NativeFn> {
    match name {
        "putch" => Some(Interp::native_putch),
        "puts" => Some(Interp::native_puts),
        "print" => Some(Interp::native_print),
        "println" => Some(Interp::native_println),
        "printfp" => Some(Interp::native_printfp),
        "abs" => Some(Interp::native_abs),
        "GetAxisPosX" => Some(Interp::native_axis_x),
        "GetAxisPosY" => Some(Interp::native_axis_y),
        "GetAxisPosZ" => Some(Interp::native_axis_z),
        "IsLatheDiameterMode" => Some(Interp::native_lathe_mode),
        _ => None,
    }
}

/// Fixed-point formatter behind `printfp`. The sign is emitted
/// separately so magnitudes smaller than the scaler still print as
/// negative (`-500` at scaler `1000` is `-0.500`).
pub(super) fn format_fixed_point(value: i32, scaler: i32) -> String {
    if scaler <= 1 {
        return value.to_string();
    }
    let value = i64::from(value);
    let scaler = i64::from(scaler);
    let places = (scaler - 1).to_string().len();
    let sign = if value < 0 { "-" } else { "" };
    let mag = value.abs();
    format!(
        "{}{}.{:0places$}",
        sign,
        mag / scaler,
        mag % scaler,
        places = places
    )
}

/// ## Native function bridge
///
/// Each handler consumes its own argument list, from the opening
/// parenthesis through the closing one, and writes directly into the
/// shared output buffer.
impl Interp {
    fn write_val(&mut self, val: Val) -> Result<()> {
        match val.ty {
            Type::Char => self.out.push(char::from(val.num as u8)),
            Type::Str => {
                let s = self.resolve_str(val)?;
                self.out.push_str(&s);
            }
            _ => self.out.push_str(&val.num.to_string()),
        }
        self.check_output()
    }

    /// Comma-separated mix of string literals and expressions.
    fn print_args(&mut self) -> Result<()> {
        self.expect_op(Operator::LParen, ErrorCode::ParenExpected)?;
        if self.lex.next_token()? == Token::Op(Operator::RParen) {
            return Ok(());
        }
        self.lex.putback();
        loop {
            let val = self.eval_assign()?;
            self.write_val(val)?;
            match self.lex.next_token()? {
                Token::Op(Operator::Comma) => continue,
                Token::Op(Operator::RParen) => return Ok(()),
                _ => return Err(self.err(ErrorCode::UnbalancedParens)),
            }
        }
    }

    fn native_print(&mut self) -> Result<Val> {
        self.print_args()?;
        Ok(Val::VOID)
    }

    fn native_println(&mut self) -> Result<Val> {
        self.print_args()?;
        self.out.push('\n');
        self.check_output()?;
        Ok(Val::VOID)
    }

    /// `puts` accepts a single string literal, nothing else.
    fn native_puts(&mut self) -> Result<Val> {
        self.expect_op(Operator::LParen, ErrorCode::ParenExpected)?;
        if self.lex.next_token()? != Token::Str {
            return Err(self.err(ErrorCode::NotAString));
        }
        let s = self.resolve_str(Val::str_at(self.lex.span().start))?;
        self.out.push_str(&s);
        self.expect_op(Operator::RParen, ErrorCode::UnbalancedParens)?;
        self.check_output()?;
        Ok(Val::VOID)
    }

    fn native_putch(&mut self) -> Result<Val> {
        self.expect_op(Operator::LParen, ErrorCode::ParenExpected)?;
        let val = self.eval_assign()?;
        self.expect_op(Operator::RParen, ErrorCode::UnbalancedParens)?;
        self.out.push(char::from(val.num as u8));
        self.check_output()?;
        Ok(Val::VOID)
    }

    fn native_printfp(&mut self) -> Result<Val> {
        self.expect_op(Operator::LParen, ErrorCode::ParenExpected)?;
        let value = self.eval_assign()?;
        self.expect_op(Operator::Comma, ErrorCode::ParamCount)?;
        let scaler = self.eval_assign()?;
        self.expect_op(Operator::RParen, ErrorCode::UnbalancedParens)?;
        let s = format_fixed_point(value.num, scaler.num);
        self.out.push_str(&s);
        self.check_output()?;
        Ok(Val::VOID)
    }

    fn native_abs(&mut self) -> Result<Val> {
        self.expect_op(Operator::LParen, ErrorCode::ParenExpected)?;
        let val = self.eval_assign()?;
        self.expect_op(Operator::RParen, ErrorCode::UnbalancedParens)?;
        Ok(val.with_num(val.num.wrapping_abs()))
    }

    fn host_query(&mut self) -> Result<()> {
        self.expect_op(Operator::LParen, ErrorCode::ParenExpected)?;
        self.expect_op(Operator::RParen, ErrorCode::UnbalancedParens)
    }

    fn native_axis_x(&mut self) -> Result<Val> {
        self.host_query()?;
        Ok(Val::int(self.host.axis_pos(Axis::X)))
    }

    fn native_axis_y(&mut self) -> Result<Val> {
        self.host_query()?;
        Ok(Val::int(self.host.axis_pos(Axis::Y)))
    }

    fn native_axis_z(&mut self) -> Result<Val> {
        self.host_query()?;
        Ok(Val::int(self.host.axis_pos(Axis::Z)))
    }

    fn native_lathe_mode(&mut self) -> Result<Val> {
        self.host_query()?;
        Ok(Val::from_bool(self.host.lathe_diameter_mode()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_point_basic() {
        assert_eq!(format_fixed_point(1000, 1000), "1.000");
        assert_eq!(format_fixed_point(1234, 1000), "1.234");
        assert_eq!(format_fixed_point(12345, 100), "123.45");
        assert_eq!(format_fixed_point(5, 1000), "0.005");
    }

    #[test]
    fn test_fixed_point_negative_fraction() {
        assert_eq!(format_fixed_point(-500, 1000), "-0.500");
        assert_eq!(format_fixed_point(-1500, 1000), "-1.500");
    }

    #[test]
    fn test_fixed_point_unit_scaler() {
        assert_eq!(format_fixed_point(42, 1), "42");
        assert_eq!(format_fixed_point(-42, 0), "-42");
    }
}
