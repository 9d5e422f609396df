//! Small arithmetic grammar for writing rationals in view files, and
//! the matching mixed-number formatter.
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-')? primary
//! primary := decimal | '(' expr ')'
//! decimal := [0-9]+ ('.' [0-9]+)?
//! ```

use num_bigint::BigInt;
use num_traits::Zero;

use crate::errors::*;
use crate::rational::Rational;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(Rational),
    Op(char),
}

fn tokenize(input: &str) -> Result<Vec<Token>> {

    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {

        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        if "()+-*/".contains(c) {
            tokens.push(Token::Op(c));
            i += 1;
            continue;
        }

        if !c.is_ascii_digit() {
            bail!(ErrorKind::Parse(format!("unexpected character '{}' in \"{}\"", c, input)));
        }

        let start = i;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }

        let whole: String = chars[start..i].iter().collect();
        let mut value = Rational::from_integer(whole.parse::<BigInt>()
                                               .chain_err(|| ErrorKind::Parse(whole.clone()))?);

        // a '.' must be followed by at least one digit
        if i < chars.len() && chars[i] == '.' {

            let frac_start = i + 1;
            i = frac_start;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }

            if i == frac_start {
                bail!(ErrorKind::Parse(format!("missing digits after '.' in \"{}\"", input)));
            }

            let digits: String = chars[frac_start..i].iter().collect();
            let numerator = digits.parse::<BigInt>()
                .chain_err(|| ErrorKind::Parse(digits.clone()))?;
            let scale = BigInt::from(10).pow(digits.len() as u32);

            value = value + Rational::reduced(numerator, scale);

        }

        tokens.push(Token::Number(value));

    }

    Ok(tokens)

}

struct Parser {
    tokens: Vec<Token>,
    pos:    usize,
}

impl Parser {

    fn peek_op(&self) -> Option<char> {
        match self.tokens.get(self.pos) {
            Some(Token::Op(c)) => Some(*c),
            _ => None,
        }
    }

    fn expr(&mut self) -> Result<Rational> {

        let mut value = self.term()?;

        while let Some(op) = self.peek_op() {
            match op {
                '+' => { self.pos += 1; value = value + self.term()?; }
                '-' => { self.pos += 1; value = value - self.term()?; }
                _ => break,
            }
        }

        Ok(value)

    }

    fn term(&mut self) -> Result<Rational> {

        let mut value = self.unary()?;

        while let Some(op) = self.peek_op() {
            match op {
                '*' => { self.pos += 1; value = value * self.unary()?; }
                '/' => {
                    self.pos += 1;
                    let divisor = self.unary()?;
                    value = value.checked_div(&divisor)?;
                }
                _ => break,
            }
        }

        Ok(value)

    }

    fn unary(&mut self) -> Result<Rational> {

        match self.peek_op() {
            Some('-') => { self.pos += 1; Ok(-self.primary()?) }
            Some('+') => { self.pos += 1; self.primary() }
            _ => self.primary(),
        }

    }

    fn primary(&mut self) -> Result<Rational> {

        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;

        match token {

            Some(Token::Number(value)) => Ok(value),

            Some(Token::Op('(')) => {
                let value = self.expr()?;
                if self.peek_op() != Some(')') {
                    bail!(ErrorKind::Parse("missing ')'".to_string()));
                }
                self.pos += 1;
                Ok(value)
            }

            Some(Token::Op(c)) => bail!(ErrorKind::Parse(format!("unexpected '{}'", c))),

            None => bail!(ErrorKind::Parse("unexpected end of input".to_string())),

        }

    }

}

/// Parse an arithmetic expression over decimal literals into an exact
/// rational, e.g. `"(1+2)/3.5"`.
pub fn parse_rational_expr(input: &str) -> Result<Rational> {

    let mut parser = Parser { tokens: tokenize(input)?, pos: 0 };

    let value = parser.expr()?;

    if parser.pos != parser.tokens.len() {
        bail!(ErrorKind::Parse(format!("trailing input in \"{}\"", input)));
    }

    Ok(value)

}

/// Mixed-number rendering: `7/2` is `3+1/2`, `-7/2` is `-3-1/2`.
pub fn format_rational(value: &Rational) -> String {

    if value.is_zero() {
        return "0".to_string();
    }

    let sign = if value.is_negative() { "-" } else { "" };
    let magnitude = value.abs();

    let whole = magnitude.integer();
    let frac = magnitude.fractional();

    if frac.is_zero() {
        format!("{}{}", sign, whole)
    } else if whole.is_zero() {
        format!("{}{}", sign, frac)
    } else {
        let joiner = if value.is_negative() { "-" } else { "+" };
        format!("{}{}{}{}", sign, whole, joiner, frac)
    }

}

#[cfg(test)]
mod tests {

    use super::*;

    fn q(n: i64, d: i64) -> Rational {
        Rational::new(n, d).unwrap()
    }

    #[test]
    fn precedence_and_parens() {
        assert_eq!(parse_rational_expr("1+2*3").unwrap(), q(7, 1));
        assert_eq!(parse_rational_expr("(1+2)*3").unwrap(), q(9, 1));
        assert_eq!(parse_rational_expr("1/3 - 1/6").unwrap(), q(1, 6));
        assert_eq!(parse_rational_expr("-(2/4)").unwrap(), q(-1, 2));
        assert_eq!(parse_rational_expr("2*-3").unwrap(), q(-6, 1));
    }

    #[test]
    fn decimals_are_exact() {
        assert_eq!(parse_rational_expr("0.1").unwrap(), q(1, 10));
        assert_eq!(parse_rational_expr("2.25").unwrap(), q(9, 4));
        assert_eq!(parse_rational_expr("-2.5").unwrap(), q(-5, 2));
    }

    #[test]
    fn malformed_input() {
        for bad in &["", "1+", "(1", "1)", "1.", "abc", "1 2"] {
            assert!(parse_rational_expr(bad).is_err(), "{:?} should fail", bad);
        }
        match parse_rational_expr("1/(2-2)") {
            Err(Error(ErrorKind::DivisionByZero(_), _)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn mixed_number_format() {
        assert_eq!(format_rational(&q(7, 2)), "3+1/2");
        assert_eq!(format_rational(&q(-7, 2)), "-3-1/2");
        assert_eq!(format_rational(&q(1, 3)), "1/3");
        assert_eq!(format_rational(&q(-1, 3)), "-1/3");
        assert_eq!(format_rational(&q(-4, 1)), "-4");
        assert_eq!(format_rational(&Rational::zero()), "0");
    }

    #[test]
    fn formatted_values_parse_back() {
        for &(n, d) in &[(7, 2), (-7, 2), (22, 7), (-1, 5), (9, 1)] {
            let r = q(n, d);
            assert_eq!(parse_rational_expr(&format_rational(&r)).unwrap(), r);
        }
    }

}
