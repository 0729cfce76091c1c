//! Numeric literals as Kick Assembler writes them: decimal, `$hex`, `%binary`.

/// Interpret a literal, an immediate `#` prefix is allowed.
/// Anything that is not a plain literal gives `None`, including expressions.
pub fn to_decimal(token: &str) -> Option<i64> {
    let mut s = token.trim();
    s = s.strip_prefix('#').unwrap_or(s);
    let (neg,s) = match s.strip_prefix('-') {
        Some(rest) => (true,rest),
        None => (false,s)
    };
    let abs = if let Some(hex) = s.strip_prefix('$') {
        i64::from_str_radix(hex, 16).ok()?
    } else if let Some(bin) = s.strip_prefix('%') {
        i64::from_str_radix(bin, 2).ok()?
    } else {
        if s.len() == 0 || !s.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        s.parse::<i64>().ok()?
    };
    match neg {
        true => Some(-abs),
        false => Some(abs)
    }
}

fn signed_radix(value: i64, radix: u32) -> String {
    let abs = value.unsigned_abs();
    let digits = match radix {
        2 => format!("{:b}",abs),
        16 => format!("{:x}",abs),
        _ => format!("{}",abs)
    };
    match value < 0 {
        true => format!("-{}",digits),
        false => digits
    }
}

/// Markdown list of the value in decimal, binary and hex.
pub fn format_value(value: i64) -> String {
    format!("\n\n* Dec: `{}`\n* Bin: `%{}`\n* Hex: `${}`",
        value,
        signed_radix(value, 2),
        signed_radix(value, 16)
    )
}

#[cfg(test)]
mod tests {
    #[test]
    fn literals() {
        assert_eq!(super::to_decimal("$d020"),Some(53280));
        assert_eq!(super::to_decimal("#%101"),Some(5));
        assert_eq!(super::to_decimal("42"),Some(42));
        assert_eq!(super::to_decimal("-$10"),Some(-16));
        assert_eq!(super::to_decimal("x+1"),None);
        assert_eq!(super::to_decimal(""),None);
    }
    #[test]
    fn formatting() {
        assert_eq!(super::format_value(10),"\n\n* Dec: `10`\n* Bin: `%1010`\n* Hex: `$a`");
        assert_eq!(super::format_value(-2),"\n\n* Dec: `-2`\n* Bin: `%-10`\n* Hex: `$-2`");
    }
}
