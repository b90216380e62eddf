//! String helpers shared by the scanner and the emitter.

/// Quotes a literal in single quotes, escaping it so that the scanner reads back the same string.
pub fn quote_literal(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('\'');
    for c in s.chars() {
        match c {
            '\\' => quoted.push_str(r"\\"),
            '\'' => quoted.push_str(r"\'"),
            '\n' => quoted.push_str(r"\n"),
            '\r' => quoted.push_str(r"\r"),
            '\t' => quoted.push_str(r"\t"),
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                quoted.push_str(&format!(r"\x{:02x}", c as u32))
            }
            c if c.is_control() => quoted.push_str(&format!(r"\u{:04x}", c as u32)),
            c => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}

/// Decodes `digits` as a hexadecimal code point.
pub fn hex_to_char(digits: &str) -> Option<char> {
    u32::from_str_radix(digits, 16)
        .ok()
        .and_then(std::char::from_u32)
}

#[cfg(test)]
mod tests {
    macro_rules! quote_tests {
        ($($name:ident: $s:expr => $quoted:expr)*) => {
        $(
            #[test]
            fn $name() {
                assert_eq!(super::quote_literal($s), $quoted);
            }
        )*
        }
    }

    quote_tests! {
        plain: "abc" => "'abc'"
        quote: "it's" => r"'it\'s'"
        double_quote: "\"" => "'\"'"
        backslash: "\\" => r"'\\'"
        newline: "a\nb" => r"'a\nb'"
        control: "\u{1}" => r"'\x01'"
        c1_control: "\u{85}" => r"'\u0085'"
        unicode: "λ" => "'λ'"
    }

    #[test]
    fn hex_to_char() {
        assert_eq!(super::hex_to_char("41"), Some('A'));
        assert_eq!(super::hex_to_char("1F600"), Some('😀'));
        assert_eq!(super::hex_to_char("D800"), None);
        assert_eq!(super::hex_to_char("zz"), None);
    }
}
