use std::fmt::Write;

/// 解析十进制或 `0x` 开头的十六进制数
pub fn parse_number(input: &str) -> Option<u32> {
    let input = input.trim();
    match input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => input.parse().ok(),
    }
}

/// 经典的 16 字节一行的十六进制转储，行首是线性地址
pub fn hex_dump(base: u32, data: &[u8]) -> String {
    let mut out = String::new();

    for (i, chunk) in data.chunks(16).enumerate() {
        let addr = base as u64 + (i * 16) as u64;
        let _ = write!(out, "{:08x}  ", addr);

        for col in 0..16 {
            match chunk.get(col) {
                Some(b) => {
                    let _ = write!(out, "{:02x} ", b);
                }
                None => out.push_str("   "),
            }
            if col == 7 {
                out.push(' ');
            }
        }

        out.push_str(" |");
        out.extend(chunk.iter().map(|&b| {
            if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '.'
            }
        }));
        out.push_str("|\n");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_and_hex() {
        assert_eq!(parse_number("250"), Some(250));
        assert_eq!(parse_number("0x100"), Some(256));
        assert_eq!(parse_number("0XfF"), Some(255));
        assert_eq!(parse_number("-1"), None);
        assert_eq!(parse_number("0x"), None);
        assert_eq!(parse_number("4294967296"), None);
    }

    #[test]
    fn dumps_partial_rows() {
        let dump = hex_dump(0x10, b"ABC");
        assert_eq!(
            dump,
            format!("00000010  41 42 43 {} |ABC|\n", "   ".repeat(13) + " ")
        );
    }
}
