use crate::error::{Result, StudioError};
use image::Rgb;

/// Parse `#RRGGBB`, `RRGGBB` or `#RGB` into an RGB color
pub fn parse_hex_color(input: &str) -> Result<Rgb<u8>> {
    let invalid = || StudioError::InvalidColor(input.to_string());
    let hex = input.trim().trim_start_matches('#');

    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());

    match hex.len() {
        6 => Ok(Rgb([
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        ])),
        3 => {
            let expand = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
            Ok(Rgb([expand(0)?, expand(1)?, expand(2)?]))
        }
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_hex() {
        assert_eq!(parse_hex_color("#00FF00").unwrap(), Rgb([0, 255, 0]));
        assert_eq!(parse_hex_color("1a2B3c").unwrap(), Rgb([0x1a, 0x2b, 0x3c]));
    }

    #[test]
    fn parses_short_hex() {
        assert_eq!(parse_hex_color("#f80").unwrap(), Rgb([255, 136, 0]));
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "#12345", "#GG0000", "#+1+2+3", "#0000000"] {
            assert!(parse_hex_color(bad).is_err(), "{bad} should be rejected");
        }
    }
}
