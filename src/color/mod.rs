// CSS color token parsing for the live swatch previews

use iced::Color;
use regex::{Regex, RegexBuilder};
use std::sync::OnceLock;

// Longest token worth trying; anything longer is never a color
const MAX_COLOR_LENGTH: usize = 64;

fn hex_regex() -> &'static Regex {
    static HEX: OnceLock<Regex> = OnceLock::new();
    HEX.get_or_init(|| {
        Regex::new(r"^#(?:[0-9a-fA-F]{3,4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$")
            .expect("hex pattern is valid")
    })
}

fn function_regex() -> &'static Regex {
    static FUNC: OnceLock<Regex> = OnceLock::new();
    FUNC.get_or_init(|| {
        RegexBuilder::new(r"^(rgba?|hsla?)\(\s*([^()]*?)\s*\)$")
            .case_insensitive(true)
            .build()
            .expect("function pattern is valid")
    })
}

/// Parses a CSS color token (name, hex, rgb(), hsl()); None when unrecognized
pub fn parse_color(input: &str) -> Option<Color> {
    let token = input.trim();
    if token.is_empty() || token.len() > MAX_COLOR_LENGTH {
        return None;
    }

    if token.starts_with('#') {
        return parse_hex(token);
    }

    if let Some(caps) = function_regex().captures(token) {
        let args = split_args(&caps[2])?;
        return match caps[1].to_ascii_lowercase().as_str() {
            "rgb" | "rgba" => parse_rgb_args(&args),
            _ => parse_hsl_args(&args),
        };
    }

    if token.eq_ignore_ascii_case("transparent") {
        return Some(Color::TRANSPARENT);
    }

    named_color(token)
}

/// Color for a swatch: parsed value, or transparent when unrecognized
pub fn swatch_color(input: &str) -> Color {
    parse_color(input).unwrap_or(Color::TRANSPARENT)
}

fn parse_hex(token: &str) -> Option<Color> {
    if !hex_regex().is_match(token) {
        return None;
    }
    let digits = &token[1..];
    let nibble = |i: usize| u8::from_str_radix(&digits[i..=i], 16).ok().map(|n| n * 17);
    let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();

    let (r, g, b, a) = match digits.len() {
        3 => (nibble(0)?, nibble(1)?, nibble(2)?, 255),
        4 => (nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?),
        6 => (byte(0)?, byte(2)?, byte(4)?, 255),
        8 => (byte(0)?, byte(2)?, byte(4)?, byte(6)?),
        _ => return None,
    };
    Some(Color::from_rgba8(r, g, b, f32::from(a) / 255.0))
}

// Accepts both "1, 2, 3" and "1 2 3 / 0.5" argument styles
fn split_args(raw: &str) -> Option<Vec<&str>> {
    let args: Vec<&str> = if raw.contains(',') {
        raw.split(',').map(str::trim).collect()
    } else {
        raw.split(|c: char| c.is_whitespace() || c == '/')
            .filter(|s| !s.is_empty())
            .collect()
    };
    if args.len() < 3 || args.len() > 4 || args.iter().any(|a| a.is_empty()) {
        return None;
    }
    Some(args)
}

fn parse_number(arg: &str) -> Option<f32> {
    let value: f32 = arg.parse().ok()?;
    value.is_finite().then_some(value)
}

fn parse_percent(arg: &str) -> Option<f32> {
    arg.strip_suffix('%').and_then(parse_number).map(|p| p / 100.0)
}

fn parse_alpha(arg: Option<&&str>) -> Option<f32> {
    match arg {
        None => Some(1.0),
        Some(a) => parse_percent(a)
            .or_else(|| parse_number(a))
            .map(|v| v.clamp(0.0, 1.0)),
    }
}

fn parse_rgb_args(args: &[&str]) -> Option<Color> {
    let channel = |arg: &str| -> Option<f32> {
        parse_percent(arg)
            .or_else(|| parse_number(arg).map(|v| v / 255.0))
            .map(|v| v.clamp(0.0, 1.0))
    };
    Some(Color::from_rgba(
        channel(args[0])?,
        channel(args[1])?,
        channel(args[2])?,
        parse_alpha(args.get(3))?,
    ))
}

fn parse_hsl_args(args: &[&str]) -> Option<Color> {
    let hue = parse_number(args[0].trim_end_matches("deg"))?;
    let fraction = |arg: &str| -> Option<f32> {
        parse_percent(arg)
            .or_else(|| parse_number(arg).map(|v| v / 100.0))
            .map(|v| v.clamp(0.0, 1.0))
    };
    let (r, g, b) = hsl_to_rgb(hue, fraction(args[1])?, fraction(args[2])?);
    Some(Color::from_rgba(r, g, b, parse_alpha(args.get(3))?))
}

fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> (f32, f32, f32) {
    let h = hue.rem_euclid(360.0) / 60.0;
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = lightness - chroma / 2.0;
    (r + m, g + m, b + m)
}

fn named_color(token: &str) -> Option<Color> {
    NAMED_COLORS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(token))
        .map(|&(_, rgb)| {
            Color::from_rgb8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
        })
}

// CSS Color Module Level 4 named colors
const NAMED_COLORS: &[(&str, u32)] = &[
    ("aliceblue", 0xF0F8FF),
    ("antiquewhite", 0xFAEBD7),
    ("aqua", 0x00FFFF),
    ("aquamarine", 0x7FFFD4),
    ("azure", 0xF0FFFF),
    ("beige", 0xF5F5DC),
    ("bisque", 0xFFE4C4),
    ("black", 0x000000),
    ("blanchedalmond", 0xFFEBCD),
    ("blue", 0x0000FF),
    ("blueviolet", 0x8A2BE2),
    ("brown", 0xA52A2A),
    ("burlywood", 0xDEB887),
    ("cadetblue", 0x5F9EA0),
    ("chartreuse", 0x7FFF00),
    ("chocolate", 0xD2691E),
    ("coral", 0xFF7F50),
    ("cornflowerblue", 0x6495ED),
    ("cornsilk", 0xFFF8DC),
    ("crimson", 0xDC143C),
    ("cyan", 0x00FFFF),
    ("darkblue", 0x00008B),
    ("darkcyan", 0x008B8B),
    ("darkgoldenrod", 0xB8860B),
    ("darkgray", 0xA9A9A9),
    ("darkgreen", 0x006400),
    ("darkgrey", 0xA9A9A9),
    ("darkkhaki", 0xBDB76B),
    ("darkmagenta", 0x8B008B),
    ("darkolivegreen", 0x556B2F),
    ("darkorange", 0xFF8C00),
    ("darkorchid", 0x9932CC),
    ("darkred", 0x8B0000),
    ("darksalmon", 0xE9967A),
    ("darkseagreen", 0x8FBC8F),
    ("darkslateblue", 0x483D8B),
    ("darkslategray", 0x2F4F4F),
    ("darkslategrey", 0x2F4F4F),
    ("darkturquoise", 0x00CED1),
    ("darkviolet", 0x9400D3),
    ("deeppink", 0xFF1493),
    ("deepskyblue", 0x00BFFF),
    ("dimgray", 0x696969),
    ("dimgrey", 0x696969),
    ("dodgerblue", 0x1E90FF),
    ("firebrick", 0xB22222),
    ("floralwhite", 0xFFFAF0),
    ("forestgreen", 0x228B22),
    ("fuchsia", 0xFF00FF),
    ("gainsboro", 0xDCDCDC),
    ("ghostwhite", 0xF8F8FF),
    ("gold", 0xFFD700),
    ("goldenrod", 0xDAA520),
    ("gray", 0x808080),
    ("green", 0x008000),
    ("greenyellow", 0xADFF2F),
    ("grey", 0x808080),
    ("honeydew", 0xF0FFF0),
    ("hotpink", 0xFF69B4),
    ("indianred", 0xCD5C5C),
    ("indigo", 0x4B0082),
    ("ivory", 0xFFFFF0),
    ("khaki", 0xF0E68C),
    ("lavender", 0xE6E6FA),
    ("lavenderblush", 0xFFF0F5),
    ("lawngreen", 0x7CFC00),
    ("lemonchiffon", 0xFFFACD),
    ("lightblue", 0xADD8E6),
    ("lightcoral", 0xF08080),
    ("lightcyan", 0xE0FFFF),
    ("lightgoldenrodyellow", 0xFAFAD2),
    ("lightgray", 0xD3D3D3),
    ("lightgreen", 0x90EE90),
    ("lightgrey", 0xD3D3D3),
    ("lightpink", 0xFFB6C1),
    ("lightsalmon", 0xFFA07A),
    ("lightseagreen", 0x20B2AA),
    ("lightskyblue", 0x87CEFA),
    ("lightslategray", 0x778899),
    ("lightslategrey", 0x778899),
    ("lightsteelblue", 0xB0C4DE),
    ("lightyellow", 0xFFFFE0),
    ("lime", 0x00FF00),
    ("limegreen", 0x32CD32),
    ("linen", 0xFAF0E6),
    ("magenta", 0xFF00FF),
    ("maroon", 0x800000),
    ("mediumaquamarine", 0x66CDAA),
    ("mediumblue", 0x0000CD),
    ("mediumorchid", 0xBA55D3),
    ("mediumpurple", 0x9370DB),
    ("mediumseagreen", 0x3CB371),
    ("mediumslateblue", 0x7B68EE),
    ("mediumspringgreen", 0x00FA9A),
    ("mediumturquoise", 0x48D1CC),
    ("mediumvioletred", 0xC71585),
    ("midnightblue", 0x191970),
    ("mintcream", 0xF5FFFA),
    ("mistyrose", 0xFFE4E1),
    ("moccasin", 0xFFE4B5),
    ("navajowhite", 0xFFDEAD),
    ("navy", 0x000080),
    ("oldlace", 0xFDF5E6),
    ("olive", 0x808000),
    ("olivedrab", 0x6B8E23),
    ("orange", 0xFFA500),
    ("orangered", 0xFF4500),
    ("orchid", 0xDA70D6),
    ("palegoldenrod", 0xEEE8AA),
    ("palegreen", 0x98FB98),
    ("paleturquoise", 0xAFEEEE),
    ("palevioletred", 0xDB7093),
    ("papayawhip", 0xFFEFD5),
    ("peachpuff", 0xFFDAB9),
    ("peru", 0xCD853F),
    ("pink", 0xFFC0CB),
    ("plum", 0xDDA0DD),
    ("powderblue", 0xB0E0E6),
    ("purple", 0x800080),
    ("rebeccapurple", 0x663399),
    ("red", 0xFF0000),
    ("rosybrown", 0xBC8F8F),
    ("royalblue", 0x4169E1),
    ("saddlebrown", 0x8B4513),
    ("salmon", 0xFA8072),
    ("sandybrown", 0xF4A460),
    ("seagreen", 0x2E8B57),
    ("seashell", 0xFFF5EE),
    ("sienna", 0xA0522D),
    ("silver", 0xC0C0C0),
    ("skyblue", 0x87CEEB),
    ("slateblue", 0x6A5ACD),
    ("slategray", 0x708090),
    ("slategrey", 0x708090),
    ("snow", 0xFFFAFA),
    ("springgreen", 0x00FF7F),
    ("steelblue", 0x4682B4),
    ("tan", 0xD2B48C),
    ("teal", 0x008080),
    ("thistle", 0xD8BFD8),
    ("tomato", 0xFF6347),
    ("turquoise", 0x40E0D0),
    ("violet", 0xEE82EE),
    ("wheat", 0xF5DEB3),
    ("white", 0xFFFFFF),
    ("whitesmoke", 0xF5F5F5),
    ("yellow", 0xFFFF00),
    ("yellowgreen", 0x9ACD32),
];
