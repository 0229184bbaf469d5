//! Colour strings to RGBA
//!
//! Style slots name colours one of three ways:
//!
//! - hex: `#RRGGBB` or `#RRGGBBAA`
//! - Open Color family with optional shade: `blue`, `blue 3`, `Gray 9`
//! - a few legacy names kept for old projects (`magenta`, `darkgray`)
//!
//! Anything unrecognised is white.

const WHITE: u32 = 0xFFFF_FFFF;
const BLACK: u32 = 0x0000_00FF;
const DEFAULT_SHADE: usize = 6;

/// Open Color palette, shades 0-9 as RGB
const PALETTE: &[(&str, [u32; 10])] = &[
    ("gray", [0xf8f9fa, 0xf1f3f5, 0xe9ecef, 0xdee2e6, 0xced4da, 0xadb5bd, 0x868e96, 0x495057, 0x343a40, 0x212529]),
    ("red", [0xfff5f5, 0xffe3e3, 0xffc9c9, 0xffa8a8, 0xff8787, 0xff6b6b, 0xfa5252, 0xf03e3e, 0xe03131, 0xc92a2a]),
    ("pink", [0xfff0f6, 0xffdeeb, 0xfcc2d7, 0xfaa2c1, 0xf783ac, 0xf06595, 0xe64980, 0xd6336c, 0xc2255c, 0xa61e4d]),
    ("grape", [0xf8f0fc, 0xf3d9fa, 0xeebefa, 0xe599f7, 0xda77f2, 0xcc5de8, 0xbe4bdb, 0xae3ec9, 0x9c36b5, 0x862e9c]),
    ("violet", [0xf3f0ff, 0xe5dbff, 0xd0bfff, 0xb197fc, 0x9775fa, 0x845ef7, 0x7950f2, 0x7048e8, 0x6741d9, 0x5f3dc4]),
    ("indigo", [0xedf2ff, 0xdbe4ff, 0xbac8ff, 0x91a7ff, 0x748ffc, 0x5c7cfa, 0x4c6ef5, 0x4263eb, 0x3b5bdb, 0x364fc7]),
    ("blue", [0xe7f5ff, 0xd0ebff, 0xa5d8ff, 0x74c0fc, 0x4dabf7, 0x339af0, 0x228be6, 0x1c7ed6, 0x1971c2, 0x1864ab]),
    ("cyan", [0xe3fafc, 0xc5f6fa, 0x99e9f2, 0x66d9e8, 0x3bc9db, 0x22b8cf, 0x15aabf, 0x1098ad, 0x0c8599, 0x0b7285]),
    ("teal", [0xe6fcf5, 0xc3fae8, 0x96f2d7, 0x63e6be, 0x38d9a9, 0x20c997, 0x12b886, 0x0ca678, 0x099268, 0x087f5b]),
    ("green", [0xebfbee, 0xd3f9d8, 0xb2f2bb, 0x8ce99a, 0x69db7c, 0x51cf66, 0x40c057, 0x37b24d, 0x2f9e44, 0x2b8a3e]),
    ("lime", [0xf4fce3, 0xe9fac8, 0xd8f5a2, 0xc0eb75, 0xa9e34b, 0x94d82d, 0x82c91e, 0x74b816, 0x66a80f, 0x5c940d]),
    ("yellow", [0xfff9db, 0xfff3bf, 0xffec99, 0xffe066, 0xffd43b, 0xfcc419, 0xfab005, 0xf59f00, 0xf08c00, 0xe67700]),
    ("orange", [0xfff4e6, 0xffe8cc, 0xffd8a8, 0xffc078, 0xffa94d, 0xff922b, 0xfd7e14, 0xf76707, 0xe8590c, 0xd9480f]),
];

/// Parse a colour string into `0xRRGGBBAA`
pub fn parse_color(spec: &str) -> u32 {
    let spec = spec.trim();
    if let Some(hex) = spec.strip_prefix('#') {
        return parse_hex(hex).unwrap_or(WHITE);
    }

    let mut parts = spec.split_whitespace();
    let name = parts.next().unwrap_or("").to_lowercase();
    let shade = parts
        .next()
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|s| *s <= 9)
        .unwrap_or(DEFAULT_SHADE);

    match name.as_str() {
        "black" => BLACK,
        "white" => WHITE,
        "magenta" => palette("grape", DEFAULT_SHADE),
        "darkgray" => palette("gray", 8),
        family => palette(family, shade),
    }
}

fn palette(family: &str, shade: usize) -> u32 {
    PALETTE
        .iter()
        .find(|(name, _)| *name == family)
        .map(|(_, shades)| (shades[shade] << 8) | 0xFF)
        .unwrap_or(WHITE)
}

fn parse_hex(hex: &str) -> Option<u32> {
    let value = u32::from_str_radix(hex, 16).ok()?;
    match hex.len() {
        6 => Some((value << 8) | 0xFF),
        8 => Some(value),
        _ => None,
    }
}
