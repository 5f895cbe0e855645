use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

/// Computed-style properties worth keeping in an annotation's style snapshot.
pub const KEY_PROPERTIES: &[&str] = &[
    "fontSize",
    "fontFamily",
    "fontWeight",
    "color",
    "backgroundColor",
    "padding",
    "paddingTop",
    "paddingRight",
    "paddingBottom",
    "paddingLeft",
    "margin",
    "marginTop",
    "marginRight",
    "marginBottom",
    "marginLeft",
    "display",
    "position",
    "borderRadius",
    "boxShadow",
    "lineHeight",
    "textAlign",
    "textDecoration",
    "width",
    "height",
    "maxWidth",
    "gap",
    "flexDirection",
    "justifyContent",
    "alignItems",
];

const SHORTHANDS: &[(&str, [&str; 4])] = &[
    ("padding", ["paddingTop", "paddingRight", "paddingBottom", "paddingLeft"]),
    ("margin", ["marginTop", "marginRight", "marginBottom", "marginLeft"]),
];

static RGB: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"rgba?\((\d+),\s*(\d+),\s*(\d+)").expect("static regex"));

/// Reduce a raw computed-style map to the opaque snapshot stored on an
/// annotation. Matching never reads it.
pub fn normalize_style_snapshot(raw: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    let kept: BTreeMap<&str, &str> = raw
        .iter()
        .filter(|(prop, _)| KEY_PROPERTIES.contains(&prop.as_str()))
        .map(|(prop, value)| (prop.as_str(), value.trim()))
        .filter(|(_, value)| !matches!(*value, "" | "none" | "normal" | "auto"))
        .collect();

    let mut result = BTreeMap::new();
    let mut consumed: HashSet<&str> = HashSet::new();

    for (shorthand, sides) in SHORTHANDS {
        let values: Vec<&str> = sides.iter().filter_map(|s| kept.get(s).copied()).collect();
        if let [top, right, bottom, left] = values[..] {
            let collapsed = if top == right && right == bottom && bottom == left {
                top.to_string()
            } else if top == bottom && right == left {
                format!("{top} {right}")
            } else {
                values.join(" ")
            };
            result.insert(shorthand.to_string(), collapsed);
            consumed.extend(sides.iter().copied());
            consumed.insert(*shorthand);
        }
    }

    for (prop, value) in &kept {
        if consumed.contains(prop) {
            continue;
        }
        let value = match *prop {
            "color" | "backgroundColor" => rgb_to_hex(value),
            _ => value.to_string(),
        };
        result.insert(prop.to_string(), value);
    }

    if result.get("position").map(String::as_str) == Some("static") {
        result.remove("position");
    }

    result
}

/// `rgb(r, g, b)` / `rgba(r, g, b, a)` to `#rrggbb`; anything else unchanged.
pub fn rgb_to_hex(value: &str) -> String {
    let Some(caps) = RGB.captures(value) else {
        return value.to_string();
    };
    let channel = |i: usize| -> u8 {
        caps.get(i)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .map(|v| v.min(255) as u8)
            .unwrap_or(0)
    };
    format!("#{:02x}{:02x}{:02x}", channel(1), channel(2), channel(3))
}
