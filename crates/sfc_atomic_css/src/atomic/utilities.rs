//! Utility class resolution: `bg-green-200` → `background-color:#a7f3d0`.

use super::theme::Theme;

/// One `property:value` pair of a generated rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: &'static str,
    pub value: String,
}

impl Declaration {
    fn new(property: &'static str, value: impl Into<String>) -> Self {
        Self {
            property,
            value: value.into(),
        }
    }
}

/// Resolve a utility (variants already stripped) to its declarations.
///
/// `negative` is set for a leading `-` (`-mt-4`); only margins accept it.
/// Returns `None` for anything the engine does not recognise.
pub fn resolve(utility: &str, negative: bool, theme: &Theme) -> Option<Vec<Declaration>> {
    if !negative && let Some(declarations) = resolve_static(utility) {
        return Some(declarations);
    }

    let (head, rest) = utility.split_once('-')?;
    if negative && !head.starts_with('m') {
        return None;
    }

    match head {
        "p" | "px" | "py" | "pt" | "pr" | "pb" | "pl" => {
            let value = spacing(rest)?;
            Some(sides(head, "padding", &value))
        }
        "m" | "mx" | "my" | "mt" | "mr" | "mb" | "ml" => {
            let value = if rest == "auto" {
                "auto".to_string()
            } else {
                let value = spacing(rest)?;
                if negative && value != "0px" {
                    format!("-{value}")
                } else {
                    value
                }
            };
            Some(sides(head, "margin", &value))
        }
        "w" => Some(vec![Declaration::new("width", size(rest, "100vw")?)]),
        "h" => Some(vec![Declaration::new("height", size(rest, "100vh")?)]),
        "bg" => Some(vec![Declaration::new("background-color", theme.color(rest)?)]),
        "text" => {
            if let Some((font_size, line_height)) = font_size(rest) {
                Some(vec![
                    Declaration::new("font-size", font_size),
                    Declaration::new("line-height", line_height),
                ])
            } else {
                Some(vec![Declaration::new("color", theme.color(rest)?)])
            }
        }
        "border" => {
            if let Ok(width) = rest.parse::<u8>() {
                matches!(width, 0 | 2 | 4 | 8)
                    .then(|| vec![Declaration::new("border-width", format!("{width}px"))])
            } else {
                Some(vec![Declaration::new("border-color", theme.color(rest)?)])
            }
        }
        "opacity" => {
            let percent: u8 = rest.parse().ok()?;
            OPACITY_STEPS.contains(&percent).then(|| {
                vec![Declaration::new(
                    "opacity",
                    (f64::from(percent) / 100.0).to_string(),
                )]
            })
        }
        _ => None,
    }
}

fn resolve_static(utility: &str) -> Option<Vec<Declaration>> {
    let (property, value) = match utility {
        "block" | "inline-block" | "inline" | "flex" | "inline-flex" | "grid" => {
            ("display", utility)
        }
        "hidden" => ("display", "none"),
        "flex-row" => ("flex-direction", "row"),
        "flex-row-reverse" => ("flex-direction", "row-reverse"),
        "flex-col" => ("flex-direction", "column"),
        "flex-col-reverse" => ("flex-direction", "column-reverse"),
        "flex-wrap" => ("flex-wrap", "wrap"),
        "flex-nowrap" => ("flex-wrap", "nowrap"),
        "flex-1" => ("flex", "1 1 0%"),
        "flex-auto" => ("flex", "1 1 auto"),
        "flex-none" => ("flex", "none"),
        "items-start" => ("align-items", "flex-start"),
        "items-end" => ("align-items", "flex-end"),
        "items-center" => ("align-items", "center"),
        "items-baseline" => ("align-items", "baseline"),
        "items-stretch" => ("align-items", "stretch"),
        "justify-start" => ("justify-content", "flex-start"),
        "justify-end" => ("justify-content", "flex-end"),
        "justify-center" => ("justify-content", "center"),
        "justify-between" => ("justify-content", "space-between"),
        "justify-around" => ("justify-content", "space-around"),
        "justify-evenly" => ("justify-content", "space-evenly"),
        "text-left" => ("text-align", "left"),
        "text-center" => ("text-align", "center"),
        "text-right" => ("text-align", "right"),
        "text-justify" => ("text-align", "justify"),
        "font-thin" => ("font-weight", "100"),
        "font-extralight" => ("font-weight", "200"),
        "font-light" => ("font-weight", "300"),
        "font-normal" => ("font-weight", "400"),
        "font-medium" => ("font-weight", "500"),
        "font-semibold" => ("font-weight", "600"),
        "font-bold" => ("font-weight", "700"),
        "font-extrabold" => ("font-weight", "800"),
        "font-black" => ("font-weight", "900"),
        "border" => ("border-width", "1px"),
        "rounded-none" => ("border-radius", "0px"),
        "rounded-sm" => ("border-radius", "0.125rem"),
        "rounded" => ("border-radius", "0.25rem"),
        "rounded-md" => ("border-radius", "0.375rem"),
        "rounded-lg" => ("border-radius", "0.5rem"),
        "rounded-xl" => ("border-radius", "0.75rem"),
        "rounded-2xl" => ("border-radius", "1rem"),
        "rounded-3xl" => ("border-radius", "1.5rem"),
        "rounded-full" => ("border-radius", "9999px"),
        "cursor-auto" | "cursor-default" | "cursor-pointer" | "cursor-wait" | "cursor-text"
        | "cursor-move" | "cursor-not-allowed" => ("cursor", &utility["cursor-".len()..]),
        _ => return None,
    };
    Some(vec![Declaration::new(property, value)])
}

/// Expand a spacing utility head into the sides it applies to.
fn sides(head: &str, property: &'static str, value: &str) -> Vec<Declaration> {
    let (top, right, bottom, left) = if property == "padding" {
        ("padding-top", "padding-right", "padding-bottom", "padding-left")
    } else {
        ("margin-top", "margin-right", "margin-bottom", "margin-left")
    };
    let properties = match &head[1..] {
        "" => vec![property],
        "x" => vec![left, right],
        "y" => vec![top, bottom],
        "t" => vec![top],
        "r" => vec![right],
        "b" => vec![bottom],
        _ => vec![left],
    };
    properties
        .into_iter()
        .map(|property| Declaration::new(property, value))
        .collect()
}

/// Spacing scale: `4` → `1rem`, `0.5` → `0.125rem`, `px` → `1px`.
fn spacing(key: &str) -> Option<String> {
    match key {
        "0" => Some("0px".to_string()),
        "px" => Some("1px".to_string()),
        _ if SPACING_STEPS.contains(&key) => {
            let step: f64 = key.parse().ok()?;
            Some(format!("{}rem", step / 4.0))
        }
        _ => None,
    }
}

/// Width/height: the spacing scale plus keywords and fractions.
fn size(key: &str, screen: &str) -> Option<String> {
    let value = match key {
        "auto" => "auto",
        "full" => "100%",
        "screen" => screen,
        "1/2" => "50%",
        "1/3" => "33.333333%",
        "2/3" => "66.666667%",
        "1/4" => "25%",
        "3/4" => "75%",
        _ => return spacing(key),
    };
    Some(value.to_string())
}

/// Font size and matching line height.
fn font_size(key: &str) -> Option<(&'static str, &'static str)> {
    Some(match key {
        "xs" => ("0.75rem", "1rem"),
        "sm" => ("0.875rem", "1.25rem"),
        "base" => ("1rem", "1.5rem"),
        "lg" => ("1.125rem", "1.75rem"),
        "xl" => ("1.25rem", "1.75rem"),
        "2xl" => ("1.5rem", "2rem"),
        "3xl" => ("1.875rem", "2.25rem"),
        "4xl" => ("2.25rem", "2.5rem"),
        "5xl" => ("3rem", "1"),
        "6xl" => ("3.75rem", "1"),
        _ => return None,
    })
}

const SPACING_STEPS: &[&str] = &[
    "0.5", "1", "1.5", "2", "2.5", "3", "3.5", "4", "5", "6", "7", "8", "9", "10", "11", "12", "14",
    "16", "20", "24", "28", "32", "36", "40", "44", "48", "52", "56", "60", "64", "72", "80", "96",
];

const OPACITY_STEPS: &[u8] = &[0, 5, 10, 20, 25, 30, 40, 50, 60, 70, 75, 80, 90, 95, 100];

#[cfg(test)]
mod tests {
    use super::*;

    fn css(utility: &str) -> Option<String> {
        let (negative, utility) = match utility.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, utility),
        };
        resolve(utility, negative, &Theme::default()).map(|declarations| {
            declarations
                .iter()
                .map(|d| format!("{}:{}", d.property, d.value))
                .collect::<Vec<_>>()
                .join(";")
        })
    }

    #[test]
    fn test_colors() {
        assert_eq!(css("bg-green-200").as_deref(), Some("background-color:#a7f3d0"));
        assert_eq!(css("text-red-500").as_deref(), Some("color:#ef4444"));
        assert_eq!(css("border-blue-100").as_deref(), Some("border-color:#dbeafe"));
        assert_eq!(css("bg-white").as_deref(), Some("background-color:#fff"));
        assert_eq!(css("bg-mauve-200"), None);
    }

    #[test]
    fn test_font_sizes() {
        assert_eq!(
            css("text-2xl").as_deref(),
            Some("font-size:1.5rem;line-height:2rem")
        );
        assert_eq!(css("text-center").as_deref(), Some("text-align:center"));
        assert_eq!(css("font-bold").as_deref(), Some("font-weight:700"));
    }

    #[test]
    fn test_spacing() {
        assert_eq!(css("p-4").as_deref(), Some("padding:1rem"));
        assert_eq!(
            css("px-2").as_deref(),
            Some("padding-left:0.5rem;padding-right:0.5rem")
        );
        assert_eq!(css("pt-0.5").as_deref(), Some("padding-top:0.125rem"));
        assert_eq!(css("p-px").as_deref(), Some("padding:1px"));
        assert_eq!(css("p-0").as_deref(), Some("padding:0px"));
        assert_eq!(
            css("my-auto").as_deref(),
            Some("margin-top:auto;margin-bottom:auto")
        );
        assert_eq!(css("-mt-4").as_deref(), Some("margin-top:-1rem"));
        assert_eq!(css("-p-4"), None);
        assert_eq!(css("p-13"), None);
    }

    #[test]
    fn test_sizes() {
        assert_eq!(css("w-1/2").as_deref(), Some("width:50%"));
        assert_eq!(css("h-screen").as_deref(), Some("height:100vh"));
        assert_eq!(css("w-64").as_deref(), Some("width:16rem"));
    }

    #[test]
    fn test_static_utilities() {
        assert_eq!(css("hidden").as_deref(), Some("display:none"));
        assert_eq!(css("flex").as_deref(), Some("display:flex"));
        assert_eq!(css("border").as_deref(), Some("border-width:1px"));
        assert_eq!(css("border-2").as_deref(), Some("border-width:2px"));
        assert_eq!(css("border-3"), None);
        assert_eq!(css("rounded-full").as_deref(), Some("border-radius:9999px"));
        assert_eq!(css("cursor-pointer").as_deref(), Some("cursor:pointer"));
        assert_eq!(css("opacity-50").as_deref(), Some("opacity:0.5"));
        assert_eq!(css("opacity-100").as_deref(), Some("opacity:1"));
        assert_eq!(css("opacity-33"), None);
    }

    #[test]
    fn test_unknown() {
        assert_eq!(css("not-a-utility"), None);
        assert_eq!(css("foo"), None);
    }
}
