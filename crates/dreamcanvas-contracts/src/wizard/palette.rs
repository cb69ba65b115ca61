#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaletteColor {
    pub id: &'static str,
    pub hex: &'static str,
    pub label_fa: &'static str,
}

pub const PALETTE: &[PaletteColor] = &[
    PaletteColor {
        id: "red",
        hex: "#ef4444",
        label_fa: "قرمز",
    },
    PaletteColor {
        id: "orange",
        hex: "#f97316",
        label_fa: "نارنجی",
    },
    PaletteColor {
        id: "yellow",
        hex: "#eab308",
        label_fa: "زرد",
    },
    PaletteColor {
        id: "green",
        hex: "#22c55e",
        label_fa: "سبز",
    },
    PaletteColor {
        id: "teal",
        hex: "#14b8a6",
        label_fa: "فیروزه‌ای",
    },
    PaletteColor {
        id: "blue",
        hex: "#3b82f6",
        label_fa: "آبی",
    },
    PaletteColor {
        id: "violet",
        hex: "#8b5cf6",
        label_fa: "بنفش",
    },
    PaletteColor {
        id: "pink",
        hex: "#ec4899",
        label_fa: "صورتی",
    },
    PaletteColor {
        id: "white",
        hex: "#ffffff",
        label_fa: "سفید",
    },
    PaletteColor {
        id: "black",
        hex: "#000000",
        label_fa: "مشکی",
    },
];

pub fn find_color(raw: &str) -> Option<&'static PaletteColor> {
    let wanted = raw.trim();
    PALETTE.iter().find(|color| {
        color.id.eq_ignore_ascii_case(wanted)
            || color.hex.eq_ignore_ascii_case(wanted)
            || color.label_fa == wanted
    })
}

/// Maps user colour input to the value stored in the configuration.
///
/// Palette matches (by id, hex or Persian label) become the palette id; the
/// words `none`/`off` clear the colour; anything else is kept as typed.
pub fn normalize_color(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("none")
        || trimmed.eq_ignore_ascii_case("off")
    {
        return None;
    }
    Some(
        find_color(trimmed)
            .map(|color| color.id.to_string())
            .unwrap_or_else(|| trimmed.to_string()),
    )
}
