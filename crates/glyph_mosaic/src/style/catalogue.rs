//! The face-parsing region catalogue.
//!
//! Ids follow the 19-class face parser used upstream (0 is background, 18 is headwear).
//! Regions 6, 9, 11 and 15 only define symbols; their remaining fields use the fallback values.
//! Region 18 has no entry and resolves to the fallback style.
use crate::style::{
    RegionId, RegionStyle, StyleTable, FALLBACK_BASE_FONT_SIZE, FALLBACK_IMPORTANCE,
    FALLBACK_OPACITY, FALLBACK_STEP_BASE,
};

struct CatalogueEntry {
    id: RegionId,
    key: &'static str,
    symbols: &'static str,
    opacity: u8,
    importance: f32,
    base_font_size: u32,
    step_base: u32,
}

const fn entry(
    id: RegionId,
    key: &'static str,
    symbols: &'static str,
    opacity: u8,
    importance: f32,
    (base_font_size, step_base): (u32, u32),
) -> CatalogueEntry {
    CatalogueEntry {
        id,
        key,
        symbols,
        opacity,
        importance,
        base_font_size,
        step_base,
    }
}

const DEFAULT_STYLE: (u32, u32) = (FALLBACK_BASE_FONT_SIZE, FALLBACK_STEP_BASE);

#[rustfmt::skip]
const FACE_CATALOGUE: [CatalogueEntry; 17] = [
    entry(1,  "skin",   "∂∑√≈∇∞", 153,              1.0,                 (12, 10)),
    entry(2,  "l_brow", "—−≡―∼",  216,              1.1,                 (9, 6)),
    entry(3,  "r_brow", "—−≡―∼",  216,              1.1,                 (9, 6)),
    entry(4,  "l_eye",  "●◉◎○◍",  170,              1.3,                 (9, 5)),
    entry(5,  "r_eye",  "●◉◎○◍",  170,              1.3,                 (9, 5)),
    entry(6,  "eye_g",  "▭▬═≡≣",  FALLBACK_OPACITY, FALLBACK_IMPORTANCE, DEFAULT_STYLE),
    entry(7,  "l_ear",  "∫∮Ωσθ",  191,              1.0,                 (9, 7)),
    entry(8,  "r_ear",  "∫∮Ωσθ",  191,              1.0,                 (9, 7)),
    entry(9,  "ear_r",  "⇔⇒⟹→↠",  FALLBACK_OPACITY, FALLBACK_IMPORTANCE, DEFAULT_STYLE),
    entry(10, "nose",   "|‖∣∥+",  229,              1.0,                 (10, 8)),
    entry(11, "mouth",  "⧉◧◨▣⊞",  FALLBACK_OPACITY, FALLBACK_IMPORTANCE, DEFAULT_STYLE),
    entry(12, "u_lip",  "⌒∩∪⌓∿",  170,              1.2,                 (8, 5)),
    entry(13, "l_lip",  "⌒∩∪⌓∿",  170,              1.2,                 (8, 5)),
    entry(14, "neck",   "∏Πµωφ",  178,              1.0,                 (10, 8)),
    entry(15, "neck_l", "☼✶✷✸✹",  FALLBACK_OPACITY, FALLBACK_IMPORTANCE, DEFAULT_STYLE),
    entry(16, "cloth",  "Σπ∑λΨΩ", 204,              0.9,                 (8, 7)),
    entry(17, "hair",   "Σπ∑λΨΩ", 204,              0.9,                 (8, 7)),
];

/// Region id registered for a catalogue key such as `"skin"` or `"l_eye"`.
pub fn region_id_for_key(key: &str) -> Option<RegionId> {
    FACE_CATALOGUE.iter().find(|e| e.key == key).map(|e| e.id)
}

/// Catalogue key of a region id.
pub fn region_key(id: RegionId) -> Option<&'static str> {
    FACE_CATALOGUE.iter().find(|e| e.id == id).map(|e| e.key)
}

impl StyleTable {
    /// The canonical face-parsing catalogue with the documented fallback.
    pub fn face_catalogue() -> Self {
        FACE_CATALOGUE.iter().fold(StyleTable::new(), |table, e| {
            let style = RegionStyle {
                symbols: e.symbols.chars().collect(),
                opacity: e.opacity,
                importance: e.importance,
                base_font_size: e.base_font_size,
                step_base: e.step_base,
            };
            table.with_named_style(e.id, e.key, style)
        })
    }
}
