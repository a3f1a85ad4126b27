//! Filter parameter-string parsing.
//!
//! Filter instances carry their tuning as a compact `key=value:key=value`
//! string. Parsing is tolerant: unknown keys are ignored and unparseable
//! values keep their defaults.

/// Chroma-key tuning.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChromaKeyParams {
    /// Key color in normalized 0-1 RGB.
    pub key: [f64; 3],
    /// Color-distance threshold below which pixels turn transparent.
    pub threshold: f64,
}

impl Default for ChromaKeyParams {
    fn default() -> Self {
        Self {
            key: [0.0, 0.0, 0.0],
            threshold: 0.5,
        }
    }
}

/// Blur tuning shared by the box and radial kernels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BlurParams {
    /// Spread factor; 0 leaves the frame untouched.
    pub factor: f64,
}

fn pairs(value: &str) -> impl Iterator<Item = (&str, &str)> {
    value
        .split(':')
        .filter_map(|item| item.split_once('='))
        .map(|(k, v)| (k.trim(), v.trim()))
}

/// Leading-integer parse (`"12px"` -> 12), mirroring how the authoring UI
/// wrote these values.
fn int_prefix(s: &str) -> Option<f64> {
    let s = s.trim();
    let digits: String = s
        .char_indices()
        .take_while(|&(i, c)| c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+')))
        .map(|(_, c)| c)
        .collect();
    digits.parse::<i64>().ok().map(|v| v as f64)
}

/// Parse chroma-key parameters: `r=..:g=..:b=..:f=..` with RGB in 0-255.
pub fn parse_chroma_key(value: &str) -> ChromaKeyParams {
    let mut out = ChromaKeyParams::default();
    for (key, val) in pairs(value) {
        let Ok(num) = val.parse::<f64>() else {
            continue;
        };
        match key {
            "r" => out.key[0] = num / 255.0,
            "g" => out.key[1] = num / 255.0,
            "b" => out.key[2] = num / 255.0,
            "f" => out.threshold = num,
            _ => {}
        }
    }
    out
}

/// Parse blur parameters: `f=..` with an integer factor.
pub fn parse_blur(value: &str) -> BlurParams {
    let mut out = BlurParams::default();
    for (key, val) in pairs(value) {
        if key == "f"
            && let Some(num) = int_prefix(val)
        {
            out.factor = num;
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/filter/params.rs"]
mod tests;
