//! Font selection names
//!
//! The canvas contract encodes bold as a `-Bold` suffix on the family
//! name rather than a separate style parameter, so `"Arial-Bold"` is
//! the bold variant of `"Arial"`.

/// LOGFONT weight for regular text
pub const WEIGHT_NORMAL: i32 = 400;

/// LOGFONT weight for bold text
pub const WEIGHT_BOLD: i32 = 700;

/// A parsed font request: family name plus LOGFONT weight
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontSpec {
    pub family: String,
    pub weight: i32,
}

impl FontSpec {
    /// Split a `-Bold`-suffixed family name into family and weight
    pub fn parse(name: &str) -> Self {
        match name.strip_suffix("-Bold") {
            Some(family) => Self {
                family: family.to_string(),
                weight: WEIGHT_BOLD,
            },
            None => Self {
                family: name.to_string(),
                weight: WEIGHT_NORMAL,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_family_is_normal_weight() {
        let spec = FontSpec::parse("Arial");
        assert_eq!(spec.family, "Arial");
        assert_eq!(spec.weight, WEIGHT_NORMAL);
    }

    #[test]
    fn test_bold_suffix_is_stripped() {
        let spec = FontSpec::parse("Arial-Bold");
        assert_eq!(spec.family, "Arial");
        assert_eq!(spec.weight, WEIGHT_BOLD);
    }

    #[test]
    fn test_multi_word_family() {
        let spec = FontSpec::parse("Courier New-Bold");
        assert_eq!(spec.family, "Courier New");
        assert_eq!(spec.weight, WEIGHT_BOLD);
    }

    #[test]
    fn test_suffix_only_in_middle_is_kept() {
        let spec = FontSpec::parse("Arial-Bold Condensed");
        assert_eq!(spec.family, "Arial-Bold Condensed");
        assert_eq!(spec.weight, WEIGHT_NORMAL);
    }
}
