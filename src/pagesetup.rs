//! Paper size, orientation, and duplex catalogs
//!
//! Keys are the names report code passes in; codes are the DEVMODE
//! identifiers the spooler understands. Paper dimensions are portrait
//! points (72 per inch) before any orientation adjustment.

use crate::error::{PrintError, PrintResult};

/// A catalog paper size
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaperSize {
    pub name: &'static str,
    /// DEVMODE dmPaperSize identifier
    pub code: i16,
    /// Portrait width in points
    pub width: f32,
    /// Portrait height in points
    pub height: f32,
}

impl PaperSize {
    const fn new(name: &'static str, code: i16, width: f32, height: f32) -> Self {
        Self {
            name,
            code,
            width,
            height,
        }
    }
}

/// Supported paper sizes
pub const PAPER_SIZES: &[PaperSize] = &[
    PaperSize::new("letter", 1, 612.0, 792.0),
    PaperSize::new("lettersmall", 2, 612.0, 792.0),
    PaperSize::new("tabloid", 3, 792.0, 1224.0),
    PaperSize::new("ledger", 4, 1224.0, 792.0),
    PaperSize::new("legal", 5, 612.0, 1008.0),
    PaperSize::new("statement", 6, 396.0, 612.0),
    PaperSize::new("executive", 7, 522.0, 756.0),
    PaperSize::new("a3", 8, 842.0, 1191.0),
    PaperSize::new("a4", 9, 595.0, 842.0),
    PaperSize::new("a5", 11, 420.0, 595.0),
];

/// Look up a paper size by catalog key
pub fn paper_size(name: &str) -> PrintResult<&'static PaperSize> {
    PAPER_SIZES
        .iter()
        .find(|p| p.name == name)
        .ok_or_else(|| PrintError::InvalidConfig(format!("Unknown paper size: {}", name)))
}

/// Page orientation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    /// Look up an orientation by catalog key
    pub fn parse(name: &str) -> PrintResult<Self> {
        match name {
            "portrait" => Ok(Self::Portrait),
            "landscape" => Ok(Self::Landscape),
            other => Err(PrintError::InvalidConfig(format!(
                "Unknown orientation: {}",
                other
            ))),
        }
    }

    /// DEVMODE dmOrientation identifier
    pub fn code(self) -> i16 {
        match self {
            Self::Portrait => 1,
            Self::Landscape => 2,
        }
    }
}

/// Duplex mode
///
/// `Normal` and `NoDuplex` both select single-sided output; they are
/// distinct keys in the catalog for compatibility with existing caller
/// configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DuplexMode {
    Normal,
    NoDuplex,
    LongEdge,
    ShortEdge,
}

impl DuplexMode {
    /// Look up a duplex mode by catalog key
    pub fn parse(name: &str) -> PrintResult<Self> {
        match name {
            "normal" => Ok(Self::Normal),
            "none" => Ok(Self::NoDuplex),
            "long" => Ok(Self::LongEdge),
            "short" => Ok(Self::ShortEdge),
            other => Err(PrintError::InvalidConfig(format!(
                "Unknown duplex mode: {}",
                other
            ))),
        }
    }
}

/// Resolved page configuration for one print job
#[derive(Clone, Copy, Debug)]
pub struct PageSetup {
    pub paper: &'static PaperSize,
    pub orientation: Orientation,
    /// `None` leaves the printer's default duplex behavior untouched
    pub duplex: Option<DuplexMode>,
}

impl PageSetup {
    /// Validate catalog keys and resolve them to native identifiers
    pub fn resolve(paper: &str, orientation: &str, duplex: Option<&str>) -> PrintResult<Self> {
        Ok(Self {
            paper: paper_size(paper)?,
            orientation: Orientation::parse(orientation)?,
            duplex: duplex.map(DuplexMode::parse).transpose()?,
        })
    }

    /// Effective page size in points, width/height swapped for landscape
    pub fn page_size(&self) -> (f32, f32) {
        match self.orientation {
            Orientation::Portrait => (self.paper.width, self.paper.height),
            Orientation::Landscape => (self.paper.height, self.paper.width),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_catalog_key_resolves() {
        for paper in PAPER_SIZES {
            for orientation in ["portrait", "landscape"] {
                for duplex in [None, Some("normal"), Some("none"), Some("long"), Some("short")]
                {
                    let setup = PageSetup::resolve(paper.name, orientation, duplex);
                    assert!(setup.is_ok(), "{} / {} / {:?}", paper.name, orientation, duplex);
                }
            }
        }
    }

    #[test]
    fn test_unknown_paper_size_is_invalid_config() {
        let err = PageSetup::resolve("quarto", "portrait", None).unwrap_err();
        assert!(matches!(err, PrintError::InvalidConfig(_)));
        assert!(err.to_string().contains("quarto"));
    }

    #[test]
    fn test_unknown_orientation_is_invalid_config() {
        let err = PageSetup::resolve("letter", "sideways", None).unwrap_err();
        assert!(matches!(err, PrintError::InvalidConfig(_)));
        assert!(err.to_string().contains("sideways"));
    }

    #[test]
    fn test_unknown_duplex_is_invalid_config() {
        let err = PageSetup::resolve("letter", "portrait", Some("booklet")).unwrap_err();
        assert!(matches!(err, PrintError::InvalidConfig(_)));
        assert!(err.to_string().contains("booklet"));
    }

    #[test]
    fn test_portrait_keeps_catalog_dimensions() {
        let setup = PageSetup::resolve("legal", "portrait", None).unwrap();
        assert_eq!(setup.page_size(), (612.0, 1008.0));
    }

    #[test]
    fn test_landscape_swaps_dimensions() {
        let setup = PageSetup::resolve("legal", "landscape", None).unwrap();
        assert_eq!(setup.page_size(), (1008.0, 612.0));
    }

    #[test]
    fn test_duplex_codes() {
        assert_eq!(DuplexMode::parse("normal").unwrap(), DuplexMode::Normal);
        assert_eq!(DuplexMode::parse("none").unwrap(), DuplexMode::NoDuplex);
        assert_eq!(DuplexMode::parse("long").unwrap(), DuplexMode::LongEdge);
        assert_eq!(DuplexMode::parse("short").unwrap(), DuplexMode::ShortEdge);
    }

    #[test]
    fn test_ledger_is_tabloid_rotated() {
        let tabloid = paper_size("tabloid").unwrap();
        let ledger = paper_size("ledger").unwrap();
        assert_eq!((tabloid.width, tabloid.height), (ledger.height, ledger.width));
    }
}
