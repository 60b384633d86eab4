//! # spool-canvas
//!
//! Report canvas on top of the Windows print spooler.
//!
//! ## Scope
//!
//! This crate handles HOW report pages reach a printer:
//! - A drawing canvas (text, lines, fonts, page breaks) forwarded to a
//!   GDI printer device context
//! - Paper size / orientation / duplex configuration via DEVMODE
//! - Printer discovery (default printer first, the rest alphabetical)
//!
//! Report layout (WHAT to draw where) stays in application code. Font
//! rasterization, spooling, and page rendering stay with the OS.
//!
//! ## Example
//!
//! ```ignore
//! use spool_canvas::{Canvas, CanvasOptions};
//!
//! let options = CanvasOptions {
//!     paper_size: "legal".into(),
//!     orientation: "landscape".into(),
//!     doc_name: "monthly report".into(),
//!     ..Default::default()
//! };
//!
//! let mut canvas = Canvas::open(&options)?;
//! canvas.set_font("Arial-Bold", 12.0)?;
//! canvas.draw_string(72.0, 720.0, "Monthly Report")?;
//! canvas.line(72.0, 712.0, 540.0, 712.0)?;
//! canvas.show_page()?;
//! canvas.close()?;
//! ```

mod canvas;
mod directory;
mod error;
mod font;
mod pagesetup;

// Re-exports
pub use canvas::{CanvasOptions, SCALE_FACTOR};
pub use directory::PrinterInfo;
pub use error::{PrintError, PrintResult};
pub use font::{FontSpec, WEIGHT_BOLD, WEIGHT_NORMAL};
pub use pagesetup::{DuplexMode, Orientation, PAPER_SIZES, PageSetup, PaperSize, paper_size};

#[cfg(windows)]
pub use canvas::Canvas;
#[cfg(windows)]
pub use directory::PrinterDirectory;
