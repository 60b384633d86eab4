//! Report canvas backed by a printer device context
//!
//! [`Canvas`] exposes the small drawing surface page-oriented report
//! generators expect (text, lines, fonts, page breaks) and forwards
//! every call to a GDI printer device context. Callers draw in points
//! (72 per inch); the context runs in MM_TWIPS (1440 per inch), so
//! every coordinate and size is scaled by a fixed factor of 20 on the
//! way through.

use serde::{Deserialize, Serialize};

#[cfg(windows)]
use crate::directory::default_printer;
#[cfg(windows)]
use crate::error::{PrintError, PrintResult};
#[cfg(windows)]
use crate::font::FontSpec;
#[cfg(windows)]
use crate::pagesetup::{DuplexMode, PageSetup};
#[cfg(windows)]
use std::alloc::{Layout, alloc_zeroed, dealloc};
#[cfg(windows)]
use std::mem::{align_of, size_of};
#[cfg(windows)]
use std::ptr::NonNull;
#[cfg(windows)]
use tracing::{info, instrument, trace, warn};
#[cfg(windows)]
use windows::Win32::Foundation::{COLORREF, GetLastError};
#[cfg(windows)]
use windows::Win32::Graphics::Gdi::{
    CreateDCW, CreateFontIndirectW, CreatePen, DEVMODEW, DM_DUPLEX, DM_ORIENTATION, DM_PAPERSIZE,
    DMDUP_HORIZONTAL, DMDUP_SIMPLEX, DMDUP_VERTICAL, DeleteDC, DeleteObject, HDC, HFONT, HPEN,
    LOGFONTW, LineTo, MM_TWIPS, MoveToEx, PS_SOLID, SelectObject, SetMapMode, TextOutW,
};
#[cfg(windows)]
use windows::Win32::Graphics::Printing::{
    ClosePrinter, DocumentPropertiesW, OpenPrinterW, PRINTER_HANDLE,
};
#[cfg(windows)]
use windows::Win32::Storage::Xps::DOCINFOW;
#[cfg(windows)]
use windows::core::{PCWSTR, PWSTR, w};

#[cfg(windows)]
#[link(name = "gdi32")]
unsafe extern "system" {
    fn AbortDoc(hdc: HDC) -> i32;
    fn EndDoc(hdc: HDC) -> i32;
    fn EndPage(hdc: HDC) -> i32;
    fn StartDocW(hdc: HDC, lpdi: *const DOCINFOW) -> i32;
    fn StartPage(hdc: HDC) -> i32;
}

/// Point-to-device-unit multiplier (MM_TWIPS runs at 1440 units/inch)
pub const SCALE_FACTOR: i32 = 20;

/// Scale a point-denominated value to device units
#[cfg(any(windows, test))]
fn to_device(value: f32) -> i32 {
    (value * SCALE_FACTOR as f32) as i32
}

/// Device coordinates for a text origin; the vertical axis is negated
/// to map bottom-up page coordinates onto MM_TWIPS.
#[cfg(any(windows, test))]
fn text_origin(x: f32, y: f32) -> (i32, i32) {
    (to_device(x), -to_device(y))
}

/// Device coordinates for a line endpoint. Unlike [`text_origin`] the
/// vertical axis is not negated; callers lay out around that asymmetry.
#[cfg(any(windows, test))]
fn line_point(x: f32, y: f32) -> (i32, i32) {
    (to_device(x), to_device(y))
}

/// Print job configuration
///
/// Immutable once the canvas is open.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CanvasOptions {
    /// Target printer; `None` selects the OS default printer
    #[serde(default)]
    pub printer_name: Option<String>,
    /// Paper size catalog key
    #[serde(default = "default_paper_size")]
    pub paper_size: String,
    /// Orientation catalog key
    #[serde(default = "default_orientation")]
    pub orientation: String,
    /// Duplex catalog key; `None` leaves the printer default untouched
    #[serde(default)]
    pub duplex: Option<String>,
    /// Job name shown in the spooler queue
    #[serde(default = "default_doc_name")]
    pub doc_name: String,
}

fn default_paper_size() -> String {
    "letter".to_string()
}

fn default_orientation() -> String {
    "portrait".to_string()
}

fn default_doc_name() -> String {
    "spool-canvas print job".to_string()
}

impl Default for CanvasOptions {
    fn default() -> Self {
        Self {
            printer_name: None,
            paper_size: default_paper_size(),
            orientation: default_orientation(),
            duplex: None,
            doc_name: default_doc_name(),
        }
    }
}

/// Drawing canvas over an open printer device context
///
/// Exclusively owns the device context and the currently selected
/// font and pen. Call [`Canvas::close`] to end the document; a canvas
/// dropped without `close` aborts its spool job instead of leaking it.
#[cfg(windows)]
pub struct Canvas {
    hdc: HDC,
    page_size: (f32, f32),
    font: Option<HFONT>,
    pen: HPEN,
    page: u32,
    doc_started: bool,
}

#[cfg(windows)]
impl Canvas {
    /// Open the printer, configure a device context, and start the document
    ///
    /// Catalog keys are validated before any native call is made.
    #[instrument(skip(options), fields(printer = ?options.printer_name, doc = %options.doc_name))]
    pub fn open(options: &CanvasOptions) -> PrintResult<Self> {
        let setup = PageSetup::resolve(
            &options.paper_size,
            &options.orientation,
            options.duplex.as_deref(),
        )?;

        let printer = match &options.printer_name {
            Some(name) => name.clone(),
            None => default_printer()?,
        };
        info!(printer = %printer, "opening print job");

        let hdc = create_printer_dc(&printer, &setup)?;
        let mut canvas = Self {
            hdc,
            page_size: setup.page_size(),
            font: None,
            pen: HPEN::default(),
            page: 0,
            doc_started: false,
        };

        unsafe {
            if SetMapMode(hdc, MM_TWIPS) == 0 {
                return Err(device_error("SetMapMode"));
            }

            let doc_w = to_wide(&options.doc_name);
            let di = DOCINFOW {
                cbSize: size_of::<DOCINFOW>() as i32,
                lpszDocName: PCWSTR::from_raw(doc_w.as_ptr()),
                ..Default::default()
            };
            if StartDocW(hdc, &di) <= 0 {
                return Err(device_error("StartDocW"));
            }
            canvas.doc_started = true;

            if StartPage(hdc) <= 0 {
                return Err(device_error("StartPage"));
            }
        }

        canvas.set_line_width(1.0)?;
        canvas.page = 1;
        Ok(canvas)
    }

    /// Effective page size in points (swapped for landscape)
    pub fn page_size(&self) -> (f32, f32) {
        self.page_size
    }

    /// Current page number; pages count from 1
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Draw `text` with its baseline-left origin at `(x, y)` points
    pub fn draw_string(&mut self, x: f32, y: f32, text: &str) -> PrintResult<()> {
        let (dx, dy) = text_origin(x, y);
        let wide: Vec<u16> = text.encode_utf16().collect();
        unsafe {
            if !TextOutW(self.hdc, dx, dy, &wide).as_bool() {
                return Err(device_error("TextOutW"));
            }
        }
        Ok(())
    }

    /// Draw a straight segment between two points with the current pen
    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> PrintResult<()> {
        let (dx1, dy1) = line_point(x1, y1);
        let (dx2, dy2) = line_point(x2, y2);
        unsafe {
            if !MoveToEx(self.hdc, dx1, dy1, None).as_bool() {
                return Err(device_error("MoveToEx"));
            }
            if !LineTo(self.hdc, dx2, dy2).as_bool() {
                return Err(device_error("LineTo"));
            }
        }
        Ok(())
    }

    /// Select a font by family name and point size
    ///
    /// A `-Bold` suffix on the family selects bold weight.
    pub fn set_font(&mut self, name: &str, size: f32) -> PrintResult<()> {
        let spec = FontSpec::parse(name);
        unsafe {
            let mut lf = LOGFONTW::default();
            lf.lfHeight = to_device(size);
            lf.lfWeight = spec.weight;
            // lfFaceName holds at most 31 UTF-16 units plus the terminator
            for (dst, src) in lf
                .lfFaceName
                .iter_mut()
                .zip(spec.family.encode_utf16().take(31))
            {
                *dst = src;
            }

            let font = CreateFontIndirectW(&lf);
            if font.is_invalid() {
                return Err(device_error("CreateFontIndirectW"));
            }
            SelectObject(self.hdc, font);
            if let Some(old) = self.font.take() {
                let _ = DeleteObject(old);
            }
            self.font = Some(font);
        }
        Ok(())
    }

    /// Replace the selected pen with a solid pen of the given stroke width
    pub fn set_line_width(&mut self, width: f32) -> PrintResult<()> {
        unsafe {
            let pen = CreatePen(PS_SOLID, to_device(width), COLORREF(0));
            if pen.is_invalid() {
                return Err(device_error("CreatePen"));
            }
            SelectObject(self.hdc, pen);
            if !self.pen.is_invalid() {
                let _ = DeleteObject(self.pen);
            }
            self.pen = pen;
        }
        Ok(())
    }

    /// Stroke color control is not implemented; accepted and ignored
    pub fn set_stroke_gray(&mut self, gray: f32) -> PrintResult<()> {
        trace!(gray, "set_stroke_gray ignored");
        Ok(())
    }

    /// No-op; present to complete the canvas contract
    pub fn save_state(&mut self) -> PrintResult<()> {
        trace!("save_state ignored");
        Ok(())
    }

    /// No-op; present to complete the canvas contract
    pub fn restore_state(&mut self) -> PrintResult<()> {
        trace!("restore_state ignored");
        Ok(())
    }

    /// No-op; present to complete the canvas contract
    pub fn translate(&mut self, dx: f32, dy: f32) -> PrintResult<()> {
        trace!(dx, dy, "translate ignored");
        Ok(())
    }

    /// No-op; present to complete the canvas contract
    pub fn draw_aligned_string(&mut self, x: f32, y: f32, text: &str) -> PrintResult<()> {
        trace!(x, y, text, "draw_aligned_string ignored");
        Ok(())
    }

    /// No-op; present to complete the canvas contract
    pub fn draw_centred_string(&mut self, x: f32, y: f32, text: &str) -> PrintResult<()> {
        trace!(x, y, text, "draw_centred_string ignored");
        Ok(())
    }

    /// No-op; present to complete the canvas contract
    pub fn draw_right_string(&mut self, x: f32, y: f32, text: &str) -> PrintResult<()> {
        trace!(x, y, text, "draw_right_string ignored");
        Ok(())
    }

    /// End the current page and open the next one
    pub fn show_page(&mut self) -> PrintResult<()> {
        if self.page == 0 {
            return Ok(()); // nothing on the page
        }
        unsafe {
            if EndPage(self.hdc) <= 0 {
                return Err(device_error("EndPage"));
            }
            // the context needs an open page for whatever is drawn next
            if StartPage(self.hdc) <= 0 {
                return Err(device_error("StartPage"));
            }
        }
        self.page += 1;
        Ok(())
    }

    /// End the document and release the device context
    ///
    /// Pages reach the spooler through [`Canvas::show_page`]; the empty
    /// page opened by the final `show_page` call is discarded here.
    pub fn close(mut self) -> PrintResult<()> {
        if self.page == 0 {
            return Ok(()); // document was never started
        }
        self.doc_started = false;
        let r = unsafe { EndDoc(self.hdc) };
        if r <= 0 {
            return Err(device_error("EndDoc"));
        }
        info!("print job ended");
        Ok(())
    }
}

#[cfg(windows)]
impl Drop for Canvas {
    fn drop(&mut self) {
        unsafe {
            if self.doc_started {
                warn!("canvas dropped with document open, aborting print job");
                let _ = AbortDoc(self.hdc);
            }
            if let Some(font) = self.font.take() {
                let _ = DeleteObject(font);
            }
            if !self.pen.is_invalid() {
                let _ = DeleteObject(self.pen);
            }
            let _ = DeleteDC(self.hdc);
        }
    }
}

/// Open the named printer, merge the page setup into its default
/// device-mode settings, and create a device context from the result.
///
/// The printer handle is only needed while the settings are negotiated
/// and is closed before this returns.
#[cfg(windows)]
fn create_printer_dc(printer: &str, setup: &PageSetup) -> PrintResult<HDC> {
    unsafe {
        let mut printer_w = to_wide(printer);
        let mut hprinter = PRINTER_HANDLE::default();
        OpenPrinterW(PCWSTR::from_raw(printer_w.as_ptr()), &mut hprinter, None)
            .map_err(|e| PrintError::Device(format!("OpenPrinterW({}): {}", printer, e)))?;
        let _printer_guard = PrinterGuard(hprinter);

        let needed =
            DocumentPropertiesW(None, hprinter, PWSTR(printer_w.as_mut_ptr()), None, None, 0);
        if needed <= 0 {
            return Err(device_error("DocumentPropertiesW"));
        }

        let layout = Layout::from_size_align(needed as usize, align_of::<DEVMODEW>())
            .map_err(|_| PrintError::Device("devmode layout".to_string()))?;
        let raw = alloc_zeroed(layout);
        let ptr =
            NonNull::new(raw).ok_or_else(|| PrintError::Device("devmode alloc".to_string()))?;
        let _devmode_guard = DevModeGuard { ptr, layout };
        let devmode = ptr.as_ptr() as *mut DEVMODEW;

        let r = DocumentPropertiesW(
            None,
            hprinter,
            PWSTR(printer_w.as_mut_ptr()),
            Some(devmode),
            None,
            2,
        );
        if r != 1 {
            return Err(device_error("DocumentPropertiesW"));
        }

        (*devmode).Anonymous1.Anonymous1.dmPaperSize = setup.paper.code;
        (*devmode).Anonymous1.Anonymous1.dmOrientation = setup.orientation.code();
        (*devmode).dmFields |= DM_PAPERSIZE | DM_ORIENTATION;
        if let Some(duplex) = setup.duplex {
            (*devmode).dmDuplex = match duplex {
                DuplexMode::Normal | DuplexMode::NoDuplex => DMDUP_SIMPLEX,
                DuplexMode::LongEdge => DMDUP_VERTICAL,
                DuplexMode::ShortEdge => DMDUP_HORIZONTAL,
            };
            (*devmode).dmFields |= DM_DUPLEX;
        }

        let r = DocumentPropertiesW(
            None,
            hprinter,
            PWSTR(printer_w.as_mut_ptr()),
            Some(devmode),
            Some(devmode),
            10,
        );
        if r != 1 {
            return Err(device_error("DocumentPropertiesW"));
        }

        let hdc = CreateDCW(
            w!("WINSPOOL"),
            PCWSTR::from_raw(printer_w.as_ptr()),
            PCWSTR::null(),
            Some(devmode as *const _),
        );
        if hdc.is_invalid() {
            return Err(device_error("CreateDCW"));
        }
        Ok(hdc)
    }
}

#[cfg(windows)]
struct PrinterGuard(PRINTER_HANDLE);

#[cfg(windows)]
impl Drop for PrinterGuard {
    fn drop(&mut self) {
        unsafe {
            let _ = ClosePrinter(self.0);
        }
    }
}

#[cfg(windows)]
struct DevModeGuard {
    ptr: NonNull<u8>,
    layout: Layout,
}

#[cfg(windows)]
impl Drop for DevModeGuard {
    fn drop(&mut self) {
        unsafe {
            dealloc(self.ptr.as_ptr(), self.layout);
        }
    }
}

#[cfg(windows)]
fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain([0]).collect()
}

#[cfg(windows)]
fn device_error(call: &str) -> PrintError {
    let code = unsafe { GetLastError().0 };
    if code == 0 {
        PrintError::Device(format!("{} failed", call))
    } else {
        PrintError::Device(format!("{} failed (win32 error {})", call, code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_device_scales_by_twenty() {
        assert_eq!(to_device(0.0), 0);
        assert_eq!(to_device(1.0), 20);
        assert_eq!(to_device(36.0), 720);
        assert_eq!(to_device(-10.0), -200);
    }

    #[test]
    fn test_text_origin_negates_vertical_only() {
        assert_eq!(text_origin(72.0, 720.0), (1440, -14400));
        assert_eq!(text_origin(0.0, 0.0), (0, 0));
    }

    #[test]
    fn test_line_point_keeps_both_signs() {
        assert_eq!(line_point(72.0, 720.0), (1440, 14400));
    }

    #[test]
    fn test_options_defaults() {
        let options = CanvasOptions::default();
        assert_eq!(options.printer_name, None);
        assert_eq!(options.paper_size, "letter");
        assert_eq!(options.orientation, "portrait");
        assert_eq!(options.duplex, None);
        assert_eq!(options.doc_name, "spool-canvas print job");
    }

    #[test]
    fn test_options_deserialize_fills_defaults() {
        let options: CanvasOptions =
            serde_json::from_str(r#"{"printer_name": "Office Laser"}"#).unwrap();
        assert_eq!(options.printer_name.as_deref(), Some("Office Laser"));
        assert_eq!(options.paper_size, "letter");
        assert_eq!(options.orientation, "portrait");
    }

    #[test]
    fn test_options_round_trip() {
        let options = CanvasOptions {
            printer_name: Some("Front Desk".to_string()),
            paper_size: "legal".to_string(),
            orientation: "landscape".to_string(),
            duplex: Some("long".to_string()),
            doc_name: "quarterly report".to_string(),
        };
        let json = serde_json::to_string(&options).unwrap();
        let back: CanvasOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(back.printer_name, options.printer_name);
        assert_eq!(back.paper_size, options.paper_size);
        assert_eq!(back.orientation, options.orientation);
        assert_eq!(back.duplex, options.duplex);
        assert_eq!(back.doc_name, options.doc_name);
    }
}
