//! Printer discovery
//!
//! Wraps spooler enumeration in a cached name-to-metadata map so
//! callers never touch the native enumeration APIs. The cache is built
//! lazily on first use and kept until [`PrinterDirectory::rebuild`];
//! printers added or removed after that are not reflected.

use serde::{Deserialize, Serialize};

#[cfg(windows)]
use crate::error::{PrintError, PrintResult};
#[cfg(windows)]
use std::collections::BTreeMap;
#[cfg(windows)]
use tracing::{info, instrument};
#[cfg(windows)]
use windows::Win32::Graphics::Printing::{
    EnumPrintersW, GetDefaultPrinterW, PRINTER_ENUM_CONNECTIONS, PRINTER_ENUM_LOCAL,
    PRINTER_INFO_1W,
};
#[cfg(windows)]
use windows::core::PWSTR;

/// Descriptive record for one installed printer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterInfo {
    /// Spooler attribute flags as reported by enumeration
    pub flags: u32,
    pub description: String,
    pub comment: String,
}

/// Order printer names for presentation: the default printer first,
/// then the remaining names in the order given (callers pass them
/// already sorted ascending).
#[cfg(any(windows, test))]
fn ordered_names<'a>(default: &str, names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut rc = vec![default.to_string()];
    for name in names {
        if name != default {
            rc.push(name.to_string());
        }
    }
    rc
}

/// Cached directory of installed printers
///
/// Construct one per application (or per test); there is no implicit
/// process-wide instance.
#[cfg(windows)]
#[derive(Debug, Default)]
pub struct PrinterDirectory {
    cache: Option<BTreeMap<String, PrinterInfo>>,
}

#[cfg(windows)]
impl PrinterDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-enumerate installed printers, fully replacing the cache
    #[instrument(skip(self))]
    pub fn rebuild(&mut self) -> PrintResult<()> {
        let entries = enumerate_printers()?;
        info!(printers = entries.len(), "printer directory rebuilt");
        self.cache = Some(entries);
        Ok(())
    }

    fn ensure_cache(&mut self) -> PrintResult<&BTreeMap<String, PrinterInfo>> {
        if self.cache.is_none() {
            self.rebuild()?;
        }
        Ok(self.cache.get_or_insert_with(BTreeMap::new))
    }

    /// List printer names: the OS default printer first, then every
    /// other known printer in ascending alphabetical order
    pub fn list(&mut self) -> PrintResult<Vec<String>> {
        let default = default_printer()?;
        let cache = self.ensure_cache()?;
        Ok(ordered_names(&default, cache.keys().map(String::as_str)))
    }

    /// Descriptive record for a single printer
    pub fn describe(&mut self, name: &str) -> PrintResult<PrinterInfo> {
        let cache = self.ensure_cache()?;
        cache
            .get(name)
            .cloned()
            .ok_or_else(|| PrintError::NotFound(name.to_string()))
    }
}

/// Enumerate local and network-connected printers with their
/// descriptive fields (enumeration level 1 carries them).
#[cfg(windows)]
fn enumerate_printers() -> PrintResult<BTreeMap<String, PrinterInfo>> {
    unsafe {
        let flags = PRINTER_ENUM_LOCAL | PRINTER_ENUM_CONNECTIONS;
        let mut needed: u32 = 0;
        let mut returned: u32 = 0;

        let _ = EnumPrintersW(flags, None, 1, None, &mut needed, &mut returned);

        if needed == 0 {
            return Ok(BTreeMap::new());
        }

        let mut buf: Vec<u8> = vec![0; needed as usize];
        EnumPrintersW(
            flags,
            None,
            1,
            Some(buf.as_mut_slice()),
            &mut needed,
            &mut returned,
        )
        .map_err(|e| PrintError::Device(format!("EnumPrintersW: {}", e)))?;

        let ptr = buf.as_ptr() as *const PRINTER_INFO_1W;
        let slice = std::slice::from_raw_parts(ptr, returned as usize);

        let mut directory = BTreeMap::new();
        for info in slice.iter() {
            if info.pName.is_null() {
                continue;
            }
            let name = PWSTR(info.pName.0).to_string().unwrap_or_default();
            directory.insert(
                name,
                PrinterInfo {
                    flags: info.Flags,
                    description: wide_field(info.pDescription),
                    comment: wide_field(info.pComment),
                },
            );
        }

        Ok(directory)
    }
}

#[cfg(windows)]
fn wide_field(value: PWSTR) -> String {
    if value.is_null() {
        String::new()
    } else {
        unsafe { value.to_string().unwrap_or_default() }
    }
}

/// Get the default printer name
#[cfg(windows)]
pub(crate) fn default_printer() -> PrintResult<String> {
    unsafe {
        let mut needed: u32 = 0;
        let _ = GetDefaultPrinterW(None, &mut needed);

        if needed == 0 {
            return Err(PrintError::Device(
                "no default printer configured".to_string(),
            ));
        }

        let mut buf: Vec<u16> = vec![0; needed as usize];
        if !GetDefaultPrinterW(Some(PWSTR(buf.as_mut_ptr())), &mut needed).as_bool() {
            return Err(PrintError::Device(
                "GetDefaultPrinterW failed".to_string(),
            ));
        }

        PWSTR(buf.as_mut_ptr())
            .to_string()
            .map_err(|e| PrintError::Device(format!("UTF-16 decode failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_printer_listed_first() {
        let names = ["Accounting", "Front Desk", "Warehouse"];
        let rc = ordered_names("Front Desk", names.iter().copied());
        assert_eq!(rc, vec!["Front Desk", "Accounting", "Warehouse"]);
    }

    #[test]
    fn test_default_not_duplicated() {
        let names = ["Office"];
        let rc = ordered_names("Office", names.iter().copied());
        assert_eq!(rc, vec!["Office"]);
    }

    #[test]
    fn test_remaining_names_keep_sorted_order() {
        let names = ["a", "b", "c", "d"];
        let rc = ordered_names("c", names.iter().copied());
        assert_eq!(rc, vec!["c", "a", "b", "d"]);
    }

    #[test]
    fn test_default_kept_even_when_not_cached() {
        let names = ["Accounting", "Warehouse"];
        let rc = ordered_names("Front Desk", names.iter().copied());
        assert_eq!(rc, vec!["Front Desk", "Accounting", "Warehouse"]);
    }
}
