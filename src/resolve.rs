//! Virtual-address lookups into initialized program data.

use crate::image::{Image, Section};

/// Longest name read from a descriptor before giving up on finding the terminator.
pub const MAX_CSTR_LEN: usize = 100;

/// Finds the `SHT_PROGBITS` section containing `va`.
///
/// Sections are tried in header order and the first hit wins, so overlapping
/// sections resolve to whichever comes first in the file.
pub fn va_to_section<'i, 'a>(image: &'i Image<'a>, va: u64) -> Option<&'i Section<'a>> {
    image
        .sections
        .iter()
        .find(|s| s.is_progbits() && s.contains(va))
}

/// Bytes of the section containing `va`, starting at `va`.
pub fn bytes_at<'a>(image: &Image<'a>, va: u64) -> Option<&'a [u8]> {
    let sect = va_to_section(image, va)?;
    let offs = usize::try_from(va - sect.addr).ok()?;
    Some(sect.body.get(offs..).unwrap_or(&[]))
}

/// Reads a NUL-terminated string at `va`.
///
/// Returns `None` when `va` is not backed by program data. Without a terminator in
/// the first [`MAX_CSTR_LEN`] bytes (or before the section ends) whatever was read
/// so far is returned.
pub fn read_cstr(image: &Image<'_>, va: u64) -> Option<String> {
    let data = bytes_at(image, va)?;
    let bytes = data
        .iter()
        .take(MAX_CSTR_LEN)
        .take_while(|b| **b != 0)
        .copied()
        .collect::<Vec<_>>();
    Some(String::from_utf8_lossy(&bytes).into_owned())
}
