//! Precondition checks run before any request is sent.
//!
//! Every check fails with [`AccountError::Validation`] naming the field.

use regex::Regex;
use std::fmt::Display;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use url::Url;

use crate::error::{AccountError, Result};

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$")
            .expect("static email pattern")
    })
}

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d+\.\d+\.\d+").expect("static version pattern"))
}

fn segment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9._~-]+$").expect("static segment pattern"))
}

/// Value must contain something other than whitespace
pub fn not_empty(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AccountError::validation(format!("{} cannot be empty", field)));
    }
    Ok(())
}

pub fn positive(value: i64, field: &str) -> Result<()> {
    if value <= 0 {
        return Err(AccountError::validation(format!("{} must be positive", field)));
    }
    Ok(())
}

pub fn not_empty_list<T>(values: &[T], field: &str) -> Result<()> {
    if values.is_empty() {
        return Err(AccountError::validation(format!("{} cannot be empty", field)));
    }
    Ok(())
}

pub fn email(value: &str, field: &str) -> Result<()> {
    not_empty(value, field)?;
    if !email_pattern().is_match(value) {
        return Err(AccountError::validation(format!(
            "{} must be a valid email address",
            field
        )));
    }
    Ok(())
}

/// Value must start with `major.minor.patch`
pub fn version(value: &str, field: &str) -> Result<()> {
    not_empty(value, field)?;
    if !version_pattern().is_match(value) {
        return Err(AccountError::validation(format!(
            "{} must be in semantic versioning format (e.g., 1.0.0)",
            field
        )));
    }
    Ok(())
}

/// Value is placed verbatim in a URL path, so only unreserved characters pass
pub fn path_segment(value: &str, field: &str) -> Result<()> {
    not_empty(value, field)?;
    if !segment_pattern().is_match(value) || value == "." || value == ".." {
        return Err(AccountError::validation(format!(
            "{} may only contain letters, digits and ._~-",
            field
        )));
    }
    Ok(())
}

pub fn file_exists(path: &Path, field: &str) -> Result<()> {
    not_empty(&path.to_string_lossy(), field)?;
    if !path.exists() {
        return Err(AccountError::validation(format!(
            "{} does not exist: {}",
            field,
            path.display()
        )));
    }
    Ok(())
}

/// Path must be a regular file that can be opened for reading
pub fn file_readable(path: &Path, field: &str) -> Result<()> {
    file_exists(path, field)?;
    let readable = path.is_file() && fs::File::open(path).is_ok();
    if !readable {
        return Err(AccountError::validation(format!(
            "{} is not readable: {}",
            field,
            path.display()
        )));
    }
    Ok(())
}

/// Value must be an absolute URL with a host
pub fn url(value: &str, field: &str) -> Result<()> {
    not_empty(value, field)?;
    match Url::parse(value) {
        Ok(parsed) if parsed.has_host() => Ok(()),
        _ => Err(AccountError::validation(format!("{} must be a valid URL", field))),
    }
}

pub fn one_of<T>(value: &T, allowed: &[T], field: &str) -> Result<()>
where
    T: PartialEq + Display,
{
    if allowed.contains(value) {
        return Ok(());
    }
    let allowed = allowed
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    Err(AccountError::validation(format!(
        "{} must be one of: {}",
        field, allowed
    )))
}

/// Character count must lie within `min..=max`
pub fn length(value: &str, min: usize, max: usize, field: &str) -> Result<()> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(AccountError::validation(format!(
            "{} must be between {} and {} characters",
            field, min, max
        )));
    }
    Ok(())
}

/// Image at `path` must be a PNG, GIF or JPEG no larger than the bounds
pub fn image_dimensions(path: &Path, max_width: u32, max_height: u32, field: &str) -> Result<()> {
    file_readable(path, field)?;

    let data = fs::read(path)?;
    let (width, height) = image_size(&data).ok_or_else(|| {
        AccountError::validation(format!("{} is not a valid image file", field))
    })?;

    if width > max_width || height > max_height {
        return Err(AccountError::validation(format!(
            "{} dimensions ({}x{}) exceed maximum allowed ({}x{})",
            field, width, height, max_width, max_height
        )));
    }
    Ok(())
}

/// Read width and height from an image header
pub fn image_size(data: &[u8]) -> Option<(u32, u32)> {
    const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

    if data.starts_with(PNG_SIGNATURE) {
        if data.len() < 24 || &data[12..16] != b"IHDR" {
            return None;
        }
        let width = u32::from_be_bytes(data[16..20].try_into().ok()?);
        let height = u32::from_be_bytes(data[20..24].try_into().ok()?);
        return Some((width, height));
    }

    if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        if data.len() < 10 {
            return None;
        }
        let width = u16::from_le_bytes([data[6], data[7]]) as u32;
        let height = u16::from_le_bytes([data[8], data[9]]) as u32;
        return Some((width, height));
    }

    if data.starts_with(&[0xFF, 0xD8]) {
        return jpeg_size(data);
    }

    None
}

fn jpeg_size(data: &[u8]) -> Option<(u32, u32)> {
    let mut pos = 2;
    while pos + 4 <= data.len() {
        if data[pos] != 0xFF {
            return None;
        }
        let marker = data[pos + 1];
        // fill bytes
        if marker == 0xFF {
            pos += 1;
            continue;
        }
        let segment_len = u16::from_be_bytes([data[pos + 2], data[pos + 3]]) as usize;
        let is_frame = matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC);
        if is_frame {
            if pos + 9 > data.len() {
                return None;
            }
            let height = u16::from_be_bytes([data[pos + 5], data[pos + 6]]) as u32;
            let width = u16::from_be_bytes([data[pos + 7], data[pos + 8]]) as u32;
            return Some((width, height));
        }
        pos += 2 + segment_len;
    }
    None
}
