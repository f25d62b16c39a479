//! Multipart form collection shared by every generation endpoint.
//!
//! Each endpoint accepts multipart form data: text parameters plus an
//! optional `file` upload. The collector drains the whole body once, then
//! hands out typed getters with defaults; parse failures surface as
//! [`CoreError::Validation`] so they map to 400 like any other bad input.

use std::collections::HashMap;
use std::str::FromStr;

use axum::extract::Multipart;

use cre8_core::error::CoreError;

use crate::error::{AppError, AppResult};

/// All fields of one multipart request body.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    file: Option<Vec<u8>>,
}

/// Drain `multipart` into a [`FormData`].
///
/// Any part carrying a filename (conventionally named `file`) is treated as
/// the upload; everything else is read as UTF-8 text.
pub async fn collect(mut multipart: Multipart) -> AppResult<FormData> {
    let mut form = FormData::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if field.file_name().is_some() || name == "file" {
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            form.file = Some(data.to_vec());
        } else {
            let text = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            form.fields.insert(name, text);
        }
    }

    Ok(form)
}

impl FormData {
    /// A required text field; missing or empty fails validation.
    pub fn required(&self, name: &str) -> AppResult<&str> {
        match self.fields.get(name).map(String::as_str) {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(CoreError::Validation(format!("missing required field '{name}'")).into()),
        }
    }

    /// An optional text field with a default.
    pub fn text_or(&self, name: &str, default: &str) -> String {
        self.fields
            .get(name)
            .filter(|v| !v.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    /// An optional numeric field, parsed when present.
    pub fn parse_opt<T: FromStr>(&self, name: &str) -> AppResult<Option<T>> {
        match self.fields.get(name) {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
                CoreError::Validation(format!("field '{name}' has invalid value '{raw}'")).into()
            }),
        }
    }

    /// An optional numeric field with a default.
    pub fn parse_or<T: FromStr>(&self, name: &str, default: T) -> AppResult<T> {
        Ok(self.parse_opt(name)?.unwrap_or(default))
    }

    /// The uploaded file, required.
    pub fn required_file(&self) -> AppResult<&[u8]> {
        self.file
            .as_deref()
            .filter(|f| !f.is_empty())
            .ok_or_else(|| CoreError::Validation("missing required file upload".into()).into())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn form(fields: &[(&str, &str)], file: Option<&[u8]>) -> FormData {
        FormData {
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            file: file.map(|f| f.to_vec()),
        }
    }

    #[test]
    fn required_rejects_missing_and_empty() {
        let f = form(&[("prompt", "  ")], None);
        assert!(f.required("prompt").is_err());
        assert!(f.required("other").is_err());
        let f = form(&[("prompt", "cat")], None);
        assert_eq!(f.required("prompt").unwrap(), "cat");
    }

    #[test]
    fn text_or_falls_back_on_missing_or_blank() {
        let f = form(&[("negative_prompt", "")], None);
        assert_eq!(f.text_or("negative_prompt", "blurry"), "blurry");
        assert_eq!(f.text_or("nothing", "x"), "x");
    }

    #[test]
    fn parse_or_uses_default_and_rejects_garbage() {
        let f = form(&[("steps", "25"), ("bad", "abc")], None);
        assert_eq!(f.parse_or::<u32>("steps", 50).unwrap(), 25);
        assert_eq!(f.parse_or::<u32>("missing", 50).unwrap(), 50);
        assert!(f.parse_or::<u32>("bad", 50).is_err());
    }

    #[test]
    fn parse_opt_treats_blank_as_absent() {
        let f = form(&[("seed", "")], None);
        assert_eq!(f.parse_opt::<u64>("seed").unwrap(), None);
    }

    #[test]
    fn required_file_rejects_absent_and_empty() {
        assert!(form(&[], None).required_file().is_err());
        assert!(form(&[], Some(b"")).required_file().is_err());
        assert_eq!(form(&[], Some(b"png")).required_file().unwrap(), b"png");
    }
}
