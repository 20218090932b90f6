use std::collections::HashMap;
use std::str::FromStr;

use axum::extract::Multipart;
use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::features::media::dtos::ImageUpload;

/// Text fields plus an optional image read from a `multipart/form-data` body
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    image: Option<ImageUpload>,
}

impl FormData {
    /// Drain a multipart body. The part named `image_field` is treated as the
    /// file upload and validated; every other part is read as text.
    pub async fn read(mut multipart: Multipart, image_field: &str) -> Result<Self> {
        let mut form = FormData::default();

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            debug!("Failed to read multipart field: {}", e);
            AppError::BadRequest(format!("Failed to read multipart data: {}", e))
        })? {
            let field_name = field.name().unwrap_or("").to_string();

            if field_name == image_field {
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let file_name = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "unnamed".to_string());

                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read file bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read file data: {}", e))
                })?;

                // Browsers submit an empty part when no file was picked
                if data.is_empty() {
                    continue;
                }

                let upload = ImageUpload {
                    data: data.to_vec(),
                    content_type,
                    file_name,
                };
                upload.validate()?;
                form.image = Some(upload);
            } else if !field_name.is_empty() {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read {} field: {}", field_name, e))
                })?;
                form.fields.insert(field_name, text);
            }
        }

        Ok(form)
    }

    /// Trimmed value of a text field, `None` when absent or blank
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn parse<T: FromStr>(&self, name: &str) -> Result<Option<T>> {
        match self.text(name) {
            Some(raw) => raw
                .parse::<T>()
                .map(Some)
                .map_err(|_| AppError::Validation(format!("Invalid value for {}", name))),
            None => Ok(None),
        }
    }

    pub fn take_image(&mut self) -> Option<ImageUpload> {
        self.image.take()
    }

    #[cfg(test)]
    pub fn from_fields(fields: &[(&str, &str)], image: Option<ImageUpload>) -> Self {
        FormData {
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            image,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_ignores_blank_values() {
        let form = FormData::from_fields(
            &[("description", "   "), ("category", " Road Hazards ")],
            None,
        );
        assert_eq!(form.text("description"), None);
        assert_eq!(form.text("category"), Some("Road Hazards"));
        assert_eq!(form.text("missing"), None);
    }

    #[test]
    fn test_parse_reports_field_name() {
        let form = FormData::from_fields(&[("location_lat", "north")], None);
        let err = form.parse::<f64>("location_lat").unwrap_err();
        assert!(err.to_string().contains("location_lat"));

        let form = FormData::from_fields(&[("location_lat", "32.08")], None);
        assert_eq!(form.parse::<f64>("location_lat").unwrap(), Some(32.08));
    }
}
