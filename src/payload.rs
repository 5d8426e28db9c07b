//! The multipart body handed to the transport.
//!
//! A [`MultipartPayload`] is plain data: an ordered list of text fields and
//! an ordered list of named file parts. Composers build one, tests inspect
//! it, and [`crate::transport::Transport`] turns it into a reqwest form only
//! at send time.

use crate::error::GotenbergError;
use crate::files::FilePart;
use crate::options::ConversionOptions;
use reqwest::multipart::Form;

/// Name Gotenberg expects for every uploaded file.
pub const FILES_FIELD: &str = "files";

/// Ordered text fields plus ordered file parts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartPayload {
    fields: Vec<(String, String)>,
    files: Vec<(String, FilePart)>,
}

impl MultipartPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Append a field whose value is JSON-encoded first (arrays, objects).
    pub fn json_field(
        self,
        name: impl Into<String>,
        value: &serde_json::Value,
    ) -> Self {
        self.field(name, value.to_string())
    }

    /// Append every built option in its stable order.
    pub fn options(mut self, options: ConversionOptions) -> Self {
        self.fields.extend(options);
        self
    }

    /// Append a file under the `files` field name.
    pub fn file(mut self, part: FilePart) -> Self {
        self.files.push((FILES_FIELD.to_string(), part));
        self
    }

    pub fn files(mut self, parts: impl IntoIterator<Item = FilePart>) -> Self {
        self.files
            .extend(parts.into_iter().map(|p| (FILES_FIELD.to_string(), p)));
        self
    }

    pub fn text_fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn file_parts(&self) -> &[(String, FilePart)] {
        &self.files
    }

    /// Value of the first field named `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Filenames of the file parts, in order.
    pub fn filenames(&self) -> Vec<String> {
        self.files.iter().map(|(_, p)| p.filename()).collect()
    }

    /// Build the reqwest form: text fields first, then files.
    pub(crate) async fn into_form(self) -> Result<Form, GotenbergError> {
        let mut form = Form::new();
        for (name, value) in self.fields {
            form = form.text(name, value);
        }
        for (name, part) in self.files {
            form = form.part(name, part.into_part().await?);
        }
        Ok(form)
    }
}
