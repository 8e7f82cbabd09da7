//! Document templates
//!
//! Templates are plain text (usually LaTeX) with `<<KEY>>` placeholders that
//! are replaced by the template form of each derived value. One template per
//! circuit lives in the templates directory, named after the circuit.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::formula::DerivedValues;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template not found: {} (available: {})", .path.display(), .available.join(", "))]
    NotFound {
        path: PathBuf,
        available: Vec<String>,
    },
    #[error("Failed to read template: {0}")]
    Io(#[from] std::io::Error),
}

/// Replace every `<<KEY>>` with the value's template form. Placeholders with
/// no matching key are left untouched.
pub fn render_template(template: &str, values: &DerivedValues) -> String {
    let mut rendered = template.to_string();
    for (key, value) in values.template_values() {
        rendered = rendered.replace(&format!("<<{}>>", key), &value);
    }
    rendered
}

/// Names of `<<KEY>>` placeholders still present in `text`.
pub fn unresolved_placeholders(text: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find("<<") {
        let after = &rest[start + 2..];
        match after.find(">>") {
            Some(end) => {
                let key = &after[..end];
                if !key.is_empty()
                    && key.chars().all(|c| c.is_alphanumeric() || c == '_')
                    && !found.iter().any(|k| k == key)
                {
                    found.push(key.to_string());
                }
                rest = &after[end + 2..];
            }
            None => break,
        }
    }
    found
}

/// File stem for a circuit name: lowercase, spaces to underscores, Turkish
/// letters transliterated to ASCII.
pub fn file_stem(circuit_type: &str) -> String {
    crate::matcher::normalize::fold_case(circuit_type)
        .chars()
        .map(|c| match c {
            ' ' => '_',
            'ü' => 'u',
            'ğ' => 'g',
            'ş' => 's',
            'ı' => 'i',
            'ö' => 'o',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

/// Template file name for a circuit, e.g. `alcak_geciren_filtre.tex`.
pub fn template_file_name(circuit_type: &str) -> String {
    format!("{}.tex", file_stem(circuit_type))
}

/// A directory of `.tex` templates.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    dir: PathBuf,
}

impl TemplateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, circuit_type: &str) -> PathBuf {
        self.dir.join(template_file_name(circuit_type))
    }

    /// File names of the templates in the directory, sorted.
    pub fn available(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(&self.dir)
            .map(|entries| {
                entries
                    .flatten()
                    .map(|entry| entry.path())
                    .filter(|path| path.extension().map(|e| e == "tex").unwrap_or(false))
                    .filter_map(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()))
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }

    pub fn load(&self, circuit_type: &str) -> Result<String, TemplateError> {
        let path = self.path_for(circuit_type);
        if !path.is_file() {
            return Err(TemplateError::NotFound {
                path,
                available: self.available(),
            });
        }
        Ok(std::fs::read_to_string(&path)?)
    }

    /// Load the circuit's template and fill it with `values`.
    pub fn render(&self, circuit_type: &str, values: &DerivedValues) -> Result<String, TemplateError> {
        let template = self.load(circuit_type)?;
        let rendered = render_template(&template, values);
        let missing = unresolved_placeholders(&rendered);
        if !missing.is_empty() {
            tracing::warn!("Unfilled placeholders in {}: {:?}", circuit_type, missing);
        }
        Ok(rendered)
    }
}
