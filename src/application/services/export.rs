//! Manifest export: strip server-populated fields from YAML documents

use std::io::{Read, Write};

use serde::Deserialize;
use serde_yaml::Value;
use tracing::debug;

use crate::application::{ApplicationResult, IoResultExt};
use crate::domain::export::strip_server_fields;
use crate::domain::DomainError;

const DOCUMENT_SEPARATOR: &[u8] = b"---\n";

/// Read YAML from `input`, write the cleaned documents to `output`.
///
/// Multi-document streams are supported; empty documents are dropped.
pub fn export_manifests<R: Read, W: Write>(mut input: R, mut output: W) -> ApplicationResult<()> {
    let mut content = String::new();
    input
        .read_to_string(&mut content)
        .with_context("read manifests")?;
    if content.trim().is_empty() {
        return Err(DomainError::EmptyInput.into());
    }

    let mut written = 0usize;
    for document in serde_yaml::Deserializer::from_str(&content) {
        let mut value = Value::deserialize(document).map_err(DomainError::from)?;
        if value.is_null() {
            continue;
        }
        strip_server_fields(&mut value);

        let rendered = serde_yaml::to_string(&value).map_err(DomainError::from)?;
        if written > 0 {
            output
                .write_all(DOCUMENT_SEPARATOR)
                .with_context("write manifests")?;
        }
        output
            .write_all(rendered.as_bytes())
            .with_context("write manifests")?;
        written += 1;
    }
    debug!("export_manifests: {} documents", written);

    if written == 0 {
        return Err(DomainError::EmptyInput.into());
    }
    output.flush().with_context("write manifests")
}
