//! Format-keyed registries for data importers and exporters.

use std::collections::BTreeMap;
use std::path::Path;

use cs_core::{SignalSample, SimResult};

/// Samples read from an external file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedDataset {
    pub name: String,
    pub samples: Vec<SignalSample>,
}

pub trait DataImporter: Send {
    fn format(&self) -> &str;

    /// Whether this importer can read the file at `path`.
    fn supports(&self, path: &Path) -> bool;

    fn import_from(&self, path: &Path) -> SimResult<ImportedDataset>;
}

pub trait DataExporter: Send {
    fn format(&self) -> &str;

    fn export_to(&self, path: &Path, samples: &[SignalSample]) -> SimResult<()>;
}

/// Importers by format. Registering a format twice keeps the later one.
#[derive(Default)]
pub struct ImporterRegistry {
    importers: BTreeMap<String, Box<dyn DataImporter>>,
}

impl ImporterRegistry {
    pub fn register(&mut self, importer: Box<dyn DataImporter>) {
        let format = importer.format().to_string();
        tracing::debug!(format = %format, "registered importer");
        self.importers.insert(format, importer);
    }

    /// Registered formats, sorted.
    pub fn formats(&self) -> Vec<String> {
        self.importers.keys().cloned().collect()
    }

    pub fn find_by_format(&self, format: &str) -> Option<&dyn DataImporter> {
        self.importers.get(format).map(|importer| importer.as_ref())
    }

    /// First importer, in format order, that accepts `path`.
    pub fn find_for_path(&self, path: &Path) -> Option<&dyn DataImporter> {
        self.importers
            .values()
            .find(|importer| importer.supports(path))
            .map(|importer| importer.as_ref())
    }
}

#[derive(Default)]
pub struct ExporterRegistry {
    exporters: BTreeMap<String, Box<dyn DataExporter>>,
}

impl ExporterRegistry {
    pub fn register(&mut self, exporter: Box<dyn DataExporter>) {
        let format = exporter.format().to_string();
        tracing::debug!(format = %format, "registered exporter");
        self.exporters.insert(format, exporter);
    }

    pub fn formats(&self) -> Vec<String> {
        self.exporters.keys().cloned().collect()
    }

    pub fn find_by_format(&self, format: &str) -> Option<&dyn DataExporter> {
        self.exporters.get(format).map(|exporter| exporter.as_ref())
    }
}

/// Case-insensitive extension check shared by the built-in importers.
pub(crate) fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}
