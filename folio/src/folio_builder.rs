use crate::common::DEFAULT_FIELD_SEPARATOR;
use crate::errors::{FolioError, FolioResult};
use crate::folio::Folio;
use crate::folio_config::FolioConfig;

/// Builder for a [Folio] instance.
///
/// ```rust
/// use folio::Folio;
///
/// let db = Folio::builder().field_separator(":").open().unwrap();
/// assert_eq!(db.config().field_separator(), ":");
/// ```
pub struct FolioBuilder {
    error: Option<FolioError>,
    field_separator: String,
}

impl Default for FolioBuilder {
    fn default() -> Self {
        FolioBuilder::new()
    }
}

impl FolioBuilder {
    pub fn new() -> Self {
        FolioBuilder {
            error: None,
            field_separator: DEFAULT_FIELD_SEPARATOR.to_string(),
        }
    }

    /// Sets the separator used to address embedded fields, `.` by default.
    /// An empty separator makes [`open`](FolioBuilder::open) fail.
    pub fn field_separator(mut self, field_separator: &str) -> Self {
        if self.error.is_none() {
            if let Err(e) = FolioConfig::validate_field_separator(field_separator) {
                self.error = Some(e);
            } else {
                self.field_separator = field_separator.to_string();
            }
        }
        self
    }

    pub fn open(self) -> FolioResult<Folio> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let config = FolioConfig::new(&self.field_separator)?;
        log::info!("Opened folio with field separator '{}'", config.field_separator());
        Ok(Folio::new(config))
    }
}
