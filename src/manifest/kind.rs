use crate::manifest::err::ManifestError;

/// What an asset file is, as decided by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Script,
    Style,
    RasterImage,
    IconImage,
    /// Known to be skippable, e.g. source maps.
    Ignored,
}

impl Category {
    /// Classify a file by the text after the final `.` in its name.
    ///
    /// The four served categories take priority over the ignore list;
    /// everything else is an `UnknownAssetType`.
    pub fn classify(file_name: &str, ignored: &[String]) -> Result<Self, ManifestError> {
        let ext = extension(file_name);
        match ext {
            Some("css") => Ok(Category::Style),
            Some("js") => Ok(Category::Script),
            Some("png") => Ok(Category::RasterImage),
            Some("ico") => Ok(Category::IconImage),
            Some(ext) if ignored.iter().any(|i| i == ext) => Ok(Category::Ignored),
            _ => Err(ManifestError::UnknownAssetType {
                file_name: file_name.to_string(),
            }),
        }
    }

    pub fn mime_type(self) -> Option<&'static str> {
        match self {
            Category::Style => Some("text/css"),
            Category::Script => Some("text/javascript"),
            Category::RasterImage => Some("image/png"),
            Category::IconImage => Some("image/ico"),
            Category::Ignored => None,
        }
    }

    /// Text categories are embedded as `&str` and must be UTF-8.
    pub fn is_text(self) -> bool {
        matches!(self, Category::Script | Category::Style)
    }
}

fn extension(file_name: &str) -> Option<&str> {
    file_name.rsplit_once('.').map(|(_, ext)| ext)
}
