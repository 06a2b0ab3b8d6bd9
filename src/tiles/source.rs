use crate::core::geo::TileCoord;

/// Anything that can produce tile URLs for a given coordinate.
pub trait TileSource: Send + Sync {
    /// Build a URL for the requested `coord`.
    fn url(&self, coord: TileCoord) -> String;
}

/// A fixed URL template with `{z}`, `{x}` and `{y}` placeholders. Mostly
/// useful for pointing the viewer at a local tile server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSource {
    template: String,
}

impl TemplateSource {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }
}

impl TileSource for TemplateSource {
    fn url(&self, coord: TileCoord) -> String {
        self.template
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_source() {
        let source = TemplateSource::new("http://localhost:8080/{z}/{x}/{y}.png");
        assert_eq!(
            source.url(TileCoord::new(2, 3, 4)),
            "http://localhost:8080/4/2/3.png"
        );
    }
}
