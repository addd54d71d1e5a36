//! Resolution of a composition request into concrete injections.
//!
//! Everything that can fail or warn happens here, before the document is
//! touched: unknown ids abort, missing resources are recorded and skipped.

use std::sync::Arc;

use crate::catalog::{Catalog, LayoutPosition, filter_for_format};
use crate::error::{ConfigurationError, Warning};

use super::CompositionRequest;

/// One effective component and the resources that resolved for it.
#[derive(Debug, Clone)]
pub(crate) struct Injection {
    pub id: &'static str,
    pub position: LayoutPosition,
    pub style: Option<Arc<str>>,
    pub script: Option<Arc<str>>,
    pub markup: Option<Arc<str>>,
}

/// What to inject, in injection order.
#[derive(Debug, Clone)]
pub(crate) struct Plan {
    pub theme_id: &'static str,
    pub theme_style: Option<Arc<str>>,
    pub components: Vec<Injection>,
    /// Escaped JSON for the footer configuration tag
    pub footer_config: Option<String>,
    /// Wrap raw text in CDATA sections
    pub xml_syntax: bool,
    pub warnings: Vec<Warning>,
}

impl Plan {
    pub fn resolve(catalog: &Catalog, request: &CompositionRequest) -> Result<Self, ConfigurationError> {
        let theme = catalog.themes.get(&request.theme)?;
        let mut filtered = filter_for_format(&catalog.components, &request.components, request.format)?;

        let mut warnings = std::mem::take(&mut filtered.notices);
        for notice in &warnings {
            log::warn!("{notice}");
        }
        let mut record = |missing: crate::error::ResourceMissing| {
            log::warn!("{missing}; injection skipped");
            warnings.push(Warning::ResourceMissing(missing));
        };

        let theme_style = catalog.resources.theme_style(theme).map_err(&mut record).ok();

        let mut components = Vec::with_capacity(filtered.components.len());
        for id in &filtered.components {
            let component = catalog.components.get(id)?;
            let style = catalog
                .resources
                .component_style(component)
                .map_err(&mut record)
                .ok();
            let script = catalog
                .resources
                .component_script(component)
                .map_err(&mut record)
                .ok()
                .flatten();
            components.push(Injection {
                id: component.id(),
                position: component.position(),
                style,
                script,
                markup: catalog.resources.component_markup(component),
            });
        }

        let footer_config = filtered
            .contains("footer")
            .then(|| footer_json(request))
            .flatten();

        Ok(Self {
            theme_id: theme.id(),
            theme_style,
            components,
            footer_config,
            xml_syntax: request.format.is_xml_syntax(),
            warnings,
        })
    }

    /// Whether any effective component owns a layout region.
    pub fn has_regions(&self) -> bool {
        self.components.iter().any(|c| c.position.is_region())
    }

    /// Components mounted in `position`, in request order.
    pub fn at(&self, position: LayoutPosition) -> impl Iterator<Item = &Injection> {
        self.components.iter().filter(move |c| c.position == position)
    }
}

/// Footer data as JSON with `&` escaped, so the attribute value holds no
/// character references.
fn footer_json(request: &CompositionRequest) -> Option<String> {
    match serde_json::to_string(&request.footer) {
        Ok(json) => Some(json.replace('&', "\\u0026")),
        Err(e) => {
            log::warn!("cannot serialize footer configuration: {e}");
            None
        }
    }
}
