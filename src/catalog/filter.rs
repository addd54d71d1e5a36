//! Format compatibility filtering.
//!
//! Narrows a requested component list to the components that make sense for
//! an output format, through the registry's explicit substitution table.

use crate::error::{ConfigurationError, Warning};
use crate::format::OutputFormat;

use super::ComponentRegistry;

/// Components effective for one format.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filtered {
    /// Effective component ids, distinct, in request order
    pub components: Vec<String>,
    /// Substitutions and drops, in request order
    pub notices: Vec<Warning>,
}

impl Filtered {
    /// Check if `id` survived filtering.
    pub fn contains(&self, id: &str) -> bool {
        self.components.iter().any(|c| c == id)
    }
}

/// Filter `requested` for `format`.
///
/// Unknown ids fail the whole request. Duplicates collapse to their first
/// occurrence, and a substitute already present is not added twice.
pub fn filter_for_format<S: AsRef<str>>(
    registry: &ComponentRegistry,
    requested: &[S],
    format: OutputFormat,
) -> Result<Filtered, ConfigurationError> {
    let family = format.family();
    let mut out = Filtered::default();

    for id in requested {
        let component = registry.get(id.as_ref())?;

        if component.supports(family) {
            push_distinct(&mut out.components, component.id());
            continue;
        }

        match registry.substitute_for(component.id(), family) {
            Some(substitute) if substitute.supports(family) => {
                out.notices.push(Warning::Substituted {
                    component: component.id().to_string(),
                    substitute: substitute.id().to_string(),
                    format,
                });
                push_distinct(&mut out.components, substitute.id());
            }
            _ => out.notices.push(Warning::FormatIncompatibility {
                component: component.id().to_string(),
                format,
            }),
        }
    }

    Ok(out)
}

fn push_distinct(list: &mut Vec<String>, id: &str) {
    if !list.iter().any(|c| c == id) {
        list.push(id.to_string());
    }
}
