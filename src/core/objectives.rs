use crate::core::resolver;
use crate::core::template_loader::TemplateLoader;
use crate::domain::model::{ObjectiveTemplate, ResolvedObjective, StructureSet};
use crate::domain::ports::Notifier;
use crate::utils::error::Result;
use std::path::Path;

/// Pairs each template, in order, with the structure it resolves to.
pub fn resolve_objectives(
    templates: Vec<ObjectiveTemplate>,
    structure_set: Option<&StructureSet>,
) -> Vec<ResolvedObjective> {
    templates
        .into_iter()
        .map(|template| {
            let structure = structure_set.and_then(|ss| {
                resolver::resolve(
                    ss,
                    &template.template_id,
                    &template.template_aliases,
                    &template.template_codes,
                )
                .cloned()
            });
            ResolvedObjective {
                template,
                structure,
            }
        })
        .collect()
}

/// Load a constraint template and resolve it against a structure set.
pub struct ObjectivePipeline<'a> {
    loader: TemplateLoader<'a>,
}

impl<'a> ObjectivePipeline<'a> {
    pub fn new(notifier: &'a dyn Notifier) -> Self {
        Self {
            loader: TemplateLoader::new(notifier),
        }
    }

    pub fn run<P: AsRef<Path>>(
        &self,
        template_path: P,
        structure_set: Option<&StructureSet>,
    ) -> Result<Vec<ResolvedObjective>> {
        let templates = self.loader.load(template_path)?;
        let resolved = resolve_objectives(templates, structure_set);

        let matched = resolved.iter().filter(|r| r.structure.is_some()).count();
        tracing::info!(
            "🎯 Resolved {} of {} objectives to structures",
            matched,
            resolved.len()
        );
        for unresolved in resolved.iter().filter(|r| r.structure.is_none()) {
            tracing::debug!("No structure found for {}", unresolved.template.template_id);
        }

        Ok(resolved)
    }
}
