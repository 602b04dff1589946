//! Rendering of parsed targets into source files
//!
//! [`CodeGenerator`] drives the whole pipeline for one run: it prepares
//! targets (default custom tags, interface name normalization, named-type
//! extraction), hoists types shared between targets, and renders module and
//! named-type views through a [`TemplateEngine`].
//!
//! # Output layout
//!
//! When the module output path has no extension it is treated as a
//! directory and every module is rendered into `<moduleName><ext>` inside
//! it. Otherwise all modules are rendered into that single file, with the
//! template receiving an array of module views that carry `last` flags.

mod engine;

pub use engine::{HandlebarsEngine, TemplateEngine};

use crate::error::GenResult;
use crate::ir::{CustomTags, Target, TypeArena};
use crate::named::{
    extract_targets_shared_types, parse_target, CollisionPolicy, NameNormalizer, NamedTypeInfo,
    ParsedTarget, SharedTypes,
};
use crate::serialize::TypePrinter;
use crate::transform::{RenderingLanguage, TypeNameMap, ValueTransformer};
use crate::view::{ModuleView, NamedTypeView};
use std::fs;
use std::path::{Path, PathBuf};
use termcolor::WriteColor;
use tracing::{debug, info};

/// Where and how one set of views is rendered
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub language: RenderingLanguage,
    /// A directory (no extension) or a single output file
    pub output_path: PathBuf,
    pub template_path: PathBuf,
    pub type_name_map: TypeNameMap,
}

impl RenderOptions {
    pub fn new(
        language: RenderingLanguage,
        output_path: impl Into<PathBuf>,
        template_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            language,
            output_path: output_path.into(),
            template_path: template_path.into(),
            type_name_map: TypeNameMap::new(),
        }
    }

    pub fn with_type_name_map(mut self, type_name_map: TypeNameMap) -> Self {
        self.type_name_map = type_name_map;
        self
    }

    fn transformer(&self) -> Box<dyn ValueTransformer> {
        self.language.transformer(self.type_name_map.clone())
    }
}

/// Run-wide settings applied to every target
#[derive(Debug, Clone, Default)]
pub struct GeneratorOptions {
    /// Strip the marker prefix from interface names when set
    pub normalizer: Option<NameNormalizer>,
    /// Tags merged into every module without overriding its own
    pub default_custom_tags: CustomTags,
    pub collision_policy: CollisionPolicy,
}

/// Pipeline driver
pub struct CodeGenerator<E = HandlebarsEngine> {
    options: GeneratorOptions,
    engine: E,
}

impl CodeGenerator<HandlebarsEngine> {
    pub fn new(options: GeneratorOptions) -> Self {
        Self::with_engine(options, HandlebarsEngine::new())
    }
}

impl<E: TemplateEngine> CodeGenerator<E> {
    pub fn with_engine(options: GeneratorOptions, engine: E) -> Self {
        Self { options, engine }
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Prepare a target and extract its named types
    pub fn parse_target(&self, target: Target) -> GenResult<ParsedTarget> {
        let Target {
            mut arena,
            mut modules,
        } = target;

        for module in &mut modules {
            module.apply_default_custom_tags(&self.options.default_custom_tags);
        }

        if let Some(normalizer) = &self.options.normalizer {
            let renamed = normalizer.apply(&mut arena, &modules)?;
            debug!(renamed, marker = %normalizer.marker(), "Normalized interface names");
        }

        parse_target(Target { arena, modules }, self.options.collision_policy)
    }

    /// Hoist named types used by more than one target
    pub fn extract_targets_shared_types(&self, targets: &mut [ParsedTarget]) -> SharedTypes {
        extract_targets_shared_types(targets)
    }

    /// Render every module of a target; returns the written files
    pub fn render_modules(
        &self,
        target: &ParsedTarget,
        options: &RenderOptions,
    ) -> GenResult<Vec<PathBuf>> {
        let transformer = options.transformer();
        let mut views = target
            .modules
            .iter()
            .map(|module| ModuleView::new(module, &target.arena, transformer.as_ref()))
            .collect::<GenResult<Vec<_>>>()?;
        let template = fs::read_to_string(&options.template_path)?;

        let mut written = Vec::new();
        if is_directory_output(&options.output_path) {
            for view in &views {
                let path = options.output_path.join(format!(
                    "{}{}",
                    view.module_name,
                    options.language.file_extension()
                ));
                let code = self.engine.render(&template, &serde_json::to_value(view)?)?;
                write_file(&path, &code)?;
                written.push(path);
            }
        } else {
            let count = views.len();
            for (index, view) in views.iter_mut().enumerate() {
                view.last = Some(index + 1 == count);
            }
            let code = self.engine.render(&template, &serde_json::to_value(&views)?)?;
            write_file(&options.output_path, &code)?;
            written.push(options.output_path.clone());
        }

        info!(
            language = %options.language,
            modules = views.len(),
            files = written.len(),
            "Rendered modules"
        );
        Ok(written)
    }

    /// Render named types into one file
    pub fn render_named_types(
        &self,
        arena: &TypeArena,
        types: &[NamedTypeInfo],
        options: &RenderOptions,
    ) -> GenResult<PathBuf> {
        let transformer = options.transformer();
        let views = types
            .iter()
            .map(|info| NamedTypeView::new(info, arena, transformer.as_ref()))
            .collect::<GenResult<Vec<_>>>()?;
        let template = fs::read_to_string(&options.template_path)?;

        let code = self.engine.render(&template, &serde_json::to_value(&views)?)?;
        write_file(&options.output_path, &code)?;

        info!(
            language = %options.language,
            types = views.len(),
            path = %options.output_path.display(),
            "Rendered named types"
        );
        Ok(options.output_path.clone())
    }

    /// Dump the modules of a target and the types its modules share
    pub fn print_target<W: WriteColor>(&self, target: &ParsedTarget, w: &mut W) -> GenResult<()> {
        let printer = TypePrinter::new(&target.arena);

        writeln!(w, "Modules:\n")?;
        for (index, module) in target.modules.iter().enumerate() {
            if index > 0 {
                writeln!(w)?;
            }
            printer.write_module(w, module)?;
        }
        writeln!(w)?;

        if !target.shared_types.is_empty() {
            writeln!(w, "Target shared types:\n")?;
            write_named_types(&printer, w, &target.shared_types)?;
            writeln!(w)?;
        }
        Ok(())
    }

    /// Dump the types shared between targets
    pub fn print_shared_types<W: WriteColor>(
        &self,
        shared: &SharedTypes,
        w: &mut W,
    ) -> GenResult<()> {
        writeln!(w, "Shared named types:\n")?;
        write_named_types(&TypePrinter::new(&shared.arena), w, &shared.types)
    }
}

fn write_named_types<W: WriteColor>(
    printer: &TypePrinter<'_>,
    w: &mut W,
    types: &[NamedTypeInfo],
) -> GenResult<()> {
    for (index, info) in types.iter().enumerate() {
        if index > 0 {
            writeln!(w)?;
        }
        printer.write_named_type(w, info.id)?;
    }
    Ok(())
}

fn is_directory_output(path: &Path) -> bool {
    path.extension().is_none()
}

fn write_file(path: &Path, content: &str) -> GenResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, content)?;
    debug!(path = %path.display(), bytes = content.len(), "Wrote file");
    Ok(())
}
