//! Run configuration parsed from `hostgen.toml`
//!
//! ```toml
//! drop_interface_prefix = true
//! collision_policy = "keep_first"
//!
//! [default_custom_tags]
//! platform = "mobile"
//!
//! [[targets]]
//! name = "ios"
//! schema = "schema/ios.json"
//! language = "swift"
//! output = "generated/ios"
//! template = "templates/swift-module.hbs"
//!
//! [targets.types]
//! output = "generated/ios/Types.swift"
//! template = "templates/swift-types.hbs"
//!
//! [shared]
//! language = "kotlin"
//! output = "generated/shared/SharedTypes.kt"
//! template = "templates/kotlin-types.hbs"
//! ```
//!
//! Relative paths are resolved against the directory of the config file.

use crate::error::{GenError, GenResult};
use crate::ir::CustomTags;
use crate::named::{CollisionPolicy, NameNormalizer};
use crate::render::{GeneratorOptions, RenderOptions};
use crate::transform::{RenderingLanguage, TypeNameMap};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    /// Strip the `I` prefix from interface names
    #[serde(default)]
    pub drop_interface_prefix: bool,
    #[serde(default)]
    pub collision_policy: CollisionPolicy,
    #[serde(default)]
    pub default_custom_tags: CustomTags,
    #[serde(default)]
    pub targets: Vec<TargetConfig>,
    /// Where types used by several targets are rendered
    pub shared: Option<SharedConfig>,
}

/// Output file and template of one render step
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub output: PathBuf,
    pub template: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    pub name: String,
    /// JSON schema document describing the target's modules
    pub schema: PathBuf,
    pub language: RenderingLanguage,
    /// Module output directory or file
    pub output: PathBuf,
    pub template: PathBuf,
    #[serde(default)]
    pub type_name_map: TypeNameMap,
    /// Where types shared by several modules of this target are rendered
    pub types: Option<OutputConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SharedConfig {
    pub language: RenderingLanguage,
    pub output: PathBuf,
    pub template: PathBuf,
    #[serde(default)]
    pub type_name_map: TypeNameMap,
}

impl GeneratorConfig {
    /// Load a config file, resolving its relative paths
    pub fn from_path(path: impl AsRef<Path>) -> GenResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            GenError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let mut config = Self::from_toml_str(&content)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    /// Parse and validate config text; paths are left as written
    pub fn from_toml_str(content: &str) -> GenResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> GenResult<()> {
        if self.targets.is_empty() {
            return Err(GenError::config("at least one [[targets]] entry is required"));
        }
        let mut names = HashSet::new();
        for target in &self.targets {
            if !names.insert(target.name.as_str()) {
                return Err(GenError::config(format!(
                    "duplicate target name `{}`",
                    target.name
                )));
            }
        }
        Ok(())
    }

    /// Rebase every relative path onto `base`
    pub fn resolve_paths(&mut self, base: &Path) {
        for target in &mut self.targets {
            rebase(&mut target.schema, base);
            rebase(&mut target.output, base);
            rebase(&mut target.template, base);
            if let Some(types) = &mut target.types {
                rebase(&mut types.output, base);
                rebase(&mut types.template, base);
            }
        }
        if let Some(shared) = &mut self.shared {
            rebase(&mut shared.output, base);
            rebase(&mut shared.template, base);
        }
    }

    pub fn generator_options(&self) -> GeneratorOptions {
        GeneratorOptions {
            normalizer: self.drop_interface_prefix.then(NameNormalizer::default),
            default_custom_tags: self.default_custom_tags.clone(),
            collision_policy: self.collision_policy,
        }
    }
}

impl TargetConfig {
    pub fn module_render_options(&self) -> RenderOptions {
        RenderOptions::new(self.language, &self.output, &self.template)
            .with_type_name_map(self.type_name_map.clone())
    }

    pub fn types_render_options(&self) -> Option<RenderOptions> {
        self.types.as_ref().map(|types| {
            RenderOptions::new(self.language, &types.output, &types.template)
                .with_type_name_map(self.type_name_map.clone())
        })
    }
}

impl SharedConfig {
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::new(self.language, &self.output, &self.template)
            .with_type_name_map(self.type_name_map.clone())
    }
}

fn rebase(path: &mut PathBuf, base: &Path) {
    if path.is_relative() {
        *path = base.join(&*path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    const FULL: &str = r#"
drop_interface_prefix = true
collision_policy = "fail"

[default_custom_tags]
platform = "mobile"

[[targets]]
name = "ios"
schema = "schema/ios.json"
language = "swift"
output = "generated/ios"
template = "templates/swift-module.hbs"

[targets.type_name_map]
ConfigLogLevel = "LogLevel"

[targets.types]
output = "generated/ios/Types.swift"
template = "templates/swift-types.hbs"

[[targets]]
name = "android"
schema = "schema/android.json"
language = "Kotlin"
output = "generated/android/Modules.kt"
template = "templates/kotlin-module.hbs"

[shared]
language = "c#"
output = "/abs/Shared.cs"
template = "templates/csharp-types.hbs"
"#;

    #[test]
    fn test_parse_full_config() {
        let config = GeneratorConfig::from_toml_str(FULL).unwrap();

        assert!(config.drop_interface_prefix);
        assert_eq!(config.collision_policy, CollisionPolicy::Fail);
        assert_eq!(config.default_custom_tags.get("platform"), Some(&json!("mobile")));
        assert_eq!(config.targets.len(), 2);

        let ios = &config.targets[0];
        assert_eq!(ios.language, RenderingLanguage::Swift);
        assert_eq!(ios.type_name_map.get("ConfigLogLevel").map(String::as_str), Some("LogLevel"));
        assert!(ios.types.is_some());

        let android = &config.targets[1];
        assert_eq!(android.language, RenderingLanguage::Kotlin);
        assert!(android.types.is_none());

        let shared = config.shared.as_ref().unwrap();
        assert_eq!(shared.language, RenderingLanguage::CSharp);
    }

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::from_toml_str(
            r#"
[[targets]]
name = "ios"
schema = "ios.json"
language = "swift"
output = "out"
template = "module.hbs"
"#,
        )
        .unwrap();

        assert!(!config.drop_interface_prefix);
        assert_eq!(config.collision_policy, CollisionPolicy::KeepFirst);
        assert!(config.shared.is_none());
        let options = config.generator_options();
        assert!(options.normalizer.is_none());
        assert!(options.default_custom_tags.is_empty());
    }

    #[test]
    fn test_generator_options() {
        let config = GeneratorConfig::from_toml_str(FULL).unwrap();
        let options = config.generator_options();
        assert_eq!(options.normalizer, Some(NameNormalizer::default()));
        assert_eq!(options.collision_policy, CollisionPolicy::Fail);

        let types = config.targets[0].types_render_options().unwrap();
        assert_eq!(types.output_path, PathBuf::from("generated/ios/Types.swift"));
        assert_eq!(types.type_name_map.len(), 1);
    }

    #[test]
    fn test_unknown_language() {
        let err = GeneratorConfig::from_toml_str(
            r#"
[[targets]]
name = "web"
schema = "web.json"
language = "typescript"
output = "out"
template = "module.hbs"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, GenError::Config(_)));
        assert!(err.to_string().contains("typescript"));
    }

    #[test]
    fn test_requires_unique_targets() {
        assert!(matches!(
            GeneratorConfig::from_toml_str("drop_interface_prefix = true"),
            Err(GenError::Config(_))
        ));

        let duplicated = r#"
[[targets]]
name = "ios"
schema = "a.json"
language = "swift"
output = "a"
template = "a.hbs"

[[targets]]
name = "ios"
schema = "b.json"
language = "swift"
output = "b"
template = "b.hbs"
"#;
        let err = GeneratorConfig::from_toml_str(duplicated).unwrap_err();
        assert!(err.to_string().contains("duplicate target name `ios`"));
    }

    #[test]
    fn test_from_path_resolves_relative_paths() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hostgen.toml");
        fs::write(&path, FULL).unwrap();

        let config = GeneratorConfig::from_path(&path).unwrap();

        let ios = &config.targets[0];
        assert_eq!(ios.schema, dir.path().join("schema/ios.json"));
        assert_eq!(ios.output, dir.path().join("generated/ios"));
        assert_eq!(
            ios.types.as_ref().unwrap().template,
            dir.path().join("templates/swift-types.hbs")
        );
        let shared = config.shared.as_ref().unwrap();
        assert_eq!(shared.output, PathBuf::from("/abs/Shared.cs"));
        assert_eq!(shared.template, dir.path().join("templates/csharp-types.hbs"));
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = GeneratorConfig::from_path(dir.path().join("hostgen.toml")).unwrap_err();
        assert!(matches!(err, GenError::Config(_)));
    }
}
