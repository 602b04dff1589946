//! `generate` and `print` commands

use anyhow::{bail, Context, Result};
use hostgen::{CodeGenerator, GeneratorConfig, ParsedTarget, SchemaDocument, SharedTypes};
use std::path::PathBuf;
use termcolor::{ColorChoice, StandardStream, WriteColor};
use tracing::{info, warn};

const DEFAULT_CONFIG: &str = "hostgen.toml";

pub fn generate(args: &[String]) -> Result<()> {
    let cmd = CommandArgs::parse(args)?;
    let config = cmd.load_config()?;
    let written = run_generate(&config)?;
    println!("Generated {} file(s)", written.len());
    for path in &written {
        println!("  {}", path.display());
    }
    Ok(())
}

pub fn print(args: &[String]) -> Result<()> {
    let cmd = CommandArgs::parse(args)?;
    let config = cmd.load_config()?;
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    run_print(&config, &mut stdout)
}

/// Flags shared by every command
#[derive(Debug, PartialEq)]
struct CommandArgs {
    config: PathBuf,
}

impl CommandArgs {
    fn parse(args: &[String]) -> Result<Self> {
        let mut cmd = CommandArgs {
            config: PathBuf::from(DEFAULT_CONFIG),
        };

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--config" | "-c" => {
                    if i + 1 < args.len() {
                        cmd.config = PathBuf::from(&args[i + 1]);
                        i += 2;
                    } else {
                        bail!("--config requires a value");
                    }
                }
                _ => {
                    bail!("Unknown flag: {}", args[i]);
                }
            }
        }

        Ok(cmd)
    }

    fn load_config(&self) -> Result<GeneratorConfig> {
        GeneratorConfig::from_path(&self.config)
            .with_context(|| format!("Failed to load config {}", self.config.display()))
    }
}

/// Parse every target, then hoist the types they share
fn parse_targets(
    generator: &CodeGenerator,
    config: &GeneratorConfig,
) -> Result<(Vec<ParsedTarget>, SharedTypes)> {
    let mut parsed = Vec::with_capacity(config.targets.len());
    for target in &config.targets {
        let document = SchemaDocument::from_path(&target.schema)
            .with_context(|| format!("Failed to read schema {}", target.schema.display()))?;
        let lowered = document
            .lower()
            .with_context(|| format!("Invalid schema for target `{}`", target.name))?;
        let target_types = generator
            .parse_target(lowered)
            .with_context(|| format!("Failed to extract named types of `{}`", target.name))?;
        info!(target_name = %target.name, modules = target_types.modules.len(), "Parsed target");
        parsed.push(target_types);
    }

    let shared = generator.extract_targets_shared_types(&mut parsed);
    Ok((parsed, shared))
}

/// Render every configured output; returns the written files
fn run_generate(config: &GeneratorConfig) -> Result<Vec<PathBuf>> {
    let generator = CodeGenerator::new(config.generator_options());
    let (parsed, shared) = parse_targets(&generator, config)?;

    let mut written = Vec::new();
    for (target_config, target) in config.targets.iter().zip(&parsed) {
        let files = generator
            .render_modules(target, &target_config.module_render_options())
            .with_context(|| format!("Failed to render modules of `{}`", target_config.name))?;
        written.extend(files);

        match target_config.types_render_options() {
            Some(options) => {
                let path = generator
                    .render_named_types(&target.arena, &target.shared_types, &options)
                    .with_context(|| {
                        format!("Failed to render named types of `{}`", target_config.name)
                    })?;
                written.push(path);
            }
            None if !target.shared_types.is_empty() => {
                warn!(
                    target_name = %target_config.name,
                    count = target.shared_types.len(),
                    "Target has types shared between modules but no types output"
                );
            }
            None => {}
        }
    }

    match &config.shared {
        Some(shared_config) => {
            let path = generator
                .render_named_types(&shared.arena, &shared.types, &shared_config.render_options())
                .context("Failed to render shared named types")?;
            written.push(path);
        }
        None if !shared.is_empty() => {
            warn!(
                count = shared.types.len(),
                "Targets share named types but no [shared] output is configured"
            );
        }
        None => {}
    }

    Ok(written)
}

fn run_print<W: WriteColor>(config: &GeneratorConfig, w: &mut W) -> Result<()> {
    let generator = CodeGenerator::new(config.generator_options());
    let (parsed, shared) = parse_targets(&generator, config)?;

    for (target_config, target) in config.targets.iter().zip(&parsed) {
        writeln!(w, "Target {} ({})\n", target_config.name, target_config.language)?;
        generator.print_target(target, w)?;
    }
    generator.print_shared_types(&shared, w)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;
    use termcolor::NoColor;

    const SCHEMA: &str = r#"{
  "modules": [
    {
      "name": "Config",
      "members": [
        { "name": "retryCount", "type": { "kind": "basic", "value": "number" } }
      ],
      "methods": [
        {
          "name": "log",
          "parameters": [
            { "name": "level", "type": { "kind": "literal", "members": ["debug", "info"] } }
          ],
          "returnType": { "kind": "void" }
        }
      ]
    },
    {
      "name": "Store",
      "methods": [
        { "name": "first", "returnType": { "kind": "reference", "name": "IItem" } },
        {
          "name": "add",
          "parameters": [{ "name": "item", "type": { "kind": "reference", "name": "IItem" } }]
        }
      ]
    }
  ],
  "types": [
    {
      "kind": "interface",
      "name": "IItem",
      "members": [{ "name": "title", "type": { "kind": "basic", "value": "string" } }]
    }
  ]
}"#;

    const CONFIG: &str = r#"
drop_interface_prefix = true

[[targets]]
name = "ios"
schema = "ios.json"
language = "swift"
output = "out/ios"
template = "module.hbs"

[targets.types]
output = "out/ios/Types.swift"
template = "types.hbs"

[[targets]]
name = "android"
schema = "android.json"
language = "kotlin"
output = "out/android/Modules.kt"
template = "module.hbs"

[shared]
language = "kotlin"
output = "out/shared/Shared.kt"
template = "types.hbs"
"#;

    fn workspace() -> (TempDir, GeneratorConfig) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("ios.json"), SCHEMA).unwrap();
        fs::write(dir.path().join("android.json"), SCHEMA).unwrap();
        fs::write(
            dir.path().join("module.hbs"),
            "{{#if moduleName}}{{moduleName}}{{else}}{{#each this}}{{moduleName}};{{/each}}{{/if}}",
        )
        .unwrap();
        fs::write(
            dir.path().join("types.hbs"),
            "{{#each this}}{{typeName}};{{/each}}",
        )
        .unwrap();
        let config_path = dir.path().join("hostgen.toml");
        fs::write(&config_path, CONFIG).unwrap();
        let config = GeneratorConfig::from_path(&config_path).unwrap();
        (dir, config)
    }

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        assert_eq!(
            CommandArgs::parse(&[]).unwrap().config,
            PathBuf::from("hostgen.toml")
        );
        assert_eq!(
            CommandArgs::parse(&args(&["--config", "gen/hostgen.toml"]))
                .unwrap()
                .config,
            PathBuf::from("gen/hostgen.toml")
        );
        assert!(CommandArgs::parse(&args(&["-c"])).is_err());
        assert!(CommandArgs::parse(&args(&["--verbose"])).is_err());
    }

    #[test]
    fn test_generate_writes_every_output() {
        let (dir, config) = workspace();
        let root = dir.path();

        let written = run_generate(&config).unwrap();

        assert_eq!(
            written,
            vec![
                root.join("out/ios/Config.swift"),
                root.join("out/ios/Store.swift"),
                root.join("out/ios/Types.swift"),
                root.join("out/android/Modules.kt"),
                root.join("out/shared/Shared.kt"),
            ]
        );
        assert_eq!(
            fs::read_to_string(root.join("out/ios/Store.swift")).unwrap(),
            "Store"
        );
        assert_eq!(
            fs::read_to_string(root.join("out/android/Modules.kt")).unwrap(),
            "Config;Store;"
        );
        // Both targets use the same types, so they all move to the shared file
        assert_eq!(fs::read_to_string(root.join("out/ios/Types.swift")).unwrap(), "");
        assert_eq!(
            fs::read_to_string(root.join("out/shared/Shared.kt")).unwrap(),
            "ConfigLogLevel;void;Item;"
        );
    }

    #[test]
    fn test_print_dumps_targets_and_shared_types() {
        let (_dir, config) = workspace();
        let mut out = NoColor::new(Vec::new());

        run_print(&config, &mut out).unwrap();

        let text = String::from_utf8(out.into_inner()).unwrap();
        assert!(text.starts_with("Target ios (swift)\n\nModules:\n\nModule Config {\n"));
        assert!(text.contains("Target android (kotlin)"));
        assert!(text.contains("Shared named types:\n\nEnum ConfigLogLevel {"));
        assert!(text.contains("Type Item {\n  var title: string\n}"));
    }

    #[test]
    fn test_missing_schema_is_reported() {
        let (dir, config) = workspace();
        fs::remove_file(dir.path().join("android.json")).unwrap();

        let err = run_generate(&config).unwrap_err();
        assert!(format!("{:#}", err).contains("android.json"));
    }
}
