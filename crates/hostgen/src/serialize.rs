//! Human-readable dump of parsed targets
//!
//! Used by `hostgen print` to inspect what extraction produced before any
//! template is involved. Keywords are green, identifiers blue, types yellow,
//! values cyan and documentation dimmed.
//!
//! # Example
//!
//! ```
//! use hostgen::serialize::TypePrinter;
//! use hostgen::{Field, Module, TypeArena};
//! use termcolor::NoColor;
//!
//! let mut arena = TypeArena::new();
//! let number = arena.number();
//! let module = Module::new("Config").field(Field::new("retryCount", number));
//!
//! let mut out = NoColor::new(Vec::new());
//! TypePrinter::new(&arena).write_module(&mut out, &module).unwrap();
//! let text = String::from_utf8(out.into_inner()).unwrap();
//! assert!(text.contains("var retryCount: number"));
//! ```

use crate::ir::{Field, Method, Module, TypeArena, TypeId, ValueType};
use std::io;
use termcolor::{Color, ColorSpec, WriteColor};

const INDENT: &str = "  ";

/// Writes modules and named types of one arena
pub struct TypePrinter<'a> {
    arena: &'a TypeArena,
}

impl<'a> TypePrinter<'a> {
    pub fn new(arena: &'a TypeArena) -> Self {
        Self { arena }
    }

    /// Write a module with its fields, methods and associated types
    pub fn write_module<W: WriteColor>(&self, w: &mut W, module: &Module) -> io::Result<()> {
        self.write_documentation(w, &module.documentation, 0)?;
        self.write_custom_tags(w, &module.custom_tags, 0)?;
        self.write_keyword(w, "Module")?;
        writeln!(w, " {} {{", module.name)?;

        for field in &module.members {
            self.write_field(w, field, 1)?;
        }
        if !module.methods.is_empty() {
            writeln!(w)?;
        }
        for method in &module.methods {
            self.write_method(w, method, 1)?;
        }
        if !module.associated_types.is_empty() {
            writeln!(w)?;
        }
        for info in &module.associated_types {
            self.write_named_type_at(w, info.id, 1)?;
        }

        writeln!(w, "}}")
    }

    /// Write the definition of a named type
    pub fn write_named_type<W: WriteColor>(&self, w: &mut W, id: TypeId) -> io::Result<()> {
        self.write_named_type_at(w, id, 0)
    }

    fn write_named_type_at<W: WriteColor>(
        &self,
        w: &mut W,
        id: TypeId,
        depth: usize,
    ) -> io::Result<()> {
        let pad = INDENT.repeat(depth);
        match self.arena.get(id) {
            ValueType::Interface(iface) => {
                self.write_documentation(w, &iface.documentation, depth)?;
                self.write_custom_tags(w, &iface.custom_tags, depth)?;
                write!(w, "{}", pad)?;
                self.write_keyword(w, "Type")?;
                writeln!(w, " {} {{", iface.name)?;
                for field in &iface.members {
                    self.write_field(w, field, depth + 1)?;
                }
                writeln!(w, "{}}}", pad)
            }
            ValueType::Enum(enum_type) => {
                self.write_documentation(w, &enum_type.documentation, depth)?;
                self.write_custom_tags(w, &enum_type.custom_tags, depth)?;
                write!(w, "{}", pad)?;
                self.write_keyword(w, "Enum")?;
                writeln!(w, " {} {{", enum_type.name)?;
                for member in &enum_type.members {
                    self.write_documentation(w, &member.documentation, depth + 1)?;
                    write!(w, "{}{}", pad, INDENT)?;
                    self.write_identifier(w, &member.key)?;
                    write!(w, " = ")?;
                    self.write_value(w, &member.value.to_string())?;
                    writeln!(w)?;
                }
                writeln!(w, "{}}}", pad)
            }
            ValueType::Union(union) => {
                self.write_custom_tags(w, &union.custom_tags, depth)?;
                write!(w, "{}", pad)?;
                self.write_keyword(w, "Union")?;
                write!(w, " {} = ", union.name.as_deref().unwrap_or_default())?;
                let members: Vec<String> =
                    union.members.iter().map(|&m| self.type_to_string(m)).collect();
                self.write_type(w, &members.join(" | "))?;
                writeln!(w)
            }
            ValueType::Void(void) => {
                self.write_documentation(w, &void.documentation, depth)?;
                self.write_custom_tags(w, &void.custom_tags, depth)?;
                write!(w, "{}", pad)?;
                self.write_keyword(w, "Type")?;
                writeln!(w, " {} {{", void.name)?;
                write!(w, "{}{}", pad, INDENT)?;
                self.write_type(w, "void")?;
                writeln!(w)?;
                writeln!(w, "{}}}", pad)
            }
            other => {
                write!(w, "{}", pad)?;
                self.write_type(w, &self.type_to_string(id))?;
                writeln!(w, " ({})", other.kind_name())
            }
        }
    }

    /// IR spelling of a value type
    pub fn type_to_string(&self, id: TypeId) -> String {
        match self.arena.get(id) {
            ValueType::Basic(basic) => basic.as_str().to_string(),
            ValueType::Array(element) => format!("[{}]", self.type_to_string(*element)),
            ValueType::Dictionary { key, value } => {
                format!("[{}: {}]", key, self.type_to_string(*value))
            }
            ValueType::Optional(wrapped) => format!("{}?", self.type_to_string(*wrapped)),
            ValueType::Tuple(tuple) => {
                let fields: Vec<String> = tuple
                    .members
                    .iter()
                    .map(|f| format!("{}: {}", f.name, self.type_to_string(f.ty)))
                    .collect();
                format!("{{ {} }}", fields.join(", "))
            }
            ValueType::Literal(literal) => literal
                .members
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" | "),
            ValueType::Union(union) if union.name.is_none() => union
                .members
                .iter()
                .map(|&m| self.type_to_string(m))
                .collect::<Vec<_>>()
                .join(" | "),
            named => named.name().unwrap_or_default().to_string(),
        }
    }

    fn write_field<W: WriteColor>(&self, w: &mut W, field: &Field, depth: usize) -> io::Result<()> {
        self.write_documentation(w, &field.documentation, depth)?;
        write!(w, "{}", INDENT.repeat(depth))?;
        self.write_keyword(w, "var")?;
        write!(w, " ")?;
        self.write_identifier(w, &field.name)?;
        write!(w, ": ")?;
        self.write_type(w, &self.type_to_string(field.ty))?;
        if let Some(value) = &field.static_value {
            write!(w, " = ")?;
            self.write_value(w, &self.static_value(value, field.ty))?;
        }
        writeln!(w)
    }

    fn write_method<W: WriteColor>(
        &self,
        w: &mut W,
        method: &Method,
        depth: usize,
    ) -> io::Result<()> {
        self.write_documentation(w, &method.documentation, depth)?;
        write!(w, "{}", INDENT.repeat(depth))?;
        if method.is_async {
            self.write_keyword(w, "async ")?;
        }
        self.write_keyword(w, "func")?;
        write!(w, " ")?;
        self.write_identifier(w, &method.name)?;
        write!(w, "(")?;
        for (index, param) in method.parameters.iter().enumerate() {
            if index > 0 {
                write!(w, ", ")?;
            }
            write!(w, "{}: ", param.name)?;
            self.write_type(w, &self.type_to_string(param.ty))?;
        }
        write!(w, ")")?;
        if let Some(ret) = method.return_type {
            write!(w, ": ")?;
            self.write_type(w, &self.type_to_string(ret))?;
        }
        writeln!(w)
    }

    fn static_value(&self, value: &serde_json::Value, ty: TypeId) -> String {
        match (self.arena.get(ty), value.as_str()) {
            (ValueType::Enum(enum_type), Some(key)) => format!("{}.{}", enum_type.name, key),
            _ => value.to_string(),
        }
    }

    fn write_documentation<W: WriteColor>(
        &self,
        w: &mut W,
        documentation: &str,
        depth: usize,
    ) -> io::Result<()> {
        if documentation.is_empty() {
            return Ok(());
        }
        let pad = INDENT.repeat(depth);
        w.set_color(ColorSpec::new().set_fg(Some(Color::White)).set_dimmed(true))?;
        writeln!(w, "{}/**", pad)?;
        for line in documentation.lines() {
            writeln!(w, "{} * {}", pad, line)?;
        }
        writeln!(w, "{} */", pad)?;
        w.reset()
    }

    fn write_custom_tags<W: WriteColor>(
        &self,
        w: &mut W,
        tags: &crate::ir::CustomTags,
        depth: usize,
    ) -> io::Result<()> {
        if tags.is_empty() {
            return Ok(());
        }
        let json = serde_json::to_string(tags).map_err(io::Error::other)?;
        w.set_color(ColorSpec::new().set_fg(Some(Color::White)).set_dimmed(true))?;
        writeln!(w, "{}Custom tags: {}", INDENT.repeat(depth), json)?;
        w.reset()
    }

    // === Color helpers ===

    fn write_keyword<W: WriteColor>(&self, w: &mut W, s: &str) -> io::Result<()> {
        self.write_with(w, Color::Green, s)
    }

    fn write_identifier<W: WriteColor>(&self, w: &mut W, s: &str) -> io::Result<()> {
        self.write_with(w, Color::Blue, s)
    }

    fn write_type<W: WriteColor>(&self, w: &mut W, s: &str) -> io::Result<()> {
        self.write_with(w, Color::Yellow, s)
    }

    fn write_value<W: WriteColor>(&self, w: &mut W, s: &str) -> io::Result<()> {
        self.write_with(w, Color::Cyan, s)
    }

    fn write_with<W: WriteColor>(&self, w: &mut W, color: Color, s: &str) -> io::Result<()> {
        w.set_color(ColorSpec::new().set_fg(Some(color)))?;
        write!(w, "{}", s)?;
        w.reset()
    }
}
