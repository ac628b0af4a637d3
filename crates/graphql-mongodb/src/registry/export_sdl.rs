use std::fmt::Write;

use super::{Deprecation, EnumType, InputObjectType, MetaInputValue, MetaType, Registry};

impl Registry {
    /// Renders every derived type as SDL, ordered by name.
    pub fn export_sdl(&self) -> String {
        let mut sdl = String::new();

        for (index, ty) in self.types.values().enumerate() {
            if index > 0 {
                writeln!(sdl).ok();
            }
            export_type(ty, &mut sdl);
        }

        sdl
    }
}

fn export_type(ty: &MetaType, sdl: &mut String) {
    match ty {
        MetaType::Enum(EnumType {
            name,
            enum_values,
            description,
        }) => {
            if let Some(description) = description {
                writeln!(sdl, "\"\"\"\n{description}\n\"\"\"").ok();
            }
            write!(sdl, "enum {name} ").ok();
            writeln!(sdl, "{{").ok();
            for value in enum_values.values() {
                if let Some(description) = value.description.as_deref() {
                    writeln!(sdl, "\t\"\"\"\n\t{description}\n\t\"\"\"").ok();
                }
                write!(sdl, "\t{}", value.name).ok();
                export_deprecation(&value.deprecation, sdl);
                writeln!(sdl).ok();
            }
            writeln!(sdl, "}}").ok();
        }
        MetaType::InputObject(InputObjectType {
            name,
            input_fields,
            description,
        }) => {
            if let Some(description) = description {
                writeln!(sdl, "\"\"\"\n{description}\n\"\"\"").ok();
            }
            write!(sdl, "input {name}").ok();

            if !input_fields.is_empty() {
                writeln!(sdl, " {{").ok();
                for field in input_fields.values() {
                    if let Some(description) = field.description.as_deref() {
                        writeln!(sdl, "\t\"\"\"\n\t{description}\n\t\"\"\"").ok();
                    }
                    write!(sdl, "\t{}", export_input_value(field)).ok();
                    export_deprecation(&field.deprecation, sdl);
                    writeln!(sdl).ok();
                }
                writeln!(sdl, "}}").ok();
            } else {
                writeln!(sdl).ok();
            }
        }
    }
}

fn export_deprecation(deprecation: &Deprecation, sdl: &mut String) {
    if let Deprecation::Deprecated { reason } = deprecation {
        write!(sdl, " @deprecated").ok();
        if let Some(reason) = reason {
            write!(sdl, "(reason: \"{}\")", reason.escape_default()).ok();
        }
    }
}

fn export_input_value(input_value: &MetaInputValue) -> String {
    format!("{}: {}", input_value.name, input_value.ty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::MetaEnumValue;

    #[test]
    fn empty_state() {
        let sdl = Registry::default().export_sdl();
        assert!(sdl.is_empty());
    }

    #[test]
    fn input_and_enum() {
        let mut registry = Registry::default();
        registry.types.insert(
            "PaginationType".into(),
            InputObjectType::new(
                "PaginationType",
                [
                    MetaInputValue::new("limit", "Int").with_description("Page size"),
                    MetaInputValue::new("skip", "Int").with_deprecation("use offset"),
                ],
            )
            .into(),
        );
        registry.types.insert(
            "SortType".into(),
            EnumType::new(
                "SortType",
                [
                    MetaEnumValue::new("ASC").with_value(1),
                    MetaEnumValue::new("DESC").with_value(-1),
                ],
            )
            .into(),
        );

        let expected = [
            "input PaginationType {",
            "\t\"\"\"",
            "\tPage size",
            "\t\"\"\"",
            "\tlimit: Int",
            "\tskip: Int @deprecated(reason: \"use offset\")",
            "}",
            "",
            "enum SortType {",
            "\tASC",
            "\tDESC",
            "}",
            "",
        ]
        .join("\n");

        assert_eq!(registry.export_sdl(), expected);
    }
}
