//! Plain-text rendering of a schema for review in the terminal.

use std::fmt::Write;

use super::types::AbstractSchema;

/// Renders every model name followed by its fields, one per line.
///
/// Each field reads `name: type`, followed by a parenthesized list of its
/// active constraints when it has any. Models are separated by a blank line.
///
/// ## Examples
///
/// ```
/// use blueprint_lib::schema::{render, AbstractSchema, Field, FieldType, Model};
///
/// let schema = AbstractSchema::new(vec![Model::new(
///     "users",
///     vec![
///         Field::new("id", FieldType::Serial).primary_key(),
///         Field::new("bio", FieldType::Text),
///     ],
/// )]);
/// assert_eq!(render(&schema), "users\n  id: serial (primary_key)\n  bio: text\n");
/// ```
pub fn render(schema: &AbstractSchema) -> String {
    let mut out = String::new();
    for (i, model) in schema.models.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "{}", model.name);
        for field in &model.fields {
            let constraints = field.constraints();
            if constraints.is_empty() {
                let _ = writeln!(out, "  {}: {}", field.name, field.field_type);
            } else {
                let _ = writeln!(
                    out,
                    "  {}: {} ({})",
                    field.name,
                    field.field_type,
                    constraints.join(", ")
                );
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Field, FieldType, Model};

    #[test]
    fn renders_all_models_and_constraint_annotations() {
        let schema = AbstractSchema::new(vec![
            Model::new(
                "users",
                vec![
                    Field::new("id", FieldType::Serial).primary_key(),
                    Field::new("email", FieldType::Varchar).not_null().unique(),
                ],
            ),
            Model::new(
                "tasks",
                vec![
                    Field::new("done", FieldType::Boolean).with_default("false"),
                    Field::new("user_id", FieldType::Integer).references("users", "id"),
                ],
            ),
        ]);

        let expected = "\
users
  id: serial (primary_key)
  email: varchar (not_null, unique)

tasks
  done: boolean (default=false)
  user_id: integer (references users.id)
";
        assert_eq!(render(&schema), expected);
    }

    #[test]
    fn empty_schema_renders_nothing() {
        assert_eq!(render(&AbstractSchema::new(vec![])), "");
    }
}
