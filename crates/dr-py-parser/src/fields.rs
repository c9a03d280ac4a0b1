//! Field extraction from a model class body.

use dr_core::SourceField;
use tree_sitter::Node;

use crate::arguments::parse_arguments;
use crate::parser::node_text;

/// Extracts field declarations from a class body `block`.
///
/// Only direct statements of the shape `name = Constructor(...)` count, where
/// `Constructor` is `<module>.<Name>` or a bare capitalised `<Name>`.
/// Statements inside methods or nested classes are ignored. Fields are
/// returned in textual order.
pub fn extract_fields(body: Node<'_>, source: &[u8], module: Option<&str>) -> Vec<SourceField> {
    let mut cursor = body.walk();
    body.named_children(&mut cursor)
        .filter_map(|statement| field_from_statement(statement, source, module))
        .collect()
}

fn field_from_statement(
    statement: Node<'_>,
    source: &[u8],
    module: Option<&str>,
) -> Option<SourceField> {
    if statement.kind() != "expression_statement" {
        return None;
    }

    let assignment = statement.named_child(0)?;
    if assignment.kind() != "assignment" {
        return None;
    }

    let target = assignment.child_by_field_name("left")?;
    if target.kind() != "identifier" {
        return None;
    }

    let call = assignment.child_by_field_name("right")?;
    if call.kind() != "call" {
        return None;
    }

    let type_name = constructor_name(call.child_by_field_name("function")?, source, module)?;

    let argument_list = call.child_by_field_name("arguments")?;
    if argument_list.kind() != "argument_list" {
        return None;
    }
    let arguments = parse_arguments(strip_parens(node_text(argument_list, source)?));

    Some(SourceField::new(
        node_text(target, source)?,
        type_name,
        arguments,
    ))
}

/// Returns the constructor name of a field call.
fn constructor_name<'a>(
    function: Node<'_>,
    source: &'a [u8],
    module: Option<&str>,
) -> Option<&'a str> {
    match function.kind() {
        "identifier" => {
            node_text(function, source).filter(|name| name.starts_with(char::is_uppercase))
        }
        "attribute" => {
            let object = node_text(function.child_by_field_name("object")?, source)?;
            if Some(object) != module {
                return None;
            }
            node_text(function.child_by_field_name("attribute")?, source)
        }
        _ => None,
    }
}

/// `(a, b)` → `a, b`; tolerates a missing closing parenthesis.
fn strip_parens(text: &str) -> &str {
    let text = text.strip_prefix('(').unwrap_or(text);
    text.strip_suffix(')').unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use tree_sitter::Parser;

    use super::*;
    use crate::queries::python_language;

    fn fields_of_first_class(source: &str, module: Option<&str>) -> Vec<SourceField> {
        let mut parser = Parser::new();
        parser
            .set_language(&python_language())
            .expect("Failed to set language");
        let tree = parser.parse(source, None).expect("Parse failed");

        let class = tree
            .root_node()
            .named_child(0)
            .expect("Source should contain a class");
        let body = class
            .child_by_field_name("body")
            .expect("Class should have a body");
        extract_fields(body, source.as_bytes(), module)
    }

    #[test]
    fn test_extract_simple_fields() {
        let source = "class Post(models.Model):\n    title = models.CharField(max_length=40)\n    body = models.TextField()\n";
        let fields = fields_of_first_class(source, Some("models"));

        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "title");
        assert_eq!(fields[0].type_name, "CharField");
        assert_eq!(fields[0].arguments.named("max_length"), Some("40"));
        assert_eq!(fields[1].name, "body");
        assert_eq!(fields[1].type_name, "TextField");
        assert!(fields[1].arguments.is_empty());
    }

    #[test]
    fn test_ignores_methods_and_meta() {
        let source = r#"class Post(models.Model):
    title = models.CharField(max_length=40)

    class Meta:
        ordering = models.F("title")

    def save(self, *args, **kwargs):
        extra = models.IntegerField()
        super().save(*args, **kwargs)

    def __str__(self):
        return self.title
"#;
        let fields = fields_of_first_class(source, Some("models"));
        let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["title"]);
    }

    #[test]
    fn test_module_prefix_must_match() {
        let source = "class Post(models.Model):\n    a = other.CharField()\n    b = models.CharField()\n    c = CharField()\n    d = helper()\n";
        let fields = fields_of_first_class(source, Some("models"));
        let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c"]);
    }

    #[test]
    fn test_multiline_declaration() {
        let source = r#"class Post(models.Model):
    author = models.ForeignKey(
        'Writer',
        on_delete=models.CASCADE,
    )
"#;
        let fields = fields_of_first_class(source, Some("models"));
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].arguments.unnamed(), ["'Writer'"]);
        assert_eq!(fields[0].arguments.named("on_delete"), Some("models.CASCADE"));
    }

    #[test]
    fn test_non_call_assignments_are_skipped() {
        let source = "class Post(models.Model):\n    STATUS = ('draft', 'published')\n    count = 3\n    title = models.CharField()\n";
        let fields = fields_of_first_class(source, Some("models"));
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "title");
    }

    #[test]
    fn test_strip_parens() {
        assert_eq!(strip_parens("(a, b)"), "a, b");
        assert_eq!(strip_parens("()"), "");
        assert_eq!(strip_parens("(a"), "a");
    }
}
