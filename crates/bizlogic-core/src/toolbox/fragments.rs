//! Toolbox fragment generators.
//!
//! Each generator turns descriptor data into one `<category>` element.
//! All text and attribute values are XML-escaped; element layout is one
//! element per line without indentation.

use std::borrow::Cow;
use std::fmt::Write;

use crate::environment::{ArgumentDescriptor, FunctionLibrary, ReferenceDescriptor};

/// The static fragment with the general-purpose block categories.
pub const BUILTIN_TOOLBOX: &str = r#"<category name="Logic" colour="210">
<block type="controls_if"></block>
<block type="logic_compare"></block>
<block type="logic_operation"></block>
<block type="logic_negate"></block>
<block type="logic_boolean"></block>
<block type="logic_null"></block>
</category>
<category name="Math" colour="230">
<block type="math_number"></block>
<block type="math_arithmetic"></block>
<block type="math_round"></block>
</category>
<category name="Text" colour="160">
<block type="text"></block>
<block type="text_join"></block>
</category>
<category name="Variables" colour="330" custom="VARIABLE"></category>"#;

/// Escapes the five XML special characters.
pub fn escape_xml(text: &str) -> Cow<'_, str> {
    if !text.contains(|c: char| matches!(c, '&' | '<' | '>' | '"' | '\'')) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}

/// `References` category: one reference block per descriptor.
pub fn references_fragment(descriptors: &[ReferenceDescriptor]) -> String {
    let mut out = String::from("<category name=\"References\">\n");
    for descriptor in descriptors {
        let label = descriptor.verbose_name.as_deref().unwrap_or(&descriptor.name);
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "<block type=\"business_logic_reference\">\
             <mutation content_type=\"{}\"></mutation>\
             <field name=\"TYPE\">{}</field></block>",
            escape_xml(&descriptor.content_type),
            escape_xml(label),
        );
    }
    out.push_str("</category>");
    out
}

/// `Arguments` category: a get and a set block for every argument field.
pub fn argument_fields_fragment(arguments: &[ArgumentDescriptor]) -> String {
    let mut out = String::from("<category name=\"Arguments\">\n");
    for argument in arguments {
        for field in &argument.fields {
            let var = format!("{}.{}", argument.name, field.name);
            let var = escape_xml(&var);
            let data_type = escape_xml(&field.data_type);
            for kind in ["get", "set"] {
                let _ = writeln!(
                    out,
                    "<block type=\"business_logic_argument_field_{kind}\">\
                     <mutation data_type=\"{data_type}\"></mutation>\
                     <field name=\"VAR\">{var}</field></block>",
                );
            }
        }
    }
    out.push_str("</category>");
    out
}

/// `Functions` category: one sub-category per library.
pub fn function_libs_fragment(libraries: &[FunctionLibrary]) -> String {
    let mut out = String::from("<category name=\"Functions\">\n");
    for library in libraries {
        let _ = writeln!(out, "<category name=\"{}\">", escape_xml(&library.title));
        for function in &library.functions {
            out.push_str("<block type=\"business_logic_function\"><mutation>");
            for argument in &function.arguments {
                let name = argument.name.as_deref().unwrap_or("*");
                let _ = write!(out, "<arg name=\"{}\"></arg>", escape_xml(name));
            }
            let _ = writeln!(
                out,
                "</mutation><field name=\"FUNC\">{}</field></block>",
                escape_xml(&function.title)
            );
        }
        out.push_str("</category>\n");
    }
    out.push_str("</category>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::{ArgumentField, FunctionArgument, FunctionDescriptor};

    #[test]
    fn escape_xml_borrows_clean_text() {
        assert!(matches!(escape_xml("plain"), Cow::Borrowed("plain")));
        assert_eq!(escape_xml("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
    }

    #[test]
    fn references_fragment_snapshot() {
        let descriptors = vec![
            ReferenceDescriptor {
                id: 1,
                name: "book".into(),
                verbose_name: Some("Book".into()),
                content_type: "books.Book".into(),
            },
            ReferenceDescriptor {
                id: 2,
                name: "author & co".into(),
                verbose_name: None,
                content_type: "books.Author".into(),
            },
        ];
        insta::assert_snapshot!(references_fragment(&descriptors), @r#"
        <category name="References">
        <block type="business_logic_reference"><mutation content_type="books.Book"></mutation><field name="TYPE">Book</field></block>
        <block type="business_logic_reference"><mutation content_type="books.Author"></mutation><field name="TYPE">author &amp; co</field></block>
        </category>
        "#);
    }

    #[test]
    fn argument_fields_fragment_emits_get_and_set() {
        let arguments = vec![ArgumentDescriptor {
            name: "order".into(),
            verbose_name: None,
            content_type: Some("shop.Order".into()),
            fields: vec![ArgumentField {
                name: "total".into(),
                data_type: "number".into(),
                verbose_name: None,
                content_type: None,
            }],
        }];
        let doc = argument_fields_fragment(&arguments);
        assert!(doc.starts_with("<category name=\"Arguments\">"));
        assert!(doc.contains("business_logic_argument_field_get"));
        assert!(doc.contains("business_logic_argument_field_set"));
        assert_eq!(doc.matches("<field name=\"VAR\">order.total</field>").count(), 2);
    }

    #[test]
    fn function_libs_fragment_nests_libraries() {
        let libraries = vec![FunctionLibrary {
            title: "math".into(),
            functions: vec![FunctionDescriptor {
                title: "max".into(),
                description: None,
                arguments: vec![
                    FunctionArgument { name: Some("a".into()) },
                    FunctionArgument { name: None },
                ],
            }],
        }];
        let doc = function_libs_fragment(&libraries);
        assert!(doc.contains("<category name=\"math\">"));
        assert!(doc.contains("<mutation><arg name=\"a\"></arg><arg name=\"*\"></arg></mutation>"));
        assert!(doc.ends_with("</category>\n</category>"));
    }

    #[test]
    fn empty_inputs_yield_empty_categories() {
        assert_eq!(references_fragment(&[]), "<category name=\"References\">\n</category>");
        assert_eq!(function_libs_fragment(&[]), "<category name=\"Functions\">\n</category>");
    }
}
