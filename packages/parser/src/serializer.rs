use crate::ast::*;
use crate::parser::Dialect;

/// Serializer turns declarations built in memory back into source text.
///
/// Output is laid out from scratch: annotations of the declaration on their
/// own lines, parameter annotations inline, one statement per line. Callers
/// splice the result into existing source, so nothing here tries to preserve
/// original whitespace.
pub struct Serializer {
    indent_level: usize,
    indent_string: String,
    dialect: Dialect,
}

impl Serializer {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            indent_level: 0,
            indent_string: "    ".to_string(), // 4 spaces
            dialect,
        }
    }

    pub fn with_indent(dialect: Dialect, indent: &str) -> Self {
        Self {
            indent_level: 0,
            indent_string: indent.to_string(),
            dialect,
        }
    }

    /// Serialize a constructor or method declaration, without trailing newline
    pub fn serialize_method(&mut self, method: &MethodDecl) -> String {
        let mut output = String::new();

        if let Some(doc) = &method.doc {
            self.serialize_doc(doc, &mut output);
        }

        for annotation in &method.modifiers.annotations {
            self.write_indent(&mut output);
            self.serialize_annotation(annotation, &mut output);
            output.push('\n');
        }

        self.write_indent(&mut output);
        for keyword in &method.modifiers.keywords {
            if self.dialect == Dialect::Groovy && keyword == "public" {
                continue;
            }
            output.push_str(keyword);
            output.push(' ');
        }

        if !method.type_params.is_empty() {
            self.serialize_type_params(&method.type_params, &mut output);
            output.push(' ');
        }

        if let Some(return_type) = &method.return_type {
            output.push_str(&return_type.to_string());
            output.push(' ');
        }

        output.push_str(&method.name);
        output.push('(');
        for (i, param) in method.params.iter().enumerate() {
            if i > 0 {
                output.push_str(", ");
            }
            self.serialize_param(param, &mut output);
        }
        output.push(')');

        if !method.throws.is_empty() {
            output.push_str(" throws ");
            let throws: Vec<String> = method.throws.iter().map(|t| t.to_string()).collect();
            output.push_str(&throws.join(", "));
        }

        match &method.body {
            Some(body) => {
                output.push_str(" {\n");
                self.indent_level += 1;
                for statement in &body.statements {
                    self.write_indent(&mut output);
                    self.serialize_statement(statement, &mut output);
                    output.push('\n');
                }
                self.indent_level -= 1;
                self.write_indent(&mut output);
                output.push('}');
            }
            None => {
                if self.dialect == Dialect::Java {
                    output.push(';');
                }
            }
        }

        output
    }

    fn serialize_doc(&self, doc: &str, output: &mut String) {
        for (i, line) in doc.lines().enumerate() {
            self.write_indent(output);
            let line = line.trim();
            if i > 0 && line.starts_with('*') {
                output.push(' ');
            }
            output.push_str(line);
            output.push('\n');
        }
    }

    fn serialize_annotation(&self, annotation: &Annotation, output: &mut String) {
        output.push('@');
        output.push_str(&annotation.name);
        if let Some(args) = &annotation.args {
            output.push('(');
            output.push_str(args);
            output.push(')');
        }
    }

    fn serialize_type_params(&self, params: &[TypeParam], output: &mut String) {
        output.push('<');
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                output.push_str(", ");
            }
            output.push_str(&param.name);
            if !param.bounds.is_empty() {
                output.push_str(" extends ");
                let bounds: Vec<String> = param.bounds.iter().map(|b| b.to_string()).collect();
                output.push_str(&bounds.join(" & "));
            }
        }
        output.push('>');
    }

    fn serialize_param(&self, param: &Param, output: &mut String) {
        for annotation in &param.modifiers.annotations {
            self.serialize_annotation(annotation, output);
            output.push(' ');
        }
        for keyword in &param.modifiers.keywords {
            output.push_str(keyword);
            output.push(' ');
        }
        output.push_str(&param.ty.to_string());
        if param.varargs {
            output.push_str("...");
        }
        output.push(' ');
        output.push_str(&param.name);
    }

    fn serialize_statement(&self, statement: &Statement, output: &mut String) {
        match statement {
            Statement::SuperCall { args, .. } => {
                output.push_str("super(");
                output.push_str(&args.join(", "));
                output.push(')');
            }
            Statement::ThisCall { args, .. } => {
                output.push_str("this(");
                output.push_str(&args.join(", "));
                output.push(')');
            }
            Statement::Assign {
                qualified,
                field,
                value,
                ..
            } => {
                if *qualified {
                    output.push_str("this.");
                }
                output.push_str(field);
                output.push_str(" = ");
                output.push_str(value);
            }
            Statement::Other { text, .. } => {
                output.push_str(text);
                // Block statements carry their own closing brace
                if text.ends_with('}') {
                    return;
                }
            }
        }
        if self.dialect == Dialect::Java {
            output.push(';');
        }
    }

    fn write_indent(&self, output: &mut String) {
        for _ in 0..self.indent_level {
            output.push_str(&self.indent_string);
        }
    }
}

/// Serialize a declaration with the default 4-space indent
pub fn serialize_method(method: &MethodDecl, dialect: Dialect) -> String {
    Serializer::new(dialect).serialize_method(method)
}

/// Prefix every non-empty line of `text` with `indent`
pub fn reindent(text: &str, indent: &str) -> String {
    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{}{}", indent, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
