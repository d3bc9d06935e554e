//! Constructor body generation, one generator per target syntax.
//!
//! Generators write the text of a whole constructor (`start` .. `finish`);
//! the synthesizer parses it back and keeps only the body.

pub mod groovy;
pub mod java;

use crate::model::FieldDescriptor;
use jsoncreator_parser::ast::Param;
use jsoncreator_parser::Dialect;
use serde::{Deserialize, Serialize};

pub use groovy::GroovyBodyGenerator;
pub use java::JavaBodyGenerator;

/// Text buffer with indentation tracking
#[derive(Debug, Default)]
pub struct BodyBuffer {
    output: String,
    indent_level: usize,
}

impl BodyBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, text: &str) {
        self.output.push_str(text);
    }

    pub fn add_line(&mut self, text: &str) {
        for _ in 0..self.indent_level {
            self.output.push_str("    ");
        }
        self.output.push_str(text);
        self.output.push('\n');
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn dedent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    pub fn get_output(&self) -> &str {
        &self.output
    }

    pub fn into_output(self) -> String {
        self.output
    }
}

/// Writes constructor text for one family of target syntax
pub trait ConstructorBodyGenerator {
    /// Open the declaration: `Name(params) {`
    fn start(&self, buffer: &mut BodyBuffer, name: &str, params: &[Param]);

    /// Terminator appended to each statement
    fn statement_terminator(&self) -> &'static str;

    /// Delegate to the superclass constructor, unless it takes no arguments
    fn super_call_if_needed(&self, buffer: &mut BodyBuffer, base_params: &[Param]) {
        if base_params.is_empty() {
            return;
        }
        let args: Vec<&str> = base_params.iter().map(|p| p.name.as_str()).collect();
        buffer.add_line(&format!("super({}){}", args.join(", "), self.statement_terminator()));
    }

    /// Assign each field from its parameter. `this.` is used when the names
    /// match or the field name is taken by another parameter.
    fn field_initialization(
        &self,
        buffer: &mut BodyBuffer,
        fields: &[FieldDescriptor],
        params: &[Param],
        existing_names: &[String],
    ) {
        for (field, param) in fields.iter().zip(params) {
            let qualifier = if field.name == param.name || existing_names.contains(&field.name) {
                "this."
            } else {
                ""
            };
            buffer.add_line(&format!(
                "{}{} = {}{}",
                qualifier,
                field.name,
                param.name,
                self.statement_terminator()
            ));
        }
    }

    fn finish(&self, buffer: &mut BodyBuffer) {
        buffer.dedent();
        buffer.add_line("}");
    }
}

/// Syntax family a constructor is generated in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetSyntax {
    #[default]
    Java,
    Groovy,
}

static JAVA: JavaBodyGenerator = JavaBodyGenerator;
static GROOVY: GroovyBodyGenerator = GroovyBodyGenerator;

impl TargetSyntax {
    pub fn body_generator(self) -> &'static dyn ConstructorBodyGenerator {
        match self {
            TargetSyntax::Java => &JAVA,
            TargetSyntax::Groovy => &GROOVY,
        }
    }

    /// Parser dialect for text written in this syntax
    pub fn dialect(self) -> Dialect {
        match self {
            TargetSyntax::Java => Dialect::Java,
            TargetSyntax::Groovy => Dialect::Groovy,
        }
    }
}

impl From<Dialect> for TargetSyntax {
    fn from(dialect: Dialect) -> Self {
        match dialect {
            Dialect::Java => TargetSyntax::Java,
            Dialect::Groovy => TargetSyntax::Groovy,
        }
    }
}

/// Write parameters as `Type name, Type... rest`
pub(crate) fn param_list(params: &[Param]) -> String {
    params
        .iter()
        .map(|p| {
            if p.varargs {
                format!("{}... {}", p.ty, p.name)
            } else {
                format!("{} {}", p.ty, p.name)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
