use super::{param_list, BodyBuffer, ConstructorBodyGenerator};
use jsoncreator_parser::ast::Param;

/// `;` terminated statements, explicit `public`
#[derive(Debug, Default, Clone, Copy)]
pub struct JavaBodyGenerator;

impl ConstructorBodyGenerator for JavaBodyGenerator {
    fn start(&self, buffer: &mut BodyBuffer, name: &str, params: &[Param]) {
        buffer.add_line(&format!("public {}({}) {{", name, param_list(params)));
        buffer.indent();
    }

    fn statement_terminator(&self) -> &'static str {
        ";"
    }
}
