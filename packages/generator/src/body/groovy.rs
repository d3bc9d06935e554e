use super::{param_list, BodyBuffer, ConstructorBodyGenerator};
use jsoncreator_parser::ast::Param;

/// Line terminated statements; members are public unless marked otherwise
#[derive(Debug, Default, Clone, Copy)]
pub struct GroovyBodyGenerator;

impl ConstructorBodyGenerator for GroovyBodyGenerator {
    fn start(&self, buffer: &mut BodyBuffer, name: &str, params: &[Param]) {
        buffer.add_line(&format!("{}({}) {{", name, param_list(params)));
        buffer.indent();
    }

    fn statement_terminator(&self) -> &'static str {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldDescriptor;
    use jsoncreator_parser::ast::TypeRef;

    #[test]
    fn test_groovy_body() {
        let generator = GroovyBodyGenerator;
        let mut buffer = BodyBuffer::new();
        let fields = vec![FieldDescriptor::new("value", TypeRef::simple("String"))];
        let params = vec![Param::new("value", TypeRef::simple("String"))];

        generator.start(&mut buffer, "Child", &params);
        generator.super_call_if_needed(&mut buffer, &[Param::new("id", TypeRef::simple("String"))]);
        generator.field_initialization(&mut buffer, &fields, &params, &["value".to_string()]);
        generator.finish(&mut buffer);

        assert_eq!(
            buffer.get_output(),
            "Child(String value) {\n    super(id)\n    this.value = value\n}\n"
        );
    }
}
