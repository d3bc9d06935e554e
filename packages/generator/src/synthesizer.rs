use crate::body::BodyBuffer;
use crate::error::{GenerateError, GenerateResult};
use crate::model::*;
use crate::naming::{is_identifier, uniquify};
use crate::options::GeneratorOptions;
use crate::substitution::Substitutor;
use jsoncreator_parser::ast::{
    Annotation, Member, MethodDecl, Modifiers, Param, Span, Statement, MODIFIER_ORDER,
};
use jsoncreator_parser::parse_member;
use tracing::{debug, info, instrument};

/// Builds `@JsonCreator` constructors for a class from selected fields and
/// superclass constructors.
pub struct ConstructorSynthesizer {
    options: GeneratorOptions,
}

impl ConstructorSynthesizer {
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// One prototype per selected base constructor, or a single one when no
    /// base constructor is selected. Returns nothing when the class already
    /// declares every generated signature.
    #[instrument(skip(self, class, members), fields(class = %class.name, members = members.len()))]
    pub fn generate(
        &self,
        class: &ClassDescriptor,
        members: &[MemberDescriptor],
    ) -> GenerateResult<Vec<ConstructorPrototype>> {
        if !is_identifier(&class.name) {
            return Err(GenerateError::UnsupportedConstruct(format!(
                "'{}' is not a valid class name",
                class.name
            )));
        }

        let mut base_constructors = Vec::new();
        let mut fields = Vec::new();
        for member in members {
            match member {
                MemberDescriptor::BaseConstructor(ctor) => base_constructors.push(ctor),
                MemberDescriptor::Field(field) => fields.push(field.clone()),
            }
        }

        let prototypes = if base_constructors.is_empty() {
            vec![self.generate_prototype(class, None, &fields)?]
        } else {
            let superclass = class.superclass.as_ref().ok_or_else(|| {
                GenerateError::InvalidTarget(format!(
                    "{} has no superclass to delegate to",
                    class.name
                ))
            })?;
            let substitutor = Substitutor::for_superclass(superclass);
            base_constructors
                .into_iter()
                .map(|ctor| {
                    let ctor = substitutor.substitute_constructor(ctor);
                    self.generate_prototype(class, Some(&ctor), &fields)
                })
                .collect::<GenerateResult<Vec<_>>>()?
        };

        Ok(filter_out_already_inserted(class, prototypes))
    }

    /// Build a single constructor. `base` must already be substituted into
    /// the subclass's view of the superclass.
    pub fn generate_prototype(
        &self,
        class: &ClassDescriptor,
        base: Option<&BaseConstructor>,
        fields: &[FieldDescriptor],
    ) -> GenerateResult<ConstructorPrototype> {
        let mut modifiers = Modifiers::default();
        modifiers.add_annotation(Annotation::marker(self.options.creator_annotation.clone()));
        modifiers.set_visibility(self.options.visibility.resolve(class.kind, class.visibility));

        let mut decl = MethodDecl {
            modifiers,
            type_params: Vec::new(),
            return_type: None,
            name: class.name.clone(),
            params: Vec::new(),
            throws: Vec::new(),
            body: None,
            doc: None,
            span: Span::synthetic(),
        };

        if let Some(base) = base {
            decl.throws = base.throws.clone();
            if self.options.copy_javadoc {
                decl.doc = base.doc.clone();
            }
        }

        let mut is_not_enum = false;
        let mut base_params = Vec::new();
        if let Some(base) = base {
            let superclass = class.superclass.as_ref().ok_or_else(|| {
                GenerateError::InvalidTarget(format!("{} has no superclass", class.name))
            })?;
            if !superclass.is_enum() {
                is_not_enum = true;
                decl.type_params = base.type_params.clone();
                base_params = named_base_params(base)?;
                decl.params.extend(base_params.iter().cloned());
            }
        }

        let mut dummy: Vec<String> = decl.params.iter().map(|p| p.name.clone()).collect();
        let mut field_params = Vec::with_capacity(fields.len());
        for field in fields {
            if !is_identifier(&field.name) {
                return Err(GenerateError::UnsupportedConstruct(format!(
                    "'{}' is not a valid field name",
                    field.name
                )));
            }
            if field.ty.name.is_empty() {
                return Err(GenerateError::UnsupportedConstruct(format!(
                    "field '{}' has no type",
                    field.name
                )));
            }

            let naming = &self.options.naming;
            let property = naming.field_name_to_property_name(&field.name);
            let param_name = naming.property_name_to_parameter_name(&property);
            let param_name = uniquify(&param_name, &dummy);

            let mut param = Param::new(param_name.clone(), field.ty.clone());
            if let Some(not_null) = field.not_null_annotation() {
                let mut copied = not_null.clone();
                copied.span = Span::synthetic();
                param.modifiers.add_annotation(copied);
            }
            param.modifiers.add_annotation(Annotation::with_literal(
                self.options.property_annotation.clone(),
                &property,
            ));

            if decl.is_varargs() {
                let at = decl.params.len() - 1;
                decl.params.insert(at, param.clone());
                let at = dummy.len() - 1;
                dummy.insert(at, param_name);
            } else {
                decl.params.push(param.clone());
                dummy.push(param_name);
            }
            field_params.push(param);
        }

        let generator = self.options.target.body_generator();
        let mut buffer = BodyBuffer::new();
        generator.start(&mut buffer, &decl.name, &[]);
        if is_not_enum {
            generator.super_call_if_needed(&mut buffer, &base_params);
        }
        generator.field_initialization(&mut buffer, fields, &field_params, &dummy);
        generator.finish(&mut buffer);

        let text = buffer.into_output();
        debug!(body = %text, "generated constructor text");
        decl.body = match parse_member(&text, &decl.name, self.options.target.dialect())? {
            Member::Constructor(stub) => stub.body,
            _ => {
                return Err(GenerateError::UnsupportedConstruct(format!(
                    "generated text for {} is not a constructor",
                    decl.name
                )))
            }
        };

        normalize(&mut decl);
        Ok(ConstructorPrototype { declaration: decl })
    }
}

impl Default for ConstructorSynthesizer {
    fn default() -> Self {
        Self::new(GeneratorOptions::default())
    }
}

/// Generate with default options
pub fn generate(
    class: &ClassDescriptor,
    members: &[MemberDescriptor],
) -> GenerateResult<Vec<ConstructorPrototype>> {
    ConstructorSynthesizer::default().generate(class, members)
}

/// Base constructor parameters as declared parameters. Parameters known only
/// by type are named `arg0`, `arg1`, ... by position.
fn named_base_params(base: &BaseConstructor) -> GenerateResult<Vec<Param>> {
    let mut params = Vec::with_capacity(base.params.len());
    for (i, param) in base.params.iter().enumerate() {
        let name = match &param.name {
            Some(name) => name.clone(),
            None => {
                debug!(position = i, origin = ?base.origin, "base constructor parameter has no name");
                format!("arg{}", i)
            }
        };
        if !is_identifier(&name) {
            return Err(GenerateError::UnsupportedConstruct(format!(
                "'{}' is not a valid parameter name",
                name
            )));
        }
        if param.ty.name.is_empty() {
            return Err(GenerateError::UnsupportedConstruct(format!(
                "parameter '{}' has no type",
                name
            )));
        }
        params.push(Param {
            modifiers: param.modifiers.clone(),
            ty: param.ty.clone(),
            name,
            varargs: param.varargs,
            span: Span::synthetic(),
        });
    }
    Ok(params)
}

/// Drop the whole batch when the class already declares every signature in
/// it. A batch with only some duplicates is returned unchanged.
pub fn filter_out_already_inserted(
    class: &ClassDescriptor,
    prototypes: Vec<ConstructorPrototype>,
) -> Vec<ConstructorPrototype> {
    let already_exist = prototypes
        .iter()
        .all(|p| class.has_constructor(&p.signature()));
    if already_exist {
        info!(class = %class.name, "all constructors already exist");
        return Vec::new();
    }
    prototypes
}

/// Canonical modifier order and trimmed expression text
pub fn normalize(decl: &mut MethodDecl) {
    sort_modifiers(&mut decl.modifiers);
    for param in &mut decl.params {
        sort_modifiers(&mut param.modifiers);
    }

    if let Some(body) = &mut decl.body {
        for statement in &mut body.statements {
            match statement {
                Statement::SuperCall { args, .. } | Statement::ThisCall { args, .. } => {
                    for arg in args.iter_mut() {
                        *arg = arg.trim().to_string();
                    }
                }
                Statement::Assign { value, .. } => *value = value.trim().to_string(),
                Statement::Other { text, .. } => *text = text.trim().to_string(),
            }
        }
    }
}

fn sort_modifiers(modifiers: &mut Modifiers) {
    modifiers.keywords.sort_by_key(|k| {
        MODIFIER_ORDER
            .iter()
            .position(|m| *m == k.as_str())
            .unwrap_or(MODIFIER_ORDER.len())
    });
    modifiers.keywords.dedup();
}
