use super::{build_index, open_document, target_class};
use crate::config::Config;
use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use jsoncreator_editor::{ActionOutcome, JsonCreatorAction};
use jsoncreator_generator::MemberDescriptor;
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Java or Groovy source file
    pub file: PathBuf,

    /// Class to generate for (defaults to the class named after the file)
    #[arg(short, long)]
    pub class: Option<String>,

    /// Select a field by name (repeatable)
    #[arg(short, long = "field")]
    pub fields: Vec<String>,

    /// Select a candidate by its index in `jsoncreator members` (repeatable)
    #[arg(short, long = "member")]
    pub members: Vec<usize>,

    /// Print the edited source instead of writing the file
    #[arg(long)]
    pub stdout: bool,

    /// Print the outcome as JSON
    #[arg(long)]
    pub json: bool,
}

/// Generate `@JsonCreator` constructors and insert them into the file
pub fn generate(args: GenerateArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let file = PathBuf::from(cwd).join(&args.file);
    let mut document = open_document(&file)?;
    let class = target_class(&document, args.class)?;
    let index = build_index(&config, cwd, &file);

    let action = JsonCreatorAction::new(config.generator);
    let candidates = action.candidates(&document, &index, &class)?;
    let selection = select(&candidates, &args.fields, &args.members)?;

    let outcome = action.perform(&mut document, &index, &class, &selection)?;

    if args.stdout {
        print!("{}", document.source());
    } else if document.is_dirty() {
        document.save()?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }
    if args.stdout {
        return Ok(());
    }

    match outcome {
        ActionOutcome::Inserted {
            class,
            constructors,
            imports,
        } => {
            println!("{} {}", "✨".green(), class.bright_white().bold());
            for constructor in constructors {
                println!("  {} {}", "✓".green(), constructor);
            }
            for import in imports {
                println!("  {} import {}", "+".green(), import);
            }
        }
        ActionOutcome::NothingToGenerate => {
            println!(
                "{} {} already has these constructors",
                "⚠️".yellow(),
                class.bright_white()
            );
        }
    }

    Ok(())
}

/// Members picked by name or index, in candidate order. When nothing is
/// picked: every field plus the first superclass constructor, since each
/// selected superclass constructor yields its own creator.
fn select(
    candidates: &[MemberDescriptor],
    fields: &[String],
    members: &[usize],
) -> Result<Vec<MemberDescriptor>> {
    if fields.is_empty() && members.is_empty() {
        let first_base = candidates
            .iter()
            .position(|m| matches!(m, MemberDescriptor::BaseConstructor(_)));
        return Ok(candidates
            .iter()
            .enumerate()
            .filter(|(i, m)| matches!(m, MemberDescriptor::Field(_)) || Some(*i) == first_base)
            .map(|(_, m)| m.clone())
            .collect());
    }

    for name in fields {
        let known = candidates
            .iter()
            .any(|m| matches!(m, MemberDescriptor::Field(f) if &f.name == name));
        if !known {
            bail!("No selectable field named {}", name);
        }
    }
    if let Some(index) = members.iter().find(|i| **i >= candidates.len()) {
        bail!(
            "Member index {} is out of range ({} candidates)",
            index,
            candidates.len()
        );
    }

    let selection: Vec<MemberDescriptor> = candidates
        .iter()
        .enumerate()
        .filter(|(i, member)| {
            members.contains(i)
                || matches!(member, MemberDescriptor::Field(f) if fields.contains(&f.name))
        })
        .map(|(_, member)| member.clone())
        .collect();

    let bases = selection
        .iter()
        .filter(|m| matches!(m, MemberDescriptor::BaseConstructor(_)))
        .count();
    if bases > 1 {
        warn!(
            creators = bases,
            "several superclass constructors selected; Jackson rejects more than one @JsonCreator per class"
        );
    }
    Ok(selection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsoncreator_generator::{BaseConstructor, BaseConstructorParameter, FieldDescriptor};
    use jsoncreator_parser::ast::TypeRef;
    use std::fs;

    fn candidates() -> Vec<MemberDescriptor> {
        vec![
            MemberDescriptor::BaseConstructor(BaseConstructor::new(vec![])),
            MemberDescriptor::BaseConstructor(BaseConstructor::new(vec![
                BaseConstructorParameter::new("message", TypeRef::simple("String")),
            ])),
            MemberDescriptor::Field(FieldDescriptor::new("x", TypeRef::simple("int"))),
            MemberDescriptor::Field(FieldDescriptor::new("y", TypeRef::simple("int"))),
        ]
    }

    #[test]
    fn test_select_defaults_to_fields_and_first_base_constructor() {
        let picked = select(&candidates(), &[], &[]).unwrap();
        let labels: Vec<String> = picked.iter().map(|m| m.label()).collect();
        assert_eq!(labels, vec!["super()", "int x", "int y"]);
    }

    #[test]
    fn test_select_keeps_candidate_order() {
        let picked = select(&candidates(), &["y".to_string()], &[1]).unwrap();
        assert_eq!(picked.len(), 2);
        assert_eq!(picked[0].label(), "super(String message)");
        assert_eq!(picked[1].label(), "int y");
    }

    #[test]
    fn test_select_rejects_unknown_members() {
        assert!(select(&candidates(), &["z".to_string()], &[]).is_err());
        assert!(select(&candidates(), &[], &[4]).is_err());
    }

    #[test]
    fn test_generate_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(
            src.join("Base.java"),
            "public class Base {\n    protected Base(String id) {\n    }\n}\n",
        )
        .unwrap();
        fs::write(
            src.join("Point.java"),
            "public class Point extends Base {\n    private int x;\n}\n",
        )
        .unwrap();

        let cwd = dir.path().display().to_string();
        let args = GenerateArgs {
            file: PathBuf::from("src/Point.java"),
            class: None,
            fields: vec![],
            members: vec![],
            stdout: false,
            json: false,
        };
        generate(args, &cwd).unwrap();

        let written = fs::read_to_string(src.join("Point.java")).unwrap();
        assert!(written.starts_with("import com.fasterxml.jackson.annotation.JsonCreator;\n"));
        assert!(written.contains(
            "    @JsonCreator
    public Point(String id, @JsonProperty(\"x\") int x) {
        super(id);
        this.x = x;
    }"
        ));
    }

    #[test]
    fn test_generate_defaults_to_a_single_creator() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        let path = dir.path().join("src/Failure.java");
        fs::write(&path, "public class Failure extends Exception {\n    private int code;\n}\n").unwrap();

        let args = GenerateArgs {
            file: PathBuf::from("src/Failure.java"),
            class: None,
            fields: vec![],
            members: vec![],
            stdout: false,
            json: false,
        };
        generate(args, &dir.path().display().to_string()).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written.matches("@JsonCreator\n").count(), 1);
        assert!(written.contains("this.code = code;"));
    }
}
