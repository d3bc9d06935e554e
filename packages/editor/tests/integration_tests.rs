use jsoncreator_editor::*;
use jsoncreator_generator::{
    ClassIndex, FieldDescriptor, GeneratorOptions, MemberDescriptor, VisibilityPolicy,
};
use jsoncreator_parser::ast::TypeRef;
use jsoncreator_parser::parse;
use std::fs;
use std::path::PathBuf;

const POINT: &str = "package com.example;

public class Point {
    private final int x;
    private final int y;
}
";

#[test]
fn test_point_round_trip_through_file() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("Point.java");
    fs::write(&path, POINT)?;

    let mut doc = Document::load(path.clone())?;
    let index = ClassIndex::new();
    let action = JsonCreatorAction::default();

    let members = action.candidates(&doc, &index, "Point")?;
    assert_eq!(members.len(), 2);

    let outcome = action.perform(&mut doc, &index, "Point", &members)?;
    assert_eq!(
        outcome,
        ActionOutcome::Inserted {
            class: "Point".to_string(),
            constructors: vec!["Point(int x, int y)".to_string()],
            imports: vec![
                "com.fasterxml.jackson.annotation.JsonCreator".to_string(),
                "com.fasterxml.jackson.annotation.JsonProperty".to_string(),
            ],
        }
    );
    assert!(doc.is_dirty());
    doc.save()?;
    assert!(!doc.is_dirty());

    let written = fs::read_to_string(&path)?;
    assert_eq!(
        written,
        "package com.example;

import com.fasterxml.jackson.annotation.JsonCreator;
import com.fasterxml.jackson.annotation.JsonProperty;

public class Point {
    private final int x;
    private final int y;

    @JsonCreator
    public Point(@JsonProperty(\"x\") int x, @JsonProperty(\"y\") int y) {
        this.x = x;
        this.y = y;
    }
}
"
    );
    Ok(())
}

#[test]
fn test_second_run_is_a_noop() -> anyhow::Result<()> {
    let mut doc = Document::from_source(PathBuf::from("Point.java"), POINT.to_string())?;
    let index = ClassIndex::new();
    let action = JsonCreatorAction::default();

    let members = action.candidates(&doc, &index, "Point")?;
    action.perform(&mut doc, &index, "Point", &members)?;
    let after_first = doc.source().to_string();

    let outcome = action.perform(&mut doc, &index, "Point", &members)?;
    assert_eq!(outcome, ActionOutcome::NothingToGenerate);
    assert_eq!(doc.source(), after_first);
    Ok(())
}

#[test]
fn test_child_with_superclass_in_other_file() -> anyhow::Result<()> {
    let base = parse(
        "package com.example.base;

public abstract class Entity<K> {
    /** Entity with a key. */
    protected Entity(K id) {
    }
}
",
    )?;
    let index = ClassIndex::from_units(vec![base]);

    let source = "package com.example;

import com.example.base.Entity;

public class User extends Entity<Long> {
    private String name;

    public String getName() {
        return name;
    }
}
";
    let mut doc = Document::from_source(PathBuf::from("User.java"), source.to_string())?;
    let action = JsonCreatorAction::default();
    let members = action.candidates(&doc, &index, "User")?;
    assert!(matches!(members[0], MemberDescriptor::BaseConstructor(_)));
    assert!(matches!(members[1], MemberDescriptor::Field(_)));

    action.perform(&mut doc, &index, "User", &members)?;
    let out = doc.source();
    assert!(out.contains(
        "import com.example.base.Entity;
import com.fasterxml.jackson.annotation.JsonCreator;
import com.fasterxml.jackson.annotation.JsonProperty;
"
    ));
    assert!(out.contains(
        "    private String name;

    @JsonCreator
    public User(Long id, @JsonProperty(\"name\") String name) {
        super(id);
        this.name = name;
    }

    public String getName() {"
    ));
    Ok(())
}

#[test]
fn test_superclass_types_from_other_package_are_imported() -> anyhow::Result<()> {
    let base = parse(
        "package com.base;

import java.util.List;
import com.base.model.Address;
import java.io.IOException;

public class Base {
    protected Base(List<String> tags, Address address) throws IOException {
    }
}
",
    )?;
    let index = ClassIndex::from_units(vec![base]);

    let source = "package com.example;

import com.base.Base;

public class Child extends Base {
    private int x;
}
";
    let mut doc = Document::from_source(PathBuf::from("Child.java"), source.to_string())?;
    let action = JsonCreatorAction::default();
    let members = action.candidates(&doc, &index, "Child")?;
    let outcome = action.perform(&mut doc, &index, "Child", &members)?;

    let ActionOutcome::Inserted { imports, .. } = outcome else {
        panic!("expected an inserted constructor");
    };
    assert_eq!(
        imports,
        vec![
            "com.fasterxml.jackson.annotation.JsonCreator",
            "java.util.List",
            "com.base.model.Address",
            "com.fasterxml.jackson.annotation.JsonProperty",
            "java.io.IOException",
        ]
    );

    let out = doc.source();
    for import in &imports {
        assert!(out.contains(&format!("import {};", import)), "{} not imported", import);
    }
    assert!(out.contains(
        "    @JsonCreator
    public Child(List<String> tags, Address address, @JsonProperty(\"x\") int x) throws IOException {
        super(tags, address);
        this.x = x;
    }"
    ));
    Ok(())
}

#[test]
fn test_groovy_document() -> anyhow::Result<()> {
    let source = "class Point {\n    int x\n    String name\n}\n";
    let mut doc = Document::from_source(PathBuf::from("Point.groovy"), source.to_string())?;
    let index = ClassIndex::new();
    let action = JsonCreatorAction::new(GeneratorOptions::default().with_visibility(VisibilityPolicy::Public));

    let members = action.candidates(&doc, &index, "Point")?;
    action.perform(&mut doc, &index, "Point", &members)?;

    let out = doc.source();
    assert!(out.starts_with(
        "import com.fasterxml.jackson.annotation.JsonCreator\nimport com.fasterxml.jackson.annotation.JsonProperty\n\n"
    ));
    assert!(out.contains(
        "    @JsonCreator
    Point(@JsonProperty(\"x\") int x, @JsonProperty(\"name\") String name) {
        this.x = x
        this.name = name
    }"
    ));
    assert!(!out.contains(';'));
    Ok(())
}

#[test]
fn test_failed_generation_leaves_document_untouched() -> anyhow::Result<()> {
    let mut doc = Document::from_source(PathBuf::from("Point.java"), POINT.to_string())?;
    let bad = vec![MemberDescriptor::Field(FieldDescriptor::new(
        "not a name",
        TypeRef::simple("int"),
    ))];

    let result = JsonCreatorAction::default().perform(&mut doc, &ClassIndex::new(), "Point", &bad);
    assert!(matches!(result, Err(EditorError::Generate(_))));
    assert_eq!(doc.source(), POINT);
    assert_eq!(doc.version, 0);
    Ok(())
}

#[test]
fn test_invalid_targets() -> anyhow::Result<()> {
    let source = "interface Shape {}\nrecord Pair(int a, int b) {}\n";
    let doc = Document::from_source(PathBuf::from("Shape.java"), source.to_string())?;
    let action = JsonCreatorAction::default();
    let index = ClassIndex::new();

    assert!(matches!(
        action.candidates(&doc, &index, "Shape"),
        Err(EditorError::InvalidTarget(_))
    ));
    assert!(matches!(
        action.candidates(&doc, &index, "Pair"),
        Err(EditorError::InvalidTarget(_))
    ));
    assert!(matches!(
        action.candidates(&doc, &index, "Missing"),
        Err(EditorError::ClassNotFound(_))
    ));
    Ok(())
}
