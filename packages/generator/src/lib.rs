//! # jsoncreator generator
//!
//! Synthesizes constructors annotated for JSON deserialization
//! (`@JsonCreator`) from a class's fields and, optionally, the superclass
//! constructors they should delegate to.
//!
//! ## Features
//!
//! - **Class model**: `ClassIndex` turns parsed sources into `ClassDescriptor`s
//!   and resolves superclasses across files and a built-in `java.lang` table
//! - **Generic substitution**: inherited constructor types are rewritten to the
//!   subclass's view of the superclass
//! - **Naming conventions**: field/parameter prefixes and suffixes, unique names
//! - **Per-syntax bodies**: Java and Groovy body generators
//!
//! ## Example
//!
//! ```rust
//! use jsoncreator_generator::{ClassIndex, ConstructorSynthesizer, GeneratorOptions};
//! use jsoncreator_parser::parse;
//!
//! let unit = parse("public class Point { private int x; private int y; }").unwrap();
//! let class = ClassIndex::new().describe(&unit, unit.top_level[0]).unwrap();
//!
//! let synthesizer = ConstructorSynthesizer::new(GeneratorOptions::default());
//! let prototypes = synthesizer.generate(&class, &class.members).unwrap();
//! assert_eq!(prototypes.len(), 1);
//! assert_eq!(prototypes[0].params().len(), 2);
//! ```

pub mod body;
pub mod error;
pub mod index;
pub mod library;
pub mod model;
pub mod naming;
pub mod options;
pub mod substitution;
pub mod synthesizer;

// Re-export main types for convenience
pub use body::{BodyBuffer, ConstructorBodyGenerator, TargetSyntax};
pub use error::{GenerateError, GenerateResult};
pub use index::ClassIndex;
pub use model::{
    BaseConstructor, BaseConstructorParameter, ClassDescriptor, ConstructorOrigin,
    ConstructorPrototype, FieldDescriptor, MemberDescriptor, Nullability, Signature,
    SuperclassRef,
};
pub use naming::NamingConventions;
pub use options::{GeneratorOptions, VisibilityPolicy};
pub use substitution::Substitutor;
pub use synthesizer::{filter_out_already_inserted, generate, ConstructorSynthesizer};
