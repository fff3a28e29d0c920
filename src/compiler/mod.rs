use crate::error::SchemaCompileError;
use crate::field::FieldSpec;
use crate::schema::SchemaNode;

mod flatten;
mod ordering;

use flatten::{FlattenContext, flatten_object};

/// Default base path compiled field addresses are rooted at.
pub const DEFAULT_BASE_PATH: &str = "config";

/// Compiles a connector specification schema into a flat, ordered tree of
/// renderable [`FieldSpec`] descriptors.
///
/// The compiler is a pure function of its inputs: no I/O, no shared state,
/// and the same schema always yields the same ordered output.
pub struct SpecCompiler {
    schema: SchemaNode,
    base_path: String,
}

pub struct SpecCompilerBuilder {
    schema: SchemaNode,
    base_path: String,
}

impl SpecCompilerBuilder {
    pub fn new(schema: SchemaNode) -> Self {
        Self {
            schema,
            base_path: DEFAULT_BASE_PATH.to_string(),
        }
    }

    /// Overrides the path prefix compiled field addresses are rooted at.
    pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    pub fn build(self) -> SpecCompiler {
        SpecCompiler {
            schema: self.schema,
            base_path: self.base_path,
        }
    }
}

impl SpecCompiler {
    pub fn builder(schema: SchemaNode) -> SpecCompilerBuilder {
        SpecCompilerBuilder::new(schema)
    }

    /// Compiles the schema into its ordered field-spec tree.
    ///
    /// Every object level is ordered by a two-pass resolution: explicit
    /// hints keep their value, unhinted properties are backfilled after the
    /// highest hint in declaration order. Discriminated unions are flattened
    /// into group specs whose children record the variant constant that
    /// makes them visible.
    ///
    /// Malformed unions (a variant without a `required` list, an empty or
    /// ambiguous discriminator intersection, a discriminator without a
    /// constant) are rejected with a [`SchemaCompileError`] rather than
    /// compiled into malformed paths.
    pub fn compile(&self) -> Result<Vec<FieldSpec>, SchemaCompileError> {
        let root = match &self.schema {
            SchemaNode::Object(object) => object,
            _ => return Err(SchemaCompileError::RootNotObject),
        };
        flatten_object(root, &self.base_path, FlattenContext::default())
    }
}
