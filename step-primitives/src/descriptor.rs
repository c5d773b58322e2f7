//! Self-describing tool schema: categories, type renderings, parameters,
//! and operations.
//!
//! Descriptors are built declaratively alongside the tool they describe,
//! once, at definition time. The defaulting rules (generated operation
//! descriptions, `Parameter <name>` fallbacks, required-unless-optional)
//! live in the builders here so every tool advertises a uniform surface.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::{Error, Result};

/// Broad category tag advertised with a tool descriptor.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolCategory {
    /// Market data and financial analysis tools.
    Finance,
    /// Weather conditions and forecast tools.
    Weather,
    /// News and article retrieval tools.
    News,
    /// Anything without a more specific category.
    #[default]
    General,
}

impl fmt::Display for ToolCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Finance => "finance",
            Self::Weather => "weather",
            Self::News => "news",
            Self::General => "general",
        })
    }
}

/// Declared-type descriptor for parameters and return values.
///
/// Renders to the string forms the planner sees: `str`, `int`, `float`,
/// `bool`, `Optional[T]`, `List[T]`, `Dict[K, V]`, and `Any` when nothing
/// more specific is declared.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TypeSpec {
    /// Untyped; the default when nothing is declared.
    Any,
    /// UTF-8 text.
    Str,
    /// Signed integer.
    Int,
    /// Floating-point number.
    Float,
    /// Boolean flag.
    Bool,
    /// A value that may be absent.
    Optional(Box<TypeSpec>),
    /// Homogeneous sequence.
    List(Box<TypeSpec>),
    /// Key/value mapping.
    Map(Box<TypeSpec>, Box<TypeSpec>),
    /// Named type the engine does not interpret further.
    Named(String),
}

impl TypeSpec {
    /// Wraps this type in an `Optional[...]` rendering.
    #[must_use]
    pub fn optional(self) -> Self {
        Self::Optional(Box::new(self))
    }

    /// Builds a `List[...]` of this type.
    #[must_use]
    pub fn list(self) -> Self {
        Self::List(Box::new(self))
    }

    /// Builds a `Dict[K, V]` mapping.
    #[must_use]
    pub fn map(key: TypeSpec, value: TypeSpec) -> Self {
        Self::Map(Box::new(key), Box::new(value))
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("Any"),
            Self::Str => f.write_str("str"),
            Self::Int => f.write_str("int"),
            Self::Float => f.write_str("float"),
            Self::Bool => f.write_str("bool"),
            Self::Optional(inner) => write!(f, "Optional[{inner}]"),
            Self::List(inner) => write!(f, "List[{inner}]"),
            Self::Map(key, value) => write!(f, "Dict[{key}, {value}]"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

impl Serialize for TypeSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Specification of one formal parameter of a tool operation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ParameterSpec {
    name: String,
    #[serde(rename = "type")]
    type_spec: TypeSpec,
    description: String,
    required: bool,
}

impl ParameterSpec {
    /// Creates a required parameter with a generated description.
    #[must_use]
    pub fn new(name: impl Into<String>, type_spec: TypeSpec) -> Self {
        let name = name.into();
        let description = format!("Parameter {name}");
        Self {
            name,
            type_spec,
            description,
            required: true,
        }
    }

    /// Replaces the generated description with documentation text.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Marks the parameter as optional, i.e. it carries a default value.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Returns the parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared type descriptor.
    #[must_use]
    pub fn type_spec(&self) -> &TypeSpec {
        &self.type_spec
    }

    /// Returns the human-readable description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns `true` when the caller must supply this parameter.
    #[must_use]
    pub const fn required(&self) -> bool {
        self.required
    }
}

/// Specification of one publicly exposed tool operation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OperationSpec {
    name: String,
    description: String,
    parameters: Vec<ParameterSpec>,
    return_type: TypeSpec,
}

impl OperationSpec {
    /// Starts building an operation specification.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> OperationSpecBuilder {
        OperationSpecBuilder {
            name: name.into(),
            description: None,
            parameters: Vec::new(),
            return_type: TypeSpec::Any,
        }
    }

    /// Returns the operation name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the one-line description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the ordered parameter specifications.
    #[must_use]
    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    /// Returns the declared return type.
    #[must_use]
    pub fn return_type(&self) -> &TypeSpec {
        &self.return_type
    }

    /// Looks up a parameter by name.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|param| param.name() == name)
    }

    /// Returns `true` when the operation declares the named parameter.
    #[must_use]
    pub fn accepts(&self, name: &str) -> bool {
        self.parameter(name).is_some()
    }
}

/// Builder for [`OperationSpec`].
#[derive(Debug)]
pub struct OperationSpecBuilder {
    name: String,
    description: Option<String>,
    parameters: Vec<ParameterSpec>,
    return_type: TypeSpec,
}

impl OperationSpecBuilder {
    /// Sets the one-line description, typically the first documentation line.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Appends a parameter specification.
    #[must_use]
    pub fn parameter(mut self, parameter: ParameterSpec) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Sets the declared return type.
    #[must_use]
    pub fn returns(mut self, return_type: TypeSpec) -> Self {
        self.return_type = return_type;
        self
    }

    /// Finalises the operation specification.
    ///
    /// An omitted description falls back to a generated default naming the
    /// operation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDescriptor`] when the operation name is empty
    /// or two parameters share a name.
    pub fn build(self) -> Result<OperationSpec> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid_descriptor("operation name cannot be empty"));
        }

        for (idx, param) in self.parameters.iter().enumerate() {
            if self.parameters[..idx].iter().any(|p| p.name() == param.name()) {
                return Err(Error::invalid_descriptor(format!(
                    "duplicate parameter `{}` on operation `{}`",
                    param.name(),
                    self.name
                )));
            }
        }

        let description = self
            .description
            .unwrap_or_else(|| format!("Operation {}", self.name));

        Ok(OperationSpec {
            name: self.name,
            description,
            parameters: self.parameters,
            return_type: self.return_type,
        })
    }
}

/// Self-describing schema for a tool's complete callable surface.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ToolDescriptor {
    name: String,
    description: String,
    category: ToolCategory,
    operations: Vec<OperationSpec>,
}

impl ToolDescriptor {
    /// Starts building a tool descriptor.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> ToolDescriptorBuilder {
        ToolDescriptorBuilder {
            name: name.into(),
            description: None,
            category: ToolCategory::General,
            operations: Vec::new(),
        }
    }

    /// Returns the tool name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the one-line tool description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the category tag.
    #[must_use]
    pub const fn category(&self) -> ToolCategory {
        self.category
    }

    /// Returns every publicly exposed operation.
    #[must_use]
    pub fn operations(&self) -> &[OperationSpec] {
        &self.operations
    }

    /// Looks up an operation by name.
    #[must_use]
    pub fn operation(&self, name: &str) -> Option<&OperationSpec> {
        self.operations.iter().find(|op| op.name() == name)
    }
}

/// Builder for [`ToolDescriptor`].
#[derive(Debug)]
pub struct ToolDescriptorBuilder {
    name: String,
    description: Option<String>,
    category: ToolCategory,
    operations: Vec<OperationSpec>,
}

impl ToolDescriptorBuilder {
    /// Sets the one-line tool description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the category tag.
    #[must_use]
    pub fn category(mut self, category: ToolCategory) -> Self {
        self.category = category;
        self
    }

    /// Appends an operation specification.
    #[must_use]
    pub fn operation(mut self, operation: OperationSpec) -> Self {
        self.operations.push(operation);
        self
    }

    /// Finalises the descriptor.
    ///
    /// A descriptor may be built with zero operations; the registry rejects
    /// such tools at registration time, which is where the failure belongs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDescriptor`] when the tool name is empty or
    /// two operations share a name.
    pub fn build(self) -> Result<ToolDescriptor> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid_descriptor("tool name cannot be empty"));
        }

        for (idx, op) in self.operations.iter().enumerate() {
            if self.operations[..idx].iter().any(|o| o.name() == op.name()) {
                return Err(Error::invalid_descriptor(format!(
                    "duplicate operation `{}` on tool `{}`",
                    op.name(),
                    self.name
                )));
            }
        }

        let description = self
            .description
            .unwrap_or_else(|| format!("Tool {}", self.name));

        Ok(ToolDescriptor {
            name: self.name,
            description,
            category: self.category,
            operations: self.operations,
        })
    }
}
