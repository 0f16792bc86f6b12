//! Core types for the node canvas
//!
//! These types describe nodes as the canvas sees them: identity, position,
//! the type they instantiate, and the port schema of that type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a node
pub type NodeId = String;

/// A 2D integer position on the canvas
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i64,
    pub y: i64,
}

impl Position {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Return this position shifted by the given delta
    pub fn offset(self, dx: i64, dy: i64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl From<(i64, i64)> for Position {
    fn from((x, y): (i64, i64)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Direction of an endpoint relative to its node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Input,
    Output,
}

impl Direction {
    /// Key used when deriving endpoint identifiers
    pub fn uuid_key(&self) -> &'static str {
        match self {
            Self::Input => "-input",
            Self::Output => "-output",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => f.write_str("input"),
            Self::Output => f.write_str("output"),
        }
    }
}

/// A node instance as stored in the workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRef {
    /// Unique identifier for this node instance
    pub id: NodeId,
    /// Name, unique within the workflow
    pub name: String,
    /// Top-left corner on the canvas
    pub position: Position,
    /// Node type (references a TypeDescriptor)
    pub type_name: String,
    /// Version of the node type
    pub type_version: u32,
    /// Whether this node may be edited
    #[serde(default)]
    pub read_only: bool,
}

impl NodeRef {
    /// Create a node of the given type at the given position
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        type_name: impl Into<String>,
        position: Position,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position,
            type_name: type_name.into(),
            type_version: 1,
            read_only: false,
        }
    }

    /// Set the type version
    pub fn with_version(mut self, version: u32) -> Self {
        self.type_version = version;
        self
    }

    /// Mark this node as read-only
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }
}

/// Port schema of a node type
///
/// Inputs and outputs are ordered lists of group names; a name repeats
/// once for every port of that group (e.g. `["main", "main"]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDescriptor {
    /// Unique type identifier
    pub name: String,
    /// Type version
    pub version: u32,
    /// Declared input groups, in order
    pub inputs: Vec<String>,
    /// Declared output groups, in order
    pub outputs: Vec<String>,
    /// Display labels for inputs, by group index
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_names: Option<Vec<String>>,
    /// Display labels for outputs, by group index
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_names: Option<Vec<String>>,
}

impl TypeDescriptor {
    /// Create a type with no ports
    pub fn new(name: impl Into<String>, version: u32) -> Self {
        Self {
            name: name.into(),
            version,
            inputs: Vec::new(),
            outputs: Vec::new(),
            input_names: None,
            output_names: None,
        }
    }

    /// The built-in pass-through type with one main input and one main output
    pub fn no_op(name: impl Into<String>) -> Self {
        Self::new(name, 1)
            .with_inputs(["main"])
            .with_outputs(["main"])
    }

    /// Set the declared input groups
    pub fn with_inputs<I, S>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs = inputs.into_iter().map(Into::into).collect();
        self
    }

    /// Set the declared output groups
    pub fn with_outputs<I, S>(mut self, outputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.outputs = outputs.into_iter().map(Into::into).collect();
        self
    }

    /// Set display labels for inputs
    pub fn with_input_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.input_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Set display labels for outputs
    pub fn with_output_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Declared groups for a direction
    pub fn ports(&self, direction: Direction) -> &[String] {
        match direction {
            Direction::Input => &self.inputs,
            Direction::Output => &self.outputs,
        }
    }

    /// Display labels for a direction, if the type declares any
    pub fn port_names(&self, direction: Direction) -> Option<&[String]> {
        match direction {
            Direction::Input => self.input_names.as_deref(),
            Direction::Output => self.output_names.as_deref(),
        }
    }
}
