//! Endpoint layout for a node box
//!
//! Turns the port schema of a node type into endpoint descriptors with
//! stable identifiers and precomputed anchors. Everything here is a pure
//! function of its inputs: laying out the same node twice yields the same
//! descriptors, which lets the connector layer re-attach existing
//! connections by uuid after a re-render.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::anchors::{anchor_for, Anchor};
use crate::error::Result;
use crate::types::{Direction, NodeRef, TypeDescriptor};

/// What an endpoint is drawn for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointRole {
    /// A regular connection port
    Port,
    /// Low-weight "+" affordance attached to an output for adding a node
    QuickAdd,
}

/// Shape hint for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointShape {
    Rectangle,
    Dot,
    Plus,
}

/// How many connections an endpoint accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capacity {
    #[default]
    Unbounded,
    Limited(u32),
}

impl Capacity {
    /// Whether another connection fits given the current count
    pub fn admits(&self, current: u32) -> bool {
        match self {
            Self::Unbounded => true,
            Self::Limited(max) => current < *max,
        }
    }
}

/// Size of a quick-add affordance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickAddSize {
    Small,
    Medium,
}

/// Presentation hints for a quick-add endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickAddStyle {
    /// Show the output's label next to the affordance
    pub show_output_label: bool,
    pub size: QuickAddSize,
}

impl QuickAddStyle {
    fn for_output_count(total: usize) -> Self {
        Self {
            show_output_label: total == 1,
            size: if total >= 3 {
                QuickAddSize::Small
            } else {
                QuickAddSize::Medium
            },
        }
    }
}

/// Ownership metadata used for hit-testing and connection redrawing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointMeta {
    pub node_name: String,
    pub node_id: String,
    /// Position in the declaration order of this direction
    pub ordinal: usize,
    /// Number of endpoints declared in this direction
    pub total_endpoints: usize,
}

/// A fully laid out endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointDescriptor {
    pub uuid: String,
    pub direction: Direction,
    pub role: EndpointRole,
    pub shape: EndpointShape,
    /// Declared group name (e.g. "main")
    pub group: String,
    /// Index within the group
    pub index: usize,
    pub anchor: Anchor,
    pub capacity: Capacity,
    pub enabled: bool,
    pub is_source: bool,
    pub is_target: bool,
    pub drag_allowed_when_full: bool,
    /// Label overlay text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quick_add: Option<QuickAddStyle>,
    pub meta: EndpointMeta,
}

/// Stable endpoint identifier for `(node_id, direction, index)`
pub fn endpoint_uuid(node_id: &str, direction: Direction, index: usize) -> String {
    format!("{}{}{}", node_id, direction.uuid_key(), index)
}

/// Assign each declared port its index within its group
///
/// `["main", "main", "error"]` becomes `[0, 1, 0]`.
pub fn group_indices(ports: &[String]) -> Vec<usize> {
    let mut next: HashMap<&str, usize> = HashMap::new();
    ports
        .iter()
        .map(|group| {
            let slot = next.entry(group.as_str()).or_insert(0);
            let index = *slot;
            *slot += 1;
            index
        })
        .collect()
}

/// Lay out all endpoints of one direction
pub fn layout_direction(
    node: &NodeRef,
    descriptor: &TypeDescriptor,
    direction: Direction,
    read_only: bool,
) -> Result<Vec<EndpointDescriptor>> {
    let ports = descriptor.ports(direction);
    let names = descriptor.port_names(direction);
    let total = ports.len();
    let mut endpoints = Vec::with_capacity(total * 2);

    for (ordinal, (group, index)) in ports.iter().zip(group_indices(ports)).enumerate() {
        let anchor = anchor_for(direction, total, index)?;
        let uuid = endpoint_uuid(&node.id, direction, index);
        let meta = EndpointMeta {
            node_name: node.name.clone(),
            node_id: node.id.clone(),
            ordinal,
            total_endpoints: total,
        };
        let label = names.and_then(|n| n.get(index)).cloned();

        let port = match direction {
            Direction::Input => EndpointDescriptor {
                uuid,
                direction,
                role: EndpointRole::Port,
                shape: EndpointShape::Rectangle,
                group: group.clone(),
                index,
                anchor,
                capacity: Capacity::Unbounded,
                enabled: !read_only,
                is_source: false,
                // Single inputs are attached by dropping on the node itself
                is_target: !read_only && total > 1,
                drag_allowed_when_full: true,
                label,
                quick_add: None,
                meta,
            },
            Direction::Output => EndpointDescriptor {
                uuid,
                direction,
                role: EndpointRole::Port,
                shape: EndpointShape::Dot,
                group: group.clone(),
                index,
                anchor,
                capacity: Capacity::Unbounded,
                enabled: !read_only,
                is_source: true,
                is_target: false,
                drag_allowed_when_full: false,
                label,
                quick_add: None,
                meta,
            },
        };

        let quick_add = (direction == Direction::Output && !read_only).then(|| EndpointDescriptor {
            role: EndpointRole::QuickAdd,
            shape: EndpointShape::Plus,
            label: None,
            quick_add: Some(QuickAddStyle::for_output_count(total)),
            ..port.clone()
        });

        endpoints.push(port);
        endpoints.extend(quick_add);
    }

    Ok(endpoints)
}

/// Lay out every endpoint of a node, inputs first
pub fn layout_endpoints(
    node: &NodeRef,
    descriptor: &TypeDescriptor,
    read_only: bool,
) -> Result<Vec<EndpointDescriptor>> {
    let mut endpoints = layout_direction(node, descriptor, Direction::Input, read_only)?;
    endpoints.extend(layout_direction(node, descriptor, Direction::Output, read_only)?);
    Ok(endpoints)
}
