//! Output types for the presenter.
//!
//! These structs are serialized to JSON and handed to the page that draws
//! the graph. Everything is already in center-relative coordinates; the page
//! only translates by the viewport center.

use serde::Serialize;

use crate::config::LayoutConfig;
use crate::error::GraphError;
use crate::fetch::ViewKind;
use crate::graph::NormalizedNode;
use crate::interaction::{HoverTarget, InteractionState};
use crate::layout::{GraphLayout, PointF, PositionedNode, Spoke, Zone};

/// Coarse relevance bucket used for the badge colour.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelevanceBand {
    High,
    Medium,
    Low,
}

impl RelevanceBand {
    pub fn of(relevance: f64) -> Self {
        if relevance > 0.7 {
            RelevanceBand::High
        } else if relevance > 0.4 {
            RelevanceBand::Medium
        } else {
            RelevanceBand::Low
        }
    }
}

/// Badge text: three decimals, or the default score when not finite.
pub fn relevance_label(relevance: f64) -> String {
    if relevance.is_finite() {
        format!("{:.3}", relevance)
    } else {
        "0.200".to_string()
    }
}

/// A peer ready to draw.
#[derive(Debug, Clone, Serialize)]
pub struct NodeOutput {
    pub id: String,
    pub title: String,
    pub subfield: String,
    pub x: f64,
    pub y: f64,
    pub angle: f64,
    pub relevance: f64,
    pub relevance_label: String,
    pub relevance_band: RelevanceBand,
    /// Marker diameter, already scaled when highlighted.
    pub diameter: f64,
    pub highlighted: bool,
    pub spoke: Spoke,
}

/// The center marker.
#[derive(Debug, Clone, Serialize)]
pub struct CenterOutput {
    pub id: String,
    pub title: String,
    pub diameter: f64,
    pub highlighted: bool,
}

/// Detail overlay contents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeDetails {
    pub title: String,
    pub doi: String,
    pub year: i64,
    pub citations: u64,
    pub keywords: String,
    pub domain: String,
    pub field: String,
    pub subfield: String,
    pub topic: String,
    pub related_topics: String,
}

impl From<&NormalizedNode> for NodeDetails {
    fn from(n: &NormalizedNode) -> Self {
        NodeDetails {
            title: n.title.clone(),
            doi: if n.doi.is_empty() { "N/A".to_string() } else { n.doi.clone() },
            year: n.year,
            citations: n.citations,
            keywords: joined_or_none(&n.keywords),
            domain: n.domain.clone(),
            field: n.field.clone(),
            subfield: n.subfield.clone(),
            topic: n.topic.clone(),
            related_topics: joined_or_none(&n.related_topics),
        }
    }
}

fn joined_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join(", ")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HoverOutput {
    pub target: HoverTarget,
    pub pointer: PointF,
    pub tooltip: PointF,
    /// Missing when the hovered id is not in the current graph.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<NodeDetails>,
}

/// Error information for the page's error banner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorInfo {
    /// "transport", "payload" or "layout"
    pub kind: String,
    pub code: String,
    pub message: String,
}

impl From<&GraphError> for ErrorInfo {
    fn from(e: &GraphError) -> Self {
        ErrorInfo {
            kind: e.kind().to_string(),
            code: e.code().to_string(),
            message: e.to_string(),
        }
    }
}

/// The combined output sent to the page.
#[derive(Debug, Clone, Serialize)]
pub struct RenderFrame {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<ViewKind>,
    pub loading: bool,
    pub max_radius: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center: Option<CenterOutput>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<NodeOutput>,
    /// Renderable zones only.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub zones: Vec<Zone>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hover: Option<HoverOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl RenderFrame {
    pub fn build(layout: Option<&GraphLayout>, interaction: &InteractionState, cfg: &LayoutConfig) -> Self {
        let Some(layout) = layout else {
            return RenderFrame {
                view: None,
                loading: false,
                max_radius: 0.0,
                center: None,
                nodes: vec![],
                zones: vec![],
                hover: None,
                error: None,
            };
        };

        let center = layout.center.as_ref().map(|c| CenterOutput {
            id: c.id.clone(),
            title: c.title.clone(),
            diameter: cfg.center_radius * 2.0 * interaction.scale_for(&HoverTarget::Center, cfg.hover_scale),
            highlighted: interaction.is_hovered(&HoverTarget::Center),
        });

        let nodes = layout
            .nodes
            .iter()
            .map(|p| node_output(p, interaction, cfg))
            .collect();

        let zones = layout
            .zones
            .iter()
            .filter(|z| z.is_renderable())
            .cloned()
            .collect();

        let hover = interaction.hovered().zip(interaction.tooltip_anchor(cfg.tooltip_offset)).map(
            |(target, tooltip)| HoverOutput {
                target: target.clone(),
                pointer: interaction.pointer(),
                tooltip,
                details: hovered_node(layout, target).map(NodeDetails::from),
            },
        );

        RenderFrame {
            view: None,
            loading: false,
            max_radius: layout.max_radius,
            center,
            nodes,
            zones,
            hover,
            error: None,
        }
    }

    /// Radius the page should size the canvas for, also while nothing is laid out.
    pub fn with_max_radius(mut self, max_radius: f64) -> Self {
        self.max_radius = max_radius;
        self
    }

    pub fn with_view(mut self, view: ViewKind, loading: bool) -> Self {
        self.view = Some(view);
        self.loading = loading;
        self
    }

    pub fn with_error(mut self, error: Option<&GraphError>) -> Self {
        self.error = error.map(ErrorInfo::from);
        self
    }
}

fn node_output(p: &PositionedNode, interaction: &InteractionState, cfg: &LayoutConfig) -> NodeOutput {
    let target = HoverTarget::Peer(p.node.id.clone());
    NodeOutput {
        id: p.node.id.clone(),
        title: p.node.title.clone(),
        subfield: p.subfield.clone(),
        x: p.x,
        y: p.y,
        angle: p.angle,
        relevance: p.node.relevance,
        relevance_label: relevance_label(p.node.relevance),
        relevance_band: RelevanceBand::of(p.node.relevance),
        diameter: cfg.node_radius * 2.0 * interaction.scale_for(&target, cfg.hover_scale),
        highlighted: interaction.is_hovered(&target),
        spoke: p.spoke,
    }
}

fn hovered_node<'a>(layout: &'a GraphLayout, target: &HoverTarget) -> Option<&'a NormalizedNode> {
    match target {
        HoverTarget::Center => layout.center.as_ref(),
        HoverTarget::Peer(id) => layout.nodes.iter().map(|p| &p.node).find(|n| &n.id == id),
    }
}
