//! Fallback section synthesizer
//!
//! Templates that do not render dynamic sections themselves get equivalent
//! markup generated from [`RenderedCardData`]. A document moves from
//! [`SynthState::Unrendered`] to [`SynthState::Rendered`] exactly once; the
//! body marker attribute records the transition so later runs are no-ops.
//!
//! Insertion point: `[data-dynamic-sections]`, else the first `<main>`,
//! else `.content`, else `<body>`. Inside it, sections follow
//! `[data-dynamic-anchor]` in category order, or are appended.

mod sections;

pub use sections::{
    Category, QR_COPY_ATTR, QR_DOWNLOAD_ATTR, SECTION_ATTR, format_amount, hours_line, render_all,
};

use crate::dom::{DocumentSurface, Selector};
use shared::models::RenderedCardData;

/// Set on `<body>` once synthesis has run
pub const RENDERED_MARKER: &str = "data-vcard-rendered";
/// Present when the template rendered its own sections
pub const TEMPLATE_SECTIONS_MARKER: &str = "data-vcard-sections-rendered";
pub const SECTIONS_CONTAINER: &str = "data-dynamic-sections";
pub const SECTIONS_ANCHOR: &str = "data-dynamic-anchor";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthState {
    Unrendered,
    Rendered,
}

/// What a synthesis run did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthOutcome {
    /// Marker already present; nothing touched
    AlreadyRendered,
    /// Template has its own sections; only the marker was set
    TemplateRendered,
    /// No category had content; only the marker was set
    NothingToRender,
    /// Sections inserted, then the marker was set
    Rendered { sections: usize },
}

pub fn state<D: DocumentSurface>(doc: &D) -> SynthState {
    if doc.attribute(doc.body(), RENDERED_MARKER).is_some() {
        SynthState::Rendered
    } else {
        SynthState::Unrendered
    }
}

/// Container sections are inserted into
pub fn insertion_container<D: DocumentSurface>(doc: &D) -> D::Node {
    [
        Selector::Attribute(SECTIONS_CONTAINER),
        Selector::Tag("main"),
        Selector::Class("content"),
    ]
    .into_iter()
    .find_map(|selector| doc.query(None, selector))
    .unwrap_or_else(|| doc.body())
}

/// Run the synthesizer once over `doc`
pub fn synthesize<D: DocumentSurface>(doc: &mut D, data: &RenderedCardData) -> SynthOutcome {
    if state(doc) == SynthState::Rendered {
        tracing::debug!("Document already rendered, skipping synthesis");
        return SynthOutcome::AlreadyRendered;
    }

    let body = doc.body();
    if doc.query(None, Selector::Attribute(TEMPLATE_SECTIONS_MARKER)).is_some() {
        tracing::debug!("Template renders its own sections");
        doc.set_attribute(body, RENDERED_MARKER, "true");
        return SynthOutcome::TemplateRendered;
    }

    let rendered = render_all(data);
    if rendered.is_empty() {
        tracing::debug!("No section content to synthesize");
        doc.set_attribute(body, RENDERED_MARKER, "true");
        return SynthOutcome::NothingToRender;
    }

    let container = insertion_container(doc);
    let mut previous = doc.query(Some(container), Selector::Attribute(SECTIONS_ANCHOR));
    let count = rendered.len();
    for section in rendered {
        let node = match previous {
            Some(reference) => doc.insert_after(reference, section),
            None => doc.append_child(container, section),
        };
        if previous.is_some() {
            previous = Some(node);
        }
    }

    doc.set_attribute(body, RENDERED_MARKER, "true");
    tracing::debug!(sections = count, "Fallback sections synthesized");
    SynthOutcome::Rendered { sections: count }
}
