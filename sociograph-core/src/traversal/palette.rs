//! Fixed colour palettes attached to traversal results.
//!
//! Colours are plain names understood by common plotting back ends; the
//! engine never renders them itself.

use std::fmt;

/// Named colour assigned to a node, edge, or component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color(&'static str);

impl Color {
    const fn named(name: &'static str) -> Self {
        Self(name)
    }

    /// Returns the colour name.
    #[must_use]
    #[rustfmt::skip]
    pub const fn as_str(self) -> &'static str { self.0 }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Colours handed to BFS sources by source index, wrapping around.
pub const SOURCE_PALETTE: [Color; 10] = [
    Color::named("red"),
    Color::named("blue"),
    Color::named("green"),
    Color::named("orange"),
    Color::named("purple"),
    Color::named("brown"),
    Color::named("pink"),
    Color::named("olive"),
    Color::named("cyan"),
    Color::named("magenta"),
];

/// Colours handed to connected components in discovery order, wrapping
/// around.
pub const COMPONENT_PALETTE: [Color; 10] = [
    Color::named("tab:blue"),
    Color::named("tab:orange"),
    Color::named("tab:green"),
    Color::named("tab:red"),
    Color::named("tab:purple"),
    Color::named("tab:brown"),
    Color::named("tab:pink"),
    Color::named("tab:gray"),
    Color::named("tab:olive"),
    Color::named("tab:cyan"),
];

/// Colour of edges no BFS source traversed.
pub const BACKGROUND_EDGE_COLOR: Color = Color::named("lightgray");

/// Colour of nodes no BFS source reached.
pub const BACKGROUND_NODE_COLOR: Color = Color::named("lightgray");

pub(super) const fn wrapping(palette: &[Color; 10], index: usize) -> Color {
    palette[index % palette.len()]
}
