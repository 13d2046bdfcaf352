//! Inline computed style
//!
//! Only the properties that decide whether an element is rendered.

/// CSS display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    #[default]
    Block,
    Inline,
    None,
}

/// CSS visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

/// Per-element style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ElementStyle {
    pub display: Display,
    pub visibility: Visibility,
}

impl ElementStyle {
    /// `display: none` or `visibility: hidden`
    pub fn is_hidden(&self) -> bool {
        self.display == Display::None || self.visibility == Visibility::Hidden
    }
}
