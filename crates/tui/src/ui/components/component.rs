//! Component system for the wizard UI.
//!
//! Components are self-contained UI elements that translate input into
//! [`Msg`]s for the [`App`], report side effects as [`Effect`]s, and render
//! themselves into a provided `Rect`.

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Span;

use crate::app::{App, Effect};

/// A UI element with its own rendering and key handling.
///
/// Components own only local presentation state; everything the wizard
/// depends on lives in [`App`] and is changed through [`App::update`].
pub(crate) trait Component {
    /// Handle key events while this component has focus.
    fn handle_key_events(&mut self, _app: &mut App, _key: KeyEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Render the component into the given area.
    ///
    /// Implementations should be side-effect free except for frame drawing
    /// and cursor placement.
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App);

    /// Key hints shown while this component has focus.
    fn hint_spans(&self, _app: &App) -> Vec<Span<'_>> {
        Vec::new()
    }
}
