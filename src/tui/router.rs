//! Which pane fills the main area for each view, and whether the
//! priority sidebar sits next to it.

use crate::models::View;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Home,
    Agenda,
    Completion,
    Highlights,
    Personal,
    Finance,
    Settings,
}

pub fn pane_for(view: View) -> Pane {
    match view {
        View::Home => Pane::Home,
        View::Agenda => Pane::Agenda,
        View::Completion => Pane::Completion,
        View::Highlights => Pane::Highlights,
        View::Personal => Pane::Personal,
        View::Finance => Pane::Finance,
        View::Settings => Pane::Settings,
    }
}

/// The task-centred views get the priority sidebar.
pub fn shows_sidebar(view: View) -> bool {
    matches!(view, View::Agenda | View::Completion | View::Highlights | View::Personal)
}

/// The journal excerpt under the priority list is hidden while the journal
/// itself is open.
pub fn shows_journal_excerpt(view: View) -> bool {
    shows_sidebar(view) && view != View::Personal
}
