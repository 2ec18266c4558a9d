/// Prompt shown before a lesson is removed from the library.
pub const DELETE_LESSON_PROMPT: &str =
    "Deseja excluir esta aula permanentemente da biblioteca fixa? Esta ação não pode ser desfeita.";

/// Prompt shown before a media asset is removed.
pub const DELETE_MEDIA_PROMPT: &str = "Excluir este arquivo da biblioteca?";

/// Acknowledgment step for irreversible actions.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

/// A decision taken up front (e.g. a `--yes` flag).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Confirmation {
    Granted,
    Declined,
}

impl Confirm for Confirmation {
    fn confirm(&self, _prompt: &str) -> bool {
        matches!(self, Self::Granted)
    }
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Outcome of a confirmed deletion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Deletion {
    Removed,
    /// Confirmed, but nothing had that id.
    NotFound,
    /// The confirmation was refused; nothing changed.
    Declined,
}
