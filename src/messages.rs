//! User-facing message catalog.
//!
//! Each [`MessageKind`] maps to a fixed template resolved at compile time.
//! Templates use positional placeholders `{0}`, `{1}`, … filled in by
//! [`MessageKind::format`].

use std::fmt::{self, Display, Write};

/// Every message the host prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// A new object is tracked.
    TrackSuccess,
    /// A new object is tracked but already tracked names occur inside it.
    TrackWarningConflict,
    /// The object is already tracked.
    TrackFail,
    /// The object name is empty.
    TrackInvalid,
    /// A tracked object was updated.
    ModifySuccess,
    /// A tracked object was updated and renamed onto a name containing another tracked name.
    ModifyWarningConflict,
    /// A tracked object was renamed.
    RenameSuccess,
    /// A tracked object was renamed onto a name containing another tracked name.
    RenameWarningConflict,
    /// The rename target is already tracked.
    RenameFail,
    /// A tracked object was removed.
    UntrackSuccess,
    /// The object is not tracked.
    UntrackFail,
    /// No store file exists yet.
    TrackedObjectsInitialized,
    /// The store file was read.
    TrackedObjectsLoaded,
    /// The store file was written.
    TrackedObjectsSaved,
    /// The store file is blank.
    TrackedObjectsEmpty,
    /// The store file could not be parsed.
    TrackedObjectsInvalid,
    /// Every tracked object was removed.
    TrackedObjectsCleared,
    /// A name resolved to a tracked object.
    ObjectFound,
    /// A name resolved to a tracked object, but other tracked objects match too.
    ObjectFoundConflicting,
    /// A name resolved to an object type.
    ObjectTypeFound,
    /// A name matched no tracked object.
    ObjectNotTracked,
}

impl MessageKind {
    /// The raw template for this message.
    pub const fn template(self) -> &'static str {
        match self {
            Self::TrackSuccess => "Successfully tracked '{0}'!",
            Self::TrackWarningConflict => "Object tracked, but '{0}' conflicts with other ID/s",
            Self::TrackFail => "Unable to track '{0}', '{0}' already exists!",
            Self::TrackInvalid => "Object ID cannot be empty",
            Self::ModifySuccess => "Successfully modified '{0}'!",
            Self::ModifyWarningConflict => "Object modified, but '{0}' conflicts with {1}!",
            Self::RenameSuccess => "Successfully renamed '{0}' to '{1}'!",
            Self::RenameWarningConflict => {
                "Object renamed to '{0}', but '{0}' conflicts with {1}!"
            }
            Self::RenameFail => "Unable to rename '{0}', '{1}' already exists!",
            Self::UntrackSuccess => "Successfully untracked '{0}'!",
            Self::UntrackFail => "'{0}' is not being tracked",
            Self::TrackedObjectsInitialized => "Empty tracked objects, initializing instead",
            Self::TrackedObjectsLoaded => "Loaded {0} tracked objects",
            Self::TrackedObjectsSaved => "Saved {0} tracked objects",
            Self::TrackedObjectsEmpty => "Invalid Data or Empty!",
            Self::TrackedObjectsInvalid => "Invalid Data!",
            Self::TrackedObjectsCleared => "Cleared all tracked objects",
            Self::ObjectFound => "'{0}' matched tracked object '{1}' ({2})",
            Self::ObjectFoundConflicting => {
                "'{0}' matched tracked object '{1}' ({2}), but other tracked objects also match"
            }
            Self::ObjectTypeFound => "'{0}' is tracked as {1}",
            Self::ObjectNotTracked => "'{0}' is not included in the objects to track",
        }
    }

    /// Fills the template's placeholders with `args`.
    ///
    /// Placeholders without a matching argument are left as written.
    pub fn format(self, args: &[&dyn Display]) -> String {
        let template = self.template();
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let tail = &rest[open..];
            let arg = tail.find('}').and_then(|close| {
                let index: usize = tail[1..close].parse().ok()?;
                args.get(index).map(|arg| (arg, close))
            });
            match arg {
                Some((arg, close)) => {
                    // Writing into a String cannot fail.
                    let _ = write!(out, "{arg}");
                    rest = &tail[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = &tail[1..];
                }
            }
        }
        out.push_str(rest);
        out
    }
}

impl Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.template())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_positional_arguments() {
        let message = MessageKind::ModifyWarningConflict.format(&[&"copperore", &"copper"]);
        assert_eq!(message, "Object modified, but 'copperore' conflicts with copper!");
    }

    #[test]
    fn test_format_repeated_placeholder() {
        let message = MessageKind::TrackFail.format(&[&"tin"]);
        assert_eq!(message, "Unable to track 'tin', 'tin' already exists!");
    }

    #[test]
    fn test_missing_argument_is_left_in_place() {
        assert_eq!(MessageKind::UntrackSuccess.format(&[]), "Successfully untracked '{0}'!");
        assert_eq!(MessageKind::TrackInvalid.format(&[&1]), "Object ID cannot be empty");
    }

    #[test]
    fn test_numeric_arguments() {
        assert_eq!(MessageKind::TrackedObjectsLoaded.format(&[&3]), "Loaded 3 tracked objects");
    }

    #[test]
    fn test_rename_conflict_message() {
        let message = MessageKind::RenameWarningConflict.format(&[&"copper_ore", &"ore"]);
        assert_eq!(message, "Object renamed to 'copper_ore', but 'copper_ore' conflicts with ore!");
    }
}
