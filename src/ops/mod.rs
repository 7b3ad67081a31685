pub mod check;
pub mod clamp;
pub mod dirty;
pub mod init;
pub mod mount;
pub mod remove;
pub mod retire;
pub mod submit;
pub mod toggle;
pub mod tombstone;

/// Error type for widget operations.
///
/// None of these reach the end user: the initializer and the dispatcher log
/// them and carry on. They exist so tests and `fw check` can see them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WidgetError {
    #[error("{what} not found: #{id}")]
    MissingNode { what: &'static str, id: String },
    #[error("malformed template #{id}: {reason}")]
    MalformedTemplate { id: String, reason: &'static str },
    #[error("remove control has no identity")]
    MissingIdentity,
    #[error("anchor #{anchor} is not a child of #{container}")]
    AnchorOutsideContainer { anchor: String, container: String },
    #[error("node is not attached to a row")]
    Detached,
}

impl WidgetError {
    pub(crate) fn missing(what: &'static str, id: &str) -> Self {
        WidgetError::MissingNode {
            what,
            id: id.to_string(),
        }
    }
}
