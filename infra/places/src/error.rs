use std::borrow::Cow;

/// Errors raised by a single place search or detail call.
#[ogmap_derive::ogmap_error]
pub enum PlacesError {
    /// Transport failure, timeout, non-success HTTP status or an undecodable body.
    #[error("Places HTTP error{}: {source}", format_context(.context))]
    Http { source: reqwest::Error, context: Option<Cow<'static, str>> },

    /// The API answered with a status other than `OK`, `ZERO_RESULTS` or `NOT_FOUND`.
    #[error("Places API returned {status}{}: {message}", format_context(.context))]
    Api { status: String, message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The client was built with unusable settings.
    #[error("Invalid places client configuration{}: {message}", format_context(.context))]
    InvalidConfig { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
