#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the `OGMap` workspace.
//!
//! * [`ogmap_error`] turns an enum into a context-aware `thiserror` error.
//! * [`ogmap_slice`] wraps a feature state struct into an `Arc` handle that can be
//!   registered with the kernel slice registry.
//! * [`api_model`] and [`api_handler`] keep HTTP DTOs and handlers consistent and
//!   wire them into `utoipa` when the consuming crate enables its `server` feature.
//!
//! Examples are `ignore`d because proc-macro crates cannot use their own macros in doctests.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Attribute macro to define an HTTP data model.
///
/// * **Derives**: adds `Debug`, `Serialize` and `Deserialize` if missing.
/// * **`OpenAPI`**: adds `utoipa::ToSchema` behind the consumer's `server` feature.
/// * **Serde policy**: `rename_all = "camelCase"` and `deny_unknown_fields` by default,
///   both overridable.
///
/// # Example
///
/// ```rust,ignore
/// use ogmap_derive::api_model;
///
/// #[api_model(rename_all = "snake_case", deny_unknown_fields = false)]
/// pub struct ConfigResponse {
///     pub google_maps_api_key: String,
/// }
/// ```
#[proc_macro_attribute]
pub fn api_model(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::api::expand_api_model(attr.into(), input).into()
}

/// Attribute macro to bridge Axum handlers with `OpenAPI` documentation.
///
/// Accepts the usual `utoipa::path` arguments (`get`, `path = "..."`, `responses(...)`,
/// `tag = ...`) and applies them only when the consumer's `server` feature is enabled.
///
/// ```rust,ignore
/// #[api_handler(get, path = "/health", responses((status = OK, body = HealthResponse)))]
/// pub async fn health_handler() -> impl IntoResponse { /* ... */ }
/// ```
#[proc_macro_attribute]
pub fn api_handler(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::api::expand_api_handler(args.into(), input).into()
}

/// Attribute macro for workspace error enums.
///
/// # Generated Items
///
/// * `#[derive(Debug, thiserror::Error)]` unless already derived.
/// * `<ErrorName>Ext` trait with `.context(...)` for `Result<T, ErrorName>` and for
///   `Result<T, SourceError>` of every variant that wraps a source.
/// * `From<SourceError>` for variants with a `source` (or `#[source]`/`#[from]`) field.
/// * `From<&'static str>` and `From<String>` when an `Internal { message, context }`
///   variant exists.
/// * A private `format_context` helper for `#[error(...)]` strings.
///
/// # Requirements
///
/// Variants must use named fields; variants with a source must also carry
/// `context: Option<Cow<'static, str>>`.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[ogmap_derive::ogmap_error]
/// pub enum PlacesError {
///     #[error("HTTP error{}: {source}", format_context(.context))]
///     Http { source: reqwest::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// let body = response.text().await.context("Reading text search body")?;
/// ```
#[proc_macro_attribute]
pub fn ogmap_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

/// Attribute macro to define a feature slice handle.
///
/// Generates `<Name>Inner` with the declared fields, an `Arc`-backed `<Name>` wrapper
/// with `new`, a `Deref` to the inner state and an `ogmap_kernel` `FeatureSlice` impl.
///
/// ```rust,ignore
/// #[ogmap_derive::ogmap_slice]
/// pub struct Survey {
///     pub aggregator: Aggregator,
/// }
///
/// let slice = Survey::new(SurveyInner { aggregator });
/// ```
#[proc_macro_attribute]
pub fn ogmap_slice(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(item as ItemStruct);
    macros::slice::expand_slice(input).into()
}
