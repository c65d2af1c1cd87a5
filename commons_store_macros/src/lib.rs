mod document;

use proc_macro::TokenStream;

/// Derive macro for the `Document` trait.
///
/// # Usage
///
/// ```ignore
/// #[derive(Clone, Serialize, Deserialize, Document)]
/// #[document(collection = "invite_codes", key = "invite_codes")]
/// struct InviteCode {
///     #[document(id)]
///     pub id: u64,
///     pub code: String,
/// }
/// ```
///
/// - `#[document(collection = "...")]` names the backing file (without `.json`).
///   If omitted, defaults to snake_case struct name + "s".
/// - `#[document(key = "...")]` names the top-level array inside the file.
///   If omitted, defaults to the collection name.
/// - `#[document(id)]` marks the integer identifier field.
///   If omitted, defaults to a field named `id`. Whatever its Rust name, the
///   field must serialize as `"id"`, since that is the key ids are assigned under.
#[proc_macro_derive(Document, attributes(document))]
pub fn derive_document(input: TokenStream) -> TokenStream {
    document::derive_document(input)
}
