use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr};

pub fn derive_document(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let binding = match extract_binding(&input) {
        Ok(binding) => binding,
        Err(err) => return err.to_compile_error().into(),
    };
    let id_field = match extract_id_field(&input) {
        Ok(field) => field,
        Err(err) => return err.to_compile_error().into(),
    };

    let collection = &binding.collection;
    let key = binding.key.as_deref().unwrap_or(collection);

    let expanded = quote! {
        impl ::commons_store::Document for #name {
            const COLLECTION: &'static str = #collection;
            const ARRAY_KEY: &'static str = #key;

            fn id(&self) -> ::commons_store::EntityId {
                self.#id_field
            }
        }
    };

    TokenStream::from(expanded)
}

struct Binding {
    collection: String,
    key: Option<String>,
}

fn extract_binding(input: &DeriveInput) -> syn::Result<Binding> {
    let mut collection = None;
    let mut key = None;

    for attr in &input.attrs {
        if !attr.path().is_ident("document") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("collection") {
                let value: LitStr = meta.value()?.parse()?;
                collection = Some(value.value());
                Ok(())
            } else if meta.path.is_ident("key") {
                let value: LitStr = meta.value()?.parse()?;
                key = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("expected `collection` or `key`"))
            }
        })?;
    }

    // Default: snake_case struct name + "s"
    let collection =
        collection.unwrap_or_else(|| format!("{}s", to_snake_case(&input.ident.to_string())));

    Ok(Binding { collection, key })
}

fn extract_id_field(input: &DeriveInput) -> syn::Result<syn::Ident> {
    if let Data::Struct(data_struct) = &input.data {
        if let Fields::Named(fields) = &data_struct.fields {
            for field in &fields.named {
                for attr in &field.attrs {
                    if !attr.path().is_ident("document") {
                        continue;
                    }
                    let mut is_id = false;
                    attr.parse_nested_meta(|meta| {
                        if meta.path.is_ident("id") {
                            is_id = true;
                        }
                        Ok(())
                    })?;
                    if is_id {
                        if let Some(ident) = &field.ident {
                            return Ok(ident.clone());
                        }
                    }
                }
            }

            if let Some(ident) = fields
                .named
                .iter()
                .filter_map(|field| field.ident.as_ref())
                .find(|ident| *ident == "id")
            {
                return Ok(ident.clone());
            }
        }
    }

    Err(syn::Error::new_spanned(
        &input.ident,
        "Document derive: no field marked with #[document(id)] and no field named `id`",
    ))
}

fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, ch) in s.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}
