use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitInt, LitStr};

pub fn derive_aggregate(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    // Struct-level #[aggregate(tag = "...", expiration = ...)]
    let (tag, expiration) = extract_metadata(&input);

    // The field marked #[aggregate(id)], or the field named "id"
    let id_field = extract_id_field(&input);
    let id_field_name = id_field.to_string();

    let type_tag_impl = tag.map(|tag| {
        quote! {
            fn type_tag() -> Option<&'static str> {
                Some(#tag)
            }
        }
    });

    let expiration_impl = expiration.map(|expiration| {
        quote! {
            fn expiration_seconds() -> u64 {
                #expiration
            }
        }
    });

    let expanded = quote! {
        impl docmapper::aggregate::Aggregate for #name {
            fn id(&self) -> &str {
                &self.#id_field
            }

            fn set_id(&mut self, id: String) {
                self.#id_field = id;
            }

            fn id_field() -> &'static str {
                #id_field_name
            }

            #type_tag_impl

            #expiration_impl
        }
    };

    TokenStream::from(expanded)
}

fn extract_metadata(input: &DeriveInput) -> (Option<LitStr>, Option<LitInt>) {
    let mut tag = None;
    let mut expiration = None;

    for attr in &input.attrs {
        if !attr.path().is_ident("aggregate") {
            continue;
        }

        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("tag") {
                tag = Some(meta.value()?.parse::<LitStr>()?);
            } else if meta.path.is_ident("expiration") {
                expiration = Some(meta.value()?.parse::<LitInt>()?);
            }
            Ok(())
        });
    }

    (tag, expiration)
}

fn extract_id_field(input: &DeriveInput) -> syn::Ident {
    if let Data::Struct(data_struct) = &input.data {
        if let Fields::Named(fields) = &data_struct.fields {
            for field in &fields.named {
                for attr in &field.attrs {
                    if attr.path().is_ident("aggregate") {
                        let mut is_id = false;
                        let _ = attr.parse_nested_meta(|meta| {
                            if meta.path.is_ident("id") {
                                is_id = true;
                            }
                            Ok(())
                        });
                        if is_id {
                            return field.ident.clone().unwrap();
                        }
                    }
                }
            }

            // Default: look for a field named "id"
            for field in &fields.named {
                if let Some(ident) = &field.ident {
                    if ident == "id" {
                        return ident.clone();
                    }
                }
            }

            panic!(
                "Aggregate derive: no field marked with #[aggregate(id)] and no field named `id`"
            );
        }
    }

    panic!("Aggregate derive: only structs with named fields are supported");
}
