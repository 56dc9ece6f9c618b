//! `Flatten` derive macro for response envelopes.
//!
//! Generates an `envelope::Flatten` implementation that describes each field
//! of a response struct explicitly, so envelope building needs no runtime
//! introspection.
//!
//! # Examples
//!
//! ```ignore
//! use envelope::{BaseResp, Flatten};
//!
//! #[derive(Flatten)]
//! #[envelope(rename_all = "camelCase")]
//! pub struct ProfileResp {
//!     #[envelope(embed)]
//!     base: BaseResp,
//!     #[envelope(embed)]
//!     user: Option<UserView>,
//!     last_seen: Option<DateTime<Utc>>,
//!     #[envelope(skip)]
//!     internal_note: String,
//! }
//! ```
//!
//! - `embed` merges the field's own `Flatten` output into the same mapping and
//!   consults it for the base `code`/`msg`.
//! - `rename` overrides the wire name of one field.
//! - `skip` leaves a field out entirely.
//! - Leaf fields named `code` or `msg` are never emitted.

extern crate proc_macro;

use darling::{FromDeriveInput, FromField, FromMeta};
use proc_macro::TokenStream;
use quote::quote;
use syn::DeriveInput;

const RESERVED_KEYS: [&str; 2] = ["code", "msg"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum RenameRule {
    #[default]
    Verbatim,
    CamelCase,
    SnakeCase,
}

impl FromMeta for RenameRule {
    fn from_string(value: &str) -> darling::Result<Self> {
        match value {
            "camelCase" => Ok(RenameRule::CamelCase),
            "snake_case" => Ok(RenameRule::SnakeCase),
            other => Err(darling::Error::unknown_value(other)),
        }
    }
}

impl RenameRule {
    fn apply(self, field: &str) -> String {
        match self {
            RenameRule::Verbatim | RenameRule::SnakeCase => field.to_string(),
            RenameRule::CamelCase => {
                let mut out = String::with_capacity(field.len());
                let mut upper_next = false;
                for ch in field.chars() {
                    if ch == '_' {
                        upper_next = !out.is_empty();
                    } else if upper_next {
                        out.extend(ch.to_uppercase());
                        upper_next = false;
                    } else {
                        out.push(ch);
                    }
                }
                out
            }
        }
    }
}

#[derive(FromDeriveInput)]
#[darling(attributes(envelope), supports(struct_named))]
struct FlattenInput {
    ident: syn::Ident,
    generics: syn::Generics,
    data: darling::ast::Data<(), FlattenField>,
    #[darling(default)]
    rename_all: RenameRule,
}

#[derive(FromField)]
#[darling(attributes(envelope))]
struct FlattenField {
    ident: Option<syn::Ident>,
    /// Merge this field's own fields into the parent mapping
    #[darling(default)]
    embed: bool,
    /// Leave this field out of the envelope
    #[darling(default)]
    skip: bool,
    /// Wire name override
    #[darling(default)]
    rename: Option<String>,
}

/// Derives `envelope::Flatten` for a struct with named fields.
///
/// # Attributes
///
/// Container:
/// - `rename_all = "camelCase" | "snake_case"`: wire-name rule for fields without `rename`
///
/// Field:
/// - `embed`: the field implements `Flatten`; merge it instead of nesting
/// - `rename = "..."`: explicit wire name
/// - `skip`: never emitted
///
/// Leaf fields must implement `serde::Serialize` and `envelope::EmptyValue`.
#[proc_macro_derive(Flatten, attributes(envelope))]
pub fn flatten_derive(input: TokenStream) -> TokenStream {
    let ast: DeriveInput = match syn::parse(input) {
        Ok(ast) => ast,
        Err(err) => return err.to_compile_error().into(),
    };

    match FlattenInput::from_derive_input(&ast) {
        Ok(receiver) => impl_flatten(receiver).into(),
        Err(err) => err.write_errors().into(),
    }
}

fn impl_flatten(receiver: FlattenInput) -> proc_macro2::TokenStream {
    let ident = &receiver.ident;
    let (impl_generics, ty_generics, where_clause) = receiver.generics.split_for_impl();

    let fields = match receiver.data {
        darling::ast::Data::Struct(fields) => fields.fields,
        darling::ast::Data::Enum(_) => unreachable!("darling rejects enums via `supports`"),
    };

    let mut bases = Vec::new();
    let mut inserts = Vec::new();

    for field in fields {
        if field.skip {
            continue;
        }

        let Some(field_ident) = field.ident else {
            continue;
        };

        if field.embed {
            bases.push(quote! {
                .or_else(|| ::envelope::Flatten::base(&self.#field_ident))
            });
            inserts.push(quote! {
                ::envelope::Flatten::flatten_into(&self.#field_ident, data)?;
            });
            continue;
        }

        let raw_name = field_ident.to_string();
        let raw_name = raw_name.trim_start_matches("r#");
        let wire_name = field
            .rename
            .unwrap_or_else(|| receiver.rename_all.apply(raw_name));

        if RESERVED_KEYS.contains(&wire_name.as_str()) {
            continue;
        }

        inserts.push(quote! {
            ::envelope::insert_field(data, #wire_name, &self.#field_ident)?;
        });
    }

    quote! {
        impl #impl_generics ::envelope::Flatten for #ident #ty_generics #where_clause {
            fn base(&self) -> ::core::option::Option<&::envelope::BaseResp> {
                ::core::option::Option::None #(#bases)*
            }

            fn flatten_into(
                &self,
                data: &mut ::envelope::Data,
            ) -> ::core::result::Result<(), ::envelope::serde_json::Error> {
                #(#inserts)*
                ::core::result::Result::Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::quote;

    fn expand(input: proc_macro2::TokenStream) -> String {
        let ast: DeriveInput = syn::parse2(input).unwrap();
        let receiver = FlattenInput::from_derive_input(&ast).unwrap();
        impl_flatten(receiver).to_string()
    }

    #[test]
    fn test_leaf_fields() {
        let output = expand(quote! {
            pub struct LoginResp {
                user_id: String,
                access_token: String,
            }
        });

        assert!(output.contains("impl :: envelope :: Flatten for LoginResp"));
        assert!(output.contains(r#"insert_field (data , "user_id" , & self . user_id)"#));
        assert!(output.contains(r#"insert_field (data , "access_token" , & self . access_token)"#));
    }

    #[test]
    fn test_rename_all_camel_case() {
        let output = expand(quote! {
            #[envelope(rename_all = "camelCase")]
            pub struct View {
                first_name: String,
                last_login_at: Option<String>,
            }
        });

        assert!(output.contains(r#""firstName""#));
        assert!(output.contains(r#""lastLoginAt""#));
        assert!(!output.contains(r#""first_name""#));
    }

    #[test]
    fn test_embed_forwards_base_and_fields() {
        let output = expand(quote! {
            pub struct ProfileResp {
                #[envelope(embed)]
                base: BaseResp,
                #[envelope(embed)]
                user: Option<UserView>,
            }
        });

        assert!(output.contains(":: envelope :: Flatten :: base (& self . base)"));
        assert!(output.contains(":: envelope :: Flatten :: base (& self . user)"));
        assert!(output.contains(":: envelope :: Flatten :: flatten_into (& self . user , data)"));
    }

    #[test]
    fn test_reserved_keys_are_dropped() {
        let output = expand(quote! {
            pub struct Shadow {
                code: i32,
                #[envelope(rename = "msg")]
                message: String,
                count: i64,
            }
        });

        assert!(!output.contains(r#""code""#));
        assert!(!output.contains(r#""msg""#));
        assert!(output.contains(r#""count""#));
    }

    #[test]
    fn test_skip_and_rename() {
        let output = expand(quote! {
            pub struct Account {
                #[envelope(rename = "userName")]
                name: String,
                #[envelope(skip)]
                password: String,
            }
        });

        assert!(output.contains(r#""userName""#));
        assert!(!output.contains("password"));
    }

    #[test]
    fn test_rejects_enums() {
        let ast: DeriveInput = syn::parse2(quote! {
            pub enum Role { Admin, User }
        })
        .unwrap();

        assert!(FlattenInput::from_derive_input(&ast).is_err());
    }

    #[test]
    fn test_rejects_unknown_rename_rule() {
        let ast: DeriveInput = syn::parse2(quote! {
            #[envelope(rename_all = "SCREAMING")]
            pub struct View { name: String }
        })
        .unwrap();

        assert!(FlattenInput::from_derive_input(&ast).is_err());
    }

    #[test]
    fn test_camel_case_rule() {
        assert_eq!(RenameRule::CamelCase.apply("last_login_at"), "lastLoginAt");
        assert_eq!(RenameRule::CamelCase.apply("bio"), "bio");
        assert_eq!(RenameRule::CamelCase.apply("_private"), "private");
        assert_eq!(RenameRule::SnakeCase.apply("first_name"), "first_name");
    }
}
