//! Derive macro for `vmx_codec::Record`.
//!
//! ```ignore
//! #[derive(Default, Vmx)]
//! struct Ethernet {
//!     #[vmx("present")]
//!     present: bool,
//!     #[vmx("linkStatePropagation.enable,omitempty")]
//!     link_state_propagation: bool,
//! }
//! ```
//!
//! `#[vmx("…")]` carries the quoted segment of the tag; the macro wraps it
//! into the full `vmx:"…"` annotation, which the codec parses when the
//! schema is first built. `#[vmx(tag = "…")]` passes a full annotation
//! through untouched. Fields without a `vmx` attribute are not mapped.

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Attribute, Data, DeriveInput, Fields, LitStr};

/// Derive `vmx_codec::Record` and `vmx_codec::Field` for a struct with named fields.
#[proc_macro_derive(Vmx, attributes(vmx))]
pub fn derive_vmx(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    match expand_record(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_record(input: &DeriveInput) -> Result<proc_macro2::TokenStream, syn::Error> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Vmx cannot be derived for generic structs",
        ));
    }

    let Data::Struct(struct_data) = &input.data else {
        return Err(syn::Error::new_spanned(
            input,
            "Vmx can only be derived for structs",
        ));
    };

    let fields = match &struct_data.fields {
        Fields::Named(fields) => &fields.named,
        _ => {
            return Err(syn::Error::new_spanned(
                &struct_data.fields,
                "Vmx requires named fields",
            ));
        },
    };

    let mut decls = Vec::new();
    let mut slot_arms = Vec::new();
    let mut slot_mut_arms = Vec::new();
    let mut index = 0usize;

    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let Some(tag) = parse_field_tag(&field.attrs)? else {
            continue;
        };

        let field_name = LitStr::new(&ident.unraw().to_string(), ident.span());
        let annotation = LitStr::new(&tag.annotation, tag.span);
        let ty = &field.ty;

        if tag.unmapped {
            decls.push(quote! {
                ::vmx_codec::FieldDecl::unmapped(#field_name, #annotation)
            });
        } else {
            decls.push(quote! {
                ::vmx_codec::FieldDecl::new(
                    #field_name,
                    #annotation,
                    <#ty as ::vmx_codec::Field>::kind(),
                )
            });
            slot_arms.push(quote! {
                #index => ::core::option::Option::Some(::vmx_codec::Field::slot(&self.#ident)),
            });
            slot_mut_arms.push(quote! {
                #index => ::core::option::Option::Some(::vmx_codec::Field::slot_mut(&mut self.#ident)),
            });
        }
        index += 1;
    }

    let name = &input.ident;
    let type_name = LitStr::new(&name.to_string(), name.span());

    Ok(quote! {
        impl ::vmx_codec::Record for #name {
            fn record_schema() -> ::core::result::Result<
                &'static ::vmx_codec::Schema,
                ::vmx_codec::SchemaError,
            > {
                static SCHEMA: ::vmx_codec::SchemaCell = ::vmx_codec::SchemaCell::new();
                SCHEMA.get_or_build(#type_name, || {
                    ::std::vec![#(#decls),*]
                })
            }

            fn schema(&self) -> ::core::result::Result<
                &'static ::vmx_codec::Schema,
                ::vmx_codec::SchemaError,
            > {
                <Self as ::vmx_codec::Record>::record_schema()
            }

            fn slot(&self, index: usize) -> ::core::option::Option<::vmx_codec::Slot<'_>> {
                match index {
                    #(#slot_arms)*
                    _ => ::core::option::Option::None,
                }
            }

            fn slot_mut(
                &mut self,
                index: usize,
            ) -> ::core::option::Option<::vmx_codec::SlotMut<'_>> {
                match index {
                    #(#slot_mut_arms)*
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl ::vmx_codec::Field for #name {
            fn kind() -> ::vmx_codec::FieldKind {
                ::vmx_codec::FieldKind::Record(
                    <Self as ::vmx_codec::Record>::record_schema,
                )
            }

            fn slot(&self) -> ::vmx_codec::Slot<'_> {
                ::vmx_codec::Slot::Record(self)
            }

            fn slot_mut(&mut self) -> ::vmx_codec::SlotMut<'_> {
                ::vmx_codec::SlotMut::Record(self)
            }
        }
    })
}

#[derive(Debug)]
struct FieldTag {
    annotation: String,
    unmapped: bool,
    span: Span,
}

/// Key of a full `ns:"key,options"` annotation, if it has one.
fn raw_tag_key(annotation: &str) -> Option<&str> {
    let (_, rest) = annotation.split_once(':')?;
    let quoted = rest.strip_prefix('"')?;
    quoted.split(['"', ',']).next()
}

fn parse_field_tag(attrs: &[Attribute]) -> Result<Option<FieldTag>, syn::Error> {
    let mut tag: Option<FieldTag> = None;
    for attr in attrs {
        if !attr.path().is_ident("vmx") {
            continue;
        }
        if tag.is_some() {
            return Err(syn::Error::new_spanned(attr, "duplicate vmx attribute"));
        }

        // Short form: #[vmx("key,options")]
        if let Ok(value) = attr.parse_args::<LitStr>() {
            let segment = value.value();
            let key = segment.split(',').next().unwrap_or_default();
            tag = Some(FieldTag {
                annotation: format!("vmx:\"{segment}\""),
                unmapped: key == "-",
                span: value.span(),
            });
            continue;
        }

        // Raw form: #[vmx(tag = "vmx:\"key\"")]
        let mut raw: Option<LitStr> = None;
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("tag") {
                if raw.is_some() {
                    return Err(meta.error("duplicate vmx(tag = ...)"));
                }
                raw = Some(meta.value()?.parse()?);
                return Ok(());
            }
            Err(meta.error("unsupported vmx attribute; use #[vmx(\"key\")] or #[vmx(tag = \"...\")]"))
        })?;
        let Some(raw) = raw else {
            return Err(syn::Error::new_spanned(attr, "vmx attribute requires a key"));
        };
        let annotation = raw.value();
        tag = Some(FieldTag {
            unmapped: raw_tag_key(&annotation) == Some("-"),
            annotation,
            span: raw.span(),
        });
    }
    Ok(tag)
}
