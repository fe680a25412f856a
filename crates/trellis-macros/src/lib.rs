//! Proc-macros for trellis.
//!
//! - `#[derive(WithBuilders)]`: generates a `with_<field>(...)` method per named field, so
//!   configuration structs read the same way as the fluent node setters.
//!
//! ## Field options
//! Options go in `#[with_builders(...)]` on a field and can be combined:
//! - `skip`: no builder for this field.
//! - `into`: the builder takes `impl Into<FieldTy>`.
//! - `non_negative`: the value is clamped with `.max(0.0)` before it is stored (f32 fields).
//!
//! ### Example
//! ```ignore
//! use trellis_macros::WithBuilders;
//!
//! #[derive(Clone, Debug, WithBuilders)]
//! pub struct TableStyle {
//!     #[with_builders(non_negative)]
//!     pub column_width: f32,
//!     #[with_builders(into)]
//!     pub caption: String,
//!     #[with_builders(skip)]
//!     pub cached: bool,
//! }
//!
//! let style = TableStyle::default().with_column_width(-4.0).with_caption("totals");
//! assert_eq!(style.column_width, 0.0);
//! ```

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{parse_macro_input, spanned::Spanned, Data, DeriveInput, Fields};

/// Per-field options parsed from `#[with_builders(...)]`.
#[derive(Default)]
struct FieldOptions {
    skip: bool,
    into: bool,
    non_negative: bool,
}

/// Derive that generates `with_<field>` builder methods for structs with named fields.
///
/// Generated methods take `self` by value and return `Self`.
#[proc_macro_derive(WithBuilders, attributes(with_builders))]
pub fn derive_with_builders(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let ident = &input.ident;
    let generics = &input.generics;

    let Data::Struct(data_struct) = &input.data else {
        return syn::Error::new(
            input.span(),
            "#[derive(WithBuilders)] only supports structs",
        )
        .to_compile_error()
        .into();
    };

    let Fields::Named(fields_named) = &data_struct.fields else {
        return syn::Error::new(
            data_struct.fields.span(),
            "#[derive(WithBuilders)] only supports structs with named fields",
        )
        .to_compile_error()
        .into();
    };

    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let mut methods = Vec::with_capacity(fields_named.named.len());
    for field in fields_named.named.iter() {
        let Some(field_ident) = field.ident.as_ref() else {
            continue;
        };

        let options = match parse_field_options(field) {
            Ok(options) => options,
            Err(err) => return err.to_compile_error().into(),
        };
        if options.skip {
            continue;
        }

        let field_ty = &field.ty;
        let method_ident = format_ident!("with_{}", field_ident);
        let doc = format!("Set `{}`.", field_ident);

        let (param_ty, mut value) = if options.into {
            (quote! { impl ::core::convert::Into<#field_ty> }, quote! { value.into() })
        } else {
            (quote! { #field_ty }, quote! { value })
        };
        if options.non_negative {
            value = quote! { (#value).max(0.0) };
        }

        methods.push(quote! {
            #[doc = #doc]
            #[inline]
            pub fn #method_ident(mut self, value: #param_ty) -> Self {
                self.#field_ident = #value;
                self
            }
        });
    }

    quote! {
        impl #impl_generics #ident #ty_generics #where_clause {
            #(#methods)*
        }
    }
    .into()
}

fn parse_field_options(field: &syn::Field) -> syn::Result<FieldOptions> {
    let mut options = FieldOptions::default();
    for attr in &field.attrs {
        if !attr.path().is_ident("with_builders") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                options.skip = true;
            } else if meta.path.is_ident("into") {
                options.into = true;
            } else if meta.path.is_ident("non_negative") {
                options.non_negative = true;
            } else {
                return Err(meta.error("expected `skip`, `into` or `non_negative`"));
            }
            Ok(())
        })?;
    }
    Ok(options)
}
