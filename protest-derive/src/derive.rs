//! `#[derive(Arbitrary)]`: builds `impl Type { pub fn arbitrary() ->
//! protest::Arbitrary<Type> }` field by field (struct) or variant by
//! variant (enum), targeting this crate's concrete `Arbitrary<T>` generator
//! type rather than a `proptest`-style `Arbitrary` trait with associated
//! strategies.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    parse_macro_input, Data, DeriveInput, Expr, Field, Fields, FieldsNamed, FieldsUnnamed,
    Variant,
};

pub fn derive_arbitrary_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = input.ident.clone();

    // Every generic type parameter must itself have a default generator
    // unless every field that uses it carries an explicit `#[generator]`
    // override; requiring the bound up front keeps the generated impl's
    // `where` clause simple.
    let mut generics = input.generics.clone();
    for param in generics.type_params_mut() {
        param.bounds.push(syn::parse_quote!(::protest::DefaultGenerator));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let body = match &input.data {
        Data::Struct(data_struct) => derive_struct(&name, &data_struct.fields),
        Data::Enum(data_enum) => derive_enum(&name, data_enum.variants.iter()),
        Data::Union(_) => {
            return syn::Error::new_spanned(&input.ident, "Arbitrary cannot be derived for unions")
                .to_compile_error()
                .into();
        }
    };

    let expanded = quote! {
        impl #impl_generics #name #ty_generics #where_clause {
            /// Generated by `#[derive(Arbitrary)]`.
            pub fn arbitrary() -> ::protest::Arbitrary<#name #ty_generics> {
                #body
            }
        }
    };

    expanded.into()
}

/// A field's generator: its `#[generator(<expr>)]` override if present,
/// else `<FieldType as protest::DefaultGenerator>::default_generator()`.
fn field_generator_expr(field: &Field) -> TokenStream2 {
    for attr in &field.attrs {
        if attr.path().is_ident("generator") {
            if let Ok(expr) = attr.parse_args::<Expr>() {
                return quote! { #expr };
            }
        }
    }
    let ty = &field.ty;
    quote! { <#ty as ::protest::DefaultGenerator>::default_generator() }
}

/// An enum variant's weight from `#[weight(N)]`, if present; `one_of`
/// distributes the remainder uniformly across unweighted variants.
fn variant_weight(variant: &Variant) -> Option<TokenStream2> {
    for attr in &variant.attrs {
        if attr.path().is_ident("weight") {
            if let Ok(expr) = attr.parse_args::<Expr>() {
                return Some(quote! { #expr as f64 });
            }
        }
    }
    None
}

/// Fold a list of per-slot generator expressions into nested `tuple2`
/// calls: `(((g0, g1), g2), g3)`, mirroring `protest::tuple3`/`tuple4`'s
/// own implementation in terms of `tuple2`.
fn nested_gen_expr(gens: &[TokenStream2]) -> TokenStream2 {
    let mut iter = gens.iter().cloned();
    let first = iter.next().expect("at least one field");
    iter.fold(first, |acc, g| quote! { ::protest::tuple2(#acc, #g) })
}

/// The destructuring pattern matching `nested_gen_expr`'s nesting shape.
fn nested_pattern(names: &[TokenStream2]) -> TokenStream2 {
    let mut iter = names.iter().cloned();
    let first = iter.next().expect("at least one field");
    iter.fold(first, |acc, n| quote! { (#acc, #n) })
}

fn derive_struct(name: &syn::Ident, fields: &Fields) -> TokenStream2 {
    build_value_gen(fields, |binders| quote! { #name #binders })
}

fn derive_enum<'a>(name: &syn::Ident, variants: impl Iterator<Item = &'a Variant>) -> TokenStream2 {
    let alternatives: Vec<TokenStream2> = variants
        .map(|variant| {
            let vname = &variant.ident;
            let ctor = quote! { #name::#vname };
            let variant_gen = build_value_gen(&variant.fields, |binders| quote! { #ctor #binders });
            match variant_weight(variant) {
                Some(weight) => quote! { ::protest::WeightedValue::weighted(#weight, #variant_gen) },
                None => quote! { ::protest::WeightedValue::new(#variant_gen) },
            }
        })
        .collect();

    quote! { ::protest::one_of(vec![ #(#alternatives),* ]) }
}

/// Build an `Arbitrary<_>` expression that produces a value via `ctor`
/// (a closure from the field-binder tokens to a constructor call),
/// shared between plain structs and each enum variant.
fn build_value_gen(
    fields: &Fields,
    ctor: impl Fn(TokenStream2) -> TokenStream2,
) -> TokenStream2 {
    match fields {
        Fields::Named(FieldsNamed { named, .. }) => {
            if named.is_empty() {
                let value = ctor(quote! { {} });
                return quote! { ::protest::just(#value) };
            }
            let field_names: Vec<TokenStream2> = named
                .iter()
                .map(|f| {
                    let ident = f.ident.as_ref().expect("named field");
                    quote! { #ident }
                })
                .collect();
            let gens: Vec<TokenStream2> = named.iter().map(field_generator_expr).collect();
            let gen_expr = nested_gen_expr(&gens);
            let pattern = nested_pattern(&field_names);
            let value = ctor(quote! { { #(#field_names),* } });
            quote! { #gen_expr.map(move |#pattern| #value) }
        }
        Fields::Unnamed(FieldsUnnamed { unnamed, .. }) => {
            if unnamed.is_empty() {
                let value = ctor(quote! { () });
                return quote! { ::protest::just(#value) };
            }
            let binders: Vec<TokenStream2> = (0..unnamed.len())
                .map(|i| {
                    let ident = format_ident!("__f{}", i);
                    quote! { #ident }
                })
                .collect();
            let gens: Vec<TokenStream2> = unnamed.iter().map(field_generator_expr).collect();
            let gen_expr = nested_gen_expr(&gens);
            let pattern = nested_pattern(&binders);
            let value = ctor(quote! { ( #(#binders),* ) });
            quote! { #gen_expr.map(move |#pattern| #value) }
        }
        Fields::Unit => {
            let value = ctor(quote! {});
            quote! { ::protest::just(#value) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_gen_expr_folds_left_to_right() {
        let gens = vec![quote! { a }, quote! { b }, quote! { c }];
        let expr = nested_gen_expr(&gens);
        assert_eq!(
            expr.to_string(),
            quote! { ::protest::tuple2(::protest::tuple2(a, b), c) }.to_string()
        );
    }

    #[test]
    fn nested_pattern_matches_nested_gen_expr_shape() {
        let names = vec![quote! { x }, quote! { y }, quote! { z }];
        let pattern = nested_pattern(&names);
        assert_eq!(pattern.to_string(), quote! { ((x, y), z) }.to_string());
    }

    #[test]
    fn single_field_has_no_tuple_wrapping() {
        let gens = vec![quote! { only }];
        assert_eq!(nested_gen_expr(&gens).to_string(), quote! { only }.to_string());
        let names = vec![quote! { v }];
        assert_eq!(nested_pattern(&names).to_string(), quote! { v }.to_string());
    }
}
