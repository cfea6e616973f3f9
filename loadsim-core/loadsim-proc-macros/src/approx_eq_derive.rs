use crate::imports::*;

pub fn approx_eq_derive(input: TokenStream) -> TokenStream {
    let ast = match syn::parse::<DeriveInput>(input) {
        Ok(ast) => ast,
        Err(err) => return err.to_compile_error().into(),
    };
    let name = &ast.ident;

    let body = match &ast.data {
        Data::Struct(s) => match &s.fields {
            Fields::Named(named) => {
                let field_names = named.named.iter().filter_map(|f| f.ident.as_ref());
                quote! {
                    true #(&& self.#field_names.approx_eq(&other.#field_names, tol))*
                }
            }
            other => {
                return syn::Error::new(other.span(), "#[derive(ApproxEq)] requires named fields")
                    .to_compile_error()
                    .into()
            }
        },
        Data::Enum(e) => {
            if let Some(variant) = e.variants.iter().find(|v| !v.fields.is_empty()) {
                return syn::Error::new(
                    variant.span(),
                    "#[derive(ApproxEq)] only supports enums with unit variants",
                )
                .to_compile_error()
                .into();
            }
            quote! { self == other }
        }
        Data::Union(u) => {
            return syn::Error::new(
                u.union_token.span(),
                "#[derive(ApproxEq)] does not support unions",
            )
            .to_compile_error()
            .into()
        }
    };

    let mut generated = TokenStream2::new();
    generated.append_all(quote! {
        impl ApproxEq for #name {
            fn approx_eq(&self, other: &#name, tol: f64) -> bool {
                let _ = tol;
                #body
            }
        }
    });
    generated.into()
}
