//! Procedural macros for the Storefront backend
//!
//! This crate provides macros to reduce boilerplate in the Storefront backend:
//!
//! - `mutation_result!` - Generate GraphQL mutation result types

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Ident, Token, Type, parse::Parse, parse::ParseStream};

/// Generate a GraphQL mutation result type with success, error, and optional entity field.
///
/// # Usage
///
/// ```ignore
/// // Simple result (success + error only)
/// mutation_result!(MutationResult);
///
/// // With entity field
/// mutation_result!(CustomerResult, customer: Customer);
/// mutation_result!(OrderResult, order: Order);
///
/// // The field type may be any Rust type, not just an entity
/// mutation_result!(DeletePaymentResult, id: i64);
/// ```
///
/// # Generated Code
///
/// For `mutation_result!(CustomerResult, customer: Customer)`:
///
/// ```ignore
/// #[derive(Debug, Clone, async_graphql::SimpleObject)]
/// pub struct CustomerResult {
///     pub success: bool,
///     pub error: Option<String>,
///     pub customer: Option<Customer>,
/// }
///
/// impl CustomerResult {
///     pub fn success(customer: Customer) -> Self {
///         Self { success: true, error: None, customer: Some(customer) }
///     }
///     pub fn error(msg: impl Into<String>) -> Self {
///         Self { success: false, error: Some(msg.into()), customer: None }
///     }
/// }
/// ```
#[proc_macro]
pub fn mutation_result(input: TokenStream) -> TokenStream {
    let parsed = parse_macro_input!(input as MutationResultInput);

    let struct_name = &parsed.name;

    if let Some((field_name, field_type)) = parsed.field {
        // Result with entity field
        // Field idents are suffixed with `_field` so the getters that
        // `SimpleObject` derives (named after the fields) don't collide with
        // the `success`/`error` constructors below; `#[graphql(name = ...)]`
        // keeps the GraphQL schema names unchanged.
        let output = quote! {
            #[derive(Debug, Clone, async_graphql::SimpleObject)]
            pub struct #struct_name {
                #[graphql(name = "success")]
                pub success_field: bool,
                #[graphql(name = "error")]
                pub error_field: Option<String>,
                pub #field_name: Option<#field_type>,
            }

            impl #struct_name {
                pub fn success(#field_name: #field_type) -> Self {
                    Self {
                        success_field: true,
                        error_field: None,
                        #field_name: Some(#field_name),
                    }
                }

                pub fn error(msg: impl Into<String>) -> Self {
                    Self {
                        success_field: false,
                        error_field: Some(msg.into()),
                        #field_name: None,
                    }
                }
            }
        };
        output.into()
    } else {
        // Simple result (no entity field)
        let output = quote! {
            #[derive(Debug, Clone, async_graphql::SimpleObject)]
            pub struct #struct_name {
                #[graphql(name = "success")]
                pub success_field: bool,
                #[graphql(name = "error")]
                pub error_field: Option<String>,
            }

            impl #struct_name {
                pub fn success() -> Self {
                    Self {
                        success_field: true,
                        error_field: None,
                    }
                }

                pub fn error(msg: impl Into<String>) -> Self {
                    Self {
                        success_field: false,
                        error_field: Some(msg.into()),
                    }
                }
            }
        };
        output.into()
    }
}

/// Input for mutation_result! macro
struct MutationResultInput {
    name: Ident,
    field: Option<(Ident, Type)>,
}

impl Parse for MutationResultInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let name: Ident = input.parse()?;

        let field = if input.peek(Token![,]) {
            input.parse::<Token![,]>()?;
            let field_name: Ident = input.parse()?;
            input.parse::<Token![:]>()?;
            let field_type: Type = input.parse()?;
            Some((field_name, field_type))
        } else {
            None
        };

        Ok(MutationResultInput { name, field })
    }
}
