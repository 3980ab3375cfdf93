//! # aeternity Test Helpers
//!
//! `#[aeternity_test_helpers::test]` turns an `async fn` whose arguments are
//! [`Signer`](https://docs.rs/aeternity-rs)s into a `#[tokio::test]`, injecting one
//! deterministic development wallet per argument. Tests receive their credentials
//! explicitly instead of reaching for a global wallet list.
//!
//! ```rust,ignore
//! #[aeternity_test_helpers::test(wallets: 2)]
//! async fn transfers(owner: Signer, bob: Signer) {
//!     assert_ne!(owner.account_id(), bob.account_id());
//! }
//! ```
//!
//! The crate using the attribute must depend on `tokio` and `aeternity-rs`.
use proc_macro::TokenStream;
use quote::quote;
use syn::{
    parse::{Parse, ParseStream},
    parse_macro_input, FnArg, Ident, LitInt, Token,
};

struct TestArgs {
    wallets: Option<usize>,
}

impl Parse for TestArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        if input.is_empty() {
            return Ok(TestArgs { wallets: None });
        }

        let name: Ident = input.parse()?;
        if name != "wallets" {
            return Err(syn::Error::new(name.span(), "expected `wallets`"));
        }
        input.parse::<Token![:]>()?;
        let wallets: LitInt = input.parse()?;

        Ok(TestArgs {
            wallets: Some(wallets.base10_parse()?),
        })
    }
}

#[proc_macro_attribute]
pub fn test(attr: TokenStream, input: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as TestArgs);
    let item_fn = parse_macro_input!(input as syn::ItemFn);
    let attrs = &item_fn.attrs;
    let sig = &item_fn.sig;
    let fn_name = &sig.ident;
    let fn_return_type = &sig.output;
    let fn_block = &item_fn.block;

    if sig.asyncness.is_none() {
        return syn::Error::new_spanned(sig.fn_token, "test function must be `async`")
            .to_compile_error()
            .into();
    }

    let arg_binding_and_ty = match sig
        .inputs
        .iter()
        .map(|arg| {
            let FnArg::Typed(arg) = arg else {
                return Err(syn::Error::new_spanned(
                    arg,
                    "unexpected receiver argument in test signature",
                ));
            };
            Ok((&arg.pat, &arg.ty))
        })
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(res) => res,
        Err(err) => return err.to_compile_error().into(),
    };

    let wallet_count = arg_binding_and_ty.len();
    if let Some(declared) = args.wallets {
        if declared != wallet_count {
            return syn::Error::new_spanned(
                &sig.inputs,
                format!(
                    "`wallets: {}` declared but the test takes {} argument(s)",
                    declared, wallet_count
                ),
            )
            .to_compile_error()
            .into();
        }
    }

    let wallet_inits = arg_binding_and_ty.iter().map(|(arg_binding, arg_ty)| {
        quote! {
            let #arg_binding: #arg_ty = wallets
                .next()
                .expect("one wallet per test argument");
        }
    });

    let wallets = (wallet_count > 0).then(|| {
        quote! {
            let mut wallets = ::aeternity_rs::dev_wallets(#wallet_count).into_iter();
            #( #wallet_inits )*
        }
    });

    quote! {
        #( #attrs )*
        #[::tokio::test]
        async fn #fn_name() #fn_return_type {
            #wallets
            #fn_block
        }
    }
    .into()
}
