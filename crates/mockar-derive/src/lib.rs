//! Mockar Derive Macros: Generated Trait Mocks
//!
//! Rust has no runtime proxies, so every mocked trait gets a forwarding shim
//! generated at compile time. `#[mockable]` keeps the trait as written and
//! adds a `Mock<Trait>` struct whose methods all route to one
//! `mockar::Proxy`.
//!
//! # Example
//!
//! ```ignore
//! use mockar::{mockable, set_return_value};
//!
//! #[mockable]
//! pub trait Inventory {
//!     fn stock(&self, sku: &str) -> u32;
//!     fn reserve(&mut self, sku: &str, count: u32) -> Result<(), String>;
//! }
//!
//! let inventory = MockInventory::new();
//! set_return_value(|| inventory.stock("apple"), 12)?;
//! assert_eq!(inventory.stock("apple"), 12);
//! ```
//!
//! # Supported traits
//!
//! - methods taking `&self` or `&mut self`
//! - arguments that are `Serialize + Debug` (references included)
//! - return types that are `mockar::Placeholder + 'static`
//!
//! Generic methods, associated types and constants, `async fn`, and
//! by-value receivers are rejected with a compile error.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote, ToTokens};
use syn::{
    parse_macro_input, FnArg, GenericParam, Ident, ItemTrait, Lit, Meta, Pat, ReturnType, TraitItem,
    TraitItemFn, Type,
};

/// Attribute macro generating a mock for a trait.
///
/// Generates `Mock<Trait>` (or the name given by `#[mockable(name = "...")]`)
/// which:
/// - implements the trait by forwarding every method to its proxy
/// - implements `mockar::Mock`, `new()` and `Default`
/// - answers `Display`, `Debug`, `Hash`, `PartialEq` and `Eq` by proxy identity
///
/// # Example
///
/// ```ignore
/// #[mockable(name = "FakeClock")]
/// trait Clock {
///     fn now(&self) -> u64;
/// }
///
/// let clock = FakeClock::new();
/// ```
#[proc_macro_attribute]
pub fn mockable(attr: TokenStream, item: TokenStream) -> TokenStream {
    let item_trait = parse_macro_input!(item as ItemTrait);

    let custom_name = match parse_name_attribute(attr.into()) {
        Ok(name) => name,
        Err(err) => return with_error(&item_trait, &err),
    };

    match expand_mock(&item_trait, custom_name) {
        Ok(mock) => TokenStream::from(quote! {
            #item_trait
            #mock
        }),
        Err(err) => with_error(&item_trait, &err),
    }
}

// ============================================================================
// Expansion
// ============================================================================

fn expand_mock(item_trait: &ItemTrait, custom_name: Option<String>) -> syn::Result<TokenStream2> {
    if let Some(param) = item_trait.generics.params.first() {
        return Err(syn::Error::new_spanned(param, "#[mockable] does not support generic traits"));
    }

    let trait_ident = &item_trait.ident;
    let vis = &item_trait.vis;
    let mock_ident = match custom_name {
        Some(name) => Ident::new(&name, trait_ident.span()),
        None => format_ident!("Mock{}", trait_ident),
    };
    let mock_name = mock_ident.to_string();
    let trait_name = trait_ident.to_string();

    let methods = item_trait
        .items
        .iter()
        .map(|item| match item {
            TraitItem::Fn(method) => expand_method(&trait_name, method),
            other => Err(syn::Error::new_spanned(
                other,
                "#[mockable] traits may only declare methods",
            )),
        })
        .collect::<syn::Result<Vec<_>>>()?;

    let doc = format!("Mock of [`{trait_name}`] generated by `#[mockable]`.");

    Ok(quote! {
        #[doc = #doc]
        #vis struct #mock_ident {
            proxy: ::mockar::Proxy,
        }

        impl #mock_ident {
            /// Create a mock backed by a fresh handler
            #[must_use]
            #vis fn new() -> Self {
                ::mockar::mock()
            }
        }

        impl ::core::default::Default for #mock_ident {
            fn default() -> Self {
                Self::new()
            }
        }

        impl ::mockar::Mock for #mock_ident {
            const TYPE_NAME: &'static str = ::core::concat!(::core::module_path!(), "::", #mock_name);

            fn from_proxy(proxy: ::mockar::Proxy) -> Self {
                Self { proxy }
            }

            fn proxy(&self) -> &::mockar::Proxy {
                &self.proxy
            }
        }

        impl #trait_ident for #mock_ident {
            #(#methods)*
        }

        impl ::core::fmt::Display for #mock_ident {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                let identity: ::std::string::String = self
                    .proxy
                    .invoke(&::mockar::MethodId::OBJECT_TO_STRING, ::mockar::Arguments::new());
                f.write_str(&identity)
            }
        }

        impl ::core::fmt::Debug for #mock_ident {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(self, f)
            }
        }

        impl ::core::hash::Hash for #mock_ident {
            fn hash<H: ::core::hash::Hasher>(&self, state: &mut H) {
                let identity: u64 = self
                    .proxy
                    .invoke(&::mockar::MethodId::OBJECT_HASH, ::mockar::Arguments::new());
                ::core::hash::Hash::hash(&identity, state);
            }
        }

        impl ::core::cmp::PartialEq for #mock_ident {
            fn eq(&self, other: &Self) -> bool {
                self.proxy.invoke(
                    &::mockar::MethodId::OBJECT_EQ,
                    ::mockar::Arguments::new().with(&other.proxy.id()),
                )
            }
        }

        impl ::core::cmp::Eq for #mock_ident {}
    })
}

fn expand_method(trait_name: &str, method: &TraitItemFn) -> syn::Result<TokenStream2> {
    let sig = &method.sig;

    if let Some(asyncness) = &sig.asyncness {
        return Err(syn::Error::new_spanned(asyncness, "#[mockable] does not support async methods"));
    }
    if let Some(param) = sig
        .generics
        .params
        .iter()
        .find(|param| !matches!(param, GenericParam::Lifetime(_)))
    {
        return Err(syn::Error::new_spanned(
            param,
            "#[mockable] does not support generic methods",
        ));
    }

    let mut inputs = sig.inputs.iter();
    match inputs.next() {
        Some(FnArg::Receiver(receiver)) if receiver.reference.is_some() => {}
        Some(other) => {
            return Err(syn::Error::new_spanned(
                other,
                "#[mockable] methods must take `&self` or `&mut self`",
            ))
        }
        None => {
            return Err(syn::Error::new_spanned(
                sig,
                "#[mockable] methods must take `&self` or `&mut self`",
            ))
        }
    }

    let arg_idents = inputs
        .map(|input| match input {
            FnArg::Typed(typed) => {
                if matches!(*typed.ty, Type::ImplTrait(_)) {
                    return Err(syn::Error::new_spanned(
                        &typed.ty,
                        "#[mockable] does not support `impl Trait` arguments",
                    ));
                }
                match &*typed.pat {
                    Pat::Ident(pat) => Ok(pat.ident.clone()),
                    other => Err(syn::Error::new_spanned(
                        other,
                        "#[mockable] arguments must be plain identifiers",
                    )),
                }
            }
            FnArg::Receiver(receiver) => Err(syn::Error::new_spanned(receiver, "unexpected receiver")),
        })
        .collect::<syn::Result<Vec<_>>>()?;

    let return_type = match &sig.output {
        ReturnType::Default => quote!(()),
        ReturnType::Type(_, ty) => {
            if matches!(**ty, Type::ImplTrait(_)) {
                return Err(syn::Error::new_spanned(
                    ty,
                    "#[mockable] does not support `impl Trait` return types",
                ));
            }
            ty.to_token_stream()
        }
    };

    let method_name = sig.ident.to_string();
    let signature = render_signature(sig);

    Ok(quote! {
        #sig {
            static METHOD: ::mockar::MethodId =
                ::mockar::MethodId::new(::mockar::Owner::Trait(#trait_name), #method_name, #signature);
            let args = ::mockar::Arguments::new()#(.with(&#arg_idents))*;
            ::mockar::Mock::proxy(self).invoke::<#return_type>(&METHOD, args)
        }
    })
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Parse `name = "..."` from `#[mockable(name = "...")]`
fn parse_name_attribute(attr: TokenStream2) -> syn::Result<Option<String>> {
    if attr.is_empty() {
        return Ok(None);
    }
    let meta: Meta = syn::parse2(attr)?;
    if let Meta::NameValue(nv) = &meta {
        if nv.path.is_ident("name") {
            if let syn::Expr::Lit(syn::ExprLit {
                lit: Lit::Str(s), ..
            }) = &nv.value
            {
                return syn::parse_str::<Ident>(&s.value())
                    .map(|ident| Some(ident.to_string()))
                    .map_err(|_| syn::Error::new_spanned(s, "mock name must be an identifier"));
            }
        }
    }
    Err(syn::Error::new_spanned(
        meta,
        "expected `#[mockable]` or `#[mockable(name = \"MockName\")]`",
    ))
}

/// Render a method signature compactly, e.g. `fn greet(&self, name: &str) -> String`
fn render_signature(sig: &syn::Signature) -> String {
    compact_tokens(&sig.to_token_stream().to_string())
}

/// Drop the spaces `TokenStream::to_string` puts around punctuation
fn compact_tokens(rendered: &str) -> String {
    let mut out = String::with_capacity(rendered.len());
    let mut chars = rendered.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ' ' && !keeps_space(&out, chars.peek().copied()) {
            continue;
        }
        out.push(c);
    }
    out
}

fn keeps_space(before: &str, next: Option<char>) -> bool {
    let prev = before.chars().last();
    if before.ends_with("::") || matches!(prev, Some('(' | '<' | '&' | '[')) {
        return false;
    }
    match next {
        Some(')' | '>' | ',' | ']' | ':' | '<') => false,
        // `greet(` and `Vec<u8>(`, but `-> (u8, u8)`
        Some('(') => {
            before.ends_with("->") || !prev.is_some_and(|p| p.is_alphanumeric() || p == '_' || p == '>')
        }
        _ => true,
    }
}

/// Re-emit the trait alongside a compile error so the trait itself still resolves
fn with_error(item_trait: &ItemTrait, err: &syn::Error) -> TokenStream {
    let err = err.to_compile_error();
    TokenStream::from(quote! {
        #item_trait
        #err
    })
}
