use proc_macro::TokenStream;
use proc_macro2::{Ident, TokenStream as TokenStream2};
use quote::quote;
use syn::{
    ext::IdentExt, parse::Parse, Expr, GenericArgument, Item, ItemFn, Lit, LitStr, PathArguments,
    ReturnType, Token, Type,
};

const NOT_A_METHOD: &str = "The @time decorator can only be used on methods.";

enum TimeConfig {
    Stdout,
    Log(Ident),
    Callback(Expr),
}

impl Parse for TimeConfig {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        if input.is_empty() {
            return Ok(TimeConfig::Stdout);
        }

        let expr: Expr = input.parse()?;
        if !input.is_empty() {
            input.parse::<Token![,]>()?;
            if !input.is_empty() {
                return Err(input.error("expected a single reporting callback"));
            }
        }

        match expr {
            Expr::Path(path) if path.path.is_ident("log") => {
                Ok(TimeConfig::Log(Ident::new("Info", path.path.segments[0].ident.span())))
            }
            Expr::Assign(assign) if is_log_path(&assign.left) => {
                let level = match *assign.right {
                    Expr::Lit(syn::ExprLit {
                        lit: Lit::Str(lit), ..
                    }) => lit,
                    other => {
                        return Err(syn::Error::new_spanned(
                            other,
                            "expected a log level string, e.g. log = \"debug\"",
                        ))
                    }
                };
                Ok(TimeConfig::Log(log_level(&level)?))
            }
            callback => Ok(TimeConfig::Callback(callback)),
        }
    }
}

impl TimeConfig {
    fn timer(&self) -> TokenStream2 {
        match self {
            TimeConfig::Stdout => quote!(::timekeeper::Timer::new()),
            TimeConfig::Log(level) => {
                quote!(::timekeeper::Timer::with_log(::timekeeper::log::Level::#level))
            }
            TimeConfig::Callback(callback) => quote!(::timekeeper::Timer::with_callback(#callback)),
        }
    }
}

fn is_log_path(expr: &Expr) -> bool {
    matches!(expr, Expr::Path(path) if path.path.is_ident("log"))
}

fn log_level(lit: &LitStr) -> syn::Result<Ident> {
    let level = match lit.value().to_lowercase().as_str() {
        "error" => "Error",
        "warn" => "Warn",
        "info" => "Info",
        "debug" => "Debug",
        "trace" => "Trace",
        other => {
            return Err(syn::Error::new_spanned(
                lit,
                format!(
                    "unknown log level `{}`, expected one of error, warn, info, debug, trace",
                    other
                ),
            ))
        }
    };
    Ok(Ident::new(level, lit.span()))
}

// Result<T, E>, anyhow::Result<T>, io::Result<T>, ...
fn returns_result(output: &ReturnType) -> bool {
    let return_type = match output {
        ReturnType::Type(_, return_type) => &**return_type,
        ReturnType::Default => return false,
    };

    match return_type {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map(|seg| seg.ident == "Result")
            .unwrap_or(false),
        _ => false,
    }
}

fn contains_impl_trait(ty: &Type) -> bool {
    match ty {
        Type::ImplTrait(_) => true,
        Type::Reference(type_ref) => contains_impl_trait(&type_ref.elem),
        Type::Ptr(type_ptr) => contains_impl_trait(&type_ptr.elem),
        Type::Slice(type_slice) => contains_impl_trait(&type_slice.elem),
        Type::Array(type_array) => contains_impl_trait(&type_array.elem),
        Type::Paren(type_paren) => contains_impl_trait(&type_paren.elem),
        Type::Group(type_group) => contains_impl_trait(&type_group.elem),
        Type::Tuple(type_tuple) => type_tuple.elems.iter().any(contains_impl_trait),
        Type::Path(type_path) => type_path.path.segments.iter().any(|seg| match &seg.arguments {
            PathArguments::AngleBracketed(args) => args.args.iter().any(|arg| {
                matches!(arg, GenericArgument::Type(inner) if contains_impl_trait(inner))
            }),
            _ => false,
        }),
        _ => false,
    }
}

fn expand(attr: TokenStream2, item: TokenStream2) -> syn::Result<TokenStream2> {
    let config: TimeConfig = syn::parse2(attr)?;

    let func = match syn::parse2::<Item>(item) {
        Ok(Item::Fn(func)) => func,
        Ok(other) => return Err(syn::Error::new_spanned(other, NOT_A_METHOD)),
        Err(err) => return Err(syn::Error::new(err.span(), NOT_A_METHOD)),
    };

    let ItemFn {
        attrs,
        vis,
        sig,
        block,
    } = func;

    if let Some(constness) = &sig.constness {
        return Err(syn::Error::new_spanned(
            constness,
            "#[time] reads the clock and cannot be used on a const fn",
        ));
    }

    let name = LitStr::new(&sig.ident.unraw().to_string(), sig.ident.span());
    let timer = config.timer();

    // Pin the block's type so `?` inside it can infer its error conversion.
    let body = match &sig.output {
        ReturnType::Default => quote! {
            let __timekeeper_ret: () = #block;
            __timekeeper_ret
        },
        ReturnType::Type(_, ty) if !contains_impl_trait(ty) => quote! {
            let __timekeeper_ret: #ty = #block;
            __timekeeper_ret
        },
        ReturnType::Type(..) => quote!(#block),
    };

    let fallible = returns_result(&sig.output);
    let timed = match (sig.asyncness.is_some(), fallible) {
        (false, false) => quote! {
            __timekeeper_timer.run(#name, move || { #body })
        },
        (false, true) => quote! {
            __timekeeper_timer.run_fallible(#name, move || { #body })
        },
        (true, false) => quote! {
            __timekeeper_timer.run_async(#name, async move { #body }).await
        },
        (true, true) => quote! {
            __timekeeper_timer.run_async_fallible(#name, async move { #body }).await
        },
    };

    Ok(quote! {
        #(#attrs)*
        #vis #sig {
            let __timekeeper_timer = #timer;
            #timed
        }
    })
}

/// Reports the wall-clock duration of every successful call to the
/// annotated method.
///
/// - `#[time]` prints `Time taken by <name>: <ms>ms` to stdout.
/// - `#[time(callback)]` passes the elapsed milliseconds to `callback`,
///   any expression implementing `Fn(f64)`.
/// - `#[time(log)]` / `#[time(log = "debug")]` emits a `log` record.
///
/// `async fn` is timed up to the resolution of its future. A return type
/// ending in `Result` makes `Err` outcomes skip the report. Anything other
/// than a function with a body is rejected at compile time.
#[proc_macro_attribute]
pub fn time(attr: TokenStream, item: TokenStream) -> TokenStream {
    let original: TokenStream2 = item.clone().into();

    match expand(attr.into(), item.into()) {
        Ok(expanded) => expanded.into(),
        Err(err) => {
            let mut output = err.to_compile_error();
            output.extend(original);
            output.into()
        }
    }
}
