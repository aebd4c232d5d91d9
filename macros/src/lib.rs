use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::{quote, ToTokens};
use syn::{
    parse_macro_input, parse_quote, ImplItem, ImplItemFn, ItemImpl, LitStr, Receiver, ReturnType,
    Type, Visibility,
};

/// 为 impl 块中的公开方法织入调用日志
///
/// 名称不以 `_` 开头且带 `self` 接收者的 `pub` 方法会被改写为：
/// 调用前输出 START，正常返回后输出 END 和 DONE（附耗时）。
/// 返回 `Result` 的方法只在 `Ok` 时输出 END / DONE。`async fn` 同样支持。
/// 类型需要实现 `emolog::aop::Instrumented`
///
/// # 示例
/// ```ignore
/// use emolog::aop::Instrumented;
/// use emolog::instrumented;
///
/// struct Worker {
///     aop: emolog::aop::Aop,
/// }
///
/// impl Instrumented for Worker {
///     fn logger(&self) -> Option<std::sync::Arc<emolog::log::Logger>> {
///         self.aop.logger().cloned()
///     }
/// }
///
/// #[instrumented]
/// impl Worker {
///     pub fn run(&self) -> i32 {
///         5
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn instrumented(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        return syn::Error::new(Span::call_site(), "#[instrumented] takes no arguments")
            .to_compile_error()
            .into();
    }

    let mut item_impl = parse_macro_input!(item as ItemImpl);
    if let Some((_, path, _)) = &item_impl.trait_ {
        return syn::Error::new_spanned(
            path,
            "#[instrumented] must be placed on an inherent impl block",
        )
        .to_compile_error()
        .into();
    }

    for impl_item in item_impl.items.iter_mut() {
        if let ImplItem::Fn(method) = impl_item {
            if should_wrap(method) {
                wrap_method(method);
            }
        }
    }

    TokenStream::from(item_impl.into_token_stream())
}

/// 只织入 `pub`、非 `_` 开头、带接收者的非 const 方法
fn should_wrap(method: &ImplItemFn) -> bool {
    matches!(method.vis, Visibility::Public(_))
        && !method.sig.ident.to_string().starts_with('_')
        && method.sig.receiver().is_some()
        && method.sig.constness.is_none()
}

fn wrap_method(method: &mut ImplItemFn) {
    let name = LitStr::new(&method.sig.ident.to_string(), method.sig.ident.span());
    let source = match method.sig.receiver() {
        Some(receiver) => logger_source(receiver),
        None => return,
    };
    let returns_result = returns_result(&method.sig.output);
    let annotation = output_annotation(&method.sig.output);
    let block = &method.block;

    if method.sig.asyncness.is_some() {
        let helper = if returns_result {
            quote!(try_trace_call_async)
        } else {
            quote!(trace_call_async)
        };
        let body = match annotation {
            Some(ty) => quote!(async move {
                let __emolog_output: #ty = #block;
                __emolog_output
            }),
            None => quote!(async move #block),
        };
        method.block = parse_quote!({
            let __emolog_logger = ::emolog::aop::Instrumented::logger(#source);
            ::emolog::aop::#helper(__emolog_logger, #name, #body).await
        });
    } else {
        let helper = if returns_result {
            quote!(try_trace_call)
        } else {
            quote!(trace_call)
        };
        let closure = match annotation {
            Some(ty) => quote!(move || -> #ty #block),
            None => quote!(move || #block),
        };
        method.block = parse_quote!({
            let __emolog_logger = ::emolog::aop::Instrumented::logger(#source);
            ::emolog::aop::#helper(__emolog_logger, #name, #closure)
        });

        let has_track_caller = method
            .attrs
            .iter()
            .any(|attr| attr.path().is_ident("track_caller"));
        if !has_track_caller {
            method.attrs.push(parse_quote!(#[track_caller]));
        }
    }
}

/// 取 logger 时对接收者的引用方式
fn logger_source(receiver: &Receiver) -> TokenStream2 {
    if receiver.reference.is_none() && receiver.colon_token.is_none() {
        quote!(&self)
    } else {
        quote!(&*self)
    }
}

/// 返回类型最后一段是否为 `Result`
fn returns_result(output: &ReturnType) -> bool {
    match output {
        ReturnType::Type(_, ty) => match ty.as_ref() {
            Type::Path(type_path) => type_path
                .path
                .segments
                .last()
                .map(|segment| segment.ident == "Result")
                .unwrap_or(false),
            _ => false,
        },
        ReturnType::Default => false,
    }
}

/// 闭包 / 异步块上可以显式标注的返回类型
///
/// 含引用、生命周期或 `impl Trait` 的返回类型交给类型推断
fn output_annotation(output: &ReturnType) -> Option<TokenStream2> {
    match output {
        ReturnType::Default => Some(quote!(())),
        ReturnType::Type(_, ty) => {
            let rendered = ty.to_token_stream().to_string();
            if rendered.contains('&') || rendered.contains('\'') || rendered.contains("impl ") {
                None
            } else {
                Some(ty.to_token_stream())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_wrap() {
        let method: ImplItemFn = parse_quote!(pub fn run(&self) -> i32 { 5 });
        assert!(should_wrap(&method));

        let method: ImplItemFn = parse_quote!(fn run(&self) -> i32 { 5 });
        assert!(!should_wrap(&method));

        let method: ImplItemFn = parse_quote!(pub fn _hidden(&self) {});
        assert!(!should_wrap(&method));

        let method: ImplItemFn = parse_quote!(pub fn new() -> Self { Self });
        assert!(!should_wrap(&method));

        let method: ImplItemFn = parse_quote!(pub(crate) fn run(&self) {});
        assert!(!should_wrap(&method));
    }

    #[test]
    fn test_returns_result() {
        let method: ImplItemFn = parse_quote!(pub fn a(&self) -> anyhow::Result<()> { Ok(()) });
        assert!(returns_result(&method.sig.output));

        let method: ImplItemFn = parse_quote!(pub fn b(&self) -> Option<i32> { None });
        assert!(!returns_result(&method.sig.output));
    }

    #[test]
    fn test_output_annotation() {
        let method: ImplItemFn = parse_quote!(pub fn a(&self) -> &str { "" });
        assert!(output_annotation(&method.sig.output).is_none());

        let method: ImplItemFn = parse_quote!(pub fn b(&self) -> (i32, i32) { (1, 2) });
        assert!(output_annotation(&method.sig.output).is_some());

        let method: ImplItemFn = parse_quote!(pub fn c(&self) {});
        assert_eq!(
            output_annotation(&method.sig.output).unwrap().to_string(),
            "()"
        );
    }

    #[test]
    fn test_wrap_method_sync() {
        let mut method: ImplItemFn = parse_quote!(pub fn run(&mut self, x: i32) -> i32 { x });
        wrap_method(&mut method);
        let rendered = method.into_token_stream().to_string();

        assert!(rendered.contains("track_caller"));
        assert!(rendered.contains("trace_call"));
        assert!(rendered.contains("\"run\""));
        assert!(rendered.contains("& * self"));
    }

    #[test]
    fn test_wrap_method_async_result() {
        let mut method: ImplItemFn =
            parse_quote!(pub async fn load(self) -> Result<(), String> { Ok(()) });
        wrap_method(&mut method);
        let rendered = method.into_token_stream().to_string();

        assert!(!rendered.contains("track_caller"));
        assert!(rendered.contains("try_trace_call_async"));
        assert!(rendered.contains(". await"));
    }
}
