use proc_macro::TokenStream;
use quote::quote;
use syn::{
    fold::Fold, parse_macro_input, parse_quote, Attribute, BinOp, Block, Expr, ExprLit, ExprPath,
    Fields, FnArg, Ident, Item, ItemFn, ItemStruct, Lit, ReturnType, Type,
};

/// Lifts plain float code into a differentiable companion.
///
/// On a function, `#[differentiable(diff_f)]` keeps `f` and adds `diff_f`,
/// where every `#[diffvar]` parameter becomes an `Expr` and the result is an
/// `Expr`. On a struct, `#[differentiable(DiffS)]` keeps `S` and adds `DiffS`,
/// where every `#[diffvar]` field becomes a `Variable`.
#[proc_macro_attribute]
pub fn differentiable(attr: TokenStream, item: TokenStream) -> TokenStream {
    let diff_name = parse_macro_input!(attr as Ident);
    let input = parse_macro_input!(item as Item);

    match input {
        Item::Struct(item_struct) => expand_struct(diff_name, item_struct),
        Item::Fn(item_fn) => expand_fn(diff_name, item_fn),
        other => syn::Error::new_spanned(
            other,
            "differentiable can only be applied to structs or functions",
        )
        .to_compile_error()
        .into(),
    }
}

fn expand_struct(diff_name: Ident, item_struct: ItemStruct) -> TokenStream {
    if !item_struct.generics.params.is_empty() {
        return syn::Error::new_spanned(
            item_struct.generics,
            "differentiable does not support generic structs",
        )
        .to_compile_error()
        .into();
    }
    let struct_data = match item_struct.fields {
        Fields::Named(fields_named) => fields_named,
        _ => {
            return syn::Error::new_spanned(
                item_struct.ident,
                "differentiable only supports structs with named fields",
            )
            .to_compile_error()
            .into();
        }
    };

    let vis = item_struct.vis;
    let attrs = item_struct.attrs;
    let original_name = item_struct.ident;
    let diff_struct_name = diff_name;

    let mut original_fields = Vec::new();
    let mut diff_fields = Vec::new();
    let mut conversions = Vec::new();
    let mut params: Vec<Ident> = Vec::new();
    let mut scalar: Option<Type> = None;

    for field in struct_data.named {
        let is_diffvar = has_diffvar(&field.attrs);
        let filtered_attrs = strip_diffvar(&field.attrs);

        let mut original_field = field.clone();
        original_field.attrs = filtered_attrs.clone();

        let mut diff_field = field;
        diff_field.attrs = filtered_attrs;

        let Some(ident) = diff_field.ident.clone() else {
            continue;
        };

        if is_diffvar {
            let ty = diff_field.ty.clone();
            if !is_float(&ty) {
                return syn::Error::new_spanned(ty, "#[diffvar] fields must be f32 or f64")
                    .to_compile_error()
                    .into();
            }
            if !same_type(scalar.get_or_insert_with(|| ty.clone()), &ty) {
                return syn::Error::new_spanned(ty, "all #[diffvar] fields must share one scalar type")
                    .to_compile_error()
                    .into();
            }
            diff_field.ty = parse_quote!(::expr_ad::variable::Variable<#ty>);
            conversions.push(quote!(#ident: ::expr_ad::variable::Variable::new(src.#ident)));
            params.push(ident);
        } else {
            conversions.push(quote!(#ident: src.#ident));
        }

        original_fields.push(original_field);
        diff_fields.push(diff_field);
    }

    let Some(scalar) = scalar else {
        return syn::Error::new_spanned(
            original_name,
            "differentiable structs need at least one #[diffvar] field",
        )
        .to_compile_error()
        .into();
    };

    let expanded = quote! {
        #(#attrs)*
        #vis struct #original_name {
            #(#original_fields,)*
        }

        #vis struct #diff_struct_name {
            #(#diff_fields,)*
        }

        impl ::expr_ad::Differentiable for #diff_struct_name {
            type Scalar = #scalar;

            fn parameters(&self) -> ::std::vec::Vec<::expr_ad::variable::Variable<#scalar>> {
                ::std::vec![#(self.#params.clone()),*]
            }
        }

        impl ::core::convert::From<#original_name> for #diff_struct_name {
            fn from(src: #original_name) -> Self {
                #diff_struct_name {
                    #(#conversions,)*
                }
            }
        }
    };

    expanded.into()
}

fn expand_fn(diff_name: Ident, item_fn: ItemFn) -> TokenStream {
    let vis = item_fn.vis;
    let attrs = item_fn.attrs;
    let original_name = item_fn.sig.ident.clone();

    let scalar: Type = match &item_fn.sig.output {
        ReturnType::Type(_, ty) if is_float(ty) => (**ty).clone(),
        _ => {
            return syn::Error::new_spanned(
                item_fn.sig.output,
                "differentiable functions must return f32 or f64",
            )
            .to_compile_error()
            .into();
        }
    };

    let mut original_inputs = item_fn.sig.inputs.clone();
    let mut diff_inputs = item_fn.sig.inputs.clone();
    let mut diff_params = Vec::new();

    for (original_arg, diff_arg) in original_inputs.iter_mut().zip(diff_inputs.iter_mut()) {
        if let (FnArg::Typed(original_pat), FnArg::Typed(diff_pat)) = (original_arg, diff_arg) {
            let is_diffvar = has_diffvar(&original_pat.attrs);
            let filtered_attrs = strip_diffvar(&original_pat.attrs);

            original_pat.attrs = filtered_attrs.clone();
            diff_pat.attrs = filtered_attrs;

            if is_diffvar {
                if !same_type(&diff_pat.ty, &scalar) {
                    return syn::Error::new_spanned(
                        &diff_pat.ty,
                        "#[diffvar] parameters must have the return scalar type",
                    )
                    .to_compile_error()
                    .into();
                }
                diff_pat.ty = Box::new(parse_quote!(::expr_ad::expr::Expr<#scalar>));
                diff_params.push(DiffParam { const_shadow: None });
            } else {
                let const_shadow = match &*original_pat.pat {
                    syn::Pat::Ident(pat_ident) if same_type(&original_pat.ty, &scalar) => {
                        Some(pat_ident.ident.clone())
                    }
                    _ => None,
                };
                diff_params.push(DiffParam { const_shadow });
            }
        }
    }

    let mut original_sig = item_fn.sig.clone();
    original_sig.ident = original_name;
    original_sig.inputs = original_inputs;

    let mut diff_sig = item_fn.sig.clone();
    diff_sig.ident = diff_name;
    diff_sig.inputs = diff_inputs;
    diff_sig.output = parse_quote!(-> ::expr_ad::expr::Expr<#scalar>);

    let original_block = item_fn.block;
    let diff_block: Block = {
        let const_params: Vec<Ident> = diff_params
            .iter()
            .filter_map(|param| param.const_shadow.clone())
            .collect();
        let mut lift = LiftToExpr {
            scalar: scalar.clone(),
        };
        let block = lift.fold_block(*original_block.clone());
        parse_quote!({
            #(
                let #const_params = ::expr_ad::expr::Expr::<#scalar>::constant(#const_params);
            )*
            let __lifted: ::expr_ad::expr::Expr<#scalar> = (|| #block)().into();
            __lifted
        })
    };

    let expanded = quote! {
        #(#attrs)*
        #vis #original_sig #original_block

        #vis #diff_sig #diff_block
    };

    expanded.into()
}

fn has_diffvar(attrs: &[Attribute]) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident("diffvar"))
}

fn strip_diffvar(attrs: &[Attribute]) -> Vec<Attribute> {
    attrs
        .iter()
        .filter(|attr| !attr.path().is_ident("diffvar"))
        .cloned()
        .collect()
}

fn float_name(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(path) if path.qself.is_none() => path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string())
            .filter(|name| name == "f32" || name == "f64"),
        _ => None,
    }
}

fn is_float(ty: &Type) -> bool {
    float_name(ty).is_some()
}

fn same_type(a: &Type, b: &Type) -> bool {
    match (float_name(a), float_name(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

#[derive(Clone)]
struct DiffParam {
    const_shadow: Option<Ident>,
}

/// Rewrites a float body so it builds an expression instead.
///
/// Numeric literals become constants. Local names are cloned at every use
/// because expressions, unlike floats, are not `Copy`. Call targets,
/// assignment targets, ranges and index positions are left alone.
struct LiftToExpr {
    scalar: Type,
}

fn is_local(path: &ExprPath) -> bool {
    path.qself.is_none()
        && path.path.get_ident().is_some_and(|ident| {
            let name = ident.to_string();
            name != "self" && name.starts_with(|c: char| c.is_lowercase() || c == '_')
        })
}

fn is_compound_assign(op: &BinOp) -> bool {
    matches!(
        op,
        BinOp::AddAssign(_) | BinOp::SubAssign(_) | BinOp::MulAssign(_) | BinOp::DivAssign(_)
    )
}

impl Fold for LiftToExpr {
    fn fold_expr(&mut self, expr: Expr) -> Expr {
        let scalar = self.scalar.clone();
        match expr {
            Expr::Lit(ExprLit {
                lit: Lit::Float(lit),
                ..
            }) => parse_quote!(::expr_ad::expr::Expr::<#scalar>::constant(#lit as #scalar)),
            Expr::Lit(ExprLit {
                lit: Lit::Int(lit),
                ..
            }) => parse_quote!(::expr_ad::expr::Expr::<#scalar>::constant(#lit as #scalar)),
            Expr::Path(path) if is_local(&path) => parse_quote!(#path.clone()),
            Expr::Call(mut call) => {
                call.args = call.args.into_iter().map(|arg| self.fold_expr(arg)).collect();
                Expr::Call(call)
            }
            Expr::Assign(mut assign) => {
                assign.right = Box::new(self.fold_expr(*assign.right));
                Expr::Assign(assign)
            }
            Expr::Binary(mut binary) if is_compound_assign(&binary.op) => {
                binary.right = Box::new(self.fold_expr(*binary.right));
                Expr::Binary(binary)
            }
            Expr::Range(range) => Expr::Range(range),
            Expr::Index(mut index) => {
                index.expr = Box::new(self.fold_expr(*index.expr));
                Expr::Index(index)
            }
            other => syn::fold::fold_expr(self, other),
        }
    }
}
