use crate::derive_utils::apply_derives;
use proc_macro::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{Field, Item, ItemStruct, Token, parse_macro_input, punctuated::Punctuated};

/// #[domain_event] 宏实现
/// 仅支持具名字段 struct：
/// - 追加字段：`metadata: EventMetadata`（缺失时置于最前，既有字段顺序不变）
/// - 合并/追加派生：Debug, Clone
/// - 实现 `DomainEvent`：`event_type` 为类型名字面量，时间戳委托 metadata
/// - 生成按载荷字段排列的 `new(...)`，构造时自动戳定元数据
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let _ = attr; // 暂无参数
    let input = parse_macro_input!(item as Item);

    let mut st = match input {
        Item::Struct(s) => s,
        other => {
            return syn::Error::new(other.span(), "#[domain_event] only on struct")
                .to_compile_error()
                .into();
        }
    };

    let fields_named = match &mut st.fields {
        syn::Fields::Named(f) => f,
        _ => {
            return syn::Error::new(st.span(), "only supports named-field struct")
                .to_compile_error()
                .into();
        }
    };

    let metadata_ty: syn::Type =
        syn::parse_quote! { ::seedwork_domain::domain_event::EventMetadata };

    // metadata 缺失时追加到最前；载荷字段保持原有顺序
    let has_metadata = fields_named
        .named
        .iter()
        .any(|f| f.ident.as_ref().is_some_and(|i| i == "metadata"));
    if !has_metadata {
        let mut new_named: Punctuated<Field, Token![,]> = Punctuated::new();
        new_named.push(syn::parse_quote! { metadata: #metadata_ty });
        new_named.extend(fields_named.named.clone());
        fields_named.named = new_named;
    }

    // 载荷字段（除 metadata 外）用于生成构造函数
    let payload: Vec<(syn::Ident, syn::Type)> = fields_named
        .named
        .iter()
        .filter_map(|f| {
            let ident = f.ident.as_ref()?;
            (ident != "metadata").then_some((ident.clone(), f.ty.clone()))
        })
        .collect();
    let payload_idents: Vec<&syn::Ident> = payload.iter().map(|(i, _)| i).collect();
    let payload_types: Vec<&syn::Type> = payload.iter().map(|(_, t)| t).collect();

    apply_derives(
        &mut st.attrs,
        vec![syn::parse_quote!(Debug), syn::parse_quote!(Clone)],
    );

    let out_struct = ItemStruct { ..st };
    let ident = &out_struct.ident;
    let event_type = ident.to_string();
    let (impl_generics, ty_generics, where_clause) = out_struct.generics.split_for_impl();

    let expanded = quote! {
        #out_struct

        impl #impl_generics #ident #ty_generics #where_clause {
            pub fn new(#(#payload_idents: #payload_types),*) -> Self {
                Self {
                    metadata: ::seedwork_domain::domain_event::EventMetadata::new(),
                    #(#payload_idents),*
                }
            }

            pub fn metadata(&self) -> &::seedwork_domain::domain_event::EventMetadata {
                &self.metadata
            }
        }

        impl #impl_generics ::seedwork_domain::domain_event::DomainEvent for #ident #ty_generics #where_clause {
            fn event_type(&self) -> &'static str {
                #event_type
            }

            fn occurred_at(
                &self,
            ) -> ::seedwork_domain::chrono::DateTime<::seedwork_domain::chrono::Utc> {
                self.metadata.occurred_at()
            }

            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }
        }
    };

    TokenStream::from(expanded)
}
