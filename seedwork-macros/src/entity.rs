use proc_macro::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{
    Field, Item, ItemStruct, Result as SynResult, Token, parse::Parse, parse::ParseStream,
    parse_macro_input, punctuated::Punctuated,
};

/// #[entity] 宏实现
/// - 注入字段：`id: IdType`、`events: EventBuffer`（缺失时创建），并置于字段最前
/// - 实现 `Entity`（`id`）、`HasDomainEvents`（只读视图 + 缓冲区探针）
/// - 生成 `new(id)`（要求 `Default`）与 `pub(crate) record_event`
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as EntityAttrConfig);
    let input = parse_macro_input!(item as Item);

    let mut st = match input {
        Item::Struct(s) => s,
        other => {
            return syn::Error::new(other.span(), "#[entity] only on struct")
                .to_compile_error()
                .into();
        }
    };

    // 仅支持具名字段
    let fields_named = match &mut st.fields {
        syn::Fields::Named(f) => f,
        _ => {
            return syn::Error::new(st.span(), "only supports named-field struct")
                .to_compile_error()
                .into();
        }
    };

    let id_type = cfg.id_ty.unwrap_or_else(|| syn::parse_quote! { String });
    let buffer_type: syn::Type = syn::parse_quote! { ::seedwork_domain::entity::EventBuffer };

    // 重建字段顺序：id、events 在前，其余字段保持原有相对顺序；
    // 已存在的同名字段按原定义复用
    let required: [(&str, &syn::Type); 2] = [("id", &id_type), ("events", &buffer_type)];
    let old_named = fields_named.named.clone();
    let mut new_named: Punctuated<Field, Token![,]> = Punctuated::new();

    for (name, ty) in required {
        match old_named
            .iter()
            .find(|f| f.ident.as_ref().is_some_and(|i| i == name))
        {
            Some(existing) => new_named.push(existing.clone()),
            None => {
                let ident: syn::Ident = syn::parse_str(name).expect("valid field ident");
                new_named.push(syn::parse_quote! { #ident: #ty });
            }
        }
    }

    for field in old_named {
        let is_required = field
            .ident
            .as_ref()
            .is_some_and(|i| i == "id" || i == "events");
        if !is_required {
            new_named.push(field);
        }
    }

    fields_named.named = new_named;

    let out_struct = ItemStruct { ..st };
    let ident = &out_struct.ident;
    let (impl_generics, ty_generics, where_clause) = out_struct.generics.split_for_impl();

    let expanded = quote! {
        #out_struct

        impl #impl_generics #ident #ty_generics #where_clause {
            pub fn new(id: #id_type) -> Self
            where
                Self: ::core::default::Default,
            {
                Self {
                    id,
                    ..::core::default::Default::default()
                }
            }

            /// 登记一个待发布事件（仅限实体自身的实现代码调用）
            pub(crate) fn record_event<E>(&mut self, event: E)
            where
                E: ::seedwork_domain::domain_event::DomainEvent,
            {
                self.events.register(event);
            }
        }

        impl #impl_generics ::seedwork_domain::entity::Entity for #ident #ty_generics #where_clause {
            type Id = #id_type;

            fn id(&self) -> &Self::Id {
                &self.id
            }
        }

        impl #impl_generics ::seedwork_domain::entity::HasDomainEvents for #ident #ty_generics #where_clause {
            fn domain_events(
                &self,
            ) -> &[::std::sync::Arc<dyn ::seedwork_domain::domain_event::DomainEvent>] {
                self.events.events()
            }

            fn event_buffer_mut(
                &mut self,
            ) -> ::core::option::Option<&mut ::seedwork_domain::entity::EventBuffer> {
                ::core::option::Option::Some(&mut self.events)
            }
        }
    };

    TokenStream::from(expanded)
}

// -------- parsing --------

struct EntityAttrConfig {
    id_ty: Option<syn::Type>,
}

impl Parse for EntityAttrConfig {
    fn parse(input: ParseStream) -> SynResult<Self> {
        if input.is_empty() {
            return Ok(Self { id_ty: None });
        }

        let key: syn::Ident = input.parse()?;
        if key != "id" {
            return Err(syn::Error::new(
                key.span(),
                "unknown key in attribute; expected 'id'",
            ));
        }
        let _eq: Token![=] = input.parse()?;
        let ty: syn::Type = input.parse()?;

        if !input.is_empty() {
            return Err(input.error("unexpected tokens after 'id = Type'"));
        }

        Ok(Self { id_ty: Some(ty) })
    }
}
