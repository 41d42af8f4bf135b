use syn::{Attribute, Token, punctuated::Punctuated};

// 提取非 derive 属性与已有 derive 列表
fn split_derives(attrs: &[Attribute]) -> (Vec<Attribute>, Vec<syn::Path>) {
    let mut retained = Vec::new();
    let mut existing = Vec::new();
    for attr in attrs {
        if attr.path().is_ident("derive") {
            if let Ok(list) =
                attr.parse_args_with(Punctuated::<syn::Path, Token![,]>::parse_terminated)
            {
                existing.extend(list);
            }
        } else {
            retained.push(attr.clone());
        }
    }
    (retained, existing)
}

// 归一化 derive 的 key，避免 Serialize/serde::Serialize 重复
fn derive_key(path: &syn::Path) -> String {
    match path.segments.last() {
        Some(last) => {
            let ident = last.ident.to_string();
            match ident.as_str() {
                "Serialize" | "Deserialize" => format!("serde::{ident}"),
                _ => ident,
            }
        }
        None => String::new(),
    }
}

/// 在 attrs 上合并所需派生：required 优先，与既有 derive 去重后
/// 重建为单个 `#[derive(...)]` 属性，置于属性列表最前。
pub(crate) fn apply_derives(attrs: &mut Vec<Attribute>, required: Vec<syn::Path>) {
    let (retained, existing) = split_derives(attrs);

    let mut seen = std::collections::HashSet::new();
    let mut merged: Vec<syn::Path> = Vec::new();
    for path in required.into_iter().chain(existing) {
        if seen.insert(derive_key(&path)) {
            merged.push(path);
        }
    }

    let derive_attr: Attribute = syn::parse_quote!(#[derive(#(#merged),*)]);
    *attrs = std::iter::once(derive_attr).chain(retained).collect();
}
