use proc_macro::TokenStream;
use quote::quote;
use syn::{
    DataStruct, DeriveInput, Field, Fields, GenericArgument, LitStr, PathArguments, Result, Type,
};

#[derive(Default)]
struct FieldOptions {
    rename: Option<String>,
    skip: bool,
    embed: bool,
    flatten: bool,
}

enum FieldShape {
    String,
    OptionalString,
    StringList,
    Other,
}

pub(crate) fn generate_document_for_struct(
    ast: &DeriveInput,
    data: &DataStruct,
) -> Result<TokenStream> {
    let name = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    let named = match &data.fields {
        Fields::Named(named) => named,
        _ => {
            return Err(syn::Error::new_spanned(
                ast,
                format!(
                    "Failed to derive Document for struct '{}': only structs with named fields are supported.\n\
                     Example: #[derive(Document)] pub struct MyDoc {{ title: String }}",
                    name
                ),
            ))
        }
    };

    let mut calls = Vec::with_capacity(named.named.len());
    for field in &named.named {
        if let Some(call) = builder_call(field)? {
            calls.push(call);
        }
    }

    let expanded = quote! {
        impl #impl_generics ::badger::collection::Document for #name #ty_generics #where_clause {
            fn schema() -> ::badger::errors::BadgerResult<::badger::collection::Schema<Self>> {
                ::badger::collection::Schema::<Self>::builder()
                    #(#calls)*
                    .build()
            }
        }
    };

    Ok(TokenStream::from(expanded))
}

fn builder_call(field: &Field) -> Result<Option<proc_macro2::TokenStream>> {
    let options = field_options(field)?;
    if options.skip {
        return Ok(None);
    }

    let ident = match &field.ident {
        Some(ident) => ident,
        None => return Err(syn::Error::new_spanned(field, "Field must be named")),
    };
    let ty = &field.ty;
    let field_name = options.rename.clone().unwrap_or_else(|| {
        let raw = ident.to_string();
        raw.strip_prefix("r#").map(str::to_string).unwrap_or(raw)
    });

    if options.flatten {
        return Ok(Some(quote! {
            .flatten::<#ty, _>(|d: &Self| &d.#ident)
        }));
    }

    if options.embed {
        return Ok(Some(quote! {
            .embed::<#ty, _>(#field_name, |d: &Self| &d.#ident)
        }));
    }

    let call = match field_shape(ty) {
        FieldShape::String => quote! {
            .string(#field_name, |d: &Self| d.#ident.as_str())
        },
        FieldShape::OptionalString => quote! {
            .optional_string(#field_name, |d: &Self| d.#ident.as_deref())
        },
        FieldShape::StringList => quote! {
            .string_list(#field_name, |d: &Self| d.#ident.as_slice())
        },
        FieldShape::Other => quote! {
            .unsupported(#field_name)
        },
    };
    Ok(Some(call))
}

fn field_options(field: &Field) -> Result<FieldOptions> {
    let mut options = FieldOptions::default();

    for attr in &field.attrs {
        if !attr.path().is_ident("badger") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value = meta.value()?;
                let s: LitStr = value.parse()?;
                if s.value().trim().is_empty() {
                    return Err(meta.error("rename needs a non-empty name"));
                }
                options.rename = Some(s.value());
                Ok(())
            } else if meta.path.is_ident("skip") {
                options.skip = true;
                Ok(())
            } else if meta.path.is_ident("embed") {
                options.embed = true;
                Ok(())
            } else if meta.path.is_ident("flatten") {
                options.flatten = true;
                Ok(())
            } else {
                Err(meta.error("Unknown badger attribute"))
            }
        })?;
    }

    if options.embed && options.flatten {
        return Err(syn::Error::new_spanned(
            field,
            "A field cannot be both embedded and flattened",
        ));
    }
    if options.flatten && options.rename.is_some() {
        return Err(syn::Error::new_spanned(
            field,
            "A flattened field has no name of its own to rename",
        ));
    }
    Ok(options)
}

fn field_shape(ty: &Type) -> FieldShape {
    match last_segment(ty) {
        Some((ident, None)) if ident == "String" => FieldShape::String,
        Some((ident, Some(inner))) if ident == "Option" && is_string(inner) => {
            FieldShape::OptionalString
        }
        Some((ident, Some(inner))) if ident == "Vec" && is_string(inner) => FieldShape::StringList,
        _ => FieldShape::Other,
    }
}

fn is_string(ty: &Type) -> bool {
    matches!(last_segment(ty), Some((ident, None)) if ident == "String")
}

/// Name of the last path segment and its single generic type argument, if any.
fn last_segment(ty: &Type) -> Option<(String, Option<&Type>)> {
    let Type::Path(path) = ty else {
        return None;
    };
    if path.qself.is_some() {
        return None;
    }
    let segment = path.path.segments.last()?;
    let argument = match &segment.arguments {
        PathArguments::None => None,
        PathArguments::AngleBracketed(args) if args.args.len() == 1 => match args.args.first() {
            Some(GenericArgument::Type(inner)) => Some(inner),
            _ => return None,
        },
        _ => return None,
    };
    Some((segment.ident.to_string(), argument))
}
