use proc_macro::TokenStream;
use quote::quote;
use syn::{
    parse_macro_input, Data, DeriveInput, Fields, GenericArgument, LitStr, PathArguments, Type,
};

/// Derive macro for destination records.
///
/// Implements `rowbind_api::record::Record` on the annotated struct:
///
/// - `shape() -> &'static Shape`: field descriptors, built at compile time.
/// - `field_mut(usize) -> Option<FieldSlot>`: typed mutable access by position.
///
/// The struct must implement `Default` (rows start from the default value).
///
/// # Example
///
/// ```ignore
/// #[derive(Record, Default)]
/// pub struct Account {
///     #[record(rename = "AccountID")]
///     pub id: i64,
///     pub name: String,
///     pub avatar: Option<Vec<u8>>,
///     #[record(skip)]
///     pub cached: bool,
/// }
/// ```
///
/// Scalar kinds: `bool`, `i8`..`i64`, `u8`..`u64`, `f32`, `f64`, `String`,
/// `Vec<u8>`, `NaiveDateTime`, each bare or wrapped in `Option`. Any other
/// field type is accepted as an opaque slot that only takes an identically
/// typed value.
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_impl(&input) {
        Ok(tokens) => tokens,
        Err(e) => e.to_compile_error().into(),
    }
}

fn derive_impl(input: &DeriveInput) -> Result<TokenStream, syn::Error> {
    let name = &input.ident;
    let name_str = name.to_string();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Record only supports structs with named fields",
                ))
            }
        },
        _ => return Err(syn::Error::new_spanned(name, "Record only supports structs")),
    };

    let mut descriptor_tokens = Vec::new();
    let mut slot_arms = Vec::new();

    for (index, field) in fields.iter().enumerate() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected named field"))?;

        // Parse #[record(...)] attribute.
        let mut rename: Option<String> = None;
        let mut skip = false;

        for attr in &field.attrs {
            if !attr.path().is_ident("record") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let value: LitStr = meta.value()?.parse()?;
                    rename = Some(value.value());
                } else if meta.path.is_ident("skip") {
                    skip = true;
                } else {
                    return Err(
                        meta.error("unknown record attribute (expected 'rename' or 'skip')")
                    );
                }
                Ok(())
            })?;
        }

        let column_name = rename.unwrap_or_else(|| field_name.to_string());
        let (inner_ty, nullable) = match option_inner(&field.ty) {
            Some(inner) => (inner, true),
            None => (&field.ty, false),
        };
        let kind = scalar_kind(inner_ty);
        let settable = !skip;

        let kind_ident = syn::Ident::new(kind.unwrap_or("Other"), proc_macro2::Span::call_site());
        descriptor_tokens.push(quote! {
            rowbind_api::schema::FieldDescriptor {
                name: #column_name,
                kind: rowbind_api::schema::FieldKind::#kind_ident,
                nullable: #nullable,
                settable: #settable,
            }
        });

        if skip {
            continue;
        }

        let slot_expr = match kind {
            Some(_) if nullable => quote! {
                rowbind_api::record::FieldSlot::#kind_ident(
                    rowbind_api::record::Slot::Nullable(&mut self.#field_name)
                )
            },
            Some(_) => quote! {
                rowbind_api::record::FieldSlot::#kind_ident(
                    rowbind_api::record::Slot::Bare(&mut self.#field_name)
                )
            },
            None => quote! {
                rowbind_api::record::FieldSlot::Other(&mut self.#field_name)
            },
        };
        slot_arms.push(quote! {
            #index => Some(#slot_expr),
        });
    }

    let field_count = descriptor_tokens.len();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics rowbind_api::record::Record for #name #ty_generics #where_clause {
            fn shape() -> &'static rowbind_api::schema::Shape {
                static FIELDS: [rowbind_api::schema::FieldDescriptor; #field_count] = [
                    #(#descriptor_tokens),*
                ];
                static SHAPE: rowbind_api::schema::Shape = rowbind_api::schema::Shape {
                    name: #name_str,
                    fields: &FIELDS,
                };
                &SHAPE
            }

            #[allow(clippy::match_single_binding)]
            fn field_mut(
                &mut self,
                index: usize,
            ) -> Option<rowbind_api::record::FieldSlot<'_>> {
                match index {
                    #(#slot_arms)*
                    _ => None,
                }
            }
        }
    };

    Ok(TokenStream::from(expanded))
}

/// `Option<T>` → `Some(T)`.
fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let seg = type_path.path.segments.last()?;
    if seg.ident != "Option" {
        return None;
    }
    single_generic(&seg.arguments)
}

fn single_generic(args: &PathArguments) -> Option<&Type> {
    let PathArguments::AngleBracketed(args) = args else {
        return None;
    };
    if args.args.len() != 1 {
        return None;
    }
    match args.args.first()? {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    }
}

/// `FieldKind` variant name for a scalar type, `None` for opaque types.
fn scalar_kind(ty: &Type) -> Option<&'static str> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let seg = type_path.path.segments.last()?;
    let ident = seg.ident.to_string();
    let kind = match ident.as_str() {
        "bool" => "Bool",
        "i8" => "Int8",
        "i16" => "Int16",
        "i32" => "Int32",
        "i64" => "Int64",
        "u8" => "UInt8",
        "u16" => "UInt16",
        "u32" => "UInt32",
        "u64" => "UInt64",
        "f32" => "Float32",
        "f64" => "Float64",
        "String" => "String",
        "NaiveDateTime" => "Timestamp",
        "Vec" => {
            let elem = single_generic(&seg.arguments)?;
            match elem {
                Type::Path(p) if p.path.is_ident("u8") => "Bytes",
                _ => return None,
            }
        }
        _ => return None,
    };
    Some(kind)
}
